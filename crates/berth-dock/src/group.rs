//! Grouping of a dock's flat panel list into rows, columns and sub-rows.
//!
//! These run on every layout pass and every drag-move tick, so they avoid anything more
//! expensive than one sort and a linear sweep.

use crate::panel::Panel;

/// Panels sharing one `(side, row)`, ordered by `(column, sub_row)`.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    pub row: u32,
    pub panels: Vec<&'a Panel>,
}

/// Panels sharing one `(side, row, column)`, ordered top to bottom.
#[derive(Debug, Clone)]
pub struct Column<'a> {
    pub column: u32,
    pub panels: Vec<&'a Panel>,
}

impl<'a> Column<'a> {
    /// Columns stack, so their height is additive.
    pub fn height(&self) -> f32 {
        column_height(&self.panels)
    }

    /// The panel that carries the column's ratio and lock.
    pub fn head(&self) -> Option<&'a Panel> {
        self.panels.first().copied()
    }

    pub fn tail(&self) -> Option<&'a Panel> {
        self.panels.last().copied()
    }

    pub fn width_ratio(&self) -> Option<f32> {
        self.head().and_then(|p| p.slot()).and_then(|s| s.width_ratio)
    }

    /// Locked width of the first panel in the column holding a lock.
    pub fn width_lock(&self) -> Option<f32> {
        self.panels
            .iter()
            .find_map(|p| p.slot().and_then(|s| s.width_lock))
    }

    pub fn has_fill(&self) -> bool {
        self.panels.iter().any(|p| p.is_fill())
    }
}

/// Sum of stored heights.
pub fn column_height(panels: &[&Panel]) -> f32 {
    panels.iter().map(|p| p.height).sum()
}

/// A row's natural height: its tallest column.
pub fn row_height(columns: &[Column<'_>]) -> f32 {
    columns.iter().map(Column::height).fold(0.0, f32::max)
}

/// Partition docked panels by row. Floating panels are skipped.
pub fn group_by_row<'a>(panels: &[&'a Panel]) -> Vec<Row<'a>> {
    let mut docked: Vec<&'a Panel> = panels.iter().copied().filter(|p| p.slot().is_some()).collect();
    docked.sort_by_key(|p| p.slot().map(|s| s.order_key()));

    let mut rows: Vec<Row<'a>> = Vec::new();
    for panel in docked {
        let row = panel.slot().map_or(0, |s| s.row);
        match rows.last_mut() {
            Some(last) if last.row == row => last.panels.push(panel),
            _ => rows.push(Row {
                row,
                panels: vec![panel],
            }),
        }
    }
    rows
}

/// Partition a row into its columns, left to right.
pub fn group_by_column<'a>(row: &Row<'a>) -> Vec<Column<'a>> {
    let mut panels = row.panels.clone();
    panels.sort_by_key(|p| p.slot().map(|s| (s.column, s.sub_row)));

    let mut columns: Vec<Column<'a>> = Vec::new();
    for panel in panels {
        let column = panel.slot().map_or(0, |s| s.column);
        match columns.last_mut() {
            Some(last) if last.column == column => last.panels.push(panel),
            _ => columns.push(Column {
                column,
                panels: vec![panel],
            }),
        }
    }
    columns
}
