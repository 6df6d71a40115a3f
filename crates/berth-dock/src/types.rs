//! Shared enums and keys for the docking system.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::panel::PanelId;

/// One of the two fixed dock containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockSide {
    Left,
    Right,
}

impl DockSide {
    /// Both sides, in layout order.
    pub const ALL: [DockSide; 2] = [DockSide::Left, DockSide::Right];

    pub fn opposite(&self) -> DockSide {
        match self {
            DockSide::Left => DockSide::Right,
            DockSide::Right => DockSide::Left,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DockSide::Left => "left",
            DockSide::Right => "right",
        }
    }
}

impl std::fmt::Display for DockSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a dragged panel lands relative to the grouped rows of a dock.
///
/// "No drop zone" is expressed as `Option::<DropTarget>::None` rather than a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropType {
    /// New row inserted before the target row.
    Above,
    /// New row inserted after the target row.
    Below,
    /// New column left of the row's first column.
    Left,
    /// New column right of the row's last column.
    Right,
    /// New column between two existing columns.
    Between,
    /// Stacked below the last panel of a shorter column, filling its gap.
    Subcolumn,
}

impl DropType {
    /// Whether this drop creates a new row.
    pub fn is_row_insert(&self) -> bool {
        matches!(self, DropType::Above | DropType::Below)
    }

    /// Whether this drop creates a new column in an existing row.
    pub fn is_side_by_side(&self) -> bool {
        matches!(self, DropType::Left | DropType::Right | DropType::Between)
    }
}

/// Identity of an inter-column splitter: the row it belongs to and the column on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SplitterKey {
    pub side: DockSide,
    pub row: u32,
    pub left_column: u32,
}

impl SplitterKey {
    pub fn new(side: DockSide, row: u32, left_column: u32) -> Self {
        Self {
            side,
            row,
            left_column,
        }
    }

    /// Column on the right of the splitter.
    pub fn right_column(&self) -> u32 {
        self.left_column + 1
    }
}

bitflags! {
    /// Edges grabbed by a resize handle.
    ///
    /// Docked panels only resize from the bottom edge; floating panels accept any edge or
    /// corner combination.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResizeEdges: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

/// Interactive element a pointer press landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementId {
    /// A panel's title bar / drag handle.
    DragHandle(PanelId),
    /// The boundary between a dock and the main window.
    DockSplitter(DockSide),
    /// A splitter between two adjacent columns.
    ColumnSplitter(SplitterKey),
    /// A panel resize edge or corner.
    ResizeHandle(PanelId, ResizeEdges),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_type_classes() {
        assert!(DropType::Above.is_row_insert());
        assert!(!DropType::Subcolumn.is_row_insert());
        assert!(DropType::Between.is_side_by_side());
        assert!(!DropType::Below.is_side_by_side());
    }

    #[test]
    fn test_corner_edges() {
        assert!(ResizeEdges::BOTTOM_RIGHT.contains(ResizeEdges::BOTTOM));
        assert!(ResizeEdges::BOTTOM_RIGHT.contains(ResizeEdges::RIGHT));
        assert!(!ResizeEdges::BOTTOM_RIGHT.intersects(ResizeEdges::TOP_LEFT));
    }

    #[test]
    fn test_side_serde_names() {
        assert_eq!(serde_json::to_string(&DockSide::Left).unwrap(), "\"left\"");
        assert_eq!(DockSide::Right.opposite(), DockSide::Left);
    }
}
