//! Dock layout engine.
//!
//! [`layout_dock`] normalizes a side's placement numbering, computes the geometry of every
//! row, column and panel, writes the rectangles back to the registry and pushes them to the
//! host. The pure half, [`compute_dock_geometry`], is shared with drop detection so the
//! drop indicator always agrees with where panels end up.

use berth_core::geometry::{Rect, Size};
use berth_core::math::at_least;
use berth_core::profiling::profile_function;

use crate::config::DockConfig;
use crate::group::{Column, group_by_column, group_by_row};
use crate::host::{DockBounds, Host, place_element};
use crate::panel::{Panel, PanelId};
use crate::registry::PanelRegistry;
use crate::splitter::Splitter;
use crate::types::{DockSide, SplitterKey};

/// Computed rectangle of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGeometry {
    pub id: PanelId,
    pub sub_row: u32,
    pub rect: Rect,
    pub fill: bool,
}

/// Computed placement of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGeometry {
    pub column: u32,
    pub x: f32,
    pub width: f32,
    /// Total laid-out height of the stacked panels.
    pub stacked_height: f32,
    pub panels: Vec<PanelGeometry>,
}

impl ColumnGeometry {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn head(&self) -> Option<&PanelGeometry> {
        self.panels.first()
    }

    pub fn tail(&self) -> Option<&PanelGeometry> {
        self.panels.last()
    }
}

/// Computed placement of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGeometry {
    pub row: u32,
    pub top: f32,
    pub height: f32,
    pub columns: Vec<ColumnGeometry>,
}

impl RowGeometry {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn mid(&self) -> f32 {
        self.top + self.height * 0.5
    }

    /// Sum of column widths, splitters excluded.
    pub fn columns_width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    pub fn head_panel(&self) -> Option<&PanelGeometry> {
        self.columns.first().and_then(ColumnGeometry::head)
    }
}

/// Everything a layout pass computes for one dock.
#[derive(Debug, Clone, PartialEq)]
pub struct DockGeometry {
    pub side: DockSide,
    pub content: Rect,
    pub rows: Vec<RowGeometry>,
    pub splitters: Vec<Splitter>,
}

impl DockGeometry {
    pub fn empty(side: DockSide, content: Rect) -> Self {
        Self {
            side,
            content,
            rows: Vec::new(),
            splitters: Vec::new(),
        }
    }

    pub fn panels(&self) -> impl Iterator<Item = &PanelGeometry> {
        self.rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.panels.iter())
    }

    pub fn panel(&self, id: &PanelId) -> Option<&PanelGeometry> {
        self.panels().find(|p| &p.id == id)
    }

    /// Height occupied by all rows.
    pub fn used_height(&self) -> f32 {
        self.rows.iter().map(|r| r.height).sum()
    }
}

/// Stored height floored at the minimum, so rows never measure shorter than they render.
fn effective_height(panel: &Panel, config: &DockConfig) -> f32 {
    at_least(panel.height, config.min_panel_height)
}

fn stacked_height(column: &Column<'_>, config: &DockConfig) -> f32 {
    column.panels.iter().map(|p| effective_height(p, config)).sum()
}

fn non_fill_height(column: &Column<'_>, config: &DockConfig) -> f32 {
    column
        .panels
        .iter()
        .filter(|p| !p.is_fill())
        .map(|p| effective_height(p, config))
        .sum()
}

fn is_fill_row(columns: &[Column<'_>]) -> bool {
    columns.iter().any(Column::has_fill)
}

fn fill_count(column: &Column<'_>) -> usize {
    column.panels.iter().filter(|p| p.is_fill()).count()
}

/// Height a column asks for. Fill columns ask for their share of the leftover dock
/// height, but never less than their fixed panels plus one minimum per fill panel.
fn column_demand(column: &Column<'_>, fill_share: f32, config: &DockConfig) -> f32 {
    let fills = fill_count(column);
    if fills == 0 {
        return stacked_height(column, config);
    }
    let floor = non_fill_height(column, config) + fills as f32 * config.min_panel_height;
    fill_share.max(floor)
}

/// Split the row's available width between its columns.
///
/// Locked columns keep their width when at least one column is unlocked; the rest is
/// shared by ratio weight. A column without a ratio weighs the mean of the ratios that are
/// set, or 1 when none are. The last flexible column absorbs rounding so that widths plus
/// splitters add up to `content_width` whenever the minimums allow it.
pub fn column_widths(columns: &[Column<'_>], content_width: f32, config: &DockConfig) -> Vec<f32> {
    let n = columns.len();
    if n == 0 {
        return Vec::new();
    }
    let min = config.min_column_width;
    let available = (content_width - config.splitter_width * (n - 1) as f32).max(0.0);

    let locks: Vec<Option<f32>> = columns.iter().map(Column::width_lock).collect();
    let locked = locks.iter().filter(|l| l.is_some()).count();
    let lock_aware = locked > 0 && locked < n;

    let flexible: Vec<usize> = (0..n)
        .filter(|&i| !lock_aware || locks[i].is_none())
        .collect();

    let mut widths = vec![0.0; n];
    let mut remaining = available;
    if lock_aware {
        for (i, lock) in locks.iter().enumerate() {
            if let Some(lock) = lock {
                widths[i] = at_least(*lock, min);
                remaining -= widths[i];
            }
        }
    }

    let ratios: Vec<Option<f32>> = flexible
        .iter()
        .map(|&i| columns[i].width_ratio().filter(|r| *r > 0.0))
        .collect();
    let set: Vec<f32> = ratios.iter().flatten().copied().collect();
    let default_weight = if set.is_empty() {
        1.0
    } else {
        set.iter().sum::<f32>() / set.len() as f32
    };
    let weights: Vec<f32> = ratios.iter().map(|r| r.unwrap_or(default_weight)).collect();
    let total_weight: f32 = weights.iter().sum();
    let share = remaining.max(0.0);
    for (&i, weight) in flexible.iter().zip(&weights) {
        widths[i] = at_least(share * weight / total_weight, min);
    }

    if let Some(&last) = flexible.last() {
        let used: f32 = widths.iter().sum();
        widths[last] = at_least(widths[last] + (available - used), min);
    }
    widths
}

/// Compute the geometry of `panels` (already filtered to one side) inside `content`.
pub fn compute_dock_geometry(
    side: DockSide,
    panels: &[&Panel],
    content: Rect,
    config: &DockConfig,
) -> DockGeometry {
    profile_function!();

    let rows = group_by_row(panels);
    let grouped: Vec<(u32, Vec<Column<'_>>)> = rows
        .iter()
        .map(|row| (row.row, group_by_column(row)))
        .collect();

    let fill_rows = grouped.iter().filter(|(_, cols)| is_fill_row(cols)).count();
    let fixed_total: f32 = grouped
        .iter()
        .filter(|(_, cols)| !is_fill_row(cols))
        .map(|(_, cols)| {
            cols.iter()
                .map(|c| stacked_height(c, config))
                .fold(0.0, f32::max)
        })
        .sum();
    let fill_share = if fill_rows > 0 {
        (content.height - fixed_total) / fill_rows as f32
    } else {
        0.0
    };

    let mut geometry = DockGeometry::empty(side, content);
    let mut top = content.y;
    for (row, columns) in &grouped {
        let widths = column_widths(columns, content.width, config);
        let row_height = columns
            .iter()
            .map(|c| column_demand(c, fill_share, config))
            .fold(0.0, f32::max);

        let mut row_geometry = RowGeometry {
            row: *row,
            top,
            height: row_height,
            columns: Vec::with_capacity(columns.len()),
        };

        let mut x = content.x;
        for (index, (column, width)) in columns.iter().zip(&widths).enumerate() {
            let fills = fill_count(column);
            let fill_height = if fills > 0 {
                at_least(
                    (row_height - non_fill_height(column, config)) / fills as f32,
                    config.min_panel_height,
                )
            } else {
                0.0
            };

            let mut y = top;
            let mut panel_geometries = Vec::with_capacity(column.panels.len());
            for panel in &column.panels {
                let height = if panel.is_fill() {
                    fill_height
                } else {
                    let room = content.bottom() - y;
                    at_least(effective_height(panel, config).min(room), config.min_panel_height)
                };
                panel_geometries.push(PanelGeometry {
                    id: panel.id.clone(),
                    sub_row: panel.slot().map_or(0, |s| s.sub_row),
                    rect: Rect::new(x, y, *width, height),
                    fill: panel.is_fill(),
                });
                y += height;
            }

            row_geometry.columns.push(ColumnGeometry {
                column: column.column,
                x,
                width: *width,
                stacked_height: y - top,
                panels: panel_geometries,
            });

            x += width;
            if index + 1 < columns.len() {
                geometry.splitters.push(Splitter::new(
                    SplitterKey::new(side, *row, column.column),
                    Rect::new(x, top, config.splitter_width, row_height),
                ));
                x += config.splitter_width;
            }
        }

        top += row_height;
        geometry.rows.push(row_geometry);
    }
    geometry
}

/// Renumber rows, columns and sub-rows on `side` to be contiguous from zero and clear fill
/// and width locks on panels no longer eligible for them.
///
/// Returns true when anything changed.
pub fn normalize_dock(registry: &mut PanelRegistry, side: DockSide) -> bool {
    struct Assignment {
        id: PanelId,
        row: u32,
        column: u32,
        sub_row: u32,
        fill_ok: bool,
        lock_ok: bool,
    }

    let assignments: Vec<Assignment> = {
        let panels = registry.docked_panels(side, None);
        let rows = group_by_row(&panels);
        let last_row = rows.len().saturating_sub(1);
        let mut out = Vec::with_capacity(panels.len());
        for (row_index, row) in rows.iter().enumerate() {
            let columns = group_by_column(row);
            let multi_column = columns.len() > 1;
            for (column_index, column) in columns.iter().enumerate() {
                let last_sub_row = column.panels.len().saturating_sub(1);
                for (sub_row, panel) in column.panels.iter().enumerate() {
                    out.push(Assignment {
                        id: panel.id.clone(),
                        row: row_index as u32,
                        column: column_index as u32,
                        sub_row: sub_row as u32,
                        fill_ok: row_index == last_row && sub_row == last_sub_row,
                        lock_ok: multi_column,
                    });
                }
            }
        }
        out
    };

    let mut changed = false;
    for assignment in assignments {
        let Some(panel) = registry.get_mut(&assignment.id) else {
            continue;
        };
        let stored_height = panel.height;
        let Some(slot) = panel.placement.slot_mut() else {
            continue;
        };
        let before = *slot;
        slot.row = assignment.row;
        slot.column = assignment.column;
        slot.sub_row = assignment.sub_row;
        if slot.fill && !assignment.fill_ok {
            slot.fill = false;
            tracing::debug!(
                "Panel '{}' lost fill eligibility; back to stored height {}",
                assignment.id,
                stored_height
            );
        }
        if slot.width_lock.is_some() && !assignment.lock_ok {
            slot.width_lock = None;
            tracing::debug!("Panel '{}' lost its width lock (single column)", assignment.id);
        }
        changed |= *slot != before;
    }
    changed
}

/// Lay out one dock: normalize, compute, write back, regenerate splitters, push to host.
///
/// Idempotent: a second call with no intervening mutation produces the same geometry.
pub fn layout_dock(
    registry: &mut PanelRegistry,
    host: &mut dyn Host,
    config: &DockConfig,
    viewport: Size,
    side: DockSide,
) -> DockGeometry {
    profile_function!();

    normalize_dock(registry, side);

    let dock = *registry.dock(side);
    let content = dock.content_rect(viewport, config);
    let geometry = if dock.visible {
        let panels = registry.docked_panels(side, None);
        compute_dock_geometry(side, &panels, content, config)
    } else {
        DockGeometry::empty(side, content)
    };

    for panel_geometry in geometry.panels() {
        if let Some(panel) = registry.get_mut(&panel_geometry.id) {
            panel.rect = panel_geometry.rect;
        }
        place_element(host, &panel_geometry.id, panel_geometry.rect);
    }

    registry.replace_splitters(side, geometry.splitters.clone());
    host.clear_splitters(side);
    for splitter in &geometry.splitters {
        host.create_splitter(splitter);
    }

    host.set_dock_bounds(
        side,
        DockBounds {
            rect: dock.bounds(viewport, config),
            handle: dock.handle_rect(viewport, config),
            visible: dock.visible,
        },
    );

    tracing::trace!(
        "Laid out {} dock: {} rows, {} splitters",
        side,
        geometry.rows.len(),
        geometry.splitters.len()
    );
    geometry
}
