//! Inter-column splitters and the controller that drags them.
//!
//! Splitters are a projection of the registry: every layout pass destroys and recreates
//! them, so they carry nothing but their key and rectangle.

use berth_core::geometry::Rect;
use berth_core::math::{Vec2, clamp_range};

use crate::config::DockConfig;
use crate::group::{group_by_column, group_by_row};
use crate::registry::PanelRegistry;
use crate::types::{DockSide, SplitterKey};

/// A draggable bar between two adjacent columns of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splitter {
    pub key: SplitterKey,
    pub rect: Rect,
}

impl Splitter {
    pub fn new(key: SplitterKey, rect: Rect) -> Self {
        Self { key, rect }
    }

    /// Bounds widened horizontally by `tolerance` on each side for easier grabbing.
    pub fn hit_bounds(&self, tolerance: f32) -> Rect {
        Rect::new(
            self.rect.x - tolerance,
            self.rect.y,
            self.rect.width + tolerance * 2.0,
            self.rect.height,
        )
    }

    pub fn is_point_in_splitter(&self, point: Vec2, tolerance: f32) -> bool {
        self.hit_bounds(tolerance).contains(point)
    }
}

/// Move `delta` pixels from the right column to the left one without letting either drop
/// below `min`. The pair's total is preserved; if the pair is already below twice the
/// minimum the widths are returned unchanged.
pub fn redistribute_pair(left: f32, right: f32, delta: f32, min: f32) -> (f32, f32) {
    let total = left + right;
    if total < min * 2.0 {
        return (left, right);
    }
    let new_left = clamp_range(left + delta, min, total - min);
    (new_left, total - new_left)
}

/// An in-progress drag of an inter-column splitter.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSplitterDrag {
    pub key: SplitterKey,
    start_x: f32,
    /// Column widths of the row at press time, by column index.
    start_widths: Vec<f32>,
}

impl ColumnSplitterDrag {
    /// Capture the row's current column widths. Returns `None` if the splitter no longer
    /// matches the registry (for example the row was re-laid-out since it was drawn).
    pub fn begin(registry: &PanelRegistry, key: SplitterKey, pointer: Vec2) -> Option<Self> {
        let start_widths = row_column_widths(registry, key.side, key.row)?;
        if key.right_column() as usize >= start_widths.len() {
            return None;
        }
        Some(Self {
            key,
            start_x: pointer.x,
            start_widths,
        })
    }

    /// Apply the pointer's horizontal travel to the two adjacent columns and store the
    /// resulting proportions on every column of the row.
    pub fn update(&self, registry: &mut PanelRegistry, config: &DockConfig, pointer: Vec2) {
        let left = self.key.left_column as usize;
        let right = left + 1;
        let (new_left, new_right) = redistribute_pair(
            self.start_widths[left],
            self.start_widths[right],
            pointer.x - self.start_x,
            config.min_column_width,
        );
        let mut widths = self.start_widths.clone();
        widths[left] = new_left;
        widths[right] = new_right;
        apply_row_widths(registry, self.key.side, self.key.row, &widths);
    }

    /// Refresh locked widths from the laid-out geometry.
    pub fn finish(&self, registry: &mut PanelRegistry) {
        if let Some(widths) = row_column_widths(registry, self.key.side, self.key.row) {
            refresh_locks(registry, self.key.side, self.key.row, &widths);
        }
    }
}

/// Current displayed width of each column in a row, read from the head panel's rect.
fn row_column_widths(registry: &PanelRegistry, side: DockSide, row: u32) -> Option<Vec<f32>> {
    let panels = registry.docked_panels(side, None);
    let rows = group_by_row(&panels);
    let row = rows.iter().find(|r| r.row == row)?;
    let widths = group_by_column(row)
        .iter()
        .map(|c| c.head().map_or(0.0, |p| p.rect.width))
        .collect();
    Some(widths)
}

/// Write `width / row_total` as the ratio of every column; locked columns also take the
/// new width as their lock.
fn apply_row_widths(registry: &mut PanelRegistry, side: DockSide, row: u32, widths: &[f32]) {
    let total: f32 = widths.iter().sum();
    if total <= 0.0 {
        return;
    }
    for panel in registry.iter_mut().filter(|p| p.visible) {
        let Some(slot) = panel.placement.slot_mut() else {
            continue;
        };
        if slot.side != side || slot.row != row {
            continue;
        }
        let Some(&width) = widths.get(slot.column as usize) else {
            continue;
        };
        slot.width_ratio = Some(width / total);
        if slot.width_lock.is_some() {
            slot.width_lock = Some(width);
        }
    }
}

fn refresh_locks(registry: &mut PanelRegistry, side: DockSide, row: u32, widths: &[f32]) {
    for panel in registry.iter_mut().filter(|p| p.visible) {
        let Some(slot) = panel.placement.slot_mut() else {
            continue;
        };
        if slot.side == side
            && slot.row == row
            && slot.width_lock.is_some()
            && let Some(&width) = widths.get(slot.column as usize)
        {
            slot.width_lock = Some(width);
        }
    }
}
