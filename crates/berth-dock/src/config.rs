//! Tunable thresholds and sizes for layout, drop detection and resizing.

use serde::{Deserialize, Serialize};

/// Default drag threshold in pixels before a press turns into a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 5.0;

/// Default minimum panel height in pixels.
pub const DEFAULT_MIN_PANEL_HEIGHT: f32 = 50.0;

/// Default width of an inter-column splitter in pixels.
pub const DEFAULT_SPLITTER_WIDTH: f32 = 4.0;

/// Centralized tuning for the docking engine.
///
/// The zone fractions and offsets are policy rather than contract: hosts are expected to
/// adjust them to their font size and pointer precision. Missing fields fall back to the
/// defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Pointer travel (per axis) before a press becomes a drag.
    pub drag_threshold: f32,
    /// Fraction of a row's height at its top and bottom that always means "insert a row".
    pub vertical_insert_zone: f32,
    /// Fraction trimmed from the top and bottom of a row to form the side-by-side band.
    pub side_by_side_zone: f32,
    /// How far the dragged panel must pass a column midpoint or boundary for a
    /// side-by-side drop.
    pub side_by_side_offset: f32,
    /// Extra pixels above and below a row that still count as hitting it.
    pub row_buffer: f32,
    /// Extra pixels around a dock that still count as hovering it during a drag.
    pub dock_hit_margin: f32,
    /// Floor for any docked or floating panel height.
    pub min_panel_height: f32,
    /// Floor for any column width and floating panel width.
    pub min_column_width: f32,
    /// Width of inter-column splitters.
    pub splitter_width: f32,
    /// Width of the handle between a dock and the main window.
    pub dock_splitter_width: f32,
    /// Distance within which a resized panel snaps to a neighbouring boundary.
    pub snap_threshold: f32,
    pub min_dock_width: f32,
    pub max_dock_width: f32,
    pub default_dock_width: f32,
    /// Height of the fixed chrome above the docks; nothing is placed above it.
    pub header_height: f32,
    /// Inset between a dock's bounds and its panels.
    pub dock_padding: f32,
    /// Height given to a panel registered without one.
    pub default_panel_height: f32,
    /// Thickness of the host's drop indicator bar.
    pub preview_thickness: f32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            vertical_insert_zone: 0.10,
            side_by_side_zone: 0.25,
            side_by_side_offset: 20.0,
            row_buffer: 10.0,
            dock_hit_margin: 50.0,
            min_panel_height: DEFAULT_MIN_PANEL_HEIGHT,
            min_column_width: 50.0,
            splitter_width: DEFAULT_SPLITTER_WIDTH,
            dock_splitter_width: 4.0,
            snap_threshold: 10.0,
            min_dock_width: 100.0,
            max_dock_width: 800.0,
            default_dock_width: 300.0,
            header_height: 0.0,
            dock_padding: 0.0,
            default_panel_height: 200.0,
            preview_thickness: 4.0,
        }
    }
}

impl DockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drag threshold.
    pub fn drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold.max(0.0);
        self
    }

    /// Set the row-insert and side-by-side zone fractions.
    pub fn zones(mut self, vertical_insert: f32, side_by_side: f32) -> Self {
        self.vertical_insert_zone = vertical_insert.clamp(0.0, 0.5);
        self.side_by_side_zone = side_by_side.clamp(0.0, 0.5);
        self
    }

    /// Set the side-by-side edge offset.
    pub fn side_by_side_offset(mut self, offset: f32) -> Self {
        self.side_by_side_offset = offset.max(0.0);
        self
    }

    /// Set the splitter width.
    pub fn splitter_width(mut self, width: f32) -> Self {
        self.splitter_width = width.max(0.0);
        self
    }

    /// Set the minimum panel height and column width.
    pub fn min_panel_size(mut self, width: f32, height: f32) -> Self {
        self.min_column_width = width.max(1.0);
        self.min_panel_height = height.max(1.0);
        self
    }

    /// Set the snap threshold for vertical resizing.
    pub fn snap_threshold(mut self, threshold: f32) -> Self {
        self.snap_threshold = threshold.max(0.0);
        self
    }

    /// Set the dock width limits and the width new docks start with.
    pub fn dock_widths(mut self, min: f32, default: f32, max: f32) -> Self {
        self.min_dock_width = min;
        self.max_dock_width = max.max(min);
        self.default_dock_width = default.clamp(self.min_dock_width, self.max_dock_width);
        self
    }

    /// Set the header height above the docks.
    pub fn header_height(mut self, height: f32) -> Self {
        self.header_height = height.max(0.0);
        self
    }

    /// Set the dock padding.
    pub fn dock_padding(mut self, padding: f32) -> Self {
        self.dock_padding = padding.max(0.0);
        self
    }

    /// Clamp a requested dock width to the configured limits.
    pub fn clamp_dock_width(&self, width: f32) -> f32 {
        berth_core::math::clamp_range(width, self.min_dock_width, self.max_dock_width)
    }
}
