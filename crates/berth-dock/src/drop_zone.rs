//! Drop zone detection for panels dragged over a dock.
//!
//! Each row is split into nested bands:
//! - the outer `vertical_insert_zone` fraction at its top and bottom always inserts a row,
//! - inside that, an empty gap under a short column accepts a sub-column drop,
//! - the inner `side_by_side_zone` band creates a new column next to an existing one,
//! - anything left over inserts a row above or below, split at the row midpoint.
//!
//! Side-by-side needs the deepest band and the dragged panel itself to pass the column
//! edge, so a slightly off-centre drop stays a vertical reorder.

use berth_core::geometry::{Rect, Size, fraction_within, in_leading_zone, in_trailing_zone};
use berth_core::math::Vec2;
use berth_core::profiling::profile_function;

use crate::config::DockConfig;
use crate::layout::{ColumnGeometry, DockGeometry, RowGeometry, compute_dock_geometry};
use crate::panel::PanelId;
use crate::registry::PanelRegistry;
use crate::types::{DockSide, DropType};

/// Where a dragged panel would land if released now.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub side: DockSide,
    pub drop_type: DropType,
    /// Index into the dock's rows (equal to the row number after layout).
    pub row_index: usize,
    /// Sub-row the panel would take within the target column.
    pub position_in_column: u32,
    /// Reference panel for side-by-side and sub-column drops.
    pub target: Option<PanelId>,
}

impl DropTarget {
    pub fn new(side: DockSide, drop_type: DropType, row_index: usize) -> Self {
        Self {
            side,
            drop_type,
            row_index,
            position_in_column: 0,
            target: None,
        }
    }

    pub fn with_target(mut self, target: PanelId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_position(mut self, position_in_column: u32) -> Self {
        self.position_in_column = position_in_column;
        self
    }

    fn for_row(side: DockSide, drop_type: DropType, row_index: usize, row: &RowGeometry) -> Self {
        let target = Self::new(side, drop_type, row_index);
        match row.head_panel() {
            Some(head) => target.with_target(head.id.clone()),
            None => target,
        }
    }

    fn for_column(
        side: DockSide,
        drop_type: DropType,
        row_index: usize,
        column: &ColumnGeometry,
    ) -> Self {
        let target = Self::new(side, drop_type, row_index);
        match column.head() {
            Some(head) => target.with_target(head.id.clone()),
            None => target,
        }
    }
}

/// Classifies pointer positions against a dock's computed geometry. Holds no state
/// besides its thresholds.
#[derive(Debug, Clone)]
pub struct DropZoneDetector {
    pub vertical_insert_zone: f32,
    pub side_by_side_zone: f32,
    pub side_by_side_offset: f32,
    pub row_buffer: f32,
    pub min_panel_height: f32,
    pub preview_thickness: f32,
}

impl Default for DropZoneDetector {
    fn default() -> Self {
        Self::from_config(&DockConfig::default())
    }
}

impl DropZoneDetector {
    pub fn from_config(config: &DockConfig) -> Self {
        Self {
            vertical_insert_zone: config.vertical_insert_zone,
            side_by_side_zone: config.side_by_side_zone,
            side_by_side_offset: config.side_by_side_offset,
            row_buffer: config.row_buffer,
            min_panel_height: config.min_panel_height,
            preview_thickness: config.preview_thickness,
        }
    }

    /// Classify `pointer` against `geometry`. `dragged_left_x`/`dragged_right_x` are the
    /// horizontal edges of the dragged panel.
    ///
    /// A row owns its own top edge, so a pointer exactly on a shared boundary resolves to
    /// Above the lower row. A pointer outside every row's buffer snaps to the row with the
    /// nearest midpoint: Above when it is higher than that midpoint, Below otherwise.
    pub fn detect(
        &self,
        geometry: &DockGeometry,
        pointer: Vec2,
        dragged_left_x: f32,
        dragged_right_x: f32,
    ) -> DropTarget {
        let side = geometry.side;
        let rows = &geometry.rows;
        if rows.is_empty() {
            return DropTarget::new(side, DropType::Above, 0);
        }

        for (index, row) in rows.iter().enumerate() {
            if rows.get(index + 1).is_some_and(|next| pointer.y >= next.top) {
                continue;
            }
            let reach_top = row.top - self.row_buffer;
            let reach_bottom = row.bottom() + self.row_buffer;
            if pointer.y >= reach_top && pointer.y <= reach_bottom {
                return self.classify_in_row(side, index, row, pointer, dragged_left_x, dragged_right_x);
            }
        }

        // Between or beyond rows: snap to the nearest row by midpoint.
        let nearest = rows.iter().enumerate().min_by(|(_, a), (_, b)| {
            (pointer.y - a.mid())
                .abs()
                .total_cmp(&(pointer.y - b.mid()).abs())
        });
        let Some((index, row)) = nearest else {
            return DropTarget::new(side, DropType::Above, 0);
        };
        let drop_type = if pointer.y < row.mid() {
            DropType::Above
        } else {
            DropType::Below
        };
        DropTarget::for_row(side, drop_type, index, row)
    }

    fn classify_in_row(
        &self,
        side: DockSide,
        index: usize,
        row: &RowGeometry,
        pointer: Vec2,
        dragged_left_x: f32,
        dragged_right_x: f32,
    ) -> DropTarget {
        if in_leading_zone(pointer.y, row.top, row.height, self.vertical_insert_zone) {
            return DropTarget::for_row(side, DropType::Above, index, row);
        }
        if in_trailing_zone(pointer.y, row.top, row.height, self.vertical_insert_zone) {
            return DropTarget::for_row(side, DropType::Below, index, row);
        }

        if let Some(target) = self.subcolumn_gap(side, index, row, pointer) {
            return target;
        }

        let rel = fraction_within(pointer.y, row.top, row.height);
        if rel >= self.side_by_side_zone
            && rel <= 1.0 - self.side_by_side_zone
            && let Some(target) =
                self.side_by_side(side, index, row, pointer, dragged_left_x, dragged_right_x)
        {
            return target;
        }

        let drop_type = if pointer.y < row.mid() {
            DropType::Above
        } else {
            DropType::Below
        };
        DropTarget::for_row(side, drop_type, index, row)
    }

    /// Pointer over the empty space below a column that is shorter than its row.
    fn subcolumn_gap(
        &self,
        side: DockSide,
        index: usize,
        row: &RowGeometry,
        pointer: Vec2,
    ) -> Option<DropTarget> {
        if row.columns.len() < 2 {
            return None;
        }
        row.columns.iter().find_map(|column| {
            let gap = row.height - column.stacked_height;
            let gap_top = row.top + column.stacked_height;
            let over_gap = pointer.x >= column.x
                && pointer.x <= column.right()
                && pointer.y >= gap_top
                && pointer.y <= row.bottom();
            if gap < self.min_panel_height || !over_gap {
                return None;
            }
            let tail = column.tail()?;
            Some(
                DropTarget::new(side, DropType::Subcolumn, index)
                    .with_target(tail.id.clone())
                    .with_position(tail.sub_row + 1),
            )
        })
    }

    /// Column-edge proximity test for new columns.
    fn side_by_side(
        &self,
        side: DockSide,
        index: usize,
        row: &RowGeometry,
        pointer: Vec2,
        dragged_left_x: f32,
        dragged_right_x: f32,
    ) -> Option<DropTarget> {
        let columns = &row.columns;
        let first = columns.first()?;
        let last = columns.last()?;
        let offset = self.side_by_side_offset;

        for pair in columns.windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            let boundary = (left.right() + right.x) * 0.5;
            let near = pointer.x >= left.center_x() && pointer.x <= right.center_x();
            if near && dragged_left_x <= boundary - offset && dragged_right_x >= boundary + offset {
                return Some(DropTarget::for_column(side, DropType::Between, index, left));
            }
        }

        if pointer.x <= first.center_x() && dragged_left_x <= first.center_x() - offset {
            return Some(DropTarget::for_column(side, DropType::Left, index, first));
        }
        if pointer.x >= last.center_x() && dragged_right_x >= last.center_x() + offset {
            return Some(DropTarget::for_column(side, DropType::Right, index, last));
        }
        None
    }

    /// Rectangle for the host's drop indicator.
    pub fn preview_bounds(&self, target: &DropTarget, geometry: &DockGeometry) -> Rect {
        let t = self.preview_thickness;
        let content = geometry.content;
        let Some(row) = geometry.rows.get(target.row_index) else {
            return Rect::new(content.x, content.y, content.width, t);
        };
        let column_of_target = || {
            target.target.as_ref().and_then(|id| {
                row.columns
                    .iter()
                    .position(|c| c.panels.iter().any(|p| &p.id == id))
            })
        };
        let bar = |x: f32| Rect::new(x - t * 0.5, row.top, t, row.height);

        match target.drop_type {
            DropType::Above => Rect::new(content.x, row.top - t * 0.5, content.width, t),
            DropType::Below => Rect::new(content.x, row.bottom() - t * 0.5, content.width, t),
            DropType::Left => bar(row.columns.first().map_or(content.x, |c| c.x)),
            DropType::Right => bar(row.columns.last().map_or(content.right(), |c| c.right())),
            DropType::Between => match column_of_target() {
                Some(i) if i + 1 < row.columns.len() => {
                    bar((row.columns[i].right() + row.columns[i + 1].x) * 0.5)
                }
                _ => bar(row.columns.last().map_or(content.right(), |c| c.right())),
            },
            DropType::Subcolumn => match column_of_target() {
                Some(i) => {
                    let column = &row.columns[i];
                    Rect::new(
                        column.x,
                        row.top + column.stacked_height,
                        column.width,
                        (row.height - column.stacked_height).max(t),
                    )
                }
                None => Rect::new(content.x, row.bottom() - t * 0.5, content.width, t),
            },
        }
    }
}

/// Geometry of `side` as it would be laid out without `exclude`.
pub fn dock_geometry_excluding(
    registry: &PanelRegistry,
    config: &DockConfig,
    viewport: Size,
    side: DockSide,
    exclude: Option<&PanelId>,
) -> DockGeometry {
    let content = registry.dock(side).content_rect(viewport, config);
    let panels = registry.docked_panels(side, exclude);
    compute_dock_geometry(side, &panels, content, config)
}

/// Classify a drop on `side`. Pure: the registry is only read.
#[allow(clippy::too_many_arguments)]
pub fn detect_drop_position(
    registry: &PanelRegistry,
    config: &DockConfig,
    viewport: Size,
    side: DockSide,
    pointer: Vec2,
    exclude: Option<&PanelId>,
    dragged_left_x: f32,
    dragged_right_x: f32,
) -> DropTarget {
    profile_function!();
    let geometry = dock_geometry_excluding(registry, config, viewport, side, exclude);
    let target = DropZoneDetector::from_config(config).detect(
        &geometry,
        pointer,
        dragged_left_x,
        dragged_right_x,
    );
    tracing::trace!(
        "Drop on {} at ({}, {}): {:?} row {}",
        side,
        pointer.x,
        pointer.y,
        target.drop_type,
        target.row_index
    );
    target
}

/// Dock the dragged rectangle is over, if any.
///
/// Probes the panel's centre, then its left edge, then its right edge (all at its vertical
/// centre) against each visible dock grown by `dock_hit_margin`, so a fast drag across a
/// narrow dock still registers.
pub fn hovered_dock(
    registry: &PanelRegistry,
    config: &DockConfig,
    viewport: Size,
    dragged: Rect,
) -> Option<DockSide> {
    let probes = [dragged.center_x(), dragged.x, dragged.right()];
    let y = dragged.center_y();
    probes.iter().find_map(|&x| {
        DockSide::ALL.into_iter().find(|&side| {
            let dock = registry.dock(side);
            dock.visible
                && dock
                    .bounds(viewport, config)
                    .expand(config.dock_hit_margin)
                    .contains(Vec2::new(x, y))
        })
    })
}
