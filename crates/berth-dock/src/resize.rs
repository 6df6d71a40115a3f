//! Pointer-driven resizing: dock width, docked panel height and floating panel edges.
//!
//! Each controller remembers where the press started and recomputes from those start
//! metrics on every move, so the result depends only on the current pointer position.

use berth_core::geometry::{Rect, Size};
use berth_core::math::{Vec2, at_least, clamp_range};

use crate::config::DockConfig;
use crate::group::{group_by_column, group_by_row};
use crate::panel::PanelId;
use crate::registry::PanelRegistry;
use crate::splitter::ColumnSplitterDrag;
use crate::types::{DockSide, ResizeEdges};

/// Drag of the handle between a dock and the main window.
#[derive(Debug, Clone, PartialEq)]
pub struct DockWidthDrag {
    pub side: DockSide,
    start_x: f32,
    start_width: f32,
}

impl DockWidthDrag {
    pub fn begin(registry: &PanelRegistry, side: DockSide, pointer: Vec2) -> Self {
        Self {
            side,
            start_x: pointer.x,
            start_width: registry.dock(side).width,
        }
    }

    /// Width for the current pointer. The left dock grows rightwards, the right dock
    /// leftwards.
    pub fn width_at(&self, config: &DockConfig, pointer: Vec2) -> f32 {
        let dx = pointer.x - self.start_x;
        let width = match self.side {
            DockSide::Left => self.start_width + dx,
            DockSide::Right => self.start_width - dx,
        };
        config.clamp_dock_width(width)
    }

    pub fn update(&self, registry: &mut PanelRegistry, config: &DockConfig, pointer: Vec2) {
        registry.dock_mut(self.side).width = self.width_at(config, pointer);
    }
}

/// Drag of a panel's resize edge or corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelResizeDrag {
    pub panel: PanelId,
    pub edges: ResizeEdges,
    start: Vec2,
    start_rect: Rect,
}

impl PanelResizeDrag {
    /// Returns `None` for unknown panels and for docked panels grabbed anywhere but their
    /// bottom edge.
    pub fn begin(
        registry: &PanelRegistry,
        panel: &PanelId,
        edges: ResizeEdges,
        pointer: Vec2,
    ) -> Option<Self> {
        let current = registry.get(panel)?;
        if current.is_docked() && !edges.contains(ResizeEdges::BOTTOM) {
            return None;
        }
        if edges.is_empty() {
            return None;
        }
        Some(Self {
            panel: panel.clone(),
            edges,
            start: pointer,
            start_rect: current.rect,
        })
    }

    /// Apply the drag. Returns the dock to re-lay-out when the panel is docked; floating
    /// panels get their rect updated directly.
    pub fn update(
        &self,
        registry: &mut PanelRegistry,
        config: &DockConfig,
        viewport: Size,
        pointer: Vec2,
    ) -> Option<DockSide> {
        let delta = pointer - self.start;
        let Some(side) = registry.get(&self.panel)?.side() else {
            let rect = self.floating_rect(config, delta);
            let panel = registry.get_mut(&self.panel)?;
            panel.rect = rect;
            panel.height = rect.height;
            return None;
        };

        let content = registry.dock(side).content_rect(viewport, config);
        let max_height = content.bottom() - self.start_rect.y;
        let proposed = clamp_range(
            self.start_rect.height + delta.y,
            config.min_panel_height,
            max_height,
        );
        let height = clamp_range(
            snap_panel_height(registry, config, &self.panel, proposed),
            config.min_panel_height,
            max_height,
        );

        let panel = registry.get_mut(&self.panel)?;
        panel.height = height;
        if let Some(slot) = panel.placement.slot_mut()
            && slot.fill
        {
            slot.fill = false;
            tracing::debug!("Resizing '{}' turned fill off", self.panel);
        }
        Some(side)
    }

    fn floating_rect(&self, config: &DockConfig, delta: Vec2) -> Rect {
        let start = self.start_rect;
        let min_width = config.min_column_width;
        let min_height = config.min_panel_height;
        let mut rect = start;

        if self.edges.contains(ResizeEdges::LEFT) {
            rect.width = at_least(start.width - delta.x, min_width);
            rect.x = start.right() - rect.width;
        } else if self.edges.contains(ResizeEdges::RIGHT) {
            rect.width = at_least(start.width + delta.x, min_width);
        }

        if self.edges.contains(ResizeEdges::TOP) {
            let top = (start.y + delta.y).max(config.header_height);
            rect.height = at_least(start.bottom() - top, min_height);
            rect.y = start.bottom() - rect.height;
        } else if self.edges.contains(ResizeEdges::BOTTOM) {
            rect.height = at_least(start.height + delta.y, min_height);
        }
        rect
    }
}

/// Snap a docked panel's proposed height so its column lines up with a neighbour.
///
/// First the column's total height is compared with every other column of the row; failing
/// that, the panel's bottom edge is compared with the bottom edges of panels in the other
/// columns. Either match within `snap_threshold` wins.
pub fn snap_panel_height(
    registry: &PanelRegistry,
    config: &DockConfig,
    id: &PanelId,
    proposed: f32,
) -> f32 {
    let Some(panel) = registry.get(id) else {
        return proposed;
    };
    let Some(slot) = panel.slot() else {
        return proposed;
    };
    let threshold = config.snap_threshold;

    let docked = registry.docked_panels(slot.side, None);
    let rows = group_by_row(&docked);
    let Some(row) = rows.iter().find(|r| r.row == slot.row) else {
        return proposed;
    };
    let columns = group_by_column(row);

    let own_total: f32 = columns
        .iter()
        .filter(|c| c.column == slot.column)
        .flat_map(|c| c.panels.iter())
        .map(|p| if &p.id == id { proposed } else { p.rect.height })
        .sum();

    let others = columns.iter().filter(|c| c.column != slot.column);
    for column in others.clone() {
        let total: f32 = column.panels.iter().map(|p| p.rect.height).sum();
        if (own_total - total).abs() <= threshold {
            return proposed + (total - own_total);
        }
    }

    let bottom = panel.rect.y + proposed;
    for other in others.flat_map(|c| c.panels.iter()) {
        if (bottom - other.rect.bottom()).abs() <= threshold {
            return other.rect.bottom() - panel.rect.y;
        }
    }
    proposed
}

/// The single resize slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeSession {
    DockWidth(DockWidthDrag),
    Column(ColumnSplitterDrag),
    Panel(PanelResizeDrag),
}

impl ResizeSession {
    /// Apply a pointer move; returns the dock that needs a layout pass, if any.
    pub fn apply(
        &self,
        registry: &mut PanelRegistry,
        config: &DockConfig,
        viewport: Size,
        pointer: Vec2,
    ) -> Option<DockSide> {
        match self {
            ResizeSession::DockWidth(drag) => {
                drag.update(registry, config, pointer);
                Some(drag.side)
            }
            ResizeSession::Column(drag) => {
                drag.update(registry, config, pointer);
                Some(drag.key.side)
            }
            ResizeSession::Panel(drag) => drag.update(registry, config, viewport, pointer),
        }
    }

    /// Final bookkeeping after the last layout pass of the drag.
    pub fn finish(&self, registry: &mut PanelRegistry) {
        if let ResizeSession::Column(drag) = self {
            drag.finish(registry);
        }
    }
}
