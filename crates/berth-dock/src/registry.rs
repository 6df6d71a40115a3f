//! The panel registry: every live panel plus the two docks and their derived splitters.

use berth_core::alloc::HashMap;
use berth_core::geometry::{Rect, Size};
use indexmap::IndexMap;

use crate::config::DockConfig;
use crate::error::{DockError, DockResult};
use crate::panel::{Panel, PanelId};
use crate::splitter::Splitter;
use crate::types::{DockSide, SplitterKey};

/// One of the fixed side containers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dock {
    pub side: DockSide,
    /// Total width including the dock splitter handle.
    pub width: f32,
    pub visible: bool,
}

impl Dock {
    pub fn new(side: DockSide, width: f32) -> Self {
        Self {
            side,
            width,
            visible: true,
        }
    }

    /// Full dock bounds below the header.
    pub fn bounds(&self, viewport: Size, config: &DockConfig) -> Rect {
        let x = match self.side {
            DockSide::Left => 0.0,
            DockSide::Right => viewport.width - self.width,
        };
        let top = config.header_height;
        Rect::new(x, top, self.width, (viewport.height - top).max(0.0))
    }

    /// Strip on the inner edge used to drag the dock width.
    pub fn handle_rect(&self, viewport: Size, config: &DockConfig) -> Rect {
        let bounds = self.bounds(viewport, config);
        let w = config.dock_splitter_width.min(bounds.width);
        let x = match self.side {
            DockSide::Left => bounds.right() - w,
            DockSide::Right => bounds.x,
        };
        Rect::new(x, bounds.y, w, bounds.height)
    }

    /// Area panels are laid out in: bounds minus the handle strip and padding.
    pub fn content_rect(&self, viewport: Size, config: &DockConfig) -> Rect {
        let bounds = self.bounds(viewport, config);
        let handle = config.dock_splitter_width.min(bounds.width);
        let x = match self.side {
            DockSide::Left => bounds.x,
            DockSide::Right => bounds.x + handle,
        };
        Rect::new(x, bounds.y, bounds.width - handle, bounds.height).inset(config.dock_padding)
    }
}

/// Owned collection of panels and docks.
///
/// Panels are kept in registration order so snapshots and iteration are stable.
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    panels: IndexMap<PanelId, Panel>,
    left: Dock,
    right: Dock,
    splitters: HashMap<SplitterKey, Splitter>,
}

impl PanelRegistry {
    pub fn new(config: &DockConfig) -> Self {
        Self {
            panels: IndexMap::new(),
            left: Dock::new(DockSide::Left, config.default_dock_width),
            right: Dock::new(DockSide::Right, config.default_dock_width),
            splitters: HashMap::new(),
        }
    }

    pub fn insert(&mut self, panel: Panel) -> DockResult<()> {
        if self.panels.contains_key(&panel.id) {
            return Err(DockError::DuplicatePanel(panel.id));
        }
        self.panels.insert(panel.id.clone(), panel);
        Ok(())
    }

    /// Remove a panel. Its slot is reclaimed when the side is next laid out.
    pub fn remove(&mut self, id: &PanelId) -> Option<Panel> {
        self.panels.shift_remove(id)
    }

    pub fn get(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn get_mut(&mut self, id: &PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(id)
    }

    /// Like [`PanelRegistry::get`] but returns a `PanelNotFound` error.
    pub fn require(&self, id: &PanelId) -> DockResult<&Panel> {
        self.panels
            .get(id)
            .ok_or_else(|| DockError::PanelNotFound(id.clone()))
    }

    pub fn require_mut(&mut self, id: &PanelId) -> DockResult<&mut Panel> {
        self.panels
            .get_mut(id)
            .ok_or_else(|| DockError::PanelNotFound(id.clone()))
    }

    pub fn contains(&self, id: &PanelId) -> bool {
        self.panels.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Panel> {
        self.panels.values_mut()
    }

    pub fn dock(&self, side: DockSide) -> &Dock {
        match side {
            DockSide::Left => &self.left,
            DockSide::Right => &self.right,
        }
    }

    pub fn dock_mut(&mut self, side: DockSide) -> &mut Dock {
        match side {
            DockSide::Left => &mut self.left,
            DockSide::Right => &mut self.right,
        }
    }

    /// Visible panels docked on `side`, minus `exclude`, ordered by `(row, column, sub_row)`.
    pub fn docked_panels(&self, side: DockSide, exclude: Option<&PanelId>) -> Vec<&Panel> {
        let mut panels: Vec<&Panel> = self
            .panels
            .values()
            .filter(|p| p.visible && p.is_docked_on(side))
            .filter(|p| exclude != Some(&p.id))
            .collect();
        panels.sort_by_key(|p| p.slot().map(|s| s.order_key()));
        panels
    }

    /// Ids of every panel docked on `side`, hidden ones included.
    pub fn docked_ids(&self, side: DockSide) -> Vec<PanelId> {
        self.panels
            .values()
            .filter(|p| p.is_docked_on(side))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Row number one past the last row on `side`, counting hidden docked panels too.
    pub fn next_row(&self, side: DockSide) -> u32 {
        self.panels
            .values()
            .filter_map(|p| p.slot().filter(|s| s.side == side))
            .map(|s| s.row + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn splitter(&self, key: &SplitterKey) -> Option<&Splitter> {
        self.splitters.get(key)
    }

    /// Splitters on `side`, sorted by row then column.
    pub fn splitters(&self, side: DockSide) -> Vec<&Splitter> {
        let mut splitters: Vec<&Splitter> = self
            .splitters
            .values()
            .filter(|s| s.key.side == side)
            .collect();
        splitters.sort_by_key(|s| s.key);
        splitters
    }

    /// Drop every splitter on `side` and install `splitters` in their place.
    pub fn replace_splitters(&mut self, side: DockSide, splitters: Vec<Splitter>) {
        self.splitters.retain(|key, _| key.side != side);
        for splitter in splitters {
            debug_assert_eq!(splitter.key.side, side);
            self.splitters.insert(splitter.key, splitter);
        }
    }
}
