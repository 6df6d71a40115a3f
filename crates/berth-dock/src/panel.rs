//! Panels and their placement state.

use berth_core::geometry::Rect;
use serde::{Deserialize, Serialize};

use crate::error::{DockError, DockResult};
use crate::types::DockSide;

/// Stable, non-empty panel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PanelId(String);

impl PanelId {
    /// Validate and wrap an identifier. Blank ids are rejected.
    pub fn new(id: impl Into<String>) -> DockResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DockError::InvalidPanelId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PanelId {
    type Error = DockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PanelId::new(value)
    }
}

impl From<PanelId> for String {
    fn from(id: PanelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a docked panel: dock side, row, column within the row, and stack position
/// within the column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockSlot {
    pub side: DockSide,
    pub row: u32,
    pub column: u32,
    pub sub_row: u32,
    /// Share of the row width for this column. Only read from a column's first panel.
    pub width_ratio: Option<f32>,
    /// Fixed column width; `Some` means the column is locked.
    pub width_lock: Option<f32>,
    /// Expand to the remaining dock height instead of using the stored height.
    pub fill: bool,
}

impl DockSlot {
    pub fn new(side: DockSide, row: u32, column: u32, sub_row: u32) -> Self {
        Self {
            side,
            row,
            column,
            sub_row,
            width_ratio: None,
            width_lock: None,
            fill: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.width_lock.is_some()
    }

    /// Sort key used everywhere panels are ordered within a dock.
    pub fn order_key(&self) -> (u32, u32, u32) {
        (self.row, self.column, self.sub_row)
    }

    /// Drop every sizing mode, keeping only the position.
    pub fn without_sizing(mut self) -> Self {
        self.width_ratio = None;
        self.width_lock = None;
        self.fill = false;
        self
    }
}

/// Floating or docked. Sizing modes live on [`DockSlot`], so a floating panel can never be
/// marked fill or width-locked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Placement {
    #[default]
    Floating,
    Docked(DockSlot),
}

impl Placement {
    pub fn slot(&self) -> Option<&DockSlot> {
        match self {
            Placement::Docked(slot) => Some(slot),
            Placement::Floating => None,
        }
    }

    pub fn slot_mut(&mut self) -> Option<&mut DockSlot> {
        match self {
            Placement::Docked(slot) => Some(slot),
            Placement::Floating => None,
        }
    }

    pub fn side(&self) -> Option<DockSide> {
        self.slot().map(|slot| slot.side)
    }

    pub fn is_docked(&self) -> bool {
        matches!(self, Placement::Docked(_))
    }
}

/// Tab bookkeeping for tabbed panels. The layout engine never looks inside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabSet {
    tabs: Vec<String>,
    active: Option<usize>,
}

impl TabSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tab, returning its index. The first tab becomes active.
    pub fn add_tab(&mut self, label: impl Into<String>) -> usize {
        self.tabs.push(label.into());
        let index = self.tabs.len() - 1;
        if self.active.is_none() {
            self.active = Some(index);
        }
        index
    }

    /// Builder form of [`TabSet::add_tab`].
    pub fn tab(mut self, label: impl Into<String>) -> Self {
        self.add_tab(label);
        self
    }

    /// Remove a tab. The active index shifts to keep pointing at the same tab, or to its
    /// neighbour when the active tab itself was removed.
    pub fn remove_tab(&mut self, index: usize) -> Option<String> {
        if index >= self.tabs.len() {
            return None;
        }
        let label = self.tabs.remove(index);
        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
        Some(label)
    }

    /// Make a tab active. Returns false for out-of-range indices.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active.and_then(|i| self.tabs.get(i)).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

/// Plain or tabbed. Both are laid out identically.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelKind {
    #[default]
    Plain,
    Tabbed(TabSet),
}

/// A placeable unit tracked by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: PanelId,
    pub kind: PanelKind,
    pub placement: Placement,
    /// Current screen geometry, written by layout and drag code.
    pub rect: Rect,
    /// Stored height. A fill panel is displayed taller, but this value is what it returns
    /// to when fill is cleared.
    pub height: f32,
    pub visible: bool,
    /// Slot remembered while this panel's sidebar is hidden.
    pub original_dock: Option<DockSlot>,
}

impl Panel {
    pub fn new(id: PanelId, rect: Rect) -> Self {
        Self {
            id,
            kind: PanelKind::Plain,
            placement: Placement::Floating,
            height: rect.height,
            rect,
            visible: true,
            original_dock: None,
        }
    }

    pub fn slot(&self) -> Option<&DockSlot> {
        self.placement.slot()
    }

    pub fn side(&self) -> Option<DockSide> {
        self.placement.side()
    }

    pub fn is_docked(&self) -> bool {
        self.placement.is_docked()
    }

    pub fn is_docked_on(&self, side: DockSide) -> bool {
        self.side() == Some(side)
    }

    pub fn is_fill(&self) -> bool {
        self.slot().is_some_and(|slot| slot.fill)
    }

    pub fn is_tabbed(&self) -> bool {
        matches!(self.kind, PanelKind::Tabbed(_))
    }

    pub fn tabs_mut(&mut self) -> Option<&mut TabSet> {
        match &mut self.kind {
            PanelKind::Tabbed(tabs) => Some(tabs),
            PanelKind::Plain => None,
        }
    }
}
