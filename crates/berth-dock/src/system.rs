//! The docking system: owns the registry, routes host pointer events through the drag and
//! resize controllers, and pushes results back to the host.

use berth_core::geometry::{Rect, Size};
use berth_core::math::{Vec2, at_least, clamp_range};
use berth_core::profiling::profile_function;

use crate::commit::{commit_placement, vacate};
use crate::config::DockConfig;
use crate::drag::{DragInput, DragManager, DragPhase, DragSession, DragTransition, PressState};
use crate::drop_zone::{DropTarget, DropZoneDetector, dock_geometry_excluding, hovered_dock};
use crate::error::{DockError, DockResult};
use crate::group::{group_by_column, group_by_row};
use crate::host::{DropPreview, Host, place_element, with_element};
use crate::layout::{DockGeometry, layout_dock};
use crate::panel::{DockSlot, Panel, PanelId, PanelKind, Placement, TabSet};
use crate::persist::{LayoutSnapshot, LayoutStore};
use crate::registry::PanelRegistry;
use crate::resize::{DockWidthDrag, PanelResizeDrag, ResizeSession};
use crate::splitter::ColumnSplitterDrag;
use crate::types::{DockSide, ElementId};

/// Description of a panel to register.
#[derive(Debug, Clone)]
pub struct PanelSpec {
    id: PanelId,
    kind: PanelKind,
    rect: Option<Rect>,
    side: Option<DockSide>,
    height: Option<f32>,
    visible: bool,
}

impl PanelSpec {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            kind: PanelKind::Plain,
            rect: None,
            side: None,
            height: None,
            visible: true,
        }
    }

    /// Start floating at `rect`.
    pub fn floating(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self.side = None;
        self
    }

    /// Append as a new last row on `side`.
    pub fn docked(mut self, side: DockSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Preferred height while docked.
    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn tabbed(mut self, tabs: TabSet) -> Self {
        self.kind = PanelKind::Tabbed(tabs);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Dock layout and drag-and-drop engine bound to a host canvas and a layout store.
///
/// Every entry point takes `&mut self`, so a layout pass can never be re-entered from a
/// host callback.
pub struct DockSystem<H: Host, S: LayoutStore> {
    registry: PanelRegistry,
    config: DockConfig,
    host: H,
    store: S,
    drag: DragManager,
    resize: Option<ResizeSession>,
    viewport: Size,
}

impl<H: Host, S: LayoutStore> DockSystem<H, S> {
    pub fn new(config: DockConfig, host: H, store: S) -> Self {
        let viewport = host.viewport_size();
        Self {
            registry: PanelRegistry::new(&config),
            drag: DragManager::new(config.drag_threshold),
            config,
            host,
            store,
            resize: None,
            viewport,
        }
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn panel(&self, id: &PanelId) -> Option<&Panel> {
        self.registry.get(id)
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn drag(&self) -> &DragManager {
        &self.drag
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    pub fn layout_dock(&mut self, side: DockSide) -> DockGeometry {
        layout_dock(
            &mut self.registry,
            &mut self.host,
            &self.config,
            self.viewport,
            side,
        )
    }

    pub fn layout_all(&mut self) {
        for side in DockSide::ALL {
            self.layout_dock(side);
        }
    }

    /// Where a panel would land on `side` for the given pointer, without changing anything.
    pub fn detect_drop_position(
        &self,
        side: DockSide,
        pointer: Vec2,
        exclude: Option<&PanelId>,
        dragged_left_x: f32,
        dragged_right_x: f32,
    ) -> DropTarget {
        crate::drop_zone::detect_drop_position(
            &self.registry,
            &self.config,
            self.viewport,
            side,
            pointer,
            exclude,
            dragged_left_x,
            dragged_right_x,
        )
    }

    // ------------------------------------------------------------------
    // Panel API
    // ------------------------------------------------------------------

    pub fn register(&mut self, spec: PanelSpec) -> DockResult<()> {
        let rect = spec.rect.unwrap_or_else(|| {
            Rect::new(
                0.0,
                self.config.header_height,
                self.config.default_dock_width,
                self.config.default_panel_height,
            )
        });
        let mut panel = Panel::new(spec.id.clone(), rect);
        panel.kind = spec.kind;
        panel.visible = spec.visible;
        if let Some(side) = spec.side {
            panel.height = at_least(
                spec.height.unwrap_or(self.config.default_panel_height),
                self.config.min_panel_height,
            );
            let slot = DockSlot::new(side, self.registry.next_row(side), 0, 0);
            if self.registry.dock(side).visible {
                panel.placement = Placement::Docked(slot);
            } else {
                panel.original_dock = Some(slot);
                panel.visible = false;
            }
        } else if let Some(height) = spec.height {
            panel.height = at_least(height, self.config.min_panel_height);
        }

        let side = panel.side();
        self.registry.insert(panel)?;
        tracing::debug!("Registered panel '{}' on {:?}", spec.id, side);
        match side {
            Some(side) => {
                self.layout_dock(side);
            }
            None => place_element(&mut self.host, &spec.id, rect),
        }
        Ok(())
    }

    /// Unregister a panel. Its siblings close the gap on the next layout pass, which runs
    /// immediately.
    pub fn remove(&mut self, id: &PanelId) -> DockResult<Panel> {
        if self.drag.active_panel() == Some(id) {
            self.drag.cancel();
            self.host.set_drop_preview(None);
        }
        if matches!(&self.resize, Some(ResizeSession::Panel(drag)) if &drag.panel == id) {
            self.resize = None;
        }
        let side = self.registry.get(id).and_then(Panel::side);
        if side.is_some() {
            vacate(&mut self.registry, id);
        }
        let panel = self
            .registry
            .remove(id)
            .ok_or_else(|| DockError::PanelNotFound(id.clone()))?;
        if let Some(side) = side {
            self.layout_dock(side);
        }
        tracing::debug!("Removed panel '{}'", id);
        Ok(panel)
    }

    /// Move a panel to a new last row on `side`.
    pub fn dock_panel(&mut self, id: &PanelId, side: DockSide) -> DockResult<()> {
        let previous = self.registry.require(id)?.side();
        vacate(&mut self.registry, id);
        let slot = DockSlot::new(side, self.registry.next_row(side), 0, 0);
        let panel = self.registry.require_mut(id)?;
        panel.placement = Placement::Docked(slot);
        panel.original_dock = None;
        panel.visible = true;
        with_element(&mut self.host, id, |element| element.show());
        if let Some(previous) = previous.filter(|p| *p != side) {
            self.layout_dock(previous);
        }
        self.layout_dock(side);
        self.persist();
        Ok(())
    }

    /// Float a docked panel where it currently is.
    pub fn undock_panel(&mut self, id: &PanelId) -> DockResult<()> {
        let Some(side) = self.registry.require(id)?.side() else {
            return Err(DockError::NotDocked(id.clone()));
        };
        vacate(&mut self.registry, id);
        let rect = self.registry.require(id)?.rect;
        place_element(&mut self.host, id, rect);
        with_element(&mut self.host, id, |element| element.raise());
        self.layout_dock(side);
        self.persist();
        Ok(())
    }

    /// Set the stored height. Docked panels are re-laid-out; floating ones resize in place.
    pub fn set_panel_height(&mut self, id: &PanelId, height: f32) -> DockResult<()> {
        let min = self.config.min_panel_height;
        let panel = self.registry.require_mut(id)?;
        panel.height = at_least(height, min);
        match panel.side() {
            Some(side) => {
                self.layout_dock(side);
            }
            None => {
                panel.rect.height = panel.height;
                let rect = panel.rect;
                place_element(&mut self.host, id, rect);
            }
        }
        self.persist();
        Ok(())
    }

    /// Let a docked panel take the dock's remaining height. Only the bottom panel of a
    /// column in the last row may fill.
    pub fn set_fill(&mut self, id: &PanelId, fill: bool) -> DockResult<()> {
        let Some(slot) = self.registry.require(id)?.slot().copied() else {
            return Err(DockError::NotDocked(id.clone()));
        };
        if fill && !self.fill_eligible(id, &slot) {
            return Err(DockError::FillIneligible(id.clone()));
        }
        if let Some(slot) = self.registry.require_mut(id)?.placement.slot_mut() {
            slot.fill = fill;
        }
        self.layout_dock(slot.side);
        self.persist();
        Ok(())
    }

    fn fill_eligible(&self, id: &PanelId, slot: &DockSlot) -> bool {
        let panels = self.registry.docked_panels(slot.side, None);
        let rows = group_by_row(&panels);
        let Some(last) = rows.last() else {
            return false;
        };
        if last.row != slot.row {
            return false;
        }
        group_by_column(last)
            .iter()
            .find(|c| c.column == slot.column)
            .and_then(|c| c.tail())
            .is_some_and(|tail| &tail.id == id)
    }

    /// Pin a docked panel's column to its current width, or release the pin. Locking needs
    /// a row with more than one column.
    pub fn set_width_lock(&mut self, id: &PanelId, locked: bool) -> DockResult<()> {
        let panel = self.registry.require(id)?;
        let width = panel.rect.width;
        let Some(slot) = panel.slot().copied() else {
            return Err(DockError::NotDocked(id.clone()));
        };
        let columns_in_row = {
            let panels = self.registry.docked_panels(slot.side, None);
            let rows = group_by_row(&panels);
            rows.iter()
                .find(|r| r.row == slot.row)
                .map_or(0, |r| group_by_column(r).len())
        };
        if locked && columns_in_row < 2 {
            return Err(DockError::LockIneligible(id.clone()));
        }

        for panel in self.registry.iter_mut() {
            let Some(other) = panel.placement.slot_mut() else {
                continue;
            };
            let same_column =
                other.side == slot.side && other.row == slot.row && other.column == slot.column;
            if same_column {
                other.width_lock = None;
            }
        }
        if locked && let Some(slot) = self.registry.require_mut(id)?.placement.slot_mut() {
            slot.width_lock = Some(width);
        }
        self.layout_dock(slot.side);
        self.persist();
        Ok(())
    }

    /// Show or hide a panel. Panels parked by a hidden dock reappear with it.
    pub fn set_panel_visible(&mut self, id: &PanelId, visible: bool) -> DockResult<()> {
        let panel = self.registry.require_mut(id)?;
        if panel.original_dock.is_some() {
            tracing::debug!("Panel '{}' is parked by a hidden dock; visibility unchanged", id);
            return Ok(());
        }
        let reopened = (visible && !panel.visible).then(|| panel.slot().copied()).flatten();
        panel.visible = visible;
        let side = panel.side();
        if let Some(slot) = reopened {
            // Siblings were renumbered while this panel was hidden; it takes back its row.
            for other in self.registry.iter_mut().filter(|p| p.visible && &p.id != id) {
                if let Some(s) = other.placement.slot_mut()
                    && s.side == slot.side
                    && s.row >= slot.row
                {
                    s.row += 1;
                }
            }
            if let Some(s) = self.registry.require_mut(id)?.placement.slot_mut() {
                s.column = 0;
                s.sub_row = 0;
            }
        }
        with_element(&mut self.host, id, |element| {
            if visible {
                element.show();
            } else {
                element.hide();
            }
        });
        if let Some(side) = side {
            self.layout_dock(side);
        }
        self.persist();
        Ok(())
    }

    pub fn set_dock_width(&mut self, side: DockSide, width: f32) {
        self.registry.dock_mut(side).width = self.config.clamp_dock_width(width);
        self.layout_dock(side);
        self.persist();
    }

    /// Hide or show a sidebar. Hiding parks its panels (hidden, slot remembered); showing
    /// puts them back where they were.
    pub fn set_dock_visible(&mut self, side: DockSide, visible: bool) {
        if self.registry.dock(side).visible == visible {
            return;
        }
        self.registry.dock_mut(side).visible = visible;

        let mut toggled = Vec::new();
        for panel in self.registry.iter_mut() {
            if visible {
                if let Some(slot) = panel.original_dock.filter(|s| s.side == side) {
                    panel.placement = Placement::Docked(slot);
                    panel.original_dock = None;
                    panel.visible = true;
                    toggled.push(panel.id.clone());
                }
            } else if panel.visible
                && let Some(slot) = panel.slot().copied().filter(|s| s.side == side)
            {
                // Panels the user already hid stay docked and hidden.
                panel.original_dock = Some(slot);
                panel.placement = Placement::Floating;
                panel.visible = false;
                toggled.push(panel.id.clone());
            }
        }
        for id in &toggled {
            with_element(&mut self.host, id, |element| {
                if visible {
                    element.show();
                } else {
                    element.hide();
                }
            });
        }
        tracing::debug!(
            "{} dock {} ({} panels)",
            side,
            if visible { "shown" } else { "hidden" },
            toggled.len()
        );
        self.layout_dock(side);
        self.persist();
    }

    /// Flip a sidebar's visibility, returning the new state.
    pub fn toggle_dock(&mut self, side: DockSide) -> bool {
        let visible = !self.registry.dock(side).visible;
        self.set_dock_visible(side, visible);
        visible
    }

    /// Tab bookkeeping of a tabbed panel. Tabs never affect layout.
    pub fn tabs_mut(&mut self, id: &PanelId) -> Option<&mut TabSet> {
        self.registry.get_mut(id).and_then(Panel::tabs_mut)
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    /// Pointer pressed on an interactive element. Returns true when the press was claimed.
    pub fn on_press(&mut self, element: ElementId, pointer: Vec2) -> bool {
        match element {
            ElementId::DragHandle(id) => {
                let Some(panel) = self.registry.get(&id).filter(|p| p.visible) else {
                    return false;
                };
                self.resize = None;
                let press = PressState::new(panel, pointer);
                if let DragTransition::Armed { stale: Some(stale) } =
                    self.drag.advance(DragInput::Press(press))
                {
                    self.abandon(&stale);
                }
                true
            }
            ElementId::DockSplitter(side) => {
                self.settle_drag();
                self.resize = Some(ResizeSession::DockWidth(DockWidthDrag::begin(
                    &self.registry,
                    side,
                    pointer,
                )));
                true
            }
            ElementId::ColumnSplitter(key) => {
                self.settle_drag();
                match ColumnSplitterDrag::begin(&self.registry, key, pointer) {
                    Some(drag) => {
                        self.resize = Some(ResizeSession::Column(drag));
                        true
                    }
                    None => {
                        tracing::debug!("Splitter {:?} no longer matches the layout", key);
                        false
                    }
                }
            }
            ElementId::ResizeHandle(id, edges) => {
                self.settle_drag();
                match PanelResizeDrag::begin(&self.registry, &id, edges, pointer) {
                    Some(drag) => {
                        self.resize = Some(ResizeSession::Panel(drag));
                        true
                    }
                    None => false,
                }
            }
        }
    }

    pub fn on_move(&mut self, pointer: Vec2) {
        profile_function!();
        if let Some(session) = self.resize.take() {
            self.apply_resize(&session, pointer);
            self.resize = Some(session);
            return;
        }
        match self.drag.advance(DragInput::Move(pointer)) {
            DragTransition::Started => {
                self.begin_drag();
                self.track_drag();
            }
            DragTransition::Moved => self.track_drag(),
            _ => {}
        }
    }

    pub fn on_release(&mut self, pointer: Vec2) {
        if let Some(session) = self.resize.take() {
            self.apply_resize(&session, pointer);
            session.finish(&mut self.registry);
            self.persist();
            return;
        }
        match self.drag.advance(DragInput::Release(pointer)) {
            DragTransition::Clicked(press) => {
                if let Some(panel) = self.registry.get_mut(&press.panel) {
                    press.snapshot.restore(panel);
                }
                self.layout_all();
            }
            DragTransition::Dropped(session) => self.finish_drop(session),
            _ => {}
        }
    }

    /// The client window changed size: re-lay-out both docks and pull floating panels back
    /// inside the window.
    pub fn on_host_resize(&mut self, size: Size) {
        self.viewport = size;
        let header = self.config.header_height;
        let mut moved = Vec::new();
        for panel in self.registry.iter_mut().filter(|p| p.visible && !p.is_docked()) {
            let rect = panel.rect;
            let x = clamp_range(rect.x, 0.0, size.width - rect.width);
            let y = clamp_range(rect.y, header, size.height - rect.height);
            if x != rect.x || y != rect.y {
                panel.rect = rect.with_position(x, y);
                moved.push((panel.id.clone(), panel.rect));
            }
        }
        for (id, rect) in moved {
            place_element(&mut self.host, &id, rect);
        }
        self.layout_all();
    }

    fn apply_resize(&mut self, session: &ResizeSession, pointer: Vec2) {
        match session.apply(&mut self.registry, &self.config, self.viewport, pointer) {
            Some(side) => {
                self.layout_dock(side);
            }
            None => {
                if let ResizeSession::Panel(drag) = session
                    && let Some(panel) = self.registry.get(&drag.panel)
                {
                    let rect = panel.rect;
                    place_element(&mut self.host, &drag.panel, rect);
                }
            }
        }
    }

    /// Threshold crossed: pull the panel out of its dock and bring it to the front.
    fn begin_drag(&mut self) {
        let Some(id) = self.drag.active_panel().cloned() else {
            return;
        };
        if let Some(slot) = vacate(&mut self.registry, &id) {
            self.layout_dock(slot.side);
        }
        with_element(&mut self.host, &id, |element| element.raise());
        tracing::debug!("Drag started for '{}'", id);
    }

    /// Follow the pointer and refresh the cached drop target and preview.
    fn track_drag(&mut self) {
        let Some(session) = self.drag.session() else {
            return;
        };
        let id = session.panel.clone();
        let pointer = session.current;
        let origin = session.panel_origin(self.config.header_height);

        let Some(panel) = self.registry.get_mut(&id) else {
            self.drag.cancel();
            self.host.set_drop_preview(None);
            return;
        };
        panel.rect = panel.rect.with_position(origin.x, origin.y);
        let rect = panel.rect;
        place_element(&mut self.host, &id, rect);

        let hovered = hovered_dock(&self.registry, &self.config, self.viewport, rect);
        let (target, preview) = hovered
            .map(|side| {
                let geometry =
                    dock_geometry_excluding(&self.registry, &self.config, self.viewport, side, Some(&id));
                let detector = DropZoneDetector::from_config(&self.config);
                let target = detector.detect(&geometry, pointer, rect.x, rect.right());
                let preview = DropPreview {
                    side,
                    drop_type: target.drop_type,
                    rect: detector.preview_bounds(&target, &geometry),
                };
                (target, preview)
            })
            .unzip();

        tracing::trace!("Drag '{}' over {:?}: {:?}", id, hovered, target);
        if let Some(session) = self.drag.session_mut() {
            session.hovered_side = hovered;
            session.target = target;
        }
        self.host.set_drop_preview(preview);
    }

    fn finish_drop(&mut self, session: DragSession) {
        match commit_placement(
            &mut self.registry,
            &self.config,
            self.viewport,
            &session.panel,
            session.target.as_ref(),
        ) {
            Ok(Some(side)) => tracing::debug!("Dropped '{}' on {} dock", session.panel, side),
            Ok(None) => tracing::debug!("Dropped '{}' floating", session.panel),
            Err(err) => tracing::warn!("Drop of '{}' discarded: {}", session.panel, err),
        }
        self.host.set_drop_preview(None);
        self.layout_all();
        self.persist();
    }

    /// Drop any armed or in-flight drag before a resize takes the pointer.
    fn settle_drag(&mut self) {
        if let DragPhase::Dragging(session) = self.drag.cancel() {
            self.abandon(&session);
        }
    }

    /// A drag superseded by a new press leaves its panel floating where it was last shown.
    /// Its siblings were already renumbered when it left the dock, so the old slot is gone.
    fn abandon(&mut self, session: &DragSession) {
        tracing::debug!("Discarding stale drag of '{}'", session.panel);
        self.host.set_drop_preview(None);
        self.layout_all();
        self.persist();
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::capture(&self.registry)
    }

    /// Apply a snapshot and re-lay-out. Returns the number of panels restored.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) -> usize {
        self.drag.cancel();
        self.resize = None;
        let restored = snapshot.apply(&mut self.registry, &self.config);

        let elements: Vec<(PanelId, bool, Option<Rect>)> = self
            .registry
            .iter()
            .map(|p| (p.id.clone(), p.visible, (!p.is_docked()).then_some(p.rect)))
            .collect();
        for (id, visible, floating_rect) in elements {
            with_element(&mut self.host, &id, |element| {
                if visible {
                    element.show();
                } else {
                    element.hide();
                }
            });
            if let Some(rect) = floating_rect {
                place_element(&mut self.host, &id, rect);
            }
        }
        self.layout_all();
        restored
    }

    /// Write the current layout to the store.
    pub fn save_layout(&mut self) -> DockResult<()> {
        let snapshot = self.snapshot();
        self.store.save(&snapshot).inspect_err(|err| {
            tracing::error!("Failed to save layout: {}", err);
            self.host.notify(&format!("Could not save the window layout: {err}"));
        })
    }

    /// Load and apply the stored layout. Returns false when nothing was stored.
    pub fn load_layout(&mut self) -> DockResult<bool> {
        let loaded = self.store.load().inspect_err(|err| {
            tracing::error!("Failed to load layout: {}", err);
            self.host.notify(&format!("Could not load the window layout: {err}"));
        })?;
        match loaded {
            Some(snapshot) => {
                let restored = self.restore(&snapshot);
                tracing::debug!("Restored layout for {} panels", restored);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Save after a committed change. Failures are reported through the host and logged;
    /// the in-memory layout stays as it is.
    fn persist(&mut self) {
        let _ = self.save_layout();
    }
}
