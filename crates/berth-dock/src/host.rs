//! Contracts the host canvas implements so the engine can drive its widgets.
//!
//! The engine never paints. It computes rectangles and pushes them through these traits;
//! the host maps them onto its own labels, consoles and mapper windows.

use berth_core::geometry::{Rect, Size};

use crate::panel::PanelId;
use crate::splitter::Splitter;
use crate::types::{DockSide, DropType};

/// Any host element that can be positioned is layout-compatible.
pub trait VisualElement {
    fn move_to(&mut self, x: f32, y: f32);
    fn resize(&mut self, width: f32, height: f32);
    fn geometry(&self) -> Rect;
    fn show(&mut self);
    fn hide(&mut self);
    /// Bring to the front of the z-order.
    fn raise(&mut self);
}

/// Where the host should draw a dock and its width handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockBounds {
    pub rect: Rect,
    pub handle: Rect,
    pub visible: bool,
}

/// Indicator shown while dragging, describing where the panel would land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPreview {
    pub side: DockSide,
    pub drop_type: DropType,
    pub rect: Rect,
}

/// The host canvas.
pub trait Host {
    /// Current size of the client window.
    fn viewport_size(&self) -> Size;

    /// Visual element backing a panel, if the host has created one.
    fn element_mut(&mut self, id: &PanelId) -> Option<&mut dyn VisualElement>;

    /// Destroy every splitter element on `side`.
    fn clear_splitters(&mut self, side: DockSide);

    /// Create a splitter element. Called after [`Host::clear_splitters`] on each layout pass.
    fn create_splitter(&mut self, splitter: &Splitter);

    fn set_dock_bounds(&mut self, side: DockSide, bounds: DockBounds);

    /// Show, move or (with `None`) hide the drop indicator.
    fn set_drop_preview(&mut self, preview: Option<DropPreview>);

    /// Surface a message to the user through the host's own notification mechanism.
    fn notify(&mut self, message: &str);
}

/// Move and resize a panel's element. Missing elements are skipped; the next layout pass
/// will place them once the host creates them.
pub(crate) fn place_element(host: &mut dyn Host, id: &PanelId, rect: Rect) {
    match host.element_mut(id) {
        Some(element) => {
            element.move_to(rect.x, rect.y);
            element.resize(rect.width, rect.height);
        }
        None => tracing::trace!("No host element for panel '{}'", id),
    }
}

pub(crate) fn with_element(host: &mut dyn Host, id: &PanelId, f: impl FnOnce(&mut dyn VisualElement)) {
    if let Some(element) = host.element_mut(id) {
        f(element);
    }
}
