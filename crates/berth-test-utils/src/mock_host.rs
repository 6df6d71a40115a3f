//! Recording host for driving the docking system in tests.

use std::sync::Arc;

use berth_core::alloc::HashMap;
use berth_dock::{
    DockBounds, DockSide, DropPreview, Host, PanelId, Rect, Size, Splitter, VisualElement,
};
use parking_lot::Mutex;

/// One call made by the engine into the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    MoveTo { id: PanelId, x: f32, y: f32 },
    Resize { id: PanelId, width: f32, height: f32 },
    Show(PanelId),
    Hide(PanelId),
    Raise(PanelId),
    ClearSplitters(DockSide),
    CreateSplitter(Splitter),
    SetDockBounds { side: DockSide, bounds: DockBounds },
    SetDropPreview(Option<DropPreview>),
    Notify(String),
}

type CallLog = Arc<Mutex<Vec<HostCall>>>;

/// Stand-in for a host widget. Tracks its geometry and visibility.
#[derive(Debug)]
pub struct MockElement {
    id: PanelId,
    rect: Rect,
    visible: bool,
    raise_count: usize,
    calls: CallLog,
}

impl MockElement {
    fn new(id: PanelId, calls: CallLog) -> Self {
        Self {
            id,
            rect: Rect::ZERO,
            visible: true,
            raise_count: 0,
            calls,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn raise_count(&self) -> usize {
        self.raise_count
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

impl VisualElement for MockElement {
    fn move_to(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
        self.record(HostCall::MoveTo {
            id: self.id.clone(),
            x,
            y,
        });
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.rect.width = width;
        self.rect.height = height;
        self.record(HostCall::Resize {
            id: self.id.clone(),
            width,
            height,
        });
    }

    fn geometry(&self) -> Rect {
        self.rect
    }

    fn show(&mut self) {
        self.visible = true;
        self.record(HostCall::Show(self.id.clone()));
    }

    fn hide(&mut self) {
        self.visible = false;
        self.record(HostCall::Hide(self.id.clone()));
    }

    fn raise(&mut self) {
        self.raise_count += 1;
        self.record(HostCall::Raise(self.id.clone()));
    }
}

/// Host that keeps everything in memory and logs each call.
///
/// Elements are created on first use unless the host is [`MockHost::strict`], in which
/// case only elements added through [`MockHost::add_element`] exist.
#[derive(Debug)]
pub struct MockHost {
    viewport: Size,
    auto_create: bool,
    elements: HashMap<PanelId, MockElement>,
    splitters: HashMap<DockSide, Vec<Splitter>>,
    dock_bounds: HashMap<DockSide, DockBounds>,
    drop_preview: Option<DropPreview>,
    notifications: Vec<String>,
    calls: CallLog,
}

impl MockHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            auto_create: true,
            elements: HashMap::default(),
            splitters: HashMap::default(),
            dock_bounds: HashMap::default(),
            drop_preview: None,
            notifications: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Only elements added explicitly exist.
    pub fn strict(mut self) -> Self {
        self.auto_create = false;
        self
    }

    pub fn add_element(&mut self, id: PanelId) {
        let calls = Arc::clone(&self.calls);
        self.elements
            .entry(id.clone())
            .or_insert_with(|| MockElement::new(id, calls));
    }

    /// Change the reported viewport. The engine only learns about it through
    /// `DockSystem::on_host_resize`.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn element(&self, id: &PanelId) -> Option<&MockElement> {
        self.elements.get(id)
    }

    pub fn element_rect(&self, id: &PanelId) -> Option<Rect> {
        self.elements.get(id).map(|e| e.rect)
    }

    /// Splitters currently shown on `side`.
    pub fn splitters(&self, side: DockSide) -> &[Splitter] {
        self.splitters.get(&side).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dock_bounds(&self, side: DockSide) -> Option<DockBounds> {
        self.dock_bounds.get(&side).copied()
    }

    pub fn drop_preview(&self) -> Option<DropPreview> {
        self.drop_preview
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn count_calls(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

impl Host for MockHost {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn element_mut(&mut self, id: &PanelId) -> Option<&mut dyn VisualElement> {
        if self.auto_create {
            self.add_element(id.clone());
        }
        self.elements
            .get_mut(id)
            .map(|e| e as &mut dyn VisualElement)
    }

    fn clear_splitters(&mut self, side: DockSide) {
        self.splitters.remove(&side);
        self.record(HostCall::ClearSplitters(side));
    }

    fn create_splitter(&mut self, splitter: &Splitter) {
        self.splitters
            .entry(splitter.key.side)
            .or_default()
            .push(*splitter);
        self.record(HostCall::CreateSplitter(*splitter));
    }

    fn set_dock_bounds(&mut self, side: DockSide, bounds: DockBounds) {
        self.dock_bounds.insert(side, bounds);
        self.record(HostCall::SetDockBounds { side, bounds });
    }

    fn set_drop_preview(&mut self, preview: Option<DropPreview>) {
        self.drop_preview = preview;
        self.record(HostCall::SetDropPreview(preview));
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
        self.record(HostCall::Notify(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_record_calls() {
        let mut host = MockHost::new(Size::new(800.0, 600.0));
        let id = PanelId::new("chat").unwrap();
        let element = host.element_mut(&id).unwrap();
        element.move_to(10.0, 20.0);
        element.resize(100.0, 50.0);
        element.raise();

        assert_eq!(host.element_rect(&id), Some(Rect::new(10.0, 20.0, 100.0, 50.0)));
        assert_eq!(host.element(&id).unwrap().raise_count(), 1);
        assert_eq!(host.calls().len(), 3);
    }

    #[test]
    fn test_strict_host_has_no_implicit_elements() {
        let mut host = MockHost::new(Size::new(800.0, 600.0)).strict();
        let id = PanelId::new("chat").unwrap();
        assert!(host.element_mut(&id).is_none());
        host.add_element(id.clone());
        assert!(host.element_mut(&id).is_some());
    }
}
