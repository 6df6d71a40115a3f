//! Pointer-driven scenarios through `DockSystem` with a recording host.

use berth_dock::{
    DockConfig, DockSide, DockSystem, DropType, ElementId, PanelId, PanelSpec, Rect,
    ResizeEdges, Size, SplitterKey, Vec2,
};
use berth_test_utils::{HostCall, MemoryStore, MockHost};

const VIEWPORT: Size = Size::new(1200.0, 800.0);

fn id(s: &str) -> PanelId {
    PanelId::new(s).unwrap()
}

fn system_with(config: DockConfig) -> (DockSystem<MockHost, MemoryStore>, MemoryStore) {
    berth_core::logging::init();
    let store = MemoryStore::new();
    let system = DockSystem::new(config, MockHost::new(VIEWPORT), store.clone());
    (system, store)
}

fn system() -> (DockSystem<MockHost, MemoryStore>, MemoryStore) {
    system_with(DockConfig::default())
}

fn dock_left(system: &mut DockSystem<MockHost, MemoryStore>, name: &str, height: f32) {
    system
        .register(PanelSpec::new(id(name)).docked(DockSide::Left).height(height))
        .unwrap();
}

fn float(system: &mut DockSystem<MockHost, MemoryStore>, name: &str, rect: Rect) {
    system.register(PanelSpec::new(id(name)).floating(rect)).unwrap();
}

fn rect_of(system: &DockSystem<MockHost, MemoryStore>, name: &str) -> Rect {
    system.panel(&id(name)).unwrap().rect
}

fn slot_of(system: &DockSystem<MockHost, MemoryStore>, name: &str) -> (DockSide, u32, u32, u32) {
    let slot = system.panel(&id(name)).unwrap().slot().copied().unwrap();
    (slot.side, slot.row, slot.column, slot.sub_row)
}

#[test]
fn test_drag_below_existing_row() {
    let (mut system, store) = system();
    dock_left(&mut system, "a", 200.0);
    float(&mut system, "b", Rect::new(500.0, 300.0, 200.0, 150.0));

    assert!(system.on_press(ElementId::DragHandle(id("b")), Vec2::new(510.0, 310.0)));
    system.on_move(Vec2::new(520.0, 310.0));
    assert!(system.drag().is_dragging());
    assert_eq!(system.host().drop_preview(), None);

    system.on_move(Vec2::new(100.0, 195.0));
    let preview = system.host().drop_preview().unwrap();
    assert_eq!(preview.side, DockSide::Left);
    assert_eq!(preview.drop_type, DropType::Below);

    system.on_release(Vec2::new(100.0, 195.0));
    assert_eq!(slot_of(&system, "b"), (DockSide::Left, 1, 0, 0));
    assert_eq!(rect_of(&system, "b"), Rect::new(0.0, 200.0, 296.0, 150.0));
    assert_eq!(system.host().drop_preview(), None);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_side_by_side_then_snap() {
    let (mut system, _store) = system();
    dock_left(&mut system, "a", 300.0);
    float(&mut system, "b", Rect::new(500.0, 300.0, 200.0, 150.0));

    system.on_press(ElementId::DragHandle(id("b")), Vec2::new(510.0, 310.0));
    system.on_move(Vec2::new(600.0, 310.0));
    system.on_move(Vec2::new(250.0, 150.0));
    assert_eq!(system.host().drop_preview().unwrap().drop_type, DropType::Right);
    system.on_release(Vec2::new(250.0, 150.0));

    assert_eq!(slot_of(&system, "a"), (DockSide::Left, 0, 0, 0));
    assert_eq!(slot_of(&system, "b"), (DockSide::Left, 0, 1, 0));
    let splitters = system.host().splitters(DockSide::Left);
    assert_eq!(splitters.len(), 1);
    assert_eq!(splitters[0].rect.height, 300.0);

    system.set_panel_height(&id("b"), 200.0).unwrap();
    assert_eq!(rect_of(&system, "b").height, 200.0);

    // Drag b's bottom edge to within the snap threshold of a's height.
    assert!(system.on_press(
        ElementId::ResizeHandle(id("b"), ResizeEdges::BOTTOM),
        Vec2::new(200.0, 200.0)
    ));
    system.on_move(Vec2::new(200.0, 294.0));
    system.on_release(Vec2::new(200.0, 294.0));

    assert_eq!(system.panel(&id("b")).unwrap().height, 300.0);
    assert_eq!(rect_of(&system, "b").height, 300.0);
    assert!(!system.is_resizing());
}

#[test]
fn test_click_restores_placement() {
    let (mut system, store) = system();
    dock_left(&mut system, "a", 200.0);
    dock_left(&mut system, "b", 150.0);
    let before = slot_of(&system, "b");
    let rect_before = rect_of(&system, "b");
    system.host().clear_calls();

    system.on_press(ElementId::DragHandle(id("b")), Vec2::new(50.0, 210.0));
    system.on_move(Vec2::new(53.0, 213.0));
    system.on_release(Vec2::new(53.0, 213.0));

    assert_eq!(slot_of(&system, "b"), before);
    assert_eq!(rect_of(&system, "b"), rect_before);
    assert_eq!(store.save_count(), 0);
    let previews = system
        .host()
        .count_calls(|c| matches!(c, HostCall::SetDropPreview(_)));
    assert_eq!(previews, 0);
}

#[test]
fn test_drop_outside_docks_floats() {
    let (mut system, store) = system();
    dock_left(&mut system, "a", 200.0);

    system.on_press(ElementId::DragHandle(id("a")), Vec2::new(100.0, 10.0));
    system.on_move(Vec2::new(600.0, 400.0));
    system.on_release(Vec2::new(600.0, 400.0));

    let panel = system.panel(&id("a")).unwrap();
    assert!(!panel.is_docked());
    assert_eq!(panel.rect, Rect::new(500.0, 390.0, 296.0, 200.0));
    assert_eq!(system.host().element_rect(&id("a")), Some(panel.rect));
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_siblings_close_gap_while_dragging() {
    let (mut system, _store) = system();
    dock_left(&mut system, "a", 200.0);
    dock_left(&mut system, "b", 150.0);
    assert_eq!(rect_of(&system, "b").y, 200.0);

    system.on_press(ElementId::DragHandle(id("a")), Vec2::new(100.0, 10.0));
    system.on_move(Vec2::new(600.0, 400.0));

    assert_eq!(rect_of(&system, "b").y, 0.0);
    assert_eq!(system.host().element(&id("a")).unwrap().raise_count(), 1);
}

#[test]
fn test_dragging_a_fill_panel_drops_fill() {
    let (mut system, _store) = system();
    dock_left(&mut system, "a", 200.0);
    dock_left(&mut system, "b", 150.0);
    system.set_fill(&id("b"), true).unwrap();
    assert_eq!(rect_of(&system, "b").height, 600.0);

    // Drag b out and drop it back under a.
    system.on_press(ElementId::DragHandle(id("b")), Vec2::new(100.0, 210.0));
    system.on_move(Vec2::new(700.0, 400.0));
    system.on_move(Vec2::new(100.0, 195.0));
    system.on_release(Vec2::new(100.0, 195.0));

    let panel = system.panel(&id("b")).unwrap();
    assert!(panel.is_docked());
    assert!(!panel.is_fill());
    assert_eq!(panel.height, 150.0);
}

#[test]
fn test_fill_panel_dropped_outside_floats_at_stored_height() {
    let (mut system, store) = system();
    dock_left(&mut system, "a", 200.0);
    dock_left(&mut system, "b", 150.0);
    system.set_fill(&id("b"), true).unwrap();

    system.on_press(ElementId::DragHandle(id("b")), Vec2::new(100.0, 210.0));
    system.on_move(Vec2::new(550.0, 100.0));
    // Already back to its own height while in flight.
    assert_eq!(rect_of(&system, "b").height, 150.0);
    system.on_release(Vec2::new(550.0, 100.0));

    let panel = system.panel(&id("b")).unwrap();
    assert!(!panel.is_docked());
    assert_eq!(panel.rect, Rect::new(450.0, 90.0, 296.0, 150.0));
    assert_eq!(system.host().element_rect(&id("b")), Some(panel.rect));

    let saved = berth_dock::LayoutSnapshot::from_json(&store.json().unwrap()).unwrap();
    let record = saved.panels.iter().find(|p| p.id == id("b")).unwrap();
    assert_eq!((record.height, record.y), (150.0, 90.0));
}

#[test]
fn test_new_press_settles_stale_drag() {
    let (mut system, _store) = system();
    dock_left(&mut system, "a", 200.0);
    dock_left(&mut system, "b", 150.0);

    system.on_press(ElementId::DragHandle(id("a")), Vec2::new(100.0, 10.0));
    system.on_move(Vec2::new(600.0, 400.0));
    // The release never arrived; the next press starts over.
    assert!(system.on_press(ElementId::DragHandle(id("b")), Vec2::new(100.0, 10.0)));

    assert!(system.drag().has_pending_drag());
    assert!(!system.panel(&id("a")).unwrap().is_docked());
    assert_eq!(system.host().drop_preview(), None);
    assert_eq!(slot_of(&system, "b"), (DockSide::Left, 0, 0, 0));
}

#[test]
fn test_splitter_press_disarms_pending_drag() {
    let (mut system, _store) = system();
    dock_left(&mut system, "a", 200.0);
    float(&mut system, "f", Rect::new(500.0, 300.0, 200.0, 150.0));

    system.on_press(ElementId::DragHandle(id("f")), Vec2::new(510.0, 310.0));
    assert!(system.on_press(ElementId::DockSplitter(DockSide::Left), Vec2::new(298.0, 100.0)));
    assert!(!system.drag().has_pending_drag());
    system.on_move(Vec2::new(320.0, 100.0));
    system.on_release(Vec2::new(320.0, 100.0));

    system.on_move(Vec2::new(900.0, 500.0));
    assert_eq!(rect_of(&system, "f"), Rect::new(500.0, 300.0, 200.0, 150.0));
    assert!(!system.drag().is_dragging());
}

#[test]
fn test_resize_press_abandons_drag_in_flight() {
    let (mut system, _store) = system();
    dock_left(&mut system, "a", 200.0);
    dock_left(&mut system, "b", 150.0);
    float(&mut system, "f", Rect::new(500.0, 300.0, 200.0, 150.0));

    system.on_press(ElementId::DragHandle(id("a")), Vec2::new(100.0, 10.0));
    system.on_move(Vec2::new(600.0, 100.0));
    assert!(system.drag().is_dragging());
    let shown = rect_of(&system, "a");

    let handle = ElementId::ResizeHandle(id("f"), ResizeEdges::BOTTOM);
    assert!(system.on_press(handle, Vec2::new(600.0, 450.0)));
    assert!(!system.drag().is_dragging());
    assert_eq!(system.host().drop_preview(), None);
    assert!(!system.panel(&id("a")).unwrap().is_docked());
    assert_eq!(slot_of(&system, "b"), (DockSide::Left, 0, 0, 0));

    system.on_release(Vec2::new(600.0, 450.0));
    system.on_move(Vec2::new(900.0, 500.0));
    assert_eq!(rect_of(&system, "a"), shown);
}

#[test]
fn test_drag_stays_below_header() {
    let (mut system, _store) = system_with(DockConfig::default().header_height(30.0));
    float(&mut system, "a", Rect::new(500.0, 300.0, 200.0, 150.0));

    system.on_press(ElementId::DragHandle(id("a")), Vec2::new(510.0, 310.0));
    system.on_move(Vec2::new(600.0, 0.0));
    assert_eq!(rect_of(&system, "a").y, 30.0);
}

#[test]
fn test_column_splitter_drag() {
    let (mut system, store) = system();
    dock_left(&mut system, "a", 200.0);
    float(&mut system, "b", Rect::new(500.0, 300.0, 200.0, 150.0));
    system.on_press(ElementId::DragHandle(id("b")), Vec2::new(510.0, 310.0));
    system.on_move(Vec2::new(600.0, 310.0));
    system.on_move(Vec2::new(250.0, 100.0));
    system.on_release(Vec2::new(250.0, 100.0));
    assert_eq!(rect_of(&system, "a").width, 146.0);
    let saves = store.save_count();

    let key = SplitterKey::new(DockSide::Left, 0, 0);
    assert!(system.on_press(ElementId::ColumnSplitter(key), Vec2::new(148.0, 100.0)));
    system.on_move(Vec2::new(198.0, 100.0));
    system.on_release(Vec2::new(198.0, 100.0));

    assert!((rect_of(&system, "a").width - 196.0).abs() < 0.01);
    assert!((rect_of(&system, "b").width - 96.0).abs() < 0.01);
    assert!((rect_of(&system, "b").x - 200.0).abs() < 0.01);
    assert_eq!(store.save_count(), saves + 1);
}

#[test]
fn test_column_splitter_respects_minimum() {
    let (mut system, _store) = system();
    dock_left(&mut system, "a", 200.0);
    float(&mut system, "b", Rect::new(500.0, 300.0, 200.0, 150.0));
    system.on_press(ElementId::DragHandle(id("b")), Vec2::new(510.0, 310.0));
    system.on_move(Vec2::new(600.0, 310.0));
    system.on_move(Vec2::new(250.0, 100.0));
    system.on_release(Vec2::new(250.0, 100.0));

    let key = SplitterKey::new(DockSide::Left, 0, 0);
    system.on_press(ElementId::ColumnSplitter(key), Vec2::new(148.0, 100.0));
    system.on_move(Vec2::new(1000.0, 100.0));
    system.on_release(Vec2::new(1000.0, 100.0));

    assert!((rect_of(&system, "b").width - 50.0).abs() < 0.01);
    assert!((rect_of(&system, "a").width - 242.0).abs() < 0.01);
}

#[test]
fn test_dock_width_drag() {
    let (mut system, store) = system();
    dock_left(&mut system, "a", 200.0);

    assert!(system.on_press(ElementId::DockSplitter(DockSide::Left), Vec2::new(298.0, 400.0)));
    system.on_move(Vec2::new(398.0, 400.0));
    assert_eq!(rect_of(&system, "a").width, 396.0);
    system.on_move(Vec2::new(5000.0, 400.0));
    assert_eq!(system.registry().dock(DockSide::Left).width, 800.0);
    system.on_release(Vec2::new(5000.0, 400.0));

    assert_eq!(
        system.host().dock_bounds(DockSide::Left).unwrap().rect,
        Rect::new(0.0, 0.0, 800.0, 800.0)
    );
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_floating_panel_resize_moves_element() {
    let (mut system, _store) = system();
    float(&mut system, "a", Rect::new(400.0, 100.0, 200.0, 150.0));

    system.on_press(
        ElementId::ResizeHandle(id("a"), ResizeEdges::BOTTOM_RIGHT),
        Vec2::new(600.0, 250.0),
    );
    system.on_move(Vec2::new(650.0, 300.0));
    system.on_release(Vec2::new(650.0, 300.0));

    let expected = Rect::new(400.0, 100.0, 250.0, 200.0);
    assert_eq!(rect_of(&system, "a"), expected);
    assert_eq!(system.host().element_rect(&id("a")), Some(expected));
}
