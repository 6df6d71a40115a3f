//! Layout save/restore, sidebar visibility and store failure handling.

use berth_dock::{
    DockConfig, DockError, DockSide, DockSystem, ElementId, LayoutStore, PanelId, PanelSpec,
    Rect, Size, Vec2,
};
use berth_test_utils::{FailingStore, MemoryStore, MockHost};

const VIEWPORT: Size = Size::new(1200.0, 800.0);

fn id(s: &str) -> PanelId {
    PanelId::new(s).unwrap()
}

fn new_system<S: LayoutStore>(store: S) -> DockSystem<MockHost, S> {
    berth_core::logging::init();
    DockSystem::new(DockConfig::default(), MockHost::new(VIEWPORT), store)
}

/// Two columns with a lock, a second panel stacked under the locked one, a fill panel
/// below, a wider right dock and one floating panel.
fn arranged(store: MemoryStore) -> DockSystem<MockHost, MemoryStore> {
    let mut system = new_system(store);
    system
        .register(PanelSpec::new(id("map")).docked(DockSide::Left).height(300.0))
        .unwrap();
    system
        .register(PanelSpec::new(id("stats")).floating(Rect::new(500.0, 300.0, 200.0, 150.0)))
        .unwrap();
    system
        .register(PanelSpec::new(id("chat")).docked(DockSide::Left).height(150.0))
        .unwrap();
    system
        .register(PanelSpec::new(id("notes")).floating(Rect::new(600.0, 200.0, 300.0, 220.0)))
        .unwrap();
    system
        .register(PanelSpec::new(id("log")).floating(Rect::new(650.0, 450.0, 200.0, 120.0)))
        .unwrap();

    system.on_press(ElementId::DragHandle(id("stats")), Vec2::new(510.0, 310.0));
    system.on_move(Vec2::new(600.0, 310.0));
    system.on_move(Vec2::new(250.0, 150.0));
    system.on_release(Vec2::new(250.0, 150.0));

    system.set_width_lock(&id("stats"), true).unwrap();

    // Into the gap under stats.
    system.on_press(ElementId::DragHandle(id("log")), Vec2::new(660.0, 460.0));
    system.on_move(Vec2::new(750.0, 460.0));
    system.on_move(Vec2::new(220.0, 250.0));
    system.on_release(Vec2::new(220.0, 250.0));

    system.set_fill(&id("chat"), true).unwrap();
    system.set_dock_width(DockSide::Right, 420.0);
    system
}

#[test]
fn test_layout_round_trip() {
    let store = MemoryStore::new();
    let original = arranged(store.clone());
    let stats = original.panel(&id("stats")).unwrap().slot().copied().unwrap();
    assert_eq!((stats.row, stats.column), (0, 1));
    assert_eq!(stats.width_lock, Some(146.0));
    let log = original.panel(&id("log")).unwrap();
    let log_slot = log.slot().copied().unwrap();
    assert_eq!((log_slot.row, log_slot.column, log_slot.sub_row), (0, 1, 1));
    assert_eq!(log.height, 150.0);

    let mut restored = new_system(MemoryStore::with_json(store.json().unwrap()));
    for name in ["map", "stats", "chat", "notes", "log"] {
        restored
            .register(PanelSpec::new(id(name)).floating(Rect::new(10.0, 10.0, 100.0, 100.0)))
            .unwrap();
    }
    assert!(restored.load_layout().unwrap());

    assert_eq!(restored.snapshot(), original.snapshot());
    let log = restored.panel(&id("log")).unwrap();
    assert_eq!(log.slot().map(|s| (s.row, s.column, s.sub_row)), Some((0, 1, 1)));
    assert_eq!(log.height, 150.0);
    assert_eq!(log.rect, Rect::new(150.0, 150.0, 146.0, 150.0));
    for name in ["map", "stats", "chat", "notes", "log"] {
        let expected = original.panel(&id(name)).unwrap().rect;
        assert_eq!(restored.panel(&id(name)).unwrap().rect, expected, "{name}");
        assert_eq!(restored.host().element_rect(&id(name)), Some(expected), "{name}");
    }
    assert_eq!(restored.registry().dock(DockSide::Right).width, 420.0);
}

#[test]
fn test_fill_panel_saves_stored_height() {
    let store = MemoryStore::new();
    let system = arranged(store);
    let chat = system
        .snapshot()
        .panels
        .into_iter()
        .find(|p| p.id == id("chat"))
        .unwrap();
    assert!(chat.fill);
    assert_eq!(chat.height, 150.0);
    assert!(system.panel(&id("chat")).unwrap().rect.height > 150.0);
}

#[test]
fn test_load_with_nothing_saved() {
    let mut system = new_system(MemoryStore::new());
    assert!(!system.load_layout().unwrap());
}

#[test]
fn test_toggle_dock_parks_and_restores_panels() {
    let mut system = new_system(MemoryStore::new());
    system
        .register(PanelSpec::new(id("map")).docked(DockSide::Left).height(200.0))
        .unwrap();
    system
        .register(PanelSpec::new(id("chat")).docked(DockSide::Left).height(150.0))
        .unwrap();
    let rect_before = system.panel(&id("chat")).unwrap().rect;

    assert!(!system.toggle_dock(DockSide::Left));
    let chat = system.panel(&id("chat")).unwrap();
    assert!(!chat.is_docked());
    assert!(!chat.visible);
    assert_eq!(chat.original_dock.map(|s| s.row), Some(1));
    assert!(!system.host().element(&id("chat")).unwrap().is_visible());
    assert!(!system.host().dock_bounds(DockSide::Left).unwrap().visible);

    assert!(system.toggle_dock(DockSide::Left));
    let chat = system.panel(&id("chat")).unwrap();
    assert_eq!(chat.slot().map(|s| s.row), Some(1));
    assert!(chat.visible);
    assert_eq!(chat.rect, rect_before);
    assert!(system.host().element(&id("chat")).unwrap().is_visible());
}

#[test]
fn test_hidden_dock_survives_reload() {
    let store = MemoryStore::new();
    let mut original = new_system(store.clone());
    original
        .register(PanelSpec::new(id("map")).docked(DockSide::Left).height(200.0))
        .unwrap();
    original.set_dock_visible(DockSide::Left, false);

    let mut restored = new_system(MemoryStore::with_json(store.json().unwrap()));
    restored
        .register(PanelSpec::new(id("map")).docked(DockSide::Left))
        .unwrap();
    restored.load_layout().unwrap();

    let map = restored.panel(&id("map")).unwrap();
    assert!(!map.is_docked());
    assert!(!map.visible);
    assert!(!restored.registry().dock(DockSide::Left).visible);

    restored.set_dock_visible(DockSide::Left, true);
    let map = restored.panel(&id("map")).unwrap();
    assert_eq!(map.side(), Some(DockSide::Left));
    assert_eq!(map.height, 200.0);
}

#[test]
fn test_failing_store_notifies_and_keeps_layout() {
    let mut system = new_system(FailingStore);
    system
        .register(PanelSpec::new(id("map")).docked(DockSide::Left))
        .unwrap();

    system.dock_panel(&id("map"), DockSide::Right).unwrap();
    assert_eq!(system.panel(&id("map")).unwrap().side(), Some(DockSide::Right));
    assert_eq!(system.host().notifications().len(), 1);

    assert!(matches!(system.save_layout(), Err(DockError::Persistence(_))));
    assert!(matches!(system.load_layout(), Err(DockError::Persistence(_))));
    assert_eq!(system.host().notifications().len(), 3);
    assert_eq!(system.panel(&id("map")).unwrap().side(), Some(DockSide::Right));
}

#[test]
fn test_unknown_panels_in_saved_layout_are_ignored() {
    let store = MemoryStore::new();
    let mut original = new_system(store.clone());
    original
        .register(PanelSpec::new(id("map")).docked(DockSide::Left))
        .unwrap();
    original
        .register(PanelSpec::new(id("retired")).docked(DockSide::Left))
        .unwrap();
    original.save_layout().unwrap();

    let mut restored = new_system(MemoryStore::with_json(store.json().unwrap()));
    restored
        .register(PanelSpec::new(id("map")).floating(Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    assert!(restored.load_layout().unwrap());
    assert_eq!(restored.registry().len(), 1);
    assert!(restored.panel(&id("map")).unwrap().is_docked());
}
