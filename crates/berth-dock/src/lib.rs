//! Berth - dock layout and drag-and-drop geometry for text-client panels
//!
//! Panels (labels, consoles, mapper windows) either float or sit in a left or right dock,
//! arranged in rows that can split into side-by-side columns and stack sub-rows within a
//! column. This crate decides where everything goes:
//! - Row/column grouping and a deterministic, idempotent layout pass
//! - Drop zone detection while a panel is dragged over a dock
//! - A press/drag/release state machine that commits placements
//! - Dock width, column splitter and panel height resizing with snapping
//! - JSON layout snapshots behind a pluggable store
//!
//! The host owns painting and input. It reports pointer events to [`DockSystem`] and
//! implements [`Host`] so the engine can move its widgets.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use berth_dock::{DockConfig, DockSide, DockSystem, NullStore, PanelId, PanelSpec};
//!
//! let mut docks = DockSystem::new(DockConfig::default(), my_host, NullStore);
//! docks.register(PanelSpec::new(PanelId::new("map")?).docked(DockSide::Right).height(300.0))?;
//! docks.register(PanelSpec::new(PanelId::new("chat")?).docked(DockSide::Right))?;
//!
//! // From the host's pointer callbacks:
//! // docks.on_press(ElementId::DragHandle(id), pos);
//! // docks.on_move(pos);
//! // docks.on_release(pos);
//! ```

pub mod commit;
pub mod config;
pub mod drag;
pub mod drop_zone;
pub mod error;
pub mod group;
pub mod host;
pub mod layout;
pub mod panel;
pub mod persist;
pub mod registry;
pub mod resize;
pub mod splitter;
pub mod system;
pub mod types;

pub use commit::{commit_placement, vacate};
pub use config::DockConfig;
pub use drag::{DragManager, DragPhase, DragSession, PlacementSnapshot};
pub use drop_zone::{DropTarget, DropZoneDetector, detect_drop_position, hovered_dock};
pub use error::{DockError, DockResult};
pub use host::{DockBounds, DropPreview, Host, VisualElement};
pub use layout::{DockGeometry, compute_dock_geometry, layout_dock, normalize_dock};
pub use panel::{DockSlot, Panel, PanelId, PanelKind, Placement, TabSet};
pub use persist::{FileStore, LayoutSnapshot, LayoutStore, NullStore};
pub use registry::{Dock, PanelRegistry};
pub use splitter::Splitter;
pub use system::{DockSystem, PanelSpec};
pub use types::{DockSide, DropType, ElementId, ResizeEdges, SplitterKey};

// Geometry types appear throughout the public API.
pub use berth_core::geometry::{Rect, Size};
pub use berth_core::math::Vec2;
