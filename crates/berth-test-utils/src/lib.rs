//! Test utilities for berth.
//!
//! - [`MockHost`] implements [`berth_dock::Host`] and records every call the engine makes
//! - [`MemoryStore`] keeps the saved layout JSON in memory, shareable across clones
//! - [`FailingStore`] fails every save and load
//!
//! # Example
//!
//! ```rust
//! use berth_dock::{DockConfig, DockSide, DockSystem, PanelId, PanelSpec, Size};
//! use berth_test_utils::{MemoryStore, MockHost};
//!
//! let store = MemoryStore::new();
//! let mut docks = DockSystem::new(
//!     DockConfig::default(),
//!     MockHost::new(Size::new(1280.0, 720.0)),
//!     store.clone(),
//! );
//! let id = PanelId::new("map").unwrap();
//! docks.register(PanelSpec::new(id.clone()).docked(DockSide::Left)).unwrap();
//!
//! assert_eq!(docks.host().element_rect(&id).unwrap().y, 0.0);
//! ```

mod mock_host;
mod stores;

pub use mock_host::{HostCall, MockElement, MockHost};
pub use stores::{FailingStore, MemoryStore};
