//! Layout stores for tests.

use std::sync::Arc;

use berth_dock::{DockError, DockResult, LayoutSnapshot, LayoutStore};
use parking_lot::Mutex;

/// Keeps the last saved snapshot as JSON. Clones share the same slot, so a test can keep a
/// handle after moving the store into a `DockSystem`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    json: Arc<Mutex<Option<String>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with raw JSON.
    pub fn with_json(json: impl Into<String>) -> Self {
        let store = Self::new();
        *store.json.lock() = Some(json.into());
        store
    }

    pub fn json(&self) -> Option<String> {
        self.json.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl LayoutStore for MemoryStore {
    fn save(&mut self, snapshot: &LayoutSnapshot) -> DockResult<()> {
        let json = snapshot.to_json()?;
        *self.json.lock() = Some(json);
        *self.saves.lock() += 1;
        Ok(())
    }

    fn load(&mut self) -> DockResult<Option<LayoutSnapshot>> {
        self.json
            .lock()
            .as_deref()
            .map(LayoutSnapshot::from_json)
            .transpose()
    }
}

/// Fails every operation, like a read-only or full profile directory.
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

impl LayoutStore for FailingStore {
    fn save(&mut self, _snapshot: &LayoutSnapshot) -> DockResult<()> {
        Err(DockError::Persistence("profile directory is read-only".into()))
    }

    fn load(&mut self) -> DockResult<Option<LayoutSnapshot>> {
        Err(DockError::Persistence("profile directory is unreadable".into()))
    }
}
