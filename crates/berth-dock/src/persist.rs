//! Saving and restoring the dock layout.
//!
//! A [`LayoutSnapshot`] records every panel's slot, stored height, floating rect and
//! visibility plus both docks' widths and visibility. Stores only move the JSON around;
//! the in-memory registry stays authoritative if they fail.

use std::path::PathBuf;

use berth_core::geometry::Rect;
use serde::{Deserialize, Serialize};

use crate::config::DockConfig;
use crate::error::{DockError, DockResult};
use crate::panel::{DockSlot, Panel, PanelId, Placement};
use crate::registry::PanelRegistry;
use crate::types::DockSide;

pub const LAYOUT_VERSION: u32 = 1;

fn layout_version() -> u32 {
    LAYOUT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockRecord {
    pub left_width: f32,
    pub right_width: f32,
    pub left_visible: bool,
    pub right_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRecord {
    pub id: PanelId,
    /// `None` for floating panels.
    pub dock_side: Option<DockSide>,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub sub_row: u32,
    #[serde(default)]
    pub width_ratio: Option<f32>,
    #[serde(default)]
    pub width_locked: bool,
    #[serde(default)]
    pub locked_width: Option<f32>,
    #[serde(default)]
    pub fill: bool,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Stored height, not the laid-out one, so a fill panel restores to its pre-fill size.
    pub height: f32,
    pub visible: bool,
}

impl PanelRecord {
    fn capture(panel: &Panel) -> Self {
        // Panels parked by a hidden sidebar are saved at their dock slot.
        let slot = panel.slot().or(panel.original_dock.as_ref());
        Self {
            id: panel.id.clone(),
            dock_side: slot.map(|s| s.side),
            row: slot.map_or(0, |s| s.row),
            column: slot.map_or(0, |s| s.column),
            sub_row: slot.map_or(0, |s| s.sub_row),
            width_ratio: slot.and_then(|s| s.width_ratio),
            width_locked: slot.is_some_and(DockSlot::is_locked),
            locked_width: slot.and_then(|s| s.width_lock),
            fill: slot.is_some_and(|s| s.fill),
            x: panel.rect.x,
            y: panel.rect.y,
            width: panel.rect.width,
            height: panel.height,
            visible: panel.visible || panel.original_dock.is_some(),
        }
    }

    fn slot(&self) -> Option<DockSlot> {
        let side = self.dock_side?;
        let mut slot = DockSlot::new(side, self.row, self.column, self.sub_row);
        slot.width_ratio = self.width_ratio.filter(|r| *r > 0.0);
        slot.width_lock = if self.width_locked { self.locked_width } else { None };
        slot.fill = self.fill;
        Some(slot)
    }
}

/// Serializable picture of the whole layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    #[serde(default = "layout_version")]
    pub version: u32,
    pub docks: DockRecord,
    #[serde(default)]
    pub panels: Vec<PanelRecord>,
}

impl LayoutSnapshot {
    pub fn capture(registry: &PanelRegistry) -> Self {
        let left = registry.dock(DockSide::Left);
        let right = registry.dock(DockSide::Right);
        Self {
            version: LAYOUT_VERSION,
            docks: DockRecord {
                left_width: left.width,
                right_width: right.width,
                left_visible: left.visible,
                right_visible: right.visible,
            },
            panels: registry.iter().map(PanelRecord::capture).collect(),
        }
    }

    /// Write the snapshot into `registry`. Records for panels that are not registered are
    /// skipped; panels without a record keep their state. Panels of a hidden dock come back
    /// floating and hidden, remembering their slot for when the dock is shown again.
    ///
    /// Returns the number of panels restored.
    pub fn apply(&self, registry: &mut PanelRegistry, config: &DockConfig) -> usize {
        for (side, width, visible) in [
            (DockSide::Left, self.docks.left_width, self.docks.left_visible),
            (DockSide::Right, self.docks.right_width, self.docks.right_visible),
        ] {
            let dock = registry.dock_mut(side);
            dock.width = config.clamp_dock_width(width);
            dock.visible = visible;
        }

        let mut restored = 0;
        for record in &self.panels {
            let dock_visible = record
                .dock_side
                .is_none_or(|side| registry.dock(side).visible);
            let Some(panel) = registry.get_mut(&record.id) else {
                tracing::debug!("Skipping saved layout for unknown panel '{}'", record.id);
                continue;
            };
            let height = record.height.max(config.min_panel_height);
            panel.rect = Rect::new(record.x, record.y, record.width, height);
            panel.height = height;

            match record.slot() {
                Some(slot) if dock_visible => {
                    panel.placement = Placement::Docked(slot);
                    panel.original_dock = None;
                    panel.visible = record.visible;
                }
                Some(slot) => {
                    panel.placement = Placement::Floating;
                    panel.original_dock = Some(slot);
                    panel.visible = false;
                }
                None => {
                    panel.placement = Placement::Floating;
                    panel.original_dock = None;
                    panel.visible = record.visible;
                }
            }
            restored += 1;
        }
        restored
    }

    pub fn to_json(&self) -> DockResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DockResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where snapshots are kept between sessions.
pub trait LayoutStore {
    fn save(&mut self, snapshot: &LayoutSnapshot) -> DockResult<()>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> DockResult<Option<LayoutSnapshot>>;
}

/// Store that keeps nothing. Useful for hosts without a profile directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl LayoutStore for NullStore {
    fn save(&mut self, _snapshot: &LayoutSnapshot) -> DockResult<()> {
        Ok(())
    }

    fn load(&mut self) -> DockResult<Option<LayoutSnapshot>> {
        Ok(None)
    }
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl LayoutStore for FileStore {
    fn save(&mut self, snapshot: &LayoutSnapshot) -> DockResult<()> {
        let json = snapshot.to_json()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DockError::Persistence(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(&self.path, json)
            .map_err(|e| DockError::Persistence(format!("{}: {}", self.path.display(), e)))
    }

    fn load(&mut self) -> DockResult<Option<LayoutSnapshot>> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => LayoutSnapshot::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DockError::Persistence(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PanelId {
        PanelId::new(s).unwrap()
    }

    fn sample_registry() -> PanelRegistry {
        let config = DockConfig::default();
        let mut registry = PanelRegistry::new(&config);
        let mut map = Panel::new(id("map"), Rect::new(0.0, 0.0, 300.0, 250.0));
        let mut slot = DockSlot::new(DockSide::Left, 0, 1, 0);
        slot.width_lock = Some(120.0);
        slot.fill = true;
        map.placement = Placement::Docked(slot);
        registry.insert(map).unwrap();
        registry
            .insert(Panel::new(id("chat"), Rect::new(500.0, 40.0, 320.0, 180.0)))
            .unwrap();
        registry.dock_mut(DockSide::Right).width = 420.0;
        registry
    }

    #[test]
    fn test_json_field_names() {
        let snapshot = LayoutSnapshot::capture(&sample_registry());
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"dockSide\": \"left\""));
        assert!(json.contains("\"widthLocked\": true"));
        assert!(json.contains("\"rightWidth\": 420.0"));
    }

    #[test]
    fn test_apply_restores_state() {
        let snapshot = LayoutSnapshot::capture(&sample_registry());
        let config = DockConfig::default();
        let mut fresh = PanelRegistry::new(&config);
        fresh
            .insert(Panel::new(id("map"), Rect::new(9.0, 9.0, 9.0, 90.0)))
            .unwrap();
        fresh
            .insert(Panel::new(id("chat"), Rect::new(9.0, 9.0, 9.0, 90.0)))
            .unwrap();

        assert_eq!(snapshot.apply(&mut fresh, &config), 2);
        let map = fresh.get(&id("map")).unwrap();
        let slot = map.slot().unwrap();
        assert_eq!((slot.side, slot.column), (DockSide::Left, 1));
        assert_eq!(slot.width_lock, Some(120.0));
        assert!(slot.fill);
        assert_eq!(map.height, 250.0);
        assert!(!fresh.get(&id("chat")).unwrap().is_docked());
        assert_eq!(fresh.dock(DockSide::Right).width, 420.0);
    }

    #[test]
    fn test_hidden_dock_panels_come_back_parked() {
        let mut registry = sample_registry();
        registry.dock_mut(DockSide::Left).visible = false;
        let snapshot = LayoutSnapshot::capture(&registry);

        let config = DockConfig::default();
        let mut fresh = PanelRegistry::new(&config);
        fresh
            .insert(Panel::new(id("map"), Rect::new(0.0, 0.0, 10.0, 100.0)))
            .unwrap();
        snapshot.apply(&mut fresh, &config);

        let map = fresh.get(&id("map")).unwrap();
        assert!(!map.is_docked());
        assert!(!map.visible);
        assert_eq!(map.original_dock.map(|s| s.column), Some(1));
    }

    #[test]
    fn test_unknown_panels_are_skipped() {
        let snapshot = LayoutSnapshot::capture(&sample_registry());
        let config = DockConfig::default();
        let mut fresh = PanelRegistry::new(&config);
        assert_eq!(snapshot.apply(&mut fresh, &config), 0);
    }

    #[test]
    fn test_missing_version_defaults() {
        let json = r#"{ "docks": { "leftWidth": 250, "rightWidth": 300,
                        "leftVisible": true, "rightVisible": false } }"#;
        let snapshot = LayoutSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.version, LAYOUT_VERSION);
        assert!(snapshot.panels.is_empty());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            LayoutSnapshot::from_json("{ not json"),
            Err(DockError::Serialization(_))
        ));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("profile").join("layout.json"));
        assert_eq!(store.load().unwrap(), None);

        let snapshot = LayoutSnapshot::capture(&sample_registry());
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }
}
