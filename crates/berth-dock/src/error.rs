//! Error types for the docking API.

use crate::panel::PanelId;

/// Errors reported at the public API boundary.
///
/// Layout and drop detection never return these; they clamp or fall back instead.
#[derive(Debug, Clone, PartialEq)]
pub enum DockError {
    /// Panel identifiers must be non-empty.
    InvalidPanelId(String),
    /// A panel with this id is already registered.
    DuplicatePanel(PanelId),
    /// No panel with this id is registered.
    PanelNotFound(PanelId),
    /// The operation needs a docked panel.
    NotDocked(PanelId),
    /// Fill is only allowed on the bottom panel of a column in the dock's last row.
    FillIneligible(PanelId),
    /// Width lock is only allowed in rows with more than one column.
    LockIneligible(PanelId),
    /// The layout store failed to save or load.
    Persistence(String),
    /// A layout snapshot could not be encoded or decoded.
    Serialization(String),
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DockError::InvalidPanelId(raw) => write!(f, "Invalid panel id {:?}", raw),
            DockError::DuplicatePanel(id) => write!(f, "Panel '{}' is already registered", id),
            DockError::PanelNotFound(id) => write!(f, "Panel '{}' not found", id),
            DockError::NotDocked(id) => write!(f, "Panel '{}' is not docked", id),
            DockError::FillIneligible(id) => write!(
                f,
                "Panel '{}' cannot fill: it is not the bottom panel of the last row",
                id
            ),
            DockError::LockIneligible(id) => write!(
                f,
                "Panel '{}' cannot lock its width: its row has a single column",
                id
            ),
            DockError::Persistence(msg) => write!(f, "Layout persistence failed: {}", msg),
            DockError::Serialization(msg) => write!(f, "Layout serialization failed: {}", msg),
        }
    }
}

impl std::error::Error for DockError {}

impl From<serde_json::Error> for DockError {
    fn from(err: serde_json::Error) -> Self {
        DockError::Serialization(err.to_string())
    }
}

/// Result type for docking operations.
pub type DockResult<T> = Result<T, DockError>;
