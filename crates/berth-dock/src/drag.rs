//! Drag life-cycle for moving panels between docks.

use std::mem;

use berth_core::geometry::Rect;
use berth_core::math::Vec2;

use crate::config::DEFAULT_DRAG_THRESHOLD;
use crate::drop_zone::DropTarget;
use crate::panel::{Panel, PanelId, Placement};
use crate::types::DockSide;

/// Panel state captured at press time, restored when the press turns out to be a click.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSnapshot {
    pub placement: Placement,
    pub rect: Rect,
    pub height: f32,
}

impl PlacementSnapshot {
    pub fn capture(panel: &Panel) -> Self {
        Self {
            placement: panel.placement,
            rect: panel.rect,
            height: panel.height,
        }
    }

    pub fn restore(&self, panel: &mut Panel) {
        panel.placement = self.placement;
        panel.rect = self.rect;
        panel.height = self.height;
    }
}

/// A press on a drag handle that has not moved past the threshold yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PressState {
    pub panel: PanelId,
    pub start: Vec2,
    /// Pointer position relative to the panel origin.
    pub offset: Vec2,
    pub snapshot: PlacementSnapshot,
}

impl PressState {
    pub fn new(panel: &Panel, pointer: Vec2) -> Self {
        Self {
            panel: panel.id.clone(),
            start: pointer,
            offset: pointer - panel.rect.position(),
            snapshot: PlacementSnapshot::capture(panel),
        }
    }
}

/// An active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub panel: PanelId,
    pub start: Vec2,
    pub offset: Vec2,
    pub snapshot: PlacementSnapshot,
    pub current: Vec2,
    /// Last computed drop target, committed on release.
    pub target: Option<DropTarget>,
    pub hovered_side: Option<DockSide>,
}

impl DragSession {
    fn begin(press: PressState, pointer: Vec2) -> Self {
        Self {
            panel: press.panel,
            start: press.start,
            offset: press.offset,
            snapshot: press.snapshot,
            current: pointer,
            target: None,
            hovered_side: None,
        }
    }

    pub fn delta(&self) -> Vec2 {
        self.current - self.start
    }

    /// Where the panel's top-left corner follows the pointer, kept below `min_y`.
    pub fn panel_origin(&self, min_y: f32) -> Vec2 {
        let origin = self.current - self.offset;
        Vec2::new(origin.x, origin.y.max(min_y))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Pressed(PressState),
    Dragging(DragSession),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragInput {
    Press(PressState),
    Move(Vec2),
    Release(Vec2),
}

/// What [`DragManager::advance`] did, for the caller to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum DragTransition {
    /// Input had no effect in the current phase.
    Ignored,
    /// A press was recorded. A drag that was still active is handed back so the caller can
    /// settle its panel.
    Armed { stale: Option<DragSession> },
    /// Pointer moved but stayed within the threshold.
    Pending,
    /// Threshold crossed; the panel should leave its dock.
    Started,
    Moved,
    /// Released without crossing the threshold.
    Clicked(PressState),
    Dropped(DragSession),
}

/// Owns the single drag slot.
#[derive(Debug)]
pub struct DragManager {
    phase: DragPhase,
    threshold: f32,
}

impl Default for DragManager {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragManager {
    pub fn new(threshold: f32) -> Self {
        Self {
            phase: DragPhase::Idle,
            threshold,
        }
    }

    /// Apply one input and move to the next phase.
    pub fn advance(&mut self, input: DragInput) -> DragTransition {
        let (next, transition) = match (mem::take(&mut self.phase), input) {
            (current, DragInput::Press(press)) => {
                let stale = match current {
                    DragPhase::Dragging(session) => Some(session),
                    _ => None,
                };
                (DragPhase::Pressed(press), DragTransition::Armed { stale })
            }
            (DragPhase::Idle, _) => (DragPhase::Idle, DragTransition::Ignored),
            (DragPhase::Pressed(press), DragInput::Move(pointer)) => {
                if Self::exceeds_threshold(press.start, pointer, self.threshold) {
                    (
                        DragPhase::Dragging(DragSession::begin(press, pointer)),
                        DragTransition::Started,
                    )
                } else {
                    (DragPhase::Pressed(press), DragTransition::Pending)
                }
            }
            (DragPhase::Pressed(press), DragInput::Release(_)) => {
                (DragPhase::Idle, DragTransition::Clicked(press))
            }
            (DragPhase::Dragging(mut session), DragInput::Move(pointer)) => {
                session.current = pointer;
                (DragPhase::Dragging(session), DragTransition::Moved)
            }
            (DragPhase::Dragging(mut session), DragInput::Release(pointer)) => {
                session.current = pointer;
                (DragPhase::Idle, DragTransition::Dropped(session))
            }
        };
        self.phase = next;
        transition
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Mouse is down on a handle but has not moved far enough yet.
    pub fn has_pending_drag(&self) -> bool {
        matches!(self.phase, DragPhase::Pressed(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match &mut self.phase {
            DragPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Panel being pressed or dragged, if any.
    pub fn active_panel(&self) -> Option<&PanelId> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Pressed(press) => Some(&press.panel),
            DragPhase::Dragging(session) => Some(&session.panel),
        }
    }

    /// Drop whatever is in progress without side effects.
    pub fn cancel(&mut self) -> DragPhase {
        mem::take(&mut self.phase)
    }

    /// Either axis moving strictly further than `threshold` starts a drag.
    pub fn exceeds_threshold(start: Vec2, current: Vec2, threshold: f32) -> bool {
        let delta = current - start;
        delta.x.abs() > threshold || delta.y.abs() > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_at(x: f32, y: f32) -> PressState {
        let panel = Panel::new(PanelId::new("map").unwrap(), Rect::new(10.0, 20.0, 200.0, 100.0));
        PressState::new(&panel, Vec2::new(x, y))
    }

    #[test]
    fn test_click_without_movement() {
        let mut manager = DragManager::new(5.0);
        manager.advance(DragInput::Press(press_at(50.0, 30.0)));
        assert!(manager.has_pending_drag());

        assert_eq!(manager.advance(DragInput::Move(Vec2::new(53.0, 34.0))), DragTransition::Pending);
        let transition = manager.advance(DragInput::Release(Vec2::new(53.0, 34.0)));
        assert!(matches!(transition, DragTransition::Clicked(_)));
        assert_eq!(manager.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_threshold_is_per_axis_and_strict() {
        assert!(!DragManager::exceeds_threshold(Vec2::ZERO, Vec2::new(5.0, 5.0), 5.0));
        assert!(DragManager::exceeds_threshold(Vec2::ZERO, Vec2::new(0.0, -5.5), 5.0));
        // Diagonal distance over the threshold is not enough on its own.
        assert!(!DragManager::exceeds_threshold(Vec2::ZERO, Vec2::new(4.0, 4.0), 5.0));
    }

    #[test]
    fn test_drag_and_drop() {
        let mut manager = DragManager::new(5.0);
        manager.advance(DragInput::Press(press_at(50.0, 30.0)));
        assert_eq!(manager.advance(DragInput::Move(Vec2::new(70.0, 30.0))), DragTransition::Started);
        assert!(manager.is_dragging());
        assert_eq!(manager.advance(DragInput::Move(Vec2::new(90.0, 40.0))), DragTransition::Moved);

        let session = manager.session().unwrap();
        assert_eq!(session.delta(), Vec2::new(40.0, 10.0));
        assert_eq!(session.panel_origin(0.0), Vec2::new(50.0, 30.0));

        match manager.advance(DragInput::Release(Vec2::new(95.0, 40.0))) {
            DragTransition::Dropped(session) => assert_eq!(session.current, Vec2::new(95.0, 40.0)),
            other => panic!("unexpected transition {other:?}"),
        }
        assert!(!manager.is_dragging());
    }

    #[test]
    fn test_origin_clamped_below_header() {
        let mut manager = DragManager::new(5.0);
        manager.advance(DragInput::Press(press_at(50.0, 30.0)));
        manager.advance(DragInput::Move(Vec2::new(50.0, 0.0)));
        let origin = manager.session().unwrap().panel_origin(24.0);
        assert_eq!(origin.y, 24.0);
    }

    #[test]
    fn test_press_replaces_active_session() {
        let mut manager = DragManager::new(5.0);
        manager.advance(DragInput::Press(press_at(50.0, 30.0)));
        manager.advance(DragInput::Move(Vec2::new(80.0, 30.0)));
        match manager.advance(DragInput::Press(press_at(10.0, 10.0))) {
            DragTransition::Armed { stale } => assert!(stale.is_some()),
            other => panic!("unexpected transition {other:?}"),
        }
        assert!(manager.has_pending_drag());
    }

    #[test]
    fn test_idle_ignores_moves() {
        let mut manager = DragManager::new(5.0);
        assert_eq!(manager.advance(DragInput::Move(Vec2::ONE)), DragTransition::Ignored);
        assert_eq!(manager.advance(DragInput::Release(Vec2::ONE)), DragTransition::Ignored);
    }
}
