//! Unified pointer input
//!
//! Mouse, touch and pointer events all arrive as one [`PointerEvent`] so the
//! drag state machine never cares which browser API produced them.

use glam::Vec2;

use super::entity::EntityId;

/// Which browser API produced an event, plus its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Touch(i32),
    Pointer(i32),
}

/// Gesture phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One pointer-like input event, in play-area pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pointer: PointerId,
    /// `None` when the event carried no coordinates (e.g. `touchend`)
    pub pos: Option<Vec2>,
    /// Item under the pointer, for `Start`
    pub target: Option<EntityId>,
}

impl PointerEvent {
    pub fn start(pointer: PointerId, pos: Vec2, target: EntityId) -> Self {
        Self {
            phase: PointerPhase::Start,
            pointer,
            pos: Some(pos),
            target: Some(target),
        }
    }

    pub fn moved(pointer: PointerId, pos: Vec2) -> Self {
        Self {
            phase: PointerPhase::Move,
            pointer,
            pos: Some(pos),
            target: None,
        }
    }

    pub fn end(pointer: PointerId, pos: Option<Vec2>) -> Self {
        Self {
            phase: PointerPhase::End,
            pointer,
            pos,
            target: None,
        }
    }

    pub fn cancel(pointer: PointerId) -> Self {
        Self {
            phase: PointerPhase::Cancel,
            pointer,
            pos: None,
            target: None,
        }
    }
}

/// Last known pointer position, fed to the steering step
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    pos: Option<Vec2>,
}

impl PointerTracker {
    pub fn update(&mut self, pos: Vec2) {
        self.pos = Some(pos);
    }

    pub fn pos(&self) -> Option<Vec2> {
        self.pos
    }
}
