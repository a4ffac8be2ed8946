//! Pointer drag state machine
//!
//! `Idle -> Dragging -> Idle`, with at most one live drag. A start while a
//! drag is live is ignored, which also swallows the duplicate
//! `pointerdown`/`mousedown`/`touchstart` a browser fires for one gesture.

use glam::Vec2;

use super::entity::{EntityId, EntityStore};
use super::geometry::Rect;
use super::input::{PointerEvent, PointerId, PointerPhase};
use crate::config::DropMode;
use crate::consts::SETTLE_TICKS;

/// One in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub entity: EntityId,
    /// Pointer position minus item center at grab time
    pub offset: Vec2,
    pub pointer: PointerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What an input event did to the drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTransition {
    /// No state change
    Ignored,
    Began(EntityId),
    Moved(EntityId),
    /// Session closed; `hit` is true when the drop landed in the bin.
    /// On a hit the caller removes the item; on a miss it is already free.
    Dropped { entity: EntityId, hit: bool },
    /// Session closed because its item no longer exists
    Abandoned(EntityId),
}

/// Bin geometry needed to resolve a drop
#[derive(Debug, Clone, Copy)]
pub struct DropTarget {
    pub bin: Rect,
    pub mode: DropMode,
    pub viewport_width: f32,
}

#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Feed one event through the machine
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        store: &mut EntityStore,
        target: &DropTarget,
    ) -> DragTransition {
        match event.phase {
            PointerPhase::Start => self.begin(event, store),
            PointerPhase::Move => self.drag_to(event, store),
            PointerPhase::End => self.finish(event, store, target, false),
            PointerPhase::Cancel => self.finish(event, store, target, true),
        }
    }

    fn begin(&mut self, event: &PointerEvent, store: &mut EntityStore) -> DragTransition {
        if self.is_dragging() {
            return DragTransition::Ignored;
        }
        let (Some(pos), Some(id)) = (event.pos, event.target) else {
            return DragTransition::Ignored;
        };
        let Some(entity) = store.get_mut(id) else {
            return DragTransition::Ignored;
        };
        if entity.held {
            return DragTransition::Ignored;
        }

        entity.held = true;
        entity.settling_ticks = 0;
        self.state = DragState::Dragging(DragSession {
            entity: id,
            offset: pos - entity.pos,
            pointer: event.pointer,
        });
        log::debug!("Drag start {} via {:?}", id, event.pointer);
        DragTransition::Began(id)
    }

    fn drag_to(&mut self, event: &PointerEvent, store: &mut EntityStore) -> DragTransition {
        let DragState::Dragging(session) = self.state else {
            return DragTransition::Ignored;
        };
        if session.pointer != event.pointer {
            return DragTransition::Ignored;
        }
        let Some(pos) = event.pos else {
            return DragTransition::Ignored;
        };
        let Some(entity) = store.get_mut(session.entity) else {
            self.state = DragState::Idle;
            return DragTransition::Abandoned(session.entity);
        };

        entity.pos = pos - session.offset;
        DragTransition::Moved(session.entity)
    }

    fn finish(
        &mut self,
        event: &PointerEvent,
        store: &mut EntityStore,
        target: &DropTarget,
        cancelled: bool,
    ) -> DragTransition {
        let DragState::Dragging(session) = self.state else {
            return DragTransition::Ignored;
        };
        if session.pointer != event.pointer {
            return DragTransition::Ignored;
        }
        self.state = DragState::Idle;

        let Some(entity) = store.get_mut(session.entity) else {
            return DragTransition::Abandoned(session.entity);
        };

        let hit = !cancelled && {
            let drop_point = event.pos.unwrap_or(entity.pos);
            match target.mode {
                DropMode::Point => target.bin.contains(drop_point),
                DropMode::Overlap => entity.rect(target.viewport_width).intersects(&target.bin),
            }
        };

        if !hit {
            entity.held = false;
            entity.settling_ticks = SETTLE_TICKS;
        }
        log::debug!(
            "Drag end {} (hit: {}, cancelled: {})",
            session.entity,
            hit,
            cancelled
        );
        DragTransition::Dropped {
            entity: session.entity,
            hit,
        }
    }
}
