//! Simulation module
//!
//! All gameplay logic lives here, with no browser dependencies:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Output goes through `GameEvent`s, never straight to the DOM or audio

pub mod disturbance;
pub mod drag;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod progression;
pub mod state;
pub mod steering;
pub mod tick;

pub use disturbance::{DisturbanceScheduler, PawId};
pub use drag::{DragMachine, DragSession, DragState, DragTransition, DropTarget};
pub use entity::{Entity, EntityId, EntityStore};
pub use geometry::Rect;
pub use input::{PointerEvent, PointerId, PointerPhase, PointerTracker};
pub use progression::{ProgressOutcome, ProgressionState};
pub use state::{CHAMPION_TEXT, Deferred, GameEvent, GamePhase, GameState, Paw, Scheduled};
pub use steering::{SteeringParams, repulsion, steer, step_all};
pub use tick::{FrameScheduler, LoopHandle, tick};
