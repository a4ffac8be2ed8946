//! Fixed timestep simulation tick
//!
//! `tick` advances the game by one step. `FrameScheduler` turns real frame
//! deltas into whole ticks and can be stopped through a `LoopHandle`.

use std::cell::Cell;
use std::rc::Rc;

use super::state::{GamePhase, GameState};
use super::steering::{SteeringParams, step_all};
use crate::consts::*;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState) {
    state.time_ticks += 1;

    // Bin pop reset, paw shuffles
    state.run_deferred();

    let params = SteeringParams {
        level: state.progression.level,
        escape_radius: state.config.escape_radius,
        play_area: state.play_area,
        viewport_width: state.viewport_width,
        pointer: state.pointer.pos(),
    };
    step_all(&mut state.entities, &params, &mut state.rng);

    if state.phase == GamePhase::Playing {
        let chance = state.config.disturbance_chance_per_second;
        if let Some(paw) = state.chaos.poll(chance, &mut state.rng) {
            state.show_paw(paw);
        }
    }
}

/// Shared stop flag for the animation loop
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl Default for LoopHandle {
    fn default() -> Self {
        Self {
            running: Rc::new(Cell::new(true)),
        }
    }
}

impl LoopHandle {
    /// Stop after the current frame; the loop will not reschedule itself
    pub fn stop(&self) {
        self.running.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Converts frame time into fixed ticks
#[derive(Debug, Default)]
pub struct FrameScheduler {
    accumulator: f32,
    handle: LoopHandle,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Run the ticks owed for a frame of `dt` seconds; returns how many ran
    pub fn advance(&mut self, state: &mut GameState, dt: f32) -> u32 {
        if !self.handle.is_running() {
            return 0;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::GameEvent;

    #[test]
    fn test_tick_counts_and_keeps_items() {
        let mut state = GameState::new(12345, GameConfig::default());
        state.start();
        for _ in 0..10 {
            tick(&mut state);
        }
        assert_eq!(state.time_ticks, 10);
        assert_eq!(state.entities.len(), 3);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, GameConfig::default());
        let mut state2 = GameState::new(99999, GameConfig::default());
        state1.start();
        state2.start();

        for _ in 0..500 {
            tick(&mut state1);
            tick(&mut state2);
        }

        for (a, b) in state1.entities.iter().zip(state2.entities.iter()) {
            assert_eq!(a.id, b.id);
            assert!((a.pos - b.pos).length() < 0.0001);
        }
    }

    #[test]
    fn test_no_paw_before_start() {
        let config = GameConfig {
            disturbance_chance_per_second: 1.0,
            ..GameConfig::default()
        };
        let mut state = GameState::new(5, config);
        for _ in 0..CHAOS_CHECK_INTERVAL_TICKS * 20 {
            tick(&mut state);
        }
        assert!(state.paws.is_empty());
        assert!(state.deferred.is_empty());
    }

    #[test]
    fn test_paw_shuffles_after_delay() {
        let config = GameConfig {
            disturbance_chance_per_second: 1.0,
            ..GameConfig::default()
        };
        let mut state = GameState::new(5, config);
        state.start();
        state.drain_events();

        let mut shown_at = None;
        for _ in 0..CHAOS_CHECK_INTERVAL_TICKS * 20 {
            tick(&mut state);
            if state.paws.len() == 1 {
                shown_at = Some(state.time_ticks);
                break;
            }
        }
        let shown_at = shown_at.expect("paw never appeared");

        while state.time_ticks < shown_at + PAW_DELAY_TICKS {
            tick(&mut state);
        }
        assert!(state.paws.is_empty());
        assert_eq!(state.entities.len(), 3);
        let shuffled = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PawShuffled { .. }))
            .count();
        assert_eq!(shuffled, 1);
    }

    #[test]
    fn test_scheduler_fixed_steps() {
        let mut state = GameState::new(1, GameConfig::default());
        let mut scheduler = FrameScheduler::new();
        assert_eq!(scheduler.advance(&mut state, SIM_DT * 2.5), 2);
        assert_eq!(scheduler.advance(&mut state, SIM_DT * 0.6), 1);
        assert_eq!(state.time_ticks, 3);
    }

    #[test]
    fn test_scheduler_caps_substeps() {
        let mut state = GameState::new(1, GameConfig::default());
        let mut scheduler = FrameScheduler::new();
        assert_eq!(scheduler.advance(&mut state, 5.0), MAX_SUBSTEPS);
        assert!(scheduler.advance(&mut state, 0.0) <= 1);
    }

    #[test]
    fn test_stopped_loop_runs_nothing() {
        let mut state = GameState::new(1, GameConfig::default());
        let mut scheduler = FrameScheduler::new();
        let handle = scheduler.handle();
        handle.stop();
        assert!(!scheduler.handle().is_running());
        assert_eq!(scheduler.advance(&mut state, 1.0), 0);
        assert_eq!(state.time_ticks, 0);
    }
}
