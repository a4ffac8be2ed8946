//! Score and level progression
//!
//! A level is cleared by catching `trash_count` items. The next wave is one
//! `level_increase` bigger. Clearing `max_level` ends the game.

use crate::config::GameConfig;

/// What a catch did to the progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Threshold not reached yet (or the game is already over)
    Continue,
    /// Advanced to `level`; spawn a wave of `spawn` items
    LevelUp { level: u32, spawn: u32 },
    /// Final level cleared
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionState {
    pub level: u32,
    /// Lifetime catches
    pub recycled: u32,
    pub cleaned_this_level: u32,
    /// Current wave size, also the catch threshold for this level
    pub trash_count: u32,
    pub completed: bool,
}

impl ProgressionState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            level: 1,
            recycled: 0,
            cleaned_this_level: 0,
            trash_count: config.trash_count_for_level(1),
            completed: false,
        }
    }

    /// Count one item in the bin and decide whether the level is cleared
    pub fn register_catch(&mut self, config: &GameConfig) -> ProgressOutcome {
        self.recycled += 1;
        if self.completed {
            return ProgressOutcome::Continue;
        }
        self.cleaned_this_level += 1;
        if self.cleaned_this_level < self.trash_count {
            return ProgressOutcome::Continue;
        }

        if self.level >= config.max_level {
            self.completed = true;
            log::info!("All {} levels cleared", config.max_level);
            return ProgressOutcome::Completed;
        }

        self.level += 1;
        self.trash_count = config.trash_count_for_level(self.level);
        self.cleaned_this_level = 0;
        log::info!("Level up: {} ({} items)", self.level, self.trash_count);
        ProgressOutcome::LevelUp {
            level: self.level,
            spawn: self.trash_count,
        }
    }
}
