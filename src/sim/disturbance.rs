//! The chaotic paw
//!
//! Every so often a paw print appears and, a moment later, scatters about a
//! third of the items. It only moves items around; the count never changes.

use glam::Vec2;
use rand::Rng;
use rand::seq::index;

use super::entity::{EntityId, EntityStore};
use super::geometry::{Rect, random_between};
use crate::consts::*;

/// Identity of one paw marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PawId(pub u32);

/// Decides when the paw shows up
#[derive(Debug, Clone, Default)]
pub struct DisturbanceScheduler {
    ticks_since_check: u64,
    next_paw: u32,
}

impl DisturbanceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick; rolls once per check interval.
    /// Returns a fresh paw id when the roll succeeds.
    pub fn poll<R: Rng>(&mut self, chance_per_second: f64, rng: &mut R) -> Option<PawId> {
        self.ticks_since_check += 1;
        if self.ticks_since_check < CHAOS_CHECK_INTERVAL_TICKS {
            return None;
        }
        self.ticks_since_check = 0;

        let p = (chance_per_second * CHAOS_ROLL_SCALE).clamp(0.0, 1.0);
        if !rng.random_bool(p) {
            return None;
        }
        self.next_paw += 1;
        Some(PawId(self.next_paw))
    }
}

/// Where the paw marker is drawn: away from the edges, biased above the bin
pub fn paw_position<R: Rng>(play_area: &Rect, rng: &mut R) -> Vec2 {
    play_area
        .fraction(Vec2::new(0.1, 0.1), Vec2::new(0.9, 0.8))
        .random_point(rng)
}

/// How many of `n` items a shuffle moves
pub fn shuffle_count(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    (n * CHAOS_PERCENT / 100).clamp(1, n)
}

/// Scatter a sample of the free items; returns the ones that moved
pub fn shuffle<R: Rng>(store: &mut EntityStore, play_area: &Rect, rng: &mut R) -> Vec<EntityId> {
    let candidates: Vec<EntityId> = store.iter().filter(|e| !e.held).map(|e| e.id).collect();
    let amount = shuffle_count(candidates.len());
    if amount == 0 {
        return Vec::new();
    }

    let region = play_area.inset(CHAOS_PADDING);
    let chosen: Vec<EntityId> = index::sample(rng, candidates.len(), amount)
        .into_iter()
        .map(|i| candidates[i])
        .collect();

    for id in &chosen {
        let pos = region.random_point(rng);
        let vel = Vec2::new(
            random_between(rng, -CHAOS_SPEED, CHAOS_SPEED),
            random_between(rng, -CHAOS_SPEED, CHAOS_SPEED),
        );
        if let Some(entity) = store.get_mut(*id) {
            entity.pos = pos;
            entity.vel = vel;
        }
    }
    chosen
}
