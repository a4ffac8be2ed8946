//! Per-tick steering: drift, damping, pointer repulsion, bounds
//!
//! Loosely physical: no mass and no item-item collisions, just a damped
//! velocity nudged by noise and pushed away from the pointer.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityStore};
use super::geometry::{Rect, random_between, random_direction};
use crate::consts::*;

/// Inputs shared by every item for one tick
#[derive(Debug, Clone, Copy)]
pub struct SteeringParams {
    pub level: u32,
    pub escape_radius: f32,
    pub play_area: Rect,
    pub viewport_width: f32,
    /// Last known pointer position
    pub pointer: Option<Vec2>,
}

impl SteeringParams {
    /// Where item centers may sit after a step
    pub fn bounds(&self) -> Rect {
        self.play_area.inset(BOUNDS_INSET)
    }
}

/// Repulsion impulse for an item whose center is at `center`
///
/// Zero outside the escape reach. Points from the pointer to the item and
/// grows with how deep the pointer sits inside the reach.
pub fn repulsion<R: Rng>(
    center: Vec2,
    width: f32,
    pointer: Vec2,
    escape_radius: f32,
    level: u32,
    rng: &mut R,
) -> Vec2 {
    let reach = escape_radius + width * 0.5;
    let offset = center - pointer;
    let dist = offset.length();
    if dist >= reach {
        return Vec2::ZERO;
    }
    let dir = if dist > 0.0 {
        offset / dist
    } else {
        random_direction(rng)
    };
    let strength = (reach - dist) * REPULSION_GAIN * (1.0 + level as f32 * 0.06);
    dir * strength
}

/// Advance one free item by one tick; returns the repulsion impulse applied
pub fn steer<R: Rng>(entity: &mut Entity, params: &SteeringParams, rng: &mut R) -> Vec2 {
    let level = params.level as f32;

    // Organic drift
    let jitter = JITTER * (0.7 + level * 0.06);
    entity.vel.x += random_between(rng, -jitter, jitter);
    entity.vel.y += random_between(rng, -jitter, jitter);

    entity.vel *= DAMPING;

    let impulse = match params.pointer {
        Some(pointer) => repulsion(
            entity.pos,
            entity.width(params.viewport_width),
            pointer,
            params.escape_radius,
            params.level,
            rng,
        ),
        None => Vec2::ZERO,
    };
    entity.vel += impulse;

    entity.pos += entity.vel * (1.0 + level * 0.2);
    entity.pos = params.bounds().clamp_point(entity.pos);

    if rng.random_bool(WIGGLE_TOGGLE_CHANCE) {
        entity.wiggle = !entity.wiggle;
    }

    impulse
}

/// Steer every item that is not held by the pointer
pub fn step_all<R: Rng>(store: &mut EntityStore, params: &SteeringParams, rng: &mut R) {
    for entity in store.iter_mut() {
        entity.settling_ticks = entity.settling_ticks.saturating_sub(1);
        if entity.held {
            continue;
        }
        steer(entity, params, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn params(pointer: Option<Vec2>) -> SteeringParams {
        SteeringParams {
            level: 1,
            escape_radius: 70.0,
            play_area: Rect::from_origin_size(0.0, 0.0, 800.0, 600.0),
            viewport_width: 800.0,
            pointer,
        }
    }

    fn entity_at(pos: Vec2, vel: Vec2) -> Entity {
        Entity {
            id: crate::sim::EntityId(1),
            pos,
            vel,
            size_vw: 8.0,
            glyph: "🍌".to_string(),
            wiggle: true,
            held: false,
            settling_ticks: 0,
        }
    }

    #[test]
    fn test_repulsion_outside_reach_is_zero() {
        let mut rng = Pcg32::seed_from_u64(1);
        let impulse = repulsion(
            Vec2::new(500.0, 500.0),
            64.0,
            Vec2::new(0.0, 0.0),
            70.0,
            1,
            &mut rng,
        );
        assert_eq!(impulse, Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_pushes_away() {
        let mut rng = Pcg32::seed_from_u64(1);
        let center = Vec2::new(100.0, 100.0);
        let pointer = Vec2::new(80.0, 100.0);
        let impulse = repulsion(center, 64.0, pointer, 70.0, 1, &mut rng);
        assert!(impulse.x > 0.0);
        assert!(impulse.y.abs() < 1e-5);
        // (70 + 32 - 20) * 0.06 * 1.06
        assert!((impulse.length() - 82.0 * 0.06 * 1.06).abs() < 1e-3);
    }

    #[test]
    fn test_repulsion_degenerate_distance_is_finite() {
        let mut rng = Pcg32::seed_from_u64(9);
        let p = Vec2::new(50.0, 50.0);
        let impulse = repulsion(p, 64.0, p, 70.0, 2, &mut rng);
        assert!(impulse.is_finite());
        assert!(impulse.length() > 0.0);
    }

    #[test]
    fn test_damping_without_pointer() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut e = entity_at(Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.0));
        for _ in 0..200 {
            steer(&mut e, &params(None), &mut rng);
        }
        // 5 * 0.995^200 is ~1.8 plus bounded drift
        assert!(e.vel.x < 4.0);
    }

    #[test]
    fn test_held_items_do_not_move() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut store = EntityStore::new();
        let area = Rect::from_origin_size(0.0, 0.0, 800.0, 600.0);
        let ids = store.spawn(2, 1, &area, &["🍌".to_string()], &mut rng);
        let held = ids[0];
        store.get_mut(held).unwrap().held = true;
        let before = store.get(held).unwrap().pos;

        for _ in 0..50 {
            step_all(&mut store, &params(Some(before)), &mut rng);
        }
        assert_eq!(store.get(held).unwrap().pos, before);
    }

    #[test]
    fn test_settle_cue_counts_down() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut store = EntityStore::new();
        let area = Rect::from_origin_size(0.0, 0.0, 800.0, 600.0);
        let id = store.spawn(1, 1, &area, &["🍌".to_string()], &mut rng)[0];
        store.get_mut(id).unwrap().settling_ticks = 2;
        step_all(&mut store, &params(None), &mut rng);
        step_all(&mut store, &params(None), &mut rng);
        step_all(&mut store, &params(None), &mut rng);
        assert_eq!(store.get(id).unwrap().settling_ticks, 0);
    }

    #[test]
    fn test_displacement_scales_with_level() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut p = params(None);
        p.level = 5;
        let start = Vec2::new(400.0, 300.0);
        let mut e = entity_at(start, Vec2::new(3.0, -2.0));
        steer(&mut e, &p, &mut rng);
        // Level 5 moves twice the velocity per tick
        let expected = e.vel * 2.0;
        assert!(((e.pos - start) - expected).length() < 1e-4);
    }

    #[test]
    fn test_wiggle_flips_now_and_then() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut e = entity_at(Vec2::new(400.0, 300.0), Vec2::ZERO);
        let mut flips = 0;
        for _ in 0..5_000 {
            let before = e.wiggle;
            steer(&mut e, &params(None), &mut rng);
            if e.wiggle != before {
                flips += 1;
            }
        }
        // About 15 expected at 0.3% per tick
        assert!(flips > 0);
        assert!(flips < 100);
    }

    proptest! {
        #[test]
        fn stays_in_bounds_after_step(
            x in -500.0f32..1500.0,
            y in -500.0f32..1500.0,
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
            px in -100.0f32..900.0,
            py in -100.0f32..700.0,
            level in 1u32..13,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut p = params(Some(Vec2::new(px, py)));
            p.level = level;
            let mut e = entity_at(Vec2::new(x, y), Vec2::new(vx, vy));
            steer(&mut e, &p, &mut rng);
            prop_assert!(e.pos.x >= BOUNDS_INSET && e.pos.x <= 800.0 - BOUNDS_INSET);
            prop_assert!(e.pos.y >= BOUNDS_INSET && e.pos.y <= 600.0 - BOUNDS_INSET);
        }

        #[test]
        fn repulsion_never_points_toward_pointer(
            cx in 0.0f32..800.0,
            cy in 0.0f32..600.0,
            dx in -120.0f32..120.0,
            dy in -120.0f32..120.0,
            level in 1u32..13,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let center = Vec2::new(cx, cy);
            let pointer = center - Vec2::new(dx, dy);
            let impulse = repulsion(center, 64.0, pointer, 70.0, level, &mut rng);
            prop_assert!(impulse.dot(center - pointer) >= 0.0);
        }
    }
}
