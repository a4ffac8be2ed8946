//! Trash items and the store that owns them

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::geometry::{Rect, random_between};
use crate::consts::*;
use crate::{size_vw_for_level, vw_to_px};

/// Stable identity of a trash item (never reused within a game)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trash-{}", self.0)
    }
}

/// A draggable trash item
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Center, in play-area pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Glyph size in percent of viewport width
    pub size_vw: f32,
    pub glyph: String,
    /// Idle wiggle animation on/off
    pub wiggle: bool,
    /// Currently grabbed by the pointer (steering skips it)
    pub held: bool,
    /// Remaining ticks of the bounce-back cue after a missed drop
    pub settling_ticks: u32,
}

impl Entity {
    /// Rendered width in pixels
    #[inline]
    pub fn width(&self, viewport_width: f32) -> f32 {
        vw_to_px(self.size_vw, viewport_width)
    }

    /// Bounding square in play-area pixels
    pub fn rect(&self, viewport_width: f32) -> Rect {
        Rect::from_center_size(self.pos, self.width(viewport_width))
    }
}

/// All active trash items, in spawn order
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn `count` items at random spots inside the padded play area
    pub fn spawn<R: Rng>(
        &mut self,
        count: u32,
        level: u32,
        play_area: &Rect,
        glyphs: &[String],
        rng: &mut R,
    ) -> Vec<EntityId> {
        let region = play_area.inset(SPAWN_PADDING);
        let speed_scale = 1.0 + level as f32 * 0.12;
        let size_vw = size_vw_for_level(level);

        let mut spawned = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = self.next_entity_id();
            let glyph = glyphs.choose(rng).cloned().unwrap_or_default();
            let pos = region.random_point(rng);
            let vel = Vec2::new(
                random_between(rng, -SPAWN_SPEED, SPAWN_SPEED),
                random_between(rng, -SPAWN_SPEED, SPAWN_SPEED),
            ) * speed_scale;
            self.entities.push(Entity {
                id,
                pos,
                vel,
                size_vw,
                glyph,
                wiggle: true,
                held: false,
                settling_ticks: 0,
            });
            spawned.push(id);
        }
        spawned
    }

    /// Remove an item; `None` if it was already gone
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every item (ids keep counting up)
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn glyphs() -> Vec<String> {
        vec!["🍌".to_string(), "🍕".to_string()]
    }

    #[test]
    fn test_spawn_inside_padded_area() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut store = EntityStore::new();
        let area = Rect::from_origin_size(0.0, 0.0, 400.0, 300.0);
        let ids = store.spawn(20, 3, &area, &glyphs(), &mut rng);

        assert_eq!(ids.len(), 20);
        assert_eq!(store.len(), 20);
        let padded = area.inset(SPAWN_PADDING);
        let max_speed = SPAWN_SPEED * (1.0 + 3.0 * 0.12);
        for e in store.iter() {
            assert!(padded.contains(e.pos));
            assert!(e.vel.x.abs() <= max_speed && e.vel.y.abs() <= max_speed);
            assert_eq!(e.size_vw, size_vw_for_level(3));
            assert!(glyphs().contains(&e.glyph));
            assert!(!e.held);
        }
    }

    #[test]
    fn test_ids_unique_and_never_reused() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut store = EntityStore::new();
        let area = Rect::from_origin_size(0.0, 0.0, 100.0, 100.0);
        let first = store.spawn(3, 1, &area, &glyphs(), &mut rng);
        store.clear();
        let second = store.spawn(3, 1, &area, &glyphs(), &mut rng);
        for id in &second {
            assert!(!first.contains(id));
        }
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut store = EntityStore::new();
        let area = Rect::from_origin_size(0.0, 0.0, 100.0, 100.0);
        let ids = store.spawn(2, 1, &area, &glyphs(), &mut rng);

        assert!(store.destroy(ids[0]).is_some());
        assert!(store.destroy(ids[0]).is_none());
        assert_eq!(store.len(), 1);
        assert!(!store.contains(ids[0]));
        assert!(store.contains(ids[1]));
    }

    #[test]
    fn test_entity_width_scales_with_viewport() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut store = EntityStore::new();
        let area = Rect::from_origin_size(0.0, 0.0, 100.0, 100.0);
        let id = store.spawn(1, 0, &area, &glyphs(), &mut rng)[0];
        let e = store.get(id).unwrap();
        assert!((e.width(1000.0) - 100.0).abs() < 1e-3);
        assert!((e.rect(1000.0).width() - 100.0).abs() < 1e-3);
    }
}
