//! Game state and core simulation types
//!
//! `GameState` is the single context object the loop, the paw and the input
//! handlers share. Nothing in the simulation lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::disturbance::{self, DisturbanceScheduler, PawId};
use super::drag::{DragMachine, DragTransition, DropTarget};
use super::entity::{EntityId, EntityStore};
use super::geometry::Rect;
use super::input::{PointerEvent, PointerPhase, PointerTracker};
use super::progression::{ProgressOutcome, ProgressionState};
use crate::config::GameConfig;
use crate::consts::*;

/// Status line once every level is cleared
pub const CHAMPION_TEXT: &str = "You're a Park Champion! 🏆 All levels cleared!";

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first tap/click
    Waiting,
    Playing,
    /// Final level cleared
    Complete,
}

/// Something the front end should react to (sound, DOM, text)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    /// Attach gesture listeners, suppress default browser drag
    DragStarted(EntityId),
    /// Detach gesture listeners
    DragEnded(EntityId),
    /// Item landed in the bin (play the catch sound)
    Caught(EntityId),
    /// Item dropped outside the bin (bounce cue)
    Released(EntityId),
    BinPop,
    BinPopEnd,
    LevelUp { level: u32, spawned: Vec<EntityId> },
    Completed,
    PawShown { paw: PawId, pos: Vec2 },
    PawShuffled { paw: PawId, moved: Vec<EntityId> },
    /// Status line text to show for `duration_ticks`
    Status { text: String, duration_ticks: u64 },
}

/// Fire-and-forget work due at a later tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    BinPopEnd,
    Shuffle(PawId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub due_tick: u64,
    pub task: Deferred,
}

/// A paw marker currently on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paw {
    pub id: PawId,
    pub pos: Vec2,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub entities: EntityStore,
    pub pointer: PointerTracker,
    pub drag: DragMachine,
    pub chaos: DisturbanceScheduler,
    pub progression: ProgressionState,
    /// Play area in its own coordinates (origin at the top-left)
    pub play_area: Rect,
    /// Bin in play-area coordinates
    pub bin: Rect,
    pub viewport_width: f32,
    pub paws: Vec<Paw>,
    pub bin_popping: bool,
    pub deferred: Vec<Scheduled>,
    /// Events since the front end last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let progression = ProgressionState::new(&config);
        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Waiting,
            time_ticks: 0,
            entities: EntityStore::new(),
            pointer: PointerTracker::default(),
            drag: DragMachine::new(),
            chaos: DisturbanceScheduler::new(),
            progression,
            play_area: Rect::from_origin_size(0.0, 0.0, 800.0, 600.0),
            bin: Rect::from_origin_size(680.0, 480.0, 100.0, 100.0),
            viewport_width: 800.0,
            paws: Vec::new(),
            bin_popping: false,
            deferred: Vec::new(),
            events: Vec::new(),
        };
        state.status("Tap / click to start", MESSAGE_DURATION_TICKS);
        state
    }

    /// Refresh the live layout (call on resize or every frame)
    pub fn set_layout(&mut self, play_area_size: Vec2, bin: Rect, viewport_width: f32) {
        self.play_area = Rect::new(Vec2::ZERO, play_area_size.max(Vec2::ZERO));
        self.bin = bin;
        self.viewport_width = viewport_width;
    }

    /// First interaction: spawn the opening wave. No-op once started.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Waiting {
            return;
        }
        self.phase = GamePhase::Playing;
        let count = self.progression.trash_count;
        self.spawn_wave(count);
        log::info!("Game started with seed {}", self.seed);
        self.events.push(GameEvent::Started);
        self.status(
            &format!(
                "Go! Level {} - catch the trash and drag to the bin ♻️",
                self.progression.level
            ),
            MESSAGE_DURATION_TICKS,
        );
    }

    /// Feed one pointer event through the tracker and the drag machine
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> DragTransition {
        if let Some(pos) = event.pos {
            if matches!(event.phase, PointerPhase::Start | PointerPhase::Move) {
                self.pointer.update(pos);
            }
        }
        if event.phase == PointerPhase::Start {
            self.start();
        }

        let target = DropTarget {
            bin: self.bin,
            mode: self.config.drop_mode,
            viewport_width: self.viewport_width,
        };
        let transition = self.drag.handle(event, &mut self.entities, &target);

        match transition {
            DragTransition::Ignored | DragTransition::Moved(_) => {}
            DragTransition::Began(id) => self.events.push(GameEvent::DragStarted(id)),
            DragTransition::Dropped { entity, hit: true } => {
                self.events.push(GameEvent::DragEnded(entity));
                self.catch(entity);
            }
            DragTransition::Dropped { entity, hit: false } => {
                self.events.push(GameEvent::DragEnded(entity));
                self.events.push(GameEvent::Released(entity));
            }
            DragTransition::Abandoned(id) => self.events.push(GameEvent::DragEnded(id)),
        }
        transition
    }

    fn catch(&mut self, id: EntityId) {
        if self.entities.destroy(id).is_none() {
            return;
        }
        self.events.push(GameEvent::Caught(id));
        self.events.push(GameEvent::BinPop);
        self.bin_popping = true;
        self.schedule(BIN_POP_TICKS, Deferred::BinPopEnd);

        match self.progression.register_catch(&self.config) {
            ProgressOutcome::Continue => {}
            ProgressOutcome::LevelUp { level, spawn } => {
                let spawned = self.spawn_wave(spawn);
                for entity in self.entities.iter_mut() {
                    entity.vel *= LEVEL_UP_VELOCITY_BOOST;
                }
                self.events.push(GameEvent::LevelUp { level, spawned });
                self.status(
                    &format!("Level up! Level {level} - New trash incoming..."),
                    MESSAGE_DURATION_TICKS,
                );
            }
            ProgressOutcome::Completed => {
                self.phase = GamePhase::Complete;
                self.events.push(GameEvent::Completed);
                self.status(CHAMPION_TEXT, MESSAGE_DURATION_TICKS);
            }
        }
    }

    fn spawn_wave(&mut self, count: u32) -> Vec<EntityId> {
        self.entities.spawn(
            count,
            self.progression.level,
            &self.play_area,
            &self.config.trash_types,
            &mut self.rng,
        )
    }

    /// Queue a task `delay_ticks` from now
    pub fn schedule(&mut self, delay_ticks: u64, task: Deferred) {
        self.deferred.push(Scheduled {
            due_tick: self.time_ticks + delay_ticks,
            task,
        });
    }

    /// Run every task that has come due
    pub(crate) fn run_deferred(&mut self) {
        let now = self.time_ticks;
        let (due, pending): (Vec<Scheduled>, Vec<Scheduled>) =
            self.deferred.drain(..).partition(|s| s.due_tick <= now);
        self.deferred = pending;

        for scheduled in due {
            match scheduled.task {
                Deferred::BinPopEnd => {
                    self.bin_popping = false;
                    self.events.push(GameEvent::BinPopEnd);
                }
                Deferred::Shuffle(paw) => self.shuffle(paw),
            }
        }
    }

    /// Put a paw on screen and queue its shuffle
    pub(crate) fn show_paw(&mut self, paw: PawId) {
        let pos = disturbance::paw_position(&self.play_area, &mut self.rng);
        self.paws.push(Paw { id: paw, pos });
        self.schedule(PAW_DELAY_TICKS, Deferred::Shuffle(paw));
        log::debug!("Paw {:?} at {:?}", paw, pos);
        self.events.push(GameEvent::PawShown { paw, pos });
    }

    fn shuffle(&mut self, paw: PawId) {
        let moved = disturbance::shuffle(&mut self.entities, &self.play_area, &mut self.rng);
        self.paws.retain(|p| p.id != paw);
        log::debug!("Paw {:?} shuffled {} items", paw, moved.len());
        self.events.push(GameEvent::PawShuffled { paw, moved });
    }

    fn status(&mut self, text: &str, duration_ticks: u64) {
        self.events.push(GameEvent::Status {
            text: text.to_string(),
            duration_ticks,
        });
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
