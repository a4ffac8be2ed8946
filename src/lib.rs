//! Clean the Park - drag the fleeing trash into the bin
//!
//! Core modules:
//! - `sim`: Seeded simulation (steering, drag state machine, chaos, levels)
//! - `config`: Tunable gameplay constants
//! - `settings`: Audio preferences
//! - `hud`: Score/level/status text model
//! - `audio`: Web Audio synthesis (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod hud;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, DropMode, GameConfig};
pub use hud::Hud;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (velocities are pixels per tick at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed to the scheduler (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Steering clamp margin from the play area edges (px)
    pub const BOUNDS_INSET: f32 = 8.0;
    /// Spawn margin from the play area edges (px)
    pub const SPAWN_PADDING: f32 = 10.0;
    /// Chaos relocation margin from the play area edges (px)
    pub const CHAOS_PADDING: f32 = 12.0;

    /// Velocity multiplier applied every tick
    pub const DAMPING: f32 = 0.995;
    /// Per-axis drift jitter before level scaling
    pub const JITTER: f32 = 0.02;
    /// Repulsion strength per pixel of intrusion into the escape reach
    pub const REPULSION_GAIN: f32 = 0.06;
    /// Per-axis spawn speed before level scaling
    pub const SPAWN_SPEED: f32 = 0.25;
    /// Per-axis speed handed out by a chaos shuffle
    pub const CHAOS_SPEED: f32 = 0.8;
    /// Chance per tick that an item flips its wiggle animation
    pub const WIGGLE_TOGGLE_CHANCE: f64 = 0.003;

    /// Item size bounds (percent of viewport width)
    pub const MAX_SIZE_VW: f32 = 10.0;
    pub const MIN_SIZE_VW: f32 = 6.0;
    /// Item size lost per level (percent of viewport width)
    pub const SIZE_VW_PER_LEVEL: f32 = 0.5;

    /// Velocity boost applied to every item on level up
    pub const LEVEL_UP_VELOCITY_BOOST: f32 = 1.06;

    /// Ticks between chaos rolls (800 ms)
    pub const CHAOS_CHECK_INTERVAL_TICKS: u64 = 48;
    /// Fraction of the per-second chance used per roll
    pub const CHAOS_ROLL_SCALE: f64 = 0.8;
    /// Delay between the paw appearing and the shuffle (700 ms)
    pub const PAW_DELAY_TICKS: u64 = 42;
    /// Share of items a shuffle relocates (percent)
    pub const CHAOS_PERCENT: usize = 35;

    /// Bin pop animation length (160 ms)
    pub const BIN_POP_TICKS: u64 = 10;
    /// Bounce-back cue after a missed drop (160 ms)
    pub const SETTLE_TICKS: u32 = 10;
    /// Default status message display time (2200 ms)
    pub const MESSAGE_DURATION_TICKS: u64 = 132;
}

/// Item size for a level, in percent of viewport width
#[inline]
pub fn size_vw_for_level(level: u32) -> f32 {
    use consts::*;
    (MAX_SIZE_VW - level as f32 * SIZE_VW_PER_LEVEL).clamp(MIN_SIZE_VW, MAX_SIZE_VW)
}

/// Convert a viewport-width percentage to pixels
#[inline]
pub fn vw_to_px(vw: f32, viewport_width: f32) -> f32 {
    viewport_width * vw / 100.0
}
