//! Audio preferences
//!
//! Read once from the page at startup; nothing is written to storage.

use serde::Deserialize;

/// Gain of the ambient drone at full music volume
pub const AMBIENT_GAIN: f32 = 0.02;
/// Peak gain of the catch blip at full sfx volume
pub const CATCH_GAIN: f32 = 0.18;

/// Sound settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Ambient tone volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
        }
    }
}

impl Settings {
    /// Parse a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective gain for the catch sound
    pub fn catch_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            CATCH_GAIN * self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Effective gain for the ambient drone
    pub fn ambient_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            AMBIENT_GAIN * self.master_volume.clamp(0.0, 1.0) * self.music_volume.clamp(0.0, 1.0)
        }
    }

    /// Mute button glyph
    pub fn mute_icon(&self) -> &'static str {
        if self.muted { "🔇" } else { "🔊" }
    }
}
