//! Audio system using Web Audio API
//!
//! Two procedural sounds: a low ambient drone and a short blip per catch.
//! Everything degrades to silence when no AudioContext is available.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

const AMBIENT_FREQ: f32 = 160.0;
const LFO_FREQ: f32 = 0.18;
const LFO_DEPTH: f32 = 60.0;
const CATCH_FREQ: f32 = 820.0;

/// Nodes kept alive for the drone so mute can reach its gain
struct Ambient {
    _osc: OscillatorNode,
    _lfo: OscillatorNode,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    ambient: Option<Ambient>,
    settings: Settings,
}

impl AudioManager {
    pub fn new(settings: Settings) -> Self {
        // May fail outside a secure context or with audio blocked
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            ambient: None,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
    }

    /// Start the drone; later calls are no-ops
    pub fn start_ambient(&mut self) {
        if self.ambient.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.ambient = Self::build_ambient(ctx, self.settings.ambient_gain());
        if self.ambient.is_none() {
            log::warn!("Could not build ambient audio graph");
        }
    }

    fn build_ambient(ctx: &AudioContext, level: f32) -> Option<Ambient> {
        let osc = ctx.create_oscillator().ok()?;
        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value(AMBIENT_FREQ);

        // Slow wobble on the drone pitch
        let lfo = ctx.create_oscillator().ok()?;
        lfo.frequency().set_value(LFO_FREQ);
        let lfo_gain = ctx.create_gain().ok()?;
        lfo_gain.gain().set_value(LFO_DEPTH);
        lfo.connect_with_audio_node(&lfo_gain).ok()?;
        lfo_gain.connect_with_audio_param(&osc.frequency()).ok()?;

        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(level);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        osc.start().ok()?;
        lfo.start().ok()?;
        Some(Ambient {
            _osc: osc,
            _lfo: lfo,
            gain,
        })
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.apply_ambient_gain();
    }

    /// Flip mute; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.settings.muted;
        self.set_muted(muted);
        muted
    }

    fn apply_ambient_gain(&self) {
        if let Some(ambient) = &self.ambient {
            ambient.gain.gain().set_value(self.settings.ambient_gain());
        }
    }

    /// Catch - bright square blip
    pub fn play_catch(&self) {
        let vol = self.settings.catch_gain();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();

        let Some((osc, gain)) = Self::create_osc(ctx, CATCH_FREQ, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(vol, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + 0.35)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.36).ok();
    }

    /// Create an oscillator routed through its own gain to the output
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
