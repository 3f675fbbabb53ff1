//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and a droning background loop -
//! no external files needed. Missing audio capability is non-fatal:
//! gameplay continues silently.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Score gate consumed - coin chime
    Score,
    /// Player death - explosion
    Explosion,
}

/// One oscillator routed through its own gain envelope
struct Voice {
    osc: OscillatorNode,
    gain: GainNode,
}

impl Voice {
    fn build(ctx: &AudioContext, shape: OscillatorType, freq: f32) -> Option<Self> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(shape);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some(Self { osc, gain })
    }

    /// Set the level at `t`, then decay exponentially to near silence
    fn decay(&self, t: f64, level: f32, secs: f64) {
        let _ = self.gain.gain().set_value_at_time(level, t);
        let _ = self
            .gain
            .gain()
            .exponential_ramp_to_value_at_time(0.01, t + secs);
    }

    /// Step the pitch at an offset from `t`
    fn pitch_step(&self, t: f64, offset: f64, freq: f32) {
        let _ = self.osc.frequency().set_value_at_time(freq, t + offset);
    }

    /// Slide the pitch to `freq` over `secs`
    fn pitch_slide(&self, t: f64, freq: f32, secs: f64) {
        let _ = self
            .osc
            .frequency()
            .exponential_ramp_to_value_at_time(freq, t + secs);
    }

    /// Fire-and-forget: start now, stop `secs` after `t`
    fn play_for(&self, t: f64, secs: f64) {
        let _ = self.osc.start();
        let _ = self.osc.stop_with_when(t + secs);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Running background drone, if any: lead voice plus a detuned twin
    /// sharing its gain
    music: Option<(Voice, OscillatorNode)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; play silently in that case
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
            muted: false,
            music: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.refresh_music_level();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.refresh_music_level();
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume * 0.1
        }
    }

    fn refresh_music_level(&self) {
        if let Some((voice, _)) = &self.music {
            voice.gain.gain().set_value(self.music_level());
        }
    }

    fn sfx_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect, fire-and-forget
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_level();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Score => play_score(ctx, vol),
            SoundEffect::Explosion => play_explosion(ctx, vol),
        }
    }

    /// Start the background loop: two detuned triangle drones
    pub fn start_music(&mut self) {
        self.stop_music();
        let Some(ctx) = &self.ctx else { return };

        let Some(lead) = Voice::build(ctx, OscillatorType::Triangle, 110.0) else {
            return;
        };
        let Ok(twin) = ctx.create_oscillator() else {
            return;
        };
        twin.set_type(OscillatorType::Triangle);
        // A fraction of a hertz apart; the beat between them is the texture
        twin.frequency().set_value(110.7);
        if twin.connect_with_audio_node(&lead.gain).is_err() {
            return;
        }

        lead.gain.gain().set_value(self.music_level());

        if lead.osc.start().is_ok() && twin.start().is_ok() {
            self.music = Some((lead, twin));
        }
    }

    /// Stop the background loop, if running
    pub fn stop_music(&mut self) {
        if let Some((lead, twin)) = self.music.take() {
            let _ = lead.osc.stop();
            let _ = twin.stop();
            let _ = lead.gain.disconnect();
        }
    }
}

/// Score - bright two-note coin chime
fn play_score(ctx: &AudioContext, vol: f32) {
    let Some(voice) = Voice::build(ctx, OscillatorType::Square, 988.0) else {
        return;
    };
    let t = ctx.current_time();
    voice.decay(t, vol * 0.25, 0.25);
    voice.pitch_step(t, 0.08, 1319.0);
    voice.play_for(t, 0.3);
}

/// Explosion - low sawtooth boom with a short high crack on top
fn play_explosion(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    if let Some(boom) = Voice::build(ctx, OscillatorType::Sawtooth, 100.0) {
        boom.decay(t, vol * 0.5, 0.4);
        boom.pitch_slide(t, 30.0, 0.4);
        boom.play_for(t, 0.5);
    }
    if let Some(crack) = Voice::build(ctx, OscillatorType::Square, 1500.0) {
        crack.decay(t, vol * 0.2, 0.1);
        crack.play_for(t, 0.15);
    }
}
