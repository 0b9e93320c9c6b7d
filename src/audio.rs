//! Audio feedback using Web Audio API
//!
//! Procedurally generated tones, no sound files. Purely reactive: the game
//! never waits on or reads anything back from here.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::session::GameEvent;
use crate::sim::FoodKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run started
    Start,
    /// Regular food eaten
    Eat,
    /// Special food eaten
    SpecialEat,
    /// Bot taken out
    PowerUp,
    GameOver,
    /// Game over with a new mode best
    HighScore,
    /// Menu selection / theme or skin switch
    Select,
    /// Shop purchase
    Purchase,
}

impl SoundEffect {
    /// Sound for a session event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Started { .. } => Some(SoundEffect::Start),
            GameEvent::FoodEaten {
                kind: FoodKind::Regular,
                ..
            } => Some(SoundEffect::Eat),
            GameEvent::FoodEaten {
                kind: FoodKind::Special,
                ..
            } => Some(SoundEffect::SpecialEat),
            GameEvent::BotEliminated { .. } | GameEvent::HeadOnCollision { .. } => {
                Some(SoundEffect::PowerUp)
            }
            GameEvent::GameOver { summary } if summary.new_high_score => {
                Some(SoundEffect::HighScore)
            }
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    enabled: bool,
}

impl AudioManager {
    pub fn new(enabled: bool) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.6,
            enabled,
        }
    }

    /// Mirrors the saved sound flag
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Play whatever sound the event calls for
    pub fn on_event(&self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }

    pub fn play(&self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        let vol = self.volume;
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => self.play_sweep(ctx, vol, 200.0, 600.0, 0.2),
            SoundEffect::Eat => self.play_blip(ctx, vol, 800.0),
            SoundEffect::SpecialEat => self.play_arpeggio(ctx, vol, &[600.0, 800.0, 1000.0], 0.08),
            SoundEffect::PowerUp => {
                self.play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1)
            }
            SoundEffect::GameOver => {
                self.play_arpeggio(ctx, vol, &[400.0, 350.0, 300.0, 200.0], 0.2)
            }
            SoundEffect::HighScore => {
                self.play_arpeggio(ctx, vol, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08)
            }
            SoundEffect::Select => self.play_blip(ctx, vol * 0.5, 500.0),
            SoundEffect::Purchase => self.play_sweep(ctx, vol, 500.0, 1200.0, 0.15),
        }
    }

    // === Sound generators ===

    /// Oscillator routed through a gain node to the output
    fn create_osc(
        &self,
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

    /// Short square blip
    fn play_blip(&self, ctx: &AudioContext, vol: f32, freq: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Rising pitch sweep
    fn play_sweep(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32, secs: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + secs)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + secs * 0.75)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + secs + 0.05).ok();
    }

    /// Notes played one after another, `step` seconds apart
    fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], step: f64) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + step * 1.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + step * 2.0).ok();
            }
        }
    }
}
