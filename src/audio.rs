//! Sound effects
//!
//! Every effect is a single procedurally generated tone; no sample files.
//! The manager maps game events to tones and hands them to a sink, which is
//! whatever the platform can actually play.

use crate::sim::{BrickColor, GameEvent};

/// Tone length for every effect
pub const TONE_DURATION_MS: u32 = 100;
/// Base volume before the master volume is applied
pub const TONE_VOLUME: f32 = 0.2;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits a wall or the paddle
    Bounce,
    /// Brick breaks, pitched by color
    BrickBreak(BrickColor),
}

impl SoundEffect {
    pub fn frequency_hz(self) -> f32 {
        match self {
            SoundEffect::Bounce => 293.66,
            SoundEffect::BrickBreak(color) => match color {
                BrickColor::Yellow => 329.63,
                BrickColor::Orange => 349.23,
                BrickColor::Blue => 392.00,
                BrickColor::Green => 440.00,
                BrickColor::Red => 493.88,
            },
        }
    }
}

/// Effect for a game event, if it makes a sound
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::WallBounce(_) | GameEvent::PaddleBounce => Some(SoundEffect::Bounce),
        GameEvent::BrickBroken { color, .. } => Some(SoundEffect::BrickBreak(*color)),
        _ => None,
    }
}

/// A tone ready to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    pub volume: f32,
}

/// Something that can play a tone
pub trait AudioSink {
    fn play(&mut self, tone: Tone);
}

/// Logs tones instead of playing them (terminals have no synth)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, tone: Tone) {
        log::debug!(
            "tone {:.2} Hz for {} ms at {:.2}",
            tone.frequency_hz,
            tone.duration_ms,
            tone.volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            TONE_VOLUME * self.master_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.sink.play(Tone {
            frequency_hz: effect.frequency_hz(),
            duration_ms: TONE_DURATION_MS,
            volume,
        });
    }

    /// Play whatever the event calls for
    pub fn handle(&mut self, event: &GameEvent) {
        if let Some(effect) = sound_for(event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
