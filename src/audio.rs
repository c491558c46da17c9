//! Sound effect dispatch
//!
//! The simulation never plays sounds itself. It records [`GameEvent`]s, and the
//! shell hands them to an [`AudioManager`] which maps each one to an effect
//! and forwards it to whatever backend implements [`SoundSink`].

use crate::settings::Settings;
use crate::sim::{GameEvent, KillMethod};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player takes damage
    Hit,
    /// Player fires
    Shoot,
    /// Enemy destroyed (shot or stomped)
    Explosion,
    /// Player leaves the ground
    Jump,
}

impl SoundEffect {
    /// Effect for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Fired => Some(SoundEffect::Shoot),
            GameEvent::EnemyKilled {
                method: KillMethod::Shot | KillMethod::Stomp,
                ..
            } => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::DifficultyRaised { .. } | GameEvent::GameOver { .. } => None,
        }
    }
}

/// Audio backend
pub trait SoundSink {
    /// Play one effect at the given gain (0.0 - 1.0)
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);

    /// Set background music gain; 0.0 stops it
    fn set_music_volume(&mut self, volume: f32);
}

/// Backend for headless runs: effects go to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} @ {:.2}", effect, volume);
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("music volume {:.2}", volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: SoundSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: SoundSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let mut manager = Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Pick up changed volumes and toggles
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(!settings.sfx_on);
        self.sink.set_music_volume(settings.effective_music_volume());
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute sound effects
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_effect(effect, vol);
    }

    /// Play the effects for a batch of drained events, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
