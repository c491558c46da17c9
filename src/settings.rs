//! Game settings and preferences
//!
//! Persisted separately from the best score as a JSON file.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::highscores::{PersistError, read_json, write_json};

/// Default file name for settings
pub const SETTINGS_FILE: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music enabled
    pub music_on: bool,
    /// Sound effects enabled
    pub sfx_on: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_on: true,
            sfx_on: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            // Music plays at half volume
            music_volume: 0.5,
        }
    }
}

impl Settings {
    pub fn toggle_music(&mut self) {
        self.music_on = !self.music_on;
    }

    pub fn toggle_sfx(&mut self) {
        self.sfx_on = !self.sfx_on;
    }

    /// Effective sound effect gain (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_on {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective music gain (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_on {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        read_json(path)
    }

    /// Load settings, using defaults if the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings file, using defaults");
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not load settings, using defaults: {err}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        write_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
