//! Data-driven game balance
//!
//! Defaults reproduce the shipped balance. A JSON file with any subset of the
//! fields can override them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::highscores::{PersistError, read_json};

/// Default file name for balance overrides
pub const TUNING_FILE: &str = "tuning.json";

/// Balance knobs consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Enemy spawn roll threshold at the start of a run
    pub base_spawn_threshold: f32,
    /// Threshold decrease per hundred points when difficulty rises
    pub spawn_threshold_step: f32,
    /// Spawn threshold never drops below this
    pub min_spawn_threshold: f32,
    /// Enemy bullet speed at the start of a run
    pub base_enemy_bullet_speed: f32,
    /// Added to enemy bullet speed on every difficulty event
    pub enemy_bullet_speed_step: f32,
    /// Extra bullet speed for heavy enemy kinds
    pub heavy_bullet_bonus: f32,
    /// Player bullet speed
    pub player_bullet_speed: f32,
    /// Horizontal distance at which an enemy starts shooting
    pub enemy_detection_range: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_spawn_threshold: 0.9,
            spawn_threshold_step: 0.03,
            min_spawn_threshold: 0.3,
            base_enemy_bullet_speed: 3.0,
            enemy_bullet_speed_step: 0.1,
            heavy_bullet_bonus: 1.0,
            player_bullet_speed: 10.0,
            enemy_detection_range: 200.0,
        }
    }
}

impl Tuning {
    /// Load overrides from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        read_json(path)
    }

    /// Load overrides, falling back to the shipped balance on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides from {}", path.display());
                tuning
            }
            Err(PersistError::Io { .. }) => Self::default(),
            Err(err) => {
                log::warn!("Ignoring tuning file: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let tuning: Tuning = serde_json::from_str(r#"{"min_spawn_threshold": 0.5}"#).unwrap();
        assert_eq!(tuning.min_spawn_threshold, 0.5);
        assert_eq!(tuning.base_spawn_threshold, 0.9);
        assert_eq!(tuning.player_bullet_speed, 10.0);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("umbraked_tuning_does_not_exist.json");
        assert_eq!(Tuning::load_or_default(&path), Tuning::default());
    }
}
