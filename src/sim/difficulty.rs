//! Score-driven difficulty scaling
//!
//! Thresholds step through the leading digit of the score: 100, 200, ... 900,
//! 1000, 2000, ... Each threshold fires at most once per run.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Next threshold strictly above `score` on the leading-digit ladder
///
/// Anything below 100 maps to 100.
pub fn next_difficulty_threshold(score: u64) -> u64 {
    if score < 100 {
        return 100;
    }
    let mut base = 1u64;
    while score / base >= 10 {
        base *= 10;
    }
    (score / base + 1) * base
}

/// Difficulty knobs that tighten as the score climbs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Enemy spawn rolls must land below this
    pub spawn_threshold: f32,
    /// Base speed for newly fired enemy bullets
    pub enemy_bullet_speed: f32,
    /// Last threshold that fired (0 = none yet)
    pub last_threshold: u64,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_threshold: tuning.base_spawn_threshold,
            enemy_bullet_speed: tuning.base_enemy_bullet_speed,
            last_threshold: 0,
        }
    }

    /// Apply one scaling step if `score` has reached the next threshold.
    /// Returns the threshold that fired.
    pub fn update(&mut self, score: u64, tuning: &Tuning) -> Option<u64> {
        let next = next_difficulty_threshold(self.last_threshold);
        if score < next || score < 100 {
            return None;
        }

        let hundreds = (score / 100) as f32;
        self.spawn_threshold = (tuning.base_spawn_threshold
            - tuning.spawn_threshold_step * hundreds)
            .max(tuning.min_spawn_threshold);
        self.enemy_bullet_speed += tuning.enemy_bullet_speed_step;
        self.last_threshold = next;

        log::info!(
            "Difficulty raised at {next}: spawn threshold {:.2}, enemy bullet speed {:.1}",
            self.spawn_threshold,
            self.enemy_bullet_speed
        );
        Some(next)
    }
}
