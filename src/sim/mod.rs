//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Time comes in as a tick argument, never read from the system
//! - No rendering, audio or platform dependencies

pub mod cleanup;
pub mod collision;
pub mod combat;
pub mod difficulty;
pub mod rect;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use difficulty::{Difficulty, next_difficulty_threshold};
pub use rect::{Rect, overlaps};
pub use state::{
    Bullet, DamageSource, Enemy, EnemyKind, EnemyStats, Facing, GameEvent, GamePhase, GameState,
    KillMethod, Player, Tile,
};
pub use tick::{TickInput, tick};
pub use worldgen::{Frontier, can_spawn_enemy, generate};
