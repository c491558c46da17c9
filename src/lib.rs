//! Umbraked - a side-scrolling run-and-gun platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain generation, physics, combat)
//! - `renderer`: Renderer-agnostic frame description
//! - `platform`: Clock and frame pacing
//! - `audio`: Sound effect dispatch
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScore, PersistError};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Visible playfield in pixels
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 600;
    /// Edge length of every terrain tile
    pub const TILE_SIZE: i32 = 32;

    /// Player hitbox
    pub const PLAYER_WIDTH: i32 = 30;
    pub const PLAYER_HEIGHT: i32 = 45;

    /// Vertical velocity applied on jump (negative = up)
    pub const JUMP_FORCE: f32 = -14.0;
    /// Added to vertical velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Horizontal speed while a direction is held
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Auto-scroll speed of the camera, pixels per tick
    pub const CAMERA_SPEED: f32 = 2.0;

    /// Widest gap the player can clear without a stepping platform
    pub const MAX_JUMP_DISTANCE: i32 = TILE_SIZE * 4;
    /// Top of the starting ground strip
    pub const GROUND_HEIGHT: i32 = SCREEN_HEIGHT - TILE_SIZE * 3;
    /// Enemies never spawn closer than this to the player (horizontal)
    pub const MIN_ENEMY_SPAWN_DISTANCE: i32 = 300;
    /// Projectiles expire after travelling further than this
    pub const BULLET_MAX_DISTANCE: i32 = 300;

    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Length of the post-hit (and post-reset) invincibility window
    pub const INVINCIBILITY_MS: u64 = 2000;
    /// Ticks between player shots
    pub const FIRE_COOLDOWN_TICKS: u32 = 13;
    /// Generator passes run on reset to pre-populate the level
    pub const INITIAL_GENERATION_PASSES: usize = 30;
    pub const MAX_LIVES: u8 = 3;
}
