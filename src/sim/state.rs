//! Game state and core simulation types
//!
//! Everything the tick pipeline reads or writes lives in [`GameState`]. There are
//! no globals: the orchestrator owns the state and lends it to each phase.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::rect::Rect;
use super::worldgen::{self, Frontier, SpawnRules};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for an explicit reset
    GameOver,
}

/// Horizontal facing of the player, enemies and bullets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// x coordinate of the leading edge of `rect` when facing this way
    #[inline]
    pub fn leading_edge(self, rect: &Rect) -> i32 {
        match self {
            Facing::Left => rect.x,
            Facing::Right => rect.right(),
        }
    }
}

/// A single terrain tile. Ground and floating tiles collide identically;
/// the flag only picks the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub rect: Rect,
    pub is_ground: bool,
}

impl Tile {
    pub fn ground(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, TILE_SIZE, TILE_SIZE),
            is_ground: true,
        }
    }

    pub fn floating(x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, TILE_SIZE, TILE_SIZE),
            is_ground: false,
        }
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Scout,
    Gunner,
    Brute,
    Sniper,
}

/// Per-kind constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub width: i32,
    pub height: i32,
    /// Patrol speed, pixels per tick
    pub walk_speed: f32,
    /// Ticks between shots
    pub shot_cooldown: u32,
    /// Points for shooting one down
    pub shot_points: u64,
    /// Heavy kinds fire faster bullets
    pub heavy: bool,
}

const LIGHT: EnemyStats = EnemyStats {
    width: 30,
    height: 30,
    walk_speed: 1.5,
    shot_cooldown: 60,
    shot_points: 100,
    heavy: false,
};

const HEAVY: EnemyStats = EnemyStats {
    walk_speed: 2.0,
    shot_cooldown: 45,
    shot_points: 150,
    heavy: true,
    ..LIGHT
};

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Grunt,
        EnemyKind::Scout,
        EnemyKind::Gunner,
        EnemyKind::Brute,
        EnemyKind::Sniper,
    ];

    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Grunt | EnemyKind::Scout => LIGHT,
            EnemyKind::Gunner | EnemyKind::Sniper => HEAVY,
            EnemyKind::Brute => EnemyStats {
                width: 40,
                height: 40,
                ..HEAVY
            },
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub kind: EnemyKind,
    pub speed: f32,
    /// False once killed; swept by the cleanup pass
    pub active: bool,
    pub facing: Facing,
    /// Ticks until the next shot is allowed
    pub shoot_cooldown: u32,
    pub detection_range: f32,
    pub vel_y: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, x: i32, y: i32, facing: Facing, detection_range: f32) -> Self {
        let stats = kind.stats();
        Self {
            rect: Rect::new(x, y, stats.width, stats.height),
            kind,
            speed: stats.walk_speed,
            active: true,
            facing,
            shoot_cooldown: 0,
            detection_range,
            vel_y: 0.0,
        }
    }
}

/// A projectile. Player and enemy bullets share this type and lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Rect,
    pub speed: f32,
    pub active: bool,
    pub facing: Facing,
    pub distance_traveled: i32,
    pub start_x: i32,
}

pub const BULLET_WIDTH: i32 = 10;
pub const BULLET_HEIGHT: i32 = 5;

impl Bullet {
    /// Spawn a bullet at the shooter's leading edge, just above its vertical centre
    pub fn fired_from(shooter: &Rect, facing: Facing, speed: f32) -> Self {
        let x = facing.leading_edge(shooter);
        Self {
            rect: Rect::new(x, shooter.y + shooter.h / 2 - 2, BULLET_WIDTH, BULLET_HEIGHT),
            speed,
            active: true,
            facing,
            distance_traveled: 0,
            start_x: x,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
    pub jumping: bool,
    pub lives: u8,
    /// Damage is ignored while `now < invincible_until` (ms)
    pub invincible_until: u64,
    /// Rightmost x ever reached this run
    pub max_x: i32,
}

impl Player {
    fn spawn(x: i32, now_ms: u64) -> Self {
        Self {
            rect: Rect::new(x, GROUND_HEIGHT - PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            facing: Facing::Right,
            on_ground: true,
            jumping: false,
            lives: MAX_LIVES,
            invincible_until: now_ms + INVINCIBILITY_MS,
            max_x: 0,
        }
    }

    #[inline]
    pub fn is_invincible(&self, now_ms: u64) -> bool {
        now_ms < self.invincible_until
    }

    /// Whether the sprite is drawn this frame (blinks while invincible)
    pub fn is_visible(&self, now_ms: u64) -> bool {
        !self.is_invincible(now_ms) || now_ms % 200 < 100
    }
}

/// How an enemy died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillMethod {
    Shot,
    Stomp,
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Enemy,
    EnemyBullet,
    Spikes,
    Fall,
}

/// Things that happened during a tick, drained by the shell (audio, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Fired,
    EnemyKilled {
        kind: EnemyKind,
        method: KillMethod,
        points: u64,
    },
    PlayerHit {
        source: DamageSource,
        lives_left: u8,
    },
    DifficultyRaised {
        threshold: u64,
    },
    GameOver {
        score: u64,
        new_best: bool,
    },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded once per state; resets keep drawing from the same stream
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub tuning: Tuning,
    pub difficulty: Difficulty,
    /// Generation frontier and current ground height
    pub frontier: Frontier,
    /// Left edge of the visible window (world x)
    pub camera_x: f32,
    /// Distance score plus combat bonus
    pub score: u64,
    /// Points from kills and stomps
    pub bonus_score: u64,
    pub best_score: u64,
    /// Ticks until the player may fire again
    pub shoot_cooldown: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub tiles: Vec<Tile>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    /// Hazard column pinned to the camera's left edge
    pub spikes: Vec<Rect>,
    /// Events produced since the shell last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given seed and default balance
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            difficulty: Difficulty::new(&tuning),
            tuning,
            frontier: Frontier::default(),
            camera_x: 0.0,
            score: 0,
            bonus_score: 0,
            best_score: 0,
            shoot_cooldown: 0,
            time_ticks: 0,
            player: Player::spawn(0, 0),
            tiles: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            spikes: Vec::new(),
            events: Vec::new(),
        };
        state.reset(0);
        state
    }

    /// Carry a previously stored best score into this state
    pub fn with_best_score(mut self, best_score: u64) -> Self {
        self.best_score = best_score;
        self
    }

    /// Start a fresh run: clear every collection, re-seed terrain, respawn the player
    pub fn reset(&mut self, now_ms: u64) {
        self.phase = GamePhase::Playing;
        self.difficulty = Difficulty::new(&self.tuning);
        self.frontier = Frontier::default();
        self.camera_x = 0.0;
        self.score = 0;
        self.bonus_score = 0;
        self.shoot_cooldown = 0;
        self.time_ticks = 0;
        self.tiles.clear();
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.events.clear();

        let spike_count = (SCREEN_HEIGHT + TILE_SIZE - 1) / TILE_SIZE;
        self.spikes = (0..spike_count)
            .map(|row| Rect::new(0, row * TILE_SIZE, TILE_SIZE, TILE_SIZE))
            .collect();

        self.player = Player::spawn(TILE_SIZE + 50, now_ms);
        for _ in 0..INITIAL_GENERATION_PASSES {
            self.generate_terrain();
        }

        log::info!(
            "Run reset (seed {}): {} tiles, {} enemies, frontier at {}",
            self.seed,
            self.tiles.len(),
            self.enemies.len(),
            self.frontier.x
        );
    }

    /// Run one World Generator pass at the current frontier
    pub fn generate_terrain(&mut self) {
        let rules = SpawnRules {
            player_x: self.player.rect.x,
            spawn_threshold: self.difficulty.spawn_threshold,
            detection_range: self.tuning.enemy_detection_range,
        };
        self.frontier = worldgen::generate(
            self.frontier,
            &rules,
            &mut self.tiles,
            &mut self.enemies,
            &mut self.rng,
        );
    }

    /// Set horizontal velocity and facing from held directions.
    /// Right wins when both are held.
    pub fn set_horizontal_intent(&mut self, left: bool, right: bool) {
        self.player.vel.x = 0.0;
        if left {
            self.player.vel.x -= PLAYER_SPEED;
            self.player.facing = Facing::Left;
        }
        if right {
            self.player.vel.x += PLAYER_SPEED;
            self.player.facing = Facing::Right;
        }
    }

    /// Start a jump if standing on something. Returns true if the jump started.
    pub fn jump(&mut self) -> bool {
        if !self.player.on_ground || self.player.jumping {
            return false;
        }
        self.player.jumping = true;
        self.player.on_ground = false;
        self.player.vel.y = JUMP_FORCE;
        self.events.push(GameEvent::Jumped);
        true
    }

    /// Fire a player bullet if off cooldown. Returns true if a bullet spawned.
    pub fn fire_projectile(&mut self) -> bool {
        if self.shoot_cooldown > 0 {
            return false;
        }
        self.bullets.push(Bullet::fired_from(
            &self.player.rect,
            self.player.facing,
            self.tuning.player_bullet_speed,
        ));
        self.shoot_cooldown = FIRE_COOLDOWN_TICKS;
        self.events.push(GameEvent::Fired);
        true
    }

    /// Add combat points and refresh the displayed score
    pub fn award(&mut self, points: u64) {
        self.bonus_score += points;
        self.refresh_score();
    }

    /// score = floor(max_x / 10) + bonus; never decreases
    pub fn refresh_score(&mut self) {
        let distance = (self.player.max_x.max(0) / 10) as u64;
        self.score = distance + self.bonus_score;
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Camera offset in whole pixels
    #[inline]
    pub fn camera_px(&self) -> i32 {
        self.camera_x as i32
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
