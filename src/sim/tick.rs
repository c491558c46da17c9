//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Wall-clock time
//! is passed in by the caller so replays and tests control it.

use super::cleanup;
use super::combat;
use super::collision::move_player;
use super::rect::{Rect, overlaps};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Jump (ignored unless standing)
    pub jump: bool,
    /// Fire (ignored while on cooldown)
    pub fire: bool,
}

impl TickInput {
    /// Demo-mode driver: run right, hop walls, gaps and close enemies, and
    /// shoot anything in the lane ahead
    pub fn autopilot(state: &GameState) -> Self {
        let p = state.player.rect;

        let wall = Rect::new(p.right(), p.y, TILE_SIZE, p.h);
        let floor = Rect::new(p.right(), p.bottom(), TILE_SIZE, TILE_SIZE * 2);
        let wall_ahead = state.tiles.iter().any(|t| overlaps(&wall, &t.rect));
        let floor_ahead = state.tiles.iter().any(|t| overlaps(&floor, &t.rect));

        let lane = |range: i32| {
            state.enemies.iter().any(|e| {
                e.active
                    && e.rect.x >= p.x
                    && e.rect.x - p.right() < range
                    && e.rect.bottom() > p.y
                    && e.rect.y < p.bottom()
            })
        };

        Self {
            left: false,
            right: true,
            jump: wall_ahead || !floor_ahead || lane(TILE_SIZE * 2),
            fire: lane(BULLET_MAX_DISTANCE),
        }
    }
}

/// Damage checks after enemy movement, in resolution order
const HAZARD_PHASES: [fn(&mut GameState, u64); 4] = [
    combat::update_enemies,
    combat::update_enemy_bullets,
    combat::check_spikes,
    combat::check_fall,
];

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    // Nothing moves after game over until an explicit reset
    if state.phase != GamePhase::Playing {
        return;
    }

    state.set_horizontal_intent(input.left, input.right);
    if input.jump {
        state.jump();
    }
    if input.fire {
        state.fire_projectile();
    }
    state.shoot_cooldown = state.shoot_cooldown.saturating_sub(1);

    state.camera_x += CAMERA_SPEED;

    if let Some(threshold) = state.difficulty.update(state.score, &state.tuning) {
        state.events.push(GameEvent::DifficultyRaised { threshold });
    }

    // Keep the frontier a screen plus ten tiles ahead of the camera
    let horizon = state.camera_x + (SCREEN_WIDTH + TILE_SIZE * 10) as f32;
    while (state.frontier.x as f32) < horizon {
        state.generate_terrain();
    }

    move_player(&mut state.player, &state.tiles);
    let left_limit = (state.camera_x + TILE_SIZE as f32) as i32;
    if state.player.rect.x < left_limit {
        state.player.rect.x = left_limit;
    }
    if state.player.rect.x > state.player.max_x {
        state.player.max_x = state.player.rect.x;
        state.refresh_score();
    }

    combat::update_player_bullets(state);
    for phase in HAZARD_PHASES {
        if state.phase != GamePhase::Playing {
            break;
        }
        phase(state, now_ms);
    }

    cleanup::sweep(state);
    state.time_ticks += 1;
}
