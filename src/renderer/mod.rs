//! Renderer-agnostic frame description
//!
//! Each frame the game state is flattened into a list of sprite draws in
//! screen space plus the HUD values. A backend only has to blit textures.

use serde::Serialize;

use crate::consts::*;
use crate::sim::{EnemyKind, Facing, GamePhase, GameState, Rect};

/// Textures a backend must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sprite {
    GroundTile,
    FloatingTile,
    Spike,
    Player,
    Enemy(EnemyKind),
    PlayerBullet,
    EnemyBullet,
    HeartFull,
    HeartEmpty,
}

/// One textured quad, already offset by the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawCommand {
    pub sprite: Sprite,
    pub dest: Rect,
    /// Mirror horizontally (sprites face right by default)
    pub flip: bool,
}

/// Values shown as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub best_score: u64,
    pub lives: u8,
    pub game_over: bool,
}

/// Everything needed to draw one frame, back to front
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub hud: Hud,
}

const HEART_SIZE: i32 = 32;
const HEART_SPACING: i32 = 40;
const HUD_MARGIN: i32 = 10;

/// Flatten the state into draw commands. Off-screen entities are culled.
pub fn build_frame(state: &GameState, now_ms: u64) -> Frame {
    let camera = state.camera_px();
    let view = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut commands = Vec::with_capacity(state.tiles.len() + state.enemies.len() + 32);

    let mut push = |sprite: Sprite, world: &Rect, facing: Facing| {
        let dest = world.translated(-camera, 0);
        if dest.right() < view.x || dest.x > view.right() {
            return;
        }
        commands.push(DrawCommand {
            sprite,
            dest,
            flip: facing == Facing::Left,
        });
    };

    for tile in &state.tiles {
        let sprite = if tile.is_ground {
            Sprite::GroundTile
        } else {
            Sprite::FloatingTile
        };
        push(sprite, &tile.rect, Facing::Right);
    }
    for spike in &state.spikes {
        push(Sprite::Spike, spike, Facing::Right);
    }
    for enemy in state.enemies.iter().filter(|e| e.active) {
        push(Sprite::Enemy(enemy.kind), &enemy.rect, enemy.facing);
    }
    for bullet in state.bullets.iter().filter(|b| b.active) {
        push(Sprite::PlayerBullet, &bullet.rect, bullet.facing);
    }
    for bullet in state.enemy_bullets.iter().filter(|b| b.active) {
        push(Sprite::EnemyBullet, &bullet.rect, bullet.facing);
    }
    if state.player.is_visible(now_ms) {
        push(Sprite::Player, &state.player.rect, state.player.facing);
    }

    // Hearts are screen-space
    for i in 0..MAX_LIVES {
        let sprite = if i < state.player.lives {
            Sprite::HeartFull
        } else {
            Sprite::HeartEmpty
        };
        commands.push(DrawCommand {
            sprite,
            dest: Rect::new(
                HUD_MARGIN + i32::from(i) * HEART_SPACING,
                HUD_MARGIN,
                HEART_SIZE,
                HEART_SIZE,
            ),
            flip: false,
        });
    }

    Frame {
        commands,
        hud: Hud {
            score: state.score,
            best_score: state.best_score,
            lives: state.player.lives,
            game_over: state.phase == GamePhase::GameOver,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(frame: &Frame, sprite: Sprite) -> usize {
        frame.commands.iter().filter(|c| c.sprite == sprite).count()
    }

    #[test]
    fn test_frame_is_camera_relative() {
        let mut state = GameState::new(2);
        state.camera_x = 100.0;
        let frame = build_frame(&state, 5000);

        let player = frame
            .commands
            .iter()
            .find(|c| c.sprite == Sprite::Player)
            .map(|c| c.dest);
        assert_eq!(player.map(|r| r.x), Some(state.player.rect.x - 100));
        assert!(frame.commands.iter().all(|c| c.dest.right() >= 0));
        assert!(frame.commands.iter().all(|c| c.dest.x <= SCREEN_WIDTH));
    }

    #[test]
    fn test_spikes_drawn_at_left_edge() {
        let mut state = GameState::new(2);
        state.camera_x = 640.0;
        let camera = state.camera_px();
        for spike in &mut state.spikes {
            spike.x = camera;
        }
        let frame = build_frame(&state, 5000);
        assert_eq!(count(&frame, Sprite::Spike), state.spikes.len());
        assert!(
            frame
                .commands
                .iter()
                .filter(|c| c.sprite == Sprite::Spike)
                .all(|c| c.dest.x == 0)
        );
    }

    #[test]
    fn test_player_blinks_while_invincible() {
        let state = GameState::new(2);
        assert_eq!(count(&build_frame(&state, 50), Sprite::Player), 1);
        assert_eq!(count(&build_frame(&state, 150), Sprite::Player), 0);
        assert_eq!(count(&build_frame(&state, 2150), Sprite::Player), 1);
    }

    #[test]
    fn test_hearts_track_lives() {
        let mut state = GameState::new(2);
        state.player.lives = 1;
        let frame = build_frame(&state, 5000);
        assert_eq!(count(&frame, Sprite::HeartFull), 1);
        assert_eq!(count(&frame, Sprite::HeartEmpty), 2);
        assert_eq!(frame.hud.lives, 1);
        assert!(!frame.hud.game_over);
    }

    #[test]
    fn test_left_facing_sprites_flip() {
        let mut state = GameState::new(2);
        state.player.facing = Facing::Left;
        let frame = build_frame(&state, 5000);
        let player = frame.commands.iter().find(|c| c.sprite == Sprite::Player);
        assert_eq!(player.map(|c| c.flip), Some(true));
    }
}
