//! Tile collision resolution
//!
//! Positions are whole pixels and velocities are fractional, so every move
//! truncates toward zero. Landing, ceiling and wall contacts are resolved per
//! tile in list order against the live (already corrected) rectangle.

use super::rect::{Rect, nudge, overlaps};
use super::state::{Enemy, Facing, Player, Tile};
use crate::consts::GRAVITY;

/// Integrate gravity and move the player through the terrain for one tick
pub fn move_player(player: &mut Player, tiles: &[Tile]) {
    player.vel.y += GRAVITY;
    let future = player.rect.moved_by(player.vel.x, player.vel.y);

    player.on_ground = false;
    let mut blocked = false;

    for tile in tiles {
        let t = &tile.rect;
        if !overlaps(&future, t) {
            continue;
        }

        if player.vel.y > 0.0 && player.rect.bottom() <= t.y {
            // Landing
            player.rect.y = t.y - player.rect.h;
            player.vel.y = 0.0;
            player.on_ground = true;
            player.jumping = false;
        } else if player.vel.y < 0.0 && player.rect.y >= t.bottom() {
            // Head bump
            player.rect.y = t.bottom();
            player.vel.y = 0.0;
        } else if player.vel.x != 0.0 && player.rect.bottom() > t.y && player.rect.y < t.bottom() {
            if player.vel.x > 0.0 && player.rect.right() <= t.x {
                player.rect.x = t.x - player.rect.w;
                blocked = true;
                ledge_lift(player);
            } else if player.vel.x < 0.0 && player.rect.x >= t.right() {
                player.rect.x = t.right();
                blocked = true;
                ledge_lift(player);
            }
        }
    }

    if !blocked {
        player.rect.x = nudge(player.rect.x, player.vel.x);
    }
    // A blocked rising jump already moved vertically in ledge_lift
    if !player.on_ground && (!blocked || player.vel.y >= 0.0) {
        player.rect.y = nudge(player.rect.y, player.vel.y);
    }
}

/// Rising into a wall mid-jump keeps the upward motion, letting the player
/// slide up past a lip they are pressed against.
fn ledge_lift(player: &mut Player) {
    if player.jumping && player.vel.y < 0.0 {
        player.rect.y = nudge(player.rect.y, player.vel.y);
    }
}

/// Integrate gravity for an enemy and settle it onto the terrain.
/// Returns true if it is standing on a tile this tick.
pub fn fall_enemy(enemy: &mut Enemy, tiles: &[Tile]) -> bool {
    enemy.vel_y += GRAVITY;
    enemy.rect.y = nudge(enemy.rect.y, enemy.vel_y);

    let mut grounded = false;
    for tile in tiles {
        let t = &tile.rect;
        if !overlaps(&enemy.rect, t) {
            continue;
        }
        let prev_bottom = enemy.rect.bottom() as f32 - enemy.vel_y;
        let prev_top = enemy.rect.y as f32 - enemy.vel_y;
        if enemy.vel_y > 0.0 && prev_bottom <= t.y as f32 {
            enemy.rect.y = t.y - enemy.rect.h;
            enemy.vel_y = 0.0;
            grounded = true;
        } else if enemy.vel_y < 0.0 && prev_top >= t.bottom() as f32 {
            enemy.rect.y = t.bottom();
            enemy.vel_y = 0.0;
        }
    }
    grounded
}

/// One patrol step for a grounded enemy: walk forward, or turn around if the
/// next step hits a wall or leaves the platform.
pub fn patrol(enemy: &mut Enemy, tiles: &[Tile]) {
    let step = (enemy.facing.sign() * enemy.speed) as i32;
    let next = enemy.rect.translated(step, 0);
    let blocked = tiles.iter().any(|t| overlaps(&next, &t.rect));

    let probe_x = match enemy.facing {
        Facing::Left => enemy.rect.x - 1,
        Facing::Right => enemy.rect.right(),
    };
    let probe = Rect::new(probe_x, enemy.rect.bottom(), 1, 1);
    let supported = tiles.iter().any(|t| overlaps(&probe, &t.rect));

    if blocked || !supported {
        enemy.facing = enemy.facing.flipped();
    } else {
        enemy.rect.x += step;
    }
}
