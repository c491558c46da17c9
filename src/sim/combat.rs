//! Enemy behaviour, projectiles and damage
//!
//! Every damage source funnels through [`damage_player`], so invincibility,
//! life loss and the game-over transition behave the same no matter what hit
//! the player.

use super::collision::{fall_enemy, patrol};
use super::rect::{nudge, overlaps};
use super::state::{Bullet, DamageSource, GameEvent, GamePhase, GameState, KillMethod, Tile};
use crate::consts::*;

/// Points for landing on an enemy
pub const STOMP_POINTS: u64 = 50;

/// Advance one projectile and expire it if it flew too far, hit terrain, or
/// left the visible band
pub fn step_bullet(bullet: &mut Bullet, tiles: &[Tile], camera_x: f32) {
    if !bullet.active {
        return;
    }
    bullet.rect.x = nudge(bullet.rect.x, bullet.facing.sign() * bullet.speed);
    bullet.distance_traveled = (bullet.rect.x - bullet.start_x).abs();

    if bullet.distance_traveled > BULLET_MAX_DISTANCE {
        bullet.active = false;
    }
    if tiles.iter().any(|t| overlaps(&bullet.rect, &t.rect)) {
        bullet.active = false;
    }
    let x = bullet.rect.x as f32;
    if x < camera_x || x > camera_x + SCREEN_WIDTH as f32 {
        bullet.active = false;
    }
}

/// Move every player bullet
pub fn update_player_bullets(state: &mut GameState) {
    let camera_x = state.camera_x;
    for bullet in &mut state.bullets {
        step_bullet(bullet, &state.tiles, camera_x);
    }
}

/// Gravity, patrol and shooting for every live enemy, then player shots and
/// body contact against each of them
pub fn update_enemies(state: &mut GameState, now_ms: u64) {
    let player_cx = state.player.rect.center_x();

    for i in 0..state.enemies.len() {
        if state.phase != GamePhase::Playing {
            break;
        }
        if !state.enemies[i].active {
            continue;
        }

        {
            let GameState {
                enemies,
                tiles,
                enemy_bullets,
                difficulty,
                tuning,
                ..
            } = &mut *state;
            let enemy = &mut enemies[i];

            // Only grounded enemies walk, aim and count down their cooldown
            if fall_enemy(enemy, tiles) {
                patrol(enemy, tiles);

                let distance = (player_cx - enemy.rect.center_x()).abs() as f32;
                if distance < enemy.detection_range && enemy.shoot_cooldown == 0 {
                    let stats = enemy.kind.stats();
                    let bonus = if stats.heavy {
                        tuning.heavy_bullet_bonus
                    } else {
                        0.0
                    };
                    enemy_bullets.push(Bullet::fired_from(
                        &enemy.rect,
                        enemy.facing,
                        difficulty.enemy_bullet_speed + bonus,
                    ));
                    enemy.shoot_cooldown = stats.shot_cooldown;
                } else if enemy.shoot_cooldown > 0 {
                    enemy.shoot_cooldown -= 1;
                }
            }
        }

        let body = state.enemies[i].rect;
        let kind = state.enemies[i].kind;

        if let Some(bullet) = state
            .bullets
            .iter_mut()
            .find(|b| b.active && overlaps(&b.rect, &body))
        {
            bullet.active = false;
            state.enemies[i].active = false;
            let points = kind.stats().shot_points;
            state.award(points);
            state.events.push(GameEvent::EnemyKilled {
                kind,
                method: KillMethod::Shot,
                points,
            });
            continue;
        }

        if !overlaps(&state.player.rect, &body) || state.player.is_invincible(now_ms) {
            continue;
        }
        let falling = state.player.vel.y > 0.0;
        if state.player.rect.bottom() < body.y + body.h / 2 && falling {
            state.enemies[i].active = false;
            state.player.vel.y = JUMP_FORCE / 2.0;
            state.award(STOMP_POINTS);
            state.events.push(GameEvent::EnemyKilled {
                kind,
                method: KillMethod::Stomp,
                points: STOMP_POINTS,
            });
        } else {
            damage_player(state, DamageSource::Enemy, now_ms);
        }
    }
}

/// Move enemy bullets and apply hits on the player
pub fn update_enemy_bullets(state: &mut GameState, now_ms: u64) {
    let camera_x = state.camera_x;
    for i in 0..state.enemy_bullets.len() {
        if !state.enemy_bullets[i].active {
            continue;
        }
        step_bullet(&mut state.enemy_bullets[i], &state.tiles, camera_x);

        let bullet = &state.enemy_bullets[i];
        if bullet.active
            && overlaps(&state.player.rect, &bullet.rect)
            && !state.player.is_invincible(now_ms)
        {
            state.enemy_bullets[i].active = false;
            damage_player(state, DamageSource::EnemyBullet, now_ms);
        }
    }
}

/// Re-pin the hazard column to the camera edge and hurt the player on contact
///
/// Contact includes the column's right edge, so a player clamped to the
/// camera edge is touching it.
pub fn check_spikes(state: &mut GameState, now_ms: u64) {
    let camera = state.camera_px();
    for spike in &mut state.spikes {
        spike.x = camera;
    }
    if state.player.is_invincible(now_ms) {
        return;
    }

    let p = state.player.rect;
    let touching = state.spikes.iter().any(|s| {
        p.x <= s.right() && p.right() > s.x && p.bottom() > s.y && p.y < s.bottom()
    });
    if touching {
        damage_player(state, DamageSource::Spikes, now_ms);
    }
}

/// Falling off the bottom costs a life and bounces the player back up.
/// Invincibility does not protect against it, and the last life is spent on a
/// respawn: only a fall with no lives left ends the run.
pub fn check_fall(state: &mut GameState, now_ms: u64) {
    if state.player.rect.y <= SCREEN_HEIGHT {
        return;
    }
    if state.player.lives == 0 {
        end_run(state);
        return;
    }
    damage_player(state, DamageSource::Fall, now_ms);
    state.player.rect.y = SCREEN_HEIGHT - PLAYER_HEIGHT;
    state.player.vel.y = JUMP_FORCE;
}

/// The single damage path. Returns true if the hit cost a life.
///
/// Any hit other than a fall that lands with no lives left ends the run.
pub fn damage_player(state: &mut GameState, source: DamageSource, now_ms: u64) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    if source != DamageSource::Fall && state.player.is_invincible(now_ms) {
        return false;
    }
    if state.player.lives == 0 {
        end_run(state);
        return false;
    }

    state.player.lives -= 1;
    state.player.invincible_until = now_ms + INVINCIBILITY_MS;
    state.events.push(GameEvent::PlayerHit {
        source,
        lives_left: state.player.lives,
    });
    log::debug!("Player hit by {:?}, {} lives left", source, state.player.lives);

    if state.player.lives == 0 && source != DamageSource::Fall {
        end_run(state);
    }
    true
}

/// Terminal transition: record the best score and stop the simulation
pub fn end_run(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    let new_best = state.score > state.best_score;
    if new_best {
        state.best_score = state.score;
    }
    state.events.push(GameEvent::GameOver {
        score: state.score,
        new_best,
    });
    log::info!(
        "Game over: score {} (best {}{})",
        state.score,
        state.best_score,
        if new_best { ", new record" } else { "" }
    );
}
