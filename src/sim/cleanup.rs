//! End-of-tick sweep: drops tiles behind the camera and everything marked inactive.

use super::state::GameState;

/// Remove stale tiles and dead entities. Runs after combat so every phase of
/// a tick sees the same entity set.
pub fn sweep(state: &mut GameState) {
    let camera_x = state.camera_x;
    let before = state.tiles.len();
    state.tiles.retain(|t| t.rect.right() as f32 >= camera_x);
    let dropped = before - state.tiles.len();
    if dropped > 0 {
        log::trace!("Dropped {dropped} tiles behind x={camera_x}");
    }

    state.bullets.retain(|b| b.active);
    state.enemy_bullets.retain(|b| b.active);
    state.enemies.retain(|e| e.active);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Bullet, Enemy, EnemyKind, Facing, Tile};
    use proptest::prelude::*;

    #[test]
    fn test_sweep_drops_dead_entities() {
        let mut state = GameState::new(3);
        state.enemies.clear();
        let mut dead = Enemy::new(EnemyKind::Grunt, 400, 100, Facing::Left, 200.0);
        dead.active = false;
        state.enemies.push(dead);
        state
            .enemies
            .push(Enemy::new(EnemyKind::Brute, 500, 100, Facing::Left, 200.0));

        let mut spent = Bullet::fired_from(&Rect::new(100, 100, 30, 45), Facing::Right, 10.0);
        spent.active = false;
        state.bullets.push(spent.clone());
        state.enemy_bullets.push(spent);

        sweep(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Brute);
        assert!(state.bullets.is_empty());
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_tile_touching_camera_edge_survives() {
        let mut state = GameState::new(3);
        state.tiles = vec![Tile::ground(0, 504), Tile::ground(32, 504), Tile::ground(64, 504)];
        state.camera_x = 64.0;
        sweep(&mut state);
        let xs: Vec<i32> = state.tiles.iter().map(|t| t.rect.x).collect();
        assert_eq!(xs, vec![32, 64]);
    }

    proptest! {
        #[test]
        fn no_tile_left_behind_camera(seed in any::<u64>(), camera in 0.0f32..2000.0) {
            let mut state = GameState::new(seed);
            state.camera_x = camera;
            sweep(&mut state);
            for tile in &state.tiles {
                prop_assert!(tile.rect.right() as f32 >= camera);
            }
        }
    }
}
