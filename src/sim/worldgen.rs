//! Procedural terrain generation
//!
//! Each pass extends the level to the right of the frontier: a ceiling band,
//! a ground segment, one obstacle archetype, and sometimes a lone floating
//! block. Enemies are placed only where they have a bounded patrol strip.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::{Rect, overlaps};
use super::state::{Enemy, EnemyKind, Facing, Tile};
use crate::consts::*;

/// Rows of the ceiling band and of every ground segment
const BAND_ROWS: i32 = 3;
/// Enemies are requested this far above the surface they should stand on
const SPAWN_LIFT: i32 = 40;
/// Largest rise between consecutive platforms in a chain
const MAX_PLATFORM_RISE: i32 = TILE_SIZE * 4;
/// Platforms never sit higher than this
const PLATFORM_CEILING: i32 = SCREEN_HEIGHT / 4;

/// Where generation resumes, carried between passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontier {
    /// Rightmost generated x
    pub x: i32,
    /// Top of the current ground segment
    pub ground_height: i32,
    /// End of the ceiling band emitted so far
    pub strip_end: i32,
}

impl Default for Frontier {
    fn default() -> Self {
        Self {
            x: 0,
            ground_height: GROUND_HEIGHT,
            strip_end: 0,
        }
    }
}

/// Inputs that gate enemy placement for one pass
#[derive(Debug, Clone, Copy)]
pub struct SpawnRules {
    pub player_x: i32,
    /// Every spawn roll must land below this (scaled per site)
    pub spawn_threshold: f32,
    pub detection_range: f32,
}

/// Extend the level by one pass and return the new frontier
pub fn generate<R: Rng + ?Sized>(
    frontier: Frontier,
    rules: &SpawnRules,
    tiles: &mut Vec<Tile>,
    enemies: &mut Vec<Enemy>,
    rng: &mut R,
) -> Frontier {
    let tiles_before = tiles.len();
    let enemies_before = enemies.len();
    let mut builder = Builder {
        rules,
        tiles,
        enemies,
        rng,
    };
    let mut next = frontier;

    next.strip_end = builder.ceiling_band(next.x, next.strip_end);

    // The spawn strip stays at the player's starting height
    if next.x > 0 && builder.roll() < 0.25 {
        next.ground_height += builder.rng.random_range(-1..=1) * TILE_SIZE;
        next.ground_height = next
            .ground_height
            .clamp(TILE_SIZE * 3, SCREEN_HEIGHT - TILE_SIZE * 3);
    }
    let ground = next.ground_height;

    let segment_len = builder.ground_segment(next.x, ground);
    next.x += segment_len;

    let archetype = builder.roll();
    next.x += if archetype < 0.20 {
        builder.gap(next.x, ground)
    } else if archetype < 0.45 {
        builder.pipe(next.x, ground)
    } else if archetype < 0.85 {
        builder.platform_chain(next.x, ground)
    } else {
        builder.flat(next.x, ground)
    };

    builder.solo_block(next.x, ground, segment_len);

    log::debug!(
        "Generated to x={} (ground {}): +{} tiles, +{} enemies",
        next.x,
        ground,
        builder.tiles.len() - tiles_before,
        builder.enemies.len() - enemies_before
    );
    next
}

/// Whether an enemy with footprint `body` may be placed
///
/// Requires ground under the footprint, no terrain inside it, and ground on
/// both sides at foot level so the first patrol step cannot walk off a ledge.
pub fn can_spawn_enemy(tiles: &[Tile], body: &Rect) -> bool {
    let feet = Rect::new(body.x, body.bottom(), body.w, TILE_SIZE);
    if !tiles.iter().any(|t| overlaps(&feet, &t.rect)) {
        return false;
    }
    if tiles.iter().any(|t| overlaps(body, &t.rect)) {
        return false;
    }

    let left = Rect::new(body.x - TILE_SIZE, body.bottom(), TILE_SIZE, TILE_SIZE);
    let right = Rect::new(body.right(), body.bottom(), TILE_SIZE, TILE_SIZE);
    let has_left = tiles.iter().any(|t| overlaps(&left, &t.rect));
    let has_right = tiles.iter().any(|t| overlaps(&right, &t.rect));
    has_left && has_right
}

struct Builder<'a, R: Rng + ?Sized> {
    rules: &'a SpawnRules,
    tiles: &'a mut Vec<Tile>,
    enemies: &'a mut Vec<Enemy>,
    rng: &'a mut R,
}

impl<R: Rng + ?Sized> Builder<'_, R> {
    #[inline]
    fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Random multiple of the tile size
    #[inline]
    fn tiles_between(&mut self, lo: i32, hi: i32) -> i32 {
        TILE_SIZE * self.rng.random_range(lo..=hi)
    }

    fn threshold(&self) -> f32 {
        self.rules.spawn_threshold
    }

    /// Enemies only appear once the level has scrolled past the first screen
    fn spawn_zone(&self, frontier_x: i32) -> bool {
        frontier_x > SCREEN_WIDTH
    }

    fn far_from_player(&self, x: i32) -> bool {
        (x - self.rules.player_x).abs() > MIN_ENEMY_SPAWN_DISTANCE
    }

    /// Top three rows, from the frontier to a screen plus ten tiles ahead.
    /// Columns already covered by an earlier pass are skipped.
    ///
    /// The band hangs from the top of the screen, not at the segment's ground
    /// height: a strip that far ahead at ground level would fill every gap.
    fn ceiling_band(&mut self, frontier_x: i32, strip_end: i32) -> i32 {
        let limit = frontier_x + SCREEN_WIDTH + TILE_SIZE * 10;
        let start = strip_end.max(frontier_x);
        let columns: Vec<i32> = (start..limit).step_by(TILE_SIZE as usize).collect();
        for row in 0..BAND_ROWS {
            for &x in &columns {
                self.tiles.push(Tile::ground(x, row * TILE_SIZE));
            }
        }
        columns.last().map_or(strip_end, |x| x + TILE_SIZE)
    }

    fn ground_segment(&mut self, x: i32, ground: i32) -> i32 {
        let len = self.tiles_between(5, 10);
        for row in 0..BAND_ROWS {
            for col in 0..len / TILE_SIZE {
                self.tiles
                    .push(Tile::ground(x + col * TILE_SIZE, ground + row * TILE_SIZE));
            }
        }

        if self.spawn_zone(x) && self.roll() < self.threshold() {
            let first = x + len / 3;
            let second = x + len * 2 / 3;
            if self.far_from_player(first) {
                self.spawn_enemy(first, ground - SPAWN_LIFT);
            }
            if self.roll() < self.threshold() * 0.6 && self.far_from_player(second) {
                self.spawn_enemy(second, ground - SPAWN_LIFT);
            }
        }
        len
    }

    /// Open gap; gaps wider than one jump get evenly spaced stepping platforms
    fn gap(&mut self, x: i32, ground: i32) -> i32 {
        let width = self.tiles_between(2, 6);
        if width > MAX_JUMP_DISTANCE {
            let count = (width + MAX_JUMP_DISTANCE - 1) / MAX_JUMP_DISTANCE;
            let spacing = width / (count + 1);
            let mut prev_y = ground;
            for i in 1..=count {
                let px = x + spacing * i;
                let py = (prev_y - self.tiles_between(1, 3)).max(PLATFORM_CEILING);
                let pw = self.tiles_between(1, 2);
                self.floating_platform(px, py, pw);

                if self.spawn_zone(x)
                    && self.roll() < self.threshold() * 0.8
                    && count > 1
                    && self.far_from_player(px + pw / 2)
                {
                    self.spawn_enemy(px + pw / 2, py - SPAWN_LIFT);
                }
                prev_y = py;
            }
        }
        width
    }

    /// Two-tile-wide solid column rising from the ground
    fn pipe(&mut self, x: i32, ground: i32) -> i32 {
        let height = self.tiles_between(2, 4);
        let width = TILE_SIZE * 2;
        for row in 0..height / TILE_SIZE {
            for col in 0..width / TILE_SIZE {
                self.tiles.push(Tile::ground(
                    x + col * TILE_SIZE,
                    ground - height + row * TILE_SIZE,
                ));
            }
        }

        if self.spawn_zone(x)
            && self.roll() < self.threshold() * 0.8
            && self.far_from_player(x + width / 2)
        {
            self.spawn_enemy(x + width / 2, ground - height - SPAWN_LIFT);
        }
        width + TILE_SIZE * 2
    }

    /// Ascending chain of small floating platforms over open space
    fn platform_chain(&mut self, x: i32, ground: i32) -> i32 {
        let count = self.rng.random_range(2..=4);
        let total_width = self.tiles_between(3, 6);
        let spacing = total_width / count;
        let mut prev_x = x;
        let mut prev_y = ground;

        for _ in 0..count {
            let px = prev_x + spacing;
            let mut py = prev_y - self.tiles_between(1, 3);
            if prev_y - py > MAX_PLATFORM_RISE {
                py = prev_y - MAX_PLATFORM_RISE;
            }
            let py = py.max(PLATFORM_CEILING);
            let pw = self.tiles_between(1, 2);
            self.floating_platform(px, py, pw);

            if self.spawn_zone(x)
                && self.roll() < self.threshold() * 0.8
                && count > 1
                && self.far_from_player(px + pw / 2)
            {
                self.spawn_enemy(px + pw / 2, py - SPAWN_LIFT);
                if pw > TILE_SIZE && self.roll() < self.threshold() * 0.4 {
                    self.spawn_enemy(px, py - SPAWN_LIFT);
                }
            }
            prev_x = px + pw;
            prev_y = py;
        }
        total_width + TILE_SIZE * 2
    }

    /// No new geometry, just a chance of extra enemies
    fn flat(&mut self, x: i32, ground: i32) -> i32 {
        if self.spawn_zone(x) && self.roll() < self.threshold() {
            let first = x + TILE_SIZE;
            if self.far_from_player(first) {
                self.spawn_enemy(first, ground - SPAWN_LIFT);
            }
            if self.roll() < self.threshold() * 0.5 {
                let second = x + TILE_SIZE * 2;
                if self.far_from_player(second) {
                    self.spawn_enemy(second, ground - SPAWN_LIFT);
                }
            }
        }
        TILE_SIZE * 3
    }

    /// Occasional single block floating at least four tiles above ground
    fn solo_block(&mut self, x: i32, ground: i32, segment_len: i32) {
        if !(self.spawn_zone(x) && self.roll() < self.threshold() * 0.7) {
            return;
        }
        let bx = x - segment_len / 2;
        let by = ground - self.tiles_between(1, 4);
        if by > ground - 4 * TILE_SIZE {
            return;
        }
        self.tiles.push(Tile::floating(bx, by));
        if self.roll() < self.threshold() * 0.6 && self.far_from_player(bx) {
            self.spawn_enemy(bx, by - SPAWN_LIFT);
        }
    }

    fn floating_platform(&mut self, x: i32, y: i32, width: i32) {
        for col in 0..width / TILE_SIZE {
            self.tiles.push(Tile::floating(x + col * TILE_SIZE, y));
        }
    }

    /// Roll for, validate and place one enemy, snapped onto the surface below
    fn spawn_enemy(&mut self, x: i32, y: i32) {
        if self.roll() >= self.threshold() {
            return;
        }
        let kind = EnemyKind::ALL[self.rng.random_range(0..EnemyKind::ALL.len())];
        let stats = kind.stats();
        let body = Rect::new(x, y, stats.width, stats.height);
        if !can_spawn_enemy(&self.tiles, &body) {
            return;
        }

        let y = self
            .tiles
            .iter()
            .find(|t| {
                t.rect.x <= body.right()
                    && t.rect.right() >= x
                    && t.rect.y >= y
                    && t.rect.y <= body.bottom() + TILE_SIZE
            })
            .map_or(y, |t| t.rect.y - stats.height);

        let facing = if self.rng.random_bool(0.5) {
            Facing::Left
        } else {
            Facing::Right
        };
        self.enemies
            .push(Enemy::new(kind, x, y, facing, self.rules.detection_range));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rules(threshold: f32) -> SpawnRules {
        SpawnRules {
            player_x: 0,
            spawn_threshold: threshold,
            detection_range: 200.0,
        }
    }

    fn run_passes(seed: u64, passes: usize, threshold: f32) -> (Frontier, Vec<Tile>, Vec<Enemy>) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut tiles = Vec::new();
        let mut enemies = Vec::new();
        let mut frontier = Frontier::default();
        for _ in 0..passes {
            frontier = generate(frontier, &rules(threshold), &mut tiles, &mut enemies, &mut rng);
        }
        (frontier, tiles, enemies)
    }

    const SITE_X: i32 = 1000;

    /// Run one archetype builder on an empty level
    fn build_alone<T>(seed: u64, f: impl FnOnce(&mut Builder<'_, Pcg32>) -> T) -> (T, Vec<Tile>) {
        let rules = rules(0.0);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut tiles = Vec::new();
        let mut enemies = Vec::new();
        let mut builder = Builder {
            rules: &rules,
            tiles: &mut tiles,
            enemies: &mut enemies,
            rng: &mut rng,
        };
        let out = f(&mut builder);
        assert!(enemies.is_empty());
        (out, tiles)
    }

    /// Split consecutively pushed tiles into (x, y, width) platforms
    fn platforms(tiles: &[Tile]) -> Vec<(i32, i32, i32)> {
        let mut out: Vec<(i32, i32, i32)> = Vec::new();
        for tile in tiles {
            match out.last_mut() {
                Some((x, y, w)) if *y == tile.rect.y && *x + *w == tile.rect.x => *w += TILE_SIZE,
                _ => out.push((tile.rect.x, tile.rect.y, TILE_SIZE)),
            }
        }
        out
    }

    #[test]
    fn test_wide_gaps_get_rising_stepping_platforms() {
        let mut stepped = 0;
        for seed in 0..200 {
            let (width, tiles) = build_alone(seed, |b| b.gap(SITE_X, GROUND_HEIGHT));
            assert!((TILE_SIZE * 2..=TILE_SIZE * 6).contains(&width));
            assert_eq!(width % TILE_SIZE, 0);
            if width <= MAX_JUMP_DISTANCE {
                assert!(tiles.is_empty(), "seed {seed}: narrow gap got platforms");
                continue;
            }

            stepped += 1;
            assert!(tiles.iter().all(|t| !t.is_ground));
            let steps = platforms(&tiles);
            let expected = (width + MAX_JUMP_DISTANCE - 1) / MAX_JUMP_DISTANCE;
            assert_eq!(steps.len() as i32, expected, "seed {seed}: width {width}");

            let mut prev_y = GROUND_HEIGHT;
            for &(x, y, w) in &steps {
                assert!(x > SITE_X && x < SITE_X + width);
                assert!(w == TILE_SIZE || w == TILE_SIZE * 2);
                assert!((TILE_SIZE..=TILE_SIZE * 3).contains(&(prev_y - y)));
                assert!(y >= PLATFORM_CEILING);
                prev_y = y;
            }
        }
        assert!(stepped > 0);
    }

    #[test]
    fn test_stepping_platforms_stop_at_ceiling() {
        for seed in 0..50 {
            let ground = PLATFORM_CEILING + TILE_SIZE;
            let (_, tiles) = build_alone(seed, |b| b.gap(SITE_X, ground));
            assert!(tiles.iter().all(|t| t.rect.y == PLATFORM_CEILING));
        }
    }

    #[test]
    fn test_pipe_stands_on_ground_line() {
        for seed in 0..100 {
            let (advance, tiles) = build_alone(seed, |b| b.pipe(SITE_X, GROUND_HEIGHT));
            assert_eq!(advance, TILE_SIZE * 4);
            assert!(tiles.iter().all(|t| t.is_ground));
            assert!(
                tiles
                    .iter()
                    .all(|t| t.rect.x == SITE_X || t.rect.x == SITE_X + TILE_SIZE)
            );

            let top = tiles.iter().map(|t| t.rect.y).min().unwrap();
            let bottom = tiles.iter().map(|t| t.rect.bottom()).max().unwrap();
            let height = GROUND_HEIGHT - top;
            assert_eq!(bottom, GROUND_HEIGHT);
            assert!((TILE_SIZE * 2..=TILE_SIZE * 4).contains(&height));
            assert_eq!(tiles.len() as i32, 2 * height / TILE_SIZE);
        }
    }

    #[test]
    fn test_platform_chain_rises_in_bounded_steps() {
        for seed in 0..200 {
            let (_, tiles) = build_alone(seed, |b| b.platform_chain(SITE_X, GROUND_HEIGHT));
            assert!(tiles.iter().all(|t| !t.is_ground));

            let chain = platforms(&tiles);
            assert!((2..=4).contains(&chain.len()), "seed {seed}: {chain:?}");

            let (mut prev_x, mut prev_y) = (SITE_X, GROUND_HEIGHT);
            for &(x, y, w) in &chain {
                assert!(x > prev_x);
                assert!(w == TILE_SIZE || w == TILE_SIZE * 2);
                assert!(prev_y - y >= 0 && prev_y - y <= MAX_PLATFORM_RISE);
                assert!(y >= PLATFORM_CEILING);
                if y > PLATFORM_CEILING {
                    assert!(prev_y - y >= TILE_SIZE);
                }
                prev_x = x + w;
                prev_y = y;
            }
        }
    }

    #[test]
    fn test_solo_block_sits_four_tiles_up() {
        let segment_len = TILE_SIZE * 8;
        let mut placed = 0;
        let mut skipped = 0;
        for seed in 0..200 {
            let rules = rules(1.0);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut tiles = Vec::new();
            let mut enemies = Vec::new();
            Builder {
                rules: &rules,
                tiles: &mut tiles,
                enemies: &mut enemies,
                rng: &mut rng,
            }
            .solo_block(SITE_X, GROUND_HEIGHT, segment_len);

            match tiles.as_slice() {
                [] => skipped += 1,
                [block] => {
                    placed += 1;
                    assert!(!block.is_ground);
                    assert_eq!(block.rect.x, SITE_X - segment_len / 2);
                    assert!(block.rect.y <= GROUND_HEIGHT - TILE_SIZE * 4);
                }
                more => panic!("seed {seed}: {} blocks", more.len()),
            }
            // A lone tile has no patrol strip
            assert!(enemies.is_empty());
        }
        assert!(placed > 0 && skipped > 0);
    }

    #[test]
    fn test_isolated_platform_rejects_spawn() {
        // A platform exactly as wide as the footprint, with no neighbours
        let tiles = vec![Tile::floating(100, 200)];
        let body = Rect::new(100, 200 - 40, TILE_SIZE, 40);
        assert!(!can_spawn_enemy(&tiles, &body));
    }

    #[test]
    fn test_bounded_strip_accepts_spawn() {
        let tiles: Vec<Tile> = (0..5).map(|i| Tile::ground(64 + i * TILE_SIZE, 300)).collect();
        let body = Rect::new(128, 270, 30, 30);
        assert!(can_spawn_enemy(&tiles, &body));
    }

    #[test]
    fn test_missing_neighbour_rejects_spawn() {
        // Ground beneath and to the right, nothing to the left
        let tiles = vec![Tile::ground(128, 300), Tile::ground(160, 300)];
        let body = Rect::new(128, 270, 30, 30);
        assert!(!can_spawn_enemy(&tiles, &body));
    }

    #[test]
    fn test_no_ground_rejects_spawn() {
        let tiles: Vec<Tile> = (0..5).map(|i| Tile::ground(64 + i * TILE_SIZE, 400)).collect();
        let body = Rect::new(128, 200, 30, 30);
        assert!(!can_spawn_enemy(&tiles, &body));
    }

    #[test]
    fn test_inside_terrain_rejects_spawn() {
        let mut tiles: Vec<Tile> = (0..5).map(|i| Tile::ground(64 + i * TILE_SIZE, 300)).collect();
        tiles.push(Tile::ground(128, 268));
        let body = Rect::new(128, 270, 30, 30);
        assert!(!can_spawn_enemy(&tiles, &body));
    }

    #[test]
    fn test_first_pass_has_no_enemies() {
        let (frontier, tiles, enemies) = run_passes(3, 1, 1.0);
        assert!(enemies.is_empty());
        assert!(frontier.x >= TILE_SIZE * 5);
        assert!(!tiles.is_empty());
    }

    #[test]
    fn test_ground_height_stays_bounded() {
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut tiles = Vec::new();
            let mut enemies = Vec::new();
            let mut frontier = Frontier::default();
            for _ in 0..100 {
                frontier = generate(frontier, &rules(0.0), &mut tiles, &mut enemies, &mut rng);
                assert!(frontier.ground_height >= TILE_SIZE * 3);
                assert!(frontier.ground_height <= SCREEN_HEIGHT - TILE_SIZE * 3);
            }
        }
    }

    #[test]
    fn test_frontier_always_advances() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut tiles = Vec::new();
        let mut enemies = Vec::new();
        let mut frontier = Frontier::default();
        for _ in 0..50 {
            let next = generate(frontier, &rules(0.9), &mut tiles, &mut enemies, &mut rng);
            // Ground segment is at least five tiles, every archetype adds at least two
            assert!(next.x >= frontier.x + TILE_SIZE * 7);
            assert!(next.strip_end >= next.x);
            frontier = next;
        }
    }

    #[test]
    fn test_zero_threshold_spawns_nothing() {
        let (_, _, enemies) = run_passes(5, 80, 0.0);
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_enemies_spawn_far_from_player_and_past_first_screen() {
        let mut spawned = 0;
        for seed in 0..10 {
            let (_, _, enemies) = run_passes(seed, 60, 1.0);
            spawned += enemies.len();
            for enemy in &enemies {
                assert!(enemy.active);
                assert!(enemy.rect.x > MIN_ENEMY_SPAWN_DISTANCE);
                assert!(enemy.rect.x > SCREEN_WIDTH / 2);
                assert_eq!(enemy.detection_range, 200.0);
            }
        }
        assert!(spawned > 0, "a permissive threshold should place some enemies");
    }

    #[test]
    fn test_ceiling_band_has_no_duplicate_columns() {
        let (_, tiles, _) = run_passes(9, 20, 0.0);
        let mut top_row: Vec<i32> = tiles
            .iter()
            .filter(|t| t.rect.y == 0)
            .map(|t| t.rect.x)
            .collect();
        let total = top_row.len();
        top_row.sort_unstable();
        top_row.dedup();
        assert_eq!(top_row.len(), total);
        // Contiguous from the origin
        assert_eq!(top_row[0], 0);
        assert!(top_row.windows(2).all(|w| w[1] - w[0] == TILE_SIZE));
    }

    #[test]
    fn test_first_segment_sits_on_starting_ground() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut tiles = Vec::new();
        let mut enemies = Vec::new();
        generate(Frontier::default(), &rules(0.0), &mut tiles, &mut enemies, &mut rng);
        assert!(tiles.iter().any(|t| t.rect.x == 0 && t.is_ground && t.rect.y == GROUND_HEIGHT));
    }
}
