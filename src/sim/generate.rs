//! Procedural level generation
//!
//! One round is a column of `ROW_COUNT` rows above a wide start platform.
//! Row placement gets sparser and more dangerous with height, but a walkable
//! platform is forced whenever `MAX_ROW_GAP` rows pass without one, so every
//! column can be climbed.

use rand::Rng;

use super::state::{Direction, Enemy, EnemyKind, GameState, Platform, Rows};
use crate::consts::*;

/// Counts collected while generating, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub platforms: u32,
    pub required: u32,
    pub spikes: u32,
    pub fallers: u32,
    pub springs: u32,
}

/// A generated round layout
#[derive(Debug, Clone)]
pub struct Level {
    pub platforms: Rows,
    pub enemies: Vec<Enemy>,
    pub theme: u8,
    pub stats: LevelStats,
}

impl Level {
    /// Generate a level from any RNG stream
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let theme = rng.random_range(0..THEME_COUNT);
        let mut stats = LevelStats::default();
        let mut platforms = Rows::with_rows(ROW_COUNT);

        let start_width = PLATFORM_WIDTH * 2.0;
        platforms.place(0, Platform::at_row(0, 0.5 - start_width / 2.0, start_width));
        stats.platforms += 1;

        let mut last_valid_row = 0usize;
        let mut last_spike = 0usize;

        for row in FIRST_GENERATED_ROW..ROW_COUNT {
            if row - last_valid_row >= MAX_ROW_GAP {
                platforms.place(row, required_platform(rng, row));
                last_valid_row = row;
                stats.platforms += 1;
                stats.required += 1;
                continue;
            }

            let height = row as f32;
            let place_chance = 1.0 - ((height / 50.0) * 0.1).min(0.8);
            if rng.random::<f32>() >= place_chance {
                continue;
            }

            let x = rng.random::<f32>() * (1.0 - PLATFORM_WIDTH);
            let mut platform = Platform::at_row(row, x, PLATFORM_WIDTH);
            let hazard_chance = 0.1 + height / 3000.0;

            platform.spikes = row - last_spike > 4 && row > 30 && rng.random::<f32>() < hazard_chance;
            platform.faller = !platform.spikes && rng.random::<f32>() < hazard_chance;
            platform.spring = !platform.spikes
                && !platform.faller
                && rng.random::<f32>() < 0.08 + height / 5000.0;

            if platform.is_walkable() {
                last_valid_row = row;
            }
            if platform.spikes {
                last_spike = row;
                stats.spikes += 1;
            }
            if platform.faller {
                stats.fallers += 1;
            }
            if platform.spring {
                stats.springs += 1;
            }
            stats.platforms += 1;
            platforms.place(row, platform);
        }

        let enemies = generate_enemies(rng);

        Self {
            platforms,
            enemies,
            theme,
            stats,
        }
    }
}

/// Centered platform jittered by up to half a width either way
fn required_platform<R: Rng>(rng: &mut R, row: usize) -> Platform {
    let jitter = (rng.random::<f32>() - 0.5) * PLATFORM_WIDTH;
    let x = (0.5 - PLATFORM_WIDTH / 2.0 + jitter).clamp(0.0, 1.0 - PLATFORM_WIDTH);
    Platform::at_row(row, x, PLATFORM_WIDTH)
}

fn generate_enemies<R: Rng>(rng: &mut R) -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(ENEMY_COUNT);
    let mut y = 1.0 + rng.random::<f32>() * 2.0;
    for i in 0..ENEMY_COUNT {
        if i > 0 {
            y += 1.0 + rng.random::<f32>() * 3.0;
        }
        let x = 0.25 + rng.random::<f32>() * 0.5;
        let dir = if rng.random_bool(0.5) {
            Direction::Left
        } else {
            Direction::Right
        };
        let speed = ENEMY_MIN_SPEED + rng.random::<f32>() * (ENEMY_MAX_SPEED - ENEMY_MIN_SPEED);
        enemies.push(Enemy {
            x,
            y,
            dir,
            speed,
            kind: EnemyKind::Bird,
        });
    }
    enemies
}

/// Reset `state` for a new round: wipe jumpers and timing, lay out a fresh level.
///
/// Session-wide `scores` and `best` survive.
pub fn start_game(state: &mut GameState) {
    let level = Level::generate(&mut state.rng);

    state.round += 1;
    log::info!(
        "Round {}: theme={}, platforms={} (required={}), spikes={}, fallers={}, springs={}",
        state.round,
        level.theme,
        level.stats.platforms,
        level.stats.required,
        level.stats.spikes,
        level.stats.fallers,
        level.stats.springs
    );

    state.jumpers.clear();
    state.platforms = level.platforms;
    state.enemies = level.enemies;
    state.theme = level.theme;
    state.start_at = None;
    state.jumping = false;
    state.game_restart_time = None;
}
