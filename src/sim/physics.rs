//! Per-tick physics and collision
//!
//! Jumper motion is sub-stepped so a single row lookup per sub-step is enough
//! to find landings: platforms are row-aligned and a sub-step never moves a
//! jumper more than a fraction of a row.

use std::collections::BTreeMap;

use super::events::GameEvent;
use super::round::game_over;
use super::state::{Enemy, GameState, Jumper, PlayerId, Rows};
use crate::consts::*;
use crate::row_of;

/// Advance platforms, enemies and jumpers by one tick
pub fn step(state: &mut GameState, now_ms: u64, events: &mut Vec<GameEvent>) {
    let round_over = game_over(state, now_ms);

    let GameState {
        jumpers,
        platforms,
        enemies,
        best,
        ..
    } = state;

    for platform in platforms.iter_mut().filter(|p| p.falling) {
        platform.vy += GRAVITY;
        platform.y += platform.vy;
    }

    for enemy in enemies.iter_mut() {
        enemy.patrol();
    }

    for jumper in jumpers.iter_mut() {
        step_jumper(jumper, platforms, enemies, best, round_over, events);
    }
}

fn step_jumper(
    jumper: &mut Jumper,
    platforms: &mut Rows,
    enemies: &[Enemy],
    best: &mut BTreeMap<PlayerId, f32>,
    round_over: bool,
    events: &mut Vec<GameEvent>,
) {
    jumper.vy += GRAVITY;

    for _ in 0..SUB_STEPS {
        jumper.y += jumper.vy / SUB_STEPS as f32;

        if jumper.dead || round_over {
            continue;
        }
        if jumper.vy < 0.0 && land(jumper, platforms, events) {
            break;
        }
    }

    if !jumper.dead && enemies.iter().any(|e| e.touches(jumper.x, jumper.y)) {
        kill(jumper, events);
    }

    if jumper.right {
        jumper.x = (jumper.x + MOVE_SPEED).min(1.0 - PLAYER_HALF_WIDTH);
    }
    if jumper.left {
        jumper.x = (jumper.x - MOVE_SPEED).max(PLAYER_HALF_WIDTH);
    }

    jumper.highest = jumper.highest.max(jumper.y);
    let record = best.entry(jumper.id.clone()).or_insert(jumper.highest);
    if jumper.highest > *record {
        *record = jumper.highest;
    }

    if !jumper.dead && jumper.y < jumper.highest - FALL_LIMIT {
        kill(jumper, events);
    }
}

/// Resolve a landing on the platform in the jumper's current row.
///
/// Returns true when a landing happened. The jump velocity is applied even
/// on a fatal spike landing.
fn land(jumper: &mut Jumper, platforms: &mut Rows, events: &mut Vec<GameEvent>) -> bool {
    let Some(platform) = platforms.get_mut(row_of(jumper.y)) else {
        return false;
    };
    if platform.falling || !platform.catches(jumper.x) {
        return false;
    }

    jumper.y = platform.y;
    jumper.vy = if platform.spring {
        DEFAULT_JUMP_POWER * SPRING_MULTIPLIER
    } else {
        DEFAULT_JUMP_POWER
    };

    if platform.spikes {
        kill(jumper, events);
    } else {
        if platform.faller {
            platform.falling = true;
        }
        let player = jumper.id.clone();
        events.push(if platform.spring {
            GameEvent::Spring { player }
        } else {
            GameEvent::Bounce { player }
        });
    }
    true
}

fn kill(jumper: &mut Jumper, events: &mut Vec<GameEvent>) {
    log::debug!("{} died at y={:.2}", jumper.id, jumper.y);
    jumper.dead = true;
    events.push(GameEvent::Die {
        player: jumper.id.clone(),
    });
}
