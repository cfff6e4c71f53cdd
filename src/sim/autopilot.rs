//! Idle/demo mode controller
//!
//! Steers a jumper toward the best safe platform within jumping reach. Reads
//! state only, so running it on every replica keeps them in agreement.

use super::actions::Controls;
use super::state::{GameState, Jumper, Platform};
use crate::consts::*;
use crate::row_of;

/// Rows above the jumper worth aiming for while rising (a full jump clears ~6)
const REACH_ROWS: i64 = 6;
/// Rows below the jumper to consider while falling
const CATCH_ROWS: i64 = 8;

/// Pick controls for `jumper` given the current level
pub fn steer(state: &GameState, jumper: &Jumper) -> Controls {
    if jumper.dead {
        return Controls::default();
    }

    let row = row_of(jumper.y);
    // Rising: highest reachable first. Falling: closest below first.
    let (low, high) = if jumper.vy > 0.0 {
        (row + 1, row + REACH_ROWS)
    } else {
        (row - CATCH_ROWS, row)
    };

    let target = (low..=high)
        .rev()
        .filter_map(|r| state.platforms.get(r))
        .find(|p| is_safe_target(p));

    match target {
        Some(p) => toward(jumper.x, p.x + p.width / 2.0),
        None => Controls::default(),
    }
}

fn is_safe_target(platform: &Platform) -> bool {
    !platform.spikes && !platform.falling
}

fn toward(x: f32, target_x: f32) -> Controls {
    let dx = target_x - x;
    Controls {
        left: dx < -MOVE_SPEED,
        right: dx > MOVE_SPEED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Rules;
    use crate::sim::state::Rows;

    fn state_with(rows: &[(usize, f32, bool)]) -> GameState {
        let mut state = GameState::empty(1, Rules::default());
        state.platforms = Rows::with_rows(ROW_COUNT);
        for &(row, x, spikes) in rows {
            let mut p = Platform::at_row(row, x, PLATFORM_WIDTH);
            p.spikes = spikes;
            state.platforms.place(row, p);
        }
        state
    }

    #[test]
    fn test_rising_aims_for_highest_safe_platform() {
        let state = state_with(&[(3, 0.0, false), (5, 0.6, false), (6, 0.0, true)]);
        let mut jumper = Jumper::spawn("bot".into(), 0, 0.5);
        jumper.vy = 0.02;

        let c = steer(&state, &jumper);
        assert!(c.right && !c.left);
    }

    #[test]
    fn test_falling_aims_below() {
        let state = state_with(&[(2, 0.0, false)]);
        let mut jumper = Jumper::spawn("bot".into(), 0, 0.6);
        jumper.y = 0.3;
        jumper.vy = -0.01;

        let c = steer(&state, &jumper);
        assert!(c.left && !c.right);
    }

    #[test]
    fn test_holds_still_when_over_target() {
        let state = state_with(&[(4, 0.35, false)]);
        let jumper = Jumper::spawn("bot".into(), 0, 0.5);
        assert_eq!(steer(&state, &jumper), Controls::default());
    }

    #[test]
    fn test_dead_jumper_gets_no_input() {
        let state = state_with(&[(4, 0.7, false)]);
        let mut jumper = Jumper::spawn("bot".into(), 0, 0.1);
        jumper.dead = true;
        assert_eq!(steer(&state, &jumper), Controls::default());
    }
}
