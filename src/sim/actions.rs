//! Player actions applied between ticks
//!
//! Every rejection leaves the state untouched. Hosts should treat an `Err`
//! as a silent no-op on every replica.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::state::{GameState, Jumper, PlayerId};
use crate::consts::*;

/// Held horizontal controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Joins close once physics is running
    RoundInProgress,
    AlreadyJoined(PlayerId),
    RoundFull { max_players: usize },
    UnknownPlayer(PlayerId),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundInProgress => write!(f, "round already in progress"),
            Self::AlreadyJoined(id) => write!(f, "player {id} already joined"),
            Self::RoundFull { max_players } => write!(f, "round is full ({max_players} players)"),
            Self::UnknownPlayer(id) => write!(f, "player {id} has no jumper"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Spawn x for the `index`-th joiner of a group of `group` players, spaced
/// `SPAWN_SPACING` apart and centered on the column
pub fn spawn_x(index: usize, group: usize) -> f32 {
    let group = group.max(index + 1);
    0.5 - (group - 1) as f32 * SPAWN_SPACING / 2.0 + index as f32 * SPAWN_SPACING
}

/// Add a jumper for `player` to the upcoming round
///
/// `connected` is the number of players currently connected; spawn positions
/// center that whole group.
pub fn join(
    state: &mut GameState,
    player: PlayerId,
    kind: u8,
    connected: usize,
) -> Result<(), ActionError> {
    if let Err(err) = check_join(state, &player) {
        log::debug!("join by {player} rejected: {err}");
        return Err(err);
    }

    let x = spawn_x(state.jumpers.len(), connected);
    log::debug!("{player} joined as type {kind} at x={x:.2}");
    state.jumpers.push(Jumper::spawn(player, kind, x));
    Ok(())
}

fn check_join(state: &GameState, player: &PlayerId) -> Result<(), ActionError> {
    if state.jumping {
        return Err(ActionError::RoundInProgress);
    }
    if state.jumper(player).is_some() {
        return Err(ActionError::AlreadyJoined(player.clone()));
    }
    let max_players = state.rules.max_players;
    if state.jumpers.len() >= max_players {
        return Err(ActionError::RoundFull { max_players });
    }
    Ok(())
}

/// Overwrite the held controls of `player`'s jumper
pub fn controls(
    state: &mut GameState,
    player: &PlayerId,
    controls: Controls,
) -> Result<(), ActionError> {
    let Some(jumper) = state.jumper_mut(player) else {
        log::debug!("controls from {player} ignored: no jumper");
        return Err(ActionError::UnknownPlayer(player.clone()));
    };
    jumper.left = controls.left;
    jumper.right = controls.right;
    Ok(())
}

/// Remove `player`'s jumper immediately, whatever the round phase
pub fn disconnect(state: &mut GameState, player: &PlayerId) {
    let before = state.jumpers.len();
    state.jumpers.retain(|j| &j.id != player);
    if state.jumpers.len() != before {
        log::info!("{player} left, {} jumpers remain", state.jumpers.len());
    }
}
