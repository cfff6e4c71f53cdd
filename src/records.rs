//! Per-session standings
//!
//! A read-only leaderboard over the win counts and best heights kept in the
//! game state. Nothing here outlives the session.

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, PlayerId};

/// One player's session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,
    /// Rounds won
    pub wins: u32,
    /// Highest height reached in any round
    pub best: f32,
}

/// Everyone with a record, most wins first, then best height, then id
pub fn standings(state: &GameState) -> Vec<Standing> {
    let mut players: Vec<&PlayerId> = state.scores.keys().chain(state.best.keys()).collect();
    players.sort();
    players.dedup();

    let mut table: Vec<Standing> = players
        .into_iter()
        .map(|player| Standing {
            player: player.clone(),
            wins: state.scores.get(player).copied().unwrap_or(0),
            best: state.best.get(player).copied().unwrap_or(0.0),
        })
        .collect();

    table.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.best.total_cmp(&a.best))
            .then_with(|| a.player.cmp(&b.player))
    });
    table
}
