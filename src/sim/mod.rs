//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed rate ticks driven by an injected clock reading
//! - Seeded RNG only, carried inside the state
//! - Stable iteration order (join order for jumpers, row order for platforms)
//! - No rendering, audio or transport dependencies

pub mod actions;
pub mod autopilot;
pub mod events;
pub mod generate;
pub mod physics;
pub mod round;
pub mod state;

pub use actions::{ActionError, Controls, controls, disconnect, join};
pub use events::GameEvent;
pub use generate::{Level, LevelStats, start_game};
pub use round::{TickInput, game_over, tick};
pub use state::{
    Direction, Enemy, EnemyKind, GameState, Jumper, Platform, PlayerId, RoundPhase, Rows,
};
