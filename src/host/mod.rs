//! Host abstraction layer
//!
//! Bridges a host runtime to the simulation:
//! - Clock readings (monotonic milliseconds since session start)
//! - Connected player tracking and join/leave notifications
//! - FIFO queue of player actions applied between ticks

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::settings::Rules;
use crate::sim::{self, ActionError, Controls, GameEvent, GameState, PlayerId, TickInput};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Monotonic session clock
pub trait Clock {
    /// Milliseconds since the session started
    fn now_ms(&self) -> u64;
}

/// Wall-clock-free monotonic clock backed by `Instant`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    started: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn start() -> Self {
        Self {
            started: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Clock advanced explicitly, for replays and offline runs
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// A player action queued for the next tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Join { player: PlayerId, kind: u8 },
    Controls { player: PlayerId, controls: Controls },
}

impl Action {
    pub fn player(&self) -> &PlayerId {
        match self {
            Action::Join { player, .. } | Action::Controls { player, .. } => player,
        }
    }
}

/// One game session: the state plus what the host knows about its players
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    connected: Vec<PlayerId>,
    pending: VecDeque<Action>,
}

impl Session {
    pub fn new(seed: u64, rules: Rules) -> Self {
        log::info!("Session created with seed {seed}");
        Self {
            state: GameState::with_rules(seed, rules),
            connected: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Resume from a decoded snapshot
    pub fn from_state(state: GameState, connected: Vec<PlayerId>) -> Self {
        Self {
            state,
            connected,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn connected(&self) -> &[PlayerId] {
        &self.connected
    }

    pub fn player_joined(&mut self, player: PlayerId) {
        if !self.connected.contains(&player) {
            log::info!("{player} connected");
            self.connected.push(player);
        }
    }

    /// Drop the player and their jumper right away, along with queued actions
    pub fn player_left(&mut self, player: &PlayerId) {
        self.connected.retain(|p| p != player);
        self.pending.retain(|a| a.player() != player);
        sim::disconnect(&mut self.state, player);
    }

    pub fn submit(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    /// Apply queued actions in arrival order, then advance one tick
    pub fn step(&mut self, now_ms: u64) -> &[GameEvent] {
        while let Some(action) = self.pending.pop_front() {
            // Rejections are no-ops on every replica
            let _ = self.apply(action);
        }
        let input = TickInput {
            now_ms,
            connected: &self.connected,
        };
        sim::tick(&mut self.state, &input)
    }

    /// Advance one tick at the clock's current reading
    pub fn step_with(&mut self, clock: &impl Clock) -> &[GameEvent] {
        self.step(clock.now_ms())
    }

    fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        match action {
            Action::Join { player, kind } => {
                sim::join(&mut self.state, player, kind, self.connected.len())
            }
            Action::Controls { player, controls } => {
                sim::controls(&mut self.state, &player, controls)
            }
        }
    }
}
