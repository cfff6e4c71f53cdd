//! Session rules and driver settings
//!
//! Loaded from an optional JSON file; anything missing falls back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;

/// Round timing and join policy, shared by every replica of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Lobby to active delay once everyone has joined
    pub countdown_ms: u64,
    /// Round over to next round delay
    pub restart_delay_ms: u64,
    /// Maximum active time of a round
    pub round_time_ms: u64,
    pub max_players: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            countdown_ms: 3000,
            restart_delay_ms: 3000,
            round_time_ms: 2 * 60 * 1000,
            max_players: 4,
        }
    }
}

/// Driver configuration for the headless runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ticks per second
    pub tick_rate: u32,
    /// Session seed (random when unset)
    pub seed: Option<u64>,
    /// Autopilot players to connect
    pub bots: usize,
    /// Rounds to play before exiting
    pub rounds: u32,
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            seed: None,
            bots: 4,
            rounds: 3,
            rules: Rules::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({e}), using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Milliseconds between ticks
    pub fn tick_interval_ms(&self) -> u64 {
        1000 / u64::from(self.tick_rate.max(1))
    }
}
