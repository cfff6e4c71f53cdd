//! Game state and core simulation types
//!
//! Everything a replica needs to reproduce the next tick lives here,
//! including the RNG stream, so a serialized `GameState` is a complete
//! rollback point.

use std::collections::BTreeMap;
use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::consts::*;
use crate::settings::Rules;

/// Host-assigned player identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Round lifecycle, derived from the timing fields of [`GameState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for every connected player to join
    Lobby,
    /// Start time armed, physics not running yet
    Countdown,
    /// Physics running
    Active,
    /// Winner decided, waiting for the restart time
    RoundOver,
}

/// A player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jumper {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    /// Peak height this round (never decreases)
    pub highest: f32,
    /// Cosmetic character index, stored as given
    #[serde(rename = "type")]
    pub kind: u8,
    pub vy: f32,
    pub left: bool,
    pub right: bool,
    pub dead: bool,
}

impl Jumper {
    /// A fresh jumper standing just above the start platform, primed to bounce
    pub fn spawn(id: PlayerId, kind: u8, x: f32) -> Self {
        Self {
            id,
            x,
            y: ROW_HEIGHT,
            highest: ROW_HEIGHT,
            kind,
            vy: DEFAULT_JUMP_POWER,
            left: false,
            right: false,
            dead: false,
        }
    }
}

/// A row-aligned platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Left edge
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub spikes: bool,
    /// Breaks away once landed on
    pub faller: bool,
    /// Currently detached and in free fall
    pub falling: bool,
    pub vy: f32,
    pub spring: bool,
}

impl Platform {
    /// A plain walkable platform occupying `row`
    pub fn at_row(row: usize, x: f32, width: f32) -> Self {
        Self {
            x,
            y: row as f32 * ROW_HEIGHT,
            width,
            spikes: false,
            faller: false,
            falling: false,
            vy: 0.0,
            spring: false,
        }
    }

    /// Safe to stand on: no spikes and won't break away
    pub fn is_walkable(&self) -> bool {
        !self.spikes && !self.faller
    }

    /// Whether a jumper centered at `x` overlaps this platform horizontally
    pub fn catches(&self, x: f32) -> bool {
        x >= self.x - PLAYER_HALF_WIDTH && x <= self.x + self.width + PLAYER_HALF_WIDTH
    }
}

/// Sparse row-indexed platform store, one slot per row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rows(Vec<Option<Platform>>);

impl Rows {
    pub fn with_rows(count: usize) -> Self {
        Self(vec![None; count])
    }

    /// Platform in `row`, if any (negative and out-of-range rows are empty)
    pub fn get(&self, row: i64) -> Option<&Platform> {
        let row = usize::try_from(row).ok()?;
        self.0.get(row).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, row: i64) -> Option<&mut Platform> {
        let row = usize::try_from(row).ok()?;
        self.0.get_mut(row).and_then(Option::as_mut)
    }

    /// Place `platform` in `row`, replacing whatever was there
    pub fn place(&mut self, row: usize, platform: Platform) {
        if row >= self.0.len() {
            self.0.resize(row + 1, None);
        }
        self.0[row] = Some(platform);
    }

    /// Number of row slots (occupied or not)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Occupied rows in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Platform)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(row, slot)| slot.as_ref().map(|p| (row, p)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Platform> {
        self.0.iter_mut().flatten()
    }
}

/// Patrol direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Enemy types (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Bird,
    Bat,
}

/// A horizontally patrolling hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub speed: f32,
    #[serde(rename = "type")]
    pub kind: EnemyKind,
}

impl Enemy {
    /// Advance one tick, turning around at the screen edges
    pub fn patrol(&mut self) {
        match self.dir {
            Direction::Left => self.x -= self.speed,
            Direction::Right => self.x += self.speed,
        }
        if self.x <= 0.0 {
            self.dir = Direction::Right;
        } else if self.x >= 1.0 {
            self.dir = Direction::Left;
        }
    }

    /// Axis-aligned proximity test against a jumper position
    pub fn touches(&self, x: f32, y: f32) -> bool {
        (self.x - x).abs() < ENEMY_HIT_RANGE && (self.y - y).abs() < ENEMY_HIT_RANGE
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed the RNG stream was created from
    pub seed: u64,
    /// RNG stream (advances only during level generation)
    pub rng: Pcg32,
    /// Session timing and join policy
    pub rules: Rules,
    /// Rounds generated so far this session
    pub round: u32,
    /// Jumpers in join order
    pub jumpers: Vec<Jumper>,
    pub platforms: Rows,
    pub enemies: Vec<Enemy>,
    /// Clock time the active phase begins
    pub start_at: Option<u64>,
    /// Physics running
    pub jumping: bool,
    /// Clock time the next round is generated
    pub game_restart_time: Option<u64>,
    /// Cosmetic palette index
    pub theme: u8,
    /// Events from the most recent tick only
    pub events: Vec<GameEvent>,
    /// Round wins per player (whole session)
    pub scores: BTreeMap<PlayerId, u32>,
    /// Highest height ever reached per player (whole session)
    pub best: BTreeMap<PlayerId, f32>,
}

impl GameState {
    /// Create a session state with default rules and generate the first round
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, Rules::default())
    }

    pub fn with_rules(seed: u64, rules: Rules) -> Self {
        let mut state = Self::empty(seed, rules);
        super::generate::start_game(&mut state);
        state
    }

    /// Session state with no level generated (row 0 missing too)
    pub(crate) fn empty(seed: u64, rules: Rules) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rules,
            round: 0,
            jumpers: Vec::new(),
            platforms: Rows::default(),
            enemies: Vec::new(),
            start_at: None,
            jumping: false,
            game_restart_time: None,
            theme: 0,
            events: Vec::new(),
            scores: BTreeMap::new(),
            best: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        if self.game_restart_time.is_some() {
            RoundPhase::RoundOver
        } else if self.jumping {
            RoundPhase::Active
        } else if self.start_at.is_some() {
            RoundPhase::Countdown
        } else {
            RoundPhase::Lobby
        }
    }

    pub fn jumper(&self, id: &PlayerId) -> Option<&Jumper> {
        self.jumpers.iter().find(|j| &j.id == id)
    }

    pub fn jumper_mut(&mut self, id: &PlayerId) -> Option<&mut Jumper> {
        self.jumpers.iter_mut().find(|j| &j.id == id)
    }

    /// The jumper with the strictly greatest `highest` (first in join order on ties)
    pub fn leader(&self) -> Option<&Jumper> {
        let mut leader: Option<&Jumper> = None;
        for jumper in &self.jumpers {
            if leader.is_none_or(|l| jumper.highest > l.highest) {
                leader = Some(jumper);
            }
        }
        leader
    }
}
