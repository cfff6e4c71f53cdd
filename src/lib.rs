//! Sky Hop - A multiplayer platform-jumping simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, physics, round flow)
//! - `host`: Clock abstraction and the session driver a host runtime calls into
//! - `snapshot`: Versioned state snapshots for transport and rollback
//! - `settings`: Session rules and driver configuration
//! - `records`: Per-session standings

pub mod host;
pub mod records;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use records::{Standing, standings};
pub use settings::{Rules, Settings};

/// Game configuration constants
///
/// Positions are screen-relative: `x` spans `[0, 1]` across the column and
/// one unit of `y` is one screen height.
pub mod consts {
    /// Fixed simulation rate (updates per second)
    pub const TICK_RATE: u32 = 30;

    /// Level layout
    pub const ROW_HEIGHT: f32 = 0.05;
    pub const ROW_COUNT: usize = 1000;
    /// Rows 1..FIRST_GENERATED_ROW stay empty above the start platform
    pub const FIRST_GENERATED_ROW: usize = 5;
    /// A required platform is forced once this many rows pass without a walkable one
    pub const MAX_ROW_GAP: usize = 5;
    pub const PLATFORM_WIDTH: f32 = 0.3;
    pub const THEME_COUNT: u8 = 4;

    /// Jumper physics
    pub const DEFAULT_JUMP_POWER: f32 = 0.03;
    /// Applied once per tick, not per sub-step
    pub const GRAVITY: f32 = -0.0015;
    pub const PLAYER_HALF_WIDTH: f32 = 0.03;
    pub const MOVE_SPEED: f32 = 0.02;
    pub const SPRING_MULTIPLIER: f32 = 1.5;
    pub const SUB_STEPS: u32 = 10;
    /// Falling this far below your own peak is fatal
    pub const FALL_LIMIT: f32 = 0.5;

    /// Spawn layout
    pub const SPAWN_SPACING: f32 = 0.2;
    pub const MAX_JUMPER_TYPE: u8 = 8;

    /// Enemies
    pub const ENEMY_COUNT: usize = 10;
    pub const ENEMY_HIT_RANGE: f32 = 0.05;
    pub const ENEMY_MIN_SPEED: f32 = 0.002;
    pub const ENEMY_MAX_SPEED: f32 = 0.007;
}

/// Row index containing height `y` (negative below the start platform)
#[inline]
pub fn row_of(y: f32) -> i64 {
    (y / consts::ROW_HEIGHT).floor() as i64
}
