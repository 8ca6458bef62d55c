//! Sheet Jump - An endless vertical platform jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, generation, items, game state)
//! - `input`: Controller abstraction feeding per-tick input
//! - `highscores`: Top 10 ranking store
//! - `settings`: Persisted preferences (difficulty, nickname, controls)
//! - `session`: Session lifecycle (reset, difficulty change, ranking submission)

pub mod highscores;
pub mod input;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::Rankings;
pub use session::{Session, SessionCommand};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions (world units == pixels)
    pub const SCREEN_WIDTH: f32 = 450.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player box, anchored at its center
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Horizontal speed per tick
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Initial vertical velocity of a jump (negative = up)
    pub const JUMP_POWER: f32 = -15.0;
    /// Added to vertical velocity every tick
    pub const GRAVITY: f32 = 0.8;

    /// Platform defaults
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const PLATFORM_MIN_WIDTH: f32 = 1.0;
    pub const PLATFORM_MAX_WIDTH: f32 = 60.0;
    /// Fraction of the analytic max jump distance used for placement
    pub const REACH_SAFETY_FACTOR: f32 = 0.7;
    /// Vertical gap bounds as a fraction of max jump height
    pub const MIN_GAP_RATIO: f32 = 0.6;
    pub const MAX_GAP_RATIO: f32 = 0.8;
    /// Chance a platform is transforming (independent of difficulty)
    pub const TRANSFORM_PLATFORM_CHANCE: f32 = 0.2;
    /// Moving platforms gain +1 speed every this many units climbed
    pub const MOVING_SPEED_STEP: f32 = 400.0;
    /// Anchor platform sits this far above the screen bottom
    pub const ANCHOR_OFFSET: f32 = 100.0;
    /// Platforms created at session start
    pub const INITIAL_PLATFORM_COUNT: usize = 10;
    /// Tolerance band for re-validating a grounded player's contact
    pub const STAND_TOLERANCE: f32 = 5.0;

    /// Items
    pub const ITEM_SIZE: f32 = 15.0;
    pub const ITEM_SPAWN_CHANCE: f64 = 0.014;
    /// Minimum spacing to existing items when the platform is above / below them
    pub const ITEM_SPACING_ABOVE: f32 = 1000.0;
    pub const ITEM_SPACING_BELOW: f32 = 500.0;
    /// Horizontal jitter around the platform center
    pub const ITEM_JITTER: f32 = 10.0;

    /// Buffs expire after climbing this many meters...
    pub const BUFF_EXPIRY_UP_METERS: u32 = 10;
    /// ...or falling this many meters from the acquisition height
    pub const BUFF_EXPIRY_DOWN_METERS: u32 = 5;
    /// Per-tick acceleration while sliding on ice
    pub const ICE_ACCELERATION: f32 = 0.5;

    /// World units per meter of height
    pub const UNITS_PER_METER: f32 = 100.0;

    /// Camera starts following once the player is above 40% of the screen
    pub const CAMERA_FOLLOW_THRESHOLD: f32 = SCREEN_HEIGHT * 0.4;
    /// Entities further than this below the camera top are dropped
    pub const CULL_DISTANCE: f32 = SCREEN_HEIGHT * 2.0;
    /// Keep platforms generated this far above the player
    pub const LOOKAHEAD_DISTANCE: f32 = SCREEN_HEIGHT * 2.0;
}

use consts::*;

/// Ticks in the air from jump to landing at the same height
#[inline]
pub fn max_jump_time() -> f32 {
    (2.0 * JUMP_POWER / GRAVITY).abs()
}

/// Apex height of an unboosted jump: v² / 2g
#[inline]
pub fn max_jump_height() -> f32 {
    (JUMP_POWER * JUMP_POWER / (2.0 * GRAVITY)).abs()
}

/// Horizontal distance covered during a full jump
#[inline]
pub fn max_jump_distance() -> f32 {
    PLAYER_SPEED * max_jump_time()
}

/// Horizontal placement radius that keeps the next platform reachable
#[inline]
pub fn safe_jump_distance() -> f32 {
    max_jump_distance() * REACH_SAFETY_FACTOR
}

/// Simulation clock in milliseconds for a tick count
#[inline]
pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks * 1000 / TICK_RATE as u64
}
