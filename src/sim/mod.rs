//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, input device or storage dependencies

pub mod buff;
pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod item;
pub mod platform;
pub mod player;
pub mod state;
pub mod tick;

pub use buff::{Buff, BuffState, PositiveBuff, StackableBuff};
pub use collision::{Aabb, SweptBottom, find_landing, find_standing};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use item::{Item, ItemEffect, ItemKind, Pickup};
pub use platform::{Platform, PlatformBehavior, PlatformKind};
pub use player::Player;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, autopilot_input, tick};
