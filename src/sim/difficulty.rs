//! Difficulty presets
//!
//! A profile is chosen once per session and passed by value into the
//! game state; nothing in the simulation mutates it.

use serde::{Deserialize, Serialize};

/// Selectable difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Tuning parameters for this level
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                difficulty: *self,
                platform_width_decrease: 0.0,
                moving_platform_speed: 1.0,
                moving_platform_max_speed: 4.0,
                moving_platform_chance: 0.2,
                transform_min_speed: 0.4,
                transform_max_speed: 2.4,
                transform_min_width_ratio: 0.3,
                vanish_interval_ms: 3000,
                vanish_duration_ms: 500,
                vanish_platform_chance: 0.1,
                score_multiplier: 0.9,
            },
            Difficulty::Normal => DifficultyProfile {
                difficulty: *self,
                platform_width_decrease: 1.0,
                moving_platform_speed: 2.0,
                moving_platform_max_speed: 5.0,
                moving_platform_chance: 0.3,
                transform_min_speed: 0.5,
                transform_max_speed: 2.0,
                transform_min_width_ratio: 0.2,
                vanish_interval_ms: 2000,
                vanish_duration_ms: 1000,
                vanish_platform_chance: 0.2,
                score_multiplier: 1.0,
            },
            Difficulty::Hard => DifficultyProfile {
                difficulty: *self,
                platform_width_decrease: 2.0,
                moving_platform_speed: 3.0,
                moving_platform_max_speed: 6.0,
                moving_platform_chance: 0.4,
                transform_min_speed: 0.6,
                transform_max_speed: 1.6,
                transform_min_width_ratio: 0.1,
                vanish_interval_ms: 1000,
                vanish_duration_ms: 1500,
                vanish_platform_chance: 0.3,
                score_multiplier: 1.5,
            },
        }
    }
}

/// Immutable tuning values for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    /// Width lost per generated platform (0 = always max width)
    pub platform_width_decrease: f32,
    /// Base speed of moving platforms (units/tick)
    pub moving_platform_speed: f32,
    /// Speed cap for moving platforms
    pub moving_platform_max_speed: f32,
    pub moving_platform_chance: f32,
    /// Transforming platforms pick a resize speed in this range
    pub transform_min_speed: f32,
    pub transform_max_speed: f32,
    /// Smallest width as a fraction of the initial width
    pub transform_min_width_ratio: f32,
    /// How long a vanishing platform stays visible
    pub vanish_interval_ms: u64,
    /// How long it stays hidden
    pub vanish_duration_ms: u64,
    pub vanish_platform_chance: f32,
    pub score_multiplier: f32,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}
