//! Platform entity and per-type behavior
//!
//! A platform is an axis-aligned box anchored at its top-left corner.
//! Its behavior is a closed set of variants, each carrying only the
//! state it needs, so invalid flag combinations cannot be expressed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyProfile;
use crate::consts::*;

/// Behavior of a platform, with per-variant state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformBehavior {
    Static,
    /// Oscillates horizontally between the screen edges
    Moving {
        speed: f32,
        /// +1 right, -1 left
        direction: f32,
        /// Actual x displacement applied on the last update
        last_dx: f32,
    },
    /// Width oscillates around a fixed horizontal center
    Transforming {
        speed: f32,
        /// +1 growing, -1 shrinking
        direction: f32,
        center_x: f32,
        min_width: f32,
        /// Held at its current width (transform assist)
        pinned: bool,
    },
    /// Alternates between visible and hidden on the simulation clock
    Vanishing { visible: bool, since_ms: u64 },
}

/// Behavior discriminant without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    Moving,
    Transforming,
    Vanishing,
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner in world space
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Width at creation; upper bound for transforming platforms
    pub base_width: f32,
    pub behavior: PlatformBehavior,
}

impl Platform {
    pub fn new(id: u32, x: f32, y: f32, width: f32, behavior: PlatformBehavior) -> Self {
        let width = width.clamp(PLATFORM_MIN_WIDTH, PLATFORM_MAX_WIDTH);
        Self {
            id,
            pos: Vec2::new(x.clamp(0.0, SCREEN_WIDTH - width), y),
            width,
            height: PLATFORM_HEIGHT,
            base_width: width,
            behavior,
        }
    }

    pub fn new_static(id: u32, x: f32, y: f32, width: f32) -> Self {
        Self::new(id, x, y, width, PlatformBehavior::Static)
    }

    /// Moving platform whose speed grows with the height it was placed at
    pub fn new_moving(id: u32, x: f32, y: f32, width: f32, profile: &DifficultyProfile) -> Self {
        let behavior = PlatformBehavior::Moving {
            speed: moving_speed_at(profile, y),
            direction: 1.0,
            last_dx: 0.0,
        };
        Self::new(id, x, y, width, behavior)
    }

    /// Transforming platform; starts at full width and shrinks first
    pub fn new_transforming(id: u32, x: f32, y: f32, width: f32, speed: f32, min_ratio: f32) -> Self {
        let mut platform = Self::new(id, x, y, width, PlatformBehavior::Static);
        platform.behavior = PlatformBehavior::Transforming {
            speed,
            direction: -1.0,
            center_x: platform.center_x(),
            min_width: (platform.base_width * min_ratio).max(PLATFORM_MIN_WIDTH),
            pinned: false,
        };
        platform
    }

    pub fn new_vanishing(id: u32, x: f32, y: f32, width: f32, now_ms: u64) -> Self {
        let behavior = PlatformBehavior::Vanishing {
            visible: true,
            since_ms: now_ms,
        };
        Self::new(id, x, y, width, behavior)
    }

    pub fn kind(&self) -> PlatformKind {
        match self.behavior {
            PlatformBehavior::Static => PlatformKind::Static,
            PlatformBehavior::Moving { .. } => PlatformKind::Moving,
            PlatformBehavior::Transforming { .. } => PlatformKind::Transforming,
            PlatformBehavior::Vanishing { .. } => PlatformKind::Vanishing,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Whether the platform can be collided with and drawn
    pub fn is_visible(&self) -> bool {
        match self.behavior {
            PlatformBehavior::Vanishing { visible, .. } => visible,
            _ => true,
        }
    }

    /// Horizontal displacement a rider should inherit this tick
    pub fn carry_dx(&self) -> f32 {
        match self.behavior {
            PlatformBehavior::Moving { last_dx, .. } => last_dx,
            _ => 0.0,
        }
    }

    /// Whether x lies within the platform's horizontal span (inclusive)
    #[inline]
    pub fn spans_x(&self, x: f32) -> bool {
        self.left() <= x && x <= self.right()
    }

    /// Advance behavior by one tick
    pub fn update(&mut self, profile: &DifficultyProfile, now_ms: u64) {
        match &mut self.behavior {
            PlatformBehavior::Static => {}
            PlatformBehavior::Moving {
                speed,
                direction,
                last_dx,
            } => {
                let before = self.pos.x;
                self.pos.x += *speed * *direction;

                // Reflect at the screen edges
                if self.pos.x <= 0.0 {
                    self.pos.x = 0.0;
                    *direction = 1.0;
                } else if self.pos.x + self.width >= SCREEN_WIDTH {
                    self.pos.x = SCREEN_WIDTH - self.width;
                    *direction = -1.0;
                }
                *last_dx = self.pos.x - before;
            }
            PlatformBehavior::Transforming {
                speed,
                direction,
                center_x,
                min_width,
                pinned,
            } => {
                if *pinned {
                    return;
                }
                let mut width = self.width + *speed * *direction;
                if width <= *min_width {
                    width = *min_width;
                    *direction = 1.0;
                } else if width >= self.base_width {
                    width = self.base_width;
                    *direction = -1.0;
                }
                self.width = width;
                self.pos.x = (*center_x - width / 2.0).clamp(0.0, SCREEN_WIDTH - width);
            }
            PlatformBehavior::Vanishing { visible, since_ms } => {
                let elapsed = now_ms.saturating_sub(*since_ms);
                let limit = if *visible {
                    profile.vanish_interval_ms
                } else {
                    profile.vanish_duration_ms
                };
                if elapsed > limit {
                    *visible = !*visible;
                    *since_ms = now_ms;
                }
            }
        }
    }

    /// Resize around the current horizontal center, staying on screen
    pub fn set_width_centered(&mut self, width: f32) {
        let center = match self.behavior {
            PlatformBehavior::Transforming { center_x, .. } => center_x,
            _ => self.center_x(),
        };
        let width = width.clamp(PLATFORM_MIN_WIDTH, PLATFORM_MAX_WIDTH);
        self.width = width;
        self.pos.x = (center - width / 2.0).clamp(0.0, SCREEN_WIDTH - width);
    }

    /// Widen to the maximum and hold there; returns the width to restore later
    pub fn assist_widen(&mut self) -> f32 {
        let original = self.width;
        if let PlatformBehavior::Transforming { pinned, .. } = &mut self.behavior {
            *pinned = true;
        }
        self.set_width_centered(PLATFORM_MAX_WIDTH);
        original
    }

    /// Undo [`Platform::assist_widen`]
    pub fn assist_restore(&mut self, width: f32) {
        if let PlatformBehavior::Transforming { pinned, .. } = &mut self.behavior {
            *pinned = false;
        }
        self.set_width_centered(width);
    }
}

/// Moving platform speed for a platform placed at world height `y`
pub fn moving_speed_at(profile: &DifficultyProfile, y: f32) -> f32 {
    let height_factor = ((SCREEN_HEIGHT - y) / MOVING_SPEED_STEP).floor().max(0.0);
    (profile.moving_platform_speed + height_factor).min(profile.moving_platform_max_speed)
}
