//! Collision detection for player, platforms and items
//!
//! Per-tick vertical displacement can exceed a platform's height, so
//! landings are tested against the swept interval between the previous
//! and current bottom edge rather than against the current position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use crate::consts::STAND_TOLERANCE;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap (touching edges don't count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// The vertical span swept by the player's bottom edge during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptBottom {
    /// Bottom edge before this tick's integration
    pub prev: f32,
    /// Bottom edge after
    pub current: f32,
}

impl SweptBottom {
    /// Whether the bottom edge crossed (or touched) `top` moving downward
    #[inline]
    pub fn crosses(&self, top: f32) -> bool {
        self.prev <= top && self.current >= top
    }
}

/// Find the platform landed on this tick, if any
///
/// Only visible platforms whose top the bottom edge swept across and
/// whose span contains `center_x` qualify. When several qualify the
/// highest top wins (it is reached first while descending), then the
/// lowest id.
pub fn find_landing(swept: SweptBottom, center_x: f32, platforms: &[Platform]) -> Option<usize> {
    platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_visible() && swept.crosses(p.top()) && p.spans_x(center_x))
        .min_by(|(_, a), (_, b)| {
            a.top()
                .partial_cmp(&b.top())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        })
        .map(|(i, _)| i)
}

/// Re-validate contact for a grounded player within the tolerance band
///
/// Picks the platform whose top is closest to `bottom`.
pub fn find_standing(bottom: f32, center_x: f32, platforms: &[Platform]) -> Option<usize> {
    platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.is_visible() && (bottom - p.top()).abs() <= STAND_TOLERANCE && p.spans_x(center_x)
        })
        .min_by(|(_, a), (_, b)| {
            let da = (bottom - a.top()).abs();
            let db = (bottom - b.top()).abs();
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        })
        .map(|(i, _)| i)
}
