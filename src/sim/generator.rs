//! Procedural platform placement
//!
//! Every platform is placed relative to its predecessor inside a window
//! derived from the jump arc, so the chain stays reachable:
//! - horizontally within `safe_jump_distance()` of the previous x
//! - vertically 60-80% of `max_jump_height()` above the previous top

use rand::Rng;

use super::difficulty::DifficultyProfile;
use super::platform::{Platform, PlatformKind};
use crate::consts::*;
use crate::{max_jump_height, safe_jump_distance};

/// Width of the platform following one of `prev_width`
pub fn next_width(profile: &DifficultyProfile, prev_width: f32) -> f32 {
    if profile.platform_width_decrease == 0.0 {
        PLATFORM_MAX_WIDTH
    } else {
        (prev_width - profile.platform_width_decrease).max(PLATFORM_MIN_WIDTH)
    }
}

/// Range of left-edge x values reachable from `prev_x` for a platform of `width`
///
/// Collapses to the rightmost on-screen position when the window is empty.
pub fn placement_window(prev_x: f32, width: f32) -> (f32, f32) {
    let reach = safe_jump_distance();
    let min_x = (prev_x - reach).max(0.0);
    let max_x = (prev_x + reach).min(SCREEN_WIDTH - width);
    if min_x > max_x {
        let x = (SCREEN_WIDTH - width).max(0.0);
        (x, x)
    } else {
        (min_x, max_x)
    }
}

/// Bounds of the vertical gap between consecutive platforms
pub fn vertical_gap_range() -> (f32, f32) {
    let height = max_jump_height();
    (height * MIN_GAP_RATIO, height * MAX_GAP_RATIO)
}

/// Draw the behavior of the next platform
///
/// Cumulative thresholds in priority order: moving, transforming,
/// vanishing, static. After a vanishing platform only moving or static
/// may follow.
pub fn choose_kind<R: Rng>(
    rng: &mut R,
    profile: &DifficultyProfile,
    prev_kind: Option<PlatformKind>,
) -> PlatformKind {
    let roll: f32 = rng.random();
    let moving = profile.moving_platform_chance;

    if prev_kind == Some(PlatformKind::Vanishing) {
        return if roll < moving {
            PlatformKind::Moving
        } else {
            PlatformKind::Static
        };
    }

    let transforming = moving + TRANSFORM_PLATFORM_CHANCE;
    let vanishing = transforming + profile.vanish_platform_chance;
    if roll < moving {
        PlatformKind::Moving
    } else if roll < transforming {
        PlatformKind::Transforming
    } else if roll < vanishing {
        PlatformKind::Vanishing
    } else {
        PlatformKind::Static
    }
}

/// Create the next platform above `prev`
pub fn create_random<R: Rng>(
    rng: &mut R,
    profile: &DifficultyProfile,
    prev: &Platform,
    id: u32,
    now_ms: u64,
) -> Platform {
    let width = next_width(profile, prev.base_width);

    let (min_x, max_x) = placement_window(prev.left(), width);
    let x = if min_x < max_x {
        rng.random_range(min_x..=max_x)
    } else {
        min_x
    };

    let (min_gap, max_gap) = vertical_gap_range();
    let y = prev.top() - rng.random_range(min_gap..=max_gap);

    match choose_kind(rng, profile, Some(prev.kind())) {
        PlatformKind::Static => Platform::new_static(id, x, y, width),
        PlatformKind::Moving => Platform::new_moving(id, x, y, width, profile),
        PlatformKind::Transforming => {
            let speed = rng.random_range(profile.transform_min_speed..=profile.transform_max_speed);
            Platform::new_transforming(id, x, y, width, speed, profile.transform_min_width_ratio)
        }
        PlatformKind::Vanishing => Platform::new_vanishing(id, x, y, width, now_ms),
    }
}

/// Static anchor near the bottom of the screen followed by `count - 1` random platforms
///
/// `next_id` is advanced past the ids handed out.
pub fn create_initial_platforms<R: Rng>(
    rng: &mut R,
    profile: &DifficultyProfile,
    count: usize,
    next_id: &mut u32,
    now_ms: u64,
) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(count.max(1));
    let anchor = Platform::new_static(
        take_id(next_id),
        SCREEN_WIDTH / 2.0 - PLATFORM_MAX_WIDTH / 2.0,
        SCREEN_HEIGHT - ANCHOR_OFFSET,
        PLATFORM_MAX_WIDTH,
    );
    platforms.push(anchor);

    for _ in 1..count {
        let prev = &platforms[platforms.len() - 1];
        let platform = create_random(rng, profile, prev, take_id(next_id), now_ms);
        platforms.push(platform);
    }

    log::info!(
        "Created {} initial platforms ({})",
        platforms.len(),
        profile.difficulty.as_str()
    );
    platforms
}

/// Generate platforms until the highest one is `LOOKAHEAD_DISTANCE` above `player_y`
///
/// Returns the number of platforms added.
pub fn extend_platforms<R: Rng>(
    rng: &mut R,
    profile: &DifficultyProfile,
    platforms: &mut Vec<Platform>,
    player_y: f32,
    next_id: &mut u32,
    now_ms: u64,
) -> usize {
    let Some(mut highest) = highest_platform(platforms).cloned() else {
        return 0;
    };

    let mut added = 0;
    while highest.top() > player_y - LOOKAHEAD_DISTANCE {
        let platform = create_random(rng, profile, &highest, take_id(next_id), now_ms);
        platforms.push(platform.clone());
        highest = platform;
        added += 1;
    }

    if added > 0 {
        log::debug!("Extended ladder by {} platforms (top y = {:.1})", added, highest.top());
    }
    added
}

/// The platform with the smallest y
pub fn highest_platform(platforms: &[Platform]) -> Option<&Platform> {
    platforms.iter().min_by(|a, b| {
        a.top()
            .partial_cmp(&b.top())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn take_id(next_id: &mut u32) -> u32 {
    let id = *next_id;
    *next_id += 1;
    id
}
