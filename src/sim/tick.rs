//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Entities
//! are updated in a fixed order so that platforms are in place before
//! the player is resolved against them:
//! input, platforms, items, buff expiry, player, score, camera, spawning.

use super::buff;
use super::state::{GameEvent, GamePhase, GameState};
use crate::safe_jump_distance;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal direction: -1 left, 0 none, 1 right
    pub horizontal: i8,
    /// Jump pressed this tick (edge, not held)
    pub jump: bool,
    /// Let the simulation drive the player
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    let now_ms = state.time_ms();

    // Input
    let horizontal = input.horizontal.clamp(-1, 1);
    if horizontal != 0 {
        state.player.move_horizontal(horizontal);
    }
    if input.jump {
        state.player.jump();
    }

    // Platforms move before the player is resolved against them
    for platform in &mut state.platforms {
        platform.update(&state.profile, now_ms);
    }

    // Items and pickup
    let player_box = state.player.hitbox();
    for item in &mut state.items {
        item.update();
        if item.collected || !item.hitbox().overlaps(&player_box) {
            continue;
        }
        if let Some(pickup) = item.collect() {
            buff::acquire(&mut state.player, &pickup, &mut state.platforms);
            state
                .events
                .push(GameEvent::ItemCollected { kind: pickup.kind });
        }
    }

    // Buff expiry against last tick's height
    for expired in buff::expire(&mut state.player, &mut state.platforms) {
        state.events.push(GameEvent::BuffExpired { buff: expired });
    }

    // Player physics and collision
    state.player.apply_gravity(&state.platforms);
    state.player.update_score(&state.profile);

    // Camera
    state.update_camera();

    if state.player.has_fallen() {
        state.player.alive = false;
        state.phase = GamePhase::GameOver;
        let score = state.player.best_score(&state.profile);
        let max_height = state.player.max_height;
        log::info!("Player fell: score={} max_height={}m", score, max_height);
        state.events.push(GameEvent::PlayerDied { score, max_height });
        return;
    }

    // Generation and spawning
    state.spawn_platforms_ahead();
    state.try_spawn_item();
    state.cull();
    state.normalize_order();
}

/// Input that steers toward the nearest platform above the last one stood on
pub fn autopilot_input(state: &GameState) -> TickInput {
    let player = &state.player;
    let ground = player.last_ground_y;
    let reach = crate::max_jump_height();

    let target = state
        .platforms
        .iter()
        .filter(|p| p.is_visible() && p.top() < ground - 1.0 && ground - p.top() <= reach)
        .max_by(|a, b| {
            a.top()
                .partial_cmp(&b.top())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = target else {
        return TickInput {
            autopilot: true,
            ..Default::default()
        };
    };

    let dx = target.center_x() - player.pos.x;
    let mut horizontal = if dx.abs() < crate::consts::PLAYER_SPEED {
        0
    } else {
        dx.signum() as i8
    };
    if player.buffs.has(buff::StackableBuff::KeyReverse) {
        horizontal = -horizontal;
    }

    TickInput {
        horizontal,
        jump: player.grounded && dx.abs() <= safe_jump_distance(),
        autopilot: true,
    }
}
