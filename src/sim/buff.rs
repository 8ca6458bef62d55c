//! Player buffs
//!
//! Positive buffs (double jump, jump boost) are mutually exclusive and
//! counted in uses. Stackable buffs form a set keyed by kind. Every buff
//! also expires by height: climbing 10m or falling 5m from where it was
//! picked up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::item::{ItemEffect, Pickup};
use super::platform::Platform;
use super::player::Player;
use crate::consts::*;

/// Mutually exclusive enhancements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositiveBuff {
    DoubleJump,
    JumpBoost,
}

/// Status effects that can coexist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StackableBuff {
    SpeedReduce,
    KeyReverse,
    IceSlide,
    TransformAssist,
}

/// Any buff, for expiry reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Buff {
    Positive(PositiveBuff),
    Stackable(StackableBuff),
}

/// The active positive buff and its remaining uses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePositive {
    pub kind: PositiveBuff,
    pub remaining: u32,
    /// Raw height (m) at pickup
    pub acquired_at: u32,
}

/// An active stackable buff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackableEntry {
    pub acquired_at: u32,
    /// Effect strength (friction for ice, multiplier for speed)
    pub magnitude: f32,
}

/// Platform widened by transform assist, with the width to put back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssistRecord {
    pub platform_id: u32,
    pub original_width: f32,
}

/// All buffs on a player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffState {
    pub positive: Option<ActivePositive>,
    pub stackable: BTreeMap<StackableBuff, StackableEntry>,
    pub assist: Option<AssistRecord>,
}

impl BuffState {
    pub fn has(&self, buff: StackableBuff) -> bool {
        self.stackable.contains_key(&buff)
    }

    pub fn positive_kind(&self) -> Option<PositiveBuff> {
        self.positive.map(|p| p.kind)
    }

    pub fn remaining_double_jumps(&self) -> u32 {
        self.remaining_of(PositiveBuff::DoubleJump)
    }

    pub fn remaining_jump_boosts(&self) -> u32 {
        self.remaining_of(PositiveBuff::JumpBoost)
    }

    fn remaining_of(&self, kind: PositiveBuff) -> u32 {
        match self.positive {
            Some(p) if p.kind == kind => p.remaining,
            _ => 0,
        }
    }

    /// Friction applied per tick while ice slide is active
    pub fn ice_friction(&self) -> Option<f32> {
        self.stackable
            .get(&StackableBuff::IceSlide)
            .map(|entry| entry.magnitude)
    }

    /// Use one charge of `kind`; returns true when it just ran out
    pub fn consume(&mut self, kind: PositiveBuff) -> bool {
        match &mut self.positive {
            Some(p) if p.kind == kind && p.remaining > 0 => {
                p.remaining -= 1;
                p.remaining == 0
            }
            _ => false,
        }
    }

    /// Buffs whose height window no longer contains `raw_height`
    pub fn expired(&self, raw_height: u32) -> Vec<Buff> {
        let mut expired = Vec::new();
        if let Some(p) = self.positive {
            if height_expired(p.acquired_at, raw_height) {
                expired.push(Buff::Positive(p.kind));
            }
        }
        for (&kind, entry) in &self.stackable {
            if height_expired(entry.acquired_at, raw_height) {
                expired.push(Buff::Stackable(kind));
            }
        }
        expired
    }
}

/// Whether a buff picked up at `acquired_at` has run out at `raw_height`
#[inline]
pub fn height_expired(acquired_at: u32, raw_height: u32) -> bool {
    raw_height >= acquired_at + BUFF_EXPIRY_UP_METERS
        || acquired_at >= raw_height + BUFF_EXPIRY_DOWN_METERS
}

/// Apply a collected item to the player
pub fn acquire(player: &mut Player, pickup: &Pickup, platforms: &mut [Platform]) {
    let height = player.raw_height;
    match pickup.effect {
        ItemEffect::None => {}
        ItemEffect::JumpPowerMultiplier => {
            grant_positive(player, PositiveBuff::JumpBoost, pickup.duration);
            player.jump_power_multiplier = pickup.value;
        }
        ItemEffect::DoubleJump => {
            grant_positive(player, PositiveBuff::DoubleJump, pickup.duration);
            player.air_jump_ready = true;
        }
        ItemEffect::SpeedMultiplier => {
            grant_stackable(player, StackableBuff::SpeedReduce, pickup.value);
            player.speed_multiplier = pickup.value;
        }
        ItemEffect::ReverseKeys => {
            grant_stackable(player, StackableBuff::KeyReverse, pickup.value);
        }
        ItemEffect::IceSlide => {
            grant_stackable(player, StackableBuff::IceSlide, pickup.value);
        }
        ItemEffect::TransformAssist => {
            let fresh = grant_stackable(player, StackableBuff::TransformAssist, pickup.value);
            if fresh && player.buffs.assist.is_none() {
                widen_next_platform(player, platforms);
            }
        }
    }
    log::debug!("Acquired {:?} at {}m", pickup.kind, height);
}

/// Replace any positive buff with `kind`
fn grant_positive(player: &mut Player, kind: PositiveBuff, uses: u32) {
    if let Some(previous) = player.buffs.positive_kind() {
        cleanup(player, Buff::Positive(previous), &mut []);
    }
    player.buffs.positive = Some(ActivePositive {
        kind,
        remaining: uses,
        acquired_at: player.raw_height,
    });
}

/// Add or refresh a stackable buff; returns true if it wasn't active
fn grant_stackable(player: &mut Player, kind: StackableBuff, magnitude: f32) -> bool {
    let entry = StackableEntry {
        acquired_at: player.raw_height,
        magnitude,
    };
    player.buffs.stackable.insert(kind, entry).is_none()
}

/// Widen the closest visible platform above the player's feet
fn widen_next_platform(player: &mut Player, platforms: &mut [Platform]) {
    let feet = player.bottom();
    let target = platforms
        .iter_mut()
        .filter(|p| p.is_visible() && p.top() < feet - 1.0)
        .max_by(|a, b| {
            a.top()
                .partial_cmp(&b.top())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(platform) = target {
        let original_width = platform.assist_widen();
        player.buffs.assist = Some(AssistRecord {
            platform_id: platform.id,
            original_width,
        });
    }
}

/// Remove every buff whose height window has passed; returns what expired
pub fn expire(player: &mut Player, platforms: &mut [Platform]) -> Vec<Buff> {
    let expired = player.buffs.expired(player.raw_height);
    for &buff in &expired {
        cleanup(player, buff, platforms);
        log::debug!("{:?} expired at {}m", buff, player.raw_height);
    }
    expired
}

/// Remove a buff and undo its side effects
pub fn cleanup(player: &mut Player, buff: Buff, platforms: &mut [Platform]) {
    match buff {
        Buff::Positive(kind) => {
            if player.buffs.positive_kind() == Some(kind) {
                player.buffs.positive = None;
            }
            match kind {
                PositiveBuff::JumpBoost => player.jump_power_multiplier = 1.0,
                PositiveBuff::DoubleJump => player.air_jump_ready = false,
            }
        }
        Buff::Stackable(kind) => {
            player.buffs.stackable.remove(&kind);
            match kind {
                StackableBuff::SpeedReduce => player.speed_multiplier = 1.0,
                StackableBuff::KeyReverse => {}
                StackableBuff::IceSlide => player.vel.x = 0.0,
                StackableBuff::TransformAssist => {
                    if let Some(record) = player.buffs.assist.take() {
                        if let Some(platform) =
                            platforms.iter_mut().find(|p| p.id == record.platform_id)
                        {
                            platform.assist_restore(record.original_width);
                        }
                    }
                }
            }
        }
    }
}
