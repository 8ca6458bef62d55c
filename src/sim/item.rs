//! Collectible items
//!
//! Items are spawned on visible platforms, away from other items, and
//! grant a buff when the player touches them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::platform::Platform;
use crate::consts::*;

/// What collecting an item does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    None,
    JumpPowerMultiplier,
    SpeedMultiplier,
    DoubleJump,
    ReverseKeys,
    IceSlide,
    TransformAssist,
}

/// Static description of an item type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSpec {
    pub key: &'static str,
    pub color: [u8; 3],
    /// Uses for positive buffs, meters for stackable ones
    pub duration: u32,
    pub effect: ItemEffect,
    pub value: f32,
}

/// Spec used for unrecognised item keys
pub const NEUTRAL_ITEM: ItemSpec = ItemSpec {
    key: "unknown",
    color: [255, 255, 255],
    duration: 10,
    effect: ItemEffect::None,
    value: 1.0,
};

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    JumpBoost,
    SpeedReduce,
    DoubleJump,
    KeyReverse,
    IceSlide,
    TransformAssist,
    /// Unrecognised key; collecting it has no effect
    Unknown,
}

impl ItemKind {
    /// Kinds the spawner draws from
    pub const SPAWNABLE: [ItemKind; 6] = [
        ItemKind::JumpBoost,
        ItemKind::SpeedReduce,
        ItemKind::DoubleJump,
        ItemKind::KeyReverse,
        ItemKind::IceSlide,
        ItemKind::TransformAssist,
    ];

    pub fn spec(&self) -> ItemSpec {
        match self {
            ItemKind::JumpBoost => ItemSpec {
                key: "jump_boost",
                color: [0, 255, 0],
                duration: 5,
                effect: ItemEffect::JumpPowerMultiplier,
                value: 1.5,
            },
            ItemKind::SpeedReduce => ItemSpec {
                key: "speed_reduce",
                color: [255, 0, 0],
                duration: 10,
                effect: ItemEffect::SpeedMultiplier,
                value: 0.2,
            },
            ItemKind::DoubleJump => ItemSpec {
                key: "double_jump",
                color: [255, 255, 0],
                duration: 5,
                effect: ItemEffect::DoubleJump,
                value: 1.0,
            },
            ItemKind::KeyReverse => ItemSpec {
                key: "key_reverse",
                color: [160, 32, 240],
                duration: 10,
                effect: ItemEffect::ReverseKeys,
                value: 1.0,
            },
            ItemKind::IceSlide => ItemSpec {
                key: "ice_slide",
                color: [0, 191, 255],
                duration: 10,
                effect: ItemEffect::IceSlide,
                value: 0.92,
            },
            ItemKind::TransformAssist => ItemSpec {
                key: "transform_assist",
                color: [255, 140, 0],
                duration: 10,
                effect: ItemEffect::TransformAssist,
                value: PLATFORM_MAX_WIDTH,
            },
            ItemKind::Unknown => NEUTRAL_ITEM,
        }
    }

    pub fn key(&self) -> &'static str {
        self.spec().key
    }

    /// Look up a kind by key, falling back to `Unknown`
    pub fn from_key(key: &str) -> Self {
        Self::SPAWNABLE
            .into_iter()
            .find(|kind| kind.key() == key)
            .unwrap_or(ItemKind::Unknown)
    }

    /// What collecting this kind grants
    pub fn pickup(&self) -> Pickup {
        let spec = self.spec();
        Pickup {
            kind: *self,
            effect: spec.effect,
            value: spec.value,
            duration: spec.duration,
        }
    }
}

/// Result of collecting an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: ItemKind,
    pub effect: ItemEffect,
    pub value: f32,
    pub duration: u32,
}

/// An item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    /// Center in world space
    pub pos: Vec2,
    pub kind: ItemKind,
    pub collected: bool,
    /// Cosmetic bob offset, -5..5
    #[serde(default)]
    pub float_offset: f32,
    #[serde(default)]
    pub float_direction: f32,
}

impl Item {
    pub fn new(id: u32, pos: Vec2, kind: ItemKind) -> Self {
        Self {
            id,
            pos,
            kind,
            collected: false,
            float_offset: 0.0,
            float_direction: 1.0,
        }
    }

    pub fn color(&self) -> [u8; 3] {
        self.kind.spec().color
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(ITEM_SIZE))
    }

    /// Advance the bob animation
    pub fn update(&mut self) {
        if self.collected {
            return;
        }
        self.float_offset += 0.05 * self.float_direction;
        if self.float_offset.abs() > 5.0 {
            self.float_direction = -self.float_direction;
        }
    }

    /// Mark collected; returns the pickup the first time only
    pub fn collect(&mut self) -> Option<Pickup> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.kind.pickup())
    }
}

/// Whether a platform is far enough from every uncollected item
pub fn is_isolated(platform: &Platform, items: &[Item]) -> bool {
    items.iter().filter(|i| !i.collected).all(|item| {
        let top = platform.top();
        if top < item.pos.y {
            item.pos.y - top >= ITEM_SPACING_ABOVE
        } else {
            top - item.pos.y >= ITEM_SPACING_BELOW
        }
    })
}

/// Platforms an item may be placed on this tick
pub fn spawn_candidates<'a>(
    platforms: &'a [Platform],
    items: &[Item],
    camera_y: f32,
) -> Vec<&'a Platform> {
    platforms
        .iter()
        .filter(|p| {
            p.is_visible()
                && p.top() >= camera_y
                && p.top() < camera_y + SCREEN_HEIGHT
                && is_isolated(p, items)
        })
        .collect()
}

/// Roll the per-tick spawn chance and place at most one item
pub fn try_spawn<R: Rng>(
    rng: &mut R,
    platforms: &[Platform],
    items: &[Item],
    camera_y: f32,
    id: u32,
) -> Option<Item> {
    if !rng.random_bool(ITEM_SPAWN_CHANCE) {
        return None;
    }
    let candidates = spawn_candidates(platforms, items, camera_y);
    if candidates.is_empty() {
        return None;
    }
    let platform = candidates[rng.random_range(0..candidates.len())];
    let kind = ItemKind::SPAWNABLE[rng.random_range(0..ItemKind::SPAWNABLE.len())];
    let jitter = rng.random_range(-ITEM_JITTER..=ITEM_JITTER);
    let half = ITEM_SIZE / 2.0;
    let x = (platform.center_x() + jitter).clamp(half, SCREEN_WIDTH - half);
    let y = platform.top() - ITEM_SIZE;
    log::debug!("Spawned {} on platform {}", kind.key(), platform.id);
    Some(Item::new(id, Vec2::new(x, y), kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_from_key_falls_back_to_unknown() {
        for kind in ItemKind::SPAWNABLE {
            assert_eq!(ItemKind::from_key(kind.key()), kind);
        }
        let unknown = ItemKind::from_key("anti_gravity");
        assert_eq!(unknown, ItemKind::Unknown);
        assert_eq!(unknown.spec(), NEUTRAL_ITEM);
        assert_eq!(unknown.pickup().effect, ItemEffect::None);
    }

    #[test]
    fn test_collect_only_once() {
        let mut item = Item::new(1, Vec2::new(100.0, 100.0), ItemKind::DoubleJump);
        let pickup = item.collect().map(|p| p.kind);
        assert_eq!(pickup, Some(ItemKind::DoubleJump));
        assert!(item.collect().is_none());
    }

    #[test]
    fn test_isolation_distances() {
        let items = vec![Item::new(1, Vec2::new(100.0, 0.0), ItemKind::JumpBoost)];
        // Platform above the item
        assert!(!is_isolated(&Platform::new_static(2, 0.0, -999.0, 40.0), &items));
        assert!(is_isolated(&Platform::new_static(2, 0.0, -1000.0, 40.0), &items));
        // Platform below the item
        assert!(!is_isolated(&Platform::new_static(2, 0.0, 499.0, 40.0), &items));
        assert!(is_isolated(&Platform::new_static(2, 0.0, 500.0, 40.0), &items));
    }

    #[test]
    fn test_collected_items_do_not_block_spawns() {
        let mut item = Item::new(1, Vec2::new(100.0, 0.0), ItemKind::JumpBoost);
        item.collected = true;
        assert!(is_isolated(&Platform::new_static(2, 0.0, 10.0, 40.0), &[item]));
    }

    #[test]
    fn test_candidates_limited_to_visible_window() {
        let mut hidden = Platform::new_vanishing(4, 0.0, 300.0, 40.0, 0);
        if let crate::sim::platform::PlatformBehavior::Vanishing { visible, .. } =
            &mut hidden.behavior
        {
            *visible = false;
        }
        let platforms = vec![
            Platform::new_static(1, 0.0, -10.0, 40.0),
            Platform::new_static(2, 0.0, 100.0, 40.0),
            Platform::new_static(3, 0.0, 800.0, 40.0),
            hidden,
        ];
        let ids: Vec<u32> = spawn_candidates(&platforms, &[], 0.0)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_spawned_item_sits_above_platform() {
        let mut rng = Pcg32::seed_from_u64(7);
        let platforms = vec![Platform::new_static(1, 200.0, 400.0, 40.0)];
        let mut spawned = None;
        for id in 0..10_000 {
            spawned = try_spawn(&mut rng, &platforms, &[], 0.0, id);
            if spawned.is_some() {
                break;
            }
        }
        let item = spawned.expect("spawn chance should hit within 10k ticks");
        assert!((item.pos.x - 220.0).abs() <= ITEM_JITTER);
        assert_eq!(item.pos.y, 400.0 - ITEM_SIZE);
        assert!(ItemKind::SPAWNABLE.contains(&item.kind));
    }
}
