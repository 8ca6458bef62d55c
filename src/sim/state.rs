//! Game state and core simulation types
//!
//! All state that must be reproducible from a seed lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::buff::Buff;
use super::difficulty::{Difficulty, DifficultyProfile};
use super::generator::{self, create_initial_platforms, extend_platforms};
use super::item::{self, Item, ItemKind};
use super::platform::Platform;
use super::player::Player;
use crate::consts::*;
use crate::ticks_to_ms;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player fell out of view
    GameOver,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ItemCollected { kind: ItemKind },
    BuffExpired { buff: Buff },
    PlayerDied { score: u32, max_height: u32 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single source of randomness for generation and spawning
    pub rng: Pcg32,
    /// Difficulty tuning, fixed for the session
    pub profile: DifficultyProfile,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// World y of the top edge of the screen
    pub camera_y: f32,
    pub player: Player,
    /// Sorted by id (creation order)
    pub platforms: Vec<Platform>,
    pub items: Vec<Item>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session: initial ladder, player on the anchor platform
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        let profile = difficulty.profile();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut next_id = 1;
        let platforms =
            create_initial_platforms(&mut rng, &profile, INITIAL_PLATFORM_COUNT, &mut next_id, 0);
        let player = Player::on_platform(&platforms[0]);

        let mut state = Self {
            seed,
            rng,
            profile,
            phase: GamePhase::Playing,
            time_ticks: 0,
            camera_y: 0.0,
            player,
            platforms,
            items: Vec::new(),
            events: Vec::new(),
            next_id,
        };
        state.player.update_screen_position(state.camera_y);
        state.spawn_platforms_ahead();

        log::info!(
            "New game: seed={} difficulty={} platforms={}",
            seed,
            difficulty.as_str(),
            state.platforms.len()
        );
        state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.profile.difficulty
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation clock in milliseconds
    pub fn time_ms(&self) -> u64 {
        ticks_to_ms(self.time_ticks)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// The platform with the smallest y
    pub fn highest_platform(&self) -> Option<&Platform> {
        generator::highest_platform(&self.platforms)
    }

    /// Keep the ladder generated `LOOKAHEAD_DISTANCE` above the player
    pub fn spawn_platforms_ahead(&mut self) -> usize {
        let now_ms = self.time_ms();
        extend_platforms(
            &mut self.rng,
            &self.profile,
            &mut self.platforms,
            self.player.pos.y,
            &mut self.next_id,
            now_ms,
        )
    }

    /// Roll for an item spawn on a visible platform
    pub fn try_spawn_item(&mut self) -> Option<ItemKind> {
        let id = self.next_id;
        let spawned = item::try_spawn(
            &mut self.rng,
            &self.platforms,
            &self.items,
            self.camera_y,
            id,
        )?;
        self.next_id += 1;
        let kind = spawned.kind;
        self.items.push(spawned);
        Some(kind)
    }

    /// Follow the player upward; the camera never scrolls back down
    pub fn update_camera(&mut self) {
        if self.player.pos.y - self.camera_y < CAMERA_FOLLOW_THRESHOLD {
            self.camera_y = self.player.pos.y - CAMERA_FOLLOW_THRESHOLD;
        }
        self.player.update_screen_position(self.camera_y);
    }

    /// Drop collected items and anything far below the camera
    pub fn cull(&mut self) {
        let limit = self.camera_y + CULL_DISTANCE;
        self.platforms.retain(|p| p.top() <= limit);
        self.items.retain(|i| !i.collected && i.pos.y <= limit);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
        self.items.sort_by_key(|i| i.id);
    }
}
