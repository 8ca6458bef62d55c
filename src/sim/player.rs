//! Player entity, movement and jump physics
//!
//! The player box is anchored at its center. Vertical motion is
//! semi-implicit Euler with one tick as the timestep.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::buff::{self, Buff, BuffState, PositiveBuff, StackableBuff};
use super::collision::{Aabb, SweptBottom, find_landing, find_standing};
use super::difficulty::DifficultyProfile;
use super::platform::Platform;
use crate::consts::*;

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center in world space
    pub pos: Vec2,
    /// x: ice slide velocity, y: vertical velocity (positive = down)
    pub vel: Vec2,
    /// Camera-relative y of the center
    pub screen_y: f32,
    pub grounded: bool,
    /// Platform under the player's feet, if grounded
    pub standing_on: Option<u32>,
    /// Top of the last platform stood on
    pub last_ground_y: f32,
    /// Mid-air jump still available (double jump buff)
    pub air_jump_ready: bool,
    /// Current height score, difficulty scaled
    pub score: u32,
    /// Current height in meters
    pub raw_height: u32,
    /// Best raw height reached
    pub max_height: u32,
    pub alive: bool,
    pub jump_power_multiplier: f32,
    pub speed_multiplier: f32,
    pub buffs: BuffState,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            screen_y: pos.y,
            grounded: false,
            standing_on: None,
            last_ground_y: pos.y + PLAYER_HEIGHT / 2.0,
            air_jump_ready: false,
            score: 0,
            raw_height: 0,
            max_height: 0,
            alive: true,
            jump_power_multiplier: 1.0,
            speed_multiplier: 1.0,
            buffs: BuffState::default(),
        }
    }

    /// Spawn standing on the center of `platform`
    pub fn on_platform(platform: &Platform) -> Self {
        let mut player = Self::new(Vec2::new(
            platform.center_x(),
            platform.top() - PLAYER_HEIGHT / 2.0,
        ));
        player.grounded = true;
        player.standing_on = Some(platform.id);
        player.last_ground_y = platform.top();
        player
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + PLAYER_HEIGHT / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - PLAYER_HEIGHT / 2.0
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    /// Horizontal input for one tick (-1, 0, 1)
    ///
    /// On ice the input feeds a damped velocity while grounded;
    /// otherwise it moves the player directly.
    pub fn move_horizontal(&mut self, direction: i8) {
        let mut direction = direction.clamp(-1, 1) as f32;
        if self.buffs.has(StackableBuff::KeyReverse) {
            direction = -direction;
        }
        let speed = PLAYER_SPEED * self.speed_multiplier;

        if self.grounded && self.buffs.ice_friction().is_some() {
            self.vel.x = (self.vel.x + direction * ICE_ACCELERATION).clamp(-speed, speed);
        } else {
            self.pos.x += direction * speed;
            self.clamp_to_screen();
        }
    }

    /// Jump from the ground, or mid-air with a double jump charge
    ///
    /// Returns whether a jump happened.
    pub fn jump(&mut self) -> bool {
        if self.grounded {
            self.vel.y = JUMP_POWER * self.jump_power_multiplier;
            self.grounded = false;
            self.standing_on = None;
            self.air_jump_ready = true;
            if self.buffs.consume(PositiveBuff::JumpBoost) {
                buff::cleanup(self, Buff::Positive(PositiveBuff::JumpBoost), &mut []);
            }
            return true;
        }

        if self.air_jump_ready && self.buffs.remaining_double_jumps() > 0 {
            self.vel.y = JUMP_POWER * self.jump_power_multiplier;
            self.air_jump_ready = false;
            if self.buffs.consume(PositiveBuff::DoubleJump) {
                buff::cleanup(self, Buff::Positive(PositiveBuff::DoubleJump), &mut []);
            }
            return true;
        }

        false
    }

    /// Integrate gravity and resolve contact with the platforms
    pub fn apply_gravity(&mut self, platforms: &[Platform]) {
        let prev_y = self.pos.y;
        self.vel.y += GRAVITY;
        self.pos.y += self.vel.y;

        let swept = SweptBottom {
            prev: prev_y + PLAYER_HEIGHT / 2.0,
            current: self.bottom(),
        };

        let mut contact = None;
        if self.vel.y > 0.0 {
            contact = find_landing(swept, self.pos.x, platforms);
        }
        if contact.is_none() && self.grounded {
            contact = find_standing(self.bottom(), self.pos.x, platforms);
        }

        match contact.map(|i| &platforms[i]) {
            Some(platform) => {
                self.pos.y = platform.top() - PLAYER_HEIGHT / 2.0;
                self.vel.y = 0.0;
                self.grounded = true;
                self.standing_on = Some(platform.id);
                self.last_ground_y = platform.top();
                self.air_jump_ready = true;

                // Ride moving platforms
                let dx = platform.carry_dx();
                if dx != 0.0 {
                    self.pos.x += dx;
                }
            }
            None => {
                self.grounded = false;
                self.standing_on = None;
            }
        }

        match self.buffs.ice_friction() {
            Some(friction) if self.grounded => {
                self.pos.x += self.vel.x;
                self.vel.x *= friction;
            }
            // Momentum is lost as soon as the feet leave the ground
            _ => self.vel.x = 0.0,
        }
        self.clamp_to_screen();
    }

    /// Recompute height and score
    pub fn update_score(&mut self, profile: &DifficultyProfile) {
        let height = ((SCREEN_HEIGHT - ANCHOR_OFFSET - self.pos.y) / UNITS_PER_METER).floor();
        self.raw_height = height.max(0.0) as u32;
        self.score = (self.raw_height as f32 * profile.score_multiplier).floor() as u32;
        self.max_height = self.max_height.max(self.raw_height);
    }

    /// Score submitted at game over: the best height, difficulty scaled
    pub fn best_score(&self, profile: &DifficultyProfile) -> u32 {
        (self.max_height as f32 * profile.score_multiplier).floor() as u32
    }

    pub fn update_screen_position(&mut self, camera_y: f32) {
        self.screen_y = self.pos.y - camera_y;
    }

    /// Whether the player has fallen out of view
    pub fn has_fallen(&self) -> bool {
        self.screen_y > SCREEN_HEIGHT + PLAYER_HEIGHT
    }

    fn clamp_to_screen(&mut self) {
        self.pos.x = self
            .pos
            .x
            .clamp(PLAYER_WIDTH / 2.0, SCREEN_WIDTH - PLAYER_WIDTH / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::item::ItemKind;
    use crate::sim::platform::PlatformBehavior;

    fn ground(y: f32) -> Platform {
        Platform::new_static(1, 0.0, y, PLATFORM_MAX_WIDTH)
    }

    #[test]
    fn test_lands_exactly_on_platform_top() {
        let platforms = vec![Platform::new_static(1, 80.0, 120.0, 40.0)];
        // Bottom at 100 moving down 40 this tick
        let mut player = Player::new(Vec2::new(100.0, 100.0 - PLAYER_HEIGHT / 2.0));
        player.vel.y = 40.0 - GRAVITY;

        player.apply_gravity(&platforms);

        assert_eq!(player.pos.y, 120.0 - PLAYER_HEIGHT / 2.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.grounded);
        assert_eq!(player.standing_on, Some(1));
    }

    #[test]
    fn test_no_landing_while_rising() {
        let platforms = vec![Platform::new_static(1, 80.0, 100.0, 40.0)];
        let mut player = Player::new(Vec2::new(100.0, 110.0));
        player.vel.y = -10.0;
        player.apply_gravity(&platforms);
        assert!(!player.grounded);
        assert!(player.vel.y < 0.0);
    }

    #[test]
    fn test_standing_player_stays_grounded() {
        let platforms = vec![ground(500.0)];
        let mut player = Player::on_platform(&platforms[0]);
        for _ in 0..120 {
            player.apply_gravity(&platforms);
        }
        assert!(player.grounded);
        assert_eq!(player.bottom(), 500.0);
    }

    #[test]
    fn test_walking_off_edge_becomes_airborne() {
        let platforms = vec![Platform::new_static(1, 100.0, 500.0, 20.0)];
        let mut player = Player::on_platform(&platforms[0]);
        player.pos.x = 200.0;
        player.apply_gravity(&platforms);
        assert!(!player.grounded);
        assert!(!player.jump(), "no ground jump once airborne");
    }

    #[test]
    fn test_jump_only_from_ground() {
        let platforms = vec![ground(500.0)];
        let mut player = Player::on_platform(&platforms[0]);
        assert!(player.jump());
        assert_eq!(player.vel.y, JUMP_POWER);
        assert!(!player.jump());
    }

    #[test]
    fn test_double_jump_once_per_airtime() {
        let platforms = vec![ground(500.0)];
        let mut player = Player::on_platform(&platforms[0]);
        buff::acquire(&mut player, &ItemKind::DoubleJump.pickup(), &mut []);

        assert!(player.jump());
        player.apply_gravity(&platforms);
        assert!(player.jump(), "mid-air jump granted by buff");
        assert!(!player.jump(), "only one mid-air jump per airtime");
        assert_eq!(player.buffs.remaining_double_jumps(), 4);
    }

    #[test]
    fn test_double_jump_runs_out() {
        let platforms = vec![ground(500.0)];
        let mut player = Player::on_platform(&platforms[0]);
        buff::acquire(&mut player, &ItemKind::DoubleJump.pickup(), &mut []);
        for _ in 0..5 {
            player.air_jump_ready = true;
            player.grounded = false;
            assert!(player.jump());
        }
        assert_eq!(player.buffs.positive, None);
        player.air_jump_ready = true;
        assert!(!player.jump());
    }

    #[test]
    fn test_jump_boost_multiplier_and_exhaustion() {
        let platforms = vec![ground(500.0)];
        let mut player = Player::on_platform(&platforms[0]);
        buff::acquire(&mut player, &ItemKind::JumpBoost.pickup(), &mut []);
        for _ in 0..5 {
            player.grounded = true;
            assert!(player.jump());
            assert_eq!(player.vel.y, JUMP_POWER * 1.5);
        }
        assert_eq!(player.buffs.positive, None);
        assert_eq!(player.jump_power_multiplier, 1.0);
        player.grounded = true;
        player.jump();
        assert_eq!(player.vel.y, JUMP_POWER);
    }

    #[test]
    fn test_rides_moving_platform() {
        let profile = Difficulty::Normal.profile();
        let mut platforms = vec![Platform::new_moving(1, 100.0, 700.0, 60.0, &profile)];
        let mut player = Player::on_platform(&platforms[0]);
        let start_x = player.pos.x;
        for _ in 0..10 {
            platforms[0].update(&profile, 0);
            player.apply_gravity(&platforms);
        }
        assert!(player.grounded);
        assert!((player.pos.x - (start_x + 20.0)).abs() < 0.001);
    }

    #[test]
    fn test_falls_when_platform_vanishes() {
        let mut platforms = vec![Platform::new_vanishing(1, 100.0, 500.0, 40.0, 0)];
        let mut player = Player::on_platform(&platforms[0]);
        player.apply_gravity(&platforms);
        assert!(player.grounded);

        platforms[0].behavior = PlatformBehavior::Vanishing {
            visible: false,
            since_ms: 0,
        };
        player.apply_gravity(&platforms);
        assert!(!player.grounded);
        assert_eq!(player.standing_on, None);
    }

    #[test]
    fn test_horizontal_movement_clamped_and_reversed() {
        let mut player = Player::new(Vec2::new(12.0, 100.0));
        player.move_horizontal(-1);
        assert_eq!(player.pos.x, PLAYER_WIDTH / 2.0);

        player.buffs.stackable.insert(
            StackableBuff::KeyReverse,
            buff::StackableEntry {
                acquired_at: 0,
                magnitude: 1.0,
            },
        );
        player.move_horizontal(-1);
        assert_eq!(player.pos.x, PLAYER_WIDTH / 2.0 + PLAYER_SPEED);
    }

    #[test]
    fn test_speed_reduce_slows_movement() {
        let mut player = Player::new(Vec2::new(200.0, 100.0));
        buff::acquire(&mut player, &ItemKind::SpeedReduce.pickup(), &mut []);
        player.move_horizontal(1);
        assert!((player.pos.x - (200.0 + PLAYER_SPEED * 0.2)).abs() < 0.001);
    }

    #[test]
    fn test_ice_slide_keeps_momentum_on_ground_only() {
        let platforms = vec![Platform::new_static(1, 0.0, 500.0, PLATFORM_MAX_WIDTH)];
        let mut player = Player::on_platform(&platforms[0]);
        buff::acquire(&mut player, &ItemKind::IceSlide.pickup(), &mut []);

        player.move_horizontal(1);
        player.move_horizontal(1);
        assert_eq!(player.vel.x, 2.0 * ICE_ACCELERATION);
        let x = player.pos.x;
        player.apply_gravity(&platforms);
        assert!(player.pos.x > x);
        // Damped after the slide step
        assert!(player.vel.x < 2.0 * ICE_ACCELERATION);

        player.jump();
        player.apply_gravity(&platforms);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_score_from_height() {
        let normal = Difficulty::Normal.profile();
        let hard = Difficulty::Hard.profile();
        let mut player = Player::new(Vec2::new(100.0, 680.0));
        player.update_score(&normal);
        assert_eq!(player.raw_height, 0);

        player.pos.y = SCREEN_HEIGHT - ANCHOR_OFFSET - 350.0;
        player.update_score(&hard);
        assert_eq!(player.raw_height, 3);
        assert_eq!(player.score, 4);

        player.pos.y = 5000.0;
        player.update_score(&hard);
        assert_eq!(player.raw_height, 0);
        assert_eq!(player.max_height, 3);
        assert_eq!(player.best_score(&hard), 4);
    }

    #[test]
    fn test_death_below_screen() {
        let mut player = Player::new(Vec2::new(100.0, 0.0));
        player.update_screen_position(-SCREEN_HEIGHT - PLAYER_HEIGHT);
        assert!(!player.has_fallen());
        player.update_screen_position(-SCREEN_HEIGHT - PLAYER_HEIGHT - 1.0);
        assert!(player.has_fallen());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Max height never decreases whatever the player does
            #[test]
            fn max_height_is_monotonic(ys in proptest::collection::vec(-5000.0f32..800.0, 1..100)) {
                let profile = Difficulty::Normal.profile();
                let mut player = Player::new(Vec2::new(100.0, 680.0));
                let mut best = 0;
                for y in ys {
                    player.pos.y = y;
                    player.update_score(&profile);
                    prop_assert!(player.max_height >= best);
                    best = player.max_height;
                }
            }
        }
    }
}
