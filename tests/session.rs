use sheet_jump::consts::*;
use sheet_jump::sim::buff;
use sheet_jump::sim::generator::{create_initial_platforms, vertical_gap_range};
use sheet_jump::sim::*;
use sheet_jump::{Rankings, Session, SessionCommand, Settings, safe_jump_distance};

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

const EPS: f32 = 0.001;

#[test]
fn fixed_seed_normal_ladder_is_reachable() {
    let profile = Difficulty::Normal.profile();
    let mut rng = Pcg32::seed_from_u64(20240601);
    let mut next_id = 1;
    let platforms = create_initial_platforms(&mut rng, &profile, 10, &mut next_id, 0);
    assert_eq!(platforms.len(), 10);

    let (min_gap, max_gap) = vertical_gap_range();
    for pair in platforms.windows(2) {
        let dx = (pair[1].pos.x - pair[0].pos.x).abs();
        let dy = pair[0].top() - pair[1].top();
        assert!(dx <= safe_jump_distance() + EPS);
        assert!(dy >= min_gap - EPS && dy <= max_gap + EPS);
    }
    for p in &platforms {
        assert!(p.width >= PLATFORM_MIN_WIDTH && p.width <= PLATFORM_MAX_WIDTH);
    }
}

#[test]
fn descending_player_lands_on_platform_top() {
    // prev bottom 100, bottom after the step 140, platform top 120
    let platforms = vec![Platform::new_static(1, 150.0, 120.0, 60.0)];
    let mut player = Player::new(Vec2::new(170.0, 100.0 - PLAYER_HEIGHT / 2.0));
    player.vel.y = 40.0 - GRAVITY;

    player.apply_gravity(&platforms);

    assert_eq!(player.pos.y, 120.0 - PLAYER_HEIGHT / 2.0);
    assert_eq!(player.vel.y, 0.0);
    assert!(player.grounded);
}

#[test]
fn double_jump_replaces_jump_boost() {
    let mut player = Player::new(Vec2::new(200.0, 600.0));
    buff::acquire(&mut player, &ItemKind::JumpBoost.pickup(), &mut []);
    assert_eq!(player.jump_power_multiplier, 1.5);

    buff::acquire(&mut player, &ItemKind::DoubleJump.pickup(), &mut []);
    assert_eq!(player.buffs.positive_kind(), Some(PositiveBuff::DoubleJump));
    assert_eq!(player.jump_power_multiplier, 1.0);
}

#[test]
fn stackable_buff_expires_ten_meters_up() {
    let profile = Difficulty::Normal.profile();
    let meters_to_y = |m: f32| SCREEN_HEIGHT - ANCHOR_OFFSET - m * UNITS_PER_METER;

    let mut player = Player::new(Vec2::new(200.0, meters_to_y(10.5)));
    player.update_score(&profile);
    assert_eq!(player.raw_height, 10);
    buff::acquire(&mut player, &ItemKind::KeyReverse.pickup(), &mut []);

    player.pos.y = meters_to_y(19.5);
    player.update_score(&profile);
    assert!(buff::expire(&mut player, &mut []).is_empty());

    player.pos.y = meters_to_y(20.5);
    player.update_score(&profile);
    let expired = buff::expire(&mut player, &mut []);
    assert_eq!(expired, vec![Buff::Stackable(StackableBuff::KeyReverse)]);
    assert!(!player.buffs.has(StackableBuff::KeyReverse));
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut state = GameState::new(seed, Difficulty::Normal);
        let autopilot = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut state, &autopilot);
        }
        serde_json::to_string(&state).expect("serialize")
    };
    assert_eq!(run(31337), run(31337));
}

#[test]
fn session_ranks_deaths_and_resets() {
    let settings = Settings {
        nickname: "amy".to_string(),
        seed: Some(1),
        ..Default::default()
    };
    let mut rankings = Rankings::new();
    rankings.add_score("bob", 50);
    let mut session = Session::new(settings, rankings, 0);

    session.state.player.max_height = 20;
    session.state.platforms.clear();
    let mut died = false;
    for _ in 0..300 {
        let events = session.step(&TickInput::default());
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDied { .. }))
        {
            died = true;
            break;
        }
    }
    assert!(died);
    assert_eq!(session.last_rank, Some(2));
    assert_eq!(session.leaderboard, vec!["1. bob: 50m", "2. amy: 20m"]);

    assert!(session.handle(SessionCommand::ChangeDifficulty(Difficulty::Easy)));
    assert_eq!(session.state.difficulty(), Difficulty::Easy);
    assert!(!session.state.is_game_over());
    assert_eq!(session.last_rank, None);
    assert_eq!(session.rankings.entries.len(), 2);

    assert!(!session.handle(SessionCommand::Quit));
}
