//! Session lifecycle
//!
//! A session owns the settings, the ranking board and the current run.
//! Hosts forward discrete commands between ticks and save the rankings
//! after a death has been recorded.

use crate::highscores::Rankings;
use crate::settings::Settings;
use crate::sim::{Difficulty, GameEvent, GameState, TickInput, tick};

/// Discrete commands handled between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// New run, same difficulty, next seed
    Reset,
    /// Switch difficulty and start a new run
    ChangeDifficulty(Difficulty),
    Quit,
}

/// Settings, rankings and the current run
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    pub rankings: Rankings,
    pub state: GameState,
    /// Rank achieved by the last recorded death, if it made the board
    pub last_rank: Option<usize>,
    /// Formatted board captured at the last recorded death
    pub leaderboard: Vec<String>,
    running: bool,
    seed: u64,
}

impl Session {
    /// Start the first run; a seed fixed in the settings wins over `seed`
    pub fn new(settings: Settings, rankings: Rankings, seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(seed);
        let state = GameState::new(seed, settings.difficulty);
        Self {
            settings,
            rankings,
            state,
            last_rank: None,
            leaderboard: Vec::new(),
            running: true,
            seed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Apply a command; returns whether the session is still running
    pub fn handle(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Reset => self.reset(),
            SessionCommand::ChangeDifficulty(difficulty) => {
                log::info!(
                    "Difficulty changed: {} -> {}",
                    self.settings.difficulty.as_str(),
                    difficulty.as_str()
                );
                self.settings.difficulty = difficulty;
                self.reset();
            }
            SessionCommand::Quit => {
                log::info!("Session quit at tick {}", self.state.time_ticks);
                self.running = false;
            }
        }
        self.running
    }

    fn reset(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        self.state = GameState::new(self.seed, self.settings.difficulty);
        self.last_rank = None;
    }

    /// Advance one tick and return what happened
    ///
    /// A death with a positive score is recorded on the ranking board.
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        tick(&mut self.state, input);
        let events = self.state.drain_events();

        for event in &events {
            if let GameEvent::PlayerDied { score, .. } = *event {
                self.record_score(score);
            }
        }
        events
    }

    fn record_score(&mut self, score: u32) {
        if score == 0 {
            log::info!("Run ended without score, not ranked");
            return;
        }
        self.last_rank = self.rankings.add_score(&self.settings.nickname, score);
        self.leaderboard = self.rankings.format_rankings();
        match self.last_rank {
            Some(rank) => log::info!("{} ranked #{} with {}m", self.settings.nickname, rank, score),
            None => log::info!("{} scored {}m, off the board", self.settings.nickname, score),
        }
    }

    /// Persist the ranking board where the settings point
    pub fn save_rankings(&self) -> std::io::Result<()> {
        self.rankings.save(&self.settings.rankings_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn kill(session: &mut Session) -> Vec<GameEvent> {
        session.state.platforms.clear();
        let mut events = Vec::new();
        while !session.state.is_game_over() {
            events.extend(session.step(&TickInput::default()));
        }
        events
    }

    #[test]
    fn test_fixed_seed_setting_wins() {
        let settings = Settings {
            seed: Some(5),
            ..Default::default()
        };
        let session = Session::new(settings, Rankings::new(), 99);
        assert_eq!(session.seed(), 5);
        assert_eq!(session.state.seed, 5);
    }

    #[test]
    fn test_reset_advances_seed_and_keeps_difficulty() {
        let mut session = Session::new(Settings::default(), Rankings::new(), 10);
        session.step(&TickInput::default());
        assert!(session.handle(SessionCommand::Reset));
        assert_eq!(session.seed(), 11);
        assert_eq!(session.state.time_ticks, 0);
        assert_eq!(session.state.difficulty(), Difficulty::Normal);
    }

    #[test]
    fn test_change_difficulty_resets() {
        let mut session = Session::new(Settings::default(), Rankings::new(), 10);
        session.handle(SessionCommand::ChangeDifficulty(Difficulty::Hard));
        assert_eq!(session.settings.difficulty, Difficulty::Hard);
        assert_eq!(session.state.difficulty(), Difficulty::Hard);
        assert_eq!(session.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_stops_stepping() {
        let mut session = Session::new(Settings::default(), Rankings::new(), 10);
        assert!(!session.handle(SessionCommand::Quit));
        let ticks = session.state.time_ticks;
        assert!(session.step(&TickInput::default()).is_empty());
        assert_eq!(session.state.time_ticks, ticks);
    }

    #[test]
    fn test_death_with_score_is_ranked() {
        let settings = Settings {
            nickname: "amy".to_string(),
            ..Default::default()
        };
        let mut session = Session::new(settings, Rankings::new(), 10);
        session.state.player.max_height = 12;

        let events = kill(&mut session);
        assert!(events.contains(&GameEvent::PlayerDied {
            score: 12,
            max_height: 12
        }));
        assert_eq!(session.last_rank, Some(1));
        assert_eq!(session.leaderboard, vec!["1. amy: 12m"]);
    }

    #[test]
    fn test_death_without_score_is_not_ranked() {
        let mut session = Session::new(Settings::default(), Rankings::new(), 10);
        kill(&mut session);
        assert!(session.rankings.is_empty());
        assert_eq!(session.last_rank, None);
    }
}
