//! Ranking leaderboard
//!
//! Tracks the top 10 `(nickname, score)` records, stored as a JSON array
//! sorted by descending score. Persisted to a file on native and to
//! LocalStorage on wasm.

use serde::{Deserialize, Serialize};

/// Maximum number of rankings to keep
pub const MAX_RANKINGS: usize = 10;

/// A single ranking entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub nickname: String,
    /// Height score in meters
    pub score: u32,
}

/// Ranking leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rankings {
    pub entries: Vec<RankingEntry>,
}

impl Rankings {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a score; returns its 1-based rank, or None if it fell off the board
    pub fn add_score(&mut self, nickname: &str, score: u32) -> Option<usize> {
        self.entries.push(RankingEntry {
            nickname: nickname.to_string(),
            score,
        });
        // Stable: equal scores keep their earlier entries ahead
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_RANKINGS);

        self.entries
            .iter()
            .position(|e| e.nickname == nickname && e.score == score)
            .map(|i| i + 1)
    }

    /// Rank a score would get if added now (1-based)
    pub fn rank_for_score(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|e| e.score <= score)
            .unwrap_or(self.entries.len())
            + 1
    }

    pub fn is_nickname_taken(&self, nickname: &str) -> bool {
        self.entries.iter().any(|e| e.nickname == nickname)
    }

    /// Display lines: `"1. name: 12m"`
    pub fn format_rankings(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}: {}m", i + 1, e.nickname, e.score))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Parse a stored ranking array; anything unreadable is an empty board
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Rankings>(json) {
            Ok(mut rankings) => {
                rankings.entries.sort_by(|a, b| b.score.cmp(&a.score));
                rankings.entries.truncate(MAX_RANKINGS);
                rankings
            }
            Err(e) => {
                log::warn!("Corrupt ranking data ({}), starting fresh", e);
                Self::new()
            }
        }
    }

    /// Load rankings from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let rankings = Self::from_json(&json);
                log::info!("Loaded {} rankings from {}", rankings.entries.len(), path);
                rankings
            }
            Err(e) => {
                log::info!("No rankings at {} ({}), starting fresh", path, e);
                Self::new()
            }
        }
    }

    /// Write rankings to a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)?;
        log::info!("Rankings saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Load rankings from LocalStorage under `key` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(key: &str) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(key) {
                let rankings = Self::from_json(&json);
                log::info!("Loaded {} rankings", rankings.entries.len());
                return rankings;
            }
        }

        log::info!("No rankings found, starting fresh");
        Self::new()
    }

    /// Save rankings to LocalStorage under `key` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, key: &str) -> std::io::Result<()> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| std::io::Error::other("LocalStorage unavailable"))?;
        let json = serde_json::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        storage
            .set_item(key, &json)
            .map_err(|_| std::io::Error::other("LocalStorage write failed"))?;
        log::info!("Rankings saved ({} entries)", self.entries.len());
        Ok(())
    }
}
