//! Game settings and preferences
//!
//! Persisted as JSON: a local file on native, LocalStorage on wasm.
//! Missing or unreadable settings fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::input::ControllerKind;
use crate::sim::Difficulty;

/// Default settings file (native)
pub const SETTINGS_FILE: &str = "sheet_jump_settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty for new sessions
    pub difficulty: Difficulty,
    /// Name submitted with scores
    pub nickname: String,

    // === Controls ===
    pub controller: ControllerKind,
    /// Fraction of the virtual stick radius ignored around its center
    pub joystick_dead_zone: f32,

    // === Session ===
    /// Fixed run seed; a fresh seed per run when unset
    pub seed: Option<u64>,
    /// Ranking file path (native) or LocalStorage key (wasm)
    pub rankings_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            nickname: "player".to_string(),
            controller: ControllerKind::Keyboard,
            joystick_dead_zone: 0.3,
            seed: None,
            rankings_path: "rankings.json".to_string(),
        }
    }
}

impl Settings {
    /// Apply command line overrides (`--difficulty`, `--nickname`, `--seed`, `--controller`)
    pub fn apply_cli_overrides(&mut self, args: &[String]) {
        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            match (args[i].as_str(), value) {
                ("--difficulty" | "-d", Some(val)) => match Difficulty::from_str(val) {
                    Some(difficulty) => self.difficulty = difficulty,
                    None => log::warn!("Unknown difficulty '{}', keeping {}", val, self.difficulty.as_str()),
                },
                ("--nickname" | "-n", Some(val)) => self.nickname = val.clone(),
                ("--seed" | "-s", Some(val)) => match val.parse() {
                    Ok(seed) => self.seed = Some(seed),
                    Err(_) => log::warn!("Invalid seed '{}', ignoring", val),
                },
                ("--controller" | "-c", Some(val)) => {
                    if let Some(kind) = ControllerKind::from_str(val) {
                        self.controller = kind;
                    }
                }
                _ => {
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }
    }

    /// Parse settings JSON; unreadable data yields defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path);
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("No settings at {}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)?;
        log::info!("Saved settings to {}", path);
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(key: &str) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(key) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
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
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("sheet-jump")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert_eq!(settings.controller, ControllerKind::Keyboard);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.apply_cli_overrides(&args(&[
            "--difficulty",
            "hard",
            "-n",
            "amy",
            "--seed",
            "42",
            "--verbose",
            "--controller",
            "touch",
        ]));
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.nickname, "amy");
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.controller, ControllerKind::Joystick);
    }

    #[test]
    fn test_bad_cli_values_are_ignored() {
        let mut settings = Settings::default();
        settings.apply_cli_overrides(&args(&["--difficulty", "insane", "--seed", "abc"]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"Easy","nickname":"bob"}"#);
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.nickname, "bob");
        assert_eq!(settings.joystick_dead_zone, 0.3);
    }

    #[test]
    fn test_corrupt_json_is_default() {
        assert_eq!(Settings::from_json("]["), Settings::default());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("sheet_jump_settings_{}.json", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let settings = Settings {
            nickname: "cat".to_string(),
            seed: Some(7),
            ..Default::default()
        };
        settings.save(&path).expect("save");
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
