//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/srstris/settings.toml (or platform equivalent)

use crate::game::GameConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_cw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_ccw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys,
    })
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match keys {
        [key] => serializer.serialize_str(key),
        _ => keys.serialize(serializer),
    }
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Ghost piece visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    pub board_width: usize,
    pub visible_height: usize,
    pub starting_level: u32,
    /// Fixed piece sequence seed, random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate_cw: vec!["Up".to_string(), "x".to_string()],
            rotate_ccw: vec!["z".to_string()],
            pause: vec!["p".to_string(), "Esc".to_string()],
            quit: vec!["q".to_string()],
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            board_width: config.width,
            visible_height: config.visible_height,
            starting_level: config.starting_level,
            seed: config.seed,
        }
    }
}

/// Accepted range for `board_width` and `visible_height`
const BOARD_DIMENSIONS: std::ops::RangeInclusive<usize> = 4..=100;
/// Highest accepted `starting_level`
const MAX_STARTING_LEVEL: u32 = 99;

impl GameplaySettings {
    /// Session parameters. Dimensions outside 4..=100 fall back to the
    /// defaults; the starting level is clamped to 1..=99.
    pub fn game_config(&self) -> GameConfig {
        let defaults = GameConfig::default();
        let dimension = |value: usize, default: usize| {
            if BOARD_DIMENSIONS.contains(&value) {
                value
            } else {
                warn!("board dimension {} out of range, using {}", value, default);
                default
            }
        };
        GameConfig {
            width: dimension(self.board_width, defaults.width),
            visible_height: dimension(self.visible_height, defaults.visible_height),
            starting_level: self.starting_level.clamp(1, MAX_STARTING_LEVEL),
            seed: self.seed,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "srstris", "srstris").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the platform config dir, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("no config directory, using default settings");
            return Self::default();
        };
        if !path.exists() {
            debug!("{} not found, using default settings", path.display());
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("ignoring {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save settings to the platform config dir
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_accept_string_or_array() {
        let settings: Settings = toml::from_str(
            r#"
            [keys]
            move_left = "a"
            rotate_cw = ["w", "Up"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.keys.move_left, vec!["a"]);
        assert_eq!(settings.keys.rotate_cw, vec!["w", "Up"]);
        // Unlisted bindings keep their defaults
        assert_eq!(settings.keys.quit, vec!["q"]);
    }

    #[test]
    fn test_missing_sections_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.gameplay.game_config(), GameConfig::default());
    }

    #[test]
    fn test_gameplay_section() {
        let settings: Settings = toml::from_str(
            r#"
            [gameplay]
            board_width = 8
            starting_level = 0
            seed = 1234
            "#,
        )
        .unwrap();
        let config = settings.gameplay.game_config();
        assert_eq!(config.width, 8);
        assert_eq!(config.visible_height, 20);
        assert_eq!(config.starting_level, 1);
        assert_eq!(config.seed, Some(1234));
    }

    #[test]
    fn test_degenerate_dimensions_fall_back() {
        let gameplay = GameplaySettings {
            board_width: 0,
            visible_height: 1,
            ..GameplaySettings::default()
        };
        let config = gameplay.game_config();
        assert_eq!((config.width, config.visible_height), (10, 20));
    }

    #[test]
    fn test_oversized_values_are_bounded() {
        let settings: Settings = toml::from_str(
            r#"
            [gameplay]
            board_width = 40000
            visible_height = 101
            starting_level = 300
            "#,
        )
        .unwrap();
        let config = settings.gameplay.game_config();
        assert_eq!((config.width, config.visible_height), (10, 20));
        assert_eq!(config.starting_level, 99);

        let gameplay = GameplaySettings {
            board_width: 100,
            visible_height: 100,
            ..GameplaySettings::default()
        };
        let config = gameplay.game_config();
        assert_eq!((config.width, config.visible_height), (100, 100));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("srstris-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");
        let mut settings = Settings::default();
        settings.visual.show_ghost = false;
        settings.keys.pause = vec!["Esc".to_string()];

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("srstris-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        fs::write(&path, "keys = 3").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Parse(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
