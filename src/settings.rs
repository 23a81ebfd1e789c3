//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockfall/settings.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Best score from earlier runs. Only the number is kept between runs.
    pub best_score: u64,
    pub board: BoardSettings,
    pub gameplay: GameplaySettings,
    pub visual: VisualSettings,
    pub keys: KeyBindings,
}

/// Board dimensions, validated when the board is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Simulation ticks per second; gravity is counted in ticks
    pub fps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Landing preview visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Key bindings, one entry per intent.
/// Each accepts a single key name or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "one_or_many")]
    pub left: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub right: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub down: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub soft_down: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub drop: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub resume: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub start: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub restart: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub quit: Vec<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keys {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Keys::deserialize(deserializer)? {
        Keys::One(key) => vec![key],
        Keys::Many(keys) => keys,
    })
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            best_score: 0,
            board: BoardSettings::default(),
            gameplay: GameplaySettings::default(),
            visual: VisualSettings::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self { fps: 60 }
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

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: keys(&["Left", "a"]),
            right: keys(&["Right", "d"]),
            down: keys(&["s"]),
            soft_down: keys(&["Down"]),
            rotate: keys(&["Up", "w"]),
            drop: keys(&["Space"]),
            pause: keys(&["p", "Esc"]),
            resume: keys(&["Enter"]),
            start: keys(&["Enter"]),
            restart: keys(&["r"]),
            quit: keys(&["q"]),
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the platform config dir.
    ///
    /// A missing file (or no config dir at all) gives defaults. A file that
    /// exists but can't be read or parsed is an error, so callers don't
    /// overwrite it with defaults.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from `path`; defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::from_toml(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save settings to the platform config dir
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl VisualSettings {
    /// Block and ghost characters for the configured style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.board.width, 10);
        assert_eq!(settings.board.height, 20);
        assert_eq!(settings.gameplay.fps, 60);
        assert!(settings.visual.show_ghost);
        assert_eq!(settings.keys.drop, vec!["Space".to_string()]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            best_score = 1234

            [board]
            height = 24

            [keys]
            drop = "Enter"
            left = ["h", "Left"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.best_score, 1234);
        assert_eq!(settings.board.height, 24);
        assert_eq!(settings.board.width, 10);
        assert_eq!(settings.keys.drop, vec!["Enter".to_string()]);
        assert_eq!(settings.keys.left, vec!["h".to_string(), "Left".to_string()]);
        assert_eq!(settings.keys.quit, vec!["q".to_string()]);
    }

    #[test]
    fn test_serialized_file_loads_back() {
        let mut settings = Settings::default();
        settings.best_score = 99;
        settings.visual.block_style = "round".to_string();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        assert!(Settings::from_toml("board = 3").is_err());
    }

    /// Fresh path under the temp dir, removed on drop
    struct TempSettings(PathBuf);

    impl TempSettings {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("blockfall-test-{}-{}", std::process::id(), name));
            let _ = fs::remove_dir_all(&dir);
            Self(dir.join("settings.toml"))
        }
    }

    impl Drop for TempSettings {
        fn drop(&mut self) {
            if let Some(dir) = self.0.parent() {
                let _ = fs::remove_dir_all(dir);
            }
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let file = TempSettings::new("missing");
        assert_eq!(Settings::load_from(&file.0).unwrap(), Settings::default());
    }

    #[test]
    fn test_unparsable_file_is_reported_and_kept() {
        let file = TempSettings::new("unparsable");
        let contents = "best_score = 5000\n[keys]\nleft = [\"h\"]\n[gameplay]\nfps = \"60\"\n";
        fs::create_dir_all(file.0.parent().unwrap()).unwrap();
        fs::write(&file.0, contents).unwrap();

        let result = Settings::load_from(&file.0);
        assert!(matches!(result, Err(SettingsError::Parse(_))));
        assert_eq!(fs::read_to_string(&file.0).unwrap(), contents);
    }

    #[test]
    fn test_saved_file_loads_back() {
        let file = TempSettings::new("saved");
        let mut settings = Settings::default();
        settings.best_score = 5000;
        settings.keys.left = vec!["h".to_string()];
        settings.save_to(&file.0).unwrap();
        assert_eq!(Settings::load_from(&file.0).unwrap(), settings);
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars(), ("██", "░░"));
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars(), ("[]", ".."));
    }
}
