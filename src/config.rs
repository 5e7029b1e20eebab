use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_system::volume::DEFAULT_VOLUME;
use crate::error::ConfigError;

/// Directory name used under the platform config/data directories
const APP_DIR: &str = "game-audio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial global music volume (0.0-1.0), until a profile is loaded
    pub music_volume: f64,

    /// Initial global sound volume (0.0-1.0), until a profile is loaded
    pub sound_volume: f64,

    /// Play the notification sound on notification events
    pub play_notification_sound: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_volume: DEFAULT_VOLUME,
            sound_volume: DEFAULT_VOLUME,
            play_notification_sound: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    pub level: String,

    /// Directory for daily rotated log files; no file logging when unset
    pub log_dir: Option<PathBuf>,

    /// Also log to stdout
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            console: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioSettings,

    /// Interval between update events driven by the host loop
    pub tick_interval_ms: u64,

    /// Where the user profile is stored
    pub profile_path: Option<PathBuf>,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioSettings::default(),
            tick_interval_ms: 16, // ~60 updates per second
            profile_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    const LOG_LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Load configuration from `path`.
    /// Creates and saves the default config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            tracing::info!("Created default config at: {}", path.display());
            return Ok(config);
        }

        let load_err = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        };

        let content = fs::read_to_string(path).map_err(|e| load_err(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_err(Box::new(e)))?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let save_err = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| save_err(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_err(Box::new(e)))?;

        Ok(())
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("audio.music_volume", self.audio.music_volume),
            ("audio.sound_volume", self.audio.sound_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be 0.0-1.0, got {}",
                    field, value
                )));
            }
        }

        if !(1..=1000).contains(&self.tick_interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "tick_interval_ms must be 1-1000, got {}",
                self.tick_interval_ms
            )));
        }

        if !Self::LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {:?}, got '{}'",
                Self::LOG_LEVELS,
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Platform config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("config"))
            .join("config.json")
    }

    /// Configured profile location, or the platform data directory
    pub fn profile_file(&self) -> PathBuf {
        self.profile_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("profiles"))
                .join("profile.json")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.audio.music_volume, 0.5);
        assert_eq!(config.audio.sound_volume, 0.5);
        assert!(config.audio.play_notification_sound);
        assert_eq!(config.tick_interval_ms, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "audio": { "music_volume": 0.8 } }"#).unwrap();
        assert_eq!(config.audio.music_volume, 0.8);
        assert_eq!(config.audio.sound_volume, 0.5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = Config::default();
        config.audio.sound_volume = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "tick_interval_ms": 5000 }"#).unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_profile_file_override() {
        let mut config = Config::default();
        config.profile_path = Some(PathBuf::from("/tmp/custom.json"));
        assert_eq!(config.profile_file(), PathBuf::from("/tmp/custom.json"));
    }
}
