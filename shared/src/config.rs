//! Configuration persistence utilities
//!
//! User options live as TOML files in the per-user config directory, next to
//! the local event store.

use directories::ProjectDirs;
use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::navigation::ViewMode;
use crate::theme::DEFAULT_THEME_ID;
use crate::ticker::WallClock;

/// File stem of the options file
pub const OPTIONS_NAME: &str = "options";
/// File stem of the local event store
pub const EVENTS_NAME: &str = "events";
/// Subdirectory of the config dir holding day exports
pub const EXPORTS_DIR: &str = "exports";

/// Error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    NoConfigDir,
    /// IO error while reading/writing config
    Io(io::Error),
    /// Failed to parse config file
    Parse(toml::de::Error),
    /// Failed to serialize config
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Per-user options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayRingConfig {
    /// IANA zone for the wall clock; `None` follows the system
    pub timezone: Option<String>,
    /// Id of the selected theme
    pub theme_id: String,
    /// View shown at startup
    pub default_view: ViewMode,
}

impl Default for DayRingConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            theme_id: DEFAULT_THEME_ID.to_string(),
            default_view: ViewMode::Clock,
        }
    }
}

impl DayRingConfig {
    /// Load the options file, falling back to defaults on any problem
    pub fn load_or_default() -> Self {
        match load_config(OPTIONS_NAME) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Failed to load options, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        save_config(OPTIONS_NAME, self)
    }

    /// Wall clock for the configured zone
    ///
    /// An unknown zone name is logged and the system clock is used instead.
    pub fn wall_clock(&self) -> WallClock {
        match self.timezone.as_deref() {
            None => WallClock::System,
            Some(name) => WallClock::parse(name).unwrap_or_else(|e| {
                warn!("{}; following the system clock", e);
                WallClock::System
            }),
        }
    }
}

/// Get the base configuration directory
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "dayring", "dayring").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path of a named TOML file in the config directory
pub fn config_path(name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", name)))
}

/// Directory day exports are written to
pub fn exports_dir() -> Result<PathBuf, ConfigError> {
    config_dir()
        .map(|dir| dir.join(EXPORTS_DIR))
        .ok_or(ConfigError::NoConfigDir)
}

/// Path of the local event store
pub fn events_path() -> Result<PathBuf, ConfigError> {
    config_path(EVENTS_NAME).ok_or(ConfigError::NoConfigDir)
}

/// Read a TOML file
///
/// A missing or blank file reads as `None`; a file that exists but does not
/// parse is an error.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if contents.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(toml::from_str(&contents)?))
}

/// Write `value` as pretty TOML, creating parent directories
pub fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(value)?)?;
    Ok(())
}

/// Load a named options file, `None` if it doesn't exist yet
pub fn load_config<T: DeserializeOwned>(name: &str) -> Result<Option<T>, ConfigError> {
    read_toml(&config_path(name).ok_or(ConfigError::NoConfigDir)?)
}

/// Save a named options file
pub fn save_config<T: Serialize>(name: &str, config: &T) -> Result<(), ConfigError> {
    write_toml(&config_path(name).ok_or(ConfigError::NoConfigDir)?, config)
}

/// Delete a named config file
pub fn delete_config(name: &str) -> Result<(), ConfigError> {
    let path = config_path(name).ok_or(ConfigError::NoConfigDir)?;

    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path() {
        let path = config_path("options");
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().ends_with("options.toml"));
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: DayRingConfig = toml::from_str("theme_id = \"leafy\"").unwrap();
        assert_eq!(config.theme_id, "leafy");
        assert_eq!(config.timezone, None);
        assert_eq!(config.default_view, ViewMode::Clock);
    }

    #[test]
    fn test_round_trip() {
        let config = DayRingConfig {
            timezone: Some("Europe/Stockholm".to_string()),
            theme_id: "leafy".to_string(),
            default_view: ViewMode::Week,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: DayRingConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_toml_file_helpers() {
        let dir = std::env::temp_dir().join(format!("dayring_config_{}", std::process::id()));
        let path = dir.join("nested").join("options.toml");
        let _ = fs::remove_dir_all(&dir);

        // Missing file reads as nothing
        let missing: Option<DayRingConfig> = read_toml(&path).unwrap();
        assert!(missing.is_none());

        let config = DayRingConfig {
            default_view: ViewMode::Linear,
            ..DayRingConfig::default()
        };
        write_toml(&path, &config).unwrap();
        let back: Option<DayRingConfig> = read_toml(&path).unwrap();
        assert_eq!(back, Some(config));

        fs::write(&path, "theme_id = [").unwrap();
        let broken: Result<Option<DayRingConfig>, _> = read_toml(&path);
        assert!(matches!(broken, Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_timezone_falls_back() {
        let config = DayRingConfig {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..DayRingConfig::default()
        };
        assert_eq!(config.wall_clock(), WallClock::System);

        let config = DayRingConfig {
            timezone: Some("Asia/Tokyo".to_string()),
            ..DayRingConfig::default()
        };
        assert_eq!(config.wall_clock(), WallClock::Zone(chrono_tz::Asia::Tokyo));
    }
}
