//! Game settings and preferences
//!
//! Loaded from a JSON file; any field left out keeps its default.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{START_LEVEL, TICK_MS};
use crate::sim::levels::MAX_LEVEL;

/// Slowest allowed tick period (ms)
pub const MAX_TICK_MS: u64 = 100;

/// Why a settings file could not be used
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "cannot read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "malformed settings: {err}"),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Level every new game starts at (1..=8)
    pub start_level: u32,
    /// Simulation tick period in milliseconds
    pub tick_ms: u64,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Plain confirm on the title screen starts a two-player game
    pub two_player: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_level: START_LEVEL,
            tick_ms: TICK_MS,
            seed: None,
            two_player: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        if !settings.master_volume.is_finite() || !settings.sfx_volume.is_finite() {
            return Err(SettingsError::Invalid("volume must be a finite number".into()));
        }
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{} ({}), using default settings", err, path.display());
                Self::default()
            }
        }
    }

    /// Clamp every field into its valid range
    pub fn sanitized(mut self) -> Self {
        self.start_level = self.start_level.clamp(1, MAX_LEVEL);
        self.tick_ms = self.tick_ms.clamp(1, MAX_TICK_MS);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "start_level": 3, "muted": true }"#).unwrap();
        assert_eq!(settings.start_level, 3);
        assert!(settings.muted);
        assert_eq!(settings.tick_ms, TICK_MS);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings =
            Settings::from_json(r#"{ "start_level": 40, "tick_ms": 0, "master_volume": 3.5 }"#).unwrap();
        assert_eq!(settings.start_level, MAX_LEVEL);
        assert_eq!(settings.tick_ms, 1);
        assert_eq!(settings.master_volume, 1.0);

        let settings = Settings::from_json(r#"{ "start_level": 0 }"#).unwrap();
        assert_eq!(settings.start_level, 1);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json("{ start_level: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/nonexistent/bucket-boom/settings.json");
        assert!(matches!(Settings::load(path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(path), Settings::default());
    }

    #[test]
    fn test_seed_round_trips() {
        let settings = Settings {
            seed: Some(99),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap().seed, Some(99));
    }
}
