//! Player settings and preferences
//!
//! Persisted as a small JSON document next to the runner. Anything unreadable
//! or out of range falls back to the defaults without blocking startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default sensitivity when nothing valid is stored
pub const DEFAULT_SENSITIVITY: f32 = 1.0;
/// Upper bound on the sensitivity scalar (lower bound is exclusive zero)
pub const MAX_SENSITIVITY: f32 = 2.0;

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Joystick sensitivity in (0, 2]
    pub sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl Settings {
    /// Settings file name
    pub const STORAGE_KEY: &'static str = "star_dodger_settings.json";

    pub fn is_valid_sensitivity(value: f32) -> bool {
        value.is_finite() && value > 0.0 && value <= MAX_SENSITIVITY
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(self) -> Self {
        if Self::is_valid_sensitivity(self.sensitivity) {
            self
        } else {
            log::warn!(
                "Stored sensitivity {} is out of range, using {}",
                self.sensitivity,
                DEFAULT_SENSITIVITY
            );
            Self::default()
        }
    }

    /// Update the sensitivity; returns false and keeps the old value if out of range
    pub fn set_sensitivity(&mut self, value: f32) -> bool {
        if !Self::is_valid_sensitivity(value) {
            log::warn!("Rejecting sensitivity {} (must be in (0, {}])", value, MAX_SENSITIVITY);
            return false;
        }
        self.sensitivity = value;
        true
    }

    /// Parse settings JSON, falling back to defaults on any problem
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                log::warn!("Malformed settings ({}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Load settings from a file
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not read {} ({}), using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings to a file
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
