//! Engine settings
//!
//! Tunables for the broad phase, the navigation grid and path following.
//! Persisted as JSON; missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GRID_CELL_SIZE, DEFAULT_HASH_CELL_SIZE, WAYPOINT_ARRIVAL_DISTANCE};

/// Settings load/save errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value outside its allowed range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // === Broad phase ===
    /// Spatial hash bucket size in world units
    pub hash_cell_size: f32,
    /// Query the swept AABB (start to end of frame) instead of the current one
    pub swept_broad_phase: bool,

    // === Navigation ===
    /// Navigation grid cell size in world units
    pub grid_cell_size: f32,
    /// Distance at which a waypoint counts as reached
    pub waypoint_arrival_distance: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hash_cell_size: DEFAULT_HASH_CELL_SIZE,
            swept_broad_phase: true,
            grid_cell_size: DEFAULT_GRID_CELL_SIZE,
            waypoint_arrival_distance: WAYPOINT_ARRIVAL_DISTANCE,
        }
    }
}

impl EngineSettings {
    /// Parse and validate settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json_string()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Reject sizes that would break bucketing or grid conversion
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.hash_cell_size.is_finite() && self.hash_cell_size > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "hash_cell_size must be positive, got {}",
                self.hash_cell_size
            )));
        }
        if !(self.grid_cell_size.is_finite() && self.grid_cell_size > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "grid_cell_size must be positive, got {}",
                self.grid_cell_size
            )));
        }
        if !(self.waypoint_arrival_distance.is_finite() && self.waypoint_arrival_distance >= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "waypoint_arrival_distance must be non-negative, got {}",
                self.waypoint_arrival_distance
            )));
        }
        Ok(())
    }
}
