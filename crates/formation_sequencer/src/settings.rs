// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings.
//!
//! Settings are persisted as RON. Fields missing from a file fall back to
//! their defaults so older files keep loading.

use crate::dancer::Position;
use crate::error::{Result, SequencerError};
use crate::keyframe::DEFAULT_DURATION_MS;
use crate::store::DancerDefaults;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "formation_editor.ron";

/// Editor-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Format version
    pub version: u32,
    /// Grid cell size in stage units
    pub grid_size: f64,
    /// Snap dragged dancers to the grid
    pub snap_to_grid: bool,
    /// Draw the grid
    pub show_grid: bool,
    /// Draw the ghost overlay
    pub show_ghost: bool,
    /// Stage width in stage units
    pub stage_width: f64,
    /// Stage height in stage units
    pub stage_height: f64,
    /// Where new dancers appear
    pub spawn_position: Position,
    /// Colour of new dancers
    pub default_color: String,
    /// Duration given to newly captured keyframes, in milliseconds
    pub default_duration_ms: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            grid_size: 50.0,
            snap_to_grid: true,
            show_grid: true,
            show_ghost: true,
            stage_width: 800.0,
            stage_height: 600.0,
            spawn_position: Position::new(400.0, 300.0),
            default_color: "#000000".to_string(),
            default_duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

impl EditorSettings {
    /// Grid cell to snap drags to, if snapping is on
    pub fn snap(&self) -> Option<f64> {
        self.snap_to_grid.then_some(self.grid_size)
    }

    /// Defaults for newly added dancers
    pub fn dancer_defaults(&self) -> DancerDefaults {
        DancerDefaults {
            color: self.default_color.clone(),
            spawn: self.spawn_position,
        }
    }

    /// Parse settings from RON text
    pub fn from_ron(content: &str) -> Result<Self> {
        let settings: EditorSettings =
            ron::from_str(content).map_err(|e| SequencerError::Settings(e.to_string()))?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SequencerError::Settings(format!(
                "Settings version {} is newer than supported version {}",
                settings.version, SETTINGS_FORMAT_VERSION
            )));
        }

        Ok(settings)
    }

    /// Render settings as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config).map_err(|e| SequencerError::Settings(e.to_string()))
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&content)?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }
}
