use argmap_graph::GeometrySettings;
use argmap_graph::snap::DEFAULT_SNAP_THRESHOLD_PX;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub snap: SnapSettings,
    pub geometry: GeometrySettings,
    /// Coalesce drag moves to one applied move per animation frame.
    pub throttle_to_frames: bool,
    /// Lock reason recorded on an alt-drag duplicate.
    pub duplicate_lock_reason: String,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            snap: SnapSettings::default(),
            geometry: GeometrySettings::default(),
            throttle_to_frames: true,
            duplicate_lock_reason: "alt-drag duplicate".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    pub enabled: bool,
    /// Snap distance in screen pixels; divided by zoom at use.
    pub threshold_px: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_px: DEFAULT_SNAP_THRESHOLD_PX,
        }
    }
}

impl InteractionSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
