//! Animation settings and preferences
//!
//! Persisted in LocalStorage on the web, read from a JSON file natively.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_PARTICLES, DEFAULT_NODE_COUNT, MAX_NODES};
use crate::renderer::Palette;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Ambient node population for this preset
    pub fn node_count(&self) -> usize {
        match self {
            QualityPreset::Low => 25,
            QualityPreset::Medium => DEFAULT_NODE_COUNT,
            QualityPreset::High => 80,
        }
    }

    /// Maximum live spray particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 500,
            QualityPreset::Medium => DEFAULT_MAX_PARTICLES,
            QualityPreset::High => 4000,
        }
    }
}

/// Errors while loading or storing settings
#[derive(Debug)]
pub enum SettingsError {
    /// Settings JSON did not parse.
    Parse(serde_json::Error),
    /// Settings file could not be read.
    Io(std::io::Error),
    /// LocalStorage is unavailable or rejected the write.
    Storage(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(e) => write!(f, "Invalid settings JSON: {}", e),
            SettingsError::Io(e) => write!(f, "Failed to read settings file: {}", e),
            SettingsError::Storage(msg) => write!(f, "Settings storage failed: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(e) => Some(e),
            SettingsError::Io(e) => Some(e),
            SettingsError::Storage(_) => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

/// Backdrop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Explicit node count (overrides the preset)
    pub node_count: Option<usize>,
    /// Explicit particle cap (overrides the preset)
    pub max_particles: Option<usize>,
    /// Cursor sparkle spray
    pub particles: bool,
    /// Reduced motion (disables the spray)
    pub reduced_motion: bool,
    /// Fixed RNG seed (random per mount when unset)
    pub seed: Option<u64>,
    /// Glyph colors
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            node_count: None,
            max_particles: None,
            particles: true,
            reduced_motion: false,
            seed: None,
            palette: Palette::default(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Clamp out-of-range values
    pub fn sanitized(mut self) -> Self {
        if let Some(n) = self.node_count
            && n > MAX_NODES
        {
            log::warn!("node_count {} above limit {}, clamping", n, MAX_NODES);
            self.node_count = Some(MAX_NODES);
        }
        self
    }

    /// Effective node population
    pub fn node_count(&self) -> usize {
        self.node_count
            .unwrap_or_else(|| self.quality.node_count())
            .min(MAX_NODES)
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        self.max_particles
            .unwrap_or_else(|| self.quality.max_particles())
    }

    /// Whether the spray reacts to the pointer (respects reduced_motion)
    pub fn spray_enabled(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neural_canvas_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SettingsError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| SettingsError::Storage("LocalStorage unavailable".to_string()))?;

        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| SettingsError::Storage(format!("{:?}", e)))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Read settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
