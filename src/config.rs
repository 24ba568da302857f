//! Configuration loading.
//!
//! ```toml
//! [thresholds]
//! mouth_open = 0.12
//!
//! [overlays]
//! dir = "./images"
//! max_width = 800
//! max_height = 600
//!
//! [overlays.files]
//! normal = "niels_normal.jpg"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::Thresholds;
use crate::error::{Error, Result};
use crate::gesture::Gesture;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub overlays: OverlayConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&contents)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the first default path that exists, or fall back to defaults.
    pub fn load() -> Result<Self> {
        let paths = [
            PathBuf::from("gesture-mirror.toml"),
            PathBuf::from("config/gesture-mirror.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;

        if self.overlays.max_width == 0 || self.overlays.max_height == 0 {
            return Err(Error::InvalidConfig {
                field: "overlays.max_width/max_height".to_string(),
                message: "Display size must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Overlay image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Directory containing the overlay images. Overlays are disabled when unset.
    pub dir: Option<PathBuf>,
    /// Maximum display width in pixels
    pub max_width: u32,
    /// Maximum display height in pixels
    pub max_height: u32,
    /// File name overrides keyed by gesture identifier (e.g. "perfect_sign")
    pub files: HashMap<String, String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_width: 800,
            max_height: 600,
            files: HashMap::new(),
        }
    }
}

impl OverlayConfig {
    pub fn file_for(&self, gesture: Gesture) -> &str {
        self.files
            .get(gesture.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| gesture.overlay_file())
    }
}
