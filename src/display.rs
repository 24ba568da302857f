//! Presentation of classified gestures: display names, overlay images and the
//! currently shown gesture.
//!
//! None of this feeds back into classification.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::error::{Error, Result};
use crate::gesture::Gesture;

impl Gesture {
    /// Human-readable name shown to the user.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "No Gesture - Normal",
            Self::MouthOpen => "Mouth Open",
            Self::HandUnderChin => "Hand Under Chin",
            Self::HandBehindHeadRight => "Hand Behind Head",
            Self::HandNextToFaceRight => "Hand Next to Face Right",
            Self::HandNextToFaceLeft => "Hand Next to Face Left",
            Self::PerfectSign => "Perfect_Sign",
        }
    }

    /// Default overlay image file name, relative to the overlay directory.
    pub fn overlay_file(&self) -> &'static str {
        match self {
            Self::Normal => "niels_normal.jpg",
            Self::MouthOpen => "mouth_open.jpg",
            Self::HandUnderChin => "hand_under_chin.jpg",
            Self::HandBehindHeadRight => "hand_behind_head_on_right.jpg",
            Self::HandNextToFaceRight => "hand_next_to_face_right.jpg",
            Self::HandNextToFaceLeft => "hand_next_to_face_left.jpg",
            Self::PerfectSign => "perfect_sign.jpg",
        }
    }

    /// One-line usage hint for the gesture.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Normal => "No gesture detected (default state)",
            Self::MouthOpen => "Open your mouth noticeably",
            Self::HandUnderChin => "Rest your hand under your chin",
            Self::HandBehindHeadRight => "Right hand behind head, elbow up",
            Self::HandNextToFaceRight | Self::HandNextToFaceLeft => {
                "Hand gently next to your face, index finger sideways"
            }
            Self::PerfectSign => "Thumb and index form a circle, other fingers up",
        }
    }
}

/// Largest size with the same aspect ratio that fits in `max_width` x
/// `max_height`. Never enlarges.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let scale_w = max_width as f32 / width as f32;
    let scale_h = max_height as f32 / height as f32;
    let scale = scale_w.min(scale_h);

    if scale < 1.0 {
        let w = ((width as f32 * scale) as u32).max(1);
        let h = ((height as f32 * scale) as u32).max(1);
        (w, h)
    } else {
        (width, height)
    }
}

/// Overlay images keyed by gesture.
#[derive(Debug)]
pub struct OverlaySet {
    dir: PathBuf,
    images: HashMap<Gesture, DynamicImage>,
    max_width: u32,
    max_height: u32,
}

impl OverlaySet {
    /// Load overlays if the configuration names a directory.
    pub fn from_config(config: &OverlayConfig) -> Result<Option<Self>> {
        if config.dir.is_none() {
            debug!("No overlay directory configured");
            return Ok(None);
        }
        Self::load(config).map(Some)
    }

    /// Load every overlay found in the configured directory.
    ///
    /// Missing or unreadable files are logged and skipped; only the
    /// `normal` overlay is required.
    pub fn load(config: &OverlayConfig) -> Result<Self> {
        let dir = config.dir.as_deref().ok_or_else(|| Error::InvalidConfig {
            field: "overlays.dir".to_string(),
            message: "Overlay directory is not set".to_string(),
        })?;
        let mut images = HashMap::new();

        for gesture in Gesture::ALL {
            let path = dir.join(config.file_for(gesture));
            if !path.exists() {
                warn!("Overlay not found: {}", path.display());
                continue;
            }
            match image::open(&path) {
                Ok(img) => {
                    debug!("Loaded overlay {} -> {}", gesture, path.display());
                    images.insert(gesture, img);
                }
                Err(e) => warn!("Failed to load overlay {}: {}", path.display(), e),
            }
        }

        if !images.contains_key(&Gesture::Normal) {
            return Err(Error::MissingDefaultOverlay(dir.display().to_string()));
        }

        info!("Loaded {} of {} overlays", images.len(), Gesture::ALL.len());

        Ok(Self {
            dir: dir.to_path_buf(),
            images,
            max_width: config.max_width,
            max_height: config.max_height,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn contains(&self, gesture: Gesture) -> bool {
        self.images.contains_key(&gesture)
    }

    /// The gesture whose overlay will actually be shown: `gesture` itself if
    /// loaded, `normal` otherwise.
    pub fn resolve(&self, gesture: Gesture) -> Gesture {
        if self.contains(gesture) {
            gesture
        } else {
            Gesture::Normal
        }
    }

    pub fn get(&self, gesture: Gesture) -> &DynamicImage {
        // `normal` is guaranteed by `load`.
        &self.images[&self.resolve(gesture)]
    }

    /// Overlay for `gesture`, shrunk to fit the configured display size.
    pub fn fitted(&self, gesture: Gesture) -> DynamicImage {
        let img = self.get(gesture);
        let (w, h) = fit_within(img.width(), img.height(), self.max_width, self.max_height);
        if (w, h) == (img.width(), img.height()) {
            img.clone()
        } else {
            img.resize_exact(w, h, FilterType::Triangle)
        }
    }
}

/// Tracks which gesture is currently on display.
#[derive(Debug, Clone)]
pub struct DisplayTracker {
    current: Gesture,
}

impl Default for DisplayTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayTracker {
    pub fn new() -> Self {
        Self {
            current: Gesture::Normal,
        }
    }

    pub fn current(&self) -> Gesture {
        self.current
    }

    /// Record the gesture shown for this frame. `available` decides whether a
    /// gesture can be shown at all; unavailable gestures display as `normal`.
    ///
    /// Returns the new gesture only when the display changes.
    pub fn update<F>(&mut self, detected: Gesture, available: F) -> Option<Gesture>
    where
        F: Fn(Gesture) -> bool,
    {
        let shown = if available(detected) {
            detected
        } else {
            Gesture::Normal
        };
        if shown == self.current {
            return None;
        }
        debug!(from = %self.current, to = %shown, "displayed gesture changed");
        self.current = shown;
        Some(shown)
    }
}
