//! Per-frame detector output as read from recordings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::SideReference;
use crate::types::{BoundingBox, FaceLandmarks, HandLandmarks};

#[derive(Deserialize)]
struct RawFrame {
    width: f32,
    height: f32,
    #[serde(default)]
    faces: Vec<FaceLandmarks>,
    #[serde(default)]
    hands: Vec<HandLandmarks>,
}

/// Landmarks detected in one video frame, plus the frame size in pixels.
///
/// Detectors may report several faces or hands; only the first of each is
/// ever classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct Frame {
    width: f32,
    height: f32,
    faces: Vec<FaceLandmarks>,
    hands: Vec<HandLandmarks>,
}

impl Frame {
    pub fn new(
        width: f32,
        height: f32,
        faces: Vec<FaceLandmarks>,
        hands: Vec<HandLandmarks>,
    ) -> Result<Self> {
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidFrameWidth(width));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::InvalidFrameHeight(height));
        }
        Ok(Self {
            width,
            height,
            faces,
            hands,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn faces(&self) -> &[FaceLandmarks] {
        &self.faces
    }

    pub fn hands(&self) -> &[HandLandmarks] {
        &self.hands
    }

    pub fn primary_face(&self) -> Option<&FaceLandmarks> {
        self.faces.first()
    }

    pub fn primary_hand(&self) -> Option<&HandLandmarks> {
        self.hands.first()
    }

    /// Face center in pixels: mean x of the face mesh scaled to frame width.
    pub fn face_center_px(&self, face: &FaceLandmarks) -> f32 {
        face.mean_x() * self.width
    }

    /// Side reference for `face`; the width was checked in [`Frame::new`].
    pub fn side_reference(&self, face: &FaceLandmarks) -> SideReference {
        SideReference::from_normalized(self.face_center_px(face) / self.width)
    }

    /// Bounding box of the primary face in pixels.
    pub fn face_box_px(&self) -> Option<BoundingBox> {
        self.primary_face()
            .map(|f| f.bounding_box().to_pixels(self.width, self.height))
    }
}

impl TryFrom<RawFrame> for Frame {
    type Error = Error;

    fn try_from(raw: RawFrame) -> Result<Self> {
        Self::new(raw.width, raw.height, raw.faces, raw.hands)
    }
}

/// Parse a recording: either a JSON array of frames or one frame per line.
pub fn parse_frames(contents: &str) -> Result<Vec<Frame>> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut frames = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        frames.push(serde_json::from_str(line)?);
    }
    Ok(frames)
}

pub fn load_frames<P: AsRef<Path>>(path: P) -> Result<Vec<Frame>> {
    let contents = fs::read_to_string(path)?;
    parse_frames(&contents)
}
