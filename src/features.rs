//! Geometric features derived from face and hand landmarks.
//!
//! Everything here is computed from the current frame only. Distances are
//! measured in the normalized image plane; the rule thresholds are expressed
//! as fractions of `face_height` or `palm_size`, which keeps them independent
//! of how far the user sits from the camera.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{FaceLandmarks, HandLandmarks, Landmark};

/// Horizontal position of the face center, used to tell which half of the
/// image a hand is in.
///
/// Stored in normalized coordinates. Detectors and capture loops usually know
/// the center in pixels, so [`SideReference::from_pixels`] divides by the frame
/// width once; all later comparisons stay in normalized space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SideReference {
    center_x: f32,
}

impl SideReference {
    pub fn from_pixels(face_center_x_px: f32, frame_width_px: f32) -> Result<Self> {
        if !frame_width_px.is_finite() || frame_width_px <= 0.0 {
            return Err(Error::InvalidFrameWidth(frame_width_px));
        }
        Ok(Self {
            center_x: face_center_x_px / frame_width_px,
        })
    }

    pub const fn from_normalized(center_x: f32) -> Self {
        Self { center_x }
    }

    /// Center taken as the mean x of the face mesh.
    pub fn from_face(face: &FaceLandmarks) -> Self {
        Self {
            center_x: face.mean_x(),
        }
    }

    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    /// True if `x` (normalized) lies strictly right of the face center.
    pub fn is_right_of(&self, x: f32) -> bool {
        x > self.center_x
    }
}

/// A finger is up when its tip is higher in the image than its middle joint.
pub fn finger_up(tip: &Landmark, mid: &Landmark) -> bool {
    tip.y < mid.y
}

pub fn finger_down(tip: &Landmark, mid: &Landmark) -> bool {
    tip.y > mid.y
}

/// Face-only quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceFeatures {
    /// Forehead to chin distance.
    pub face_height: f32,
    /// Vertical gap between the inner lips.
    pub mouth_opening: f32,
    pub chin_y: f32,
    pub right_ear_y: f32,
}

impl FaceFeatures {
    pub fn from_landmarks(face: &FaceLandmarks) -> Self {
        Self {
            face_height: face.forehead().distance(&face.chin()),
            mouth_opening: (face.upper_lip().y - face.lower_lip().y).abs(),
            chin_y: face.chin().y,
            right_ear_y: face.right_ear().y,
        }
    }
}

/// Quantities that need a hand, some of them relative to the face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandFeatures {
    /// Wrist to index base distance.
    pub palm_size: f32,
    pub wrist_y: f32,
    pub wrist_right_of_face: bool,
    pub index_to_right_ear: f32,
    pub index_to_left_ear: f32,
    /// |index tip y - index base y|; small when the finger points sideways.
    pub index_vertical_span: f32,
    pub index_base_y: f32,
    pub index_base_to_chin: f32,
    pub thumb_index_gap: f32,
    /// Index tip to index base distance.
    pub index_length: f32,
    pub middle_up: bool,
    pub ring_up: bool,
}

impl HandFeatures {
    pub fn from_landmarks(
        face: &FaceLandmarks,
        hand: &HandLandmarks,
        side: SideReference,
    ) -> Self {
        let wrist = hand.wrist();
        let index_tip = hand.index_tip();
        let index_base = hand.index_base();

        Self {
            palm_size: index_base.distance(&wrist),
            wrist_y: wrist.y,
            wrist_right_of_face: side.is_right_of(wrist.x),
            index_to_right_ear: index_tip.distance(&face.right_ear()),
            index_to_left_ear: index_tip.distance(&face.left_ear()),
            index_vertical_span: (index_tip.y - index_base.y).abs(),
            index_base_y: index_base.y,
            index_base_to_chin: index_base.distance(&face.chin()),
            thumb_index_gap: hand.thumb_tip().distance(&index_tip),
            index_length: index_tip.distance(&index_base),
            middle_up: finger_up(&hand.middle_tip(), &hand.middle_mid()),
            ring_up: finger_up(&hand.ring_tip(), &hand.ring_mid()),
        }
    }
}

/// All features for one frame. `hand` is `None` when no hand was detected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureBundle {
    pub face: FaceFeatures,
    pub hand: Option<HandFeatures>,
}

impl FeatureBundle {
    pub fn extract(
        face: &FaceLandmarks,
        hand: Option<&HandLandmarks>,
        side: SideReference,
    ) -> Self {
        Self {
            face: FaceFeatures::from_landmarks(face),
            hand: hand.map(|h| HandFeatures::from_landmarks(face, h, side)),
        }
    }
}
