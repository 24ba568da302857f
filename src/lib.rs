//! # gesture-mirror
//!
//! Geometric gesture classification from face and hand landmarks.
//!
//! This crate provides:
//! - **Features**: scale-invariant distances and finger predicates derived from
//!   a MediaPipe-style face mesh (468+ points) and an optional hand (21 points)
//! - **Classification**: a priority-ordered rule table mapping those features to
//!   one of seven [`Gesture`] labels
//! - **Presentation**: display names, overlay images, and tracking of the
//!   gesture currently on display
//!
//! There is no learned model and no temporal smoothing: every frame is
//! classified on its own, and the classifier holds no state.
//!
//! ## Algorithm Overview
//!
//! 1. Measure the face: `face_height` (forehead to chin) and the inner lip gap
//! 2. Check for an open mouth (works without a hand)
//! 3. If a hand is present, measure `palm_size` (wrist to index base) and the
//!    hand-to-face distances
//! 4. Evaluate the hand rules in order and return the first match, or
//!    [`Gesture::Normal`]
//!
//! Thresholds are fractions of `face_height` or `palm_size`, so results do not
//! depend on the distance to the camera.
//!
//! ## Quick Start
//!
//! ```rust
//! use gesture_mirror::{
//!     face_points, FaceLandmarks, Gesture, GestureClassifier, Landmark, SideReference,
//! };
//!
//! let mut points = vec![Landmark::new(0.5, 0.5); face_points::COUNT];
//! points[face_points::FOREHEAD] = Landmark::new(0.5, 0.1);
//! points[face_points::CHIN] = Landmark::new(0.5, 0.5);
//! points[face_points::UPPER_LIP] = Landmark::new(0.5, 0.30);
//! points[face_points::LOWER_LIP] = Landmark::new(0.5, 0.35);
//! let face = FaceLandmarks::new(points).unwrap();
//!
//! // Face center at pixel 320 in a 640 pixel wide frame.
//! let side = SideReference::from_pixels(320.0, 640.0).unwrap();
//!
//! let classifier = GestureClassifier::new();
//! assert_eq!(classifier.classify_landmarks(&face, None, side), Gesture::MouthOpen);
//! ```

mod classifier;
pub mod config;
mod display;
mod error;
mod features;
pub mod frame;
mod gesture;
mod types;

pub use classifier::{Classification, GestureClassifier, Rule, Thresholds, RULES};
pub use config::{Config, OverlayConfig};
pub use display::{fit_within, DisplayTracker, OverlaySet};
pub use error::{Error, Result};
pub use features::{
    finger_down, finger_up, FaceFeatures, FeatureBundle, HandFeatures, SideReference,
};
pub use frame::{load_frames, parse_frames, Frame};
pub use gesture::{Gesture, UnknownGesture};
pub use types::{face_points, hand_points, BoundingBox, FaceLandmarks, HandLandmarks, Landmark};
