use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Face mesh indices used by the classifier (MediaPipe Face Mesh topology).
pub mod face_points {
    /// Top of the forehead, at the hairline.
    pub const FOREHEAD: usize = 10;
    /// Inner edge of the upper lip.
    pub const UPPER_LIP: usize = 13;
    /// Inner edge of the lower lip.
    pub const LOWER_LIP: usize = 14;
    pub const CHIN: usize = 152;
    /// Ear on the left side of the image.
    pub const LEFT_EAR: usize = 234;
    /// Ear on the right side of the image.
    pub const RIGHT_EAR: usize = 454;

    /// Minimum number of points in a face mesh (468, or 478 with refined irises).
    pub const COUNT: usize = 468;
}

/// Hand indices used by the classifier (MediaPipe Hands topology).
pub mod hand_points {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    /// Index finger MCP joint, where the finger meets the palm.
    pub const INDEX_BASE: usize = 5;
    pub const INDEX_TIP: usize = 8;
    /// Middle finger PIP joint.
    pub const MIDDLE_MID: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    /// Ring finger PIP joint.
    pub const RING_MID: usize = 14;
    pub const RING_TIP: usize = 16;

    pub const COUNT: usize = 21;
}

/// A tracked point in normalized image coordinates.
///
/// `x` and `y` are relative to frame width and height, with `y` growing
/// downward. `z` is relative depth and is ignored by every distance below.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub const fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned box defined by top-left corner, width, and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box enclosing all landmarks. Empty input yields a zero box.
    pub fn enclosing(points: &[Landmark]) -> Self {
        if points.is_empty() {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Scale a normalized box to pixel space.
    pub fn to_pixels(&self, frame_width: f32, frame_height: f32) -> Self {
        Self::new(
            self.x * frame_width,
            self.y * frame_height,
            self.width * frame_width,
            self.height * frame_height,
        )
    }
}

/// Landmarks of one detected face.
///
/// Construction checks that the mesh is large enough for every index in
/// [`face_points`], so the accessors below never go out of bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct FaceLandmarks {
    points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Result<Self> {
        if points.len() < face_points::COUNT {
            return Err(Error::TooFewLandmarks {
                set: "face",
                expected: face_points::COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    pub fn forehead(&self) -> Landmark {
        self.points[face_points::FOREHEAD]
    }

    pub fn chin(&self) -> Landmark {
        self.points[face_points::CHIN]
    }

    pub fn upper_lip(&self) -> Landmark {
        self.points[face_points::UPPER_LIP]
    }

    pub fn lower_lip(&self) -> Landmark {
        self.points[face_points::LOWER_LIP]
    }

    pub fn left_ear(&self) -> Landmark {
        self.points[face_points::LEFT_EAR]
    }

    pub fn right_ear(&self) -> Landmark {
        self.points[face_points::RIGHT_EAR]
    }

    /// Mean x over the whole mesh, in normalized coordinates.
    pub fn mean_x(&self) -> f32 {
        let sum: f32 = self.points.iter().map(|p| p.x).sum();
        sum / self.points.len() as f32
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::enclosing(&self.points)
    }

    /// Apply `f` to every point. Used to simulate camera motion in tests and tools.
    pub fn map_points<F>(&self, f: F) -> Self
    where
        F: Fn(Landmark) -> Landmark,
    {
        Self {
            points: self.points.iter().copied().map(f).collect(),
        }
    }
}

impl TryFrom<Vec<Landmark>> for FaceLandmarks {
    type Error = Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<FaceLandmarks> for Vec<Landmark> {
    fn from(face: FaceLandmarks) -> Self {
        face.points
    }
}

impl std::ops::Index<usize> for FaceLandmarks {
    type Output = Landmark;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

/// Landmarks of one detected hand (exactly 21 points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct HandLandmarks {
    points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Landmark>) -> Result<Self> {
        if points.len() != hand_points::COUNT {
            return Err(Error::TooFewLandmarks {
                set: "hand",
                expected: hand_points::COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn wrist(&self) -> Landmark {
        self.points[hand_points::WRIST]
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.points[hand_points::THUMB_TIP]
    }

    pub fn index_base(&self) -> Landmark {
        self.points[hand_points::INDEX_BASE]
    }

    pub fn index_tip(&self) -> Landmark {
        self.points[hand_points::INDEX_TIP]
    }

    pub fn middle_tip(&self) -> Landmark {
        self.points[hand_points::MIDDLE_TIP]
    }

    pub fn middle_mid(&self) -> Landmark {
        self.points[hand_points::MIDDLE_MID]
    }

    pub fn ring_tip(&self) -> Landmark {
        self.points[hand_points::RING_TIP]
    }

    pub fn ring_mid(&self) -> Landmark {
        self.points[hand_points::RING_MID]
    }

    pub fn map_points<F>(&self, f: F) -> Self
    where
        F: Fn(Landmark) -> Landmark,
    {
        Self {
            points: self.points.iter().copied().map(f).collect(),
        }
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarks {
    type Error = Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<HandLandmarks> for Vec<Landmark> {
    fn from(hand: HandLandmarks) -> Self {
        hand.points
    }
}

impl std::ops::Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_distance_ignores_depth() {
        let a = Landmark::with_depth(0.0, 0.0, 5.0);
        let b = Landmark::with_depth(3.0, 4.0, -2.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn bounding_box_encloses_points() {
        let bbox = BoundingBox::enclosing(&[
            Landmark::new(0.2, 0.3),
            Landmark::new(0.6, 0.1),
            Landmark::new(0.4, 0.9),
        ]);
        assert!((bbox.x - 0.2).abs() < 1e-6);
        assert!((bbox.y - 0.1).abs() < 1e-6);
        assert!((bbox.width - 0.4).abs() < 1e-6);
        assert!((bbox.height - 0.8).abs() < 1e-6);

        let px = bbox.to_pixels(100.0, 50.0);
        assert!((px.x - 20.0).abs() < 1e-4);
        assert!((px.height - 40.0).abs() < 1e-4);
    }

    #[test]
    fn short_face_mesh_is_rejected() {
        let err = FaceLandmarks::new(vec![Landmark::default(); 100]).unwrap_err();
        match err {
            Error::TooFewLandmarks {
                set,
                expected,
                actual,
            } => {
                assert_eq!(set, "face");
                assert_eq!(expected, 468);
                assert_eq!(actual, 100);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn refined_face_mesh_is_accepted() {
        let face = FaceLandmarks::new(vec![Landmark::default(); 478]).unwrap();
        assert_eq!(face.num_landmarks(), 478);
    }

    #[test]
    fn hand_requires_21_points() {
        assert!(HandLandmarks::new(vec![Landmark::default(); 21]).is_ok());
        assert!(HandLandmarks::new(vec![Landmark::default(); 20]).is_err());
        assert!(HandLandmarks::new(vec![Landmark::default(); 22]).is_err());
    }

    #[test]
    fn accessors_follow_index_schema() {
        let mut points = vec![Landmark::default(); face_points::COUNT];
        points[face_points::CHIN] = Landmark::new(0.5, 0.9);
        points[face_points::RIGHT_EAR] = Landmark::new(0.8, 0.4);
        let face = FaceLandmarks::new(points).unwrap();
        assert_eq!(face.chin(), Landmark::new(0.5, 0.9));
        assert_eq!(face.right_ear(), Landmark::new(0.8, 0.4));
        assert_eq!(face[face_points::CHIN], face.chin());
    }

    #[test]
    fn mean_x_averages_whole_mesh() {
        let mut points = vec![Landmark::new(0.25, 0.0); face_points::COUNT];
        points[0] = Landmark::new(0.25 + face_points::COUNT as f32 * 0.5, 0.0);
        let face = FaceLandmarks::new(points).unwrap();
        assert!((face.mean_x() - 0.75).abs() < 1e-4);
    }

    #[test]
    fn deserialization_validates_length() {
        let json = serde_json::to_string(&vec![Landmark::new(0.1, 0.2); 21]).unwrap();
        let hand: HandLandmarks = serde_json::from_str(&json).unwrap();
        assert_eq!(hand.points().len(), 21);

        let short = serde_json::to_string(&vec![Landmark::new(0.1, 0.2); 5]).unwrap();
        assert!(serde_json::from_str::<HandLandmarks>(&short).is_err());

        let no_depth: Landmark = serde_json::from_str(r#"{"x":0.5,"y":0.25}"#).unwrap();
        assert_eq!(no_depth.z, 0.0);
    }
}
