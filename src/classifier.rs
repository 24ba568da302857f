//! Priority-ordered gesture rules.
//!
//! Rules are evaluated top to bottom and the first match wins. The order
//! matters because the feature regions overlap: an open mouth can co-occur
//! with any hand pose, and a raised hand can also look like a perfect sign.
//!
//! Evaluation order:
//!
//! 1. `mouth_open` - face only, checked even without a hand
//! 2. `hand_behind_head_right`
//! 3. `hand_next_to_face_right`
//! 4. `hand_next_to_face_left`
//! 5. `hand_under_chin`
//! 6. `perfect_sign`
//!
//! When nothing matches the result is [`Gesture::Normal`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::features::{FaceFeatures, FeatureBundle, HandFeatures, SideReference};
use crate::frame::Frame;
use crate::gesture::Gesture;
use crate::types::{FaceLandmarks, HandLandmarks};

/// Threshold factors, each a fraction of a normalization unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Mouth opening, as a fraction of face height.
    pub mouth_open: f32,
    /// Upward wrist offset for the behind-head check, as a fraction of palm size.
    pub behind_head_offset: f32,
    /// Index tip to ear distance, as a fraction of palm size.
    pub ear_proximity: f32,
    /// Allowed vertical span of a sideways index finger, as a fraction of palm size.
    pub horizontal_tolerance: f32,
    /// Index base to chin distance, as a fraction of face height.
    pub under_chin: f32,
    /// Thumb to index tip gap, as a fraction of index finger length.
    pub perfect_circle: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            mouth_open: 0.12,
            behind_head_offset: 0.3,
            ear_proximity: 0.45,
            horizontal_tolerance: 0.5,
            under_chin: 0.35,
            perfect_circle: 0.45,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("mouth_open", self.mouth_open),
            ("behind_head_offset", self.behind_head_offset),
            ("ear_proximity", self.ear_proximity),
            ("horizontal_tolerance", self.horizontal_tolerance),
            ("under_chin", self.under_chin),
            ("perfect_circle", self.perfect_circle),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig {
                    field: format!("thresholds.{name}"),
                    message: format!("must be a positive number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

type FaceCheck = fn(&FaceFeatures, &Thresholds) -> bool;
type HandCheck = fn(&FaceFeatures, &HandFeatures, &Thresholds) -> bool;

#[derive(Clone, Copy)]
enum Check {
    Face(FaceCheck),
    Hand(HandCheck),
}

/// A named predicate paired with the gesture it reports.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub gesture: Gesture,
    check: Check,
}

impl Rule {
    /// Whether the rule needs hand features to fire.
    pub fn requires_hand(&self) -> bool {
        matches!(self.check, Check::Hand(_))
    }

    /// Hand rules never match a bundle without hand features.
    pub fn matches(&self, bundle: &FeatureBundle, thresholds: &Thresholds) -> bool {
        match (self.check, bundle.hand.as_ref()) {
            (Check::Face(check), _) => check(&bundle.face, thresholds),
            (Check::Hand(check), Some(hand)) => check(&bundle.face, hand, thresholds),
            (Check::Hand(_), None) => false,
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("gesture", &self.gesture)
            .field("requires_hand", &self.requires_hand())
            .finish()
    }
}

fn mouth_open(face: &FaceFeatures, t: &Thresholds) -> bool {
    face.mouth_opening > t.mouth_open * face.face_height
}

fn hand_behind_head_right(face: &FaceFeatures, hand: &HandFeatures, t: &Thresholds) -> bool {
    let offset = t.behind_head_offset * hand.palm_size;
    hand.wrist_y + offset < face.right_ear_y && hand.wrist_right_of_face
}

fn index_horizontal(hand: &HandFeatures, t: &Thresholds) -> bool {
    hand.index_vertical_span < t.horizontal_tolerance * hand.palm_size
}

fn hand_next_to_face_right(_: &FaceFeatures, hand: &HandFeatures, t: &Thresholds) -> bool {
    hand.index_to_right_ear < t.ear_proximity * hand.palm_size && index_horizontal(hand, t)
}

fn hand_next_to_face_left(_: &FaceFeatures, hand: &HandFeatures, t: &Thresholds) -> bool {
    hand.index_to_left_ear < t.ear_proximity * hand.palm_size && index_horizontal(hand, t)
}

fn hand_under_chin(face: &FaceFeatures, hand: &HandFeatures, t: &Thresholds) -> bool {
    hand.index_base_y > face.chin_y && hand.index_base_to_chin < t.under_chin * face.face_height
}

fn perfect_sign(_: &FaceFeatures, hand: &HandFeatures, t: &Thresholds) -> bool {
    let circle = hand.thumb_index_gap < t.perfect_circle * hand.index_length;
    circle && hand.middle_up && hand.ring_up
}

/// The rule table, in priority order.
pub const RULES: [Rule; 6] = [
    Rule {
        name: "mouth_open",
        gesture: Gesture::MouthOpen,
        check: Check::Face(mouth_open),
    },
    Rule {
        name: "hand_behind_head_right",
        gesture: Gesture::HandBehindHeadRight,
        check: Check::Hand(hand_behind_head_right),
    },
    Rule {
        name: "hand_next_to_face_right",
        gesture: Gesture::HandNextToFaceRight,
        check: Check::Hand(hand_next_to_face_right),
    },
    Rule {
        name: "hand_next_to_face_left",
        gesture: Gesture::HandNextToFaceLeft,
        check: Check::Hand(hand_next_to_face_left),
    },
    Rule {
        name: "hand_under_chin",
        gesture: Gesture::HandUnderChin,
        check: Check::Hand(hand_under_chin),
    },
    Rule {
        name: "perfect_sign",
        gesture: Gesture::PerfectSign,
        check: Check::Hand(perfect_sign),
    },
];

/// Result of a classification, with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub gesture: Gesture,
    /// `None` when no rule matched.
    pub rule: Option<&'static str>,
}

impl Classification {
    const NORMAL: Self = Self {
        gesture: Gesture::Normal,
        rule: None,
    };
}

/// Stateless classifier over [`RULES`].
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    thresholds: Thresholds,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a classifier with custom thresholds, rejecting non-positive factors.
    pub fn with_thresholds(thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn rules(&self) -> &'static [Rule] {
        &RULES
    }

    pub fn evaluate(&self, bundle: &FeatureBundle) -> Classification {
        for rule in &RULES {
            if rule.matches(bundle, &self.thresholds) {
                trace!(rule = rule.name, "gesture rule matched");
                return Classification {
                    gesture: rule.gesture,
                    rule: Some(rule.name),
                };
            }
        }
        trace!(has_hand = bundle.hand.is_some(), "no gesture rule matched");
        Classification::NORMAL
    }

    pub fn classify(&self, bundle: &FeatureBundle) -> Gesture {
        self.evaluate(bundle).gesture
    }

    /// Extract features and classify in one step.
    pub fn classify_landmarks(
        &self,
        face: &FaceLandmarks,
        hand: Option<&HandLandmarks>,
        side: SideReference,
    ) -> Gesture {
        self.classify(&FeatureBundle::extract(face, hand, side))
    }

    /// Classify the first face and first hand of a frame. A frame without a
    /// face is always [`Gesture::Normal`].
    pub fn evaluate_frame(&self, frame: &Frame) -> Classification {
        let Some(face) = frame.primary_face() else {
            return Classification::NORMAL;
        };
        let side = frame.side_reference(face);
        self.evaluate(&FeatureBundle::extract(face, frame.primary_hand(), side))
    }

    pub fn classify_frame(&self, frame: &Frame) -> Gesture {
        self.evaluate_frame(frame).gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_face() -> FaceFeatures {
        FaceFeatures {
            face_height: 0.4,
            mouth_opening: 0.01,
            chin_y: 0.5,
            right_ear_y: 0.3,
        }
    }

    /// A hand resting low and left, matching no rule.
    fn idle_hand() -> HandFeatures {
        HandFeatures {
            palm_size: 0.1,
            wrist_y: 0.9,
            wrist_right_of_face: false,
            index_to_right_ear: 0.5,
            index_to_left_ear: 0.5,
            index_vertical_span: 0.1,
            index_base_y: 0.3,
            index_base_to_chin: 0.3,
            thumb_index_gap: 0.1,
            index_length: 0.1,
            middle_up: false,
            ring_up: false,
        }
    }

    fn bundle(face: FaceFeatures, hand: Option<HandFeatures>) -> FeatureBundle {
        FeatureBundle { face, hand }
    }

    fn rule(name: &str) -> Rule {
        *RULES.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "mouth_open",
                "hand_behind_head_right",
                "hand_next_to_face_right",
                "hand_next_to_face_left",
                "hand_under_chin",
                "perfect_sign",
            ]
        );
        assert!(!RULES[0].requires_hand());
        assert!(RULES[1..].iter().all(Rule::requires_hand));
        for r in &RULES {
            assert_eq!(r.name, r.gesture.as_str());
        }
    }

    #[test]
    fn idle_bundle_is_normal() {
        let c = GestureClassifier::new().evaluate(&bundle(closed_face(), Some(idle_hand())));
        assert_eq!(c.gesture, Gesture::Normal);
        assert_eq!(c.rule, None);
    }

    #[test]
    fn mouth_open_threshold_is_strict() {
        let t = Thresholds::default();
        let mut face = closed_face();
        face.mouth_opening = 0.049;
        assert!(rule("mouth_open").matches(&bundle(face, None), &t));
        face.mouth_opening = 0.047;
        assert!(!rule("mouth_open").matches(&bundle(face, None), &t));
    }

    #[test]
    fn behind_head_needs_right_side() {
        let t = Thresholds::default();
        let mut hand = idle_hand();
        hand.wrist_y = 0.2;
        hand.palm_size = 0.03;
        let r = rule("hand_behind_head_right");
        assert!(!r.matches(&bundle(closed_face(), Some(hand)), &t));
        hand.wrist_right_of_face = true;
        assert!(r.matches(&bundle(closed_face(), Some(hand)), &t));
        // Offset pushes the wrist below ear level.
        hand.palm_size = 0.4;
        assert!(!r.matches(&bundle(closed_face(), Some(hand)), &t));
    }

    #[test]
    fn next_to_face_needs_horizontal_finger() {
        let t = Thresholds::default();
        let mut hand = idle_hand();
        hand.index_to_right_ear = 0.04;
        hand.index_vertical_span = 0.06;
        let r = rule("hand_next_to_face_right");
        assert!(!r.matches(&bundle(closed_face(), Some(hand)), &t));
        hand.index_vertical_span = 0.04;
        assert!(r.matches(&bundle(closed_face(), Some(hand)), &t));
    }

    #[test]
    fn right_side_wins_over_left() {
        let mut hand = idle_hand();
        hand.index_to_right_ear = 0.01;
        hand.index_to_left_ear = 0.01;
        hand.index_vertical_span = 0.0;
        let g = GestureClassifier::new().classify(&bundle(closed_face(), Some(hand)));
        assert_eq!(g, Gesture::HandNextToFaceRight);

        hand.index_to_right_ear = 0.2;
        let g = GestureClassifier::new().classify(&bundle(closed_face(), Some(hand)));
        assert_eq!(g, Gesture::HandNextToFaceLeft);
    }

    #[test]
    fn under_chin_needs_base_below_chin() {
        let t = Thresholds::default();
        let mut hand = idle_hand();
        hand.index_base_to_chin = 0.1;
        let r = rule("hand_under_chin");
        assert!(!r.matches(&bundle(closed_face(), Some(hand)), &t));
        hand.index_base_y = 0.6;
        assert!(r.matches(&bundle(closed_face(), Some(hand)), &t));
        hand.index_base_to_chin = 0.2;
        assert!(!r.matches(&bundle(closed_face(), Some(hand)), &t));
    }

    #[test]
    fn perfect_sign_needs_both_fingers_up() {
        let t = Thresholds::default();
        let mut hand = idle_hand();
        hand.thumb_index_gap = 0.02;
        hand.middle_up = true;
        let r = rule("perfect_sign");
        assert!(!r.matches(&bundle(closed_face(), Some(hand)), &t));
        hand.ring_up = true;
        assert!(r.matches(&bundle(closed_face(), Some(hand)), &t));
    }

    #[test]
    fn zero_palm_never_counts_as_near() {
        let mut hand = idle_hand();
        hand.palm_size = 0.0;
        hand.index_to_right_ear = 0.0;
        hand.index_to_left_ear = 0.0;
        hand.index_vertical_span = 0.0;
        let g = GestureClassifier::new().classify(&bundle(closed_face(), Some(hand)));
        assert_eq!(g, Gesture::Normal);
    }

    #[test]
    fn hand_rules_skip_without_hand() {
        let t = Thresholds::default();
        for r in RULES.iter().filter(|r| r.requires_hand()) {
            assert!(!r.matches(&bundle(closed_face(), None), &t));
        }
    }

    #[test]
    fn custom_thresholds() {
        let thresholds = Thresholds {
            mouth_open: 0.01,
            ..Thresholds::default()
        };
        let classifier = GestureClassifier::with_thresholds(thresholds).unwrap();
        assert_eq!(
            classifier.classify(&bundle(closed_face(), None)),
            Gesture::MouthOpen
        );
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let thresholds = Thresholds {
            under_chin: 0.0,
            ..Thresholds::default()
        };
        match GestureClassifier::with_thresholds(thresholds) {
            Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, "thresholds.under_chin"),
            other => panic!("expected invalid config, got {other:?}"),
        }

        let nan = Thresholds {
            mouth_open: f32::NAN,
            ..Thresholds::default()
        };
        assert!(nan.validate().is_err());
    }
}
