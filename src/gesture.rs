use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of gestures the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// No gesture recognized, or no face in the frame.
    #[default]
    Normal,
    MouthOpen,
    HandUnderChin,
    HandBehindHeadRight,
    HandNextToFaceRight,
    HandNextToFaceLeft,
    PerfectSign,
}

impl Gesture {
    pub const ALL: [Gesture; 7] = [
        Gesture::Normal,
        Gesture::MouthOpen,
        Gesture::HandUnderChin,
        Gesture::HandBehindHeadRight,
        Gesture::HandNextToFaceRight,
        Gesture::HandNextToFaceLeft,
        Gesture::PerfectSign,
    ];

    /// Stable identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::MouthOpen => "mouth_open",
            Self::HandUnderChin => "hand_under_chin",
            Self::HandBehindHeadRight => "hand_behind_head_right",
            Self::HandNextToFaceRight => "hand_next_to_face_right",
            Self::HandNextToFaceLeft => "hand_next_to_face_left",
            Self::PerfectSign => "perfect_sign",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown gesture: {0}")]
pub struct UnknownGesture(pub String);

impl std::str::FromStr for Gesture {
    type Err = UnknownGesture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGesture(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_match_serde() {
        for g in Gesture::ALL {
            let json = serde_json::to_string(&g).unwrap();
            assert_eq!(json, format!("\"{}\"", g.as_str()));
        }
    }

    #[test]
    fn parse_identifiers() {
        assert_eq!("perfect_sign".parse::<Gesture>().unwrap(), Gesture::PerfectSign);
        assert_eq!("normal".parse::<Gesture>().unwrap(), Gesture::Normal);
        assert!("wave".parse::<Gesture>().is_err());
    }

    #[test]
    fn default_is_normal() {
        assert!(Gesture::default().is_normal());
        assert!(!Gesture::MouthOpen.is_normal());
    }
}
