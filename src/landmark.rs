//! Pose landmarks and the 33-point BlazePose index schema.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One pose keypoint. `x`/`y` are normalized to the frame width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

fn full_visibility() -> f32 {
    1.0
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

pub const LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Points bounding the head.
pub const HEAD_REGION: [BodyLandmark; 5] = [
    BodyLandmark::Nose,
    BodyLandmark::LeftEyeInner,
    BodyLandmark::LeftEye,
    BodyLandmark::LeftEar,
    BodyLandmark::RightEar,
];

pub const HIPS: [BodyLandmark; 2] = [BodyLandmark::LeftHip, BodyLandmark::RightHip];

/// Minimum sequence length covering the head region and both hips.
pub const REQUIRED_LANDMARKS: usize = BodyLandmark::RightHip.index() + 1;

/// Skeleton connectors drawn by the overlay, as index pairs.
pub const POSE_CONNECTIONS: [(usize, usize); 35] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (11, 23),
    (12, 24),
    (23, 24),
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_region_matches_schema_indices() {
        let idx: Vec<usize> = HEAD_REGION.iter().map(|l| l.index()).collect();
        assert_eq!(idx, vec![0, 1, 2, 7, 8]);
        assert_eq!(HIPS[0].index(), 23);
        assert_eq!(HIPS[1].index(), 24);
        assert_eq!(REQUIRED_LANDMARKS, 25);
    }

    #[test]
    fn connections_stay_within_schema() {
        for (a, b) in POSE_CONNECTIONS {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT, "({a}, {b})");
            assert_ne!(a, b);
        }
    }

    #[test]
    fn optional_fields_take_defaults() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.25,"y":0.5}"#).unwrap();
        assert_eq!(lm, Landmark::new(0.25, 0.5));

        let lm: Landmark =
            serde_json::from_str(r#"{"x":0.1,"y":0.2,"z":-0.3,"visibility":0.4}"#).unwrap();
        assert_eq!(lm.z, -0.3);
        assert_eq!(lm.visibility, 0.4);
    }
}
