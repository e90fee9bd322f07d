use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::geometry::{BoundingBox, Point};
use crate::landmark::{BodyLandmark, Landmark, HEAD_REGION, HIPS, REQUIRED_LANDMARKS};

/// Warm-up after session start before the baseline is captured.
pub const CALIBRATION_DELAY: Duration = Duration::from_millis(2000);

/// Head drift, in normalized frame units, above which the user is told to keep still.
pub const DRIFT_THRESHOLD: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    Calibrating,
    CalibrationComplete,
    GoodBalance,
    KeepHeadStill,
}

impl Feedback {
    /// Classification of a post-calibration drift value.
    pub fn classify(drift: f32) -> Self {
        if drift > DRIFT_THRESHOLD {
            Feedback::KeepHeadStill
        } else {
            Feedback::GoodBalance
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Calibrating => "Stand still – calibrating…",
            Feedback::CalibrationComplete => "Calibration complete ✅",
            Feedback::GoodBalance => "Good balance 👍",
            Feedback::KeepHeadStill => "Keep head still",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything the caller needs to paint one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub head_box: BoundingBox,
    pub head_center: Point,
    /// Normalized x of the vertical line through the hip midpoint.
    pub gravity_line_x: Option<f32>,
    pub drift: Option<f32>,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameResult {
    /// No pose this frame: no overlay, feedback left as it was.
    Skipped,
    Update(FrameUpdate),
}

impl FrameResult {
    pub fn update(&self) -> Option<&FrameUpdate> {
        match self {
            FrameResult::Skipped => None,
            FrameResult::Update(update) => Some(update),
        }
    }
}

/// Tracks head position against a baseline captured once per session.
#[derive(Debug, Clone)]
pub struct PostureMonitor {
    baseline: Option<Point>,
    session_start: Instant,
}

impl Default for PostureMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PostureMonitor {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(session_start: Instant) -> Self {
        Self {
            baseline: None,
            session_start,
        }
    }

    pub fn baseline(&self) -> Option<Point> {
        self.baseline
    }

    pub fn session_start(&self) -> Instant {
        self.session_start
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn on_frame(&mut self, landmarks: Option<&[Landmark]>) -> FrameResult {
        self.on_frame_at(landmarks, Instant::now())
    }

    /// Same as [`on_frame`](Self::on_frame) with an explicit frame time.
    pub fn on_frame_at(&mut self, landmarks: Option<&[Landmark]>, now: Instant) -> FrameResult {
        let Some(landmarks) = landmarks else {
            return FrameResult::Skipped;
        };
        if !is_usable(landmarks) {
            debug!(len = landmarks.len(), "skipping malformed landmark set");
            return FrameResult::Skipped;
        }

        let Some(head_box) = head_box(landmarks) else {
            return FrameResult::Skipped;
        };
        let head_center = head_box.center();

        let Some(baseline) = self.baseline else {
            let feedback = if now.saturating_duration_since(self.session_start) > CALIBRATION_DELAY {
                self.baseline = Some(head_center);
                info!(x = head_center.x, y = head_center.y, "head baseline calibrated");
                Feedback::CalibrationComplete
            } else {
                Feedback::Calibrating
            };

            return FrameResult::Update(FrameUpdate {
                head_box,
                head_center,
                gravity_line_x: None,
                drift: None,
                feedback,
            });
        };

        let drift = head_center.distance(&baseline);

        FrameResult::Update(FrameUpdate {
            head_box,
            head_center,
            gravity_line_x: Some(hip_center_x(landmarks)),
            drift: Some(drift),
            feedback: Feedback::classify(drift),
        })
    }
}

fn is_usable(landmarks: &[Landmark]) -> bool {
    landmarks.len() >= REQUIRED_LANDMARKS
        && HEAD_REGION
            .iter()
            .chain(HIPS.iter())
            .map(|l| &landmarks[l.index()])
            .all(|lm| lm.x.is_finite() && lm.y.is_finite())
}

/// Bounding box of the head-region landmarks.
pub fn head_box(landmarks: &[Landmark]) -> Option<BoundingBox> {
    let points = HEAD_REGION
        .iter()
        .map(|l| landmarks.get(l.index()).map(Landmark::point))
        .collect::<Option<Vec<_>>>()?;
    BoundingBox::enclosing(points)
}

/// Midpoint of the two hip landmarks along x. Callers guarantee both hips exist.
pub fn hip_center_x(landmarks: &[Landmark]) -> f32 {
    let left = landmarks[BodyLandmark::LeftHip.index()].x;
    let right = landmarks[BodyLandmark::RightHip.index()].x;
    (left + right) / 2.0
}
