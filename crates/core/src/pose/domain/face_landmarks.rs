//! 68-point facial landmarks in the standard iBUG annotation order.
//!
//! Pose estimation only needs three anchors: the nose tip and the two outer
//! eye corners. Accessors return `None` for points at or left of the origin,
//! which detectors use to mark landmarks they could not localize.

pub const LANDMARK_COUNT: usize = 68;

/// Index of the nose tip in the 68-point annotation.
const NOSE_TIP: usize = 30;
/// Outer corner of the left eye (subject's right on the image).
const LEFT_EYE_OUTER: usize = 36;
/// Outer corner of the right eye.
const RIGHT_EYE_OUTER: usize = 45;

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks68 {
    /// Points with x <= 0 are treated as missing.
    points: [(f64, f64); LANDMARK_COUNT],
}

impl FaceLandmarks68 {
    pub fn new(points: [(f64, f64); LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Builds a landmark set from just the three pose anchors, with every
    /// other point marked missing. Used by scripted detectors and tests.
    pub fn from_anchors(
        nose_tip: (f64, f64),
        left_eye_outer: (f64, f64),
        right_eye_outer: (f64, f64),
    ) -> Self {
        let mut points = [(0.0, 0.0); LANDMARK_COUNT];
        points[NOSE_TIP] = nose_tip;
        points[LEFT_EYE_OUTER] = left_eye_outer;
        points[RIGHT_EYE_OUTER] = right_eye_outer;
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64); LANDMARK_COUNT] {
        &self.points
    }

    pub fn nose_tip(&self) -> Option<(f64, f64)> {
        self.visible(NOSE_TIP)
    }

    pub fn left_eye_outer(&self) -> Option<(f64, f64)> {
        self.visible(LEFT_EYE_OUTER)
    }

    pub fn right_eye_outer(&self) -> Option<(f64, f64)> {
        self.visible(RIGHT_EYE_OUTER)
    }

    fn visible(&self, index: usize) -> Option<(f64, f64)> {
        let (x, y) = self.points[index];
        (x > 0.0).then_some((x, y))
    }
}
