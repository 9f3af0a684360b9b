//! Ratio-based head-pose estimation from eye/nose geometry.
//!
//! Measures the horizontal distance from the nose tip to each outer eye
//! corner. A head turned left brings the nose toward the right eye, so the
//! left distance grows relative to the right one; the L/R ratio against a
//! symmetric band classifies the turn. Noisy near the band edges — the
//! session's hold-counter debouncing exists to absorb exactly that.

use crate::pose::domain::face_landmarks::FaceLandmarks68;
use crate::pose::domain::head_pose::HeadPose;
use crate::shared::constants::{POSE_RATIO_THRESHOLD_HIGH, POSE_RATIO_THRESHOLD_LOW};

/// Right-distance floor (px) below which the ratio is degenerate and the
/// pose is reported as `Center` rather than dividing by noise.
const MIN_RIGHT_DISTANCE: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct PoseEstimator {
    ratio_high: f64,
    ratio_low: f64,
}

impl PoseEstimator {
    pub fn new(ratio_high: f64, ratio_low: f64) -> Self {
        Self {
            ratio_high,
            ratio_low,
        }
    }

    /// Classifies a landmark set into a discrete head pose.
    ///
    /// Returns `Unknown` when any required anchor is missing.
    pub fn estimate(&self, landmarks: &FaceLandmarks68) -> HeadPose {
        let (Some(nose), Some(left_eye), Some(right_eye)) = (
            landmarks.nose_tip(),
            landmarks.left_eye_outer(),
            landmarks.right_eye_outer(),
        ) else {
            return HeadPose::Unknown;
        };

        let dist_left = (nose.0 - left_eye.0).abs();
        let dist_right = (nose.0 - right_eye.0).abs();

        if dist_right < MIN_RIGHT_DISTANCE {
            return HeadPose::Center;
        }

        let ratio = dist_left / dist_right;
        log::trace!(
            "pose ratio (L/R): {ratio:.2} (high: {}, low: {})",
            self.ratio_high,
            self.ratio_low
        );

        if ratio > self.ratio_high {
            HeadPose::Left
        } else if ratio < self.ratio_low {
            HeadPose::Right
        } else {
            HeadPose::Center
        }
    }
}

impl Default for PoseEstimator {
    fn default() -> Self {
        Self::new(POSE_RATIO_THRESHOLD_HIGH, POSE_RATIO_THRESHOLD_LOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn landmarks(nose_x: f64) -> FaceLandmarks68 {
        FaceLandmarks68::from_anchors((nose_x, 420.0), (440.0, 350.0), (560.0, 350.0))
    }

    #[test]
    fn test_frontal_face_is_center() {
        // Nose midway between the eyes: ratio = 60/60 = 1.0.
        let est = PoseEstimator::default();
        assert_eq!(est.estimate(&landmarks(500.0)), HeadPose::Center);
    }

    #[test]
    fn test_nose_toward_right_eye_is_left_turn() {
        // dist_left = 110, dist_right = 10 → ratio 11.0 > 1.4.
        let est = PoseEstimator::default();
        assert_eq!(est.estimate(&landmarks(550.0)), HeadPose::Left);
    }

    #[test]
    fn test_nose_toward_left_eye_is_right_turn() {
        // dist_left = 10, dist_right = 110 → ratio ~0.09 < 0.7.
        let est = PoseEstimator::default();
        assert_eq!(est.estimate(&landmarks(450.0)), HeadPose::Right);
    }

    #[rstest]
    #[case(1.41, HeadPose::Left)]
    #[case(1.39, HeadPose::Center)]
    #[case(0.71, HeadPose::Center)]
    #[case(0.69, HeadPose::Right)]
    fn test_band_edges(#[case] target_ratio: f64, #[case] expected: HeadPose) {
        // Solve nose_x so that (nose_x - 440) / (560 - nose_x) = target_ratio.
        let nose_x = (440.0 + 560.0 * target_ratio) / (1.0 + target_ratio);
        let achieved = (nose_x - 440.0) / (560.0 - nose_x);
        assert_relative_eq!(achieved, target_ratio, epsilon = 1e-9);

        let est = PoseEstimator::default();
        assert_eq!(est.estimate(&landmarks(nose_x)), expected);
    }

    #[test]
    fn test_degenerate_right_distance_is_center() {
        // Nose almost on the right eye corner: dist_right < 1 px.
        let est = PoseEstimator::default();
        assert_eq!(est.estimate(&landmarks(559.5)), HeadPose::Center);
    }

    #[test]
    fn test_missing_anchor_is_unknown() {
        let est = PoseEstimator::default();
        let lm = FaceLandmarks68::from_anchors((0.0, 0.0), (440.0, 350.0), (560.0, 350.0));
        assert_eq!(est.estimate(&lm), HeadPose::Unknown);
    }

    #[test]
    fn test_custom_thresholds() {
        // Widen the center band so a mild turn still counts as center.
        let est = PoseEstimator::new(12.0, 0.05);
        assert_eq!(est.estimate(&landmarks(550.0)), HeadPose::Center);
    }
}
