//! Face detector that replays a fixed script of observations.
//!
//! Stands in for a live model when exercising the session end to end (CLI
//! demos, tests). Each call consumes one script entry; after the script is
//! exhausted the final entry repeats, so a trailing `NoFace` simulates a
//! subject who walked away and a trailing pose simulates one who froze.

use crate::pose::domain::face_detector::{BoundingBox, FaceDetection, FaceDetector};
use crate::pose::domain::face_landmarks::FaceLandmarks68;
use crate::pose::domain::head_pose::HeadPose;
use crate::pose::domain::pose_classifier::PoseObservation;
use crate::shared::constants::FACE_DETECTOR_CONFIDENCE;
use crate::shared::frame::Frame;

/// Eye anchors used for synthesized geometry.
const LEFT_EYE: (f64, f64) = (440.0, 350.0);
const RIGHT_EYE: (f64, f64) = (560.0, 350.0);

/// Score attached to every synthesized detection.
const SYNTHETIC_SCORE: f32 = 0.92;

pub struct ScriptedDetector {
    script: Vec<PoseObservation>,
    cursor: usize,
    min_confidence: f32,
}

impl ScriptedDetector {
    pub fn new(script: Vec<PoseObservation>) -> Self {
        Self::with_min_confidence(script, FACE_DETECTOR_CONFIDENCE)
    }

    /// Detections scoring below `min_confidence` are dropped, the way a
    /// live model applies its confidence option.
    pub fn with_min_confidence(script: Vec<PoseObservation>, min_confidence: f32) -> Self {
        Self {
            script,
            cursor: 0,
            min_confidence,
        }
    }

    fn synthesize(pose: HeadPose) -> FaceDetection {
        // Nose positions chosen to land the L/R ratio well inside each band.
        let landmarks = match pose {
            HeadPose::Center => Some(FaceLandmarks68::from_anchors(
                (500.0, 420.0),
                LEFT_EYE,
                RIGHT_EYE,
            )),
            HeadPose::Left => Some(FaceLandmarks68::from_anchors(
                (550.0, 420.0),
                LEFT_EYE,
                RIGHT_EYE,
            )),
            HeadPose::Right => Some(FaceLandmarks68::from_anchors(
                (450.0, 420.0),
                LEFT_EYE,
                RIGHT_EYE,
            )),
            HeadPose::Unknown => Some(FaceLandmarks68::from_anchors(
                (0.0, 0.0),
                LEFT_EYE,
                RIGHT_EYE,
            )),
        };
        FaceDetection {
            bounding_box: BoundingBox {
                x: 400.0,
                y: 300.0,
                width: 220.0,
                height: 260.0,
            },
            score: SYNTHETIC_SCORE,
            landmarks,
            age: None,
            gender: None,
        }
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        let entry = if self.script.is_empty() {
            PoseObservation::NoFace
        } else {
            let i = self.cursor.min(self.script.len() - 1);
            self.cursor += 1;
            self.script[i]
        };
        let mut detections = match entry {
            PoseObservation::NoFace => Vec::new(),
            PoseObservation::Face(pose) => vec![Self::synthesize(pose)],
        };
        detections.retain(|d| d.score >= self.min_confidence);
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::domain::pose_classifier::PoseClassifier;
    use crate::pose::domain::pose_estimator::PoseEstimator;
    use crate::pose::infrastructure::landmark_pose_classifier::LandmarkPoseClassifier;

    fn frame() -> Frame {
        Frame::filled(4, 4, [0, 0, 0], 0)
    }

    #[test]
    fn test_replays_script_in_order_through_classifier() {
        let detector = ScriptedDetector::new(vec![
            PoseObservation::Face(HeadPose::Center),
            PoseObservation::NoFace,
            PoseObservation::Face(HeadPose::Left),
        ]);
        let mut classifier =
            LandmarkPoseClassifier::new(Box::new(detector), PoseEstimator::default());

        assert_eq!(
            classifier.classify(&frame()).unwrap(),
            PoseObservation::Face(HeadPose::Center)
        );
        assert_eq!(classifier.classify(&frame()).unwrap(), PoseObservation::NoFace);
        assert_eq!(
            classifier.classify(&frame()).unwrap(),
            PoseObservation::Face(HeadPose::Left)
        );
    }

    #[test]
    fn test_final_entry_repeats_after_exhaustion() {
        let mut detector = ScriptedDetector::new(vec![PoseObservation::Face(HeadPose::Right)]);
        for _ in 0..3 {
            assert_eq!(detector.detect(&frame()).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_confidence_threshold_drops_low_scoring_faces() {
        let script = vec![PoseObservation::Face(HeadPose::Center)];
        let mut strict = ScriptedDetector::with_min_confidence(script.clone(), 0.99);
        assert!(strict.detect(&frame()).unwrap().is_empty());

        let mut lenient = ScriptedDetector::with_min_confidence(script, 0.5);
        assert_eq!(lenient.detect(&frame()).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_script_reports_no_face() {
        let mut detector = ScriptedDetector::new(Vec::new());
        assert!(detector.detect(&frame()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_pose_synthesizes_missing_nose() {
        let detector = ScriptedDetector::new(vec![PoseObservation::Face(HeadPose::Unknown)]);
        let mut classifier =
            LandmarkPoseClassifier::new(Box::new(detector), PoseEstimator::default());
        assert_eq!(
            classifier.classify(&frame()).unwrap(),
            PoseObservation::Face(HeadPose::Unknown)
        );
    }
}
