use crate::pose::domain::face_detector::FaceDetector;
use crate::pose::domain::pose_classifier::{PoseClassifier, PoseObservation};
use crate::pose::domain::pose_estimator::PoseEstimator;
use crate::shared::frame::Frame;

/// Pose classifier backed by a face detector and ratio-based estimation.
///
/// Best face → landmarks → pose. A face without landmarks classifies as
/// `NoFace`: the session cannot judge a pose it cannot measure.
pub struct LandmarkPoseClassifier {
    detector: Box<dyn FaceDetector>,
    estimator: PoseEstimator,
}

impl LandmarkPoseClassifier {
    pub fn new(detector: Box<dyn FaceDetector>, estimator: PoseEstimator) -> Self {
        Self {
            detector,
            estimator,
        }
    }
}

impl PoseClassifier for LandmarkPoseClassifier {
    fn classify(&mut self, frame: &Frame) -> Result<PoseObservation, Box<dyn std::error::Error>> {
        let Some(detection) = self.detector.detect_best(frame)? else {
            return Ok(PoseObservation::NoFace);
        };
        let Some(landmarks) = detection.landmarks else {
            return Ok(PoseObservation::NoFace);
        };
        Ok(PoseObservation::Face(self.estimator.estimate(&landmarks)))
    }
}
