use crate::pose::domain::face_landmarks::FaceLandmarks68;
use crate::shared::frame::Frame;

/// Axis-aligned face bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

/// One detected face. Landmarks, age, and gender are detector capabilities
/// the session passes through untouched.
#[derive(Clone, Debug)]
pub struct FaceDetection {
    pub bounding_box: BoundingBox,
    /// Detector confidence in `[0, 1]`.
    pub score: f32,
    pub landmarks: Option<FaceLandmarks68>,
    pub age: Option<f32>,
    pub gender: Option<Gender>,
}

/// Domain interface for face detection.
///
/// Implementations may be stateful (e.g., tracking across frames),
/// hence `&mut self`.
pub trait FaceDetector: Send {
    /// All faces in the frame above the detector's confidence threshold.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>>;

    /// The single best face, or `None` when the frame has no face.
    ///
    /// Default: highest-area detection from `detect`.
    fn detect_best(
        &mut self,
        frame: &Frame,
    ) -> Result<Option<FaceDetection>, Box<dyn std::error::Error>> {
        let detections = self.detect(frame)?;
        Ok(detections.into_iter().max_by(|a, b| {
            let area_a = a.bounding_box.width * a.bounding_box.height;
            let area_b = b.bounding_box.width * b.bounding_box.height;
            area_a.total_cmp(&area_b)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoFaceDetector;

    impl FaceDetector for TwoFaceDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
            let small = FaceDetection {
                bounding_box: BoundingBox {
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                },
                score: 0.97,
                landmarks: None,
                age: Some(25.0),
                gender: Some(Gender::Female),
            };
            let large = FaceDetection {
                bounding_box: BoundingBox {
                    x: 50.0,
                    y: 50.0,
                    width: 100.0,
                    height: 120.0,
                },
                score: 0.81,
                landmarks: None,
                age: None,
                gender: None,
            };
            Ok(vec![small, large])
        }
    }

    #[test]
    fn test_detect_best_picks_largest_face() {
        let mut detector = TwoFaceDetector;
        let frame = Frame::filled(4, 4, [0, 0, 0], 0);
        let best = detector.detect_best(&frame).unwrap().unwrap();
        assert_eq!(best.bounding_box.width, 100.0);
    }
}
