use crate::pose::domain::head_pose::HeadPose;
use crate::shared::frame::Frame;

/// What one classification tick saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseObservation {
    /// No face in the frame.
    NoFace,
    /// A face with the given estimated pose (possibly `Unknown`).
    Face(HeadPose),
}

/// Domain interface for per-frame pose classification.
///
/// The session polls this on a fixed interval; implementations are expected
/// to be noisy near threshold boundaries and are debounced upstream.
pub trait PoseClassifier: Send {
    fn classify(&mut self, frame: &Frame) -> Result<PoseObservation, Box<dyn std::error::Error>>;
}
