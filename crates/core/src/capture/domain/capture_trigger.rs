use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no frame available from the video source")]
    NoFrame,
    #[error("failed to encode captured frame: {0}")]
    Encode(String),
}

/// A still photo produced at sequence completion.
#[derive(Clone, Debug)]
pub struct CapturedPhoto {
    pub data: Vec<u8>,
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Renders the current video frame into an encoded still image at the
/// frame's native resolution. Fired exactly once per session, by the
/// capture-delay timer.
pub trait CaptureTrigger: Send {
    fn capture(&mut self, frame: &Frame) -> Result<CapturedPhoto, CaptureError>;
}
