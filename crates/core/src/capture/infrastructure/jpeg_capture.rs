use std::io::Cursor;

use crate::capture::domain::capture_trigger::{CaptureError, CaptureTrigger, CapturedPhoto};
use crate::shared::frame::Frame;

const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encodes the current frame to JPEG in memory using the `image` crate.
///
/// The photo is handed to the host rather than written to disk; persisting
/// it is the caller's concern.
pub struct JpegCaptureTrigger {
    quality: u8,
}

impl JpegCaptureTrigger {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

impl Default for JpegCaptureTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl CaptureTrigger for JpegCaptureTrigger {
    fn capture(&mut self, frame: &Frame) -> Result<CapturedPhoto, CaptureError> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or(CaptureError::NoFrame)?;

        let mut buf = Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.quality);
        img.write_with_encoder(encoder)
            .map_err(|e| CaptureError::Encode(e.to_string()))?;

        log::debug!(
            "captured {}x{} frame as JPEG ({} bytes)",
            frame.width(),
            frame.height(),
            buf.get_ref().len()
        );

        Ok(CapturedPhoto {
            data: buf.into_inner(),
            format: "jpeg",
            width: frame.width(),
            height: frame.height(),
        })
    }
}
