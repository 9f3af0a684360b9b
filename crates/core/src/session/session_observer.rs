use crate::capture::domain::capture_trigger::CapturedPhoto;
use crate::session::session_state::SessionStatus;

/// Host-facing notification sink for session progress.
///
/// Decouples the session driver from specific surfaces (CLI text, GUI
/// signals) so each host can render status and feedback without changing
/// the control logic.
pub trait SessionObserver: Send {
    /// A meaningful `(status, guidance)` transition occurred.
    fn status_changed(&mut self, status: SessionStatus, guidance: &str);

    /// Success flash toggled on/off.
    fn feedback_flash(&mut self, visible: bool);

    /// The encoded photo, emitted exactly once at successful completion.
    fn photo_captured(&mut self, photo: &CapturedPhoto);

    /// The session finished (any exit path). Default: no-op.
    fn session_ended(&mut self, _final_status: SessionStatus) {}
}

/// Silent observer that discards all notifications. Used by tests where
/// host output is irrelevant.
pub struct NullSessionObserver;

impl SessionObserver for NullSessionObserver {
    fn status_changed(&mut self, _status: SessionStatus, _guidance: &str) {}
    fn feedback_flash(&mut self, _visible: bool) {}
    fn photo_captured(&mut self, _photo: &CapturedPhoto) {}
}

/// Observer that reports progress through the `log` crate.
pub struct LogSessionObserver;

impl SessionObserver for LogSessionObserver {
    fn status_changed(&mut self, status: SessionStatus, guidance: &str) {
        log::info!("[{status}] {guidance}");
    }

    fn feedback_flash(&mut self, visible: bool) {
        log::debug!("success flash: {}", if visible { "on" } else { "off" });
    }

    fn photo_captured(&mut self, photo: &CapturedPhoto) {
        log::info!(
            "photo captured: {}x{} {} ({} bytes)",
            photo.width,
            photo.height,
            photo.format,
            photo.data.len()
        );
    }

    fn session_ended(&mut self, final_status: SessionStatus) {
        log::info!("session ended in status {final_status}");
    }
}
