use crate::shared::frame::Frame;

/// Live frame-producing boundary (camera stream, video element).
///
/// The session samples the most recent frame rather than draining a file,
/// and must tolerate the source stopping outside its control (device lost,
/// tab backgrounded). Exactly one active source per session; every exit
/// path calls `close`.
pub trait FrameSource: Send {
    /// The most recent frame, or `None` once the source has ended.
    fn current_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Whether the source is still producing frames.
    fn is_live(&self) -> bool;

    /// Native frame dimensions `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Releases the underlying device/stream.
    fn close(&mut self);
}
