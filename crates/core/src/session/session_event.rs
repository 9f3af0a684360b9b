use crate::session::session_state::SessionStatus;

/// Outbound host notifications emitted by session transitions.
///
/// The state machine returns these instead of calling the host directly,
/// keeping it I/O-free; the runner forwards them to a `SessionObserver`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Status and/or guidance changed. Emitted once per meaningful change,
    /// never repeated for an identical pair.
    StatusChanged {
        status: SessionStatus,
        guidance: String,
    },
    /// Success flash turned on (step advanced) or off (flash timer fired).
    FeedbackFlash(bool),
    /// The capture delay elapsed; the driver must produce the photo now.
    /// Emitted at most once per session lifetime.
    CaptureDue,
    /// The whole-sequence deadline elapsed.
    TimedOut,
}
