use std::fmt;

use thiserror::Error;

use crate::pose::domain::head_pose::HeadPose;

/// Status of one liveness attempt. Exactly one value at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Session not yet started.
    Pending,
    /// Polling frames, waiting for the current pose to be held.
    Checking,
    /// Pause between a completed step and the next one becoming active.
    Transitioning,
    /// Sequence complete; subject holds position through the capture delay.
    HoldStill,
    /// The still photo is being produced.
    Capturing,
    /// Guard value for completed liveness; normal flow supersedes it with
    /// `HoldStill` → `Capturing` but it participates in the near-terminal
    /// guard set.
    Confirmed,
    /// Hard detection or capture error.
    Failed,
    /// The whole-sequence deadline elapsed.
    Timeout,
}

impl SessionStatus {
    /// Statuses past the point of no return for the current attempt:
    /// starting and the sequence timeout are both blocked here.
    pub fn is_near_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::HoldStill | SessionStatus::Capturing | SessionStatus::Confirmed
        )
    }

    /// Statuses recoverable only via an explicit hard restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Failed | SessionStatus::Timeout)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Pending => "Pending",
            SessionStatus::Checking => "Checking",
            SessionStatus::Transitioning => "Transitioning",
            SessionStatus::HoldStill => "HoldStill",
            SessionStatus::Capturing => "Capturing",
            SessionStatus::Confirmed => "Confirmed",
            SessionStatus::Failed => "Failed",
            SessionStatus::Timeout => "Timeout",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequenceError {
    #[error("pose sequence must not be empty")]
    Empty,
    #[error("pose sequence must not contain Unknown")]
    ContainsUnknown,
}

/// Ordered, fixed series of required poses. Immutable for the lifetime of
/// a session; never empty, never contains `Unknown`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoseSequence(Vec<HeadPose>);

impl PoseSequence {
    pub fn new(poses: Vec<HeadPose>) -> Result<Self, SequenceError> {
        if poses.is_empty() {
            return Err(SequenceError::Empty);
        }
        if poses.contains(&HeadPose::Unknown) {
            return Err(SequenceError::ContainsUnknown);
        }
        Ok(Self(poses))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The required pose for a step, or `None` past the end.
    pub fn step(&self, index: usize) -> Option<HeadPose> {
        self.0.get(index).copied()
    }

    pub fn poses(&self) -> &[HeadPose] {
        &self.0
    }
}

impl Default for PoseSequence {
    fn default() -> Self {
        Self(crate::shared::constants::DEFAULT_POSE_SEQUENCE.to_vec())
    }
}

/// The single source of truth for one liveness attempt.
///
/// Mutated only by the session's transition methods; hosts render a
/// read-only projection.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub(crate) status: SessionStatus,
    pub(crate) current_step: usize,
    pub(crate) hold_counter: u32,
    pub(crate) guidance: String,
    pub(crate) is_transitioning: bool,
    pub(crate) is_capture_pending: bool,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Index of the active step; equal to the sequence length once the
    /// sequence is complete.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Consecutive matching-pose ticks observed for the current step.
    pub fn hold_counter(&self) -> u32 {
        self.hold_counter
    }

    /// Human-readable instruction for the subject.
    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    pub fn is_capture_pending(&self) -> bool {
        self.is_capture_pending
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Pending,
            current_step: 0,
            hold_counter: 0,
            guidance: String::new(),
            is_transitioning: false,
            is_capture_pending: false,
        }
    }
}
