use std::time::Duration;

use crate::session::session_state::PoseSequence;
use crate::shared::constants::{
    CAPTURE_DELAY, FEEDBACK_DURATION, POSE_CHECK_INTERVAL, POSE_HOLD_CHECKS, SEQUENCE_TIMEOUT,
    STEP_TRANSITION_DELAY,
};

/// Host-tunable session timing and sequencing.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// The challenge sequence the subject must perform.
    pub sequence: PoseSequence,
    /// Interval between classification ticks.
    pub check_interval: Duration,
    /// Whole-sequence deadline.
    pub sequence_timeout: Duration,
    /// Hold-still pause before the photo is taken.
    pub capture_delay: Duration,
    /// How long the success flash stays visible.
    pub feedback_duration: Duration,
    /// Consecutive matching ticks required per step.
    pub hold_checks: u32,
    /// Pause between a completed step and the next one.
    pub transition_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sequence: PoseSequence::default(),
            check_interval: POSE_CHECK_INTERVAL,
            sequence_timeout: SEQUENCE_TIMEOUT,
            capture_delay: CAPTURE_DELAY,
            feedback_duration: FEEDBACK_DURATION,
            hold_checks: POSE_HOLD_CHECKS,
            transition_delay: STEP_TRANSITION_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuned_constants() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.sequence.len(), 4);
        assert_eq!(cfg.check_interval, Duration::from_millis(300));
        assert_eq!(cfg.sequence_timeout, Duration::from_secs(20));
        assert_eq!(cfg.capture_delay, Duration::from_millis(750));
        assert_eq!(cfg.feedback_duration, Duration::from_millis(400));
        assert_eq!(cfg.hold_checks, 2);
        assert_eq!(cfg.transition_delay, Duration::from_millis(600));
    }
}
