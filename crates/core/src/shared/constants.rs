use std::time::Duration;

use crate::pose::domain::head_pose::HeadPose;

/// Default challenge sequence the subject must perform, in order.
pub const DEFAULT_POSE_SEQUENCE: &[HeadPose] = &[
    HeadPose::Center,
    HeadPose::Left,
    HeadPose::Right,
    HeadPose::Center,
];

/// L/R nose-to-eye ratio above which the head counts as turned left.
pub const POSE_RATIO_THRESHOLD_HIGH: f64 = 1.4;

/// L/R nose-to-eye ratio below which the head counts as turned right.
pub const POSE_RATIO_THRESHOLD_LOW: f64 = 0.7;

/// Interval between classification ticks.
pub const POSE_CHECK_INTERVAL: Duration = Duration::from_millis(300);

/// Whole-sequence deadline.
pub const SEQUENCE_TIMEOUT: Duration = Duration::from_secs(20);

/// Hold-still pause between sequence completion and photo capture.
pub const CAPTURE_DELAY: Duration = Duration::from_millis(750);

/// How long the success-feedback flash stays visible.
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(400);

/// Consecutive matching ticks required before a step completes.
pub const POSE_HOLD_CHECKS: u32 = 2;

/// Pause between a completed step and the next step becoming active.
pub const STEP_TRANSITION_DELAY: Duration = Duration::from_millis(600);

/// Minimum face-detector confidence for a detection to count.
pub const FACE_DETECTOR_CONFIDENCE: f32 = 0.6;
