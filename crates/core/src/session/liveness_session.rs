//! The liveness challenge-response state machine.
//!
//! Turns a noisy per-frame pose classifier into a time-bounded,
//! auto-advancing multi-step protocol: each required pose must be held for
//! `hold_checks` consecutive ticks, steps are separated by a short
//! transition pause, the whole sequence runs against a deadline, and
//! completion arms a one-shot capture delay.
//!
//! All mutation funnels through the methods here; every method takes the
//! current instant explicitly, so the machine is deterministic under test
//! and a long-lived driver callback can never act on a stale status.

use std::time::Instant;

use crate::pose::domain::pose_classifier::PoseObservation;
use crate::session::session_config::SessionConfig;
use crate::session::session_event::SessionEvent;
use crate::session::session_state::{SessionState, SessionStatus};
use crate::session::timer_set::{TimerKind, TimerSet};

pub struct LivenessSession {
    config: SessionConfig,
    state: SessionState,
    timers: TimerSet,
    capture_fired: bool,
}

impl LivenessSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::default(),
            timers: TimerSet::new(),
            capture_fired: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Earliest armed timer deadline; feeds the driver's wait.
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Whether classification ticks should keep running. False once the
    /// sequence is complete, a capture is pending, or a terminal status is
    /// reached, so the poll loop self-cancels without an external stop.
    pub fn wants_polling(&self) -> bool {
        matches!(
            self.state.status,
            SessionStatus::Checking | SessionStatus::Transitioning
        ) && !self.state.is_capture_pending
            && self.state.current_step < self.config.sequence.len()
    }

    /// Begins (or restarts) the challenge once the stream is playable.
    ///
    /// Ignored from near-terminal statuses (a capture is already underway)
    /// and from terminal ones (those require an explicit hard stop first).
    pub fn start(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state.status.is_near_terminal() || self.state.status.is_terminal() {
            log::debug!("session start ignored in status {}", self.state.status);
            return events;
        }

        self.state.current_step = 0;
        self.state.hold_counter = 0;
        self.state.is_transitioning = false;
        self.state.is_capture_pending = false;
        self.state.status = SessionStatus::Checking;
        self.state.guidance = self.step_guidance(0);
        self.timers.schedule(
            TimerKind::SequenceTimeout,
            now + self.config.sequence_timeout,
        );

        log::info!(
            "liveness session started: {} steps, {:?} deadline",
            self.config.sequence.len(),
            self.config.sequence_timeout
        );
        self.push_status(&mut events);
        events
    }

    /// One classification tick.
    ///
    /// Exits without mutating anything unless the session is actively
    /// checking: frames arriving during a step transition, after sequence
    /// completion, or once a capture is pending are ignored outright.
    pub fn observe(&mut self, now: Instant, observation: PoseObservation) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state.status != SessionStatus::Checking
            || self.state.is_transitioning
            || self.state.is_capture_pending
        {
            log::trace!("classification tick ignored in status {}", self.state.status);
            return events;
        }
        let Some(required) = self.config.sequence.step(self.state.current_step) else {
            return events;
        };

        match observation {
            PoseObservation::NoFace => {
                self.state.hold_counter = 0;
                let guidance = self.no_face_guidance(self.state.current_step);
                self.update_guidance(guidance, &mut events);
            }
            PoseObservation::Face(pose) if pose == required => {
                self.state.hold_counter += 1;
                log::debug!(
                    "pose {} held {}/{} ticks",
                    required,
                    self.state.hold_counter,
                    self.config.hold_checks
                );
                if self.state.hold_counter >= self.config.hold_checks {
                    self.advance_step(now, &mut events);
                }
            }
            PoseObservation::Face(pose) => {
                log::trace!("pose mismatch: saw {pose}, need {required}");
                self.state.hold_counter = 0;
                let guidance = self.step_guidance(self.state.current_step);
                self.update_guidance(guidance, &mut events);
            }
        }
        events
    }

    /// Dispatches every timer due at `now`.
    pub fn tick_timers(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for kind in self.timers.due(now) {
            match kind {
                TimerKind::SequenceTimeout => self.on_sequence_timeout(&mut events),
                TimerKind::StepTransition => self.on_step_transition(&mut events),
                TimerKind::CaptureDelay => self.on_capture_delay(&mut events),
                TimerKind::FeedbackFlash => events.push(SessionEvent::FeedbackFlash(false)),
            }
        }
        events
    }

    /// Capture (or hard detection) error: terminal `Failed`, capture flag
    /// cleared so a hard restart can retry.
    pub fn mark_failed(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        self.timers.cancel_all();
        self.state.status = SessionStatus::Failed;
        self.state.guidance = "Liveness check failed.".to_string();
        self.state.is_capture_pending = false;
        self.state.is_transitioning = false;
        log::warn!("liveness session failed");
        self.push_status(&mut events);
        events
    }

    /// Full teardown: cancels all four timer kinds and resets every field
    /// to its initial value. The only path that clears a pending capture.
    pub fn hard_stop(&mut self) {
        log::info!("hard stop: resetting session state");
        self.timers.cancel_all();
        self.state = SessionState::default();
        self.capture_fired = false;
    }

    /// Timer teardown without a field reset, used on successful completion
    /// when the host moves on to a different view.
    pub fn soft_stop(&mut self) {
        log::info!("soft stop: cancelling timers");
        self.timers.cancel_all();
    }

    fn advance_step(&mut self, now: Instant, events: &mut Vec<SessionEvent>) {
        self.state.hold_counter = 0;
        events.push(SessionEvent::FeedbackFlash(true));
        self.timers.schedule(
            TimerKind::FeedbackFlash,
            now + self.config.feedback_duration,
        );
        self.state.current_step += 1;
        log::info!(
            "step {}/{} complete",
            self.state.current_step,
            self.config.sequence.len()
        );

        if self.state.current_step >= self.config.sequence.len() {
            self.timers.cancel(TimerKind::SequenceTimeout);
            self.state.is_capture_pending = true;
            self.state.status = SessionStatus::HoldStill;
            self.state.guidance = "Liveness Confirmed! Hold Still...".to_string();
            self.timers
                .schedule(TimerKind::CaptureDelay, now + self.config.capture_delay);
            self.push_status(events);
        } else {
            self.state.status = SessionStatus::Transitioning;
            self.state.is_transitioning = true;
            self.state.guidance = "Great!".to_string();
            self.timers.schedule(
                TimerKind::StepTransition,
                now + self.config.transition_delay,
            );
            self.push_status(events);
        }
    }

    fn on_sequence_timeout(&mut self, events: &mut Vec<SessionEvent>) {
        // The deadline only counts while the sequence is still in progress.
        if !matches!(
            self.state.status,
            SessionStatus::Checking | SessionStatus::Transitioning
        ) {
            return;
        }
        log::warn!("liveness check timed out");
        self.timers.cancel(TimerKind::StepTransition);
        self.state.status = SessionStatus::Timeout;
        self.state.guidance = "Liveness check timed out. Please try again.".to_string();
        self.state.is_transitioning = false;
        self.push_status(events);
        events.push(SessionEvent::TimedOut);
    }

    fn on_step_transition(&mut self, events: &mut Vec<SessionEvent>) {
        if self.state.status != SessionStatus::Transitioning {
            return;
        }
        self.state.is_transitioning = false;
        self.state.status = SessionStatus::Checking;
        self.state.guidance = self.step_guidance(self.state.current_step);
        self.push_status(events);
    }

    fn on_capture_delay(&mut self, events: &mut Vec<SessionEvent>) {
        if !self.state.is_capture_pending || self.capture_fired {
            return;
        }
        self.capture_fired = true;
        self.state.status = SessionStatus::Capturing;
        self.state.guidance = "Capturing photo...".to_string();
        self.push_status(events);
        events.push(SessionEvent::CaptureDue);
    }

    fn step_guidance(&self, step: usize) -> String {
        match self.config.sequence.step(step) {
            Some(pose) => format!(
                "({}/{}) Please look {}",
                step + 1,
                self.config.sequence.len(),
                pose.guidance_label()
            ),
            None => "Sequence complete".to_string(),
        }
    }

    fn no_face_guidance(&self, step: usize) -> String {
        match self.config.sequence.step(step) {
            Some(pose) => format!(
                "({}/{}) No face detected. Please look {}",
                step + 1,
                self.config.sequence.len(),
                pose.guidance_label()
            ),
            None => "Sequence complete".to_string(),
        }
    }

    fn update_guidance(&mut self, guidance: String, events: &mut Vec<SessionEvent>) {
        if self.state.guidance != guidance {
            self.state.guidance = guidance;
            self.push_status(events);
        }
    }

    fn push_status(&self, events: &mut Vec<SessionEvent>) {
        events.push(SessionEvent::StatusChanged {
            status: self.state.status,
            guidance: self.state.guidance.clone(),
        });
    }
}
