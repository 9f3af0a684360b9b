//! Wall-clock driver for a liveness session.
//!
//! Single-threaded and cooperative: each loop iteration waits until the
//! earlier of the next poll tick or the next timer deadline, dispatches due
//! timers first, then runs at most one classification tick. The wait doubles
//! as the stop-signal receive, so an external hard stop lands deterministically
//! between ticks and every exit path releases the frame source.

use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use thiserror::Error;

use crate::capture::domain::capture_trigger::{CaptureError, CaptureTrigger, CapturedPhoto};
use crate::pose::domain::pose_classifier::PoseClassifier;
use crate::session::liveness_session::LivenessSession;
use crate::session::session_config::SessionConfig;
use crate::session::session_event::SessionEvent;
use crate::session::session_observer::SessionObserver;
use crate::session::session_state::SessionStatus;
use crate::video::domain::frame_source::FrameSource;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("video source stopped before the session completed")]
    SourceStopped,
    #[error("pose classification failed: {0}")]
    Classification(String),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Requests a hard stop of a running session from another thread.
#[derive(Clone)]
pub struct StopHandle {
    tx: Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.tx.try_send(());
    }
}

enum RunOutcome {
    Stopped,
    Idle,
    TimedOut,
    Captured(CapturedPhoto),
}

pub struct SessionRunner {
    session: LivenessSession,
    classifier: Box<dyn PoseClassifier>,
    capture: Box<dyn CaptureTrigger>,
    stop_rx: Receiver<()>,
    stop_disconnected: bool,
}

impl SessionRunner {
    pub fn new(
        config: SessionConfig,
        classifier: Box<dyn PoseClassifier>,
        capture: Box<dyn CaptureTrigger>,
    ) -> (Self, StopHandle) {
        let (tx, rx) = bounded(1);
        let runner = Self {
            session: LivenessSession::new(config),
            classifier,
            capture,
            stop_rx: rx,
            stop_disconnected: false,
        };
        (runner, StopHandle { tx })
    }

    /// Final session state after `run` returns.
    pub fn session(&self) -> &LivenessSession {
        &self.session
    }

    /// Drives the session to completion over `source`.
    ///
    /// Returns the captured photo on success, `Ok(None)` on timeout or an
    /// external stop, and an error when the source dies, classification
    /// fails hard, or the capture cannot be produced. The source is closed
    /// on every path.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        observer: &mut dyn SessionObserver,
    ) -> Result<Option<CapturedPhoto>, SessionError> {
        let now = Instant::now();
        let events = self.session.start(now);
        forward(&events, observer);
        let mut next_poll = now + self.session.config().check_interval;

        let outcome = loop {
            let now = Instant::now();
            // Classification is suspended during step transitions (a tick
            // there would be discarded anyway), so the transition timer
            // drives the wait instead of the poll cadence.
            let poll_target = if self.session.wants_polling()
                && !self.session.state().is_transitioning()
            {
                Some(next_poll)
            } else {
                None
            };
            let target = match (poll_target, self.session.next_timer_deadline()) {
                (Some(poll), Some(timer)) => poll.min(timer),
                (Some(poll), None) => poll,
                (None, Some(timer)) => timer,
                (None, None) => break RunOutcome::Idle,
            };

            if self.wait_for_stop(target.saturating_duration_since(now)) {
                break RunOutcome::Stopped;
            }

            let now = Instant::now();
            let timer_events = self.session.tick_timers(now);
            if let Some(outcome) = self.dispatch(timer_events, source, observer)? {
                break outcome;
            }

            // At most one classification tick per wakeup.
            if self.session.wants_polling()
                && !self.session.state().is_transitioning()
                && now >= next_poll
            {
                next_poll = now + self.session.config().check_interval;

                // A frame the source actually returned is always usable,
                // even if it was the stream's last.
                let frame = match source.current_frame() {
                    Ok(Some(frame)) => frame,
                    _ => {
                        log::warn!("video source stopped outside session control");
                        self.session.hard_stop();
                        source.close();
                        observer.session_ended(SessionStatus::Pending);
                        return Err(SessionError::SourceStopped);
                    }
                };

                let observation = match self.classifier.classify(&frame) {
                    Ok(observation) => observation,
                    Err(e) => {
                        let events = self.session.mark_failed();
                        forward(&events, observer);
                        source.close();
                        observer.session_ended(SessionStatus::Failed);
                        return Err(SessionError::Classification(e.to_string()));
                    }
                };

                let events = self.session.observe(now, observation);
                if let Some(outcome) = self.dispatch(events, source, observer)? {
                    break outcome;
                }
            }
        };

        match outcome {
            RunOutcome::Stopped => {
                log::info!("session stopped by host request");
                self.session.hard_stop();
                source.close();
                observer.session_ended(SessionStatus::Pending);
                Ok(None)
            }
            RunOutcome::Idle => {
                self.session.hard_stop();
                source.close();
                Ok(None)
            }
            RunOutcome::TimedOut => Ok(None),
            RunOutcome::Captured(photo) => Ok(Some(photo)),
        }
    }

    fn dispatch(
        &mut self,
        events: Vec<SessionEvent>,
        source: &mut dyn FrameSource,
        observer: &mut dyn SessionObserver,
    ) -> Result<Option<RunOutcome>, SessionError> {
        for event in events {
            match event {
                SessionEvent::StatusChanged { status, guidance } => {
                    observer.status_changed(status, &guidance);
                }
                SessionEvent::FeedbackFlash(visible) => observer.feedback_flash(visible),
                SessionEvent::TimedOut => {
                    source.close();
                    observer.session_ended(SessionStatus::Timeout);
                    return Ok(Some(RunOutcome::TimedOut));
                }
                SessionEvent::CaptureDue => {
                    let frame = match source.current_frame() {
                        Ok(Some(frame)) => Some(frame),
                        _ => None,
                    };
                    let result = match frame {
                        Some(frame) => self.capture.capture(&frame),
                        None => Err(CaptureError::NoFrame),
                    };
                    match result {
                        Ok(photo) => {
                            observer.photo_captured(&photo);
                            self.session.soft_stop();
                            source.close();
                            observer.session_ended(self.session.state().status());
                            return Ok(Some(RunOutcome::Captured(photo)));
                        }
                        Err(e) => {
                            let events = self.session.mark_failed();
                            forward(&events, observer);
                            source.close();
                            observer.session_ended(SessionStatus::Failed);
                            return Err(SessionError::Capture(e));
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    /// Waits up to `wait`, returning true if a stop was requested.
    fn wait_for_stop(&mut self, wait: Duration) -> bool {
        if self.stop_disconnected {
            std::thread::sleep(wait);
            return false;
        }
        match self.stop_rx.recv_timeout(wait) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                // All stop handles dropped; no stop can ever arrive.
                self.stop_disconnected = true;
                std::thread::sleep(wait);
                false
            }
        }
    }
}

fn forward(events: &[SessionEvent], observer: &mut dyn SessionObserver) {
    for event in events {
        match event {
            SessionEvent::StatusChanged { status, guidance } => {
                observer.status_changed(*status, guidance);
            }
            SessionEvent::FeedbackFlash(visible) => observer.feedback_flash(*visible),
            // Start/observe transitions never produce these.
            SessionEvent::TimedOut | SessionEvent::CaptureDue => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::domain::head_pose::HeadPose;
    use crate::pose::domain::pose_classifier::PoseObservation;
    use crate::pose::domain::pose_estimator::PoseEstimator;
    use crate::pose::infrastructure::landmark_pose_classifier::LandmarkPoseClassifier;
    use crate::pose::infrastructure::scripted_detector::ScriptedDetector;
    use crate::capture::infrastructure::jpeg_capture::JpegCaptureTrigger;
    use crate::session::session_state::PoseSequence;
    use crate::shared::frame::Frame;
    use crate::video::infrastructure::scripted_frame_source::ScriptedFrameSource;

    #[derive(Default)]
    struct RecordingObserver {
        statuses: Vec<SessionStatus>,
        photos: usize,
        flashes_on: usize,
        ended: Option<SessionStatus>,
    }

    impl SessionObserver for RecordingObserver {
        fn status_changed(&mut self, status: SessionStatus, _guidance: &str) {
            if self.statuses.last() != Some(&status) {
                self.statuses.push(status);
            }
        }
        fn feedback_flash(&mut self, visible: bool) {
            if visible {
                self.flashes_on += 1;
            }
        }
        fn photo_captured(&mut self, _photo: &CapturedPhoto) {
            self.photos += 1;
        }
        fn session_ended(&mut self, final_status: SessionStatus) {
            self.ended = Some(final_status);
        }
    }

    fn fast_config() -> SessionConfig {
        SessionConfig {
            sequence: PoseSequence::default(),
            check_interval: Duration::from_millis(5),
            sequence_timeout: Duration::from_millis(500),
            capture_delay: Duration::from_millis(20),
            feedback_duration: Duration::from_millis(10),
            hold_checks: 2,
            transition_delay: Duration::from_millis(10),
        }
    }

    fn classifier_for(script: Vec<PoseObservation>) -> Box<dyn PoseClassifier> {
        Box::new(LandmarkPoseClassifier::new(
            Box::new(ScriptedDetector::new(script)),
            PoseEstimator::default(),
        ))
    }

    fn happy_script() -> Vec<PoseObservation> {
        vec![
            PoseObservation::Face(HeadPose::Center),
            PoseObservation::Face(HeadPose::Center),
            PoseObservation::Face(HeadPose::Left),
            PoseObservation::Face(HeadPose::Left),
            PoseObservation::Face(HeadPose::Right),
            PoseObservation::Face(HeadPose::Right),
            PoseObservation::Face(HeadPose::Center),
            PoseObservation::Face(HeadPose::Center),
        ]
    }

    #[test]
    fn test_full_session_captures_exactly_one_photo() {
        let (mut runner, _stop) = SessionRunner::new(
            fast_config(),
            classifier_for(happy_script()),
            Box::new(JpegCaptureTrigger::default()),
        );
        let mut source = ScriptedFrameSource::unlimited(64, 48);
        let mut observer = RecordingObserver::default();

        let photo = runner.run(&mut source, &mut observer).unwrap().unwrap();
        assert_eq!((photo.width, photo.height), (64, 48));
        assert!(image::load_from_memory(&photo.data).is_ok());

        assert_eq!(observer.photos, 1);
        assert_eq!(observer.flashes_on, 4); // one per completed step
        assert!(observer.statuses.contains(&SessionStatus::HoldStill));
        assert_eq!(observer.statuses.last(), Some(&SessionStatus::Capturing));
        assert_eq!(observer.ended, Some(SessionStatus::Capturing));
        assert!(source.is_closed());
    }

    #[test]
    fn test_no_face_forever_times_out() {
        let config = SessionConfig {
            sequence_timeout: Duration::from_millis(60),
            ..fast_config()
        };
        let (mut runner, _stop) = SessionRunner::new(
            config,
            classifier_for(Vec::new()), // empty script: NoFace forever
            Box::new(JpegCaptureTrigger::default()),
        );
        let mut source = ScriptedFrameSource::unlimited(64, 48);
        let mut observer = RecordingObserver::default();

        let result = runner.run(&mut source, &mut observer).unwrap();
        assert!(result.is_none());
        assert_eq!(runner.session().state().status(), SessionStatus::Timeout);
        assert_eq!(observer.ended, Some(SessionStatus::Timeout));
        assert_eq!(observer.photos, 0);
        assert!(source.is_closed());
    }

    #[test]
    fn test_stop_handle_hard_stops_mid_session() {
        let (mut runner, stop) = SessionRunner::new(
            fast_config(),
            classifier_for(Vec::new()),
            Box::new(JpegCaptureTrigger::default()),
        );
        let mut source = ScriptedFrameSource::unlimited(64, 48);
        let mut observer = RecordingObserver::default();

        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            stop.stop();
        });

        let result = runner.run(&mut source, &mut observer).unwrap();
        stopper.join().unwrap();

        assert!(result.is_none());
        assert_eq!(runner.session().state().status(), SessionStatus::Pending);
        assert_eq!(runner.session().state().current_step(), 0);
        assert_eq!(observer.ended, Some(SessionStatus::Pending));
        assert!(source.is_closed());
    }

    #[test]
    fn test_source_loss_is_a_hard_error() {
        let config = SessionConfig {
            hold_checks: 100, // never completes
            ..fast_config()
        };
        let (mut runner, _stop) = SessionRunner::new(
            config,
            classifier_for(vec![PoseObservation::Face(HeadPose::Center)]),
            Box::new(JpegCaptureTrigger::default()),
        );
        let mut source = ScriptedFrameSource::new(64, 48, 3);
        let mut observer = RecordingObserver::default();

        let err = runner.run(&mut source, &mut observer).unwrap_err();
        assert!(matches!(err, SessionError::SourceStopped));
        assert_eq!(runner.session().state().status(), SessionStatus::Pending);
        assert!(source.is_closed());
    }

    #[test]
    fn test_bounded_source_classifies_every_served_frame() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        use crate::session::session_observer::NullSessionObserver;

        struct CountingClassifier(Arc<AtomicUsize>);
        impl PoseClassifier for CountingClassifier {
            fn classify(
                &mut self,
                _frame: &Frame,
            ) -> Result<PoseObservation, Box<dyn std::error::Error>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(PoseObservation::NoFace)
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let (mut runner, _stop) = SessionRunner::new(
            fast_config(),
            Box::new(CountingClassifier(Arc::clone(&calls))),
            Box::new(JpegCaptureTrigger::default()),
        );
        let mut source = ScriptedFrameSource::new(64, 48, 3);
        let mut observer = NullSessionObserver;

        let err = runner.run(&mut source, &mut observer).unwrap_err();
        assert!(matches!(err, SessionError::SourceStopped));
        // The final served frame still reaches the classifier.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(source.is_closed());
    }

    #[test]
    fn test_capture_failure_ends_in_failed_status() {
        struct FailingCapture;
        impl CaptureTrigger for FailingCapture {
            fn capture(&mut self, _frame: &Frame) -> Result<CapturedPhoto, CaptureError> {
                Err(CaptureError::Encode("no drawing surface".to_string()))
            }
        }

        let (mut runner, _stop) = SessionRunner::new(
            fast_config(),
            classifier_for(happy_script()),
            Box::new(FailingCapture),
        );
        let mut source = ScriptedFrameSource::unlimited(64, 48);
        let mut observer = RecordingObserver::default();

        let err = runner.run(&mut source, &mut observer).unwrap_err();
        assert!(matches!(err, SessionError::Capture(_)));
        assert_eq!(runner.session().state().status(), SessionStatus::Failed);
        assert!(!runner.session().state().is_capture_pending());
        assert_eq!(observer.ended, Some(SessionStatus::Failed));
        assert!(source.is_closed());
    }

    #[test]
    fn test_classifier_error_ends_in_failed_status() {
        struct BrokenClassifier;
        impl PoseClassifier for BrokenClassifier {
            fn classify(
                &mut self,
                _frame: &Frame,
            ) -> Result<PoseObservation, Box<dyn std::error::Error>> {
                Err("model exploded".into())
            }
        }

        let (mut runner, _stop) = SessionRunner::new(
            fast_config(),
            Box::new(BrokenClassifier),
            Box::new(JpegCaptureTrigger::default()),
        );
        let mut source = ScriptedFrameSource::unlimited(64, 48);
        let mut observer = RecordingObserver::default();

        let err = runner.run(&mut source, &mut observer).unwrap_err();
        assert!(matches!(err, SessionError::Classification(_)));
        assert_eq!(runner.session().state().status(), SessionStatus::Failed);
    }
}
