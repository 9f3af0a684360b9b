use std::time::Instant;

/// The four timer kinds a session owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    SequenceTimeout,
    StepTransition,
    CaptureDelay,
    FeedbackFlash,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::SequenceTimeout,
        TimerKind::StepTransition,
        TimerKind::CaptureDelay,
        TimerKind::FeedbackFlash,
    ];

    fn slot(&self) -> usize {
        match self {
            TimerKind::SequenceTimeout => 0,
            TimerKind::StepTransition => 1,
            TimerKind::CaptureDelay => 2,
            TimerKind::FeedbackFlash => 3,
        }
    }
}

/// Deadline-based timer bookkeeping with at most one live deadline per kind.
///
/// Scheduling a kind replaces any existing deadline of that kind, so a timer
/// can never fire twice for one arming. Purely passive: the driver asks for
/// `due` deadlines and the next wakeup point.
#[derive(Debug, Default)]
pub struct TimerSet {
    deadlines: [Option<Instant>; 4],
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `kind` for `deadline`, cancelling any previous instance.
    pub fn schedule(&mut self, kind: TimerKind, deadline: Instant) {
        self.deadlines[kind.slot()] = Some(deadline);
    }

    /// Returns true if a deadline was actually cancelled.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.deadlines[kind.slot()].take().is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines = [None; 4];
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.deadlines[kind.slot()].is_some()
    }

    /// Drains every deadline at or before `now`, in declaration order.
    pub fn due(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        for kind in TimerKind::ALL {
            if let Some(deadline) = self.deadlines[kind.slot()] {
                if deadline <= now {
                    self.deadlines[kind.slot()] = None;
                    fired.push(kind);
                }
            }
        }
        fired
    }

    /// Earliest armed deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().flatten().min().copied()
    }
}
