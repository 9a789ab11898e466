use std::time::{Duration, Instant};

use tracing::trace;

/// Quiet period between the last edit and the save it triggers.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(2);

/// Debounced-save deadline as an explicit cancellable task: at most one
/// save is ever pending, and every edit supersedes the previous deadline.
/// The caller polls `take_due` from its event loop; a save in flight never
/// blocks further edits.
#[derive(Debug)]
pub struct AutosaveTimer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl AutosaveTimer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// (Re)schedules the pending save `quiet` after `now`.
    pub fn note_edit(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
        trace!(quiet_ms = self.quiet.as_millis() as u64, "autosave rescheduled");
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per elapsed deadline; the caller performs the save.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_quiet_period() {
        let mut timer = AutosaveTimer::new(Duration::from_secs(2));
        let start = Instant::now();
        timer.note_edit(start);

        assert!(!timer.take_due(start + Duration::from_secs(1)));
        assert!(timer.take_due(start + Duration::from_secs(2)));
        assert!(!timer.take_due(start + Duration::from_secs(3)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn newer_edit_supersedes_pending_deadline() {
        let mut timer = AutosaveTimer::new(Duration::from_secs(2));
        let start = Instant::now();
        timer.note_edit(start);
        timer.note_edit(start + Duration::from_secs(1));

        assert!(!timer.take_due(start + Duration::from_secs(2)));
        assert!(timer.take_due(start + Duration::from_secs(3)));
    }

    #[test]
    fn cancel_clears_the_pending_save() {
        let mut timer = AutosaveTimer::new(Duration::from_secs(2));
        let start = Instant::now();
        timer.note_edit(start);
        timer.cancel();

        assert!(!timer.take_due(start + Duration::from_secs(5)));
    }
}
