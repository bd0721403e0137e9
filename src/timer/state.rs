use tokio::time::Instant;

/// Elapsed-time state for the work timer.
///
/// Elapsed time is always derived from a monotonic anchor rather than by
/// accumulating tick counts, so delayed ticks never cause drift. The anchor
/// is re-established on every start and every manual adjustment.
#[derive(Debug, Clone)]
pub struct TimerState {
    running: bool,
    /// Elapsed seconds as of the last sync (authoritative while paused).
    elapsed_secs: u64,
    /// Seconds accumulated before the current running window; combines with
    /// `anchor` to compute the true elapsed value.
    baseline_secs: u64,
    anchor: Option<Instant>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            running: false,
            elapsed_secs: 0,
            baseline_secs: 0,
            anchor: None,
        }
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Elapsed whole seconds as of `now`.
    pub fn elapsed_at(&self, now: Instant) -> u64 {
        match (self.running, self.anchor) {
            (true, Some(anchor)) => self
                .baseline_secs
                .saturating_add(now.duration_since(anchor).as_secs()),
            _ => self.elapsed_secs,
        }
    }

    /// Folds the anchor-derived value into `elapsed_secs`.
    pub fn sync(&mut self, now: Instant) {
        self.elapsed_secs = self.elapsed_at(now);
    }

    /// No-op if already running.
    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.running = true;
        self.baseline_secs = self.elapsed_secs;
        self.anchor = Some(now);
    }

    /// No-op if not running; elapsed freezes at its last computed value.
    pub fn pause(&mut self, now: Instant) {
        if !self.running {
            return;
        }
        self.sync(now);
        self.running = false;
        self.anchor = None;
        self.baseline_secs = self.elapsed_secs;
    }

    pub fn reset(&mut self, now: Instant) {
        self.pause(now);
        self.elapsed_secs = 0;
        self.baseline_secs = 0;
    }

    /// Adjusts elapsed by `delta` seconds, clamped at zero. While running the
    /// anchor is re-established so subsequent sampling stays consistent.
    /// Returns the new elapsed value.
    pub fn add_seconds(&mut self, delta: i64, now: Instant) -> u64 {
        self.sync(now);
        let adjusted = (self.elapsed_secs as i64).saturating_add(delta).max(0) as u64;
        self.elapsed_secs = adjusted;
        if self.running {
            self.baseline_secs = adjusted;
            self.anchor = Some(now);
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_is_derived_from_the_anchor() {
        let mut state = TimerState::new();
        let t0 = Instant::now();
        state.start(t0);
        assert!(state.is_running());
        assert_eq!(state.elapsed_at(t0 + secs(3)), 3);

        state.pause(t0 + secs(3));
        assert!(!state.is_running());
        assert_eq!(state.elapsed_at(t0 + secs(10)), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_continues_from_frozen_elapsed() {
        let mut state = TimerState::new();
        let t0 = Instant::now();
        state.start(t0);
        state.pause(t0 + secs(5));
        state.start(t0 + secs(60));
        assert_eq!(state.elapsed_at(t0 + secs(62)), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn add_seconds_clamps_at_zero() {
        let mut state = TimerState::new();
        let t0 = Instant::now();
        state.start(t0);
        assert_eq!(state.add_seconds(-10, t0 + secs(5)), 0);
        // Still running, re-anchored at zero.
        assert!(state.is_running());
        assert_eq!(state.elapsed_at(t0 + secs(7)), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn add_seconds_while_paused() {
        let mut state = TimerState::new();
        let t0 = Instant::now();
        assert_eq!(state.add_seconds(90, t0), 90);
        assert_eq!(state.elapsed_at(t0 + secs(30)), 90);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_zeroes_and_pauses() {
        let mut state = TimerState::new();
        let t0 = Instant::now();
        state.start(t0);
        state.reset(t0 + secs(4));
        assert!(!state.is_running());
        assert_eq!(state.elapsed_at(t0 + secs(9)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_a_no_op_while_running() {
        let mut state = TimerState::new();
        let t0 = Instant::now();
        state.start(t0);
        state.start(t0 + secs(2));
        assert_eq!(state.elapsed_at(t0 + secs(3)), 3);
    }
}
