//! Recompute throttling
//!
//! Edits and cursor moves only mark work as pending. A pending recompute
//! runs at once if the previous run was long enough ago, otherwise when the
//! interval since that run has elapsed, so bursts of events collapse into
//! at most one run per interval. Timestamps are passed in, keeping this a
//! plain data structure.

use std::time::{Duration, Instant};

/// Default minimum time between recomputes, in milliseconds
pub const DEFAULT_THROTTLE_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    pending: bool,
    immediate: bool,
    last_run: Option<Instant>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            pending: false,
            immediate: false,
            last_run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record that the text or cursor changed
    pub fn notify(&mut self) {
        self.pending = true;
    }

    /// Record a change that should be shown without waiting for the interval
    pub fn request_immediate(&mut self) {
        self.pending = true;
        self.immediate = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// When the pending recompute becomes due, if one is pending
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.pending {
            return None;
        }
        match self.last_run {
            Some(last) if !self.immediate => Some(last + self.interval),
            // Due now; callers treat a past deadline as "poll without waiting"
            _ => Some(self.last_run.unwrap_or_else(Instant::now)),
        }
    }

    /// Whether a recompute should run at `now`; consumes the pending state if so
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        let due = self.immediate
            || self
                .last_run
                .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.pending = false;
            self.immediate = false;
            self.last_run = Some(now);
        }
        due
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_MS)
    }
}
