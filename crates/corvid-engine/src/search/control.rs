//! Search control: absolute deadline, cooperative yielding, and external stop.
//!
//! The engine is single-threaded and cooperative. The caller supplies an
//! absolute wall-clock deadline at the start of `pick_move`; every recursion
//! checks it before expanding a child. No external cancellation token is
//! required, but an `Arc<AtomicBool>` stop flag is kept alongside it since it
//! costs nothing and lets an embedding caller request an early abort from
//! another thread (e.g. a UI's "stop" button) without plumbing a channel
//! through every frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Maximum wall-clock spacing between cooperative yield points.
pub const YIELD_INTERVAL: Duration = Duration::from_millis(30);

/// Minimum time that must remain before the deadline for the root driver to
/// start another iteration (see the root driver's per-move time guard).
pub const ITERATION_TIME_GUARD: Duration = Duration::from_millis(140);

/// Governs when a search should stop.
pub struct SearchControl {
    start: Instant,
    deadline: Option<Instant>,
    stopped: Arc<AtomicBool>,
    should_yield: Option<Box<dyn Fn() -> bool + Send + Sync>>,
    last_yield: Mutex<Instant>,
}

impl SearchControl {
    /// Build a control with an optional absolute deadline and no yield callback.
    pub fn new(deadline: Option<Instant>, stopped: Arc<AtomicBool>) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            deadline,
            stopped,
            should_yield: None,
            last_yield: Mutex::new(now),
        }
    }

    /// Control with no deadline — stops only on the external flag.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self::new(None, stopped)
    }

    /// Control with a deadline `time_ms` milliseconds from now.
    pub fn new_timed(stopped: Arc<AtomicBool>, time_ms: u64) -> Self {
        Self::new(Some(Instant::now() + Duration::from_millis(time_ms)), stopped)
    }

    /// Attach a `should_yield` callback, invoked at `YIELD_INTERVAL` spacing
    /// from the node-entry check so a host executor can run between frames.
    /// A `true` return requests the search stop.
    pub fn with_yield(mut self, callback: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.should_yield = Some(Box::new(callback));
        self
    }

    /// Node-entry check: external stop flag, deadline expiry, or the yield
    /// callback requesting a stop. Cheap enough to call on every node — the
    /// budget here is milliseconds, not engine-competition microseconds.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            self.stopped.store(true, Ordering::Relaxed);
            return true;
        }
        // Poll the yield callback less often than the deadline to keep the
        // lock/clock overhead off the hottest path.
        if nodes & 1023 == 0 {
            self.maybe_yield();
        }
        false
    }

    fn maybe_yield(&self) {
        let Some(callback) = &self.should_yield else {
            return;
        };
        let mut last = self.last_yield.lock().expect("yield mutex poisoned");
        if last.elapsed() >= YIELD_INTERVAL {
            *last = Instant::now();
            if callback() {
                self.stopped.store(true, Ordering::Relaxed);
            }
        }
    }

    /// Root-driver guard: abort the next iteration when less than
    /// [`ITERATION_TIME_GUARD`] remains before the deadline.
    pub fn should_stop_iterating(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.deadline {
            return deadline.saturating_duration_since(Instant::now()) < ITERATION_TIME_GUARD;
        }
        false
    }

    /// Elapsed time since this control was constructed.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Reference to the shared external stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn infinite_never_stops_on_its_own() {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(stopped);
        assert!(!control.should_stop(100_000));
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn external_stop_flag_is_observed() {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(Arc::clone(&stopped));
        stopped.store(true, Ordering::Relaxed);
        assert!(control.should_stop(0));
    }

    #[test]
    fn timed_deadline_eventually_expires() {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_timed(stopped, 1);
        std::thread::sleep(Duration::from_millis(5));
        assert!(control.should_stop(0));
    }

    #[test]
    fn iteration_guard_fires_near_deadline() {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_timed(stopped, 50);
        std::thread::sleep(Duration::from_millis(10));
        // Under 140ms remain (deadline is only 50ms out), so the root driver
        // should refuse to start another iteration almost immediately.
        assert!(control.should_stop_iterating());
    }

    #[test]
    fn yield_callback_can_request_stop() {
        let stopped = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(stopped).with_yield(|| true);
        // Force past the last-yield timestamp by sleeping past the interval.
        std::thread::sleep(YIELD_INTERVAL);
        assert!(control.should_stop(1024));
    }
}
