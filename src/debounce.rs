//! Coalescing debounce timer.
//!
//! Collapses a rapid stream of events into a minimal number of callback
//! invocations while guaranteeing that an invocation is never lost and at
//! most one callback body runs at a time per instance:
//!
//! - [`Debouncer::event`] cancels any pending delay and starts a new one.
//! - When the delay expires with no callback running, one starts
//!   immediately. When one is running, a rerun is recorded instead.
//! - When a callback finishes with a rerun recorded (or with an already
//!   expired delay), the next invocation starts immediately, without a new
//!   delay: the request stands for a whole collapsed backlog of events.
//!
//! The decision logic lives in [`DebounceState`], a pure state machine over
//! the states idle / delay-pending / executing / executing-with-rerun, so
//! every race between events, expiry and completion is testable without
//! real time. [`Debouncer`] drives it from a dedicated worker thread parked
//! on a condition variable.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Pure debounce state: one optional deadline plus the executing/rerun
/// flags.
#[derive(Debug, Default)]
pub(crate) struct DebounceState {
    pub(crate) deadline: Option<Instant>,
    pub(crate) executing: bool,
    pub(crate) rerun: bool,
    shutdown: bool,
}

impl DebounceState {
    /// An event arrived: replace any pending delay with a fresh one.
    pub(crate) fn on_event(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// The pending delay expired. Returns true when a callback invocation
    /// must start now; otherwise the invocation is deferred behind the
    /// currently running one.
    pub(crate) fn on_expiry(&mut self) -> bool {
        self.deadline = None;
        if self.executing {
            self.rerun = true;
            false
        } else {
            self.executing = true;
            true
        }
    }

    /// A callback invocation finished. Returns true when another must start
    /// immediately: either a rerun was requested mid-flight, or a delay
    /// expired while the callback ran.
    pub(crate) fn on_complete(&mut self, now: Instant) -> bool {
        self.executing = false;
        if self.rerun {
            self.rerun = false;
            self.executing = true;
            return true;
        }
        if self.deadline.is_some_and(|deadline| deadline <= now) {
            self.deadline = None;
            self.executing = true;
            return true;
        }
        false
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.deadline.is_none() && !self.executing && !self.rerun
    }
}

struct Shared {
    state: Mutex<DebounceState>,
    signal: Condvar,
}

/// Threaded debounce timer around one callback.
///
/// `event()` is non-blocking and callable from any thread. The callback
/// runs on the worker thread; callers that need a particular execution
/// context marshal from inside the callback. Dropping the debouncer stops
/// the worker; a pending delay dies with it, a running callback finishes
/// first.
pub struct Debouncer {
    shared: Arc<Shared>,
    delay: Duration,
    worker: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new(delay: Duration, callback: impl Fn() + Send + 'static) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(DebounceState::default()),
            signal: Condvar::new(),
        });
        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || worker_loop(&shared, &callback))
        };
        Self {
            shared,
            delay,
            worker: Some(worker),
        }
    }

    /// Signal activity: cancel any pending delay and start a fresh one.
    /// Never invokes the callback itself.
    pub fn event(&self) {
        let mut state = self.shared.state.lock();
        state.on_event(Instant::now() + self.delay);
        tracing::trace!(delay = ?self.delay, "debounce event");
        self.shared.signal.notify_one();
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            self.shared.signal.notify_one();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(shared: &Shared, callback: &(impl Fn() + Send)) {
    let mut state = shared.state.lock();
    loop {
        // Wait for a deadline to arrive and pass.
        loop {
            if state.shutdown {
                return;
            }
            match state.deadline {
                None => {
                    shared.signal.wait(&mut state);
                }
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        break;
                    }
                    shared.signal.wait_until(&mut state, deadline);
                }
            }
        }

        if !state.on_expiry() {
            continue;
        }
        loop {
            drop(state);
            run_shielded(callback);
            state = shared.state.lock();
            if state.shutdown {
                // Leave flags consistent even on the way out.
                state.on_complete(Instant::now());
                return;
            }
            if !state.on_complete(Instant::now()) {
                break;
            }
            tracing::trace!("debounce rerun");
        }
    }
}

/// Run the callback so that a panic cannot take the worker (and the
/// executing flag) down with it.
fn run_shielded(callback: &(impl Fn() + Send)) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        tracing::error!("debounce callback panicked");
    }
}

#[cfg(test)]
mod state_test {
    use super::*;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_single_event_fires_once() {
        let base = Instant::now();
        let mut state = DebounceState::default();
        state.on_event(at(base, 300));
        assert!(state.on_expiry());
        assert!(!state.on_complete(at(base, 400)));
        assert!(state.is_idle());
    }

    #[test]
    fn test_event_during_delay_coalesces() {
        let base = Instant::now();
        let mut state = DebounceState::default();
        state.on_event(at(base, 300));
        // Second event before expiry just moves the deadline.
        state.on_event(at(base, 500));
        assert_eq!(state.deadline, Some(at(base, 500)));
        assert!(state.on_expiry());
        assert!(!state.on_complete(at(base, 600)));
        assert!(state.is_idle());
    }

    #[test]
    fn test_expiry_during_execution_defers_rerun() {
        let base = Instant::now();
        let mut state = DebounceState::default();
        state.on_event(at(base, 200));
        assert!(state.on_expiry());

        // Event lands while executing; its delay expires before completion.
        state.on_event(at(base, 500));
        assert!(!state.on_expiry(), "must not start a second invocation");
        assert!(state.rerun);

        // Completion starts the deferred invocation immediately.
        assert!(state.on_complete(at(base, 600)));
        assert!(!state.on_complete(at(base, 700)));
        assert!(state.is_idle());
    }

    #[test]
    fn test_delay_expiring_after_completion_runs_via_deadline_check() {
        let base = Instant::now();
        let mut state = DebounceState::default();
        state.on_event(at(base, 200));
        assert!(state.on_expiry());

        // Event lands while executing; the callback outlives the delay.
        state.on_event(at(base, 500));
        assert!(state.on_complete(at(base, 550)));
        assert!(!state.on_complete(at(base, 650)));
        assert!(state.is_idle());
    }

    #[test]
    fn test_pending_delay_survives_completion() {
        let base = Instant::now();
        let mut state = DebounceState::default();
        state.on_event(at(base, 200));
        assert!(state.on_expiry());

        // Event lands while executing but its delay has not expired yet:
        // completion must not fire it early.
        state.on_event(at(base, 900));
        assert!(!state.on_complete(at(base, 400)));
        assert_eq!(state.deadline, Some(at(base, 900)));
    }
}
