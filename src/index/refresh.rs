//! Coalescing of refresh requests.
//!
//! At most one rebuild runs at a time. Requests that arrive while it runs are
//! merged into a single follow-up rebuild performed by the caller that is
//! already running, so no request is lost and none waits in an unbounded queue.

use parking_lot::Mutex;

/// Outcome of a refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome<R> {
    /// This caller ran the job; carries the result of the last pass
    Ran { passes: usize, last: R },
    /// A rebuild was already running and will run once more on our behalf
    Coalesced,
}

#[derive(Debug, Default)]
struct GateState {
    running: bool,
    pending: bool,
}

#[derive(Debug, Default)]
pub struct RefreshGate {
    state: Mutex<GateState>,
}

/// Releases the gate when a pass unwinds.
struct RunningGuard<'a> {
    state: &'a Mutex<GateState>,
    armed: bool,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().running = false;
        }
    }
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `job`, or records a pending pass if another caller is running it.
    ///
    /// If `job` panics the gate is released, so later requests still run.
    pub fn run<F, R>(&self, mut job: F) -> RefreshOutcome<R>
    where
        F: FnMut() -> R,
    {
        {
            let mut state = self.state.lock();
            if state.running {
                state.pending = true;
                return RefreshOutcome::Coalesced;
            }
            state.running = true;
        }

        let mut guard = RunningGuard {
            state: &self.state,
            armed: true,
        };

        let mut passes = 0;
        loop {
            let last = job();
            passes += 1;

            let mut state = self.state.lock();
            if state.pending {
                state.pending = false;
                continue;
            }
            // cleared under the same lock that saw no pending request
            state.running = false;
            guard.armed = false;
            return RefreshOutcome::Ran { passes, last };
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;

    #[test]
    fn test_single_request_runs_once() {
        let gate = RefreshGate::new();
        let outcome = gate.run(|| 7);

        assert_eq!(outcome, RefreshOutcome::Ran { passes: 1, last: 7 });
        assert!(!gate.is_running());
    }

    #[test]
    fn test_panicking_pass_releases_gate() {
        let gate = RefreshGate::new();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            gate.run(|| -> usize { panic!("rebuild failed") })
        }));
        assert!(result.is_err());
        assert!(!gate.is_running());

        assert_eq!(gate.run(|| 3), RefreshOutcome::Ran { passes: 1, last: 3 });
    }

    #[test]
    fn test_sequential_requests_each_run() {
        let gate = RefreshGate::new();
        let counter = AtomicUsize::new(0);

        gate.run(|| counter.fetch_add(1, Ordering::SeqCst));
        gate.run(|| counter.fetch_add(1, Ordering::SeqCst));

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_requests_during_run_coalesce_into_one_follow_up() {
        let gate = Arc::new(RefreshGate::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let runner = {
            let gate = gate.clone();
            let counter = counter.clone();
            thread::spawn(move || {
                gate.run(|| {
                    let pass = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if pass == 1 {
                        started_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                    }
                    pass
                })
            })
        };

        started_rx.recv().unwrap();
        assert!(gate.is_running());

        // three more requests while the first pass is blocked
        for _ in 0..3 {
            let outcome = gate.run(|| -> usize { unreachable!("coalesced request must not run its own job") });
            assert_eq!(outcome, RefreshOutcome::<usize>::Coalesced);
        }

        release_tx.send(()).unwrap();
        let outcome = runner.join().unwrap();

        assert_eq!(outcome, RefreshOutcome::Ran { passes: 2, last: 2 });
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!gate.is_running());
    }
}
