//! Single-flight animation queue.
//!
//! Tasks run strictly one after another. A task receives a [`Proceed`]
//! continuation and consumes it once its visual effect has elapsed; only
//! then does the next task start. This keeps two transform changes from
//! ever overlapping on the bar.

use crate::lock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A unit of animation work.
pub type AnimationTask = Box<dyn FnOnce(Proceed) + Send>;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<AnimationTask>,
    in_flight: bool,
    /// A call to `advance` is running tasks on some stack.
    draining: bool,
    /// The running task released its continuation before returning.
    released: bool,
}

/// FIFO queue with at most one task in flight.
#[derive(Clone, Default)]
pub struct Sequencer {
    state: Arc<Mutex<QueueState>>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. Runs it immediately when nothing is in flight.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce(Proceed) + Send + 'static,
    {
        let run_now = {
            let mut state = lock(&self.state);
            state.pending.push_back(Box::new(task));
            !std::mem::replace(&mut state.in_flight, true)
        };
        if run_now {
            self.advance();
        }
    }

    /// True when no task is in flight.
    pub fn is_idle(&self) -> bool {
        !lock(&self.state).in_flight
    }

    /// Number of tasks waiting behind the one in flight.
    pub fn pending(&self) -> usize {
        lock(&self.state).pending.len()
    }

    /// Start the next task. A continuation released while a task runs on
    /// this stack is picked up by the loop below rather than recursing.
    fn advance(&self) {
        {
            let mut state = lock(&self.state);
            if state.draining {
                state.released = true;
                return;
            }
            state.draining = true;
        }
        loop {
            let next = {
                let mut state = lock(&self.state);
                match state.pending.pop_front() {
                    Some(task) => {
                        state.released = false;
                        task
                    }
                    None => {
                        state.in_flight = false;
                        state.draining = false;
                        return;
                    }
                }
            };
            next(Proceed {
                sequencer: Some(self.clone()),
            });
            let mut state = lock(&self.state);
            if !state.released {
                state.draining = false;
                return;
            }
        }
    }
}

/// Continuation handed to a running task.
///
/// Calling [`Proceed::call`] starts the next task. Dropping it uncalled
/// has the same effect, so a task that bails out early cannot wedge the
/// queue. A task that holds on to it forever still does.
pub struct Proceed {
    sequencer: Option<Sequencer>,
}

impl Proceed {
    pub fn call(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(sequencer) = self.sequencer.take() {
            sequencer.advance();
        }
    }
}

impl Drop for Proceed {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_idle_enqueue_runs_immediately() {
        let seq = Sequencer::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        seq.enqueue(move |next| {
            l.lock().unwrap().push(1);
            next.call();
        });
        assert_eq!(*log.lock().unwrap(), vec![1]);
        assert!(seq.is_idle());
    }

    #[test]
    fn test_waits_for_continuation() {
        let seq = Sequencer::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let held = Arc::new(Mutex::new(None));

        let (l, h) = (log.clone(), held.clone());
        seq.enqueue(move |next| {
            l.lock().unwrap().push("first");
            *h.lock().unwrap() = Some(next);
        });
        let l = log.clone();
        seq.enqueue(move |next| {
            l.lock().unwrap().push("second");
            next.call();
        });

        assert_eq!(*log.lock().unwrap(), vec!["first"]);
        assert_eq!(seq.pending(), 1);
        assert!(!seq.is_idle());

        let next = held.lock().unwrap().take().unwrap();
        next.call();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert!(seq.is_idle());
    }

    #[test]
    fn test_dropped_continuation_advances() {
        let seq = Sequencer::new();
        let ran = Arc::new(Mutex::new(false));
        seq.enqueue(|_next| {});
        let r = ran.clone();
        seq.enqueue(move |next| {
            *r.lock().unwrap() = true;
            next.call();
        });
        assert!(*ran.lock().unwrap());
        assert!(seq.is_idle());
    }

    #[test]
    fn test_long_synchronous_backlog_drains() {
        let seq = Sequencer::new();
        let held = Arc::new(Mutex::new(None));
        let h = held.clone();
        seq.enqueue(move |next| *h.lock().unwrap() = Some(next));

        let ran = Arc::new(Mutex::new(0usize));
        for i in 0..200_000 {
            let r = ran.clone();
            seq.enqueue(move |next| {
                *r.lock().unwrap() += 1;
                // Alternate between calling and dropping the continuation.
                if i % 2 == 0 {
                    next.call();
                }
            });
        }
        assert_eq!(seq.pending(), 200_000);

        let next = held.lock().unwrap().take().unwrap();
        next.call();
        assert_eq!(*ran.lock().unwrap(), 200_000);
        assert!(seq.is_idle());
        assert_eq!(seq.pending(), 0);
    }

    #[test]
    fn test_continuation_released_elsewhere_while_running() {
        let seq = Sequencer::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let held = Arc::new(Mutex::new(None));

        let (l, h) = (log.clone(), held.clone());
        seq.enqueue(move |next| {
            l.lock().unwrap().push("first");
            *h.lock().unwrap() = Some(next);
        });
        let l = log.clone();
        seq.enqueue(move |next| {
            l.lock().unwrap().push("second");
            std::thread::spawn(move || next.call()).join().unwrap();
        });
        let l = log.clone();
        seq.enqueue(move |next| {
            l.lock().unwrap().push("third");
            next.call();
        });

        let next = held.lock().unwrap().take().unwrap();
        next.call();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        assert!(seq.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_tasks_never_overlap() {
        let seq = Sequencer::new();
        let active = Arc::new(Mutex::new(0u32));
        let max_seen = Arc::new(Mutex::new(0u32));

        for _ in 0..4 {
            let (active, max_seen) = (active.clone(), max_seen.clone());
            seq.enqueue(move |next| {
                let now = {
                    let mut a = active.lock().unwrap();
                    *a += 1;
                    *a
                };
                let mut m = max_seen.lock().unwrap();
                *m = (*m).max(now);
                drop(m);
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    *active.lock().unwrap() -= 1;
                    next.call();
                });
            });
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*max_seen.lock().unwrap(), 1);
        assert!(seq.is_idle());
    }
}
