//! Manual start/stop for code that has no reference to the binder.

use crate::host::{Event, ProgressSignal, Window};
use std::sync::{Arc, Weak};

/// Publishes start/stop signals on a window. Every binder mounted on that
/// window reacts; with none mounted the signals are dropped.
#[derive(Clone)]
pub struct ProgressControl {
    window: Weak<Window>,
}

impl ProgressControl {
    pub fn new(window: &Arc<Window>) -> Self {
        Self {
            window: Arc::downgrade(window),
        }
    }

    /// Start the loader. Returns `false` once the window is gone.
    pub fn start(&self) -> bool {
        self.send(ProgressSignal::Start)
    }

    /// Complete the loader. Returns `false` once the window is gone.
    pub fn stop(&self) -> bool {
        self.send(ProgressSignal::Stop)
    }

    /// Publish a signal received by name from a string-based bridge.
    /// Unknown names are ignored.
    pub fn send_named(&self, name: &str) -> bool {
        ProgressSignal::from_name(name).is_some_and(|signal| self.send(signal))
    }

    fn send(&self, signal: ProgressSignal) -> bool {
        match self.window.upgrade() {
            Some(window) => {
                window.dispatch(&Event::Signal(signal));
                true
            }
            None => false,
        }
    }
}
