//! Progress engine: owns the bar and decides where it is, frame by frame.
//!
//! The engine is Idle (`status() == None`, nothing mounted) or Active
//! (`status()` in `(0, 1]`, bar mounted). Every position change goes
//! through [`ProgressEngine::set_to`], which queues the visual transition
//! on a [`Sequencer`] so transitions never overlap. Reaching exactly 1
//! fades the bar out and returns the engine to Idle.
//!
//! Timers are tokio tasks, so the engine expects to be driven from inside
//! a runtime. Outside one, delays collapse to zero and the trickle is off.

pub mod position;
pub mod render;

use crate::host::{Document, Selector};
use crate::lock;
use crate::sequencer::{Proceed, Sequencer};
use crate::settings::Settings;
use position::{bar_offset, Positioning};
use render::{BAR, CONTAINER, SPINNER};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Highest value trickling may reach. Only `complete` goes past it.
pub const MAX_TRICKLE: f64 = 0.994;

/// Auto-increment for the current progress: fast early, near-stall late.
pub fn trickle_amount(progress: f64) -> f64 {
    0.1 * (-5.0 * progress).exp()
}

#[derive(Debug, Default)]
struct ProgressState {
    progress: Option<f64>,
    /// Generation of the current run; a trickle loop serves exactly one.
    run: u64,
}

struct EngineInner {
    settings: Settings,
    document: Arc<dyn Document>,
    sequencer: Sequencer,
    state: Mutex<ProgressState>,
}

/// Handle to one loader. Clones share the same bar.
#[derive(Clone)]
pub struct ProgressEngine {
    inner: Arc<EngineInner>,
}

impl ProgressEngine {
    pub fn new(settings: Settings, document: Arc<dyn Document>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                settings: settings.sanitized(),
                document,
                sequencer: Sequencer::new(),
                state: Mutex::new(ProgressState::default()),
            }),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// Current progress, `None` when idle.
    pub fn status(&self) -> Option<f64> {
        lock(&self.inner.state).progress
    }

    pub fn is_started(&self) -> bool {
        self.status().is_some()
    }

    /// Show the bar at the initial position and start trickling.
    /// No-op while a run is active.
    pub fn start(&self) {
        let run = {
            let mut state = lock(&self.inner.state);
            if state.progress.is_some() {
                return;
            }
            state.run += 1;
            state.run
        };
        debug!(run, "progress started");
        self.set_to(self.inner.settings.initial_position);
        self.spawn_trickle(run);
        if self.inner.settings.show_spinner && !self.document().contains(&SPINNER) {
            self.document().append(render::spinner(&self.inner.settings));
        }
    }

    /// Advance by `amount`, or by [`trickle_amount`] when `None`, never
    /// past [`MAX_TRICKLE`]. Starts the bar when idle.
    pub fn increment(&self, amount: Option<f64>) {
        let Some(current) = self.status() else {
            self.start();
            return;
        };
        if current >= 1.0 {
            return;
        }
        let amount = amount.unwrap_or_else(|| trickle_amount(current));
        self.set_to((current + amount).clamp(0.0, MAX_TRICKLE));
    }

    /// Finish the run: move to the end, fade out, detach. No-op when idle
    /// or already finishing.
    pub fn complete(&self) {
        match self.status() {
            Some(progress) if progress < 1.0 => {
                debug!("progress completing from {progress:.3}");
                self.set_to(1.0);
            }
            _ => {}
        }
    }

    /// Move the bar to `value`, clamped to `[initial_position, 1]`.
    ///
    /// Mounts the bar when needed and flushes layout before queueing the
    /// transition, so the change animates from the bar's current place.
    pub fn set_to(&self, value: f64) {
        if value.is_nan() {
            return;
        }
        let settings = &self.inner.settings;
        let value = value.clamp(settings.initial_position, 1.0);
        let (was_started, run) = {
            let mut state = lock(&self.inner.state);
            let was_started = state.progress.is_some();
            state.progress = Some(value);
            (was_started, state.run)
        };

        if !self.document().contains(&CONTAINER) {
            let from = if was_started { value } else { 0.0 };
            let positioning = Positioning::detect(self.document().as_ref());
            self.document().append(render::bar(settings, from, positioning));
        }
        self.document().flush_layout(&CONTAINER);

        let engine = self.clone();
        self.inner
            .sequencer
            .enqueue(move |next| engine.transition(value, run, next));
    }

    fn document(&self) -> &Arc<dyn Document> {
        &self.inner.document
    }

    fn transition(&self, value: f64, run: u64, next: Proceed) {
        let settings = &self.inner.settings;
        let speed = Duration::from_millis(settings.speed);
        let positioning = Positioning::detect(self.document().as_ref());
        let (property, position) = positioning.declaration(bar_offset(value, settings.dir));
        self.style(&BAR, property, &position);
        self.style(
            &BAR,
            "transition",
            &format!("all {}ms {}", settings.speed, settings.easing),
        );

        if value < 1.0 {
            after(speed, move || next.call());
            return;
        }

        self.style(&CONTAINER, "transition", "none");
        self.style(&CONTAINER, "opacity", "1");
        self.document().flush_layout(&CONTAINER);

        let engine = self.clone();
        after(speed, move || {
            let fade = format!("all {}ms linear", engine.inner.settings.speed);
            engine.style(&CONTAINER, "transition", &fade);
            engine.style(&CONTAINER, "opacity", "0");
            after(speed, move || {
                engine.finish(run);
                next.call();
            });
        });
    }

    fn finish(&self, run: u64) {
        let finished = {
            let mut state = lock(&self.inner.state);
            let terminal = state.run == run && state.progress.is_some_and(|p| p >= 1.0);
            if terminal {
                state.progress = None;
            }
            terminal
        };
        if finished {
            self.document().remove(&CONTAINER);
            self.document().remove(&SPINNER);
            debug!(run, "progress finished");
        } else {
            // The bar was moved again while fading; keep it visible.
            self.style(&CONTAINER, "opacity", "1");
        }
    }

    fn spawn_trickle(&self, run: u64) {
        let Ok(handle) = Handle::try_current() else {
            warn!("no async runtime, trickle disabled");
            return;
        };
        let engine = self.clone();
        let period = Duration::from_millis(self.inner.settings.speed.max(1));
        handle.spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                {
                    let state = lock(&engine.inner.state);
                    if state.progress.is_none() || state.run != run {
                        return;
                    }
                }
                engine.increment(None);
            }
        });
    }

    fn style(&self, selector: &Selector<'_>, property: &str, value: &str) {
        if !self.document().set_style(selector, property, value) {
            debug!("{selector} is not mounted, skipping {property}");
        }
    }
}

/// Run `f` after `delay` on the current runtime, or right away without one.
fn after<F>(delay: Duration, f: F)
where
    F: FnOnce() + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                f();
            });
        }
        Err(_) => f(),
    }
}
