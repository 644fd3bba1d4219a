//! Navigation binder: wires a progress engine to a window.
//!
//! Mounting installs a click listener, two manual-signal listeners and a
//! history listener, and leases the window's history wrapper. Unmounting,
//! explicitly or on drop, removes all of them and completes any visible
//! bar.

pub mod click;
pub mod history_patch;

use crate::engine::ProgressEngine;
use crate::host::{Event, EventKind, ListenerId, ProgressSignal, Window};
use crate::settings::Settings;
use history_patch::HistoryPatch;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct NavigationBinder {
    window: Arc<Window>,
    engine: ProgressEngine,
    listeners: Vec<ListenerId>,
    history_patch: Option<HistoryPatch>,
}

impl NavigationBinder {
    pub fn mount(window: &Arc<Window>, settings: Settings) -> Self {
        let engine = ProgressEngine::new(settings, Arc::clone(window.document()));
        let ignore_search_params = engine.settings().ignore_search_params;
        let events = window.events();

        let on_click = {
            let engine = engine.clone();
            let page = Arc::downgrade(window);
            events.add_listener(EventKind::Click, move |event| {
                let (Event::Click(clicked), Some(window)) = (event, page.upgrade()) else {
                    return;
                };
                match click::is_navigation(clicked, &window.location(), ignore_search_params) {
                    Ok(true) => engine.start(),
                    Ok(false) => {}
                    Err(e) => {
                        warn!("could not classify click, stopping loader: {e}");
                        engine.complete();
                    }
                }
            })
        };
        let on_start = {
            let engine = engine.clone();
            events.add_listener(EventKind::Signal(ProgressSignal::Start), move |_| engine.start())
        };
        let on_stop = {
            let engine = engine.clone();
            events.add_listener(EventKind::Signal(ProgressSignal::Stop), move |_| {
                engine.complete()
            })
        };
        let on_history = {
            let engine = engine.clone();
            events.add_listener(EventKind::History, move |event| {
                if let Event::History(change) = event {
                    if history_patch::leaves_destination(change, ignore_search_params) {
                        engine.complete();
                    }
                }
            })
        };

        let patch = history_patch::install(window);
        if !patch.installed() {
            debug!("history already wrapped, sharing the wrapper");
        }

        Self {
            window: Arc::clone(window),
            engine,
            listeners: vec![on_click, on_start, on_stop, on_history],
            history_patch: Some(patch),
        }
    }

    pub fn engine(&self) -> &ProgressEngine {
        &self.engine
    }

    /// Whether mounting this binder installed the window's history wrapper.
    pub fn installed_history_patch(&self) -> bool {
        self.history_patch
            .as_ref()
            .is_some_and(HistoryPatch::installed)
    }

    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        for id in self.listeners.drain(..) {
            self.window.events().remove_listener(id);
        }
        if let Some(patch) = self.history_patch.take() {
            if patch.release() {
                debug!("history wrapper removed");
            }
        }
        self.engine.complete();
    }
}

impl Drop for NavigationBinder {
    fn drop(&mut self) {
        self.teardown();
    }
}
