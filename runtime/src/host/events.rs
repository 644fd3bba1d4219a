//! Typed document events and a synchronous listener registry.

use crate::lock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Well-known name of the manual start signal.
pub const START_SIGNAL: &str = "toploader:start";
/// Well-known name of the manual stop signal.
pub const STOP_SIGNAL: &str = "toploader:stop";

/// One element on a click's propagation path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    pub tag: String,
    pub href: Option<String>,
    pub target: Option<String>,
}

impl ElementInfo {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn anchor(href: &str) -> Self {
        Self {
            tag: "a".to_string(),
            href: Some(href.to_string()),
            target: None,
        }
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    fn is_anchor(&self) -> bool {
        self.tag.eq_ignore_ascii_case("a")
    }
}

/// A document-level click.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    /// Elements from the event target up to the document root.
    pub path: Vec<ElementInfo>,
    pub ctrl_key: bool,
    pub meta_key: bool,
}

impl ClickEvent {
    pub fn new(path: Vec<ElementInfo>) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    /// A click directly on an anchor.
    pub fn on_anchor(href: &str) -> Self {
        Self::new(vec![ElementInfo::anchor(href), ElementInfo::element("body")])
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    /// The nearest anchor from the target upward.
    pub fn closest_anchor(&self) -> Option<&ElementInfo> {
        self.path.iter().find(|el| el.is_anchor())
    }
}

/// Manual control signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressSignal {
    Start,
    Stop,
}

impl ProgressSignal {
    pub fn name(self) -> &'static str {
        match self {
            ProgressSignal::Start => START_SIGNAL,
            ProgressSignal::Stop => STOP_SIGNAL,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            START_SIGNAL => Some(ProgressSignal::Start),
            STOP_SIGNAL => Some(ProgressSignal::Stop),
            _ => None,
        }
    }
}

/// A router is about to push or replace a history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryChange {
    /// Location before the transition.
    pub from: Url,
    /// Requested URL, unresolved; `None` keeps the current one.
    pub to: Option<String>,
}

/// Events dispatched on a window.
#[derive(Debug, Clone)]
pub enum Event {
    Click(ClickEvent),
    Signal(ProgressSignal),
    History(HistoryChange),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click(_) => EventKind::Click,
            Event::Signal(signal) => EventKind::Signal(*signal),
            Event::History(_) => EventKind::History,
        }
    }
}

/// What a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Signal(ProgressSignal),
    History,
}

/// Handle returned by [`EventTarget::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Listener registry with synchronous dispatch.
#[derive(Default)]
pub struct EventTarget {
    listeners: Mutex<Vec<(ListenerId, EventKind, Listener)>>,
    next_id: AtomicU64,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, kind, Arc::new(listener)));
        id
    }

    /// Returns `false` when the listener was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(lid, _, _)| *lid != id);
        listeners.len() != before
    }

    /// Invoke every listener subscribed to the event's kind, in
    /// registration order. Returns how many ran.
    pub fn dispatch(&self, event: &Event) -> usize {
        let kind = event.kind();
        // Snapshot so listeners can add or remove listeners while running.
        let matching: Vec<Listener> = lock(&self.listeners)
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| Arc::clone(l))
            .collect();
        for listener in &matching {
            listener(event);
        }
        matching.len()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}
