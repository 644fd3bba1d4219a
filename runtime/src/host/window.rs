//! A page window: document, history and event target together.

use crate::control::ProgressControl;
use crate::error::Result;
use crate::host::document::Document;
use crate::host::events::{Event, EventTarget};
use crate::host::history::History;
use crate::{read, write};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use url::Url;

/// Active history handle plus the wrapped original while a wrapper is
/// installed. The wrapper stays until its last lease is released.
struct HistorySlot {
    current: Arc<dyn History>,
    original: Option<Arc<dyn History>>,
    leases: usize,
}

/// The page the loader lives in.
///
/// Routers navigate through [`Window::history`] (or the `push_state` /
/// `replace_state` shortcuts) so that an installed history wrapper sees
/// every transition.
pub struct Window {
    document: Arc<dyn Document>,
    history: RwLock<HistorySlot>,
    events: EventTarget,
}

impl Window {
    pub fn new(document: Arc<dyn Document>, history: Arc<dyn History>) -> Arc<Self> {
        Arc::new(Self {
            document,
            history: RwLock::new(HistorySlot {
                current: history,
                original: None,
                leases: 0,
            }),
            events: EventTarget::new(),
        })
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.document
    }

    /// The active history handle, wrapped or not.
    pub fn history(&self) -> Arc<dyn History> {
        Arc::clone(&read(&self.history).current)
    }

    pub fn location(&self) -> Url {
        self.history().location()
    }

    pub fn events(&self) -> &EventTarget {
        &self.events
    }

    pub fn dispatch(&self, event: &Event) -> usize {
        self.events.dispatch(event)
    }

    pub fn push_state(&self, state: Value, url: Option<&str>) -> Result<()> {
        self.history().push_state(state, url)
    }

    pub fn replace_state(&self, state: Value, url: Option<&str>) -> Result<()> {
        self.history().replace_state(state, url)
    }

    /// Handle for starting and stopping the loader without a reference
    /// to the mounted binder.
    pub fn control(self: &Arc<Self>) -> ProgressControl {
        ProgressControl::new(self)
    }

    pub fn is_history_patched(&self) -> bool {
        read(&self.history).original.is_some()
    }

    /// Take a lease on the history wrapper, installing it with `wrap` when
    /// none is installed. Returns whether this call installed it.
    pub(crate) fn lease_history<F>(&self, wrap: F) -> bool
    where
        F: FnOnce(Arc<dyn History>) -> Arc<dyn History>,
    {
        let mut slot = write(&self.history);
        slot.leases += 1;
        if slot.original.is_some() {
            return false;
        }
        let original = Arc::clone(&slot.current);
        slot.current = wrap(Arc::clone(&original));
        slot.original = Some(original);
        true
    }

    /// Release a lease from [`Window::lease_history`]. The last release
    /// puts the original handle back; returns whether it did.
    pub(crate) fn release_history(&self) -> bool {
        let mut slot = write(&self.history);
        slot.leases = slot.leases.saturating_sub(1);
        if slot.leases > 0 {
            return false;
        }
        match slot.original.take() {
            Some(original) => {
                slot.current = original;
                true
            }
            None => false,
        }
    }
}
