//! History wrapper that announces router transitions on the window.
//!
//! One wrapper is installed per window, however many binders are mounted.
//! Before delegating a `push_state` or `replace_state` it dispatches an
//! [`Event::History`], and each binder decides for its own engine whether
//! the transition completes the bar.

use crate::binder::click::is_same_destination;
use crate::error::Result;
use crate::host::{Event, History, HistoryChange, Window};
use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::warn;
use url::Url;

struct NotifyingHistory {
    inner: Arc<dyn History>,
    window: Weak<Window>,
}

impl NotifyingHistory {
    fn before_transition(&self, url: Option<&str>) {
        if let Some(window) = self.window.upgrade() {
            window.dispatch(&Event::History(HistoryChange {
                from: self.inner.location(),
                to: url.map(String::from),
            }));
        }
    }
}

impl History for NotifyingHistory {
    fn location(&self) -> Url {
        self.inner.location()
    }

    fn push_state(&self, state: Value, url: Option<&str>) -> Result<()> {
        self.before_transition(url);
        self.inner.push_state(state, url)
    }

    fn replace_state(&self, state: Value, url: Option<&str>) -> Result<()> {
        self.before_transition(url);
        self.inner.replace_state(state, url)
    }
}

/// True unless the transition stays on the current destination. A missing
/// or unparsable URL counts as leaving.
pub(crate) fn leaves_destination(change: &HistoryChange, ignore_search_params: bool) -> bool {
    let Some(to) = change.to.as_deref() else {
        return true;
    };
    match is_same_destination(change.from.as_str(), to, &change.from, ignore_search_params) {
        Ok(same) => !same,
        Err(e) => {
            warn!("history transition to unparsable url, stopping loader: {e}");
            true
        }
    }
}

/// A binder's lease on the window's history wrapper. The wrapper is
/// removed when the last lease is released.
pub struct HistoryPatch {
    window: Weak<Window>,
    installed: bool,
}

impl HistoryPatch {
    /// Whether taking this lease installed the wrapper.
    pub fn installed(&self) -> bool {
        self.installed
    }

    /// Give the lease back. Returns whether the original history handle
    /// was restored.
    pub fn release(self) -> bool {
        self.window
            .upgrade()
            .is_some_and(|window| window.release_history())
    }
}

/// Lease the window's history wrapper, installing it on first use.
pub fn install(window: &Arc<Window>) -> HistoryPatch {
    let page = Arc::downgrade(window);
    let installed = window.lease_history(|inner| {
        Arc::new(NotifyingHistory {
            inner,
            window: page.clone(),
        })
    });
    HistoryPatch {
        window: page,
        installed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(from: &str, to: Option<&str>) -> HistoryChange {
        HistoryChange {
            from: Url::parse(from).unwrap(),
            to: to.map(String::from),
        }
    }

    #[test]
    fn test_leaves_destination() {
        let from = "https://example.com/page?x=1";
        assert!(!leaves_destination(&change(from, Some("/page?x=1#top")), false));
        assert!(leaves_destination(&change(from, Some("/page?x=2")), false));
        assert!(!leaves_destination(&change(from, Some("/page?x=2")), true));
        assert!(leaves_destination(&change(from, Some("/other")), true));
        assert!(leaves_destination(&change(from, None), false));
        assert!(leaves_destination(&change(from, Some("http://[::1")), false));
    }
}
