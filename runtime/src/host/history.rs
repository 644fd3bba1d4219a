//! History seam: session history entries and the current location.

use crate::error::Result;
use serde_json::Value;
use url::Url;

/// The page's session history, as a client-side router drives it.
pub trait History: Send + Sync {
    /// The current location.
    fn location(&self) -> Url;

    /// Add an entry. `url` is resolved against the current location;
    /// `None` keeps the current URL.
    fn push_state(&self, state: Value, url: Option<&str>) -> Result<()>;

    /// Replace the current entry.
    fn replace_state(&self, state: Value, url: Option<&str>) -> Result<()>;
}
