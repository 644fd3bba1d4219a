//! In-memory page host.
//!
//! Backs the demo CLI and the test suite. The document records every style
//! change with its offset from creation so an animation can be replayed
//! frame by frame.

use crate::error::{LoaderError, Result};
use crate::host::document::{Document, Node, Selector};
use crate::host::history::History;
use crate::host::window::Window;
use crate::lock;
use crate::url_match::to_absolute;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use url::Url;

/// Style properties a current engine exposes on `document.body.style`.
const MODERN_STYLE_PROPERTIES: &[&str] = &["perspective", "transform", "transition", "opacity"];

/// One recorded inline style mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleChange {
    pub at_ms: u64,
    pub selector: String,
    pub property: String,
    pub value: String,
}

/// A document body held in memory.
pub struct MemoryDocument {
    body: Mutex<Vec<Node>>,
    style_properties: Mutex<HashSet<String>>,
    layout_flushes: AtomicUsize,
    changes: Mutex<Vec<StyleChange>>,
    created: Instant,
}

impl MemoryDocument {
    /// A document supporting 3-D transforms.
    pub fn new() -> Self {
        Self::with_style_properties(MODERN_STYLE_PROPERTIES.iter().copied())
    }

    /// A document whose body style exposes exactly `properties`.
    pub fn with_style_properties<'a>(properties: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            body: Mutex::new(Vec::new()),
            style_properties: Mutex::new(properties.into_iter().map(String::from).collect()),
            layout_flushes: AtomicUsize::new(0),
            changes: Mutex::new(Vec::new()),
            created: Instant::now(),
        }
    }

    /// Change the style properties the body exposes from now on.
    pub fn set_style_properties<'a>(&self, properties: impl IntoIterator<Item = &'a str>) {
        *lock(&self.style_properties) = properties.into_iter().map(String::from).collect();
    }

    /// Snapshot of the element matching `selector`.
    pub fn find(&self, selector: &Selector<'_>) -> Option<Node> {
        let mut body = lock(&self.body);
        find_mut(&mut body, selector).map(|node| node.clone())
    }

    /// Number of attached elements matching `selector`.
    pub fn count(&self, selector: &Selector<'_>) -> usize {
        count(&lock(&self.body), selector)
    }

    pub fn style_of(&self, selector: &Selector<'_>, property: &str) -> Option<String> {
        self.find(selector)
            .and_then(|node| node.style(property).map(String::from))
    }

    pub fn layout_flushes(&self) -> usize {
        self.layout_flushes.load(Ordering::SeqCst)
    }

    pub fn style_changes(&self) -> Vec<StyleChange> {
        lock(&self.changes).clone()
    }

    fn record(&self, selector: &Selector<'_>, property: &str, value: &str) {
        let at_ms = self.created.elapsed().as_millis() as u64;
        lock(&self.changes).push(StyleChange {
            at_ms,
            selector: selector.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn contains(&self, selector: &Selector<'_>) -> bool {
        self.count(selector) > 0
    }

    fn append(&self, node: Node) {
        lock(&self.body).push(node);
    }

    fn remove(&self, selector: &Selector<'_>) -> bool {
        remove(&mut lock(&self.body), selector)
    }

    fn set_style(&self, selector: &Selector<'_>, property: &str, value: &str) -> bool {
        let updated = {
            let mut body = lock(&self.body);
            match find_mut(&mut body, selector) {
                Some(node) => {
                    node.set_style(property, value.to_string());
                    true
                }
                None => false,
            }
        };
        if updated {
            self.record(selector, property, value);
        }
        updated
    }

    fn flush_layout(&self, selector: &Selector<'_>) -> bool {
        if !self.contains(selector) {
            return false;
        }
        self.layout_flushes.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn supports_style(&self, property: &str) -> bool {
        lock(&self.style_properties).contains(property)
    }
}

fn matches(node: &Node, selector: &Selector<'_>) -> bool {
    match selector {
        Selector::Id(id) => node.matches_id(id),
        Selector::Role { .. } => false,
    }
}

fn find_mut<'n>(nodes: &'n mut [Node], selector: &Selector<'_>) -> Option<&'n mut Node> {
    if let Selector::Role { within, role } = selector {
        let container = find_mut(nodes, &Selector::Id(*within))?;
        return find_role_mut(&mut container.children, role);
    }
    for node in nodes.iter_mut() {
        if matches(node, selector) {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, selector) {
            return Some(found);
        }
    }
    None
}

fn find_role_mut<'n>(nodes: &'n mut [Node], role: &str) -> Option<&'n mut Node> {
    for node in nodes.iter_mut() {
        if node.matches_role(role) {
            return Some(node);
        }
        if let Some(found) = find_role_mut(&mut node.children, role) {
            return Some(found);
        }
    }
    None
}

fn count(nodes: &[Node], selector: &Selector<'_>) -> usize {
    match selector {
        Selector::Id(_) => nodes
            .iter()
            .map(|node| usize::from(matches(node, selector)) + count(&node.children, selector))
            .sum(),
        Selector::Role { within, role } => nodes
            .iter()
            .map(|node| {
                if node.matches_id(within) {
                    count_role(&node.children, role)
                } else {
                    count(&node.children, selector)
                }
            })
            .sum(),
    }
}

fn count_role(nodes: &[Node], role: &str) -> usize {
    nodes
        .iter()
        .map(|node| usize::from(node.matches_role(role)) + count_role(&node.children, role))
        .sum()
}

fn remove(nodes: &mut Vec<Node>, selector: &Selector<'_>) -> bool {
    if let Some(pos) = nodes.iter().position(|node| matches(node, selector)) {
        nodes.remove(pos);
        return true;
    }
    nodes
        .iter_mut()
        .any(|node| remove(&mut node.children, selector))
}

/// One session-history entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub url: String,
    pub state: Value,
}

/// Session history held in memory.
pub struct MemoryHistory {
    state: Mutex<SessionHistory>,
}

struct SessionHistory {
    past: Vec<(Url, Value)>,
    current: (Url, Value),
}

impl MemoryHistory {
    pub fn new(location: Url) -> Self {
        Self {
            state: Mutex::new(SessionHistory {
                past: Vec::new(),
                current: (location, Value::Null),
            }),
        }
    }

    /// All entries, oldest first; the last one is current.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let state = lock(&self.state);
        state
            .past
            .iter()
            .chain(std::iter::once(&state.current))
            .map(|(url, state)| HistoryEntry {
                url: url.to_string(),
                state: state.clone(),
            })
            .collect()
    }

    fn resolve(&self, url: Option<&str>) -> Result<Url> {
        let current = self.location();
        match url {
            Some(url) => to_absolute(url, &current),
            None => Ok(current),
        }
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Url {
        lock(&self.state).current.0.clone()
    }

    fn push_state(&self, state: Value, url: Option<&str>) -> Result<()> {
        let url = self.resolve(url)?;
        let mut session = lock(&self.state);
        let previous = std::mem::replace(&mut session.current, (url, state));
        session.past.push(previous);
        Ok(())
    }

    fn replace_state(&self, state: Value, url: Option<&str>) -> Result<()> {
        let url = self.resolve(url)?;
        lock(&self.state).current = (url, state);
        Ok(())
    }
}

/// A window over in-memory document and history, with typed handles to
/// both for inspection.
pub struct Headless {
    pub window: Arc<Window>,
    pub document: Arc<MemoryDocument>,
    pub history: Arc<MemoryHistory>,
}

impl Headless {
    pub fn new(location: &str) -> Result<Self> {
        Self::with_document(location, MemoryDocument::new())
    }

    pub fn with_document(location: &str, document: MemoryDocument) -> Result<Self> {
        let location = Url::parse(location).map_err(|source| LoaderError::InvalidUrl {
            url: location.to_string(),
            source,
        })?;
        let document = Arc::new(document);
        let history = Arc::new(MemoryHistory::new(location));
        let window = Window::new(document.clone(), history.clone());
        Ok(Self {
            window,
            document,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Selector<'static> = Selector::Id("box");
    const INNER: Selector<'static> = Selector::Role {
        within: "box",
        role: "fill",
    };

    fn tree() -> Node {
        Node::new("div")
            .with_id("box")
            .with_child(Node::new("div").with_role("fill").with_style("width", "10%"))
    }

    #[test]
    fn test_append_find_remove() {
        let doc = MemoryDocument::new();
        assert!(!doc.contains(&CONTAINER));
        doc.append(tree());
        assert_eq!(doc.count(&CONTAINER), 1);
        assert_eq!(doc.style_of(&INNER, "width").as_deref(), Some("10%"));
        assert!(doc.remove(&CONTAINER));
        assert!(!doc.contains(&INNER));
        assert!(!doc.remove(&CONTAINER));
    }

    #[test]
    fn test_set_style_missing_is_false() {
        let doc = MemoryDocument::new();
        assert!(!doc.set_style(&INNER, "width", "50%"));
        assert!(!doc.flush_layout(&CONTAINER));
        assert!(doc.style_changes().is_empty());
    }

    #[test]
    fn test_set_style_records_change() {
        let doc = MemoryDocument::new();
        doc.append(tree());
        assert!(doc.set_style(&INNER, "width", "50%"));
        assert!(doc.flush_layout(&CONTAINER));
        let changes = doc.style_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].selector, "#box [role=\"fill\"]");
        assert_eq!(changes[0].value, "50%");
        assert_eq!(doc.layout_flushes(), 1);
    }

    #[test]
    fn test_history_push_and_replace() {
        let history = MemoryHistory::new(Url::parse("https://example.com/a").unwrap());
        history.push_state(Value::Null, Some("/b?x=1")).unwrap();
        assert_eq!(history.location().as_str(), "https://example.com/b?x=1");
        history.replace_state(serde_json::json!({"k": 1}), Some("c")).unwrap();
        assert_eq!(history.location().as_str(), "https://example.com/c");
        history.push_state(Value::Null, None).unwrap();
        assert_eq!(history.entries().len(), 3);
        assert!(history.push_state(Value::Null, Some("http://[::1")).is_err());
    }

    #[test]
    fn test_headless_window_location() {
        let page = Headless::new("https://example.com/page").unwrap();
        assert_eq!(page.window.location().path(), "/page");
        page.window.push_state(Value::Null, Some("/next")).unwrap();
        assert_eq!(page.history.location().path(), "/next");
    }
}
