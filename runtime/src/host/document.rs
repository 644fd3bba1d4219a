//! Document seam: the minimal DOM surface the engine mutates.

use serde::Serialize;
use std::fmt;

/// A detached element tree to be appended to the document body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub role: Option<String>,
    pub style: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            role: None,
            style: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn with_style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set_style(property, value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Current value of an inline style property.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style property, keeping declaration order.
    pub fn set_style(&mut self, property: &str, value: String) {
        match self.style.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value,
            None => self.style.push((property.to_string(), value)),
        }
    }

    pub(crate) fn matches_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub(crate) fn matches_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

/// Addresses an element without holding on to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `#id`
    Id(&'a str),
    /// `#within [role="role"]`
    Role { within: &'a str, role: &'a str },
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{id}"),
            Selector::Role { within, role } => write!(f, "#{within} [role=\"{role}\"]"),
        }
    }
}

/// The page document as seen by the progress engine.
///
/// Mutators return `false` when the addressed element is missing. Callers
/// treat that as a benign race with teardown, never as an error.
pub trait Document: Send + Sync {
    /// Whether an element matching `selector` is attached.
    fn contains(&self, selector: &Selector<'_>) -> bool;

    /// Append a node tree to the document body.
    fn append(&self, node: Node);

    /// Detach the element matching `selector`.
    fn remove(&self, selector: &Selector<'_>) -> bool;

    /// Set one inline style property.
    fn set_style(&self, selector: &Selector<'_>, property: &str, value: &str) -> bool;

    /// Force a synchronous layout of the element so the next style change
    /// animates from the current state instead of jumping.
    fn flush_layout(&self, selector: &Selector<'_>) -> bool;

    /// Whether the body style object exposes `property` (camelCase,
    /// vendor prefixes included, e.g. `WebkitPerspective`).
    fn supports_style(&self, property: &str) -> bool;
}
