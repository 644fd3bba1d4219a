//! The page the loader runs in: document, history and events.
//!
//! Real hosts implement [`Document`] and [`History`]; [`memory`] provides
//! the headless implementation.

pub mod document;
pub mod events;
pub mod history;
pub mod memory;
pub mod window;

pub use document::{Document, Node, Selector};
pub use events::{
    ClickEvent, ElementInfo, Event, EventKind, EventTarget, HistoryChange, ListenerId,
    ProgressSignal,
};
pub use history::History;
pub use memory::{Headless, MemoryDocument, MemoryHistory};
pub use window::Window;
