//! Toploader runtime: a navigation progress bar for client-side routed pages.
//!
//! A [`NavigationBinder`] mounted on a [`Window`] starts the bar when a
//! click on an anchor leads to a new page and completes it when the router
//! pushes or replaces a history entry. [`ProgressControl`] starts and stops
//! it manually. The [`ProgressEngine`] owns the bar itself: its position,
//! trickle, and fade-out, serialized through a [`Sequencer`].

pub mod binder;
pub mod cli;
pub mod control;
pub mod engine;
pub mod error;
pub mod host;
pub mod sequencer;
pub mod settings;
pub mod url_match;

pub use binder::NavigationBinder;
pub use control::ProgressControl;
pub use engine::ProgressEngine;
pub use error::{LoaderError, Result};
pub use host::Window;
pub use sequencer::Sequencer;
pub use settings::Settings;

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// A panic inside a listener must not take the loader down with it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
