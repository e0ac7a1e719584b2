// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Copy-on-write listener registry.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::DispatchError;
use crate::event::SystemStateEvent;

use super::SystemStateListener;

/// A shared handle to a listener.
///
/// Listeners are compared by identity: two handles are the same listener when
/// they point at the same allocation.
pub type ListenerHandle = Arc<dyn SystemStateListener>;

/// Snapshot of the registered listeners.
type Snapshot = Arc<Vec<ListenerHandle>>;

/// Registry of [`SystemStateListener`]s with snapshot iteration.
///
/// Every mutation builds a fresh list and swaps it in, so a dispatch in
/// progress keeps iterating the list it started with and never waits for a
/// writer. Writers only contend with each other, and only for the duration
/// of the swap.
///
/// # Thread Safety
///
/// The registry is fully thread-safe. A listener may add or remove listeners
/// (including itself) from inside a callback; the change applies from the
/// next dispatch.
pub struct ListenerRegistry {
    listeners: RwLock<Snapshot>,
}

impl ListenerRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Registers a listener.
    ///
    /// Returns `false` if the same listener was already registered, in which
    /// case nothing changes.
    pub fn add(&self, listener: ListenerHandle) -> bool {
        let mut guard = self.listeners.write();
        if guard.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(listener);
        *guard = Arc::new(next);
        true
    }

    /// Unregisters a listener.
    ///
    /// Returns `true` if the listener was registered.
    pub fn remove(&self, listener: &ListenerHandle) -> bool {
        let mut guard = self.listeners.write();
        let Some(position) = guard.iter().position(|l| same_listener(l, listener)) else {
            return false;
        };
        let mut next = Vec::clone(&**guard);
        next.remove(position);
        *guard = Arc::new(next);
        true
    }

    /// Returns `true` if the listener is registered.
    #[must_use]
    pub fn contains(&self, listener: &ListenerHandle) -> bool {
        self.listeners
            .read()
            .iter()
            .any(|l| same_listener(l, listener))
    }

    /// Removes every listener.
    pub fn clear(&self) {
        *self.listeners.write() = Arc::new(Vec::new());
    }

    /// Returns the listeners registered right now.
    ///
    /// The returned list is immutable; later mutations do not affect it.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.listeners.read())
    }

    /// Delivers an event to every listener in the current snapshot.
    ///
    /// Listeners are called synchronously in registration order. A panicking
    /// listener does not stop the others; each failure is logged and returned.
    pub fn dispatch(&self, event: &SystemStateEvent) -> Vec<DispatchError> {
        let snapshot = self.snapshot();
        let mut failures = Vec::new();

        for listener in snapshot.iter() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| event.notify(listener.as_ref())));
            if let Err(payload) = outcome {
                let err = DispatchError::ListenerPanicked {
                    callback: event.callback_name(),
                    message: panic_message(payload.as_ref()),
                };
                tracing::warn!(error = %err, "Listener failed, continuing fanout");
                failures.push(err);
            }
        }

        tracing::trace!(
            callback = event.callback_name(),
            listeners = snapshot.len(),
            failed = failures.len(),
            "Dispatched notification"
        );
        failures
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns `true` if there are no registered listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

/// Identity comparison on the data pointer, ignoring vtables.
fn same_listener(a: &ListenerHandle, b: &ListenerHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
