// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-shot gates for the first sample of each sensor.
//!
//! A [`Gates`] pair is created per detection. The sensor thread opens a gate
//! when the first sample of its kind has been evaluated; the calling thread
//! waits for each gate with a deadline. An [`Interrupter`] lets a third
//! thread wake the waiter early.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Which gate to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateKind {
    Gravity,
    Proximity,
}

/// Result of waiting on a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateWait {
    Open,
    TimedOut,
    Interrupted,
}

#[derive(Debug, Default)]
struct GateState {
    gravity: bool,
    proximity: bool,
    interrupted: bool,
}

impl GateState {
    fn is_open(&self, kind: GateKind) -> bool {
        match kind {
            GateKind::Gravity => self.gravity,
            GateKind::Proximity => self.proximity,
        }
    }

    fn open(&mut self, kind: GateKind) {
        match kind {
            GateKind::Gravity => self.gravity = true,
            GateKind::Proximity => self.proximity = true,
        }
    }
}

/// The gravity and proximity gates of one detection.
#[derive(Debug, Default)]
pub(crate) struct Gates {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl Gates {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Runs `evaluate` and opens the gate, unless the gate is already open.
    ///
    /// Returns `true` if this call opened the gate. `evaluate` runs at most
    /// once per gate even when samples race each other.
    pub(crate) fn release_first(&self, kind: GateKind, evaluate: impl FnOnce()) -> bool {
        let mut state = self.state.lock();
        if state.is_open(kind) {
            return false;
        }
        evaluate();
        state.open(kind);
        drop(state);
        self.changed.notify_all();
        true
    }

    pub(crate) fn is_open(&self, kind: GateKind) -> bool {
        self.state.lock().is_open(kind)
    }

    /// Blocks until the gate opens, `timeout` elapses or the gates are interrupted.
    pub(crate) fn wait(&self, kind: GateKind, timeout: Duration) -> GateWait {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if state.interrupted {
                return GateWait::Interrupted;
            }
            if state.is_open(kind) {
                return GateWait::Open;
            }
            if self.changed.wait_until(&mut state, deadline).timed_out() {
                return if state.interrupted {
                    GateWait::Interrupted
                } else if state.is_open(kind) {
                    GateWait::Open
                } else {
                    GateWait::TimedOut
                };
            }
        }
    }

    /// Wakes every waiter with [`GateWait::Interrupted`].
    pub(crate) fn interrupt(&self) {
        self.state.lock().interrupted = true;
        self.changed.notify_all();
    }
}

#[derive(Debug, Default)]
struct InterruptState {
    requested: bool,
    armed: Vec<Weak<Gates>>,
}

/// Handle used to abort an in-progress ear detection from another thread.
///
/// Interruption is sticky: once [`interrupt`](Self::interrupt) has been
/// called, every detection run with this handle answers `false` right away.
/// Use a fresh handle per call when that is not wanted.
///
/// # Examples
///
/// ```
/// use telecom_state::sensor::Interrupter;
///
/// let interrupter = Interrupter::new();
/// let remote = interrupter.clone();
/// remote.interrupt();
/// assert!(interrupter.is_interrupted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interrupter {
    inner: Arc<Mutex<InterruptState>>,
}

impl Interrupter {
    /// Creates a handle that has not been interrupted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests interruption and wakes every detection waiting on this handle.
    pub fn interrupt(&self) {
        let mut state = self.inner.lock();
        state.requested = true;
        for gates in state.armed.iter().filter_map(Weak::upgrade) {
            gates.interrupt();
        }
    }

    /// Returns `true` once [`interrupt`](Self::interrupt) has been called.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.inner.lock().requested
    }

    /// Attaches the handle to the gates of a running detection.
    ///
    /// Several detections may be armed on one handle at the same time.
    pub(crate) fn arm(&self, gates: &Arc<Gates>) {
        let mut state = self.inner.lock();
        if state.requested {
            gates.interrupt();
        }
        state.armed.retain(|w| w.strong_count() > 0);
        state.armed.push(Arc::downgrade(gates));
    }

    /// Detaches `gates`, leaving other detections armed.
    pub(crate) fn disarm(&self, gates: &Arc<Gates>) {
        self.inner
            .lock()
            .armed
            .retain(|w| w.strong_count() > 0 && !std::ptr::eq(w.as_ptr(), Arc::as_ptr(gates)));
    }

    #[cfg(test)]
    fn armed_count(&self) -> usize {
        self.inner.lock().armed.len()
    }
}
