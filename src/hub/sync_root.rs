// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The telecom-wide lock shared between the hub and its embedder.

use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// A cloneable handle to a re-entrant lock owned by the embedder.
///
/// Every clone refers to the same lock. The hub takes it around each event it
/// processes; the embedder takes it around its own state changes so the two
/// are serialised. Re-entrancy lets a listener call back into code that takes
/// the lock again on the same thread.
///
/// # Examples
///
/// ```
/// use telecom_state::hub::SyncRoot;
///
/// let root = SyncRoot::new();
/// let shared = root.clone();
///
/// let _outer = root.lock();
/// let _inner = shared.lock(); // same thread, no deadlock
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncRoot(Arc<ReentrantMutex<()>>);

impl SyncRoot {
    /// Creates a new, unlocked root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock, blocking until it is available.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.0.lock()
    }

    /// Returns `true` if any thread currently holds the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.0.is_locked()
    }

    /// Returns `true` if both handles refer to the same lock.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
