// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The system state hub and the lock it shares with its embedder.
//!
//! # Overview
//!
//! The [`SystemStateHub`] is the central component: it subscribes to the
//! platform, keeps the car-mode/projection flag current and fans events out
//! to listeners. It serialises its work on a [`SyncRoot`] supplied by the
//! embedder, so it takes part in the embedder's locking discipline instead
//! of owning a private lock.
//!
//! # Ordering
//!
//! - Events from one platform source are processed in arrival order.
//! - For every event, the cached flag is refreshed before listeners run.
//! - Listeners run synchronously, on the delivering thread, with the lock held.

mod sync_root;
mod system_state_hub;

pub use sync_root::SyncRoot;
pub use system_state_hub::SystemStateHub;
