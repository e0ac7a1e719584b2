// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener registration and fanout.
//!
//! # Overview
//!
//! - [`SystemStateListener`] - Trait implemented by interested parties
//! - [`ListenerRegistry`] - Copy-on-write set of listeners with panic-isolated dispatch
//! - [`ListenerHandle`] - Shared, identity-compared listener handle
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use telecom_state::listener::{ListenerHandle, ListenerRegistry, SystemStateListener};
//!
//! struct Quiet;
//! impl SystemStateListener for Quiet {}
//!
//! let registry = ListenerRegistry::new();
//! let listener: ListenerHandle = Arc::new(Quiet);
//!
//! assert!(registry.add(Arc::clone(&listener)));
//! assert!(registry.remove(&listener));
//! assert!(!registry.remove(&listener));
//! ```

mod registry;
mod system_state_listener;

pub use registry::{ListenerHandle, ListenerRegistry};
pub use system_state_listener::SystemStateListener;
