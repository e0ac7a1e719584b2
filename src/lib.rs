// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `telecom_state` - Device state for a telecom stack.
//!
//! This library tells a telephony stack three things about the device it runs
//! on:
//!
//! - whether the device is in car mode or under automotive projection,
//! - when a package enters or leaves car mode, gains or releases projection,
//!   or is uninstalled,
//! - whether the handset is probably held to the user's ear.
//!
//! The host platform is reached through the traits in [`platform`] and
//! [`sensor`], so the library runs unchanged against real bindings or
//! in-memory fakes.
//!
//! # Components
//!
//! - [`SystemStateHub`] - Subscribes to platform events, caches the
//!   car-mode/projection flag and notifies listeners
//! - [`SystemModeProbe`] - Stateless query of the current mode
//! - [`EarDetector`] - Gravity + proximity heuristic with a bounded wait
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use telecom_state::{SyncRoot, SystemStateHub, SystemStateListener};
//! use telecom_state::platform::SystemServices;
//! use telecom_state::types::CarModePriority;
//!
//! struct CarModeLogger;
//!
//! impl SystemStateListener for CarModeLogger {
//!     fn on_car_mode_changed(&self, priority: CarModePriority, package: &str, entering: bool) {
//!         println!("{package} (priority {priority}) car mode: {entering}");
//!     }
//! }
//!
//! # fn example(services: Arc<dyn SystemServices>) {
//! let lock = SyncRoot::new();
//! let hub = SystemStateHub::new(services, lock.clone());
//! hub.add_listener(Arc::new(CarModeLogger));
//!
//! if hub.is_car_mode_or_projection_active() && !hub.is_device_at_ear() {
//!     println!("route the call to the car");
//! }
//! # }
//! ```
//!
//! # Async consumers
//!
//! Every notification is also published on a broadcast channel:
//!
//! ```ignore
//! let mut rx = hub.subscribe();
//! while let Ok(notification) = rx.recv().await {
//!     println!("{:?} active={}", notification.event, notification.car_or_projection_active);
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod hub;
pub mod listener;
pub mod platform;
mod probe;
pub mod sensor;
pub mod types;

pub use config::{EarDetectorConfig, SystemStateConfig};
pub use error::{DispatchError, Error, ParseError, Result, SensorError, ValueError};
pub use event::{
    Broadcast, CarModeEvent, EventBus, PackageRemovedEvent, ProjectionEvent, StateNotification,
    SystemStateEvent,
};
pub use hub::{SyncRoot, SystemStateHub};
pub use listener::{ListenerHandle, ListenerRegistry, SystemStateListener};
pub use probe::SystemModeProbe;
pub use sensor::{EarDetector, Interrupter};
pub use types::{CarModePriority, ProjectionTypes, UiModeType};
