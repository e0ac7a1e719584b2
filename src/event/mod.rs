// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound platform events and outbound state notifications.
//!
//! Platform broadcasts arrive as loosely typed [`Broadcast`]s and are decoded
//! into [`InboundEvent`]s. Projection changes arrive separately and become a
//! [`ProjectionEvent`]. Whatever the hub accepts is fanned out as a
//! [`SystemStateEvent`], and mirrored on the [`EventBus`] as a
//! [`StateNotification`].
//!
//! # Examples
//!
//! ```
//! use telecom_state::event::{Broadcast, InboundEvent, SystemStateEvent};
//!
//! let inbound = InboundEvent::try_from(&Broadcast::package_removed("package:com.z")).unwrap();
//! let outbound = SystemStateEvent::from(inbound);
//! assert_eq!(outbound.callback_name(), "on_package_uninstalled");
//! ```

mod broadcast;
mod event_bus;
mod system_event;

pub use broadcast::{
    ACTION_ENTER_CAR_MODE_PRIORITIZED, ACTION_EXIT_CAR_MODE_PRIORITIZED, ACTION_PACKAGE_REMOVED,
    Broadcast, BroadcastFilter, PACKAGE_SCHEME, PackageUri, SYSTEM_HIGH_PRIORITY,
};
pub use event_bus::EventBus;
pub use system_event::{
    CarModeEvent, InboundEvent, PackageRemovedEvent, ProjectionEvent, StateNotification,
    SystemStateEvent,
};
