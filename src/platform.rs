// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collaborator traits for the host platform.
//!
//! Everything the crate needs from the operating system is reached through
//! these traits, so the hub and the detector can be driven by in-memory fakes
//! in tests and by real bindings in production.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::event::{Broadcast, BroadcastFilter};
use crate::sensor::SensorManager;
use crate::types::{ProjectionTypes, UiModeType};

/// Identifies a registration made with an [`EventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

impl RegistrationId {
    /// Creates a registration ID with the given value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reg({})", self.0)
    }
}

/// Read access to the platform UI mode service.
pub trait ModeManager: Send + Sync {
    /// Returns the current device-wide UI mode.
    fn current_mode_type(&self) -> UiModeType;

    /// Returns the projection types currently claimed.
    fn active_projection_types(&self) -> ProjectionTypes;
}

/// Receives broadcasts matching a [`BroadcastFilter`].
pub trait BroadcastReceiver: Send + Sync {
    /// Called once per matching broadcast, on an arbitrary thread.
    fn on_receive(&self, broadcast: &Broadcast);
}

/// Receives projection state changes.
pub trait ProjectionStateListener: Send + Sync {
    /// Called whenever the set of projecting packages changes.
    ///
    /// An empty set means no package projects.
    fn on_projection_state_changed(
        &self,
        active_projection_types: ProjectionTypes,
        projecting_packages: &BTreeSet<String>,
    );
}

/// Source of platform events.
pub trait EventSource: Send + Sync {
    /// Subscribes `receiver` to broadcasts matching `filter`.
    fn register_receiver(
        &self,
        filter: BroadcastFilter,
        receiver: Arc<dyn BroadcastReceiver>,
    ) -> RegistrationId;

    /// Subscribes `listener` to changes of the given projection types.
    fn add_projection_listener(
        &self,
        projection_types: ProjectionTypes,
        listener: Arc<dyn ProjectionStateListener>,
    ) -> RegistrationId;

    /// Cancels a registration. Unknown IDs are ignored.
    fn unregister(&self, id: RegistrationId);
}

/// Entry point to the platform services.
///
/// Services that may be missing on a given device return `Option`; callers
/// fall back to a conservative answer when they are absent.
pub trait SystemServices: Send + Sync {
    /// The UI mode service, if the device has one.
    fn mode_manager(&self) -> Option<Arc<dyn ModeManager>>;

    /// The sensor service, if the device has one.
    fn sensor_manager(&self) -> Option<Arc<dyn SensorManager>>;

    /// The event source the hub subscribes to.
    fn event_source(&self) -> Arc<dyn EventSource>;
}
