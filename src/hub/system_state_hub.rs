// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The system state hub.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::config::SystemStateConfig;
use crate::error::ParseError;
use crate::event::{
    ACTION_ENTER_CAR_MODE_PRIORITIZED, ACTION_EXIT_CAR_MODE_PRIORITIZED, ACTION_PACKAGE_REMOVED,
    Broadcast, BroadcastFilter, EventBus, InboundEvent, PACKAGE_SCHEME, ProjectionEvent,
    SYSTEM_HIGH_PRIORITY, StateNotification, SystemStateEvent,
};
use crate::listener::{ListenerHandle, ListenerRegistry};
use crate::platform::{BroadcastReceiver, ProjectionStateListener, RegistrationId, SystemServices};
use crate::probe::SystemModeProbe;
use crate::sensor::{EarDetector, Interrupter};
use crate::types::ProjectionTypes;

use super::SyncRoot;

/// Aggregates car-mode, projection and package events for the telecom stack.
///
/// The hub subscribes to the platform when it is created, keeps a cached
/// "car mode or automotive projection active" flag, and forwards every
/// accepted event to its listeners and to its [`EventBus`].
///
/// All event processing happens under the embedder's [`SyncRoot`]. For a
/// given event the cached flag is refreshed before any listener runs, so
/// listeners reading [`is_car_mode_or_projection_active`] see the new value.
///
/// [`is_car_mode_or_projection_active`]: Self::is_car_mode_or_projection_active
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use telecom_state::hub::{SyncRoot, SystemStateHub};
/// use telecom_state::listener::SystemStateListener;
/// use telecom_state::platform::SystemServices;
///
/// struct Uninstalls;
/// impl SystemStateListener for Uninstalls {
///     fn on_package_uninstalled(&self, package_name: &str) {
///         println!("{package_name} removed");
///     }
/// }
///
/// # fn example(services: Arc<dyn SystemServices>) {
/// let hub = SystemStateHub::new(services, SyncRoot::new());
/// hub.add_listener(Arc::new(Uninstalls));
///
/// if hub.is_car_mode_or_projection_active() {
///     println!("driving");
/// }
/// # }
/// ```
pub struct SystemStateHub {
    services: Arc<dyn SystemServices>,
    probe: SystemModeProbe,
    lock: SyncRoot,
    listeners: ListenerRegistry,
    car_or_projection_active: AtomicBool,
    bus: EventBus,
    config: SystemStateConfig,
    registrations: Mutex<Vec<RegistrationId>>,
}

impl SystemStateHub {
    /// Creates a hub with default configuration and subscribes it to the platform.
    #[must_use]
    pub fn new(services: Arc<dyn SystemServices>, lock: SyncRoot) -> Arc<Self> {
        Self::with_config(services, lock, SystemStateConfig::default())
    }

    /// Creates a hub with the given configuration and subscribes it to the platform.
    ///
    /// Registers one receiver for the car-mode actions, one for removed
    /// packages and one projection listener, then seeds the cached flag from
    /// the platform. A configuration that fails
    /// [`validate`](SystemStateConfig::validate) is logged; non-finite
    /// thresholds make ear detection answer `false`.
    #[must_use]
    pub fn with_config(
        services: Arc<dyn SystemServices>,
        lock: SyncRoot,
        config: SystemStateConfig,
    ) -> Arc<Self> {
        if let Err(err) = config.validate() {
            tracing::warn!(
                error = %err,
                "Invalid configuration, ear detection will answer false"
            );
        }
        let hub = Arc::new(Self {
            probe: SystemModeProbe::new(Arc::clone(&services)),
            services,
            lock,
            listeners: ListenerRegistry::new(),
            car_or_projection_active: AtomicBool::new(false),
            bus: EventBus::new(),
            config,
            registrations: Mutex::new(Vec::new()),
        });
        hub.subscribe_to_platform();

        {
            let _guard = hub.lock.lock();
            hub.refresh_active_flag();
        }
        hub
    }

    fn subscribe_to_platform(self: &Arc<Self>) {
        let source = self.services.event_source();
        let receiver = Arc::new(HubReceiver {
            hub: Arc::downgrade(self),
        });

        let car_mode_filter = BroadcastFilter::new(ACTION_ENTER_CAR_MODE_PRIORITIZED)
            .with_action(ACTION_EXIT_CAR_MODE_PRIORITIZED)
            .with_priority(SYSTEM_HIGH_PRIORITY);
        let package_filter = BroadcastFilter::new(ACTION_PACKAGE_REMOVED)
            .with_data_scheme(PACKAGE_SCHEME)
            .with_priority(SYSTEM_HIGH_PRIORITY);

        let mut ids = Vec::with_capacity(3);
        for filter in [car_mode_filter, package_filter] {
            tracing::info!(%filter, "Registering broadcast receiver");
            ids.push(source.register_receiver(filter, receiver.clone()));
        }
        ids.push(source.add_projection_listener(ProjectionTypes::AUTOMOTIVE, receiver));

        self.registrations.lock().extend(ids);
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a listener.
    ///
    /// Adding the same listener twice has no effect; returns `false` then.
    pub fn add_listener(&self, listener: ListenerHandle) -> bool {
        let added = self.listeners.add(listener);
        tracing::debug!(added, count = self.listeners.listener_count(), "Add listener");
        added
    }

    /// Unregisters a listener, returning whether it was registered.
    pub fn remove_listener(&self, listener: &ListenerHandle) -> bool {
        let removed = self.listeners.remove(listener);
        tracing::debug!(removed, count = self.listeners.listener_count(), "Remove listener");
        removed
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }

    /// Subscribes to the async notification stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateNotification> {
        self.bus.subscribe()
    }

    // =========================================================================
    // State queries
    // =========================================================================

    /// Returns whether the device is in car mode or automotive projection.
    ///
    /// This reads the cached flag without taking the shared lock, so a caller
    /// racing an event may see the value from before that event.
    #[must_use]
    pub fn is_car_mode_or_projection_active(&self) -> bool {
        self.car_or_projection_active.load(Ordering::Acquire)
    }

    /// Returns whether the handset is probably held to the user's ear.
    ///
    /// Blocks the caller while the sensors are sampled.
    #[must_use]
    pub fn is_device_at_ear(&self) -> bool {
        self.ear_detector().detect()
    }

    /// Like [`is_device_at_ear`](Self::is_device_at_ear), aborted by `interrupter`.
    #[must_use]
    pub fn is_device_at_ear_interruptible(&self, interrupter: &Interrupter) -> bool {
        self.ear_detector().detect_interruptible(interrupter)
    }

    /// Builds an ear detector over this hub's sensor service and configuration.
    #[must_use]
    pub fn ear_detector(&self) -> EarDetector {
        EarDetector::from_services(self.services.as_ref(), self.config.ear_detection)
    }

    /// Returns the probe the cached flag is refreshed from.
    #[must_use]
    pub fn probe(&self) -> &SystemModeProbe {
        &self.probe
    }

    // =========================================================================
    // Event handling
    // =========================================================================

    /// Handles a platform broadcast.
    ///
    /// Car-mode and package-removed broadcasts are forwarded to listeners;
    /// anything else, or a package-removed broadcast without data, is logged
    /// and dropped.
    pub fn on_receive(&self, broadcast: &Broadcast) {
        let span = tracing::info_span!("system_state.on_receive", action = broadcast.action());
        let _entered = span.enter();
        let _guard = self.lock.lock();

        match InboundEvent::try_from(broadcast) {
            Ok(InboundEvent::CarMode(event)) => {
                tracing::info!(
                    priority = %event.priority,
                    package = %event.package_name,
                    entering = event.entering,
                    "Car mode request"
                );
                self.apply(SystemStateEvent::CarModeChanged(event));
            }
            Ok(InboundEvent::PackageRemoved(event)) => {
                tracing::debug!(package = %event.package_name, "Package removed");
                self.apply(SystemStateEvent::PackageUninstalled(event));
            }
            Err(ParseError::MissingData(_)) => {
                tracing::warn!("Got null data for package removed, ignoring");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Unexpected broadcast received, ignoring");
            }
        }
    }

    /// Handles a change of the automotive projection state.
    ///
    /// An empty package set releases projection; otherwise the first package
    /// of the set is reported as the projecting one.
    pub fn on_projection_state_changed(
        &self,
        active_projection_types: ProjectionTypes,
        projecting_packages: &BTreeSet<String>,
    ) {
        let span = tracing::info_span!(
            "system_state.on_projection_state_changed",
            types = %active_projection_types
        );
        let _entered = span.enter();
        let _guard = self.lock.lock();

        let event = ProjectionEvent::from_projecting_packages(projecting_packages);
        match &event {
            ProjectionEvent::Set { package_name } => {
                tracing::info!(
                    package = %package_name,
                    projecting = projecting_packages.len(),
                    "Automotive projection set"
                );
            }
            ProjectionEvent::Released => tracing::info!("Automotive projection released"),
        }
        self.apply(SystemStateEvent::Projection(event));
    }

    /// Refreshes the flag, then notifies listeners and the bus.
    ///
    /// Callers hold the shared lock.
    fn apply(&self, event: SystemStateEvent) {
        self.refresh_active_flag();

        let failures = self.listeners.dispatch(&event);
        if !failures.is_empty() {
            tracing::debug!(
                failed = failures.len(),
                callback = event.callback_name(),
                "Fanout finished with failures"
            );
        }

        self.bus.publish(StateNotification::now(
            event,
            self.is_car_mode_or_projection_active(),
        ));
    }

    fn refresh_active_flag(&self) {
        let active = self.probe.is_car_mode_or_projection_active();
        let previous = self.car_or_projection_active.swap(active, Ordering::AcqRel);
        if previous != active {
            tracing::debug!(active, "Car mode or projection state changed");
        }
    }
}

impl Drop for SystemStateHub {
    fn drop(&mut self) {
        let ids = std::mem::take(self.registrations.get_mut());
        if ids.is_empty() {
            return;
        }
        let source = self.services.event_source();
        for id in ids {
            source.unregister(id);
        }
        tracing::debug!("Unregistered system state hub from platform");
    }
}

impl std::fmt::Debug for SystemStateHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemStateHub")
            .field(
                "car_or_projection_active",
                &self.is_car_mode_or_projection_active(),
            )
            .field("listeners", &self.listeners)
            .field("registrations", &self.registrations.lock().len())
            .finish_non_exhaustive()
    }
}

/// Forwards platform callbacks to the hub without keeping it alive.
struct HubReceiver {
    hub: Weak<SystemStateHub>,
}

impl BroadcastReceiver for HubReceiver {
    fn on_receive(&self, broadcast: &Broadcast) {
        match self.hub.upgrade() {
            Some(hub) => hub.on_receive(broadcast),
            None => {
                tracing::trace!(action = broadcast.action(), "Hub dropped, ignoring broadcast");
            }
        }
    }
}

impl ProjectionStateListener for HubReceiver {
    fn on_projection_state_changed(
        &self,
        active_projection_types: ProjectionTypes,
        projecting_packages: &BTreeSet<String>,
    ) {
        match self.hub.upgrade() {
            Some(hub) => {
                hub.on_projection_state_changed(active_projection_types, projecting_packages);
            }
            None => tracing::trace!("Hub dropped, ignoring projection change"),
        }
    }
}
