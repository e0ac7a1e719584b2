// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory platform used by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use telecom_state::SystemStateListener;
use telecom_state::event::{Broadcast, BroadcastFilter};
use telecom_state::platform::{
    BroadcastReceiver, EventSource, ModeManager, ProjectionStateListener, RegistrationId,
    SystemServices,
};
use telecom_state::sensor::{
    SamplingRate, Sensor, SensorEvent, SensorEventListener, SensorManager, SensorType,
};
use telecom_state::types::{CarModePriority, ProjectionTypes, UiModeType};

// ============================================================================
// Mode manager
// ============================================================================

#[derive(Default)]
pub struct FakeModes {
    mode: Mutex<UiModeType>,
    projection: Mutex<ProjectionTypes>,
}

impl FakeModes {
    pub fn set_mode(&self, mode: UiModeType) {
        *self.mode.lock() = mode;
    }

    pub fn set_projection(&self, projection: ProjectionTypes) {
        *self.projection.lock() = projection;
    }
}

impl ModeManager for FakeModes {
    fn current_mode_type(&self) -> UiModeType {
        *self.mode.lock()
    }

    fn active_projection_types(&self) -> ProjectionTypes {
        *self.projection.lock()
    }
}

// ============================================================================
// Event source
// ============================================================================

enum Registration {
    Receiver(BroadcastFilter, Arc<dyn BroadcastReceiver>),
    Projection(ProjectionTypes, Arc<dyn ProjectionStateListener>),
}

#[derive(Default)]
pub struct FakeEventSource {
    next_id: AtomicU64,
    registrations: Mutex<Vec<(RegistrationId, Registration)>>,
}

impl FakeEventSource {
    /// Delivers a broadcast to every receiver whose filter matches it.
    pub fn send_broadcast(&self, broadcast: &Broadcast) {
        let receivers: Vec<Arc<dyn BroadcastReceiver>> = self
            .registrations
            .lock()
            .iter()
            .filter_map(|(_, reg)| match reg {
                Registration::Receiver(filter, receiver) if filter.matches(broadcast) => {
                    Some(Arc::clone(receiver))
                }
                _ => None,
            })
            .collect();
        for receiver in receivers {
            receiver.on_receive(broadcast);
        }
    }

    /// Delivers a projection change to listeners of the matching types.
    pub fn send_projection(&self, active: ProjectionTypes, packages: &[&str]) {
        let packages: BTreeSet<String> = packages.iter().map(ToString::to_string).collect();
        let listeners: Vec<Arc<dyn ProjectionStateListener>> = self
            .registrations
            .lock()
            .iter()
            .filter_map(|(_, reg)| match reg {
                Registration::Projection(_, listener) => Some(Arc::clone(listener)),
                Registration::Receiver(..) => None,
            })
            .collect();
        for listener in listeners {
            listener.on_projection_state_changed(active, &packages);
        }
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.lock().len()
    }

    pub fn filters(&self) -> Vec<BroadcastFilter> {
        self.registrations
            .lock()
            .iter()
            .filter_map(|(_, reg)| match reg {
                Registration::Receiver(filter, _) => Some(filter.clone()),
                Registration::Projection(..) => None,
            })
            .collect()
    }

    pub fn projection_types(&self) -> Vec<ProjectionTypes> {
        self.registrations
            .lock()
            .iter()
            .filter_map(|(_, reg)| match reg {
                Registration::Projection(types, _) => Some(*types),
                Registration::Receiver(..) => None,
            })
            .collect()
    }

    fn register(&self, registration: Registration) -> RegistrationId {
        let id = RegistrationId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.registrations.lock().push((id, registration));
        id
    }
}

impl EventSource for FakeEventSource {
    fn register_receiver(
        &self,
        filter: BroadcastFilter,
        receiver: Arc<dyn BroadcastReceiver>,
    ) -> RegistrationId {
        self.register(Registration::Receiver(filter, receiver))
    }

    fn add_projection_listener(
        &self,
        projection_types: ProjectionTypes,
        listener: Arc<dyn ProjectionStateListener>,
    ) -> RegistrationId {
        self.register(Registration::Projection(projection_types, listener))
    }

    fn unregister(&self, id: RegistrationId) {
        self.registrations.lock().retain(|(rid, _)| *rid != id);
    }
}

// ============================================================================
// Sensors
// ============================================================================

/// Sensor service that replays scripted samples on a background thread.
pub struct FakeSensors {
    sensors: HashMap<SensorType, Sensor>,
    samples: HashMap<SensorType, Vec<SensorEvent>>,
    delay: Duration,
    panic_on_register: bool,
    active: Arc<Mutex<Vec<Arc<dyn SensorEventListener>>>>,
    pub registrations: AtomicUsize,
    pub unregistrations: AtomicUsize,
}

impl FakeSensors {
    /// Gravity and proximity sensors; proximity saturates at 5.0.
    pub fn new() -> Self {
        let mut sensors = HashMap::new();
        sensors.insert(
            SensorType::Gravity,
            Sensor::new(SensorType::Gravity, "fake-gravity", 19.6),
        );
        sensors.insert(
            SensorType::Proximity,
            Sensor::new(SensorType::Proximity, "fake-proximity", 5.0),
        );
        Self {
            sensors,
            samples: HashMap::new(),
            delay: Duration::from_millis(5),
            panic_on_register: false,
            active: Arc::new(Mutex::new(Vec::new())),
            registrations: AtomicUsize::new(0),
            unregistrations: AtomicUsize::new(0),
        }
    }

    pub fn without(mut self, sensor_type: SensorType) -> Self {
        self.sensors.remove(&sensor_type);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes `register_listener` panic, as a faulty sensor service might.
    pub fn with_panicking_registration(mut self) -> Self {
        self.panic_on_register = true;
        self
    }

    pub fn with_sample(mut self, event: SensorEvent) -> Self {
        self.samples
            .entry(event.sensor_type)
            .or_default()
            .push(event);
        self
    }

    pub fn active_listeners(&self) -> usize {
        self.active.lock().len()
    }
}

fn is_active(
    active: &Mutex<Vec<Arc<dyn SensorEventListener>>>,
    listener: &Arc<dyn SensorEventListener>,
) -> bool {
    active
        .lock()
        .iter()
        .any(|l| std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)))
}

impl SensorManager for FakeSensors {
    fn default_sensor(&self, sensor_type: SensorType) -> Option<Sensor> {
        self.sensors.get(&sensor_type).cloned()
    }

    fn register_listener(
        &self,
        listener: Arc<dyn SensorEventListener>,
        sensor: &Sensor,
        _rate: SamplingRate,
    ) -> bool {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        assert!(!self.panic_on_register, "sensor service failure");
        if !is_active(&self.active, &listener) {
            self.active.lock().push(Arc::clone(&listener));
        }

        let samples = self
            .samples
            .get(&sensor.sensor_type())
            .cloned()
            .unwrap_or_default();
        let active = Arc::clone(&self.active);
        let delay = self.delay;
        thread::spawn(move || {
            thread::sleep(delay);
            for sample in samples {
                if is_active(&active, &listener) {
                    listener.on_sensor_changed(&sample);
                }
            }
        });
        true
    }

    fn unregister_listener(&self, listener: &Arc<dyn SensorEventListener>) {
        self.unregistrations.fetch_add(1, Ordering::SeqCst);
        self.active
            .lock()
            .retain(|l| !std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)));
    }
}

// ============================================================================
// Services
// ============================================================================

pub struct FakeServices {
    pub modes: Option<Arc<FakeModes>>,
    pub sensors: Option<Arc<FakeSensors>>,
    pub source: Arc<FakeEventSource>,
}

impl FakeServices {
    pub fn new() -> Arc<Self> {
        Self::build(Some(Arc::new(FakeModes::default())), None)
    }

    pub fn with_sensors(sensors: FakeSensors) -> Arc<Self> {
        Self::build(Some(Arc::new(FakeModes::default())), Some(Arc::new(sensors)))
    }

    pub fn without_mode_manager() -> Arc<Self> {
        Self::build(None, None)
    }

    fn build(modes: Option<Arc<FakeModes>>, sensors: Option<Arc<FakeSensors>>) -> Arc<Self> {
        Arc::new(Self {
            modes,
            sensors,
            source: Arc::new(FakeEventSource::default()),
        })
    }

    pub fn modes(&self) -> &FakeModes {
        self.modes.as_deref().expect("mode manager configured")
    }

    pub fn sensors(&self) -> &Arc<FakeSensors> {
        self.sensors.as_ref().expect("sensors configured")
    }
}

impl SystemServices for FakeServices {
    fn mode_manager(&self) -> Option<Arc<dyn ModeManager>> {
        self.modes
            .as_ref()
            .map(|m| Arc::clone(m) as Arc<dyn ModeManager>)
    }

    fn sensor_manager(&self) -> Option<Arc<dyn SensorManager>> {
        self.sensors
            .as_ref()
            .map(|s| Arc::clone(s) as Arc<dyn SensorManager>)
    }

    fn event_source(&self) -> Arc<dyn EventSource> {
        Arc::clone(&self.source) as Arc<dyn EventSource>
    }
}

// ============================================================================
// Listener
// ============================================================================

/// A notification as seen by [`RecordingListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CarMode(i32, String, bool),
    ProjectionSet(String),
    ProjectionReleased,
    Uninstalled(String),
}

#[derive(Default)]
pub struct RecordingListener {
    calls: Mutex<Vec<Call>>,
}

impl RecordingListener {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl SystemStateListener for RecordingListener {
    fn on_car_mode_changed(
        &self,
        priority: CarModePriority,
        package_name: &str,
        is_car_mode: bool,
    ) {
        self.calls.lock().push(Call::CarMode(
            priority.value(),
            package_name.to_string(),
            is_car_mode,
        ));
    }

    fn on_automotive_projection_state_set(&self, package_name: &str) {
        self.calls
            .lock()
            .push(Call::ProjectionSet(package_name.to_string()));
    }

    fn on_automotive_projection_state_released(&self) {
        self.calls.lock().push(Call::ProjectionReleased);
    }

    fn on_package_uninstalled(&self, package_name: &str) {
        self.calls
            .lock()
            .push(Call::Uninstalled(package_name.to_string()));
    }
}
