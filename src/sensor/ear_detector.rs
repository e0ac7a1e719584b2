// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best-effort "is the handset at the user's ear" check.
//!
//! The detector listens to the gravity and proximity sensors for a short
//! window and only looks at the first sample of each. The device counts as
//! at the ear when:
//!
//! - the proximity sensor reports something closer than its maximum range,
//! - gravity in the screen plane, `sqrt(x² + y²)`, is at least
//!   `xy_gravity_threshold`, and
//! - the y component of gravity is at least `y_gravity_negative_threshold`.
//!
//! Anything else, including a missing sensor or a sample that does not arrive
//! in time, answers `false`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::EarDetectorConfig;
use crate::error::SensorError;
use crate::platform::SystemServices;

use super::gate::{GateKind, GateWait, Gates, Interrupter};
use super::{SamplingRate, SensorEvent, SensorEventListener, SensorManager, SensorType};

/// Runs the on-ear heuristic against a sensor service.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use telecom_state::config::EarDetectorConfig;
/// use telecom_state::sensor::{EarDetector, SensorManager};
///
/// # fn example(sensors: Arc<dyn SensorManager>) {
/// let detector = EarDetector::new(Some(sensors), EarDetectorConfig::default());
/// if detector.detect() {
///     println!("handset is at the ear");
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct EarDetector {
    sensors: Option<Arc<dyn SensorManager>>,
    config: EarDetectorConfig,
}

impl EarDetector {
    /// Creates a detector. A `None` sensor service makes every call answer `false`.
    #[must_use]
    pub fn new(sensors: Option<Arc<dyn SensorManager>>, config: EarDetectorConfig) -> Self {
        Self { sensors, config }
    }

    /// Creates a detector using the platform's sensor service.
    #[must_use]
    pub fn from_services(services: &dyn SystemServices, config: EarDetectorConfig) -> Self {
        Self::new(services.sensor_manager(), config)
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &EarDetectorConfig {
        &self.config
    }

    /// Returns whether the device is probably held to the ear.
    ///
    /// Blocks for up to twice the configured gate timeout.
    #[must_use]
    pub fn detect(&self) -> bool {
        self.detect_interruptible(&Interrupter::new())
    }

    /// Like [`detect`](Self::detect), but answers `false` as soon as
    /// `interrupter` is triggered.
    #[must_use]
    pub fn detect_interruptible(&self, interrupter: &Interrupter) -> bool {
        match self.try_detect(interrupter) {
            Ok(at_ear) => at_ear,
            Err(SensorError::TimedOut { gravity, proximity }) => {
                tracing::warn!(gravity, proximity, "Timed out waiting for sensors");
                false
            }
            Err(SensorError::Interrupted) => {
                tracing::debug!("Ear detection interrupted");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ear detection unavailable");
                false
            }
        }
    }

    /// Runs the detection and reports why it could not answer.
    ///
    /// The sample listener is unregistered before this returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns a [`SensorError`] when a sensor is missing, registration is
    /// refused, a first sample does not arrive in time, or the wait is
    /// interrupted.
    pub fn try_detect(&self, interrupter: &Interrupter) -> Result<bool, SensorError> {
        let sensors = self.sensors.as_ref().ok_or(SensorError::ServiceUnavailable)?;
        let gravity = sensors
            .default_sensor(SensorType::Gravity)
            .ok_or(SensorError::Unavailable(SensorType::Gravity))?;
        let proximity = sensors
            .default_sensor(SensorType::Proximity)
            .ok_or(SensorError::Unavailable(SensorType::Proximity))?;

        let query = Arc::new(EarQuery::new(&self.config, proximity.maximum_range()));
        let listener: Arc<dyn SensorEventListener> = query.clone();
        let _registration = Registration {
            sensors: sensors.as_ref(),
            listener: Arc::clone(&listener),
        };

        for sensor in [&gravity, &proximity] {
            if !sensors.register_listener(Arc::clone(&listener), sensor, SamplingRate::Fastest) {
                return Err(SensorError::RegistrationRejected(sensor.sensor_type()));
            }
        }

        interrupter.arm(&query.gates);
        let outcome = query.await_result(self.config.gate_timeout);
        interrupter.disarm(&query.gates);
        outcome
    }
}

impl std::fmt::Debug for EarDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EarDetector")
            .field("has_sensors", &self.sensors.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Unregisters the sample listener when dropped.
struct Registration<'a> {
    sensors: &'a dyn SensorManager,
    listener: Arc<dyn SensorEventListener>,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.sensors.unregister_listener(&self.listener);
        tracing::trace!("Unregistered ear detection listener");
    }
}

/// Per-call state: gates, thresholds and the running answer.
struct EarQuery {
    gates: Arc<Gates>,
    at_ear: AtomicBool,
    xy_gravity_threshold: f64,
    y_gravity_negative_threshold: f64,
    proximity_max_range: f32,
}

impl EarQuery {
    fn new(config: &EarDetectorConfig, proximity_max_range: f32) -> Self {
        Self {
            gates: Arc::new(Gates::new()),
            at_ear: AtomicBool::new(true),
            xy_gravity_threshold: config.xy_gravity_threshold,
            y_gravity_negative_threshold: config.y_gravity_negative_threshold,
            proximity_max_range,
        }
    }

    fn on_gravity(&self, values: &[f32]) {
        let [x, y, ..] = values else {
            tracing::warn!(len = values.len(), "Ignoring short gravity sample");
            return;
        };
        let (x, y) = (f64::from(*x), f64::from(*y));
        self.gates.release_first(GateKind::Gravity, || {
            let xy_magnitude = x.hypot(y);
            // Written as the accepting condition so NaN readings or thresholds reject.
            let upright = xy_magnitude >= self.xy_gravity_threshold
                && y >= self.y_gravity_negative_threshold;
            if !upright {
                self.at_ear.store(false, Ordering::SeqCst);
            }
            tracing::trace!(xy_magnitude, y, "First gravity sample");
        });
    }

    fn on_proximity(&self, values: &[f32]) {
        let Some(&distance) = values.first() else {
            tracing::warn!("Ignoring empty proximity sample");
            return;
        };
        self.gates.release_first(GateKind::Proximity, || {
            let occluded = distance < self.proximity_max_range;
            if !occluded {
                self.at_ear.store(false, Ordering::SeqCst);
            }
            tracing::trace!(
                distance,
                max_range = self.proximity_max_range,
                "First proximity sample"
            );
        });
    }

    /// Waits for both gates in turn, each for at most `timeout`.
    fn await_result(&self, timeout: Duration) -> Result<bool, SensorError> {
        let gravity = self.gates.wait(GateKind::Gravity, timeout);
        if gravity == GateWait::Interrupted {
            return Err(SensorError::Interrupted);
        }
        let proximity = self.gates.wait(GateKind::Proximity, timeout);
        if proximity == GateWait::Interrupted {
            return Err(SensorError::Interrupted);
        }

        match (gravity, proximity) {
            (GateWait::Open, GateWait::Open) => Ok(self.at_ear.load(Ordering::SeqCst)),
            _ => Err(SensorError::TimedOut {
                gravity: gravity == GateWait::Open,
                proximity: proximity == GateWait::Open,
            }),
        }
    }
}

impl SensorEventListener for EarQuery {
    fn on_sensor_changed(&self, event: &SensorEvent) {
        match event.sensor_type {
            SensorType::Gravity => self.on_gravity(&event.values),
            SensorType::Proximity => self.on_proximity(&event.values),
            SensorType::Other(_) => {}
        }
    }
}
