// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor descriptors, samples and the sensor service trait.

use std::fmt;
use std::sync::Arc;

/// Kinds of sensor the crate consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorType {
    /// Gravity vector in device coordinates (m/s²).
    Gravity,
    /// Distance to the nearest object (cm), saturating at the maximum range.
    Proximity,
    /// Any other sensor; samples of this type are ignored.
    Other(u32),
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gravity => f.write_str("gravity"),
            Self::Proximity => f.write_str("proximity"),
            Self::Other(id) => write!(f, "sensor#{id}"),
        }
    }
}

/// A hardware sensor as described by the sensor service.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    sensor_type: SensorType,
    name: String,
    maximum_range: f32,
}

impl Sensor {
    /// Describes a sensor.
    #[must_use]
    pub fn new(sensor_type: SensorType, name: impl Into<String>, maximum_range: f32) -> Self {
        Self {
            sensor_type,
            name: name.into(),
            maximum_range,
        }
    }

    /// Returns the sensor type.
    #[must_use]
    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    /// Returns the vendor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the maximum value the sensor reports.
    ///
    /// For a proximity sensor a reading at this value means "far".
    #[must_use]
    pub fn maximum_range(&self) -> f32 {
        self.maximum_range
    }
}

/// One reading from a sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEvent {
    /// Type of the sensor that produced the reading.
    pub sensor_type: SensorType,
    /// Raw values; their meaning depends on the sensor type.
    pub values: Vec<f32>,
}

impl SensorEvent {
    /// Creates a gravity reading.
    #[must_use]
    pub fn gravity(x: f32, y: f32, z: f32) -> Self {
        Self {
            sensor_type: SensorType::Gravity,
            values: vec![x, y, z],
        }
    }

    /// Creates a proximity reading.
    #[must_use]
    pub fn proximity(distance: f32) -> Self {
        Self {
            sensor_type: SensorType::Proximity,
            values: vec![distance],
        }
    }
}

/// Reported accuracy of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorAccuracy {
    /// Readings cannot be trusted.
    Unreliable,
    /// Low accuracy.
    Low,
    /// Medium accuracy.
    Medium,
    /// Maximum accuracy.
    High,
}

/// Requested delivery rate for samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplingRate {
    /// As fast as the hardware allows.
    Fastest,
    /// Rate suitable for games.
    Game,
    /// Rate suitable for UI updates.
    Ui,
    /// Default rate.
    #[default]
    Normal,
}

/// Receives sensor samples on a thread chosen by the sensor service.
pub trait SensorEventListener: Send + Sync {
    /// A new sample is available.
    fn on_sensor_changed(&self, event: &SensorEvent);

    /// The accuracy of a sensor changed.
    fn on_accuracy_changed(&self, _sensor: &Sensor, _accuracy: SensorAccuracy) {}
}

/// The platform sensor service.
pub trait SensorManager: Send + Sync {
    /// Returns the default sensor of the given type, if the device has one.
    fn default_sensor(&self, sensor_type: SensorType) -> Option<Sensor>;

    /// Starts delivering samples of `sensor` to `listener`.
    ///
    /// Returns `false` if the registration was refused.
    fn register_listener(
        &self,
        listener: Arc<dyn SensorEventListener>,
        sensor: &Sensor,
        rate: SamplingRate,
    ) -> bool;

    /// Stops delivering samples of every sensor to `listener`.
    fn unregister_listener(&self, listener: &Arc<dyn SensorEventListener>);
}
