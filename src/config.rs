// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for the hub and the ear detector.
//!
//! The ear-detection thresholds keep the names of the platform resources they
//! are normally read from, so a JSON document like the one below maps onto
//! [`SystemStateConfig`] directly:
//!
//! ```
//! use telecom_state::config::SystemStateConfig;
//!
//! let config = SystemStateConfig::from_json(r#"{
//!     "ear_detection": {
//!         "device_on_ear_xy_gravity_threshold": 5.5,
//!         "device_on_ear_y_gravity_negative_threshold": -1.0
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(config.ear_detection.xy_gravity_threshold, 5.5);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result, ValueError};

/// Default minimum in-plane gravity magnitude (m/s²) for an at-ear posture.
pub const DEFAULT_XY_GRAVITY_THRESHOLD: f64 = 5.5;

/// Default lower bound on the y gravity component (m/s²).
pub const DEFAULT_Y_GRAVITY_NEGATIVE_THRESHOLD: f64 = -1.0;

/// Default time to wait for the first sample of each sensor.
pub const DEFAULT_GATE_TIMEOUT: Duration = Duration::from_millis(100);

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStateConfig {
    /// Ear-detection thresholds and timing.
    pub ear_detection: EarDetectorConfig,
}

impl SystemStateConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] for malformed JSON and a [`ValueError`]
    /// for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the ear-detection configuration.
    #[must_use]
    pub fn with_ear_detection(mut self, ear_detection: EarDetectorConfig) -> Self {
        self.ear_detection = ear_detection;
        self
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValueError`] found.
    pub fn validate(&self) -> std::result::Result<(), ValueError> {
        self.ear_detection.validate()
    }
}

/// Thresholds and timing for the on-ear heuristic.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use telecom_state::config::EarDetectorConfig;
///
/// let config = EarDetectorConfig::default()
///     .with_xy_gravity_threshold(1.0)
///     .with_y_gravity_negative_threshold(0.0)
///     .with_gate_timeout(Duration::from_millis(50));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarDetectorConfig {
    /// Minimum magnitude of gravity in the screen plane (m/s²).
    #[serde(rename = "device_on_ear_xy_gravity_threshold")]
    pub xy_gravity_threshold: f64,
    /// Below this y gravity component the device is not at the ear (m/s²).
    #[serde(rename = "device_on_ear_y_gravity_negative_threshold")]
    pub y_gravity_negative_threshold: f64,
    /// How long to wait for the first sample of each sensor.
    #[serde(rename = "gate_timeout_ms", with = "duration_millis")]
    pub gate_timeout: Duration,
}

impl Default for EarDetectorConfig {
    fn default() -> Self {
        Self {
            xy_gravity_threshold: DEFAULT_XY_GRAVITY_THRESHOLD,
            y_gravity_negative_threshold: DEFAULT_Y_GRAVITY_NEGATIVE_THRESHOLD,
            gate_timeout: DEFAULT_GATE_TIMEOUT,
        }
    }
}

impl EarDetectorConfig {
    /// Sets the in-plane gravity threshold.
    #[must_use]
    pub fn with_xy_gravity_threshold(mut self, threshold: f64) -> Self {
        self.xy_gravity_threshold = threshold;
        self
    }

    /// Sets the negative y gravity threshold.
    #[must_use]
    pub fn with_y_gravity_negative_threshold(mut self, threshold: f64) -> Self {
        self.y_gravity_negative_threshold = threshold;
        self
    }

    /// Sets the per-sensor wait.
    #[must_use]
    pub fn with_gate_timeout(mut self, timeout: Duration) -> Self {
        self.gate_timeout = timeout;
        self
    }

    /// Checks that thresholds are finite and the timeout is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NonFinite`] or [`ValueError::ZeroTimeout`].
    pub fn validate(&self) -> std::result::Result<(), ValueError> {
        if !self.xy_gravity_threshold.is_finite() {
            return Err(ValueError::NonFinite {
                name: "device_on_ear_xy_gravity_threshold",
                value: self.xy_gravity_threshold,
            });
        }
        if !self.y_gravity_negative_threshold.is_finite() {
            return Err(ValueError::NonFinite {
                name: "device_on_ear_y_gravity_negative_threshold",
                value: self.y_gravity_negative_threshold,
            });
        }
        if self.gate_timeout.is_zero() {
            return Err(ValueError::ZeroTimeout("gate_timeout_ms"));
        }
        Ok(())
    }
}

/// Serde support for `Duration` as whole milliseconds.
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
