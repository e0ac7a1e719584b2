// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor service abstraction and on-ear detection.
//!
//! - [`SensorManager`] / [`SensorEventListener`] - The platform sensor service
//! - [`EarDetector`] - Gravity + proximity heuristic with a bounded wait
//! - [`Interrupter`] - Aborts a detection from another thread

mod ear_detector;
mod gate;
mod types;

pub use ear_detector::EarDetector;
pub use gate::Interrupter;
pub use types::{
    SamplingRate, Sensor, SensorAccuracy, SensorEvent, SensorEventListener, SensorManager,
    SensorType,
};
