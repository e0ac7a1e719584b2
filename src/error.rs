// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `telecom_state` library.
//!
//! Public operations of the hub, the probe and the ear detector never fail:
//! they log and fall back to a conservative answer. The errors below describe
//! the internal failure points and the configuration surface.

use thiserror::Error;

use crate::sensor::SensorType;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value was rejected.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// An inbound broadcast or configuration document could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The sensor protocol did not produce an answer.
    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// A listener failed while being notified.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors related to configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A threshold is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A timeout of zero would make every wait fail immediately.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Errors related to decoding inbound data.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The broadcast action is not one the hub handles.
    #[error("unexpected action: {0}")]
    UnknownAction(String),

    /// A package-removed broadcast arrived without a data URI.
    #[error("missing data URI for {0}")]
    MissingData(String),

    /// The data URI has no scheme-specific part.
    #[error("invalid package URI: {0}")]
    InvalidUri(String),

    /// JSON configuration parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while waiting for sensor samples.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor service itself is unavailable.
    #[error("sensor service unavailable")]
    ServiceUnavailable,

    /// No default sensor of the requested type exists.
    #[error("no default {0} sensor")]
    Unavailable(SensorType),

    /// The sensor service refused the sample listener.
    #[error("listener registration rejected for {0} sensor")]
    RegistrationRejected(SensorType),

    /// At least one sensor did not deliver a first sample in time.
    #[error("timed out waiting for sensors (gravity: {gravity}, proximity: {proximity})")]
    TimedOut {
        /// Whether the gravity sample arrived in time.
        gravity: bool,
        /// Whether the proximity sample arrived in time.
        proximity: bool,
    },

    /// The wait was interrupted by another thread.
    #[error("interrupted while waiting for sensors")]
    Interrupted,
}

/// Errors raised while fanning out notifications.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A listener panicked; siblings were still notified.
    #[error("listener panicked during {callback}: {message}")]
    ListenerPanicked {
        /// The callback that was running.
        callback: &'static str,
        /// The panic payload, when it was a string.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
