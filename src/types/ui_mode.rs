// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UI mode types and car-mode priorities.

use std::fmt;

/// The device-wide UI mode type reported by the mode manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum UiModeType {
    /// No specific mode has been set.
    #[default]
    Undefined,
    /// Regular handset UI.
    Normal,
    /// Desk dock UI.
    Desk,
    /// Automotive UI (car mode).
    Car,
    /// Television UI.
    Television,
    /// Appliance UI without a display.
    Appliance,
    /// Wrist-worn device UI.
    Watch,
    /// Virtual reality headset UI.
    VrHeadset,
}

impl UiModeType {
    /// Returns `true` for the automotive variant.
    #[must_use]
    pub const fn is_car(self) -> bool {
        matches!(self, Self::Car)
    }
}

/// Priority attached to a car-mode enter/exit request.
///
/// The value is supplied by the requesting package and passed through
/// unchanged. Requests that carry no priority use [`CarModePriority::DEFAULT`].
///
/// # Examples
///
/// ```
/// use telecom_state::types::CarModePriority;
///
/// assert_eq!(CarModePriority::default(), CarModePriority::DEFAULT);
/// assert_eq!(CarModePriority::new(100).value(), 100);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CarModePriority(i32);

impl CarModePriority {
    /// Priority used when a request does not specify one.
    pub const DEFAULT: Self = Self(0);

    /// Wraps a raw priority.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw priority.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Default for CarModePriority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for CarModePriority {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for CarModePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
