// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener trait for system state notifications.

use crate::types::CarModePriority;

/// Receives car-mode, projection and package notifications from the hub.
///
/// Callbacks run synchronously on the delivering thread while the hub holds
/// the shared lock. They must not block on anything that waits for the hub.
/// Every method has an empty default body so implementors only override what
/// they care about.
///
/// # Examples
///
/// ```
/// use telecom_state::listener::SystemStateListener;
///
/// struct Uninstalls;
///
/// impl SystemStateListener for Uninstalls {
///     fn on_package_uninstalled(&self, package_name: &str) {
///         println!("{package_name} is gone");
///     }
/// }
/// ```
pub trait SystemStateListener: Send + Sync {
    /// A package asked to enter (`is_car_mode == true`) or exit car mode.
    fn on_car_mode_changed(
        &self,
        _priority: CarModePriority,
        _package_name: &str,
        _is_car_mode: bool,
    ) {
    }

    /// A package set automotive projection.
    fn on_automotive_projection_state_set(&self, _package_name: &str) {}

    /// Automotive projection was released.
    fn on_automotive_projection_state_released(&self) {}

    /// A package was uninstalled.
    fn on_package_uninstalled(&self, _package_name: &str) {}
}
