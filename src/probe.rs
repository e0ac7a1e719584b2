// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Query for the current car-mode / automotive-projection state.

use std::sync::Arc;

use crate::platform::SystemServices;
use crate::types::ProjectionTypes;

/// Asks the platform whether the device is in car mode or projecting to a car.
///
/// The probe keeps no state; every call goes to the mode service.
#[derive(Clone)]
pub struct SystemModeProbe {
    services: Arc<dyn SystemServices>,
}

impl SystemModeProbe {
    /// Creates a probe over the given services.
    #[must_use]
    pub fn new(services: Arc<dyn SystemServices>) -> Self {
        Self { services }
    }

    /// Returns `true` if the UI mode is car, or automotive projection is active.
    ///
    /// Answers `false` when the mode service is unavailable.
    #[must_use]
    pub fn is_car_mode_or_projection_active(&self) -> bool {
        let Some(modes) = self.services.mode_manager() else {
            tracing::warn!("Mode manager unavailable, reporting car mode inactive");
            return false;
        };
        modes.current_mode_type().is_car()
            || modes
                .active_projection_types()
                .contains(ProjectionTypes::AUTOMOTIVE)
    }
}

impl std::fmt::Debug for SystemModeProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemModeProbe").finish_non_exhaustive()
    }
}
