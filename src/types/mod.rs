// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the probe, the hub and the platform traits.
//!
//! # Types
//!
//! - [`ProjectionTypes`] - Bitmask of active projection types
//! - [`UiModeType`] - Device-wide UI mode (car, desk, normal, ...)
//! - [`CarModePriority`] - Priority carried by car-mode requests

mod projection;
mod ui_mode;

pub use projection::ProjectionTypes;
pub use ui_mode::{CarModePriority, UiModeType};
