// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projection type bitmask.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Bitmask of projection types currently claimed on the device.
///
/// Only the automotive bit is interpreted by this crate; other bits are
/// carried through unchanged.
///
/// # Examples
///
/// ```
/// use telecom_state::types::ProjectionTypes;
///
/// let active = ProjectionTypes::AUTOMOTIVE;
/// assert!(active.contains(ProjectionTypes::AUTOMOTIVE));
/// assert!(!ProjectionTypes::NONE.contains(ProjectionTypes::AUTOMOTIVE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct ProjectionTypes(u32);

impl ProjectionTypes {
    /// No projection is active.
    pub const NONE: Self = Self(0);

    /// Automotive projection (a car head unit drives the UI).
    pub const AUTOMOTIVE: Self = Self(0x0000_0001);

    /// Creates a mask from its raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if any bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no projection type is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ProjectionTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for ProjectionTypes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for ProjectionTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
