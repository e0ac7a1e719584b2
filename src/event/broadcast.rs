// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform broadcasts and the filters used to subscribe to them.

use std::fmt;

use crate::error::ParseError;

/// A package asked the device to enter car mode.
pub const ACTION_ENTER_CAR_MODE_PRIORITIZED: &str = "enter_car_mode_prioritized";

/// A package asked the device to leave car mode.
pub const ACTION_EXIT_CAR_MODE_PRIORITIZED: &str = "exit_car_mode_prioritized";

/// A package was removed from the device.
pub const ACTION_PACKAGE_REMOVED: &str = "package_removed";

/// URI scheme of package-removed data.
pub const PACKAGE_SCHEME: &str = "package";

/// Receiver priority used for system components.
pub const SYSTEM_HIGH_PRIORITY: i32 = 1000;

/// A broadcast delivered by the platform.
///
/// Broadcasts are loosely typed: an action string plus optional extras. The
/// hub decodes them into [`InboundEvent`](super::InboundEvent)s.
///
/// # Examples
///
/// ```
/// use telecom_state::event::{Broadcast, ACTION_ENTER_CAR_MODE_PRIORITIZED};
///
/// let broadcast = Broadcast::enter_car_mode(100, "com.example.car");
/// assert_eq!(broadcast.action(), ACTION_ENTER_CAR_MODE_PRIORITIZED);
/// assert_eq!(broadcast.priority(), Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    action: String,
    priority: Option<i32>,
    calling_package: Option<String>,
    data: Option<String>,
}

impl Broadcast {
    /// Creates a broadcast with the given action and no extras.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            priority: None,
            calling_package: None,
            data: None,
        }
    }

    /// Creates an enter-car-mode broadcast.
    #[must_use]
    pub fn enter_car_mode(priority: i32, calling_package: impl Into<String>) -> Self {
        Self::new(ACTION_ENTER_CAR_MODE_PRIORITIZED)
            .with_priority(priority)
            .with_calling_package(calling_package)
    }

    /// Creates an exit-car-mode broadcast.
    #[must_use]
    pub fn exit_car_mode(priority: i32, calling_package: impl Into<String>) -> Self {
        Self::new(ACTION_EXIT_CAR_MODE_PRIORITIZED)
            .with_priority(priority)
            .with_calling_package(calling_package)
    }

    /// Creates a package-removed broadcast carrying a `package:` URI.
    #[must_use]
    pub fn package_removed(uri: impl Into<String>) -> Self {
        Self::new(ACTION_PACKAGE_REMOVED).with_data(uri)
    }

    /// Sets the priority extra.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the calling-package extra.
    #[must_use]
    pub fn with_calling_package(mut self, package: impl Into<String>) -> Self {
        self.calling_package = Some(package.into());
        self
    }

    /// Sets the data URI.
    #[must_use]
    pub fn with_data(mut self, uri: impl Into<String>) -> Self {
        self.data = Some(uri.into());
        self
    }

    /// Returns the action.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns the priority extra, if present.
    #[must_use]
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    /// Returns the calling-package extra, if present.
    #[must_use]
    pub fn calling_package(&self) -> Option<&str> {
        self.calling_package.as_deref()
    }

    /// Returns the data URI, if present.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

/// Which broadcasts a receiver wants to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastFilter {
    actions: Vec<String>,
    data_scheme: Option<String>,
    priority: i32,
}

impl BroadcastFilter {
    /// Creates a filter matching a single action.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            actions: vec![action.into()],
            data_scheme: None,
            priority: 0,
        }
    }

    /// Adds another accepted action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Restricts the filter to data URIs with the given scheme.
    #[must_use]
    pub fn with_data_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.data_scheme = Some(scheme.into());
        self
    }

    /// Sets the receiver priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the accepted actions.
    #[must_use]
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Returns the required data scheme, if any.
    #[must_use]
    pub fn data_scheme(&self) -> Option<&str> {
        self.data_scheme.as_deref()
    }

    /// Returns the receiver priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns `true` if the broadcast passes this filter.
    ///
    /// A filter with a data scheme only accepts broadcasts whose data URI has
    /// that scheme.
    #[must_use]
    pub fn matches(&self, broadcast: &Broadcast) -> bool {
        if !self.actions.iter().any(|a| a == broadcast.action()) {
            return false;
        }
        match (&self.data_scheme, broadcast.data()) {
            (None, _) => true,
            (Some(scheme), Some(data)) => data
                .split_once(':')
                .is_some_and(|(s, _)| s.eq_ignore_ascii_case(scheme)),
            (Some(_), None) => false,
        }
    }
}

impl fmt::Display for BroadcastFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actions={:?}", self.actions)?;
        if let Some(scheme) = &self.data_scheme {
            write!(f, " scheme={scheme}")?;
        }
        write!(f, " priority={}", self.priority)
    }
}

/// An opaque `scheme:scheme-specific-part` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUri<'a> {
    scheme: &'a str,
    scheme_specific_part: &'a str,
}

impl<'a> PackageUri<'a> {
    /// Splits a URI such as `package:com.example` into its parts.
    ///
    /// The scheme-specific part is returned still encoded, and any fragment
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidUri`] if there is no scheme separator or
    /// the scheme-specific part is empty.
    pub fn parse(uri: &'a str) -> Result<Self, ParseError> {
        let (scheme, rest) = uri
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidUri(uri.to_string()))?;
        let ssp = rest.split_once('#').map_or(rest, |(ssp, _)| ssp);
        if scheme.is_empty() || ssp.is_empty() {
            return Err(ParseError::InvalidUri(uri.to_string()));
        }
        Ok(Self {
            scheme,
            scheme_specific_part: ssp,
        })
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// Returns the encoded scheme-specific part (the package name).
    #[must_use]
    pub fn encoded_scheme_specific_part(&self) -> &'a str {
        self.scheme_specific_part
    }
}
