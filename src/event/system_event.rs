// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed inbound and outbound events.

use chrono::{DateTime, Utc};

use crate::error::ParseError;
use crate::listener::SystemStateListener;
use crate::types::CarModePriority;

use super::broadcast::{
    ACTION_ENTER_CAR_MODE_PRIORITIZED, ACTION_EXIT_CAR_MODE_PRIORITIZED, ACTION_PACKAGE_REMOVED,
    Broadcast, PackageUri,
};

/// A package entered or exited car mode.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CarModeEvent {
    /// Priority of the request, passed through unchanged.
    pub priority: CarModePriority,
    /// The requesting package. Empty if the platform did not name one.
    pub package_name: String,
    /// `true` when entering car mode.
    pub entering: bool,
}

/// Automotive projection was set by a package or released.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProjectionEvent {
    /// A package holds automotive projection.
    Set {
        /// The representative projecting package.
        package_name: String,
    },
    /// No package projects any more.
    Released,
}

impl ProjectionEvent {
    /// Derives the event from the set of projecting packages.
    ///
    /// An empty set means projection was released. Otherwise the first package
    /// the iterator yields is reported; for an ordered set this is always the
    /// same element for the same input.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    /// use telecom_state::event::ProjectionEvent;
    ///
    /// let packages: BTreeSet<String> = ["com.b".into(), "com.a".into()].into();
    /// assert_eq!(
    ///     ProjectionEvent::from_projecting_packages(&packages),
    ///     ProjectionEvent::Set { package_name: "com.a".into() }
    /// );
    /// assert_eq!(
    ///     ProjectionEvent::from_projecting_packages(&BTreeSet::<String>::new()),
    ///     ProjectionEvent::Released
    /// );
    /// ```
    #[must_use]
    pub fn from_projecting_packages<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        packages
            .into_iter()
            .next()
            .map_or(Self::Released, |first| Self::Set {
                package_name: first.as_ref().to_string(),
            })
    }

    /// Returns `true` for [`ProjectionEvent::Set`].
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }
}

/// A package was uninstalled.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PackageRemovedEvent {
    /// The removed package.
    pub package_name: String,
}

/// A broadcast the hub knows how to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Enter or exit car mode.
    CarMode(CarModeEvent),
    /// Package removed.
    PackageRemoved(PackageRemovedEvent),
}

impl TryFrom<&Broadcast> for InboundEvent {
    type Error = ParseError;

    fn try_from(broadcast: &Broadcast) -> Result<Self, Self::Error> {
        let entering = match broadcast.action() {
            ACTION_ENTER_CAR_MODE_PRIORITIZED => true,
            ACTION_EXIT_CAR_MODE_PRIORITIZED => false,
            ACTION_PACKAGE_REMOVED => {
                let data = broadcast
                    .data()
                    .ok_or_else(|| ParseError::MissingData(ACTION_PACKAGE_REMOVED.to_string()))?;
                let uri = PackageUri::parse(data)?;
                return Ok(Self::PackageRemoved(PackageRemovedEvent {
                    package_name: uri.encoded_scheme_specific_part().to_string(),
                }));
            }
            other => return Err(ParseError::UnknownAction(other.to_string())),
        };

        Ok(Self::CarMode(CarModeEvent {
            priority: broadcast
                .priority()
                .map_or(CarModePriority::DEFAULT, CarModePriority::new),
            package_name: broadcast.calling_package().unwrap_or_default().to_string(),
            entering,
        }))
    }
}

/// An outbound notification, as delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SystemStateEvent {
    /// `on_car_mode_changed`.
    CarModeChanged(CarModeEvent),
    /// `on_automotive_projection_state_set` / `_released`.
    Projection(ProjectionEvent),
    /// `on_package_uninstalled`.
    PackageUninstalled(PackageRemovedEvent),
}

impl SystemStateEvent {
    /// Invokes the listener callback matching this event.
    pub fn notify(&self, listener: &dyn SystemStateListener) {
        match self {
            Self::CarModeChanged(event) => {
                listener.on_car_mode_changed(event.priority, &event.package_name, event.entering);
            }
            Self::Projection(ProjectionEvent::Set { package_name }) => {
                listener.on_automotive_projection_state_set(package_name);
            }
            Self::Projection(ProjectionEvent::Released) => {
                listener.on_automotive_projection_state_released();
            }
            Self::PackageUninstalled(event) => {
                listener.on_package_uninstalled(&event.package_name);
            }
        }
    }

    /// Name of the listener callback this event maps to.
    #[must_use]
    pub fn callback_name(&self) -> &'static str {
        match self {
            Self::CarModeChanged(_) => "on_car_mode_changed",
            Self::Projection(ProjectionEvent::Set { .. }) => "on_automotive_projection_state_set",
            Self::Projection(ProjectionEvent::Released) => {
                "on_automotive_projection_state_released"
            }
            Self::PackageUninstalled(_) => "on_package_uninstalled",
        }
    }
}

impl From<InboundEvent> for SystemStateEvent {
    fn from(event: InboundEvent) -> Self {
        match event {
            InboundEvent::CarMode(e) => Self::CarModeChanged(e),
            InboundEvent::PackageRemoved(e) => Self::PackageUninstalled(e),
        }
    }
}

/// A notification published on the [`EventBus`](super::EventBus).
///
/// Carries the event together with the cached flag as it stood right after
/// the event was processed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateNotification {
    /// The outbound event.
    pub event: SystemStateEvent,
    /// Value of the car-mode/projection flag after the event.
    pub car_or_projection_active: bool,
    /// When the hub processed the event.
    pub occurred_at: DateTime<Utc>,
}

impl StateNotification {
    /// Stamps an event with the current time.
    #[must_use]
    pub fn now(event: SystemStateEvent, car_or_projection_active: bool) -> Self {
        Self {
            event,
            car_or_projection_active,
            occurred_at: Utc::now(),
        }
    }
}
