// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting state notifications to async consumers.

use tokio::sync::broadcast;

use super::StateNotification;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Event bus mirroring every listener notification onto a broadcast channel.
///
/// Consumers that live on an async runtime can subscribe here instead of
/// implementing [`SystemStateListener`](crate::listener::SystemStateListener).
/// Publishing never blocks, so it is safe to do while the hub holds the
/// shared lock.
///
/// # Capacity
///
/// A subscriber that falls more than `capacity` notifications behind loses
/// the oldest ones and receives `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use telecom_state::event::{EventBus, ProjectionEvent, StateNotification, SystemStateEvent};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StateNotification::now(
///     SystemStateEvent::Projection(ProjectionEvent::Released),
///     false,
/// ));
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StateNotification>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to notifications published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateNotification> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes a notification, returning how many subscribers got it.
    ///
    /// Without subscribers the notification is discarded.
    pub fn publish(&self, notification: StateNotification) -> usize {
        self.sender.send(notification).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
