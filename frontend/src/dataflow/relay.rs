//! One-way event channel from callers into a long-running loop.
//!
//! Relays follow the `{source}_{event}_relay` naming pattern, e.g.
//! `props_changed_relay` feeds fresh race props into the clock loop.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// Sending half of a relay. Cloning shares the same channel.
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Send + 'static,
{
    sender: UnboundedSender<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("relay receiver was dropped")]
    ChannelClosed,
}

impl<T> Relay<T>
where
    T: Send + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (Relay { sender }, receiver)
    }

    /// Send an event; dropped silently once the receiving loop has ended.
    pub fn send(&self, value: T) {
        if self.sender.unbounded_send(value).is_err() {
            log::debug!("relay event dropped, receiver is gone");
        }
    }

    pub fn try_send(&self, value: T) -> Result<(), RelayError> {
        self.sender
            .unbounded_send(value)
            .map_err(|_| RelayError::ChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<T> Default for Relay<T>
where
    T: Send + 'static,
{
    /// Disconnected relay; every event is discarded.
    fn default() -> Self {
        let (relay, _receiver) = Self::new();
        relay
    }
}

pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Send + 'static,
{
    Relay::new()
}
