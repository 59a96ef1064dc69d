//! Single-value handoff between the two bootstrap tasks.
//!
//! Both halves are consumed on use, so a value is published at most once and
//! received at most once.

use crossbeam_channel::{Receiver, Sender};

/// Write side of a one-shot channel.
pub struct Publisher<T> {
    sender: Sender<T>,
}

/// Read side of a one-shot channel.
pub struct Subscriber<T> {
    receiver: Receiver<T>,
}

/// The publisher was dropped without publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

pub fn channel<T>() -> (Publisher<T>, Subscriber<T>) {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    (Publisher { sender }, Subscriber { receiver })
}

impl<T> Publisher<T> {
    /// Hand `value` over. Never blocks; the value is silently discarded if
    /// the subscriber is already gone.
    pub fn publish(self, value: T) {
        let _ = self.sender.send(value);
    }
}

impl<T> Subscriber<T> {
    /// Block until the value is published or the publisher is dropped.
    pub fn receive(self) -> Result<T, Disconnected> {
        self.receiver.recv().map_err(|_| Disconnected)
    }
}
