use crossbeam_channel::{Receiver, Sender};

/// Receiver of visibility changes.
pub trait VisibilityListener {
    /// The rear-view feature should become visible.
    fn activate(&self);
    /// The rear-view feature should be hidden.
    fn deactivate(&self);
}

/// Steady-state event loop. `run` blocks, forwarding visibility changes to
/// the listener, and returns once the process is asked to shut down.
pub trait EventPump {
    fn run(&mut self, listener: &dyn VisibilityListener);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpEvent {
    Visibility(Visibility),
    Shutdown,
}

/// Cloneable handle feeding a [`ChannelEventPump`].
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<PumpEvent>,
}

impl EventSender {
    pub fn show(&self) {
        self.send(PumpEvent::Visibility(Visibility::Visible));
    }

    pub fn hide(&self) {
        self.send(PumpEvent::Visibility(Visibility::Hidden));
    }

    pub fn shutdown(&self) {
        self.send(PumpEvent::Shutdown);
    }

    pub fn send(&self, event: PumpEvent) {
        if self.sender.send(event).is_err() {
            tracing::debug!(?event, "event pump gone, dropping event");
        }
    }
}

/// Event pump fed through [`EventSender`] handles.
///
/// Returns on [`PumpEvent::Shutdown`] or once every sender is dropped.
pub struct ChannelEventPump {
    receiver: Receiver<PumpEvent>,
}

pub fn channel() -> (EventSender, ChannelEventPump) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (EventSender { sender }, ChannelEventPump { receiver })
}

impl EventPump for ChannelEventPump {
    fn run(&mut self, listener: &dyn VisibilityListener) {
        tracing::debug!("event pump running");
        for event in self.receiver.iter() {
            match event {
                PumpEvent::Visibility(Visibility::Visible) => listener.activate(),
                PumpEvent::Visibility(Visibility::Hidden) => listener.deactivate(),
                PumpEvent::Shutdown => {
                    tracing::info!("shutdown requested");
                    return;
                }
            }
        }
        tracing::debug!("all event senders dropped");
    }
}
