//! In-process camera and display drivers.
//!
//! The simulated drivers enforce the feed state machine and record every
//! driver call and resource release into a shared [`EventLog`], which makes
//! ordering observable from tests. Frames are delivered either manually via
//! [`FrameTrigger`] or by a capture thread ticking at a fixed interval.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::types::{BufferIndex, DisplayHandle, WindowConfig};

pub mod camera;
pub mod display;

pub use camera::{FrameTrigger, SimCameraManager, SimFeed};
pub use display::{SimDevice, SimDisplay, SimDisplayDriver, SimWindow};

/// Something a simulated driver did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    InputsQueried,
    FeedOpened { buffers: usize },
    FeedStarted,
    FeedPaused,
    FeedResumed,
    FeedStopped,
    FeedReleased,
    DeviceOpened { client_id: u32 },
    DisplayOpened(DisplayHandle),
    WindowOpened(WindowConfig),
    FrameShown(BufferIndex),
    WindowHidden,
    WindowReleased,
    DisplayReleased,
    DeviceReleased,
}

/// Shared, append-only record of [`SimEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SimEvent>>>,
}

impl EventLog {
    pub fn record(&self, event: SimEvent) {
        tracing::trace!(?event, "sim driver");
        self.events.lock().push(event);
    }

    pub fn snapshot(&self) -> Vec<SimEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn contains(&self, event: &SimEvent) -> bool {
        self.events.lock().contains(event)
    }

    pub fn any(&self, pred: impl Fn(&SimEvent) -> bool) -> bool {
        self.events.lock().iter().any(pred)
    }

    pub fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    #[error("simulated failure: {0}")]
    Injected(&'static str),

    #[error("buffer index {0} out of range")]
    BufferOutOfRange(BufferIndex),

    #[error(transparent)]
    Feed(#[from] crate::error::Error),
}
