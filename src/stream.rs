use core::fmt;

use crate::error::Error;
use crate::types::BufferIndex;

/// Callback invoked by the capture driver, on its own thread, each time a
/// buffer holds a complete frame.
pub type FrameReadyCallback = Box<dyn FnMut(BufferIndex) + Send + 'static>;

/// Lifecycle of a capture feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedState {
    Closed,
    /// Bound to buffers, not streaming yet.
    Opened,
    Started,
    Paused,
    /// Terminal.
    Stopped,
}

impl fmt::Display for FeedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Closed => "closed",
            Self::Opened => "opened",
            Self::Started => "started",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        })
    }
}

/// A requested feed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedOp {
    Start,
    Pause,
    Resume,
    Stop,
}

impl fmt::Display for FeedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        })
    }
}

impl FeedState {
    /// The state a feed ends up in after `op`.
    ///
    /// Starting a started feed and pausing a paused (or never started) feed
    /// are no-ops. Nothing but `Stop` leaves `Stopped`.
    pub fn apply(self, op: FeedOp) -> Result<FeedState, Error> {
        use FeedOp::*;
        use FeedState::*;

        match (self, op) {
            (_, Stop) => Ok(Stopped),
            (Opened | Started | Paused, Start) => Ok(Started),
            (Started | Paused, Pause) => Ok(Paused),
            (Opened, Pause) => Ok(Opened),
            (Started | Paused, Resume) => Ok(Started),
            (from, op) => Err(Error::InvalidTransition { from, op }),
        }
    }
}

/// A capture feed opened against display buffers.
///
/// Frames are announced through the [`FrameReadyCallback`] given to
/// [`CameraManager::open_feed`](crate::device::CameraManager::open_feed).
pub trait CameraFeed: Send {
    type Error: core::error::Error + Send + Sync + 'static;

    fn state(&self) -> FeedState;
    fn start(&mut self) -> Result<(), Self::Error>;
    fn pause(&mut self) -> Result<(), Self::Error>;
    fn resume(&mut self) -> Result<(), Self::Error>;
    /// Stop streaming for good. A stopped feed cannot be restarted.
    fn stop(&mut self) -> Result<(), Self::Error>;
}
