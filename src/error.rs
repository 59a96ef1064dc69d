use core::fmt;

use thiserror::Error;

use crate::stream::{FeedOp, FeedState};

/// Error type boxed out of driver trait implementations.
pub type DriverError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// The two concurrent halves of the bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Camera,
    Display,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => f.write_str("camera init"),
            Self::Display => f.write_str("display init"),
        }
    }
}

/// Top-level crate error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("camera `{0}` not found")]
    CameraNotFound(String),

    #[error("no displays found")]
    NoDisplaysFound,

    #[error("window for pipeline {index} not found ({available} available)")]
    WindowNotFound { index: usize, available: usize },

    #[error("camera `{0}` reports no supported resolution or pixel format")]
    UnsupportedInput(String),

    #[error("{0} task exited before publishing its result")]
    PeerDisconnected(Task),

    #[error("{0} task panicked")]
    TaskPanicked(Task),

    #[error("failed to spawn {task} task")]
    Spawn {
        task: Task,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot {op} a feed that is {from}")]
    InvalidTransition { from: FeedState, op: FeedOp },

    #[error("{context}")]
    Driver {
        context: &'static str,
        #[source]
        source: DriverError,
    },
}

impl Error {
    /// Wrap a driver failure, keeping it as the error source.
    pub fn driver(context: &'static str, source: impl Into<DriverError>) -> Self {
        Error::Driver {
            context,
            source: source.into(),
        }
    }

    /// True for errors that only say the other bootstrap task went away.
    pub(crate) fn is_peer_disconnect(&self) -> bool {
        matches!(self, Self::PeerDisconnected(_))
    }
}

pub type Result<T> = core::result::Result<T, Error>;
