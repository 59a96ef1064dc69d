use std::collections::HashMap;

use crate::stream::{CameraFeed, FrameReadyCallback};
use crate::types::{CameraInput, FrameBuffers};

/// Discover cameras and open capture feeds.
pub trait CameraManager: Sync {
    type Feed: CameraFeed + 'static;
    type Error: core::error::Error + Send + Sync + 'static;

    /// All cameras the driver knows about, keyed by identity.
    fn query_inputs(&self) -> Result<HashMap<String, CameraInput>, Self::Error>;

    /// Open a feed writing into `buffers`, announcing each filled buffer
    /// through `on_frame_ready`.
    fn open_feed(
        &self,
        input: &CameraInput,
        buffers: FrameBuffers,
        on_frame_ready: FrameReadyCallback,
    ) -> Result<Self::Feed, Self::Error>;
}
