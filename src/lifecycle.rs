use crate::display::DisplayDriver;
use crate::pipeline::SharedPipeline;
use crate::stream::CameraFeed;

/// Releases the pipeline's resources at shutdown.
pub struct LifecycleManager<F, D: DisplayDriver> {
    pipeline: SharedPipeline<F, D>,
}

impl<F, D> LifecycleManager<F, D>
where
    F: CameraFeed + 'static,
    D: DisplayDriver + 'static,
{
    pub fn new(pipeline: SharedPipeline<F, D>) -> Self {
        LifecycleManager { pipeline }
    }

    /// Hide the window, stop the feed, then release feed, window, display
    /// and device in that order.
    ///
    /// The feed stops before the window goes away because it writes into the
    /// window's buffers. Every step tolerates a missing resource, so this is
    /// a no-op on a pipeline that never bootstrapped or was already torn
    /// down.
    pub fn teardown(&self) {
        let mut state = self.pipeline.lock();

        state.hide_window();

        if let Some(feed) = state.feed.as_mut() {
            if let Err(e) = feed.stop() {
                tracing::warn!(error = %e, "failed to stop camera feed");
            }
        }
        if state.feed.take().is_some() {
            tracing::debug!("released camera feed");
        }

        if state.display.release_window() {
            tracing::debug!("released window");
        }
        if state.display.release_display() {
            tracing::debug!("released display");
        }
        if state.display.release_device() {
            tracing::debug!("released display device");
        }

        tracing::info!("pipeline torn down");
    }
}
