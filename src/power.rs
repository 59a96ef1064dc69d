use crate::display::DisplayDriver;
use crate::event::VisibilityListener;
use crate::pipeline::SharedPipeline;
use crate::stream::{CameraFeed, FeedState};

/// Turns the camera stream on and off in response to visibility signals.
///
/// Both entry points take the pipeline lock, so they never interleave with
/// each other, with frame presentation or with teardown. Before bootstrap and
/// after teardown there is nothing to drive and both are no-ops.
pub struct PowerStateController<F, D: DisplayDriver> {
    pipeline: SharedPipeline<F, D>,
}

impl<F, D> PowerStateController<F, D>
where
    F: CameraFeed + 'static,
    D: DisplayDriver + 'static,
{
    pub fn new(pipeline: SharedPipeline<F, D>) -> Self {
        PowerStateController { pipeline }
    }

    /// Start the feed, or resume it if paused.
    ///
    /// The window is left alone: it becomes visible when the first frame
    /// arrives, so nothing stale is ever shown.
    pub fn activate(&self) {
        let mut state = self.pipeline.lock();
        let Some(feed) = state.feed.as_mut() else {
            tracing::debug!("activate: no camera feed");
            return;
        };

        let result = if feed.state() == FeedState::Paused {
            tracing::debug!("resuming camera feed");
            feed.resume()
        } else {
            tracing::debug!(state = %feed.state(), "starting camera feed");
            feed.start()
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to turn camera feed on");
        }
    }

    /// Pause the feed and hide the window.
    ///
    /// The feed is paused rather than stopped so it can come back quickly;
    /// the window is hidden even when there is no feed.
    pub fn deactivate(&self) {
        let mut state = self.pipeline.lock();
        if let Some(feed) = state.feed.as_mut() {
            tracing::debug!(state = %feed.state(), "pausing camera feed");
            if let Err(e) = feed.pause() {
                tracing::warn!(error = %e, "failed to pause camera feed");
            }
        }
        state.hide_window();
    }
}

impl<F, D> VisibilityListener for PowerStateController<F, D>
where
    F: CameraFeed + 'static,
    D: DisplayDriver + 'static,
{
    fn activate(&self) {
        PowerStateController::activate(self);
    }

    fn deactivate(&self) {
        PowerStateController::deactivate(self);
    }
}
