use std::sync::{Arc, Weak};

use parking_lot::{Mutex, MutexGuard};

use crate::display::{DisplayDriver, Window};
use crate::stream::{CameraFeed, FeedState, FrameReadyCallback};
use crate::types::{BufferIndex, PowerState};

/// Device, display and window opened for the camera.
///
/// Fields are declared window first so that dropping the stack releases
/// window, display and device in that order even without an explicit
/// teardown.
pub struct DisplayStack<D: DisplayDriver> {
    window: Option<D::Window>,
    display: Option<D::Display>,
    device: Option<D::Device>,
}

impl<D: DisplayDriver> DisplayStack<D> {
    pub(crate) fn new(device: D::Device, display: D::Display, window: D::Window) -> Self {
        DisplayStack {
            window: Some(window),
            display: Some(display),
            device: Some(device),
        }
    }

    /// A stack holding nothing, as before bootstrap.
    pub fn empty() -> Self {
        DisplayStack {
            window: None,
            display: None,
            device: None,
        }
    }

    pub fn window(&self) -> Option<&D::Window> {
        self.window.as_ref()
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_none() && self.display.is_none() && self.device.is_none()
    }

    /// Each release returns whether something was actually dropped.
    pub(crate) fn release_window(&mut self) -> bool {
        self.window.take().is_some()
    }

    pub(crate) fn release_display(&mut self) -> bool {
        debug_assert!(self.window.is_none(), "display released before its window");
        self.display.take().is_some()
    }

    pub(crate) fn release_device(&mut self) -> bool {
        debug_assert!(self.display.is_none(), "device released before its display");
        self.device.take().is_some()
    }
}

/// Everything the power controller, the frame-ready callback and teardown
/// share. Only reachable through [`SharedPipeline`]'s lock.
pub(crate) struct PipelineState<F, D: DisplayDriver> {
    pub(crate) feed: Option<F>,
    pub(crate) display: DisplayStack<D>,
    /// Set once a frame was presented, cleared when the window is hidden.
    window_shown: bool,
}

impl<F: CameraFeed, D: DisplayDriver> PipelineState<F, D> {
    fn feed_state(&self) -> Option<FeedState> {
        self.feed.as_ref().map(CameraFeed::state)
    }

    pub(crate) fn hide_window(&mut self) {
        if let Some(window) = self.display.window.as_mut() {
            if let Err(e) = window.hide() {
                tracing::warn!(error = %e, "failed to hide window");
            }
            self.window_shown = false;
        }
    }

    /// Show buffer `index` if the feed is streaming, otherwise make sure no
    /// stale frame stays on screen.
    fn present(&mut self, index: BufferIndex) {
        if !self.display.has_window() {
            return;
        }
        if self.feed_state() != Some(FeedState::Started) {
            self.hide_window();
            return;
        }
        if let Some(window) = self.display.window.as_mut() {
            match window.show_frame(index) {
                Ok(()) => self.window_shown = true,
                Err(e) => tracing::warn!(index, error = %e, "failed to show frame"),
            }
        }
    }
}

/// Owned pipeline state behind the single lock that serializes power
/// transitions, frame presentation and teardown.
pub struct SharedPipeline<F, D: DisplayDriver> {
    inner: Arc<Mutex<PipelineState<F, D>>>,
}

impl<F, D: DisplayDriver> Clone for SharedPipeline<F, D> {
    fn clone(&self) -> Self {
        SharedPipeline {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F, D> Default for SharedPipeline<F, D>
where
    F: CameraFeed + 'static,
    D: DisplayDriver + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F, D> SharedPipeline<F, D>
where
    F: CameraFeed + 'static,
    D: DisplayDriver + 'static,
{
    /// A pipeline with no feed and no display, as before bootstrap.
    pub fn new() -> Self {
        SharedPipeline {
            inner: Arc::new(Mutex::new(PipelineState {
                feed: None,
                display: DisplayStack::empty(),
                window_shown: false,
            })),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, PipelineState<F, D>> {
        self.inner.lock()
    }

    /// Callback to hand to the capture driver.
    ///
    /// It never blocks the driver thread: a frame arriving while a power
    /// transition or teardown holds the lock is dropped, and once the
    /// pipeline is gone every frame is ignored.
    pub fn frame_ready_callback(&self) -> FrameReadyCallback {
        let state: Weak<Mutex<PipelineState<F, D>>> = Arc::downgrade(&self.inner);
        Box::new(move |index| {
            let Some(state) = state.upgrade() else {
                return;
            };
            match state.try_lock() {
                Some(mut guard) => guard.present(index),
                None => tracing::trace!(index, "pipeline busy, dropping frame"),
            }
        })
    }

    /// Take ownership of the bootstrapped feed and display stack.
    pub(crate) fn install(&self, feed: F, display: DisplayStack<D>) {
        let mut state = self.lock();
        state.feed = Some(feed);
        state.display = display;
        state.window_shown = false;
    }

    pub fn feed_state(&self) -> Option<FeedState> {
        self.lock().feed_state()
    }

    pub fn has_window(&self) -> bool {
        self.lock().display.has_window()
    }

    pub fn power_state(&self) -> PowerState {
        let state = self.lock();
        match state.feed_state() {
            Some(FeedState::Started) if state.window_shown => PowerState::On,
            Some(FeedState::Started) => PowerState::Starting,
            _ => PowerState::Off,
        }
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::platform::sim::{EventLog, SimDisplayDriver, SimEvent, SimFeed};
    use crate::power::PowerStateController;
    use crate::test_support::bootstrapped;

    #[test]
    fn empty_pipeline_reports_off() {
        let pipeline = SharedPipeline::<SimFeed, SimDisplayDriver>::new();
        assert_eq!(pipeline.feed_state(), None);
        assert!(!pipeline.has_window());
        assert_eq!(pipeline.power_state(), PowerState::Off);
    }

    #[test]
    fn frame_before_start_keeps_window_hidden() {
        let log = EventLog::default();
        let (pipeline, trigger) = bootstrapped(&log);

        trigger.deliver(0);
        assert_eq!(log.snapshot(), vec![SimEvent::WindowHidden]);
        assert_eq!(pipeline.power_state(), PowerState::Off);
    }

    #[test]
    fn frames_while_started_are_shown() {
        let log = EventLog::default();
        let (pipeline, trigger) = bootstrapped(&log);
        PowerStateController::new(pipeline.clone()).activate();

        trigger.deliver(0);
        trigger.deliver(1);
        assert!(log.contains(&SimEvent::FrameShown(0)));
        assert!(log.contains(&SimEvent::FrameShown(1)));
        assert_eq!(pipeline.power_state(), PowerState::On);
    }

    #[test]
    fn frame_while_paused_hides_window() {
        let log = EventLog::default();
        let (pipeline, trigger) = bootstrapped(&log);
        let power = PowerStateController::new(pipeline.clone());
        power.activate();
        power.deactivate();
        log.clear();

        trigger.deliver(2);
        assert_eq!(log.snapshot(), vec![SimEvent::WindowHidden]);
    }

    #[test]
    fn frame_is_dropped_while_pipeline_is_locked() {
        let log = EventLog::default();
        let (pipeline, trigger) = bootstrapped(&log);
        PowerStateController::new(pipeline.clone()).activate();
        log.clear();

        let guard = pipeline.lock();
        trigger.deliver(0);
        drop(guard);
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn bad_buffer_index_is_not_fatal() {
        let log = EventLog::default();
        let (pipeline, trigger) = bootstrapped(&log);
        PowerStateController::new(pipeline.clone()).activate();

        trigger.deliver(7);
        assert_eq!(pipeline.power_state(), PowerState::Starting);
    }

    #[test]
    fn dropping_stack_releases_window_first() {
        let log = EventLog::default();
        let (pipeline, _trigger) = bootstrapped(&log);
        let stack = std::mem::replace(&mut pipeline.lock().display, DisplayStack::empty());
        assert!(pipeline.lock().display.is_empty());
        assert!(!stack.is_empty());
        drop(stack);
        assert_eq!(
            log.snapshot(),
            vec![
                SimEvent::WindowReleased,
                SimEvent::DisplayReleased,
                SimEvent::DeviceReleased,
            ]
        );
    }

    #[test]
    fn callback_outliving_pipeline_is_inert() {
        let log = EventLog::default();
        let (pipeline, _trigger) = bootstrapped(&log);
        PowerStateController::new(pipeline.clone()).activate();
        let mut on_frame_ready = pipeline.frame_ready_callback();

        drop(pipeline);
        assert!(log.contains(&SimEvent::WindowReleased));
        log.clear();

        on_frame_ready(0);
        assert!(log.snapshot().is_empty());
    }
}
