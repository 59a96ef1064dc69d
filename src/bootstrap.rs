//! Concurrent startup of the camera and display halves of the pipeline.
//!
//! The camera needs the display's buffers before it can open a feed, and the
//! display needs the camera's native mode before it can open a window. Both
//! halves run on their own thread and trade exactly one value each over a
//! one-shot channel:
//!
//! ```text
//!  camera init                          display init
//!  -----------                          ------------
//!  query inputs                         open device, display
//!  publish CameraInput  ---- A ---->    receive CameraInput
//!  receive FrameBuffers <--- B -----    open window, publish FrameBuffers
//!  open feed
//! ```
//!
//! Each task publishes before it receives, which is what keeps the pair from
//! deadlocking. A task that fails drops its publisher, so the other side
//! wakes up with [`Disconnected`](crate::oneshot::Disconnected) instead of
//! waiting forever.

use std::thread;

use crate::config::PipelineConfig;
use crate::device::CameraManager;
use crate::display::{DisplayDriver, Window};
use crate::error::{Error, Result, Task};
use crate::oneshot::{self, Publisher, Subscriber};
use crate::pipeline::DisplayStack;
use crate::stream::FrameReadyCallback;
use crate::types::{CameraInput, FRAME_BUFFER_COUNT, FrameBuffers, WindowConfig};

/// Resources produced by a successful bootstrap.
pub struct Bootstrapped<C: CameraManager, D: DisplayDriver> {
    pub feed: C::Feed,
    pub display: DisplayStack<D>,
}

/// Runs camera and display initialization concurrently and joins them.
pub struct BootstrapCoordinator<'a, C, D> {
    camera: &'a C,
    display: &'a D,
    config: &'a PipelineConfig,
}

impl<'a, C, D> BootstrapCoordinator<'a, C, D>
where
    C: CameraManager,
    D: DisplayDriver,
{
    pub fn new(camera: &'a C, display: &'a D, config: &'a PipelineConfig) -> Self {
        BootstrapCoordinator {
            camera,
            display,
            config,
        }
    }

    /// Bring up both halves. Blocks until both tasks have finished.
    ///
    /// On failure the error of the task that actually failed is returned,
    /// never the disconnection its peer observed as a consequence.
    pub fn initialize(&self, on_frame_ready: FrameReadyCallback) -> Result<Bootstrapped<C, D>> {
        let (input_tx, input_rx) = oneshot::channel::<CameraInput>();
        let (buffers_tx, buffers_rx) = oneshot::channel::<FrameBuffers>();

        tracing::debug!(camera_id = %self.config.camera_id, "starting bootstrap");

        let (camera, display) = thread::scope(|scope| -> Result<_> {
            let camera_task = thread::Builder::new()
                .name("rvc-camera-init".to_owned())
                .spawn_scoped(scope, move || {
                    self.init_camera(input_tx, buffers_rx, on_frame_ready)
                })
                .map_err(|source| Error::Spawn {
                    task: Task::Camera,
                    source,
                })?;

            let display_task = thread::Builder::new()
                .name("rvc-display-init".to_owned())
                .spawn_scoped(scope, move || self.init_display(buffers_tx, input_rx))
                .map_err(|source| Error::Spawn {
                    task: Task::Display,
                    source,
                })?;

            let camera = camera_task
                .join()
                .unwrap_or(Err(Error::TaskPanicked(Task::Camera)));
            let display = display_task
                .join()
                .unwrap_or(Err(Error::TaskPanicked(Task::Display)));
            Ok((camera, display))
        })?;

        match (camera, display) {
            (Ok(feed), Ok(display)) => {
                tracing::info!(camera_id = %self.config.camera_id, "bootstrap complete");
                Ok(Bootstrapped { feed, display })
            }
            (Err(camera), Err(display)) => {
                let cause = if camera.is_peer_disconnect() {
                    display
                } else {
                    camera
                };
                tracing::error!(error = %cause, "bootstrap failed");
                Err(cause)
            }
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => {
                tracing::error!(error = %e, "bootstrap failed");
                Err(e)
            }
        }
    }

    fn init_camera(
        &self,
        input_tx: Publisher<CameraInput>,
        buffers_rx: Subscriber<FrameBuffers>,
        on_frame_ready: FrameReadyCallback,
    ) -> Result<C::Feed> {
        let mut inputs = self
            .camera
            .query_inputs()
            .map_err(|e| Error::driver("failed to query camera inputs", e))?;
        let input = inputs
            .remove(&self.config.camera_id)
            .ok_or_else(|| Error::CameraNotFound(self.config.camera_id.clone()))?;

        tracing::debug!(
            camera_id = %input.id(),
            resolutions = input.resolutions().len(),
            "publishing camera input"
        );
        input_tx.publish(input.clone());

        let buffers = buffers_rx
            .receive()
            .map_err(|_| Error::PeerDisconnected(Task::Display))?;
        tracing::debug!(buffers = buffers.len(), "received frame buffers");

        self.camera
            .open_feed(&input, buffers, on_frame_ready)
            .map_err(|e| Error::driver("failed to open camera feed", e))
    }

    fn init_display(
        &self,
        buffers_tx: Publisher<FrameBuffers>,
        input_rx: Subscriber<CameraInput>,
    ) -> Result<DisplayStack<D>> {
        let device = self
            .display
            .open_device(self.config.client_id)
            .map_err(|e| Error::driver("failed to open display device", e))?;
        let displays = self
            .display
            .available_displays(&device)
            .map_err(|e| Error::driver("failed to list displays", e))?;
        let first = *displays.first().ok_or(Error::NoDisplaysFound)?;
        let display = self
            .display
            .open_display(&device, first)
            .map_err(|e| Error::driver("failed to open display", e))?;

        let windows = self
            .display
            .available_windows(&display)
            .map_err(|e| Error::driver("failed to list windows", e))?;
        let handle = *windows
            .get(self.config.pipeline_index)
            .ok_or(Error::WindowNotFound {
                index: self.config.pipeline_index,
                available: windows.len(),
            })?;

        let input = input_rx
            .receive()
            .map_err(|_| Error::PeerDisconnected(Task::Camera))?;
        let (source_size, pixel_format) = input
            .native_mode()
            .ok_or_else(|| Error::UnsupportedInput(input.id().to_owned()))?;

        let config = WindowConfig {
            position: self.config.window_position,
            size: self.config.window_size,
            source_size,
            pixel_format,
            buffer_count: FRAME_BUFFER_COUNT,
        };
        tracing::debug!(?handle, ?config, "opening camera window");
        let window = self
            .display
            .open_window(&display, handle, &config)
            .map_err(|e| Error::driver("failed to open window", e))?;

        buffers_tx.publish(window.buffers());
        Ok(DisplayStack::new(device, display, window))
    }
}
