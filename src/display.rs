use crate::types::{BufferIndex, DisplayHandle, FrameBuffers, WindowConfig, WindowHandle};

/// Open devices, displays and windows on the display compositor.
///
/// Each level is opened from the one above it (device, then display, then
/// window) and must be released in the reverse order; see
/// [`DisplayStack`](crate::pipeline::DisplayStack).
pub trait DisplayDriver: Sync {
    type Device: Send + 'static;
    type Display: Send + 'static;
    type Window: Window + 'static;
    type Error: core::error::Error + Send + Sync + 'static;

    fn open_device(&self, client_id: u32) -> Result<Self::Device, Self::Error>;
    fn available_displays(&self, device: &Self::Device) -> Result<Vec<DisplayHandle>, Self::Error>;
    fn open_display(
        &self,
        device: &Self::Device,
        handle: DisplayHandle,
    ) -> Result<Self::Display, Self::Error>;
    fn available_windows(&self, display: &Self::Display) -> Result<Vec<WindowHandle>, Self::Error>;
    fn open_window(
        &self,
        display: &Self::Display,
        handle: WindowHandle,
        config: &WindowConfig,
    ) -> Result<Self::Window, Self::Error>;
}

/// A window presenting camera frames. Owns the buffers the camera writes to.
pub trait Window: Send {
    type Error: core::error::Error + Send + Sync + 'static;

    fn buffers(&self) -> FrameBuffers;
    /// Present the frame in buffer `index`, making the window visible.
    fn show_frame(&mut self, index: BufferIndex) -> Result<(), Self::Error>;
    fn hide(&mut self) -> Result<(), Self::Error>;
}
