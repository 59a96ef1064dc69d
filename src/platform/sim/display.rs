use super::{EventLog, SimError, SimEvent};
use crate::display::{DisplayDriver, Window};
use crate::types::{
    BufferHandle, BufferIndex, DisplayHandle, FrameBuffers, WindowConfig, WindowHandle,
};

/// Simulated display compositor with a configurable number of displays and
/// window pipelines.
pub struct SimDisplayDriver {
    log: EventLog,
    displays: u32,
    windows: u32,
}

impl SimDisplayDriver {
    /// One display with two window pipelines.
    pub fn new(log: EventLog) -> Self {
        SimDisplayDriver {
            log,
            displays: 1,
            windows: 2,
        }
    }

    pub fn with_displays(mut self, displays: u32) -> Self {
        self.displays = displays;
        self
    }

    pub fn with_windows(mut self, windows: u32) -> Self {
        self.windows = windows;
        self
    }
}

impl DisplayDriver for SimDisplayDriver {
    type Device = SimDevice;
    type Display = SimDisplay;
    type Window = SimWindow;
    type Error = SimError;

    fn open_device(&self, client_id: u32) -> Result<Self::Device, Self::Error> {
        self.log.record(SimEvent::DeviceOpened { client_id });
        Ok(SimDevice {
            log: self.log.clone(),
        })
    }

    fn available_displays(
        &self,
        _device: &Self::Device,
    ) -> Result<Vec<DisplayHandle>, Self::Error> {
        Ok((0..self.displays).map(DisplayHandle).collect())
    }

    fn open_display(
        &self,
        _device: &Self::Device,
        handle: DisplayHandle,
    ) -> Result<Self::Display, Self::Error> {
        self.log.record(SimEvent::DisplayOpened(handle));
        Ok(SimDisplay {
            log: self.log.clone(),
        })
    }

    fn available_windows(
        &self,
        _display: &Self::Display,
    ) -> Result<Vec<WindowHandle>, Self::Error> {
        Ok((0..self.windows).map(WindowHandle).collect())
    }

    fn open_window(
        &self,
        _display: &Self::Display,
        handle: WindowHandle,
        config: &WindowConfig,
    ) -> Result<Self::Window, Self::Error> {
        self.log.record(SimEvent::WindowOpened(config.clone()));
        let base = u64::from(handle.0) << 16;
        let buffers = (0..config.buffer_count as u64).map(|i| BufferHandle(base | i));
        Ok(SimWindow {
            log: self.log.clone(),
            buffers: FrameBuffers::new(buffers),
            visible: false,
        })
    }
}

pub struct SimDevice {
    log: EventLog,
}

impl Drop for SimDevice {
    fn drop(&mut self) {
        self.log.record(SimEvent::DeviceReleased);
    }
}

pub struct SimDisplay {
    log: EventLog,
}

impl Drop for SimDisplay {
    fn drop(&mut self) {
        self.log.record(SimEvent::DisplayReleased);
    }
}

pub struct SimWindow {
    log: EventLog,
    buffers: FrameBuffers,
    visible: bool,
}

impl SimWindow {
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Window for SimWindow {
    type Error = SimError;

    fn buffers(&self) -> FrameBuffers {
        self.buffers.clone()
    }

    fn show_frame(&mut self, index: BufferIndex) -> Result<(), Self::Error> {
        self.buffers
            .get(index)
            .ok_or(SimError::BufferOutOfRange(index))?;
        self.visible = true;
        self.log.record(SimEvent::FrameShown(index));
        Ok(())
    }

    fn hide(&mut self) -> Result<(), Self::Error> {
        self.visible = false;
        self.log.record(SimEvent::WindowHidden);
        Ok(())
    }
}

impl Drop for SimWindow {
    fn drop(&mut self) {
        self.log.record(SimEvent::WindowReleased);
    }
}
