use arrayvec::ArrayVec;

/// Number of buffers a display window allocates for the camera feed.
pub const FRAME_BUFFER_COUNT: usize = 3;

/// Pixel formats encountered across capture and display drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    Nv12,
    Yuyv,
    Uyvy,
    Bgra32,
    Rgb565,
}

/// Pixel dimensions of a frame or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }
}

/// On-screen position of a window, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// A camera as reported by the capture driver.
///
/// Resolutions and pixel formats are kept in driver order; the first entry of
/// each is the camera's native mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInput {
    id: String,
    resolutions: Vec<Size>,
    pixel_formats: Vec<PixelFormat>,
}

impl CameraInput {
    pub fn new(
        id: impl Into<String>,
        resolutions: impl IntoIterator<Item = Size>,
        pixel_formats: impl IntoIterator<Item = PixelFormat>,
    ) -> Self {
        CameraInput {
            id: id.into(),
            resolutions: resolutions.into_iter().collect(),
            pixel_formats: pixel_formats.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resolutions(&self) -> &[Size] {
        &self.resolutions
    }

    pub fn pixel_formats(&self) -> &[PixelFormat] {
        &self.pixel_formats
    }

    /// The first supported resolution and pixel format, if the driver
    /// reported any.
    pub fn native_mode(&self) -> Option<(Size, PixelFormat)> {
        Some((*self.resolutions.first()?, *self.pixel_formats.first()?))
    }
}

/// Index of a buffer inside [`FrameBuffers`], as passed to frame-ready
/// callbacks.
pub type BufferIndex = u32;

/// Opaque handle to a display-allocated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Buffers allocated by a display window for the camera to write into.
///
/// The window owns the underlying memory; this is a copy of the handles the
/// camera writes frames into and reports back by index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameBuffers {
    handles: ArrayVec<BufferHandle, FRAME_BUFFER_COUNT>,
}

impl FrameBuffers {
    /// Collect up to [`FRAME_BUFFER_COUNT`] handles. Extra handles are
    /// ignored.
    pub fn new(handles: impl IntoIterator<Item = BufferHandle>) -> Self {
        FrameBuffers {
            handles: handles.into_iter().take(FRAME_BUFFER_COUNT).collect(),
        }
    }

    pub fn get(&self, index: BufferIndex) -> Option<BufferHandle> {
        self.handles.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handles paired with the index the camera reports them by.
    pub fn iter(&self) -> impl Iterator<Item = (BufferIndex, BufferHandle)> + '_ {
        self.handles
            .iter()
            .enumerate()
            .map(|(i, h)| (i as BufferIndex, *h))
    }
}

/// Identifies a display port enumerated by the display driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(pub u32);

/// Identifies a window pipeline enumerated on a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u32);

/// Parameters for opening the camera window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub position: Position,
    pub size: Size,
    /// Size of the frames written into the window's buffers.
    pub source_size: Size,
    pub pixel_format: PixelFormat,
    pub buffer_count: usize,
}

/// Visual state of the pipeline, derived from the feed and the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// The feed is not streaming.
    Off,
    /// The feed is streaming but no frame has been shown yet.
    Starting,
    /// The feed is streaming and the window shows its frames.
    On,
}
