use crate::types::{Position, Size};

/// Fixed parameters of the rear-view pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Identity of the camera to capture from.
    pub camera_id: String,
    /// Client id used when opening the display device.
    pub client_id: u32,
    /// Index of the window pipeline dedicated to the camera.
    pub pipeline_index: usize,
    pub window_position: Position,
    pub window_size: Size,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            camera_id: "rvc0".to_owned(),
            client_id: 1,
            pipeline_index: 1,
            window_position: Position::new(1032, 57),
            window_size: Size::new(897, 526),
        }
    }
}
