use crate::bootstrap::BootstrapCoordinator;
use crate::config::PipelineConfig;
use crate::pipeline::SharedPipeline;
use crate::platform::sim::{EventLog, FrameTrigger, SimCameraManager, SimDisplayDriver, SimFeed};
use crate::types::{CameraInput, PixelFormat, Size};

/// Bootstrap the simulated "rvc0" camera into a fresh pipeline. The log is
/// cleared afterwards so tests only see what they trigger themselves.
pub(crate) fn bootstrapped(
    log: &EventLog,
) -> (SharedPipeline<SimFeed, SimDisplayDriver>, FrameTrigger) {
    let camera = SimCameraManager::new(log.clone()).with_input(CameraInput::new(
        "rvc0",
        [Size::new(720, 480)],
        [PixelFormat::Uyvy],
    ));
    let display = SimDisplayDriver::new(log.clone());
    let config = PipelineConfig::default();

    let pipeline = SharedPipeline::new();
    let bootstrapped = BootstrapCoordinator::new(&camera, &display, &config)
        .initialize(pipeline.frame_ready_callback())
        .expect("sim bootstrap");
    pipeline.install(bootstrapped.feed, bootstrapped.display);

    log.clear();
    (pipeline, camera.frame_trigger())
}
