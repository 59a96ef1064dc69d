use crate::bootstrap::BootstrapCoordinator;
use crate::config::PipelineConfig;
use crate::device::CameraManager;
use crate::display::DisplayDriver;
use crate::error::Result;
use crate::event::EventPump;
use crate::lifecycle::LifecycleManager;
use crate::pipeline::SharedPipeline;
use crate::power::PowerStateController;

/// The rear-view camera application: bootstrap, event loop, teardown.
pub struct RvcApplication<C: CameraManager, D: DisplayDriver> {
    camera: C,
    display: D,
    config: PipelineConfig,
    pipeline: SharedPipeline<C::Feed, D>,
}

impl<C, D> RvcApplication<C, D>
where
    C: CameraManager,
    D: DisplayDriver + 'static,
{
    pub fn new(camera: C, display: D, config: PipelineConfig) -> Self {
        RvcApplication {
            camera,
            display,
            config,
            pipeline: SharedPipeline::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &SharedPipeline<C::Feed, D> {
        &self.pipeline
    }

    pub fn power(&self) -> PowerStateController<C::Feed, D> {
        PowerStateController::new(self.pipeline.clone())
    }

    pub fn lifecycle(&self) -> LifecycleManager<C::Feed, D> {
        LifecycleManager::new(self.pipeline.clone())
    }

    /// Bring up camera and display and hand them to the shared pipeline.
    pub fn initialize(&self) -> Result<()> {
        let coordinator = BootstrapCoordinator::new(&self.camera, &self.display, &self.config);
        let bootstrapped = coordinator.initialize(self.pipeline.frame_ready_callback())?;
        self.pipeline.install(bootstrapped.feed, bootstrapped.display);
        Ok(())
    }

    /// Bootstrap, pump events until shutdown, then tear down.
    ///
    /// A bootstrap failure is returned before the pump ever runs.
    pub fn run(&self, pump: &mut impl EventPump) -> Result<()> {
        self.initialize()?;

        let power = self.power();
        pump.run(&power);

        self.lifecycle().teardown();
        Ok(())
    }
}
