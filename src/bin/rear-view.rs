use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;

use rear_view::event::{self, EventSender};
use rear_view::platform::sim::{EventLog, SimCameraManager, SimDisplayDriver};
use rear_view::{CameraInput, PipelineConfig, PixelFormat, RvcApplication, Size};
use tracing_subscriber::EnvFilter;

/// Roughly 30 fps.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let log = EventLog::default();
    let camera = SimCameraManager::new(log.clone())
        .with_input(CameraInput::new(
            "rvc0",
            [Size::new(720, 480)],
            [PixelFormat::Uyvy],
        ))
        .with_frame_interval(FRAME_INTERVAL);
    let display = SimDisplayDriver::new(log);
    let app = RvcApplication::new(camera, display, PipelineConfig::default());

    let (sender, mut pump) = event::channel();

    let ctrlc_sender = sender.clone();
    if let Err(e) = ctrlc::set_handler(move || ctrlc_sender.shutdown()) {
        tracing::warn!(error = %e, "failed to install Ctrl+C handler");
    }
    spawn_visibility_reader(sender);

    match app.run(&mut pump) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "rear-view camera failed to start");
            ExitCode::FAILURE
        }
    }
}

/// Stand-in visibility source: `on`, `off` and `quit` lines on stdin.
///
/// Only `quit` shuts the pump down, so the process keeps running with stdin
/// closed or redirected from `/dev/null`.
fn spawn_visibility_reader(sender: EventSender) {
    let spawned = std::thread::Builder::new()
        .name("visibility-stdin".to_owned())
        .spawn(move || forward_visibility(std::io::stdin().lock(), &sender));
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "failed to start visibility reader");
    }
}

fn forward_visibility(input: impl BufRead, sender: &EventSender) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "on" => sender.show(),
            "off" => sender.hide(),
            "quit" => {
                sender.shutdown();
                return;
            }
            "" => {}
            other => tracing::warn!(command = other, "expected `on`, `off` or `quit`"),
        }
    }
    // End of input is not a shutdown request; Ctrl+C still is.
    tracing::debug!("visibility input closed");
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Cursor;

    use rear_view::event::{EventPump, VisibilityListener};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
    }

    impl VisibilityListener for Recorder {
        fn activate(&self) {
            self.calls.borrow_mut().push("activate");
        }

        fn deactivate(&self) {
            self.calls.borrow_mut().push("deactivate");
        }
    }

    #[test]
    fn end_of_input_keeps_pump_running() {
        let (sender, mut pump) = event::channel();
        forward_visibility(Cursor::new("on\nbogus\n"), &sender);
        sender.hide();
        sender.shutdown();

        let recorder = Recorder::default();
        pump.run(&recorder);
        assert_eq!(*recorder.calls.borrow(), vec!["activate", "deactivate"]);
    }

    #[test]
    fn quit_shuts_pump_down() {
        let (sender, mut pump) = event::channel();
        forward_visibility(Cursor::new("on\nquit\noff\n"), &sender);
        sender.hide();

        let recorder = Recorder::default();
        pump.run(&recorder);
        assert_eq!(*recorder.calls.borrow(), vec!["activate"]);
    }
}
