//! End-to-end runs of the application against the simulated drivers.

use std::thread;
use std::time::{Duration, Instant};

use rear_view::event::{self, PumpEvent, Visibility};
use rear_view::platform::sim::{EventLog, SimCameraManager, SimDisplayDriver, SimEvent};
use rear_view::{
    CameraInput, Error, FeedState, PipelineConfig, PixelFormat, Position, PowerState,
    RvcApplication, Size, WindowConfig,
};

fn rvc_camera(log: &EventLog) -> SimCameraManager {
    SimCameraManager::new(log.clone()).with_input(CameraInput::new(
        "rvc0",
        [Size::new(720, 480), Size::new(1280, 720)],
        [PixelFormat::Uyvy, PixelFormat::Nv12],
    ))
}

fn position(log: &EventLog, event: &SimEvent) -> usize {
    log.snapshot()
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("{event:?} not recorded"))
}

#[test]
fn run_drives_feed_through_visibility_changes() {
    let log = EventLog::default();
    let app = RvcApplication::new(
        rvc_camera(&log),
        SimDisplayDriver::new(log.clone()).with_windows(2),
        PipelineConfig::default(),
    );

    let (sender, mut pump) = event::channel();
    sender.show();
    sender.hide();
    sender.show();
    sender.shutdown();

    app.run(&mut pump).expect("run should succeed");

    assert!(log.contains(&SimEvent::WindowOpened(WindowConfig {
        position: Position::new(1032, 57),
        size: Size::new(897, 526),
        source_size: Size::new(720, 480),
        pixel_format: PixelFormat::Uyvy,
        buffer_count: 3,
    })));
    let started = position(&log, &SimEvent::FeedStarted);
    let paused = position(&log, &SimEvent::FeedPaused);
    let resumed = position(&log, &SimEvent::FeedResumed);
    let stopped = position(&log, &SimEvent::FeedStopped);
    assert!(started < paused && paused < resumed && resumed < stopped);
    assert_eq!(log.count(|e| *e == SimEvent::FeedStopped), 1);

    let tail: Vec<_> = log.snapshot().into_iter().rev().take(4).rev().collect();
    assert_eq!(
        tail,
        vec![
            SimEvent::FeedReleased,
            SimEvent::WindowReleased,
            SimEvent::DisplayReleased,
            SimEvent::DeviceReleased,
        ]
    );
    assert_eq!(app.pipeline().feed_state(), None);
}

#[test]
fn run_fails_before_pumping_when_camera_is_missing() {
    let log = EventLog::default();
    let camera = SimCameraManager::new(log.clone()).with_input(CameraInput::new(
        "other",
        [Size::new(720, 480)],
        [PixelFormat::Uyvy],
    ));
    let app = RvcApplication::new(
        camera,
        SimDisplayDriver::new(log.clone()),
        PipelineConfig::default(),
    );

    let (sender, mut pump) = event::channel();
    sender.show();
    sender.shutdown();

    let err = app.run(&mut pump).expect_err("run should fail");
    assert!(matches!(err, Error::CameraNotFound(ref id) if id == "rvc0"));
    assert!(!log.any(|e| matches!(e, SimEvent::WindowOpened(_) | SimEvent::FeedStarted)));
}

#[test]
fn run_fails_without_displays() {
    let log = EventLog::default();
    let app = RvcApplication::new(
        rvc_camera(&log),
        SimDisplayDriver::new(log.clone()).with_displays(0),
        PipelineConfig::default(),
    );

    let (_sender, mut pump) = event::channel();
    let err = app.run(&mut pump).expect_err("run should fail");
    assert!(matches!(err, Error::NoDisplaysFound));
    assert!(!log.any(|e| matches!(e, SimEvent::FeedOpened { .. })));
}

#[test]
fn custom_camera_id_is_honoured() {
    let log = EventLog::default();
    let camera = SimCameraManager::new(log.clone()).with_input(CameraInput::new(
        "front",
        [Size::new(640, 360)],
        [PixelFormat::Nv12],
    ));
    let config = PipelineConfig {
        camera_id: "front".to_owned(),
        pipeline_index: 0,
        ..PipelineConfig::default()
    };
    let display = SimDisplayDriver::new(log.clone()).with_windows(1);
    let app = RvcApplication::new(camera, display, config);
    assert_eq!(app.config().camera_id, "front");

    app.initialize().expect("bootstrap should succeed");
    assert_eq!(app.pipeline().feed_state(), Some(FeedState::Opened));
    let front = Size::new(640, 360);
    assert!(log.any(|e| matches!(
        e,
        SimEvent::WindowOpened(WindowConfig { source_size, .. }) if *source_size == front
    )));
    app.lifecycle().teardown();
}

#[test]
fn capture_thread_shows_window_once_started() {
    let log = EventLog::default();
    let camera = rvc_camera(&log).with_frame_interval(Duration::from_millis(2));
    let display = SimDisplayDriver::new(log.clone());
    let app = RvcApplication::new(camera, display, PipelineConfig::default());
    app.initialize().expect("bootstrap should succeed");

    thread::sleep(Duration::from_millis(20));
    assert!(!log.any(|e| matches!(e, SimEvent::FrameShown(_))));
    assert_eq!(app.pipeline().power_state(), PowerState::Off);

    app.power().activate();
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.pipeline().power_state() != PowerState::On {
        assert!(Instant::now() < deadline, "no frame shown after activate");
        thread::sleep(Duration::from_millis(2));
    }

    app.power().deactivate();
    assert_eq!(app.pipeline().power_state(), PowerState::Off);

    app.lifecycle().teardown();
    assert_eq!(app.pipeline().feed_state(), None);
    assert!(log.contains(&SimEvent::DeviceReleased));
}

#[test]
fn visibility_from_another_thread() {
    let log = EventLog::default();
    let app = RvcApplication::new(
        rvc_camera(&log),
        SimDisplayDriver::new(log.clone()),
        PipelineConfig::default(),
    );
    let (sender, mut pump) = event::channel();

    let producer = thread::spawn(move || {
        for _ in 0..10 {
            sender.send(PumpEvent::Visibility(Visibility::Visible));
            sender.send(PumpEvent::Visibility(Visibility::Hidden));
        }
        sender.shutdown();
    });

    app.run(&mut pump).expect("run should succeed");
    producer.join().expect("producer thread");

    assert!(!log.any(|e| matches!(e, SimEvent::FrameShown(_))));
    assert_eq!(log.count(|e| *e == SimEvent::FeedStopped), 1);
}
