use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};
use parking_lot::Mutex;

use super::{EventLog, SimError, SimEvent};
use crate::device::CameraManager;
use crate::stream::{CameraFeed, FeedOp, FeedState, FrameReadyCallback};
use crate::types::{BufferIndex, CameraInput, FrameBuffers};

type CallbackSlot = Arc<Mutex<Option<FrameReadyCallback>>>;

/// Simulated capture driver.
pub struct SimCameraManager {
    inputs: HashMap<String, CameraInput>,
    log: EventLog,
    callback: CallbackSlot,
    frame_interval: Option<Duration>,
    fail_open: bool,
}

impl SimCameraManager {
    pub fn new(log: EventLog) -> Self {
        SimCameraManager {
            inputs: HashMap::new(),
            log,
            callback: Arc::new(Mutex::new(None)),
            frame_interval: None,
            fail_open: false,
        }
    }

    pub fn with_input(mut self, input: CameraInput) -> Self {
        self.inputs.insert(input.id().to_owned(), input);
        self
    }

    /// Deliver frames from a capture thread every `interval` while the feed
    /// is started.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    /// Make `open_feed` fail.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Handle delivering frame-ready notifications for the feed this manager
    /// opens. Can be taken before the feed exists.
    pub fn frame_trigger(&self) -> FrameTrigger {
        FrameTrigger {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl CameraManager for SimCameraManager {
    type Feed = SimFeed;
    type Error = SimError;

    fn query_inputs(&self) -> Result<HashMap<String, CameraInput>, Self::Error> {
        self.log.record(SimEvent::InputsQueried);
        Ok(self.inputs.clone())
    }

    fn open_feed(
        &self,
        _input: &CameraInput,
        buffers: FrameBuffers,
        on_frame_ready: FrameReadyCallback,
    ) -> Result<Self::Feed, Self::Error> {
        if self.fail_open {
            return Err(SimError::Injected("open feed"));
        }
        *self.callback.lock() = Some(on_frame_ready);
        self.log.record(SimEvent::FeedOpened {
            buffers: buffers.len(),
        });

        let state = Arc::new(Mutex::new(FeedState::Opened));
        let ticker = match self.frame_interval {
            Some(interval) => Some(Ticker::spawn(
                interval,
                buffers.len(),
                Arc::clone(&state),
                Arc::clone(&self.callback),
            )?),
            None => None,
        };

        Ok(SimFeed {
            state,
            callback: Arc::clone(&self.callback),
            log: self.log.clone(),
            ticker,
        })
    }
}

/// Delivers frame-ready notifications as if the capture driver had filled a
/// buffer.
#[derive(Clone)]
pub struct FrameTrigger {
    callback: CallbackSlot,
}

impl FrameTrigger {
    /// Invoke the feed's callback with `index`. Does nothing when no feed is
    /// open or the feed was stopped.
    pub fn deliver(&self, index: BufferIndex) {
        if let Some(callback) = self.callback.lock().as_mut() {
            callback(index);
        }
    }
}

/// Simulated capture feed.
pub struct SimFeed {
    state: Arc<Mutex<FeedState>>,
    callback: CallbackSlot,
    log: EventLog,
    ticker: Option<Ticker>,
}

impl SimFeed {
    fn transition(&mut self, op: FeedOp, event: SimEvent) -> Result<(), SimError> {
        let mut state = self.state.lock();
        *state = state.apply(op)?;
        self.log.record(event);
        Ok(())
    }
}

impl CameraFeed for SimFeed {
    type Error = SimError;

    fn state(&self) -> FeedState {
        *self.state.lock()
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.transition(FeedOp::Start, SimEvent::FeedStarted)
    }

    fn pause(&mut self) -> Result<(), Self::Error> {
        self.transition(FeedOp::Pause, SimEvent::FeedPaused)
    }

    fn resume(&mut self) -> Result<(), Self::Error> {
        self.transition(FeedOp::Resume, SimEvent::FeedResumed)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.transition(FeedOp::Stop, SimEvent::FeedStopped)?;
        *self.callback.lock() = None;
        Ok(())
    }
}

impl Drop for SimFeed {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
        }
        self.log.record(SimEvent::FeedReleased);
    }
}

/// Capture thread announcing buffers round-robin while the feed is started.
struct Ticker {
    // Dropping the sender wakes the thread up and ends it.
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(
        interval: Duration,
        buffer_count: usize,
        state: Arc<Mutex<FeedState>>,
        callback: CallbackSlot,
    ) -> Result<Self, SimError> {
        let (shutdown, shutdown_rx) = crossbeam_channel::bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("sim-capture".to_owned())
            .spawn(move || {
                let mut next: BufferIndex = 0;
                loop {
                    match shutdown_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        _ => break,
                    }
                    let started = *state.lock() == FeedState::Started;
                    if !started || buffer_count == 0 {
                        continue;
                    }
                    if let Some(callback) = callback.lock().as_mut() {
                        callback(next);
                    }
                    next = (next + 1) % buffer_count as BufferIndex;
                }
            })
            .map_err(|_| SimError::Injected("spawn capture thread"))?;
        Ok(Ticker { shutdown, handle })
    }

    fn join(self) {
        drop(self.shutdown);
        // The last pipeline reference can be released from inside a frame
        // callback, in which case the feed is dropped on this very thread.
        if self.handle.thread().id() != thread::current().id() {
            let _ = self.handle.join();
        }
    }
}
