// SPDX-License-Identifier: GPL-3.0-only

//! Recording controller
//!
//! Owns the Idle/Recording state machine and the background capture
//! loop. Each tick drives the capture unit, appends the frame to the
//! depth log, and mirrors it into an in-memory queue. Fatal in-tick
//! failures fail-stop the loop: state is forced back to Idle and a
//! `Failed` event is emitted, so a later `stop()` reports
//! `NotRecording` and the log simply ends early.

pub mod frame_loop;

pub use frame_loop::{FrameLoop, TickAction};

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use crate::constants::FRAME_INTERVAL;
use crate::depthlog::{DepthLogWriter, QueuedFrame};
use crate::errors::{DepthResult, RecordingError};
use crate::sensor::{CaptureOutcome, DepthSensorSession, SharedSession, capture};
use crate::storage;

/// Controller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording {
        log_path: PathBuf,
        started_at_ms: i64,
    },
}

/// Status events emitted by the capture loop
///
/// The channel exists so callers can detect silent loop termination;
/// without it a fatal in-loop failure is only observable as a later
/// `NotRecording` from `stop()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    Started { log_path: PathBuf, started_at_ms: i64 },
    FrameLogged { seq: u64, timestamp: i64 },
    Skipped,
    Stopped,
    Failed(String),
}

/// State shared between the controller and the loop thread
struct Shared {
    state: Mutex<RecorderState>,
    queue: Mutex<VecDeque<QueuedFrame>>,
    events: Mutex<Option<Sender<RecorderEvent>>>,
}

impl Shared {
    /// Deliver an event to the subscriber, if any; send errors are ignored
    fn emit(&self, event: RecorderEvent) {
        if let Ok(guard) = self.events.lock() {
            if let Some(sender) = guard.as_ref() {
                let _ = sender.send(event);
            }
        }
    }
}

/// Recording controller for one sensor session
pub struct RecordingController<S: DepthSensorSession + 'static> {
    session: SharedSession<S>,
    capture_dir: PathBuf,
    interval: std::time::Duration,
    shared: Arc<Shared>,
    frame_loop: Option<FrameLoop>,
}

impl<S: DepthSensorSession + 'static> RecordingController<S> {
    /// Create a controller writing logs under `capture_dir`
    pub fn new(session: SharedSession<S>, capture_dir: PathBuf) -> Self {
        Self {
            session,
            capture_dir,
            interval: FRAME_INTERVAL,
            shared: Arc::new(Shared {
                state: Mutex::new(RecorderState::Idle),
                queue: Mutex::new(VecDeque::new()),
                events: Mutex::new(None),
            }),
            frame_loop: None,
        }
    }

    /// Override the inter-frame delay (nominal ~33 ms)
    pub fn with_frame_interval(mut self, interval: std::time::Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Subscribe to recorder events
    ///
    /// Single subscriber: a new call replaces the previous channel.
    pub fn subscribe(&self) -> Receiver<RecorderEvent> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut guard) = self.shared.events.lock() {
            *guard = Some(tx);
        }
        rx
    }

    /// Start a new recording session
    ///
    /// Creates a fresh log file, clears the in-memory queue, and spawns
    /// the capture loop. Fails with `AlreadyRecording` unless Idle.
    pub fn start(&mut self) -> DepthResult<(PathBuf, i64)> {
        {
            let state = self.shared.state.lock().unwrap();
            if matches!(*state, RecorderState::Recording { .. }) {
                return Err(RecordingError::AlreadyRecording.into());
            }
        }

        // Reap a loop that fail-stopped on its own
        if let Some(mut stale) = self.frame_loop.take() {
            stale.join();
        }

        std::fs::create_dir_all(&self.capture_dir)
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;
        let log_path = storage::new_log_path(&self.capture_dir);
        let mut writer = DepthLogWriter::create(&log_path)
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        let started_at_ms = Utc::now().timestamp_millis();

        self.shared.queue.lock().unwrap().clear();
        *self.shared.state.lock().unwrap() = RecorderState::Recording {
            log_path: log_path.clone(),
            started_at_ms,
        };

        info!(path = %log_path.display(), started_at_ms, "Recording started");
        self.shared.emit(RecorderEvent::Started {
            log_path: log_path.clone(),
            started_at_ms,
        });

        let session = Arc::clone(&self.session);
        let shared = Arc::clone(&self.shared);
        let mut seq: u64 = 0;
        let mut last_timestamp = started_at_ms;

        self.frame_loop = Some(FrameLoop::spawn("depth-recording", self.interval, move || {
            let timestamp = clamp_monotonic(Utc::now().timestamp_millis(), last_timestamp);

            let outcome = {
                let mut session = match session.lock() {
                    Ok(guard) => guard,
                    Err(_) => return fail_stop(&shared, "sensor session mutex poisoned"),
                };
                capture::acquire(&mut *session, timestamp)
            };

            match outcome {
                Ok(CaptureOutcome::Frame(frame)) => {
                    if let Err(e) = writer.append(&frame) {
                        return fail_stop(&shared, &e.to_string());
                    }
                    last_timestamp = timestamp;
                    if let Ok(mut queue) = shared.queue.lock() {
                        queue.push_back(QueuedFrame { seq, frame });
                    }
                    shared.emit(RecorderEvent::FrameLogged { seq, timestamp });
                    seq += 1;
                    TickAction::Continue
                }
                Ok(CaptureOutcome::Skipped) => {
                    shared.emit(RecorderEvent::Skipped);
                    TickAction::Continue
                }
                Err(e) => fail_stop(&shared, &e.to_string()),
            }
        }));

        Ok((log_path, started_at_ms))
    }

    /// Stop the active recording
    ///
    /// Sets the cooperative stop flag, lets the in-flight tick finish,
    /// and joins the loop thread. Fails with `NotRecording` unless
    /// Recording; a loop that already fail-stopped also reports
    /// `NotRecording` here.
    pub fn stop(&mut self) -> DepthResult<()> {
        {
            let state = self.shared.state.lock().unwrap();
            if !matches!(*state, RecorderState::Recording { .. }) {
                return Err(RecordingError::NotRecording.into());
            }
        }

        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }

        *self.shared.state.lock().unwrap() = RecorderState::Idle;
        info!("Recording stopped");
        self.shared.emit(RecorderEvent::Stopped);
        Ok(())
    }

    /// Current controller state
    pub fn state(&self) -> RecorderState {
        self.shared.state.lock().unwrap().clone()
    }

    /// Whether a recording is active
    pub fn is_recording(&self) -> bool {
        matches!(self.state(), RecorderState::Recording { .. })
    }

    /// Snapshot of the in-memory frame queue
    ///
    /// Written only by the loop thread; readable from any thread. The
    /// queue is unbounded and cleared when a new recording starts.
    pub fn queued_frames(&self) -> Vec<QueuedFrame> {
        self.shared
            .queue
            .lock()
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of queued frames
    pub fn queue_len(&self) -> usize {
        self.shared.queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl<S: DepthSensorSession + 'static> Drop for RecordingController<S> {
    fn drop(&mut self) {
        if self.is_recording() {
            let _ = self.stop();
        }
    }
}

/// Force the shared state to Idle and report the failure
fn fail_stop(shared: &Shared, reason: &str) -> TickAction {
    warn!(reason = %reason, "Recording loop fail-stop");
    if let Ok(mut state) = shared.state.lock() {
        *state = RecorderState::Idle;
    }
    shared.emit(RecorderEvent::Failed(reason.to_string()));
    TickAction::Fatal(reason.to_string())
}

/// Keep frame timestamps non-decreasing across clock steps
///
/// Log order must equal timestamp order; the locator's tie-break rule
/// depends on it.
fn clamp_monotonic(now_ms: i64, last_ms: i64) -> i64 {
    now_ms.max(last_ms)
}
