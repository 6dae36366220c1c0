// SPDX-License-Identifier: GPL-3.0-only

//! Thread lifecycle for the capture loop
//!
//! One background thread runs the tick closure until it is told to stop
//! or reports a fatal error. Cancellation is cooperative: the stop flag
//! is polled once per tick, so stop latency is bounded by one in-flight
//! tick plus the inter-tick delay.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

/// Action returned by the tick closure to control loop behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickAction {
    /// Run the next tick after the inter-tick delay
    Continue,
    /// Leave the loop cleanly
    Stop,
    /// Leave the loop because of an unrecoverable failure
    Fatal(String),
}

/// Handle to a running capture loop thread
pub struct FrameLoop {
    thread_handle: Option<JoinHandle<()>>,
    stop_signal: Arc<AtomicBool>,
    name: String,
}

impl FrameLoop {
    /// Spawn the loop thread
    ///
    /// `tick_fn` performs one capture tick; the loop sleeps `interval`
    /// between ticks (best-effort cadence, tick latency adds to it).
    pub fn spawn<F>(name: &str, interval: Duration, mut tick_fn: F) -> Self
    where
        F: FnMut() -> TickAction + Send + 'static,
    {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop_signal_clone = Arc::clone(&stop_signal);
        let name_clone = name.to_string();

        info!(name = %name, interval_ms = interval.as_millis() as u64, "Starting capture loop");

        let thread_handle = thread::spawn(move || {
            debug!(name = %name_clone, "Capture loop thread started");

            loop {
                if stop_signal_clone.load(Ordering::SeqCst) {
                    debug!(name = %name_clone, "Stop signal observed");
                    break;
                }

                match tick_fn() {
                    TickAction::Continue => {}
                    TickAction::Stop => {
                        debug!(name = %name_clone, "Tick requested stop");
                        break;
                    }
                    TickAction::Fatal(reason) => {
                        warn!(name = %name_clone, reason = %reason, "Capture loop failed, stopping");
                        break;
                    }
                }

                thread::sleep(interval);
            }

            info!(name = %name_clone, "Capture loop thread exiting");
        });

        Self {
            thread_handle: Some(thread_handle),
            stop_signal,
            name: name.to_string(),
        }
    }

    /// Whether the loop thread is still alive
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Set the stop flag without waiting
    pub fn request_stop(&self) {
        debug!(name = %self.name, "Requesting capture loop stop");
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Set the stop flag and wait for the thread to finish
    ///
    /// The in-flight tick is allowed to complete.
    pub fn stop(&mut self) {
        self.request_stop();
        self.join();
    }

    /// Wait for the thread without setting the stop flag
    pub fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                warn!(name = %self.name, "Capture loop thread panicked: {:?}", e);
            } else {
                debug!(name = %self.name, "Capture loop thread finished");
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!(name = %self.name, "FrameLoop dropped, stopping loop");
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn test_loop_stops_itself() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut frame_loop = FrameLoop::spawn("test-loop", Duration::from_millis(1), move || {
            if counter_clone.fetch_add(1, Ordering::SeqCst) >= 4 {
                TickAction::Stop
            } else {
                TickAction::Continue
            }
        });

        frame_loop.join();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_stop_signal_ends_loop() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut frame_loop = FrameLoop::spawn("test-loop", Duration::from_millis(5), move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            TickAction::Continue
        });

        thread::sleep(Duration::from_millis(30));
        frame_loop.stop();
        assert!(counter.load(Ordering::SeqCst) > 0);
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn test_fatal_ends_loop() {
        let mut frame_loop = FrameLoop::spawn("test-fatal", Duration::from_millis(1), || {
            TickAction::Fatal("boom".into())
        });

        frame_loop.join();
        assert!(!frame_loop.is_running());
    }
}
