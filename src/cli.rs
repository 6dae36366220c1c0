// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for depth capture and measurement
//!
//! This module provides command-line functionality for:
//! - Recording a depth session to a binary log
//! - Capturing a single still
//! - Measuring depth deltas in stills and recorded logs
//! - Inspecting a log file

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use depthcam::config::Config;
use depthcam::measure::{self, Point};
use depthcam::recording::{RecorderEvent, RecordingController};
use depthcam::sensor::{self, SyntheticSensor, capture_still};
use depthcam::{RecordIter, storage};

/// Record a depth session until Ctrl-C or the optional duration elapses
pub fn record(duration_secs: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let capture_dir = storage::ensure_capture_dir(&config.capture_dir)?;

    // No sensor SDK is linked here; the synthetic backend stands in for
    // a real session behind the same trait.
    let session = sensor::shared(SyntheticSensor::new(config.still_width, config.still_height));
    let mut controller = RecordingController::new(session, capture_dir)
        .with_frame_interval(Duration::from_millis(config.frame_interval_ms));

    let events = controller.subscribe();
    let (log_path, started_at) = controller.start()?;
    println!("Recording to {} (started at {} ms)", log_path.display(), started_at);
    println!("Press Ctrl-C to stop.");

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    })?;

    let deadline = duration_secs.map(|s| Instant::now() + Duration::from_secs(s));
    let mut logged: u64 = 0;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                break;
            }
        }

        match events.recv_timeout(Duration::from_millis(200)) {
            Ok(RecorderEvent::FrameLogged { seq, .. }) => logged = seq + 1,
            Ok(RecorderEvent::Failed(reason)) => {
                eprintln!("Recording failed: {}", reason);
                return Err(reason.into());
            }
            Ok(_) => {}
            Err(_) => {}
        }
    }

    controller.stop()?;
    println!("Stopped after {} logged frames: {}", logged, log_path.display());
    Ok(())
}

/// Capture a single still (color + depth when available)
pub fn still() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let capture_dir = storage::ensure_capture_dir(&config.capture_dir)?;

    let mut sensor = SyntheticSensor::new(config.still_width, config.still_height);
    let result = capture_still(&mut sensor, &capture_dir)?;

    println!("Color: {}", result.color_path.display());
    match result.depth_path {
        Some(path) => println!("Depth: {}", path.display()),
        None => println!("Depth: unavailable"),
    }
    Ok(())
}

/// Measure the depth delta between two pixels of a still depth file
pub fn measure_still(
    depth_path: PathBuf,
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let delta = measure::measure_still_with_resolution(
        &depth_path,
        config.still_width,
        config.still_height,
        Point::new(x1, y1),
        Point::new(x2, y2),
    )?;
    println!("{}", delta);
    Ok(())
}

/// Measure the depth delta in the recorded frame nearest a timestamp
pub fn measure_recorded(
    log_path: PathBuf,
    timestamp: i64,
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let delta = measure::measure_recorded(
        &log_path,
        timestamp,
        Point::new(x1, y1),
        Point::new(x2, y2),
    )?;
    println!("{}", delta);
    Ok(())
}

/// Print the records of a depth log
pub fn inspect(log_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::open(&log_path)
        .map_err(|e| format!("Cannot open {}: {}", log_path.display(), e))?;

    let mut iter = RecordIter::new(std::io::BufReader::new(file));
    let mut count: u64 = 0;
    for frame in iter.by_ref() {
        count += 1;
        println!(
            "  [{}] t={} ms  {}x{}  {} bytes",
            count,
            frame.timestamp,
            frame.width,
            frame.height,
            frame.payload.len()
        );
    }

    println!("{} complete record(s)", count);
    if iter.was_truncated() {
        println!("Note: log ends with a truncated record (ignored)");
    }
    Ok(())
}
