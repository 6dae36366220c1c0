// SPDX-License-Identifier: GPL-3.0-only

//! Single-shot still capture
//!
//! One bracketed sensor sample written to disk: the color image is
//! always saved, the depth image only when the sensor had one ready.
//! Both files are raw dumps named by capture timestamp.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use super::DepthSensorSession;
use super::capture::sample_once;
use crate::constants::{RAW_FILE_EXT, STILL_COLOR_PREFIX, STILL_DEPTH_PREFIX};
use crate::errors::DepthResult;

/// Result of a still capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillCapture {
    /// Raw color image file
    pub color_path: PathBuf,
    /// Raw depth file, `None` when the depth buffer was unavailable
    pub depth_path: Option<PathBuf>,
}

/// Capture one still into `dir`
///
/// The depth file holds only raw samples; its dimensions are not
/// recorded, which is why [`crate::measure::measure_still`] falls back
/// to an assumed resolution.
pub fn capture_still<S: DepthSensorSession>(
    session: &mut S,
    dir: &Path,
) -> DepthResult<StillCapture> {
    std::fs::create_dir_all(dir)?;

    let timestamp_ms = Utc::now().timestamp_millis();
    let sample = sample_once(session)?;

    let depth_path = match sample.depth {
        Some(depth) => {
            let path = dir.join(format!(
                "{}{}.{}",
                STILL_DEPTH_PREFIX, timestamp_ms, RAW_FILE_EXT
            ));
            std::fs::write(&path, &depth.data)?;
            info!(
                path = %path.display(),
                width = depth.width,
                height = depth.height,
                "Saved still depth file"
            );
            Some(path)
        }
        None => {
            warn!("Depth buffer unavailable for still capture");
            None
        }
    };

    let color_path = dir.join(format!(
        "{}{}.{}",
        STILL_COLOR_PREFIX, timestamp_ms, RAW_FILE_EXT
    ));
    std::fs::write(&color_path, &sample.color)?;
    info!(
        path = %color_path.display(),
        bytes = sample.color.len(),
        "Saved still color file"
    );

    Ok(StillCapture {
        color_path,
        depth_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SyntheticSensor;

    #[test]
    fn test_still_writes_color_and_depth() {
        let dir = tempfile::tempdir().unwrap();
        let mut sensor = SyntheticSensor::new(4, 4);

        let still = capture_still(&mut sensor, dir.path()).unwrap();
        assert!(still.color_path.exists());
        let depth_path = still.depth_path.expect("synthetic depth should be ready");
        assert_eq!(std::fs::metadata(&depth_path).unwrap().len(), 4 * 4 * 2);
    }

    #[test]
    fn test_still_without_depth_keeps_color() {
        let dir = tempfile::tempdir().unwrap();
        let mut sensor = SyntheticSensor::new(4, 4).with_depth_warmup(1);

        let still = capture_still(&mut sensor, dir.path()).unwrap();
        assert!(still.color_path.exists());
        assert!(still.depth_path.is_none());
    }
}
