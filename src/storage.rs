// SPDX-License-Identifier: GPL-3.0-only

//! Capture-directory and file-naming helpers

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::constants::{LOG_FILE_EXT, LOG_FILE_PREFIX};
use crate::errors::DepthResult;

/// Default capture directory: `~/.local/share/depthcam` (platform
/// equivalent), falling back to the current directory
pub fn default_capture_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("depthcam"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure the capture directory exists and return it
pub fn ensure_capture_dir(dir: &Path) -> DepthResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    debug!(path = %dir.display(), "Capture directory ready");
    Ok(dir.to_path_buf())
}

/// Timestamped path for a new depth log
pub fn new_log_path(dir: &Path) -> PathBuf {
    let ts = Utc::now().timestamp_millis();
    dir.join(format!("{}{}.{}", LOG_FILE_PREFIX, ts, LOG_FILE_EXT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_shape() {
        let path = new_log_path(Path::new("/tmp/captures"));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(LOG_FILE_PREFIX));
        assert!(name.ends_with(LOG_FILE_EXT));
    }

    #[test]
    fn test_ensure_capture_dir_creates() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let created = ensure_capture_dir(&nested).unwrap();
        assert!(created.is_dir());
    }
}
