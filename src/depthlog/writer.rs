// SPDX-License-Identifier: GPL-3.0-only

//! Append-only depth log writer
//!
//! Each append opens the file in append mode, writes one complete
//! record, and closes it again. There is no cross-record buffering and
//! prior bytes are never rewritten, so a crash mid-write can only
//! damage the record being written at that moment.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::DepthFrame;
use super::format::encode_record;
use crate::errors::DepthResult;

/// Writer bound to one depth log file
pub struct DepthLogWriter {
    path: PathBuf,
    records_written: u64,
}

impl DepthLogWriter {
    /// Create the log file, truncating any previous content at `path`
    pub fn create(path: &Path) -> DepthResult<Self> {
        std::fs::File::create(path)?;
        info!(path = %path.display(), "Created depth log");
        Ok(Self {
            path: path.to_path_buf(),
            records_written: 0,
        })
    }

    /// Append one frame as a complete record
    ///
    /// The frame's payload must cover the full sample grid; the writer
    /// never produces short records.
    pub fn append(&mut self, frame: &DepthFrame) -> DepthResult<()> {
        debug_assert!(frame.is_complete());

        let record = encode_record(frame);
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(&record)?;
        file.flush()?;

        self.records_written += 1;
        debug!(
            timestamp = frame.timestamp,
            record = self.records_written,
            bytes = record.len(),
            "Appended depth frame"
        );
        Ok(())
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended through this writer
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}
