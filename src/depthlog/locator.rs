// SPDX-License-Identifier: GPL-3.0-only

//! Nearest-timestamp frame lookup over a depth log
//!
//! A single forward scan, O(number of frames). Logs are bounded by one
//! recording session and lookups are interactive, so no index is kept;
//! the file itself is the source of truth.

use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use super::DepthFrame;
use super::format::RecordIter;
use crate::errors::{DepthResult, MeasureError};

/// Find the frame whose timestamp is nearest `target_ms`
///
/// The best candidate is replaced only on a strictly smaller absolute
/// difference, so an exact tie resolves to the earliest-written record.
/// Returns `Ok(None)` for a log with no complete records. A truncated
/// tail ends the scan without error; complete preceding records still
/// compete.
pub fn lookup(path: &Path, target_ms: i64) -> DepthResult<Option<DepthFrame>> {
    let file = std::fs::File::open(path)
        .map_err(|_| MeasureError::DepthDataNotFound(path.display().to_string()))?;

    let mut iter = RecordIter::new(BufReader::new(file));
    let mut best: Option<(i64, DepthFrame)> = None;
    let mut scanned = 0u64;

    for frame in iter.by_ref() {
        scanned += 1;
        let diff = (frame.timestamp - target_ms).abs();
        match &best {
            Some((best_diff, _)) if diff >= *best_diff => {}
            _ => best = Some((diff, frame)),
        }
    }

    debug!(
        path = %path.display(),
        target_ms,
        scanned,
        truncated = iter.was_truncated(),
        found = best.is_some(),
        "Depth log lookup finished"
    );

    Ok(best.map(|(_, frame)| frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depthlog::writer::DepthLogWriter;

    fn frame(timestamp: i64, fill: u8) -> DepthFrame {
        DepthFrame {
            timestamp,
            width: 2,
            height: 2,
            payload: vec![fill; 8],
        }
    }

    fn write_log(path: &Path, frames: &[DepthFrame]) {
        let mut writer = DepthLogWriter::create(path).unwrap();
        for f in frames {
            writer.append(f).unwrap();
        }
    }

    #[test]
    fn test_missing_file_is_depth_data_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = lookup(&dir.path().join("nope.dlog"), 0).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::DepthError::Measure(MeasureError::DepthDataNotFound(_))
        ));
    }

    #[test]
    fn test_empty_log_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.dlog");
        write_log(&path, &[]);
        assert!(lookup(&path, 1000).unwrap().is_none());
    }

    #[test]
    fn test_nearest_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.dlog");
        write_log(&path, &[frame(1000, 1), frame(1040, 2)]);

        // diff 15 beats diff 25
        let found = lookup(&path, 1025).unwrap().unwrap();
        assert_eq!(found.timestamp, 1040);

        // Equidistant (both diffs 20): earliest-written record wins
        let found = lookup(&path, 1020).unwrap().unwrap();
        assert_eq!(found.timestamp, 1000);
    }

    #[test]
    fn test_exact_tie_prefers_earliest_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tie.dlog");
        write_log(&path, &[frame(1000, 1), frame(1050, 2)]);

        // Both diffs are 25; the first-written record must win
        let found = lookup(&path, 1025).unwrap().unwrap();
        assert_eq!(found.timestamp, 1000);
        assert_eq!(found.payload[0], 1);
    }

    #[test]
    fn test_truncated_tail_still_finds_prior_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.dlog");
        write_log(&path, &[frame(1000, 1), frame(1033, 2)]);

        // Chop the final record's payload: declared length now exceeds
        // what is left in the file
        let len = std::fs::metadata(&path).unwrap().len();
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(len - 5).unwrap();

        let found = lookup(&path, 2000).unwrap().unwrap();
        assert_eq!(found.timestamp, 1000);
    }
}
