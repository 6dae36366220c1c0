// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Delay between capture-loop ticks (~30 Hz nominal)
///
/// Cadence is best-effort: capture and log-append latency add to this
/// delay, so the effective rate is at or below 30 Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Bytes per raw depth sample (unsigned 16-bit, little-endian)
pub const BYTES_PER_SAMPLE: usize = 2;

/// Fixed record header size: timestamp i64 + width i32 + height i32 + payload_len i32
pub const RECORD_HEADER_LEN: usize = 8 + 4 + 4 + 4;

/// Assumed resolution for still depth files, which carry no dimensions.
///
/// Still files are headerless raw sample dumps; if the capture
/// resolution differs from this value, pixel addressing in
/// `measure_still` is silently wrong. Recorded logs do not have this
/// problem because every record stores its own width and height.
pub const DEFAULT_STILL_WIDTH: u32 = 640;
pub const DEFAULT_STILL_HEIGHT: u32 = 480;

/// File name prefixes under the capture directory
pub const LOG_FILE_PREFIX: &str = "depth_log_";
pub const STILL_COLOR_PREFIX: &str = "color_";
pub const STILL_DEPTH_PREFIX: &str = "depth_";

/// Extension for depth log files
pub const LOG_FILE_EXT: &str = "dlog";

/// Extension for raw still dumps (color and depth)
pub const RAW_FILE_EXT: &str = "raw";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_len_matches_field_sum() {
        assert_eq!(RECORD_HEADER_LEN, 20);
    }

    #[test]
    fn test_frame_interval_is_roughly_30hz() {
        let per_second = 1000 / FRAME_INTERVAL.as_millis();
        assert!(per_second >= 30);
    }
}
