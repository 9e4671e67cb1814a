//! Batch result aggregation.

use serde::Serialize;
use std::fmt;

use super::types::ItemResult;

/// Totals derived once from a completed result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_items: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Input bytes over all items.
    pub original_bytes: u64,
    /// Output bytes over successful items.
    pub output_bytes: u64,
    /// Rounded percentage of `original_bytes` saved; 0 when nothing
    /// succeeded, negative when outputs grew.
    pub saved_percent: i64,
}

/// Summarizes a result set. Never fails.
pub fn summarize(results: &[ItemResult]) -> BatchSummary {
    let original_bytes: u64 = results.iter().map(ItemResult::original_size).sum();
    let output_bytes: u64 = results.iter().filter_map(ItemResult::output_size).sum();
    let succeeded = results.iter().filter(|r| r.is_success()).count();
    let saved = if succeeded == 0 {
        0
    } else {
        saved_percent(original_bytes, output_bytes)
    };

    BatchSummary {
        total_items: results.len(),
        succeeded,
        failed: results.len() - succeeded,
        original_bytes,
        output_bytes,
        saved_percent: saved,
    }
}

/// `round(100 × (1 − output/original))`, or 0 for an empty original.
pub(crate) fn saved_percent(original: u64, output: u64) -> i64 {
    if original == 0 {
        return 0;
    }
    let ratio = output as f64 / original as f64;
    ((1.0 - ratio) * 100.0 + 0.5).floor() as i64
}

/// Formats a byte count with 1024-based units, at most two decimals.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut exp = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exp < UNITS.len() - 1 {
        scaled /= 1024;
        exp += 1;
    }
    let value = bytes as f64 / 1024f64.powi(exp as i32);

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exp])
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} → {} • Saved {}%",
            format_bytes(self.original_bytes),
            format_bytes(self.output_bytes),
            self.saved_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConversionPath, ConvertError, ConvertedImage};
    use crate::format::ImageFormat;
    use bytes::Bytes;

    fn success(original: u64, output: usize) -> ItemResult {
        ItemResult::Success {
            name: "ok".to_string(),
            original_size: original,
            output: ConvertedImage {
                data: Bytes::from(vec![0u8; output]),
                format: ImageFormat::Webp,
                path: ConversionPath::Local,
            },
        }
    }

    fn failure(original: u64) -> ItemResult {
        ItemResult::Failure {
            name: "bad".to_string(),
            original_size: original,
            error: ConvertError::decode("corrupt"),
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_summarize_mixed_results() {
        let results = vec![success(1000, 200), failure(500), success(500, 100)];
        let summary = summarize(&results);

        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.original_bytes, 2000);
        assert_eq!(summary.output_bytes, 300);
        assert_eq!(summary.saved_percent, 85);
    }

    #[test]
    fn test_failed_items_count_toward_original_total() {
        let summary = summarize(&[success(1000, 500), failure(1000)]);
        assert_eq!(summary.original_bytes, 2000);
        assert_eq!(summary.output_bytes, 500);
        assert_eq!(summary.saved_percent, 75);
    }

    #[test]
    fn test_summarize_empty_original_is_zero_percent() {
        let summary = summarize(&[success(0, 10)]);
        assert_eq!(summary.saved_percent, 0);
        assert_eq!(summarize(&[]).saved_percent, 0);
    }

    #[test]
    fn test_all_failures_save_nothing() {
        let summary = summarize(&[failure(400), failure(600)]);
        assert_eq!(summary.original_bytes, 1000);
        assert_eq!(summary.output_bytes, 0);
        assert_eq!(summary.saved_percent, 0);
    }

    #[test]
    fn test_growth_is_negative() {
        assert_eq!(saved_percent(100, 150), -50);
    }

    #[test]
    fn test_display() {
        let summary = summarize(&[success(1_572_864, 307_200)]);
        assert_eq!(summary.to_string(), "Total: 1.5 MB → 300 KB • Saved 80%");
    }
}
