//! Branch report detection and validation.
//!
//! Checks whether input looks like a decodable report without parsing any
//! agent rows.

use crate::decoder::{normalize_text, split_blocks, ReportMarkers};
use crate::error::{Error, Result};
use std::path::Path;

/// What a quick scan of a report found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormat {
    /// Input size in bytes
    pub byte_len: usize,
    /// Whether the start boundary is present
    pub has_start: bool,
    /// Whether the end boundary follows the start boundary
    pub has_end: bool,
    /// Candidate agent blocks between the boundaries
    pub block_count: usize,
}

impl ReportFormat {
    /// Both table boundaries were found.
    pub fn is_complete(&self) -> bool {
        self.has_start && self.has_end
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_complete() {
            write!(f, "branch report, {} agent blocks", self.block_count)
        } else {
            write!(f, "text without a complete report table")
        }
    }
}

/// Detect report structure from a file path.
///
/// # Example
/// ```no_run
/// use dumpdoc::detect::detect_report_from_path;
///
/// let format = detect_report_from_path("branch.txt").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_report_from_path<P: AsRef<Path>>(path: P) -> Result<ReportFormat> {
    let data = std::fs::read(path)?;
    detect_report_from_bytes(&data, &ReportMarkers::default())
}

/// Detect report structure from bytes.
///
/// Fails with [`Error::Encoding`] when the data is not UTF-8.
pub fn detect_report_from_bytes(data: &[u8], markers: &ReportMarkers) -> Result<ReportFormat> {
    let text = std::str::from_utf8(data).map_err(|e| Error::Encoding(e.to_string()))?;
    let text = normalize_text(text);

    let start = if markers.start_boundary.is_empty() {
        None
    } else {
        text.find(markers.start_boundary.as_str())
            .map(|pos| pos + markers.start_boundary.len())
    };
    let end = match start {
        Some(start) if !markers.end_boundary.is_empty() => text[start..]
            .find(markers.end_boundary.as_str())
            .map(|pos| start + pos),
        _ => None,
    };

    let block_count = match (start, end) {
        (Some(start), Some(end)) if !markers.block_splitter.is_empty() => {
            split_blocks(&text[start..end], markers).len()
        }
        _ => 0,
    };

    Ok(ReportFormat {
        byte_len: data.len(),
        has_start: start.is_some(),
        has_end: end.is_some(),
        block_count,
    })
}

/// Check if a file holds a complete report table.
pub fn is_report<P: AsRef<Path>>(path: P) -> bool {
    detect_report_from_path(path)
        .map(|format| format.is_complete())
        .unwrap_or(false)
}

/// Check if bytes hold a complete report table.
pub fn is_report_bytes(data: &[u8]) -> bool {
    detect_report_from_bytes(data, &ReportMarkers::default())
        .map(|format| format.is_complete())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(blocks: usize) -> String {
        let m = ReportMarkers::default();
        let mut body = String::new();
        for i in 0..blocks {
            body.push_str(&format!("{}  Agent {}  Deposits 1{}\n", i + 1, i, m.block_splitter));
        }
        format!("{}\n{}trailer\n{}\n", m.start_boundary, body, m.end_boundary)
    }

    #[test]
    fn test_detect_blocks() {
        let format = detect_report_from_bytes(report(3).as_bytes(), &ReportMarkers::default()).unwrap();
        assert!(format.is_complete());
        assert_eq!(format.block_count, 3);
    }

    #[test]
    fn test_detect_missing_end() {
        let m = ReportMarkers::default();
        let text = format!("{}\nrows", m.start_boundary);
        let format = detect_report_from_bytes(text.as_bytes(), &m).unwrap();
        assert!(format.has_start);
        assert!(!format.has_end);
        assert_eq!(format.block_count, 0);
        assert!(!is_report_bytes(text.as_bytes()));
    }

    #[test]
    fn test_detect_invalid_utf8() {
        let result = detect_report_from_bytes(&[0xFF, 0xFE, 0x00], &ReportMarkers::default());
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_plain_text_is_not_report() {
        assert!(!is_report_bytes(b"hello world"));
        assert!(!is_report("/nonexistent/report.txt"));
    }
}
