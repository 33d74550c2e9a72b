//! Save and load reports
//!
//! Problems that affect a single cell or marker never fail the whole
//! operation. They are collected here as [`FormatWarning`]s and logged.

use crate::format::Marker;
use std::fmt;
use tracing::warn;

/// A recoverable problem found during save or load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatWarning {
    /// End marker held the wrong byte (lenient mode)
    MarkerMismatch {
        /// Which marker was checked
        marker: Marker,
        /// Expected byte
        expected: u8,
        /// Byte found
        actual: u8,
    },
    /// Image could not be encoded; the cell was not written
    ImageEncodeFailed {
        /// Page index
        page: usize,
        /// Row
        row: u8,
        /// Column
        col: u8,
        /// Codec error text
        detail: String,
    },
    /// Blob could not be decoded; the cell was left empty
    ImageDecodeFailed {
        /// Page index
        page: usize,
        /// Row
        row: u8,
        /// Column
        col: u8,
        /// Codec error text
        detail: String,
    },
    /// A page held two records for the same cell; the later one was kept
    DuplicateCell {
        /// Page index
        page: usize,
        /// Row
        row: u8,
        /// Column
        col: u8,
    },
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatWarning::MarkerMismatch {
                marker,
                expected,
                actual,
            } => write!(
                f,
                "{} mismatch: expected 0x{:02X}, got 0x{:02X}",
                marker, expected, actual
            ),
            FormatWarning::ImageEncodeFailed {
                page,
                row,
                col,
                detail,
            } => write!(
                f,
                "page {} cell ({}, {}) skipped, encode failed: {}",
                page, row, col, detail
            ),
            FormatWarning::ImageDecodeFailed {
                page,
                row,
                col,
                detail,
            } => write!(
                f,
                "page {} cell ({}, {}) left empty, decode failed: {}",
                page, row, col, detail
            ),
            FormatWarning::DuplicateCell { page, row, col } => write!(
                f,
                "page {} cell ({}, {}) appears more than once",
                page, row, col
            ),
        }
    }
}

/// Outcome of a save
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Pages written
    pub pages_written: usize,
    /// Cell records written
    pub cells_written: usize,
    /// Uncompressed payload size in bytes
    pub payload_bytes: u64,
    /// Recoverable problems
    pub warnings: Vec<FormatWarning>,
}

impl SaveReport {
    /// True if nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub(crate) fn warn(&mut self, warning: FormatWarning) {
        warn!(target: "streamberry::format", "{}", warning);
        self.warnings.push(warning);
    }
}

/// Outcome of a load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Pages read
    pub pages_read: usize,
    /// Cells placed on the document
    pub cells_read: usize,
    /// Recoverable problems
    pub warnings: Vec<FormatWarning>,
}

impl LoadReport {
    /// True if the file was read without any warnings
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub(crate) fn warn(&mut self, warning: FormatWarning) {
        warn!(target: "streamberry::format", "{}", warning);
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = FormatWarning::MarkerMismatch {
            marker: Marker::CellEnd,
            expected: 0xFD,
            actual: 0x00,
        };
        assert!(w.to_string().contains("0xFD"));

        let w = FormatWarning::ImageDecodeFailed {
            page: 1,
            row: 2,
            col: 3,
            detail: "bad png".to_string(),
        };
        let msg = w.to_string();
        assert!(msg.contains("page 1"));
        assert!(msg.contains("(2, 3)"));
        assert!(msg.contains("bad png"));
    }

    #[test]
    fn test_reports_start_clean() {
        let mut save = SaveReport::default();
        assert!(save.is_clean());
        save.warn(FormatWarning::ImageEncodeFailed {
            page: 0,
            row: 0,
            col: 0,
            detail: "nope".to_string(),
        });
        assert!(!save.is_clean());

        let mut load = LoadReport::default();
        assert!(load.is_clean());
        load.warn(FormatWarning::DuplicateCell {
            page: 0,
            row: 1,
            col: 1,
        });
        assert_eq!(load.warnings.len(), 1);
    }
}
