//! sbconf error types

use crate::config::ConfigError;
use crate::format::Marker;
use std::fmt;
use std::io;
use streamberry_core::DocumentError;
use thiserror::Error;

/// Errors that can occur while saving or loading a config file
#[derive(Debug, Error)]
pub enum FormatError {
    /// The gzip layer rejected the stream (bad magic, bad deflate data, CRC)
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    /// The decompressed stream does not start with the file tag
    #[error("Not a valid config file (found tag {found:?})")]
    NotAValidConfig {
        /// The bytes found where the tag was expected (may be short)
        found: Vec<u8>,
    },

    /// An end marker held the wrong byte (strict mode only)
    #[error("{marker} mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    MarkerMismatch {
        /// Which marker was checked
        marker: Marker,
        /// Expected byte
        expected: u8,
        /// Byte found in the stream
        actual: u8,
    },

    /// A stored page index did not match its position
    #[error("Page index mismatch: expected {expected}, got {actual}")]
    PageIndexMismatch {
        /// Position of the page in the stream
        expected: usize,
        /// Index stored in the page header
        actual: u8,
    },

    /// A cell record addressed a position outside the 3×5 grid
    #[error("Cell ({row}, {col}) on page {page} is outside the 3x5 grid")]
    CellOutOfBounds {
        /// Page holding the record
        page: usize,
        /// Stored row
        row: u8,
        /// Stored column
        col: u8,
    },

    /// A blob exceeded the length limit
    #[error("Blob of {len} bytes exceeds limit of {max} bytes")]
    BlobTooLarge {
        /// Blob length
        len: u64,
        /// Applicable limit
        max: u64,
    },

    /// The document has more pages than a one-byte index can address
    #[error("Document has {count} pages, the format holds at most 256")]
    TooManyPages {
        /// Page count of the rejected document
        count: usize,
    },

    /// The decompressed stream ended inside a structure
    #[error("Unexpected end of stream while reading {context}")]
    Truncated {
        /// What was being read
        context: &'static str,
    },

    /// Document model invariant violated
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Invalid format configuration
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[source] io::Error),
}

/// Result type for sbconf operations
pub type FormatResult<T> = Result<T, FormatError>;

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        match archive_corruption(&e) {
            Some(detail) => FormatError::CorruptArchive(detail),
            None => FormatError::Io(e),
        }
    }
}

impl FormatError {
    /// Classify an error raised while reading `context` from the stream
    pub(crate) fn from_read(e: io::Error, context: &'static str) -> Self {
        if let Some(detail) = archive_corruption(&e) {
            return FormatError::CorruptArchive(detail);
        }
        if e.kind() == io::ErrorKind::UnexpectedEof {
            return FormatError::Truncated { context };
        }
        FormatError::Io(e)
    }

    /// True if the error was caused by the file's bytes rather than the
    /// environment
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            FormatError::CorruptArchive(_)
                | FormatError::NotAValidConfig { .. }
                | FormatError::MarkerMismatch { .. }
                | FormatError::PageIndexMismatch { .. }
                | FormatError::CellOutOfBounds { .. }
                | FormatError::Truncated { .. }
        )
    }

    /// Short message suitable for a status bar
    pub fn user_message(&self) -> &'static str {
        match self {
            FormatError::CorruptArchive(_) => "Not a valid config file (archive is corrupt)",
            FormatError::NotAValidConfig { .. } => "Not a valid config file",
            FormatError::MarkerMismatch { .. }
            | FormatError::PageIndexMismatch { .. }
            | FormatError::CellOutOfBounds { .. }
            | FormatError::Truncated { .. } => "Config file is damaged",
            FormatError::BlobTooLarge { .. } => "Config file contains an oversized image",
            FormatError::TooManyPages { .. } | FormatError::Document(_) => {
                "Too many pages to save"
            }
            FormatError::Config(_) => "Invalid format settings",
            FormatError::Io(_) => "Could not access the config file",
        }
    }
}

// =============================================================================
// Archive corruption tagging
// =============================================================================

/// Payload attached to IO errors that originate in the gzip layer
///
/// The gzip reader wraps its failures in this type so they can be told apart
/// from truncation of an otherwise valid decompressed stream.
#[derive(Debug)]
pub(crate) struct ArchiveCorruption(String);

impl fmt::Display for ArchiveCorruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ArchiveCorruption {}

/// Tag an IO error from the gzip layer as archive corruption
pub(crate) fn tag_archive_error(e: io::Error) -> io::Error {
    match e.kind() {
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            io::Error::new(io::ErrorKind::InvalidData, ArchiveCorruption(e.to_string()))
        }
        _ => e,
    }
}

fn archive_corruption(e: &io::Error) -> Option<String> {
    e.get_ref()
        .and_then(|inner| inner.downcast_ref::<ArchiveCorruption>())
        .map(|c| c.0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormatError::MarkerMismatch {
            marker: Marker::PageEnd,
            expected: 0xFE,
            actual: 0x07,
        };
        let msg = err.to_string();
        assert!(msg.contains("page end"));
        assert!(msg.contains("0xFE"));
        assert!(msg.contains("0x07"));

        let err = FormatError::PageIndexMismatch {
            expected: 2,
            actual: 5,
        };
        assert!(err.to_string().contains("expected 2, got 5"));

        let err = FormatError::NotAValidConfig {
            found: b"PK\x03\x04".to_vec(),
        };
        assert!(err.to_string().contains("Not a valid config"));
    }

    #[test]
    fn test_distinct_user_messages() {
        let corrupt = FormatError::CorruptArchive("invalid gzip header".to_string());
        let bad_tag = FormatError::NotAValidConfig { found: Vec::new() };
        assert_ne!(corrupt.user_message(), bad_tag.user_message());
        assert!(corrupt.is_corruption());
        assert!(bad_tag.is_corruption());
    }

    #[test]
    fn test_plain_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: FormatError = io_err.into();
        assert!(matches!(err, FormatError::Io(_)));
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_tagged_io_error_becomes_corrupt_archive() {
        let raw = io::Error::new(io::ErrorKind::InvalidInput, "invalid gzip header");
        let err: FormatError = tag_archive_error(raw).into();
        match err {
            FormatError::CorruptArchive(detail) => assert!(detail.contains("gzip header")),
            other => panic!("expected CorruptArchive, got {:?}", other),
        }
    }

    #[test]
    fn test_tagging_leaves_other_kinds_alone() {
        let raw = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: FormatError = tag_archive_error(raw).into();
        assert!(matches!(err, FormatError::Io(_)));
    }

    #[test]
    fn test_from_read_classifies_eof() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(
            FormatError::from_read(eof, "blob"),
            FormatError::Truncated { context: "blob" }
        ));

        let tagged = tag_archive_error(io::Error::new(io::ErrorKind::UnexpectedEof, "gz eof"));
        assert!(matches!(
            FormatError::from_read(tagged, "blob"),
            FormatError::CorruptArchive(_)
        ));
    }
}
