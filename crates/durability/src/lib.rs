//! Persistence layer for StreamBerry
//!
//! This crate handles everything that touches disk:
//!
//! - sbconf byte format: tag, framed pages and cells, end markers
//! - Gzip-wrapped config files with crash-safe saves
//! - Marker policies (lenient recovery or strict rejection)
//! - Save/load reports carrying non-fatal warnings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive; // Gzip wrapping, atomic save, load-into-board
pub mod config; // FormatConfig, MarkerPolicy
pub mod error; // FormatError
pub mod format; // Uncompressed sbconf encoding
pub mod report; // SaveReport, LoadReport, FormatWarning

// === Re-exports ===
pub use archive::{temp_path_for, ConfigArchive, LoadedDocument};
pub use config::{ConfigError, FormatConfig, MarkerPolicy, MAX_COMPRESSION_LEVEL};
pub use error::{FormatError, FormatResult};
pub use format::{
    check_end_marker, validate_header, CellReader, CellWriter, DocumentReader, DocumentWriter,
    Marker, PageReader, PageWriter, CELL_END, CELL_OVERHEAD, CELL_START, CONFIG_EXTENSION,
    END_OF_FILE, FILE_TAG, PAGE_END, PAGE_START,
};
pub use report::{FormatWarning, LoadReport, SaveReport};
