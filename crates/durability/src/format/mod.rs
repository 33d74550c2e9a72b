//! sbconf byte format
//!
//! The decompressed stream is a tag followed by framed pages and cells:
//!
//! ```text
//! FILE := TAG PAGE* EOF_MARKER
//! TAG  := "sbconf01"                                   (8 bytes)
//! PAGE := 0x01 <page_index: u8> CELL* 0xFE
//! CELL := 0x02 <row: u8> <col: u8> <len: u32 BE> <blob: len bytes> 0xFD
//! EOF_MARKER := 0xFF
//! ```
//!
//! Only occupied cells are written. Readers and writers for each level
//! live in their own module:
//!
//! - `cell`: one cell record
//! - `page`: one page with its cells
//! - `document`: tag, pages, end-of-file marker
//! - `validator`: tag and end-marker checks

pub mod cell;
pub mod document;
pub mod page;
pub mod validator;

mod stream;

use std::fmt;

pub use cell::{CellReader, CellWriter};
pub use document::{DocumentReader, DocumentWriter};
pub use page::{PageReader, PageWriter};
pub use validator::{check_end_marker, validate_header};

/// File tag at the start of every decompressed stream
pub const FILE_TAG: [u8; 8] = *b"sbconf01";

/// Start of a page record
pub const PAGE_START: u8 = 0x01;

/// Start of a cell record
pub const CELL_START: u8 = 0x02;

/// End of a cell record
pub const CELL_END: u8 = 0xFD;

/// End of a page record
pub const PAGE_END: u8 = 0xFE;

/// End of the document
pub const END_OF_FILE: u8 = 0xFF;

/// File extension for config files
pub const CONFIG_EXTENSION: &str = "sbconf";

/// Bytes in a cell record besides the blob: marker, row, col, length, end
pub const CELL_OVERHEAD: usize = 1 + 2 + 4 + 1;

/// End-of-structure markers checked on read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `0xFD` after a cell blob
    CellEnd,
    /// `0xFE` after a page's cells
    PageEnd,
    /// `0xFF` after the last page
    EndOfFile,
}

impl Marker {
    /// Byte value of the marker
    pub const fn byte(self) -> u8 {
        match self {
            Marker::CellEnd => CELL_END,
            Marker::PageEnd => PAGE_END,
            Marker::EndOfFile => END_OF_FILE,
        }
    }

    /// Human-readable marker name
    pub const fn name(self) -> &'static str {
        match self {
            Marker::CellEnd => "cell end",
            Marker::PageEnd => "page end",
            Marker::EndOfFile => "end of file",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_tag_is_ascii() {
        assert_eq!(
            FILE_TAG,
            [0x73, 0x62, 0x63, 0x6F, 0x6E, 0x66, 0x30, 0x31]
        );
    }

    #[test]
    fn test_marker_bytes() {
        assert_eq!(Marker::CellEnd.byte(), 0xFD);
        assert_eq!(Marker::PageEnd.byte(), 0xFE);
        assert_eq!(Marker::EndOfFile.byte(), 0xFF);
        assert_eq!(Marker::EndOfFile.to_string(), "end of file");
    }

    #[test]
    fn test_start_markers_never_collide_with_end_markers() {
        for start in [PAGE_START, CELL_START] {
            for end in [Marker::CellEnd, Marker::PageEnd, Marker::EndOfFile] {
                assert_ne!(start, end.byte());
            }
        }
    }
}
