//! Page records
//!
//! ```text
//! PAGE := 0x01 <page_index: u8> CELL* 0xFE
//! ```
//!
//! The reader loops on the next byte: `0x02` starts another cell, anything
//! else ends the page and is checked as the `0xFE` marker.

use crate::config::FormatConfig;
use crate::error::{FormatError, FormatResult};
use crate::format::cell::{CellReader, CellWriter};
use crate::format::stream::{peek_byte, read_u8};
use crate::format::validator::check_end_marker;
use crate::format::{Marker, CELL_START, PAGE_END, PAGE_START};
use crate::report::{FormatWarning, LoadReport, SaveReport};
use std::io::{BufRead, Write};
use streamberry_core::{ImageCodec, Page};
use tracing::debug;

/// Writes one page with its framing
pub struct PageWriter<'a, C> {
    cells: CellWriter<'a, C>,
}

impl<'a, C: ImageCodec> PageWriter<'a, C> {
    /// Create a writer encoding images with `codec`
    pub fn new(codec: &'a C) -> Self {
        PageWriter {
            cells: CellWriter::new(codec),
        }
    }

    /// Write `0x01 <index>`, every occupied cell in row-major order, `0xFE`
    ///
    /// Returns the number of bytes written.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        index: u8,
        page: &Page<C::Image>,
        report: &mut SaveReport,
    ) -> FormatResult<u64> {
        writer.write_all(&[PAGE_START, index])?;
        let mut written = 2;

        for (pos, image) in page.occupied() {
            written += self
                .cells
                .write(writer, index as usize, pos, image, report)?;
        }

        writer.write_all(&[PAGE_END])?;
        written += 1;

        report.pages_written += 1;
        debug!(target: "streamberry::format", page = index, bytes = written, "Wrote page");
        Ok(written)
    }
}

/// Reads one page
pub struct PageReader<'a, C> {
    cells: CellReader<'a, C>,
    config: &'a FormatConfig,
}

impl<'a, C: ImageCodec> PageReader<'a, C> {
    /// Create a reader decoding images with `codec`
    pub fn new(codec: &'a C, config: &'a FormatConfig) -> Self {
        PageReader {
            cells: CellReader::new(codec, config),
            config,
        }
    }

    /// Read a page whose `0x01` start marker has already been consumed
    ///
    /// The stored page index must equal `expected_index`. The page is built
    /// off to the side and only returned once its end marker is checked.
    pub fn read<R: BufRead>(
        &self,
        reader: &mut R,
        expected_index: usize,
        report: &mut LoadReport,
    ) -> FormatResult<Page<C::Image>> {
        let stored = read_u8(reader, "page index")?;
        if stored as usize != expected_index {
            return Err(FormatError::PageIndexMismatch {
                expected: expected_index,
                actual: stored,
            });
        }

        let mut page = Page::new();
        let mut cells = 0usize;

        while peek_byte(reader, "cell marker")? == Some(CELL_START) {
            reader.consume(1);
            let record = self.cells.read(reader, expected_index, report)?;

            let Some(image) = record.image else {
                continue;
            };
            if page.set(record.pos, Some(image)).is_some() {
                report.warn(FormatWarning::DuplicateCell {
                    page: expected_index,
                    row: record.pos.row(),
                    col: record.pos.col(),
                });
            } else {
                cells += 1;
            }
        }

        check_end_marker(reader, Marker::PageEnd, self.config.marker_policy, report)?;

        report.pages_read += 1;
        report.cells_read += cells;
        debug!(target: "streamberry::format", page = expected_index, cells, "Read page");
        Ok(page)
    }
}
