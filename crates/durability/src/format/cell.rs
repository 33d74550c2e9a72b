//! Cell records
//!
//! ```text
//! CELL := 0x02 <row: u8> <col: u8> <len: u32 BE> <blob: len bytes> 0xFD
//! ```

use crate::config::FormatConfig;
use crate::error::{FormatError, FormatResult};
use crate::format::stream::{read_blob, read_u32_be, read_u8};
use crate::format::validator::check_end_marker;
use crate::format::{Marker, CELL_END, CELL_OVERHEAD, CELL_START};
use crate::report::{FormatWarning, LoadReport, SaveReport};
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{Read, Write};
use streamberry_core::{GridPos, ImageCodec};

/// Writes one occupied cell
pub struct CellWriter<'a, C> {
    codec: &'a C,
}

impl<'a, C: ImageCodec> CellWriter<'a, C> {
    /// Create a writer encoding images with `codec`
    pub fn new(codec: &'a C) -> Self {
        CellWriter { codec }
    }

    /// Encode and write an image
    ///
    /// If the codec fails, nothing is written, an `ImageEncodeFailed`
    /// warning is recorded, and `Ok(0)` is returned. Otherwise returns the
    /// number of bytes written.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        page: usize,
        pos: GridPos,
        image: &C::Image,
        report: &mut SaveReport,
    ) -> FormatResult<u64> {
        let blob = match self.codec.encode(image) {
            Ok(blob) => blob,
            Err(e) => {
                report.warn(FormatWarning::ImageEncodeFailed {
                    page,
                    row: pos.row(),
                    col: pos.col(),
                    detail: e.to_string(),
                });
                return Ok(0);
            }
        };

        let written = Self::write_record(writer, pos, &blob)?;
        report.cells_written += 1;
        Ok(written)
    }

    /// Write a cell record for an already-encoded blob
    pub fn write_record<W: Write>(writer: &mut W, pos: GridPos, blob: &[u8]) -> FormatResult<u64> {
        let len = u32::try_from(blob.len()).map_err(|_| FormatError::BlobTooLarge {
            len: blob.len() as u64,
            max: u64::from(u32::MAX),
        })?;

        writer.write_all(&[CELL_START, pos.row(), pos.col()])?;
        writer.write_u32::<BigEndian>(len)?;
        writer.write_all(blob)?;
        writer.write_u8(CELL_END)?;

        Ok((CELL_OVERHEAD + blob.len()) as u64)
    }
}

/// A cell read from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord<I> {
    /// Position on the page
    pub pos: GridPos,
    /// Decoded image, or `None` if the codec rejected the blob
    pub image: Option<I>,
}

/// Reads one cell record
pub struct CellReader<'a, C> {
    codec: &'a C,
    config: &'a FormatConfig,
}

impl<'a, C: ImageCodec> CellReader<'a, C> {
    /// Create a reader decoding images with `codec`
    pub fn new(codec: &'a C, config: &'a FormatConfig) -> Self {
        CellReader { codec, config }
    }

    /// Read a cell whose `0x02` start marker has already been consumed
    ///
    /// Row and column are checked against the grid before the blob is read.
    /// A blob the codec cannot decode yields `image: None` and an
    /// `ImageDecodeFailed` warning.
    pub fn read<R: Read>(
        &self,
        reader: &mut R,
        page: usize,
        report: &mut LoadReport,
    ) -> FormatResult<CellRecord<C::Image>> {
        let row = read_u8(reader, "cell row")?;
        let col = read_u8(reader, "cell column")?;
        let pos = GridPos::new(row as usize, col as usize)
            .map_err(|_| FormatError::CellOutOfBounds { page, row, col })?;

        let len = read_u32_be(reader, "blob length")?;
        if len > self.config.max_blob_len {
            return Err(FormatError::BlobTooLarge {
                len: u64::from(len),
                max: u64::from(self.config.max_blob_len),
            });
        }
        let blob = read_blob(reader, len, "blob")?;

        let image = match self.codec.decode(&blob) {
            Ok(image) => Some(image),
            Err(e) => {
                report.warn(FormatWarning::ImageDecodeFailed {
                    page,
                    row,
                    col,
                    detail: e.to_string(),
                });
                None
            }
        };

        check_end_marker(reader, Marker::CellEnd, self.config.marker_policy, report)?;

        Ok(CellRecord { pos, image })
    }
}
