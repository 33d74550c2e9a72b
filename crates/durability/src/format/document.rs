//! Whole-document encoding (uncompressed)
//!
//! ```text
//! FILE := "sbconf01" PAGE* 0xFF
//! ```
//!
//! The stored page index is authoritative: page N must carry index N.

use crate::config::FormatConfig;
use crate::error::{FormatError, FormatResult};
use crate::format::page::{PageReader, PageWriter};
use crate::format::stream::peek_byte;
use crate::format::validator::{check_end_marker, validate_header};
use crate::format::{Marker, END_OF_FILE, FILE_TAG, PAGE_START};
use crate::report::{LoadReport, SaveReport};
use std::io::{BufRead, Write};
use streamberry_core::{Document, ImageCodec, MAX_PAGES};

/// Writes a document as an uncompressed sbconf stream
pub struct DocumentWriter<'a, C> {
    pages: PageWriter<'a, C>,
}

impl<'a, C: ImageCodec> DocumentWriter<'a, C> {
    /// Create a writer encoding images with `codec`
    pub fn new(codec: &'a C) -> Self {
        DocumentWriter {
            pages: PageWriter::new(codec),
        }
    }

    /// Write tag, pages in index order, and the end-of-file marker
    ///
    /// Documents over 256 pages are rejected before anything is written.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        document: &Document<C::Image>,
        report: &mut SaveReport,
    ) -> FormatResult<()> {
        if document.len() > MAX_PAGES {
            return Err(FormatError::TooManyPages {
                count: document.len(),
            });
        }

        writer.write_all(&FILE_TAG)?;
        let mut written = FILE_TAG.len() as u64;

        for (index, page) in document.pages().iter().enumerate() {
            let index = u8::try_from(index).map_err(|_| FormatError::TooManyPages {
                count: document.len(),
            })?;
            written += self.pages.write(writer, index, page, report)?;
        }

        writer.write_all(&[END_OF_FILE])?;
        written += 1;

        report.payload_bytes = written;
        Ok(())
    }

    /// Encode a document into an uncompressed byte vector
    pub fn write_to_vec(
        &self,
        document: &Document<C::Image>,
    ) -> FormatResult<(Vec<u8>, SaveReport)> {
        let mut buffer = Vec::new();
        let mut report = SaveReport::default();
        self.write(&mut buffer, document, &mut report)?;
        Ok((buffer, report))
    }
}

/// Reads a document from an uncompressed sbconf stream
pub struct DocumentReader<'a, C> {
    pages: PageReader<'a, C>,
    config: &'a FormatConfig,
}

impl<'a, C: ImageCodec> DocumentReader<'a, C> {
    /// Create a reader decoding images with `codec`
    pub fn new(codec: &'a C, config: &'a FormatConfig) -> Self {
        DocumentReader {
            pages: PageReader::new(codec, config),
            config,
        }
    }

    /// Validate the tag, read pages while the next byte is `0x01`, then
    /// check the end-of-file marker
    ///
    /// Bytes after the end-of-file marker are not read.
    pub fn read<R: BufRead>(
        &self,
        reader: &mut R,
        report: &mut LoadReport,
    ) -> FormatResult<Document<C::Image>> {
        validate_header(reader)?;

        let mut document = Document::new();
        while peek_byte(reader, "page marker")? == Some(PAGE_START) {
            reader.consume(1);
            let page = self.pages.read(reader, document.len(), report)?;
            document.push_page(page)?;
        }

        check_end_marker(reader, Marker::EndOfFile, self.config.marker_policy, report)?;
        Ok(document)
    }

    /// Decode a document from an uncompressed byte slice
    pub fn read_from_slice(&self, data: &[u8]) -> FormatResult<(Document<C::Image>, LoadReport)> {
        let mut report = LoadReport::default();
        let mut cursor = std::io::Cursor::new(data);
        let document = self.read(&mut cursor, &mut report)?;
        Ok((document, report))
    }
}
