//! Byte-level read helpers shared by the cell, page and document readers
//!
//! Every helper names what it was reading so a short stream surfaces as
//! `Truncated { context }` rather than a bare EOF.

use crate::error::{FormatError, FormatResult};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{BufRead, Read};

/// Largest up-front allocation for a blob; longer blobs grow as they arrive
const BLOB_PREALLOC_LIMIT: usize = 64 * 1024;

/// Look at the next byte without consuming it; `None` at end of stream
pub(crate) fn peek_byte<R: BufRead>(reader: &mut R, context: &'static str) -> FormatResult<Option<u8>> {
    let buf = reader
        .fill_buf()
        .map_err(|e| FormatError::from_read(e, context))?;
    Ok(buf.first().copied())
}

pub(crate) fn read_u8<R: Read>(reader: &mut R, context: &'static str) -> FormatResult<u8> {
    reader
        .read_u8()
        .map_err(|e| FormatError::from_read(e, context))
}

pub(crate) fn read_u32_be<R: Read>(reader: &mut R, context: &'static str) -> FormatResult<u32> {
    reader
        .read_u32::<BigEndian>()
        .map_err(|e| FormatError::from_read(e, context))
}

/// Read exactly `len` bytes
pub(crate) fn read_blob<R: Read>(
    reader: &mut R,
    len: u32,
    context: &'static str,
) -> FormatResult<Vec<u8>> {
    let expected = len as usize;
    let mut blob = Vec::with_capacity(expected.min(BLOB_PREALLOC_LIMIT));
    reader
        .take(u64::from(len))
        .read_to_end(&mut blob)
        .map_err(|e| FormatError::from_read(e, context))?;

    if blob.len() != expected {
        return Err(FormatError::Truncated { context });
    }
    Ok(blob)
}
