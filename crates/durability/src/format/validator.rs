//! Tag and marker validation
//!
//! `validate_header` runs before anything else is read. `check_end_marker`
//! closes every cell, page and the document itself; what happens on a
//! mismatch depends on the [`MarkerPolicy`].

use crate::config::MarkerPolicy;
use crate::error::{FormatError, FormatResult};
use crate::format::stream::read_u8;
use crate::format::{Marker, FILE_TAG};
use crate::report::{FormatWarning, LoadReport};
use std::io::Read;

/// Read the 8-byte file tag and reject anything else
///
/// A stream shorter than the tag is also `NotAValidConfig`. Failures of the
/// compression layer surface as `CorruptArchive`.
pub fn validate_header<R: Read>(reader: &mut R) -> FormatResult<()> {
    let mut found = Vec::with_capacity(FILE_TAG.len());
    reader
        .take(FILE_TAG.len() as u64)
        .read_to_end(&mut found)
        .map_err(|e| FormatError::from_read(e, "file tag"))?;

    if found != FILE_TAG {
        return Err(FormatError::NotAValidConfig { found });
    }
    Ok(())
}

/// Consume one byte and compare it against `marker`
///
/// Under [`MarkerPolicy::Lenient`] a mismatch is recorded in `report` and
/// reading continues; under [`MarkerPolicy::Strict`] it fails.
pub fn check_end_marker<R: Read>(
    reader: &mut R,
    marker: Marker,
    policy: MarkerPolicy,
    report: &mut LoadReport,
) -> FormatResult<()> {
    let actual = read_u8(reader, marker.name())?;
    let expected = marker.byte();
    if actual == expected {
        return Ok(());
    }

    match policy {
        MarkerPolicy::Strict => Err(FormatError::MarkerMismatch {
            marker,
            expected,
            actual,
        }),
        MarkerPolicy::Lenient => {
            report.warn(FormatWarning::MarkerMismatch {
                marker,
                expected,
                actual,
            });
            Ok(())
        }
    }
}
