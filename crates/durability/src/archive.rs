//! Compressed config files
//!
//! A config file is the document stream wrapped in gzip. Saving is
//! crash-safe:
//!
//! 1. Write to a temporary file (`.<name>.tmp`) next to the target
//! 2. Finish the gzip stream and fsync the temporary file
//! 3. Atomic rename over the target
//! 4. fsync the parent directory
//!
//! Either the complete new file exists or the old one is untouched.
//!
//! Loading decodes into a standalone [`Document`]; a [`Board`] is only
//! modified after the whole file has been read successfully.

use crate::config::FormatConfig;
use crate::error::{tag_archive_error, FormatResult};
use crate::format::{DocumentReader, DocumentWriter};
use crate::report::{LoadReport, SaveReport};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use streamberry_core::{Board, Document, ImageCodec};
use tracing::{debug, info};

/// A document read from a config file, with its load report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument<I> {
    /// The decoded document
    pub document: Document<I>,
    /// Warnings and counts from the load
    pub report: LoadReport,
}

/// Reader adapter that tags gzip-layer failures as archive corruption
struct GzipSource<R: Read> {
    inner: GzDecoder<R>,
}

impl<R: Read> GzipSource<R> {
    fn new(reader: R) -> Self {
        GzipSource {
            inner: GzDecoder::new(reader),
        }
    }
}

impl<R: Read> Read for GzipSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(tag_archive_error)
    }
}

/// Saves and loads gzip-compressed config files
#[derive(Debug, Clone)]
pub struct ConfigArchive<C> {
    codec: C,
    config: FormatConfig,
}

impl<C: ImageCodec> ConfigArchive<C> {
    /// Create an archive handler, validating the configuration
    pub fn new(codec: C, config: FormatConfig) -> FormatResult<Self> {
        config.validate()?;
        Ok(ConfigArchive { codec, config })
    }

    /// Create an archive handler with the default configuration
    pub fn with_defaults(codec: C) -> Self {
        ConfigArchive {
            codec,
            config: FormatConfig::default(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// The image codec
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Write a document as a gzip stream
    pub fn write_to<W: Write>(&self, writer: W, document: &Document<C::Image>) -> FormatResult<SaveReport> {
        let mut encoder = GzEncoder::new(writer, Compression::new(self.config.compression_level));
        let mut report = SaveReport::default();
        DocumentWriter::new(&self.codec).write(&mut encoder, document, &mut report)?;
        encoder.finish()?;
        Ok(report)
    }

    /// Read a document from a gzip stream
    pub fn read_from<R: Read>(&self, reader: R) -> FormatResult<LoadedDocument<C::Image>> {
        let mut source = BufReader::new(GzipSource::new(reader));
        let mut report = LoadReport::default();
        let document = DocumentReader::new(&self.codec, &self.config).read(&mut source, &mut report)?;

        // Bytes after the end marker are ignored, but the gzip trailer is
        // only verified once the member has been read to the end
        io::copy(&mut source, &mut io::sink())?;
        Ok(LoadedDocument { document, report })
    }

    /// Encode a document into compressed bytes
    pub fn encode(&self, document: &Document<C::Image>) -> FormatResult<(Vec<u8>, SaveReport)> {
        let mut buffer = Vec::new();
        let report = self.write_to(&mut buffer, document)?;
        Ok((buffer, report))
    }

    /// Decode a document from compressed bytes
    pub fn decode(&self, data: &[u8]) -> FormatResult<LoadedDocument<C::Image>> {
        self.read_from(data)
    }

    /// Save a document to `path` atomically
    pub fn save(&self, path: &Path, document: &Document<C::Image>) -> FormatResult<SaveReport> {
        info!(target: "streamberry::format", path = %path.display(), pages = document.len(), "Saving config");

        let temp_path = temp_path_for(path);
        let result = self.write_temp_and_rename(&temp_path, path, document);
        if result.is_err() {
            // Best effort; the target is untouched either way
            let _ = fs::remove_file(&temp_path);
        }
        let report = result?;

        info!(
            target: "streamberry::format",
            path = %path.display(),
            pages = report.pages_written,
            cells = report.cells_written,
            warnings = report.warnings.len(),
            "Saved config"
        );
        Ok(report)
    }

    /// Load a document from `path`
    pub fn load(&self, path: &Path) -> FormatResult<LoadedDocument<C::Image>> {
        info!(target: "streamberry::format", path = %path.display(), "Loading config");

        let file = File::open(path)?;
        let loaded = self.read_from(BufReader::new(file))?;

        info!(
            target: "streamberry::format",
            path = %path.display(),
            pages = loaded.report.pages_read,
            cells = loaded.report.cells_read,
            warnings = loaded.report.warnings.len(),
            "Loaded config"
        );
        Ok(loaded)
    }

    /// Load `path` and swap the result into `board`
    ///
    /// On any error the board is left exactly as it was.
    pub fn load_into(&self, path: &Path, board: &mut Board<C::Image>) -> FormatResult<LoadReport> {
        let loaded = self.load(path)?;
        board.replace_document(loaded.document);
        Ok(loaded.report)
    }

    fn write_temp_and_rename(
        &self,
        temp_path: &Path,
        final_path: &Path,
        document: &Document<C::Image>,
    ) -> FormatResult<SaveReport> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(temp_path)?;

        let mut encoder = GzEncoder::new(
            BufWriter::new(file),
            Compression::new(self.config.compression_level),
        );
        let mut report = SaveReport::default();
        DocumentWriter::new(&self.codec).write(&mut encoder, document, &mut report)?;

        let file = encoder
            .finish()?
            .into_inner()
            .map_err(|e| e.into_error())?;
        if self.config.sync_on_save {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(temp_path, final_path)?;
        debug!(target: "streamberry::format", temp = %temp_path.display(), "Renamed temporary file into place");

        if self.config.sync_on_save {
            sync_parent_dir(final_path)?;
        }
        Ok(report)
    }
}

/// Temporary path used while saving `path`: `.<file_name>.tmp` in the same
/// directory
pub fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use streamberry_core::{GridPos, IdentityCodec, Page};

    fn sample_document() -> Document<Vec<u8>> {
        let mut page = Page::new();
        page.set(GridPos::new(0, 0).unwrap(), Some(vec![1, 2, 3]));
        page.set(GridPos::new(2, 4).unwrap(), Some(vec![4, 5]));
        Document::with_pages(vec![page, Page::new()]).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = FormatConfig::default().with_compression_level(42);
        assert!(matches!(
            ConfigArchive::new(IdentityCodec, config),
            Err(FormatError::Config(_))
        ));
    }

    #[test]
    fn test_encode_is_gzip() {
        let archive = ConfigArchive::with_defaults(IdentityCodec);
        let (bytes, report) = archive.encode(&sample_document()).unwrap();
        assert_eq!(&bytes[..2], &[0x1F, 0x8B]);
        assert_eq!(report.pages_written, 2);
        assert_eq!(report.cells_written, 2);
    }

    #[test]
    fn test_encode_decode() {
        let archive = ConfigArchive::new(IdentityCodec, FormatConfig::for_testing()).unwrap();
        let document = sample_document();
        let (bytes, _) = archive.encode(&document).unwrap();
        let loaded = archive.decode(&bytes).unwrap();
        assert_eq!(loaded.document, document);
        assert_eq!(loaded.report.cells_read, 2);
        assert!(loaded.report.is_clean());
    }

    #[test]
    fn test_every_compression_level_decodes() {
        let document = sample_document();
        for level in 0..=9 {
            let config = FormatConfig::for_testing().with_compression_level(level);
            let archive = ConfigArchive::new(IdentityCodec, config).unwrap();
            let (bytes, _) = archive.encode(&document).unwrap();
            assert_eq!(archive.decode(&bytes).unwrap().document, document);
        }
    }

    #[test]
    fn test_decode_plain_bytes_is_corrupt_archive() {
        let archive = ConfigArchive::with_defaults(IdentityCodec);
        let err = archive.decode(b"sbconf01\xFF not compressed").unwrap_err();
        assert!(matches!(err, FormatError::CorruptArchive(_)), "got {:?}", err);
    }

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("/tmp/layout.sbconf")),
            PathBuf::from("/tmp/.layout.sbconf.tmp")
        );
        assert_eq!(
            temp_path_for(Path::new("layout.sbconf")),
            PathBuf::from(".layout.sbconf.tmp")
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.sbconf");
        let archive = ConfigArchive::with_defaults(IdentityCodec);
        let document = sample_document();

        archive.save(&path, &document).unwrap();
        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());

        let loaded = archive.load(&path).unwrap();
        assert_eq!(loaded.document, document);
    }

    #[test]
    fn test_load_into_swaps_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.sbconf");
        let archive = ConfigArchive::new(IdentityCodec, FormatConfig::for_testing()).unwrap();
        archive.save(&path, &sample_document()).unwrap();

        let mut board = Board::new();
        board.select_page(1).unwrap();
        let report = archive.load_into(&path, &mut board).unwrap();
        assert!(report.is_clean());
        assert_eq!(board.document(), &sample_document());
        assert_eq!(board.current_page(), 0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ConfigArchive::with_defaults(IdentityCodec);
        let err = archive.load(&dir.path().join("missing.sbconf")).unwrap_err();
        assert!(matches!(err, FormatError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }
}
