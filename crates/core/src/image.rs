//! Image codec adapter
//!
//! The container format treats images as opaque blobs. An [`ImageCodec`]
//! converts between the host's in-memory image type and those blobs.
//!
//! Two codecs ship with the crate:
//! - [`IdentityCodec`]: images are already-encoded byte vectors
//! - [`PngCodec`]: images are PNG files validated on decode

use thiserror::Error;

/// Codec between in-memory images and encoded blobs
///
/// Encode and decode failures are per-image: callers skip the affected
/// cell rather than abandoning a whole save or load.
pub trait ImageCodec {
    /// In-memory image type
    type Image;

    /// Encode an image into a blob
    fn encode(&self, image: &Self::Image) -> Result<Vec<u8>, CodecError>;

    /// Decode a blob into an image
    fn decode(&self, data: &[u8]) -> Result<Self::Image, CodecError>;

    /// Unique codec identifier, used in diagnostics
    fn codec_id(&self) -> &str;
}

impl<C: ImageCodec + ?Sized> ImageCodec for &C {
    type Image = C::Image;

    fn encode(&self, image: &Self::Image) -> Result<Vec<u8>, CodecError> {
        (**self).encode(image)
    }

    fn decode(&self, data: &[u8]) -> Result<Self::Image, CodecError> {
        (**self).decode(data)
    }

    fn codec_id(&self) -> &str {
        (**self).codec_id()
    }
}

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Image could not be encoded
    #[error("Encode error (codec={codec_id}): {detail}")]
    Encode {
        /// Codec ID that attempted the encode
        codec_id: String,
        /// Human-readable error description
        detail: String,
    },

    /// Blob could not be decoded
    #[error("Decode error (codec={codec_id}, data_len={data_len}): {detail}")]
    Decode {
        /// Codec ID that attempted the decode
        codec_id: String,
        /// Human-readable error description
        detail: String,
        /// Length of the blob that failed to decode
        data_len: usize,
    },
}

impl CodecError {
    /// Create an encode error
    pub fn encode(codec_id: impl Into<String>, detail: impl Into<String>) -> Self {
        CodecError::Encode {
            codec_id: codec_id.into(),
            detail: detail.into(),
        }
    }

    /// Create a decode error
    pub fn decode(codec_id: impl Into<String>, detail: impl Into<String>, data_len: usize) -> Self {
        CodecError::Decode {
            codec_id: codec_id.into(),
            detail: detail.into(),
            data_len,
        }
    }
}

// =============================================================================
// IdentityCodec
// =============================================================================

/// Pass-through codec: the image is its own encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityCodec;

impl ImageCodec for IdentityCodec {
    type Image = Vec<u8>;

    fn encode(&self, image: &Vec<u8>) -> Result<Vec<u8>, CodecError> {
        Ok(image.clone())
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }

    fn codec_id(&self) -> &str {
        "identity"
    }
}

// =============================================================================
// PngCodec
// =============================================================================

/// The 8-byte PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// A PNG image held in its encoded form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
}

impl PngImage {
    /// Parse PNG bytes, validating the signature and reading the dimensions
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CodecError> {
        if !bytes.starts_with(&PNG_SIGNATURE) {
            return Err(CodecError::decode(
                PngCodec::ID,
                "missing PNG signature",
                bytes.len(),
            ));
        }

        let size = imagesize::blob_size(&bytes).map_err(|e| {
            CodecError::decode(PngCodec::ID, format!("unreadable PNG header: {}", e), bytes.len())
        })?;

        Ok(PngImage {
            width: size.width,
            height: size.height,
            bytes,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Encoded PNG bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the image, returning the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Codec for PNG images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PngCodec;

impl PngCodec {
    /// Codec identifier
    pub const ID: &'static str = "png";
}

impl ImageCodec for PngCodec {
    type Image = PngImage;

    fn encode(&self, image: &PngImage) -> Result<Vec<u8>, CodecError> {
        if image.width == 0 || image.height == 0 {
            return Err(CodecError::encode(
                Self::ID,
                format!("degenerate image {}x{}", image.width, image.height),
            ));
        }
        Ok(image.bytes.clone())
    }

    fn decode(&self, data: &[u8]) -> Result<PngImage, CodecError> {
        PngImage::from_bytes(data.to_vec())
    }

    fn codec_id(&self) -> &str {
        Self::ID
    }
}

/// Build the smallest byte sequence `PngCodec` accepts: signature plus IHDR
#[doc(hidden)]
pub fn png_header_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    // bit depth 8, RGBA, default compression/filter/interlace
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    // IHDR CRC is not checked by the header probe
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}
