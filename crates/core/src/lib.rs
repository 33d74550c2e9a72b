//! Core types and traits for StreamBerry layouts
//!
//! This crate defines the data model that persistence reads and writes:
//! - GridPos: bounds-checked (row, column) on the fixed 3×5 page grid
//! - Page / Document: sparse grids of images and the ordered pages holding them
//! - ImageCodec: adapter between in-memory images and encoded blobs
//! - GridEditor / Board: the editor surface and its in-memory implementation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod editor;
pub mod grid;
pub mod image;

pub use document::{Document, DocumentError, Page, MAX_PAGES};
pub use editor::{page_label, snapshot_editor, Board, GridEditor};
pub use grid::{GridError, GridPos, CELLS_PER_PAGE, GRID_COLS, GRID_ROWS};
pub use image::{CodecError, IdentityCodec, ImageCodec, PngCodec, PngImage, PNG_SIGNATURE};

#[doc(hidden)]
pub use image::png_header_bytes;
