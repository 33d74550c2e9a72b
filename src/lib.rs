//! StreamBerry - paged image-grid layouts for stream decks
//!
//! A layout is a [`Document`]: an ordered list of pages, each a 3×5 grid of
//! optional images. Layouts are saved as gzip-compressed `.sbconf` files.
//!
//! # Quick Start
//!
//! ```ignore
//! use streamberry::{Board, ConfigArchive, GridEditor, GridPos, IdentityCodec};
//!
//! let mut board = Board::new();
//! board.set_cell(0, GridPos::new(0, 0)?, Some(png_bytes))?;
//!
//! let archive = ConfigArchive::with_defaults(IdentityCodec);
//! archive.save(path, board.document())?;
//! archive.load_into(path, &mut board)?;
//! ```
//!
//! # Architecture
//!
//! - `streamberry-core`: grid, page and document model, image codecs, the editor
//! - `streamberry-durability`: the sbconf format and file handling

pub use streamberry_core::*;
pub use streamberry_durability::*;
