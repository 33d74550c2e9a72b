//! Pages and documents
//!
//! A [`Document`] is an ordered list of [`Page`]s; a page's position in the
//! list is its index. Each page is a fixed 3×5 grid of optional images.
//!
//! Both types are generic over the image type so the same model works with
//! raw encoded blobs ([`IdentityCodec`](crate::IdentityCodec)) or decoded
//! images ([`PngCodec`](crate::PngCodec)).

use crate::grid::{GridPos, GRID_COLS, GRID_ROWS};
use thiserror::Error;

/// Maximum number of pages in a document
///
/// The page index is stored as a single byte in the sbconf format.
pub const MAX_PAGES: usize = 256;

/// Errors from document structure operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Adding a page would exceed [`MAX_PAGES`]
    #[error("Document cannot hold more than {max} pages")]
    TooManyPages {
        /// The page limit
        max: usize,
    },

    /// Page index does not exist
    #[error("Page {index} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested index
        index: usize,
        /// Current page count
        count: usize,
    },
}

/// One page: a fixed 3×5 grid of optional images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<I> {
    cells: [[Option<I>; GRID_COLS]; GRID_ROWS],
}

impl<I> Default for Page<I> {
    fn default() -> Self {
        Page {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| None)),
        }
    }
}

impl<I> Page<I> {
    /// Create an empty page
    pub fn new() -> Self {
        Self::default()
    }

    /// Image at a position, if any
    pub fn get(&self, pos: GridPos) -> Option<&I> {
        self.cells[pos.row() as usize][pos.col() as usize].as_ref()
    }

    /// Mutable access to the image at a position
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut I> {
        self.cells[pos.row() as usize][pos.col() as usize].as_mut()
    }

    /// Replace the cell contents, returning the previous occupant
    pub fn set(&mut self, pos: GridPos, image: Option<I>) -> Option<I> {
        std::mem::replace(&mut self.cells[pos.row() as usize][pos.col() as usize], image)
    }

    /// Remove and return the image at a position
    pub fn take(&mut self, pos: GridPos) -> Option<I> {
        self.cells[pos.row() as usize][pos.col() as usize].take()
    }

    /// True if no cell holds an image
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Number of cells holding an image
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, &I)> + '_ {
        GridPos::all().filter_map(move |pos| self.get(pos).map(|image| (pos, image)))
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            *cell = None;
        }
    }
}

impl<I> From<Page<I>> for Document<I> {
    fn from(page: Page<I>) -> Self {
        Document { pages: vec![page] }
    }
}

/// An ordered sequence of pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<I> {
    pages: Vec<Page<I>>,
}

impl<I> Default for Document<I> {
    fn default() -> Self {
        Document { pages: Vec::new() }
    }
}

impl<I> Document<I> {
    /// Create a document with no pages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from existing pages
    pub fn with_pages(pages: Vec<Page<I>>) -> Result<Self, DocumentError> {
        if pages.len() > MAX_PAGES {
            return Err(DocumentError::TooManyPages { max: MAX_PAGES });
        }
        Ok(Document { pages })
    }

    /// Number of pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if the document has no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in index order
    pub fn pages(&self) -> &[Page<I>] {
        &self.pages
    }

    /// Page by index
    pub fn page(&self, index: usize) -> Option<&Page<I>> {
        self.pages.get(index)
    }

    /// Mutable page by index
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page<I>> {
        self.pages.get_mut(index)
    }

    /// Append a page, returning its index
    pub fn push_page(&mut self, page: Page<I>) -> Result<usize, DocumentError> {
        if self.pages.len() >= MAX_PAGES {
            return Err(DocumentError::TooManyPages { max: MAX_PAGES });
        }
        self.pages.push(page);
        Ok(self.pages.len() - 1)
    }

    /// Insert a page at `index`, shifting later pages up
    pub fn insert_page(&mut self, index: usize, page: Page<I>) -> Result<(), DocumentError> {
        if self.pages.len() >= MAX_PAGES {
            return Err(DocumentError::TooManyPages { max: MAX_PAGES });
        }
        if index > self.pages.len() {
            return Err(self.out_of_range(index));
        }
        self.pages.insert(index, page);
        Ok(())
    }

    /// Remove and return the page at `index`, shifting later pages down
    pub fn remove_page(&mut self, index: usize) -> Result<Page<I>, DocumentError> {
        if index >= self.pages.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.pages.remove(index))
    }

    /// Image at a cell, if the page exists and the cell is occupied
    pub fn cell_at(&self, page: usize, pos: GridPos) -> Option<&I> {
        self.pages.get(page).and_then(|p| p.get(pos))
    }

    /// Replace a cell's contents, returning the previous occupant
    pub fn set_cell(
        &mut self,
        page: usize,
        pos: GridPos,
        image: Option<I>,
    ) -> Result<Option<I>, DocumentError> {
        let count = self.pages.len();
        let target = self
            .pages
            .get_mut(page)
            .ok_or(DocumentError::PageOutOfRange { index: page, count })?;
        Ok(target.set(pos, image))
    }

    /// Total occupied cells across all pages
    pub fn occupied_cells(&self) -> usize {
        self.pages.iter().map(Page::occupied_count).sum()
    }

    /// Consume the document, returning its pages
    pub fn into_pages(self) -> Vec<Page<I>> {
        self.pages
    }

    fn out_of_range(&self, index: usize) -> DocumentError {
        DocumentError::PageOutOfRange {
            index,
            count: self.pages.len(),
        }
    }
}
