//! Grid editor model
//!
//! [`GridEditor`] is the surface persistence needs from an editor: page
//! count, cell access, and page insertion/removal. [`Board`] is the
//! in-memory implementation used by the desktop front end.
//!
//! Construction and activation are separate. Building a [`Document`] never
//! touches a board; a finished document is swapped in with
//! [`Board::replace_document`]. The only implicit page creation is
//! [`Board::select_page`] on the trailing "+" slot, which bulk loading never
//! calls.

use crate::document::{Document, DocumentError, Page};
use crate::grid::GridPos;

/// Editor surface consumed by save and load
pub trait GridEditor {
    /// Image type held in cells
    type Image;

    /// Number of pages
    fn page_count(&self) -> usize;

    /// Image at a cell, if any
    fn cell_at(&self, page: usize, pos: GridPos) -> Option<&Self::Image>;

    /// Replace a cell's contents, returning the previous occupant
    fn set_cell(
        &mut self,
        page: usize,
        pos: GridPos,
        image: Option<Self::Image>,
    ) -> Result<Option<Self::Image>, DocumentError>;

    /// Append an empty page, returning its index
    fn insert_page(&mut self) -> Result<usize, DocumentError>;

    /// Remove a page, shifting later pages down
    fn remove_page(&mut self, index: usize) -> Result<(), DocumentError>;
}

/// Copy any editor's contents into a standalone document
pub fn snapshot_editor<E>(editor: &E) -> Result<Document<E::Image>, DocumentError>
where
    E: GridEditor + ?Sized,
    E::Image: Clone,
{
    let mut document = Document::new();
    for index in 0..editor.page_count() {
        let mut page = Page::new();
        for pos in GridPos::all() {
            page.set(pos, editor.cell_at(index, pos).cloned());
        }
        document.push_page(page)?;
    }
    Ok(document)
}

/// Label shown for a page tab
///
/// The first tab reads "Page 1"; later tabs show only their number.
pub fn page_label(index: usize) -> String {
    if index == 0 {
        "Page 1".to_string()
    } else {
        (index + 1).to_string()
    }
}

/// In-memory paged grid of images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board<I> {
    document: Document<I>,
    current: usize,
}

impl<I> Default for Board<I> {
    fn default() -> Self {
        Board::from_document(Document::from(Page::new()))
    }
}

impl<I> Board<I> {
    /// Create a board with a single empty page
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board showing an existing document
    pub fn from_document(document: Document<I>) -> Self {
        Board {
            document,
            current: 0,
        }
    }

    /// The board's document
    pub fn document(&self) -> &Document<I> {
        &self.document
    }

    /// Index of the selected page
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Labels for every page tab, in order
    pub fn page_labels(&self) -> Vec<String> {
        (0..self.document.len()).map(page_label).collect()
    }

    /// Select a page
    ///
    /// Selecting `page_count()` (the "+" slot after the last tab) appends a
    /// new empty page and selects it.
    pub fn select_page(&mut self, index: usize) -> Result<usize, DocumentError> {
        let count = self.document.len();
        if index == count {
            self.current = self.document.push_page(Page::new())?;
        } else if index < count {
            self.current = index;
        } else {
            return Err(DocumentError::PageOutOfRange { index, count });
        }
        Ok(self.current)
    }

    /// Swap in a fully built document, returning the previous one
    ///
    /// Selection resets to the first page.
    pub fn replace_document(&mut self, document: Document<I>) -> Document<I> {
        self.current = 0;
        std::mem::replace(&mut self.document, document)
    }

    /// Consume the board, returning its document
    pub fn into_document(self) -> Document<I> {
        self.document
    }
}

impl<I: Clone> Board<I> {
    /// Clone the board contents for saving
    pub fn snapshot(&self) -> Document<I> {
        self.document.clone()
    }
}

impl<I> GridEditor for Board<I> {
    type Image = I;

    fn page_count(&self) -> usize {
        self.document.len()
    }

    fn cell_at(&self, page: usize, pos: GridPos) -> Option<&I> {
        self.document.cell_at(page, pos)
    }

    fn set_cell(
        &mut self,
        page: usize,
        pos: GridPos,
        image: Option<I>,
    ) -> Result<Option<I>, DocumentError> {
        self.document.set_cell(page, pos, image)
    }

    fn insert_page(&mut self) -> Result<usize, DocumentError> {
        self.document.push_page(Page::new())
    }

    fn remove_page(&mut self, index: usize) -> Result<(), DocumentError> {
        self.document.remove_page(index)?;
        let count = self.document.len();
        if self.current >= count {
            self.current = count.saturating_sub(1);
        }
        Ok(())
    }
}
