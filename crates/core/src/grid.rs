//! Grid geometry for a single page
//!
//! Every page is a fixed 3×5 grid addressed in row-major order. A
//! [`GridPos`] can only be constructed inside those bounds, so code holding
//! one never needs to re-check it before indexing a page.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of rows on a page
pub const GRID_ROWS: usize = 3;

/// Number of columns on a page
pub const GRID_COLS: usize = 5;

/// Number of cells on a page
pub const CELLS_PER_PAGE: usize = GRID_ROWS * GRID_COLS;

/// Errors from grid addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// Row or column outside the 3×5 grid
    #[error("Cell ({row}, {col}) is outside the 3x5 grid")]
    OutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
    },

    /// Linear index outside `0..CELLS_PER_PAGE`
    #[error("Cell index {0} is outside 0..15")]
    IndexOutOfBounds(usize),
}

/// A bounds-checked cell position within a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct GridPos {
    row: u8,
    col: u8,
}

impl GridPos {
    /// Create a position, rejecting anything outside the grid
    pub fn new(row: usize, col: usize) -> Result<Self, GridError> {
        if row >= GRID_ROWS || col >= GRID_COLS {
            return Err(GridError::OutOfBounds { row, col });
        }
        Ok(GridPos {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Position for a linear row-major index
    pub fn from_index(index: usize) -> Result<Self, GridError> {
        if index >= CELLS_PER_PAGE {
            return Err(GridError::IndexOutOfBounds(index));
        }
        Ok(GridPos {
            row: (index / GRID_COLS) as u8,
            col: (index % GRID_COLS) as u8,
        })
    }

    /// Row, in `0..GRID_ROWS`
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column, in `0..GRID_COLS`
    pub fn col(self) -> u8 {
        self.col
    }

    /// Linear row-major index, in `0..CELLS_PER_PAGE`
    pub fn index(self) -> usize {
        self.row as usize * GRID_COLS + self.col as usize
    }

    /// All positions on a page in row-major order
    pub fn all() -> impl Iterator<Item = GridPos> + Clone {
        (0..CELLS_PER_PAGE).map(|index| GridPos {
            row: (index / GRID_COLS) as u8,
            col: (index % GRID_COLS) as u8,
        })
    }
}

impl TryFrom<(u8, u8)> for GridPos {
    type Error = GridError;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        GridPos::new(row as usize, col as usize)
    }
}

impl From<GridPos> for (u8, u8) {
    fn from(pos: GridPos) -> Self {
        (pos.row, pos.col)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
