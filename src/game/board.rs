//! Board value type for a generalized M×N grid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A player's mark on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Mark {
    /// Mark X (moves first once the game starts).
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single cell coordinate, row-major, zero-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Cell {
    /// Row index in `[0, rows)`.
    pub row: u16,
    /// Column index in `[0, cols)`.
    pub col: u16,
}

impl Cell {
    /// Creates a cell coordinate.
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Occupancy of a grid by the two marks.
///
/// Each mark owns a set of cell coordinates; the two sets are kept
/// disjoint (a cell never belongs to both). The board does not know
/// its own dimensions — bounds live on the session and are enforced
/// by the move-legality check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    x: BTreeSet<Cell>,
    o: BTreeSet<Cell>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mark occupying the cell, if any.
    pub fn occupant(&self, cell: Cell) -> Option<Mark> {
        if self.x.contains(&cell) {
            Some(Mark::X)
        } else if self.o.contains(&cell) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Returns true if the cell is occupied by either mark.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupant(cell).is_some()
    }

    /// Places a mark on a cell.
    ///
    /// The cell is first cleared from both sets, so the disjointness
    /// invariant holds even if a caller overwrites an occupied cell.
    pub fn place(&mut self, cell: Cell, mark: Mark) {
        self.x.remove(&cell);
        self.o.remove(&cell);
        match mark {
            Mark::X => self.x.insert(cell),
            Mark::O => self.o.insert(cell),
        };
    }

    /// Total number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.x.len() + self.o.len()
    }

    /// The set of cells occupied by the given mark, in sorted order.
    pub fn positions_of(&self, mark: Mark) -> &BTreeSet<Cell> {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }
}
