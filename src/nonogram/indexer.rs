//! Cell variable numbering shared by the row and column passes.
//!
//! Cell `(row, col)` of a grid `width` columns wide is variable
//! `row * width + col + 1`. Variables start at 1 so that every cell has a
//! negatable literal; selectors are numbered after the last cell.

use crate::nonogram::model::Cell;
use crate::sat::cnf::{Literal, Variable};

/// The variable of cell `(row, col)`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn cell_var(row: usize, col: usize, width: usize) -> Variable {
    (row * width + col + 1) as Variable
}

/// The `(row, col)` position of a cell variable, `None` for variable 0 or a
/// zero-width grid.
#[must_use]
pub const fn cell_of(var: Variable, width: usize) -> Option<(usize, usize)> {
    if width == 0 {
        return None;
    }
    match (var as usize).checked_sub(1) {
        Some(idx) => Some((idx / width, idx % width)),
        None => None,
    }
}

/// The literal asserting that `var` takes the state `cell`: positive when filled,
/// negative otherwise.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn literal(var: Variable, cell: Cell) -> Literal {
    match cell {
        Cell::Filled => var as Literal,
        Cell::Empty | Cell::Unknown => -(var as Literal),
    }
}
