//! Solved (or partially known) grids and their conversion from SAT models.

use crate::nonogram::error::PuzzleError;
use crate::nonogram::indexer::cell_of;
use crate::nonogram::model::{Cell, Clue, PuzzleModel};
use crate::sat::assignment::Solutions;
use crate::sat::cnf::var_of_lit;
use std::fmt::Display;
use std::ops::Index;

/// A `height` by `width` grid of cells, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid(Vec<Vec<Cell>>);

impl Grid {
    /// Wraps rows of cells.
    #[must_use]
    pub const fn new(cells: Vec<Vec<Cell>>) -> Self {
        Self(cells)
    }

    /// A grid where every cell is [`Cell::Unknown`].
    #[must_use]
    pub fn unknown(width: usize, height: usize) -> Self {
        Self(vec![vec![Cell::Unknown; width]; height])
    }

    /// Reads the cell variables of `model` out of a satisfying assignment.
    ///
    /// Variables missing from `solutions` stay [`Cell::Unknown`]. Selector
    /// variables are ignored.
    #[must_use]
    pub fn decode(model: &PuzzleModel, solutions: &Solutions) -> Self {
        let width = model.width();
        let cells = width * model.height();
        let mut grid = Self::unknown(width, model.height());
        for &lit in solutions.iter() {
            let var = var_of_lit(lit);
            if var as usize > cells {
                continue;
            }
            if let Some((row, col)) = cell_of(var, width) {
                grid.0[row][col] = if lit > 0 { Cell::Filled } else { Cell::Empty };
            }
        }
        grid
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.0.len()
    }

    /// Number of columns, 0 for a grid without rows.
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    /// The cells of row `row`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.0[row]
    }

    /// The cells of column `col`, top to bottom.
    #[must_use]
    pub fn column(&self, col: usize) -> Vec<Cell> {
        self.0.iter().map(|r| r[col]).collect()
    }

    /// The rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Returns `true` once no cell is [`Cell::Unknown`].
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().flatten().all(|&c| c != Cell::Unknown)
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.0.iter().flatten().filter(|&&c| c == Cell::Filled).count()
    }

    /// Whether every row and column of this grid reproduces the clues of `model`.
    #[must_use]
    pub fn satisfies(&self, model: &PuzzleModel) -> bool {
        self.height() == model.height()
            && self.0.iter().all(|r| r.len() == model.width())
            && self.is_complete()
            && model
                .rows()
                .iter()
                .enumerate()
                .all(|(i, clue)| clue_of(self.row(i)) == *clue)
            && model
                .cols()
                .iter()
                .enumerate()
                .all(|(j, clue)| clue_of(&self.column(j)) == *clue)
    }

    /// The puzzle this grid is the solution of.
    ///
    /// # Errors
    ///
    /// If the grid has no cells.
    pub fn to_model(&self, name: impl Into<String>) -> Result<PuzzleModel, PuzzleError> {
        let rows = self.rows().map(clue_of).collect();
        let cols = (0..self.width()).map(|j| clue_of(&self.column(j))).collect();
        PuzzleModel::new(name, self.width(), self.height(), rows, cols)
    }
}

/// The runs of filled cells along a line.
#[must_use]
pub fn clue_of(cells: &[Cell]) -> Clue {
    let mut runs = Vec::new();
    let mut current = 0u32;
    for &cell in cells {
        if cell == Cell::Filled {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    Clue::from(runs)
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.0[row][col]
    }
}

impl From<Vec<Vec<Cell>>> for Grid {
    fn from(cells: Vec<Vec<Cell>>) -> Self {
        Self::new(cells)
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        grid.0
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.0 {
            for cell in row {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::model::Cell::{Empty as E, Filled as F, Unknown as U};

    fn tee() -> PuzzleModel {
        PuzzleModel::from_runs(
            "tee",
            vec![vec![3], vec![1], vec![1]],
            vec![vec![1], vec![3], vec![1]],
        )
        .unwrap()
    }

    #[test]
    fn test_clue_of() {
        assert_eq!(clue_of(&[F, F, E, F]), Clue::from(vec![2, 1]));
        assert_eq!(clue_of(&[E, E]), Clue::default());
        assert_eq!(clue_of(&[]), Clue::default());
        assert_eq!(clue_of(&[E, F, F, F]), Clue::from(vec![3]));
    }

    #[test]
    fn test_decode_reads_cell_variables_only() {
        let model = tee();
        // 9 cell variables followed by some selectors
        let solutions = Solutions::from(vec![1, 2, 3, -4, 5, -6, -7, 8, -9, 10, -11]);
        let grid = Grid::decode(&model, &solutions);
        assert_eq!(grid, Grid::new(vec![vec![F, F, F], vec![E, F, E], vec![E, F, E]]));
        assert!(grid.satisfies(&model));
        assert_eq!(grid.filled(), 5);
        assert_eq!(grid.to_string(), "###\n.#.\n.#.\n");
    }

    #[test]
    fn test_decode_missing_variables_unknown() {
        let model = tee();
        let grid = Grid::decode(&model, &Solutions::from(vec![1, -2]));
        assert_eq!(grid[(0, 0)], F);
        assert_eq!(grid[(0, 1)], E);
        assert_eq!(grid[(2, 2)], U);
        assert!(!grid.is_complete());
        assert!(!grid.satisfies(&model));
    }

    #[test]
    fn test_decode_out_of_order_model() {
        let model = tee();
        let solutions = Solutions::from(vec![-9, 8, -7, -6, 5, -4, 3, 2, 1, 12]);
        let grid = Grid::decode(&model, &solutions);
        assert!(grid.satisfies(&model));
        assert_eq!(Grid::decode(&model, &Solutions::default()), Grid::unknown(3, 3));
    }

    #[test]
    fn test_satisfies_rejects_wrong_grid() {
        let grid = Grid::new(vec![vec![F, F, F], vec![F, E, E], vec![E, F, E]]);
        assert!(!grid.satisfies(&tee()));
    }

    #[test]
    fn test_rows_and_columns() {
        let grid = Grid::new(vec![vec![F, E], vec![E, E], vec![F, F]]);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.row(2), &[F, F]);
        assert_eq!(grid.column(0), vec![F, E, F]);
    }

    #[test]
    fn test_to_model_round_trips_through_satisfies() {
        let grid = Grid::new(vec![vec![F, E, F], vec![F, F, E]]);
        let model = grid.to_model("g").unwrap();
        assert_eq!(model.width(), 3);
        assert_eq!(model.height(), 2);
        assert_eq!(model.rows()[0], Clue::from(vec![1, 1]));
        assert_eq!(model.cols()[2], Clue::from(vec![1]));
        assert!(grid.satisfies(&model));
    }
}
