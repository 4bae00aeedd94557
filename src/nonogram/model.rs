#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The puzzle model: dimensions, a name, and one clue per row and column.
//!
//! A [`PuzzleModel`] is validated once on construction and never changes
//! afterwards; the encoder, the estimator and the decoder only borrow it.

use crate::nonogram::error::PuzzleError;
use crate::nonogram::indexer;
use crate::sat::cnf::Variable;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The state of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Cell {
    /// Not decided.
    #[default]
    Unknown,
    /// Part of a run.
    Filled,
    /// Blank.
    Empty,
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "."),
            Self::Filled => write!(f, "#"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// Whether a line runs left to right or top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Orientation {
    /// A row of the grid.
    Row,
    /// A column of the grid.
    Column,
}

impl Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// The run lengths of one line, in order. Zero entries are dropped on construction,
/// so `[0]` and `[]` both describe a line with no filled cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct Clue(Vec<u32>);

impl Clue {
    /// Builds a clue, discarding zero-length runs.
    pub fn new(runs: impl IntoIterator<Item = u32>) -> Self {
        Self(runs.into_iter().filter(|&r| r != 0).collect())
    }

    /// The runs, all at least 1.
    #[must_use]
    pub fn runs(&self) -> &[u32] {
        &self.0
    }

    /// Number of runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a line with no filled cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total filled cells.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|&r| r as usize).sum()
    }

    /// Shortest line that can hold the clue: runs plus one separator between each pair.
    #[must_use]
    pub fn min_length(&self) -> usize {
        (self.total() + self.len()).saturating_sub(1)
    }

    /// Spare cells once the clue is packed to the left, or `None` if it does not fit.
    #[must_use]
    pub fn slack(&self, length: usize) -> Option<usize> {
        length.checked_sub(self.min_length())
    }
}

impl From<Vec<u32>> for Clue {
    fn from(runs: Vec<u32>) -> Self {
        Self::new(runs)
    }
}

impl From<&[u32]> for Clue {
    fn from(runs: &[u32]) -> Self {
        Self::new(runs.iter().copied())
    }
}

impl From<Clue> for Vec<u32> {
    fn from(clue: Clue) -> Self {
        clue.0
    }
}

impl Display for Clue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", self.0.iter().join(","))
        }
    }
}

/// One row or column of a puzzle, borrowed from its model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// Row or column.
    pub orientation: Orientation,
    /// 0-based index among lines of the same orientation.
    pub index: usize,
    /// Number of cells.
    pub length: usize,
    /// The line's clue.
    pub clue: &'a Clue,
}

impl Line<'_> {
    /// The cell variable at `position` along this line, in a grid `width` columns wide.
    #[must_use]
    pub const fn cell_var(&self, position: usize, width: usize) -> Variable {
        match self.orientation {
            Orientation::Row => indexer::cell_var(self.index, position, width),
            Orientation::Column => indexer::cell_var(position, self.index, width),
        }
    }
}

/// A validated nonogram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PuzzleRecord", into = "PuzzleRecord")]
pub struct PuzzleModel {
    name: String,
    width: usize,
    height: usize,
    rows: Vec<Clue>,
    cols: Vec<Clue>,
}

/// The on-disk shape of a puzzle, checked through [`PuzzleModel::new`] when read.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct PuzzleRecord {
    width: usize,
    height: usize,
    name: String,
    #[serde(rename = "row")]
    rows: Vec<Clue>,
    #[serde(rename = "col")]
    cols: Vec<Clue>,
}

impl TryFrom<PuzzleRecord> for PuzzleModel {
    type Error = PuzzleError;

    fn try_from(record: PuzzleRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.name,
            record.width,
            record.height,
            record.rows,
            record.cols,
        )
    }
}

impl From<PuzzleModel> for PuzzleRecord {
    fn from(model: PuzzleModel) -> Self {
        Self {
            name: model.name,
            width: model.width,
            height: model.height,
            rows: model.rows,
            cols: model.cols,
        }
    }
}

impl PuzzleModel {
    /// Validates and builds a puzzle.
    ///
    /// # Errors
    ///
    /// If a dimension is zero, the clue counts do not match the dimensions, or a
    /// clue needs more filled cells than its line has. A clue that only overflows
    /// once separators are counted is accepted; it encodes to an unsatisfiable line.
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        rows: Vec<Clue>,
        cols: Vec<Clue>,
    ) -> Result<Self, PuzzleError> {
        if width == 0 || height == 0 {
            return Err(PuzzleError::ZeroDimension { width, height });
        }
        if rows.len() != height {
            return Err(PuzzleError::RowCountMismatch {
                expected: height,
                found: rows.len(),
            });
        }
        if cols.len() != width {
            return Err(PuzzleError::ColumnCountMismatch {
                expected: width,
                found: cols.len(),
            });
        }

        let model = Self {
            name: name.into(),
            width,
            height,
            rows,
            cols,
        };

        if let Some(line) = model.lines().find(|l| l.clue.total() > l.length) {
            return Err(PuzzleError::ClueTooLong {
                orientation: line.orientation,
                index: line.index,
                total: line.clue.total(),
                length: line.length,
            });
        }

        Ok(model)
    }

    /// Builds a puzzle from plain run lists, dimensions taken from their counts.
    ///
    /// # Errors
    ///
    /// See [`PuzzleModel::new`].
    pub fn from_runs(
        name: impl Into<String>,
        rows: Vec<Vec<u32>>,
        cols: Vec<Vec<u32>>,
    ) -> Result<Self, PuzzleError> {
        let height = rows.len();
        let width = cols.len();
        Self::new(
            name,
            width,
            height,
            rows.into_iter().map(Clue::from).collect(),
            cols.into_iter().map(Clue::from).collect(),
        )
    }

    /// The same puzzle under another name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// The puzzle's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of cells, which is also the highest cell variable.
    #[must_use]
    pub const fn num_cells(&self) -> usize {
        self.width * self.height
    }

    /// Row clues, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[Clue] {
        &self.rows
    }

    /// Column clues, left to right.
    #[must_use]
    pub fn cols(&self) -> &[Clue] {
        &self.cols
    }

    /// Every row, then every column.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        let rows = self.rows.iter().enumerate().map(|(index, clue)| Line {
            orientation: Orientation::Row,
            index,
            length: self.width,
            clue,
        });
        let cols = self.cols.iter().enumerate().map(|(index, clue)| Line {
            orientation: Orientation::Column,
            index,
            length: self.height,
            clue,
        });
        rows.chain(cols)
    }
}

impl Display for PuzzleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({}x{})", self.name, self.width, self.height)?;
        writeln!(f, "rows: {}", self.rows.iter().map(|c| format!("[{c}]")).join(" "))?;
        write!(f, "cols: {}", self.cols.iter().map(|c| format!("[{c}]")).join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_filters_zeros() {
        let clue = Clue::new([0, 2, 0, 1]);
        assert_eq!(clue.runs(), &[2, 1]);
        assert_eq!(clue.total(), 3);
        assert_eq!(clue.min_length(), 4);
        assert!(Clue::from(vec![0]).is_empty());
        assert_eq!(Clue::from(vec![0]), Clue::default());
    }

    #[test]
    fn test_clue_slack() {
        let clue = Clue::from(vec![2]);
        assert_eq!(clue.slack(3), Some(1));
        assert_eq!(clue.slack(2), Some(0));
        assert_eq!(clue.slack(1), None);
        assert_eq!(Clue::default().slack(4), Some(4));
        assert_eq!(Clue::from(vec![2, 1]).slack(2), None);
    }

    #[test]
    fn test_clue_display() {
        assert_eq!(Clue::from(vec![3, 1]).to_string(), "3,1");
        assert_eq!(Clue::default().to_string(), "0");
    }

    #[test]
    fn test_new_rejects_zero_dimension() {
        let err = PuzzleModel::new("x", 0, 1, vec![Clue::default()], vec![]).unwrap_err();
        assert_eq!(err, PuzzleError::ZeroDimension { width: 0, height: 1 });
    }

    #[test]
    fn test_new_rejects_count_mismatch() {
        let err = PuzzleModel::new("y", 2, 2, vec![Clue::default()], vec![Clue::default(); 2])
            .unwrap_err();
        assert_eq!(
            err,
            PuzzleError::RowCountMismatch {
                expected: 2,
                found: 1
            }
        );

        let err = PuzzleModel::new("z", 2, 1, vec![Clue::default()], vec![Clue::default()])
            .unwrap_err();
        assert_eq!(
            err,
            PuzzleError::ColumnCountMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_overlong_clue() {
        let err = PuzzleModel::from_runs("x", vec![vec![2, 1]], vec![vec![1], vec![1]])
            .unwrap_err();
        assert_eq!(
            err,
            PuzzleError::ClueTooLong {
                orientation: Orientation::Row,
                index: 0,
                total: 3,
                length: 2
            }
        );
    }

    #[test]
    fn test_separator_overflow_is_accepted() {
        // [1, 1] needs three cells with its separator, but only two are filled
        let model = PuzzleModel::from_runs("x", vec![vec![1, 1]], vec![vec![1], vec![1]]);
        assert!(model.is_ok());
    }

    #[test]
    fn test_lines_rows_then_columns() {
        let model =
            PuzzleModel::from_runs("x", vec![vec![1], vec![0]], vec![vec![1], vec![0], vec![]])
                .unwrap();
        let lines: Vec<_> = model
            .lines()
            .map(|l| (l.orientation, l.index, l.length))
            .collect();
        assert_eq!(
            lines,
            vec![
                (Orientation::Row, 0, 3),
                (Orientation::Row, 1, 3),
                (Orientation::Column, 0, 2),
                (Orientation::Column, 1, 2),
                (Orientation::Column, 2, 2),
            ]
        );
        assert_eq!(model.num_cells(), 6);
    }

    #[test]
    fn test_line_cell_var_transposes_columns() {
        let model =
            PuzzleModel::from_runs("x", vec![vec![], vec![]], vec![vec![], vec![], vec![]])
                .unwrap();
        let lines: Vec<_> = model.lines().collect();
        let row1 = lines[1];
        let col2 = lines[4];
        assert_eq!(row1.cell_var(0, 3), 4);
        assert_eq!(row1.cell_var(2, 3), 6);
        assert_eq!(col2.cell_var(0, 3), 3);
        assert_eq!(col2.cell_var(1, 3), 6);
    }

    #[test]
    fn test_with_name_keeps_clues() {
        let model = PuzzleModel::from_runs("a", vec![vec![1]], vec![vec![1]]).unwrap();
        let renamed = model.with_name("b");
        assert_eq!(renamed.name(), "b");
        assert_eq!(renamed.rows(), model.rows());
        assert_eq!(model.name(), "a");
    }

    #[test]
    fn test_serde_validates() {
        let model = PuzzleModel::from_runs(
            "cross",
            vec![vec![1], vec![3], vec![1]],
            vec![vec![1], vec![3], vec![1]],
        )
        .unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: PuzzleModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);

        let bad = r#"{"name":"bad","width":1,"height":1,"row":[[2]],"col":[[1]]}"#;
        let err = serde_json::from_str::<PuzzleModel>(bad).unwrap_err();
        assert!(err.to_string().contains("row 0 needs 2 filled cells"));

        let negative = r#"{"name":"neg","width":1,"height":1,"row":[[-1]],"col":[[1]]}"#;
        assert!(serde_json::from_str::<PuzzleModel>(negative).is_err());
    }
}
