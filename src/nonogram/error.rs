//! Error types for building, reading, storing and encoding puzzles.

use crate::nonogram::model::Orientation;
use thiserror::Error;

/// A puzzle definition that cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// Width or height is zero.
    #[error("puzzle dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Number of columns.
        width: usize,
        /// Number of rows.
        height: usize,
    },

    /// The number of row clues differs from the height.
    #[error("expected {expected} row clues, found {found}")]
    RowCountMismatch {
        /// The puzzle height.
        expected: usize,
        /// Row clues supplied.
        found: usize,
    },

    /// The number of column clues differs from the width.
    #[error("expected {expected} column clues, found {found}")]
    ColumnCountMismatch {
        /// The puzzle width.
        expected: usize,
        /// Column clues supplied.
        found: usize,
    },

    /// A clue asks for more filled cells than its line holds.
    #[error("{orientation} {index} needs {total} filled cells but is only {length} long")]
    ClueTooLong {
        /// Row or column.
        orientation: Orientation,
        /// 0-based line index.
        index: usize,
        /// Sum of the clue's runs.
        total: usize,
        /// Length of the line.
        length: usize,
    },
}

/// Encoding refused before any clause was generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The estimated clause count exceeds the configured ceiling.
    #[error("estimated {estimated} clauses, above the limit of {limit}")]
    TooLarge {
        /// Clauses the encoding would produce.
        estimated: u128,
        /// The configured ceiling.
        limit: u128,
    },

    /// Cell and selector variables together do not fit in a signed 32-bit literal.
    #[error("encoding needs {needed} variables, more than a 32-bit literal can address")]
    TooManyVariables {
        /// Variables the encoding would allocate.
        needed: u128,
    },
}

/// A `.non` puzzle file that could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed content.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The content parsed but does not describe a valid puzzle.
    #[error("invalid puzzle: {0}")]
    Puzzle(#[from] PuzzleError),
}

/// A `.nng` puzzle record that could not be saved or loaded.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The record is not valid JSON or fails puzzle validation.
    #[error("malformed puzzle record: {0}")]
    Json(#[from] serde_json::Error),
}

/// A failure anywhere in the solve pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The puzzle could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The engine reported a model whose grid does not reproduce the clues.
    #[error("decoded grid does not match the clues of `{puzzle}`")]
    Mismatch {
        /// Name of the puzzle.
        puzzle: String,
    },

    /// The engine reported the clauses satisfiable but produced no model.
    #[error("engine found `{puzzle}` satisfiable but returned no model")]
    MissingModel {
        /// Name of the puzzle.
        puzzle: String,
    },
}
