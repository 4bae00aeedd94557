#![deny(missing_docs)]
//! This crate turns nonogram puzzles into SAT problems, solves them with a small
//! DPLL engine and decodes the satisfying assignment back into a grid.

/// The `nonogram` module holds the puzzle model, the line configuration generator,
/// the clause builder and the complexity estimator.
pub mod nonogram;

/// The `sat` module implements the clause sink interface, a CNF collector and the
/// DPLL engine that consumes the nonogram encoding.
pub mod sat;
