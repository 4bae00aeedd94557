#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Boolean satisfiability plumbing used by the nonogram encoder.

/// Variable assignments and solver models.
pub mod assignment;
/// Collecting CNF formulas and rendering them as DIMACS.
pub mod cnf;
/// A DPLL engine with watched-literal unit propagation.
pub mod dpll;
/// The interfaces the encoder writes into and the engine solves through.
pub mod sink;
/// Statistics reported by engines.
pub mod solver;
