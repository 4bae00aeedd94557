#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Nonogram puzzles and their reduction to SAT.
//!
//! A [`model::PuzzleModel`] is estimated by [`complexity`], turned into clauses by
//! [`encoder`] (which draws line configurations from [`config`]), solved by any
//! [`crate::sat::sink::SatEngine`] and read back into a [`grid::Grid`].

pub mod complexity;
pub mod config;
pub mod encoder;
pub mod error;
pub mod grid;
pub mod indexer;
pub mod model;
pub mod parser;
pub mod persist;
pub mod random;
pub mod solver;
