//! Argument parsing and command handlers for the `nonogram-sat` binary.

pub(crate) mod cli;
