#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The full pipeline: estimate, encode, search, decode.
//!
//! Any [`SatEngine`] can be plugged in; [`solve`] uses the bundled [`Dpll`].

use crate::nonogram::complexity::{self, Complexity};
use crate::nonogram::encoder::{EncodeObserver, EncodeSummary, Encoder, EncoderConfig, NoOpObserver};
use crate::nonogram::error::SolveError;
use crate::nonogram::grid::Grid;
use crate::nonogram::model::PuzzleModel;
use crate::sat::assignment::Solutions;
use crate::sat::dpll::Dpll;
use crate::sat::sink::SatEngine;
use crate::sat::solver::SolutionStats;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Pipeline options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SolveOptions {
    /// Passed on to the [`Encoder`].
    pub encoder: EncoderConfig,
    /// Check the decoded grid against the clues.
    pub verify: bool,
}

/// Wall-clock time spent in each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Timings {
    /// Building and submitting clauses.
    pub encode: Duration,
    /// Engine search.
    pub solve: Duration,
    /// Reading the grid back.
    pub decode: Duration,
}

impl Timings {
    /// Sum of all stages.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.encode + self.solve + self.decode
    }
}

/// Everything the pipeline learned about one puzzle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveOutcome {
    /// The solved grid, `None` when the puzzle has no solution.
    pub grid: Option<Grid>,
    /// The raw model behind `grid`.
    pub solutions: Option<Solutions>,
    /// Estimate taken before encoding.
    pub complexity: Complexity,
    /// What the encoder actually emitted.
    pub summary: EncodeSummary,
    /// Search counters reported by the engine.
    pub stats: SolutionStats,
    /// Time spent per stage.
    pub timings: Timings,
}

impl SolveOutcome {
    /// Returns `true` if a grid was found.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.grid.is_some()
    }
}

/// Solves `model` with the built-in DPLL engine.
///
/// # Errors
///
/// See [`solve_with`].
pub fn solve(model: &PuzzleModel, options: SolveOptions) -> Result<SolveOutcome, SolveError> {
    solve_with(model, Dpll::new(), options, &mut NoOpObserver)
}

/// Solves `model` with `engine`, which should start out empty.
///
/// An unsatisfiable puzzle is not an error; the outcome simply carries no grid.
///
/// # Errors
///
/// If encoding is refused, if the engine reports success without a model, or with
/// `verify` set, if the engine's model does not decode to a grid matching the clues.
pub fn solve_with<E, O>(
    model: &PuzzleModel,
    mut engine: E,
    options: SolveOptions,
    observer: &mut O,
) -> Result<SolveOutcome, SolveError>
where
    E: SatEngine,
    O: EncodeObserver + ?Sized,
{
    let mut timings = Timings::default();
    let complexity = complexity::estimate(model);
    debug!(
        puzzle = model.name(),
        configurations = %complexity.configurations,
        clauses = %complexity.clauses,
        "estimated encoding"
    );

    let start = Instant::now();
    let summary = Encoder::new(options.encoder).encode_observed(model, &mut engine, observer)?;
    timings.encode = start.elapsed();

    let start = Instant::now();
    let satisfiable = engine.solve();
    timings.solve = start.elapsed();
    let stats = engine.stats();

    let mut outcome = SolveOutcome {
        grid: None,
        solutions: None,
        complexity,
        summary,
        stats,
        timings,
    };

    if !satisfiable {
        info!(puzzle = model.name(), "no solution");
        return Ok(outcome);
    }

    let start = Instant::now();
    let solutions = engine.model().ok_or_else(|| SolveError::MissingModel {
        puzzle: model.name().to_string(),
    })?;
    let grid = Grid::decode(model, &solutions);
    outcome.timings.decode = start.elapsed();

    if options.verify && !grid.satisfies(model) {
        return Err(SolveError::Mismatch {
            puzzle: model.name().to_string(),
        });
    }

    info!(
        puzzle = model.name(),
        filled = grid.filled(),
        elapsed = ?outcome.timings.total(),
        "solved"
    );
    outcome.grid = Some(grid);
    outcome.solutions = Some(solutions);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::encoder::Exclusivity;
    use crate::nonogram::model::Cell::{Empty as E, Filled as F};
    use crate::nonogram::random::random_puzzle;
    use crate::sat::cnf::{Cnf, Literal};
    use crate::sat::sink::ClauseSink;

    fn verified() -> SolveOptions {
        SolveOptions {
            verify: true,
            ..SolveOptions::default()
        }
    }

    #[test]
    fn test_single_cell() {
        let model = PuzzleModel::from_runs("one", vec![vec![1]], vec![vec![1]]).unwrap();
        let outcome = solve(&model, verified()).unwrap();
        assert_eq!(outcome.grid, Some(Grid::new(vec![vec![F]])));
        assert_eq!(outcome.summary.variables, 3);
    }

    #[test]
    fn test_cross() {
        let model = PuzzleModel::from_runs(
            "cross",
            vec![vec![1], vec![3], vec![1]],
            vec![vec![1], vec![3], vec![1]],
        )
        .unwrap();
        let outcome = solve(&model, verified()).unwrap();
        let grid = outcome.grid.unwrap();
        assert_eq!(grid, Grid::new(vec![vec![E, F, E], vec![F, F, F], vec![E, F, E]]));
    }

    #[test]
    fn test_empty_puzzle() {
        let model =
            PuzzleModel::from_runs("blank", vec![vec![], vec![]], vec![vec![0], vec![0]]).unwrap();
        let grid = solve(&model, verified()).unwrap().grid.unwrap();
        assert_eq!(grid.filled(), 0);
        assert!(grid.is_complete());
    }

    #[test]
    fn test_contradictory_clues_unsat() {
        // the rows want one filled cell, the columns want none
        let model =
            PuzzleModel::from_runs("contra", vec![vec![1]], vec![vec![0], vec![0]]).unwrap();
        let outcome = solve(&model, verified()).unwrap();
        assert!(!outcome.is_solved());
        assert!(outcome.solutions.is_none());
        assert!(outcome.stats.conflicts > 0 || outcome.stats.decisions == 0);
    }

    #[test]
    fn test_separator_overflow_unsat() {
        let model =
            PuzzleModel::from_runs("tight", vec![vec![1, 1]], vec![vec![1], vec![1]]).unwrap();
        let outcome = solve(&model, SolveOptions::default()).unwrap();
        assert!(!outcome.is_solved());
        assert_eq!(outcome.summary.empty_lines, 1);
    }

    #[test]
    fn test_random_puzzles_solve_to_their_clues() {
        for seed in 0..10 {
            let (model, _) = random_puzzle("rand", 6, 5, 0.55, Some(seed)).unwrap();
            for exclusivity in [Exclusivity::AtLeastOne, Exclusivity::ExactlyOne] {
                let options = SolveOptions {
                    encoder: EncoderConfig::default()
                        .with_exclusivity(exclusivity)
                        .with_parallel(seed % 2 == 0),
                    ..verified()
                };
                let outcome = solve(&model, options).unwrap();
                assert!(outcome.grid.unwrap().satisfies(&model), "seed {seed}");
            }
        }
    }

    #[test]
    fn test_model_satisfies_collected_formula() {
        let (model, _) = random_puzzle("cnf", 5, 5, 0.5, Some(7)).unwrap();
        let (cnf, _) = Encoder::default().to_cnf(&model).unwrap();
        let mut engine = Dpll::from(Cnf::default());
        let outcome =
            solve_with(&model, &mut engine, SolveOptions::default(), &mut NoOpObserver).unwrap();
        assert!(cnf.verify(&outcome.solutions.unwrap()));
        assert_eq!(engine.cnf(), &cnf);
    }

    #[test]
    fn test_satisfiable_without_model_is_an_error() {
        struct Forgetful(Cnf);

        impl ClauseSink for Forgetful {
            fn add_clause(&mut self, clause: Vec<Literal>) {
                self.0.add_clause(clause);
            }
        }

        impl SatEngine for Forgetful {
            fn solve(&mut self) -> bool {
                true
            }

            fn model(&self) -> Option<Solutions> {
                None
            }

            fn stats(&self) -> SolutionStats {
                SolutionStats::default()
            }
        }

        let model = PuzzleModel::from_runs("one", vec![vec![1]], vec![vec![1]]).unwrap();
        let err = solve_with(
            &model,
            Forgetful(Cnf::default()),
            SolveOptions::default(),
            &mut NoOpObserver,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SolveError::MissingModel {
                puzzle: "one".to_string()
            }
        );
    }
}
