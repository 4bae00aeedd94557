#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Translates a [`PuzzleModel`] into CNF.
//!
//! Every configuration of every line gets a fresh selector variable `s`. For each
//! cell `p` of the line the clause `[-s, lit(p)]` forces the cell to the state the
//! configuration gives it, and one clause per line lists all of its selectors so
//! that at least one configuration holds. Rows and columns share the cell variables
//! from [`crate::nonogram::indexer`], which is what ties the two passes together.
//!
//! Selectors are numbered from `width * height + 1` upwards, rows first. The
//! counter is an explicit value passed into and returned from each line encoding,
//! so lines can also be encoded in parallel from precomputed starting points.

use crate::nonogram::complexity::{self, Complexity};
use crate::nonogram::config::generate;
use crate::nonogram::error::EncodeError;
use crate::nonogram::indexer::literal;
use crate::nonogram::model::{Clue, Line, Orientation, PuzzleModel};
use crate::sat::cnf::{Cnf, Literal, Variable};
use crate::sat::sink::ClauseSink;
use itertools::Itertools;
use rayon::prelude::*;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// How strictly a line is tied to a single configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Exclusivity {
    /// Only require that some configuration holds. Two selectors of one line can
    /// both be true when their configurations agree on every cell.
    #[default]
    AtLeastOne,
    /// Also forbid any two selectors of the same line from holding together.
    ExactlyOne,
}

impl Display for Exclusivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AtLeastOne => write!(f, "at-least-one"),
            Self::ExactlyOne => write!(f, "exactly-one"),
        }
    }
}

/// Options for [`Encoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EncoderConfig {
    /// Selector exclusivity.
    pub exclusivity: Exclusivity,
    /// Encode lines on the rayon thread pool.
    pub parallel: bool,
    /// Refuse to encode when the estimated clause count is above this.
    pub max_clauses: Option<u128>,
}

impl EncoderConfig {
    /// Sets the exclusivity mode.
    #[must_use]
    pub const fn with_exclusivity(self, exclusivity: Exclusivity) -> Self {
        Self {
            exclusivity,
            ..self
        }
    }

    /// Enables or disables parallel line encoding.
    #[must_use]
    pub const fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    /// Sets the clause ceiling.
    #[must_use]
    pub const fn with_max_clauses(self, max_clauses: Option<u128>) -> Self {
        Self {
            max_clauses,
            ..self
        }
    }
}

/// The clauses of one line, and where its selectors ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineEncoding {
    /// Implications, the at-least-one clause, then any exclusion clauses.
    pub clauses: Vec<Vec<Literal>>,
    /// One selector per configuration, in generation order.
    pub selectors: Vec<Variable>,
    /// The first selector free for the next line.
    pub next_selector: Variable,
}

#[allow(clippy::cast_possible_wrap)]
const fn positive(var: Variable) -> Literal {
    var as Literal
}

/// Encodes one line of `length` cells whose position `p` is cell variable `cell_of(p)`.
///
/// Selectors are taken from `first_selector` upwards. A line with no configuration
/// produces a single empty clause.
///
/// The caller must keep `first_selector` plus the line's configuration count within
/// [`Literal::MAX`], and every `cell_of(p)` likewise; [`Encoder`] checks this for a
/// whole puzzle before encoding any line.
pub fn encode_line<F>(
    length: usize,
    clue: &Clue,
    cell_of: F,
    first_selector: Variable,
    exclusivity: Exclusivity,
) -> LineEncoding
where
    F: Fn(usize) -> Variable,
{
    let mut clauses = Vec::new();
    let mut selectors = Vec::new();
    let mut next = first_selector;

    for config in generate(length, clue) {
        let s = next;
        next += 1;
        for (position, cell) in config.cells().enumerate() {
            clauses.push(vec![-positive(s), literal(cell_of(position), cell)]);
        }
        selectors.push(s);
    }

    clauses.push(selectors.iter().map(|&s| positive(s)).collect());

    if exclusivity == Exclusivity::ExactlyOne {
        clauses.extend(
            selectors
                .iter()
                .tuple_combinations()
                .map(|(&a, &b)| vec![-positive(a), -positive(b)]),
        );
    }

    LineEncoding {
        clauses,
        selectors,
        next_selector: next,
    }
}

/// What the encoder reports after each line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineReport {
    /// Row or column.
    pub orientation: Orientation,
    /// 0-based line index.
    pub index: usize,
    /// Configurations found.
    pub configurations: usize,
    /// Clauses submitted for the line.
    pub clauses: usize,
}

/// Totals for a finished encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EncodeSummary {
    /// Cell variables, `width * height`.
    pub cell_variables: usize,
    /// Selector variables allocated.
    pub selectors: usize,
    /// Highest variable in use.
    pub variables: usize,
    /// Clauses submitted.
    pub clauses: usize,
    /// Lines that had no configuration and were encoded as an empty clause.
    pub empty_lines: usize,
}

/// Hooks for callers that want progress without the encoder knowing how it is shown.
pub trait EncodeObserver {
    /// Called once per line, after its clauses were submitted.
    fn on_line_encoded(&mut self, _report: &LineReport) {}

    /// Called once when every line is done.
    fn on_finished(&mut self, _summary: &EncodeSummary) {}
}

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpObserver;

impl EncodeObserver for NoOpObserver {}

/// Logs each line at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl EncodeObserver for LogObserver {
    fn on_line_encoded(&mut self, report: &LineReport) {
        debug!(
            orientation = %report.orientation,
            index = report.index,
            configurations = report.configurations,
            clauses = report.clauses,
            "line encoded"
        );
    }

    fn on_finished(&mut self, summary: &EncodeSummary) {
        debug!(?summary, "encoding finished");
    }
}

/// Builds the CNF of a puzzle into any [`ClauseSink`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// An encoder with the given options.
    #[must_use]
    pub const fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// The options in use.
    #[must_use]
    pub const fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encodes `model` into `sink`.
    ///
    /// # Errors
    ///
    /// If the estimate exceeds the configured clause ceiling, or the variables would
    /// not fit in a 32-bit literal. Nothing is submitted in either case.
    pub fn encode<S: ClauseSink>(
        &self,
        model: &PuzzleModel,
        sink: &mut S,
    ) -> Result<EncodeSummary, EncodeError> {
        self.encode_observed(model, sink, &mut NoOpObserver)
    }

    /// Encodes `model` into a fresh [`Cnf`].
    ///
    /// # Errors
    ///
    /// See [`Encoder::encode`].
    pub fn to_cnf(&self, model: &PuzzleModel) -> Result<(Cnf, EncodeSummary), EncodeError> {
        let mut cnf = Cnf::default();
        let summary = self.encode(model, &mut cnf)?;
        Ok((cnf, summary))
    }

    /// Encodes `model` into `sink`, reporting every line to `observer`.
    ///
    /// # Errors
    ///
    /// See [`Encoder::encode`].
    pub fn encode_observed<S, O>(
        &self,
        model: &PuzzleModel,
        sink: &mut S,
        observer: &mut O,
    ) -> Result<EncodeSummary, EncodeError>
    where
        S: ClauseSink,
        O: EncodeObserver + ?Sized,
    {
        let estimate = complexity::estimate(model);
        self.check_limits(model, &estimate)?;

        let width = model.width();
        let lines: Vec<Line<'_>> = model.lines().collect();
        let first_selector = cell_count(model) + 1;

        let mut summary = EncodeSummary {
            cell_variables: model.num_cells(),
            ..EncodeSummary::default()
        };

        let mut submit = |line: &Line<'_>, encoding: LineEncoding| {
            let report = LineReport {
                orientation: line.orientation,
                index: line.index,
                configurations: encoding.selectors.len(),
                clauses: encoding.clauses.len(),
            };
            if encoding.selectors.is_empty() {
                warn!(
                    orientation = %line.orientation,
                    index = line.index,
                    clue = %line.clue,
                    "line has no configuration, puzzle is unsatisfiable"
                );
                summary.empty_lines += 1;
            }
            summary.selectors += encoding.selectors.len();
            summary.clauses += encoding.clauses.len();
            for clause in encoding.clauses {
                sink.add_clause(clause);
            }
            observer.on_line_encoded(&report);
        };

        if self.config.parallel {
            let starts = selector_starts(first_selector, &estimate);
            let encodings: Vec<LineEncoding> = lines
                .par_iter()
                .zip(starts)
                .map(|(line, start)| self.encode_one(line, width, start))
                .collect();
            for (line, encoding) in lines.iter().zip(encodings) {
                submit(line, encoding);
            }
        } else {
            let mut next = first_selector;
            for line in &lines {
                let encoding = self.encode_one(line, width, next);
                next = encoding.next_selector;
                submit(line, encoding);
            }
        }

        summary.variables = summary.cell_variables + summary.selectors;
        info!(
            puzzle = model.name(),
            variables = summary.variables,
            clauses = summary.clauses,
            empty_lines = summary.empty_lines,
            "encoded puzzle"
        );
        observer.on_finished(&summary);
        Ok(summary)
    }

    fn encode_one(&self, line: &Line<'_>, width: usize, first_selector: Variable) -> LineEncoding {
        encode_line(
            line.length,
            line.clue,
            |p| line.cell_var(p, width),
            first_selector,
            self.config.exclusivity,
        )
    }

    fn check_limits(&self, model: &PuzzleModel, estimate: &Complexity) -> Result<(), EncodeError> {
        let clauses = estimate.clauses_with(self.config.exclusivity);
        if let Some(limit) = self.config.max_clauses {
            if clauses > limit {
                return Err(EncodeError::TooLarge {
                    estimated: clauses,
                    limit,
                });
            }
        }

        let needed = (model.num_cells() as u128).saturating_add(estimate.configurations);
        if needed > u128::from(Literal::MAX.unsigned_abs()) {
            return Err(EncodeError::TooManyVariables { needed });
        }
        Ok(())
    }
}

/// The number of cell variables. Callers have already checked it fits.
#[allow(clippy::cast_possible_truncation)]
const fn cell_count(model: &PuzzleModel) -> Variable {
    model.num_cells() as Variable
}

/// First selector of every line, from the closed-form configuration counts.
#[allow(clippy::cast_possible_truncation)]
fn selector_starts(first_selector: Variable, estimate: &Complexity) -> Vec<Variable> {
    estimate
        .lines
        .iter()
        .scan(first_selector, |next, line| {
            let start = *next;
            *next += line.configurations as Variable;
            Some(start)
        })
        .collect()
}
