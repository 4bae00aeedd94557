//! Defines the DPLL (Davis-Putnam-Logemann-Loveland) engine used to solve
//! nonogram encodings.
//!
//! The engine keeps an explicit trail instead of cloning itself at every branch:
//!
//! 1.  **Unit propagation** runs over two watched literals per clause. Each
//!     assigned literal only visits the clauses watching its negation.
//! 2.  **Decision:** when propagation reaches a fixpoint without conflict the
//!     lowest unassigned variable is set to false.
//! 3.  **Backtracking** is chronological: on conflict the trail is unwound to the
//!     most recent decision that has not been flipped yet, and its negation is
//!     asserted instead. When no such decision remains the formula is unsatisfiable.

use crate::sat::assignment::{Assignment, Solutions};
use crate::sat::cnf::{Cnf, Literal, var_of_lit};
use crate::sat::sink::{ClauseSink, SatEngine};
use crate::sat::solver::SolutionStats;
use smallvec::SmallVec;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    Decision { flipped: bool },
    Implied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    lit: Literal,
    reason: Reason,
}

type WatchList = SmallVec<[usize; 6]>;

#[allow(clippy::cast_sign_loss)]
const fn watch_idx(lit: Literal) -> usize {
    2 * var_of_lit(lit) as usize + (lit < 0) as usize
}

/// A DPLL engine over an owned [`Cnf`].
///
/// Clauses are collected through [`ClauseSink`]; [`SatEngine::solve`] rebuilds
/// the search state from them, so more clauses may be added between solves.
#[derive(Debug, Clone, Default)]
pub struct Dpll {
    cnf: Cnf,
    clauses: Vec<Vec<Literal>>,
    assignment: Assignment,
    trail: Vec<Step>,
    qhead: usize,
    watches: Vec<WatchList>,
    stats: SolutionStats,
    model: Option<Solutions>,
}

impl Dpll {
    /// Creates an engine with no clauses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The clauses collected so far.
    #[must_use]
    pub const fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Rebuilds the working clause list, the watches and the level-0 units.
    /// Returns `false` if two unit clauses contradict each other.
    fn reset(&mut self) -> bool {
        let num_vars = self.cnf.num_vars;
        self.assignment = Assignment::new(num_vars);
        self.trail.clear();
        self.qhead = 0;
        self.watches = vec![WatchList::new(); 2 * (num_vars + 1)];

        self.clauses = self
            .cnf
            .iter()
            .filter_map(|clause| {
                let mut clause = clause.clone();
                clause.sort_unstable_by_key(|&l| (var_of_lit(l), l));
                clause.dedup();
                // x and -x sort next to each other
                let tautology = clause.windows(2).any(|w| w[0] == -w[1]);
                (!tautology).then_some(clause)
            })
            .collect();

        let mut units = Vec::new();
        for (ci, clause) in self.clauses.iter().enumerate() {
            if clause.len() == 1 {
                units.push(clause[0]);
            } else {
                self.watches[watch_idx(clause[0])].push(ci);
                self.watches[watch_idx(clause[1])].push(ci);
            }
        }

        for lit in units {
            match self.assignment.literal_value(lit) {
                Some(false) => return false,
                Some(true) => {}
                None => self.enqueue(lit, Reason::Implied),
            }
        }
        true
    }

    fn enqueue(&mut self, lit: Literal, reason: Reason) {
        self.assignment.assign(lit);
        self.trail.push(Step { lit, reason });
    }

    /// Propagates every queued literal. Returns the index of a falsified clause on conflict.
    fn propagate(&mut self) -> Option<usize> {
        while self.qhead < self.trail.len() {
            let false_lit = -self.trail[self.qhead].lit;
            self.qhead += 1;

            let mut watchers = std::mem::take(&mut self.watches[watch_idx(false_lit)]);
            let mut i = 0;
            while i < watchers.len() {
                let ci = watchers[i];
                let clause = &mut self.clauses[ci];
                if clause[0] == false_lit {
                    clause.swap(0, 1);
                }

                let first = clause[0];
                if self.assignment.literal_value(first) == Some(true) {
                    i += 1;
                    continue;
                }

                let replacement = (2..clause.len())
                    .find(|&k| self.assignment.literal_value(clause[k]) != Some(false));
                if let Some(k) = replacement {
                    clause.swap(1, k);
                    let new_watch = clause[1];
                    self.watches[watch_idx(new_watch)].push(ci);
                    watchers.swap_remove(i);
                    continue;
                }

                if self.assignment.literal_value(first) == Some(false) {
                    self.watches[watch_idx(false_lit)].extend(watchers);
                    return Some(ci);
                }

                self.enqueue(first, Reason::Implied);
                self.stats.propagations += 1;
                i += 1;
            }
            self.watches[watch_idx(false_lit)].extend(watchers);
        }
        None
    }

    /// Unwinds to the latest unflipped decision and asserts its negation.
    fn backtrack(&mut self) -> bool {
        while let Some(step) = self.trail.pop() {
            self.assignment.unassign(var_of_lit(step.lit));
            if step.reason == (Reason::Decision { flipped: false }) {
                self.qhead = self.trail.len();
                self.enqueue(-step.lit, Reason::Decision { flipped: true });
                return true;
            }
        }
        self.qhead = 0;
        false
    }
}

impl From<Cnf> for Dpll {
    fn from(cnf: Cnf) -> Self {
        Self {
            cnf,
            ..Self::default()
        }
    }
}

impl ClauseSink for Dpll {
    fn add_clause(&mut self, clause: Vec<Literal>) {
        self.model = None;
        self.cnf.add_clause(clause);
    }
}

impl SatEngine for Dpll {
    fn solve(&mut self) -> bool {
        self.model = None;
        self.stats = SolutionStats::default();

        if self.cnf.has_empty_clause() {
            debug!("formula contains an empty clause");
            return false;
        }
        if !self.reset() {
            debug!("contradicting unit clauses");
            return false;
        }

        loop {
            if let Some(ci) = self.propagate() {
                self.stats.conflicts += 1;
                trace!(clause = ci, "conflict");
                if !self.backtrack() {
                    return false;
                }
                continue;
            }

            let Some(var) = self.assignment.first_unassigned() else {
                self.model = Some(self.assignment.get_solutions());
                return true;
            };

            self.stats.decisions += 1;
            #[allow(clippy::cast_possible_wrap)]
            let lit = -(var as Literal);
            self.enqueue(lit, Reason::Decision { flipped: false });
        }
    }

    fn model(&self) -> Option<Solutions> {
        self.model.clone()
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}
