use crate::sat::assignment::Solutions;
use crate::sat::cnf::Literal;
use crate::sat::solver::SolutionStats;

/// Anything clauses can be submitted to.
///
/// A clause is a list of signed literals; an empty list is the always-false clause.
pub trait ClauseSink {
    /// Adds one clause.
    fn add_clause(&mut self, clause: Vec<Literal>);
}

impl<S: ClauseSink + ?Sized> ClauseSink for &mut S {
    fn add_clause(&mut self, clause: Vec<Literal>) {
        (**self).add_clause(clause);
    }
}

/// A clause sink that can also decide satisfiability of what it was given.
pub trait SatEngine: ClauseSink {
    /// Runs the search. Returns `true` if the clauses are satisfiable.
    fn solve(&mut self) -> bool;

    /// The model found by the last successful [`SatEngine::solve`], if any.
    fn model(&self) -> Option<Solutions>;

    /// Counters collected during the last search.
    fn stats(&self) -> SolutionStats;
}

impl<E: SatEngine + ?Sized> SatEngine for &mut E {
    fn solve(&mut self) -> bool {
        (**self).solve()
    }

    fn model(&self) -> Option<Solutions> {
        (**self).model()
    }

    fn stats(&self) -> SolutionStats {
        (**self).stats()
    }
}
