//! An in-memory CNF formula.
//!
//! `Cnf` is the simplest [`ClauseSink`]: it stores every clause it is handed and
//! keeps track of the highest variable seen. It renders itself in DIMACS format
//! through `Display`, which is how the command line exports encodings, and it can
//! check a model against the stored clauses.

use crate::sat::assignment::Solutions;
use crate::sat::sink::ClauseSink;
use itertools::Itertools;
use std::fmt::Display;

/// A signed literal: positive for the variable, negative for its negation.
pub type Literal = i32;

/// A 1-based variable identifier. 0 is never a variable.
pub type Variable = u32;

/// The variable a literal refers to.
#[must_use]
pub const fn var_of_lit(l: Literal) -> Variable {
    l.unsigned_abs()
}

/// A formula in conjunctive normal form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Cnf {
    /// The clauses, in submission order.
    pub clauses: Vec<Vec<Literal>>,
    /// The highest variable referenced by any clause.
    pub num_vars: usize,
}

impl Cnf {
    /// Builds a formula from a list of clauses.
    #[must_use]
    pub fn new<I, C>(clauses: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = Literal>,
    {
        let mut cnf = Self::default();
        for clause in clauses {
            cnf.add_clause(clause.into_iter().collect());
        }
        cnf
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns `true` if the formula has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates the clauses.
    pub fn iter(&self) -> impl Iterator<Item = &Vec<Literal>> {
        self.clauses.iter()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Vec::len).sum()
    }

    /// Returns `true` if some clause is empty, which makes the formula unsatisfiable.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Vec::is_empty)
    }

    /// Checks that every clause has a literal that is true in `solutions`.
    #[must_use]
    pub fn verify(&self, solutions: &Solutions) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| solutions.literal_value(lit) == Some(true))
        })
    }
}

impl ClauseSink for Cnf {
    fn add_clause(&mut self, clause: Vec<Literal>) {
        if let Some(max) = clause.iter().map(|&l| var_of_lit(l) as usize).max() {
            self.num_vars = self.num_vars.max(max);
        }
        self.clauses.push(clause);
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for clause in &self.clauses {
            if clause.is_empty() {
                writeln!(f, "0")?;
            } else {
                writeln!(f, "{} 0", clause.iter().join(" "))?;
            }
        }
        Ok(())
    }
}

impl From<Vec<Vec<Literal>>> for Cnf {
    fn from(clauses: Vec<Vec<Literal>>) -> Self {
        Self::new(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_vars_tracks_highest_variable() {
        let cnf = Cnf::new(vec![vec![1, -2], vec![-7, 3]]);
        assert_eq!(cnf.num_vars, 7);
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.num_literals(), 4);
    }

    #[test]
    fn test_dimacs_output() {
        let cnf = Cnf::new(vec![vec![1, -2], vec![], vec![2]]);
        assert_eq!(cnf.to_string(), "p cnf 2 3\n1 -2 0\n0\n2 0\n");
        assert!(cnf.has_empty_clause());
    }

    #[test]
    fn test_verify() {
        let cnf = Cnf::new(vec![vec![1, 2], vec![-1]]);
        assert!(cnf.verify(&Solutions::from(vec![-1, 2])));
        assert!(!cnf.verify(&Solutions::from(vec![1, 2])));
        assert!(!cnf.verify(&Solutions::from(vec![-1, -2])));
    }

    #[test]
    fn test_empty_clause_never_verifies() {
        let cnf = Cnf::new(vec![Vec::<Literal>::new()]);
        assert!(!cnf.verify(&Solutions::from(vec![1])));
    }
}
