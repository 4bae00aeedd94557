use crate::sat::cnf::{Literal, Variable, var_of_lit};
use core::ops::{Index, IndexMut};
use itertools::Itertools;
use std::fmt::Display;

/// The state of a single variable during search.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// Not yet assigned.
    #[default]
    Unassigned,
    /// Assigned the contained truth value.
    Assigned(bool),
}

impl VarState {
    /// Returns `true` if the variable carries a value.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// Returns `true` if the variable carries no value.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        !self.is_assigned()
    }
}

/// A partial assignment, indexed by variable. Slot 0 is never used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl IndexMut<Variable> for Assignment {
    fn index_mut(&mut self, index: Variable) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

impl Assignment {
    /// Creates an empty assignment over variables `1..=num_vars`.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    /// Makes `lit` true.
    pub fn assign(&mut self, lit: Literal) {
        self[var_of_lit(lit)] = VarState::Assigned(lit > 0);
    }

    /// Clears the value of `var`.
    pub fn unassign(&mut self, var: Variable) {
        self[var] = VarState::Unassigned;
    }

    /// The value of `var`, if assigned.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        match self.0.get(var as usize) {
            Some(VarState::Assigned(b)) => Some(*b),
            _ => None,
        }
    }

    /// The value of `lit` under this assignment, if its variable is assigned.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.var_value(var_of_lit(lit)).map(|b| b == (lit > 0))
    }

    /// The lowest unassigned variable.
    #[must_use]
    pub fn first_unassigned(&self) -> Option<Variable> {
        self.0
            .iter()
            .skip(1)
            .position(|s| s.is_unassigned())
            .and_then(|i| Variable::try_from(i + 1).ok())
    }

    /// Freezes a complete assignment into a model. Unassigned variables read as false.
    #[must_use]
    pub fn get_solutions(&self) -> Solutions {
        Solutions(
            self.0
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, s)| {
                    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                    let lit = i as Literal;
                    if matches!(s, VarState::Assigned(true)) { lit } else { -lit }
                })
                .collect(),
        )
    }
}

/// A model: one signed literal per variable, in variable order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Solutions(Vec<Literal>);

impl Solutions {
    /// Returns `true` if `var` is true in the model.
    #[must_use]
    pub fn check(&self, var: Variable) -> bool {
        self.value(var) == Some(true)
    }

    /// The value of `var`, or `None` when the variable lies outside the model.
    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        let idx = (var as usize).checked_sub(1)?;
        self.0.get(idx).map(|&lit| lit > 0)
    }

    /// The value `lit` takes in the model.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.value(var_of_lit(lit)).map(|b| b == (lit > 0))
    }

    /// Iterates the literals of the model.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    /// Number of variables in the model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the model covers no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Literal>> for Solutions {
    fn from(mut literals: Vec<Literal>) -> Self {
        literals.sort_by_key(|l| l.unsigned_abs());
        Self(literals)
    }
}

impl Display for Solutions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
