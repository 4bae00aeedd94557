//! Enumeration of every filled/empty pattern a single line can take.
//!
//! A placement is described by its gap distribution: one entry per run, the number
//! of empty cells directly before it. The first gap may be zero, every later gap is
//! at least one. Gap vectors are produced in lexicographic order by a recursive,
//! lazy enumeration; each branch owns its accumulator, so two calls with the same
//! arguments always produce the same sequence.

use crate::nonogram::complexity::line_configurations;
use crate::nonogram::model::{Cell, Clue};
use bit_vec::BitVec;
use std::fmt::Display;
use std::rc::Rc;

/// One complete filling of a line. Bit `p` is set when cell `p` is filled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Configuration(BitVec);

impl Configuration {
    /// A line of `length` empty cells.
    #[must_use]
    pub fn empty(length: usize) -> Self {
        Self(BitVec::from_elem(length, false))
    }

    /// Writes each run after its gap.
    fn from_gaps(length: usize, runs: &[usize], gaps: &[usize]) -> Self {
        let mut bits = BitVec::from_elem(length, false);
        let mut pos = 0;
        for (&run, &gap) in runs.iter().zip(gaps) {
            pos += gap;
            for p in pos..pos + run {
                bits.set(p, true);
            }
            pos += run;
        }
        Self(bits)
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a zero-length line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The cells in order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.0
            .iter()
            .map(|filled| if filled { Cell::Filled } else { Cell::Empty })
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|&b| b).count()
    }
}

impl Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.cells().try_for_each(|c| write!(f, "{c}"))
    }
}

type Gaps = Box<dyn Iterator<Item = Vec<usize>>>;

/// Places `runs[from..]` in `length` cells, the first of them at least `min_gap` in.
fn place(length: usize, runs: Rc<[usize]>, from: usize, min_gap: usize, acc: Vec<usize>) -> Gaps {
    let Some(&first) = runs.get(from) else {
        return Box::new(std::iter::once(acc));
    };
    let rest = &runs[from..];
    let needed = rest.iter().sum::<usize>() + rest.len() - 1;
    let Some(max_gap) = length.checked_sub(needed) else {
        return Box::new(std::iter::empty());
    };

    Box::new((min_gap..=max_gap).flat_map(move |gap| {
        let mut acc = acc.clone();
        acc.push(gap);
        place(length - gap - first, Rc::clone(&runs), from + 1, 1, acc)
    }))
}

/// Every gap distribution of `clue` in a line of `length` cells.
///
/// An empty clue has exactly one distribution, the empty vector. A clue that does
/// not fit has none.
#[must_use]
pub fn gap_distributions(length: usize, clue: &Clue) -> impl Iterator<Item = Vec<usize>> + use<> {
    let runs: Rc<[usize]> = clue.runs().iter().map(|&r| r as usize).collect();
    place(length, runs, 0, 0, Vec::with_capacity(clue.len()))
}

/// How many configurations [`generate`] yields, computed without enumerating.
#[must_use]
pub fn count(length: usize, clue: &Clue) -> u128 {
    line_configurations(length, clue)
}

/// Lazily enumerates the legal configurations of a line.
pub struct LineConfigs {
    length: usize,
    runs: Vec<usize>,
    gaps: Gaps,
}

impl Iterator for LineConfigs {
    type Item = Configuration;

    fn next(&mut self) -> Option<Self::Item> {
        let gaps = self.gaps.next()?;
        Some(Configuration::from_gaps(self.length, &self.runs, &gaps))
    }
}

/// Every configuration of `clue` in a line of `length` cells.
///
/// Infeasible clues yield nothing; that is how an impossible line reaches the
/// encoder, not as an error.
#[must_use]
pub fn generate(length: usize, clue: &Clue) -> LineConfigs {
    LineConfigs {
        length,
        runs: clue.runs().iter().map(|&r| r as usize).collect(),
        gaps: Box::new(gap_distributions(length, clue)),
    }
}
