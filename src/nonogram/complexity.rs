//! Size estimates for an encoding, computed from clue arithmetic alone.
//!
//! A line of length `n` whose clue has `k` runs and slack `s` has `C(s + k, k)`
//! configurations, the same count the generator enumerates. Every configuration
//! contributes `n` implication clauses and every line one at-least-one clause.
//! Counts are `u128` and saturate rather than overflow.

use crate::nonogram::encoder::Exclusivity;
use crate::nonogram::model::{Clue, Orientation, PuzzleModel};

/// Rough storage cost of one clause.
pub const BYTES_PER_CLAUSE: u128 = 5;

/// `C(n, k)`, saturating at `u128::MAX`.
#[must_use]
pub fn binomial(n: u128, k: u128) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // C(n, i) * (n - i) is always divisible by i + 1
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return u128::MAX,
        };
    }
    result
}

/// Number of configurations of `clue` in a line of `length` cells.
#[must_use]
pub fn line_configurations(length: usize, clue: &Clue) -> u128 {
    clue.slack(length).map_or(0, |slack| {
        let k = clue.len() as u128;
        binomial(slack as u128 + k, k)
    })
}

/// The estimate for one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineComplexity {
    /// Row or column.
    pub orientation: Orientation,
    /// 0-based line index.
    pub index: usize,
    /// Number of cells.
    pub length: usize,
    /// Configurations the generator will yield.
    pub configurations: u128,
    /// Implication clauses plus the at-least-one clause.
    pub clauses: u128,
}

impl LineComplexity {
    /// Pairwise exclusion clauses added by [`Exclusivity::ExactlyOne`].
    #[must_use]
    pub fn exclusion_clauses(&self) -> u128 {
        binomial(self.configurations, 2)
    }
}

/// The estimate for a whole puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Complexity {
    /// Per-line figures, rows first.
    pub lines: Vec<LineComplexity>,
    /// Sum of configurations over all lines.
    pub configurations: u128,
    /// Sum of clauses over all lines, reference encoding.
    pub clauses: u128,
    /// `clauses * BYTES_PER_CLAUSE`.
    pub approx_bytes: u128,
}

impl Complexity {
    /// The clause count for a given exclusivity mode.
    #[must_use]
    pub fn clauses_with(&self, exclusivity: Exclusivity) -> u128 {
        match exclusivity {
            Exclusivity::AtLeastOne => self.clauses,
            Exclusivity::ExactlyOne => self
                .lines
                .iter()
                .fold(self.clauses, |acc, l| acc.saturating_add(l.exclusion_clauses())),
        }
    }

    /// `approx_bytes` in MiB, rounded down.
    #[must_use]
    pub const fn approx_mib(&self) -> u128 {
        self.approx_bytes / (1024 * 1024)
    }

    /// Lines with no configuration at all.
    pub fn infeasible_lines(&self) -> impl Iterator<Item = &LineComplexity> {
        self.lines.iter().filter(|l| l.configurations == 0)
    }
}

/// Estimates the encoding of `model` without generating anything.
#[must_use]
pub fn estimate(model: &PuzzleModel) -> Complexity {
    let lines: Vec<LineComplexity> = model
        .lines()
        .map(|line| {
            let configurations = line_configurations(line.length, line.clue);
            LineComplexity {
                orientation: line.orientation,
                index: line.index,
                length: line.length,
                configurations,
                clauses: configurations
                    .saturating_mul(line.length as u128)
                    .saturating_add(1),
            }
        })
        .collect();

    let configurations = lines
        .iter()
        .fold(0u128, |acc, l| acc.saturating_add(l.configurations));
    let clauses = lines
        .iter()
        .fold(0u128, |acc, l| acc.saturating_add(l.clauses));

    Complexity {
        lines,
        configurations,
        clauses,
        approx_bytes: clauses.saturating_mul(BYTES_PER_CLAUSE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonogram::config::generate;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 0), 1);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(52, 5), 2_598_960);
        assert_eq!(binomial(100, 50), 100_891_344_545_564_193_334_812_497_256);
        assert_eq!(binomial(10_000, 5_000), u128::MAX);
    }

    #[test]
    fn test_line_configurations() {
        assert_eq!(line_configurations(3, &Clue::from(vec![2])), 2);
        assert_eq!(line_configurations(2, &Clue::from(vec![2])), 1);
        assert_eq!(line_configurations(2, &Clue::from(vec![1, 1])), 0);
        assert_eq!(line_configurations(5, &Clue::default()), 1);
        assert_eq!(line_configurations(5, &Clue::from(vec![1, 1])), 6);
    }

    #[test]
    fn test_estimate_small_puzzle() {
        // 2 wide, 3 tall
        let model = PuzzleModel::from_runs(
            "t",
            vec![vec![1], vec![2], vec![0]],
            vec![vec![2], vec![1]],
        )
        .unwrap();
        let c = estimate(&model);
        let counts: Vec<_> = c.lines.iter().map(|l| l.configurations).collect();
        assert_eq!(counts, vec![2, 1, 1, 2, 3]);
        assert_eq!(c.configurations, 9);
        // rows have length 2, columns length 3
        assert_eq!(c.clauses, (2 * 2 + 1) + (2 + 1) + (2 + 1) + (2 * 3 + 1) + (3 * 3 + 1));
        assert_eq!(c.approx_bytes, c.clauses * 5);
        assert_eq!(c.infeasible_lines().count(), 0);
    }

    #[test]
    fn test_estimate_agrees_with_enumeration() {
        let model = PuzzleModel::from_runs(
            "agree",
            vec![vec![1, 1], vec![3], vec![0], vec![1, 2], vec![1]],
            vec![vec![2], vec![1, 1], vec![1], vec![4], vec![0], vec![1, 1, 1]],
        )
        .unwrap();
        let enumerated: u128 = model
            .lines()
            .map(|l| generate(l.length, l.clue).count() as u128)
            .sum();
        assert_eq!(estimate(&model).configurations, enumerated);
    }

    #[test]
    fn test_exactly_one_adds_pairs() {
        let model =
            PuzzleModel::from_runs("p", vec![vec![1]], vec![vec![0], vec![1], vec![0], vec![0]])
                .unwrap();
        let c = estimate(&model);
        // the row has 4 configurations, every column 1
        assert_eq!(c.clauses_with(Exclusivity::AtLeastOne), c.clauses);
        assert_eq!(c.clauses_with(Exclusivity::ExactlyOne), c.clauses + 6);
    }

    #[test]
    fn test_infeasible_line_reported() {
        let model = PuzzleModel::from_runs("x", vec![vec![1, 1]], vec![vec![1], vec![1]]).unwrap();
        let c = estimate(&model);
        let bad: Vec<_> = c.infeasible_lines().map(|l| (l.orientation, l.index)).collect();
        assert_eq!(bad, vec![(Orientation::Row, 0)]);
        assert_eq!(c.lines[0].clauses, 1);
    }
}
