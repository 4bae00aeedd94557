/// Counters collected by an engine while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SolutionStats {
    /// Clauses falsified during search.
    pub conflicts: usize,
    /// Branching decisions taken.
    pub decisions: usize,
    /// Literals assigned by unit propagation.
    pub propagations: usize,
}
