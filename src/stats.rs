use std::fmt;

/// Branch failures seen by the backtracking driver, counted by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FailureCounts {
    pub cycle: u64,
    pub dead_end: u64,
    pub depth_bound: u64,
    pub no_rule: u64,
    pub exhausted: u64,
}

impl FailureCounts {
    pub fn total(&self) -> u64 {
        self.cycle + self.dead_end + self.depth_bound + self.no_rule + self.exhausted
    }
}

/// Counters shared by every search driver.
///
/// Drivers take `&mut SearchStats` and only ever add to it, so one value can
/// accumulate several runs (iterative deepening does exactly that).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier and expanded.
    pub expanded: u64,
    /// Successor states created.
    pub generated: u64,
    /// Successors or popped nodes discarded because they were already closed.
    pub duplicates: u64,
    /// Nodes not expanded because they sat at the depth bound.
    pub depth_cutoffs: u64,
    /// Largest frontier size observed.
    pub max_frontier: usize,
    /// Calls into the backtracking recursion.
    pub backtrack_calls: u64,
    pub failures: FailureCounts,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn observe_frontier(&mut self, len: usize) {
        self.max_frontier = self.max_frontier.max(len);
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded={} generated={} duplicates={} cutoffs={} max_frontier={}",
            self.expanded, self.generated, self.duplicates, self.depth_cutoffs, self.max_frontier
        )?;
        if self.backtrack_calls > 0 {
            write!(
                f,
                " backtrack_calls={} failures(cycle={} dead_end={} depth={} no_rule={} exhausted={})",
                self.backtrack_calls,
                self.failures.cycle,
                self.failures.dead_end,
                self.failures.depth_bound,
                self.failures.no_rule,
                self.failures.exhausted
            )?;
        }
        Ok(())
    }
}
