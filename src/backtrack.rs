//! Recursive backtracking over an explicit path.
//!
//! Unlike the frontier drivers there is no closed set: only the states on the
//! current path are remembered, so memory stays proportional to the depth
//! bound. Each call classifies the state at the end of the path as a cycle, a
//! dead end, a goal, too deep, or stuck, and otherwise tries its rules in
//! order.
use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::error::{Result, SearchError};
use crate::solver::Solution;
use crate::state::State;
use crate::stats::SearchStats;

type Path<S> = Vec<(S, Option<<S as State>::Rule>)>;

/// Searches for a goal at most `depth_bound` rules away from `root`.
///
/// The first rule that leads to a goal wins, so the solution follows
/// [`State::legal_rules`] order rather than being shortest. Every branch
/// failure is tallied in `stats.failures`.
///
/// # Errors
/// The failure of the root call: `CycleDetected` cannot happen there, so this
/// is `DeadEnd`, `DepthExceeded`, `NoApplicableRule` or `FrontierExhausted`.
///
/// # Examples
/// ```
/// use puzzle_search::backtrack::backtrack;
/// use puzzle_search::pegboard::PegBoard;
/// use puzzle_search::stats::SearchStats;
///
/// let board = PegBoard::from_config(1, 3, "XX.", 0).unwrap();
/// let mut stats = SearchStats::new();
/// let solution = backtrack(&board, 5, &mut stats).unwrap();
/// assert_eq!(solution.depth(), 1);
/// ```
pub fn backtrack<S: State>(
    root: &S,
    depth_bound: u32,
    stats: &mut SearchStats,
) -> Result<Solution<S>> {
    let mut path: Path<S> = vec![(root.clone(), None)];
    let mut on_path = FxHashSet::default();

    descend(&mut path, &mut on_path, depth_bound, stats)?;
    debug!(
        "backtrack found a goal at depth {} after {} calls",
        path.len() - 1,
        stats.backtrack_calls
    );
    Ok(Solution::from_path(path))
}

fn descend<S: State>(
    path: &mut Path<S>,
    on_path: &mut FxHashSet<String>,
    depth_bound: u32,
    stats: &mut SearchStats,
) -> Result<()> {
    stats.backtrack_calls += 1;

    let Some((state, _)) = path.last() else {
        return Err(SearchError::FrontierExhausted);
    };
    let state = state.clone();
    let depth = path.len() - 1;
    let fingerprint = state.fingerprint();

    if on_path.contains(&fingerprint) {
        stats.failures.cycle += 1;
        return Err(SearchError::CycleDetected);
    }
    if state.is_dead_end() {
        stats.failures.dead_end += 1;
        return Err(SearchError::DeadEnd);
    }
    if state.is_goal() {
        return Ok(());
    }
    if depth >= depth_bound as usize {
        stats.failures.depth_bound += 1;
        return Err(SearchError::DepthExceeded { bound: depth_bound });
    }
    let rules = state.legal_rules();
    if rules.is_empty() {
        stats.failures.no_rule += 1;
        return Err(SearchError::NoApplicableRule);
    }

    on_path.insert(fingerprint.clone());
    for rule in rules {
        trace!("depth {}: trying {}", depth, rule);
        let child = state.apply(&rule)?;
        path.push((child, Some(rule)));
        match descend(path, on_path, depth_bound, stats) {
            Ok(()) => return Ok(()),
            Err(err) if err.is_branch_failure() => {
                path.pop();
            }
            Err(err) => return Err(err),
        }
    }
    on_path.remove(&fingerprint);

    stats.failures.exhausted += 1;
    Err(SearchError::FrontierExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{Cube, Twist};
    use crate::pegboard::{Jump, PegBoard};

    /// A counter that dead-ends at 3 and reaches its goal at 5, with rules
    /// `+1`, `+2` and `-1`.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Counter(i32);

    #[derive(Clone, Debug, PartialEq)]
    struct Step(i32);

    impl std::fmt::Display for Counter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::fmt::Display for Step {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:+}", self.0)
        }
    }

    impl crate::state::Rule<Counter> for Step {
        fn precondition(&self, _state: &Counter) -> bool {
            true
        }

        fn transform(&self, state: &Counter) -> Counter {
            Counter(state.0 + self.0)
        }

        fn writes(&self, _state: &Counter) -> Vec<usize> {
            vec![0]
        }
    }

    impl State for Counter {
        type Rule = Step;

        fn legal_rules(&self) -> Vec<Step> {
            vec![Step(1), Step(2), Step(-1)]
        }

        fn is_goal(&self) -> bool {
            self.0 == 5
        }

        fn fingerprint(&self) -> String {
            self.0.to_string()
        }

        fn is_dead_end(&self) -> bool {
            self.0 == 3
        }
    }

    #[test]
    fn test_solved_root_is_depth_zero() {
        let mut stats = SearchStats::new();
        let solution = backtrack(&Cube::solved(), 0, &mut stats).unwrap();
        assert_eq!(solution.depth(), 0);
        assert_eq!(stats.backtrack_calls, 1);
    }

    #[test]
    fn test_one_twist() {
        let start = Cube::solved().apply(&Twist::U).unwrap();
        let mut stats = SearchStats::new();
        let solution = backtrack(&start, 1, &mut stats).unwrap();
        assert_eq!(solution.moves(), vec![&Twist::UPrime]);
        // U first reaches U2, one twist past the bound; U' is tried next.
        assert_eq!(stats.failures.depth_bound, 1);
    }

    #[test]
    fn test_failure_kinds_are_counted() {
        let mut stats = SearchStats::new();
        let solution = backtrack(&Counter(0), 6, &mut stats).unwrap();
        let values: Vec<i32> = solution.states().map(|c| c.0).collect();
        // 0 -> 1 -> 2 -> 3 is a dead end, so 2 jumps by two to 4, then 5.
        assert_eq!(values, vec![0, 1, 2, 4, 5]);
        assert_eq!(stats.failures.dead_end, 1);
        assert_eq!(stats.failures.cycle, 0);
    }

    #[test]
    fn test_cycles_are_detected() {
        // The goal is out of reach within two steps, so every -1 step back
        // onto the path is tried and rejected as a cycle.
        let mut stats = SearchStats::new();
        let err = backtrack(&Counter(0), 2, &mut stats).unwrap_err();
        assert_eq!(err, SearchError::FrontierExhausted);
        assert!(stats.failures.cycle > 0);
        assert!(stats.failures.depth_bound > 0);
        assert!(stats.failures.exhausted > 0);
    }

    #[test]
    fn test_root_dead_end() {
        let mut stats = SearchStats::new();
        let err = backtrack(&Counter(3), 10, &mut stats).unwrap_err();
        assert_eq!(err, SearchError::DeadEnd);
    }

    #[test]
    fn test_no_applicable_rule() {
        let board = PegBoard::from_config(1, 4, "X..X", 0).unwrap();
        let mut stats = SearchStats::new();
        let err = backtrack(&board, 10, &mut stats).unwrap_err();
        assert_eq!(err, SearchError::NoApplicableRule);
        assert_eq!(stats.failures.no_rule, 1);
    }

    #[test_log::test]
    fn test_four_by_four_peg_board() {
        let board = PegBoard::with_hole(4, 4, 9).unwrap();
        let mut stats = SearchStats::new();
        let solution = backtrack(&board, 20, &mut stats).unwrap();

        assert_eq!(solution.depth(), 14);
        assert_eq!(solution.moves()[0], &Jump::new(11, 10, 9));
        let last = solution.goal().unwrap();
        assert_eq!(last.peg_count(), 1);
        assert!(last.has_peg(9));
        assert!(stats.backtrack_calls > 14);
    }
}
