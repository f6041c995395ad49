//! Frontier-based search: depth-first, breadth-first, best-first and
//! iterative deepening.
//!
//! Every driver shares [`FrontierSearch`], which differs only in the
//! [`Frontier`] it pops from. Expanded nodes live in a [`SearchTree`] arena and
//! point at their parent by index, so a goal's path is rebuilt by walking
//! parent links back to the root.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::backtrack::backtrack;
use crate::config::{SearchConfig, SearchLimits, Strategy};
use crate::error::{Result, SearchError};
use crate::heuristics::Heuristic;
use crate::state::State;
use crate::stats::SearchStats;

/// Index of a node in a [`SearchTree`].
pub type NodeId = usize;

struct Node<S: State> {
    state: S,
    parent: Option<NodeId>,
    rule: Option<S::Rule>,
    depth: u32,
}

/// Arena of every state a search has generated.
pub struct SearchTree<S: State> {
    nodes: Vec<Node<S>>,
}

impl<S: State> SearchTree<S> {
    fn with_root(root: S) -> Self {
        SearchTree {
            nodes: vec![Node {
                state: root,
                parent: None,
                rule: None,
                depth: 0,
            }],
        }
    }

    fn push(&mut self, state: S, parent: NodeId, rule: S::Rule) -> NodeId {
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(Node {
            state,
            parent: Some(parent),
            rule: Some(rule),
            depth,
        });
        self.nodes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn state(&self, id: NodeId) -> &S {
        &self.nodes[id].state
    }

    /// The root-to-`id` path.
    pub fn solution(&self, id: NodeId) -> Solution<S> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current];
            path.push((node.state.clone(), node.rule.clone()));
            cursor = node.parent;
        }
        path.reverse();
        Solution { path }
    }
}

/// A root-to-goal path.
///
/// Each entry is a state and the rule that produced it; the root's rule is
/// `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<S: State> {
    path: Vec<(S, Option<S::Rule>)>,
}

impl<S: State> Solution<S> {
    pub(crate) fn from_path(path: Vec<(S, Option<S::Rule>)>) -> Self {
        Solution { path }
    }

    /// Number of rules applied from the root to the goal.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(S, Option<S::Rule>)> {
        self.path.iter()
    }

    /// The rules applied, in order.
    pub fn moves(&self) -> Vec<&S::Rule> {
        self.path.iter().filter_map(|(_, rule)| rule.as_ref()).collect()
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.path.iter().map(|(state, _)| state)
    }

    pub fn root(&self) -> Option<&S> {
        self.path.first().map(|(state, _)| state)
    }

    pub fn goal(&self) -> Option<&S> {
        self.path.last().map(|(state, _)| state)
    }
}

/// Work list of nodes waiting to be expanded.
pub trait Frontier {
    /// Adds `id`. `score` is only used by ordered frontiers.
    fn push(&mut self, id: NodeId, score: i64);
    fn pop(&mut self) -> Option<NodeId>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Last in, first out: depth-first order.
#[derive(Default)]
pub struct LifoFrontier(Vec<NodeId>);

impl Frontier for LifoFrontier {
    fn push(&mut self, id: NodeId, _score: i64) {
        self.0.push(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// First in, first out: breadth-first order.
#[derive(Default)]
pub struct FifoFrontier(VecDeque<NodeId>);

impl Frontier for FifoFrontier {
    fn push(&mut self, id: NodeId, _score: i64) {
        self.0.push_back(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.0.pop_front()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Lowest score first; equal scores pop in insertion order.
#[derive(Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<Reverse<(i64, u64, NodeId)>>,
    seq: u64,
}

impl Frontier for PriorityFrontier {
    fn push(&mut self, id: NodeId, score: i64) {
        self.heap.push(Reverse((score, self.seq, id)));
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse((_, _, id))| id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Where a [`FrontierSearch`] is in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverStatus {
    Ready,
    Expanding,
    GoalFound,
    /// The frontier emptied without a goal and nothing was cut off.
    Exhausted,
    /// The frontier emptied without a goal after at least one depth cutoff.
    BoundExceeded,
}

impl DriverStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DriverStatus::GoalFound | DriverStatus::Exhausted | DriverStatus::BoundExceeded
        )
    }
}

type ScoreFn<'h, S> = Box<dyn Fn(&S, u32) -> i64 + 'h>;

/// One run of a frontier driver, advanced an expansion at a time.
///
/// # Examples
/// ```
/// use puzzle_search::cube::{Cube, Twist};
/// use puzzle_search::solver::{DriverStatus, FifoFrontier, FrontierSearch};
/// use puzzle_search::state::State;
/// use puzzle_search::stats::SearchStats;
///
/// let start = Cube::solved().apply(&Twist::R).unwrap();
/// let mut search = FrontierSearch::new(start, FifoFrontier::default());
/// let mut stats = SearchStats::new();
///
/// assert_eq!(search.status(), DriverStatus::Ready);
/// while !search.step(&mut stats).unwrap().is_terminal() {}
/// assert_eq!(search.status(), DriverStatus::GoalFound);
/// assert_eq!(search.solution().unwrap().depth(), 1);
/// ```
pub struct FrontierSearch<'h, S: State, F: Frontier> {
    tree: SearchTree<S>,
    frontier: F,
    closed: FxHashSet<String>,
    score: ScoreFn<'h, S>,
    depth_bound: Option<u32>,
    limits: SearchLimits,
    expanded: u64,
    cut_off: bool,
    status: DriverStatus,
    goal: Option<NodeId>,
}

impl<'h, S: State, F: Frontier> FrontierSearch<'h, S, F> {
    /// Starts a search from `root` with no depth bound, no limits, and every
    /// node scored 0.
    pub fn new(root: S, mut frontier: F) -> Self {
        frontier.push(0, 0);
        FrontierSearch {
            tree: SearchTree::with_root(root),
            frontier,
            closed: FxHashSet::default(),
            score: Box::new(|_: &S, _: u32| 0),
            depth_bound: None,
            limits: SearchLimits::default(),
            expanded: 0,
            cut_off: false,
            status: DriverStatus::Ready,
            goal: None,
        }
    }

    /// Nodes at depth `bound` are checked for the goal but never expanded.
    pub fn with_depth_bound(mut self, bound: u32) -> Self {
        self.depth_bound = Some(bound);
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Counts `expanded` earlier expansions against `max_expansions`.
    pub(crate) fn with_spent_expansions(mut self, expanded: u64) -> Self {
        self.expanded = expanded;
        self
    }

    /// Orders an ordered frontier by `heuristic`.
    pub fn with_heuristic<H: Heuristic<S>>(mut self, heuristic: &'h H) -> Self {
        self.score = Box::new(move |state: &S, depth: u32| heuristic.score(state, depth));
        self
    }

    pub fn status(&self) -> DriverStatus {
        self.status
    }

    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// The path to the goal, once one has been found.
    pub fn solution(&self) -> Option<Solution<S>> {
        self.goal.map(|id| self.tree.solution(id))
    }

    /// Pops one node and handles it.
    ///
    /// # Errors
    /// Returns `SearchError::LimitExceeded` when a configured budget runs out,
    /// or `SearchError::PreconditionViolation` if a state lists a rule that
    /// does not apply to it.
    pub fn step(&mut self, stats: &mut SearchStats) -> Result<DriverStatus> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }

        let Some(id) = self.frontier.pop() else {
            self.status = if self.cut_off {
                DriverStatus::BoundExceeded
            } else {
                DriverStatus::Exhausted
            };
            debug!("frontier empty: {:?}", self.status);
            return Ok(self.status);
        };
        self.status = DriverStatus::Expanding;

        let node = &self.tree.nodes[id];
        let fingerprint = node.state.fingerprint();
        if self.closed.contains(&fingerprint) {
            stats.duplicates += 1;
            return Ok(self.status);
        }

        if node.state.is_goal() {
            debug!("goal found at depth {}", node.depth);
            self.goal = Some(id);
            self.status = DriverStatus::GoalFound;
            return Ok(self.status);
        }

        if self.depth_bound.is_some_and(|bound| node.depth >= bound) {
            self.cut_off = true;
            stats.depth_cutoffs += 1;
            return Ok(self.status);
        }

        self.expanded += 1;
        stats.expanded += 1;
        self.limits.check_expansions(self.expanded)?;

        debug!("expanding depth {}: {}", node.depth, fingerprint);
        let depth = node.depth + 1;
        let mut children = Vec::new();
        for rule in node.state.legal_rules() {
            let child = node.state.apply(&rule)?;
            stats.generated += 1;
            if self.closed.contains(&child.fingerprint()) {
                stats.duplicates += 1;
                continue;
            }
            trace!("  {} -> {}", rule, child.fingerprint());
            children.push((child, rule));
        }
        self.closed.insert(fingerprint);

        for (child, rule) in children {
            let score = (self.score)(&child, depth);
            let child_id = self.tree.push(child, id, rule);
            self.frontier.push(child_id, score);
        }
        self.limits.check_states(self.tree.len())?;
        stats.observe_frontier(self.frontier.len());

        Ok(self.status)
    }

    /// Steps until the search ends.
    ///
    /// # Errors
    /// `FrontierExhausted` or `DepthExceeded` when no goal was reached, plus
    /// anything [`FrontierSearch::step`] returns.
    pub fn run(&mut self, stats: &mut SearchStats) -> Result<Solution<S>> {
        loop {
            match self.step(stats)? {
                DriverStatus::GoalFound => {
                    return self.solution().ok_or(SearchError::FrontierExhausted);
                }
                DriverStatus::Exhausted => return Err(SearchError::FrontierExhausted),
                DriverStatus::BoundExceeded => {
                    return Err(SearchError::DepthExceeded {
                        bound: self.depth_bound.unwrap_or(u32::MAX),
                    })
                }
                DriverStatus::Ready | DriverStatus::Expanding => {}
            }
        }
    }
}

/// Depth-first search that never expands nodes at depth `bound`.
pub fn depth_first<S: State>(
    root: &S,
    bound: u32,
    limits: &SearchLimits,
    stats: &mut SearchStats,
) -> Result<Solution<S>> {
    FrontierSearch::new(root.clone(), LifoFrontier::default())
        .with_depth_bound(bound)
        .with_limits(*limits)
        .run(stats)
}

/// Breadth-first search. The solution it returns is a shortest one.
pub fn breadth_first<S: State>(
    root: &S,
    limits: &SearchLimits,
    stats: &mut SearchStats,
) -> Result<Solution<S>> {
    FrontierSearch::new(root.clone(), FifoFrontier::default())
        .with_limits(*limits)
        .run(stats)
}

/// Best-first search, expanding the lowest `heuristic` score first.
pub fn best_first<S: State, H: Heuristic<S>>(
    root: &S,
    heuristic: &H,
    limits: &SearchLimits,
    stats: &mut SearchStats,
) -> Result<Solution<S>> {
    FrontierSearch::new(root.clone(), PriorityFrontier::default())
        .with_heuristic(heuristic)
        .with_limits(*limits)
        .run(stats)
}

/// Depth-first search with bounds 0, 1, ... up to `limits.depth_bound`.
///
/// Statistics accumulate across rounds and `max_expansions` covers the whole
/// run. A round that exhausts the space without any cutoff ends the search.
pub fn iterative_deepening<S: State>(
    root: &S,
    limits: &SearchLimits,
    stats: &mut SearchStats,
) -> Result<Solution<S>> {
    let mut spent = 0;
    for bound in 0..=limits.depth_bound {
        debug!("iterative deepening: bound {} ({} expansions so far)", bound, spent);
        let before = stats.expanded;
        let result = FrontierSearch::new(root.clone(), LifoFrontier::default())
            .with_depth_bound(bound)
            .with_limits(*limits)
            .with_spent_expansions(spent)
            .run(stats);
        spent += stats.expanded - before;
        match result {
            Err(SearchError::DepthExceeded { .. }) => continue,
            result => return result,
        }
    }
    Err(SearchError::DepthExceeded {
        bound: limits.depth_bound,
    })
}

/// Runs the driver `config.strategy` names.
///
/// `heuristic` is only consulted by [`Strategy::BestFirst`].
///
/// # Examples
/// ```
/// use puzzle_search::config::{SearchConfig, Strategy};
/// use puzzle_search::cube::{Cube, Twist};
/// use puzzle_search::heuristics::MisplacedTiles;
/// use puzzle_search::solver::solve;
/// use puzzle_search::state::State;
/// use puzzle_search::stats::SearchStats;
///
/// let start = Cube::solved().apply(&Twist::F).unwrap();
/// let mut stats = SearchStats::new();
/// let solution = solve(&start, &SearchConfig::new(Strategy::BreadthFirst), &MisplacedTiles, &mut stats).unwrap();
/// assert_eq!(solution.moves(), vec![&Twist::FPrime]);
/// ```
pub fn solve<S: State, H: Heuristic<S>>(
    root: &S,
    config: &SearchConfig,
    heuristic: &H,
    stats: &mut SearchStats,
) -> Result<Solution<S>> {
    debug!("solving with {}", config.strategy);
    match config.strategy {
        Strategy::DepthFirst { bound } => depth_first(root, bound, &config.limits, stats),
        Strategy::BreadthFirst => breadth_first(root, &config.limits, stats),
        Strategy::BestFirst => best_first(root, heuristic, &config.limits, stats),
        Strategy::IterativeDeepening => iterative_deepening(root, &config.limits, stats),
        Strategy::Backtrack => backtrack(root, config.limits.depth_bound, stats),
    }
}
