//! Search configuration: which driver to run and how far it may go.
//!
//! Every option type here implements `FromStr`, so the binaries hand them to
//! `clap` directly.
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SearchError};

/// Depth bound used when none is configured.
pub const DEFAULT_DEPTH_BOUND: u32 = 20;

/// The search driver to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Depth-first with a fixed depth bound (method `n`).
    DepthFirst { bound: u32 },
    /// Breadth-first (method `b`, `breadth`).
    BreadthFirst,
    /// Best-first on a heuristic (method `a`, `best`).
    BestFirst,
    /// Depth-first with bounds 0, 1, ... up to the configured bound (method
    /// `d`, `depth`).
    IterativeDeepening,
    /// Recursive backtracking over an explicit path (method `i`,
    /// `idbacktrack`).
    Backtrack,
}

impl Strategy {
    /// Every named strategy, with `DepthFirst` bounded at `bound`.
    pub fn all(bound: u32) -> [Strategy; 5] {
        [
            Strategy::DepthFirst { bound },
            Strategy::BreadthFirst,
            Strategy::BestFirst,
            Strategy::IterativeDeepening,
            Strategy::Backtrack,
        ]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::DepthFirst { bound } => write!(f, "depth-first (bound {})", bound),
            Strategy::BreadthFirst => write!(f, "breadth-first"),
            Strategy::BestFirst => write!(f, "best-first"),
            Strategy::IterativeDeepening => write!(f, "iterative deepening"),
            Strategy::Backtrack => write!(f, "backtrack"),
        }
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    /// # Examples
    /// ```
    /// use puzzle_search::config::Strategy;
    ///
    /// assert_eq!("b".parse::<Strategy>().unwrap(), Strategy::BreadthFirst);
    /// assert_eq!("7".parse::<Strategy>().unwrap(), Strategy::DepthFirst { bound: 7 });
    /// assert!("other".parse::<Strategy>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "breadth" => Ok(Strategy::BreadthFirst),
            "d" | "depth" => Ok(Strategy::IterativeDeepening),
            "a" | "best" => Ok(Strategy::BestFirst),
            "i" | "idbacktrack" => Ok(Strategy::Backtrack),
            other => other
                .parse::<u32>()
                .map(|bound| Strategy::DepthFirst { bound })
                .map_err(|_| {
                    SearchError::InvalidConfiguration(format!(
                        "Unknown method {:?}; use b, d, a, i or a depth bound",
                        s
                    ))
                }),
        }
    }
}

/// Budgets for a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    /// Longest path considered by iterative deepening and backtracking.
    pub depth_bound: u32,
    /// Stop after expanding this many states.
    pub max_expansions: Option<u64>,
    /// Stop when the arena holds this many states.
    pub max_states: Option<usize>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            depth_bound: DEFAULT_DEPTH_BOUND,
            max_expansions: None,
            max_states: None,
        }
    }
}

impl SearchLimits {
    pub fn with_depth_bound(depth_bound: u32) -> Self {
        SearchLimits {
            depth_bound,
            ..Self::default()
        }
    }

    /// Returns `LimitExceeded` if `expanded` has passed `max_expansions`.
    pub(crate) fn check_expansions(&self, expanded: u64) -> Result<()> {
        match self.max_expansions {
            Some(limit) if expanded > limit => Err(SearchError::LimitExceeded {
                metric: "expansions",
                limit,
                observed: expanded,
            }),
            _ => Ok(()),
        }
    }

    /// Returns `LimitExceeded` if `states` has passed `max_states`.
    pub(crate) fn check_states(&self, states: usize) -> Result<()> {
        match self.max_states {
            Some(limit) if states > limit => Err(SearchError::LimitExceeded {
                metric: "states",
                limit: limit as u64,
                observed: states as u64,
            }),
            _ => Ok(()),
        }
    }
}

/// Strategy plus limits: everything a frontier or backtracking run needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub limits: SearchLimits,
}

impl SearchConfig {
    pub fn new(strategy: Strategy) -> Self {
        SearchConfig {
            strategy,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::new(Strategy::IterativeDeepening)
    }
}

/// Configuration for the adversarial driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimaxConfig {
    /// Plies to look ahead.
    pub max_depth: u32,
    /// Enables alpha-beta cutoffs.
    pub pruning: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig {
            max_depth: 2,
            pruning: true,
        }
    }
}

/// Where the initial state comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitialConfig {
    /// A configuration string in the puzzle's own alphabet.
    Literal(String),
    /// A random walk of this many rules from the goal.
    Scramble(usize),
}

impl FromStr for InitialConfig {
    type Err = SearchError;

    /// A bare integer is a scramble depth; anything else is a configuration.
    ///
    /// # Examples
    /// ```
    /// use puzzle_search::config::InitialConfig;
    ///
    /// assert_eq!("3".parse::<InitialConfig>().unwrap(), InitialConfig::Scramble(3));
    /// assert_eq!(
    ///     "WOWO BBBB RWRW YRYR GGGG YOYO".parse::<InitialConfig>().unwrap(),
    ///     InitialConfig::Literal("WOWO BBBB RWRW YRYR GGGG YOYO".to_string())
    /// );
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidConfiguration(
                "Empty initial configuration".to_string(),
            ));
        }
        Ok(match trimmed.parse::<usize>() {
            Ok(steps) => InitialConfig::Scramble(steps),
            Err(_) => InitialConfig::Literal(trimmed.to_string()),
        })
    }
}

/// Who chooses a player's moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Computer,
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKind::Human => write!(f, "human"),
            PlayerKind::Computer => write!(f, "computer"),
        }
    }
}

impl FromStr for PlayerKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "human" => Ok(PlayerKind::Human),
            "c" | "computer" => Ok(PlayerKind::Computer),
            _ => Err(SearchError::InvalidConfiguration(format!(
                "{:?} is not a valid player type; use human or computer",
                s
            ))),
        }
    }
}
