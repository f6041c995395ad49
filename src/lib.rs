//! # Puzzle Search Library
//!
//! This library provides a generic state-space search engine and three puzzles
//! to run it on: the 2x2x2 pocket cube, peg solitaire on a rectangular board,
//! and the two-player game Pentago.
//!
//! Puzzles plug in through the [`state::State`] and [`state::Rule`] traits.
//! The drivers never look inside a configuration; they only ask a state for
//! its legal rules, apply them, test for the goal and compare fingerprints.
//!
//! It is used by four binaries:
//! - `cube_solver`: Solves a given or randomly scrambled cube with a chosen
//!   strategy.
//! - `peg_solver`: Solves a peg board by backtracking or any other strategy,
//!   or flails randomly until no jump is left.
//! - `pentago`: Plays Pentago between any mix of human and computer players.
//! - `strategy_evaluator`: Runs every strategy over a batch of seeded
//!   scrambles and reports averages.
//!
//! ## Modules
//! - `state`: The `State` and `Rule` traits every driver operates on.
//! - `cube`, `pegboard`, `pentago`: The three puzzle domains.
//! - `solver`: Frontier drivers (depth-first, breadth-first, best-first,
//!   iterative deepening) and the `solve` dispatcher.
//! - `backtrack`: Recursive backtracking with per-kind failure counts.
//! - `adversarial`: Minimax with optional alpha-beta pruning.
//! - `heuristics`: Scoring functions for best-first search and minimax leaves.
//! - `config`: Strategy, limits and player options, all parseable from strings.
//! - `stats`: Counters filled in by the drivers.
//! - `error`: The `SearchError` type.
//! - `utils`: Configuration parsing and random walks.

pub mod adversarial;
pub mod backtrack;
pub mod config;
pub mod cube;
pub mod error;
pub mod heuristics;
pub mod pegboard;
pub mod pentago;
pub mod solver;
pub mod state;
pub mod stats;
pub mod utils;

pub use error::{Result, SearchError};
