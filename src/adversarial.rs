//! Minimax search for two-player games, with optional alpha-beta pruning.
use std::fmt;

use log::debug;

use crate::config::MinimaxConfig;
use crate::state::{Rule, State};

/// Value of a win found at the root. Wins found deeper score `WIN_SCORE - depth`
/// so that quicker wins are preferred.
pub const WIN_SCORE: i64 = 10_000;

/// A game state where two players alternate.
pub trait Adversarial: State {
    type Player: Copy + Eq + fmt::Debug;

    /// The player whose turn it is.
    fn to_move(&self) -> Self::Player;

    fn opponent(player: Self::Player) -> Self::Player;

    fn has_won(&self, player: Self::Player) -> bool;

    /// Static evaluation from `player`'s side. Must not look ahead.
    fn evaluate(&self, player: Self::Player) -> i64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinimaxStats {
    /// Positions visited, including the root.
    pub nodes: u64,
    /// Positions scored without further lookahead.
    pub leaves: u64,
    /// Alpha-beta cutoffs taken.
    pub cutoffs: u64,
}

/// The outcome of [`choose_move`].
#[derive(Clone, Debug)]
pub struct MinimaxResult<S: Adversarial> {
    /// `None` when the game is already over or no move is legal.
    pub best_move: Option<S::Rule>,
    /// Backed-up value of `best_move` for the side to move at the root.
    pub value: i64,
    pub stats: MinimaxStats,
}

struct Minimax<'c, S: Adversarial> {
    me: S::Player,
    them: S::Player,
    config: &'c MinimaxConfig,
    stats: MinimaxStats,
}

impl<'c, S: Adversarial> Minimax<'c, S> {
    /// Win/loss value of a finished game, or `None` if nobody has won.
    fn outcome(&self, state: &S, depth: u32) -> Option<i64> {
        let win = WIN_SCORE - i64::from(depth);
        match (state.has_won(self.me), state.has_won(self.them)) {
            (true, true) => Some(0),
            (true, false) => Some(win),
            (false, true) => Some(-win),
            (false, false) => None,
        }
    }

    /// The value of `state` if the search stops there, plus its rules when
    /// it does not.
    fn leaf_or_rules(&mut self, state: &S, depth: u32) -> Result<Vec<S::Rule>, i64> {
        self.stats.nodes += 1;
        if let Some(value) = self.outcome(state, depth) {
            self.stats.leaves += 1;
            return Err(value);
        }
        if depth >= self.config.max_depth {
            self.stats.leaves += 1;
            return Err(state.evaluate(self.me));
        }
        let rules = state.legal_rules();
        if rules.is_empty() {
            self.stats.leaves += 1;
            return Err(state.evaluate(self.me));
        }
        Ok(rules)
    }

    fn max_value(&mut self, state: &S, depth: u32, mut alpha: i64, beta: i64) -> i64 {
        let rules = match self.leaf_or_rules(state, depth) {
            Ok(rules) => rules,
            Err(value) => return value,
        };
        let mut value = i64::MIN;
        for rule in rules {
            let child = rule.transform(state);
            value = value.max(self.min_value(&child, depth + 1, alpha, beta));
            if self.config.pruning {
                if value >= beta {
                    self.stats.cutoffs += 1;
                    return value;
                }
                alpha = alpha.max(value);
            }
        }
        value
    }

    fn min_value(&mut self, state: &S, depth: u32, alpha: i64, mut beta: i64) -> i64 {
        let rules = match self.leaf_or_rules(state, depth) {
            Ok(rules) => rules,
            Err(value) => return value,
        };
        let mut value = i64::MAX;
        for rule in rules {
            let child = rule.transform(state);
            value = value.min(self.max_value(&child, depth + 1, alpha, beta));
            if self.config.pruning {
                if value <= alpha {
                    self.stats.cutoffs += 1;
                    return value;
                }
                beta = beta.min(value);
            }
        }
        value
    }
}

/// Picks a move for the side to move in `root`, looking `config.max_depth`
/// plies ahead (at least one).
///
/// Among moves of equal value the first in [`State::legal_rules`] order is
/// chosen, with or without pruning. This never fails: a finished game or a
/// position with no legal move yields `best_move: None` and the position's
/// own value.
///
/// # Examples
/// ```
/// use puzzle_search::adversarial::{choose_move, WIN_SCORE};
/// use puzzle_search::config::MinimaxConfig;
/// use puzzle_search::pentago::{PentagoState, Token};
///
/// let state = PentagoState::from_config(&format!("wwww..{}", ".".repeat(30)), Token::White).unwrap();
/// let config = MinimaxConfig { max_depth: 1, pruning: true };
/// let result = choose_move(&state, &config);
/// assert_eq!(result.value, WIN_SCORE - 1);
/// assert_eq!(result.best_move.unwrap().to_string(), "2/2 3L");
/// ```
pub fn choose_move<S: Adversarial>(root: &S, config: &MinimaxConfig) -> MinimaxResult<S> {
    let me = root.to_move();
    let config = MinimaxConfig {
        max_depth: config.max_depth.max(1),
        ..*config
    };
    let mut search = Minimax::<S> {
        me,
        them: S::opponent(me),
        config: &config,
        stats: MinimaxStats::default(),
    };

    let rules = match search.leaf_or_rules(root, 0) {
        Ok(rules) => rules,
        Err(value) => {
            debug!("no move to choose; position value {}", value);
            return MinimaxResult {
                best_move: None,
                value,
                stats: search.stats,
            };
        }
    };

    let mut best_move = None;
    let mut best_value = i64::MIN;
    let mut alpha = i64::MIN;
    for rule in rules {
        let child = rule.transform(root);
        let value = search.min_value(&child, 1, alpha, i64::MAX);
        if value > best_value {
            best_value = value;
            best_move = Some(rule);
        }
        if config.pruning {
            alpha = alpha.max(best_value);
        }
    }

    debug!(
        "minimax chose {:?} with value {} ({} nodes, {} cutoffs)",
        best_move.as_ref().map(|m: &S::Rule| m.to_string()),
        best_value,
        search.stats.nodes,
        search.stats.cutoffs
    );
    MinimaxResult {
        best_move,
        value: best_value,
        stats: search.stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pentago::{Direction, PentagoMove, PentagoState, Token};

    const MIDGAME: &str = "w.b.bw.w.b.wb.w..wb....w...bw.bbb.ww";

    fn both(
        state: &PentagoState,
        max_depth: u32,
    ) -> (MinimaxResult<PentagoState>, MinimaxResult<PentagoState>) {
        let pruned = choose_move(state, &MinimaxConfig { max_depth, pruning: true });
        let full = choose_move(state, &MinimaxConfig { max_depth, pruning: false });
        (pruned, full)
    }

    #[test]
    fn test_takes_immediate_win() {
        let state =
            PentagoState::from_config(&format!("wwww..{}", ".".repeat(30)), Token::White).unwrap();
        let result = choose_move(&state, &MinimaxConfig { max_depth: 2, pruning: true });
        assert_eq!(result.value, WIN_SCORE - 1);
        assert_eq!(
            result.best_move,
            Some(PentagoMove::new(0, 4, 2, Direction::CounterClockwise))
        );
    }

    #[test]
    fn test_pruning_agrees_with_full_search() {
        for to_move in [Token::White, Token::Black] {
            let state = PentagoState::from_config(MIDGAME, to_move).unwrap();
            let (pruned, full) = both(&state, 2);
            assert_eq!(pruned.value, full.value);
            assert_eq!(pruned.best_move, full.best_move);
            assert!(pruned.stats.nodes < full.stats.nodes);
            assert!(pruned.stats.cutoffs > 0);
            assert_eq!(full.stats.cutoffs, 0);
        }
    }

    #[test]
    fn test_pruning_agrees_three_plies() {
        // Five empty cells keep the full three-ply tree small.
        let state = PentagoState::from_config(
            "bbbwww\
             wb..bb\
             .wwwbb\
             wbbbbw\
             b.wwbw\
             wwww.b",
            Token::Black,
        )
        .unwrap();
        let (pruned, full) = both(&state, 3);
        assert_eq!(pruned.value, full.value);
        assert_eq!(pruned.best_move, full.best_move);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let state = PentagoState::from_config(&"wwbbwwbbwwbb".repeat(3), Token::White).unwrap();
        let result = choose_move(&state, &MinimaxConfig::default());
        assert!(result.best_move.is_none());
        assert_eq!(result.stats.nodes, 1);
        assert_eq!(result.stats.leaves, 1);
    }

    #[test]
    fn test_finished_games() {
        let both_won = PentagoState::from_config(
            &format!("wwwww.bbbbb.{}", ".".repeat(24)),
            Token::White,
        )
        .unwrap();
        let result = choose_move(&both_won, &MinimaxConfig::default());
        assert!(result.best_move.is_none());
        assert_eq!(result.value, 0);

        let lost = PentagoState::from_config(
            &format!("bbbbb.{}", ".".repeat(30)),
            Token::White,
        )
        .unwrap();
        let result = choose_move(&lost, &MinimaxConfig::default());
        assert!(result.best_move.is_none());
        assert_eq!(result.value, -WIN_SCORE);
    }

    #[test]
    fn test_blocks_opponent_four() {
        // Black threatens (0,4); White must take it or rotate the run apart.
        let state = PentagoState::from_config(
            &format!("bbbb..{}ww....{}", ".".repeat(6), ".".repeat(18)),
            Token::White,
        )
        .unwrap();
        let result = choose_move(&state, &MinimaxConfig { max_depth: 2, pruning: true });
        let mv = result.best_move.unwrap();
        let after = mv.transform(&state);
        // Whatever White does, Black must not have an immediate win.
        for reply in after.legal_rules() {
            let next = reply.transform(&after);
            assert!(!next.board().win(Token::Black), "{} then {} loses", mv, reply);
        }
    }
}
