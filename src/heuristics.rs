use crate::cube::Cube;
use crate::pegboard::PegBoard;
use crate::pentago::{PentagoBoard, Token, BOARD_SIZE};

/// Scores a state for best-first search. Lower scores are expanded first.
///
/// Any `Fn(&S, u32) -> i64` closure is a heuristic, so one-off orderings do not
/// need their own type.
///
/// # Examples
/// ```
/// use puzzle_search::cube::Cube;
/// use puzzle_search::heuristics::Heuristic;
///
/// let zero = |_: &Cube, _depth: u32| 0i64;
/// assert_eq!(zero.score(&Cube::solved(), 3), 0);
/// ```
pub trait Heuristic<S> {
    /// # Arguments
    /// * `state`: The state being scored.
    /// * `depth`: Number of rules applied from the root to reach `state`.
    fn score(&self, state: &S, depth: u32) -> i64;
}

impl<S, F> Heuristic<S> for F
where
    F: Fn(&S, u32) -> i64,
{
    fn score(&self, state: &S, depth: u32) -> i64 {
        self(state, depth)
    }
}

/// Cube ordering: tiles that differ from the solved cube, plus the depth.
///
/// This is a priority key and not an admissible estimate; one twist moves
/// eight tiles, so the tile count overstates the remaining distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct MisplacedTiles;

impl Heuristic<Cube> for MisplacedTiles {
    fn score(&self, state: &Cube, depth: u32) -> i64 {
        state.mismatches(&Cube::solved()) as i64 + i64::from(depth)
    }
}

/// Peg ordering: boards with fewer pegs left are closer to the goal.
#[derive(Clone, Copy, Debug, Default)]
pub struct PegsRemaining;

impl Heuristic<PegBoard> for PegsRemaining {
    fn score(&self, state: &PegBoard, _depth: u32) -> i64 {
        i64::from(state.peg_count())
    }
}

/// Centres of the four 3x3 blocks.
const BLOCK_CENTRES: [(usize, usize); 4] = [(1, 1), (1, 4), (4, 1), (4, 4)];

/// Adds the streak score of one line of cells.
///
/// Each pair of adjacent `token` cells extends the streak and adds its new
/// length, so a run of k tokens is worth 1 + 2 + ... + (k - 1).
fn line_score(cells: impl Iterator<Item = Option<Token>>, token: Token) -> i64 {
    let mut total = 0;
    let mut streak = 0;
    let mut prev: Option<Option<Token>> = None;
    for cell in cells {
        if prev == Some(Some(token)) && cell == Some(token) {
            streak += 1;
            total += streak;
        } else {
            streak = 0;
        }
        prev = Some(cell);
    }
    total
}

/// Static value of `board` for `token`, ignoring the opponent.
///
/// Rows, columns and the two long diagonals are scored with [`line_score`],
/// and each block centre held by `token` adds one. This never looks ahead.
///
/// # Arguments
/// * `board`: The board to score.
/// * `token`: The side whose tokens are counted.
///
/// # Returns
/// A non-negative score; higher is better for `token`.
pub fn pentago_token_score(board: &PentagoBoard, token: Token) -> i64 {
    let mut total = 0;

    for r in 0..BOARD_SIZE {
        total += line_score((0..BOARD_SIZE).map(|c| board.get(r, c)), token);
    }
    for c in 0..BOARD_SIZE {
        total += line_score((0..BOARD_SIZE).map(|r| board.get(r, c)), token);
    }
    total += line_score((0..BOARD_SIZE).map(|i| board.get(i, i)), token);
    total += line_score(
        (0..BOARD_SIZE).map(|i| board.get(i, BOARD_SIZE - 1 - i)),
        token,
    );

    total
        + BLOCK_CENTRES
            .iter()
            .filter(|&&(r, c)| board.get(r, c) == Some(token))
            .count() as i64
}

/// Evaluation of `board` from `token`'s side: its own score minus the
/// opponent's.
pub fn pentago_evaluation(board: &PentagoBoard, token: Token) -> i64 {
    pentago_token_score(board, token) - pentago_token_score(board, token.opponent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Twist;
    use crate::state::State;

    #[test]
    fn test_misplaced_tiles() {
        let solved = Cube::solved();
        assert_eq!(MisplacedTiles.score(&solved, 0), 0);
        assert_eq!(MisplacedTiles.score(&solved, 4), 4);

        let twisted = solved.apply(&Twist::U).unwrap();
        assert_eq!(
            MisplacedTiles.score(&twisted, 1),
            twisted.mismatches(&solved) as i64 + 1
        );
        assert_eq!(twisted.mismatches(&solved), 8);
    }

    #[test]
    fn test_pegs_remaining() {
        let board = PegBoard::with_hole(4, 4, 9).unwrap();
        assert_eq!(PegsRemaining.score(&board, 0), 15);
        assert_eq!(PegsRemaining.score(&board, 10), 15);
    }

    #[test]
    fn test_closure_heuristic() {
        let by_depth = |_: &PegBoard, depth: u32| -i64::from(depth);
        let board = PegBoard::with_hole(4, 4, 9).unwrap();
        assert_eq!(by_depth.score(&board, 5), -5);
    }

    #[test]
    fn test_token_score_empty_board() {
        let board = PentagoBoard::empty();
        assert_eq!(pentago_token_score(&board, Token::White), 0);
        assert_eq!(pentago_evaluation(&board, Token::Black), 0);
    }

    #[test]
    fn test_token_score_runs() {
        // Three in a row on the bottom edge: pairs score 1 + 2.
        let board = PentagoBoard::from_config(
            "......\
             ......\
             ......\
             ......\
             ......\
             www...",
        )
        .unwrap();
        // The anti-diagonal passes through (5,0) but has no pairs.
        assert_eq!(pentago_token_score(&board, Token::White), 3);
        assert_eq!(pentago_token_score(&board, Token::Black), 0);
    }

    #[test]
    fn test_token_score_streak_resets_between_lines() {
        // Row 0 ends with a pair and row 1 starts with one; each scores 1,
        // and (1,1) is a block centre.
        let board = PentagoBoard::from_config(
            "....bb\
             bb....\
             ......\
             ......\
             ......\
             ......",
        )
        .unwrap();
        assert_eq!(pentago_token_score(&board, Token::Black), 3);
    }

    #[test]
    fn test_token_score_centres_and_diagonal() {
        // (1,1) and (4,4) are block centres and lie on the main diagonal
        // with (2,2) and (3,3): diagonal run of 4 scores 1 + 2 + 3.
        let board = PentagoBoard::from_config(
            "......\
             .w....\
             ..w...\
             ...w..\
             ....w.\
             ......",
        )
        .unwrap();
        assert_eq!(pentago_token_score(&board, Token::White), 6 + 2);
    }

    #[test]
    fn test_evaluation_is_antisymmetric() {
        let board = PentagoBoard::from_config("w.b.bw.w.b.wb.w..wb....w...bw.bbb.ww").unwrap();
        assert_eq!(
            pentago_evaluation(&board, Token::White),
            -pentago_evaluation(&board, Token::Black)
        );
    }
}
