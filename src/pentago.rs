//! Pentago: a two-player game on a 6x6 grid made of four 3x3 blocks.
//!
//! On each turn a player places a token in an empty cell and then rotates one
//! of the blocks a quarter turn clockwise (`R`) or counter-clockwise (`L`). The
//! first player with five tokens in a row, column or diagonal wins.
//!
//! Moves are written `b/n gD`: the token goes in position `n` (1..=9) of block
//! `b` (1..=4), then block `g` is rotated in direction `D`. Blocks 1 and 2 are
//! on top, 3 and 4 below; positions are numbered row-major within a block.
use std::fmt;
use std::str::FromStr;

use crate::adversarial::Adversarial;
use crate::error::{Result, SearchError};
use crate::heuristics::pentago_evaluation;
use crate::state::{Rule, State};
use crate::utils::parse_cells;

pub const BOARD_SIZE: usize = 6;
pub const GRID_SIZE: usize = 3;
pub const NUM_BLOCKS: usize = 4;

/// Length of the run needed to win.
const RUN: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    White,
    Black,
}

impl Token {
    pub fn opponent(self) -> Token {
        match self {
            Token::White => Token::Black,
            Token::Black => Token::White,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Token::White => 'w',
            Token::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Token> {
        match c.to_ascii_lowercase() {
            'w' => Some(Token::White),
            'b' => Some(Token::Black),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Token::White => "White",
            Token::Black => "Black",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for Token {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Token::White),
            "b" | "black" => Ok(Token::Black),
            _ => Err(SearchError::InvalidConfiguration(format!(
                "Unknown token {:?}, expected 'w' or 'b'",
                s
            ))),
        }
    }
}

/// Rotation direction of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `R`: a quarter turn clockwise.
    Clockwise,
    /// `L`: a quarter turn counter-clockwise.
    CounterClockwise,
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Direction::Clockwise => 'R',
            Direction::CounterClockwise => 'L',
        }
    }

    fn name(self) -> &'static str {
        match self {
            Direction::Clockwise => "Right",
            Direction::CounterClockwise => "Left",
        }
    }
}

/// Row and column offsets of a block's top-left cell.
fn block_origin(block: usize) -> (usize, usize) {
    ((block / 2) * GRID_SIZE, (block % 2) * GRID_SIZE)
}

type Grid<T> = [[T; BOARD_SIZE]; BOARD_SIZE];

fn rotate_block<T: Copy>(cells: &Grid<T>, block: usize, direction: Direction) -> Grid<T> {
    let (row_off, col_off) = block_origin(block);
    let mut next = *cells;
    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE {
            let (nr, nc) = match direction {
                Direction::Clockwise => (c, GRID_SIZE - 1 - r),
                Direction::CounterClockwise => (GRID_SIZE - 1 - c, r),
            };
            next[row_off + nr][col_off + nc] = cells[row_off + r][col_off + c];
        }
    }
    next
}

/// Draws a grid with a border around every block.
fn write_grid<T>(
    f: &mut fmt::Formatter<'_>,
    cells: &Grid<T>,
    show: impl Fn(&T) -> char,
) -> fmt::Result {
    let border = "+-------+-------+";
    writeln!(f, "{}", border)?;
    for (r, row) in cells.iter().enumerate() {
        for half in row.chunks(GRID_SIZE) {
            write!(f, "| ")?;
            for cell in half {
                write!(f, "{} ", show(cell))?;
            }
        }
        writeln!(f, "|")?;
        if r % GRID_SIZE == GRID_SIZE - 1 {
            write!(f, "{}", border)?;
            if r + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
    }
    Ok(())
}

/// The 6x6 grid. `None` is an empty cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PentagoBoard {
    cells: Grid<Option<Token>>,
}

impl PentagoBoard {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses 36 cells in row-major order over `w`, `b` and `.`.
    ///
    /// # Examples
    /// ```
    /// use puzzle_search::pentago::{PentagoBoard, Token};
    ///
    /// let board = PentagoBoard::from_config("w.b.bw.w.b.wb.w..wb....w...bw.bbb.ww").unwrap();
    /// assert_eq!(board.get(0, 0), Some(Token::White));
    /// assert_eq!(board.get(0, 1), None);
    /// assert_eq!(board.empty_count(), 17);
    /// ```
    pub fn from_config(config: &str) -> Result<Self> {
        let flat = parse_cells(config, BOARD_SIZE * BOARD_SIZE, |c| match c {
            '.' => Some(None),
            other => Token::from_char(other).map(Some),
        })?;
        let mut board = PentagoBoard::empty();
        for (idx, cell) in flat.into_iter().enumerate() {
            board.cells[idx / BOARD_SIZE][idx % BOARD_SIZE] = cell;
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Token> {
        self.cells[row][col]
    }

    /// Returns a copy with `token` written into (`row`, `col`).
    pub fn place(&self, row: usize, col: usize, token: Token) -> PentagoBoard {
        let mut next = *self;
        next.cells[row][col] = Some(token);
        next
    }

    /// Returns a copy with `block` (0..4) rotated a quarter turn.
    pub fn rotate(&self, block: usize, direction: Direction) -> PentagoBoard {
        PentagoBoard {
            cells: rotate_block(&self.cells, block, direction),
        }
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..BOARD_SIZE)
            .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.cells[r][c].is_none())
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    fn run_from(&self, token: Token, (r, c): (usize, usize), (dr, dc): (isize, isize)) -> bool {
        (0..RUN as isize).all(|k| {
            let rr = r as isize + k * dr;
            let cc = c as isize + k * dc;
            self.cells[rr as usize][cc as usize] == Some(token)
        })
    }

    /// Returns `true` if `token` has five in a row anywhere on the board.
    pub fn win(&self, token: Token) -> bool {
        let last_start = BOARD_SIZE - RUN;
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                if self.cells[r][c] != Some(token) {
                    continue;
                }
                if c <= last_start && self.run_from(token, (r, c), (0, 1)) {
                    return true;
                }
                if r <= last_start && self.run_from(token, (r, c), (1, 0)) {
                    return true;
                }
                if r <= last_start && c <= last_start && self.run_from(token, (r, c), (1, 1)) {
                    return true;
                }
                if r <= last_start && c >= RUN - 1 && self.run_from(token, (r, c), (1, -1)) {
                    return true;
                }
            }
        }
        false
    }

    /// The 36-character row-major form accepted by [`PentagoBoard::from_config`].
    pub fn to_config(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(|cell| cell.map_or('.', Token::to_char))
            .collect()
    }
}

impl fmt::Display for PentagoBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, &self.cells, |cell| cell.map_or('.', |t| t.to_char()))
    }
}

/// A board showing each cell's position number (1..=9 within its block).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Legend {
    cells: Grid<char>,
}

impl Legend {
    pub fn new() -> Self {
        let mut cells = [['.'; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                let position = (r % GRID_SIZE) * GRID_SIZE + c % GRID_SIZE + 1;
                *cell = (b'0' + position as u8) as char;
            }
        }
        Legend { cells }
    }

    pub fn rotate(&self, block: usize, direction: Direction) -> Legend {
        Legend {
            cells: rotate_block(&self.cells, block, direction),
        }
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, &self.cells, |c| *c)
    }
}

/// Rules of play, the move notation, and the position numbering with two
/// sample rotations.
pub fn instructions() -> String {
    let legend = Legend::new();
    format!(
        "Two players alternate turns, placing tokens on a 6x6 grid, each trying to\n\
         be the first to get five of their own tokens in a row, either\n\
         horizontally, vertically or diagonally. After placing a token, the player\n\
         rotates one of the four blocks clockwise (R) or counter-clockwise (L).\n\
         \n\
         Moves have the form \"b/n gD\": the token goes in position n of block b,\n\
         then block g is rotated in direction D. Blocks 1 and 2 are on top, 3 and 4\n\
         below, and positions are numbered like this:\n\
         \n{}\n\
         \nRotating block 1 Right:\n{}\n\
         \nRotating block 3 Left:\n{}\n",
        legend,
        legend.rotate(0, Direction::Clockwise),
        legend.rotate(2, Direction::CounterClockwise)
    )
}

/// Place a token at (`row`, `col`), then rotate `block`.
///
/// `block` is zero-based here; notation and explanations use 1-based numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PentagoMove {
    pub row: usize,
    pub col: usize,
    pub block: usize,
    pub direction: Direction,
}

impl PentagoMove {
    pub fn new(row: usize, col: usize, block: usize, direction: Direction) -> Self {
        PentagoMove {
            row,
            col,
            block,
            direction,
        }
    }

    /// Human-readable description, e.g.
    /// `Placing w in cell [0][4], and rotating Block 4 Right`.
    pub fn explain(&self, token: Token) -> String {
        format!(
            "Placing {} in cell [{}][{}], and rotating Block {} {}",
            token,
            self.row,
            self.col,
            self.block + 1,
            self.direction.name()
        )
    }
}

impl fmt::Display for PentagoMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = (self.row / GRID_SIZE) * 2 + self.col / GRID_SIZE + 1;
        let position = (self.row % GRID_SIZE) * GRID_SIZE + self.col % GRID_SIZE + 1;
        write!(
            f,
            "{}/{} {}{}",
            target,
            position,
            self.block + 1,
            self.direction.to_char()
        )
    }
}

fn digit_in(c: char, max: u32) -> Option<usize> {
    c.to_digit(10)
        .filter(|&d| (1..=max).contains(&d))
        .map(|d| d as usize - 1)
}

impl FromStr for PentagoMove {
    type Err = SearchError;

    /// Parses `b/n gD`, for example `1/5 2R`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            SearchError::InvalidConfiguration(format!(
                "Invalid move {:?}, expected block/position block-to-rotate direction (e.g. 1/5 2R)",
                s
            ))
        };
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        let &[b, slash, n, g, d] = chars.as_slice() else {
            return Err(invalid());
        };
        if slash != '/' {
            return Err(invalid());
        }
        let target = digit_in(b, NUM_BLOCKS as u32).ok_or_else(invalid)?;
        let position = digit_in(n, (GRID_SIZE * GRID_SIZE) as u32).ok_or_else(invalid)?;
        let block = digit_in(g, NUM_BLOCKS as u32).ok_or_else(invalid)?;
        let direction = match d.to_ascii_uppercase() {
            'R' => Direction::Clockwise,
            'L' => Direction::CounterClockwise,
            _ => return Err(invalid()),
        };

        let (row_off, col_off) = block_origin(target);
        Ok(PentagoMove::new(
            row_off + position / GRID_SIZE,
            col_off + position % GRID_SIZE,
            block,
            direction,
        ))
    }
}

/// A board together with the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PentagoState {
    board: PentagoBoard,
    to_move: Token,
}

impl PentagoState {
    pub fn new(board: PentagoBoard, to_move: Token) -> Self {
        PentagoState { board, to_move }
    }

    pub fn from_config(config: &str, to_move: Token) -> Result<Self> {
        Ok(PentagoState::new(PentagoBoard::from_config(config)?, to_move))
    }

    pub fn board(&self) -> &PentagoBoard {
        &self.board
    }

    pub fn to_move(&self) -> Token {
        self.to_move
    }
}

impl Default for PentagoState {
    fn default() -> Self {
        PentagoState::new(PentagoBoard::empty(), Token::White)
    }
}

impl fmt::Display for PentagoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{} to move", self.board, self.to_move.name())
    }
}

impl Rule<PentagoState> for PentagoMove {
    fn precondition(&self, state: &PentagoState) -> bool {
        self.row < BOARD_SIZE
            && self.col < BOARD_SIZE
            && self.block < NUM_BLOCKS
            && state.board.get(self.row, self.col).is_none()
    }

    fn transform(&self, state: &PentagoState) -> PentagoState {
        let board = state
            .board
            .place(self.row, self.col, state.to_move)
            .rotate(self.block, self.direction);
        PentagoState::new(board, state.to_move.opponent())
    }

    /// The placed cell, the rotated block and the side-to-move marker.
    fn writes(&self, _state: &PentagoState) -> Vec<usize> {
        let (row_off, col_off) = block_origin(self.block);
        let mut indices: Vec<usize> = (0..GRID_SIZE * GRID_SIZE)
            .map(|k| (row_off + k / GRID_SIZE) * BOARD_SIZE + col_off + k % GRID_SIZE)
            .collect();
        indices.push(self.row * BOARD_SIZE + self.col);
        indices.push(BOARD_SIZE * BOARD_SIZE);
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

impl State for PentagoState {
    type Rule = PentagoMove;

    fn legal_rules(&self) -> Vec<PentagoMove> {
        let mut moves = Vec::new();
        for (row, col) in self.board.empty_cells() {
            for block in 0..NUM_BLOCKS {
                moves.push(PentagoMove::new(row, col, block, Direction::CounterClockwise));
                moves.push(PentagoMove::new(row, col, block, Direction::Clockwise));
            }
        }
        moves
    }

    fn is_goal(&self) -> bool {
        self.board.win(Token::White) || self.board.win(Token::Black)
    }

    /// 36 board cells followed by the side to move.
    fn fingerprint(&self) -> String {
        let mut fp = self.board.to_config();
        fp.push(self.to_move.to_char());
        fp
    }
}

impl Adversarial for PentagoState {
    type Player = Token;

    fn to_move(&self) -> Token {
        self.to_move
    }

    fn opponent(player: Token) -> Token {
        player.opponent()
    }

    fn has_won(&self, player: Token) -> bool {
        self.board.win(player)
    }

    fn evaluate(&self, player: Token) -> i64 {
        pentago_evaluation(&self.board, player)
    }
}
