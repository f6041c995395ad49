//! Peg solitaire on a rectangular board.
//!
//! The board is stored as an integer whose binary representation has a 1 for
//! each peg. Slots are numbered from the bottom-right corner, so on a 4x4 board
//!
//! ```text
//! 15 14 13 12
//! 11 10  9  8
//!  7  6  5  4
//!  3  2  1  0
//! ```
//!
//! and the number `1011 0010 1011 1111` represents
//!
//! ```text
//! X . X X
//! . . X .
//! X . X X
//! X X X X
//! ```
//!
//! A move is a [`Jump`]: a peg (jumper) hops over an adjacent peg (goner), in
//! any of the eight directions, into the empty slot beyond it (newpos). The
//! goner is removed.
use std::fmt;

use crate::error::{Result, SearchError};
use crate::state::{Rule, State};
use crate::utils::parse_cells;

/// Largest supported board, in slots.
pub const MAX_SLOTS: usize = 64;

/// Goal slot used when none is given: the single remaining peg must land here.
pub const DEFAULT_GOAL_SLOT: usize = 9;

// Scan order for jump directions: up-left, up, up-right, left, right,
// down-left, down, down-right.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A single peg jump, identified by slot numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Jump {
    /// Slot of the peg that jumps.
    pub jumper: usize,
    /// Slot of the peg that is jumped over and removed.
    pub goner: usize,
    /// Slot where the jumper lands.
    pub newpos: usize,
}

impl Jump {
    pub fn new(jumper: usize, goner: usize, newpos: usize) -> Self {
        Jump {
            jumper,
            goner,
            newpos,
        }
    }

    /// The jump as a `[jumper, goner, newpos]` vector.
    pub fn as_array(&self) -> [usize; 3] {
        [self.jumper, self.goner, self.newpos]
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The peg in slot {} jumps over the peg in slot {} and lands in slot {}",
            self.jumper, self.goner, self.newpos
        )
    }
}

impl Rule<PegBoard> for Jump {
    /// Jumper and goner slots hold pegs, and the landing slot is empty.
    fn precondition(&self, state: &PegBoard) -> bool {
        let n = state.slot_count();
        self.jumper < n
            && self.goner < n
            && self.newpos < n
            && state.has_peg(self.jumper)
            && state.has_peg(self.goner)
            && !state.has_peg(self.newpos)
    }

    fn transform(&self, state: &PegBoard) -> PegBoard {
        let pegs = (state.pegs & !(1u64 << self.jumper) & !(1u64 << self.goner))
            | (1u64 << self.newpos);
        PegBoard { pegs, ..*state }
    }

    fn writes(&self, state: &PegBoard) -> Vec<usize> {
        self.as_array()
            .iter()
            .map(|&slot| state.fingerprint_index(slot))
            .collect()
    }
}

/// A peg board configuration together with its goal slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PegBoard {
    rows: usize,
    cols: usize,
    pegs: u64,
    goal_slot: usize,
}

fn full_mask(slots: usize) -> u64 {
    if slots >= MAX_SLOTS {
        u64::MAX
    } else {
        (1u64 << slots) - 1
    }
}

impl PegBoard {
    /// Creates a board from its numeric encoding.
    ///
    /// # Errors
    /// Returns `SearchError::InvalidConfiguration` if the board is empty or
    /// larger than 64 slots, if `pegs` has bits beyond the last slot, or if
    /// `goal_slot` is off the board.
    pub fn new(rows: usize, cols: usize, pegs: u64, goal_slot: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SearchError::InvalidConfiguration(format!(
                "Board must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        let slots = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if slots > MAX_SLOTS {
            return Err(SearchError::InvalidConfiguration(format!(
                "Board {}x{} has {} slots, at most {} are supported",
                rows, cols, slots, MAX_SLOTS
            )));
        }
        if pegs & !full_mask(slots) != 0 {
            return Err(SearchError::InvalidConfiguration(format!(
                "Peg encoding {} does not fit a {}x{} board",
                pegs, rows, cols
            )));
        }
        if goal_slot >= slots {
            return Err(SearchError::InvalidConfiguration(format!(
                "Goal slot {} is off a {}-slot board",
                goal_slot, slots
            )));
        }
        Ok(PegBoard {
            rows,
            cols,
            pegs,
            goal_slot,
        })
    }

    /// A board with every slot filled except `hole`, whose goal is to finish
    /// with one peg in `hole`.
    ///
    /// # Examples
    /// ```
    /// use puzzle_search::pegboard::PegBoard;
    ///
    /// let board = PegBoard::with_hole(4, 4, 9).unwrap();
    /// assert_eq!(board.pegs(), 65535 - 512);
    /// assert_eq!(board.peg_count(), 15);
    /// ```
    pub fn with_hole(rows: usize, cols: usize, hole: usize) -> Result<Self> {
        let full = PegBoard::new(rows, cols, 0, hole)?;
        let pegs = full_mask(full.slot_count()) & !(1u64 << hole);
        PegBoard::new(rows, cols, pegs, hole)
    }

    /// Parses a board from `rows * cols` characters in row-major order: `X`
    /// (or `x`) for a peg and `.` for an empty slot. Whitespace is ignored.
    pub fn from_config(rows: usize, cols: usize, config: &str, goal_slot: usize) -> Result<Self> {
        let empty = PegBoard::new(rows, cols, 0, goal_slot)?;
        let cells = parse_cells(config, empty.slot_count(), |c| match c {
            'X' | 'x' => Some(true),
            '.' => Some(false),
            _ => None,
        })?;

        let mut pegs = 0u64;
        for (idx, &peg) in cells.iter().enumerate() {
            if peg {
                pegs |= 1u64 << (empty.slot_count() - 1 - idx);
            }
        }
        PegBoard::new(rows, cols, pegs, goal_slot)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn slot_count(&self) -> usize {
        self.rows * self.cols
    }

    /// The numeric encoding: bit `i` is set when slot `i` holds a peg.
    pub fn pegs(&self) -> u64 {
        self.pegs
    }

    pub fn goal_slot(&self) -> usize {
        self.goal_slot
    }

    /// Slot number of the cell at row `r`, column `c`.
    pub fn slot(&self, r: usize, c: usize) -> usize {
        self.slot_count() - 1 - (r * self.cols + c)
    }

    /// Row and column of `slot`.
    pub fn position(&self, slot: usize) -> (usize, usize) {
        let idx = self.fingerprint_index(slot);
        (idx / self.cols, idx % self.cols)
    }

    fn fingerprint_index(&self, slot: usize) -> usize {
        self.slot_count() - 1 - slot
    }

    pub fn has_peg(&self, slot: usize) -> bool {
        slot < MAX_SLOTS && self.pegs & (1u64 << slot) != 0
    }

    pub fn peg_count(&self) -> u32 {
        self.pegs.count_ones()
    }

    /// The geometric jump starting at (`r`, `c`) in direction `(dr, dc)`, if
    /// its landing cell is on the board. Pegs are not checked.
    fn jump_from(&self, r: usize, c: usize, (dr, dc): (isize, isize)) -> Option<Jump> {
        let land_r = r as isize + 2 * dr;
        let land_c = c as isize + 2 * dc;
        if land_r < 0 || land_c < 0 || land_r >= self.rows as isize || land_c >= self.cols as isize
        {
            return None;
        }
        let over_r = (r as isize + dr) as usize;
        let over_c = (c as isize + dc) as usize;
        Some(Jump::new(
            self.slot(r, c),
            self.slot(over_r, over_c),
            self.slot(land_r as usize, land_c as usize),
        ))
    }

    /// Every jump that fits on the board, regardless of where pegs are, in
    /// the same order [`State::legal_rules`] uses.
    pub fn all_jumps(&self) -> Vec<Jump> {
        let mut jumps = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                jumps.extend(DIRECTIONS.iter().filter_map(|&dir| self.jump_from(r, c, dir)));
            }
        }
        jumps
    }
}

impl fmt::Display for PegBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row: Vec<&str> = (0..self.cols)
                .map(|c| if self.has_peg(self.slot(r, c)) { "X" } else { "." })
                .collect();
            write!(f, "{}", row.join(" "))?;
            if r + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl State for PegBoard {
    type Rule = Jump;

    fn legal_rules(&self) -> Vec<Jump> {
        let mut result = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if !self.has_peg(self.slot(r, c)) {
                    continue;
                }
                for &dir in &DIRECTIONS {
                    if let Some(jump) = self.jump_from(r, c, dir) {
                        if jump.precondition(self) {
                            result.push(jump);
                        }
                    }
                }
            }
        }
        result
    }

    /// Exactly one peg remains, in the goal slot.
    fn is_goal(&self) -> bool {
        self.pegs == 1u64 << self.goal_slot
    }

    fn fingerprint(&self) -> String {
        (0..self.slot_count())
            .rev()
            .map(|slot| if self.has_peg(slot) { 'X' } else { '.' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slot_numbering() {
        let board = PegBoard::with_hole(4, 4, 9).unwrap();
        assert_eq!(board.slot(0, 0), 15);
        assert_eq!(board.slot(1, 2), 9);
        assert_eq!(board.slot(3, 3), 0);
        assert_eq!(board.position(9), (1, 2));
        assert_eq!(board.position(0), (3, 3));
    }

    #[test]
    fn test_from_config_matches_numeric() {
        let board = PegBoard::from_config(4, 4, "X.XX ..X. X.XX XXXX", 9).unwrap();
        assert_eq!(board.pegs(), 0b1011_0010_1011_1111);
        assert_eq!(board.pegs(), 45759);
        assert_eq!(board.to_string(), "X . X X\n. . X .\nX . X X\nX X X X");
    }

    #[test]
    fn test_from_config_errors() {
        assert!(PegBoard::from_config(4, 4, "XXXX", 9)
            .unwrap_err()
            .to_string()
            .contains("Expected 16 cells"));
        assert!(PegBoard::from_config(2, 2, "XXO.", 0)
            .unwrap_err()
            .to_string()
            .contains("Unrecognized character 'O'"));
        assert!(PegBoard::new(9, 9, 0, 0).is_err(), "81 slots do not fit");
        assert!(PegBoard::new(4, 4, 1 << 16, 0).is_err(), "bit beyond board");
        assert!(PegBoard::new(4, 4, 0, 16).is_err(), "goal off board");
        assert!(PegBoard::new(0, 4, 0, 0).is_err(), "empty board");
    }

    #[test]
    fn test_full_sized_board() {
        let board = PegBoard::with_hole(8, 8, 0).unwrap();
        assert_eq!(board.peg_count(), 63);
        assert!(!board.has_peg(0));
        assert!(board.has_peg(63));
    }

    #[test]
    fn test_legal_rules_hole_at_nine() {
        let board = PegBoard::with_hole(4, 4, 9).unwrap();
        let jumps: Vec<[usize; 3]> = board.legal_rules().iter().map(Jump::as_array).collect();
        assert_eq!(jumps, vec![[11, 10, 9], [3, 6, 9], [1, 5, 9]]);
    }

    #[test]
    fn test_apply_jump() {
        let board = PegBoard::with_hole(4, 4, 9).unwrap();
        let jump = Jump::new(11, 10, 9);
        let next = board.apply(&jump).unwrap();

        assert_eq!(next.pegs(), board.pegs() - (2048 + 1024 - 512));
        assert_eq!(next.fingerprint(), "XXXX..XXXXXXXXXX");
        assert_eq!(next.peg_count(), 14);

        // The same jump is no longer applicable.
        assert!(matches!(
            next.apply(&jump),
            Err(SearchError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_goal() {
        let goal = PegBoard::new(4, 4, 1 << 9, 9).unwrap();
        assert!(goal.is_goal());

        let wrong_slot = PegBoard::new(4, 4, 1 << 8, 9).unwrap();
        assert!(!wrong_slot.is_goal());

        let two_pegs = PegBoard::new(4, 4, (1 << 9) | 1, 9).unwrap();
        assert!(!two_pegs.is_goal());
    }

    #[test]
    fn test_jump_description() {
        assert_eq!(
            Jump::new(11, 10, 9).to_string(),
            "The peg in slot 11 jumps over the peg in slot 10 and lands in slot 9"
        );
    }

    #[test]
    fn test_all_jumps_count() {
        // 3x3: each corner has three jumps, each edge midpoint one, the
        // centre none.
        let board = PegBoard::new(3, 3, 0, 4).unwrap();
        assert_eq!(board.all_jumps().len(), 16);
    }

    proptest! {
        #[test]
        fn prop_legal_rules_match_brute_force(pegs in 0u64..(1 << 16)) {
            let board = PegBoard::new(4, 4, pegs, 9).unwrap();
            let brute: Vec<Jump> = board
                .all_jumps()
                .into_iter()
                .filter(|j| j.precondition(&board))
                .collect();
            prop_assert_eq!(board.legal_rules(), brute);
        }

        #[test]
        fn prop_jump_changes_exactly_written_slots(pegs in 0u64..(1 << 16)) {
            let board = PegBoard::new(4, 4, pegs, 9).unwrap();
            for jump in board.legal_rules() {
                let after = jump.transform(&board);
                let writes = jump.writes(&board);
                let diff: Vec<usize> = board
                    .fingerprint()
                    .chars()
                    .zip(after.fingerprint().chars())
                    .enumerate()
                    .filter(|(_, (a, b))| a != b)
                    .map(|(i, _)| i)
                    .collect();
                let mut expected = writes.clone();
                expected.sort_unstable();
                prop_assert_eq!(diff, expected);
                prop_assert_eq!(after.peg_count() + 1, board.peg_count());
            }
        }
    }
}
