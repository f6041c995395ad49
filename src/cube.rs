//! The 2x2x2 pocket cube.
//!
//! This module defines:
//! - `Color`: the six sticker colors.
//! - `Twist`: the twelve quarter turns, each a fixed permutation of the 24 stickers.
//! - `Cube`: a sticker configuration, searchable through the [`State`] trait.
//!
//! Sticker indices, face by face (4 stickers per face, read row-major):
//!
//! ```text
//!         0  1
//!         2  3
//! 16 17   8  9   4  5  20 21
//! 18 19  10 11   6  7  22 23
//!        12 13
//!        14 15
//! ```
//!
//! Faces in order are White (up), Red, Green (front), Yellow (down), Orange, Blue.
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SearchError};
use crate::state::{Rule, State};
use crate::utils::{parse_cells, random_walk};

/// Number of stickers on a 2x2x2 cube.
pub const TILE_COUNT: usize = 24;

/// Stickers per face.
pub const FACE_TILES: usize = 4;

/// A sticker color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Red,
    Green,
    Yellow,
    Orange,
    Blue,
}

impl Color {
    /// All colors, in face order of the solved cube.
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Orange,
        Color::Blue,
    ];

    /// Converts the color to its configuration character.
    ///
    /// # Examples
    ///
    /// ```
    /// use puzzle_search::cube::Color;
    /// assert_eq!(Color::White.to_char(), 'W');
    /// assert_eq!(Color::Orange.to_char(), 'O');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Orange => 'O',
            Color::Blue => 'B',
        }
    }

    /// Parses a configuration character. Lowercase is accepted.
    pub fn from_char(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'Y' => Some(Color::Yellow),
            'O' => Some(Color::Orange),
            'B' => Some(Color::Blue),
            _ => None,
        }
    }
}

/// A quarter turn of one face. Primed variants turn counter-clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Twist {
    U,
    UPrime,
    R,
    RPrime,
    F,
    FPrime,
    D,
    DPrime,
    L,
    LPrime,
    B,
    BPrime,
}

// new[i] = old[PERMUTATION[i]]
const PERMUTATIONS: [[usize; TILE_COUNT]; 12] = [
    // U
    [2, 0, 3, 1, 20, 21, 6, 7, 4, 5, 10, 11, 12, 13, 14, 15, 8, 9, 18, 19, 16, 17, 22, 23],
    // U'
    [1, 3, 0, 2, 8, 9, 6, 7, 16, 17, 10, 11, 12, 13, 14, 15, 20, 21, 18, 19, 4, 5, 22, 23],
    // R
    [0, 9, 2, 11, 6, 4, 7, 5, 8, 13, 10, 15, 12, 22, 14, 20, 16, 17, 18, 19, 3, 21, 1, 23],
    // R'
    [0, 22, 2, 20, 5, 7, 4, 6, 8, 1, 10, 3, 12, 9, 14, 11, 16, 17, 18, 19, 15, 21, 13, 23],
    // F
    [0, 1, 19, 17, 2, 5, 3, 7, 10, 8, 11, 9, 6, 4, 14, 15, 16, 12, 18, 13, 20, 21, 22, 23],
    // F'
    [0, 1, 4, 6, 13, 5, 12, 7, 9, 11, 8, 10, 17, 19, 14, 15, 16, 3, 18, 2, 20, 21, 22, 23],
    // D
    [0, 1, 2, 3, 4, 5, 10, 11, 8, 9, 18, 19, 14, 12, 15, 13, 16, 17, 22, 23, 20, 21, 6, 7],
    // D'
    [0, 1, 2, 3, 4, 5, 22, 23, 8, 9, 6, 7, 13, 15, 12, 14, 16, 17, 10, 11, 20, 21, 18, 19],
    // L
    [23, 1, 21, 3, 4, 5, 6, 7, 0, 9, 2, 11, 8, 13, 10, 15, 18, 16, 19, 17, 20, 14, 22, 12],
    // L'
    [8, 1, 10, 3, 4, 5, 6, 7, 12, 9, 14, 11, 23, 13, 21, 15, 17, 19, 16, 18, 20, 2, 22, 0],
    // B
    [5, 7, 2, 3, 4, 15, 6, 14, 8, 9, 10, 11, 12, 13, 16, 18, 1, 17, 0, 19, 22, 20, 23, 21],
    // B'
    [18, 16, 2, 3, 4, 0, 6, 1, 8, 9, 10, 11, 12, 13, 7, 5, 14, 17, 15, 19, 21, 23, 20, 22],
];

impl Twist {
    /// Every twist, in rule-table order. Searches enumerate rules in this order.
    pub const ALL: [Twist; 12] = [
        Twist::U,
        Twist::UPrime,
        Twist::R,
        Twist::RPrime,
        Twist::F,
        Twist::FPrime,
        Twist::D,
        Twist::DPrime,
        Twist::L,
        Twist::LPrime,
        Twist::B,
        Twist::BPrime,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The sticker permutation: after the twist, sticker `i` holds what sticker
    /// `permutation()[i]` held before.
    pub fn permutation(self) -> &'static [usize; TILE_COUNT] {
        &PERMUTATIONS[self.index()]
    }

    /// Standard notation, e.g. `"U"` or `"R'"`.
    pub fn notation(self) -> &'static str {
        match self {
            Twist::U => "U",
            Twist::UPrime => "U'",
            Twist::R => "R",
            Twist::RPrime => "R'",
            Twist::F => "F",
            Twist::FPrime => "F'",
            Twist::D => "D",
            Twist::DPrime => "D'",
            Twist::L => "L",
            Twist::LPrime => "L'",
            Twist::B => "B",
            Twist::BPrime => "B'",
        }
    }

    /// The twist turning the same face the other way.
    pub fn reversed(self) -> Twist {
        // Table entries come in (turn, counter-turn) pairs.
        Twist::ALL[self.index() ^ 1]
    }
}

impl fmt::Display for Twist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

impl FromStr for Twist {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        Twist::ALL
            .iter()
            .copied()
            .find(|t| t.notation() == s.trim())
            .ok_or_else(|| SearchError::InvalidConfiguration(format!("Unknown twist '{}'", s)))
    }
}

impl Rule<Cube> for Twist {
    /// Every twist is always applicable.
    fn precondition(&self, _state: &Cube) -> bool {
        true
    }

    fn transform(&self, state: &Cube) -> Cube {
        let perm = self.permutation();
        let mut tiles = state.tiles;
        for (i, tile) in tiles.iter_mut().enumerate() {
            *tile = state.tiles[perm[i]];
        }
        Cube { tiles }
    }

    fn writes(&self, _state: &Cube) -> Vec<usize> {
        let perm = self.permutation();
        (0..TILE_COUNT).filter(|&i| perm[i] != i).collect()
    }

    fn inverse(&self) -> Option<Twist> {
        Some(self.reversed())
    }
}

/// A sticker configuration of the cube.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cube {
    tiles: [Color; TILE_COUNT],
}

impl Cube {
    /// The solved cube: `WWWW RRRR GGGG YYYY OOOO BBBB`.
    pub fn solved() -> Self {
        let mut tiles = [Color::White; TILE_COUNT];
        for (face, color) in Color::ALL.iter().enumerate() {
            for tile in &mut tiles[face * FACE_TILES..(face + 1) * FACE_TILES] {
                *tile = *color;
            }
        }
        Cube { tiles }
    }

    /// Parses a cube from its 24-character configuration.
    ///
    /// Both the terse form (`"WOWOBBBBRWRWYRYRGGGGYOYO"`) and the readable form
    /// with spaces between faces are accepted.
    ///
    /// # Errors
    /// Returns `SearchError::InvalidConfiguration` if the string does not hold
    /// exactly 24 stickers, contains a character outside `WRGYOB`, or does not
    /// use every color exactly four times.
    ///
    /// # Examples
    /// ```
    /// use puzzle_search::cube::Cube;
    /// use puzzle_search::state::State;
    ///
    /// let cube = Cube::from_config("WWWW RRRR GGGG YYYY OOOO BBBB").unwrap();
    /// assert!(cube.is_goal());
    /// assert!(Cube::from_config("WWWW").is_err());
    /// ```
    pub fn from_config(config: &str) -> Result<Self> {
        let cells = parse_cells(config, TILE_COUNT, Color::from_char)?;

        for color in Color::ALL {
            let count = cells.iter().filter(|&&c| c == color).count();
            if count != FACE_TILES {
                return Err(SearchError::InvalidConfiguration(format!(
                    "Color '{}' appears {} times, expected {}",
                    color.to_char(),
                    count,
                    FACE_TILES
                )));
            }
        }

        let mut tiles = [Color::White; TILE_COUNT];
        tiles.copy_from_slice(&cells);
        Ok(Cube { tiles })
    }

    /// Produces a cube `n` random twists away from the solved cube.
    ///
    /// Returns the scrambled cube and the twists applied.
    pub fn scramble(n: usize, rng: &mut impl Rng) -> Result<(Cube, Vec<Twist>)> {
        random_walk(&Cube::solved(), n, rng)
    }

    /// Returns the sticker at index `i`.
    ///
    /// # Panics
    /// Panics if `i >= TILE_COUNT`.
    pub fn get_tile(&self, i: usize) -> Color {
        self.tiles[i]
    }

    /// Returns all 24 stickers.
    pub fn tiles(&self) -> &[Color; TILE_COUNT] {
        &self.tiles
    }

    /// Number of sticker positions whose color differs from `other`.
    pub fn mismatches(&self, other: &Cube) -> usize {
        self.tiles
            .iter()
            .zip(other.tiles.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Renders the cube as a flattened net:
    ///
    /// ```text
    ///    WW
    ///    WW
    /// OO GG RR BB
    /// OO GG RR BB
    ///    YY
    ///    YY
    /// ```
    pub fn to_grid(&self) -> String {
        const TOP: usize = 0;
        const BOTTOM: usize = 1;

        let part = |face: Option<usize>, portion: usize| -> String {
            match face {
                Some(face) => {
                    let offset = FACE_TILES * face + 2 * portion;
                    format!(
                        "{}{} ",
                        self.tiles[offset].to_char(),
                        self.tiles[offset + 1].to_char()
                    )
                }
                None => "   ".to_string(),
            }
        };

        let layout: [[Option<usize>; 4]; 3] = [
            [None, Some(0), None, None],
            [Some(4), Some(2), Some(1), Some(5)],
            [None, Some(3), None, None],
        ];

        let mut out = String::new();
        for faces in layout {
            for row in [TOP, BOTTOM] {
                let line: String = faces.iter().map(|&face| part(face, row)).collect();
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Cube {
    fn default() -> Self {
        Cube::solved()
    }
}

impl FromStr for Cube {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        Cube::from_config(s)
    }
}

impl fmt::Display for Cube {
    /// Readable form: four stickers per face, faces separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (face, chunk) in self.tiles.chunks(FACE_TILES).enumerate() {
            if face > 0 {
                f.write_str(" ")?;
            }
            for tile in chunk {
                write!(f, "{}", tile.to_char())?;
            }
        }
        Ok(())
    }
}

impl State for Cube {
    type Rule = Twist;

    fn legal_rules(&self) -> Vec<Twist> {
        Twist::ALL.to_vec()
    }

    fn is_goal(&self) -> bool {
        *self == Cube::solved()
    }

    fn fingerprint(&self) -> String {
        self.tiles.iter().map(Color::to_char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_solved_cube() {
        let cube = Cube::solved();
        assert!(cube.is_goal());
        assert_eq!(cube.to_string(), "WWWW RRRR GGGG YYYY OOOO BBBB");
        assert_eq!(cube.fingerprint(), "WWWWRRRRGGGGYYYYOOOOBBBB");
        assert_eq!(Cube::default(), cube);
    }

    #[test]
    fn test_from_config_terse_and_readable() {
        let terse = Cube::from_config("WOWOBBBBRWRWYRYRGGGGYOYO").unwrap();
        let readable = Cube::from_config("WOWO BBBB RWRW YRYR GGGG YOYO").unwrap();
        assert_eq!(terse, readable);
        assert_eq!(terse.get_tile(1), Color::Orange);
        assert!(!terse.is_goal());
    }

    #[test]
    fn test_from_config_wrong_length() {
        let err = Cube::from_config("WWWW RRRR GGGG").unwrap_err();
        assert!(err.to_string().contains("Expected 24 cells, found 12"));
    }

    #[test]
    fn test_from_config_bad_alphabet() {
        let err = Cube::from_config("WWWW RRRR GGGG YYYY OOOO BBBX").unwrap_err();
        assert!(err.to_string().contains("Unrecognized character 'X'"));
    }

    #[test]
    fn test_from_config_bad_color_counts() {
        let err = Cube::from_config("WWWW WRRR GGGG YYYY OOOO BBBB").unwrap_err();
        assert!(err.to_string().contains("Color 'W' appears 5 times"));
    }

    #[test]
    fn test_single_twists_from_solved() {
        let solved = Cube::solved();
        assert_eq!(
            Twist::U.transform(&solved).to_string(),
            "WWWW BBRR RRGG YYYY GGOO OOBB"
        );
        assert_eq!(
            Twist::R.transform(&solved).to_string(),
            "WGWG RRRR GYGY YBYB OOOO WBWB"
        );
        assert_eq!(
            Twist::F.transform(&solved).to_string(),
            "WWOO WRWR GGGG RRYY OYOY BBBB"
        );
    }

    #[test]
    fn test_twist_notation_roundtrip() {
        for twist in Twist::ALL {
            assert_eq!(twist.notation().parse::<Twist>().unwrap(), twist);
        }
        assert!("X".parse::<Twist>().is_err());
    }

    #[test]
    fn test_reversed_pairs() {
        assert_eq!(Twist::U.reversed(), Twist::UPrime);
        assert_eq!(Twist::UPrime.reversed(), Twist::U);
        assert_eq!(Twist::BPrime.reversed(), Twist::B);
    }

    #[test]
    fn test_four_quarter_turns_are_identity() {
        let mut rng = SmallRng::seed_from_u64(99);
        let (start, _) = Cube::scramble(8, &mut rng).unwrap();
        for twist in Twist::ALL {
            let mut cube = start.clone();
            for _ in 0..4 {
                cube = twist.transform(&cube);
            }
            assert_eq!(cube, start, "four turns of {} should be identity", twist);
        }
    }

    #[test]
    fn test_legal_rules_match_brute_force() {
        let mut rng = SmallRng::seed_from_u64(3);
        let (cube, _) = Cube::scramble(5, &mut rng).unwrap();
        let brute: Vec<Twist> = Twist::ALL
            .iter()
            .copied()
            .filter(|t| t.precondition(&cube))
            .collect();
        assert_eq!(cube.legal_rules(), brute);
    }

    #[test]
    fn test_to_grid() {
        let grid = Cube::solved().to_grid();
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "   WW");
        assert_eq!(lines[2], "OO GG RR BB");
        assert_eq!(lines[5], "   YY");
    }

    proptest! {
        #[test]
        fn prop_inverse_restores_state(
            scramble in proptest::collection::vec(0usize..12, 0..12),
            twist in 0usize..12,
        ) {
            let mut cube = Cube::solved();
            for i in scramble {
                cube = Twist::ALL[i].transform(&cube);
            }
            let twist = Twist::ALL[twist];
            let inverse = twist.inverse().unwrap();
            let back = inverse.apply(&twist.apply(&cube).unwrap()).unwrap();
            prop_assert_eq!(back, cube);
        }

        #[test]
        fn prop_twist_only_changes_written_tiles(
            scramble in proptest::collection::vec(0usize..12, 0..12),
            twist in 0usize..12,
        ) {
            let mut cube = Cube::solved();
            for i in scramble {
                cube = Twist::ALL[i].transform(&cube);
            }
            let twist = Twist::ALL[twist];
            let writes = twist.writes(&cube);
            let before: Vec<char> = cube.fingerprint().chars().collect();
            let after: Vec<char> = twist.transform(&cube).fingerprint().chars().collect();
            for i in 0..TILE_COUNT {
                if !writes.contains(&i) {
                    prop_assert_eq!(before[i], after[i]);
                }
            }
        }
    }
}
