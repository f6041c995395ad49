use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SearchError};
use crate::state::State;

/// Parses a fixed-width configuration string into one value per cell.
///
/// Whitespace anywhere in `s` is ignored, so readable forms such as
/// `"WWWW RRRR GGGG YYYY OOOO BBBB"` are accepted alongside the terse form.
/// Every remaining character is passed to `parse_cell`; a `None` result is
/// reported as an unrecognized character.
///
/// # Arguments
/// * `s`: The configuration string.
/// * `expected_len`: The number of cells the puzzle has.
/// * `parse_cell`: Maps one character to a cell value.
///
/// # Returns
/// * `Ok(Vec<T>)` with exactly `expected_len` cells.
/// * `Err(SearchError::InvalidConfiguration)` if the length is wrong or a
///   character is not part of the puzzle's alphabet.
///
/// # Examples
/// ```
/// use puzzle_search::utils::parse_cells;
///
/// let cells = parse_cells("X. .X", 4, |c| match c {
///     'X' => Some(true),
///     '.' => Some(false),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(cells, vec![true, false, false, true]);
///
/// assert!(parse_cells("X?", 2, |c| (c == 'X').then_some(true)).is_err());
/// assert!(parse_cells("XXX", 2, |_| Some(true)).is_err());
/// ```
pub fn parse_cells<T>(
    s: &str,
    expected_len: usize,
    parse_cell: impl Fn(char) -> Option<T>,
) -> Result<Vec<T>> {
    let compact: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.len() != expected_len {
        return Err(SearchError::InvalidConfiguration(format!(
            "Expected {} cells, found {} in {:?}",
            expected_len,
            compact.len(),
            s
        )));
    }

    compact
        .iter()
        .enumerate()
        .map(|(pos, &ch)| {
            parse_cell(ch).ok_or_else(|| {
                SearchError::InvalidConfiguration(format!(
                    "Unrecognized character '{}' at position {}",
                    ch, pos
                ))
            })
        })
        .collect()
}

/// Applies up to `steps` randomly chosen legal rules, starting from `start`.
///
/// This is how scrambled cubes are produced from the solved cube, and how the
/// peg board's "flail" demonstration plays until it is stuck (pass
/// `usize::MAX`). The walk stops early if a state has no legal rule.
///
/// # Returns
/// The final state and the rules applied, in order.
pub fn random_walk<S: State, R: Rng + ?Sized>(
    start: &S,
    steps: usize,
    rng: &mut R,
) -> Result<(S, Vec<S::Rule>)> {
    let mut state = start.clone();
    let mut applied = Vec::new();

    while applied.len() < steps {
        let rules = state.legal_rules();
        let Some(rule) = rules.choose(rng) else {
            if steps != usize::MAX {
                warn!(
                    "random walk stuck after {} of {} steps at {}",
                    applied.len(),
                    steps,
                    state
                );
            }
            break;
        };
        state = state.apply(rule)?;
        debug!("random walk applied {} -> {}", rule, state);
        applied.push(rule.clone());
    }

    Ok((state, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use crate::pegboard::PegBoard;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_cells_ignores_whitespace() {
        let cells = parse_cells(" a b\tc\n", 3, Some).unwrap();
        assert_eq!(cells, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_parse_cells_wrong_length() {
        let err = parse_cells("abcd", 3, Some).unwrap_err();
        assert!(err.to_string().contains("Expected 3 cells, found 4"));
    }

    #[test]
    fn test_parse_cells_bad_character() {
        let err = parse_cells("ab!", 3, |c| c.is_alphabetic().then_some(c)).unwrap_err();
        assert!(err
            .to_string()
            .contains("Unrecognized character '!' at position 2"));
    }

    #[test]
    fn test_random_walk_is_deterministic_for_a_seed() {
        let solved = Cube::solved();
        let mut rng1 = SmallRng::seed_from_u64(514514);
        let mut rng2 = SmallRng::seed_from_u64(514514);

        let (a, rules_a) = random_walk(&solved, 6, &mut rng1).unwrap();
        let (b, rules_b) = random_walk(&solved, 6, &mut rng2).unwrap();

        assert_eq!(a, b);
        assert_eq!(rules_a, rules_b);
        assert_eq!(rules_a.len(), 6);
    }

    #[test]
    fn test_random_walk_replays_to_final_state() {
        let solved = Cube::solved();
        let mut rng = SmallRng::seed_from_u64(7);
        let (scrambled, rules) = random_walk(&solved, 5, &mut rng).unwrap();

        let mut replay = solved;
        for rule in &rules {
            replay = replay.apply(rule).unwrap();
        }
        assert_eq!(replay, scrambled);
    }

    #[test]
    fn test_random_walk_stops_when_stuck() {
        // Two pegs side by side in a 1x3 strip: one jump, then stuck.
        let board = PegBoard::from_config(1, 3, "XX.", 0).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let (end, rules) = random_walk(&board, usize::MAX, &mut rng).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(end.peg_count(), 1);
        assert!(end.legal_rules().is_empty());
    }
}
