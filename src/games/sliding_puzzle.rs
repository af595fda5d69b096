//! Sliding puzzle rules.
//!
//! Tiles are numbered `0..n*n` where `0` is the blank; a tile arrangement is
//! solved when every tile sits at the index matching its number. Shuffles
//! are rejected until they pass the 15-puzzle inversion-parity test and
//! differ from the solved arrangement. The variant is turnless: it plays as
//! a solo solve or as a race where both players work the same shuffle with
//! independent move counts.

use crate::error::GameError;
use crate::random::{RandomSource, shuffle};
use crate::session::{Outcome, Ruleset, Seat};
use serde::{Deserialize, Serialize};

/// Creation-time options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Grid dimension; 3, 4, or 5 by difficulty.
    pub grid_size: usize,
    /// Two racers on the same shuffle instead of a solo solve.
    pub race: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            race: false,
        }
    }
}

/// One player's progress on the shared shuffle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Racer {
    /// Current tile arrangement; `tiles[pos]` is the tile number at `pos`.
    pub tiles: Vec<u8>,
    /// Moves taken so far.
    pub moves: u32,
    /// Whether the arrangement reached the solved state.
    pub done: bool,
}

impl Racer {
    fn new(start: &[u8]) -> Self {
        Self {
            tiles: start.to_vec(),
            moves: 0,
            done: false,
        }
    }
}

/// Puzzle payload: the shared shuffle plus per-racer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Grid dimension.
    pub grid_size: usize,
    /// The initial shuffle both racers start from.
    pub start: Vec<u8>,
    /// The creator's progress.
    pub creator: Racer,
    /// The second racer; absent for solo solves.
    pub opponent: Option<Racer>,
}

/// One submitted puzzle move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Index of the tile to slide into the blank.
    pub tile_index: usize,
}

/// The sliding-puzzle ruleset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingPuzzle;

/// Whether a tile arrangement is solved (`tiles[i] == i` for all `i`).
pub fn is_solved(tiles: &[u8]) -> bool {
    tiles.iter().enumerate().all(|(pos, &t)| t as usize == pos)
}

/// Inversion count among the non-blank tile sequence.
fn inversions(tiles: &[u8]) -> usize {
    let seq: Vec<u8> = tiles.iter().copied().filter(|&t| t != 0).collect();
    let mut count = 0;
    for i in 0..seq.len() {
        for j in i + 1..seq.len() {
            if seq[i] > seq[j] {
                count += 1;
            }
        }
    }
    count
}

/// 15-puzzle parity rule.
///
/// Odd grid dimension: solvable iff the inversion count is even. Even grid
/// dimension: solvable iff inversions plus the blank's row counted from the
/// bottom (bottom row = 1) is even.
pub fn is_solvable(tiles: &[u8], grid_size: usize) -> bool {
    let inv = inversions(tiles);
    if grid_size % 2 == 1 {
        inv % 2 == 0
    } else {
        let blank = tiles.iter().position(|&t| t == 0).expect("blank present");
        let row_from_bottom = grid_size - blank / grid_size;
        (inv + row_from_bottom) % 2 == 0
    }
}

/// Shuffles until the arrangement is solvable and not already solved.
pub fn generate_shuffle(grid_size: usize, rng: &mut dyn RandomSource) -> Vec<u8> {
    let mut tiles: Vec<u8> = (0..(grid_size * grid_size) as u8).collect();
    loop {
        shuffle(rng, &mut tiles);
        if is_solvable(&tiles, grid_size) && !is_solved(&tiles) {
            return tiles;
        }
    }
}

impl Ruleset for SlidingPuzzle {
    type Config = PuzzleConfig;
    type Board = Board;
    type Move = Move;

    const NAME: &'static str = "sliding_puzzle";

    // Racers move whenever they like; there is no turn to enforce.
    const ALTERNATING: bool = false;

    fn solo(config: &PuzzleConfig) -> bool {
        !config.race
    }

    fn initial_board(
        config: &PuzzleConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<Board, GameError> {
        if !(3..=5).contains(&config.grid_size) {
            return Err(GameError::bad_request("grid size must be 3, 4, or 5"));
        }
        let start = generate_shuffle(config.grid_size, rng);
        Ok(Board {
            grid_size: config.grid_size,
            creator: Racer::new(&start),
            opponent: config.race.then(|| Racer::new(&start)),
            start,
        })
    }

    fn apply_move(board: &mut Board, mover: Seat, mv: &Move) -> Result<Outcome, GameError> {
        let n = board.grid_size;
        let solo = board.opponent.is_none();

        let racer = match mover {
            Seat::Creator => &mut board.creator,
            Seat::Opponent => board
                .opponent
                .as_mut()
                .ok_or_else(|| GameError::bad_request("session has no second racer"))?,
        };
        if racer.done {
            return Err(GameError::bad_request("you already finished the puzzle"));
        }
        if mv.tile_index >= n * n {
            return Err(GameError::bad_request("tile index out of bounds"));
        }

        let blank = racer
            .tiles
            .iter()
            .position(|&t| t == 0)
            .expect("blank tile present");
        if !adjacent(mv.tile_index, blank, n) {
            return Err(GameError::bad_request("tile is not adjacent to the blank"));
        }

        racer.tiles.swap(mv.tile_index, blank);
        racer.moves += 1;
        racer.done = is_solved(&racer.tiles);

        if !racer.done {
            return Ok(Outcome::Next);
        }
        if solo {
            return Ok(Outcome::Won(Seat::Creator));
        }

        // Race: conclude only once both racers finished.
        let (a, b) = (
            &board.creator,
            board.opponent.as_ref().expect("race has two racers"),
        );
        if !(a.done && b.done) {
            return Ok(Outcome::Next);
        }
        if a.moves < b.moves {
            Ok(Outcome::Won(Seat::Creator))
        } else if b.moves < a.moves {
            Ok(Outcome::Won(Seat::Opponent))
        } else {
            Ok(Outcome::Draw)
        }
    }
}

/// Orthogonal adjacency on an `n` wide grid: same row one column apart, or
/// same column one row apart. Never diagonal.
fn adjacent(a: usize, b: usize, n: usize) -> bool {
    let (ar, ac) = (a / n, a % n);
    let (br, bc) = (b / n, b % n);
    (ar == br && ac.abs_diff(bc) == 1) || (ac == bc && ar.abs_diff(br) == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn solved_arrangement_is_detected() {
        assert!(is_solved(&[0, 1, 2, 3, 4, 5, 6, 7, 8]));
        assert!(!is_solved(&[1, 0, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn generated_shuffles_are_solvable_and_unsolved() {
        let mut rng = SeededRandom::new(11);
        for grid_size in [3, 4, 5] {
            for _ in 0..50 {
                let tiles = generate_shuffle(grid_size, &mut rng);
                assert!(is_solvable(&tiles, grid_size));
                assert!(!is_solved(&tiles));
            }
        }
    }

    #[test]
    fn diagonal_and_distant_tiles_are_rejected() {
        let mut board = Board {
            grid_size: 3,
            start: vec![1, 0, 2, 3, 4, 5, 6, 7, 8],
            creator: Racer::new(&[1, 0, 2, 3, 4, 5, 6, 7, 8]),
            opponent: None,
        };
        // Blank is at index 1; index 5 is diagonal, index 7 two rows away.
        for bad in [5usize, 7] {
            let err =
                SlidingPuzzle::apply_move(&mut board, Seat::Creator, &Move { tile_index: bad });
            assert!(matches!(err, Err(GameError::BadRequest(_))), "index {bad}");
        }
    }

    #[test]
    fn solo_solve_wins_on_final_swap() {
        let start = vec![1, 0, 2, 3, 4, 5, 6, 7, 8];
        let mut board = Board {
            grid_size: 3,
            start: start.clone(),
            creator: Racer::new(&start),
            opponent: None,
        };
        let outcome =
            SlidingPuzzle::apply_move(&mut board, Seat::Creator, &Move { tile_index: 0 }).unwrap();
        assert_eq!(outcome, Outcome::Won(Seat::Creator));
        assert!(board.creator.done);
        assert_eq!(board.creator.moves, 1);
    }

    #[test]
    fn race_waits_for_both_then_fewest_moves_wins() {
        let start = vec![1, 0, 2, 3, 4, 5, 6, 7, 8];
        let mut board = Board {
            grid_size: 3,
            start: start.clone(),
            creator: Racer::new(&start),
            opponent: Some(Racer::new(&start)),
        };

        // Opponent wanders before solving: three moves total.
        for idx in [2usize, 1, 0] {
            assert_eq!(
                SlidingPuzzle::apply_move(&mut board, Seat::Opponent, &Move { tile_index: idx })
                    .unwrap(),
                Outcome::Next
            );
        }
        assert!(board.opponent.as_ref().unwrap().done);
        assert_eq!(board.opponent.as_ref().unwrap().moves, 3);

        // Finished racers cannot keep moving.
        let err = SlidingPuzzle::apply_move(&mut board, Seat::Opponent, &Move { tile_index: 1 });
        assert!(matches!(err, Err(GameError::BadRequest(_))));

        // Creator solves in one: fewer moves takes the race.
        let outcome =
            SlidingPuzzle::apply_move(&mut board, Seat::Creator, &Move { tile_index: 0 }).unwrap();
        assert_eq!(outcome, Outcome::Won(Seat::Creator));
    }

    #[test]
    fn race_with_equal_moves_is_a_draw() {
        let start = vec![1, 0, 2, 3, 4, 5, 6, 7, 8];
        let mut board = Board {
            grid_size: 3,
            start: start.clone(),
            creator: Racer::new(&start),
            opponent: Some(Racer::new(&start)),
        };
        SlidingPuzzle::apply_move(&mut board, Seat::Opponent, &Move { tile_index: 0 }).unwrap();
        let outcome =
            SlidingPuzzle::apply_move(&mut board, Seat::Creator, &Move { tile_index: 0 }).unwrap();
        assert_eq!(outcome, Outcome::Draw);
    }

    #[test]
    fn invalid_grid_size_is_rejected() {
        let mut rng = SeededRandom::new(0);
        let config = PuzzleConfig {
            grid_size: 6,
            race: false,
        };
        let err = SlidingPuzzle::initial_board(&config, &mut rng);
        assert!(matches!(err, Err(GameError::BadRequest(_))));
    }
}
