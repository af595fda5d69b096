//! Connect four rules.
//!
//! A move names only a column; gravity resolves the landing row. The win
//! scan covers all four line directions from every cell.

use crate::error::GameError;
use crate::random::RandomSource;
use crate::session::{Outcome, Ruleset, Seat};
use serde::{Deserialize, Serialize};

/// Board height.
pub const ROWS: usize = 6;
/// Board width.
pub const COLS: usize = 7;

/// Disc color. The creator is always red and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disc {
    /// Creator's discs.
    Red,
    /// Opponent's discs.
    Yellow,
}

impl Disc {
    /// Disc color held by the given seat.
    pub fn of(seat: Seat) -> Self {
        match seat {
            Seat::Creator => Disc::Red,
            Seat::Opponent => Disc::Yellow,
        }
    }
}

/// 6x7 grid, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// `cells[row][col]`; `None` is empty.
    pub cells: [[Option<Disc>; COLS]; ROWS],
}

impl Board {
    /// Lowest unfilled row in the column, if any.
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_none())
    }

    /// Whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|c| c.is_some())
    }

    /// Scans for four consecutive equal discs in any direction.
    pub fn winner(&self) -> Option<Disc> {
        // Right, down, down-right, up-right.
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

        for row in 0..ROWS {
            for col in 0..COLS {
                let Some(disc) = self.cells[row][col] else {
                    continue;
                };
                for (dr, dc) in DIRECTIONS {
                    let run = (1..4).all(|step| {
                        let r = row as isize + dr * step;
                        let c = col as isize + dc * step;
                        (0..ROWS as isize).contains(&r)
                            && (0..COLS as isize).contains(&c)
                            && self.cells[r as usize][c as usize] == Some(disc)
                    });
                    if run {
                        return Some(disc);
                    }
                }
            }
        }
        None
    }
}

/// One submitted connect-four move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Target column, 0-6.
    pub column: usize,
}

/// The connect-four ruleset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectFour;

impl Ruleset for ConnectFour {
    type Config = ();
    type Board = Board;
    type Move = Move;

    const NAME: &'static str = "connect_four";

    fn initial_board(_: &(), _: &mut dyn RandomSource) -> Result<Board, GameError> {
        Ok(Board {
            cells: [[None; COLS]; ROWS],
        })
    }

    fn apply_move(board: &mut Board, mover: Seat, mv: &Move) -> Result<Outcome, GameError> {
        if mv.column >= COLS {
            return Err(GameError::bad_request("column out of bounds (0-6)"));
        }
        let row = board
            .drop_row(mv.column)
            .ok_or_else(|| GameError::bad_request("column is full"))?;

        board.cells[row][mv.column] = Some(Disc::of(mover));

        if board.winner().is_some() {
            return Ok(Outcome::Won(mover));
        }
        if board.is_full() {
            return Ok(Outcome::Draw);
        }
        Ok(Outcome::Next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    fn empty() -> Board {
        let mut rng = SeededRandom::new(0);
        ConnectFour::initial_board(&(), &mut rng).unwrap()
    }

    #[test]
    fn discs_stack_from_the_bottom() {
        let mut board = empty();
        ConnectFour::apply_move(&mut board, Seat::Creator, &Move { column: 3 }).unwrap();
        ConnectFour::apply_move(&mut board, Seat::Opponent, &Move { column: 3 }).unwrap();
        assert_eq!(board.cells[5][3], Some(Disc::Red));
        assert_eq!(board.cells[4][3], Some(Disc::Yellow));
        assert_eq!(board.cells[3][3], None);
    }

    #[test]
    fn full_column_is_rejected() {
        let mut board = empty();
        for i in 0..ROWS {
            let seat = if i % 2 == 0 { Seat::Creator } else { Seat::Opponent };
            ConnectFour::apply_move(&mut board, seat, &Move { column: 0 }).unwrap();
        }
        let err = ConnectFour::apply_move(&mut board, Seat::Creator, &Move { column: 0 });
        assert!(matches!(err, Err(GameError::BadRequest(_))));
    }

    #[test]
    fn vertical_stack_of_four_wins() {
        let mut board = empty();
        // Red stacks column 2; yellow scatters elsewhere.
        for (i, yellow_col) in [0usize, 1, 4].iter().enumerate() {
            assert_eq!(
                ConnectFour::apply_move(&mut board, Seat::Creator, &Move { column: 2 }).unwrap(),
                Outcome::Next,
                "red move {i} should not end the game"
            );
            ConnectFour::apply_move(&mut board, Seat::Opponent, &Move { column: *yellow_col })
                .unwrap();
        }
        let outcome =
            ConnectFour::apply_move(&mut board, Seat::Creator, &Move { column: 2 }).unwrap();
        assert_eq!(outcome, Outcome::Won(Seat::Creator));
    }

    #[test]
    fn up_right_diagonal_is_detected() {
        let mut board = empty();
        // Hand-build a ↗ diagonal for yellow.
        board.cells[5][0] = Some(Disc::Yellow);
        board.cells[4][1] = Some(Disc::Yellow);
        board.cells[3][2] = Some(Disc::Yellow);
        board.cells[2][3] = Some(Disc::Yellow);
        assert_eq!(board.winner(), Some(Disc::Yellow));
    }

    #[test]
    fn horizontal_run_of_three_is_not_a_win() {
        let mut board = empty();
        board.cells[5][1] = Some(Disc::Red);
        board.cells[5][2] = Some(Disc::Red);
        board.cells[5][3] = Some(Disc::Red);
        assert_eq!(board.winner(), None);
    }
}
