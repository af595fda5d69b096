//! Tic-tac-toe rules.

use crate::error::GameError;
use crate::random::RandomSource;
use crate::session::{Outcome, Ruleset, Seat};
use serde::{Deserialize, Serialize};

/// Mark placed on the board. The creator is always X and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Creator's mark.
    X,
    /// Opponent's mark.
    O,
}

impl Mark {
    /// Mark held by the given seat.
    pub fn of(seat: Seat) -> Self {
        match seat {
            Seat::Creator => Mark::X,
            Seat::Opponent => Mark::O,
        }
    }
}

/// 3x3 board in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares 0-8; `None` is empty.
    pub squares: [Option<Mark>; 9],
}

impl Board {
    /// The eight winning lines: rows, columns, diagonals.
    const LINES: [[usize; 3]; 8] = [
        [0, 1, 2],
        [3, 4, 5],
        [6, 7, 8],
        [0, 3, 6],
        [1, 4, 7],
        [2, 5, 8],
        [0, 4, 8],
        [2, 4, 6],
    ];

    /// Checks for three in a line.
    pub fn winner(&self) -> Option<Mark> {
        for [a, b, c] in Self::LINES {
            if let Some(mark) = self.squares[a] {
                if self.squares[b] == Some(mark) && self.squares[c] == Some(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// Whether every square is occupied.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| s.is_some())
    }
}

/// One submitted tic-tac-toe move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Target square, 0-8 left-to-right, top-to-bottom.
    pub position: usize,
}

/// The tic-tac-toe ruleset.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl Ruleset for TicTacToe {
    type Config = ();
    type Board = Board;
    type Move = Move;

    const NAME: &'static str = "tictactoe";

    fn initial_board(_: &(), _: &mut dyn RandomSource) -> Result<Board, GameError> {
        Ok(Board { squares: [None; 9] })
    }

    fn apply_move(board: &mut Board, mover: Seat, mv: &Move) -> Result<Outcome, GameError> {
        if mv.position >= 9 {
            return Err(GameError::bad_request("position out of bounds (0-8)"));
        }
        if board.squares[mv.position].is_some() {
            return Err(GameError::bad_request("square is already occupied"));
        }

        board.squares[mv.position] = Some(Mark::of(mover));

        if board.winner().is_some() {
            return Ok(Outcome::Won(mover));
        }
        if board.is_full() {
            return Ok(Outcome::Draw);
        }
        Ok(Outcome::Next)
    }
}
