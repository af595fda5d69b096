//! Checkers rules.
//!
//! Pieces live on dark squares only. Simple moves step one diagonal in the
//! piece's forward direction (kings move either way); captures jump two
//! diagonals over an opposing piece in any of the four directions. Captures
//! are forced: while any capture exists anywhere on the mover's board, a
//! non-capturing move is rejected.

use crate::error::GameError;
use crate::random::RandomSource;
use crate::session::{Outcome, Ruleset, Seat};
use serde::{Deserialize, Serialize};

/// Board dimension.
pub const SIZE: usize = 8;

/// One checkers piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Owning seat. The creator's pieces start on rows 0-2 and advance
    /// toward row 7; the opponent mirrors.
    pub owner: Seat,
    /// Kings move and promote no further.
    pub king: bool,
}

/// A board coordinate, `(row, col)`.
pub type Square = (usize, usize);

/// 8x8 board; light squares stay `None` forever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// `squares[row][col]`.
    pub squares: [[Option<Piece>; SIZE]; SIZE],
}

/// One submitted checkers move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Square the piece moves from.
    pub from: Square,
    /// Square the piece lands on.
    pub to: Square,
}

/// The checkers ruleset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checkers;

/// Forward row direction for a seat's men.
fn forward(seat: Seat) -> isize {
    match seat {
        Seat::Creator => 1,
        Seat::Opponent => -1,
    }
}

fn dark(square: Square) -> bool {
    (square.0 + square.1) % 2 == 1
}

fn in_bounds(row: isize, col: isize) -> bool {
    (0..SIZE as isize).contains(&row) && (0..SIZE as isize).contains(&col)
}

impl Board {
    /// Initial layout: three rows of men per side, dark squares only.
    pub fn starting() -> Self {
        let mut squares = [[None; SIZE]; SIZE];
        for row in 0..3 {
            for col in 0..SIZE {
                if dark((row, col)) {
                    squares[row][col] = Some(Piece {
                        owner: Seat::Creator,
                        king: false,
                    });
                }
            }
        }
        for row in SIZE - 3..SIZE {
            for col in 0..SIZE {
                if dark((row, col)) {
                    squares[row][col] = Some(Piece {
                        owner: Seat::Opponent,
                        king: false,
                    });
                }
            }
        }
        Self { squares }
    }

    fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square.0][square.1]
    }

    /// Number of pieces the seat still has.
    pub fn piece_count(&self, seat: Seat) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|p| p.map(|p| p.owner) == Some(seat))
            .count()
    }

    /// Whether the piece on `from` can capture toward `(dr, dc)`.
    fn capture_open(&self, from: Square, dr: isize, dc: isize, owner: Seat) -> bool {
        let (mid_r, mid_c) = (from.0 as isize + dr, from.1 as isize + dc);
        let (to_r, to_c) = (from.0 as isize + 2 * dr, from.1 as isize + 2 * dc);
        if !in_bounds(to_r, to_c) {
            return false;
        }
        if self.squares[to_r as usize][to_c as usize].is_some() {
            return false;
        }
        matches!(
            self.squares[mid_r as usize][mid_c as usize],
            Some(jumped) if jumped.owner != owner
        )
    }

    /// Whether any of the seat's pieces has a capture available, scanning
    /// all four jump directions for every owned piece.
    pub fn capture_available(&self, seat: Seat) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let Some(piece) = self.squares[row][col] else {
                    continue;
                };
                if piece.owner != seat {
                    continue;
                }
                for dr in [-1isize, 1] {
                    for dc in [-1isize, 1] {
                        if self.capture_open((row, col), dr, dc, seat) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

impl Ruleset for Checkers {
    type Config = ();
    type Board = Board;
    type Move = Move;

    const NAME: &'static str = "checkers";

    fn initial_board(_: &(), _: &mut dyn RandomSource) -> Result<Board, GameError> {
        Ok(Board::starting())
    }

    fn apply_move(board: &mut Board, mover: Seat, mv: &Move) -> Result<Outcome, GameError> {
        if mv.from.0 >= SIZE || mv.from.1 >= SIZE || mv.to.0 >= SIZE || mv.to.1 >= SIZE {
            return Err(GameError::bad_request("square out of bounds"));
        }

        let piece = board
            .at(mv.from)
            .ok_or_else(|| GameError::bad_request("no piece on the source square"))?;
        if piece.owner != mover {
            return Err(GameError::bad_request("that piece is not yours"));
        }
        if board.at(mv.to).is_some() {
            return Err(GameError::bad_request("destination square is occupied"));
        }

        let dr = mv.to.0 as isize - mv.from.0 as isize;
        let dc = mv.to.1 as isize - mv.from.1 as isize;

        let captured = match (dr.abs(), dc.abs()) {
            (1, 1) => {
                // Simple step: forward only for men, either way for kings.
                if !piece.king && dr != forward(mover) {
                    return Err(GameError::bad_request("men only move forward"));
                }
                if board.capture_available(mover) {
                    return Err(GameError::bad_request(
                        "a capture is available and must be taken",
                    ));
                }
                None
            }
            (2, 2) => {
                let mid = (
                    (mv.from.0 as isize + dr / 2) as usize,
                    (mv.from.1 as isize + dc / 2) as usize,
                );
                match board.at(mid) {
                    Some(jumped) if jumped.owner != mover => Some(mid),
                    _ => {
                        return Err(GameError::bad_request(
                            "capture must jump an opposing piece",
                        ));
                    }
                }
            }
            _ => return Err(GameError::bad_request("move must be one or two diagonal steps")),
        };

        // Apply: lift, capture, land, promote on the landing row.
        board.squares[mv.from.0][mv.from.1] = None;
        if let Some(mid) = captured {
            board.squares[mid.0][mid.1] = None;
        }
        let promotion_row = match mover {
            Seat::Creator => SIZE - 1,
            Seat::Opponent => 0,
        };
        let landed = Piece {
            owner: mover,
            king: piece.king || mv.to.0 == promotion_row,
        };
        board.squares[mv.to.0][mv.to.1] = Some(landed);

        if captured.is_some() && board.piece_count(mover.other()) == 0 {
            return Ok(Outcome::Won(mover));
        }
        Ok(Outcome::Next)
    }
}
