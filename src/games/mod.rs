//! Game rule modules, one per variant.
//!
//! The two-seat variants implement [`Ruleset`](crate::session::Ruleset) and
//! run on the shared [`GameService`](crate::session::GameService); the
//! drawing room and the daily word game carry their own state machines and
//! managers.

pub mod checkers;
pub mod connect_four;
pub mod quickdraw;
pub mod sliding_puzzle;
pub mod tictactoe;
pub mod word_guess;
