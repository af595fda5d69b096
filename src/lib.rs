//! Parlor Games - the turn-based multiplayer game engine.
//!
//! Six game variants share one session lifecycle, matchmaking model, and
//! move-validation discipline:
//!
//! - **Two-seat variants** (tic-tac-toe, connect four, checkers, the sliding
//!   puzzle race) supply a [`Ruleset`] and run on the shared [`GameService`].
//! - **Drawing/guessing rooms** and the **daily word game** carry their own
//!   state machines behind the same collaborators and error taxonomy.
//!
//! External concerns are injected at the seams: an atomic [`Store`] for
//! records, an [`IdentityResolver`] for caller identity, a [`Clock`] and
//! [`RandomSource`] for time and randomness, and a [`NotificationSink`] for
//! fire-and-forget events. Every mutation is a single atomic
//! read-modify-write against one record; read operations derive
//! viewer-specific projections that redact hidden information.
//!
//! # Example
//!
//! ```
//! use parlor_games::{
//!     GameService, MemoryStore, NullSink, PassthroughResolver, SeededRandom,
//!     SystemClock, games::tictactoe::{Move, TicTacToe},
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), parlor_games::GameError> {
//! let service: GameService<TicTacToe, _> = GameService::new(
//!     MemoryStore::new(),
//!     Arc::new(PassthroughResolver),
//!     Arc::new(NullSink),
//!     Arc::new(SystemClock),
//!     Box::new(SeededRandom::new(42)),
//! );
//!
//! let id = service.create("alice", (), None)?;
//! service.join("bob", &id)?;
//! service.make_move("alice", &id, Move { position: 4 })?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod error;
mod identity;
mod notify;
mod random;
mod scoring;
mod session;
mod store;
mod words;

// Game rule modules, public per variant
pub mod games;

// Crate-level exports - errors
pub use error::GameError;

// Crate-level exports - external collaborators
pub use identity::{IdentityResolver, PassthroughResolver, PlayerId, StaticResolver};
pub use notify::{GameEvent, NotificationSink, NullSink, RecordingSink};
pub use random::{RandomSource, SeededRandom, ThreadRandom, pick, shuffle};
pub use scoring::{Clock, FixedClock, SystemClock, elapsed_seconds, guess_points};
pub use store::{MemoryStore, Store};

// Crate-level exports - shared session lifecycle
pub use session::{
    GameService, Outcome, Ruleset, Seat, Session, SessionId, SessionStatus, Verdict,
};

// Crate-level exports - word tables
pub use words::{DRAWING_WORDS, ROOM_CODE_ALPHABET, WORD_LIST, WordEntry};
