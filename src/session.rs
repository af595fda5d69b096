//! Shared session lifecycle for the turn-based variants.
//!
//! Every two-seat game (tic-tac-toe, connect four, checkers, the puzzle
//! race) plays out the same way: a creator opens a `Waiting` session,
//! optionally restricted to one invited player; an opponent joins and the
//! session goes `InProgress` with the creator moving first; moves mutate the
//! board one atomic transaction at a time until a terminal rule fires or the
//! creator cancels the unjoined session. The variant supplies only a
//! [`Ruleset`]; the lifecycle, matchmaking, and turn enforcement live here
//! once.

use crate::error::GameError;
use crate::identity::{IdentityResolver, PlayerId};
use crate::notify::{GameEvent, NotificationSink};
use crate::random::RandomSource;
use crate::scoring::Clock;
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Which side of a two-seat session a player occupies.
///
/// The creator always holds the canonical first-moving marker of the
/// variant (X, red, player one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    /// The session initiator.
    Creator,
    /// The joining player.
    Opponent,
}

impl Seat {
    /// Returns the other seat.
    pub fn other(self) -> Self {
        match self {
            Seat::Creator => Seat::Opponent,
            Seat::Opponent => Seat::Creator,
        }
    }
}

/// Lifecycle status shared by the two-seat variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    /// Created, waiting for an opponent.
    Waiting,
    /// Both seats filled, accepting moves.
    InProgress,
    /// A terminal rule fired. Final.
    Completed,
    /// Creator withdrew before anyone joined. Final.
    Cancelled,
}

impl SessionStatus {
    /// Whether the status can never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

/// Result of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Winning player; absent on a draw.
    pub winner: Option<PlayerId>,
    /// Whether the session ended drawn.
    pub is_draw: bool,
    /// When the terminal rule fired.
    pub completed_at: DateTime<Utc>,
}

/// What a legal move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Game continues; on alternating variants the turn passes.
    Next,
    /// The given seat won.
    Won(Seat),
    /// Terminal with no winner.
    Draw,
}

/// Pure rules of one game variant.
///
/// Implementations hold no state: the board is the state, and `apply_move`
/// is the only mutation path. The enclosing transaction discards the draft
/// board whenever a move is rejected, so partial writes are never observed.
pub trait Ruleset: Clone + Send + 'static {
    /// Creation-time options (board dimensions, race mode).
    type Config: Clone + Default + fmt::Debug + Send;
    /// Variant board payload. Shape is fixed at creation and never resized.
    type Board: Clone + fmt::Debug + Send + Serialize + DeserializeOwned;
    /// One submitted move.
    type Move: fmt::Debug;

    /// Variant name used in session ids, events, and logs.
    const NAME: &'static str;

    /// Whether movers alternate strictly. Turnless variants (the puzzle
    /// race) let any active participant move at any time.
    const ALTERNATING: bool = true;

    /// Canonical start state for the board.
    fn initial_board(
        config: &Self::Config,
        rng: &mut dyn RandomSource,
    ) -> Result<Self::Board, GameError>;

    /// Validates and applies one move for the given seat.
    fn apply_move(
        board: &mut Self::Board,
        mover: Seat,
        mv: &Self::Move,
    ) -> Result<Outcome, GameError>;

    /// Whether this configuration plays without an opponent. Solo sessions
    /// skip matchmaking and start `InProgress`.
    fn solo(_config: &Self::Config) -> bool {
        false
    }
}

/// One instance of a game being played.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "R::Board: Serialize",
    deserialize = "R::Board: Deserialize<'de>"
))]
pub struct Session<R: Ruleset> {
    /// Opaque identifier, assigned at creation.
    pub id: SessionId,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Session initiator. Immutable.
    pub creator: PlayerId,
    /// Joined opponent, absent while `Waiting` and for solo sessions.
    pub opponent: Option<PlayerId>,
    /// If set, only this player may join.
    pub invited: Option<PlayerId>,
    /// Seat expected to move next (alternating variants only).
    pub to_move: Seat,
    /// Variant board payload.
    pub board: R::Board,
    /// Populated exactly when `status == Completed`.
    pub result: Option<Verdict>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl<R: Ruleset> Session<R> {
    /// Returns the seat the player occupies, if a participant.
    pub fn seat_of(&self, player: &str) -> Option<Seat> {
        if self.creator == player {
            Some(Seat::Creator)
        } else if self.opponent.as_deref() == Some(player) {
            Some(Seat::Opponent)
        } else {
            None
        }
    }

    /// Returns the player occupying the seat, if filled.
    pub fn player_at(&self, seat: Seat) -> Option<&PlayerId> {
        match seat {
            Seat::Creator => Some(&self.creator),
            Seat::Opponent => self.opponent.as_ref(),
        }
    }

    fn complete(&mut self, winner: Option<PlayerId>, now: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.result = Some(Verdict {
            is_draw: winner.is_none(),
            winner,
            completed_at: now,
        });
    }
}

/// Session manager for one game variant.
///
/// Holds the external collaborators (store, identity, notification sink,
/// clock, randomness) and exposes the operation surface of the variant.
/// Every mutation is a single atomic [`Store::update`]; concurrent attempts
/// on one session serialize in the store, and the loser's precondition
/// checks see the committed state.
pub struct GameService<R: Ruleset, S: Store<Session<R>>> {
    store: S,
    identity: Arc<dyn IdentityResolver>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource>>,
    _ruleset: PhantomData<R>,
}

impl<R: Ruleset, S: Store<Session<R>>> GameService<R, S> {
    /// Creates a service over the given collaborators.
    pub fn new(
        store: S,
        identity: Arc<dyn IdentityResolver>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        info!(game = R::NAME, "creating game service");
        Self {
            store,
            identity,
            sink,
            clock,
            rng: Mutex::new(rng),
            _ruleset: PhantomData,
        }
    }

    fn resolve(&self, credential: &str) -> Result<PlayerId, GameError> {
        self.identity
            .resolve(credential)
            .ok_or(GameError::Unauthenticated)
    }

    /// Creates a session in its canonical start state.
    ///
    /// With `invited` set, only that player may later join, and an invite
    /// event goes to the notification sink. Solo configurations start
    /// `InProgress` immediately.
    #[instrument(skip(self, credential, config), fields(game = R::NAME))]
    pub fn create(
        &self,
        credential: &str,
        config: R::Config,
        invited: Option<PlayerId>,
    ) -> Result<SessionId, GameError> {
        let creator = self.resolve(credential)?;
        if invited.as_deref() == Some(creator.as_str()) {
            return Err(GameError::bad_request("cannot invite yourself"));
        }

        let mut rng = self.rng.lock().unwrap();
        let board = R::initial_board(&config, rng.as_mut())?;
        let solo = R::solo(&config);

        let session = Session::<R> {
            id: String::new(),
            status: if solo {
                SessionStatus::InProgress
            } else {
                SessionStatus::Waiting
            },
            creator: creator.clone(),
            opponent: None,
            invited: invited.clone(),
            to_move: Seat::Creator,
            board,
            result: None,
            created_at: self.clock.now(),
        };

        // Retry on the (unlikely) id collision; insert is atomic.
        let id = loop {
            let candidate = format!("{}-{:08x}", R::NAME, random_u32(rng.as_mut()));
            let mut attempt = session.clone();
            attempt.id = candidate.clone();
            match self.store.insert(&candidate, attempt) {
                Ok(()) => break candidate,
                Err(GameError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        };
        drop(rng);

        info!(session_id = %id, creator = %creator, solo, "session created");

        if let Some(to) = invited {
            self.sink.notify(GameEvent::Invite {
                from: creator,
                to,
                game: R::NAME.to_string(),
                session_id: id.clone(),
            });
        }

        Ok(id)
    }

    /// Joins a `Waiting` session as the opponent.
    #[instrument(skip(self, credential), fields(game = R::NAME))]
    pub fn join(&self, credential: &str, session_id: &str) -> Result<(), GameError> {
        let player = self.resolve(credential)?;

        self.store
            .update(session_id, |session| {
                if session.status != SessionStatus::Waiting {
                    warn!(session_id, status = %session.status, "join rejected");
                    return Err(GameError::bad_request("session is not open for joining"));
                }
                if session.creator == player {
                    return Err(GameError::bad_request("cannot join your own session"));
                }
                if let Some(invited) = &session.invited {
                    if invited != &player {
                        return Err(GameError::forbidden("session is invite-only"));
                    }
                }

                session.opponent = Some(player.clone());
                session.status = SessionStatus::InProgress;
                session.to_move = Seat::Creator;
                info!(session_id, opponent = %player, "opponent joined");
                Ok(())
            })
            .map_err(not_found_as_session(session_id))
    }

    /// Applies one move and returns the resulting session snapshot.
    #[instrument(skip(self, credential, mv), fields(game = R::NAME))]
    pub fn make_move(
        &self,
        credential: &str,
        session_id: &str,
        mv: R::Move,
    ) -> Result<Session<R>, GameError> {
        let player = self.resolve(credential)?;
        let now = self.clock.now();

        let after = self
            .store
            .update(session_id, |session| {
                let seat = session
                    .seat_of(&player)
                    .ok_or_else(|| GameError::forbidden("not a participant"))?;

                if session.status != SessionStatus::InProgress {
                    warn!(session_id, status = %session.status, "move in wrong status");
                    return Err(GameError::bad_request("session is not accepting moves"));
                }
                if R::ALTERNATING && session.to_move != seat {
                    debug!(session_id, player = %player, "move out of turn");
                    return Err(GameError::bad_request("not your turn"));
                }

                match R::apply_move(&mut session.board, seat, &mv)? {
                    Outcome::Next => {
                        if R::ALTERNATING {
                            session.to_move = seat.other();
                        }
                    }
                    Outcome::Won(winner_seat) => {
                        let winner = session
                            .player_at(winner_seat)
                            .cloned()
                            .ok_or_else(|| GameError::bad_request("winning seat is empty"))?;
                        session.complete(Some(winner), now);
                    }
                    Outcome::Draw => session.complete(None, now),
                }

                info!(
                    session_id,
                    player = %player,
                    status = %session.status,
                    "move applied"
                );
                Ok(session.clone())
            })
            .map_err(not_found_as_session(session_id))?;

        if let Some(verdict) = &after.result {
            self.sink.notify(GameEvent::Completed {
                game: R::NAME.to_string(),
                session_id: session_id.to_string(),
                winner: verdict.winner.clone(),
            });
        }

        Ok(after)
    }

    /// Cancels a session. Creator only, `Waiting` only.
    #[instrument(skip(self, credential), fields(game = R::NAME))]
    pub fn cancel(&self, credential: &str, session_id: &str) -> Result<(), GameError> {
        let player = self.resolve(credential)?;

        self.store
            .update(session_id, |session| {
                if session.creator != player {
                    return Err(GameError::forbidden("only the creator may cancel"));
                }
                if session.status != SessionStatus::Waiting {
                    return Err(GameError::bad_request(
                        "only a waiting session can be cancelled",
                    ));
                }
                session.status = SessionStatus::Cancelled;
                info!(session_id, "session cancelled");
                Ok(())
            })
            .map_err(not_found_as_session(session_id))
    }

    /// Returns the session as seen by the given viewer.
    ///
    /// The two-seat variants carry no hidden information, so the projection
    /// is the full session; variants with secrets (drawing, word guess) have
    /// their own managers and redacting views.
    #[instrument(skip(self, credential), fields(game = R::NAME))]
    pub fn get(&self, credential: &str, session_id: &str) -> Result<Session<R>, GameError> {
        self.resolve(credential)?;
        self.store
            .read(session_id)?
            .ok_or_else(|| GameError::session_not_found(session_id))
    }
}

fn random_u32(rng: &mut dyn RandomSource) -> u32 {
    rng.next_below(u32::MAX as usize) as u32
}

fn not_found_as_session(id: &str) -> impl FnOnce(GameError) -> GameError + '_ {
    move |err| match err {
        GameError::NotFound(_) => GameError::session_not_found(id),
        other => other,
    }
}
