//! Drawing/guessing game rooms.
//!
//! Up to eight players share a room identified by a short code. Each round
//! one player draws: the drawer picks one of three offered words, everyone
//! else guesses, and correct guesses earn points that decay with the round
//! clock. The round ends lazily — when every non-drawer has guessed the word
//! or when a participant reports the timer expired — and the drawer rotates
//! round-robin until the configured number of rounds completes.
//!
//! While a round is being drawn, the current word and the offered options
//! are hidden from everyone but the drawer; once the round ends the word
//! becomes visible to all participants. Projection happens at read time and
//! the store always holds the full truth.

use crate::error::GameError;
use crate::identity::{IdentityResolver, PlayerId};
use crate::notify::{GameEvent, NotificationSink};
use crate::random::RandomSource;
use crate::scoring::{self, Clock};
use crate::store::Store;
use crate::words::{DRAWING_WORDS, ROOM_CODE_ALPHABET};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Maximum players per room.
pub const MAX_PLAYERS: usize = 8;
/// Words offered to the drawer each round.
pub const WORD_OPTIONS: usize = 3;
/// Length of a room code.
pub const CODE_LENGTH: usize = 6;

/// Room lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomStatus {
    /// Players may join; the creator has not started the game.
    Waiting,
    /// The drawer is picking a word.
    ChoosingWord,
    /// The round clock is running and guesses are accepted.
    Drawing,
    /// All rounds played. Final.
    Completed,
    /// The creator withdrew before the game started. Final.
    Cancelled,
}

/// One participant and their cumulative score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPlayer {
    /// Player id.
    pub id: PlayerId,
    /// Cumulative score across rounds.
    pub score: u32,
}

/// One submitted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    /// Guessing player.
    pub player: PlayerId,
    /// Raw guess text.
    pub text: String,
    /// Whether it matched the current word.
    pub correct: bool,
    /// Submission instant.
    pub at: DateTime<Utc>,
    /// Points awarded (zero for wrong guesses).
    pub points: u32,
}

/// Creation-time options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Rounds to play.
    pub total_rounds: u32,
    /// Round clock in seconds.
    pub round_duration: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            total_rounds: 3,
            round_duration: 60,
        }
    }
}

/// Stored state of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Join code, also the record key.
    pub code: String,
    /// Lifecycle status.
    pub status: RoomStatus,
    /// Player who created the room.
    pub creator: PlayerId,
    /// Participants in join order.
    pub players: Vec<RoomPlayer>,
    /// Rounds to play.
    pub total_rounds: u32,
    /// Round clock in seconds.
    pub round_duration: u32,
    /// Current round, 1-based once started.
    pub current_round: u32,
    /// Index into `players` of the current drawer.
    pub drawer_index: usize,
    /// Words offered to the drawer this round.
    pub word_options: Vec<String>,
    /// The word being drawn. A finished round's word persists through the
    /// next choosing phase so guessers can see what it was.
    pub current_word: Option<String>,
    /// When the drawer picked the word.
    pub round_started_at: Option<DateTime<Utc>>,
    /// Opaque stroke payload from the drawer's client.
    pub drawing: String,
    /// Guesses submitted this round.
    pub guesses: Vec<Guess>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// The current drawer, once the game has started.
    pub fn drawer(&self) -> Option<&RoomPlayer> {
        match self.status {
            RoomStatus::ChoosingWord | RoomStatus::Drawing => self.players.get(self.drawer_index),
            _ => None,
        }
    }

    fn is_participant(&self, player: &str) -> bool {
        self.players.iter().any(|p| p.id == player)
    }

    /// Highest-scoring player; ties break to the earliest-joined since the
    /// list is in join order and the reduction keeps the first maximum.
    pub fn leader(&self) -> Option<&RoomPlayer> {
        self.players
            .iter()
            .fold(None, |best: Option<&RoomPlayer>, p| match best {
                Some(b) if b.score >= p.score => Some(b),
                _ => Some(p),
            })
    }

    /// Whether every non-drawer has guessed correctly this round.
    fn everyone_guessed(&self) -> bool {
        let drawer = self.drawer().map(|d| d.id.clone());
        self.players
            .iter()
            .filter(|p| Some(&p.id) != drawer.as_ref())
            .all(|p| {
                self.guesses
                    .iter()
                    .any(|g| g.correct && g.player == p.id)
            })
    }
}

/// Result of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessReport {
    /// Whether the guess matched.
    pub correct: bool,
    /// Points awarded.
    pub points: u32,
}

/// Viewer-specific projection of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    /// Join code.
    pub code: String,
    /// Lifecycle status.
    pub status: RoomStatus,
    /// Participants and scores, join order.
    pub players: Vec<RoomPlayer>,
    /// Rounds to play.
    pub total_rounds: u32,
    /// Round clock in seconds.
    pub round_duration: u32,
    /// Current round, 1-based once started.
    pub current_round: u32,
    /// Current drawer's id, once started.
    pub drawer: Option<PlayerId>,
    /// Word options; drawer only.
    pub word_options: Option<Vec<String>>,
    /// The word in play; hidden from non-drawers while the round is
    /// actively being drawn, visible once it ends.
    pub current_word: Option<String>,
    /// When the current round started.
    pub round_started_at: Option<DateTime<Utc>>,
    /// Opaque stroke payload.
    pub drawing: String,
    /// Guesses this round.
    pub guesses: Vec<Guess>,
}

/// Manager for drawing/guessing rooms.
pub struct QuickDrawService<S: Store<Room>> {
    store: S,
    identity: Arc<dyn IdentityResolver>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl<S: Store<Room>> QuickDrawService<S> {
    /// Creates a service over the given collaborators.
    pub fn new(
        store: S,
        identity: Arc<dyn IdentityResolver>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        info!("creating quickdraw service");
        Self {
            store,
            identity,
            sink,
            clock,
            rng: Mutex::new(rng),
        }
    }

    fn resolve(&self, credential: &str) -> Result<PlayerId, GameError> {
        self.identity
            .resolve(credential)
            .ok_or(GameError::Unauthenticated)
    }

    /// Creates a room and returns its join code.
    #[instrument(skip(self, credential, config))]
    pub fn create_room(
        &self,
        credential: &str,
        config: RoomConfig,
    ) -> Result<String, GameError> {
        let creator = self.resolve(credential)?;
        if config.total_rounds == 0 {
            return Err(GameError::bad_request("total rounds must be at least 1"));
        }
        if config.round_duration == 0 {
            return Err(GameError::bad_request("round duration must be positive"));
        }

        let room = Room {
            code: String::new(),
            status: RoomStatus::Waiting,
            creator: creator.clone(),
            players: vec![RoomPlayer {
                id: creator.clone(),
                score: 0,
            }],
            total_rounds: config.total_rounds,
            round_duration: config.round_duration,
            current_round: 0,
            drawer_index: 0,
            word_options: Vec::new(),
            current_word: None,
            round_started_at: None,
            drawing: String::new(),
            guesses: Vec::new(),
            created_at: self.clock.now(),
        };

        // Regenerate the code on collision; insert is atomic.
        let mut rng = self.rng.lock().unwrap();
        let code = loop {
            let candidate = room_code(rng.as_mut());
            let mut attempt = room.clone();
            attempt.code = candidate.clone();
            match self.store.insert(&candidate, attempt) {
                Ok(()) => break candidate,
                Err(GameError::Conflict(_)) => {
                    debug!(code = %candidate, "room code collision, regenerating");
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        info!(code = %code, creator = %creator, "room created");
        Ok(code)
    }

    /// Joins a waiting room by code.
    #[instrument(skip(self, credential))]
    pub fn join_room(&self, credential: &str, code: &str) -> Result<(), GameError> {
        let player = self.resolve(credential)?;

        self.store
            .update(code, |room| {
                if room.status != RoomStatus::Waiting {
                    warn!(code, status = %room.status, "join rejected");
                    return Err(GameError::bad_request("the game has already started"));
                }
                if room.is_participant(&player) {
                    return Err(GameError::bad_request("already in the room"));
                }
                if room.players.len() >= MAX_PLAYERS {
                    return Err(GameError::bad_request("room is full"));
                }
                room.players.push(RoomPlayer {
                    id: player.clone(),
                    score: 0,
                });
                info!(code, player = %player, "player joined room");
                Ok(())
            })
            .map_err(not_found_as_room(code))
    }

    /// Starts the game. Creator only, two players minimum.
    #[instrument(skip(self, credential))]
    pub fn start_game(&self, credential: &str, code: &str) -> Result<(), GameError> {
        let player = self.resolve(credential)?;
        let mut rng = self.rng.lock().unwrap();

        self.store
            .update(code, |room| {
                if room.creator != player {
                    return Err(GameError::forbidden("only the creator may start the game"));
                }
                if room.status != RoomStatus::Waiting {
                    return Err(GameError::bad_request("the game has already started"));
                }
                if room.players.len() < 2 {
                    return Err(GameError::bad_request("need at least 2 players"));
                }

                room.status = RoomStatus::ChoosingWord;
                room.current_round = 1;
                room.drawer_index = 0;
                room.word_options = offer_words(rng.as_mut());
                info!(code, round = room.current_round, "game started");
                Ok(())
            })
            .map_err(not_found_as_room(code))
    }

    /// Drawer picks one of the offered words and the round clock starts.
    #[instrument(skip(self, credential, word))]
    pub fn choose_word(
        &self,
        credential: &str,
        code: &str,
        word: &str,
    ) -> Result<(), GameError> {
        let player = self.resolve(credential)?;
        let now = self.clock.now();

        self.store
            .update(code, |room| {
                if !room.is_participant(&player) {
                    return Err(GameError::forbidden("not in this room"));
                }
                if room.status != RoomStatus::ChoosingWord {
                    return Err(GameError::bad_request("no word is being chosen"));
                }
                if room.drawer().map(|d| d.id.as_str()) != Some(player.as_str()) {
                    return Err(GameError::forbidden("only the drawer may choose the word"));
                }
                if !room.word_options.iter().any(|w| w == word) {
                    return Err(GameError::bad_request("word is not among the options"));
                }

                room.current_word = Some(word.to_string());
                room.guesses.clear();
                room.drawing.clear();
                room.round_started_at = Some(now);
                room.status = RoomStatus::Drawing;
                info!(code, round = room.current_round, "word chosen, drawing");
                Ok(())
            })
            .map_err(not_found_as_room(code))
    }

    /// Replaces the stroke payload. Drawer only, during drawing.
    #[instrument(skip(self, credential, data))]
    pub fn update_drawing(
        &self,
        credential: &str,
        code: &str,
        data: String,
    ) -> Result<(), GameError> {
        let player = self.resolve(credential)?;

        self.store
            .update(code, |room| {
                if !room.is_participant(&player) {
                    return Err(GameError::forbidden("not in this room"));
                }
                if room.status != RoomStatus::Drawing {
                    return Err(GameError::bad_request("no round in progress"));
                }
                if room.drawer().map(|d| d.id.as_str()) != Some(player.as_str()) {
                    return Err(GameError::forbidden("only the drawer may draw"));
                }
                room.drawing = data;
                Ok(())
            })
            .map_err(not_found_as_room(code))
    }

    /// Submits a guess. Non-drawer participants only, during drawing.
    #[instrument(skip(self, credential, text))]
    pub fn make_guess(
        &self,
        credential: &str,
        code: &str,
        text: &str,
    ) -> Result<GuessReport, GameError> {
        let player = self.resolve(credential)?;
        let now = self.clock.now();

        self.store
            .update(code, |room| {
                if !room.is_participant(&player) {
                    return Err(GameError::forbidden("not in this room"));
                }
                if room.status != RoomStatus::Drawing {
                    return Err(GameError::bad_request("no round in progress"));
                }
                if room.drawer().map(|d| d.id.as_str()) == Some(player.as_str()) {
                    return Err(GameError::forbidden("the drawer may not guess"));
                }
                if room
                    .guesses
                    .iter()
                    .any(|g| g.correct && g.player == player)
                {
                    return Err(GameError::bad_request("you already guessed the word"));
                }

                let word = room
                    .current_word
                    .as_deref()
                    .ok_or_else(|| GameError::bad_request("no word in play"))?;
                let correct = text.trim().eq_ignore_ascii_case(word);

                let points = if correct {
                    let started = room
                        .round_started_at
                        .ok_or_else(|| GameError::bad_request("round has not started"))?;
                    let elapsed = scoring::elapsed_seconds(started, now);
                    scoring::guess_points(room.round_duration, elapsed)
                } else {
                    0
                };

                room.guesses.push(Guess {
                    player: player.clone(),
                    text: text.to_string(),
                    correct,
                    at: now,
                    points,
                });
                if correct {
                    if let Some(p) = room.players.iter_mut().find(|p| p.id == player) {
                        p.score += points;
                    }
                    info!(code, player = %player, points, "correct guess");
                }

                Ok(GuessReport { correct, points })
            })
            .map_err(not_found_as_room(code))
    }

    /// Ends the round if everyone has guessed or the clock has expired.
    ///
    /// The round timer is evaluated lazily here — the engine owns no clock
    /// of its own, so a participant (or a client poll) must invoke this.
    #[instrument(skip(self, credential))]
    pub fn end_round(&self, credential: &str, code: &str) -> Result<(), GameError> {
        let player = self.resolve(credential)?;
        let now = self.clock.now();
        let mut rng = self.rng.lock().unwrap();

        let completed = self
            .store
            .update(code, |room| {
                if !room.is_participant(&player) {
                    return Err(GameError::forbidden("not in this room"));
                }
                if room.status != RoomStatus::Drawing {
                    return Err(GameError::bad_request("no round in progress"));
                }

                let started = room
                    .round_started_at
                    .ok_or_else(|| GameError::bad_request("round has not started"))?;
                let expired =
                    scoring::elapsed_seconds(started, now) >= room.round_duration as f64;
                if !room.everyone_guessed() && !expired {
                    return Err(GameError::bad_request("round is still active"));
                }

                if room.current_round >= room.total_rounds {
                    room.status = RoomStatus::Completed;
                    let winner = room.leader().map(|p| p.id.clone());
                    info!(code, winner = ?winner, "room completed");
                    return Ok(Some(winner));
                }

                // The finished round's word stays on the record so guessers
                // can see it; choose_word replaces it when the next round
                // starts.
                room.current_round += 1;
                room.drawer_index = (room.drawer_index + 1) % room.players.len();
                room.word_options = offer_words(rng.as_mut());
                room.round_started_at = None;
                room.status = RoomStatus::ChoosingWord;
                info!(code, round = room.current_round, "next round");
                Ok(None)
            })
            .map_err(not_found_as_room(code))?;

        if let Some(winner) = completed {
            self.sink.notify(GameEvent::Completed {
                game: "quickdraw".to_string(),
                session_id: code.to_string(),
                winner,
            });
        }
        Ok(())
    }

    /// Cancels a room nobody has started yet. Creator only.
    #[instrument(skip(self, credential))]
    pub fn cancel_room(&self, credential: &str, code: &str) -> Result<(), GameError> {
        let player = self.resolve(credential)?;

        self.store
            .update(code, |room| {
                if room.creator != player {
                    return Err(GameError::forbidden("only the creator may cancel"));
                }
                if room.status != RoomStatus::Waiting {
                    return Err(GameError::bad_request(
                        "only a waiting room can be cancelled",
                    ));
                }
                room.status = RoomStatus::Cancelled;
                info!(code, "room cancelled");
                Ok(())
            })
            .map_err(not_found_as_room(code))
    }

    /// Returns the room as seen by the given viewer.
    #[instrument(skip(self, credential))]
    pub fn get_room(&self, credential: &str, code: &str) -> Result<RoomView, GameError> {
        let viewer = self.resolve(credential)?;
        let room = self
            .store
            .read(code)?
            .ok_or_else(|| GameError::NotFound(format!("room {code}")))?;

        // The word is secret only while a round is actively being drawn.
        let is_drawer = room.drawer().map(|d| d.id.as_str()) == Some(viewer.as_str());
        let reveal = is_drawer || room.status != RoomStatus::Drawing;

        Ok(RoomView {
            code: room.code.clone(),
            status: room.status,
            players: room.players.clone(),
            total_rounds: room.total_rounds,
            round_duration: room.round_duration,
            current_round: room.current_round,
            drawer: room.drawer().map(|d| d.id.clone()),
            word_options: is_drawer.then(|| room.word_options.clone()),
            current_word: if reveal { room.current_word.clone() } else { None },
            round_started_at: room.round_started_at,
            drawing: room.drawing.clone(),
            guesses: room.guesses.clone(),
        })
    }
}

fn room_code(rng: &mut dyn RandomSource) -> String {
    (0..CODE_LENGTH)
        .map(|_| ROOM_CODE_ALPHABET[rng.next_below(ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Three distinct words from the drawing pool.
fn offer_words(rng: &mut dyn RandomSource) -> Vec<String> {
    let mut options: Vec<String> = Vec::with_capacity(WORD_OPTIONS);
    while options.len() < WORD_OPTIONS {
        let word = DRAWING_WORDS[rng.next_below(DRAWING_WORDS.len())];
        if !options.iter().any(|w| w == word) {
            options.push(word.to_string());
        }
    }
    options
}

fn not_found_as_room(code: &str) -> impl FnOnce(GameError) -> GameError + '_ {
    move |err| match err {
        GameError::NotFound(_) => GameError::NotFound(format!("room {code}")),
        other => other,
    }
}
