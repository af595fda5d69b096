//! Daily word-guess game.
//!
//! One session per player per UTC calendar day. The target comes uniformly
//! at random from the curated list in [`crate::words`]; guesses must be
//! exactly five letters and appear in the same list. Letter scoring is the
//! two-pass algorithm that never credits a guess letter more times than it
//! occurs in the target. The target and its hint stay out of every
//! projection, including the player's own, until the game finishes.

use crate::error::GameError;
use crate::identity::{IdentityResolver, PlayerId};
use crate::random::{RandomSource, pick};
use crate::scoring::Clock;
use crate::store::Store;
use crate::words::{self, WordEntry};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

/// Target and guess length.
pub const WORD_LENGTH: usize = 5;
/// Guesses allowed before the game is lost.
pub const MAX_GUESSES: usize = 6;

/// Per-letter verdict for one guess position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterMark {
    /// Right letter, right position.
    Correct,
    /// Letter occurs elsewhere in the target.
    Present,
    /// Letter does not occur (or its occurrences are used up).
    Absent,
}

/// One scored guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRow {
    /// The guessed word, normalized to lowercase.
    pub word: String,
    /// Position-by-position marks.
    pub marks: [LetterMark; WORD_LENGTH],
    /// When the guess was submitted.
    pub at: DateTime<Utc>,
}

/// Lifecycle of a daily session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WordGuessStatus {
    /// Accepting guesses.
    InProgress,
    /// All five positions correct.
    Won,
    /// Six guesses spent without winning. Final.
    Lost,
}

/// Stored state of one player-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSession {
    /// Owning player.
    pub player: PlayerId,
    /// UTC day this session belongs to.
    pub date: NaiveDate,
    /// Target word. Never serialized out through projections in progress.
    pub target: String,
    /// Category hint for the target.
    pub hint: String,
    /// Scored guesses so far.
    pub guesses: Vec<GuessRow>,
    /// Lifecycle status.
    pub status: WordGuessStatus,
    /// When the game finished.
    pub completed_at: Option<DateTime<Utc>>,
}

/// What the player sees. The target and hint appear only after the game
/// finishes; the store always holds the full truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGuessView {
    /// UTC day of the session.
    pub date: NaiveDate,
    /// Scored guesses so far.
    pub guesses: Vec<GuessRow>,
    /// Lifecycle status.
    pub status: WordGuessStatus,
    /// Guesses left before the game is lost.
    pub remaining: usize,
    /// Target word, revealed on completion.
    pub target: Option<String>,
    /// Category hint, revealed on completion.
    pub hint: Option<String>,
}

/// Lifetime aggregates for one player, updated when a game completes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Completed games.
    pub played: u32,
    /// Games won.
    pub won: u32,
    /// Consecutive wins, reset by a loss.
    pub current_streak: u32,
    /// Longest win streak seen.
    pub max_streak: u32,
    /// Wins by guess count; index 0 is a first-guess win.
    pub distribution: [u32; MAX_GUESSES],
}

/// Two-pass letter scoring.
///
/// Pass one consumes exact positional matches; pass two scans the remaining
/// target positions left-to-right for each unmatched guess letter. The order
/// matters: it stops duplicate guess letters being credited beyond their
/// count in the target.
pub fn score_guess(guess: &str, target: &str) -> [LetterMark; WORD_LENGTH] {
    let g: Vec<char> = guess.chars().collect();
    let t: Vec<char> = target.chars().collect();
    debug_assert_eq!(g.len(), WORD_LENGTH);
    debug_assert_eq!(t.len(), WORD_LENGTH);

    let mut marks = [LetterMark::Absent; WORD_LENGTH];
    let mut consumed = [false; WORD_LENGTH];

    for i in 0..WORD_LENGTH {
        if g[i] == t[i] {
            marks[i] = LetterMark::Correct;
            consumed[i] = true;
        }
    }
    for i in 0..WORD_LENGTH {
        if marks[i] == LetterMark::Correct {
            continue;
        }
        if let Some(j) = (0..WORD_LENGTH).find(|&j| !consumed[j] && t[j] == g[i]) {
            marks[i] = LetterMark::Present;
            consumed[j] = true;
        }
    }
    marks
}

fn session_key(player: &str, date: NaiveDate) -> String {
    format!("{player}:{date}")
}

fn project(session: &WordSession) -> WordGuessView {
    let finished = session.status != WordGuessStatus::InProgress;
    WordGuessView {
        date: session.date,
        guesses: session.guesses.clone(),
        status: session.status,
        remaining: MAX_GUESSES - session.guesses.len(),
        target: finished.then(|| session.target.clone()),
        hint: finished.then(|| session.hint.clone()),
    }
}

/// Manager for the daily word game.
///
/// Sessions and per-player stats live in two stores; a completed game
/// updates both in the same logical operation.
pub struct WordGuessService<S, T>
where
    S: Store<WordSession>,
    T: Store<PlayerStats>,
{
    sessions: S,
    stats: T,
    identity: Arc<dyn IdentityResolver>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource>>,
}

impl<S, T> WordGuessService<S, T>
where
    S: Store<WordSession>,
    T: Store<PlayerStats>,
{
    /// Creates a service over the given collaborators.
    pub fn new(
        sessions: S,
        stats: T,
        identity: Arc<dyn IdentityResolver>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        info!("creating word-guess service");
        Self {
            sessions,
            stats,
            identity,
            clock,
            rng: Mutex::new(rng),
        }
    }

    fn resolve(&self, credential: &str) -> Result<PlayerId, GameError> {
        self.identity
            .resolve(credential)
            .ok_or(GameError::Unauthenticated)
    }

    /// Starts today's game for the caller.
    ///
    /// A second same-day creation is rejected with [`GameError::Conflict`].
    #[instrument(skip(self, credential))]
    pub fn start(&self, credential: &str) -> Result<WordGuessView, GameError> {
        let player = self.resolve(credential)?;
        let today = self.clock.now().date_naive();
        let key = session_key(&player, today);

        // Check before drawing a target so a rejected retry leaves the
        // random sequence untouched.
        if self.sessions.read(&key)?.is_some() {
            warn!(player = %player, %today, "duplicate same-day session");
            return Err(GameError::Conflict("today's game already exists".into()));
        }

        let entry: &WordEntry = {
            let mut rng = self.rng.lock().unwrap();
            pick(rng.as_mut(), words::WORD_LIST)
        };

        let session = WordSession {
            player: player.clone(),
            date: today,
            target: entry.word.to_string(),
            hint: entry.hint.to_string(),
            guesses: Vec::new(),
            status: WordGuessStatus::InProgress,
            completed_at: None,
        };

        // Insert still guards the race with a concurrent creation.
        self.sessions
            .insert(&key, session.clone())
            .map_err(|err| match err {
                GameError::Conflict(_) => {
                    warn!(player = %player, %today, "duplicate same-day session");
                    GameError::Conflict("today's game already exists".into())
                }
                other => other,
            })?;

        info!(player = %player, %today, "daily word session created");
        Ok(project(&session))
    }

    /// Submits one guess against today's game.
    #[instrument(skip(self, credential, word))]
    pub fn guess(&self, credential: &str, word: &str) -> Result<WordGuessView, GameError> {
        let player = self.resolve(credential)?;
        let now = self.clock.now();
        let today = now.date_naive();

        let normalized = word.trim().to_ascii_lowercase();
        if normalized.len() != WORD_LENGTH
            || !normalized.chars().all(|c| c.is_ascii_lowercase())
        {
            return Err(GameError::bad_request("guess must be exactly 5 letters"));
        }
        if words::lookup(&normalized).is_none() {
            return Err(GameError::bad_request("guess is not in the word list"));
        }

        let key = session_key(&player, today);
        let after = self
            .sessions
            .update(&key, |session| {
                if session.status != WordGuessStatus::InProgress {
                    return Err(GameError::bad_request("today's game is already finished"));
                }

                let marks = score_guess(&normalized, &session.target);
                session.guesses.push(GuessRow {
                    word: normalized.clone(),
                    marks,
                    at: now,
                });

                if marks.iter().all(|m| *m == LetterMark::Correct) {
                    session.status = WordGuessStatus::Won;
                    session.completed_at = Some(now);
                } else if session.guesses.len() >= MAX_GUESSES {
                    session.status = WordGuessStatus::Lost;
                    session.completed_at = Some(now);
                }
                Ok(session.clone())
            })
            .map_err(|err| match err {
                GameError::NotFound(_) => GameError::NotFound("no game for today".into()),
                other => other,
            })?;

        if after.status != WordGuessStatus::InProgress {
            self.record_completion(&player, &after)?;
            info!(player = %player, status = %after.status, "daily word session finished");
        }

        Ok(project(&after))
    }

    /// Returns the caller's session for the current UTC day, if any.
    #[instrument(skip(self, credential))]
    pub fn todays_game(&self, credential: &str) -> Result<Option<WordGuessView>, GameError> {
        let player = self.resolve(credential)?;
        let today = self.clock.now().date_naive();
        let session = self.sessions.read(&session_key(&player, today))?;
        Ok(session.as_ref().map(project))
    }

    /// Returns the caller's lifetime stats.
    #[instrument(skip(self, credential))]
    pub fn player_stats(&self, credential: &str) -> Result<PlayerStats, GameError> {
        let player = self.resolve(credential)?;
        Ok(self.stats.read(&player)?.unwrap_or_default())
    }

    fn record_completion(&self, player: &str, session: &WordSession) -> Result<(), GameError> {
        if self.stats.read(player)?.is_none() {
            // A racing insert is fine; the update below sees either copy.
            let _ = self.stats.insert(player, PlayerStats::default());
        }
        self.stats.update(player, |stats| {
            stats.played += 1;
            if session.status == WordGuessStatus::Won {
                stats.won += 1;
                stats.current_streak += 1;
                stats.max_streak = stats.max_streak.max(stats.current_streak);
                stats.distribution[session.guesses.len() - 1] += 1;
            } else {
                stats.current_streak = 0;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterMark::{Absent, Correct, Present};

    #[test]
    fn all_correct_on_exact_match() {
        assert_eq!(score_guess("apple", "apple"), [Correct; 5]);
    }

    #[test]
    fn disjoint_words_are_all_absent() {
        assert_eq!(score_guess("brown", "flute"), [Absent; 5]);
    }

    #[test]
    fn duplicate_guess_letters_never_outnumber_target_occurrences() {
        // target "geese" has three e's; guess "eagle" has two.
        assert_eq!(
            score_guess("eagle", "geese"),
            [Present, Absent, Present, Absent, Correct]
        );
        // target "level" has two l's; guess "llama" also has two, one exact.
        assert_eq!(
            score_guess("llama", "level"),
            [Correct, Present, Absent, Absent, Absent]
        );
        // target "onion" has two o's and two n's; "melon" hits one of each.
        assert_eq!(
            score_guess("melon", "onion"),
            [Absent, Absent, Absent, Correct, Correct]
        );
    }

    #[test]
    fn exact_matches_consume_before_present_scan() {
        // The exact match at position 3 consumes that target 's' first;
        // the leading 's' then takes the remaining one.
        assert_eq!(
            score_guess("salsa", "grass"),
            [Present, Present, Absent, Correct, Absent]
        );
    }

    #[test]
    fn rejected_duplicate_start_consumes_no_randomness() {
        use crate::identity::PassthroughResolver;
        use crate::random::SeededRandom;
        use crate::scoring::FixedClock;
        use crate::store::MemoryStore;
        use chrono::{TimeZone, Utc};

        let service = || {
            WordGuessService::new(
                MemoryStore::new(),
                MemoryStore::new(),
                Arc::new(PassthroughResolver),
                Arc::new(FixedClock::new(
                    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
                )),
                Box::new(SeededRandom::new(21)),
            )
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let with_retry = service();
        with_retry.start("alice").unwrap();
        assert!(matches!(
            with_retry.start("alice"),
            Err(GameError::Conflict(_))
        ));
        with_retry.start("bob").unwrap();
        with_retry.start("carol").unwrap();

        let clean = service();
        clean.start("alice").unwrap();
        clean.start("bob").unwrap();
        clean.start("carol").unwrap();

        // Both services drew from the same seed, so later players get the
        // same targets whether or not a duplicate creation was rejected in
        // between.
        for player in ["alice", "bob", "carol"] {
            let key = session_key(player, date);
            let a = with_retry.sessions.read(&key).unwrap().unwrap().target;
            let b = clean.sessions.read(&key).unwrap().unwrap().target;
            assert_eq!(a, b, "target diverged for {player}");
        }
    }
}
