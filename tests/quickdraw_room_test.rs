//! End-to-end tests for drawing/guessing rooms, driven by a pinned clock.

use chrono::{Duration, TimeZone, Utc};
use parlor_games::games::quickdraw::{
    CODE_LENGTH, QuickDrawService, Room, RoomConfig, RoomStatus,
};
use parlor_games::{
    FixedClock, GameError, GameEvent, MemoryStore, PassthroughResolver, RecordingSink,
    ROOM_CODE_ALPHABET, SeededRandom,
};
use std::sync::Arc;

struct Fixture {
    svc: QuickDrawService<MemoryStore<Room>>,
    clock: Arc<FixedClock>,
    sink: Arc<RecordingSink>,
}

fn fixture() -> Fixture {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let sink = Arc::new(RecordingSink::new());
    let svc = QuickDrawService::new(
        MemoryStore::new(),
        Arc::new(PassthroughResolver),
        sink.clone(),
        clock.clone(),
        Box::new(SeededRandom::new(7)),
    );
    Fixture { svc, clock, sink }
}

/// Creates a two-round room with alice, bob, and carol, started and with
/// alice (the creator) drawing.
fn started_room(f: &Fixture) -> String {
    let code = f
        .svc
        .create_room(
            "alice",
            RoomConfig {
                total_rounds: 2,
                round_duration: 60,
            },
        )
        .unwrap();
    f.svc.join_room("bob", &code).unwrap();
    f.svc.join_room("carol", &code).unwrap();
    f.svc.start_game("alice", &code).unwrap();
    code
}

/// The drawer picks the first offered word and returns it.
fn pick_first_word(f: &Fixture, code: &str, drawer: &str) -> String {
    let view = f.svc.get_room(drawer, code).unwrap();
    let word = view.word_options.expect("drawer sees options")[0].clone();
    f.svc.choose_word(drawer, code, &word).unwrap();
    word
}

#[test]
fn room_codes_come_from_the_unambiguous_alphabet() {
    let f = fixture();
    let code = f.svc.create_room("alice", RoomConfig::default()).unwrap();
    assert_eq!(code.len(), CODE_LENGTH);
    assert!(code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
}

#[test]
fn joining_is_waiting_only_and_capped() {
    let f = fixture();
    let code = f.svc.create_room("alice", RoomConfig::default()).unwrap();

    f.svc.join_room("bob", &code).unwrap();
    assert!(matches!(
        f.svc.join_room("bob", &code),
        Err(GameError::BadRequest(_))
    ));

    // Fill to eight, then reject the ninth.
    for player in ["p3", "p4", "p5", "p6", "p7", "p8"] {
        f.svc.join_room(player, &code).unwrap();
    }
    assert!(matches!(
        f.svc.join_room("p9", &code),
        Err(GameError::BadRequest(_))
    ));

    assert!(matches!(
        f.svc.join_room("late", "ZZZZZZ"),
        Err(GameError::NotFound(_))
    ));
}

#[test]
fn start_requires_the_creator_and_two_players() {
    let f = fixture();
    let code = f.svc.create_room("alice", RoomConfig::default()).unwrap();

    assert!(matches!(
        f.svc.start_game("alice", &code),
        Err(GameError::BadRequest(_)) // alone in the room
    ));
    f.svc.join_room("bob", &code).unwrap();
    assert!(matches!(
        f.svc.start_game("bob", &code),
        Err(GameError::Forbidden(_))
    ));
    f.svc.start_game("alice", &code).unwrap();

    let view = f.svc.get_room("alice", &code).unwrap();
    assert_eq!(view.status, RoomStatus::ChoosingWord);
    assert_eq!(view.current_round, 1);
    assert_eq!(view.drawer.as_deref(), Some("alice"));

    // Joining after start is rejected.
    assert!(matches!(
        f.svc.join_room("carol", &code),
        Err(GameError::BadRequest(_))
    ));
}

#[test]
fn word_options_and_word_are_hidden_from_guessers() {
    let f = fixture();
    let code = started_room(&f);

    let alice_view = f.svc.get_room("alice", &code).unwrap();
    assert_eq!(alice_view.word_options.as_ref().map(Vec::len), Some(3));
    let bob_view = f.svc.get_room("bob", &code).unwrap();
    assert!(bob_view.word_options.is_none());

    let word = pick_first_word(&f, &code, "alice");
    assert_eq!(
        f.svc.get_room("alice", &code).unwrap().current_word.as_deref(),
        Some(word.as_str())
    );
    assert!(f.svc.get_room("bob", &code).unwrap().current_word.is_none());
}

#[test]
fn only_the_drawer_chooses_and_only_from_the_options() {
    let f = fixture();
    let code = started_room(&f);

    assert!(matches!(
        f.svc.choose_word("bob", &code, "house"),
        Err(GameError::Forbidden(_))
    ));
    assert!(matches!(
        f.svc.choose_word("alice", &code, "not-an-option"),
        Err(GameError::BadRequest(_))
    ));
    pick_first_word(&f, &code, "alice");
    assert_eq!(
        f.svc.get_room("alice", &code).unwrap().status,
        RoomStatus::Drawing
    );
}

#[test]
fn guess_scoring_decays_from_150_to_100() {
    let f = fixture();
    let code = started_room(&f);
    let word = pick_first_word(&f, &code, "alice");

    // Instant guess: full credit. Matching is case-insensitive and trimmed.
    let report = f
        .svc
        .make_guess("bob", &code, &format!("  {}  ", word.to_uppercase()))
        .unwrap();
    assert!(report.correct);
    assert_eq!(report.points, 150);

    // Halfway through the clock: 125.
    f.clock.advance(Duration::seconds(30));
    let report = f.svc.make_guess("carol", &code, &word).unwrap();
    assert_eq!(report.points, 125);

    let view = f.svc.get_room("alice", &code).unwrap();
    let score_of = |id: &str| {
        view.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.score)
            .unwrap()
    };
    assert_eq!(score_of("bob"), 150);
    assert_eq!(score_of("carol"), 125);
    assert_eq!(score_of("alice"), 0);
}

#[test]
fn late_correct_guesses_still_earn_the_floor() {
    let f = fixture();
    let code = started_room(&f);
    let word = pick_first_word(&f, &code, "alice");

    f.clock.advance(Duration::seconds(60));
    let report = f.svc.make_guess("bob", &code, &word).unwrap();
    assert_eq!(report.points, 100);
}

#[test]
fn guess_rules_are_enforced() {
    let f = fixture();
    let code = started_room(&f);
    let word = pick_first_word(&f, &code, "alice");

    // Wrong guesses record with zero points.
    let report = f.svc.make_guess("bob", &code, "wrong").unwrap();
    assert!(!report.correct);
    assert_eq!(report.points, 0);

    // The drawer may not guess; outsiders may not either.
    assert!(matches!(
        f.svc.make_guess("alice", &code, &word),
        Err(GameError::Forbidden(_))
    ));
    assert!(matches!(
        f.svc.make_guess("mallory", &code, &word),
        Err(GameError::Forbidden(_))
    ));

    // After a correct guess, the same player is done for the round.
    f.svc.make_guess("bob", &code, &word).unwrap();
    assert!(matches!(
        f.svc.make_guess("bob", &code, &word),
        Err(GameError::BadRequest(_))
    ));
}

#[test]
fn drawing_payload_is_drawer_only() {
    let f = fixture();
    let code = started_room(&f);
    pick_first_word(&f, &code, "alice");

    f.svc
        .update_drawing("alice", &code, "stroke-data-v1".to_string())
        .unwrap();
    assert!(matches!(
        f.svc.update_drawing("bob", &code, "scribble".to_string()),
        Err(GameError::Forbidden(_))
    ));
    assert_eq!(
        f.svc.get_room("carol", &code).unwrap().drawing,
        "stroke-data-v1"
    );
}

#[test]
fn round_ends_when_everyone_guessed_and_the_drawer_rotates() {
    let f = fixture();
    let code = started_room(&f);
    let word = pick_first_word(&f, &code, "alice");

    // Too early: nobody has guessed and the clock is running.
    assert!(matches!(
        f.svc.end_round("bob", &code),
        Err(GameError::BadRequest(_))
    ));

    f.svc.make_guess("bob", &code, &word).unwrap();
    f.svc.make_guess("carol", &code, &word).unwrap();
    f.svc.end_round("bob", &code).unwrap();

    let view = f.svc.get_room("bob", &code).unwrap();
    assert_eq!(view.status, RoomStatus::ChoosingWord);
    assert_eq!(view.current_round, 2);
    assert_eq!(view.drawer.as_deref(), Some("bob"));
    // The ended round's word is no longer secret, even to guessers.
    assert_eq!(
        f.svc.get_room("carol", &code).unwrap().current_word.as_deref(),
        Some(word.as_str())
    );
    // A fresh round clears nothing yet; guesses reset when the word is
    // chosen, and the new word goes back into hiding.
    pick_first_word(&f, &code, "bob");
    let view = f.svc.get_room("alice", &code).unwrap();
    assert!(view.guesses.is_empty());
    assert!(view.current_word.is_none());
}

#[test]
fn cancel_room_is_creator_only_and_waiting_only() {
    let f = fixture();
    let code = f.svc.create_room("alice", RoomConfig::default()).unwrap();
    f.svc.join_room("bob", &code).unwrap();

    assert!(matches!(
        f.svc.cancel_room("bob", &code),
        Err(GameError::Forbidden(_))
    ));
    f.svc.cancel_room("alice", &code).unwrap();
    assert_eq!(
        f.svc.get_room("alice", &code).unwrap().status,
        RoomStatus::Cancelled
    );

    // Cancelled is terminal: no join, no start, no second cancel.
    assert!(matches!(
        f.svc.join_room("carol", &code),
        Err(GameError::BadRequest(_))
    ));
    assert!(matches!(
        f.svc.start_game("alice", &code),
        Err(GameError::BadRequest(_))
    ));
    assert!(matches!(
        f.svc.cancel_room("alice", &code),
        Err(GameError::BadRequest(_))
    ));

    // Once the game starts, the room is past cancelling.
    let code = started_room(&f);
    assert!(matches!(
        f.svc.cancel_room("alice", &code),
        Err(GameError::BadRequest(_))
    ));
    assert!(matches!(
        f.svc.cancel_room("alice", "ZZZZZZ"),
        Err(GameError::NotFound(_))
    ));
}

#[test]
fn expired_round_ends_by_timer_and_last_round_completes_the_room() {
    let f = fixture();
    let code = started_room(&f);
    let word = pick_first_word(&f, &code, "alice");

    f.svc.make_guess("bob", &code, &word).unwrap(); // 150 for bob
    f.svc.make_guess("carol", &code, &word).unwrap();
    f.svc.end_round("alice", &code).unwrap();

    // Round 2: bob draws, nobody guesses, the clock runs out.
    pick_first_word(&f, &code, "bob");
    f.clock.advance(Duration::seconds(61));
    f.svc.end_round("carol", &code).unwrap();

    let view = f.svc.get_room("carol", &code).unwrap();
    assert_eq!(view.status, RoomStatus::Completed);
    // Completion reveals nothing left to hide and fires the event with the
    // top scorer.
    assert!(f.sink.events().iter().any(|e| matches!(
        e,
        GameEvent::Completed { game, winner: Some(w), .. }
            if game == "quickdraw" && w == "bob"
    )));

    // Terminal: no more guesses, rounds, or joins.
    assert!(matches!(
        f.svc.make_guess("bob", &code, "anything"),
        Err(GameError::BadRequest(_))
    ));
    assert!(matches!(
        f.svc.end_round("bob", &code),
        Err(GameError::BadRequest(_))
    ));
}
