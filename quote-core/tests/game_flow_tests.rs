mod common;

use common::*;
use quote_core::{TriviaGame, ROUNDS_PER_GAME};
use quote_types::GameError;

#[test]
fn test_minimal_collection_plays_three_rounds() {
    // Two quotes from one speaker plus one from another is exactly enough.
    let quotes = vec![
        make_quote(0, "Ada"),
        make_quote(1, "Ada"),
        make_quote(2, "Grace"),
    ];

    let mut game = TriviaGame::with_seed(42);
    game.start(&quotes).unwrap();
    assert_eq!(game.state().total_rounds, 3);
}

#[test]
fn test_single_speaker_collection_cannot_start() {
    let quotes = make_collection(5, &["Ada"]);
    let mut game = TriviaGame::with_seed(42);

    match game.start(&quotes) {
        Err(GameError::InsufficientData { quotes: 5, speakers: 1 }) => {}
        other => panic!("expected InsufficientData, got {:?}", other),
    }
}

#[test]
fn test_round_budget_caps_at_ten() {
    let quotes = make_collection(25, &["Ada", "Grace", "Alan", "Edsger"]);
    let mut game = TriviaGame::with_seed(42);

    game.start(&quotes).unwrap();
    assert_eq!(game.state().total_rounds, ROUNDS_PER_GAME);
}

#[test]
fn test_full_game_history_matches_round_budget() {
    let quotes = make_collection(12, &["Ada", "Grace", "Alan"]);
    let mut game = TriviaGame::with_seed(99);
    game.start(&quotes).unwrap();

    while game.state().is_playing {
        let speaker = game
            .state()
            .current_quote
            .as_ref()
            .expect("active round has a quote")
            .speaker
            .clone();
        game.submit_answer(&speaker);
        game.next_round(&quotes);
    }

    let state = game.state();
    assert_eq!(state.history.len() as u32, state.total_rounds);
    // Every answer was correct, so the score is the full budget.
    assert_eq!(state.score, state.total_rounds);
    assert!(state.is_finished());
}

#[test]
fn test_same_seed_same_game() {
    let quotes = make_collection(10, &["Ada", "Grace", "Alan"]);

    let mut first = TriviaGame::with_seed(7);
    let mut second = TriviaGame::with_seed(7);
    first.start(&quotes).unwrap();
    second.start(&quotes).unwrap();

    assert_eq!(first.state().current_quote, second.state().current_quote);
    assert_eq!(first.state().options, second.state().options);
}
