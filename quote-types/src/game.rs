use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::quote::Quote;

/// One completed round: the quote that was shown, whether the guess was
/// right, and what was guessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoundRecord {
    pub quote: Quote,
    pub correct: bool,
    pub guessed: String,
}

/// Full trivia game state, shared with clients verbatim.
///
/// While a round is active, `options` contains the current quote's
/// speaker exactly once among at most four candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameState {
    pub is_playing: bool,
    pub current_quote: Option<Quote>,
    pub options: Vec<String>,
    pub score: u32,
    pub total_rounds: u32,
    pub current_round: u32,
    pub answered: bool,
    pub selected_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub history: Vec<RoundRecord>,
}

impl GameState {
    /// Is the game over with its results still readable?
    ///
    /// True after the last round has been played but before the state is
    /// reset; `history` and `score` describe the finished game.
    pub fn is_finished(&self) -> bool {
        !self.is_playing && !self.history.is_empty()
    }
}
