use std::sync::Arc;

use quote_core::TriviaGame;
use quote_types::{GameError, GameState};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::profile_store::ProfileStore;
use crate::quote_store::QuoteStore;

/// Bridges the async stores and the synchronous trivia engine.
///
/// Each operation snapshots the current quote list for the engine, so
/// quotes added by another collaborator mid-game become eligible in the
/// very next round. When a game runs its course the final score is folded
/// into the profile here, exactly once — the engine itself never
/// persists anything.
pub struct GameManager {
    game: RwLock<TriviaGame>,
    quotes: Arc<QuoteStore>,
    profile: Arc<ProfileStore>,
}

impl GameManager {
    pub fn new(quotes: Arc<QuoteStore>, profile: Arc<ProfileStore>) -> Self {
        Self::with_game(TriviaGame::new(), quotes, profile)
    }

    /// Seeded engine for deterministic tests.
    pub fn with_game(game: TriviaGame, quotes: Arc<QuoteStore>, profile: Arc<ProfileStore>) -> Self {
        Self {
            game: RwLock::new(game),
            quotes,
            profile,
        }
    }

    pub async fn state(&self) -> GameState {
        self.game.read().await.state().clone()
    }

    pub async fn start(&self) -> Result<GameState, GameError> {
        let snapshot = self.quotes.list().await;
        let mut game = self.game.write().await;
        game.start(&snapshot)?;
        info!(rounds = game.state().total_rounds, "game started");
        Ok(game.state().clone())
    }

    pub async fn submit_answer(&self, answer: &str) -> GameState {
        let mut game = self.game.write().await;
        game.submit_answer(answer);
        game.state().clone()
    }

    pub async fn next_round(&self) -> GameState {
        let snapshot = self.quotes.list().await;
        let state = {
            let mut game = self.game.write().await;
            let was_playing = game.state().is_playing;
            game.next_round(&snapshot);
            let state = game.state().clone();
            if !(was_playing && !state.is_playing) {
                return state;
            }
            state
        };

        // The game just finished: this is the one place its score is
        // recorded.
        info!(score = state.score, rounds = state.total_rounds, "game finished");
        if let Err(e) = self.profile.record_game_score(state.score).await {
            warn!("could not record game score: {}", e);
        }
        state
    }

    /// Abandon the game, discarding score and history unrecorded.
    pub async fn end(&self) -> GameState {
        let mut game = self.game.write().await;
        game.end();
        game.state().clone()
    }
}
