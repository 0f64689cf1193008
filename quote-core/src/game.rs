use quote_types::{GameError, GameState, Quote, RoundRecord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use tracing::debug;

pub const ROUNDS_PER_GAME: u32 = 10;
pub const MAX_OPTIONS: usize = 4;

/// "Who said it?" round generator and scorer.
///
/// The engine operates over whatever quote snapshot the caller hands it;
/// it never touches persistence and never records scores itself. Rounds
/// sample quotes without replacement across the whole game, so no quote
/// repeats until `end()` resets everything.
#[derive(Debug)]
pub struct TriviaGame {
    state: GameState,
    rng: StdRng,
}

impl TriviaGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic engine for tests: same seed, same quote order and
    /// same option layout.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: idle_state(),
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A game needs at least 3 quotes from at least 2 distinct speakers.
    pub fn can_start(quotes: &[Quote]) -> bool {
        quotes.len() >= 3 && unique_speakers(quotes).len() >= 2
    }

    /// Start a new game over the given snapshot.
    ///
    /// Fails loudly when the precondition is unmet rather than starting a
    /// degenerate single-speaker game.
    pub fn start(&mut self, quotes: &[Quote]) -> Result<(), GameError> {
        let speakers = unique_speakers(quotes);
        if quotes.len() < 3 || speakers.len() < 2 {
            return Err(GameError::InsufficientData {
                quotes: quotes.len(),
                speakers: speakers.len(),
            });
        }

        let mut shuffled: Vec<Quote> = quotes.to_vec();
        shuffled.shuffle(&mut self.rng);
        let first = shuffled.remove(0);
        let options = self.generate_options(&first.speaker, &speakers);

        debug!(quotes = quotes.len(), speakers = speakers.len(), "starting game");

        self.state = GameState {
            is_playing: true,
            options,
            score: 0,
            total_rounds: (quotes.len() as u32).min(ROUNDS_PER_GAME),
            current_round: 1,
            answered: false,
            selected_answer: None,
            is_correct: None,
            history: Vec::new(),
            current_quote: Some(first),
        };
        Ok(())
    }

    /// Judge an answer against the current quote's speaker.
    ///
    /// A no-op when no round is active or the round was already answered,
    /// which guards double submission.
    pub fn submit_answer(&mut self, answer: &str) {
        if self.state.answered {
            return;
        }
        let Some(quote) = self.state.current_quote.clone() else {
            return;
        };

        let correct = answer == quote.speaker;
        self.state.answered = true;
        self.state.selected_answer = Some(answer.to_string());
        self.state.is_correct = Some(correct);
        if correct {
            self.state.score += 1;
        }
        self.state.history.push(RoundRecord {
            quote,
            correct,
            guessed: answer.to_string(),
        });
    }

    /// Advance past an answered round.
    ///
    /// Finishes the game when the round budget is spent or every quote in
    /// the snapshot has already been shown. Options are regenerated
    /// against the snapshot's current speaker set, so speakers added
    /// mid-game become eligible candidates.
    pub fn next_round(&mut self, quotes: &[Quote]) {
        if !self.state.is_playing {
            return;
        }
        if self.state.current_round >= self.state.total_rounds {
            self.finish();
            return;
        }

        let mut used: HashSet<&str> = self
            .state
            .history
            .iter()
            .map(|r| r.quote.id.as_str())
            .collect();
        if let Some(current) = &self.state.current_quote {
            used.insert(current.id.as_str());
        }

        let remaining: Vec<&Quote> = quotes.iter().filter(|q| !used.contains(q.id.as_str())).collect();
        let Some(next) = remaining.choose(&mut self.rng).map(|q| (*q).clone()) else {
            // Duplicate snapshots can shrink the effective pool below the
            // round budget; run out of quotes, run out of game.
            self.finish();
            return;
        };

        let speakers = unique_speakers(quotes);
        self.state.options = self.generate_options(&next.speaker, &speakers);
        self.state.current_quote = Some(next);
        self.state.current_round += 1;
        self.state.answered = false;
        self.state.selected_answer = None;
        self.state.is_correct = None;
    }

    /// Reset to idle, discarding score and history. Callers that want the
    /// score kept must record it before calling this.
    pub fn end(&mut self) {
        debug!("game ended");
        self.state = idle_state();
    }

    fn finish(&mut self) {
        self.state.is_playing = false;
        self.state.current_quote = None;
    }

    /// Build the answer candidates for `correct`: up to three distractors
    /// drawn from the other speakers, shuffled together with the correct
    /// one. Fewer than two speakers exist only before `start`, so an
    /// active round always has at least two options.
    fn generate_options(&mut self, correct: &str, speakers: &[String]) -> Vec<String> {
        let mut distractors: Vec<String> = speakers
            .iter()
            .filter(|s| s.as_str() != correct)
            .cloned()
            .collect();
        distractors.shuffle(&mut self.rng);
        distractors.truncate(MAX_OPTIONS - 1);

        let mut options = distractors;
        options.push(correct.to_string());
        options.shuffle(&mut self.rng);
        options
    }
}

impl Default for TriviaGame {
    fn default() -> Self {
        Self::new()
    }
}

fn idle_state() -> GameState {
    GameState {
        is_playing: false,
        current_quote: None,
        options: Vec::new(),
        score: 0,
        total_rounds: ROUNDS_PER_GAME,
        current_round: 0,
        answered: false,
        selected_answer: None,
        is_correct: None,
        history: Vec::new(),
    }
}

/// Distinct speaker names in first-seen order.
fn unique_speakers(quotes: &[Quote]) -> Vec<String> {
    let mut seen = Vec::new();
    for quote in quotes {
        if !seen.contains(&quote.speaker) {
            seen.push(quote.speaker.clone());
        }
    }
    seen
}
