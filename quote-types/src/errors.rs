use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Trivia engine failures. Starting a game is the only fallible engine
/// operation; everything else is a pure state transition.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error(
        "not enough quotes to play: have {quotes} quotes from {speakers} speakers, \
         need at least 3 quotes from 2 speakers"
    )]
    InsufficientData { quotes: usize, speakers: usize },
}

/// Persistence collaborator failures. Reported to the user and never
/// retried; local in-memory state stays consistent with what the backend
/// actually confirmed.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PersistenceError {
    #[error("failed to write to the quote store: {message}")]
    WriteFailed { message: String },
    #[error("failed to read from the quote store: {message}")]
    ReadFailed { message: String },
}

/// Snapshot import failures. Malformed input performs no mutation at all.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ImportError {
    #[error("invalid import file: expected a JSON array of quotes")]
    InvalidFormat,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
