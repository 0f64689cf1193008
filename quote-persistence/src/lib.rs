pub mod local;
pub mod remote;

pub use local::*;
pub use remote::*;

use async_trait::async_trait;
use quote_types::{PersistenceError, Quote, QuoteDraft};
use tokio::sync::watch;

/// A persistence collaborator for the quote collection.
///
/// Two interchangeable implementations exist — a remote document
/// collection and a local JSON store — and exactly one is selected at
/// startup for the store's lifetime.
#[async_trait]
pub trait QuoteBackend: Send + Sync {
    /// The collection as the backend knows it at startup.
    async fn load(&self) -> Result<Vec<Quote>, PersistenceError>;

    /// Persist one new quote.
    ///
    /// Backends that assign identity synchronously return the stored
    /// quote for the caller to merge in. Backends that confirm writes
    /// through pushed snapshots instead return `None` — the write is
    /// fire-and-forget and the caller must not mutate local state
    /// optimistically.
    async fn create(&self, draft: QuoteDraft) -> Result<Option<Quote>, PersistenceError>;

    /// Remove a quote by id. Unknown ids are a no-op.
    async fn delete(&self, id: &str) -> Result<(), PersistenceError>;

    /// Snapshot pushes, for backends that are the source of truth.
    /// `None` when the caller's own state is authoritative.
    fn watch(&self) -> Option<watch::Receiver<Vec<Quote>>>;
}
