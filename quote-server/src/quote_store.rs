use std::sync::Arc;

use quote_core::{export_json, parse_import, QuoteBook};
use quote_persistence::QuoteBackend;
use quote_types::{ImportError, Person, PersistenceError, Quote, QuoteDraft};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};

/// The quote collection wired to its persistence collaborator.
///
/// With a snapshot-pushing backend (remote) the backend is the source of
/// truth: writes are fire-and-forget and the in-memory book only changes
/// when a pushed snapshot is applied. With a local backend the book is
/// authoritative and mirrors every confirmed write immediately. Either
/// way, every change is republished on a watch channel for WebSocket
/// subscribers.
pub struct QuoteStore {
    book: RwLock<QuoteBook>,
    backend: Arc<dyn QuoteBackend>,
    backend_is_authoritative: bool,
    updates: watch::Sender<Vec<Quote>>,
}

impl QuoteStore {
    /// Load the initial collection and start mirroring backend pushes.
    pub async fn new(backend: Arc<dyn QuoteBackend>) -> Result<Arc<Self>, PersistenceError> {
        let initial = backend.load().await?;
        info!(quotes = initial.len(), "quote store loaded");

        let backend_is_authoritative = backend.watch().is_some();
        let book = QuoteBook::from_quotes(initial);
        let (updates, _) = watch::channel(book.list());

        let store = Arc::new(Self {
            book: RwLock::new(book),
            backend,
            backend_is_authoritative,
            updates,
        });

        if let Some(mut snapshots) = store.backend.watch() {
            let mirror = Arc::clone(&store);
            tokio::spawn(async move {
                while snapshots.changed().await.is_ok() {
                    let snapshot = snapshots.borrow_and_update().clone();
                    mirror.apply_snapshot(snapshot).await;
                }
            });
        }

        Ok(store)
    }

    /// Record a new quote.
    ///
    /// Returns `Ok(false)` without touching anything when text or speaker
    /// is empty after trimming. Persistence failures leave the in-memory
    /// collection exactly as the backend last confirmed it.
    pub async fn add(
        &self,
        text: &str,
        speaker: &str,
        added_by: &str,
    ) -> Result<bool, PersistenceError> {
        let speaker = speaker.trim();
        if text.trim().is_empty() || speaker.is_empty() {
            debug!("rejected quote with empty text or speaker");
            return Ok(false);
        }

        let draft = QuoteDraft::new(text, speaker, added_by.trim());
        if let Some(quote) = self.backend.create(draft).await? {
            let mut book = self.book.write().await;
            book.insert(quote);
            self.publish(&book);
        }
        Ok(true)
    }

    pub async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        self.backend.delete(id).await?;
        if !self.backend_is_authoritative {
            let mut book = self.book.write().await;
            if book.remove(id) {
                self.publish(&book);
            }
        }
        Ok(())
    }

    pub async fn list(&self) -> Vec<Quote> {
        self.book.read().await.list()
    }

    pub async fn people(&self) -> Vec<Person> {
        self.book.read().await.people()
    }

    pub async fn quotes_by_speaker(&self, speaker: &str) -> Vec<Quote> {
        self.book.read().await.quotes_by_speaker(speaker)
    }

    /// Serialize the full collection for download.
    pub async fn export_snapshot(&self) -> String {
        export_json(&self.list().await)
    }

    /// Merge an exported snapshot back in.
    ///
    /// Malformed input fails before any write. Incomplete records are
    /// dropped; the rest merge additively with no deduplication, so
    /// importing the same file twice doubles up on purpose.
    pub async fn import_snapshot(&self, raw: &str) -> Result<usize, ImportError> {
        let drafts = parse_import(raw)?;
        let count = drafts.len();

        for draft in drafts {
            if let Some(quote) = self.backend.create(draft).await? {
                let mut book = self.book.write().await;
                book.insert(quote);
                self.publish(&book);
            }
        }
        info!(imported = count, "imported quote snapshot");
        Ok(count)
    }

    /// Mirror a backend-pushed snapshot verbatim.
    pub async fn apply_snapshot(&self, quotes: Vec<Quote>) {
        debug!(quotes = quotes.len(), "applying pushed snapshot");
        let mut book = self.book.write().await;
        book.replace_all(quotes);
        self.publish(&book);
    }

    /// Subscribe to the current quote list; fires on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Quote>> {
        self.updates.subscribe()
    }

    fn publish(&self, book: &QuoteBook) {
        // send_replace keeps the channel value fresh even with no live
        // subscribers, so late joiners see the current list.
        self.updates.send_replace(book.list());
    }
}
