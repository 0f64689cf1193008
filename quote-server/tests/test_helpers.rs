use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use quote_persistence::QuoteBackend;
use quote_types::{PersistenceError, Quote, QuoteDraft};
use tokio::sync::watch;

/// Builds a quote with fixed metadata for store tests.
pub fn make_quote(id: &str, speaker: &str, timestamp: i64) -> Quote {
    Quote {
        id: id.to_string(),
        text: format!("quote {}", id),
        speaker: speaker.to_string(),
        added_by: "tester".to_string(),
        timestamp,
    }
}

/// Stand-in for the remote document collection: records every write,
/// never mutates anything itself, and lets tests push snapshots the way
/// the real subscription would.
pub struct FakeRemote {
    pub created: Mutex<Vec<QuoteDraft>>,
    pub deleted: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
    snapshots: watch::Sender<Vec<Quote>>,
    subscription: watch::Receiver<Vec<Quote>>,
}

impl FakeRemote {
    pub fn new(initial: Vec<Quote>) -> Self {
        let (snapshots, subscription) = watch::channel(initial);
        Self {
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
            snapshots,
            subscription,
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Simulates the collection pushing a fresh snapshot.
    pub fn push_snapshot(&self, quotes: Vec<Quote>) {
        self.snapshots.send_replace(quotes);
    }
}

#[async_trait]
impl QuoteBackend for FakeRemote {
    async fn load(&self) -> Result<Vec<Quote>, PersistenceError> {
        Ok(self.subscription.borrow().clone())
    }

    async fn create(&self, draft: QuoteDraft) -> Result<Option<Quote>, PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailed {
                message: "remote store rejected the write".to_string(),
            });
        }
        self.created.lock().unwrap().push(draft);
        // The id is server-assigned; confirmation comes via snapshot.
        Ok(None)
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailed {
                message: "remote store rejected the delete".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    fn watch(&self) -> Option<watch::Receiver<Vec<Quote>>> {
        Some(self.subscription.clone())
    }
}
