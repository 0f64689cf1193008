use std::time::Duration;

use async_trait::async_trait;
use quote_types::{PersistenceError, Quote, QuoteDraft};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::QuoteBackend;

/// Client for a remote document collection holding one document per
/// quote, keyed by a server-issued id and ordered by timestamp.
///
/// The remote collection is the source of truth: writes are
/// fire-and-forget and the caller mirrors the snapshots published on the
/// watch channel instead of mutating its own state optimistically. A
/// background task polls the collection and pushes each full snapshot;
/// dropping the store releases the subscription.
pub struct RemoteStore {
    client: reqwest::Client,
    collection_url: String,
    snapshots: watch::Receiver<Vec<Quote>>,
    poller: JoinHandle<()>,
}

impl RemoteStore {
    /// Connect and take the initial snapshot. Failing here is the signal
    /// for callers to fall back to local storage for the session.
    pub async fn connect(
        base_url: &str,
        collection: &str,
        poll_interval: Duration,
    ) -> Result<Self, PersistenceError> {
        let client = reqwest::Client::new();
        let collection_url = format!("{}/{}", base_url.trim_end_matches('/'), collection);

        let initial = fetch_documents(&client, &collection_url).await?;
        info!(url = %collection_url, quotes = initial.len(), "connected to remote quote collection");

        let (tx, rx) = watch::channel(initial);
        let poller = tokio::spawn(poll_collection(
            client.clone(),
            collection_url.clone(),
            poll_interval,
            tx,
        ));

        Ok(Self {
            client,
            collection_url,
            snapshots: rx,
            poller,
        })
    }
}

impl Drop for RemoteStore {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

#[async_trait]
impl QuoteBackend for RemoteStore {
    async fn load(&self) -> Result<Vec<Quote>, PersistenceError> {
        Ok(self.snapshots.borrow().clone())
    }

    async fn create(&self, draft: QuoteDraft) -> Result<Option<Quote>, PersistenceError> {
        let body = CreateDocument {
            text: &draft.text,
            speaker: &draft.speaker,
            added_by: &draft.added_by,
            timestamp: draft.timestamp,
        };

        self.client
            .post(&self.collection_url)
            .json(&body)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| PersistenceError::WriteFailed {
                message: e.to_string(),
            })?;

        // The server assigns the id; the quote shows up in the next
        // pushed snapshot.
        Ok(None)
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.collection_url, id))
            .send()
            .await
            .map_err(|e| PersistenceError::WriteFailed {
                message: e.to_string(),
            })?;

        // Deleting an already-gone document is a no-op, not a failure.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        response
            .error_for_status()
            .map_err(|e| PersistenceError::WriteFailed {
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn watch(&self) -> Option<watch::Receiver<Vec<Quote>>> {
        Some(self.snapshots.clone())
    }
}

async fn poll_collection(
    client: reqwest::Client,
    collection_url: String,
    poll_interval: Duration,
    tx: watch::Sender<Vec<Quote>>,
) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; the initial snapshot already
    // covered it.
    interval.tick().await;

    loop {
        interval.tick().await;
        match fetch_documents(&client, &collection_url).await {
            Ok(snapshot) => {
                debug!(quotes = snapshot.len(), "remote snapshot");
                if tx.send(snapshot).is_err() {
                    // All receivers gone; the subscription is over.
                    return;
                }
            }
            Err(e) => warn!("remote snapshot poll failed: {}", e),
        }
    }
}

async fn fetch_documents(
    client: &reqwest::Client,
    collection_url: &str,
) -> Result<Vec<Quote>, PersistenceError> {
    let documents: Vec<RemoteDocument> = client
        .get(collection_url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| PersistenceError::ReadFailed {
            message: e.to_string(),
        })?
        .json()
        .await
        .map_err(|e| PersistenceError::ReadFailed {
            message: e.to_string(),
        })?;

    Ok(documents.into_iter().map(Quote::from).collect())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocument<'a> {
    text: &'a str,
    speaker: &'a str,
    added_by: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

/// One wire document. The server may stamp timestamps as epoch
/// milliseconds or as an RFC 3339 marker; both normalize to epoch
/// milliseconds on read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteDocument {
    id: String,
    text: String,
    speaker: String,
    added_by: String,
    #[serde(default = "default_timestamp", deserialize_with = "timestamp_millis")]
    timestamp: i64,
}

impl From<RemoteDocument> for Quote {
    fn from(doc: RemoteDocument) -> Self {
        Quote {
            id: doc.id,
            text: doc.text,
            speaker: doc.speaker,
            added_by: doc.added_by,
            timestamp: doc.timestamp,
        }
    }
}

fn default_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn timestamp_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Marker(String),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => Ok(ms),
        RawTimestamp::Marker(s) => chrono::DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.timestamp_millis())
            .map_err(serde::de::Error::custom),
    }
}
