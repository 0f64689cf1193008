use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quote_types::{PersistenceError, Quote, QuoteDraft, UserProfile};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::QuoteBackend;

const QUOTES_FILE: &str = "quotebook_quotes.json";
const PROFILE_FILE: &str = "quotebook_user.json";

/// Synchronous key-value persistence on the local filesystem.
///
/// The caller is the source of truth: every mutation rewrites the full
/// collection under its fixed key. Unreadable or corrupt files read back
/// as empty rather than failing, so a damaged store degrades to a fresh
/// one instead of wedging the app.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PersistenceError::WriteFailed {
            message: format!("cannot create data directory {}: {}", dir.display(), e),
        })?;
        Ok(Self { dir })
    }

    fn quotes_path(&self) -> PathBuf {
        self.dir.join(QUOTES_FILE)
    }

    fn profile_path(&self) -> PathBuf {
        self.dir.join(PROFILE_FILE)
    }

    fn read_quotes(&self) -> Vec<Quote> {
        read_json_or_default(&self.quotes_path())
    }

    fn write_quotes(&self, quotes: &[Quote]) -> Result<(), PersistenceError> {
        write_json(&self.quotes_path(), quotes)
    }

    pub fn load_profile(&self) -> Option<UserProfile> {
        let profile: Option<UserProfile> = read_json_or_default(&self.profile_path());
        profile
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), PersistenceError> {
        write_json(&self.profile_path(), profile)
    }

    /// Destroys the persisted profile, stats included.
    pub fn clear_profile(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(self.profile_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::WriteFailed {
                message: format!("cannot remove profile: {}", e),
            }),
        }
    }
}

#[async_trait]
impl QuoteBackend for LocalStore {
    async fn load(&self) -> Result<Vec<Quote>, PersistenceError> {
        Ok(self.read_quotes())
    }

    async fn create(&self, draft: QuoteDraft) -> Result<Option<Quote>, PersistenceError> {
        let quote = Quote {
            id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            text: draft.text,
            speaker: draft.speaker,
            added_by: draft.added_by,
            timestamp: draft.timestamp.unwrap_or_else(now_millis),
        };

        let mut quotes = self.read_quotes();
        quotes.insert(0, quote.clone());
        self.write_quotes(&quotes)?;
        debug!(id = %quote.id, "stored quote locally");
        Ok(Some(quote))
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        let mut quotes = self.read_quotes();
        let before = quotes.len();
        quotes.retain(|q| q.id != id);
        if quotes.len() != before {
            self.write_quotes(&quotes)?;
        }
        Ok(())
    }

    fn watch(&self) -> Option<watch::Receiver<Vec<Quote>>> {
        None
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(path = %path.display(), "cannot read store file: {}", e);
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), "corrupt store file, starting empty: {}", e);
            T::default()
        }
    }
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string_pretty(value).map_err(|e| PersistenceError::WriteFailed {
        message: format!("cannot serialize {}: {}", path.display(), e),
    })?;
    fs::write(path, raw).map_err(|e| PersistenceError::WriteFailed {
        message: format!("cannot write {}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: &str, speaker: &str) -> QuoteDraft {
        QuoteDraft::new(text, speaker, "tester")
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let stored = store.create(draft("hello", "Alice")).await.unwrap().unwrap();
        assert!(!stored.id.is_empty());
        assert!(stored.timestamp > 0);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![stored]);
    }

    #[tokio::test]
    async fn test_collection_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalStore::new(dir.path()).unwrap();
            store.create(draft("persisted", "Alice")).await.unwrap();
        }

        let reopened = LocalStore::new(dir.path()).unwrap();
        let quotes = reopened.load().await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "persisted");
    }

    #[tokio::test]
    async fn test_create_prepends_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        store.create(draft("first", "Alice")).await.unwrap();
        store.create(draft("second", "Bob")).await.unwrap();

        let quotes = store.load().await.unwrap();
        assert_eq!(quotes[0].text, "second");
        assert_eq!(quotes[1].text, "first");
    }

    #[tokio::test]
    async fn test_imported_draft_keeps_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();

        let mut imported = draft("old", "Alice");
        imported.id = Some("kept-id".to_string());
        imported.timestamp = Some(1234);

        let stored = store.create(imported).await.unwrap().unwrap();
        assert_eq!(stored.id, "kept-id");
        assert_eq!(stored.timestamp, 1234);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        store.create(draft("hello", "Alice")).await.unwrap();

        store.delete("missing").await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_quote() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        let stored = store.create(draft("hello", "Alice")).await.unwrap().unwrap();

        store.delete(&stored.id).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(QUOTES_FILE), "not json").unwrap();

        let store = LocalStore::new(dir.path()).unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        assert_eq!(store.load_profile(), None);

        let profile = UserProfile {
            name: "Ada".to_string(),
            games_played: 2,
            total_score: 10,
            best_score: 6,
        };
        store.save_profile(&profile).unwrap();
        assert_eq!(store.load_profile(), Some(profile));

        store.clear_profile().unwrap();
        assert_eq!(store.load_profile(), None);
        // Clearing twice stays fine.
        store.clear_profile().unwrap();
    }
}
