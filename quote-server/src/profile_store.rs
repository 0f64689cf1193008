use quote_persistence::LocalStore;
use quote_types::{PersistenceError, UserProfile};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// The single local player profile.
///
/// Game statistics accumulate across completed games and every mutation
/// persists the whole profile synchronously, so a restart picks up
/// exactly where the last game left off.
pub struct ProfileStore {
    profile: RwLock<Option<UserProfile>>,
    storage: LocalStore,
}

impl ProfileStore {
    pub fn new(storage: LocalStore) -> Self {
        let profile = storage.load_profile();
        if let Some(profile) = &profile {
            info!(name = %profile.name, "loaded existing profile");
        }
        Self {
            profile: RwLock::new(profile),
            storage,
        }
    }

    pub async fn current(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }

    /// Create a fresh profile, or rename the existing one in place
    /// keeping its statistics.
    pub async fn set_username(&self, name: &str) -> Result<UserProfile, PersistenceError> {
        let mut guard = self.profile.write().await;
        let updated = match guard.as_ref() {
            Some(existing) => {
                let mut renamed = existing.clone();
                renamed.name = name.to_string();
                renamed
            }
            None => UserProfile::new(name.to_string()),
        };
        self.storage.save_profile(&updated)?;
        *guard = Some(updated.clone());
        Ok(updated)
    }

    /// Fold a completed game's score into the running statistics.
    /// Without a profile there is nowhere to record, so this is a no-op.
    pub async fn record_game_score(
        &self,
        score: u32,
    ) -> Result<Option<UserProfile>, PersistenceError> {
        let mut guard = self.profile.write().await;
        let Some(existing) = guard.as_ref() else {
            debug!(score, "no profile, dropping game score");
            return Ok(None);
        };

        let mut updated = existing.clone();
        updated.games_played += 1;
        updated.total_score += score;
        updated.best_score = updated.best_score.max(score);
        self.storage.save_profile(&updated)?;
        *guard = Some(updated.clone());
        Ok(Some(updated))
    }

    /// Destroys the profile and its persisted statistics entirely.
    pub async fn logout(&self) -> Result<(), PersistenceError> {
        let mut guard = self.profile.write().await;
        self.storage.clear_profile()?;
        *guard = None;
        Ok(())
    }
}
