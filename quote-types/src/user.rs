use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The single local player profile with cumulative game statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub name: String,
    pub games_played: u32,
    pub total_score: u32,
    pub best_score: u32,
}

impl UserProfile {
    /// Fresh profile with zeroed stats.
    pub fn new(name: String) -> Self {
        Self {
            name,
            games_played: 0,
            total_score: 0,
            best_score: 0,
        }
    }
}
