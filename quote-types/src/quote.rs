use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An attributed quote. Identity is the `id`, assigned by whichever
/// backend stored it; records are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub speaker: String,
    pub added_by: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// A quote before a backend has assigned its identity.
///
/// `id` and `timestamp` are `None` when the backend should assign them on
/// write; imported records that already carry them keep them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteDraft {
    pub id: Option<String>,
    pub text: String,
    pub speaker: String,
    pub added_by: String,
    pub timestamp: Option<i64>,
}

impl QuoteDraft {
    pub fn new(text: impl Into<String>, speaker: impl Into<String>, added_by: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            speaker: speaker.into(),
            added_by: added_by.into(),
            timestamp: None,
        }
    }
}

/// Derived per-speaker summary. Never stored; recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Person {
    pub name: String,
    pub quote_count: u32,
}
