use chrono::NaiveDate;
use quote_types::{ImportError, Quote, QuoteDraft};
use serde::Deserialize;
use tracing::debug;

/// Serialize the full collection for a backup download.
pub fn export_json(quotes: &[Quote]) -> String {
    serde_json::to_string_pretty(quotes).expect("quotes serialize to JSON")
}

/// Backup filename carrying the export date, e.g.
/// `quotebook_backup_2026-08-07.json`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("quotebook_backup_{}.json", date.format("%Y-%m-%d"))
}

/// A raw record from an import file. Everything is optional; validation
/// decides what survives.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    added_by: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Parse an import file into drafts ready for persistence.
///
/// Input that is not a JSON array fails wholesale with no partial
/// effects. Array elements missing `text`, `speaker`, or `addedBy` (or
/// carrying them empty) are silently dropped; surviving records keep any
/// `id`/`timestamp` they arrived with so re-imported backups keep their
/// history. Duplicates are allowed — merging is the caller's concern.
pub fn parse_import(raw: &str) -> Result<Vec<QuoteDraft>, ImportError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(|_| ImportError::InvalidFormat)?;

    let total = values.len();
    let drafts: Vec<QuoteDraft> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<ImportedRecord>(value).ok())
        .filter_map(|record| {
            let text = record.text.filter(|t| !t.is_empty())?;
            let speaker = record.speaker.filter(|s| !s.is_empty())?;
            let added_by = record.added_by.filter(|a| !a.is_empty())?;
            Some(QuoteDraft {
                id: record.id,
                text,
                speaker,
                added_by,
                timestamp: record.timestamp,
            })
        })
        .collect();

    if drafts.len() < total {
        debug!(dropped = total - drafts.len(), "dropped incomplete import records");
    }
    Ok(drafts)
}
