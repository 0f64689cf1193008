use quote_types::Quote;

/// Builds a quote with a synthetic id and timestamp derived from `n`.
pub fn make_quote(n: usize, speaker: &str) -> Quote {
    Quote {
        id: format!("quote-{}", n),
        text: format!("memorable line {}", n),
        speaker: speaker.to_string(),
        added_by: "tester".to_string(),
        timestamp: 1_700_000_000_000 + n as i64,
    }
}

/// A collection spread across the given speakers, round-robin.
pub fn make_collection(count: usize, speakers: &[&str]) -> Vec<Quote> {
    (0..count)
        .map(|i| make_quote(i, speakers[i % speakers.len()]))
        .collect()
}
