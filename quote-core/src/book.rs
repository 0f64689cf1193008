use quote_types::{Person, Quote};

/// In-memory quote collection.
///
/// The book holds quotes newest-first and is a plain collection: which
/// backend it mirrors (remote snapshot pushes vs. local files) is the
/// caller's concern. Speaker names are grouped by their literal string,
/// case-sensitive and untrimmed, so "Alice" and "alice" are two people.
#[derive(Debug, Clone, Default)]
pub struct QuoteBook {
    quotes: Vec<Quote>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Prepend a new quote, keeping the collection newest-first.
    pub fn insert(&mut self, quote: Quote) {
        self.quotes.insert(0, quote);
    }

    /// Remove by id. Returns false when no quote matched.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.quotes.len();
        self.quotes.retain(|q| q.id != id);
        self.quotes.len() != before
    }

    /// Mirror a backend-pushed snapshot verbatim.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
    }

    /// All quotes, descending by timestamp. The sort is stable, so quotes
    /// with colliding millisecond timestamps keep their collection order.
    pub fn list(&self) -> Vec<Quote> {
        let mut sorted = self.quotes.clone();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    /// Distinct speaker names in first-seen order.
    pub fn speakers(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for quote in &self.quotes {
            if !seen.contains(&quote.speaker) {
                seen.push(quote.speaker.clone());
            }
        }
        seen
    }

    /// Per-speaker quote counts, descending by count. The sort is stable,
    /// so speakers with equal counts keep first-seen order.
    pub fn people(&self) -> Vec<Person> {
        let mut people: Vec<Person> = Vec::new();
        for quote in &self.quotes {
            match people.iter_mut().find(|p| p.name == quote.speaker) {
                Some(person) => person.quote_count += 1,
                None => people.push(Person {
                    name: quote.speaker.clone(),
                    quote_count: 1,
                }),
            }
        }
        people.sort_by(|a, b| b.quote_count.cmp(&a.quote_count));
        people
    }

    pub fn quotes_by_speaker(&self, speaker: &str) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|q| q.speaker == speaker)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: &str, speaker: &str, timestamp: i64) -> Quote {
        Quote {
            id: id.to_string(),
            text: format!("quote {}", id),
            speaker: speaker.to_string(),
            added_by: "tester".to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_list_sorted_descending_by_timestamp() {
        let mut book = QuoteBook::new();
        book.insert(quote("a", "Alice", 100));
        book.insert(quote("b", "Bob", 300));
        book.insert(quote("c", "Carol", 200));

        let listed = book.list();
        let timestamps: Vec<i64> = listed.iter().map(|q| q.timestamp).collect();
        assert_eq!(timestamps, vec![300, 200, 100]);
    }

    #[test]
    fn test_list_timestamp_ties_keep_collection_order() {
        let mut book = QuoteBook::new();
        book.insert(quote("a", "Alice", 100));
        book.insert(quote("b", "Bob", 100));
        book.insert(quote("c", "Carol", 100));

        // Insertion prepends, so the collection reads c, b, a and a
        // stable sort must not reorder the tie.
        let listed = book.list();
        let ids: Vec<&str> = listed.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut book = QuoteBook::new();
        book.insert(quote("a", "Alice", 100));

        assert!(!book.remove("missing"));
        assert_eq!(book.len(), 1);
        assert!(book.remove("a"));
        assert!(book.is_empty());
    }

    #[test]
    fn test_people_counts_sum_to_collection_size() {
        let mut book = QuoteBook::new();
        book.insert(quote("a", "Alice", 1));
        book.insert(quote("b", "Alice", 2));
        book.insert(quote("c", "Bob", 3));

        let people = book.people();
        let total: u32 = people.iter().map(|p| p.quote_count).sum();
        assert_eq!(total as usize, book.len());
        assert_eq!(people[0].name, "Alice");
        assert_eq!(people[0].quote_count, 2);
    }

    #[test]
    fn test_people_ties_broken_by_first_seen_order() {
        let mut book = QuoteBook::new();
        // Prepends mean Carol is seen first when iterating the collection.
        book.insert(quote("a", "Alice", 1));
        book.insert(quote("b", "Bob", 2));
        book.insert(quote("c", "Carol", 3));

        let people = book.people();
        let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Bob", "Alice"]);
    }

    #[test]
    fn test_speaker_grouping_is_case_sensitive() {
        // Deliberate: names that differ only by case are distinct people.
        let mut book = QuoteBook::new();
        book.insert(quote("a", "Alice", 1));
        book.insert(quote("b", "alice", 2));

        let people = book.people();
        assert_eq!(people.len(), 2);
        assert!(book.speakers().contains(&"Alice".to_string()));
        assert!(book.speakers().contains(&"alice".to_string()));
    }

    #[test]
    fn test_quotes_by_speaker_exact_match() {
        let mut book = QuoteBook::new();
        book.insert(quote("a", "Alice", 1));
        book.insert(quote("b", "Bob", 2));
        book.insert(quote("c", "Alice", 3));

        let alices = book.quotes_by_speaker("Alice");
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|q| q.speaker == "Alice"));
        assert!(book.quotes_by_speaker("alice").is_empty());
    }

    #[test]
    fn test_replace_all_mirrors_snapshot() {
        let mut book = QuoteBook::new();
        book.insert(quote("a", "Alice", 1));

        book.replace_all(vec![quote("x", "Xavier", 9), quote("y", "Yara", 8)]);
        assert_eq!(book.len(), 2);
        assert!(book.quotes_by_speaker("Alice").is_empty());
    }
}
