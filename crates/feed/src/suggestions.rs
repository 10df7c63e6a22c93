//! Search suggestions drawn from the records currently in the mirror.
//!
//! The index only knows what has been paged in. On an incrementally loaded
//! dataset it is a partial view of the remote collection; callers must not
//! present it as exhaustive.
use std::collections::BTreeSet;

use api_types::transaction::TransactionRecord;

#[derive(Clone, Debug, Default)]
pub struct SuggestionIndex {
    tokens: BTreeSet<String>,
}

impl SuggestionIndex {
    /// Adds description, payee, notes and tags of every record.
    ///
    /// Purely additive: nothing is removed when a record later leaves the
    /// mirror.
    pub fn ingest<'a>(&mut self, records: impl IntoIterator<Item = &'a TransactionRecord>) {
        for record in records {
            self.insert(&record.description);
            if let Some(payee) = &record.payee {
                self.insert(payee);
            }
            if let Some(notes) = &record.notes {
                self.insert(notes);
            }
            for tag in &record.tags {
                self.insert(tag);
            }
        }
    }

    fn insert(&mut self, raw: &str) {
        let token = raw.trim();
        if token.is_empty() || self.tokens.contains(token) {
            return;
        }
        self.tokens.insert(token.to_string());
    }

    /// Sorted, distinct tokens.
    pub fn suggestions(&self) -> Vec<String> {
        self.tokens.iter().cloned().collect()
    }

    /// Tokens starting with `prefix`, compared case-insensitively.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        self.tokens
            .iter()
            .filter(|token| token.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use api_types::transaction::TransactionType;
    use chrono::DateTime;
    use uuid::Uuid;

    use super::*;

    fn record(description: &str, payee: Option<&str>, tags: &[&str]) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            amount_minor: 100,
            kind: TransactionType::Expense,
            occurred_at: DateTime::parse_from_rfc3339("2026-01-10T10:00:00+01:00").unwrap(),
            description: description.to_string(),
            payee: payee.map(str::to_string),
            notes: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: None,
            payment_method: None,
            status: None,
        }
    }

    #[test]
    fn tokens_are_sorted_and_distinct() {
        let mut index = SuggestionIndex::default();
        index.ingest(&[
            record("Rent", Some("Landlord"), &["home"]),
            record("Coffee", Some("Bar Roma"), &["food", " home "]),
        ]);
        index.ingest(&[record("Coffee", None, &[""])]);

        assert_eq!(
            index.suggestions(),
            vec!["Bar Roma", "Coffee", "Landlord", "Rent", "food", "home"]
        );
    }

    #[test]
    fn matching_ignores_case() {
        let mut index = SuggestionIndex::default();
        index.ingest(&[record("Coffee", Some("coop"), &["Cinema"])]);
        assert_eq!(index.matching("CO"), vec!["Coffee", "coop"]);
        assert!(index.matching("x").is_empty());
    }
}
