use api_types::transaction::{TransactionRecord, TransactionType};
use feed::{FeedSnapshot, LoadingStrategy, MinorAmount};

pub fn signed_amount(record: &TransactionRecord) -> MinorAmount {
    match record.kind {
        TransactionType::Income => MinorAmount::new(record.amount_minor),
        TransactionType::Expense => MinorAmount::new(record.amount_minor.saturating_neg()),
    }
}

pub fn record_line(record: &TransactionRecord, selected: bool) -> String {
    let marker = if selected { '*' } else { ' ' };
    let payee = record.payee.as_deref().unwrap_or("-");
    let category = record.category.as_deref().unwrap_or("-");
    format!(
        "{marker} {}  {:>12}  {:<32}  {:<20}  {}",
        record.occurred_at.format("%Y-%m-%d"),
        signed_amount(record).to_string(),
        record.description,
        payee,
        category
    )
}

pub fn status_line(snapshot: &FeedSnapshot) -> String {
    let strategy = match snapshot.strategy {
        Some(LoadingStrategy::FullLoad) => "full load",
        Some(LoadingStrategy::Incremental) => "incremental",
        None => "not loaded",
    };
    let mut line = format!(
        "{} of {} loaded, page {}/{} (limit {}, {strategy})",
        snapshot.records.len(),
        snapshot.pagination.total,
        snapshot.pagination.page,
        snapshot.pagination.total_pages(),
        snapshot.pagination.limit,
    );
    if snapshot.drifted {
        line.push_str(", total changed on the server");
    }
    line
}

pub fn list(snapshot: &FeedSnapshot) -> String {
    let mut out: Vec<String> = snapshot
        .records
        .iter()
        .map(|record| record_line(record, snapshot.selected.contains(&record.id)))
        .collect();
    out.push(status_line(snapshot));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use feed::PaginationState;
    use uuid::Uuid;

    use super::*;

    fn record(kind: TransactionType, amount_minor: i64) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            amount_minor,
            kind,
            occurred_at: DateTime::parse_from_rfc3339("2026-03-15T18:30:00+01:00").unwrap(),
            description: "Dinner".to_string(),
            payee: Some("Trattoria".to_string()),
            notes: None,
            tags: Vec::new(),
            category: None,
            payment_method: None,
            status: None,
        }
    }

    #[test]
    fn expenses_are_negative() {
        assert_eq!(
            signed_amount(&record(TransactionType::Expense, 4_550)).to_string(),
            "-45.50"
        );
        assert_eq!(
            signed_amount(&record(TransactionType::Income, 100)).to_string(),
            "1.00"
        );
    }

    #[test]
    fn extreme_expense_saturates() {
        let amount = signed_amount(&record(TransactionType::Expense, i64::MIN));
        assert_eq!(amount.minor(), i64::MAX);
    }

    #[test]
    fn selected_rows_are_marked() {
        let line = record_line(&record(TransactionType::Expense, 100), true);
        assert!(line.starts_with("* 2026-03-15"));
        assert!(line.contains("Trattoria"));
    }

    #[test]
    fn status_reports_pages_and_strategy() {
        let snapshot = FeedSnapshot {
            records: vec![record(TransactionType::Income, 1)],
            pagination: PaginationState::new(1, 100, 1_200),
            strategy: Some(LoadingStrategy::Incremental),
            ..FeedSnapshot::default()
        };
        assert_eq!(
            status_line(&snapshot),
            "1 of 1200 loaded, page 1/12 (limit 100, incremental)"
        );
    }
}
