//! Applies server-confirmed mutations to the mirror without reloading.
//!
//! Each function is a reducer: it takes the mirror by value together with a
//! [`Mutation`] and returns the next mirror. They never talk to the network
//! and must only be called once the server has confirmed the change, so a
//! failed request can never leave a phantom `total` behind.
use api_types::transaction::TransactionRecord;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Mirror;

/// A mutation the server has already accepted.
#[derive(Clone, Debug)]
pub enum Mutation {
    Created(TransactionRecord),
    Updated(TransactionRecord),
    Deleted(Uuid),
}

/// What a reconciliation did to the mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// New record appended; `total` incremented.
    Appended,
    /// Existing record replaced in place.
    Replaced { index: usize },
    /// Update for a record that is not resident; nothing changed.
    NotResident,
    /// Resident record removed; `total` decremented.
    Removed { index: usize },
    /// Record was only in an unloaded page; `total` decremented.
    RemovedUnloaded,
    /// Neither resident nor accounted for by `total`; only the selection
    /// was touched.
    Untracked,
}

pub fn reconcile(mirror: Mirror, mutation: Mutation) -> (Mirror, Reconciled) {
    match mutation {
        Mutation::Created(record) => apply_create(mirror, record),
        Mutation::Updated(record) => apply_update(mirror, record),
        Mutation::Deleted(id) => apply_delete(mirror, id),
    }
}

/// Appends the record and bumps `total`; `page` and `limit` stay, so
/// `total_pages` follows from the new `total`.
///
/// A record whose id is already resident is replaced instead, leaving
/// `total` alone.
pub fn apply_create(mut mirror: Mirror, record: TransactionRecord) -> (Mirror, Reconciled) {
    if let Some(index) = mirror.position(record.id) {
        warn!(id = %record.id, "created record already in mirror, replacing");
        mirror.records[index] = record;
        return (mirror, Reconciled::Replaced { index });
    }

    debug!(id = %record.id, "appending created record");
    mirror.records.push(record);
    mirror.pagination = mirror.pagination.with_total(mirror.pagination.total + 1);
    (mirror, Reconciled::Appended)
}

/// Replaces the resident record with the same id, keeping its position.
pub fn apply_update(mut mirror: Mirror, record: TransactionRecord) -> (Mirror, Reconciled) {
    match mirror.position(record.id) {
        Some(index) => {
            mirror.records[index] = record;
            (mirror, Reconciled::Replaced { index })
        }
        None => {
            debug!(id = %record.id, "updated record not resident");
            (mirror, Reconciled::NotResident)
        }
    }
}

/// Removes the record, decrements `total` and drops the id from the
/// selection. Removing a loaded record also bumps the mirror's `shift`.
pub fn apply_delete(mut mirror: Mirror, id: Uuid) -> (Mirror, Reconciled) {
    mirror.selection.deselect(id);

    if let Some(index) = mirror.position(id) {
        mirror.records.remove(index);
        mirror.shift += 1;
        mirror.pagination = mirror
            .pagination
            .with_total(mirror.pagination.total.saturating_sub(1));
        return (mirror, Reconciled::Removed { index });
    }

    if mirror.pagination.total > mirror.loaded() {
        mirror.pagination = mirror.pagination.with_total(mirror.pagination.total - 1);
        return (mirror, Reconciled::RemovedUnloaded);
    }

    debug!(%id, "deleted record not tracked by mirror");
    (mirror, Reconciled::Untracked)
}

#[cfg(test)]
mod tests {
    use api_types::transaction::TransactionType;
    use chrono::DateTime;

    use super::*;
    use crate::PaginationState;

    fn record(description: &str) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            amount_minor: 1_000,
            kind: TransactionType::Income,
            occurred_at: DateTime::parse_from_rfc3339("2026-04-01T09:00:00+02:00").unwrap(),
            description: description.to_string(),
            payee: None,
            notes: None,
            tags: Vec::new(),
            category: None,
            payment_method: None,
            status: None,
        }
    }

    fn mirror(count: usize, total: u64, limit: u64) -> Mirror {
        Mirror {
            records: (0..count).map(|i| record(&format!("r{i}"))).collect(),
            pagination: PaginationState::new(1, limit, total),
            ..Mirror::default()
        }
    }

    #[test]
    fn create_appends_and_recomputes_pages() {
        let before = mirror(100, 100, 100);
        assert_eq!(before.pagination.total_pages(), 1);

        let created = record("new");
        let (after, outcome) = apply_create(before, created.clone());

        assert_eq!(outcome, Reconciled::Appended);
        assert_eq!(after.records.len(), 101);
        assert_eq!(after.pagination.total, 101);
        assert_eq!(after.pagination.page, 1);
        assert_eq!(after.pagination.limit, 100);
        assert_eq!(after.pagination.total_pages(), 2);
        assert_eq!(after.records.last(), Some(&created));
    }

    #[test]
    fn create_of_resident_id_does_not_count_twice() {
        let before = mirror(3, 3, 10);
        let mut again = before.records[1].clone();
        again.description = "renamed".to_string();

        let (after, outcome) = apply_create(before, again);
        assert_eq!(outcome, Reconciled::Replaced { index: 1 });
        assert_eq!(after.pagination.total, 3);
        assert_eq!(after.records[1].description, "renamed");
    }

    #[test]
    fn update_keeps_position_and_selection() {
        let mut before = mirror(5, 5, 10);
        let id = before.records[2].id;
        before.selection.select(id);

        let mut changed = before.records[2].clone();
        changed.amount_minor = 42;
        let (after, outcome) = reconcile(before, Mutation::Updated(changed));

        assert_eq!(outcome, Reconciled::Replaced { index: 2 });
        assert_eq!(after.records[2].id, id);
        assert_eq!(after.records[2].amount_minor, 42);
        assert!(after.selection.contains(id));
        assert_eq!(after.pagination.total, 5);
    }

    #[test]
    fn update_of_unknown_id_is_a_noop() {
        let before = mirror(2, 2, 10);
        let (after, outcome) = apply_update(before, record("ghost"));
        assert_eq!(outcome, Reconciled::NotResident);
        assert_eq!(after.records.len(), 2);
    }

    #[test]
    fn delete_removes_record_total_and_selection() {
        let mut before = mirror(4, 4, 10);
        let id = before.records[0].id;
        let kept = before.records[1].id;
        before.selection.select(id);
        before.selection.select(kept);

        let (after, outcome) = reconcile(before, Mutation::Deleted(id));

        assert_eq!(outcome, Reconciled::Removed { index: 0 });
        assert_eq!(after.pagination.total, 3);
        assert_eq!(after.shift, 1);
        assert!(after.get(id).is_none());
        assert!(!after.selection.contains(id));
        assert!(after.selection.contains(kept));
    }

    #[test]
    fn delete_outside_loaded_pages_still_counts() {
        let before = mirror(100, 1_200, 100);
        let (after, outcome) = apply_delete(before, Uuid::new_v4());
        assert_eq!(outcome, Reconciled::RemovedUnloaded);
        assert_eq!(after.pagination.total, 1_199);
        assert_eq!(after.shift, 0);
        assert_eq!(after.records.len(), 100);
    }

    #[test]
    fn delete_never_drops_total_below_loaded() {
        let before = mirror(3, 3, 10);
        let (after, outcome) = apply_delete(before, Uuid::new_v4());
        assert_eq!(outcome, Reconciled::Untracked);
        assert_eq!(after.pagination.total, 3);
    }
}
