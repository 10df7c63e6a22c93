use std::collections::HashSet;

use api_types::transaction::TransactionRecord;
use uuid::Uuid;

use crate::{PaginationState, Selection};

/// Client-held, possibly partial copy of the records matching the active
/// query, with the counters describing it.
///
/// Invariant: `records.len() <= pagination.total`.
#[derive(Clone, Debug, Default)]
pub struct Mirror {
    pub records: Vec<TransactionRecord>,
    pub pagination: PaginationState,
    pub selection: Selection,
    /// Loaded records deleted since the last page was merged. The server's
    /// later records moved down by this many offsets.
    pub shift: u64,
}

impl Mirror {
    pub fn loaded(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn get(&self, id: Uuid) -> Option<&TransactionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Appends the records whose id is not resident yet and returns how many
    /// were added. Offsets shift on the server when records are created, so
    /// a page may repeat rows already merged.
    pub(crate) fn append_unique(&mut self, incoming: Vec<TransactionRecord>) -> usize {
        let mut seen: HashSet<Uuid> = self.records.iter().map(|record| record.id).collect();
        let before = self.records.len();
        self.records
            .extend(incoming.into_iter().filter(|record| seen.insert(record.id)));
        self.records.len() - before
    }
}
