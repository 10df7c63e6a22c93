use std::collections::HashSet;

use api_types::transaction::TransactionRecord;
use uuid::Uuid;

/// Record ids the user has marked, independent of their position in the
/// mirror. Appending pages never touches it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<Uuid>,
}

impl Selection {
    pub fn select(&mut self, id: Uuid) {
        self.ids.insert(id);
    }

    /// Returns `true` if the id was selected.
    pub fn deselect(&mut self, id: Uuid) -> bool {
        self.ids.remove(&id)
    }

    /// Flips the id and returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.ids.remove(&id) {
            return false;
        }
        self.ids.insert(id);
        true
    }

    pub fn select_all_loaded(&mut self, records: &[TransactionRecord]) {
        self.ids.extend(records.iter().map(|record| record.id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &HashSet<Uuid> {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips() {
        let mut selection = Selection::default();
        let id = Uuid::new_v4();
        assert!(selection.toggle(id));
        assert!(selection.contains(id));
        assert!(!selection.toggle(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn deselect_reports_presence() {
        let mut selection = Selection::default();
        let id = Uuid::new_v4();
        assert!(!selection.deselect(id));
        selection.select(id);
        assert!(selection.deselect(id));
    }
}
