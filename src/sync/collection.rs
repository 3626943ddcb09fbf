use crate::models::{Customer, Todo};

/// Typed change notification delivered by a backend change feed
#[derive(Debug, Clone)]
pub enum ChangeEvent<T> {
    Inserted(T),
    Updated(T),
    Deleted(i64),
}

/// A record that can be matched against change events by identifier.
/// Records not yet persisted have no id and never match an update/delete.
pub trait SyncRecord {
    fn sync_id(&self) -> Option<i64>;
}

impl SyncRecord for Customer {
    fn sync_id(&self) -> Option<i64> {
        self.id
    }
}

impl SyncRecord for Todo {
    fn sync_id(&self) -> Option<i64> {
        self.id
    }
}

/// In-memory mirror of a remote table, reconciled from change events.
///
/// Events are applied strictly in delivery order. Inserts prepend (newest
/// first, matching the list views). Updates replace in place by id and
/// deletes remove by id; both are no-ops when the id is not present.
#[derive(Debug)]
pub struct LiveCollection<T> {
    records: Vec<T>,
}

impl<T> Default for LiveCollection<T> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<T: SyncRecord> LiveCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Seed the collection from an initial fetch
    pub fn replace_all(&mut self, records: Vec<T>) {
        self.records = records;
    }

    /// Reconcile one change event into the collection
    pub fn apply(&mut self, event: ChangeEvent<T>) {
        match event {
            ChangeEvent::Inserted(record) => {
                self.records.insert(0, record);
            }
            ChangeEvent::Updated(record) => {
                if let Some(id) = record.sync_id() {
                    if let Some(slot) = self
                        .records
                        .iter_mut()
                        .find(|existing| existing.sync_id() == Some(id))
                    {
                        *slot = record;
                    }
                }
            }
            ChangeEvent::Deleted(id) => {
                self.records.retain(|existing| existing.sync_id() != Some(id));
            }
        }
    }
}
