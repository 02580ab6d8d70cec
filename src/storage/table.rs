use crate::core::{DbError, Key, Result, Value};
use crate::transaction::{Change, Mode, TransactionBuffer};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// An in-memory key/value table with staged transactions
///
/// Readers only ever observe the committed store. In `Immediate` mode every
/// write lands synchronously; after [`Table::begin_transaction`] writes are
/// queued and the committed store is mutated only by [`Table::commit`] or
/// [`Table::rollback`].
///
/// Every table owns its storage. Two tables never alias data, no matter how
/// they were created.
#[derive(Debug)]
pub struct Table {
    name: String,
    /// The only state visible to readers
    committed: BTreeMap<Key, Value>,
    /// Queued operations and pre-images of the open transaction
    buffer: TransactionBuffer,
    mode: Mode,
}

impl Table {
    /// Create an empty table in `Immediate` mode
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            committed: BTreeMap::new(),
            buffer: TransactionBuffer::new(),
            mode: Mode::Immediate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a batch of key/value pairs, in input order
    ///
    /// In `Immediate` mode each pair is written to the committed store as it
    /// is processed; in `Staging` mode each pair is queued. Keys already in
    /// the committed store are never overwritten: hitting one fails the call,
    /// and in `Staging` mode the whole open transaction is rolled back first.
    ///
    /// A failed immediate call leaves every pair that preceded the failing
    /// one applied.
    ///
    /// # Errors
    /// - `InvalidInput` if the batch contains the same key twice
    /// - `OverwriteNotAllowed` if a key is already in the committed store
    pub fn insert<K, V, I>(&mut self, entries: I) -> Result<()>
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(Key, Value)> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        // The batch must behave like a mapping: one value per key.
        let mut seen = BTreeSet::new();
        for (key, _) in &entries {
            if !seen.insert(key) {
                return Err(DbError::InvalidInput(format!(
                    "duplicate key '{}' in insert batch for table '{}'",
                    key, self.name
                )));
            }
        }

        for (key, value) in entries {
            if self.committed.contains_key(&key) {
                if self.mode.is_staging() {
                    debug!(
                        "table '{}': insert of existing key '{}' aborts open transaction",
                        self.name, key
                    );
                    self.rollback();
                }
                return Err(DbError::OverwriteNotAllowed(self.name.clone(), key));
            }
            match self.mode {
                Mode::Immediate => {
                    self.committed.insert(key, value);
                }
                Mode::Staging => {
                    let prior = self.committed.get(&key).copied();
                    self.buffer.record(Change::Insert { key, value }, prior);
                }
            }
        }
        Ok(())
    }

    /// Delete a batch of keys, in input order
    ///
    /// In `Immediate` mode present keys are removed synchronously and absent
    /// keys are skipped silently. In `Staging` mode present keys are queued
    /// for deletion, while an absent key rolls back the whole transaction
    /// and fails the call.
    ///
    /// # Errors
    /// - `KeyNotFound` for a staged delete of an absent key
    pub fn delete<K, I>(&mut self, keys: I) -> Result<()>
    where
        K: Into<Key>,
        I: IntoIterator<Item = K>,
    {
        for key in keys.into_iter().map(Into::into) {
            match self.committed.get(&key).copied() {
                Some(prior) => match self.mode {
                    Mode::Immediate => {
                        self.committed.remove(&key);
                    }
                    Mode::Staging => {
                        self.buffer.record(Change::Delete { key }, Some(prior));
                    }
                },
                None => {
                    if self.mode.is_staging() {
                        debug!(
                            "table '{}': staged delete of missing key '{}' aborts open transaction",
                            self.name, key
                        );
                        self.rollback();
                        return Err(DbError::KeyNotFound(self.name.clone(), key));
                    }
                    // Outside a transaction a missing key is skipped.
                }
            }
        }
        Ok(())
    }

    /// Switch to `Staging` mode
    ///
    /// Subsequent inserts and deletes are queued until [`Table::commit`] or
    /// [`Table::rollback`]. No-op when a transaction is already open.
    pub fn begin_transaction(&mut self) {
        if self.mode.is_staging() {
            return;
        }
        self.mode = Mode::Staging;
        debug!("table '{}': transaction started", self.name);
    }

    /// Apply all queued operations to the committed store, strictly FIFO
    ///
    /// On success the table holds exactly the result of replaying the queue
    /// against the pre-transaction state. If the replay fails partway, the
    /// whole transaction is rolled back before the error is reported, so the
    /// committed store never keeps a partial apply. Either way the queue is
    /// cleared and the table returns to `Immediate` mode.
    ///
    /// Calling commit without an open transaction is a no-op.
    ///
    /// # Errors
    /// - `CommitFailed` wrapping the failure hit during the replay
    pub fn commit(&mut self) -> Result<()> {
        if self.mode.is_immediate() {
            // Nothing is queued outside a transaction.
            return Ok(());
        }

        let queued = self.buffer.changes().to_vec();
        let count = queued.len();
        for change in queued {
            if let Err(cause) = self.apply(change) {
                debug!("table '{}': commit failed, rolling back: {}", self.name, cause);
                self.rollback();
                return Err(DbError::CommitFailed(Box::new(cause)));
            }
        }

        self.buffer.clear();
        self.mode = Mode::Immediate;
        debug!("table '{}': committed {} change(s)", self.name, count);
        Ok(())
    }

    /// Apply one queued change to the committed store
    fn apply(&mut self, change: Change) -> Result<()> {
        match change {
            Change::Insert { key, value } => {
                self.committed.insert(key, value);
                Ok(())
            }
            Change::Delete { key } => match self.committed.remove(&key) {
                Some(_) => Ok(()),
                None => Err(DbError::KeyNotFound(self.name.clone(), key)),
            },
        }
    }

    /// Discard the open transaction and restore the committed store
    ///
    /// Every key with a captured pre-image is restored to its recorded
    /// value; keys introduced by a queued insert are removed if a failed
    /// replay already wrote them. Clears the queue and returns the table to
    /// `Immediate` mode. Valid in either mode and always succeeds.
    pub fn rollback(&mut self) {
        for change in self.buffer.changes() {
            if let Change::Insert { key, .. } = change {
                if !self.buffer.has_pre_image(key) {
                    self.committed.remove(key);
                }
            }
        }
        for (key, value) in self.buffer.pre_image() {
            self.committed.insert(key.clone(), *value);
        }

        let discarded = self.buffer.len();
        self.buffer.clear();
        self.mode = Mode::Immediate;
        if discarded > 0 {
            debug!("table '{}': rolled back {} change(s)", self.name, discarded);
        }
    }

    /// Look up the committed value for a key
    ///
    /// Never consults the queue: while a transaction is open this returns
    /// the last committed value, not the staged one.
    ///
    /// # Errors
    /// - `KeyNotFound` if the key has no committed value
    pub fn lookup<K: Into<Key>>(&self, key: K) -> Result<Value> {
        let key = key.into();
        self.committed
            .get(&key)
            .copied()
            .ok_or_else(|| DbError::KeyNotFound(self.name.clone(), key))
    }

    /// Arithmetic mean of all committed values, `0.0` for an empty table
    ///
    /// Ignores queued operations, like [`Table::lookup`].
    pub fn mean(&self) -> f64 {
        if self.committed.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.committed.values().map(Value::as_f64).sum();
        sum / self.committed.len() as f64
    }

    pub fn contains_key<K: Into<Key>>(&self, key: K) -> bool {
        self.committed.contains_key(&key.into())
    }

    /// Number of committed entries
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_in_transaction(&self) -> bool {
        self.mode.is_staging()
    }

    /// Number of operations queued in the open transaction
    pub fn pending_changes(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_empty_and_immediate() {
        let table = Table::new("temperature");
        assert_eq!(table.name(), "temperature");
        assert!(table.is_empty());
        assert_eq!(table.mode(), Mode::Immediate);
        assert!(!table.is_in_transaction());
    }

    #[test]
    fn test_immediate_insert_lands_synchronously() {
        let mut table = Table::new("t");
        table.insert([(1, 10), (2, 20)]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(1).unwrap(), Value::Integer(10));
    }

    #[test]
    fn test_staged_insert_stays_out_of_committed() {
        let mut table = Table::new("t");
        table.begin_transaction();
        table.insert([(1, 10)]).unwrap();

        assert!(table.is_empty());
        assert_eq!(table.pending_changes(), 1);
        assert!(table.lookup(1).is_err());
    }

    #[test]
    fn test_mean_empty_table() {
        let table = Table::new("t");
        assert_eq!(table.mean(), 0.0);
    }
}
