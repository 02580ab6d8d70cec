// ============================================================================
// Staged Change Tracking
// ============================================================================
//
// Implements the Command Pattern for queued table operations. Each Change
// is recorded while a transaction is open and applied during COMMIT, or
// discarded during ROLLBACK.
//
// ============================================================================

use crate::core::{Key, Value};
use serde::{Deserialize, Serialize};

/// A single queued table operation
///
/// Changes are kept in issue order and replayed strictly FIFO by commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    /// Insert a new key/value pair
    Insert { key: Key, value: Value },

    /// Delete an existing key
    Delete { key: Key },
}

impl Change {
    /// Get the key affected by this change
    pub fn key(&self) -> &Key {
        match self {
            Change::Insert { key, .. } => key,
            Change::Delete { key } => key,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Change::Insert { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Change::Delete { .. })
    }
}
