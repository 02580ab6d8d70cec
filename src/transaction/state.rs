// ============================================================================
// Write Mode & Transaction Buffer
// ============================================================================
//
// Implements the State Pattern for the table write path. A table is either
// in Immediate mode (writes land synchronously) or Staging mode (writes are
// queued until commit or rollback).
//
// ============================================================================

use super::Change;
use crate::core::{Key, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Table write mode following the State Pattern
///
/// State transitions:
/// ```text
/// Immediate ──begin_transaction──> Staging
///   Staging ──commit/rollback────> Immediate
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Writes are applied to the committed store synchronously
    Immediate,

    /// Writes are queued and applied atomically on commit
    Staging,
}

impl Mode {
    pub fn is_immediate(&self) -> bool {
        matches!(self, Mode::Immediate)
    }

    pub fn is_staging(&self) -> bool {
        matches!(self, Mode::Staging)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Immediate => write!(f, "IMMEDIATE"),
            Mode::Staging => write!(f, "STAGING"),
        }
    }
}

/// Buffered state of the in-progress transaction
///
/// Holds the FIFO change log together with the pre-image of every touched
/// key that had a committed value when it was first touched. The pre-image
/// is consulted only by rollback; keys introduced by a queued insert have
/// none, since the committed store was never written for them.
#[derive(Debug, Default)]
pub struct TransactionBuffer {
    /// Queued operations in issue order
    log: Vec<Change>,

    /// Committed value of each touched key at first touch (first write wins)
    pre_image: HashMap<Key, Value>,
}

impl TransactionBuffer {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            pre_image: HashMap::new(),
        }
    }

    /// Record a change in the log
    ///
    /// `prior` is the key's current committed value, if any. Only the first
    /// recorded pre-image per key is kept, so a later change cannot clobber
    /// the pre-transaction value.
    pub fn record(&mut self, change: Change, prior: Option<Value>) {
        if let Some(value) = prior {
            self.pre_image.entry(change.key().clone()).or_insert(value);
        }
        self.log.push(change);
    }

    /// Get all queued changes in issue order
    pub fn changes(&self) -> &[Change] {
        &self.log
    }

    pub fn pre_image(&self) -> &HashMap<Key, Value> {
        &self.pre_image
    }

    pub fn has_pre_image(&self, key: &Key) -> bool {
        self.pre_image.contains_key(key)
    }

    /// Get the number of queued changes
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Discard the log and the pre-images once a transaction concludes
    pub fn clear(&mut self) {
        self.log.clear();
        self.pre_image.clear();
    }
}
