// ============================================================================
// memtab Library
// ============================================================================

//! In-memory key/value tables with staged transactions.
//!
//! A [`Table`] maps scalar keys to numeric values and supports two write
//! modes: immediate, where every insert and delete lands in the committed
//! store synchronously, and staging, where operations queue up and apply
//! atomically on commit or vanish on rollback. Readers never observe
//! uncommitted state. A [`Database`] is a thin registry handing out named,
//! fully independent tables.
//!
//! # Examples
//!
//! ```
//! use memtab::Database;
//!
//! # fn main() -> memtab::Result<()> {
//! let mut db = Database::new(["temperature"])?;
//! let table = db.get_mut("temperature")?;
//!
//! table.insert([(10, 10), (20, 11), (30, 9)])?;
//! assert_eq!(table.mean(), 10.0);
//!
//! // Queue writes, then discard them.
//! table.begin_transaction();
//! table.insert([(40, 19), (50, 21)])?;
//! table.delete([10])?;
//! assert_eq!(table.mean(), 10.0); // staged writes stay invisible
//! table.rollback();
//! assert_eq!(table.lookup(10)?.as_f64(), 10.0);
//!
//! // Queue writes, then apply them atomically.
//! table.begin_transaction();
//! table.insert([(40, 0), (50, 2)])?;
//! table.delete([20, 30])?;
//! table.commit()?;
//! assert_eq!(table.mean(), 4.0);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod facade;
pub mod storage;
pub mod transaction;

// Re-export main types for convenience
pub use crate::core::{DbError, Key, Result, Value};
pub use crate::facade::Database;
pub use crate::storage::Table;
pub use crate::transaction::{Change, Mode};
