use crate::core::{DbError, Result};
use crate::storage::Table;
use std::collections::HashMap;

/// Named collection of independent tables
///
/// A pure constructor/lookup facade: every table owns its storage and the
/// registry shares nothing between them. Tables live for the lifetime of
/// the registry; there is no way to drop one.
pub struct Database {
    tables: HashMap<String, Table>,
}

impl Database {
    /// Create one empty table per name
    ///
    /// # Errors
    /// - `InvalidInput` on an empty or duplicate table name
    ///
    /// # Examples
    ///
    /// ```
    /// use memtab::Database;
    ///
    /// # fn main() -> memtab::Result<()> {
    /// let mut db = Database::new(["temperature", "pressure"])?;
    ///
    /// let temperature = db.get_mut("temperature")?;
    /// temperature.insert([(10, 10), (20, 11), (30, 9)])?;
    /// assert_eq!(temperature.mean(), 10.0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new<N, I>(names: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = N>,
    {
        let mut tables = HashMap::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(DbError::InvalidInput(
                    "table name must not be empty".to_string(),
                ));
            }
            if tables.contains_key(&name) {
                return Err(DbError::InvalidInput(format!(
                    "duplicate table name '{}'",
                    name
                )));
            }
            tables.insert(name.clone(), Table::new(name));
        }
        Ok(Self { tables })
    }

    /// Get a table by name
    ///
    /// # Errors
    /// - `TableNotFound` for an unregistered name
    pub fn get(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Get a table by name for writing
    ///
    /// # Errors
    /// - `TableNotFound` for an unregistered name
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
