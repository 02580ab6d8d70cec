use super::value::Key;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Overwrite not allowed: key '{1}' already exists in table '{0}'")]
    OverwriteNotAllowed(String, Key),

    #[error("Key '{1}' not found in table '{0}'")]
    KeyNotFound(String, Key),

    #[error("Commit failed: {0}")]
    CommitFailed(#[source] Box<DbError>),

    #[error("Table '{0}' not found")]
    TableNotFound(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
