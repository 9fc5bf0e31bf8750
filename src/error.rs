//! Error types returned by table operations.

use thiserror::Error;

/// Failure of a table operation. Neither variant leaves the table in a
/// different state than before the call.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TableError {
    /// The probe walk ended without reaching a live entry for the key.
    #[error("key not found")]
    NotFound,
    /// Every slot holds a live entry and the capacity ladder is exhausted.
    #[error("table is full")]
    Full,
}

pub type Result<T> = core::result::Result<T, TableError>;
