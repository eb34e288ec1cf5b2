//! Error types shared by the catalog, the daily log and the session.

use thiserror::Error;

use crate::store::StoreError;

/// Ledger error types
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Nothing to undo")]
    EmptyStack,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        LedgerError::NotFound(msg.into())
    }

    /// True for errors caused by the caller's input rather than the environment
    pub fn is_user_error(&self) -> bool {
        !matches!(self, LedgerError::Store(_))
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
