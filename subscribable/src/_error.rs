use ldo_term::TermError;
use thiserror::Error;

/// An error raised by a misuse of the [`TransactionDataset`](crate::TransactionDataset) lifecycle.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// `commit` was called on a transaction that was already committed (or rolled back)
    #[error("The transaction has already been committed")]
    AlreadyCommitted,
    /// `rollback` was called on a transaction with no committed changes to undo
    #[error("The transaction has not been committed, or has already been rolled back")]
    NotCommitted,
}

/// An error raised when registering a listener.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The pattern contains a term that can not appear at its position
    #[error("No quad can match this pattern: {0}")]
    InvalidPattern(#[from] TermError),
}
