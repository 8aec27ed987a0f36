use ldo_proxy::{ContextError, ProxyError};
use ldo_subscribable::TransactionError;
use ldo_turtle::ParseError;
use thiserror::Error;

/// Any error raised by this crate.
#[derive(Debug, Error)]
pub enum LdoError {
    /// A document could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The JSON-LD context is invalid
    #[error(transparent)]
    Context(#[from] ContextError),
    /// A view operation was rejected
    #[error(transparent)]
    Proxy(#[from] ProxyError),
    /// The transaction lifecycle was not respected
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    /// A transaction was started without any view
    #[error("A transaction needs at least one view")]
    NoViews,
}
