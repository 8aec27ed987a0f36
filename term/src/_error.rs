use crate::{Position, TermKind};
use thiserror::Error;

/// An error raised when building an invalid [`Term`](crate::Term) or [`Quad`](crate::Quad).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TermError {
    /// The given string is not a valid IRI reference
    #[error("The given IRI '{iri}' is not valid: {reason}")]
    InvalidIri {
        /// The offending string
        iri: String,
        /// Why it was rejected
        reason: String,
    },
    /// The given string does not comply with Turtle's BLANK_NODE_LABEL
    #[error("The given blank node identifier '{0}' does not comply with Turtle's BLANK_NODE_LABEL")]
    InvalidBnodeId(String),
    /// The given string is not a valid language tag
    #[error("The given language tag '{0}' is not valid")]
    InvalidLanguageTag(String),
    /// A `rdf:langString` literal was built without a language tag
    #[error("rdf:langString literals require a language tag")]
    MissingLanguageTag,
    /// A term of this kind can not appear at this position of a quad
    #[error("A {kind:?} can not be used as the {position} of a quad")]
    UnexpectedKind {
        /// The position in the quad
        position: Position,
        /// The kind of the rejected term
        kind: TermKind,
    },
}
