use ldo_term::TermError;
use thiserror::Error;

/// An error raised while reading a JSON-LD context.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The context is not a JSON object
    #[error("A JSON-LD context must be a JSON object")]
    NotAnObject,
    /// A term definition is neither a string nor an object with an `@id`
    #[error("Invalid definition for term '{key}': {reason}")]
    InvalidDefinition {
        /// The defined term
        key: String,
        /// Why the definition was rejected
        reason: String,
    },
}

/// An error raised by a view. No change is applied to the dataset when one is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProxyError {
    /// A term could not be built, or used at its position in a quad
    #[error(transparent)]
    Term(#[from] TermError),
    /// The JSON-LD context is invalid
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Literals can not be members of a collection of subjects
    #[error("A literal can not be added to a collection of subjects")]
    LiteralInSubjectCollection,
    /// The inserted node would not match the pattern of the collection it is inserted in
    #[error("{id} does not match the pattern {pattern} of this collection")]
    PatternNotSatisfied {
        /// The inserted node
        id: String,
        /// The pattern of the collection
        pattern: String,
    },
    /// New members can only be added to a collection whose pattern fixes the missing positions
    #[error("Can not add members to a collection with pattern {0}")]
    IncompletePattern(String),
    /// The key is not collection-valued
    #[error("'{0}' is not a collection")]
    NotACollection(String),
    /// An index is past the end of a collection
    #[error("Index {index} is out of bounds (length is {len})")]
    IndexOutOfBounds {
        /// The requested index
        index: usize,
        /// The length of the collection
        len: usize,
    },
    /// The value can not be used as an identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    /// A JSON value that should have been an object
    #[error("Expected an object, got {0}")]
    NotAnObject(String),
}
