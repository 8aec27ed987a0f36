use ldo_term::TermError;
use rio_turtle::TurtleError;
use thiserror::Error;

/// An error raised while parsing a Turtle-family document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not syntactically valid
    #[error(transparent)]
    Syntax(#[from] TurtleError),
    /// The base IRI given to the parser is not a valid absolute IRI
    #[error("Invalid base IRI '{iri}': {reason}")]
    InvalidBase {
        /// The rejected base IRI
        iri: String,
        /// Why it was rejected
        reason: String,
    },
    /// The document contains an RDF-star quoted triple
    #[error("Quoted triples are not supported")]
    QuotedTriple,
    /// A parsed term could not be converted
    #[error(transparent)]
    Term(#[from] TermError),
}
