//! This crate is part of [LDO-rs],
//! a Linked Data Objects toolkit in Rust.
//!
//! It defines the value types shared by every other crate of the toolkit:
//! RDF [terms](Term), [quads](Quad) and [quad patterns](QuadPattern).
//!
//! Terms are plain values:
//! their equality is structural, and cloning them is cheap
//! (the underlying strings are reference-counted).
//!
//! ```
//! use ldo_term::{ns::rdf, Quad, Term};
//! # fn main() -> Result<(), ldo_term::TermError> {
//! let alice = Term::iri("http://example.org/alice")?;
//! let person = Term::iri("http://xmlns.com/foaf/0.1/Person")?;
//! let q = Quad::new(alice, Term::new_iri_unchecked(rdf::type_), person, Term::DefaultGraph)?;
//! assert_eq!(
//!     q.to_string(),
//!     "<http://example.org/alice> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://xmlns.com/foaf/0.1/Person> ."
//! );
//! # Ok(()) }
//! ```
//!
//! [LDO-rs]: https://github.com/ldo-rs/ldo_rs
#![deny(missing_docs)]

mod _display;
mod _error;
pub use _error::*;
mod _quad;
pub use _quad::*;
mod _term;
pub use _term::*;

pub mod bnode_id;
pub mod language_tag;
pub mod ns;
pub mod pattern;

pub use pattern::QuadPattern;

#[cfg(test)]
mod test;
