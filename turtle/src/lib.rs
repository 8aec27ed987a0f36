//! This crate is part of [LDO-rs],
//! a Linked Data Objects toolkit in Rust.
//!
//! It parses the Turtle family of RDF concrete syntaxes into an
//! [`ExtendedDataset`](ldo_dataset::ExtendedDataset),
//! based on [`rio_turtle`](https://docs.rs/rio_turtle/),
//! and serializes datasets to [N-Quads].
//!
//! ```
//! use ldo_dataset::Dataset;
//! # fn main() -> Result<(), ldo_turtle::ParseError> {
//! let ttl = r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:alice ex:name "Alice"@en ; ex:knows ex:bob .
//! "#;
//! let dataset = ldo_turtle::parse_turtle(ttl, None)?;
//! assert_eq!(dataset.size(), 2);
//! # Ok(()) }
//! ```
//!
//! [LDO-rs]: https://github.com/ldo-rs/ldo_rs
//! [N-Quads]: https://www.w3.org/TR/n-quads/
#![deny(missing_docs)]

mod _error;
pub use _error::*;
pub mod parser;
pub use parser::{parse_nquads, parse_ntriples, parse_turtle};
pub mod serializer;
pub use serializer::{to_nquads, write_nquads};
