//! This crate is part of [LDO-rs],
//! a Linked Data Objects toolkit in Rust.
//!
//! It defines the [`Dataset`] and [`MutableDataset`] traits,
//! an indexed in-memory implementation ([`ExtendedDataset`]),
//! and [`DatasetChanges`], the unit of change exchanged by
//! bulk updates, transactions and subscriptions.
//!
//! ```
//! use ldo_dataset::{Dataset, ExtendedDataset, MutableDataset};
//! use ldo_term::{Quad, Term};
//! # fn main() -> Result<(), ldo_term::TermError> {
//! let s = Term::iri("http://example.org/s")?;
//! let p = Term::iri("http://example.org/p")?;
//! let mut d = ExtendedDataset::new();
//! assert!(d.add(Quad::triple(s.clone(), p.clone(), Term::literal("a"))?));
//! assert!(!d.add(Quad::triple(s.clone(), p.clone(), Term::literal("a"))?));
//! d.add(Quad::triple(s.clone(), p.clone(), Term::literal("b"))?);
//! assert_eq!(d.match_quads(Some(&s), Some(&p), None, None).size(), 2);
//! # Ok(()) }
//! ```
//!
//! [LDO-rs]: https://github.com/ldo-rs/ldo_rs
#![deny(missing_docs)]

mod _changes;
pub use _changes::*;
mod _extended;
pub use _extended::*;
mod _traits;
pub use _traits::*;

pub mod index;

#[cfg(test)]
mod test;
