//! This crate is part of [LDO-rs],
//! a Linked Data Objects toolkit in Rust.
//!
//! It gathers the other crates of the toolkit behind a single dependency,
//! and adds what applications need on top of them:
//! an [`LdoDataset`] combining storage and change notification,
//! [transactions](start_transaction) spanning several views,
//! and serialization of the quads describing a view.
//!
//! # Getting started
//!
//! ```
//! use ldo::{LdoDataset, Value};
//! use serde_json::json;
//! # fn main() -> Result<(), ldo::LdoError> {
//! let dataset = LdoDataset::from_turtle(r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:Obs1 ex:notes "Cool Notes" .
//! "#, None)?;
//! let builder = dataset.using(&json!({
//!     "ex": "http://example.org/",
//!     "notes": "ex:notes",
//! }))?;
//! let obs = builder.from_subject("ex:Obs1")?;
//! assert_eq!(obs.get("notes"), Some(Value::from("Cool Notes")));
//!
//! let tx = ldo::start_transaction(&[&obs])?;
//! obs.set("notes", "New")?;
//! assert_eq!(tx.changes().len(), 2);
//! tx.commit()?;
//! assert_eq!(ldo::to_nquads(&obs), "<http://example.org/Obs1> <http://example.org/notes> \"New\" .\n");
//! # Ok(()) }
//! ```
//!
//! [LDO-rs]: https://github.com/ldo-rs/ldo_rs
#![deny(missing_docs)]

pub use ldo_dataset as dataset;
pub use ldo_proxy as proxy;
pub use ldo_subscribable as subscribable;
pub use ldo_term as term;
pub use ldo_turtle as turtle;

pub use ldo_proxy::{
    graph_of, languages_of, open_graph, set_language_preferences, write, ArrayProxy,
    LanguageMap, LanguageSetProxy, ObjectLiteral, ProxyBuilder, ScopedView, SubjectProxy, Value,
};

mod _dataset;
pub use _dataset::*;
mod _error;
pub use _error::*;
pub mod transaction;
pub use transaction::{start_transaction, LdoTransaction};

use ldo_dataset::Dataset;

/// Serialize, as N-Quads, the quads having `view` as their subject.
pub fn to_nquads(view: &SubjectProxy) -> String {
    let ctx = view.context();
    let id = view.id();
    let quads = ctx.dataset().borrow().match_quads(Some(&id), None, None, None);
    ldo_turtle::to_nquads(&quads)
}
