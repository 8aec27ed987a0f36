//! This crate is part of [LDO-rs],
//! a Linked Data Objects toolkit in Rust.
//!
//! It shows the quads of a dataset as a graph of plain objects:
//! * a [`SubjectProxy`] shows the quads of one subject as the properties of an object,
//!   whose keys are resolved with a JSON-LD [context](context::ContextUtil);
//! * an [`ArrayProxy`] shows the objects (or subjects) of the quads matching a pattern
//!   as an ordered, duplicate-free collection;
//! * a [`LanguageMap`] and a [`LanguageSetProxy`] show language-tagged strings.
//!
//! Views are live: every read goes to the dataset, and every write is applied to it at once.
//! Views can be temporarily re-configured (write graphs, language preferences, dataset)
//! with the [`scope`] module.
//!
//! ```
//! use ldo_dataset::{share, Dataset, ExtendedDataset};
//! use ldo_proxy::{open_graph, Value};
//! use serde_json::json;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = share(ExtendedDataset::new());
//! let builder = open_graph(dataset.clone(), &json!({
//!     "name": "http://xmlns.com/foaf/0.1/name",
//! }))?;
//! let alice = builder.from_subject("http://example.org/alice")?;
//! alice.set("name", "Alice")?;
//! assert_eq!(alice.get("name"), Some(Value::from("Alice")));
//! assert_eq!(dataset.borrow().size(), 1);
//! # Ok(()) }
//! ```
//!
//! [LDO-rs]: https://github.com/ldo-rs/ldo_rs
#![deny(missing_docs)]

mod _array;
pub use _array::*;
mod _builder;
pub use _builder::*;
mod _error;
pub use _error::*;
mod _proxy_context;
pub use _proxy_context::*;
mod _subject;
pub use _subject::*;
mod _value;
pub use _value::*;
mod _writer;

pub mod context;
pub mod language;
pub use language::{LanguageKey, LanguageMap, LanguageSetProxy};
pub mod scope;
pub use scope::*;


#[cfg(test)]
fn test_setup() {
    TEST_SETUP.call_once(|| {
        env_logger::init();
    });
}

#[cfg(test)]
static TEST_SETUP: std::sync::Once = std::sync::Once::new();
