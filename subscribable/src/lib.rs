//! This crate is part of [LDO-rs],
//! a Linked Data Objects toolkit in Rust.
//!
//! It provides two wrappers around a [`MutableDataset`](ldo_dataset::MutableDataset):
//! * [`TransactionDataset`] layers pending changes over a parent dataset,
//!   until they are [committed](TransactionDataset::commit)
//!   (and possibly [rolled back](TransactionDataset::rollback));
//! * [`SubscribableDataset`] notifies listeners registered on
//!   [quad patterns](ldo_term::QuadPattern) of every change matching their pattern.
//!
//! [LDO-rs]: https://github.com/ldo-rs/ldo_rs
#![deny(missing_docs)]

mod _error;
pub use _error::*;
mod subscribable;
pub use subscribable::*;
mod transaction;
pub use transaction::*;

#[cfg(test)]
mod test;

#[cfg(test)]
fn test_setup() {
    TEST_SETUP.call_once(|| {
        env_logger::init();
    });
}

#[cfg(test)]
static TEST_SETUP: std::sync::Once = std::sync::Once::new();
