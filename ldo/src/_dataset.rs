use crate::LdoError;
use ldo_dataset::{share, Dataset, ExtendedDataset, SharedDataset};
use ldo_proxy::{open_graph, ProxyBuilder};
use ldo_subscribable::{SubscribableDataset, TransactionDataset};
use serde_json::Value as JsonValue;
use std::fmt;

/// A subscribable dataset, ready to be viewed through a JSON-LD context.
///
/// Views created with [`using`](Self::using) write through the dispatcher,
/// so listeners registered on [`events`](Self::events) observe their changes.
#[derive(Clone)]
pub struct LdoDataset {
    events: SubscribableDataset,
    shared: SharedDataset,
}

impl LdoDataset {
    /// An empty dataset.
    pub fn new() -> Self {
        Self::from_dataset(ExtendedDataset::new())
    }

    /// Wrap `dataset`.
    pub fn from_dataset(dataset: ExtendedDataset) -> Self {
        let events = SubscribableDataset::new(dataset);
        let shared = share(events.clone());
        LdoDataset { events, shared }
    }

    /// Parse an N-Quads document.
    pub fn from_nquads(txt: &str) -> Result<Self, LdoError> {
        Ok(Self::from_dataset(ldo_turtle::parse_nquads(txt)?))
    }

    /// Parse a Turtle document, resolving relative IRIs against `base`.
    pub fn from_turtle(txt: &str, base: Option<&str>) -> Result<Self, LdoError> {
        Ok(Self::from_dataset(ldo_turtle::parse_turtle(txt, base)?))
    }

    /// The handle given to views.
    pub fn dataset(&self) -> &SharedDataset {
        &self.shared
    }

    /// The dispatcher, for registering listeners.
    ///
    /// Listeners run once every borrow of the dataset is released,
    /// so they may read it through this handle, the [shared one](Self::dataset), or any view.
    pub fn events(&self) -> &SubscribableDataset {
        &self.events
    }

    /// A builder of views, resolving keys with `context`.
    pub fn using(&self, context: &JsonValue) -> Result<ProxyBuilder, LdoError> {
        Ok(open_graph(self.shared.clone(), context)?)
    }

    /// A transaction over the whole dataset.
    pub fn start_transaction(&self) -> TransactionDataset<SubscribableDataset> {
        self.events.start_transaction()
    }

    /// The number of quads.
    pub fn size(&self) -> usize {
        self.events.size()
    }

    /// Serialize the whole dataset as N-Quads.
    pub fn to_nquads(&self) -> String {
        ldo_turtle::to_nquads(&self.events)
    }
}

impl Default for LdoDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LdoDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LdoDataset").field(&self.events).finish()
    }
}
