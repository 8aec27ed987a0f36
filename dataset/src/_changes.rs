use crate::{Dataset, ExtendedDataset, MutableDataset};
use ldo_term::{Quad, QuadPattern};

/// A set of changes to apply to, or that were applied to, a dataset.
///
/// Once normalized, `added` and `removed` are disjoint,
/// and an empty side is represented as `None`.
/// Every constructor and mutator of this type keeps it normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetChanges {
    added: Option<ExtendedDataset>,
    removed: Option<ExtendedDataset>,
}

impl DatasetChanges {
    /// Build a normalized set of changes.
    ///
    /// A quad present on both sides is kept as added only,
    /// since removals are applied before insertions.
    pub fn new<A, R>(added: A, removed: R) -> Self
    where
        A: IntoIterator<Item = Quad>,
        R: IntoIterator<Item = Quad>,
    {
        let added: ExtendedDataset = added.into_iter().collect();
        let removed: ExtendedDataset = removed.into_iter().filter(|q| !added.has(q)).collect();
        Self::from_parts(added, removed)
    }

    /// Build changes that only insert quads.
    pub fn adding<A: IntoIterator<Item = Quad>>(added: A) -> Self {
        Self::new(added, None)
    }

    /// Build changes that only remove quads.
    pub fn removing<R: IntoIterator<Item = Quad>>(removed: R) -> Self {
        Self::new(None, removed)
    }

    fn from_parts(added: ExtendedDataset, removed: ExtendedDataset) -> Self {
        DatasetChanges {
            added: non_empty(added),
            removed: non_empty(removed),
        }
    }

    /// The inserted quads, if any.
    pub fn added(&self) -> Option<&ExtendedDataset> {
        self.added.as_ref()
    }

    /// The removed quads, if any.
    pub fn removed(&self) -> Option<&ExtendedDataset> {
        self.removed.as_ref()
    }

    /// Iterate over the inserted quads.
    pub fn added_quads(&self) -> impl Iterator<Item = Quad> + '_ {
        self.added.iter().flat_map(|d| d.quads())
    }

    /// Iterate over the removed quads.
    pub fn removed_quads(&self) -> impl Iterator<Item = Quad> + '_ {
        self.removed.iter().flat_map(|d| d.quads())
    }

    /// Whether these changes neither add nor remove anything.
    pub fn is_empty(&self) -> bool {
        self.added.is_none() && self.removed.is_none()
    }

    /// The total number of quads added or removed.
    pub fn len(&self) -> usize {
        self.added.as_ref().map(Dataset::size).unwrap_or(0)
            + self.removed.as_ref().map(Dataset::size).unwrap_or(0)
    }

    /// Record the insertion of `quad`, cancelling a pending removal of it.
    pub fn add(&mut self, quad: Quad) {
        if let Some(removed) = self.removed.as_mut() {
            removed.delete(&quad);
        }
        self.added.get_or_insert_with(ExtendedDataset::new).add(quad);
        self.normalize();
    }

    /// Record the removal of `quad`, cancelling a pending insertion of it.
    pub fn remove(&mut self, quad: Quad) {
        if let Some(added) = self.added.as_mut() {
            added.delete(&quad);
        }
        self.removed.get_or_insert_with(ExtendedDataset::new).add(quad);
        self.normalize();
    }

    /// Fold `other` into these changes, as if `other` was applied after `self`.
    ///
    /// An insertion in `other` cancels a pending removal in `self`,
    /// and a removal in `other` cancels a pending insertion.
    pub fn merge(&mut self, other: &DatasetChanges) {
        for q in other.removed_quads() {
            self.remove(q);
        }
        for q in other.added_quads() {
            self.add(q);
        }
    }

    /// The changes that would undo these changes.
    pub fn inverse(&self) -> DatasetChanges {
        DatasetChanges {
            added: self.removed.clone(),
            removed: self.added.clone(),
        }
    }

    /// The subset of these changes matching `pattern`.
    pub fn matching(&self, pattern: &QuadPattern) -> DatasetChanges {
        let select = |d: &Option<ExtendedDataset>| -> ExtendedDataset {
            d.iter().flat_map(|d| d.quads_matching(pattern)).collect()
        };
        Self::from_parts(select(&self.added), select(&self.removed))
    }

    fn normalize(&mut self) {
        if self.added.as_ref().is_some_and(Dataset::is_empty) {
            self.added = None;
        }
        if self.removed.as_ref().is_some_and(Dataset::is_empty) {
            self.removed = None;
        }
    }
}

fn non_empty(d: ExtendedDataset) -> Option<ExtendedDataset> {
    if d.is_empty() {
        None
    } else {
        Some(d)
    }
}
