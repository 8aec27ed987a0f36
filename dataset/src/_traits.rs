use crate::{DatasetChanges, ExtendedDataset};
use ldo_term::{Quad, QuadPattern, Term};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Type alias for the iterators returned by [`Dataset`] methods.
pub type QuadIter<'a> = Box<dyn Iterator<Item = Quad> + 'a>;

/// A dataset shared between several owners
/// (typically a builder and the views it produced).
pub type SharedDataset = Rc<RefCell<dyn MutableDataset>>;

/// Wrap a dataset into a [`SharedDataset`].
pub fn share<D: MutableDataset + 'static>(dataset: D) -> SharedDataset {
    Rc::new(RefCell::new(dataset))
}

/// Work postponed by [`MutableDataset::bulk_deferred`],
/// to be [run](Self::run) once the dataset is no longer borrowed.
#[must_use = "deferred work is lost unless it is run"]
#[derive(Default)]
pub struct Deferred(Option<Box<dyn FnOnce()>>);

impl Deferred {
    /// Postpone `f`.
    pub fn new<F: FnOnce() + 'static>(f: F) -> Self {
        Deferred(Some(Box::new(f)))
    }

    /// Whether there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Run the postponed work.
    pub fn run(self) {
        if let Some(f) = self.0 {
            f()
        }
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deferred({})", if self.is_empty() { "none" } else { "pending" })
    }
}

/// Generic trait for RDF datasets.
///
/// A dataset is a set of [`Quad`]s,
/// deduplicated by structural equality, and without any particular order.
///
/// This trait is object safe,
/// so heterogeneous datasets can be combined through `&dyn Dataset`.
pub trait Dataset {
    /// An iterator visiting all quads of this dataset in arbitrary order.
    fn quads(&self) -> QuadIter<'_>;

    /// An iterator visiting all quads matching the given pattern.
    ///
    /// Implementations should use their indexes rather than filtering [`quads`](Dataset::quads).
    fn quads_matching(&self, pattern: &QuadPattern) -> QuadIter<'_>;

    /// The number of quads in this dataset.
    fn size(&self) -> usize;

    /// Return `true` if this dataset contains the given quad.
    fn has(&self, quad: &Quad) -> bool;

    /// Return `true` if this dataset contains no quad.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Copy all quads matching the given terms into a new dataset.
    ///
    /// `None` acts as a wildcard.
    fn match_quads(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> ExtendedDataset {
        let pattern = QuadPattern::new(
            subject.cloned(),
            predicate.cloned(),
            object.cloned(),
            graph.cloned(),
        );
        self.quads_matching(&pattern).collect()
    }

    /// A new dataset containing the quads of `self` and of `other`.
    fn union(&self, other: &dyn Dataset) -> ExtendedDataset {
        self.quads().chain(other.quads()).collect()
    }

    /// A new dataset containing the quads present in both `self` and `other`.
    fn intersection(&self, other: &dyn Dataset) -> ExtendedDataset {
        self.quads().filter(|q| other.has(q)).collect()
    }

    /// A new dataset containing the quads of `self` that are not in `other`.
    fn difference(&self, other: &dyn Dataset) -> ExtendedDataset {
        self.quads().filter(|q| !other.has(q)).collect()
    }

    /// Return `true` if every quad of `other` is in `self`.
    fn contains(&self, other: &dyn Dataset) -> bool {
        other.quads().all(|q| self.has(&q))
    }

    /// Return `true` if `self` and `other` contain exactly the same quads.
    fn equals(&self, other: &dyn Dataset) -> bool {
        self.size() == other.size() && self.contains(other)
    }

    /// Copy this dataset into a new [`ExtendedDataset`].
    fn to_dataset(&self) -> ExtendedDataset {
        self.quads().collect()
    }
}

/// Generic trait for mutable RDF datasets.
pub trait MutableDataset: Dataset {
    /// Insert the given quad in this dataset.
    ///
    /// Return `true` iff the quad was actually inserted
    /// (i.e. it was not already present).
    fn add(&mut self, quad: Quad) -> bool;

    /// Remove the given quad from this dataset.
    ///
    /// Return `true` iff the quad was actually removed
    /// (i.e. it was present).
    fn delete(&mut self, quad: &Quad) -> bool;

    /// Apply a set of changes: the removed quads are deleted, then the added quads inserted.
    ///
    /// Return the effective changes,
    /// i.e. only the quads that were actually removed or inserted.
    fn bulk(&mut self, changes: &DatasetChanges) -> DatasetChanges {
        let mut removed = Vec::new();
        if let Some(to_remove) = changes.removed() {
            for q in to_remove.quads() {
                if self.delete(&q) {
                    removed.push(q);
                }
            }
        }
        let mut added = Vec::new();
        if let Some(to_add) = changes.added() {
            for q in to_add.quads() {
                if self.add(q.clone()) {
                    added.push(q);
                }
            }
        }
        DatasetChanges::new(added, removed)
    }

    /// Apply a set of changes like [`bulk`](Self::bulk),
    /// but postpone their side effects (such as notifying listeners)
    /// to the returned [`Deferred`].
    ///
    /// Callers holding a borrow of this dataset release it, then run the [`Deferred`].
    fn bulk_deferred(&mut self, changes: &DatasetChanges) -> (DatasetChanges, Deferred) {
        (self.bulk(changes), Deferred::default())
    }

    /// Remove all the quads matching `pattern`.
    ///
    /// Return the effective changes.
    fn delete_matches(&mut self, pattern: &QuadPattern) -> DatasetChanges {
        let matching: Vec<Quad> = self.quads_matching(pattern).collect();
        self.bulk(&DatasetChanges::new(None, matching))
    }

    /// Remove all the quads of this dataset.
    fn clear(&mut self) -> DatasetChanges {
        self.delete_matches(&QuadPattern::any())
    }

    /// Insert all the given quads, as one logical operation.
    ///
    /// Return the effective changes.
    fn add_all<I: IntoIterator<Item = Quad>>(&mut self, quads: I) -> DatasetChanges
    where
        Self: Sized,
    {
        self.bulk(&DatasetChanges::new(quads, None))
    }
}

//

impl<'a, D: Dataset + ?Sized> Dataset for &'a D {
    fn quads(&self) -> QuadIter<'_> {
        (**self).quads()
    }
    fn quads_matching(&self, pattern: &QuadPattern) -> QuadIter<'_> {
        (**self).quads_matching(pattern)
    }
    fn size(&self) -> usize {
        (**self).size()
    }
    fn has(&self, quad: &Quad) -> bool {
        (**self).has(quad)
    }
}

impl<'a, D: Dataset + ?Sized> Dataset for &'a mut D {
    fn quads(&self) -> QuadIter<'_> {
        (**self).quads()
    }
    fn quads_matching(&self, pattern: &QuadPattern) -> QuadIter<'_> {
        (**self).quads_matching(pattern)
    }
    fn size(&self) -> usize {
        (**self).size()
    }
    fn has(&self, quad: &Quad) -> bool {
        (**self).has(quad)
    }
}

impl<'a, D: MutableDataset + ?Sized> MutableDataset for &'a mut D {
    fn add(&mut self, quad: Quad) -> bool {
        (**self).add(quad)
    }
    fn delete(&mut self, quad: &Quad) -> bool {
        (**self).delete(quad)
    }
    fn bulk(&mut self, changes: &DatasetChanges) -> DatasetChanges {
        (**self).bulk(changes)
    }
    fn bulk_deferred(&mut self, changes: &DatasetChanges) -> (DatasetChanges, Deferred) {
        (**self).bulk_deferred(changes)
    }
    fn delete_matches(&mut self, pattern: &QuadPattern) -> DatasetChanges {
        (**self).delete_matches(pattern)
    }
}

// Iterators can not outlive the `Ref` guard,
// so reads through a shared handle are collected eagerly.
impl<D: Dataset + ?Sized> Dataset for Rc<RefCell<D>> {
    fn quads(&self) -> QuadIter<'_> {
        let quads: Vec<Quad> = self.borrow().quads().collect();
        Box::new(quads.into_iter())
    }
    fn quads_matching(&self, pattern: &QuadPattern) -> QuadIter<'_> {
        let quads: Vec<Quad> = self.borrow().quads_matching(pattern).collect();
        Box::new(quads.into_iter())
    }
    fn size(&self) -> usize {
        self.borrow().size()
    }
    fn has(&self, quad: &Quad) -> bool {
        self.borrow().has(quad)
    }
    fn match_quads(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> ExtendedDataset {
        self.borrow().match_quads(subject, predicate, object, graph)
    }
}

// Side effects of mutations run once the `RefMut` guard is dropped,
// so that they may borrow the shared handle again.
impl<D: MutableDataset + ?Sized> MutableDataset for Rc<RefCell<D>> {
    fn add(&mut self, quad: Quad) -> bool {
        !self.bulk(&DatasetChanges::adding([quad])).is_empty()
    }
    fn delete(&mut self, quad: &Quad) -> bool {
        !self.bulk(&DatasetChanges::removing([quad.clone()])).is_empty()
    }
    fn bulk(&mut self, changes: &DatasetChanges) -> DatasetChanges {
        let (effective, deferred) = self.borrow_mut().bulk_deferred(changes);
        deferred.run();
        effective
    }
    fn bulk_deferred(&mut self, changes: &DatasetChanges) -> (DatasetChanges, Deferred) {
        self.borrow_mut().bulk_deferred(changes)
    }
    fn delete_matches(&mut self, pattern: &QuadPattern) -> DatasetChanges {
        let matching: Vec<Quad> = self.borrow().quads_matching(pattern).collect();
        self.bulk(&DatasetChanges::removing(matching))
    }
}
