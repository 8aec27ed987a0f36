//! Transactional overlay over a parent dataset.
use crate::TransactionError;
use ldo_dataset::{Dataset, DatasetChanges, MutableDataset, QuadIter};
use ldo_term::{Quad, QuadPattern};

#[derive(Clone, Debug)]
enum State {
    Pending,
    Committed(DatasetChanges),
    RolledBack,
}

/// A dataset layering pending changes over a parent dataset.
///
/// Reads are computed lazily as `parent ⊖ removed ⊕ added`,
/// against the state of the parent at read time:
/// changes made to the parent by other code while the transaction is open
/// are visible, unless masked by the pending changes.
///
/// The parent is held by value;
/// use `&mut D`, an `Rc<RefCell<D>>` or a [`SubscribableDataset`](crate::SubscribableDataset)
/// handle to wrap a dataset owned elsewhere.
///
/// Since a transaction is itself a [`MutableDataset`], transactions nest.
///
/// Abandoning a transaction is simply dropping it without committing.
#[derive(Clone, Debug)]
pub struct TransactionDataset<P: MutableDataset> {
    parent: P,
    changes: DatasetChanges,
    state: State,
}

impl<P: MutableDataset> TransactionDataset<P> {
    /// Open a transaction over `parent`.
    pub fn new(parent: P) -> Self {
        TransactionDataset {
            parent,
            changes: DatasetChanges::default(),
            state: State::Pending,
        }
    }

    /// The parent of this transaction.
    pub fn parent(&self) -> &P {
        &self.parent
    }

    /// Close this transaction (committed or not) and give back its parent.
    pub fn into_parent(self) -> P {
        self.parent
    }

    /// The pending changes of this transaction.
    ///
    /// They may include quads that the parent already contains (resp. lacks);
    /// those are filtered out on [`commit`](Self::commit).
    pub fn changes(&self) -> &DatasetChanges {
        &self.changes
    }

    /// Whether this transaction has pending changes.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Whether this transaction has been committed and not rolled back.
    pub fn is_committed(&self) -> bool {
        matches!(self.state, State::Committed(_))
    }

    /// The changes actually applied to the parent by [`commit`](Self::commit),
    /// until the transaction is [rolled back](Self::rollback).
    pub fn committed_changes(&self) -> Option<&DatasetChanges> {
        match &self.state {
            State::Committed(changes) => Some(changes),
            _ => None,
        }
    }

    /// Apply the pending changes to the parent.
    ///
    /// Only the quads that the parent lacks are added,
    /// and only the quads that it contains are removed;
    /// this delta is remembered for [`rollback`](Self::rollback).
    ///
    /// A transaction can only be committed once.
    pub fn commit(&mut self) -> Result<(), TransactionError> {
        if !matches!(self.state, State::Pending) {
            return Err(TransactionError::AlreadyCommitted);
        }
        let delta = DatasetChanges::new(
            self.changes
                .added_quads()
                .filter(|q| !self.parent.has(q))
                .collect::<Vec<_>>(),
            self.changes
                .removed_quads()
                .filter(|q| self.parent.has(q))
                .collect::<Vec<_>>(),
        );
        let applied = self.parent.bulk(&delta);
        log::debug!(
            "committed transaction: +{} -{}",
            applied.added().map(Dataset::size).unwrap_or(0),
            applied.removed().map(Dataset::size).unwrap_or(0),
        );
        self.state = State::Committed(applied);
        Ok(())
    }

    /// Undo the changes applied by [`commit`](Self::commit).
    ///
    /// Fails if the transaction was not committed, or was already rolled back.
    pub fn rollback(&mut self) -> Result<(), TransactionError> {
        match std::mem::replace(&mut self.state, State::RolledBack) {
            State::Committed(applied) => {
                let undone = self.parent.bulk(&applied.inverse());
                log::debug!("rolled back transaction: {} change(s) undone", undone.len());
                Ok(())
            }
            other => {
                self.state = other;
                Err(TransactionError::NotCommitted)
            }
        }
    }

    /// Open a nested transaction over this one.
    pub fn start_transaction(&mut self) -> TransactionDataset<&mut Self> {
        TransactionDataset::new(self)
    }

    fn is_overridden(&self, quad: &Quad) -> bool {
        self.changes.removed().is_some_and(|d| d.has(quad))
            || self.changes.added().is_some_and(|d| d.has(quad))
    }
}

impl<P: MutableDataset> Dataset for TransactionDataset<P> {
    fn quads(&self) -> QuadIter<'_> {
        self.quads_matching(&QuadPattern::any())
    }

    fn quads_matching(&self, pattern: &QuadPattern) -> QuadIter<'_> {
        let added: Vec<Quad> = self
            .changes
            .added_quads()
            .filter(|q| pattern.matches(q))
            .collect();
        Box::new(
            self.parent
                .quads_matching(pattern)
                .filter(move |q| !self.is_overridden(q))
                .chain(added),
        )
    }

    fn size(&self) -> usize {
        let added = self
            .changes
            .added_quads()
            .filter(|q| !self.parent.has(q))
            .count();
        let removed = self
            .changes
            .removed_quads()
            .filter(|q| self.parent.has(q))
            .count();
        self.parent.size() + added - removed
    }

    fn has(&self, quad: &Quad) -> bool {
        if self.changes.removed().is_some_and(|d| d.has(quad)) {
            false
        } else if self.changes.added().is_some_and(|d| d.has(quad)) {
            true
        } else {
            self.parent.has(quad)
        }
    }
}

impl<P: MutableDataset> MutableDataset for TransactionDataset<P> {
    fn add(&mut self, quad: Quad) -> bool {
        let inserted = !self.has(&quad);
        self.changes.add(quad);
        inserted
    }

    fn delete(&mut self, quad: &Quad) -> bool {
        let present = self.has(quad);
        self.changes.remove(quad.clone());
        present
    }

    fn bulk(&mut self, changes: &DatasetChanges) -> DatasetChanges {
        let removed: Vec<Quad> = changes.removed_quads().filter(|q| self.has(q)).collect();
        let added: Vec<Quad> = changes.added_quads().filter(|q| !self.has(q)).collect();
        self.changes.merge(changes);
        DatasetChanges::new(added, removed)
    }
}
