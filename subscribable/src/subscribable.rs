//! A dataset notifying listeners registered on quad patterns.
use crate::{SubscriptionError, TransactionDataset};
use ldo_dataset::{Dataset, DatasetChanges, Deferred, ExtendedDataset, MutableDataset, QuadIter};
use ldo_term::{Quad, QuadPattern};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A callback notified of the changes matching the pattern it was registered on.
pub type Listener = Rc<dyn Fn(&DatasetChanges)>;

/// Wrap a closure into a [`Listener`].
///
/// Keep a clone of the result to be able to [remove](SubscribableDataset::off) it later.
pub fn listener<F: Fn(&DatasetChanges) + 'static>(f: F) -> Listener {
    Rc::new(f)
}

/// The default value of [`SubscribableDataset::max_listeners`].
pub const DEFAULT_MAX_LISTENERS: usize = 10;

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

#[derive(Clone)]
struct Entry {
    listener: Listener,
    once: bool,
}

struct Registry {
    entries: HashMap<QuadPattern, Vec<Entry>>,
    /// Patterns, in the order they were first subscribed to
    order: Vec<QuadPattern>,
    max_listeners: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            entries: HashMap::new(),
            order: Vec::new(),
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

impl Registry {
    fn register(&mut self, pattern: QuadPattern, entry: Entry, prepend: bool) {
        let entries = self.entries.entry(pattern.clone()).or_default();
        if entries.is_empty() {
            self.order.push(pattern.clone());
        }
        if prepend {
            entries.insert(0, entry);
        } else {
            entries.push(entry);
        }
        if self.max_listeners > 0 && entries.len() > self.max_listeners {
            log::warn!(
                "possible listener leak: {} listeners registered on {pattern} (max is {})",
                entries.len(),
                self.max_listeners,
            );
        }
    }

    /// Drop `pattern` from the registry if it has no listener left.
    fn prune(&mut self, pattern: &QuadPattern) {
        if self.entries.get(pattern).is_some_and(Vec::is_empty) {
            self.entries.remove(pattern);
            self.order.retain(|p| p != pattern);
        }
    }
}

struct Inner<D> {
    dataset: RefCell<D>,
    registry: Rc<RefCell<Registry>>,
}

/// A dataset that notifies listeners of the changes made through it.
///
/// Listeners are registered on a [`QuadPattern`].
/// On every mutation, each changed quad is projected onto its 16 matching patterns
/// (see [`QuadPattern::projections`]);
/// every listener registered on one of these patterns is then called exactly once,
/// with all the (effective) changes of that mutation matching its pattern.
/// Listeners on the same pattern are called in registration order.
///
/// This type is a cheap-to-clone handle;
/// all clones share the same dataset and the same listeners.
/// Listeners are called after all internal borrows are released,
/// so they may read or mutate the dataset through another handle.
/// When this dataset is itself [shared](ldo_dataset::share),
/// mutations through the shared handle notify listeners once its guard is dropped
/// (see [`MutableDataset::bulk_deferred`]).
pub struct SubscribableDataset<D: MutableDataset = ExtendedDataset> {
    inner: Rc<Inner<D>>,
}

impl<D: MutableDataset> Clone for SubscribableDataset<D> {
    fn clone(&self) -> Self {
        SubscribableDataset {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<D: MutableDataset + Default> Default for SubscribableDataset<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: MutableDataset> fmt::Debug for SubscribableDataset<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscribableDataset")
            .field("size", &self.size())
            .field("patterns", &self.inner.registry.borrow().order)
            .finish()
    }
}

impl<D: MutableDataset> SubscribableDataset<D> {
    /// Wrap `dataset`.
    pub fn new(dataset: D) -> Self {
        SubscribableDataset {
            inner: Rc::new(Inner {
                dataset: RefCell::new(dataset),
                registry: Rc::new(RefCell::new(Registry::default())),
            }),
        }
    }

    /// Borrow the underlying dataset.
    ///
    /// # Panics
    /// If the dataset is being mutated.
    pub fn dataset(&self) -> Ref<'_, D> {
        self.inner.dataset.borrow()
    }

    /// Open a transaction over this dataset.
    ///
    /// Committing the transaction goes through [`bulk`](MutableDataset::bulk),
    /// so listeners observe the committed changes exactly once.
    pub fn start_transaction(&self) -> TransactionDataset<Self> {
        TransactionDataset::new(self.clone())
    }

    /// Register `listener` on `pattern`, after the listeners already registered on it.
    pub fn on(&self, pattern: QuadPattern, listener: Listener) -> Result<(), SubscriptionError> {
        self.register(pattern, listener, false, false)
    }

    /// Register `listener` on `pattern`, to be called at most once.
    pub fn once(&self, pattern: QuadPattern, listener: Listener) -> Result<(), SubscriptionError> {
        self.register(pattern, listener, true, false)
    }

    /// Register `listener` on `pattern`, before the listeners already registered on it.
    pub fn prepend_listener(
        &self,
        pattern: QuadPattern,
        listener: Listener,
    ) -> Result<(), SubscriptionError> {
        self.register(pattern, listener, false, true)
    }

    /// Register `listener` on `pattern`, before the listeners already registered on it,
    /// to be called at most once.
    pub fn prepend_once_listener(
        &self,
        pattern: QuadPattern,
        listener: Listener,
    ) -> Result<(), SubscriptionError> {
        self.register(pattern, listener, true, true)
    }

    fn register(
        &self,
        pattern: QuadPattern,
        listener: Listener,
        once: bool,
        prepend: bool,
    ) -> Result<(), SubscriptionError> {
        pattern.validate()?;
        self.inner
            .registry
            .borrow_mut()
            .register(pattern, Entry { listener, once }, prepend);
        Ok(())
    }

    /// Remove one registration of `listener` on `pattern` (the most recent one).
    ///
    /// Return `false` if `listener` was not registered on `pattern`.
    pub fn off(&self, pattern: &QuadPattern, listener: &Listener) -> bool {
        let mut registry = self.inner.registry.borrow_mut();
        let Some(entries) = registry.entries.get_mut(pattern) else {
            return false;
        };
        let Some(pos) = entries
            .iter()
            .rposition(|e| same_listener(&e.listener, listener))
        else {
            return false;
        };
        entries.remove(pos);
        registry.prune(pattern);
        true
    }

    /// Remove every registration of `listener`, whatever its pattern.
    pub fn remove_listener_from_all_events(&self, listener: &Listener) {
        let mut registry = self.inner.registry.borrow_mut();
        for entries in registry.entries.values_mut() {
            entries.retain(|e| !same_listener(&e.listener, listener));
        }
        for pattern in registry.order.clone() {
            registry.prune(&pattern);
        }
    }

    /// Remove all listeners registered on `pattern`,
    /// or all listeners altogether if `pattern` is `None`.
    pub fn remove_all_listeners(&self, pattern: Option<&QuadPattern>) {
        let mut registry = self.inner.registry.borrow_mut();
        match pattern {
            Some(pattern) => {
                registry.entries.remove(pattern);
                registry.order.retain(|p| p != pattern);
            }
            None => {
                registry.entries.clear();
                registry.order.clear();
            }
        }
    }

    /// The number of listeners registered on `pattern`.
    pub fn listener_count(&self, pattern: &QuadPattern) -> usize {
        self.inner
            .registry
            .borrow()
            .entries
            .get(pattern)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// The listeners registered on `pattern`, in calling order.
    pub fn listeners(&self, pattern: &QuadPattern) -> Vec<Listener> {
        self.inner
            .registry
            .borrow()
            .entries
            .get(pattern)
            .map(|entries| entries.iter().map(|e| e.listener.clone()).collect())
            .unwrap_or_default()
    }

    /// The patterns having at least one listener, in the order they were subscribed to.
    pub fn event_names(&self) -> Vec<QuadPattern> {
        self.inner.registry.borrow().order.clone()
    }

    /// Set the number of listeners per pattern above which a warning is logged.
    ///
    /// `0` means unlimited.
    pub fn set_max_listeners(&self, max: usize) {
        self.inner.registry.borrow_mut().max_listeners = max;
    }

    /// The number of listeners per pattern above which a warning is logged.
    pub fn max_listeners(&self) -> usize {
        self.inner.registry.borrow().max_listeners
    }

    fn notify(&self, changes: &DatasetChanges) {
        notify(&self.inner.registry, changes)
    }
}

/// Notify the listeners of `registry` of `changes`, which must have already been applied.
fn notify(registry: &RefCell<Registry>, changes: &DatasetChanges) {
    if changes.is_empty() {
        return;
    }
    let calls = {
        let mut registry = registry.borrow_mut();
        if registry.entries.is_empty() {
            return;
        }
        let mut pending: HashMap<QuadPattern, (Vec<Quad>, Vec<Quad>)> = HashMap::new();
        for (quad, added) in changes
            .added_quads()
            .map(|q| (q, true))
            .chain(changes.removed_quads().map(|q| (q, false)))
        {
            for pattern in QuadPattern::projections(&quad) {
                if registry.entries.contains_key(&pattern) {
                    let slot = pending.entry(pattern).or_default();
                    if added {
                        slot.0.push(quad.clone());
                    } else {
                        slot.1.push(quad.clone());
                    }
                }
            }
        }
        let mut calls = Vec::new();
        for pattern in registry.order.clone() {
            let Some((added, removed)) = pending.remove(&pattern) else {
                continue;
            };
            let batch = Rc::new(DatasetChanges::new(added, removed));
            if let Some(entries) = registry.entries.get_mut(&pattern) {
                log::trace!(
                    "dispatching {} change(s) to {} listener(s) on {pattern}",
                    batch.len(),
                    entries.len(),
                );
                calls.extend(
                    entries
                        .iter()
                        .map(|e| (e.listener.clone(), Rc::clone(&batch))),
                );
                entries.retain(|e| !e.once);
            }
            registry.prune(&pattern);
        }
        calls
    };
    for (listener, batch) in calls {
        listener(batch.as_ref());
    }
}

impl<D: MutableDataset> Dataset for SubscribableDataset<D> {
    fn quads(&self) -> QuadIter<'_> {
        let quads: Vec<Quad> = self.inner.dataset.borrow().quads().collect();
        Box::new(quads.into_iter())
    }

    fn quads_matching(&self, pattern: &QuadPattern) -> QuadIter<'_> {
        let quads: Vec<Quad> = self.inner.dataset.borrow().quads_matching(pattern).collect();
        Box::new(quads.into_iter())
    }

    fn size(&self) -> usize {
        self.inner.dataset.borrow().size()
    }

    fn has(&self, quad: &Quad) -> bool {
        self.inner.dataset.borrow().has(quad)
    }
}

impl<D: MutableDataset> MutableDataset for SubscribableDataset<D> {
    fn add(&mut self, quad: Quad) -> bool {
        let inserted = self.inner.dataset.borrow_mut().add(quad.clone());
        if inserted {
            self.notify(&DatasetChanges::adding([quad]));
        }
        inserted
    }

    fn delete(&mut self, quad: &Quad) -> bool {
        let removed = self.inner.dataset.borrow_mut().delete(quad);
        if removed {
            self.notify(&DatasetChanges::removing([quad.clone()]));
        }
        removed
    }

    fn bulk(&mut self, changes: &DatasetChanges) -> DatasetChanges {
        let effective = self.inner.dataset.borrow_mut().bulk(changes);
        self.notify(&effective);
        effective
    }

    fn bulk_deferred(&mut self, changes: &DatasetChanges) -> (DatasetChanges, Deferred) {
        let effective = self.inner.dataset.borrow_mut().bulk(changes);
        if effective.is_empty() {
            return (effective, Deferred::default());
        }
        let registry = Rc::clone(&self.inner.registry);
        let batch = effective.clone();
        (effective, Deferred::new(move || notify(&registry, &batch)))
    }
}
