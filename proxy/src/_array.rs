use crate::_subject::term_value;
use crate::_writer::{id_string, ValueShape, Writer};
use crate::{ProxyContext, ProxyError, ScopeStack, ScopedView, Value};
use ldo_dataset::{Dataset, DatasetChanges, ExtendedDataset};
use ldo_term::{Quad, QuadPattern, Term};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// What a collection view shows:
/// the objects (or the subjects) of the quads matching a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollectionTarget {
    pattern: QuadPattern,
    subject_oriented: bool,
}

impl CollectionTarget {
    /// The objects of the quads matching `pattern`.
    pub fn objects(pattern: QuadPattern) -> Self {
        CollectionTarget {
            pattern,
            subject_oriented: false,
        }
    }

    /// The subjects of the quads matching `pattern`.
    pub fn subjects(pattern: QuadPattern) -> Self {
        CollectionTarget {
            pattern,
            subject_oriented: true,
        }
    }

    /// The pattern of this collection.
    pub fn pattern(&self) -> &QuadPattern {
        &self.pattern
    }

    /// Whether the members of this collection are subjects.
    pub fn is_subject_oriented(&self) -> bool {
        self.subject_oriented
    }

    fn member<'a>(&self, quad: &'a Quad) -> &'a Term {
        if self.subject_oriented {
            quad.s()
        } else {
            quad.o()
        }
    }

    /// The pattern of the quads making `member` part of this collection.
    fn member_pattern(&self, member: &Term) -> QuadPattern {
        let mut pattern = self.pattern.clone();
        if self.subject_oriented {
            pattern.subject = Some(member.clone());
        } else {
            pattern.object = Some(member.clone());
        }
        pattern
    }

    fn renamed(&self, old: &Term, new: &Term) -> Self {
        let rename = |t: &Option<Term>| {
            t.as_ref()
                .map(|t| if t == old { new.clone() } else { t.clone() })
        };
        CollectionTarget {
            pattern: QuadPattern::new(
                rename(&self.pattern.subject),
                rename(&self.pattern.predicate),
                rename(&self.pattern.object),
                rename(&self.pattern.graph),
            ),
            subject_oriented: self.subject_oriented,
        }
    }
}

pub(crate) struct CollectionState {
    target: RefCell<CollectionTarget>,
    shape: ValueShape,
    order: RefCell<Vec<Term>>,
    scopes: ScopeStack,
}

impl CollectionState {
    pub fn new(target: CollectionTarget, shape: ValueShape) -> Self {
        CollectionState {
            target: RefCell::new(target),
            shape,
            order: RefCell::new(Vec::new()),
            scopes: ScopeStack::default(),
        }
    }

    pub fn target(&self) -> CollectionTarget {
        self.target.borrow().clone()
    }

    pub fn rename(&self, old: &Term, new: &Term) {
        let renamed = self.target().renamed(old, new);
        *self.target.borrow_mut() = renamed;
        for member in self.order.borrow_mut().iter_mut() {
            if member == old {
                *member = new.clone();
            }
        }
    }
}

enum Slot {
    Existing(Term),
    New(Value),
}

fn existing<I: IntoIterator<Item = Term>>(terms: I) -> Vec<Slot> {
    terms.into_iter().map(Slot::Existing).collect()
}

/// An ordered, duplicate-free view on a collection of terms.
///
/// The order is kept in memory, and reconciled with the dataset on every read:
/// members still in the dataset keep their position,
/// members gone from the dataset are dropped,
/// and new members are appended in store order.
///
/// Every mutator computes the resulting list of members,
/// then applies the quads to remove and to add as a single change.
/// Adding a member already present is a no-op.
///
/// In a [subject-oriented](CollectionTarget::subjects) collection,
/// new members must already match the pattern of the collection
/// (possibly through the quads of an object literal being added);
/// literals are always rejected.
#[derive(Clone)]
pub struct ArrayProxy {
    base: Rc<ProxyContext>,
    state: Rc<CollectionState>,
}

impl ArrayProxy {
    pub(crate) fn new(base: Rc<ProxyContext>, state: Rc<CollectionState>) -> Self {
        ArrayProxy { base, state }
    }

    /// What this collection shows.
    pub fn target(&self) -> CollectionTarget {
        self.state.target()
    }

    /// Whether `self` and `other` are the same view.
    pub fn ptr_eq(&self, other: &ArrayProxy) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub(crate) fn terms(&self) -> Vec<Term> {
        self.reconcile(&self.context())
    }

    fn reconcile(&self, ctx: &ProxyContext) -> Vec<Term> {
        let target = self.state.target();
        let mut seen = HashSet::new();
        let current: Vec<Term> = ctx
            .matching(target.pattern())
            .iter()
            .map(|q| target.member(q).clone())
            .filter(|t| seen.insert(t.clone()))
            .collect();
        let mut order = self.state.order.borrow_mut();
        order.retain(|t| seen.contains(t));
        let known: HashSet<Term> = order.iter().cloned().collect();
        order.extend(current.into_iter().filter(|t| !known.contains(t)));
        order.clone()
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.terms().len()
    }

    /// Whether this collection is empty.
    pub fn is_empty(&self) -> bool {
        self.terms().is_empty()
    }

    /// The member at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        let ctx = self.context();
        self.reconcile(&ctx)
            .get(index)
            .map(|t| term_value(&ctx, t))
    }

    /// All members.
    pub fn values(&self) -> Vec<Value> {
        let ctx = self.context();
        self.reconcile(&ctx)
            .iter()
            .map(|t| term_value(&ctx, t))
            .collect()
    }

    fn commit(&self, slots: Vec<Slot>) -> Result<(), ProxyError> {
        let ctx = self.context();
        let target = self.state.target();
        let before = self.reconcile(&ctx);
        let mut writer = Writer::new(&ctx);
        let mut after: Vec<Term> = Vec::with_capacity(slots.len());
        for slot in slots {
            let term = match slot {
                Slot::Existing(term) => term,
                Slot::New(value) => {
                    let mark = writer.quads().len();
                    let Some(term) = writer.object_term(&self.state.shape, &value)? else {
                        continue;
                    };
                    // a value that is already a member writes nothing
                    if before.contains(&term) || after.contains(&term) {
                        writer.truncate(mark);
                    }
                    term
                }
            };
            if target.subject_oriented && term.is_literal() {
                return Err(ProxyError::LiteralInSubjectCollection);
            }
            if !after.contains(&term) {
                after.push(term);
            }
        }

        let new_members: Vec<&Term> = after.iter().filter(|t| !before.contains(t)).collect();
        let mut added = Vec::new();
        if target.subject_oriented {
            let scratch: ExtendedDataset = writer.quads().iter().cloned().collect();
            for member in &new_members {
                let pattern = target.member_pattern(member);
                let satisfied = scratch.quads_matching(&pattern).next().is_some()
                    || !ctx.matching(&pattern).is_empty();
                if !satisfied {
                    return Err(ProxyError::PatternNotSatisfied {
                        id: id_string(member),
                        pattern: target.pattern().to_string(),
                    });
                }
            }
        } else if !new_members.is_empty() {
            let pattern = target.pattern();
            let (Some(subject), Some(predicate)) = (&pattern.subject, &pattern.predicate) else {
                return Err(ProxyError::IncompletePattern(pattern.to_string()));
            };
            let graphs = match &pattern.graph {
                Some(graph) => vec![graph.clone()],
                None => ctx.write_graphs().to_vec(),
            };
            for member in &new_members {
                for graph in &graphs {
                    added.push(Quad::new(
                        subject.clone(),
                        predicate.clone(),
                        (*member).clone(),
                        graph.clone(),
                    )?);
                }
            }
        }
        let removed: Vec<Quad> = before
            .iter()
            .filter(|t| !after.contains(t))
            .flat_map(|t| ctx.matching(&target.member_pattern(t)))
            .collect();
        added.extend(writer.into_quads());

        let changes = DatasetChanges::new(added, removed);
        log::trace!(
            "collection {}: {} member(s), {} change(s)",
            target.pattern(),
            after.len(),
            changes.len()
        );
        ctx.apply(&changes);
        *self.state.order.borrow_mut() = after;
        Ok(())
    }

    /// Remove `delete_count` members from `start`, and insert `items` in their place.
    ///
    /// Return the removed members.
    /// `start` and `delete_count` are clamped to the length of the collection.
    pub fn splice(
        &self,
        start: usize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> Result<Vec<Value>, ProxyError> {
        let ctx = self.context();
        let terms = self.reconcile(&ctx);
        let start = start.min(terms.len());
        let end = start.saturating_add(delete_count).min(terms.len());
        let removed = terms[start..end]
            .iter()
            .map(|t| term_value(&ctx, t))
            .collect();
        let slots = terms[..start]
            .iter()
            .cloned()
            .map(Slot::Existing)
            .chain(items.into_iter().map(Slot::New))
            .chain(terms[end..].iter().cloned().map(Slot::Existing))
            .collect();
        self.commit(slots)?;
        Ok(removed)
    }

    /// Append `value`, and return the new length.
    pub fn push<V: Into<Value>>(&self, value: V) -> Result<usize, ProxyError> {
        self.splice(usize::MAX, 0, vec![value.into()])?;
        Ok(self.len())
    }

    /// Remove and return the last member.
    pub fn pop(&self) -> Result<Option<Value>, ProxyError> {
        match self.len() {
            0 => Ok(None),
            len => Ok(self.splice(len - 1, 1, Vec::new())?.pop()),
        }
    }

    /// Remove and return the first member.
    pub fn shift(&self) -> Result<Option<Value>, ProxyError> {
        Ok(self.splice(0, 1, Vec::new())?.pop())
    }

    /// Insert `value` first, and return the new length.
    pub fn unshift<V: Into<Value>>(&self, value: V) -> Result<usize, ProxyError> {
        self.splice(0, 0, vec![value.into()])?;
        Ok(self.len())
    }

    /// Replace the members from `start` to `end` (excluded) with `value`.
    pub fn fill<V: Into<Value>>(
        &self,
        value: V,
        start: usize,
        end: Option<usize>,
    ) -> Result<(), ProxyError> {
        let value = value.into();
        let terms = self.terms();
        let end = end.unwrap_or(terms.len()).min(terms.len());
        let start = start.min(end);
        let slots = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                if (start..end).contains(&i) {
                    Slot::New(value.clone())
                } else {
                    Slot::Existing(t)
                }
            })
            .collect();
        self.commit(slots)
    }

    /// Copy the members from `start` to `end` (excluded) over the members from `target`.
    ///
    /// Overwritten members leave the collection.
    pub fn copy_within(
        &self,
        target: usize,
        start: usize,
        end: Option<usize>,
    ) -> Result<(), ProxyError> {
        let mut terms = self.terms();
        let len = terms.len();
        let end = end.unwrap_or(len).min(len);
        let start = start.min(end);
        if target < len {
            let count = (end - start).min(len - target);
            let copied = terms[start..start + count].to_vec();
            terms[target..target + count].clone_from_slice(&copied);
        }
        self.commit(existing(terms))
    }

    /// Sort members by their string form.
    pub fn sort(&self) -> Result<(), ProxyError> {
        let mut terms = self.terms();
        terms.sort_by_cached_key(|t| {
            if t.is_literal() {
                t.value().to_string()
            } else {
                id_string(t)
            }
        });
        self.commit(existing(terms))
    }

    /// Sort members with `compare`.
    pub fn sort_by<F>(&self, mut compare: F) -> Result<(), ProxyError>
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let ctx = self.context();
        let mut members: Vec<(Term, Value)> = self
            .reconcile(&ctx)
            .into_iter()
            .map(|t| {
                let value = term_value(&ctx, &t);
                (t, value)
            })
            .collect();
        members.sort_by(|a, b| compare(&a.1, &b.1));
        self.commit(existing(members.into_iter().map(|(t, _)| t)))
    }

    /// Reverse the order of members.
    pub fn reverse(&self) -> Result<(), ProxyError> {
        let mut terms = self.terms();
        terms.reverse();
        self.commit(existing(terms))
    }

    /// Replace the member at `index` with `value` (or append it if `index` is the length).
    pub fn set<V: Into<Value>>(&self, index: usize, value: V) -> Result<(), ProxyError> {
        let len = self.len();
        if index > len {
            return Err(ProxyError::IndexOutOfBounds { index, len });
        }
        self.splice(index, 1, vec![value.into()]).map(|_| ())
    }

    /// Remove the member at `index`, and return whether there was one.
    pub fn delete(&self, index: usize) -> Result<bool, ProxyError> {
        Ok(!self.splice(index, 1, Vec::new())?.is_empty())
    }

    fn lookup(&self, ctx: &ProxyContext, value: &Value) -> Option<Term> {
        Writer::new(ctx)
            .object_term(&self.state.shape, value)
            .ok()
            .flatten()
    }

    /// Whether `value` is a member.
    pub fn has(&self, value: &Value) -> bool {
        let ctx = self.context();
        match self.lookup(&ctx, value) {
            Some(term) => self.reconcile(&ctx).contains(&term),
            None => false,
        }
    }

    /// Add `value`, unless it is already a member; return whether it was added.
    pub fn add<V: Into<Value>>(&self, value: V) -> Result<bool, ProxyError> {
        let value = value.into();
        if self.has(&value) {
            return Ok(false);
        }
        self.push(value)?;
        Ok(true)
    }

    /// Remove `value`, and return whether it was a member.
    pub fn remove(&self, value: &Value) -> Result<bool, ProxyError> {
        let ctx = self.context();
        let Some(term) = self.lookup(&ctx, value) else {
            return Ok(false);
        };
        let terms = self.reconcile(&ctx);
        if !terms.contains(&term) {
            return Ok(false);
        }
        self.commit(existing(terms.into_iter().filter(|t| *t != term)))?;
        Ok(true)
    }

    /// Remove every member.
    pub fn clear(&self) -> Result<(), ProxyError> {
        self.commit(Vec::new())
    }
}

impl ScopedView for ArrayProxy {
    fn scopes(&self) -> &ScopeStack {
        &self.state.scopes
    }

    fn base_context(&self) -> &Rc<ProxyContext> {
        &self.base
    }
}

impl fmt::Debug for ArrayProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayProxy")
            .field("target", &*self.state.target.borrow())
            .finish()
    }
}
