use crate::_array::CollectionState;
use crate::_subject::SubjectState;
use crate::_writer::{PropertyInfo, ValueShape};
use crate::context::ContextUtil;
use crate::language::{write_language, LanguageKey};
use crate::scope::ScopeMembers;
use crate::{ArrayProxy, CollectionTarget, ProxyError, ScopedView, SubjectProxy};
use ldo_dataset::{DatasetChanges, SharedDataset};
use ldo_term::ns::rdf;
use ldo_term::{Quad, QuadPattern, Term};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The configurable part of a [`ProxyContext`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyContextOptions {
    /// The graphs in which new quads are written
    pub write_graphs: Vec<Term>,
    /// Preferred languages, used to read and write language-tagged strings.
    ///
    /// Besides language tags, it may contain `"@none"` (untagged strings)
    /// and `"@other"` (any language not listed explicitly).
    pub language_ordering: Vec<String>,
}

impl Default for ProxyContextOptions {
    fn default() -> Self {
        ProxyContextOptions {
            write_graphs: vec![Term::DefaultGraph],
            language_ordering: ["@none", "en", "@other"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Overrides applied when [duplicating](ProxyContext::duplicate) a context.
#[derive(Clone, Default)]
pub struct ContextOverrides {
    /// Replaces the dataset
    pub dataset: Option<SharedDataset>,
    /// Replaces the write graphs
    pub write_graphs: Option<Vec<Term>>,
    /// Replaces the language ordering
    pub language_ordering: Option<Vec<String>>,
}

impl fmt::Debug for ContextOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextOverrides")
            .field("dataset", &self.dataset.is_some())
            .field("write_graphs", &self.write_graphs)
            .field("language_ordering", &self.language_ordering)
            .finish()
    }
}

/// Everything a view needs to read and write:
/// the dataset, the JSON-LD context, the write graphs and the language ordering.
///
/// A context also caches the views created through it,
/// so that a given node (or collection) is always represented by the same view.
/// [Duplicates](Self::duplicate) start with empty caches.
/// Scoped contexts (see [`rescope`](crate::rescope)) cache nothing:
/// they hand out the views of the context they were derived from,
/// with their scope pushed on them.
pub struct ProxyContext {
    dataset: SharedDataset,
    context: Rc<ContextUtil>,
    options: ProxyContextOptions,
    subjects: RefCell<HashMap<Term, Rc<SubjectState>>>,
    collections: RefCell<HashMap<CollectionTarget, Rc<CollectionState>>>,
    scope: Option<ScopeLink>,
}

/// Where a scoped context comes from.
struct ScopeLink {
    origin: Rc<ProxyContext>,
    token: u64,
    members: Rc<ScopeMembers>,
}

impl ProxyContext {
    /// Build a context.
    pub fn new(
        dataset: SharedDataset,
        context: ContextUtil,
        options: ProxyContextOptions,
    ) -> Rc<Self> {
        Self::build(dataset, Rc::new(context), options)
    }

    fn build(
        dataset: SharedDataset,
        context: Rc<ContextUtil>,
        options: ProxyContextOptions,
    ) -> Rc<Self> {
        Self::build_scoped(dataset, context, options, None)
    }

    fn build_scoped(
        dataset: SharedDataset,
        context: Rc<ContextUtil>,
        options: ProxyContextOptions,
        scope: Option<ScopeLink>,
    ) -> Rc<Self> {
        Rc::new(ProxyContext {
            dataset,
            context,
            options,
            subjects: RefCell::new(HashMap::new()),
            collections: RefCell::new(HashMap::new()),
            scope,
        })
    }

    /// The dataset that views read and write.
    pub fn dataset(&self) -> &SharedDataset {
        &self.dataset
    }

    /// The JSON-LD context.
    pub fn context_util(&self) -> &ContextUtil {
        &self.context
    }

    /// The options of this context.
    pub fn options(&self) -> &ProxyContextOptions {
        &self.options
    }

    /// The graphs in which new quads are written.
    pub fn write_graphs(&self) -> &[Term] {
        &self.options.write_graphs
    }

    /// The language preferences.
    pub fn language_ordering(&self) -> &[String] {
        &self.options.language_ordering
    }

    /// A copy of this context, with some options overridden, and empty view caches.
    pub fn duplicate(&self, overrides: &ContextOverrides) -> Rc<Self> {
        let (dataset, options) = self.overridden(overrides);
        Self::build(dataset, Rc::clone(&self.context), options)
    }

    /// A copy of this context, with some options overridden,
    /// handing out the views of `self` within scope `token`.
    pub(crate) fn scoped(
        self: &Rc<Self>,
        overrides: &ContextOverrides,
        token: u64,
        members: &Rc<ScopeMembers>,
    ) -> Rc<Self> {
        let (dataset, options) = self.overridden(overrides);
        let link = ScopeLink {
            origin: Rc::clone(self),
            token,
            members: Rc::clone(members),
        };
        Self::build_scoped(dataset, Rc::clone(&self.context), options, Some(link))
    }

    /// Whether this context was created by a [`rescope`](crate::rescope).
    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }

    fn overridden(&self, overrides: &ContextOverrides) -> (SharedDataset, ProxyContextOptions) {
        let options = ProxyContextOptions {
            write_graphs: overrides
                .write_graphs
                .clone()
                .unwrap_or_else(|| self.options.write_graphs.clone()),
            language_ordering: overrides
                .language_ordering
                .clone()
                .unwrap_or_else(|| self.options.language_ordering.clone()),
        };
        let dataset = overrides
            .dataset
            .clone()
            .unwrap_or_else(|| Rc::clone(&self.dataset));
        (dataset, options)
    }

    /// Push this context's scope on `view`.
    fn enter(self: &Rc<Self>, link: &ScopeLink, view: &dyn ScopedView) {
        link.members
            .enter(view.scopes(), link.token, Rc::clone(self));
    }

    /// The view of subject `id`.
    pub fn subject(self: &Rc<Self>, id: Term) -> SubjectProxy {
        if let Some(link) = &self.scope {
            let view = link.origin.subject(id);
            self.enter(link, &view);
            return view;
        }
        let state = Rc::clone(
            self.subjects
                .borrow_mut()
                .entry(id.clone())
                .or_insert_with(|| Rc::new(SubjectState::new(id))),
        );
        SubjectProxy::new(Rc::clone(self), state)
    }

    /// The view of the collection `target`.
    pub fn collection(self: &Rc<Self>, target: CollectionTarget) -> ArrayProxy {
        self.collection_of(target, ValueShape::default())
    }

    pub(crate) fn collection_of(
        self: &Rc<Self>,
        target: CollectionTarget,
        shape: ValueShape,
    ) -> ArrayProxy {
        if let Some(link) = &self.scope {
            let view = link.origin.collection_of(target, shape);
            self.enter(link, &view);
            return view;
        }
        let state = Rc::clone(
            self.collections
                .borrow_mut()
                .entry(target.clone())
                .or_insert_with(|| Rc::new(CollectionState::new(target, shape))),
        );
        ArrayProxy::new(Rc::clone(self), state)
    }

    pub(crate) fn matching(&self, pattern: &QuadPattern) -> Vec<Quad> {
        self.dataset.borrow().quads_matching(pattern).collect()
    }

    /// Apply `changes`; listeners of the dataset run once it is no longer borrowed.
    pub(crate) fn apply(&self, changes: &DatasetChanges) -> DatasetChanges {
        if changes.is_empty() {
            return DatasetChanges::default();
        }
        let (effective, deferred) = self.dataset.borrow_mut().bulk_deferred(changes);
        log::trace!(
            "applied {} of {} change(s) to the dataset",
            effective.len(),
            changes.len()
        );
        deferred.run();
        effective
    }

    /// Move the cached views of `old` (and of collections mentioning it) to `new`.
    pub(crate) fn migrate(&self, old: &Term, new: &Term) {
        {
            let mut subjects = self.subjects.borrow_mut();
            if let Some(state) = subjects.remove(old) {
                subjects.insert(new.clone(), state);
            }
        }
        let mut collections = self.collections.borrow_mut();
        let states: Vec<_> = collections.drain().map(|(_, state)| state).collect();
        for state in states {
            state.rename(old, new);
            collections.insert(state.target(), state);
        }
    }

    pub(crate) fn property_info(
        &self,
        key: &str,
        types: &[String],
    ) -> Result<PropertyInfo, ProxyError> {
        let iri = self.context.key_to_iri(key, types);
        let predicate = Term::iri(&iri)?;
        Ok(PropertyInfo {
            predicate,
            is_set: self.context.is_set(key, types),
            shape: ValueShape {
                datatype: self.context.declared_type(key, types).cloned(),
                lang_string: self.context.is_lang_string(key, types),
                is_type: iri == rdf::type_,
            },
        })
    }

    /// The rdf:type IRIs of `id`, sorted.
    pub(crate) fn types_of(&self, id: &Term) -> Vec<String> {
        let pattern = QuadPattern::new(
            Some(id.clone()),
            Some(Term::new_iri_unchecked(rdf::type_)),
            None,
            None,
        );
        let mut types: Vec<String> = self
            .matching(&pattern)
            .iter()
            .filter(|q| q.o().is_iri())
            .map(|q| q.o().value().to_string())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    pub(crate) fn write_language(&self) -> LanguageKey {
        write_language(&self.options.language_ordering)
    }
}

impl fmt::Debug for ProxyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyContext")
            .field("write_graphs", &self.options.write_graphs)
            .field("language_ordering", &self.options.language_ordering)
            .finish()
    }
}
