use crate::_writer::{parse_id, Writer};
use crate::context::ContextUtil;
use crate::{
    ArrayProxy, CollectionTarget, ContextError, ContextOverrides, LanguageMap, ProxyContext,
    ProxyContextOptions, ProxyError, SubjectProxy, Value,
};
use ldo_dataset::{DatasetChanges, SharedDataset};
use ldo_term::{QuadPattern, Term};
use serde_json::Value as JsonValue;
use std::rc::Rc;

/// Build views over `dataset`, with the JSON-LD `context`.
pub fn open_graph(dataset: SharedDataset, context: &JsonValue) -> Result<ProxyBuilder, ContextError> {
    let util = ContextUtil::new(context)?;
    Ok(ProxyBuilder::new(ProxyContext::new(
        dataset,
        util,
        ProxyContextOptions::default(),
    )))
}

/// Entry point for creating views.
///
/// Configuration methods ([`write`](Self::write), [`set_language_preferences`](Self::set_language_preferences))
/// return a new builder, whose views are independent of those of `self`.
#[derive(Clone, Debug)]
pub struct ProxyBuilder {
    ctx: Rc<ProxyContext>,
}

impl ProxyBuilder {
    /// A builder creating views in `ctx`.
    pub fn new(ctx: Rc<ProxyContext>) -> Self {
        ProxyBuilder { ctx }
    }

    /// The context of the views created by this builder.
    pub fn context(&self) -> &Rc<ProxyContext> {
        &self.ctx
    }

    /// A builder whose views write new quads in `graphs`.
    pub fn write<I: IntoIterator<Item = Term>>(&self, graphs: I) -> Self {
        self.with_overrides(&ContextOverrides {
            write_graphs: Some(graphs.into_iter().collect()),
            ..ContextOverrides::default()
        })
    }

    /// A builder whose views use the given language preferences.
    pub fn set_language_preferences<I, S>(&self, ordering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_overrides(&ContextOverrides {
            language_ordering: Some(ordering.into_iter().map(Into::into).collect()),
            ..ContextOverrides::default()
        })
    }

    /// A builder whose views use a duplicate of this builder's context.
    pub fn with_overrides(&self, overrides: &ContextOverrides) -> Self {
        ProxyBuilder::new(self.ctx.duplicate(overrides))
    }

    /// The view of the subject identified by `id`
    /// (an IRI, a compact IRI, or `_:label` for a blank node).
    pub fn from_subject(&self, id: &str) -> Result<SubjectProxy, ProxyError> {
        Ok(self.ctx.subject(parse_id(self.ctx.context_util(), id)?))
    }

    /// The view of subject `id`.
    pub fn from_subject_term(&self, id: Term) -> SubjectProxy {
        self.ctx.subject(id)
    }

    /// The collection of the subjects of the quads matching `(*, predicate, object, graph)`.
    pub fn match_subject(
        &self,
        predicate: Option<Term>,
        object: Option<Term>,
        graph: Option<Term>,
    ) -> ArrayProxy {
        self.ctx.collection(CollectionTarget::subjects(QuadPattern::new(
            None, predicate, object, graph,
        )))
    }

    /// The collection of the objects of the quads matching `(subject, predicate, *, graph)`.
    pub fn match_object(
        &self,
        subject: Option<Term>,
        predicate: Option<Term>,
        graph: Option<Term>,
    ) -> ArrayProxy {
        self.ctx.collection(CollectionTarget::objects(QuadPattern::new(
            subject, predicate, None, graph,
        )))
    }

    /// Write `value` (an object) to the dataset, and return the view of the resulting subject.
    pub fn from_json<V: Into<Value>>(&self, value: V) -> Result<SubjectProxy, ProxyError> {
        let object = match value.into() {
            Value::Object(object) => object,
            other => return Err(ProxyError::NotAnObject(format!("{other:?}"))),
        };
        let mut writer = Writer::new(&self.ctx);
        let id = writer.materialize(&object)?;
        let changes = DatasetChanges::adding(writer.into_quads());
        log::trace!("writing {id}: {} quad(s)", changes.len());
        self.ctx.apply(&changes);
        Ok(self.ctx.subject(id))
    }
}

/// The graphs holding the values of `key` for `view`.
///
/// With an `index`, `key` must be a collection,
/// and only the graphs holding its `index`-th member are returned.
pub fn graph_of(view: &SubjectProxy, key: &str, index: Option<usize>) -> Result<Vec<Term>, ProxyError> {
    let resolved = view.resolve(key)?;
    let mut quads = resolved.quads();
    if let Some(index) = index {
        if !resolved.info.is_set {
            return Err(ProxyError::NotACollection(key.to_string()));
        }
        let members = resolved
            .ctx
            .collection_of(resolved.target(), resolved.info.shape.clone())
            .terms();
        let member = members.get(index).ok_or(ProxyError::IndexOutOfBounds {
            index,
            len: members.len(),
        })?;
        quads.retain(|q| q.o() == member);
    }
    let mut graphs: Vec<Term> = Vec::new();
    for quad in quads {
        if !graphs.contains(quad.g()) {
            graphs.push(quad.g().clone());
        }
    }
    Ok(graphs)
}

/// The strings of `key` for `view`, grouped by language.
pub fn languages_of(view: &SubjectProxy, key: &str) -> LanguageMap {
    view.language_map(key)
}
