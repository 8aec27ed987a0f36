use crate::_value::{literal_to_value, scalar_to_json};
use crate::_writer::{id_string, parse_id, PropertyInfo, Writer};
use crate::language::{negotiate, negotiate_language};
use crate::{
    CollectionTarget, LanguageMap, LanguageSetProxy, ProxyContext, ProxyError, ScopeStack,
    ScopedView, Value,
};
use ldo_dataset::DatasetChanges;
use ldo_term::ns::rdf;
use ldo_term::{Quad, QuadPattern, Term, TermError};
use serde_json::{json, Map, Value as JsonValue};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

pub(crate) struct SubjectState {
    id: RefCell<Term>,
    scopes: ScopeStack,
}

impl SubjectState {
    pub fn new(id: Term) -> Self {
        SubjectState {
            id: RefCell::new(id),
            scopes: ScopeStack::default(),
        }
    }
}

/// A key of a subject, resolved in a given context.
pub(crate) struct Resolved {
    pub ctx: Rc<ProxyContext>,
    pub subject: Term,
    pub info: PropertyInfo,
}

impl Resolved {
    pub fn pattern(&self) -> QuadPattern {
        QuadPattern::new(
            Some(self.subject.clone()),
            Some(self.info.predicate.clone()),
            None,
            None,
        )
    }

    pub fn quads(&self) -> Vec<Quad> {
        self.ctx.matching(&self.pattern())
    }

    /// Distinct objects, in store order.
    pub fn objects(&self) -> Vec<Term> {
        let mut objects: Vec<Term> = Vec::new();
        for quad in self.quads() {
            if !objects.contains(quad.o()) {
                objects.push(quad.o().clone());
            }
        }
        objects
    }

    /// Quads linking the subject to `object` in every write graph.
    pub fn links(&self, object: Term) -> Result<Vec<Quad>, TermError> {
        self.ctx
            .write_graphs()
            .iter()
            .map(|g| {
                Quad::new(
                    self.subject.clone(),
                    self.info.predicate.clone(),
                    object.clone(),
                    g.clone(),
                )
            })
            .collect()
    }

    pub fn target(&self) -> CollectionTarget {
        CollectionTarget::objects(self.pattern())
    }
}

/// A view on one RDF subject, showing its quads as the properties of an object.
///
/// Keys are resolved to predicates with the JSON-LD context,
/// taking into account the current rdf:type(s) of the subject.
/// Two special keys are supported:
/// `"@id"` (the identifier of the subject, which can be written to rename it)
/// and `"@context"` (the JSON-LD context, read-only).
///
/// Views are cached by their context, and cheap to clone.
#[derive(Clone)]
pub struct SubjectProxy {
    base: Rc<ProxyContext>,
    state: Rc<SubjectState>,
}

impl SubjectProxy {
    pub(crate) fn new(base: Rc<ProxyContext>, state: Rc<SubjectState>) -> Self {
        SubjectProxy { base, state }
    }

    /// The identifier of this subject.
    pub fn id(&self) -> Term {
        self.state.id.borrow().clone()
    }

    /// The identifier of this subject, as exposed by the `"@id"` key.
    pub fn id_string(&self) -> String {
        id_string(&self.state.id.borrow())
    }

    /// Whether `self` and `other` are the same view.
    pub fn ptr_eq(&self, other: &SubjectProxy) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// The rdf:type IRIs of this subject, sorted.
    pub fn types(&self) -> Vec<String> {
        self.context().types_of(&self.id())
    }

    pub(crate) fn resolve(&self, key: &str) -> Result<Resolved, ProxyError> {
        let ctx = self.context();
        let subject = self.id();
        let info = ctx.property_info(key, &ctx.types_of(&subject))?;
        Ok(Resolved { ctx, subject, info })
    }

    /// The value of `key`.
    ///
    /// * language strings read as the string of the negotiated language,
    ///   or as a [`LanguageSetProxy`] for collections;
    /// * collections read as an [`ArrayProxy`](crate::ArrayProxy),
    ///   and so do other keys having more than one value;
    /// * types read as keys of the context (or IRIs);
    /// * other literals read as their native value, and nodes as [`SubjectProxy`]s.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "@id" => return Some(Value::String(self.id_string())),
            "@context" => {
                return Some(Value::Json(self.context().context_util().raw().clone()));
            }
            _ => {}
        }
        let resolved = self.resolve(key).ok()?;
        let ctx = &resolved.ctx;
        let info = &resolved.info;
        if info.shape.lang_string {
            if info.is_set {
                return Some(Value::LanguageSet(LanguageSetProxy::new(
                    self.clone(),
                    key,
                    None,
                )));
            }
            let objects = resolved.objects();
            return negotiate(&objects, ctx.language_ordering())
                .map(|t| Value::String(t.value().to_string()));
        }
        let objects = resolved.objects();
        if info.shape.is_type {
            let util = ctx.context_util();
            let mut names: Vec<Value> = objects
                .iter()
                .map(|t| Value::String(util.iri_to_key(t.value(), &[])))
                .collect();
            return match names.len() {
                0 => None,
                1 if !info.is_set => names.pop(),
                _ => Some(Value::List(names)),
            };
        }
        if info.is_set || objects.len() > 1 {
            return Some(Value::Array(
                ctx.collection_of(resolved.target(), info.shape.clone()),
            ));
        }
        objects.first().map(|t| term_value(ctx, t))
    }

    /// Set `key` to `value`, replacing its previous values.
    ///
    /// Object literals are materialized as new subjects
    /// (or as existing ones, if they have an `"@id"`),
    /// and all new quads are written in every write graph.
    /// For language strings, only the strings of the write language are replaced.
    /// Setting [`Value::Null`] deletes the key.
    pub fn set<V: Into<Value>>(&self, key: &str, value: V) -> Result<(), ProxyError> {
        let value = value.into();
        match key {
            "@context" => return Ok(()),
            "@id" => return self.rename(&value),
            _ => {}
        }
        if value.is_null() {
            return self.delete(key).map(|_| ());
        }
        let resolved = self.resolve(key)?;
        let mut writer = Writer::new(&resolved.ctx);
        writer.write_values(&resolved.subject, &resolved.info, &value)?;
        let mut removed = resolved.quads();
        if resolved.info.shape.lang_string && !resolved.info.is_set {
            let language = resolved.ctx.write_language();
            removed.retain(|q| language.matches(q.o()));
        }
        let changes = DatasetChanges::new(writer.into_quads(), removed);
        log::trace!(
            "setting {key} of {}: {} change(s)",
            resolved.subject,
            changes.len()
        );
        resolved.ctx.apply(&changes);
        Ok(())
    }

    /// Delete `key`, and return whether anything was removed.
    ///
    /// Only the quads selected by the key are removed;
    /// the nodes they point to are left untouched.
    /// For language strings, only the strings of the negotiated language are removed.
    /// Deleting `"@id"` removes every quad where this subject is the subject or the object.
    pub fn delete(&self, key: &str) -> Result<bool, ProxyError> {
        match key {
            "@context" => return Ok(false),
            "@id" => {
                let ctx = self.context();
                let removed = adjoining_quads(&ctx, &self.id());
                return Ok(!ctx.apply(&DatasetChanges::removing(removed)).is_empty());
            }
            _ => {}
        }
        let resolved = self.resolve(key)?;
        let mut removed = resolved.quads();
        if resolved.info.shape.lang_string && !resolved.info.is_set {
            let negotiated =
                negotiate_language(&resolved.objects(), resolved.ctx.language_ordering());
            match negotiated {
                Some(language) => removed.retain(|q| language.matches(q.o())),
                None => removed.clear(),
            }
        }
        Ok(!resolved
            .ctx
            .apply(&DatasetChanges::removing(removed))
            .is_empty())
    }

    fn rename(&self, value: &Value) -> Result<(), ProxyError> {
        let ctx = self.context();
        let new = match value {
            Value::String(s) => parse_id(ctx.context_util(), s)?,
            Value::Subject(subject) => subject.id(),
            other => return Err(ProxyError::InvalidId(format!("{other:?}"))),
        };
        let old = self.id();
        if old == new {
            return Ok(());
        }
        let touched = adjoining_quads(&ctx, &old);
        let renamed = touched
            .iter()
            .map(|q| q.replace_node(&old, &new))
            .collect::<Result<Vec<_>, _>>()?;
        // views follow the node before listeners are notified
        *self.state.id.borrow_mut() = new.clone();
        self.base.migrate(&old, &new);
        if !Rc::ptr_eq(&ctx, &self.base) {
            ctx.migrate(&old, &new);
        }
        ctx.apply(&DatasetChanges::new(renamed, touched));
        log::debug!("renamed {old} to {new}");
        Ok(())
    }

    /// The keys of this subject (one per distinct predicate), in store order.
    pub fn keys(&self) -> Vec<String> {
        let ctx = self.context();
        let id = self.id();
        let types = ctx.types_of(&id);
        let mut keys = Vec::new();
        for quad in ctx.matching(&QuadPattern::new(Some(id), None, None, None)) {
            let key = ctx.context_util().iri_to_key(quad.p().value(), &types);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// The strings of `key`, grouped by language.
    pub fn language_map(&self, key: &str) -> LanguageMap {
        LanguageMap::new(self.clone(), key)
    }

    /// A JSON snapshot of this subject and of the nodes it (transitively) points to.
    ///
    /// A node already present in the snapshot is only referenced by its `"@id"`.
    pub fn to_json(&self) -> JsonValue {
        let mut visited = HashSet::new();
        json_of(&self.context(), &self.id(), &mut visited)
    }
}

impl ScopedView for SubjectProxy {
    fn scopes(&self) -> &ScopeStack {
        &self.state.scopes
    }

    fn base_context(&self) -> &Rc<ProxyContext> {
        &self.base
    }
}

impl fmt::Debug for SubjectProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectProxy({})", self.state.id.borrow())
    }
}

/// Literals read as native values, nodes as subject views.
pub(crate) fn term_value(ctx: &Rc<ProxyContext>, term: &Term) -> Value {
    match term.as_literal() {
        Some(literal) => literal_to_value(literal),
        None => Value::Subject(ctx.subject(term.clone())),
    }
}

/// Every quad having `id` as its subject or object.
fn adjoining_quads(ctx: &ProxyContext, id: &Term) -> Vec<Quad> {
    let mut quads = ctx.matching(&QuadPattern::new(Some(id.clone()), None, None, None));
    quads.extend(
        ctx.matching(&QuadPattern::new(None, None, Some(id.clone()), None))
            .into_iter()
            .filter(|q| q.s() != id),
    );
    quads
}

fn json_of(ctx: &ProxyContext, id: &Term, visited: &mut HashSet<Term>) -> JsonValue {
    visited.insert(id.clone());
    let util = ctx.context_util();
    let types = ctx.types_of(id);
    let mut grouped: Vec<(String, Vec<JsonValue>)> = Vec::new();
    for quad in ctx.matching(&QuadPattern::new(Some(id.clone()), None, None, None)) {
        let key = util.iri_to_key(quad.p().value(), &types);
        let object = quad.o();
        let value = if quad.p().value() == rdf::type_ {
            JsonValue::String(util.iri_to_key(object.value(), &[]))
        } else if let Some(literal) = object.as_literal() {
            scalar_to_json(&literal_to_value(literal))
        } else if visited.contains(object) {
            json!({ "@id": id_string(object) })
        } else {
            json_of(ctx, object, visited)
        };
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            None => grouped.push((key, vec![value])),
        }
    }
    let mut map = Map::new();
    map.insert("@id".to_string(), JsonValue::String(id_string(id)));
    for (key, mut values) in grouped {
        let value = if values.len() == 1 && !util.is_set(&key, &types) {
            values.remove(0)
        } else {
            JsonValue::Array(values)
        };
        map.insert(key, value);
    }
    JsonValue::Object(map)
}
