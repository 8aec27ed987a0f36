use crate::_value::value_to_literal;
use crate::context::{ContextUtil, DataType};
use crate::language::LanguageKey;
use crate::{ObjectLiteral, ProxyContext, ProxyError, Value};
use ldo_term::ns::rdf;
use ldo_term::{Quad, Term};
use std::collections::HashMap;

/// How values of a property are turned into terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ValueShape {
    pub datatype: Option<DataType>,
    pub lang_string: bool,
    pub is_type: bool,
}

/// A key of a subject, resolved against the JSON-LD context.
#[derive(Clone, Debug)]
pub(crate) struct PropertyInfo {
    pub predicate: Term,
    pub shape: ValueShape,
    pub is_set: bool,
}

/// Parse an identifier: `_:label` for blank nodes, a (possibly compact) IRI otherwise.
pub(crate) fn parse_id(util: &ContextUtil, id: &str) -> Result<Term, ProxyError> {
    match id.strip_prefix("_:") {
        Some(label) => Ok(Term::blank_node(label)?),
        None => Ok(Term::iri(&util.expand_iri(id))?),
    }
}

/// The inverse of [`parse_id`].
pub(crate) fn id_string(id: &Term) -> String {
    if id.is_blank_node() {
        format!("_:{}", id.value())
    } else {
        id.value().to_string()
    }
}

/// Turns values into quads, without touching the dataset.
///
/// Each object literal is expanded at most once per writer,
/// so cyclic literals produce each of their quads once.
pub(crate) struct Writer<'a> {
    ctx: &'a ProxyContext,
    language: LanguageKey,
    visited: HashMap<*const (), Term>,
    quads: Vec<Quad>,
}

impl<'a> Writer<'a> {
    pub fn new(ctx: &'a ProxyContext) -> Self {
        Writer {
            ctx,
            language: ctx.write_language(),
            visited: HashMap::new(),
            quads: Vec::new(),
        }
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }

    /// Drop the quads written after the first `len` ones.
    pub fn truncate(&mut self, len: usize) {
        self.quads.truncate(len);
    }

    /// Write `value` (flattening lists and collections) as values of `info` for `subject`.
    pub fn write_values(
        &mut self,
        subject: &Term,
        info: &PropertyInfo,
        value: &Value,
    ) -> Result<(), ProxyError> {
        match value {
            Value::Null => Ok(()),
            Value::List(items) => items
                .iter()
                .try_for_each(|item| self.write_values(subject, info, item)),
            Value::Array(array) => array
                .values()
                .iter()
                .try_for_each(|item| self.write_values(subject, info, item)),
            Value::LanguageSet(set) => set
                .values()
                .into_iter()
                .try_for_each(|s| self.write_values(subject, info, &Value::String(s))),
            Value::Json(json) => self.write_values(subject, info, &Value::from(json.clone())),
            _ => match self.object_term(&info.shape, value)? {
                Some(object) => self.emit(subject, &info.predicate, object),
                None => Ok(()),
            },
        }
    }

    /// The term representing a single value, materializing object literals.
    pub fn object_term(
        &mut self,
        shape: &ValueShape,
        value: &Value,
    ) -> Result<Option<Term>, ProxyError> {
        let ctx = self.ctx;
        match value {
            Value::Null | Value::List(_) | Value::Array(_) | Value::LanguageSet(_) => Ok(None),
            Value::Subject(subject) => Ok(Some(subject.id())),
            Value::Object(object) => self.materialize(object).map(Some),
            Value::Json(json) => self.object_term(shape, &Value::from(json.clone())),
            Value::String(s) if shape.is_type => {
                Ok(Some(Term::iri(&ctx.context_util().key_to_iri(s, &[]))?))
            }
            Value::String(s) if shape.datatype == Some(DataType::Id) => {
                parse_id(ctx.context_util(), s).map(Some)
            }
            Value::String(s) if shape.lang_string => Ok(Some(self.language.literal(s)?)),
            scalar => Ok(value_to_literal(scalar, shape.datatype.as_ref())?),
        }
    }

    /// Write the quads describing `object`, and return its identifier.
    pub fn materialize(&mut self, object: &ObjectLiteral) -> Result<Term, ProxyError> {
        if let Some(id) = self.visited.get(&object.addr()) {
            return Ok(id.clone());
        }
        let ctx = self.ctx;
        let util = ctx.context_util();
        let id = match object.get("@id") {
            None | Some(Value::Null) => Term::new_blank_node(),
            Some(Value::String(s)) => parse_id(util, &s)?,
            Some(Value::Subject(subject)) => subject.id(),
            Some(other) => return Err(ProxyError::InvalidId(format!("{other:?}"))),
        };
        self.visited.insert(object.addr(), id.clone());

        let entries = object.entries();
        let is_type_key = |key: &str| util.key_to_iri(key, &[]) == rdf::type_;
        let mut names = Vec::new();
        for (_, value) in entries.iter().filter(|(k, _)| is_type_key(k)) {
            collect_strings(value, &mut names);
        }
        let types: Vec<String> = names.iter().map(|n| util.key_to_iri(n, &[])).collect();
        let rdf_type = Term::new_iri_unchecked(rdf::type_);
        for t in &types {
            self.emit(&id, &rdf_type, Term::iri(t)?)?;
        }
        for (key, value) in &entries {
            if key == "@id" || key == "@context" || is_type_key(key) {
                continue;
            }
            let info = ctx.property_info(key, &types)?;
            self.write_values(&id, &info, value)?;
        }
        log::trace!("materialized {id} ({} quads so far)", self.quads.len());
        Ok(id)
    }

    /// Link `subject` to `object` in every write graph.
    pub fn emit(&mut self, subject: &Term, predicate: &Term, object: Term) -> Result<(), ProxyError> {
        let ctx = self.ctx;
        for graph in ctx.write_graphs() {
            self.quads.push(Quad::new(
                subject.clone(),
                predicate.clone(),
                object.clone(),
                graph.clone(),
            )?);
        }
        Ok(())
    }
}

fn collect_strings(value: &Value, names: &mut Vec<String>) {
    match value {
        Value::String(s) => names.push(s.clone()),
        Value::List(items) => items.iter().for_each(|item| collect_strings(item, names)),
        Value::Json(json) => collect_strings(&Value::from(json.clone()), names),
        _ => {}
    }
}
