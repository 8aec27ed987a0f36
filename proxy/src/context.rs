//! Resolution of object keys to IRIs (and back) with a JSON-LD context.
//!
//! Only the subset of JSON-LD needed to map keys is supported:
//! term definitions (plain IRIs, compact IRIs or expanded definitions with
//! `@id`, `@type`, `@container` and a non-standard `@isCollection` flag),
//! prefixes, and type-scoped contexts
//! (an `@context` nested in the definition of a type).
use crate::ContextError;
use ldo_term::ns::rdf;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// The datatype declared for the values of a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `"@type": "@id"`: values are nodes
    Id,
    /// Values are literals with this datatype
    Literal(String),
}

/// An expanded term definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermDefinition {
    /// The IRI of the term
    pub iri: String,
    /// The declared datatype, if any
    pub datatype: Option<DataType>,
    /// The declared container (`@set`, `@list`...), if any
    pub container: Option<String>,
    /// The non-standard `@isCollection` flag
    pub is_collection: bool,
}

#[derive(Clone, Debug, Default)]
struct Scope {
    terms: HashMap<String, TermDefinition>,
    reverse: HashMap<String, String>,
}

impl Scope {
    fn insert(&mut self, key: &str, def: TermDefinition) {
        self.reverse
            .entry(def.iri.clone())
            .or_insert_with(|| key.to_string());
        self.terms.insert(key.to_string(), def);
    }
}

/// A parsed JSON-LD context, answering questions about keys.
///
/// Lookups taking a list of `types` first consult the contexts scoped to those types
/// (in order), then the top-level context.
#[derive(Clone, Debug)]
pub struct ContextUtil {
    raw: JsonValue,
    global: Scope,
    by_type: HashMap<String, Scope>,
    prefixes: HashMap<String, String>,
}

impl ContextUtil {
    /// Parse `context`, which may be the context object itself,
    /// or a document with an `@context` entry.
    pub fn new(context: &JsonValue) -> Result<Self, ContextError> {
        let obj = context.as_object().ok_or(ContextError::NotAnObject)?;
        let obj = match obj.get("@context") {
            Some(JsonValue::Object(inner)) => inner,
            Some(_) => return Err(ContextError::NotAnObject),
            None => obj,
        };
        let prefixes = collect_prefixes(obj, &HashMap::new());
        let mut util = ContextUtil {
            raw: context.clone(),
            global: Scope::default(),
            by_type: HashMap::new(),
            prefixes,
        };
        for (key, value) in obj.iter().filter(|(k, _)| !k.starts_with('@')) {
            let Some(def) = util.parse_definition(key, value, &util.prefixes)? else {
                continue;
            };
            if let Some(JsonValue::Object(nested)) = value.get("@context") {
                let scoped_prefixes = collect_prefixes(nested, &util.prefixes);
                let mut scope = Scope::default();
                for (k, v) in nested.iter().filter(|(k, _)| !k.starts_with('@')) {
                    if let Some(d) = util.parse_definition(k, v, &scoped_prefixes)? {
                        scope.insert(k, d);
                    }
                }
                util.by_type.insert(def.iri.clone(), scope);
            }
            util.global.insert(key, def);
        }
        Ok(util)
    }

    fn parse_definition(
        &self,
        key: &str,
        value: &JsonValue,
        prefixes: &HashMap<String, String>,
    ) -> Result<Option<TermDefinition>, ContextError> {
        let invalid = |reason: &str| ContextError::InvalidDefinition {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match value {
            JsonValue::Null => Ok(None),
            JsonValue::String(iri) => Ok(Some(TermDefinition {
                iri: expand(iri, prefixes),
                datatype: None,
                container: None,
                is_collection: false,
            })),
            JsonValue::Object(def) => {
                let iri = match def.get("@id") {
                    Some(JsonValue::String(iri)) => expand(iri, prefixes),
                    Some(_) => return Err(invalid("@id must be a string")),
                    None => return Err(invalid("missing @id")),
                };
                let datatype = match def.get("@type") {
                    None => None,
                    Some(JsonValue::String(t)) if t == "@id" || t == "@vocab" => Some(DataType::Id),
                    Some(JsonValue::String(t)) => Some(DataType::Literal(expand(t, prefixes))),
                    Some(_) => return Err(invalid("@type must be a string")),
                };
                let container = match def.get("@container") {
                    None => None,
                    Some(JsonValue::String(c)) => Some(c.clone()),
                    Some(_) => return Err(invalid("@container must be a string")),
                };
                let is_collection = def
                    .get("@isCollection")
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false);
                Ok(Some(TermDefinition {
                    iri,
                    datatype,
                    container,
                    is_collection,
                }))
            }
            _ => Err(invalid("a definition must be a string or an object")),
        }
    }

    /// The context this was built from.
    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }

    /// The definition of `key`, in the context of the given types.
    pub fn definition(&self, key: &str, types: &[String]) -> Option<&TermDefinition> {
        types
            .iter()
            .filter_map(|t| self.by_type.get(t))
            .find_map(|scope| scope.terms.get(key))
            .or_else(|| self.global.terms.get(key))
    }

    /// Expand a compact IRI (`prefix:suffix`) using the prefixes of this context.
    ///
    /// Other strings are returned unchanged.
    pub fn expand_iri(&self, value: &str) -> String {
        expand(value, &self.prefixes)
    }

    /// The IRI of `key`.
    ///
    /// Keys that this context does not define are taken as (possibly compact) IRIs.
    pub fn key_to_iri(&self, key: &str, types: &[String]) -> String {
        match self.definition(key, types) {
            Some(def) => def.iri.clone(),
            None => self.expand_iri(key),
        }
    }

    /// The key for `iri`.
    ///
    /// IRIs that this context does not name are returned unchanged.
    pub fn iri_to_key(&self, iri: &str, types: &[String]) -> String {
        if let Some(key) = types
            .iter()
            .filter_map(|t| self.by_type.get(t))
            .find_map(|scope| scope.reverse.get(iri))
        {
            return key.clone();
        }
        if let Some(key) = self.global.reverse.get(iri) {
            return key.clone();
        }
        if iri == rdf::type_ {
            return "@type".to_string();
        }
        iri.to_string()
    }

    /// Whether `key` is declared as a collection.
    pub fn is_set(&self, key: &str, types: &[String]) -> bool {
        self.definition(key, types)
            .map(|def| def.is_collection || def.container.as_deref() == Some("@set"))
            .unwrap_or(false)
    }

    /// Whether the values of `key` are language-tagged strings.
    pub fn is_lang_string(&self, key: &str, types: &[String]) -> bool {
        matches!(
            self.declared_type(key, types),
            Some(DataType::Literal(dt)) if dt == rdf::langString
        )
    }

    /// The datatype declared for `key`, if any.
    ///
    /// Without one, strings are written as `xsd:string` literals,
    /// and numbers and booleans get the datatype matching their value.
    pub fn declared_type(&self, key: &str, types: &[String]) -> Option<&DataType> {
        self.definition(key, types)
            .and_then(|def| def.datatype.as_ref())
    }
}

/// Keys whose value is a plain string ending like a namespace are prefixes.
fn collect_prefixes(
    obj: &Map<String, JsonValue>,
    inherited: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut prefixes = inherited.clone();
    for (key, value) in obj {
        if key.starts_with('@') {
            continue;
        }
        if let JsonValue::String(iri) = value {
            if iri.ends_with('/') || iri.ends_with('#') {
                prefixes.insert(key.clone(), iri.clone());
            }
        }
    }
    prefixes
}

fn expand(value: &str, prefixes: &HashMap<String, String>) -> String {
    if value == "@type" {
        return rdf::type_.to_string();
    }
    if let Some((prefix, suffix)) = value.split_once(':') {
        if !suffix.starts_with("//") {
            if let Some(ns) = prefixes.get(prefix) {
                return format!("{ns}{suffix}");
            }
        }
    }
    value.to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use ldo_term::ns::xsd;
    use serde_json::json;
    use test_case::test_case;

    const SCHEMA: &str = "http://schema.org/";

    fn context() -> ContextUtil {
        ContextUtil::new(&json!({
            "@context": {
                "@version": 1.1,
                "schema": "http://schema.org/",
                "type": { "@id": "@type" },
                "Person": {
                    "@id": "schema:Person",
                    "@context": {
                        "name": { "@id": "schema:givenName", "@type": "http://www.w3.org/2001/XMLSchema#string" },
                        "knows": { "@id": "schema:knows", "@type": "@id", "@container": "@set" },
                    }
                },
                "name": { "@id": "schema:name" },
                "label": { "@id": "http://www.w3.org/2000/01/rdf-schema#label", "@type": "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString" },
                "tags": { "@id": "schema:keywords", "@isCollection": true },
                "age": { "@id": "schema:age", "@type": "http://www.w3.org/2001/XMLSchema#integer" },
                "nothing": null,
            }
        }))
        .unwrap()
    }

    fn person() -> Vec<String> {
        vec![format!("{SCHEMA}Person")]
    }

    #[test_case("name", &[] => "http://schema.org/name"; "global")]
    #[test_case("type", &[] => rdf::type_; "type alias")]
    #[test_case("@type", &[] => rdf::type_; "type keyword")]
    #[test_case("schema:address", &[] => "http://schema.org/address"; "compact iri")]
    #[test_case("http://ex.org/x", &[] => "http://ex.org/x"; "absolute iri")]
    #[test_case("unknown", &[] => "unknown"; "unknown key")]
    fn key_to_iri(key: &str, types: &[String]) -> String {
        context().key_to_iri(key, types)
    }

    #[test]
    fn type_scoped_terms() {
        let ctx = context();
        assert_eq!(ctx.key_to_iri("name", &person()), "http://schema.org/givenName");
        assert_eq!(ctx.iri_to_key("http://schema.org/givenName", &person()), "name");
        assert_eq!(ctx.iri_to_key("http://schema.org/givenName", &[]), "http://schema.org/givenName");
        assert!(ctx.is_set("knows", &person()));
        assert!(!ctx.is_set("knows", &[]));
        assert_eq!(ctx.declared_type("knows", &person()), Some(&DataType::Id));
    }

    #[test]
    fn reverse_lookup() {
        let ctx = context();
        assert_eq!(ctx.iri_to_key("http://schema.org/name", &[]), "name");
        assert_eq!(ctx.iri_to_key(rdf::type_, &[]), "type");
        assert_eq!(ctx.iri_to_key("http://ex.org/x", &[]), "http://ex.org/x");
    }

    #[test]
    fn collections_and_datatypes() {
        let ctx = context();
        assert!(ctx.is_set("tags", &[]));
        assert!(!ctx.is_set("name", &[]));
        assert!(ctx.is_lang_string("label", &[]));
        assert!(!ctx.is_lang_string("name", &[]));
        assert_eq!(
            ctx.declared_type("age", &[]),
            Some(&DataType::Literal(xsd::integer.to_string()))
        );
        assert_eq!(ctx.declared_type("tags", &[]), None);
        assert!(ctx.definition("nothing", &[]).is_none());
    }

    #[test]
    fn without_type_alias() -> Result<(), ContextError> {
        let ctx = ContextUtil::new(&json!({ "name": "http://schema.org/name" }))?;
        assert_eq!(ctx.iri_to_key(rdf::type_, &[]), "@type");
        assert_eq!(ctx.key_to_iri("name", &[]), "http://schema.org/name");
        Ok(())
    }

    #[test_case(json!([]) ; "array")]
    #[test_case(json!({"@context": 42}) ; "nested number")]
    #[test_case(json!({"name": 42}) ; "number definition")]
    #[test_case(json!({"name": {"@type": "@id"}}) ; "missing id")]
    fn invalid_contexts(ctx: JsonValue) {
        assert!(ContextUtil::new(&ctx).is_err());
    }
}
