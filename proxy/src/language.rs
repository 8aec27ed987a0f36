//! Language-tagged strings: negotiation and views.
//!
//! A language ordering is a list of preferences such as `["fr", "en", "@none", "@other"]`,
//! where `"@none"` stands for untagged strings
//! and `"@other"` for any language that is not explicitly listed.
use crate::_subject::Resolved;
use crate::{ProxyContext, ProxyError, ScopeStack, ScopedView, SubjectProxy, Value};
use ldo_dataset::DatasetChanges;
use ldo_term::ns::xsd;
use ldo_term::{Quad, Term, TermError};
use std::fmt;
use std::rc::Rc;

/// A language, as used to group strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageKey {
    /// Strings without a language tag (`"@none"`)
    Untagged,
    /// Strings tagged with this (lower-case) language
    Tag(String),
}

impl LanguageKey {
    /// Parse `"@none"` or a language tag.
    pub fn parse(key: &str) -> Self {
        if key == "@none" {
            LanguageKey::Untagged
        } else {
            LanguageKey::Tag(key.to_ascii_lowercase())
        }
    }

    /// The language of `term`, if it is a string literal.
    pub fn of(term: &Term) -> Option<Self> {
        let literal = term.as_literal()?;
        match literal.language() {
            Some(tag) => Some(LanguageKey::Tag(tag.to_ascii_lowercase())),
            None if literal.datatype() == xsd::string => Some(LanguageKey::Untagged),
            None => None,
        }
    }

    /// Whether `term` is a string in this language.
    pub fn matches(&self, term: &Term) -> bool {
        Self::of(term).as_ref() == Some(self)
    }

    /// A string literal in this language.
    pub fn literal(&self, value: &str) -> Result<Term, TermError> {
        match self {
            LanguageKey::Untagged => Ok(Term::literal(value)),
            LanguageKey::Tag(tag) => Term::lang_literal(value, tag),
        }
    }
}

impl fmt::Display for LanguageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageKey::Untagged => write!(f, "@none"),
            LanguageKey::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// The first language of `ordering` having at least one string among `candidates`.
///
/// An empty ordering selects nothing.
pub fn negotiate_language(candidates: &[Term], ordering: &[String]) -> Option<LanguageKey> {
    let present: Vec<LanguageKey> = candidates.iter().filter_map(LanguageKey::of).collect();
    let explicit: Vec<LanguageKey> = ordering
        .iter()
        .filter(|o| o.as_str() != "@other")
        .map(|o| LanguageKey::parse(o))
        .collect();
    for preference in ordering {
        if preference == "@other" {
            let other = present
                .iter()
                .find(|k| matches!(k, LanguageKey::Tag(_)) && !explicit.contains(k));
            if let Some(key) = other {
                return Some(key.clone());
            }
        } else {
            let key = LanguageKey::parse(preference);
            if present.contains(&key) {
                return Some(key);
            }
        }
    }
    None
}

/// The first string of `candidates` in the [negotiated](negotiate_language) language.
pub fn negotiate<'a>(candidates: &'a [Term], ordering: &[String]) -> Option<&'a Term> {
    let language = negotiate_language(candidates, ordering)?;
    candidates.iter().find(|t| language.matches(t))
}

/// The language in which new strings are written:
/// the first entry of `ordering` other than `"@other"`, or no language.
pub fn write_language(ordering: &[String]) -> LanguageKey {
    ordering
        .iter()
        .find(|o| o.as_str() != "@other")
        .map(|o| LanguageKey::parse(o))
        .unwrap_or(LanguageKey::Untagged)
}

/// The strings of one property of a subject, grouped by language.
#[derive(Clone, Debug)]
pub struct LanguageMap {
    view: SubjectProxy,
    key: String,
}

impl LanguageMap {
    pub(crate) fn new(view: SubjectProxy, key: &str) -> Self {
        LanguageMap {
            view,
            key: key.to_string(),
        }
    }

    /// The subject this map belongs to.
    pub fn subject(&self) -> &SubjectProxy {
        &self.view
    }

    /// Whether the property holds several strings per language.
    pub fn is_collection(&self) -> bool {
        self.view
            .resolve(&self.key)
            .map(|r| r.info.is_set)
            .unwrap_or(false)
    }

    /// The languages having at least one string, in store order.
    pub fn languages(&self) -> Vec<LanguageKey> {
        let Ok(resolved) = self.view.resolve(&self.key) else {
            return Vec::new();
        };
        let mut languages = Vec::new();
        for key in resolved.objects().iter().filter_map(LanguageKey::of) {
            if !languages.contains(&key) {
                languages.push(key);
            }
        }
        languages
    }

    /// The strings of `language` (`"@none"` for untagged strings).
    pub fn values(&self, language: &str) -> Vec<String> {
        let language = LanguageKey::parse(language);
        let Ok(resolved) = self.view.resolve(&self.key) else {
            return Vec::new();
        };
        resolved
            .objects()
            .iter()
            .filter(|t| language.matches(t))
            .map(|t| t.value().to_string())
            .collect()
    }

    /// The string of `language`,
    /// or a [set view](LanguageSetProxy) on its strings if the property is a collection.
    pub fn get(&self, language: &str) -> Option<Value> {
        if self.is_collection() {
            return Some(Value::LanguageSet(self.get_set(language)));
        }
        self.values(language).into_iter().next().map(Value::String)
    }

    /// A set view on the strings of `language`.
    pub fn get_set(&self, language: &str) -> LanguageSetProxy {
        LanguageSetProxy::new(self.view.clone(), &self.key, Some(LanguageKey::parse(language)))
    }

    /// Set the string of `language`, written in every write graph.
    ///
    /// Unless the property is a collection, the previous strings of that language are removed.
    pub fn set(&self, language: &str, value: &str) -> Result<(), ProxyError> {
        let resolved = self.view.resolve(&self.key)?;
        let language = LanguageKey::parse(language);
        let added = resolved.links(language.literal(value)?)?;
        let removed: Vec<Quad> = if resolved.info.is_set {
            Vec::new()
        } else {
            resolved
                .quads()
                .into_iter()
                .filter(|q| language.matches(q.o()))
                .collect()
        };
        resolved.ctx.apply(&DatasetChanges::new(added, removed));
        Ok(())
    }

    /// Remove all strings of `language`.
    pub fn delete(&self, language: &str) -> Result<bool, ProxyError> {
        let resolved = self.view.resolve(&self.key)?;
        let language = LanguageKey::parse(language);
        let removed: Vec<Quad> = resolved
            .quads()
            .into_iter()
            .filter(|q| language.matches(q.o()))
            .collect();
        Ok(!resolved.ctx.apply(&DatasetChanges::removing(removed)).is_empty())
    }
}

/// A set view on the strings of one language, for one property of a subject.
///
/// When no language is fixed, the language is negotiated on every access,
/// using the language ordering of the subject's current context.
#[derive(Clone)]
pub struct LanguageSetProxy {
    view: SubjectProxy,
    key: String,
    language: Option<LanguageKey>,
}

impl LanguageSetProxy {
    pub(crate) fn new(view: SubjectProxy, key: &str, language: Option<LanguageKey>) -> Self {
        LanguageSetProxy {
            view,
            key: key.to_string(),
            language,
        }
    }

    /// Whether `self` and `other` show the same strings.
    pub fn ptr_eq(&self, other: &LanguageSetProxy) -> bool {
        self.view.ptr_eq(&other.view) && self.key == other.key && self.language == other.language
    }

    fn resolve(&self) -> Result<(Resolved, LanguageKey), ProxyError> {
        let resolved = self.view.resolve(&self.key)?;
        let language = match &self.language {
            Some(language) => language.clone(),
            None => negotiate_language(&resolved.objects(), resolved.ctx.language_ordering())
                .unwrap_or_else(|| resolved.ctx.write_language()),
        };
        Ok((resolved, language))
    }

    /// The language of the strings in this set.
    pub fn language(&self) -> Option<LanguageKey> {
        self.resolve().ok().map(|(_, language)| language)
    }

    /// The strings of this set, in store order.
    pub fn values(&self) -> Vec<String> {
        let Ok((resolved, language)) = self.resolve() else {
            return Vec::new();
        };
        resolved
            .objects()
            .iter()
            .filter(|t| language.matches(t))
            .map(|t| t.value().to_string())
            .collect()
    }

    /// The number of strings in this set.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// Whether this set is empty.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Whether this set contains `value`.
    pub fn has(&self, value: &str) -> bool {
        self.values().iter().any(|v| v == value)
    }

    /// Add `value` to this set; return `false` if it was already present.
    pub fn add(&self, value: &str) -> Result<bool, ProxyError> {
        let (resolved, language) = self.resolve()?;
        let added = resolved.links(language.literal(value)?)?;
        Ok(!resolved.ctx.apply(&DatasetChanges::adding(added)).is_empty())
    }

    /// Remove `value` from this set; return `false` if it was absent.
    pub fn delete(&self, value: &str) -> Result<bool, ProxyError> {
        let (resolved, language) = self.resolve()?;
        let removed: Vec<Quad> = resolved
            .quads()
            .into_iter()
            .filter(|q| language.matches(q.o()) && q.o().value() == value)
            .collect();
        Ok(!resolved.ctx.apply(&DatasetChanges::removing(removed)).is_empty())
    }

    /// Remove every string of this set; return how many quads were removed.
    pub fn clear(&self) -> Result<usize, ProxyError> {
        let (resolved, language) = self.resolve()?;
        let removed: Vec<Quad> = resolved
            .quads()
            .into_iter()
            .filter(|q| language.matches(q.o()))
            .collect();
        Ok(resolved.ctx.apply(&DatasetChanges::removing(removed)).len())
    }
}

impl ScopedView for LanguageSetProxy {
    fn scopes(&self) -> &ScopeStack {
        self.view.scopes()
    }

    fn base_context(&self) -> &Rc<ProxyContext> {
        self.view.base_context()
    }
}

impl fmt::Debug for LanguageSetProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageSetProxy")
            .field("subject", &self.view.id())
            .field("key", &self.key)
            .field("language", &self.language)
            .finish()
    }
}
