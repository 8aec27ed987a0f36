use crate::bnode_id::is_valid_bnode_id;
use crate::language_tag::is_valid_language_tag;
use crate::ns::{rdf, xsd};
use crate::TermError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static BNODE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// The different kinds of terms that a [`Term`] can represent.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum TermKind {
    /// An [RDF IRI](https://www.w3.org/TR/rdf11-concepts/#section-IRIs)
    Iri,
    /// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#section-blank-nodes)
    BlankNode,
    /// An RDF [literal](https://www.w3.org/TR/rdf11-concepts/#section-Graph-Literal)
    Literal,
    /// The default graph of a dataset
    DefaultGraph,
}

/// An RDF term, or the default graph marker.
///
/// Equality, ordering and hashing are structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An IRI
    Iri(Arc<str>),
    /// A blank node, identified by its label (without the leading `_:`)
    BlankNode(Arc<str>),
    /// A literal
    Literal(Literal),
    /// The default graph
    DefaultGraph,
}

/// An RDF literal: a lexical value, a datatype IRI and an optional language tag.
///
/// When the language tag is present, the datatype is always `rdf:langString`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: Arc<str>,
    datatype: Arc<str>,
    language: Option<Arc<str>>,
}

impl Literal {
    /// The lexical value of this literal.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The datatype IRI of this literal.
    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    /// The (lower-cased) language tag of this literal, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl Term {
    /// Build an IRI term, checking that `iri` is a valid IRI reference.
    ///
    /// Relative IRI references are accepted,
    /// as keys that a JSON-LD context does not map are used verbatim.
    pub fn iri(iri: &str) -> Result<Self, TermError> {
        oxiri::IriRef::parse(iri).map_err(|err| TermError::InvalidIri {
            iri: iri.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Term::Iri(iri.into()))
    }

    /// Build an IRI term without checking its validity.
    pub fn new_iri_unchecked<T: Into<Arc<str>>>(iri: T) -> Self {
        Term::Iri(iri.into())
    }

    /// Build a blank node term with the given label (without the leading `_:`).
    pub fn blank_node(id: &str) -> Result<Self, TermError> {
        if is_valid_bnode_id(id) {
            Ok(Term::BlankNode(id.into()))
        } else {
            Err(TermError::InvalidBnodeId(id.to_string()))
        }
    }

    /// Build a fresh blank node, whose label is unique within this process.
    pub fn new_blank_node() -> Self {
        let n = BNODE_COUNTER.fetch_add(1, Ordering::Relaxed);
        Term::BlankNode(format!("ldo{n}").into())
    }

    /// Build a `xsd:string` literal.
    pub fn literal<T: Into<Arc<str>>>(value: T) -> Self {
        Term::Literal(Literal {
            value: value.into(),
            datatype: xsd::string.into(),
            language: None,
        })
    }

    /// Build a literal with the given datatype.
    ///
    /// Fails if `datatype` is not a valid IRI,
    /// or if it is `rdf:langString` (use [`Term::lang_literal`] instead).
    pub fn typed_literal<T: Into<Arc<str>>>(value: T, datatype: &str) -> Result<Self, TermError> {
        if datatype == rdf::langString {
            return Err(TermError::MissingLanguageTag);
        }
        oxiri::Iri::parse(datatype).map_err(|err| TermError::InvalidIri {
            iri: datatype.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Term::Literal(Literal {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }))
    }

    /// Build a language-tagged string.
    ///
    /// The tag is normalized to lower case.
    pub fn lang_literal<T: Into<Arc<str>>>(value: T, language: &str) -> Result<Self, TermError> {
        if !is_valid_language_tag(language) {
            return Err(TermError::InvalidLanguageTag(language.to_string()));
        }
        Ok(Term::Literal(Literal {
            value: value.into(),
            datatype: rdf::langString.into(),
            language: Some(language.to_ascii_lowercase().into()),
        }))
    }

    /// The kind of this term.
    pub fn kind(&self) -> TermKind {
        match self {
            Term::Iri(_) => TermKind::Iri,
            Term::BlankNode(_) => TermKind::BlankNode,
            Term::Literal(_) => TermKind::Literal,
            Term::DefaultGraph => TermKind::DefaultGraph,
        }
    }

    /// Whether this term is an IRI.
    #[inline]
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Whether this term is a blank node.
    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Whether this term is a literal.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Whether this term is the default graph.
    #[inline]
    pub fn is_default_graph(&self) -> bool {
        matches!(self, Term::DefaultGraph)
    }

    /// Whether this term is an IRI or a blank node.
    #[inline]
    pub fn is_node(&self) -> bool {
        self.is_iri() || self.is_blank_node()
    }

    /// The textual value of this term:
    /// the IRI, the blank node label, the lexical form of a literal,
    /// or the empty string for the default graph.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::BlankNode(id) => id,
            Term::Literal(lit) => lit.value(),
            Term::DefaultGraph => "",
        }
    }

    /// This term as a literal, if it is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The datatype of this term, if it is a literal.
    pub fn datatype(&self) -> Option<&str> {
        self.as_literal().map(Literal::datatype)
    }

    /// The language tag of this term, if it is a language-tagged string.
    pub fn language(&self) -> Option<&str> {
        self.as_literal().and_then(Literal::language)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}
