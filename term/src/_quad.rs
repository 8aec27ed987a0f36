use crate::{Term, TermError, TermKind};
use std::fmt;

/// The four positions of a [`Quad`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum Position {
    /// The subject position
    Subject,
    /// The predicate position
    Predicate,
    /// The object position
    Object,
    /// The graph position
    Graph,
}

impl Position {
    /// All positions, in SPOG order.
    pub const ALL: [Position; 4] = [
        Position::Subject,
        Position::Predicate,
        Position::Object,
        Position::Graph,
    ];

    /// Whether a term of the given kind may appear at this position.
    pub fn accepts(self, kind: TermKind) -> bool {
        use TermKind::*;
        match self {
            Position::Subject => matches!(kind, Iri | BlankNode),
            Position::Predicate => kind == Iri,
            Position::Object => matches!(kind, Iri | BlankNode | Literal),
            Position::Graph => matches!(kind, Iri | BlankNode | DefaultGraph),
        }
    }

    /// Check that `term` may appear at this position.
    pub fn check(self, term: &Term) -> Result<(), TermError> {
        if self.accepts(term.kind()) {
            Ok(())
        } else {
            Err(TermError::UnexpectedKind {
                position: self,
                kind: term.kind(),
            })
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let txt = match self {
            Position::Subject => "subject",
            Position::Predicate => "predicate",
            Position::Object => "object",
            Position::Graph => "graph",
        };
        f.write_str(txt)
    }
}

/// An RDF quad: subject, predicate, object and graph.
///
/// A quad is immutable;
/// "changing" a quad means removing it and adding another one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quad {
    subject: Term,
    predicate: Term,
    object: Term,
    graph: Term,
}

impl Quad {
    /// Build a quad, checking that every term is allowed at its position.
    pub fn new(subject: Term, predicate: Term, object: Term, graph: Term) -> Result<Self, TermError> {
        Position::Subject.check(&subject)?;
        Position::Predicate.check(&predicate)?;
        Position::Object.check(&object)?;
        Position::Graph.check(&graph)?;
        Ok(Self::new_unchecked(subject, predicate, object, graph))
    }

    /// Build a quad without checking the kinds of its terms.
    pub fn new_unchecked(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        debug_assert!(Position::Subject.accepts(subject.kind()));
        debug_assert!(Position::Predicate.accepts(predicate.kind()));
        debug_assert!(Position::Object.accepts(object.kind()));
        debug_assert!(Position::Graph.accepts(graph.kind()));
        Quad {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Build a quad in the default graph.
    pub fn triple(subject: Term, predicate: Term, object: Term) -> Result<Self, TermError> {
        Self::new(subject, predicate, object, Term::DefaultGraph)
    }

    /// The subject of this quad.
    #[inline]
    pub fn s(&self) -> &Term {
        &self.subject
    }

    /// The predicate of this quad.
    #[inline]
    pub fn p(&self) -> &Term {
        &self.predicate
    }

    /// The object of this quad.
    #[inline]
    pub fn o(&self) -> &Term {
        &self.object
    }

    /// The graph of this quad.
    #[inline]
    pub fn g(&self) -> &Term {
        &self.graph
    }

    /// The term at the given position.
    pub fn get(&self, position: Position) -> &Term {
        match position {
            Position::Subject => &self.subject,
            Position::Predicate => &self.predicate,
            Position::Object => &self.object,
            Position::Graph => &self.graph,
        }
    }

    /// Consume this quad into its four terms, in SPOG order.
    pub fn into_spog(self) -> [Term; 4] {
        [self.subject, self.predicate, self.object, self.graph]
    }

    /// Build a copy of this quad where every occurrence of `old`,
    /// as subject or as object, is replaced by `new`.
    ///
    /// Fails if `new` can not appear at one of the replaced positions.
    pub fn replace_node(&self, old: &Term, new: &Term) -> Result<Self, TermError> {
        let subject = if &self.subject == old { new } else { &self.subject };
        let object = if &self.object == old { new } else { &self.object };
        Quad::new(
            subject.clone(),
            self.predicate.clone(),
            object.clone(),
            self.graph.clone(),
        )
    }
}
