//! Quad patterns, where each position is either a fixed term or a wildcard.
use crate::{Position, Quad, Term, TermError};
use std::fmt;

/// A quad pattern.
///
/// `None` at a position is a wildcard, matching any term.
/// Patterns are hashable, so they can be used as keys for listeners.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadPattern {
    /// The subject constraint
    pub subject: Option<Term>,
    /// The predicate constraint
    pub predicate: Option<Term>,
    /// The object constraint
    pub object: Option<Term>,
    /// The graph constraint
    pub graph: Option<Term>,
}

impl QuadPattern {
    /// Build a pattern from its four (optional) terms.
    pub fn new(
        subject: Option<Term>,
        predicate: Option<Term>,
        object: Option<Term>,
        graph: Option<Term>,
    ) -> Self {
        QuadPattern {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// The pattern matching every quad.
    pub fn any() -> Self {
        Self::default()
    }

    /// The pattern matching exactly `quad`.
    pub fn exact(quad: &Quad) -> Self {
        Self::new(
            Some(quad.s().clone()),
            Some(quad.p().clone()),
            Some(quad.o().clone()),
            Some(quad.g().clone()),
        )
    }

    /// The constraint at the given position.
    pub fn get(&self, position: Position) -> Option<&Term> {
        match position {
            Position::Subject => self.subject.as_ref(),
            Position::Predicate => self.predicate.as_ref(),
            Position::Object => self.object.as_ref(),
            Position::Graph => self.graph.as_ref(),
        }
    }

    /// Whether `quad` satisfies every constraint of this pattern.
    pub fn matches(&self, quad: &Quad) -> bool {
        Position::ALL.iter().all(|pos| match self.get(*pos) {
            None => true,
            Some(term) => term == quad.get(*pos),
        })
    }

    /// Whether every position is a wildcard.
    pub fn is_any(&self) -> bool {
        Position::ALL.iter().all(|pos| self.get(*pos).is_none())
    }

    /// Check that every fixed term may appear at its position.
    ///
    /// A pattern failing this check can never match any quad.
    pub fn validate(&self) -> Result<(), TermError> {
        for pos in Position::ALL {
            if let Some(term) = self.get(pos) {
                pos.check(term)?;
            }
        }
        Ok(())
    }

    /// All 16 patterns obtained by replacing
    /// any subset of the terms of `quad` by a wildcard.
    ///
    /// These are exactly the patterns matching `quad`.
    /// The first one is the exact pattern, the last one is [`QuadPattern::any`].
    pub fn projections(quad: &Quad) -> impl Iterator<Item = QuadPattern> + '_ {
        (0u8..16).map(move |mask| {
            let pick = |bit: u8, term: &Term| {
                if mask & bit == 0 {
                    Some(term.clone())
                } else {
                    None
                }
            };
            QuadPattern::new(
                pick(1, quad.s()),
                pick(2, quad.p()),
                pick(4, quad.o()),
                pick(8, quad.g()),
            )
        })
    }
}

impl From<&Quad> for QuadPattern {
    fn from(quad: &Quad) -> Self {
        QuadPattern::exact(quad)
    }
}

impl fmt::Display for QuadPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, pos) in Position::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.get(*pos) {
                None => f.write_str("*")?,
                Some(Term::DefaultGraph) => f.write_str("<>")?,
                Some(term) => write!(f, "{term}")?,
            }
        }
        f.write_str(")")
    }
}
