//! A [`TermIndex`] is a bidirectional association of [terms](`Term`) with short numeric indices.
use ldo_term::Term;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// The numeric index type used by [`TermIndex`].
pub type Index = u32;

/// A bidirectional association of [terms](`Term`) with [indices](`Index`).
///
/// Terms are never evicted, so an index stays valid for the lifetime of the term-index.
#[derive(Clone, Debug, Default)]
pub struct TermIndex {
    t2i: HashMap<Term, Index>,
    i2t: Vec<Term>,
}

impl TermIndex {
    /// Build an empty term-index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of indexed terms.
    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    /// Whether no term has been indexed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the index corresponding to term `t`, if it exists.
    pub fn get_index(&self, t: &Term) -> Option<Index> {
        self.t2i.get(t).copied()
    }

    /// Get the index corresponding to term `t`, adding it in the term-index if necessary.
    ///
    /// # Panics
    /// If more than `u32::MAX` distinct terms are indexed.
    pub fn ensure_index(&mut self, t: &Term) -> Index {
        if let Some(i) = self.t2i.get(t) {
            return *i;
        }
        match self.t2i.entry(t.clone()) {
            Entry::Vacant(e) => {
                let i = Index::try_from(self.i2t.len())
                    .unwrap_or_else(|_| panic!("more than {} terms in a TermIndex", Index::MAX));
                self.i2t.push(e.key().clone());
                e.insert(i);
                i
            }
            Entry::Occupied(e) => *e.get(),
        }
    }

    /// Get the term corresponding to index `i`.
    ///
    /// # Precondition
    /// `i` must have been returned previously by [`get_index`](TermIndex::get_index)
    /// or [`ensure_index`](TermIndex::ensure_index), otherwise this method may panic.
    pub fn get_term(&self, i: Index) -> &Term {
        &self.i2t[i as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn term_index() -> Result<(), Box<dyn std::error::Error>> {
        let exa = Term::iri("https://example.com/ns/a")?;
        let exb = Term::iri("https://example.com/ns/b")?;
        let bn1 = Term::blank_node("bn1")?;
        let hello = Term::literal("hello world");

        let mut ti = TermIndex::new();
        assert!(ti.is_empty());
        assert_eq!(ti.get_index(&exa), None);

        assert_eq!(ti.ensure_index(&exa), 0);
        assert_eq!(ti.ensure_index(&exb), 1);
        assert_eq!(ti.ensure_index(&bn1), 2);
        assert_eq!(ti.ensure_index(&exa), 0);
        assert_eq!(ti.len(), 3);
        assert_eq!(ti.get_index(&hello), None);

        assert_eq!(ti.ensure_index(&hello), 3);
        assert_eq!(ti.get_term(1), &exb);
        assert_eq!(ti.get_term(3), &hello);
        Ok(())
    }
}
