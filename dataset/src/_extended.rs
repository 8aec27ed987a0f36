use crate::index::{Index, TermIndex};
use crate::{Dataset, MutableDataset, QuadIter};
use ldo_term::{Quad, QuadPattern};
use std::collections::BTreeSet;
use std::fmt;

type Key = [Index; 4];

/// The positions (in SPOG order) stored at each rank of an index key.
const SPOG: [usize; 4] = [0, 1, 2, 3];
const POSG: [usize; 4] = [1, 2, 0, 3];
const OSPG: [usize; 4] = [2, 0, 1, 3];
const GSPO: [usize; 4] = [3, 0, 1, 2];
static ORDERS: [[usize; 4]; 4] = [SPOG, POSG, OSPG, GSPO];

/// An in-memory [`Dataset`], with four quad indexes (SPOG, POSG, OSPG and GSPO).
///
/// Terms are interned in a [`TermIndex`],
/// so each index only stores four small integers per quad.
/// [`quads_matching`](Dataset::quads_matching) scans the index
/// whose key starts with the largest number of bound positions of the pattern.
///
/// Fast to query but slow to load, with a relatively high memory footprint.
#[derive(Clone, Debug, Default)]
pub struct ExtendedDataset {
    terms: TermIndex,
    indexes: [BTreeSet<Key>; 4],
}

impl ExtendedDataset {
    /// Build an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    fn ids(&self, quad: &Quad) -> Option<Key> {
        Some([
            self.terms.get_index(quad.s())?,
            self.terms.get_index(quad.p())?,
            self.terms.get_index(quad.o())?,
            self.terms.get_index(quad.g())?,
        ])
    }

    fn quad(&self, spog: Key) -> Quad {
        let [s, p, o, g] = spog.map(|i| self.terms.get_term(i).clone());
        Quad::new_unchecked(s, p, o, g)
    }

    fn permute(order: &[usize; 4], spog: &Key) -> Key {
        order.map(|pos| spog[pos])
    }

    fn unpermute(order: &[usize; 4], key: &Key) -> Key {
        let mut spog = [0; 4];
        for (rank, pos) in order.iter().enumerate() {
            spog[*pos] = key[rank];
        }
        spog
    }

    /// Pick the index whose key starts with the most bound positions,
    /// and return it with the length of that prefix.
    fn best_index(bound: &[Option<Index>; 4]) -> (usize, usize) {
        ORDERS
            .iter()
            .enumerate()
            .map(|(i, order)| {
                let prefix = order.iter().take_while(|pos| bound[**pos].is_some()).count();
                (i, prefix)
            })
            .max_by_key(|(i, prefix)| (*prefix, std::cmp::Reverse(*i)))
            .unwrap_or((0, 0))
    }
}

impl Dataset for ExtendedDataset {
    fn quads(&self) -> QuadIter<'_> {
        Box::new(self.indexes[0].iter().map(move |k| self.quad(*k)))
    }

    fn quads_matching(&self, pattern: &QuadPattern) -> QuadIter<'_> {
        let mut bound = [None; 4];
        let terms = [
            &pattern.subject,
            &pattern.predicate,
            &pattern.object,
            &pattern.graph,
        ];
        for (pos, term) in terms.into_iter().enumerate() {
            if let Some(term) = term {
                match self.terms.get_index(term) {
                    Some(i) => bound[pos] = Some(i),
                    // a term absent from the index matches nothing
                    None => return Box::new(std::iter::empty()),
                }
            }
        }
        let (which, prefix) = Self::best_index(&bound);
        let order = &ORDERS[which];
        let mut lo = [Index::MIN; 4];
        let mut hi = [Index::MAX; 4];
        for rank in 0..prefix {
            let i = bound[order[rank]].unwrap_or_default();
            lo[rank] = i;
            hi[rank] = i;
        }
        Box::new(
            self.indexes[which]
                .range(lo..=hi)
                .map(move |key| Self::unpermute(order, key))
                .filter(move |spog| {
                    bound
                        .iter()
                        .zip(spog.iter())
                        .all(|(b, i)| b.map(|b| b == *i).unwrap_or(true))
                })
                .map(move |spog| self.quad(spog)),
        )
    }

    fn size(&self) -> usize {
        self.indexes[0].len()
    }

    fn has(&self, quad: &Quad) -> bool {
        match self.ids(quad) {
            Some(spog) => self.indexes[0].contains(&spog),
            None => false,
        }
    }
}

impl MutableDataset for ExtendedDataset {
    fn add(&mut self, quad: Quad) -> bool {
        let spog = [
            self.terms.ensure_index(quad.s()),
            self.terms.ensure_index(quad.p()),
            self.terms.ensure_index(quad.o()),
            self.terms.ensure_index(quad.g()),
        ];
        if !self.indexes[0].insert(spog) {
            return false;
        }
        for (which, order) in ORDERS.iter().enumerate().skip(1) {
            self.indexes[which].insert(Self::permute(order, &spog));
        }
        true
    }

    fn delete(&mut self, quad: &Quad) -> bool {
        let Some(spog) = self.ids(quad) else {
            return false;
        };
        if !self.indexes[0].remove(&spog) {
            return false;
        }
        for (which, order) in ORDERS.iter().enumerate().skip(1) {
            self.indexes[which].remove(&Self::permute(order, &spog));
        }
        true
    }
}

impl FromIterator<Quad> for ExtendedDataset {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        let mut d = Self::new();
        d.extend(iter);
        d
    }
}

impl Extend<Quad> for ExtendedDataset {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
        for q in iter {
            self.add(q);
        }
    }
}

impl PartialEq for ExtendedDataset {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for ExtendedDataset {}

/// Formats the dataset as N-Quads, one quad per line, in a stable order.
impl fmt::Display for ExtendedDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut quads: Vec<Quad> = self.quads().collect();
        quads.sort();
        for q in quads {
            writeln!(f, "{q}")?;
        }
        Ok(())
    }
}
