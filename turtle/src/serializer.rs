//! Serializer for the [N-Quads] concrete syntax of RDF.
//!
//! Quads are written in a stable order (sorted by subject, predicate, object, then graph),
//! so that the output of two equal datasets is byte-for-byte identical.
//!
//! [N-Quads]: https://www.w3.org/TR/n-quads/
use ldo_dataset::Dataset;
use ldo_term::Quad;
use std::io;

/// Write `dataset` as N-Quads into `write`.
///
/// This makes no effort to minimize the number of write operations,
/// so in most cases `write` should be a [`BufWriter`](io::BufWriter).
pub fn write_nquads<W: io::Write>(write: &mut W, dataset: &dyn Dataset) -> io::Result<()> {
    for q in sorted(dataset) {
        writeln!(write, "{q}")?;
    }
    Ok(())
}

/// Serialize `dataset` as an N-Quads string.
pub fn to_nquads(dataset: &dyn Dataset) -> String {
    let mut out = String::new();
    for q in sorted(dataset) {
        out.push_str(&q.to_string());
        out.push('\n');
    }
    out
}

fn sorted(dataset: &dyn Dataset) -> Vec<Quad> {
    let mut quads: Vec<Quad> = dataset.quads().collect();
    quads.sort();
    quads
}
