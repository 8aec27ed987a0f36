use super::*;
use ldo_term::{Quad, QuadPattern, Term};
use std::cell::RefCell;
use std::rc::Rc;
use test_case::test_case;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn ex(suffix: &str) -> Term {
    Term::new_iri_unchecked(format!("http://example.org/{suffix}"))
}

fn q(s: &str, p: &str, o: &str, g: Option<&str>) -> Quad {
    Quad::new_unchecked(ex(s), ex(p), ex(o), g.map(ex).unwrap_or(Term::DefaultGraph))
}

fn sample() -> ExtendedDataset {
    [
        q("alice", "knows", "bob", None),
        q("alice", "knows", "carol", None),
        q("bob", "knows", "carol", Some("g1")),
        q("carol", "likes", "alice", Some("g1")),
        q("carol", "likes", "bob", Some("g2")),
    ]
    .into_iter()
    .collect()
}

#[test]
fn add_and_delete_are_idempotent() {
    let mut d = ExtendedDataset::new();
    assert!(d.is_empty());
    assert!(d.add(q("a", "p", "b", None)));
    assert!(!d.add(q("a", "p", "b", None)));
    assert_eq!(d.size(), 1);
    assert!(d.has(&q("a", "p", "b", None)));
    assert!(!d.delete(&q("a", "p", "c", None)));
    assert!(d.delete(&q("a", "p", "b", None)));
    assert!(!d.delete(&q("a", "p", "b", None)));
    assert!(d.is_empty());
}

#[test_case(Some("alice"), None, None, None => 2; "by subject")]
#[test_case(None, Some("knows"), None, None => 3; "by predicate")]
#[test_case(None, None, Some("carol"), None => 2; "by object")]
#[test_case(None, None, None, Some("g1") => 2; "by graph")]
#[test_case(Some("carol"), None, None, Some("g2") => 1; "subject and graph")]
#[test_case(None, Some("likes"), None, Some("g1") => 1; "predicate and graph")]
#[test_case(None, None, Some("bob"), Some("g2") => 1; "object and graph")]
#[test_case(Some("alice"), None, Some("carol"), None => 1; "subject and object")]
#[test_case(Some("nobody"), None, None, None => 0; "unknown term")]
#[test_case(None, None, None, None => 5; "any")]
fn quads_matching(s: Option<&str>, p: Option<&str>, o: Option<&str>, g: Option<&str>) -> usize {
    let d = sample();
    let pattern = QuadPattern::new(s.map(ex), p.map(ex), o.map(ex), g.map(ex));
    let found: Vec<Quad> = d.quads_matching(&pattern).collect();
    assert!(found.iter().all(|q| pattern.matches(q)));
    found.len()
}

#[test]
fn default_graph_is_a_matchable_graph() {
    let d = sample();
    let m = d.match_quads(None, None, None, Some(&Term::DefaultGraph));
    assert_eq!(m.size(), 2);
}

#[test]
fn set_algebra() {
    let a: ExtendedDataset = [q("a", "p", "1", None), q("a", "p", "2", None)].into_iter().collect();
    let b: ExtendedDataset = [q("a", "p", "2", None), q("a", "p", "3", None)].into_iter().collect();
    assert_eq!(a.union(&b).size(), 3);
    assert_eq!(a.intersection(&b).size(), 1);
    assert!(a.difference(&b).has(&q("a", "p", "1", None)));
    assert_eq!(a.difference(&b).size(), 1);
    assert!(a.union(&b).contains(&a));
    assert!(!a.contains(&b));
    assert!(a.equals(&a.to_dataset()));
    assert_ne!(a, b);
}

#[test]
fn bulk_reports_effective_changes() {
    let mut d = sample();
    let changes = DatasetChanges::new(
        [q("alice", "knows", "bob", None), q("new", "p", "o", None)],
        [q("carol", "likes", "bob", Some("g2")), q("ghost", "p", "o", None)],
    );
    let effective = d.bulk(&changes);
    assert_eq!(
        effective,
        DatasetChanges::new(
            [q("new", "p", "o", None)],
            [q("carol", "likes", "bob", Some("g2"))]
        )
    );
    assert_eq!(d.size(), 5);
}

#[test]
fn delete_matches_and_clear() {
    let mut d = sample();
    let removed = d.delete_matches(&QuadPattern::new(None, Some(ex("likes")), None, None));
    assert_eq!(removed.len(), 2);
    assert!(removed.added().is_none());
    assert_eq!(d.size(), 3);
    assert_eq!(d.clear().len(), 3);
    assert!(d.is_empty());
}

#[test]
fn changes_are_normalized() {
    let both = q("a", "p", "b", None);
    let c = DatasetChanges::new([both.clone()], [both.clone()]);
    assert!(c.removed().is_none());
    assert_eq!(c.len(), 1);

    let empty = DatasetChanges::new(None, None);
    assert!(empty.is_empty());
    assert!(empty.added().is_none() && empty.removed().is_none());
}

#[test]
fn merge_cancels_opposite_changes() {
    let x = q("a", "p", "x", None);
    let y = q("a", "p", "y", None);
    let mut c = DatasetChanges::removing([x.clone()]);
    c.merge(&DatasetChanges::adding([x.clone(), y.clone()]));
    assert!(c.removed().is_none());
    assert_eq!(c.added().map(Dataset::size), Some(2));

    c.merge(&DatasetChanges::removing([y.clone()]));
    assert!(c.added().is_some_and(|a| a.has(&x)));
    assert!(c.removed().is_some_and(|r| r.has(&y)));
    assert!(c.added().is_some_and(|a| !a.has(&y)));
}

#[test]
fn inverse_and_matching() {
    let c = DatasetChanges::new(
        [q("a", "p", "x", None), q("b", "p", "x", None)],
        [q("a", "r", "y", None)],
    );
    let inv = c.inverse();
    assert_eq!(inv.added(), c.removed());
    assert_eq!(inv.removed(), c.added());

    let only_a = c.matching(&QuadPattern::new(Some(ex("a")), None, None, None));
    assert_eq!(only_a.len(), 2);
    let none = c.matching(&QuadPattern::new(Some(ex("z")), None, None, None));
    assert!(none.is_empty());
}

#[test]
fn shared_dataset() -> TestResult {
    let shared = Rc::new(RefCell::new(sample()));
    let mut handle = shared.clone();
    handle.add(Quad::triple(ex("dave"), ex("knows"), Term::literal("x"))?);
    assert_eq!(shared.size(), 6);
    let dyn_shared: SharedDataset = shared;
    assert_eq!(dyn_shared.match_quads(Some(&ex("dave")), None, None, None).size(), 1);
    Ok(())
}

#[test]
fn display_is_sorted_nquads() {
    let d: ExtendedDataset = [q("b", "p", "o", None), q("a", "p", "o", Some("g"))]
        .into_iter()
        .collect();
    assert_eq!(
        d.to_string(),
        "<http://example.org/a> <http://example.org/p> <http://example.org/o> <http://example.org/g> .\n\
         <http://example.org/b> <http://example.org/p> <http://example.org/o> .\n"
    );
}
