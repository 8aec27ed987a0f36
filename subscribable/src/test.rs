use super::*;
use ldo_dataset::{share, Dataset, DatasetChanges, ExtendedDataset, MutableDataset};
use ldo_term::{Quad, QuadPattern, Term};
use std::cell::RefCell;
use std::rc::Rc;
use test_case::test_case;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn ex(suffix: &str) -> Term {
    Term::new_iri_unchecked(format!("http://example.org/{suffix}"))
}

fn triple(s: &str, p: &str, o: &str) -> Quad {
    Quad::new_unchecked(ex(s), ex(p), ex(o), Term::DefaultGraph)
}

fn quad(s: &str, p: &str, o: &str, g: &str) -> Quad {
    Quad::new_unchecked(ex(s), ex(p), ex(o), ex(g))
}

fn parent() -> ExtendedDataset {
    [triple("a", "p", "1"), triple("a", "p", "2"), triple("b", "p", "1")]
        .into_iter()
        .collect()
}

/// A listener recording every batch it receives.
fn recorder() -> (Listener, Rc<RefCell<Vec<DatasetChanges>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log2 = log.clone();
    (listener(move |c| log2.borrow_mut().push(c.clone())), log)
}

fn by_subject(s: &str) -> QuadPattern {
    QuadPattern::new(Some(ex(s)), None, None, None)
}

// transactions

#[test]
fn overlay_reads_reflect_pending_changes() {
    test_setup();
    let mut p = parent();
    let mut tx = TransactionDataset::new(&mut p);
    assert!(tx.add(triple("c", "p", "1")));
    assert!(!tx.add(triple("a", "p", "1")));
    assert!(tx.delete(&triple("a", "p", "2")));
    assert!(!tx.delete(&triple("z", "p", "1")));

    assert_eq!(tx.size(), 3);
    assert!(tx.has(&triple("c", "p", "1")));
    assert!(!tx.has(&triple("a", "p", "2")));
    assert_eq!(tx.match_quads(Some(&ex("a")), None, None, None).size(), 1);
    assert_eq!(tx.quads().count(), 3);
    assert!(tx.has_changes());
    // the parent is untouched until commit
    assert_eq!(tx.parent().size(), 3);
    assert!(tx.parent().has(&triple("a", "p", "2")));
}

#[test]
fn commit_then_rollback() -> TestResult {
    test_setup();
    let before = parent();
    let mut p = parent();
    let expected = {
        let mut tx = TransactionDataset::new(&mut p);
        tx.add(triple("c", "p", "1"));
        tx.add(triple("a", "p", "1")); // already in parent
        tx.delete(&triple("b", "p", "1"));
        tx.delete(&triple("z", "p", "9")); // not in parent
        let expected = tx.to_dataset();
        tx.commit()?;
        assert_eq!(
            tx.committed_changes(),
            Some(&DatasetChanges::new([triple("c", "p", "1")], [triple("b", "p", "1")]))
        );
        assert_eq!(tx.commit(), Err(TransactionError::AlreadyCommitted));
        assert!(tx.parent().equals(&expected));
        tx.rollback()?;
        assert!(tx.committed_changes().is_none());
        assert_eq!(tx.rollback(), Err(TransactionError::NotCommitted));
        expected
    };
    assert!(p.equals(&before));
    assert!(!p.equals(&expected));
    Ok(())
}

#[test]
fn rollback_before_commit_fails() {
    let mut p = parent();
    let mut tx = TransactionDataset::new(&mut p);
    tx.add(triple("c", "p", "1"));
    assert_eq!(tx.rollback(), Err(TransactionError::NotCommitted));
    // the failed rollback does not prevent a later commit
    assert_eq!(tx.commit(), Ok(()));
}

#[test]
fn parent_changes_are_visible_unless_masked() {
    let shared = Rc::new(RefCell::new(parent()));
    let mut tx = TransactionDataset::new(shared.clone());
    tx.delete(&triple("a", "p", "1"));
    shared.borrow_mut().add(triple("d", "p", "1"));
    shared.borrow_mut().add(triple("a", "p", "1"));
    assert!(tx.has(&triple("d", "p", "1")));
    assert!(!tx.has(&triple("a", "p", "1")));
}

#[test]
fn add_cancels_pending_delete() {
    let mut p = parent();
    let mut tx = TransactionDataset::new(&mut p);
    tx.delete(&triple("a", "p", "1"));
    tx.add(triple("a", "p", "1"));
    assert!(tx.changes().removed().is_none());
    assert!(tx.has(&triple("a", "p", "1")));
}

#[test]
fn nested_transactions() -> TestResult {
    let mut p = parent();
    let mut outer = TransactionDataset::new(&mut p);
    outer.add(triple("c", "p", "1"));
    {
        let mut inner = outer.start_transaction();
        inner.delete(&triple("c", "p", "1"));
        inner.add(triple("d", "p", "1"));
        assert_eq!(inner.size(), 4);
        inner.commit()?;
    }
    assert!(!outer.has(&triple("c", "p", "1")));
    assert!(outer.has(&triple("d", "p", "1")));
    outer.commit()?;
    assert_eq!(p.size(), 4);
    Ok(())
}

// subscriptions

#[test]
fn listeners_fire_once_per_operation_with_matching_subset() -> TestResult {
    test_setup();
    let mut ds = SubscribableDataset::new(parent());
    let (on_a, log_a) = recorder();
    let (on_any, log_any) = recorder();
    ds.on(by_subject("a"), on_a)?;
    ds.on(QuadPattern::any(), on_any)?;

    let effective = ds.bulk(&DatasetChanges::new(
        [triple("a", "p", "3"), triple("b", "p", "3"), triple("a", "p", "1")],
        [triple("a", "p", "2")],
    ));
    assert_eq!(effective.len(), 3);

    let log_a = log_a.borrow();
    assert_eq!(log_a.len(), 1);
    assert_eq!(
        log_a[0],
        DatasetChanges::new([triple("a", "p", "3")], [triple("a", "p", "2")])
    );
    let log_any = log_any.borrow();
    assert_eq!(log_any.len(), 1);
    assert_eq!(log_any[0], effective);
    Ok(())
}

#[test_case(QuadPattern::new(None, Some(ex("p")), None, None) => true; "predicate")]
#[test_case(QuadPattern::new(None, None, Some(ex("o")), Some(ex("g"))) => true; "object and graph")]
#[test_case(QuadPattern::new(Some(ex("s")), Some(ex("p")), Some(ex("o")), Some(ex("g"))) => true; "exact")]
#[test_case(QuadPattern::new(None, None, None, Some(Term::DefaultGraph)) => false; "default graph")]
#[test_case(QuadPattern::new(Some(ex("o")), None, None, None) => false; "other subject")]
fn listener_fires_iff_pattern_matches(pattern: QuadPattern) -> bool {
    let mut ds = SubscribableDataset::<ExtendedDataset>::default();
    let (l, log) = recorder();
    ds.on(pattern, l).unwrap();
    ds.add(quad("s", "p", "o", "g"));
    let fired = !log.borrow().is_empty();
    fired
}

#[test]
fn no_event_for_ineffective_changes() -> TestResult {
    let mut ds = SubscribableDataset::new(parent());
    let (l, log) = recorder();
    ds.on(QuadPattern::any(), l)?;
    assert!(!ds.add(triple("a", "p", "1")));
    assert!(!ds.delete(&triple("z", "p", "1")));
    ds.delete_matches(&by_subject("nobody"));
    assert!(log.borrow().is_empty());
    ds.delete_matches(&by_subject("a"));
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].len(), 2);
    Ok(())
}

#[test]
fn registration_order_once_and_prepend() -> TestResult {
    let mut ds = SubscribableDataset::<ExtendedDataset>::default();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let named = |name: &'static str| {
        let calls = calls.clone();
        listener(move |_| calls.borrow_mut().push(name))
    };
    let pat = by_subject("a");
    ds.on(pat.clone(), named("second"))?;
    ds.once(pat.clone(), named("once"))?;
    ds.prepend_listener(pat.clone(), named("first"))?;
    ds.prepend_once_listener(pat.clone(), named("zeroth"))?;
    assert_eq!(ds.listener_count(&pat), 4);

    ds.add(triple("a", "p", "1"));
    assert_eq!(*calls.borrow(), vec!["zeroth", "first", "second", "once"]);
    assert_eq!(ds.listener_count(&pat), 2);

    ds.add(triple("a", "p", "2"));
    assert_eq!(calls.borrow().len(), 6);
    Ok(())
}

#[test]
fn removing_listeners() -> TestResult {
    let ds = SubscribableDataset::<ExtendedDataset>::default();
    let (l, _) = recorder();
    let (other, _) = recorder();
    ds.on(by_subject("a"), l.clone())?;
    ds.on(by_subject("b"), l.clone())?;
    ds.on(by_subject("b"), other.clone())?;
    assert_eq!(ds.event_names(), vec![by_subject("a"), by_subject("b")]);

    assert!(!ds.off(&by_subject("a"), &other));
    assert!(ds.off(&by_subject("a"), &l));
    assert_eq!(ds.event_names(), vec![by_subject("b")]);

    ds.on(by_subject("c"), l.clone())?;
    ds.remove_listener_from_all_events(&l);
    assert_eq!(ds.listener_count(&by_subject("b")), 1);
    assert_eq!(ds.listener_count(&by_subject("c")), 0);
    assert!(ds.listeners(&by_subject("b")).len() == 1);

    ds.remove_all_listeners(None);
    assert!(ds.event_names().is_empty());
    Ok(())
}

#[test]
fn invalid_patterns_are_rejected() {
    let ds = SubscribableDataset::<ExtendedDataset>::default();
    let (l, _) = recorder();
    let bad = QuadPattern::new(None, Some(Term::literal("p")), None, None);
    assert!(matches!(ds.on(bad, l), Err(SubscriptionError::InvalidPattern(_))));
}

#[test]
fn max_listeners_is_only_a_warning() -> TestResult {
    test_setup();
    let ds = SubscribableDataset::<ExtendedDataset>::default();
    assert_eq!(ds.max_listeners(), DEFAULT_MAX_LISTENERS);
    ds.set_max_listeners(1);
    let (l1, _) = recorder();
    let (l2, _) = recorder();
    ds.on(QuadPattern::any(), l1)?;
    ds.on(QuadPattern::any(), l2)?;
    assert_eq!(ds.listener_count(&QuadPattern::any()), 2);
    Ok(())
}

#[test]
fn listeners_may_read_and_write_the_dataset() -> TestResult {
    let mut ds = SubscribableDataset::<ExtendedDataset>::default();
    let handle = ds.clone();
    let seen = Rc::new(RefCell::new(0));
    let seen2 = seen.clone();
    ds.once(
        by_subject("a"),
        listener(move |_| {
            *seen2.borrow_mut() = handle.size();
            let mut h = handle.clone();
            h.add(triple("echo", "p", "1"));
        }),
    )?;
    ds.add(triple("a", "p", "1"));
    assert_eq!(*seen.borrow(), 1);
    assert_eq!(ds.size(), 2);
    Ok(())
}

#[test]
fn listeners_may_borrow_the_shared_handle() -> TestResult {
    let ds = SubscribableDataset::<ExtendedDataset>::default();
    let mut shared = share(ds.clone());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (seen2, reader) = (seen.clone(), shared.clone());
    ds.on(
        by_subject("a"),
        listener(move |_| seen2.borrow_mut().push(reader.borrow().size())),
    )?;
    assert!(shared.add(triple("a", "p", "1")));
    shared.bulk(&DatasetChanges::new(
        [triple("a", "p", "2"), triple("b", "p", "1")],
        [triple("a", "p", "1")],
    ));
    assert_eq!(*seen.borrow(), vec![1, 2]);

    let (effective, deferred) = shared.borrow_mut().bulk_deferred(&DatasetChanges::removing([
        triple("a", "p", "2"),
    ]));
    assert_eq!(effective.len(), 1);
    assert_eq!(seen.borrow().len(), 2);
    deferred.run();
    assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    Ok(())
}

#[test]
fn transaction_commit_notifies_once() -> TestResult {
    let ds = SubscribableDataset::new(parent());
    let (l, log) = recorder();
    ds.on(QuadPattern::new(None, Some(ex("p")), None, None), l)?;

    let mut tx = ds.start_transaction();
    tx.add(triple("c", "p", "1"));
    tx.add(triple("d", "p", "1"));
    tx.delete(&triple("a", "p", "1"));
    assert!(log.borrow().is_empty());
    tx.commit()?;
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].len(), 3);
    assert_eq!(ds.size(), 4);

    tx.rollback()?;
    assert_eq!(log.borrow().len(), 2);
    assert!(ds.equals(&parent()));
    Ok(())
}
