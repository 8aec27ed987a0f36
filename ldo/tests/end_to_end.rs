use ldo::dataset::{Dataset, DatasetChanges, MutableDataset};
use ldo::subscribable::{listener, TransactionError};
use ldo::term::{Quad, QuadPattern, Term};
use ldo::{start_transaction, write, LdoDataset, LdoError, ObjectLiteral, ScopedView, Value};
use serde_json::{json, Value as JsonValue};
use std::cell::RefCell;
use std::rc::Rc;
use test_case::test_case;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const DATA: &str = r#"
    @prefix ex: <http://example.org/> .

    ex:Obs1 a ex:Observation ; ex:notes "Cool Notes" .
    ex:alice a ex:Person ; ex:name "Alice" ; ex:knows ex:bob .
    ex:bob a ex:Person ; ex:name "Bob" .
"#;

fn context() -> JsonValue {
    json!({
        "ex": "http://example.org/",
        "type": { "@id": "@type" },
        "Person": "ex:Person",
        "Observation": "ex:Observation",
        "notes": "ex:notes",
        "name": "ex:name",
        "roommate": { "@id": "ex:roommate", "@type": "@id" },
        "knows": { "@id": "ex:knows", "@type": "@id", "@isCollection": true },
    })
}

static TEST_SETUP: std::sync::Once = std::sync::Once::new();

fn test_setup() {
    TEST_SETUP.call_once(|| {
        env_logger::init();
    });
}

fn ex(suffix: &str) -> Term {
    Term::new_iri_unchecked(format!("http://example.org/{suffix}"))
}

fn notes(value: &str) -> Quad {
    Quad::new_unchecked(ex("Obs1"), ex("notes"), Term::literal(value), Term::DefaultGraph)
}

fn load() -> Result<LdoDataset, LdoError> {
    test_setup();
    LdoDataset::from_turtle(DATA, None)
}

/// A listener recording every batch it receives, registered on `pattern`.
fn record(ldo: &LdoDataset, pattern: QuadPattern) -> Result<Rc<RefCell<Vec<DatasetChanges>>>, Box<dyn std::error::Error>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log2 = log.clone();
    ldo.events()
        .on(pattern, listener(move |c| log2.borrow_mut().push(c.clone())))?;
    Ok(log)
}

#[test]
fn observation_notes() -> TestResult {
    let ldo = load()?;
    let obs = ldo.using(&context())?.from_subject("ex:Obs1")?;
    assert_eq!(obs.get("notes"), Some(Value::from("Cool Notes")));
    obs.set("notes", "New")?;
    let found = ldo
        .events()
        .match_quads(Some(&ex("Obs1")), Some(&ex("notes")), None, None);
    assert_eq!(found.size(), 1);
    assert!(found.has(&notes("New")));
    Ok(())
}

#[test_case(Some("Obs1"), None, None => 2; "by subject")]
#[test_case(None, Some("notes"), None => 2; "by predicate")]
#[test_case(None, None, Some("New") => 1; "by added object")]
#[test_case(None, None, Some("Cool Notes") => 1; "by removed object")]
#[test_case(Some("alice"), None, None => 0; "unrelated subject")]
fn view_writes_are_dispatched(s: Option<&str>, p: Option<&str>, o: Option<&str>) -> usize {
    let ldo = load().unwrap();
    let pattern = QuadPattern::new(s.map(ex), p.map(ex), o.map(Term::literal), None);
    let log = record(&ldo, pattern).unwrap();
    let obs = ldo.using(&context()).unwrap().from_subject("ex:Obs1").unwrap();
    obs.set("notes", "New").unwrap();
    let log = log.borrow();
    assert!(log.len() <= 1);
    log.iter().map(DatasetChanges::len).sum()
}

#[test]
fn listeners_may_read_the_dataset() -> TestResult {
    let ldo = load()?;
    let sizes = Rc::new(RefCell::new(Vec::new()));
    let (sizes2, events) = (sizes.clone(), ldo.events().clone());
    ldo.events().on(
        QuadPattern::new(None, Some(ex("name")), None, None),
        listener(move |_| sizes2.borrow_mut().push(events.size())),
    )?;
    let bob = ldo.using(&context())?.from_subject("ex:bob")?;
    bob.set("name", "Robert")?;
    assert_eq!(*sizes.borrow(), vec![ldo.size()]);
    Ok(())
}

#[test]
fn listeners_may_read_through_views() -> TestResult {
    let ldo = load()?;
    let obs = ldo.using(&context())?.from_subject("ex:Obs1")?;
    let reader = ldo.using(&context())?.from_subject("ex:Obs1")?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (seen2, obs2) = (seen.clone(), obs.clone());
    ldo.events().on(
        QuadPattern::new(Some(ex("Obs1")), None, None, None),
        listener(move |_| {
            seen2
                .borrow_mut()
                .push((obs2.get("notes"), reader.get("notes")));
        }),
    )?;
    obs.set("notes", "New")?;
    let new = Some(Value::from("New"));
    assert_eq!(*seen.borrow(), vec![(new.clone(), new)]);

    let tx = start_transaction(&[&obs])?;
    obs.set("notes", "Committed")?;
    assert_eq!(seen.borrow().len(), 1);
    tx.commit()?;
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(seen.borrow()[1].0, Some(Value::from("Committed")));
    Ok(())
}

#[test]
fn views_reached_during_a_transaction_outlive_it() -> TestResult {
    let ldo = load()?;
    let builder = ldo.using(&context())?;
    let alice = builder.from_subject("ex:alice")?;
    let name = |value: &str| {
        Quad::new_unchecked(ex("bob"), ex("name"), Term::literal(value), Term::DefaultGraph)
    };

    let tx = start_transaction(&[&alice])?;
    let bob = alice
        .get("knows")
        .and_then(|v| v.as_array().cloned())
        .and_then(|knows| knows.get(0))
        .and_then(|v| v.as_subject().cloned())
        .ok_or("bob not found")?;
    assert!(bob.ptr_eq(&builder.from_subject("ex:bob")?));
    bob.set("name", "Bobby")?;
    assert!(ldo.events().has(&name("Bob")));
    tx.commit()?;
    assert_eq!(bob.scopes().depth(), 0);
    assert!(ldo.events().has(&name("Bobby")));

    bob.set("name", "Robert")?;
    assert!(ldo.events().has(&name("Robert")));
    assert_eq!(bob.get("name"), Some(Value::from("Robert")));

    {
        let _tx = start_transaction(&[&alice])?;
        let knows = alice.get("knows").and_then(|v| v.as_array().cloned());
        let bob = knows.and_then(|k| k.get(0)).and_then(|v| v.as_subject().cloned());
        if let Some(bob) = bob {
            bob.set("name", "Discarded")?;
        }
    }
    assert_eq!(bob.get("name"), Some(Value::from("Robert")));
    assert_eq!(bob.scopes().depth(), 0);
    Ok(())
}

#[test]
fn committing_a_transaction() -> TestResult {
    let ldo = load()?;
    let log = record(&ldo, QuadPattern::new(Some(ex("Obs1")), None, None, None))?;
    let builder = ldo.using(&context())?;
    let obs = builder.from_subject("ex:Obs1")?;
    let alice = builder.from_subject("ex:alice")?;

    let tx = start_transaction(&[&obs, &alice])?;
    obs.set("notes", "Pending")?;
    alice.set("name", "Alicia")?;
    assert_eq!(obs.get("notes"), Some(Value::from("Pending")));
    assert!(ldo.events().has(&notes("Cool Notes")));
    let outside = ldo.using(&context())?.from_subject("ex:Obs1")?;
    assert_eq!(outside.get("notes"), Some(Value::from("Cool Notes")));
    assert!(log.borrow().is_empty());
    assert_eq!(tx.changes().len(), 4);

    let applied = tx.commit()?;
    assert_eq!(applied.len(), 4);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].len(), 2);
    assert!(ldo.events().has(&notes("Pending")));
    assert_eq!(obs.scopes().depth(), 0);
    assert_eq!(alice.get("name"), Some(Value::from("Alicia")));
    Ok(())
}

#[test]
fn abandoning_a_transaction() -> TestResult {
    let ldo = load()?;
    let size = ldo.size();
    let obs = ldo.using(&context())?.from_subject("ex:Obs1")?;

    let tx = start_transaction(&[&obs])?;
    obs.set("notes", "Discarded")?;
    assert!(tx.has_changes());
    tx.abandon();
    assert_eq!(obs.get("notes"), Some(Value::from("Cool Notes")));

    {
        let _tx = start_transaction(&[&obs])?;
        obs.delete("notes")?;
        assert_eq!(obs.get("notes"), None);
    }
    assert_eq!(obs.get("notes"), Some(Value::from("Cool Notes")));
    assert_eq!(ldo.size(), size);
    Ok(())
}

#[test]
fn transactions_see_the_parent_at_read_time() -> TestResult {
    let ldo = load()?;
    let obs = ldo.using(&context())?.from_subject("ex:Obs1")?;
    let tx = start_transaction(&[&obs])?;
    obs.set("notes", "Pending")?;

    let mut events = ldo.events().clone();
    events.add(Quad::new(
        ex("Obs1"),
        ex("label"),
        Term::literal("late"),
        Term::DefaultGraph,
    )?);
    events.add(notes("Concurrent"));
    assert_eq!(obs.get("ex:label"), Some(Value::from("late")));
    let values = obs.get("notes").and_then(|v| v.as_array().map(|a| a.len()));
    assert_eq!(values, Some(2));
    assert!(!tx.dataset().borrow().has(&notes("Cool Notes")));
    assert_eq!(tx.dataset().borrow().size(), ldo.size());
    tx.abandon();
    Ok(())
}

#[test]
fn scopes_nest_inside_transactions() -> TestResult {
    let ldo = load()?;
    let obs = ldo.using(&context())?.from_subject("ex:Obs1")?;
    let tx = start_transaction(&[&obs])?;
    let scope = write([ex("g1")]).using(&[&obs]);
    obs.set("notes", "in g1")?;
    scope.restore();
    assert_eq!(obs.scopes().depth(), 1);
    tx.commit()?;
    assert!(ldo.events().has(&Quad::new(
        ex("Obs1"),
        ex("notes"),
        Term::literal("in g1"),
        ex("g1")
    )?));
    assert_eq!(obs.scopes().depth(), 0);
    Ok(())
}

#[test]
fn transaction_errors() -> TestResult {
    let ldo = load()?;
    assert!(matches!(start_transaction(&[]), Err(LdoError::NoViews)));

    let size = ldo.size();
    let mut tx = ldo.start_transaction();
    assert_eq!(tx.rollback(), Err(TransactionError::NotCommitted));
    tx.add(notes("Extra"));
    tx.delete(&notes("Cool Notes"));
    tx.commit()?;
    assert_eq!(tx.commit(), Err(TransactionError::AlreadyCommitted));
    assert!(ldo.events().has(&notes("Extra")));
    tx.rollback()?;
    assert_eq!(ldo.size(), size);
    assert!(ldo.events().has(&notes("Cool Notes")));
    Ok(())
}

#[test]
fn renaming_round_trip() -> TestResult {
    let ldo = load()?;
    let before = ldo.to_nquads();
    let builder = ldo.using(&context())?;
    let bob = builder.from_subject("ex:bob")?;
    bob.set("@id", "ex:robert")?;
    assert_eq!(bob.get("@id"), Some(Value::from("http://example.org/robert")));
    assert!(ldo::to_nquads(&bob).starts_with("<http://example.org/robert> "));
    assert!(ldo
        .events()
        .has(&Quad::new(ex("alice"), ex("knows"), ex("robert"), Term::DefaultGraph)?));
    bob.set("@id", "ex:bob")?;
    assert_eq!(ldo.to_nquads(), before);
    Ok(())
}

#[test]
fn mutual_roommates() -> TestResult {
    test_setup();
    let ldo = LdoDataset::new();
    let builder = ldo.using(&context())?;
    let a = ObjectLiteral::new().with("@id", "ex:a").with("name", "A");
    let b = ObjectLiteral::new().with("@id", "ex:b").with("name", "B");
    a.set("roommate", b.clone());
    b.set("roommate", a.clone());
    let view = builder.from_json(a)?;
    assert_eq!(ldo.size(), 4);
    let roommate = view.get("roommate").and_then(|v| v.as_subject().cloned());
    let back = roommate.and_then(|b| b.get("roommate")).and_then(|v| v.as_subject().cloned());
    assert!(back.is_some_and(|a| a.ptr_eq(&view)));
    Ok(())
}

#[test]
fn serializing_a_view() -> TestResult {
    let ldo = load()?;
    let obs = ldo.using(&context())?.from_subject("ex:Obs1")?;
    assert_eq!(
        ldo::to_nquads(&obs),
        "<http://example.org/Obs1> <http://example.org/notes> \"Cool Notes\" .\n\
         <http://example.org/Obs1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Observation> .\n"
    );
    Ok(())
}
