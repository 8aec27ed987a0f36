use super::ns::{rdf, xsd};
use super::*;
use test_case::test_case;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn iri_accepts_relative_references() -> TestResult {
    assert!(Term::iri("http://example.org/a")?.is_iri());
    assert!(Term::iri("name")?.is_iri());
    assert!(Term::iri("a b").is_err());
    Ok(())
}

#[test]
fn fresh_blank_nodes_differ() {
    let b1 = Term::new_blank_node();
    let b2 = Term::new_blank_node();
    assert!(b1.is_blank_node());
    assert_ne!(b1, b2);
}

#[test]
fn lang_literal_is_lower_cased() -> TestResult {
    let t = Term::lang_literal("color", "en-US")?;
    assert_eq!(t.language(), Some("en-us"));
    assert_eq!(t.datatype(), Some(rdf::langString));
    Ok(())
}

#[test]
fn typed_literal_refuses_lang_string() {
    assert_eq!(
        Term::typed_literal("x", rdf::langString),
        Err(TermError::MissingLanguageTag)
    );
}

#[test]
fn literal_equality_is_structural() -> TestResult {
    assert_eq!(Term::literal("1"), Term::typed_literal("1", xsd::string)?);
    assert_ne!(Term::literal("1"), Term::typed_literal("1", xsd::integer)?);
    assert_ne!(Term::literal("1"), Term::lang_literal("1", "en")?);
    Ok(())
}

#[test_case(Term::literal("s"), Term::new_iri_unchecked("http://ex.org/p"), Position::Subject; "literal subject")]
#[test_case(Term::new_iri_unchecked("http://ex.org/s"), Term::literal("p"), Position::Predicate; "literal predicate")]
#[test_case(Term::new_iri_unchecked("http://ex.org/s"), Term::new_blank_node(), Position::Predicate; "bnode predicate")]
#[test_case(Term::DefaultGraph, Term::new_iri_unchecked("http://ex.org/p"), Position::Subject; "default graph subject")]
fn quad_rejects_misplaced_terms(s: Term, p: Term, position: Position) {
    let err = Quad::triple(s, p, Term::literal("o")).unwrap_err();
    assert!(matches!(err, TermError::UnexpectedKind { position: pos, .. } if pos == position));
}

#[test]
fn quad_rejects_literal_graph() {
    let q = Quad::new(
        Term::new_iri_unchecked("http://ex.org/s"),
        Term::new_iri_unchecked("http://ex.org/p"),
        Term::literal("o"),
        Term::literal("g"),
    );
    assert!(q.is_err());
}

#[test_case(Term::new_iri_unchecked("http://ex.org/a") => "<http://ex.org/a>")]
#[test_case(Term::blank_node("b1").unwrap() => "_:b1")]
#[test_case(Term::literal("hello") => "\"hello\"")]
#[test_case(Term::literal("a\n\"b\"\\") => r#""a\n\"b\"\\""#)]
#[test_case(Term::lang_literal("chat", "fr").unwrap() => "\"chat\"@fr")]
#[test_case(Term::typed_literal("42", xsd::integer).unwrap() => "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>")]
fn display_term(t: Term) -> String {
    t.to_string()
}

#[test]
fn display_quad_in_named_graph() -> TestResult {
    let q = Quad::new(
        Term::blank_node("x")?,
        Term::new_iri_unchecked(rdf::type_),
        Term::new_iri_unchecked("http://ex.org/C"),
        Term::new_iri_unchecked("http://ex.org/g"),
    )?;
    assert_eq!(
        q.to_string(),
        "_:x <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org/C> <http://ex.org/g> ."
    );
    Ok(())
}

#[test]
fn replace_node_rewrites_both_ends() -> TestResult {
    let a = Term::new_iri_unchecked("http://ex.org/a");
    let b = Term::new_iri_unchecked("http://ex.org/b");
    let p = Term::new_iri_unchecked("http://ex.org/p");
    let q = Quad::triple(a.clone(), p.clone(), a.clone())?;
    let r = q.replace_node(&a, &b)?;
    assert_eq!(r, Quad::triple(b.clone(), p, b)?);
    Ok(())
}
