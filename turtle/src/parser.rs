//! Parsers for [N-Quads], [N-Triples] and [Turtle].
//!
//! Every function exists in two flavours:
//! one parsing a `&str`, and one (suffixed with `_from`) parsing any [`BufRead`].
//!
//! [N-Quads]: https://www.w3.org/TR/n-quads/
//! [N-Triples]: https://www.w3.org/TR/n-triples/
//! [Turtle]: https://www.w3.org/TR/turtle/
use crate::ParseError;
use ldo_dataset::{ExtendedDataset, MutableDataset};
use ldo_term::{ns::xsd, Quad, Term};
use rio_api::model;
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{NQuadsParser, NTriplesParser, TurtleParser};
use std::io::BufRead;

/// Parse an N-Quads document.
pub fn parse_nquads(txt: &str) -> Result<ExtendedDataset, ParseError> {
    parse_nquads_from(txt.as_bytes())
}

/// Parse an N-Quads document from a reader.
pub fn parse_nquads_from<R: BufRead>(read: R) -> Result<ExtendedDataset, ParseError> {
    let mut dataset = ExtendedDataset::new();
    NQuadsParser::new(read).parse_all(&mut |q| -> Result<(), ParseError> {
        dataset.add(convert_quad(&q)?);
        Ok(())
    })?;
    Ok(dataset)
}

/// Parse an N-Triples document, into the default graph.
pub fn parse_ntriples(txt: &str) -> Result<ExtendedDataset, ParseError> {
    parse_ntriples_from(txt.as_bytes())
}

/// Parse an N-Triples document from a reader, into the default graph.
pub fn parse_ntriples_from<R: BufRead>(read: R) -> Result<ExtendedDataset, ParseError> {
    let mut dataset = ExtendedDataset::new();
    NTriplesParser::new(read).parse_all(&mut |t| -> Result<(), ParseError> {
        dataset.add(convert_triple(&t)?);
        Ok(())
    })?;
    Ok(dataset)
}

/// Parse a Turtle document, into the default graph.
///
/// Relative IRIs are resolved against `base`, if provided.
pub fn parse_turtle(txt: &str, base: Option<&str>) -> Result<ExtendedDataset, ParseError> {
    parse_turtle_from(txt.as_bytes(), base)
}

/// Parse a Turtle document from a reader, into the default graph.
///
/// Relative IRIs are resolved against `base`, if provided.
pub fn parse_turtle_from<R: BufRead>(
    read: R,
    base: Option<&str>,
) -> Result<ExtendedDataset, ParseError> {
    let base = base
        .map(|iri| {
            oxiri::Iri::parse(iri.to_string()).map_err(|err| ParseError::InvalidBase {
                iri: iri.to_string(),
                reason: err.to_string(),
            })
        })
        .transpose()?;
    let mut dataset = ExtendedDataset::new();
    TurtleParser::new(read, base).parse_all(&mut |t| -> Result<(), ParseError> {
        dataset.add(convert_triple(&t)?);
        Ok(())
    })?;
    Ok(dataset)
}

fn convert_quad(q: &model::Quad) -> Result<Quad, ParseError> {
    let graph = match &q.graph_name {
        None => Term::DefaultGraph,
        Some(model::GraphName::NamedNode(n)) => Term::new_iri_unchecked(n.iri),
        Some(model::GraphName::BlankNode(b)) => Term::BlankNode(b.id.into()),
    };
    Ok(Quad::new(
        convert_subject(&q.subject)?,
        Term::new_iri_unchecked(q.predicate.iri),
        convert_object(&q.object)?,
        graph,
    )?)
}

fn convert_triple(t: &model::Triple) -> Result<Quad, ParseError> {
    Ok(Quad::triple(
        convert_subject(&t.subject)?,
        Term::new_iri_unchecked(t.predicate.iri),
        convert_object(&t.object)?,
    )?)
}

fn convert_subject(s: &model::Subject) -> Result<Term, ParseError> {
    match s {
        model::Subject::NamedNode(n) => Ok(Term::new_iri_unchecked(n.iri)),
        model::Subject::BlankNode(b) => Ok(Term::BlankNode(b.id.into())),
        _ => Err(ParseError::QuotedTriple),
    }
}

fn convert_object(o: &model::Term) -> Result<Term, ParseError> {
    match o {
        model::Term::NamedNode(n) => Ok(Term::new_iri_unchecked(n.iri)),
        model::Term::BlankNode(b) => Ok(Term::BlankNode(b.id.into())),
        model::Term::Literal(lit) => convert_literal(lit),
        _ => Err(ParseError::QuotedTriple),
    }
}

fn convert_literal(lit: &model::Literal) -> Result<Term, ParseError> {
    Ok(match *lit {
        model::Literal::Simple { value } => Term::literal(value),
        model::Literal::LanguageTaggedString { value, language } => {
            Term::lang_literal(value, language)?
        }
        model::Literal::Typed { value, datatype } if datatype.iri == xsd::string => {
            Term::literal(value)
        }
        model::Literal::Typed { value, datatype } => Term::typed_literal(value, datatype.iri)?,
    })
}
