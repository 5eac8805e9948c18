//! N-Triples serializer for the provenance graph.
//!
//! Produces one triple per line with absolute IRIs. Package-relative
//! identifiers (`./`, `Data/run.csv`) are resolved against a base IRI.

use url::Url;

use crate::graph::{Graph, LiteralTag, Node, Term};

use super::escape;

/// Serializes `graph` to an N-Triples string, resolving relative IRIs against `base`.
///
/// An IRI that is neither absolute nor resolvable is written as it is.
#[must_use]
pub fn to_ntriples(graph: &Graph, base: &str) -> String {
    let base = Url::parse(base).ok();
    let mut out = String::with_capacity(graph.len() * 128);
    for t in graph {
        let subject = node(&t.subject, base.as_ref());
        let object = match &t.object {
            Term::Node(n) => node(n, base.as_ref()),
            Term::Literal(lit) => {
                let value = escape(lit.value());
                match lit.tag() {
                    LiteralTag::Plain => format!("\"{value}\""),
                    LiteralTag::Language(lang) => format!("\"{value}\"@{lang}"),
                    LiteralTag::Datatype(dt) => format!("\"{value}\"^^<{dt}>"),
                }
            }
        };
        triple(&mut out, &subject, t.predicate.as_str(), &object);
    }
    out
}

fn triple(out: &mut String, subj: &str, pred: &str, obj: &str) {
    out.push_str(subj);
    out.push_str(" <");
    out.push_str(pred);
    out.push_str("> ");
    out.push_str(obj);
    out.push_str(" .\n");
}

fn node(node: &Node, base: Option<&Url>) -> String {
    match node {
        Node::Iri(iri) => format!("<{}>", absolute(iri.as_str(), base)),
        Node::Blank(label) => format!("_:{label}"),
    }
}

fn absolute(iri: &str, base: Option<&Url>) -> String {
    if Url::parse(iri).is_ok() {
        return iri.to_owned();
    }
    base.and_then(|b| b.join(iri).ok())
        .map_or_else(|| iri.to_owned(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Iri, Literal};
    use eln_vocab::iris;

    const BASE: &str = "https://example.org/eln/42/";

    fn graph() -> Graph {
        let mut g = Graph::new();
        let root = Iri::new("./");
        g.insert(&root, iris::RDF_TYPE, Iri::new(iris::SCHEMA_DATASET));
        g.insert(&root, iris::SCHEMA_HAS_PART, Iri::new("Data/run%201.csv"));
        g.insert(
            Iri::new("https://example.org/eln/42/preparation/1"),
            iris::SCHEMA_DESCRIPTION,
            Literal::lang("Add \"PBS\"\\nthen wait", "en"),
        );
        g
    }

    #[test]
    fn produces_non_empty_ntriples() {
        let nt = to_ntriples(&graph(), BASE);
        assert_eq!(nt.lines().count(), 3);
    }

    #[test]
    fn every_line_ends_with_period() {
        let nt = to_ntriples(&graph(), BASE);
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
    }

    #[test]
    fn relative_iris_are_resolved() {
        let nt = to_ntriples(&graph(), BASE);
        assert!(nt.contains("<https://example.org/eln/42/> <http://schema.org/hasPart> <https://example.org/eln/42/Data/run%201.csv> ."));
    }

    #[test]
    fn literals_are_escaped() {
        let nt = to_ntriples(&graph(), BASE);
        assert!(nt.contains(r#""Add \"PBS\"\\nthen wait"@en"#));
    }
}
