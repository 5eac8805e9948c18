//! Turtle 1.1 serializer for the provenance graph.
//!
//! Statements are grouped by subject. Package-relative identifiers stay
//! relative and resolve against the `@base` declaration.

use eln_vocab::iris;

use crate::graph::{Graph, LiteralTag, Node, Term};

use super::{compact, escape, PREFIXES};

/// Serializes `graph` to a Turtle string with `base` as the document base.
#[must_use]
pub fn to_turtle(graph: &Graph, base: &str) -> String {
    let mut out = String::with_capacity(graph.len() * 96);

    out.push_str(&format!("@base <{base}> .\n"));
    for (prefix, ns) in PREFIXES {
        out.push_str(&format!("@prefix {prefix}: <{ns}> .\n"));
    }

    for subject in graph.subjects() {
        out.push('\n');
        out.push_str(&node(subject));
        let (types, rest): (Vec<_>, Vec<_>) = graph
            .about(subject)
            .partition(|t| t.predicate.as_str() == iris::RDF_TYPE);
        let statements: Vec<String> = types
            .into_iter()
            .chain(rest)
            .map(|t| {
                let predicate = if t.predicate.as_str() == iris::RDF_TYPE {
                    "a".to_owned()
                } else {
                    iri(t.predicate.as_str())
                };
                format!("{predicate} {}", term(&t.object))
            })
            .collect();
        out.push_str("\n  ");
        out.push_str(&statements.join(" ;\n  "));
        out.push_str(" .\n");
    }
    out
}

fn node(node: &Node) -> String {
    match node {
        Node::Iri(i) => iri(i.as_str()),
        Node::Blank(label) => format!("_:{label}"),
    }
}

fn term(term: &Term) -> String {
    match term {
        Term::Node(n) => node(n),
        Term::Literal(lit) => {
            let value = turtle_string(lit.value());
            match lit.tag() {
                LiteralTag::Plain => value,
                LiteralTag::Language(lang) => format!("{value}@{lang}"),
                LiteralTag::Datatype(dt) => format!("{value}^^{}", iri(dt.as_str())),
            }
        }
    }
}

/// Prefixed name when the local part is safe to write bare, `<iri>` otherwise.
fn iri(iri: &str) -> String {
    match compact(iri) {
        Some((prefix, local))
            if local.starts_with(|c: char| c.is_ascii_alphabetic())
                && local
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
        {
            format!("{prefix}:{local}")
        }
        _ => format!("<{iri}>"),
    }
}

fn turtle_string(s: &str) -> String {
    format!("\"{}\"", escape(s))
}
