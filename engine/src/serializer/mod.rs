//! Serializers for the provenance graph.
//!
//! Three serialization formats are supported:
//! - **JSON-LD** ([`jsonld`]): the package metadata file `ro-crate-metadata.json`
//! - **Turtle** ([`turtle`]): for RDF tooling
//! - **N-Triples** ([`ntriples`]): for diffing and bulk loading
//!
//! All three are pure functions of the graph. The graph iterates in a total
//! order, so equal graphs render to equal bytes.

pub mod jsonld;
pub mod ntriples;
pub mod turtle;

use eln_vocab::iris;

/// Namespace prefixes shared by the JSON-LD context and the Turtle header.
pub const PREFIXES: &[(&str, &str)] = &[
    ("foaf", iris::FOAF),
    ("xsd", iris::XSD),
    ("rdf", iris::RDF),
    ("rdfs", iris::RDFS),
    ("owl", iris::OWL),
    ("wd", iris::WD),
    ("prov", iris::PROV),
    ("obo", iris::OBO),
    ("eln", iris::ELN),
    ("schema", iris::SCHEMA),
];

/// Splits `iri` into a known prefix and its local part.
fn compact(iri: &str) -> Option<(&'static str, &str)> {
    PREFIXES
        .iter()
        .find_map(|(prefix, ns)| iri.strip_prefix(ns).map(|local| (*prefix, local)))
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
