//! JSON-LD 1.1 serializer for the provenance graph.
//!
//! Produces one document with the RO-Crate 1.1 context plus a prefix map, and
//! a flat `@graph` array holding one node object per subject. schema.org and
//! Dublin Core terms use the bare names the RO-Crate context defines.

use eln_vocab::iris;
use serde_json::{json, Map, Value};

use crate::graph::{Graph, Node, Term};

use super::{compact, PREFIXES};

const DCTERMS: &str = "http://purl.org/dc/terms/";

/// Serializes `graph` to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(graph: &Graph) -> Value {
    json!({
        "@context": build_context(),
        "@graph": build_graph(graph)
    })
}

fn build_context() -> Value {
    let mut prefixes = Map::new();
    for (prefix, ns) in PREFIXES {
        prefixes.insert((*prefix).to_owned(), json!(ns));
    }
    json!([iris::RO_CRATE_CONTEXT, Value::Object(prefixes)])
}

fn build_graph(graph: &Graph) -> Value {
    let nodes = graph
        .subjects()
        .into_iter()
        .map(|subject| node_to_json(graph, subject))
        .collect();
    Value::Array(nodes)
}

fn node_to_json(graph: &Graph, subject: &Node) -> Value {
    let mut map = Map::new();
    map.insert("@id".to_owned(), json!(node_id(subject)));
    let mut types: Vec<Value> = Vec::new();

    for triple in graph.about(subject) {
        if triple.predicate.as_str() == iris::RDF_TYPE {
            if let Some(class) = triple.object.as_node().and_then(Node::as_iri) {
                types.push(json!(shorten_iri(class.as_str())));
                continue;
            }
        }
        let key = shorten_iri(triple.predicate.as_str());
        let value = term_to_json(&triple.object);
        // Repeated keys are promoted to an array rather than overwritten.
        if let Some(existing) = map.get_mut(&key) {
            let prev = std::mem::replace(existing, Value::Null);
            *existing = match prev {
                Value::Array(mut arr) => {
                    arr.push(value);
                    Value::Array(arr)
                }
                other => json!([other, value]),
            };
        } else {
            map.insert(key, value);
        }
    }

    match types.len() {
        0 => {}
        1 => {
            map.insert("@type".to_owned(), types.remove(0));
        }
        _ => {
            map.insert("@type".to_owned(), Value::Array(types));
        }
    }
    Value::Object(map)
}

fn term_to_json(term: &Term) -> Value {
    match term {
        Term::Node(node) => json!({ "@id": node_id(node) }),
        Term::Literal(lit) => {
            if let Some(lang) = lit.language() {
                json!({ "@value": lit.value(), "@language": lang })
            } else if let Some(dt) = lit.datatype() {
                json!({ "@value": lit.value(), "@type": shorten_iri(dt.as_str()) })
            } else {
                json!(lit.value())
            }
        }
    }
}

fn node_id(node: &Node) -> String {
    match node {
        Node::Iri(iri) => iri.as_str().to_owned(),
        Node::Blank(label) => format!("_:{label}"),
    }
}

/// Shortens a full IRI to its RO-Crate term or prefixed form.
///
/// `schema:MediaObject` is written as the RO-Crate alias `File`.
fn shorten_iri(iri: &str) -> String {
    if iri == iris::SCHEMA_FILE {
        return "File".to_owned();
    }
    if let Some(local) = iri
        .strip_prefix(iris::SCHEMA)
        .or_else(|| iri.strip_prefix(DCTERMS))
    {
        return local.to_owned();
    }
    match compact(iri) {
        Some((prefix, local)) => format!("{prefix}:{local}"),
        None => iri.to_owned(),
    }
}
