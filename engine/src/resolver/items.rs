//! Catalog items and their lot/passage instances.

use eln_vocab::iris;
use url::Url;

use crate::context::ModelContext;
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::graph::{Iri, Literal, Node, Triple};
use crate::input::{xsd_datetime, CatalogItem};

use super::agents::resolve_manufacturer;

const SUPPLIER_ROWS: [&str; 3] = ["manufacturer", "supplier", "developer"];

/// Models every catalog item of the context, in id order.
///
/// # Errors
///
/// Fails if a supplier row names no known manufacturer.
pub fn model_catalog(ctx: &mut ModelContext<'_>) -> Result<()> {
    let catalog = ctx.catalog;
    for item in catalog.iter() {
        model_item(ctx, item)?;
    }
    tracing::debug!(items = catalog.len(), "modeled catalog");
    Ok(())
}

/// Models one catalog item as its generic node.
///
/// # Errors
///
/// Fails if a supplier row names no known manufacturer.
pub fn model_item(ctx: &mut ModelContext<'_>, item: &CatalogItem) -> Result<Iri> {
    let id = ctx.ids.database_item(&item.id);
    ctx.graph
        .insert(&id, iris::FOAF_NAME, Literal::lang(item.title.as_str(), "en"));
    ctx.graph
        .insert(&id, iris::RDF_TYPE, Iri::new(iris::SCHEMA_INDIVIDUAL_PRODUCT));
    ctx.graph.insert(
        &id,
        iris::SCHEMA_DATE_MODIFIED,
        Literal::typed(xsd_datetime(&item.last_change), iris::XSD_DATETIME),
    );
    ctx.graph
        .insert(&id, iris::ELN_HAS_FILE, ctx.ids.file(&item.export_path()));

    let Some(table) = item.document.first_table() else {
        ctx.diagnostics.report(
            DiagnosticKind::MissingTable,
            id.as_str(),
            format!("item \"{}\" has no metadata table", item.title),
        );
        return Ok(id);
    };

    let mut classified = false;
    for row in &table.rows {
        let (Some(label), Some(value)) = (row.cell(0), row.cell(1)) else {
            continue;
        };
        let label = label.text().trim().to_lowercase();
        let value = value.text().trim().to_owned();
        match label.as_str() {
            "ontology-item" => {
                link_external(ctx, &id, item, &value);
                classified = true;
            }
            "wikidata-item" => link_external(ctx, &id, item, &value),
            l if SUPPLIER_ROWS.contains(&l) => {
                let manufacturer = resolve_manufacturer(ctx, &value)?;
                ctx.graph.insert(&id, iris::OBI_HAS_SUPPLIER, &manufacturer);
            }
            l if l
                .strip_suffix("-id")
                .is_some_and(|prefix| SUPPLIER_ROWS.contains(&prefix)) =>
            {
                ctx.graph
                    .insert(&id, iris::ELN_HAS_SUPPLIER_ID, Literal::plain(value));
            }
            _ => ctx.diagnostics.report(
                DiagnosticKind::UnhandledItemRow,
                id.as_str(),
                format!("row \"{label}\" of item \"{}\" is not handled", item.title),
            ),
        }
    }
    if !classified {
        ctx.diagnostics.report(
            DiagnosticKind::NoOntologyRow,
            id.as_str(),
            format!("item \"{}\" has no ontology-item row", item.title),
        );
    }
    Ok(id)
}

/// Adds `owl:sameAs value` if `value` is an absolute IRI that N-Triples can carry.
fn link_external(ctx: &mut ModelContext<'_>, id: &Iri, item: &CatalogItem, value: &str) {
    let writable = !value.chars().any(|c| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    });
    if writable && Url::parse(value).is_ok() {
        ctx.graph.insert(id, iris::OWL_SAME_AS, Iri::new(value));
    } else {
        ctx.diagnostics.report(
            DiagnosticKind::InvalidIri,
            id.as_str(),
            format!("item \"{}\" names \"{value}\", which is not an IRI", item.title),
        );
    }
}

/// Returns the lot (and passage) specific instance of `item`, creating it on first use.
///
/// A new instance copies every triple the generic node has at that moment and
/// is never updated from it afterwards. `lot` and `passage` are the matched
/// phrases (`LOT A1`, `Passage 5`); they are stored verbatim.
pub fn resolve_instance(
    ctx: &mut ModelContext<'_>,
    item: &CatalogItem,
    lot: &str,
    passage: Option<&str>,
) -> Iri {
    let generic = ctx.ids.database_item(&item.id);
    let lot_number = lot.trim_start_matches("LOT ").trim();
    let passage_number = passage.map(|p| p.trim_start_matches("Passage ").trim());
    let instance = ctx.ids.item_instance(&item.id, lot_number, passage_number);
    let node = Node::from(&instance);
    if ctx.graph.has_subject(&node) {
        return instance;
    }

    let generic_node = Node::from(&generic);
    let copies: Vec<Triple> = ctx
        .graph
        .about(&generic_node)
        .map(|t| Triple {
            subject: node.clone(),
            predicate: t.predicate.clone(),
            object: t.object.clone(),
        })
        .collect();
    for triple in copies {
        ctx.graph.add(triple);
    }
    ctx.graph
        .insert(&node, iris::ELN_HAS_LOT_NUMBER, Literal::lang(lot, "en"));
    ctx.graph.insert(&node, iris::ELN_IS_INSTANCE_OF, &generic);
    if let Some(passage) = passage {
        ctx.graph
            .insert(&node, iris::ELN_HAS_PASSAGE_NUMBER, Literal::lang(passage, "en"));
    }
    tracing::debug!(instance = %instance, "created item instance");
    instance
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::fixtures;
    use crate::input::{Catalog, ItemRecord};

    fn item(id: &str, body: &str) -> CatalogItem {
        CatalogItem::from_record(ItemRecord {
            id: id.to_owned(),
            title: format!("Item {id}"),
            category: "Chemical".to_owned(),
            lastchange: "2021-01-21 16:00:20".to_owned(),
            body: body.to_owned(),
        })
        .unwrap()
    }

    const BODY: &str = "<table>\
        <tr><td>ontology-item</td><td>http://purl.obolibrary.org/obo/CHEBI_15377</td></tr>\
        <tr><td>wikidata-item</td><td>https://www.wikidata.org/entity/Q283</td></tr>\
        <tr><td>Manufacturer</td><td>Sigma Aldrich</td></tr>\
        <tr><td>manufacturer-id</td><td>W4502</td></tr>\
        <tr><td>storage</td><td>4 °C</td></tr>\
        </table>";

    #[test]
    fn item_metadata_rows() {
        let dirs = fixtures::directories();
        let catalog = Catalog::new([item("7", BODY)]);
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        model_catalog(&mut ctx).unwrap();
        let id = ctx.ids.database_item("7");
        let node = Node::from(&id);
        assert_eq!(ctx.graph.objects(&node, iris::OWL_SAME_AS).count(), 2);
        assert_eq!(ctx.graph.objects(&node, iris::OBI_HAS_SUPPLIER).count(), 1);
        assert!(ctx.graph.holds(&id, iris::ELN_HAS_SUPPLIER_ID, Literal::plain("W4502")));
        assert!(ctx.graph.holds(
            &id,
            iris::ELN_HAS_FILE,
            Iri::new("Protocol/Database/Chemical%20-%20Item%207.html")
        ));
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::UnhandledItemRow), 1);
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::NoOntologyRow), 0);
    }

    #[test]
    fn missing_table_is_recoverable() {
        let dirs = fixtures::directories();
        let catalog = Catalog::new([item("7", "<p>no table</p>")]);
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        model_catalog(&mut ctx).unwrap();
        assert!(ctx.graph.has_subject(&Node::from(ctx.ids.database_item("7"))));
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::MissingTable), 1);
    }

    #[test]
    fn missing_ontology_row_keeps_the_item() {
        let dirs = fixtures::directories();
        let body = "<table><tr><td>manufacturer-id</td><td>W4502</td></tr></table>";
        let catalog = Catalog::new([item("7", body)]);
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        model_catalog(&mut ctx).unwrap();
        let id = ctx.ids.database_item("7");
        assert!(ctx.graph.holds(
            &id,
            iris::RDF_TYPE,
            Iri::new(iris::SCHEMA_INDIVIDUAL_PRODUCT)
        ));
        assert!(ctx.graph.holds(&id, iris::ELN_HAS_SUPPLIER_ID, Literal::plain("W4502")));
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::NoOntologyRow), 1);
        let entry = ctx
            .diagnostics
            .entries
            .iter()
            .find(|d| d.kind == DiagnosticKind::NoOntologyRow)
            .unwrap();
        assert_eq!(entry.subject, id.as_str());
    }

    #[test]
    fn malformed_external_iri_is_reported() {
        let dirs = fixtures::directories();
        let body = "<table>\
            <tr><td>ontology-item</td><td>CHEBI 15377</td></tr>\
            <tr><td>wikidata-item</td><td>https://www.wikidata.org/entity/{Q283}</td></tr>\
            </table>";
        let catalog = Catalog::new([item("7", body)]);
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        model_catalog(&mut ctx).unwrap();
        let node = Node::from(ctx.ids.database_item("7"));
        assert_eq!(ctx.graph.objects(&node, iris::OWL_SAME_AS).count(), 0);
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::InvalidIri), 2);
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::NoOntologyRow), 0);
    }

    #[test]
    fn instance_is_a_snapshot() {
        let dirs = fixtures::directories();
        let pbs = item("7", BODY);
        let catalog = Catalog::new([pbs.clone()]);
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        model_catalog(&mut ctx).unwrap();
        let generic = ctx.ids.database_item("7");
        let generic_count = ctx.graph.about(&Node::from(&generic)).count();

        let instance = resolve_instance(&mut ctx, &pbs, "LOT A1", Some("Passage 5"));
        assert_eq!(
            instance.as_str(),
            "https://example.org/eln/database/7/lot/A1/passage/5"
        );
        let node = Node::from(&instance);
        // copied triples + lot + instance-of + passage
        assert_eq!(ctx.graph.about(&node).count(), generic_count + 3);
        assert!(ctx.graph.holds(&instance, iris::ELN_IS_INSTANCE_OF, &generic));

        ctx.graph.insert(&generic, iris::RDFS_LABEL, Literal::plain("late"));
        let again = resolve_instance(&mut ctx, &pbs, "LOT A1", Some("Passage 5"));
        assert_eq!(again, instance);
        assert!(!ctx.graph.holds(&instance, iris::RDFS_LABEL, Literal::plain("late")));
    }
}
