//! Mixtures of catalog items with percentage compositions.

use eln_vocab::iris;

use crate::context::ModelContext;
use crate::error::{ConvertError, Result};
use crate::graph::{Iri, Literal, Node, Term};
use crate::input::CatalogItem;

use super::agents::Researcher;

/// Percentages paired positionally with the items of one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    /// Identifier key, e.g. `50-1_50-2`.
    pub name: String,
    /// Human label, e.g. `50% PBS + 50% Ethanol`.
    pub label: String,
    /// Catalog ids of the ingredients, in fragment order.
    pub item_ids: Vec<String>,
}

impl Composition {
    /// Pairs the `i`-th percentage token with the `i`-th item.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::CompositionMismatch`] if the counts differ.
    pub fn new(fragment: &str, items: &[&CatalogItem], percentages: &[&str]) -> Result<Self> {
        if items.len() != percentages.len() {
            return Err(ConvertError::CompositionMismatch {
                fragment: fragment.trim().to_owned(),
                items: items.len(),
                percentages: percentages.len(),
            });
        }
        let name = items
            .iter()
            .zip(percentages)
            .map(|(item, pct)| format!("{}-{}", pct.trim_end_matches('%').trim(), item.id))
            .collect::<Vec<_>>()
            .join("_");
        let label = items
            .iter()
            .zip(percentages)
            .map(|(item, pct)| format!("{pct} {}", item.title))
            .collect::<Vec<_>>()
            .join(" + ");
        Ok(Self {
            name,
            label,
            item_ids: items.iter().map(|item| item.id.clone()).collect(),
        })
    }
}

/// Returns the mixture node for `composition`, creating one if no existing
/// instance fits.
///
/// An existing instance fits if it is attributed to `researcher`, or if both
/// it and the current fragment carry no attribution. A new instance takes the
/// lowest free number and reuses a plan with the same label when one exists.
pub fn resolve_mixture(
    ctx: &mut ModelContext<'_>,
    composition: &Composition,
    researcher: Option<&Researcher>,
) -> Iri {
    let mixture_type = Term::from(Iri::new(iris::OBI_MIXTURE));
    let existing = ctx
        .graph
        .triples(None, Some(iris::RDF_TYPE), Some(&mixture_type))
        .count();

    let mut free = None;
    for n in 1..=existing + 1 {
        let candidate = ctx.ids.mixture(&composition.name, n);
        let node = Node::from(&candidate);
        if !ctx.graph.holds(&node, iris::RDF_TYPE, Iri::new(iris::OBI_MIXTURE)) {
            free.get_or_insert(n);
            continue;
        }
        let fits = match researcher {
            Some(r) => ctx.graph.holds(&node, iris::PROV_WAS_ATTRIBUTED_TO, &r.id),
            None => ctx
                .graph
                .objects(&node, iris::PROV_WAS_ATTRIBUTED_TO)
                .next()
                .is_none(),
        };
        if fits {
            return candidate;
        }
    }

    let n = free.unwrap_or(existing + 1);
    let mixture = ctx.ids.mixture(&composition.name, n);
    let plan = resolve_plan(ctx, composition);
    let creating = ctx.ids.mixture_creating(&composition.name, n);

    ctx.graph
        .insert(&creating, iris::RDF_TYPE, Iri::new(iris::OBI_CREATING_A_MIXTURE));
    ctx.graph
        .insert(&creating, iris::OBI_ACHIEVES_PLANNED_OBJECTIVE, &plan);
    ctx.graph
        .insert(&creating, iris::OBI_HAS_SPECIFIED_OUTPUT, &mixture);
    for id in &composition.item_ids {
        let input = ctx.ids.database_item(id);
        ctx.graph
            .insert(&creating, iris::OBI_HAS_SPECIFIED_INPUT, input);
    }

    ctx.graph.insert(&mixture, iris::RDF_TYPE, Iri::new(iris::OBI_MIXTURE));
    ctx.graph.insert(
        &mixture,
        iris::FOAF_NAME,
        Literal::plain(composition.label.as_str()),
    );
    if let Some(r) = researcher {
        ctx.graph.insert(&mixture, iris::PROV_WAS_ATTRIBUTED_TO, &r.id);
    }
    tracing::debug!(mixture = %mixture, "created mixture");
    mixture
}

fn resolve_plan(ctx: &mut ModelContext<'_>, composition: &Composition) -> Iri {
    let label = Literal::lang(composition.label.as_str(), "en");
    let mut m = 1;
    loop {
        let plan = ctx.ids.mixture_plan(&composition.name, m);
        if !ctx
            .graph
            .holds(&plan, iris::RDF_TYPE, Iri::new(iris::OBI_MATERIAL_COMBINATION_OBJECTIVE))
        {
            ctx.graph.insert(
                &plan,
                iris::RDF_TYPE,
                Iri::new(iris::OBI_MATERIAL_COMBINATION_OBJECTIVE),
            );
            ctx.graph.insert(&plan, iris::RDFS_LABEL, label);
            return plan;
        }
        if ctx.graph.holds(&plan, iris::RDFS_LABEL, label.clone()) {
            return plan;
        }
        m += 1;
    }
}
