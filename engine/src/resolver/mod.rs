//! Entity resolution: from hyperlinks and free text to graph nodes.
//!
//! A usage fragment (a whole cell, or one list item inside it) is resolved to
//! the catalog items it links. A single item with a `LOT` phrase becomes a lot
//! instance; several items joined by `+` become a mixture. An
//! `(Attributed to ...)` phrase resolves a researcher whatever else matched.

pub mod agents;
pub mod items;
pub mod mixture;

use regex::Regex;

use crate::context::ModelContext;
use crate::document::{Content, Fragment, List};
use crate::error::Result;
use crate::graph::Iri;
use crate::input::CatalogItem;

pub use agents::{resolve_manufacturer, resolve_researcher, Researcher};
pub use items::{model_catalog, model_item, resolve_instance};
pub use mixture::{resolve_mixture, Composition};

/// Compiled patterns for usage resolution.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    lot: Regex,
    passage: Regex,
    attribution: Regex,
    percentage: Regex,
}

impl EntityResolver {
    /// Compiles the usage patterns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConvertError::Pattern`] if a pattern does not compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            lot: Regex::new(r"LOT \w+")?,
            passage: Regex::new(r"Passage \d+")?,
            attribution: Regex::new(r"\(Attributed to [^)]+\)")?,
            percentage: Regex::new(r"[.\d]+\s*%")?,
        })
    }

    /// Resolves every fragment of `content`, in document order.
    ///
    /// # Errors
    ///
    /// See [`EntityResolver::resolve_fragment`].
    pub fn resolve_content(&self, ctx: &mut ModelContext<'_>, content: &Content) -> Result<Vec<Iri>> {
        let mut out = Vec::new();
        for fragment in content.fragments() {
            out.extend(self.resolve_fragment(ctx, fragment)?);
        }
        Ok(out)
    }

    /// Resolves every item of `list`, nested items included.
    ///
    /// # Errors
    ///
    /// See [`EntityResolver::resolve_fragment`].
    pub fn resolve_list(&self, ctx: &mut ModelContext<'_>, list: &List) -> Result<Vec<Iri>> {
        let mut out = Vec::new();
        for item in list.all_items() {
            out.extend(self.resolve_fragment(ctx, Fragment::Content(item))?);
        }
        Ok(out)
    }

    /// Resolves one fragment to the nodes it uses.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConvertError::UnresolvedLookup`] for an unknown
    /// attributed researcher and [`crate::ConvertError::CompositionMismatch`]
    /// for a mixture whose percentages do not pair up with its items.
    pub fn resolve_fragment(
        &self,
        ctx: &mut ModelContext<'_>,
        fragment: Fragment<'_>,
    ) -> Result<Vec<Iri>> {
        let catalog = ctx.catalog;
        let text = fragment.text();
        let items: Vec<&CatalogItem> = fragment
            .links()
            .into_iter()
            .filter_map(|link| catalog.resolve_link(&link.href))
            .collect();

        let researcher = match self.attribution.find(&text) {
            Some(m) => {
                let name = m
                    .as_str()
                    .trim_start_matches("(Attributed to")
                    .trim_end_matches(')')
                    .trim()
                    .to_lowercase();
                Some(resolve_researcher(ctx, &name)?)
            }
            None => None,
        };

        match items.as_slice() {
            [] => Ok(Vec::new()),
            [item] => match self.lot.find(&text) {
                Some(lot) => {
                    let passage = self.passage.find(&text).map(|m| m.as_str());
                    Ok(vec![resolve_instance(ctx, item, lot.as_str(), passage)])
                }
                None => Ok(vec![ctx.ids.database_item(&item.id)]),
            },
            _ if text.contains('+') => {
                let percentages: Vec<&str> =
                    self.percentage.find_iter(&text).map(|m| m.as_str()).collect();
                let composition = Composition::new(&text, &items, &percentages)?;
                let mixture = resolve_mixture(ctx, &composition, researcher.as_ref());
                Ok(vec![mixture])
            }
            _ => Ok(items
                .iter()
                .map(|item| ctx.ids.database_item(&item.id))
                .collect()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::fixtures;
    use crate::error::ConvertError;
    use crate::graph::Node;
    use crate::html::parse_document;
    use crate::input::{Catalog, ItemRecord};
    use eln_vocab::iris;

    fn catalog() -> Catalog {
        let item = |id: &str, title: &str| {
            CatalogItem::from_record(ItemRecord {
                id: id.to_owned(),
                title: title.to_owned(),
                category: "Chemical".to_owned(),
                lastchange: "2021-01-21 16:00:20".to_owned(),
                body: String::new(),
            })
            .unwrap()
        };
        Catalog::new([item("1", "PBS"), item("2", "Ethanol"), item("3", "Water")])
    }

    fn cell(html: &str) -> Content {
        let doc = parse_document(&format!("<table><tr><td>{html}</td></tr></table>"));
        doc.first_table().unwrap().rows[0].cells[0].clone()
    }

    #[test]
    fn plain_link_resolves_generic_item() {
        let dirs = fixtures::directories();
        let catalog = catalog();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let resolver = EntityResolver::new().unwrap();
        let used = resolver
            .resolve_content(&mut ctx, &cell(r#"<a href="Database/Chemical - PBS.html">PBS</a>"#))
            .unwrap();
        assert_eq!(used, [ctx.ids.database_item("1")]);
    }

    #[test]
    fn lot_and_passage_resolve_instance() {
        let dirs = fixtures::directories();
        let catalog = catalog();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let resolver = EntityResolver::new().unwrap();
        let used = resolver
            .resolve_content(
                &mut ctx,
                &cell(r#"<a href="Database/Chemical - PBS.html">PBS</a> LOT X9 Passage 3"#),
            )
            .unwrap();
        assert_eq!(used, [ctx.ids.item_instance("1", "X9", Some("3"))]);
    }

    #[test]
    fn links_without_plus_are_used_separately() {
        let dirs = fixtures::directories();
        let catalog = catalog();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let resolver = EntityResolver::new().unwrap();
        let used = resolver
            .resolve_content(
                &mut ctx,
                &cell(
                    r#"<a href="Database/Chemical - PBS.html">PBS</a> and <a href="database.php?mode=view&id=2">Ethanol</a>"#,
                ),
            )
            .unwrap();
        assert_eq!(used.len(), 2);
    }

    #[test]
    fn nested_list_items_resolve_independently() {
        let dirs = fixtures::directories();
        let catalog = catalog();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let resolver = EntityResolver::new().unwrap();
        let used = resolver
            .resolve_content(
                &mut ctx,
                &cell(
                    r#"Use:<ul><li><a href="Database/Chemical - PBS.html">PBS</a> LOT A</li><li><a href="Database/Chemical - Water.html">Water</a></li></ul>"#,
                ),
            )
            .unwrap();
        assert_eq!(
            used,
            [ctx.ids.item_instance("1", "A", None), ctx.ids.database_item("3")]
        );
    }

    #[test]
    fn attribution_without_links_still_resolves_researcher() {
        let dirs = fixtures::directories();
        let catalog = catalog();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let resolver = EntityResolver::new().unwrap();
        let used = resolver
            .resolve_content(&mut ctx, &cell("prepared earlier (Attributed to Jane Doe)"))
            .unwrap();
        assert!(used.is_empty());
        let jane = Node::from(ctx.ids.researcher("jane doe", None));
        assert!(ctx.graph.holds(&jane, iris::RDF_TYPE, Iri::new(iris::PROV_PERSON)));
    }

    #[test]
    fn unknown_attribution_is_fatal() {
        let dirs = fixtures::directories();
        let catalog = catalog();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let resolver = EntityResolver::new().unwrap();
        let err = resolver
            .resolve_content(&mut ctx, &cell("(Attributed to Nobody)"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnresolvedLookup { .. }));
    }
}
