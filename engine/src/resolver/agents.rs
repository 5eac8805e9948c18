//! Researchers, institutions and manufacturers.

use eln_vocab::iris;

use crate::context::ModelContext;
use crate::error::{ConvertError, LookupKind, Result};
use crate::graph::{Iri, Literal};

/// A resolved researcher and the institution they are affiliated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Researcher {
    /// Researcher identifier.
    pub id: Iri,
    /// Institution identifier.
    pub institution: Iri,
}

/// Resolves a researcher by name and models them with their institution.
///
/// Modeling happens once; later calls for the same person only return the ids.
///
/// # Errors
///
/// Returns [`ConvertError::UnresolvedLookup`] if the name is not in the person
/// directory or the person's affiliation is not in the institution directory.
pub fn resolve_researcher(ctx: &mut ModelContext<'_>, name: &str) -> Result<Researcher> {
    let directories = ctx.directories;
    let person = directories
        .person(name)
        .ok_or_else(|| ConvertError::UnresolvedLookup {
            kind: LookupKind::Researcher,
            name: name.to_owned(),
        })?;
    let institution = directories
        .institution(&person.affiliation)
        .ok_or_else(|| ConvertError::UnresolvedLookup {
            kind: LookupKind::Institution,
            name: person.affiliation.clone(),
        })?;

    let researcher = Researcher {
        id: ctx.ids.researcher(&person.key, person.orcid.as_deref()),
        institution: ctx.ids.institution(&institution.key, institution.ror.as_deref()),
    };
    if ctx
        .graph
        .holds(&researcher.id, iris::RDF_TYPE, Iri::new(iris::PROV_PERSON))
    {
        return Ok(researcher);
    }

    let org = &researcher.institution;
    if !ctx.graph.holds(org, iris::RDF_TYPE, Iri::new(iris::PROV_ORGANIZATION)) {
        ctx.graph.insert(org, iris::RDF_TYPE, Iri::new(iris::PROV_ORGANIZATION));
        ctx.graph
            .insert(org, iris::FOAF_NAME, Literal::lang(institution.name.as_str(), "en"));
    }

    let id = &researcher.id;
    let full_name = format!("{} {}", person.given_name, person.family_name);
    ctx.graph.insert(id, iris::RDF_TYPE, Iri::new(iris::PROV_PERSON));
    ctx.graph
        .insert(id, iris::FOAF_NAME, Literal::typed(full_name, iris::XSD_STRING));
    ctx.graph.insert(
        id,
        iris::FOAF_GIVEN_NAME,
        Literal::typed(person.given_name.as_str(), iris::XSD_STRING),
    );
    ctx.graph.insert(
        id,
        iris::FOAF_FAMILY_NAME,
        Literal::typed(person.family_name.as_str(), iris::XSD_STRING),
    );
    if let Some(email) = &person.email {
        ctx.graph.insert(id, iris::SCHEMA_EMAIL, Literal::plain(email.as_str()));
    }
    ctx.graph.insert(id, iris::SCHEMA_AFFILIATION, org);
    tracing::debug!(researcher = %id, "modeled researcher");
    Ok(researcher)
}

/// Resolves the manufacturer named somewhere in `text` and models it.
///
/// The first directory key contained in the lower-cased text wins.
///
/// # Errors
///
/// Returns [`ConvertError::UnresolvedLookup`] if no key occurs in `text`.
pub fn resolve_manufacturer(ctx: &mut ModelContext<'_>, text: &str) -> Result<Iri> {
    let directories = ctx.directories;
    let entry = directories
        .manufacturer(text)
        .ok_or_else(|| ConvertError::UnresolvedLookup {
            kind: LookupKind::Manufacturer,
            name: text.to_owned(),
        })?;
    let id = ctx.ids.manufacturer(&entry.key, entry.id.as_deref());
    ctx.graph.insert(&id, iris::FOAF_NAME, Literal::plain(entry.name.as_str()));
    ctx.graph
        .insert(&id, iris::RDF_TYPE, Iri::new(iris::OBI_MANUFACTURER));
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::fixtures;
    use crate::graph::Node;
    use crate::input::Catalog;

    #[test]
    fn researcher_with_institution() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let r = resolve_researcher(&mut ctx, "Jane Doe").unwrap();
        assert_eq!(r.id.as_str(), "https://example.org/eln/researcher/jane_doe");
        assert_eq!(r.institution.as_str(), "https://example.org/eln/institution/uni");
        assert!(ctx.graph.holds(&r.id, iris::SCHEMA_AFFILIATION, &r.institution));
        assert!(ctx.graph.holds(
            &r.id,
            iris::FOAF_NAME,
            Literal::typed("Jane Doe", iris::XSD_STRING)
        ));
        assert!(ctx.graph.holds(
            &r.institution,
            iris::FOAF_NAME,
            Literal::lang("Example University", "en")
        ));
    }

    #[test]
    fn second_resolution_adds_nothing() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        resolve_researcher(&mut ctx, "jane doe").unwrap();
        let before = ctx.graph.len();
        resolve_researcher(&mut ctx, "JANE DOE").unwrap();
        assert_eq!(ctx.graph.len(), before);
    }

    #[test]
    fn orcid_replaces_minted_id() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let r = resolve_researcher(&mut ctx, "john roe").unwrap();
        assert_eq!(r.id.as_str(), "https://orcid.org/0000-0002-1825-0097");
        assert!(!ctx.graph.has_subject(&Node::from(Iri::new(
            "https://example.org/eln/researcher/john_roe"
        ))));
    }

    #[test]
    fn unknown_researcher_is_fatal() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let err = resolve_researcher(&mut ctx, "nobody").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnresolvedLookup { kind: LookupKind::Researcher, .. }
        ));
    }

    #[test]
    fn manufacturer_by_substring() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "1");
        let id = resolve_manufacturer(&mut ctx, "Eppendorf AG, Hamburg").unwrap();
        assert_eq!(id.as_str(), "https://example.org/eln/manufacturer/eppendorf");
        assert!(ctx.graph.holds(&id, iris::RDF_TYPE, Iri::new(iris::OBI_MANUFACTURER)));
        assert!(resolve_manufacturer(&mut ctx, "Unknown Corp").is_err());
    }
}
