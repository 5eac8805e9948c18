//! Research-data package entities: metadata descriptor, root dataset, license and files.

use eln_vocab::iris;

use crate::context::ModelContext;
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::graph::{Iri, Literal};
use crate::input::{xsd_datetime, Experiment, FileInventory, DATA_DIR, IDENTIFICATION_REPORT};
use crate::resolver::Researcher;

/// Models the package root and every file of `inventory`.
///
/// # Errors
///
/// Returns [`crate::ConvertError::InvalidTimestamp`] if the identification
/// report's scan date does not parse.
pub fn model_package(
    ctx: &mut ModelContext<'_>,
    experiment: &Experiment,
    inventory: &FileInventory,
    researcher: Option<&Researcher>,
) -> Result<()> {
    let dataset = model_root(ctx, experiment, researcher);
    for path in &inventory.files {
        model_file(ctx, &dataset, experiment, inventory, path)?;
    }
    tracing::debug!(files = inventory.files.len(), "modeled package");
    Ok(())
}

fn model_root(
    ctx: &mut ModelContext<'_>,
    experiment: &Experiment,
    researcher: Option<&Researcher>,
) -> Iri {
    let descriptor = Iri::new(iris::RO_CRATE_METADATA);
    let dataset = Iri::new(iris::RO_CRATE_ROOT);
    ctx.graph
        .insert(&descriptor, iris::RDF_TYPE, Iri::new(iris::SCHEMA_CREATIVE_WORK));
    ctx.graph
        .insert(&descriptor, iris::SCHEMA_CONFORMS_TO, Iri::new(iris::RO_CRATE_SPEC));
    ctx.graph.insert(&descriptor, iris::SCHEMA_ABOUT, &dataset);

    ctx.graph
        .insert(&dataset, iris::RDF_TYPE, Iri::new(iris::SCHEMA_DATASET));
    if let Some(researcher) = researcher {
        ctx.graph.insert(&dataset, iris::SCHEMA_CREATOR, &researcher.id);
    }
    for tag in &experiment.tags {
        ctx.graph
            .insert(&dataset, iris::SCHEMA_KEYWORDS, Literal::lang(tag.as_str(), "en"));
    }
    ctx.graph.insert(
        &dataset,
        iris::SCHEMA_NAME,
        Literal::lang(experiment.title.as_str(), "en"),
    );
    ctx.graph.insert(
        &dataset,
        iris::SCHEMA_DATE_PUBLISHED,
        Literal::typed(xsd_datetime(&experiment.last_change), iris::XSD_DATETIME),
    );

    let license = &ctx.directories.license;
    let id = Iri::new(license.id.as_str());
    let name = Literal::lang(license.name.as_str(), "en");
    let description = Literal::lang(license.description.as_str(), "en");
    ctx.graph.insert(&dataset, iris::SCHEMA_LICENSE, &id);
    ctx.graph
        .insert(&id, iris::RDF_TYPE, Iri::new(iris::SCHEMA_CREATIVE_WORK));
    ctx.graph.insert(&id, iris::SCHEMA_NAME, name);
    ctx.graph.insert(&id, iris::SCHEMA_IDENTIFIER, &id);
    ctx.graph.insert(&id, iris::SCHEMA_DESCRIPTION, description);
    dataset
}

fn model_file(
    ctx: &mut ModelContext<'_>,
    dataset: &Iri,
    experiment: &Experiment,
    inventory: &FileInventory,
    path: &str,
) -> Result<()> {
    let file = ctx.ids.file(path);
    let (dir, name) = path.rsplit_once('/').unwrap_or(("", path));
    ctx.graph.insert(&file, iris::FOAF_NAME, Literal::lang(path, "en"));
    ctx.graph.insert(&file, iris::RDF_TYPE, Iri::new(iris::SCHEMA_FILE));
    let directories = ctx.directories;
    match extension(name).and_then(|ext| directories.content_type(ext)) {
        Some(content_type) => {
            ctx.graph
                .insert(&file, iris::SCHEMA_ENCODING_FORMAT, Literal::plain(content_type));
        }
        None => ctx.diagnostics.report(
            DiagnosticKind::UnknownContentType,
            file.as_str(),
            format!("no content type known for \"{name}\""),
        ),
    }
    ctx.graph.insert(dataset, iris::SCHEMA_HAS_PART, &file);

    if name == IDENTIFICATION_REPORT {
        if let Some(report) = &inventory.identification {
            ctx.graph.insert(
                &file,
                iris::SCHEMA_DATE_MODIFIED,
                Literal::typed(xsd_datetime(&report.scanned()?), iris::XSD_DATETIME),
            );
        }
        return Ok(());
    }

    if dir.rsplit('/').next() == Some(DATA_DIR) {
        if let Some(upload) = experiment.latest_upload(name) {
            ctx.graph.insert(
                &file,
                iris::SCHEMA_DATE_MODIFIED,
                Literal::typed(xsd_datetime(&upload.uploaded), iris::XSD_DATETIME),
            );
        }
    }

    if let Some(entry) = inventory.identification.as_ref().and_then(|r| r.find(path)) {
        ctx.graph.insert(
            &file,
            iris::SCHEMA_CONTENT_SIZE,
            Literal::plain(entry.filesize.to_string()),
        );
        ctx.graph
            .insert(&file, iris::ELN_SHA512, Literal::plain(entry.sha512.as_str()));
    }
    Ok(())
}

/// Extension of a file name including the dot, e.g. `.csv`.
fn extension(name: &str) -> Option<&str> {
    name.rfind('.').filter(|&i| i > 0).map(|i| &name[i..])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::fixtures;
    use crate::graph::Node;
    use crate::input::{Catalog, ExperimentRecord, IdentificationReport, IdentifiedFile, UploadRecord};

    fn experiment() -> Experiment {
        Experiment::from_record(
            ExperimentRecord {
                id: "42".to_owned(),
                title: "Calcium imaging".to_owned(),
                category: "Success".to_owned(),
                tags: Some("Ca-Imaging|mouse".to_owned()),
                lastchange: "2021-02-01 10:00:00".to_owned(),
                body: String::new(),
                links: Vec::new(),
                uploads: vec![UploadRecord {
                    id: "3".to_owned(),
                    real_name: "trace.csv".to_owned(),
                    datetime: "2021-01-30 08:15:00".to_owned(),
                }],
            },
            &[],
        )
        .unwrap()
    }

    fn inventory() -> FileInventory {
        FileInventory {
            files: vec![
                "Protocol/Calcium imaging.html".to_owned(),
                "Data/trace.csv".to_owned(),
                "siegfried_output.json".to_owned(),
                "Data/notes".to_owned(),
            ],
            identification: Some(IdentificationReport {
                scandate: "2021-04-12T09:21:53Z".to_owned(),
                files: vec![IdentifiedFile {
                    filename: "/tmp/siegfried-files/Data/trace.csv".to_owned(),
                    filesize: 1024,
                    sha512: "abc".to_owned(),
                }],
            }),
        }
    }

    #[test]
    fn root_entities() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "42");
        model_package(&mut ctx, &experiment(), &FileInventory::default(), None).unwrap();
        let root = Iri::new(iris::RO_CRATE_ROOT);
        assert!(ctx.graph.holds(
            Iri::new(iris::RO_CRATE_METADATA),
            iris::SCHEMA_ABOUT,
            &root
        ));
        assert_eq!(
            ctx.graph.objects(&Node::from(&root), iris::SCHEMA_KEYWORDS).count(),
            2
        );
        assert!(ctx.graph.holds(
            &root,
            iris::SCHEMA_DATE_PUBLISHED,
            Literal::typed("2021-02-01T10:00:00", iris::XSD_DATETIME)
        ));
        assert!(ctx.graph.objects(&Node::from(&root), iris::SCHEMA_CREATOR).next().is_none());
    }

    #[test]
    fn file_metadata() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let mut ctx = ModelContext::new(&dirs, &catalog, "42");
        model_package(&mut ctx, &experiment(), &inventory(), None).unwrap();

        let trace = Iri::new("Data/trace.csv");
        assert!(ctx.graph.holds(
            &trace,
            iris::SCHEMA_DATE_MODIFIED,
            Literal::typed("2021-01-30T08:15:00", iris::XSD_DATETIME)
        ));
        assert!(ctx.graph.holds(&trace, iris::SCHEMA_CONTENT_SIZE, Literal::plain("1024")));
        assert!(ctx.graph.holds(&trace, iris::ELN_SHA512, Literal::plain("abc")));
        assert!(ctx.graph.holds(&trace, iris::SCHEMA_ENCODING_FORMAT, Literal::plain("text/csv")));

        let report = Iri::new("siegfried_output.json");
        assert!(ctx.graph.holds(
            &report,
            iris::SCHEMA_DATE_MODIFIED,
            Literal::typed("2021-04-12T09:21:53", iris::XSD_DATETIME)
        ));

        let protocol = Iri::new("Protocol/Calcium%20imaging.html");
        assert!(ctx.graph.holds(
            Iri::new(iris::RO_CRATE_ROOT),
            iris::SCHEMA_HAS_PART,
            &protocol
        ));
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::UnknownContentType), 1);
    }
}
