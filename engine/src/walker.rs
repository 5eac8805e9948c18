//! Protocol structure walker.
//!
//! The experiment body has two recognized top-level sections. *General
//! information* holds a two-column table naming the researcher and the
//! objective. *Protocol* holds one `h2` stage per phase; each stage has an
//! optional list of used items followed by a step table whose first row is a
//! header. Steps and stages are chained with `prov:wasInformedBy` in document
//! order, the only place where order carries meaning.

use chrono::NaiveTime;
use eln_vocab::iris;

use crate::activity::classify_step;
use crate::config::Directories;
use crate::context::ModelContext;
use crate::diagnostics::DiagnosticKind;
use crate::document::{section_after, Block, Heading};
use crate::error::{ConvertError, Result};
use crate::graph::{Iri, Literal, Node};
use crate::input::{download_path, Experiment};
use crate::parameters::ParameterExtractor;
use crate::resolver::{resolve_researcher, EntityResolver, Researcher};

const GENERAL_INFORMATION: &str = "general information";
const PROTOCOL: &str = "protocol";

/// A recognized protocol stage and the blocks under its heading.
#[derive(Debug, Clone)]
pub struct Stage<'b> {
    /// Section key, e.g. `cell_culture` or `approach_2_with_stimulation`.
    pub key: String,
    /// Human-readable title.
    pub title: String,
    /// Section template key.
    pub template: &'static str,
    /// Blocks between this stage heading and the next.
    pub blocks: &'b [Block],
}

/// Walks an experiment document and builds its protocol graph.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolWalker<'e> {
    parameters: &'e ParameterExtractor,
    resolver: &'e EntityResolver,
}

impl<'e> ProtocolWalker<'e> {
    /// Creates a walker using the given extractors.
    #[must_use]
    pub fn new(parameters: &'e ParameterExtractor, resolver: &'e EntityResolver) -> Self {
        Self { parameters, resolver }
    }

    /// Models the experiment's protocol into `ctx` and returns its researcher.
    ///
    /// Every top-level heading and stage heading is validated before the
    /// protocol is modeled.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Structural`] for an unknown section or stage, a
    /// stage without a step table, a step row with fewer than two cells, or a
    /// protocol whose researcher is not named. Lookup, unit and composition
    /// errors of the components propagate unchanged.
    pub fn walk(
        &self,
        ctx: &mut ModelContext<'_>,
        experiment: &Experiment,
    ) -> Result<Option<Researcher>> {
        let blocks = &experiment.document.blocks;
        let mut general = Vec::new();
        let mut protocol = Vec::new();
        for (index, heading) in experiment.document.headings(1) {
            match heading.normalized().as_str() {
                GENERAL_INFORMATION => general.push(section_after(blocks, index)),
                PROTOCOL => protocol.push(section_after(blocks, index)),
                _ => {
                    return Err(ConvertError::structural(format!(
                        "unknown section \"{}\"",
                        heading.content.text().trim()
                    )))
                }
            }
        }

        let mut approaches = 0;
        let mut stages = Vec::new();
        for &section in &protocol {
            stages.extend(plan_stages(ctx.directories, section, &mut approaches)?);
        }

        let mut researcher = None;
        for section in general {
            if let Some(found) = self.general_information(ctx, section)? {
                researcher = Some(found);
            }
        }

        if !protocol.is_empty() {
            let agent = researcher.clone().ok_or_else(|| {
                ConvertError::structural("general information names no researcher")
            })?;
            let mut sections = Vec::with_capacity(stages.len());
            for stage in &stages {
                sections.push(self.stage(ctx, stage, &agent)?);
            }
            model_protocol(ctx, experiment, &sections, &agent);
        }
        Ok(researcher)
    }

    fn general_information(
        &self,
        ctx: &mut ModelContext<'_>,
        blocks: &[Block],
    ) -> Result<Option<Researcher>> {
        let table = blocks
            .iter()
            .find_map(Block::as_table)
            .ok_or_else(|| ConvertError::structural("general information has no table"))?;
        let mut researcher = None;
        for row in &table.rows {
            let (Some(label), Some(value)) = (row.cell(0), row.cell(1)) else {
                continue;
            };
            let value = value.text().trim().to_owned();
            match label.text().trim().to_lowercase().as_str() {
                "researcher" => {
                    researcher = Some(resolve_researcher(ctx, &value.to_lowercase())?);
                }
                "objective" => {
                    let objective = ctx.ids.objective();
                    ctx.graph.insert(
                        &objective,
                        iris::RDF_TYPE,
                        Iri::new(iris::IAO_OBJECTIVE_SPECIFICATION),
                    );
                    ctx.graph
                        .insert(&objective, iris::RDFS_LABEL, Literal::lang(value, "en"));
                    let protocol = ctx.ids.protocol();
                    ctx.graph
                        .insert(&protocol, iris::OBI_ACHIEVES_PLANNED_OBJECTIVE, &objective);
                }
                other => tracing::debug!(row = other, "ignoring general information row"),
            }
        }
        Ok(researcher)
    }

    fn stage(
        &self,
        ctx: &mut ModelContext<'_>,
        stage: &Stage<'_>,
        researcher: &Researcher,
    ) -> Result<Iri> {
        let section = ctx.ids.section(&stage.key);
        ctx.graph.insert(
            &section,
            iris::SCHEMA_DESCRIPTION,
            Literal::lang(stage.title.as_str(), "en"),
        );
        let template = ctx.ids.template(stage.template);
        associate(
            ctx,
            &section,
            &template,
            stage.template,
            researcher,
            &format!("{}/association", stage.key),
        );

        let mut table = None;
        for block in stage.blocks {
            match block {
                Block::List(list) => {
                    for used in self.resolver.resolve_list(ctx, list)? {
                        ctx.graph.insert(&section, iris::PROV_USED, &used);
                    }
                }
                Block::Table(t) => {
                    table = Some(t);
                    break;
                }
                _ => {}
            }
        }
        let table = table.ok_or_else(|| {
            ConvertError::structural(format!("stage \"{}\" has no step table", stage.title))
        })?;

        for (n, row) in table.rows.iter().enumerate().skip(1) {
            let (Some(description), Some(time)) = (row.cell(0), row.cell(1)) else {
                return Err(ConvertError::structural(format!(
                    "step {n} of stage \"{}\" has fewer than two cells",
                    stage.title
                )));
            };
            let step = ctx.ids.step(&stage.key, n);
            for class in [iris::SCHEMA_ACTION, iris::BFO_PROCESS, iris::PROV_ACTIVITY] {
                ctx.graph.insert(&step, iris::RDF_TYPE, Iri::new(class));
            }

            let text = description.text();
            let text = text.trim();
            classify_step(ctx, &step, text);
            start_time(ctx, &step, &time.text());
            if n > 1 {
                let previous = ctx.ids.step(&stage.key, n - 1);
                ctx.graph.insert(&step, iris::PROV_WAS_INFORMED_BY, &previous);
            }
            ctx.graph.insert(&section, iris::SCHEMA_HAS_PART, &step);
            ctx.graph.insert(
                &step,
                iris::SCHEMA_DESCRIPTION,
                Literal::lang(text.replace('\n', "\\n"), "en"),
            );

            self.parameters.attach(
                ctx,
                &step,
                &format!("{}/{n}", stage.key),
                description.text_without_links().trim(),
            )?;
            for used in self.resolver.resolve_content(ctx, description)? {
                ctx.graph.insert(&step, iris::PROV_USED, &used);
            }
            for link in description.links() {
                if let Some(path) = download_path(&link.href) {
                    let file = ctx.ids.file(&path);
                    ctx.graph.insert(&file, iris::PROV_WAS_GENERATED_BY, &step);
                }
            }
        }
        tracing::debug!(stage = %stage.key, steps = table.rows.len().saturating_sub(1), "modeled stage");
        Ok(section)
    }
}

/// Maps the `h2` headings of a protocol section to stages.
///
/// `approaches` numbers approach stages across calls.
///
/// # Errors
///
/// Returns [`ConvertError::Structural`] for a heading that is neither a fixed
/// stage nor an approach with a known variant.
pub fn plan_stages<'b>(
    directories: &Directories,
    blocks: &'b [Block],
    approaches: &mut usize,
) -> Result<Vec<Stage<'b>>> {
    let mut stages = Vec::new();
    for (index, heading) in blocks
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.as_heading().filter(|h| h.level == 2).map(|h| (i, h)))
    {
        let normalized = heading.normalized();
        let blocks = section_after(blocks, index);
        if let Some(fixed) = directories.fixed_stage(&normalized) {
            stages.push(Stage {
                key: fixed.key.to_owned(),
                title: fixed.title.to_owned(),
                template: fixed.template,
                blocks,
            });
        } else if normalized.contains(directories.approach_marker) {
            *approaches += 1;
            let variant = directories
                .approach_variants
                .iter()
                .find(|v| normalized.contains(v.marker))
                .ok_or_else(|| unknown_stage(heading))?;
            stages.push(Stage {
                key: format!(
                    "{}_{}_{}",
                    directories.approach_marker, approaches, variant.suffix
                ),
                title: heading.content.text().trim().to_owned(),
                template: variant.template,
                blocks,
            });
        } else {
            return Err(unknown_stage(heading));
        }
    }
    Ok(stages)
}

fn unknown_stage(heading: &Heading) -> ConvertError {
    ConvertError::structural(format!(
        "unknown stage \"{}\"",
        heading.content.text().trim()
    ))
}

fn start_time(ctx: &mut ModelContext<'_>, step: &Iri, raw: &str) {
    let raw = raw.trim();
    match NaiveTime::parse_from_str(raw, "%H:%M") {
        Ok(time) => {
            ctx.graph.insert(
                step,
                iris::SCHEMA_START_TIME,
                Literal::typed(time.format("%H:%M:%S").to_string(), iris::XSD_TIME),
            );
        }
        Err(_) => {
            ctx.graph.insert(
                step,
                iris::SCHEMA_START_TIME,
                Literal::typed(raw, iris::XSD_STRING),
            );
            ctx.diagnostics.report(
                DiagnosticKind::UnparsableStartTime,
                step.as_str(),
                format!("start time \"{raw}\" is not HH:MM"),
            );
        }
    }
}

/// Links `activity` to `plan` and `researcher` through a qualified association.
fn associate(
    ctx: &mut ModelContext<'_>,
    activity: &Iri,
    plan: &Iri,
    plan_name: &str,
    researcher: &Researcher,
    hint: &str,
) {
    ctx.graph.insert(plan, iris::RDF_TYPE, Iri::new(iris::PROV_PLAN));
    ctx.graph.insert(plan, iris::FOAF_NAME, Literal::plain(plan_name));
    let association: Node = ctx.graph.fresh_blank(hint);
    ctx.graph
        .insert(activity, iris::PROV_QUALIFIED_ASSOCIATION, &association);
    ctx.graph
        .insert(&association, iris::RDF_TYPE, Iri::new(iris::PROV_ASSOCIATION));
    ctx.graph.insert(&association, iris::PROV_HAD_PLAN, plan);
    ctx.graph.insert(&association, iris::PROV_AGENT, &researcher.id);
}

fn model_protocol(
    ctx: &mut ModelContext<'_>,
    experiment: &Experiment,
    sections: &[Iri],
    researcher: &Researcher,
) {
    let protocol = ctx.ids.protocol();
    for class in [iris::SCHEMA_ACTION, iris::BFO_PROCESS, iris::PROV_ACTIVITY] {
        ctx.graph.insert(&protocol, iris::RDF_TYPE, Iri::new(class));
    }
    ctx.graph.insert(
        &protocol,
        iris::FOAF_NAME,
        Literal::lang(experiment.title.as_str(), "en"),
    );
    ctx.graph.insert(
        &protocol,
        iris::ELN_EXPERIMENT_SUCCESS,
        Literal::typed(experiment.is_success().to_string(), iris::XSD_BOOLEAN),
    );
    let file = ctx.ids.file(&experiment.export_path());
    ctx.graph.insert(&protocol, iris::ELN_HAS_FILE, file);

    for (i, section) in sections.iter().enumerate() {
        ctx.graph.insert(&protocol, iris::SCHEMA_HAS_PART, section);
        if let Some(previous) = i.checked_sub(1).and_then(|p| sections.get(p)) {
            ctx.graph.insert(section, iris::PROV_WAS_INFORMED_BY, previous);
        }
    }

    let directories = ctx.directories;
    let template = experiment
        .tags
        .iter()
        .find_map(|tag| directories.template(tag).map(|name| (tag.to_lowercase(), name)));
    if let Some((key, name)) = template {
        let plan = ctx.ids.template(&key);
        associate(ctx, &protocol, &plan, name, researcher, "protocol/association");
    }
    tracing::debug!(sections = sections.len(), "modeled protocol");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::fixtures;
    use crate::graph::Term;
    use crate::input::{Catalog, ExperimentRecord};
    use eln_vocab::Vocabulary;

    fn experiment(body: &str) -> Experiment {
        Experiment::from_record(
            ExperimentRecord {
                id: "42".to_owned(),
                title: "Calcium imaging".to_owned(),
                category: "Success".to_owned(),
                tags: Some("Ca-Imaging|mouse".to_owned()),
                lastchange: "2021-02-01 10:00:00".to_owned(),
                body: body.to_owned(),
                links: Vec::new(),
                uploads: Vec::new(),
            },
            &[],
        )
        .unwrap()
    }

    const GENERAL: &str = "<h1>General information</h1>\
        <table><tr><td>Researcher</td><td>Jane Doe</td></tr>\
        <tr><td>Objective</td><td>Measure calcium transients</td></tr></table>";

    fn walk<'a>(
        dirs: &'a Directories,
        catalog: &'a Catalog,
        body: &str,
    ) -> Result<(ModelContext<'a>, Option<Researcher>)> {
        let parameters = ParameterExtractor::new(Vocabulary::builtin().quantities)?;
        let resolver = EntityResolver::new()?;
        let mut ctx = ModelContext::new(dirs, catalog, "42");
        let researcher =
            ProtocolWalker::new(&parameters, &resolver).walk(&mut ctx, &experiment(body))?;
        Ok((ctx, researcher))
    }

    #[test]
    fn steps_are_chained_in_document_order() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let body = format!(
            "{GENERAL}<h1>Protocol</h1><h2>Preparation</h2>\
             <table><tr><th>Description</th><th>Time</th></tr>\
             <tr><td>Wash cells</td><td>09:00</td></tr>\
             <tr><td>Incubate at 37°C for 5 min</td><td>9.15</td></tr></table>\
             <h2>Cell culture</h2>\
             <table><tr><th>Description</th><th>Time</th></tr>\
             <tr><td>Add medium</td><td>10:00</td></tr></table>"
        );
        let (ctx, researcher) = walk(&dirs, &catalog, &body).unwrap();
        assert!(researcher.is_some());
        let step1 = ctx.ids.step("preparation", 1);
        let step2 = ctx.ids.step("preparation", 2);
        assert!(ctx.graph.holds(&step2, iris::PROV_WAS_INFORMED_BY, &step1));
        assert!(ctx.graph.holds(
            &step1,
            iris::SCHEMA_START_TIME,
            Literal::typed("09:00:00", iris::XSD_TIME)
        ));
        assert!(ctx.graph.holds(
            &step2,
            iris::SCHEMA_START_TIME,
            Literal::typed("9.15", iris::XSD_STRING)
        ));
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::UnparsableStartTime), 1);

        let culture = ctx.ids.section("cell_culture");
        let preparation = ctx.ids.section("preparation");
        assert!(ctx.graph.holds(&culture, iris::PROV_WAS_INFORMED_BY, &preparation));
        let protocol = ctx.ids.protocol();
        assert_eq!(
            ctx.graph
                .objects(&Node::from(&protocol), iris::SCHEMA_HAS_PART)
                .count(),
            2
        );
        assert!(ctx.graph.holds(
            &protocol,
            iris::OBI_ACHIEVES_PLANNED_OBJECTIVE,
            ctx.ids.objective()
        ));
    }

    #[test]
    fn approach_stages_are_numbered() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let table = "<table><tr><th>D</th><th>T</th></tr><tr><td>Wash</td><td>08:00</td></tr></table>";
        let body = format!(
            "{GENERAL}<h1>Protocol</h1>\
             <h2>Approach without stimulation</h2>{table}\
             <h2>Approach with stimulation</h2>{table}"
        );
        let (ctx, _) = walk(&dirs, &catalog, &body).unwrap();
        let first = ctx.ids.section("approach_1_without_stimulation");
        let second = ctx.ids.section("approach_2_with_stimulation");
        assert!(ctx.graph.has_subject(&Node::from(&first)));
        assert!(ctx.graph.holds(&second, iris::PROV_WAS_INFORMED_BY, &first));
        assert!(ctx.graph.holds(
            &second,
            iris::SCHEMA_DESCRIPTION,
            Literal::lang("Approach with stimulation", "en")
        ));
    }

    #[test]
    fn unknown_stage_is_structural() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let body = format!("{GENERAL}<h1>Protocol</h1><h2>Random Stage</h2><table></table>");
        assert!(matches!(walk(&dirs, &catalog, &body), Err(ConvertError::Structural(_))));
    }

    #[test]
    fn unknown_section_is_structural() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        assert!(matches!(
            walk(&dirs, &catalog, "<h1>Results</h1><p>none</p>"),
            Err(ConvertError::Structural(_))
        ));
    }

    #[test]
    fn stage_without_table_is_structural() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let body = format!("{GENERAL}<h1>Protocol</h1><h2>Preparation</h2><p>later</p>");
        assert!(matches!(walk(&dirs, &catalog, &body), Err(ConvertError::Structural(_))));
    }

    #[test]
    fn protocol_template_and_associations() {
        let dirs = fixtures::directories();
        let catalog = Catalog::default();
        let body = format!(
            "{GENERAL}<h1>Protocol</h1><h2>Preparation</h2>\
             <table><tr><th>D</th><th>T</th></tr>\
             <tr><td>See <a href=\"app/download.php?f=x&amp;name=trace.csv\">trace</a></td><td>08:00</td></tr></table>"
        );
        let (ctx, researcher) = walk(&dirs, &catalog, &body).unwrap();
        let researcher = researcher.unwrap();
        let protocol = ctx.ids.protocol();
        let template = ctx.ids.template("ca-imaging");
        assert!(ctx.graph.holds(&template, iris::RDF_TYPE, Iri::new(iris::PROV_PLAN)));
        let association = Node::Blank("protocol_association_1".to_owned());
        assert!(ctx.graph.holds(&protocol, iris::PROV_QUALIFIED_ASSOCIATION, &association));
        assert!(ctx.graph.holds(&association, iris::PROV_AGENT, &researcher.id));

        let section_plan = ctx.ids.template("ca-imaging_preparation");
        let plan_term = Term::from(&section_plan);
        assert_eq!(
            ctx.graph
                .triples(None, Some(iris::PROV_HAD_PLAN), Some(&plan_term))
                .count(),
            1
        );
        assert!(ctx.graph.holds(
            Iri::new("Data/trace.csv"),
            iris::PROV_WAS_GENERATED_BY,
            ctx.ids.step("preparation", 1)
        ));
        assert!(ctx.graph.holds(
            &protocol,
            iris::ELN_EXPERIMENT_SUCCESS,
            Literal::typed("true", iris::XSD_BOOLEAN)
        ));
    }
}
