//! Activity classification of step descriptions.
//!
//! A description is lower-cased and every phrase of the activity table is
//! tested for containment. All hits count; the result is a set of classes,
//! so neither table order nor repeated phrases for one class matter.

use std::collections::BTreeSet;

use eln_vocab::iris;

use crate::config::ActivityEntry;
use crate::context::ModelContext;
use crate::diagnostics::DiagnosticKind;
use crate::graph::Iri;

/// Returns the distinct classes whose phrase occurs in `text`.
#[must_use]
pub fn classify<'t>(table: &'t [ActivityEntry], text: &str) -> BTreeSet<&'t str> {
    let text = text.to_lowercase();
    table
        .iter()
        .filter(|entry| text.contains(entry.phrase.as_str()))
        .map(|entry| entry.class.as_str())
        .collect()
}

/// Classifies a step description and links the step to each class with `owl:sameAs`.
///
/// No match reports [`DiagnosticKind::MissingClassification`]; more than one
/// distinct class reports [`DiagnosticKind::AmbiguousClassification`]. Both
/// leave the conversion running. Returns the number of classes attached.
pub fn classify_step(ctx: &mut ModelContext<'_>, step: &Iri, description: &str) -> usize {
    let classes = classify(&ctx.directories.activities, description);
    for class in &classes {
        ctx.graph.insert(step, iris::OWL_SAME_AS, Iri::new(*class));
    }
    match classes.len() {
        0 => ctx.diagnostics.report(
            DiagnosticKind::MissingClassification,
            step.as_str(),
            format!("no activity found for description \"{description}\""),
        ),
        1 => {}
        n => ctx.diagnostics.report(
            DiagnosticKind::AmbiguousClassification,
            step.as_str(),
            format!("{n} activities found for description \"{description}\""),
        ),
    }
    classes.len()
}
