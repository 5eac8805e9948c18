//! Recoverable data-quality diagnostics.
//!
//! The engine keeps converting after any of these; they are collected in
//! [`Diagnostics`] and mirrored to `tracing` at the matching level.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational; nothing is wrong with the output.
    Info,
    /// The output is complete but possibly ambiguous.
    Warning,
    /// The output lacks information it should have.
    Error,
}

/// Kind of recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No activity phrase matched a step description.
    MissingClassification,
    /// More than one activity class matched a step description.
    AmbiguousClassification,
    /// A step's time cell is not `HH:MM`.
    UnparsableStartTime,
    /// A catalog item has no metadata table.
    MissingTable,
    /// A catalog item's metadata table has no `ontology-item` row.
    NoOntologyRow,
    /// A catalog item's metadata table has a row nobody handles.
    UnhandledItemRow,
    /// A package file has no known content type.
    UnknownContentType,
    /// A quantity typed as non-negative integer was written otherwise.
    NonIntegerQuantity,
    /// A catalog item names an external identifier that is not an absolute IRI.
    InvalidIri,
}

impl DiagnosticKind {
    /// Default severity of this kind.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::MissingClassification
            | DiagnosticKind::MissingTable
            | DiagnosticKind::NoOntologyRow
            | DiagnosticKind::InvalidIri => Severity::Error,
            DiagnosticKind::AmbiguousClassification
            | DiagnosticKind::UnparsableStartTime
            | DiagnosticKind::NonIntegerQuantity => Severity::Warning,
            DiagnosticKind::UnhandledItemRow | DiagnosticKind::UnknownContentType => {
                Severity::Info
            }
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::MissingClassification => "missing-classification",
            DiagnosticKind::AmbiguousClassification => "ambiguous-classification",
            DiagnosticKind::UnparsableStartTime => "unparsable-start-time",
            DiagnosticKind::MissingTable => "missing-table",
            DiagnosticKind::NoOntologyRow => "no-ontology-row",
            DiagnosticKind::UnhandledItemRow => "unhandled-item-row",
            DiagnosticKind::UnknownContentType => "unknown-content-type",
            DiagnosticKind::NonIntegerQuantity => "non-integer-quantity",
            DiagnosticKind::InvalidIri => "invalid-iri",
        })
    }
}

/// One recoverable condition.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// What happened.
    pub kind: DiagnosticKind,
    /// How bad it is.
    pub severity: Severity,
    /// Identifier of the node concerned.
    pub subject: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}

/// Diagnostics collected during one conversion, in emission order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    /// All diagnostics.
    pub entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            severity: kind.severity(),
            subject: subject.into(),
            message: message.into(),
        };
        match diagnostic.severity {
            Severity::Info => tracing::debug!(kind = %kind, subject = %diagnostic.subject, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(kind = %kind, subject = %diagnostic.subject, "{}", diagnostic.message),
            Severity::Error => tracing::error!(kind = %kind, subject = %diagnostic.subject, "{}", diagnostic.message),
        }
        self.entries.push(diagnostic);
    }

    /// Appends all entries of another collection.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Number of diagnostics of `kind`.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Number of error-level diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Number of warning-level diagnostics.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind_and_severity() {
        let mut d = Diagnostics::new();
        d.report(DiagnosticKind::MissingClassification, "step/1", "no activity");
        d.report(DiagnosticKind::AmbiguousClassification, "step/2", "two activities");
        d.report(DiagnosticKind::AmbiguousClassification, "step/3", "two activities");
        d.report(DiagnosticKind::UnhandledItemRow, "item/1", "row 'notes'");
        assert_eq!(d.count(DiagnosticKind::AmbiguousClassification), 2);
        assert_eq!(d.error_count(), 1);
        assert_eq!(d.warning_count(), 2);
    }

    #[test]
    fn display_names_kind_and_subject() {
        let mut d = Diagnostics::new();
        d.report(DiagnosticKind::UnparsableStartTime, "prep/1", "\"soon\"");
        assert_eq!(d.entries[0].to_string(), "[unparsable-start-time] prep/1: \"soon\"");
    }
}
