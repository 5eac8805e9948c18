//! Fatal conversion errors.
//!
//! Any of these aborts the conversion; no graph is returned. Recoverable data
//! quality defects go through [`crate::diagnostics`] instead.

use std::fmt;

/// Directory a failed lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Person directory.
    Researcher,
    /// Institution directory.
    Institution,
    /// Manufacturer directory.
    Manufacturer,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LookupKind::Researcher => "researcher",
            LookupKind::Institution => "institution",
            LookupKind::Manufacturer => "manufacturer",
        })
    }
}

/// A fatal conversion error.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The document does not have the expected section/stage/table structure.
    #[error("structural error: {0}")]
    Structural(String),

    /// A name was not found in a static directory.
    #[error("unresolved {kind} lookup: \"{name}\"")]
    UnresolvedLookup {
        /// Directory searched.
        kind: LookupKind,
        /// Name as searched.
        name: String,
    },

    /// A quantity pattern matched but its unit token is not recognized.
    #[error("unknown unit \"{unit}\" in {quantity} \"{text}\"")]
    UnknownUnit {
        /// Quantity shape name.
        quantity: &'static str,
        /// Unit token as written.
        unit: String,
        /// Matched text.
        text: String,
    },

    /// A mixture fragment has a different number of percentages than items.
    #[error(
        "composition mismatch: {items} item(s) but {percentages} percentage(s) in \"{fragment}\""
    )]
    CompositionMismatch {
        /// Fragment text.
        fragment: String,
        /// Referenced item count.
        items: usize,
        /// Percentage token count.
        percentages: usize,
    },

    /// An input record carries a timestamp that is not `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp in {field}: \"{value}\"")]
    InvalidTimestamp {
        /// Record field.
        field: String,
        /// Offending value.
        value: String,
    },

    /// A built-in pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ConvertError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        ConvertError::Structural(message.into())
    }
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, ConvertError>;
