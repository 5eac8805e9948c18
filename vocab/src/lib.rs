//! Controlled vocabularies for laboratory-notebook knowledge graphs.
//!
//! The `eln-vocab` crate provides the static lookup tables consumed by the
//! protocol modeling engine as typed Rust data: activity phrases,
//! manufacturers, protocol stages with their section templates,
//! physical-quantity shapes and content types. The IRI constants of every
//! term the engine emits live in [`iris`].
//!
//! # Entry Point
//!
//! ```
//! let vocab = eln_vocab::Vocabulary::builtin();
//! assert!(!vocab.activities.is_empty());
//! assert_eq!(vocab.content_type(".CSV"), Some("text/csv"));
//! ```
//!
//! Site-specific directories (people, institutions, tag templates) are not
//! part of this crate; they are supplied by configuration.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod activities;
pub mod manufacturers;
pub mod mime_types;
pub mod model;
pub mod quantities;
pub mod stages;

pub use model::{
    iris, ActivityPhrase, ApproachVariant, FixedStage, License, Manufacturer, MimeType,
    NumericDatatype, QuantityShape, Unit, Vocabulary,
};

impl Vocabulary {
    /// Returns the built-in vocabulary.
    #[must_use]
    pub fn builtin() -> &'static Vocabulary {
        static VOCABULARY: std::sync::OnceLock<Vocabulary> = std::sync::OnceLock::new();
        VOCABULARY.get_or_init(|| Vocabulary {
            activities: activities::phrases(),
            manufacturers: manufacturers::directory(),
            fixed_stages: stages::fixed(),
            approach_marker: stages::APPROACH_MARKER,
            approach_variants: stages::approach_variants(),
            quantities: quantities::shapes(),
            mime_types: mime_types::table(),
            license: License {
                id: "https://creativecommons.org/licenses/by/4.0/",
                name: "Attribution 4.0 International (CC BY 4.0)",
                description: "This work is licensed under a Creative Commons Attribution \
                              4.0 International License.",
            },
        })
    }
}
