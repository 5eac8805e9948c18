//! Protocol knowledge-graph modeling engine.
//!
//! The `eln-engine` crate turns one laboratory-notebook experiment (its HTML
//! body, linked catalog items and package files) into a deterministic
//! provenance graph: typed protocol steps chained in document order, the
//! reagents and mixtures they use, the quantities they state and the people
//! who ran them. The graph renders to RO-Crate JSON-LD, Turtle or N-Triples.
//!
//! # Entry Point
//!
//! ```
//! use eln_engine::{input::FileInventory, Engine, EngineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::from_toml_str(r#"
//!     [namespace]
//!     base = "https://example.org/eln"
//! "#)?;
//! let engine = Engine::new(config.directories()?)?;
//! let experiment = serde_json::from_str(r#"{
//!     "id": 1, "title": "Empty", "category": "Success", "tags": null,
//!     "lastchange": "2021-02-01 10:00:00", "body": "", "links": [], "uploads": []
//! }"#)?;
//! let input = engine.prepare(experiment, Vec::new(), FileInventory::default())?;
//! let conversion = engine.convert(&input)?;
//! let json_ld = conversion.to_json_ld();
//! assert!(json_ld["@graph"].is_array());
//! # Ok(())
//! # }
//! ```
//!
//! Fatal conditions are [`ConvertError`]s and abort the conversion with no
//! graph. Data-quality defects are collected as [`diagnostics::Diagnostics`]
//! and the conversion runs to completion.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod activity;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod graph;
pub mod html;
pub mod ids;
pub mod input;
pub mod package;
pub mod parameters;
pub mod resolver;
pub mod serializer;
pub mod walker;

use std::collections::BTreeSet;

pub use config::{ConfigError, Directories, EngineConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{ConvertError, LookupKind, Result};
pub use graph::{Graph, Iri, Literal, Node, Term, Triple};

use context::ModelContext;
use input::{Catalog, CatalogItem, ConversionInput, Experiment, ExperimentRecord, FileInventory, ItemRecord};
use parameters::ParameterExtractor;
use resolver::EntityResolver;
use walker::ProtocolWalker;

/// The result of one conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The provenance graph.
    pub graph: Graph,
    /// Recoverable conditions met on the way.
    pub diagnostics: Diagnostics,
    /// Protocol namespace of the experiment; relative identifiers resolve against it.
    pub base: String,
}

impl Conversion {
    /// Renders the graph as an RO-Crate JSON-LD document.
    #[must_use]
    pub fn to_json_ld(&self) -> serde_json::Value {
        serializer::jsonld::to_json_ld(&self.graph)
    }

    /// Renders the graph as N-Triples.
    #[must_use]
    pub fn to_ntriples(&self) -> String {
        serializer::ntriples::to_ntriples(&self.graph, &self.base)
    }

    /// Renders the graph as Turtle.
    #[must_use]
    pub fn to_turtle(&self) -> String {
        serializer::turtle::to_turtle(&self.graph, &self.base)
    }
}

/// Converts experiments with a fixed set of directories.
///
/// An engine holds no per-experiment state; every [`Engine::convert`] call
/// starts from an empty graph.
#[derive(Debug, Clone)]
pub struct Engine {
    directories: Directories,
    parameters: ParameterExtractor,
    resolver: EntityResolver,
}

impl Engine {
    /// Creates an engine over `directories`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Pattern`] if a built-in pattern does not compile.
    pub fn new(directories: Directories) -> Result<Self> {
        Ok(Self {
            parameters: ParameterExtractor::new(directories.quantities)?,
            resolver: EntityResolver::new()?,
            directories,
        })
    }

    /// The directories this engine resolves against.
    #[must_use]
    pub fn directories(&self) -> &Directories {
        &self.directories
    }

    /// Parses export records into conversion input.
    ///
    /// The experiment body is pseudonymized before parsing. Only items the
    /// experiment links are kept; a linked id with no record is logged and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidTimestamp`] if a record carries an
    /// unparsable timestamp.
    pub fn prepare(
        &self,
        experiment: ExperimentRecord,
        items: Vec<ItemRecord>,
        inventory: FileInventory,
    ) -> Result<ConversionInput> {
        let experiment = Experiment::from_record(experiment, &self.directories.pseudonymize)?;
        let linked: BTreeSet<&str> = experiment.item_ids.iter().map(String::as_str).collect();
        let mut found = BTreeSet::new();
        let mut catalog_items = Vec::new();
        for record in items {
            if !linked.contains(record.id.as_str()) {
                tracing::debug!(item = %record.id, "skipping unlinked item");
                continue;
            }
            found.insert(record.id.clone());
            catalog_items.push(CatalogItem::from_record(record)?);
        }
        for id in linked.iter().filter(|id| !found.contains(**id)) {
            tracing::warn!(item = %id, "linked item has no record");
        }
        Ok(ConversionInput {
            catalog: Catalog::new(catalog_items),
            experiment,
            inventory,
        })
    }

    /// Converts one experiment into its provenance graph.
    ///
    /// Catalog items are modeled first so that lot instances clone complete
    /// item descriptions; the protocol walk and the package entities follow.
    ///
    /// # Errors
    ///
    /// Any [`ConvertError`]; no partial graph is returned.
    pub fn convert(&self, input: &ConversionInput) -> Result<Conversion> {
        let experiment = &input.experiment;
        tracing::info!(experiment = %experiment.id, title = %experiment.title, "converting experiment");
        let mut ctx = ModelContext::new(&self.directories, &input.catalog, &experiment.id);

        resolver::model_catalog(&mut ctx)?;
        let researcher = ProtocolWalker::new(&self.parameters, &self.resolver).walk(&mut ctx, experiment)?;
        package::model_package(&mut ctx, experiment, &input.inventory, researcher.as_ref())?;

        let base = ctx.ids.protocol_namespace().to_owned();
        let (graph, diagnostics) = ctx.finish();
        tracing::info!(
            triples = graph.len(),
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            "conversion finished"
        );
        Ok(Conversion {
            graph,
            diagnostics,
            base,
        })
    }
}
