//! Per-conversion modeling context.
//!
//! Every component receives the context explicitly and writes into its graph.
//! A context lives for exactly one experiment; nothing survives it.

use crate::config::Directories;
use crate::diagnostics::Diagnostics;
use crate::graph::Graph;
use crate::ids::IdGenerator;
use crate::input::Catalog;

/// Graph under construction plus everything needed to extend it.
#[derive(Debug)]
pub struct ModelContext<'a> {
    /// The graph being built.
    pub graph: Graph,
    /// Identifier minting for this experiment.
    pub ids: IdGenerator,
    /// Lookup tables.
    pub directories: &'a Directories,
    /// Catalog items linked to the experiment.
    pub catalog: &'a Catalog,
    /// Recoverable conditions seen so far.
    pub diagnostics: Diagnostics,
}

impl<'a> ModelContext<'a> {
    /// Creates a fresh context for experiment `experiment_id`.
    #[must_use]
    pub fn new(directories: &'a Directories, catalog: &'a Catalog, experiment_id: &str) -> Self {
        Self {
            graph: Graph::new(),
            ids: IdGenerator::new(&directories.base, experiment_id),
            directories,
            catalog,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Consumes the context, returning the graph and diagnostics.
    #[must_use]
    pub fn finish(self) -> (Graph, Diagnostics) {
        (self.graph, self.diagnostics)
    }
}
