//! Deterministic identifier minting.
//!
//! Every identity in the graph is a pure function of a semantic key inside one
//! of two namespaces: the *general* namespace shared by all experiments of a
//! notebook (people, institutions, manufacturers, catalog items, templates)
//! and the *protocol* namespace of one experiment (sections, steps, mixtures,
//! the objective). An external identifier found in the input record (ORCID,
//! ROR, supplier IRI) always wins over a minted one.

use crate::graph::Iri;

/// Namespace an identifier is minted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Shared across experiments.
    General,
    /// Scoped to the experiment being converted.
    Protocol,
}

/// Mints identifiers for one experiment.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    general: String,
    protocol: String,
}

impl IdGenerator {
    /// Creates a generator for `experiment_id` under `base` (no trailing slash needed).
    #[must_use]
    pub fn new(base: &str, experiment_id: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            general: format!("{base}/"),
            protocol: format!("{base}/{experiment_id}/"),
        }
    }

    /// The general namespace IRI (with trailing slash).
    #[must_use]
    pub fn general_namespace(&self) -> &str {
        &self.general
    }

    /// The protocol namespace IRI (with trailing slash).
    #[must_use]
    pub fn protocol_namespace(&self) -> &str {
        &self.protocol
    }

    /// Mints the identifier for `key` in `scope`, unless `external` overrides it.
    #[must_use]
    pub fn mint(&self, scope: Scope, key: &str, external: Option<&str>) -> Iri {
        if let Some(external) = external.filter(|e| !e.is_empty()) {
            return Iri::new(external);
        }
        let ns = match scope {
            Scope::General => &self.general,
            Scope::Protocol => &self.protocol,
        };
        Iri::new(format!("{ns}{key}"))
    }

    /// A researcher, keyed by directory key.
    #[must_use]
    pub fn researcher(&self, key: &str, orcid: Option<&str>) -> Iri {
        let key = transliterate(&key.replace(' ', "_"));
        self.mint(Scope::General, &format!("researcher/{key}"), orcid)
    }

    /// An institution, keyed by directory key.
    #[must_use]
    pub fn institution(&self, key: &str, ror: Option<&str>) -> Iri {
        self.mint(Scope::General, &format!("institution/{key}"), ror)
    }

    /// A manufacturer, keyed by directory key.
    #[must_use]
    pub fn manufacturer(&self, key: &str, external: Option<&str>) -> Iri {
        let key = key.replace(' ', "_");
        self.mint(Scope::General, &format!("manufacturer/{key}"), external)
    }

    /// The generic node of a catalog item.
    #[must_use]
    pub fn database_item(&self, item_id: &str) -> Iri {
        self.mint(Scope::General, &format!("database/{item_id}"), None)
    }

    /// A lot- and optionally passage-specific instance of a catalog item.
    #[must_use]
    pub fn item_instance(&self, item_id: &str, lot: &str, passage: Option<&str>) -> Iri {
        let key = match passage {
            Some(passage) => format!("database/{item_id}/lot/{lot}/passage/{passage}"),
            None => format!("database/{item_id}/lot/{lot}"),
        };
        self.mint(Scope::General, &key, None)
    }

    /// A top-level or section template.
    #[must_use]
    pub fn template(&self, key: &str) -> Iri {
        self.mint(Scope::General, &format!("template/{key}"), None)
    }

    /// A file inside the package, by package-relative path.
    ///
    /// Each path segment is percent-encoded; `/` separators are kept.
    #[must_use]
    pub fn file(&self, path: &str) -> Iri {
        let segments: Vec<_> = path.split('/').map(urlencoding::encode).collect();
        Iri::new(segments.join("/"))
    }

    /// The experiment's objective. There is at most one per experiment.
    #[must_use]
    pub fn objective(&self) -> Iri {
        self.mint(Scope::Protocol, "objective", None)
    }

    /// The top-level protocol activity.
    #[must_use]
    pub fn protocol(&self) -> Iri {
        self.mint(Scope::Protocol, "protocol", None)
    }

    /// A protocol section (stage).
    #[must_use]
    pub fn section(&self, section: &str) -> Iri {
        self.mint(Scope::Protocol, section, None)
    }

    /// The `number`-th step (1-based) of a section.
    #[must_use]
    pub fn step(&self, section: &str, number: usize) -> Iri {
        self.mint(Scope::Protocol, &format!("{section}/{number}"), None)
    }

    /// The `number`-th mixture instance of a composition.
    #[must_use]
    pub fn mixture(&self, composition: &str, number: usize) -> Iri {
        self.mint(Scope::Protocol, &format!("mixture/{composition}/{number}"), None)
    }

    /// The activity creating the `number`-th mixture instance of a composition.
    #[must_use]
    pub fn mixture_creating(&self, composition: &str, number: usize) -> Iri {
        self.mint(
            Scope::Protocol,
            &format!("mixture/{composition}/{number}/creating"),
            None,
        )
    }

    /// The `number`-th plan of a composition.
    #[must_use]
    pub fn mixture_plan(&self, composition: &str, number: usize) -> Iri {
        self.mint(
            Scope::Protocol,
            &format!("mixture/{composition}/plan/{number}"),
            None,
        )
    }
}

fn transliterate(key: &str) -> String {
    key.replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss")
}
