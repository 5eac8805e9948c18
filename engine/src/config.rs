//! Engine configuration.
//!
//! Site-specific directories (people, institutions, tag templates) and the
//! identifier namespace come from a TOML file. Built-in vocabulary tables can
//! be extended from the same file; extensions are appended after the built-in
//! entries so they never change what an existing phrase or key resolves to.
//!
//! ```toml
//! [namespace]
//! base = "https://example.org/eln"
//!
//! [[institutions]]
//! key = "uni"
//! name = "Example University"
//!
//! [[persons]]
//! key = "jane doe"
//! given_name = "Jane"
//! family_name = "Doe"
//! affiliation = "uni"
//!
//! [[templates]]
//! tag = "ca-imaging"
//! ```

use std::collections::BTreeMap;

use eln_vocab::{ApproachVariant, FixedStage, QuantityShape, Vocabulary};
use serde::Deserialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file is not valid TOML or does not match the schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A person names an institution that is not configured.
    #[error("person \"{person}\" is affiliated with unknown institution \"{institution}\"")]
    UnknownAffiliation {
        /// Person key.
        person: String,
        /// Affiliation key.
        institution: String,
    },

    /// Two entries of one directory normalize to the same key.
    #[error("duplicate {directory} key \"{key}\"")]
    DuplicateKey {
        /// Directory name.
        directory: &'static str,
        /// Normalized key.
        key: String,
    },

    /// The namespace base is not an absolute IRI.
    #[error("namespace base \"{0}\" is not an absolute IRI")]
    InvalidNamespace(String),
}

/// Raw configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Identifier namespace.
    pub namespace: NamespaceConfig,
    /// Person directory.
    #[serde(default)]
    pub persons: Vec<PersonConfig>,
    /// Institution directory.
    #[serde(default)]
    pub institutions: Vec<InstitutionConfig>,
    /// Tag-to-template directory.
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
    /// Names replaced in experiment bodies before parsing.
    #[serde(default)]
    pub pseudonymize: PseudonymizeConfig,
    /// Package license override.
    #[serde(default)]
    pub license: Option<LicenseConfig>,
    /// Additional activity phrases.
    #[serde(default)]
    pub activities: Vec<ActivityConfig>,
    /// Additional manufacturers.
    #[serde(default)]
    pub manufacturers: Vec<ManufacturerConfig>,
    /// Additional content types.
    #[serde(default)]
    pub mime_types: Vec<MimeTypeConfig>,
}

/// `[namespace]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamespaceConfig {
    /// Base IRI of the general namespace (no trailing slash needed).
    pub base: String,
}

/// `[[persons]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonConfig {
    /// Lookup key, usually the lower-case full name.
    pub key: String,
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// E-mail address.
    #[serde(default)]
    pub email: Option<String>,
    /// ORCID IRI; replaces the minted identifier.
    #[serde(default)]
    pub orcid: Option<String>,
    /// Institution key.
    pub affiliation: String,
}

/// `[[institutions]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionConfig {
    /// Lookup key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// ROR IRI; replaces the minted identifier.
    #[serde(default)]
    pub ror: Option<String>,
}

/// `[[templates]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Experiment tag (matched case-insensitively).
    pub tag: String,
    /// Display name; defaults to the tag.
    #[serde(default)]
    pub name: Option<String>,
}

/// `[pseudonymize]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PseudonymizeConfig {
    /// Names replaced by `Anonymous Person<n>`, in order.
    #[serde(default)]
    pub names: Vec<String>,
}

/// `[license]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseConfig {
    /// License IRI.
    pub id: String,
    /// License name.
    pub name: String,
    /// One-sentence description.
    pub description: String,
}

/// `[[activities]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityConfig {
    /// Phrase searched for (lower-cased on load).
    pub phrase: String,
    /// Class IRI.
    pub class: String,
}

/// `[[manufacturers]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ManufacturerConfig {
    /// Match key (lower-cased on load).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Public identifier.
    #[serde(default)]
    pub id: Option<String>,
}

/// `[[mime_types]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct MimeTypeConfig {
    /// Extension including the dot.
    pub extension: String,
    /// IANA media type.
    pub content_type: String,
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Builds the lookup directories over the built-in vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAffiliation`] for a person whose
    /// affiliation is not configured, [`ConfigError::DuplicateKey`] for
    /// colliding keys and [`ConfigError::InvalidNamespace`] for a relative base.
    pub fn directories(&self) -> Result<Directories, ConfigError> {
        Directories::build(self, Vocabulary::builtin())
    }
}

/// A person directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Key as configured; minted identifiers derive from it.
    pub key: String,
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// E-mail address.
    pub email: Option<String>,
    /// ORCID IRI.
    pub orcid: Option<String>,
    /// Normalized institution key.
    pub affiliation: String,
}

/// An institution directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    /// Key as configured.
    pub key: String,
    /// Display name.
    pub name: String,
    /// ROR IRI.
    pub ror: Option<String>,
}

/// An activity phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    /// Lower-case phrase.
    pub phrase: String,
    /// Class IRI.
    pub class: String,
}

/// A manufacturer directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerEntry {
    /// Lower-case match key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Public identifier.
    pub id: Option<String>,
}

/// The package license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseEntry {
    /// License IRI.
    pub id: String,
    /// Name.
    pub name: String,
    /// Description.
    pub description: String,
}

/// Every lookup table the engine consumes, built-in and configured.
#[derive(Debug, Clone)]
pub struct Directories {
    /// Base IRI of the general namespace.
    pub base: String,
    persons: BTreeMap<String, Person>,
    institutions: BTreeMap<String, Institution>,
    templates: BTreeMap<String, String>,
    /// Activity phrases in table order.
    pub activities: Vec<ActivityEntry>,
    /// Manufacturers in match order.
    pub manufacturers: Vec<ManufacturerEntry>,
    mime_types: BTreeMap<String, String>,
    /// Stages matched by heading equality.
    pub fixed_stages: &'static [FixedStage],
    /// Marker of numbered approach stages.
    pub approach_marker: &'static str,
    /// Approach variants in match order.
    pub approach_variants: &'static [ApproachVariant],
    /// Quantity shapes.
    pub quantities: &'static [QuantityShape],
    /// Package license.
    pub license: LicenseEntry,
    /// Names to pseudonymize.
    pub pseudonymize: Vec<String>,
}

impl Directories {
    /// Builds directories from configuration over `vocab`.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::directories`].
    pub fn build(config: &EngineConfig, vocab: &Vocabulary) -> Result<Self, ConfigError> {
        let base = config.namespace.base.trim_end_matches('/').to_owned();
        if url::Url::parse(&base).is_err() {
            return Err(ConfigError::InvalidNamespace(config.namespace.base.clone()));
        }

        let mut institutions = BTreeMap::new();
        for inst in &config.institutions {
            let key = normalize_name(&inst.key);
            let entry = Institution {
                key: inst.key.clone(),
                name: inst.name.clone(),
                ror: inst.ror.clone().filter(|r| !r.is_empty()),
            };
            if institutions.insert(key.clone(), entry).is_some() {
                return Err(ConfigError::DuplicateKey { directory: "institution", key });
            }
        }

        let mut persons = BTreeMap::new();
        for p in &config.persons {
            let affiliation = normalize_name(&p.affiliation);
            if !institutions.contains_key(&affiliation) {
                return Err(ConfigError::UnknownAffiliation {
                    person: p.key.clone(),
                    institution: p.affiliation.clone(),
                });
            }
            let key = normalize_name(&p.key);
            let entry = Person {
                key: p.key.to_lowercase(),
                given_name: p.given_name.clone(),
                family_name: p.family_name.clone(),
                email: p.email.clone().filter(|e| !e.is_empty()),
                orcid: p.orcid.clone().filter(|o| !o.is_empty()),
                affiliation,
            };
            if persons.insert(key.clone(), entry).is_some() {
                return Err(ConfigError::DuplicateKey { directory: "person", key });
            }
        }

        let templates = config
            .templates
            .iter()
            .map(|t| {
                let tag = t.tag.to_lowercase();
                let name = t.name.clone().unwrap_or_else(|| t.tag.clone());
                (tag, name)
            })
            .collect();

        let activities = vocab
            .activities
            .iter()
            .map(|a| ActivityEntry {
                phrase: a.phrase.to_owned(),
                class: a.class.to_owned(),
            })
            .chain(config.activities.iter().map(|a| ActivityEntry {
                phrase: a.phrase.to_lowercase(),
                class: a.class.clone(),
            }))
            .collect();

        let manufacturers = vocab
            .manufacturers
            .iter()
            .map(|m| ManufacturerEntry {
                key: m.key.to_owned(),
                name: m.name.to_owned(),
                id: m.id.map(str::to_owned),
            })
            .chain(config.manufacturers.iter().map(|m| ManufacturerEntry {
                key: m.key.to_lowercase(),
                name: m.name.clone(),
                id: m.id.clone().filter(|i| !i.is_empty()),
            }))
            .collect();

        let mut mime_types: BTreeMap<String, String> = BTreeMap::new();
        for m in vocab.mime_types {
            mime_types.insert(m.extension.to_owned(), m.content_type.to_owned());
        }
        for m in &config.mime_types {
            mime_types
                .entry(m.extension.to_ascii_lowercase())
                .or_insert_with(|| m.content_type.clone());
        }

        let license = match &config.license {
            Some(l) => LicenseEntry {
                id: l.id.clone(),
                name: l.name.clone(),
                description: l.description.clone(),
            },
            None => LicenseEntry {
                id: vocab.license.id.to_owned(),
                name: vocab.license.name.to_owned(),
                description: vocab.license.description.to_owned(),
            },
        };

        Ok(Self {
            base,
            persons,
            institutions,
            templates,
            activities,
            manufacturers,
            mime_types,
            fixed_stages: vocab.fixed_stages,
            approach_marker: vocab.approach_marker,
            approach_variants: vocab.approach_variants,
            quantities: vocab.quantities,
            license,
            pseudonymize: config.pseudonymize.names.clone(),
        })
    }

    /// Looks up a person by name (normalized before lookup).
    #[must_use]
    pub fn person(&self, name: &str) -> Option<&Person> {
        self.persons.get(&normalize_name(name))
    }

    /// Looks up an institution by key (normalized before lookup).
    #[must_use]
    pub fn institution(&self, key: &str) -> Option<&Institution> {
        self.institutions.get(&normalize_name(key))
    }

    /// Looks up a template name by tag, ignoring case.
    #[must_use]
    pub fn template(&self, tag: &str) -> Option<&str> {
        self.templates.get(&tag.to_lowercase()).map(String::as_str)
    }

    /// First manufacturer whose key is contained in the lower-cased `text`.
    #[must_use]
    pub fn manufacturer(&self, text: &str) -> Option<&ManufacturerEntry> {
        let text = text.to_lowercase();
        self.manufacturers.iter().find(|m| text.contains(&m.key))
    }

    /// Content type of a file extension (including the dot), ignoring case.
    #[must_use]
    pub fn content_type(&self, extension: &str) -> Option<&str> {
        self.mime_types
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The fixed stage whose heading equals `normalized`.
    #[must_use]
    pub fn fixed_stage(&self, normalized: &str) -> Option<&'static FixedStage> {
        self.fixed_stages.iter().find(|s| s.heading == normalized)
    }
}

/// Lower-cases, folds diacritics and collapses whitespace.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[namespace]
base = "https://example.org/eln/"

[[institutions]]
key = "uni"
name = "Example University"
ror = "https://ror.org/000000000"

[[persons]]
key = "Jörg Müller"
given_name = "Jörg"
family_name = "Müller"
affiliation = "uni"

[[templates]]
tag = "Ca-Imaging"

[[manufacturers]]
key = "Acme Labs"
name = "Acme Laboratories"

[[mime_types]]
extension = ".LIF"
content_type = "application/x-leica-lif"
"#;

    fn directories() -> Directories {
        EngineConfig::from_toml_str(CONFIG).unwrap().directories().unwrap()
    }

    #[test]
    fn person_lookup_folds_case_and_diacritics() {
        let dirs = directories();
        let person = dirs.person("jorg   muller").unwrap();
        assert_eq!(person.key, "jörg müller");
        assert_eq!(dirs.institution(&person.affiliation).map(|i| i.name.as_str()),
            Some("Example University"));
        assert!(dirs.person("jane doe").is_none());
    }

    #[test]
    fn base_is_trimmed() {
        assert_eq!(directories().base, "https://example.org/eln");
    }

    #[test]
    fn templates_ignore_case() {
        let dirs = directories();
        assert_eq!(dirs.template("ca-imaging"), Some("Ca-Imaging"));
        assert_eq!(dirs.template("CA-IMAGING"), Some("Ca-Imaging"));
    }

    #[test]
    fn extensions_follow_builtin_tables() {
        let dirs = directories();
        let builtin = Vocabulary::builtin();
        assert_eq!(dirs.activities.len(), builtin.activities.len());
        assert_eq!(dirs.manufacturers.len(), builtin.manufacturers.len() + 1);
        assert_eq!(dirs.manufacturer("made by ACME LABS inc").map(|m| m.name.as_str()),
            Some("Acme Laboratories"));
        assert_eq!(dirs.content_type(".lif"), Some("application/x-leica-lif"));
        assert_eq!(dirs.content_type(".CSV"), Some("text/csv"));
    }

    #[test]
    fn unknown_affiliation_is_rejected() {
        let text = r#"
[namespace]
base = "https://example.org/eln"

[[persons]]
key = "jane doe"
given_name = "Jane"
family_name = "Doe"
affiliation = "nowhere"
"#;
        let err = EngineConfig::from_toml_str(text).unwrap().directories().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAffiliation { .. }));
    }

    #[test]
    fn relative_base_is_rejected() {
        let config = EngineConfig::from_toml_str("[namespace]\nbase = \"eln\"\n").unwrap();
        assert!(matches!(config.directories(), Err(ConfigError::InvalidNamespace(_))));
    }

    #[test]
    fn default_license_is_builtin() {
        assert!(directories().license.id.contains("creativecommons.org"));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use super::*;

    /// Directories used by component unit tests.
    pub(crate) fn directories() -> Directories {
        let text = r#"
[namespace]
base = "https://example.org/eln"

[[institutions]]
key = "uni"
name = "Example University"

[[persons]]
key = "jane doe"
given_name = "Jane"
family_name = "Doe"
email = "jane@example.org"
affiliation = "uni"

[[persons]]
key = "john roe"
given_name = "John"
family_name = "Roe"
orcid = "https://orcid.org/0000-0002-1825-0097"
affiliation = "uni"

[[templates]]
tag = "ca-imaging"
"#;
        EngineConfig::from_toml_str(text).unwrap().directories().unwrap()
    }
}
