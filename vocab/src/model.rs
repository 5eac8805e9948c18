//! Core vocabulary model types.
//!
//! These types describe the controlled vocabularies consumed by the protocol
//! modeling engine as typed Rust data. All tables are `'static` slices kept in
//! source order; where order matters (first match wins) the table documents it.
//! The top-level entry point is [`Vocabulary::builtin()`](crate::Vocabulary::builtin).

/// One phrase of the activity vocabulary.
///
/// A step description is classified by loose substring containment of
/// `phrase` in the lower-cased description text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityPhrase {
    /// Lower-case phrase searched for (e.g., `"centrifugate"`).
    pub phrase: &'static str,
    /// Full IRI of the ontology class the phrase denotes.
    pub class: &'static str,
    /// Human-readable label of the ontology class.
    pub label: &'static str,
}

/// A supplier, manufacturer or developer of catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manufacturer {
    /// Lower-case key matched by substring against free text.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Public identifier that replaces a generated one, if any.
    pub id: Option<&'static str>,
}

/// A fixed protocol stage matched by equality on the normalized heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStage {
    /// Normalized (lower-case, trimmed) heading text.
    pub heading: &'static str,
    /// Section key used to mint the section identifier.
    pub key: &'static str,
    /// Section title recorded as the section description.
    pub title: &'static str,
    /// Name of the associated section template.
    pub template: &'static str,
}

/// A variant of the numbered "approach" stage.
///
/// Variants are evaluated in table order; the first whose marker is contained
/// in the normalized heading wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproachVariant {
    /// Marker searched for in the normalized heading.
    pub marker: &'static str,
    /// Suffix appended to `approach_<n>_` to form the section key.
    pub suffix: &'static str,
    /// Name of the associated section template.
    pub template: &'static str,
}

/// Lexical datatype of an extracted numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericDatatype {
    /// `xsd:decimal`.
    Decimal,
    /// `xsd:nonNegativeInteger`.
    NonNegativeInteger,
}

impl NumericDatatype {
    /// Returns the full XSD datatype IRI.
    #[must_use]
    pub fn iri(self) -> &'static str {
        match self {
            NumericDatatype::Decimal => iris::XSD_DECIMAL,
            NumericDatatype::NonNegativeInteger => iris::XSD_NON_NEGATIVE_INTEGER,
        }
    }
}

/// A recognized unit token of a quantity shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Exact token as written after the number (e.g., `"min"`).
    pub token: &'static str,
    /// Full IRI of the unit in the Units of Measurement ontology.
    pub iri: &'static str,
    /// Human-readable unit label.
    pub label: &'static str,
}

/// One recognized physical-quantity shape.
///
/// `pattern` is a regular expression with two named groups: `value` (the
/// signed decimal token) and `unit` (the unit token resolved against `units`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityShape {
    /// Short name of the quantity (e.g., `"temperature"`).
    pub name: &'static str,
    /// Full IRI of the value-specification class.
    pub class: &'static str,
    /// Regular expression matching one mention.
    pub pattern: &'static str,
    /// Recognized unit tokens.
    pub units: &'static [Unit],
    /// Datatype of the numeric value literal.
    pub datatype: NumericDatatype,
}

impl QuantityShape {
    /// Resolves a unit token against this shape's unit table.
    #[must_use]
    pub fn unit(&self, token: &str) -> Option<&'static Unit> {
        self.units.iter().find(|u| u.token == token)
    }
}

/// A file-extension to content-type mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeType {
    /// Lower-case extension including the leading dot (e.g., `".csv"`).
    pub extension: &'static str,
    /// IANA media type.
    pub content_type: &'static str,
}

/// A license applied to the research-data package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct License {
    /// License IRI, also used as its identifier.
    pub id: &'static str,
    /// License name.
    pub name: &'static str,
    /// One-sentence description.
    pub description: &'static str,
}

/// The complete built-in vocabulary.
#[derive(Debug)]
pub struct Vocabulary {
    /// Activity phrases in table order.
    pub activities: &'static [ActivityPhrase],
    /// Manufacturers in match order.
    pub manufacturers: &'static [Manufacturer],
    /// Stages matched by heading equality.
    pub fixed_stages: &'static [FixedStage],
    /// Marker that turns a heading into a numbered approach stage.
    pub approach_marker: &'static str,
    /// Approach variants in match order.
    pub approach_variants: &'static [ApproachVariant],
    /// Quantity shapes.
    pub quantities: &'static [QuantityShape],
    /// Content types by extension.
    pub mime_types: &'static [MimeType],
    /// Default package license.
    pub license: License,
}

impl Vocabulary {
    /// Looks up a content type by file extension (including the dot), ignoring case.
    #[must_use]
    pub fn content_type(&self, extension: &str) -> Option<&'static str> {
        let extension = extension.to_ascii_lowercase();
        self.mime_types
            .iter()
            .find(|m| m.extension == extension)
            .map(|m| m.content_type)
    }

    /// Returns the fixed stage whose heading equals `normalized`, if any.
    #[must_use]
    pub fn fixed_stage(&self, normalized: &str) -> Option<&'static FixedStage> {
        self.fixed_stages.iter().find(|s| s.heading == normalized)
    }
}

/// Standard IRI constants used across the vocabulary and the engine.
pub mod iris {
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// FOAF namespace.
    pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
    /// W3C PROV-O namespace.
    pub const PROV: &str = "http://www.w3.org/ns/prov#";
    /// schema.org namespace, as mapped by the RO-Crate 1.1 context.
    pub const SCHEMA: &str = "http://schema.org/";
    /// OBO Foundry PURL namespace.
    pub const OBO: &str = "http://purl.obolibrary.org/obo/";
    /// Wikidata entity namespace.
    pub const WD: &str = "https://www.wikidata.org/entity/";
    /// Custom relations with no counterpart in the public vocabularies.
    pub const ELN: &str = "https://w3id.org/eln2crate/terms#";

    /// RO-Crate 1.1 specification IRI.
    pub const RO_CRATE_SPEC: &str = "https://w3id.org/ro/crate/1.1";
    /// RO-Crate 1.1 JSON-LD context.
    pub const RO_CRATE_CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";
    /// Identifier of the RO-Crate metadata descriptor.
    pub const RO_CRATE_METADATA: &str = "ro-crate-metadata.json";
    /// Identifier of the RO-Crate root dataset.
    pub const RO_CRATE_ROOT: &str = "./";

    // RDF / RDFS / OWL terms
    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `owl:sameAs`.
    pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";

    // FOAF terms
    /// `foaf:name`.
    pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
    /// `foaf:givenName`.
    pub const FOAF_GIVEN_NAME: &str = "http://xmlns.com/foaf/0.1/givenName";
    /// `foaf:familyName`.
    pub const FOAF_FAMILY_NAME: &str = "http://xmlns.com/foaf/0.1/familyName";

    // PROV-O terms
    /// `prov:Activity`.
    pub const PROV_ACTIVITY: &str = "http://www.w3.org/ns/prov#Activity";
    /// `prov:Person`.
    pub const PROV_PERSON: &str = "http://www.w3.org/ns/prov#Person";
    /// `prov:Organization`.
    pub const PROV_ORGANIZATION: &str = "http://www.w3.org/ns/prov#Organization";
    /// `prov:Plan`.
    pub const PROV_PLAN: &str = "http://www.w3.org/ns/prov#Plan";
    /// `prov:Association`.
    pub const PROV_ASSOCIATION: &str = "http://www.w3.org/ns/prov#Association";
    /// `prov:qualifiedAssociation`.
    pub const PROV_QUALIFIED_ASSOCIATION: &str = "http://www.w3.org/ns/prov#qualifiedAssociation";
    /// `prov:hadPlan`.
    pub const PROV_HAD_PLAN: &str = "http://www.w3.org/ns/prov#hadPlan";
    /// `prov:agent`.
    pub const PROV_AGENT: &str = "http://www.w3.org/ns/prov#agent";
    /// `prov:used`.
    pub const PROV_USED: &str = "http://www.w3.org/ns/prov#used";
    /// `prov:wasInformedBy`.
    pub const PROV_WAS_INFORMED_BY: &str = "http://www.w3.org/ns/prov#wasInformedBy";
    /// `prov:wasGeneratedBy`.
    pub const PROV_WAS_GENERATED_BY: &str = "http://www.w3.org/ns/prov#wasGeneratedBy";
    /// `prov:wasAttributedTo`.
    pub const PROV_WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";
    /// `prov:value`.
    pub const PROV_VALUE: &str = "http://www.w3.org/ns/prov#value";

    // schema.org terms
    /// `schema:Action`.
    pub const SCHEMA_ACTION: &str = "http://schema.org/Action";
    /// `schema:Dataset`.
    pub const SCHEMA_DATASET: &str = "http://schema.org/Dataset";
    /// `schema:CreativeWork`.
    pub const SCHEMA_CREATIVE_WORK: &str = "http://schema.org/CreativeWork";
    /// `schema:MediaObject`, the RO-Crate `File` type.
    pub const SCHEMA_FILE: &str = "http://schema.org/MediaObject";
    /// `schema:IndividualProduct`.
    pub const SCHEMA_INDIVIDUAL_PRODUCT: &str = "http://schema.org/IndividualProduct";
    /// `schema:hasPart`.
    pub const SCHEMA_HAS_PART: &str = "http://schema.org/hasPart";
    /// `schema:description`.
    pub const SCHEMA_DESCRIPTION: &str = "http://schema.org/description";
    /// `schema:startTime`.
    pub const SCHEMA_START_TIME: &str = "http://schema.org/startTime";
    /// `schema:dateModified`.
    pub const SCHEMA_DATE_MODIFIED: &str = "http://schema.org/dateModified";
    /// `schema:datePublished`.
    pub const SCHEMA_DATE_PUBLISHED: &str = "http://schema.org/datePublished";
    /// `schema:name`.
    pub const SCHEMA_NAME: &str = "http://schema.org/name";
    /// `schema:keywords`.
    pub const SCHEMA_KEYWORDS: &str = "http://schema.org/keywords";
    /// `schema:creator`.
    pub const SCHEMA_CREATOR: &str = "http://schema.org/creator";
    /// `schema:license`.
    pub const SCHEMA_LICENSE: &str = "http://schema.org/license";
    /// `schema:identifier`.
    pub const SCHEMA_IDENTIFIER: &str = "http://schema.org/identifier";
    /// `schema:about`.
    pub const SCHEMA_ABOUT: &str = "http://schema.org/about";
    /// `dct:conformsTo` as exposed by the RO-Crate context.
    pub const SCHEMA_CONFORMS_TO: &str = "http://purl.org/dc/terms/conformsTo";
    /// `schema:encodingFormat`.
    pub const SCHEMA_ENCODING_FORMAT: &str = "http://schema.org/encodingFormat";
    /// `schema:contentSize`.
    pub const SCHEMA_CONTENT_SIZE: &str = "http://schema.org/contentSize";
    /// `schema:email`.
    pub const SCHEMA_EMAIL: &str = "http://schema.org/email";
    /// `schema:affiliation`.
    pub const SCHEMA_AFFILIATION: &str = "http://schema.org/affiliation";

    // OBO classes and relations
    /// BFO `process`.
    pub const BFO_PROCESS: &str = "http://purl.obolibrary.org/obo/BFO_0000015";
    /// IAO `objective specification`.
    pub const IAO_OBJECTIVE_SPECIFICATION: &str = "http://purl.obolibrary.org/obo/IAO_0000005";
    /// IAO `has measurement unit label`.
    pub const IAO_HAS_MEASUREMENT_UNIT_LABEL: &str = "http://purl.obolibrary.org/obo/IAO_0000039";
    /// OBI `achieves planned objective`.
    pub const OBI_ACHIEVES_PLANNED_OBJECTIVE: &str = "http://purl.obolibrary.org/obo/OBI_0000417";
    /// OBI `has value specification`.
    pub const OBI_HAS_VALUE_SPECIFICATION: &str = "http://purl.obolibrary.org/obo/OBI_0001938";
    /// OBI `has supplier`.
    pub const OBI_HAS_SUPPLIER: &str = "http://purl.obolibrary.org/obo/OBI_0000647";
    /// OBI `manufacturer`.
    pub const OBI_MANUFACTURER: &str = "http://purl.obolibrary.org/obo/OBI_0000835";
    /// OBI `has_specified_input`.
    pub const OBI_HAS_SPECIFIED_INPUT: &str = "http://purl.obolibrary.org/obo/OBI_0000293";
    /// OBI `has_specified_output`.
    pub const OBI_HAS_SPECIFIED_OUTPUT: &str = "http://purl.obolibrary.org/obo/OBI_0000299";
    /// OBI `mixture` (material entity made by combining ingredients).
    pub const OBI_MIXTURE: &str = "http://purl.obolibrary.org/obo/OBI_0302729";
    /// OBI `material combination objective`.
    pub const OBI_MATERIAL_COMBINATION_OBJECTIVE: &str =
        "http://purl.obolibrary.org/obo/OBI_0000686";
    /// OBI `creating a mixture`.
    pub const OBI_CREATING_A_MIXTURE: &str = "http://purl.obolibrary.org/obo/OBI_0000685";

    // Custom relations
    /// Links a node to the exported file describing it.
    pub const ELN_HAS_FILE: &str = "https://w3id.org/eln2crate/terms#hasFile";
    /// Lot number of an item instance.
    pub const ELN_HAS_LOT_NUMBER: &str = "https://w3id.org/eln2crate/terms#hasLotNumber";
    /// Passage number of an item instance.
    pub const ELN_HAS_PASSAGE_NUMBER: &str = "https://w3id.org/eln2crate/terms#hasPassageNumber";
    /// Back-edge from an item instance to its catalog item.
    pub const ELN_IS_INSTANCE_OF: &str = "https://w3id.org/eln2crate/terms#isInstanceOf";
    /// Supplier-assigned identifier of a catalog item.
    pub const ELN_HAS_SUPPLIER_ID: &str = "https://w3id.org/eln2crate/terms#hasSupplierId";
    /// Whether the experiment was categorized as a success.
    pub const ELN_EXPERIMENT_SUCCESS: &str = "https://w3id.org/eln2crate/terms#experimentSuccess";
    /// SHA-512 checksum reported by file identification.
    pub const ELN_SHA512: &str = "https://w3id.org/eln2crate/terms#sha512";

    // XSD datatypes
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:nonNegativeInteger`.
    pub const XSD_NON_NEGATIVE_INTEGER: &str =
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    /// `xsd:dateTime`.
    pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// `xsd:time`.
    pub const XSD_TIME: &str = "http://www.w3.org/2001/XMLSchema#time";
}
