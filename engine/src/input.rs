//! Input records.
//!
//! The notebook backend exports one JSON record per experiment and per catalog
//! item. These are deserialized as-is ([`ExperimentRecord`], [`ItemRecord`])
//! and then parsed into the forms the engine consumes ([`Experiment`],
//! [`CatalogItem`], [`Catalog`]). The file inventory and the optional
//! identification report describe the package the graph will be shipped in.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::document::Document;
use crate::error::{ConvertError, Result};
use crate::html;

/// Timestamp layout used by the notebook backend.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File name of the identification report inside the package.
pub const IDENTIFICATION_REPORT: &str = "siegfried_output.json";

/// Folder of exported experiment bodies.
pub const PROTOCOL_DIR: &str = "Protocol";

/// Folder of uploaded attachments.
pub const DATA_DIR: &str = "Data";

/// Experiment export as delivered by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentRecord {
    /// Backend id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Title.
    pub title: String,
    /// Category (`Success` marks a successful experiment).
    #[serde(default)]
    pub category: String,
    /// `|`-delimited tags.
    #[serde(default)]
    pub tags: Option<String>,
    /// Last change, `YYYY-MM-DD HH:MM:SS`.
    pub lastchange: String,
    /// HTML body.
    #[serde(default)]
    pub body: String,
    /// Linked catalog items.
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    /// Uploaded attachments.
    #[serde(default)]
    pub uploads: Vec<UploadRecord>,
}

/// A link from an experiment to a catalog item.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRecord {
    /// Linked item id.
    #[serde(deserialize_with = "string_or_number")]
    pub itemid: String,
}

/// Metadata of one uploaded attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRecord {
    /// Backend id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Original file name.
    pub real_name: String,
    /// Upload time, `YYYY-MM-DD HH:MM:SS`.
    pub datetime: String,
}

/// Catalog item export as delivered by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    /// Backend id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Title.
    pub title: String,
    /// Category (e.g., `Chemical`).
    #[serde(default)]
    pub category: String,
    /// Last change, `YYYY-MM-DD HH:MM:SS`.
    pub lastchange: String,
    /// HTML body.
    #[serde(default)]
    pub body: String,
}

fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    })
}

/// An uploaded attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Backend id.
    pub id: String,
    /// Original file name.
    pub real_name: String,
    /// Upload time.
    pub uploaded: NaiveDateTime,
}

/// A parsed experiment.
#[derive(Debug, Clone)]
pub struct Experiment {
    /// Backend id; scopes the protocol namespace.
    pub id: String,
    /// Title.
    pub title: String,
    /// Category.
    pub category: String,
    /// Tags in record order, empty tags dropped.
    pub tags: Vec<String>,
    /// Last change.
    pub last_change: NaiveDateTime,
    /// Parsed body.
    pub document: Document,
    /// Linked item ids in record order.
    pub item_ids: Vec<String>,
    /// Uploaded attachments, ordered by name, upload time and id.
    pub uploads: Vec<Upload>,
}

impl Experiment {
    /// Parses a record, pseudonymizing `names` in the body first.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidTimestamp`] if a timestamp does not parse.
    pub fn from_record(record: ExperimentRecord, names: &[String]) -> Result<Self> {
        let last_change = parse_timestamp("experiment lastchange", &record.lastchange)?;
        let mut uploads = record
            .uploads
            .into_iter()
            .map(|u| {
                Ok(Upload {
                    uploaded: parse_timestamp("upload datetime", &u.datetime)?,
                    id: u.id,
                    real_name: u.real_name,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        uploads.sort_by(|a, b| {
            (&a.real_name, a.uploaded, &a.id).cmp(&(&b.real_name, b.uploaded, &b.id))
        });
        let tags = record
            .tags
            .as_deref()
            .unwrap_or_default()
            .split('|')
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Self {
            document: html::parse_document(&html::pseudonymize(&record.body, names)),
            id: record.id,
            title: record.title,
            category: record.category,
            tags,
            last_change,
            item_ids: record.links.into_iter().map(|l| l.itemid).collect(),
            uploads,
        })
    }

    /// Returns true if the experiment is categorized as a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.category == "Success"
    }

    /// The latest upload named `name`; ties on time go to the greater id.
    #[must_use]
    pub fn latest_upload(&self, name: &str) -> Option<&Upload> {
        self.uploads
            .iter()
            .filter(|u| u.real_name == name)
            .max_by(|a, b| (a.uploaded, &a.id).cmp(&(b.uploaded, &b.id)))
    }

    /// Package path of the exported experiment body.
    #[must_use]
    pub fn export_path(&self) -> String {
        format!("{PROTOCOL_DIR}/{}.html", sanitize_filename(&self.title))
    }
}

/// A parsed catalog item.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    /// Backend id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Category.
    pub category: String,
    /// Last change.
    pub last_change: NaiveDateTime,
    /// Parsed body.
    pub document: Document,
}

impl CatalogItem {
    /// Parses a record.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidTimestamp`] if `lastchange` does not parse.
    pub fn from_record(record: ItemRecord) -> Result<Self> {
        Ok(Self {
            last_change: parse_timestamp("item lastchange", &record.lastchange)?,
            document: html::parse_document(&record.body),
            id: record.id,
            title: record.title,
            category: record.category,
        })
    }

    /// Link target used for this item inside the exported experiment body.
    #[must_use]
    pub fn local_link(&self) -> String {
        format!(
            "Database/{}.html",
            sanitize_filename(&format!("{} - {}", self.category, self.title))
        )
    }

    /// Package path of the exported item body.
    #[must_use]
    pub fn export_path(&self) -> String {
        format!("{PROTOCOL_DIR}/{}", self.local_link())
    }
}

/// The catalog items linked to one experiment.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<String, CatalogItem>,
    by_link: BTreeMap<String, String>,
}

impl Catalog {
    /// Builds a catalog. Input order is irrelevant.
    ///
    /// Items sharing a local link (same category and title) resolve to the
    /// first of them in id order.
    pub fn new(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut catalog = Self::default();
        for item in items {
            catalog.items.insert(item.id.clone(), item);
        }
        for (id, item) in &catalog.items {
            catalog
                .by_link
                .entry(item.local_link())
                .or_insert_with(|| id.clone());
        }
        catalog
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    /// Resolves a hyperlink to the item it points at.
    ///
    /// Both the local export form `Database/<category - title>.html` and the
    /// backend form `database.php?mode=view&id=<id>` are recognized.
    #[must_use]
    pub fn resolve_link(&self, href: &str) -> Option<&CatalogItem> {
        if href.starts_with("Database") {
            return self.by_link.get(href).and_then(|id| self.items.get(id));
        }
        if href.contains("database.php") {
            return query_value(href, "id").and_then(|id| self.items.get(&id));
        }
        None
    }

    /// Iterates over items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Returns the package path of an attachment-download link, if `href` is one.
#[must_use]
pub fn download_path(href: &str) -> Option<String> {
    if !href.starts_with("app/download.php") {
        return None;
    }
    query_value(href, "name").map(|name| format!("{DATA_DIR}/{name}"))
}

fn query_value(href: &str, key: &str) -> Option<String> {
    let base = Url::parse("http://localhost/").ok()?;
    let url = base.join(href).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// One entry of the identification report.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifiedFile {
    /// Path as scanned (possibly absolute).
    pub filename: String,
    /// Size in bytes.
    pub filesize: u64,
    /// SHA-512 checksum, hex.
    #[serde(default)]
    pub sha512: String,
}

/// Output of the file-identification tool.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentificationReport {
    /// Scan time, `YYYY-MM-DDTHH:MM:SSZ`.
    pub scandate: String,
    /// Scanned files.
    #[serde(default)]
    pub files: Vec<IdentifiedFile>,
}

impl IdentificationReport {
    /// Finds the entry for a package-relative path.
    ///
    /// An exact match wins over a suffix match; among several suffix matches
    /// the shortest scanned path, then the smallest, is taken.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&IdentifiedFile> {
        let suffix = format!("/{path}");
        self.files
            .iter()
            .map(|f| (f.filename.replace('\\', "/"), f))
            .filter(|(scanned, _)| scanned == path || scanned.ends_with(&suffix))
            .min_by(|(a, _), (b, _)| (a.len(), a).cmp(&(b.len(), b)))
            .map(|(_, f)| f)
    }

    /// Parses the scan time.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidTimestamp`] if `scandate` does not parse.
    pub fn scanned(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.scandate, "%Y-%m-%dT%H:%M:%SZ").map_err(|_| {
            ConvertError::InvalidTimestamp {
                field: "identification scandate".to_owned(),
                value: self.scandate.clone(),
            }
        })
    }
}

/// The artifacts of the package.
#[derive(Debug, Clone, Default)]
pub struct FileInventory {
    /// Package-relative paths with `/` separators.
    pub files: Vec<String>,
    /// Identification report, if the tool was run.
    pub identification: Option<IdentificationReport>,
}

/// Everything one conversion consumes.
#[derive(Debug, Clone)]
pub struct ConversionInput {
    /// The experiment.
    pub experiment: Experiment,
    /// Its linked catalog items.
    pub catalog: Catalog,
    /// The package artifacts.
    pub inventory: FileInventory,
}

/// Parses a backend timestamp.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidTimestamp`] naming `field` if `value` does not parse.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        ConvertError::InvalidTimestamp {
            field: field.to_owned(),
            value: value.to_owned(),
        }
    })
}

/// Renders a timestamp as an `xsd:dateTime` lexical value.
#[must_use]
pub fn xsd_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Removes characters that are invalid in file names on common platforms.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_owned()
}
