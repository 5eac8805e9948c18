//! File-extension to content-type table.

use crate::model::MimeType;

/// Returns the built-in content-type table.
#[must_use]
pub fn table() -> &'static [MimeType] {
    MIME_TYPES
}

const MIME_TYPES: &[MimeType] = &[
    MimeType { extension: ".html", content_type: "text/html" },
    MimeType { extension: ".htm", content_type: "text/html" },
    MimeType { extension: ".json", content_type: "application/json" },
    MimeType { extension: ".jsonld", content_type: "application/ld+json" },
    MimeType { extension: ".xml", content_type: "application/xml" },
    MimeType { extension: ".csv", content_type: "text/csv" },
    MimeType { extension: ".tsv", content_type: "text/tab-separated-values" },
    MimeType { extension: ".txt", content_type: "text/plain" },
    MimeType { extension: ".md", content_type: "text/markdown" },
    MimeType { extension: ".pdf", content_type: "application/pdf" },
    MimeType { extension: ".png", content_type: "image/png" },
    MimeType { extension: ".jpg", content_type: "image/jpeg" },
    MimeType { extension: ".jpeg", content_type: "image/jpeg" },
    MimeType { extension: ".gif", content_type: "image/gif" },
    MimeType { extension: ".svg", content_type: "image/svg+xml" },
    MimeType { extension: ".tif", content_type: "image/tiff" },
    MimeType { extension: ".tiff", content_type: "image/tiff" },
    MimeType { extension: ".avi", content_type: "video/x-msvideo" },
    MimeType { extension: ".mp4", content_type: "video/mp4" },
    MimeType { extension: ".zip", content_type: "application/zip" },
    MimeType {
        extension: ".xlsx",
        content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    },
    MimeType {
        extension: ".docx",
        content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    },
];
