//! Attachment references and file metadata
//!
//! Comment attachments arrive in several shapes: a single URL, a
//! comma-joined list of URLs, a JSON array, or an object carrying an
//! `imageUrl`. [`parse_attachments`] normalizes all of them into an
//! [`AttachmentSet`].
//!
//! ```rust
//! use opsboard_core::attachment::{parse_attachments, file_metadata, FileKind};
//! use serde_json::json;
//!
//! let set = parse_attachments(&json!("a.png,b.pdf"));
//! assert_eq!(set.attachments(), ["a.png", "b.pdf"]);
//! assert!(set.is_multiple());
//!
//! assert_eq!(file_metadata("https://cdn.example.com/r/report.PDF?sig=1").kind, FileKind::Pdf);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use url::Url;

/// Normalized list of attachment references
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawAttachmentSet")]
pub struct AttachmentSet {
    attachments: Vec<String>,
    is_multiple: bool,
}

#[derive(Deserialize)]
struct RawAttachmentSet {
    #[serde(default)]
    attachments: Vec<String>,
}

impl From<RawAttachmentSet> for AttachmentSet {
    fn from(raw: RawAttachmentSet) -> Self {
        Self::new(raw.attachments)
    }
}

impl AttachmentSet {
    /// Build a set, dropping blank references
    pub fn new<I, S>(references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let attachments: Vec<String> = references
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        let is_multiple = attachments.len() > 1;
        Self {
            attachments,
            is_multiple,
        }
    }

    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    pub fn is_multiple(&self) -> bool {
        self.is_multiple
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.attachments.iter().map(String::as_str)
    }
}

/// Parse an attachment value of any supported shape.
///
/// Unsupported shapes (numbers, booleans, objects without `imageUrl`) give
/// an empty set.
pub fn parse_attachments(value: &Value) -> AttachmentSet {
    match value {
        Value::String(s) => AttachmentSet::new(s.split(',')),
        Value::Array(items) => AttachmentSet::new(items.iter().filter_map(Value::as_str)),
        Value::Object(map) => match map.get("imageUrl").and_then(Value::as_str) {
            Some(url) => AttachmentSet::new([url]),
            None => AttachmentSet::default(),
        },
        _ => AttachmentSet::default(),
    }
}

// ============================================================================
// File metadata
// ============================================================================

/// Broad file category derived from an extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Spreadsheet,
    WordDocument,
    Json,
    Image,
    Text,
    Unknown,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => FileKind::Pdf,
            "xlsx" | "xls" | "csv" => FileKind::Spreadsheet,
            "docx" | "doc" => FileKind::WordDocument,
            "json" => FileKind::Json,
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" | "bmp" | "tiff" | "ico" | "avif" => {
                FileKind::Image
            }
            "txt" => FileKind::Text,
            _ => FileKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF Document",
            FileKind::Spreadsheet => "Spreadsheet",
            FileKind::WordDocument => "Word Document",
            FileKind::Json => "JSON Data",
            FileKind::Image => "Image",
            FileKind::Text => "Text File",
            FileKind::Unknown => "Unknown File",
        }
    }

    /// Whether a browser can show the file inline
    pub fn is_previewable(&self) -> bool {
        matches!(self, FileKind::Pdf | FileKind::Image | FileKind::Text)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extension and kind of a referenced file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Lower-cased extension without the dot, empty when there is none
    pub extension: String,
    pub kind: FileKind,
}

/// Path component of an absolute URL; anything else is used as given
fn reference_path(reference: &str) -> Cow<'_, str> {
    match Url::parse(reference) {
        Ok(url) => Cow::Owned(url.path().to_owned()),
        Err(_) => Cow::Borrowed(reference),
    }
}

/// Derive file metadata from a URL or file name
pub fn file_metadata(reference: &str) -> FileMetadata {
    let path = reference_path(reference.trim());
    let file_name = path.rsplit('/').next().unwrap_or(&*path);

    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            let extension = ext.to_ascii_lowercase();
            let kind = FileKind::from_extension(&extension);
            FileMetadata { extension, kind }
        }
        _ => FileMetadata {
            extension: String::new(),
            kind: FileKind::Unknown,
        },
    }
}

/// Short label for an attachment: the last path segment, at most 20 characters
pub fn display_name(reference: &str) -> String {
    let path = reference_path(reference.trim());
    let last = path.rsplit('/').next().unwrap_or(&*path);
    if last.is_empty() {
        return "File Attachment".to_string();
    }
    last.chars().take(20).collect()
}

/// Human-readable byte size ("0 Bytes", "1.5 KB", "2 MB")
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
