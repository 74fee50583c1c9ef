//! # opsboard-core
//!
//! Core record model and pure data transformations for the opsboard
//! operations dashboard engine.
//!
//! This crate provides:
//! - Domain types: `Record`, `Comment`, `AttachmentSet`
//! - Ingestion of loosely-shaped JSON into normalized records (`ingest`)
//! - Filter predicate evaluation (`filter`)
//! - KPI aggregation with declarative threshold classification (`kpi`)
//! - Status-to-display-token lookup (`style`)
//! - Attachment parsing and file metadata (`attachment`)
//! - Company master lookup for calls (`company`)
//! - Legacy local ticket numbering over an injected store (`ticket_number`)
//! - Core traits: `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use opsboard_core::filter::{FilterEngine, FilterState, FilterUpdate};
//! use opsboard_core::kpi::build_summary;
//! use opsboard_core::Record;
//! use chrono::NaiveDate;
//!
//! let records = vec![
//!     Record::new("T-1").status("Solved").subject("Printer offline"),
//!     Record::new("T-2").status("New").subject("Invoice mismatch"),
//!     Record::new("T-3").status("Solved").subject("Printer toner"),
//! ];
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let filter = FilterState::default().with(FilterUpdate::Search("printer".into()));
//! let matched = FilterEngine::new(today).filter(&records, &filter);
//! assert_eq!(matched.len(), 2);
//!
//! let summary = build_summary(&records);
//! assert_eq!(summary.total, 3);
//! assert_eq!(summary.count_for("Solved"), 2);
//! ```

pub mod attachment;
pub mod company;
pub mod filter;
pub mod ingest;
pub mod kpi;
pub mod style;
pub mod ticket_number;

pub use attachment::AttachmentSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a record within a collection
pub type RecordId = String;

/// Statuses treated as "done" unless configuration overrides them.
///
/// Orders finish as `Delivered`; tickets as `Solved` or `Closed`.
pub const DEFAULT_COMPLETED_STATUSES: &[&str] = &[
    "Delivered",
    "Completed",
    "Solved",
    "Solved - Upcoming Release",
    "Closed",
];

// ============================================================================
// Record
// ============================================================================

/// The business entity a record represents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Ticket,
    Order,
    CallLog,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Ticket => "ticket",
            RecordKind::Order => "order",
            RecordKind::CallLog => "call_log",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized ticket, order or call log.
///
/// Records are built once at the ingestion boundary (see [`ingest`]); every
/// field has a neutral default so downstream code never deals with absence
/// beyond an empty string, zero or `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Unique identifier (ticket number, order serial, call log id)
    pub id: RecordId,
    pub kind: RecordKind,
    /// Workflow status ("New", "Solved", "Delivered", ...)
    pub status: String,
    /// Approval status ("Pending", "Approved", "Rejected")
    pub approval: String,
    pub priority: String,
    /// Project or company code the record belongs to
    pub project_code: String,
    pub company_name: String,
    pub user_name: String,
    pub subject: String,
    pub category: String,
    pub follow_up: String,
    pub app_name: String,
    pub topic_type: String,
    pub service_type: String,
    pub payment_method: String,
    pub payment_status: String,
    /// Starred / favorite flag
    pub favorite: bool,
    pub send_mail: bool,
    pub instruction: String,
    pub keywords: Vec<String>,
    /// Estimated effort in hours
    pub estimated_hours: f64,
    /// Hours taken to upload code, when tracked
    pub upload_hours: Option<f64>,
    /// The date a date-range filter applies to (delivery / training / call date)
    pub date: Option<NaiveDate>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub comments: Vec<Comment>,
    /// Every other scalar attribute from the source, stringified
    pub attributes: BTreeMap<String, String>,
}

impl Record {
    /// Create an empty ticket record with the given identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn approval(mut self, approval: impl Into<String>) -> Self {
        self.approval = approval.into();
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn project_code(mut self, code: impl Into<String>) -> Self {
        self.project_code = code.into();
        self
    }

    pub fn company(mut self, name: impl Into<String>) -> Self {
        self.company_name = name.into();
        self
    }

    pub fn user(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn topic_type(mut self, topic: impl Into<String>) -> Self {
        self.topic_type = topic.into();
        self
    }

    pub fn service_type(mut self, service: impl Into<String>) -> Self {
        self.service_type = service.into();
        self
    }

    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    pub fn payment_status(mut self, status: impl Into<String>) -> Self {
        self.payment_status = status.into();
        self
    }

    pub fn favorite(mut self) -> Self {
        self.favorite = true;
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn upload_hours(mut self, hours: f64) -> Self {
        self.upload_hours = Some(hours);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Text value of a searchable field
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Subject => &self.subject,
            Field::CompanyName => &self.company_name,
            Field::ProjectCode => &self.project_code,
            Field::UserName => &self.user_name,
            Field::Category => &self.category,
            Field::AppName => &self.app_name,
            Field::Instruction => &self.instruction,
            Field::Status => &self.status,
        }
    }

    /// Source attribute by its raw key, empty when absent
    pub fn attr(&self, key: &str) -> &str {
        self.attributes.get(key).map(String::as_str).unwrap_or("")
    }

    /// Whether the status is one of `completed` (case-insensitive)
    pub fn is_completed_by<S: AsRef<str>>(&self, completed: &[S]) -> bool {
        let status = self.status.trim();
        !status.is_empty()
            && completed
                .iter()
                .any(|c| c.as_ref().trim().eq_ignore_ascii_case(status))
    }

    /// Whether the status is one of [`DEFAULT_COMPLETED_STATUSES`]
    pub fn is_completed(&self) -> bool {
        self.is_completed_by(DEFAULT_COMPLETED_STATUSES)
    }
}

/// Free-text fields a search can run against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Subject,
    CompanyName,
    ProjectCode,
    UserName,
    Category,
    AppName,
    Instruction,
    Status,
}

/// Fields searched when no configuration says otherwise
pub const DEFAULT_SEARCH_FIELDS: &[Field] = &[
    Field::Subject,
    Field::Id,
    Field::CompanyName,
    Field::ProjectCode,
    Field::UserName,
];

// ============================================================================
// Comment
// ============================================================================

/// A comment in a record's conversation thread
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub message: String,
    pub author: String,
    /// Timestamp as supplied by the source, kept verbatim
    pub time: String,
    /// Internal note hidden from customers
    pub office_use_only: bool,
    pub attachments: AttachmentSet,
}

impl Comment {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn by(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn office_use_only(mut self) -> Self {
        self.office_use_only = true;
        self
    }

    pub fn with_attachments(mut self, attachments: AttachmentSet) -> Self {
        self.attachments = attachments;
        self
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering over a record collection
pub trait Renderer {
    type Output;

    /// Render records to the output format
    fn render(&self, records: &[Record]) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Failure turning source JSON into records
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected an array of records, found {0}")]
    NotAnArray(&'static str),

    #[error("Duplicate record id: {0}")]
    DuplicateId(RecordId),
}

/// State store error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt value for key {key}: {value}")]
    Corrupt { key: String, value: String },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
