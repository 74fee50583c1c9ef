//! Flattening records into uniform export rows
//!
//! Every row produced for one call has the same columns in the same order.
//! Nested comments become `Comment 1..N` columns, where N is the largest
//! comment count in the input; shorter threads are padded with empty cells.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use opsboard_core::{Comment, Record, RecordKind};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, warn};

/// India Standard Time, the offset dates are rendered in by default
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// `dd-mm-yyyy`
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

const MISSING: &str = "-";

const TICKET_COLUMNS: &[&str] = &[
    "TicketNo",
    "ProjectCode",
    "UserName",
    "Subject",
    "Category",
    "Status",
    "Priority",
    "FollowUp",
    "CreatedOn",
    "UpdatedAt",
    "SendMail",
    "Starred",
    "Tags",
    "Instruction",
    "CommentsCount",
];

const CALL_LOG_COLUMNS: &[&str] = &[
    "Sr No",
    "Date",
    "Company",
    "Call By",
    "App Name",
    "Description",
    "Received By",
    "Time",
    "Department",
    "Assigned To",
    "Status",
    "Employee Status",
    "Feedback",
    "Rating",
    "Topic Raised By",
    "Priority",
    "Call Start",
    "Call Closed",
    "Call Duration",
    "Call Details",
    "Ticket No",
];

// ============================================================================
// Cells and rows
// ============================================================================

/// A single exported value
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    /// Rendered width in characters, for column sizing
    pub fn width(&self) -> usize {
        self.to_string().chars().count()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

/// One flattened record: an ordered list of (column, value) pairs
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExportRow {
    cells: Vec<(String, Cell)>,
}

impl ExportRow {
    fn push(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        self.cells.push((column.into(), value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Comment cell payload; field order is part of the output
#[derive(Serialize)]
struct CommentCell<'a> {
    message: &'a str,
    time: &'a str,
    by: &'a str,
}

fn comment_cell(comment: &Comment) -> String {
    let cell = CommentCell {
        message: &comment.message,
        time: &comment.time,
        by: &comment.author,
    };
    // Serializing three string fields cannot fail
    serde_json::to_string(&cell).unwrap_or_default()
}

// ============================================================================
// Layouts
// ============================================================================

/// Column layout of an export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExportLayout {
    #[default]
    Tickets,
    CallLogs,
}

impl ExportLayout {
    /// Layout matching a record kind; orders export like tickets
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::CallLog => ExportLayout::CallLogs,
            RecordKind::Ticket | RecordKind::Order => ExportLayout::Tickets,
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            ExportLayout::Tickets => "Tickets",
            ExportLayout::CallLogs => "Call Logs",
        }
    }

    /// Suggested download name, e.g. `Tickets_2026-03-02.xlsx`
    pub fn file_name(&self, date: NaiveDate) -> String {
        let stem = match self {
            ExportLayout::Tickets => "Tickets",
            ExportLayout::CallLogs => "CallLog_Report",
        };
        format!("{stem}_{}.xlsx", date.format("%Y-%m-%d"))
    }

    /// Fixed columns, before any `Comment N` columns
    pub fn base_columns(&self) -> &'static [&'static str] {
        match self {
            ExportLayout::Tickets => TICKET_COLUMNS,
            ExportLayout::CallLogs => CALL_LOG_COLUMNS,
        }
    }
}

impl std::str::FromStr for ExportLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tickets" | "ticket" | "orders" | "order" => Ok(ExportLayout::Tickets),
            "call-logs" | "call_logs" | "calllogs" | "call-log" | "call_log" => Ok(ExportLayout::CallLogs),
            other => Err(format!("unknown export layout: {other}")),
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// Turns records into [`ExportRow`]s
#[derive(Clone, Debug)]
pub struct ExportFormatter {
    pub layout: ExportLayout,
    /// Offset timestamps are shifted to before formatting
    pub utc_offset_minutes: i32,
    /// chrono format string for dates
    pub date_format: String,
}

impl Default for ExportFormatter {
    fn default() -> Self {
        Self {
            layout: ExportLayout::Tickets,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            date_format: DEFAULT_DATE_FORMAT.into(),
        }
    }
}

impl ExportFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: ExportLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| {
            debug!(minutes = self.utc_offset_minutes, "offset out of range, using UTC");
            Utc.fix()
        })
    }

    /// Format a timestamp as a local date, `-` when absent
    pub fn format_timestamp(&self, ts: Option<DateTime<Utc>>) -> String {
        let Some(ts) = ts else {
            return MISSING.to_string();
        };
        let local = ts.with_timezone(&self.offset());
        let mut out = String::new();
        if write!(out, "{}", local.format(&self.date_format)).is_ok() {
            return out;
        }
        self.warn_unusable_format();
        local.format(DEFAULT_DATE_FORMAT).to_string()
    }

    fn format_date(&self, date: Option<NaiveDate>) -> String {
        let Some(date) = date else {
            return String::new();
        };
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_ok() {
            return out;
        }
        self.warn_unusable_format();
        date.format(DEFAULT_DATE_FORMAT).to_string()
    }

    fn warn_unusable_format(&self) {
        warn!(format = %self.date_format, "date format cannot render this value, using {DEFAULT_DATE_FORMAT}");
    }

    /// Column headers for `records`, in row order
    pub fn columns(&self, records: &[Record]) -> Vec<String> {
        let mut columns: Vec<String> = self.layout.base_columns().iter().map(|c| c.to_string()).collect();
        if self.layout == ExportLayout::Tickets {
            columns.extend((1..=max_comments(records)).map(|n| format!("Comment {n}")));
        }
        columns
    }

    /// Flatten `records`, one row each, all with identical columns
    pub fn rows(&self, records: &[Record]) -> Vec<ExportRow> {
        match self.layout {
            ExportLayout::Tickets => {
                let max = max_comments(records);
                records.iter().map(|r| self.ticket_row(r, max)).collect()
            }
            ExportLayout::CallLogs => records
                .iter()
                .enumerate()
                .map(|(i, r)| self.call_log_row(i + 1, r))
                .collect(),
        }
    }

    fn ticket_row(&self, record: &Record, max_comments: usize) -> ExportRow {
        let mut row = ExportRow::default();
        row.push("TicketNo", record.id.as_str());
        row.push("ProjectCode", or_missing(&record.project_code));
        row.push("UserName", or_missing(&record.user_name));
        row.push("Subject", or_missing(&record.subject));
        row.push("Category", or_missing(&record.category));
        row.push("Status", or_missing(&record.status));
        row.push("Priority", or_missing(&record.priority));
        row.push("FollowUp", or_missing(&record.follow_up));
        row.push("CreatedOn", self.format_timestamp(record.created_on));
        row.push("UpdatedAt", self.format_timestamp(record.updated_at));
        row.push("SendMail", yes_no(record.send_mail));
        row.push("Starred", yes_no(record.favorite));
        row.push("Tags", record.keywords.join(", "));
        row.push("Instruction", or_missing(&record.instruction));
        row.push("CommentsCount", record.comments.len());

        for n in 0..max_comments {
            let value = record.comments.get(n).map(comment_cell).unwrap_or_default();
            row.push(format!("Comment {}", n + 1), value);
        }
        row
    }

    fn call_log_row(&self, serial: usize, record: &Record) -> ExportRow {
        let app_name = if record.app_name.trim().is_empty() { "N/A" } else { record.app_name.as_str() };
        let rating = record.attr("rating").trim().parse::<f64>().unwrap_or(0.0);

        let mut row = ExportRow::default();
        row.push("Sr No", serial);
        row.push("Date", self.format_date(record.date));
        row.push("Company", record.company_name.as_str());
        row.push("Call By", record.user_name.as_str());
        row.push("App Name", app_name);
        row.push("Description", record.subject.as_str());
        row.push("Received By", record.attr("receivedBy"));
        row.push("Time", record.attr("time"));
        row.push("Department", record.attr("DeptName"));
        row.push("Assigned To", record.attr("AssignedEmpName"));
        row.push("Status", record.status.as_str());
        row.push("Employee Status", record.attr("Estatus"));
        row.push("Feedback", record.attr("feedback"));
        row.push("Rating", rating);
        row.push("Topic Raised By", record.attr("topicRaisedBy"));
        row.push("Priority", record.priority.as_str());
        row.push("Call Start", record.attr("callStart"));
        row.push("Call Closed", record.attr("callClosed"));
        row.push("Call Duration", record.attr("CallDuration"));
        row.push("Call Details", record.attr("callDetails"));
        row.push("Ticket No", record.attr("ticket"));
        row
    }
}

/// Reject chrono format strings with unknown specifiers
pub fn validate_date_format(format: &str) -> Result<(), String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid date format: {format:?}"));
    }
    Ok(())
}

/// Flatten records with the default ticket layout and IST dates
pub fn to_export_rows(records: &[Record]) -> Vec<ExportRow> {
    ExportFormatter::default().rows(records)
}

fn max_comments(records: &[Record]) -> usize {
    records.iter().map(|r| r.comments.len()).max().unwrap_or(0)
}

fn or_missing(value: &str) -> &str {
    if value.trim().is_empty() {
        MISSING
    } else {
        value
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
