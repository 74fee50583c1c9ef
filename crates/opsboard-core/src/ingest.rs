//! Normalization of loosely-shaped JSON into [`Record`]s
//!
//! Source systems disagree on key names (`Status` vs `status`, `TicketNo`
//! vs `SrNo`), value types (numbers as strings, booleans as `0`/`1`) and
//! nesting (comments as an array or as a JSON-encoded string). Ingestion
//! resolves all of that once so the filter and KPI code can assume a
//! well-formed record.
//!
//! Field-level problems never fail ingestion: unknown shapes fall back to
//! the field's neutral default and are logged at `debug` level. Only the
//! collection itself can be rejected (not an array, duplicate identifiers).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::attachment::parse_attachments;
use crate::{Comment, IngestError, Record, RecordKind};

// Key aliases, first match wins
const ID_KEYS: &[&str] = &["id", "TicketNo", "ticketNo", "SrNo", "srNo", "OrderNo", "orderNo"];
const STATUS_KEYS: &[&str] = &["status", "Status"];
const APPROVAL_KEYS: &[&str] = &["approval", "Approval", "approvalStatus", "ApprovalStatus"];
const PRIORITY_KEYS: &[&str] = &["priority", "Priority"];
const PROJECT_CODE_KEYS: &[&str] = &["projectCode", "ProjectCode", "CompanyCode", "companyCode", "companyname"];
const COMPANY_KEYS: &[&str] = &["company", "companyName", "CompanyName", "companyname"];
const USER_KEYS: &[&str] = &["username", "userName", "UserName", "callBy"];
const SUBJECT_KEYS: &[&str] = &["subject", "Subject", "description", "Description"];
const CATEGORY_KEYS: &[&str] = &["category", "Category"];
const FOLLOW_UP_KEYS: &[&str] = &["FollowUp", "followUp", "followup"];
const APP_NAME_KEYS: &[&str] = &["appname", "appName", "AppName"];
const TOPIC_KEYS: &[&str] = &["topicType", "TopicType"];
const SERVICE_KEYS: &[&str] = &["serviceType", "ServiceType"];
const PAYMENT_METHOD_KEYS: &[&str] = &["paymentMethod", "PaymentMethod"];
const PAYMENT_STATUS_KEYS: &[&str] = &["paymentStatus", "PaymentStatus"];
const FAVORITE_KEYS: &[&str] = &["star", "isFavorite", "IsFavorite", "favorite"];
const SEND_MAIL_KEYS: &[&str] = &["sendMail", "SendMail"];
const INSTRUCTION_KEYS: &[&str] = &["instruction", "Instruction"];
const KEYWORD_KEYS: &[&str] = &["keywords", "Keywords", "tags", "Tags"];
const HOURS_KEYS: &[&str] = &["estimatedHours", "EstimatedHours", "TotalHours", "hours"];
const UPLOAD_KEYS: &[&str] = &["codeUploadTime", "CodeUploadTime", "uploadHours"];
const DATE_KEYS: &[&str] = &["date", "Date", "deliveryDate", "DeliveryDate", "trainingDate", "TrainingDate"];
const CREATED_KEYS: &[&str] = &["CreatedOn", "createdOn", "createdAt"];
const UPDATED_KEYS: &[&str] = &["UpdatedAt", "updatedAt"];
const COMMENT_KEYS: &[&str] = &["comments", "Comments"];

const COMMENT_MESSAGE_KEYS: &[&str] = &["message", "Message"];
const COMMENT_AUTHOR_KEYS: &[&str] = &["Name", "name", "by", "author"];
const COMMENT_TIME_KEYS: &[&str] = &["time", "Time"];
const COMMENT_OFFICE_KEYS: &[&str] = &["isOfficeUseOnly", "officeUseOnly"];

/// Parse a JSON document into records.
///
/// Accepts a bare array or an API envelope whose `rd` member is the array.
pub fn records_from_json(input: &str, kind: RecordKind) -> Result<Vec<Record>, IngestError> {
    let value: Value = serde_json::from_str(input)?;
    records_from_value(&value, kind)
}

/// Normalize an already-parsed JSON value into records
pub fn records_from_value(value: &Value, kind: RecordKind) -> Result<Vec<Record>, IngestError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("rd") {
            Some(Value::Array(items)) => items,
            _ => return Err(IngestError::NotAnArray("object")),
        },
        other => return Err(IngestError::NotAnArray(json_type(other))),
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record = match item.as_object() {
            Some(obj) => normalize_record(obj, kind, index),
            None => {
                debug!(index, found = json_type(item), "skipping non-object record");
                continue;
            }
        };
        if !seen.insert(record.id.clone()) {
            return Err(IngestError::DuplicateId(record.id));
        }
        records.push(record);
    }
    Ok(records)
}

/// Build one record from a JSON object. `index` seeds a fallback identifier.
pub fn normalize_record(obj: &Map<String, Value>, kind: RecordKind, index: usize) -> Record {
    let mut id = text(obj, ID_KEYS);
    if id.is_empty() {
        id = format!("#{}", index + 1);
        debug!(%id, "record without identifier, using position");
    }

    Record {
        id,
        kind,
        status: text(obj, STATUS_KEYS),
        approval: text(obj, APPROVAL_KEYS),
        priority: text(obj, PRIORITY_KEYS),
        project_code: text(obj, PROJECT_CODE_KEYS),
        company_name: text(obj, COMPANY_KEYS),
        user_name: text(obj, USER_KEYS),
        subject: text(obj, SUBJECT_KEYS),
        category: text(obj, CATEGORY_KEYS),
        follow_up: text(obj, FOLLOW_UP_KEYS),
        app_name: text(obj, APP_NAME_KEYS),
        topic_type: text(obj, TOPIC_KEYS),
        service_type: text(obj, SERVICE_KEYS),
        payment_method: text(obj, PAYMENT_METHOD_KEYS),
        payment_status: text(obj, PAYMENT_STATUS_KEYS),
        favorite: flag(obj, FAVORITE_KEYS),
        send_mail: flag(obj, SEND_MAIL_KEYS),
        instruction: text(obj, INSTRUCTION_KEYS),
        keywords: keywords(obj),
        estimated_hours: number(obj, HOURS_KEYS).unwrap_or(0.0),
        upload_hours: number(obj, UPLOAD_KEYS),
        date: lookup(obj, DATE_KEYS)
            .and_then(scalar_text)
            .and_then(|s| parse_timestamp(&s))
            .map(|ts| ts.date_naive()),
        created_on: lookup(obj, CREATED_KEYS)
            .and_then(scalar_text)
            .and_then(|s| parse_timestamp(&s)),
        updated_at: lookup(obj, UPDATED_KEYS)
            .and_then(scalar_text)
            .and_then(|s| parse_timestamp(&s)),
        comments: lookup(obj, COMMENT_KEYS).map(parse_comments).unwrap_or_default(),
        attributes: obj
            .iter()
            .filter_map(|(k, v)| scalar_text(v).map(|s| (k.clone(), s)))
            .collect(),
    }
}

/// Parse a comment thread given as an array or a JSON-encoded string.
///
/// A string that does not decode to an array yields no comments.
pub fn parse_comments(value: &Value) -> Vec<Comment> {
    match value {
        Value::Array(items) => items.iter().filter_map(parse_comment).collect(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items.iter().filter_map(parse_comment).collect(),
            Ok(other) => {
                debug!(found = json_type(&other), "comment payload is not an array");
                Vec::new()
            }
            Err(err) => {
                debug!(error = %err, "unparseable comment payload");
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

fn parse_comment(value: &Value) -> Option<Comment> {
    let obj = value.as_object()?;
    Some(Comment {
        message: text(obj, COMMENT_MESSAGE_KEYS),
        author: text(obj, COMMENT_AUTHOR_KEYS),
        time: text(obj, COMMENT_TIME_KEYS),
        office_use_only: flag(obj, COMMENT_OFFICE_KEYS),
        attachments: obj.get("attachment").map(parse_attachments).unwrap_or_default(),
    })
}

/// Parse timestamps in the formats the upstream APIs emit.
///
/// Naive values are taken as UTC. Bare dates map to midnight.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    debug!(input, "unrecognized timestamp");
    None
}

// ============================================================================
// Field helpers
// ============================================================================

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(obj: &Map<String, Value>, keys: &[&str]) -> String {
    lookup(obj, keys).and_then(scalar_text).unwrap_or_default()
}

fn flag(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    match lookup(obj, keys) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "y"
        ),
        _ => false,
    }
}

fn number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    match lookup(obj, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                debug!(value = %s, "non-numeric value treated as absent");
                None
            }
        },
        _ => None,
    }
}

fn keywords(obj: &Map<String, Value>) -> Vec<String> {
    let raw: Vec<String> = match lookup(obj, KEYWORD_KEYS) {
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn ticket_fields_are_normalized() {
        let record = normalize_record(
            &obj(json!({
                "TicketNo": "I15015",
                "Status": "In Development",
                "Priority": "High",
                "companyname": "ACME",
                "username": "ravi",
                "subject": " Login fails ",
                "star": 1,
                "sendMail": "true",
                "keywords": "auth, login,,sso",
                "CreatedOn": "2026-03-01T09:30:00Z",
            })),
            RecordKind::Ticket,
            0,
        );

        assert_eq!(record.id, "I15015");
        assert_eq!(record.status, "In Development");
        assert_eq!(record.project_code, "ACME");
        assert_eq!(record.company_name, "ACME");
        assert_eq!(record.subject, "Login fails");
        assert!(record.favorite);
        assert!(record.send_mail);
        assert_eq!(record.keywords, vec!["auth", "login", "sso"]);
        assert_eq!(
            record.created_on.map(|ts| ts.to_rfc3339()),
            Some("2026-03-01T09:30:00+00:00".to_string())
        );
    }

    #[test]
    fn numeric_ids_and_hours() {
        let record = normalize_record(
            &obj(json!({ "SrNo": 17, "estimatedHours": "6.5", "codeUploadTime": 2 })),
            RecordKind::Order,
            0,
        );
        assert_eq!(record.id, "17");
        assert_eq!(record.kind, RecordKind::Order);
        assert_eq!(record.estimated_hours, 6.5);
        assert_eq!(record.upload_hours, Some(2.0));
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let record = normalize_record(
            &obj(json!({
                "Status": ["not", "a", "string"],
                "estimatedHours": "about six",
                "date": "someday",
                "comments": "{not json",
                "star": null,
            })),
            RecordKind::Ticket,
            4,
        );

        assert_eq!(record.id, "#5");
        assert_eq!(record.status, "");
        assert_eq!(record.estimated_hours, 0.0);
        assert_eq!(record.date, None);
        assert!(record.comments.is_empty());
        assert!(!record.favorite);
    }

    #[test]
    fn comments_from_encoded_string() {
        let encoded = json!([
            { "message": "Checked logs", "Name": "Asha", "time": "01-03-2026 10:00", "attachment": "a.png,b.pdf" },
            { "message": "Internal", "Name": "Dev", "isOfficeUseOnly": true },
            "garbage",
        ])
        .to_string();

        let comments = parse_comments(&Value::String(encoded));
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author, "Asha");
        assert!(comments[0].attachments.is_multiple());
        assert!(comments[1].office_use_only);
    }

    #[test]
    fn comment_payload_must_be_array() {
        assert!(parse_comments(&json!("{\"message\":\"x\"}")).is_empty());
        assert!(parse_comments(&json!("")).is_empty());
        assert!(parse_comments(&json!(42)).is_empty());
    }

    #[test]
    fn timestamps_in_several_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        for input in [
            "2026-03-14",
            "14-03-2026",
            "03/14/2026",
            "2026-03-14T08:00:00",
            "2026-03-14 08:00:00.123",
            "2026-03-14T08:00:00+02:00",
        ] {
            let parsed = parse_timestamp(input).map(|ts| ts.date_naive());
            assert_eq!(parsed, Some(expected), "input {input}");
        }
        assert_eq!(parse_timestamp("  "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn collection_from_envelope() {
        let records = records_from_json(
            r#"{ "rd": [ { "id": "a" }, { "id": "b" } ] }"#,
            RecordKind::Ticket,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn collection_must_be_array() {
        let err = records_from_json("42", RecordKind::Ticket).unwrap_err();
        assert!(matches!(err, IngestError::NotAnArray("number")));

        let err = records_from_json("{\"data\": []}", RecordKind::Ticket).unwrap_err();
        assert!(matches!(err, IngestError::NotAnArray("object")));

        let err = records_from_json("[", RecordKind::Ticket).unwrap_err();
        assert!(matches!(err, IngestError::Json(_)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = records_from_json(r#"[{"id": "x"}, {"id": "x"}]"#, RecordKind::Ticket).unwrap_err();
        assert!(matches!(err, IngestError::DuplicateId(ref id) if id == "x"));
    }

    #[test]
    fn non_object_items_are_skipped() {
        let records = records_from_json(r#"[{"id": "x"}, 3, null]"#, RecordKind::Ticket).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn scalar_attributes_are_kept() {
        let record = normalize_record(
            &obj(json!({ "id": 1, "DeptName": "Support", "rating": 4, "nested": { "a": 1 } })),
            RecordKind::CallLog,
            0,
        );
        assert_eq!(record.attr("DeptName"), "Support");
        assert_eq!(record.attr("rating"), "4");
        assert_eq!(record.attr("nested"), "");
    }
}
