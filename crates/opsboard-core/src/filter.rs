//! Filter predicate evaluation
//!
//! A [`FilterState`] holds every filter the dashboard knows about. Each key
//! is inert at its default value, so `FilterState::default()` matches every
//! record. Active keys are combined with logical AND.
//!
//! # Predicates
//!
//! | Key | Kind | Passes when |
//! |-----|------|-------------|
//! | `search` | text | any searchable field contains the term (case-insensitive) |
//! | `approval`, `priority`, `project_code`, `topic_type`, `category`, `follow_up`, `app_name` | categorical | field equals the value |
//! | `status`, `service_type`, `payment_method`, `payment_status` | set | field is a member of the set |
//! | `favorite` | boolean | record is starred |
//! | `date` | range | date within `[start, end]` and matching the relative status |
//! | `tab` | delivery tab | record completed (delivered) or not (upcoming) |
//!
//! A record missing a field that an active filter looks at never matches
//! that filter.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use crate::{Field, Record, DEFAULT_COMPLETED_STATUSES, DEFAULT_SEARCH_FIELDS};

// ============================================================================
// Filter state
// ============================================================================

/// Relative position of a record date with respect to today
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStatus {
    #[default]
    #[serde(alias = "", alias = "all")]
    Any,
    /// In the past and not yet completed
    Overdue,
    Today,
    /// Strictly after today
    Upcoming,
}

/// Inclusive date window with an optional relative-status refinement
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateRange {
    #[serde(alias = "startDate", deserialize_with = "de::optional_date")]
    pub start: Option<NaiveDate>,
    #[serde(alias = "endDate", deserialize_with = "de::optional_date")]
    pub end: Option<NaiveDate>,
    pub status: DateStatus,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            status: DateStatus::Any,
        }
    }

    pub fn status(mut self, status: DateStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.status != DateStatus::Any
    }
}

/// Delivered / upcoming toggle on the orders view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryTab {
    #[default]
    All,
    Delivered,
    Upcoming,
}

impl<'de> Deserialize<'de> for DeliveryTab {
    /// Accepts the tab names or the numeric toggle index (-1 all, 0 delivered, 1 upcoming)
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(DeliveryTab::Delivered),
                Some(1) => Ok(DeliveryTab::Upcoming),
                _ => Ok(DeliveryTab::All),
            },
            serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "delivered" => Ok(DeliveryTab::Delivered),
                "upcoming" => Ok(DeliveryTab::Upcoming),
                "" | "all" => Ok(DeliveryTab::All),
                other => Err(serde::de::Error::unknown_variant(other, &["all", "delivered", "upcoming"])),
            },
            serde_json::Value::Null => Ok(DeliveryTab::All),
            _ => Err(serde::de::Error::custom("expected a tab name or index")),
        }
    }
}

/// Every filter the dashboard can apply.
///
/// All keys are always present; deserialization substitutes defaults for
/// missing keys and treats `null` as the inert value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    #[serde(alias = "searchQuery", deserialize_with = "de::text")]
    pub search: String,
    #[serde(deserialize_with = "de::set")]
    pub status: BTreeSet<String>,
    #[serde(deserialize_with = "de::text")]
    pub approval: String,
    #[serde(deserialize_with = "de::text")]
    pub priority: String,
    #[serde(deserialize_with = "de::text")]
    pub project_code: String,
    #[serde(deserialize_with = "de::text")]
    pub topic_type: String,
    #[serde(deserialize_with = "de::text")]
    pub category: String,
    #[serde(alias = "followup", deserialize_with = "de::text")]
    pub follow_up: String,
    #[serde(alias = "appname", deserialize_with = "de::text")]
    pub app_name: String,
    #[serde(deserialize_with = "de::set")]
    pub service_type: BTreeSet<String>,
    #[serde(deserialize_with = "de::set")]
    pub payment_method: BTreeSet<String>,
    #[serde(deserialize_with = "de::set")]
    pub payment_status: BTreeSet<String>,
    #[serde(alias = "isFavorite", alias = "isStarred", deserialize_with = "de::flag")]
    pub favorite: bool,
    pub date: DateRange,
    #[serde(alias = "Tabs")]
    pub tab: DeliveryTab,
}

/// Explicit mutation of a single filter key
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterUpdate {
    Search(String),
    Status(BTreeSet<String>),
    Approval(String),
    Priority(String),
    ProjectCode(String),
    TopicType(String),
    Category(String),
    FollowUp(String),
    AppName(String),
    ServiceType(BTreeSet<String>),
    PaymentMethod(BTreeSet<String>),
    PaymentStatus(BTreeSet<String>),
    Favorite(bool),
    Date(DateRange),
    Tab(DeliveryTab),
    /// Reset every key to its inert default
    Clear,
}

impl FilterState {
    /// Apply one update in place
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Search(v) => self.search = v,
            FilterUpdate::Status(v) => self.status = v,
            FilterUpdate::Approval(v) => self.approval = v,
            FilterUpdate::Priority(v) => self.priority = v,
            FilterUpdate::ProjectCode(v) => self.project_code = v,
            FilterUpdate::TopicType(v) => self.topic_type = v,
            FilterUpdate::Category(v) => self.category = v,
            FilterUpdate::FollowUp(v) => self.follow_up = v,
            FilterUpdate::AppName(v) => self.app_name = v,
            FilterUpdate::ServiceType(v) => self.service_type = v,
            FilterUpdate::PaymentMethod(v) => self.payment_method = v,
            FilterUpdate::PaymentStatus(v) => self.payment_status = v,
            FilterUpdate::Favorite(v) => self.favorite = v,
            FilterUpdate::Date(v) => self.date = v,
            FilterUpdate::Tab(v) => self.tab = v,
            FilterUpdate::Clear => *self = Self::default(),
        }
    }

    /// Builder form of [`FilterState::apply`]
    pub fn with(mut self, update: FilterUpdate) -> Self {
        self.apply(update);
        self
    }

    pub fn clear(&mut self) {
        self.apply(FilterUpdate::Clear);
    }

    /// Number of keys currently restricting the record set
    pub fn active_count(&self) -> usize {
        let text_keys = [
            &self.search,
            &self.approval,
            &self.priority,
            &self.project_code,
            &self.topic_type,
            &self.category,
            &self.follow_up,
            &self.app_name,
        ];
        let sets = [
            &self.status,
            &self.service_type,
            &self.payment_method,
            &self.payment_status,
        ];

        text_keys.iter().filter(|v| !v.trim().is_empty()).count()
            + sets.iter().filter(|s| !s.is_empty()).count()
            + usize::from(self.favorite)
            + usize::from(self.date.is_active())
            + usize::from(self.tab != DeliveryTab::All)
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }
}

/// Collect values into a filter set
pub fn set_of<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluates filter states against records.
///
/// Holds the evaluation context: the reference date for relative date
/// filters, the fields searched by free text, and which statuses count as
/// completed.
#[derive(Clone, Debug)]
pub struct FilterEngine {
    today: NaiveDate,
    search_fields: Vec<Field>,
    completed_statuses: Vec<String>,
}

impl FilterEngine {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            search_fields: DEFAULT_SEARCH_FIELDS.to_vec(),
            completed_statuses: DEFAULT_COMPLETED_STATUSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Engine anchored at the local calendar date
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// Set the fields free-text search runs against
    pub fn search_fields(mut self, fields: Vec<Field>) -> Self {
        self.search_fields = fields;
        self
    }

    /// Set the statuses that count as completed
    pub fn completed_statuses(mut self, statuses: Vec<String>) -> Self {
        self.completed_statuses = statuses;
        self
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.today
    }

    /// Whether `record` satisfies every active predicate of `filter`
    pub fn matches(&self, record: &Record, filter: &FilterState) -> bool {
        self.search_matches(record, &filter.search)
            && set_matches(&filter.status, &record.status)
            && categorical_matches(&filter.approval, &record.approval)
            && categorical_matches(&filter.priority, &record.priority)
            && categorical_matches(&filter.project_code, &record.project_code)
            && categorical_matches(&filter.topic_type, &record.topic_type)
            && categorical_matches(&filter.category, &record.category)
            && categorical_matches(&filter.follow_up, &record.follow_up)
            && categorical_matches(&filter.app_name, &record.app_name)
            && set_matches(&filter.service_type, &record.service_type)
            && set_matches(&filter.payment_method, &record.payment_method)
            && set_matches(&filter.payment_status, &record.payment_status)
            && (!filter.favorite || record.favorite)
            && self.date_matches(record, &filter.date)
            && self.tab_matches(record, filter.tab)
    }

    /// The records passing `filter`, in input order
    pub fn filter<'a>(&self, records: &'a [Record], filter: &FilterState) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r, filter)).collect()
    }

    fn search_matches(&self, record: &Record, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields
            .iter()
            .any(|field| record.text(*field).to_lowercase().contains(&needle))
    }

    fn date_matches(&self, record: &Record, range: &DateRange) -> bool {
        if !range.is_active() {
            return true;
        }
        let Some(date) = record.date else {
            return false;
        };
        if range.start.is_some_and(|start| date < start) || range.end.is_some_and(|end| date > end) {
            return false;
        }
        match range.status {
            DateStatus::Any => true,
            DateStatus::Overdue => date < self.today && !self.is_completed(record),
            DateStatus::Today => date == self.today,
            DateStatus::Upcoming => date > self.today,
        }
    }

    fn tab_matches(&self, record: &Record, tab: DeliveryTab) -> bool {
        match tab {
            DeliveryTab::All => true,
            DeliveryTab::Delivered => self.is_completed(record),
            DeliveryTab::Upcoming => !self.is_completed(record),
        }
    }

    fn is_completed(&self, record: &Record) -> bool {
        record.is_completed_by(self.completed_statuses.as_slice())
    }
}

fn categorical_matches(wanted: &str, actual: &str) -> bool {
    let wanted = wanted.trim();
    wanted.is_empty() || wanted == actual.trim()
}

fn set_matches(wanted: &BTreeSet<String>, actual: &str) -> bool {
    wanted.is_empty() || wanted.contains(actual.trim())
}

/// Evaluate `filter` against `record` using today's local date
pub fn matches(record: &Record, filter: &FilterState) -> bool {
    FilterEngine::today().matches(record, filter)
}

/// Records passing `filter`, evaluated with today's local date
pub fn filter_records<'a>(records: &'a [Record], filter: &FilterState) -> Vec<&'a Record> {
    FilterEngine::today().filter(records, filter)
}

// ============================================================================
// Lenient deserialization
// ============================================================================

mod de {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::collections::BTreeSet;

    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(scalar(&value).unwrap_or_default())
    }

    /// A single value, an array of values, or null
    pub fn set<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
        let values = match Value::deserialize(deserializer)? {
            Value::Array(items) => items.iter().filter_map(scalar).collect(),
            other => scalar(&other).into_iter().collect::<Vec<_>>(),
        };
        Ok(values.into_iter().filter(|v| !v.is_empty()).collect())
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
            Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }

    /// `YYYY-MM-DD` (time suffix ignored); empty or null means unbounded
    pub fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn engine() -> FilterEngine {
        FilterEngine::new(date(2026, 3, 10))
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new("I15015")
                .status("New")
                .priority("High")
                .project_code("ACME")
                .company("Acme Jewels")
                .subject("Invoice totals wrong")
                .date(date(2026, 3, 5)),
            Record::new("I15017")
                .status("Solved")
                .priority("Low")
                .project_code("GLOBEX")
                .company("Globex")
                .subject("Printer offline")
                .favorite()
                .date(date(2026, 3, 12)),
            Record::new("I15019")
                .status("Delivered")
                .approval("Approved")
                .service_type("Training")
                .payment_method("UPI")
                .payment_status("Paid")
                .topic_type("Onboarding")
                .date(date(2026, 3, 1)),
        ]
    }

    #[test]
    fn default_state_matches_everything() {
        let filter = FilterState::default();
        assert!(!filter.is_active());
        for record in sample() {
            assert!(engine().matches(&record, &filter));
        }
        assert!(engine().matches(&Record::default(), &filter));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let records = sample();
        let by_subject = FilterState::default().with(FilterUpdate::Search("PRINTER".into()));
        let ids: Vec<_> = engine().filter(&records, &by_subject).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["I15017"]);

        let by_id = FilterState::default().with(FilterUpdate::Search(" i1501".into()));
        assert_eq!(engine().filter(&records, &by_id).len(), 3);

        let by_company = FilterState::default().with(FilterUpdate::Search("jewels".into()));
        assert_eq!(engine().filter(&records, &by_company).len(), 1);
    }

    #[test]
    fn search_respects_configured_fields() {
        let records = sample();
        let filter = FilterState::default().with(FilterUpdate::Search("acme".into()));
        let subject_only = engine().search_fields(vec![Field::Subject]);
        assert!(subject_only.filter(&records, &filter).is_empty());
    }

    #[test]
    fn status_set_excludes_non_members() {
        let record = Record::new("1").status("Pending");
        let filter = FilterState::default().with(FilterUpdate::Status(set_of(["Approved", "Rejected"])));
        assert!(!engine().matches(&record, &filter));

        let record = Record::new("2").status("Approved");
        assert!(engine().matches(&record, &filter));
    }

    #[test]
    fn categorical_filters_require_exact_match() {
        let records = sample();
        let filter = FilterState::default().with(FilterUpdate::Priority("High".into()));
        assert_eq!(engine().filter(&records, &filter).len(), 1);

        let filter = FilterState::default().with(FilterUpdate::ProjectCode("ACM".into()));
        assert!(engine().filter(&records, &filter).is_empty());

        let filter = FilterState::default().with(FilterUpdate::TopicType("Onboarding".into()));
        assert_eq!(engine().filter(&records, &filter).len(), 1);
    }

    #[test]
    fn missing_field_fails_closed() {
        let record = Record::new("bare");
        let filter = FilterState::default().with(FilterUpdate::Approval("Approved".into()));
        assert!(!engine().matches(&record, &filter));

        let filter = FilterState::default().with(FilterUpdate::Date(DateRange::between(date(2026, 1, 1), date(2026, 12, 31))));
        assert!(!engine().matches(&record, &filter));
    }

    #[test]
    fn set_filters_on_order_fields() {
        let records = sample();
        let filter = FilterState::default()
            .with(FilterUpdate::ServiceType(set_of(["Training", "Delivery"])))
            .with(FilterUpdate::PaymentMethod(set_of(["UPI"])))
            .with(FilterUpdate::PaymentStatus(set_of(["Paid"])));
        let matched = engine().filter(&records, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "I15019");
    }

    #[test]
    fn favorite_only_when_asserted() {
        let records = sample();
        let filter = FilterState::default().with(FilterUpdate::Favorite(true));
        assert_eq!(engine().filter(&records, &filter).len(), 1);

        let filter = filter.with(FilterUpdate::Favorite(false));
        assert_eq!(engine().filter(&records, &filter).len(), 3);
    }

    #[test]
    fn date_range_is_inclusive_with_open_bounds() {
        let records = sample();
        let filter = FilterState::default().with(FilterUpdate::Date(DateRange::between(date(2026, 3, 1), date(2026, 3, 5))));
        assert_eq!(engine().filter(&records, &filter).len(), 2);

        let from_only = DateRange {
            start: Some(date(2026, 3, 6)),
            ..DateRange::default()
        };
        let filter = FilterState::default().with(FilterUpdate::Date(from_only));
        let matched = engine().filter(&records, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "I15017");
    }

    #[test]
    fn relative_date_status() {
        let records = sample();
        let status = |s: DateStatus| {
            FilterState::default().with(FilterUpdate::Date(DateRange::default().status(s)))
        };

        // I15015 is in the past and open; I15019 is in the past but delivered
        let overdue = engine().filter(&records, &status(DateStatus::Overdue));
        assert_eq!(overdue.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["I15015"]);

        let upcoming = engine().filter(&records, &status(DateStatus::Upcoming));
        assert_eq!(upcoming.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["I15017"]);

        let today = FilterEngine::new(date(2026, 3, 12)).filter(&records, &status(DateStatus::Today));
        assert_eq!(today.len(), 1);
    }

    #[test]
    fn delivery_tabs() {
        let records = sample();
        let delivered = FilterState::default().with(FilterUpdate::Tab(DeliveryTab::Delivered));
        // Solved and Delivered both count as completed
        assert_eq!(engine().filter(&records, &delivered).len(), 2);

        let upcoming = FilterState::default().with(FilterUpdate::Tab(DeliveryTab::Upcoming));
        assert_eq!(engine().filter(&records, &upcoming).len(), 1);

        let orders_only = engine().completed_statuses(vec!["Delivered".into()]);
        assert_eq!(orders_only.filter(&records, &delivered).len(), 1);
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = sample();
        let filter = FilterState::default()
            .with(FilterUpdate::Search("i150".into()))
            .with(FilterUpdate::Status(set_of(["New", "Solved"])))
            .with(FilterUpdate::Favorite(true));
        let matched = engine().filter(&records, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "I15017");
    }

    #[test]
    fn evaluation_does_not_mutate_inputs() {
        let records = sample();
        let before = records.clone();
        let filter = FilterState::default().with(FilterUpdate::Search("printer".into()));
        let snapshot = filter.clone();
        let _ = engine().filter(&records, &filter);
        let _ = engine().filter(&records, &filter);
        assert_eq!(records, before);
        assert_eq!(filter, snapshot);
    }

    #[test]
    fn active_count_and_clear() {
        let mut filter = FilterState::default()
            .with(FilterUpdate::Search("x".into()))
            .with(FilterUpdate::PaymentStatus(set_of(["Unpaid"])))
            .with(FilterUpdate::Favorite(true))
            .with(FilterUpdate::Tab(DeliveryTab::Upcoming))
            .with(FilterUpdate::Date(DateRange::default().status(DateStatus::Overdue)));
        assert_eq!(filter.active_count(), 5);

        filter.apply(FilterUpdate::Search("   ".into()));
        assert_eq!(filter.active_count(), 4);

        filter.clear();
        assert_eq!(filter, FilterState::default());
    }

    #[test]
    fn deserializes_dashboard_shape_with_defaults() {
        let filter: FilterState = serde_json::from_value(json!({
            "search": "acme",
            "approval": "",
            "projectCode": null,
            "serviceType": ["Training"],
            "paymentStatus": "Unpaid",
            "isFavorite": false,
            "date": { "startDate": "2026-03-01", "endDate": "", "status": "" },
            "Tabs": 0
        }))
        .unwrap();

        assert_eq!(filter.search, "acme");
        assert_eq!(filter.project_code, "");
        assert_eq!(filter.service_type, set_of(["Training"]));
        assert_eq!(filter.payment_status, set_of(["Unpaid"]));
        assert_eq!(filter.date.start, Some(date(2026, 3, 1)));
        assert_eq!(filter.date.end, None);
        assert_eq!(filter.date.status, DateStatus::Any);
        assert_eq!(filter.tab, DeliveryTab::Delivered);
        assert!(filter.status.is_empty());
    }

    #[test]
    fn ticket_view_starred_key_sets_favorite() {
        let filter: FilterState = serde_json::from_str(r#"{"isStarred": true}"#).unwrap();
        assert!(filter.favorite);
        assert_eq!(filter.active_count(), 1);

        let tickets = sample();
        let ids: Vec<_> = engine().filter(&tickets, &filter).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["I15017"]);
    }

    #[test]
    fn date_status_deserializes_from_strings() {
        let status_of = |s: &str| {
            let filter: FilterState = serde_json::from_value(json!({ "date": { "status": s } })).unwrap();
            filter.date.status
        };
        assert_eq!(status_of("overdue"), DateStatus::Overdue);
        assert_eq!(status_of("today"), DateStatus::Today);
        assert_eq!(status_of("upcoming"), DateStatus::Upcoming);
        assert_eq!(status_of("all"), DateStatus::Any);

        let filter: FilterState = serde_json::from_value(json!({ "date": { "status": "overdue" } })).unwrap();
        let tickets = sample();
        let overdue = engine().filter(&tickets, &filter);
        assert_eq!(overdue.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["I15015"]);
    }

    #[test]
    fn empty_object_is_default_state() {
        let filter: FilterState = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, FilterState::default());

        let filter: FilterState = serde_json::from_value(json!({ "Tabs": -1, "status": null })).unwrap();
        assert_eq!(filter, FilterState::default());
    }

    #[test]
    fn invalid_date_is_rejected() {
        let result: Result<FilterState, _> = serde_json::from_value(json!({ "date": { "start": "03/01/2026" } }));
        assert!(result.is_err());
    }
}
