//! Dashboard KPI aggregation
//!
//! This module derives summary metrics from a record collection.
//! A KPI summary answers the question: "How is the pipeline doing right now?"
//!
//! # Core Concepts
//!
//! - **KpiSummary**: Aggregated counters and rates, recomputed on demand
//! - **Band**: High / Medium / Low classification of a metric value
//! - **ThresholdRule**: Declarative thresholds, labels and colors for one metric
//!
//! # Example
//!
//! ```rust
//! use opsboard_core::kpi::{build_summary, Band, MetricKind};
//! use opsboard_core::Record;
//!
//! let records = vec![
//!     Record::new("1").status("Delivered").approval("Pending").hours(4.0),
//!     Record::new("2").status("In Progress").payment_status("Unpaid").hours(2.5),
//! ];
//!
//! let summary = build_summary(&records);
//! assert_eq!(summary.total, 2);
//! assert_eq!(summary.completion_rate, 50.0);
//! assert_eq!(summary.total_hours, 6.5);
//!
//! let card = summary.card(MetricKind::PendingApprovals).unwrap();
//! assert_eq!(card.band, Some(Band::Low));
//! assert_eq!(card.subtitle, "All caught up");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Record, DEFAULT_COMPLETED_STATUSES};

// ============================================================================
// Classification
// ============================================================================

/// Three-tier classification of a metric value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    High,
    Medium,
    Low,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::High => "High",
            Band::Medium => "Medium",
            Band::Low => "Low",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One string per band
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandText {
    pub high: String,
    pub medium: String,
    pub low: String,
}

impl BandText {
    pub fn new(high: impl Into<String>, medium: impl Into<String>, low: impl Into<String>) -> Self {
        Self {
            high: high.into(),
            medium: medium.into(),
            low: low.into(),
        }
    }

    pub fn get(&self, band: Band) -> &str {
        match band {
            Band::High => &self.high,
            Band::Medium => &self.medium,
            Band::Low => &self.low,
        }
    }
}

/// Metrics shown as dashboard cards
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    TotalRecords,
    PendingApprovals,
    PendingPayments,
    CompletionRate,
    TotalHours,
    AvgUploadTime,
}

impl MetricKind {
    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::TotalRecords => "Total Orders",
            MetricKind::PendingApprovals => "Pending Approvals",
            MetricKind::PendingPayments => "Pending Payments",
            MetricKind::CompletionRate => "Completion Rate",
            MetricKind::TotalHours => "Total Hours",
            MetricKind::AvgUploadTime => "Avg Upload Time",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Thresholds, labels and colors for one metric.
///
/// A value at or above `high` is [`Band::High`], at or above `medium` is
/// [`Band::Medium`], anything lower is [`Band::Low`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub metric: MetricKind,
    pub high: f64,
    pub medium: f64,
    pub labels: BandText,
    #[serde(default = "default_band_colors")]
    pub colors: BandText,
}

fn default_band_colors() -> BandText {
    BandText::new("#f44336", "#ff9800", "#4caf50")
}

impl ThresholdRule {
    pub fn new(metric: MetricKind, high: f64, medium: f64, labels: BandText) -> Self {
        Self {
            metric,
            high,
            medium,
            labels,
            colors: default_band_colors(),
        }
    }

    pub fn band(&self, value: f64) -> Band {
        match value {
            v if v >= self.high => Band::High,
            v if v >= self.medium => Band::Medium,
            _ => Band::Low,
        }
    }

    /// Band plus its label and color
    pub fn classify(&self, value: f64) -> Classification {
        let band = self.band(value);
        Classification {
            band,
            label: self.labels.get(band).to_string(),
            color: self.colors.get(band).to_string(),
        }
    }
}

/// Result of evaluating a value against a [`ThresholdRule`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub band: Band,
    pub label: String,
    pub color: String,
}

/// Threshold table used by the order dashboard
pub fn default_threshold_rules() -> Vec<ThresholdRule> {
    vec![
        ThresholdRule::new(
            MetricKind::TotalRecords,
            100.0,
            50.0,
            BandText::new("High volume", "Moderate", "Low volume"),
        ),
        ThresholdRule::new(
            MetricKind::PendingApprovals,
            10.0,
            5.0,
            BandText::new("High priority", "Attention needed", "All caught up"),
        ),
        ThresholdRule::new(
            MetricKind::PendingPayments,
            10.0,
            5.0,
            BandText::new("Urgent follow-up", "Follow up required", "On track"),
        ),
        // Lower is better: under 1h is excellent, 3h or more needs work
        ThresholdRule::new(
            MetricKind::AvgUploadTime,
            3.0,
            1.0,
            BandText::new("Needs improvement", "Good", "Excellent"),
        ),
    ]
}

// ============================================================================
// Configuration
// ============================================================================

/// What the KPI builder counts and how it classifies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiConfig {
    /// Approval value counted as pending
    pub pending_approval: String,
    /// Payment status counted as outstanding
    pub unpaid_status: String,
    /// Statuses that always appear in `status_counts`, even at zero
    pub tracked_statuses: Vec<String>,
    /// Statuses that count as completed for the completion rate
    pub completed_statuses: Vec<String>,
    pub thresholds: Vec<ThresholdRule>,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            pending_approval: "Pending".into(),
            unpaid_status: "Unpaid".into(),
            tracked_statuses: Vec::new(),
            completed_statuses: DEFAULT_COMPLETED_STATUSES.iter().map(|s| s.to_string()).collect(),
            thresholds: default_threshold_rules(),
        }
    }
}

impl KpiConfig {
    pub fn rule(&self, metric: MetricKind) -> Option<&ThresholdRule> {
        self.thresholds.iter().find(|r| r.metric == metric)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// A dashboard card: value, subtitle and classification for one metric
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub metric: MetricKind,
    pub title: String,
    /// Display value ("12", "66.7%", "3.5h")
    pub value: String,
    pub raw: f64,
    /// Denominator shown next to the value, when meaningful
    pub total: Option<usize>,
    pub subtitle: String,
    /// Present for metrics with a threshold rule
    pub band: Option<Band>,
    pub color: String,
}

/// Aggregated dashboard metrics.
///
/// Derived from a record slice; never stored. Building twice from the same
/// records yields equal summaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Number of records
    pub total: usize,
    /// Record count per status (observed and tracked)
    pub status_counts: BTreeMap<String, usize>,
    /// Records awaiting approval
    pub pending_approvals: usize,
    /// Records with an outstanding payment
    pub pending_payments: usize,
    /// Records in a completed status
    pub completed: usize,
    /// completed / total as a percentage, one decimal; 0 when empty
    pub completion_rate: f64,
    /// Sum of estimated hours
    pub total_hours: f64,
    /// Mean upload time over records that track it; 0 when none do
    pub avg_upload_hours: f64,
    pub cards: Vec<KpiCard>,
}

impl KpiSummary {
    /// Count of records in `status`, zero when never seen
    pub fn count_for(&self, status: &str) -> usize {
        self.status_counts.get(status.trim()).copied().unwrap_or(0)
    }

    pub fn card(&self, metric: MetricKind) -> Option<&KpiCard> {
        self.cards.iter().find(|c| c.metric == metric)
    }
}

/// Computes [`KpiSummary`] values under a [`KpiConfig`]
#[derive(Clone, Debug, Default)]
pub struct KpiBuilder {
    config: KpiConfig,
}

impl KpiBuilder {
    pub fn new(config: KpiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KpiConfig {
        &self.config
    }

    /// Aggregate `records` into a summary
    pub fn build<'a, I>(&self, records: I) -> KpiSummary
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut total = 0usize;
        let mut pending_approvals = 0usize;
        let mut pending_payments = 0usize;
        let mut completed = 0usize;
        let mut total_hours = 0.0;
        let mut upload_sum = 0.0;
        let mut upload_count = 0usize;

        let mut status_counts: BTreeMap<String, usize> = self
            .config
            .tracked_statuses
            .iter()
            .map(|s| (s.trim().to_string(), 0))
            .collect();

        for record in records {
            total += 1;

            let status = record.status.trim();
            if !status.is_empty() {
                *status_counts.entry(status.to_string()).or_default() += 1;
            }
            if same_value(&record.approval, &self.config.pending_approval) {
                pending_approvals += 1;
            }
            if same_value(&record.payment_status, &self.config.unpaid_status) {
                pending_payments += 1;
            }
            if record.is_completed_by(self.config.completed_statuses.as_slice()) {
                completed += 1;
            }
            if record.estimated_hours.is_finite() {
                total_hours += record.estimated_hours;
            }
            if let Some(hours) = record.upload_hours.filter(|h| h.is_finite()) {
                upload_sum += hours;
                upload_count += 1;
            }
        }

        let completion_rate = if total == 0 {
            0.0
        } else {
            round1(completed as f64 * 100.0 / total as f64)
        };
        let avg_upload_hours = if upload_count == 0 {
            0.0
        } else {
            upload_sum / upload_count as f64
        };

        let mut summary = KpiSummary {
            total,
            status_counts,
            pending_approvals,
            pending_payments,
            completed,
            completion_rate,
            total_hours,
            avg_upload_hours,
            cards: Vec::new(),
        };
        summary.cards = self.cards(&summary);
        summary
    }

    fn cards(&self, summary: &KpiSummary) -> Vec<KpiCard> {
        vec![
            self.card(MetricKind::TotalRecords, summary.total as f64, summary.total.to_string(), None, String::new()),
            self.card(
                MetricKind::PendingApprovals,
                summary.pending_approvals as f64,
                summary.pending_approvals.to_string(),
                None,
                String::new(),
            ),
            self.card(
                MetricKind::PendingPayments,
                summary.pending_payments as f64,
                summary.pending_payments.to_string(),
                Some(summary.total),
                String::new(),
            ),
            self.card(
                MetricKind::CompletionRate,
                summary.completion_rate,
                format!("{:.1}%", summary.completion_rate),
                Some(summary.total),
                format!("{} delivered", summary.completed),
            ),
            self.card(
                MetricKind::TotalHours,
                summary.total_hours,
                format!("{:.1}", summary.total_hours),
                None,
                format!("across {} records", summary.total),
            ),
            self.card(
                MetricKind::AvgUploadTime,
                summary.avg_upload_hours,
                format!("{:.1}h", summary.avg_upload_hours),
                None,
                String::new(),
            ),
        ]
    }

    /// Rule-driven subtitle and color win; `fallback_subtitle` is used for
    /// metrics without a rule
    fn card(
        &self,
        metric: MetricKind,
        raw: f64,
        value: String,
        total: Option<usize>,
        fallback_subtitle: String,
    ) -> KpiCard {
        let classification = self.config.rule(metric).map(|rule| rule.classify(raw));
        let (band, subtitle, color) = match classification {
            Some(c) => (Some(c.band), c.label, c.color),
            None => (None, fallback_subtitle, "#1976d2".to_string()),
        };
        KpiCard {
            metric,
            title: metric.title().to_string(),
            value,
            raw,
            total,
            subtitle,
            band,
            color,
        }
    }
}

/// Summarize records with the default configuration
pub fn build_summary(records: &[Record]) -> KpiSummary {
    KpiBuilder::default().build(records)
}

fn same_value(actual: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();
    !wanted.is_empty() && actual.trim().eq_ignore_ascii_case(wanted)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Tests
// ============================================================================
