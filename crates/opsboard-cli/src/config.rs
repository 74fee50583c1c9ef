//! CLI Configuration
//!
//! Read from `opsboard.toml`. Every section is optional:
//!
//! ```toml
//! [search]
//! fields = ["subject", "id", "company_name"]
//!
//! [kpi]
//! tracked_statuses = ["New", "Solved"]
//!
//! [[kpi.thresholds]]
//! metric = "pending_approvals"
//! high = 20
//! medium = 8
//! labels = { high = "Backlog", medium = "Busy", low = "Clear" }
//!
//! [export]
//! utc_offset_minutes = 0
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use opsboard_core::filter::FilterEngine;
use opsboard_core::kpi::{KpiBuilder, KpiConfig};
use opsboard_core::{Field, DEFAULT_SEARCH_FIELDS};
use opsboard_render::rows::{validate_date_format, DEFAULT_DATE_FORMAT, DEFAULT_UTC_OFFSET_MINUTES};
use opsboard_render::{ExportFormatter, ExportLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "opsboard.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kpi: KpiConfig,
    pub search: SearchConfig,
    pub export: ExportConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields free-text search runs against
    pub fields: Vec<Field>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_SEARCH_FIELDS.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub utc_offset_minutes: i32,
    pub date_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            date_format: DEFAULT_DATE_FORMAT.into(),
        }
    }
}

impl Config {
    /// Load `path`, or `opsboard.toml` if present, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE)),
            None => {
                debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        validate_date_format(&config.export.date_format).map_err(|e| anyhow!("[export] {e}"))?;
        Ok(config)
    }

    pub fn filter_engine(&self, today: NaiveDate) -> FilterEngine {
        FilterEngine::new(today)
            .search_fields(self.search.fields.clone())
            .completed_statuses(self.kpi.completed_statuses.clone())
    }

    pub fn kpi_builder(&self) -> KpiBuilder {
        KpiBuilder::new(self.kpi.clone())
    }

    pub fn export_formatter(&self, layout: ExportLayout) -> ExportFormatter {
        ExportFormatter::new()
            .layout(layout)
            .utc_offset_minutes(self.export.utc_offset_minutes)
            .date_format(self.export.date_format.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsboard_core::kpi::MetricKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml(
            r#"
            [search]
            fields = ["subject", "category"]

            [kpi]
            tracked_statuses = ["New"]
            completed_statuses = ["Shipped"]

            [[kpi.thresholds]]
            metric = "pending_approvals"
            high = 20
            medium = 8
            labels = { high = "Backlog", medium = "Busy", low = "Clear" }

            [export]
            utc_offset_minutes = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.search.fields, vec![Field::Subject, Field::Category]);
        assert_eq!(config.kpi.tracked_statuses, vec!["New".to_string()]);
        assert_eq!(config.kpi.pending_approval, "Pending");
        assert_eq!(config.kpi.thresholds.len(), 1);

        let rule = config.kpi.rule(MetricKind::PendingApprovals).unwrap();
        assert_eq!(rule.high, 20.0);
        assert_eq!(rule.labels.low, "Clear");
        assert_eq!(rule.colors.high, "#f44336");

        assert_eq!(config.export.utc_offset_minutes, 0);
        assert_eq!(config.export.date_format, "%d-%m-%Y");
    }

    #[test]
    fn unknown_field_is_an_error() {
        assert!(Config::from_toml("[search]\nfields = [\"nope\"]").is_err());
    }

    #[test]
    fn invalid_date_format_is_an_error() {
        let err = Config::from_toml("[export]\ndate_format = \"%Q\"").unwrap_err();
        assert!(err.to_string().contains("invalid date format"));

        let config = Config::from_toml("[export]\ndate_format = \"%Y/%m/%d\"").unwrap();
        assert_eq!(config.export.date_format, "%Y/%m/%d");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opsboard.toml");
        fs::write(&path, "[export]\nutc_offset_minutes = 60\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.export.utc_offset_minutes, 60);
        assert_eq!(config.export_formatter(ExportLayout::Tickets).utc_offset_minutes, 60);
    }
}
