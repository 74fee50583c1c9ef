//! Plain text KPI summary for console output

use opsboard_core::kpi::{KpiBuilder, KpiSummary};
use opsboard_core::{Record, RenderError, Renderer};
use std::fmt::Write;

/// Renders a [`KpiSummary`] as aligned text
#[derive(Clone, Debug, Default)]
pub struct SummaryRenderer {
    builder: KpiBuilder,
    /// Omit the per-status breakdown
    pub hide_statuses: bool,
}

impl SummaryRenderer {
    pub fn new(builder: KpiBuilder) -> Self {
        Self {
            builder,
            hide_statuses: false,
        }
    }

    pub fn hide_statuses(mut self) -> Self {
        self.hide_statuses = true;
        self
    }

    /// Format an already built summary
    pub fn format(&self, summary: &KpiSummary) -> String {
        let mut out = String::new();
        let label_width = summary
            .cards
            .iter()
            .map(|c| c.title.len())
            .chain(summary.status_counts.keys().map(|s| s.chars().count() + 2))
            .max()
            .unwrap_or(0)
            .max(12);

        let _ = writeln!(out, "Summary ({} records)", summary.total);
        for card in &summary.cards {
            let value = match card.total {
                Some(total) => format!("{} / {}", card.value, total),
                None => card.value.clone(),
            };
            let _ = write!(out, "  {:<width$}  {:>10}", card.title, value, width = label_width);
            if !card.subtitle.is_empty() {
                let _ = write!(out, "  {}", card.subtitle);
            }
            if let Some(band) = card.band {
                let _ = write!(out, " [{band}]");
            }
            out.push('\n');
        }

        if !self.hide_statuses && !summary.status_counts.is_empty() {
            out.push_str("\nBy status\n");
            for (status, count) in &summary.status_counts {
                let _ = writeln!(out, "  {:<width$}  {:>10}", status, count, width = label_width);
            }
        }
        out
    }
}

impl Renderer for SummaryRenderer {
    type Output = String;

    fn render(&self, records: &[Record]) -> Result<String, RenderError> {
        Ok(self.format(&self.builder.build(records)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new("1").status("Solved").approval("Pending").hours(2.0),
            Record::new("2").status("New").payment_status("Unpaid"),
            Record::new("3").status("Solved"),
        ]
    }

    #[test]
    fn lists_cards_and_statuses() {
        let text = SummaryRenderer::default().render(&records()).unwrap();
        assert!(text.starts_with("Summary (3 records)\n"));
        assert!(text.contains("Total Orders"));
        assert!(text.contains("66.7%"));
        assert!(text.contains("All caught up [Low]"));
        assert!(text.contains("1 / 3"));
        assert!(text.contains("By status"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("Solved") && l.trim_end().ends_with('2')));
    }

    #[test]
    fn statuses_can_be_hidden() {
        let text = SummaryRenderer::default().hide_statuses().render(&records()).unwrap();
        assert!(!text.contains("By status"));
    }

    #[test]
    fn empty_collection_renders() {
        let text = SummaryRenderer::default().render(&[]).unwrap();
        assert!(text.contains("Summary (0 records)"));
        assert!(text.contains("0.0%"));
        assert!(!text.contains("By status"));
    }
}
