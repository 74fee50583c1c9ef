//! Excel export renderer
//!
//! Writes flattened [`ExportRow`]s to a single-sheet XLSX workbook:
//! - Bold, filled header row, frozen while scrolling
//! - Column widths sized to content (capped)
//! - Numbers written as numbers, everything else as text
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Tickets
//! | TicketNo | ProjectCode | UserName | Subject      | ... | CommentsCount | Comment 1                          |
//! |----------|-------------|----------|--------------|-----|---------------|------------------------------------|
//! | I15015   | ACME        | asha     | Login fails  | ... | 1             | {"message":"..","time":"..","by":".."} |
//! | I15017   | GLX         | -        | Export error | ... | 0             |                                    |
//! ```

use chrono::NaiveDate;
use opsboard_core::{Record, RenderError, Renderer};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

use crate::rows::{Cell, ExportFormatter, ExportLayout, ExportRow};

const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 60;

/// XLSX export renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Row flattening (layout, date offset and format)
    pub formatter: ExportFormatter,
    /// Overrides the layout's sheet name
    pub sheet_name: Option<String>,
    /// Whether to keep the header row visible while scrolling
    pub freeze_header: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            formatter: ExportFormatter::default(),
            sheet_name: None,
            freeze_header: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column layout
    pub fn layout(mut self, layout: ExportLayout) -> Self {
        self.formatter.layout = layout;
        self
    }

    /// Set the UTC offset dates are rendered in
    pub fn utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.formatter.utc_offset_minutes = minutes;
        self
    }

    pub fn formatter(mut self, formatter: ExportFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Disable the frozen header row
    pub fn no_freeze(mut self) -> Self {
        self.freeze_header = false;
        self
    }

    /// Suggested file name for an export made on `date`
    pub fn file_name(&self, date: NaiveDate) -> String {
        self.formatter.layout.file_name(date)
    }

    /// Generate Excel workbook bytes for `records`
    pub fn render_to_bytes(&self, records: &[Record]) -> Result<Vec<u8>, RenderError> {
        if records.is_empty() {
            return Err(RenderError::InvalidData("no records to export".into()));
        }
        let columns = self.formatter.columns(records);
        let rows = self.formatter.rows(records);
        self.rows_to_bytes(&columns, &rows)
    }

    /// Generate Excel workbook bytes from already flattened rows
    pub fn rows_to_bytes(&self, columns: &[String], rows: &[ExportRow]) -> Result<Vec<u8>, RenderError> {
        if rows.is_empty() {
            return Err(RenderError::InvalidData("no rows to export".into()));
        }

        let mut workbook = Workbook::new();
        let formats = ExcelFormats::new();
        let name = self
            .sheet_name
            .as_deref()
            .unwrap_or_else(|| self.formatter.layout.sheet_name());

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        self.write_header(sheet, columns, &formats)?;
        for (i, row) in rows.iter().enumerate() {
            let excel_row = u32::try_from(i + 1)
                .map_err(|_| RenderError::InvalidData(format!("too many rows: {}", rows.len())))?;
            self.write_row(sheet, excel_row, columns, row, &formats)?;
        }

        for (col, width) in column_widths(columns, rows).into_iter().enumerate() {
            sheet.set_column_width(col as u16, width as f64).ok();
        }
        if self.freeze_header {
            sheet.set_freeze_panes(1, 0).ok();
        }
        debug!(sheet = name, rows = rows.len(), columns = columns.len(), "rendered workbook");

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    fn write_header(
        &self,
        sheet: &mut Worksheet,
        columns: &[String],
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        if columns.len() > usize::from(u16::MAX) {
            return Err(RenderError::InvalidData(format!("too many columns: {}", columns.len())));
        }
        for (col, header) in columns.iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, header.as_str(), &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        Ok(())
    }

    /// Cells are placed by column name so a row with a different column
    /// order still lands under the right headers
    fn write_row(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        columns: &[String],
        data: &ExportRow,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        for (col, column) in columns.iter().enumerate() {
            let col = col as u16;
            match data.get(column) {
                Some(Cell::Number(n)) => {
                    sheet
                        .write_with_format(row, col, *n, &formats.number)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                }
                Some(Cell::Text(s)) if !s.is_empty() => {
                    sheet
                        .write_with_format(row, col, s.as_str(), &formats.text)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                }
                _ => {
                    sheet
                        .write_blank(row, col, &formats.text)
                        .map_err(|e| RenderError::Format(e.to_string()))?;
                }
            }
        }
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, records: &[Record]) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(records)
    }
}

/// Reusable cell formats
struct ExcelFormats {
    header: Format,
    text: Format,
    number: Format,
}

impl ExcelFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);

        let number = Format::new()
            .set_num_format("0")
            .set_align(FormatAlign::Right)
            .set_border(FormatBorder::Thin);

        Self { header, text, number }
    }
}

/// Width per column: the widest header or value, clamped
fn column_widths(columns: &[String], rows: &[ExportRow]) -> Vec<usize> {
    columns
        .iter()
        .map(|column| {
            let widest = rows
                .iter()
                .filter_map(|r| r.get(column))
                .map(Cell::width)
                .max()
                .unwrap_or(0)
                .max(column.chars().count());
            (widest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsboard_core::Comment;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_xlsx_bytes() {
        let records = vec![
            Record::new("I15015").subject("Login fails").comment(Comment::new("on it").by("Asha")),
            Record::new("I15017").subject("Export error"),
        ];
        let bytes = ExcelRenderer::new().render_to_bytes(&records).unwrap();
        // XLSX is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn default_matches_new() {
        let renderer = ExcelRenderer::default();
        assert!(renderer.freeze_header);
        assert!(!renderer.clone().no_freeze().freeze_header);
        assert_eq!(renderer.sheet_name, ExcelRenderer::new().sheet_name);
        assert_eq!(renderer.formatter.layout, ExcelRenderer::new().formatter.layout);
    }

    #[test]
    fn empty_input_is_invalid() {
        let err = ExcelRenderer::new().render_to_bytes(&[]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidData(_)));
    }

    #[test]
    fn bad_sheet_name_is_format_error() {
        let err = ExcelRenderer::new()
            .sheet_name("bad/name[1]")
            .render_to_bytes(&[Record::new("1")])
            .unwrap_err();
        assert!(matches!(err, RenderError::Format(_)));
    }

    #[test]
    fn widths_follow_content() {
        let columns = vec!["Id".to_string(), "Subject".to_string()];
        let records = vec![Record::new("1").subject("x".repeat(100))];
        let rows = ExportFormatter::new().rows(&records);
        assert_eq!(column_widths(&columns, &rows), vec![MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH]);
    }

    #[test]
    fn file_name_follows_layout() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let renderer = ExcelRenderer::new().layout(ExportLayout::CallLogs);
        assert_eq!(renderer.file_name(date), "CallLog_Report_2026-03-02.xlsx");
    }
}
