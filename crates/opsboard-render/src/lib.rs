//! # opsboard-render
//!
//! Output backends for opsboard record collections.
//!
//! This crate provides:
//! - Export row flattening (`to_export_rows`, `ExportFormatter`)
//! - XLSX export (`ExcelRenderer`)
//! - Plain text KPI summaries (`SummaryRenderer`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use opsboard_core::Renderer;
//! use opsboard_render::{to_export_rows, ExcelRenderer, ExportLayout, SummaryRenderer};
//!
//! // Uniform rows, comments flattened into "Comment N" columns
//! let rows = to_export_rows(&records);
//!
//! // Ticket workbook
//! let xlsx_bytes = ExcelRenderer::new().render(&records)?;
//! std::fs::write("Tickets.xlsx", xlsx_bytes)?;
//!
//! // Call log workbook
//! let call_logs = ExcelRenderer::new().layout(ExportLayout::CallLogs).render(&calls)?;
//!
//! // Console summary
//! println!("{}", SummaryRenderer::default().render(&records)?);
//! ```

pub mod excel;
pub mod rows;
pub mod summary;

pub use excel::ExcelRenderer;
pub use rows::{to_export_rows, Cell, ExportFormatter, ExportLayout, ExportRow};
pub use summary::SummaryRenderer;
