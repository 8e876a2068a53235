//! Tabular data: range reads, row normalization, and chunked exports
//!
//! This module provides:
//! - `Row` tagged union for heterogeneous inbound rows
//! - `normalize_rows` / chunked writes with fixed pacing
//! - `SheetService` trait abstracting the tabular backend
//! - HTTP routes for `/data-sheets/*` export and range-read endpoints

pub mod export;
pub mod routes;
mod service;
mod types;

pub use export::{ExportSummary, TableSummary, chunk_and_write, create_sheet_with_table, normalize_rows};
pub use routes::{SheetAppState, sheet_routes};
pub use service::SheetService;
pub use types::{Grid, RangeData, Row, SheetError, spreadsheet_url};
