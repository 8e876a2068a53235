//! SheetService trait definition

use async_trait::async_trait;

use super::types::Grid;
use crate::error::ExternalError;

/// Trait for the tabular backend (Google Sheets or a test double).
#[async_trait]
pub trait SheetService: Send + Sync {
    /// Read a range. `None` means the range exists but holds no values.
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Option<Grid>, ExternalError>;

    /// Overwrite a range with raw (uninterpreted) values.
    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &Grid,
    ) -> Result<(), ExternalError>;

    /// Clear a range.
    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> Result<(), ExternalError>;

    /// Create a spreadsheet with one sheet pre-sized to `rows`x`cols`.
    /// Returns the new spreadsheet id.
    async fn create_spreadsheet(
        &self,
        title: &str,
        sheet_name: &str,
        rows: u32,
        cols: u32,
    ) -> Result<String, ExternalError>;

    /// Resize the first sheet's grid.
    async fn resize_grid(
        &self,
        spreadsheet_id: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), ExternalError>;

    /// Bold and shade the header row of the first sheet.
    async fn format_header_row(
        &self,
        spreadsheet_id: &str,
        columns: u32,
    ) -> Result<(), ExternalError>;
}
