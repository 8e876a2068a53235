//! Sheet-related types and error definitions

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::ExternalError;

/// A rectangular block of cell values.
pub type Grid = Vec<Vec<Value>>;

/// Errors that can occur in the tabular export pipeline
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    External(#[from] ExternalError),
}

/// One inbound row, as supplied by the caller. Resolved to a uniform grid
/// once at ingestion instead of branching on shape throughout.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Row {
    /// A positional sequence of cells
    Positional(Vec<Value>),
    /// A keyed record; iteration order is document order
    Keyed(IndexMap<String, Value>),
    /// Any other scalar becomes a single-cell row
    Scalar(Value),
}

/// Result of a range read. Empty is a distinct, successful outcome rather
/// than a silent null.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeData {
    Found(Grid),
    Empty,
}

impl RangeData {
    pub fn from_values(values: Option<Grid>) -> Self {
        match values {
            Some(rows) if !rows.is_empty() => Self::Found(rows),
            _ => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Canonical edit URL for a spreadsheet.
pub fn spreadsheet_url(spreadsheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/edit")
}
