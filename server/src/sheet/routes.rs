//! HTTP route handlers for the tabular data API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::export::{chunk_and_write, create_sheet_with_table, normalize_rows};
use super::service::SheetService;
use super::types::{RangeData, Row, SheetError, spreadsheet_url};
use crate::deck::AssetService;
use crate::error::ExternalError;

/// Application state containing the tabular backend
#[derive(Clone)]
pub struct SheetAppState {
    pub sheets: Arc<dyn SheetService>,
    pub assets: Arc<dyn AssetService>,
    /// Folder newly created spreadsheets default into
    pub default_folder_id: Option<String>,
}

/// Error response for the tabular data API
#[derive(Debug, Serialize)]
pub struct SheetErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<SheetError> for SheetErrorResponse {
    fn from(e: SheetError) -> Self {
        let code = match &e {
            SheetError::Validation(_) => "validation",
            SheetError::External(inner) => inner.code(),
        };
        Self {
            error: user_facing_message(&e),
            code: code.to_string(),
        }
    }
}

impl From<ExternalError> for SheetErrorResponse {
    fn from(e: ExternalError) -> Self {
        SheetErrorResponse::from(SheetError::External(e))
    }
}

impl IntoResponse for SheetErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "validation" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Translate backend failures into actionable messages. Messaging only; the
/// pipeline never branches on these.
fn user_facing_message(e: &SheetError) -> String {
    match e {
        SheetError::Validation(msg) => msg.clone(),
        SheetError::External(ExternalError::NotFound { .. }) => {
            "Spreadsheet not found. Please check the spreadsheet ID.".into()
        }
        SheetError::External(ExternalError::PermissionDenied { .. }) => {
            "Permission denied. Please check your credentials and sheet permissions.".into()
        }
        SheetError::External(ExternalError::QuotaExceeded { .. }) => {
            "API quota exceeded. Please try again later.".into()
        }
        SheetError::External(inner) => format!("Failed to export data: {inner}"),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default = "default_export_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "default_start_cell")]
    pub start_cell: String,
    #[serde(default)]
    pub clear_existing: bool,
}

fn default_export_sheet_name() -> String {
    "Sheet1".into()
}

fn default_start_cell() -> String {
    "A1".into()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub message: String,
    pub spreadsheet_id: String,
    pub spreadsheet_url: String,
    pub rows_inserted: usize,
    pub columns_inserted: usize,
    pub batches_processed: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    #[serde(default = "default_table_title")]
    pub title: String,
    #[serde(default)]
    pub table_data: Vec<Row>,
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    #[serde(default = "default_table_sheet_name")]
    pub sheet_name: String,
    #[serde(rename = "folderID", default)]
    pub folder_id: Option<String>,
}

fn default_table_title() -> String {
    "Table Export".into()
}

fn default_table_sheet_name() -> String {
    "Data".into()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetDimensions {
    pub rows: u32,
    pub columns: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableResponse {
    pub message: String,
    pub spreadsheet_id: String,
    pub spreadsheet_url: String,
    pub total_rows: usize,
    pub data_rows: usize,
    pub sheet_dimensions: SheetDimensions,
    pub batches_processed: usize,
    pub has_headers: bool,
}

#[derive(Debug, Serialize)]
pub struct RangeReadResponse {
    pub message: String,
    pub data: Vec<Vec<Value>>,
    /// True when the read succeeded but the range held no rows.
    pub empty: bool,
}

/// A named region of the source spreadsheet exposed as a read endpoint.
struct NamedRange {
    route: &'static str,
    range: &'static str,
    label: &'static str,
}

/// The full set of pass-through range reads. One handler serves them all;
/// only the range and response label vary.
const NAMED_RANGES: &[NamedRange] = &[
    NamedRange { route: "get-all-data", range: "all!A:Z", label: "all data" },
    NamedRange { route: "media-plan", range: "MediaPlan!A:Z", label: "Media Plan data" },
    NamedRange { route: "sem", range: "SEM Details!A:T", label: "SEM data" },
    NamedRange { route: "gg-demographic", range: "GG Demographic!A:U", label: "GG Demographic data" },
    NamedRange { route: "gdn", range: "GDN Details!A:T", label: "GDN data" },
    NamedRange { route: "disc", range: "Disc Details!A:T", label: "Discovery data" },
    NamedRange { route: "youtube", range: "YT Details!A:Z", label: "Youtube data" },
    NamedRange { route: "tiktok", range: "TikTok Details!A:T", label: "TikTok data" },
    NamedRange { route: "line", range: "Line Details!A:ES", label: "Line data" },
    NamedRange { route: "taboola", range: "Taboola Daily!A:T", label: "Taboola data" },
    NamedRange { route: "facebook", range: "FB Details!A:AG", label: "Facebook data" },
    NamedRange { route: "fb-picture", range: "FB Creative_TEST!A:L", label: "Facebook picture" },
    NamedRange { route: "fb-demographic", range: "FB Demographic!A:T", label: "FB Demographic data" },
];

/// POST /data-sheets/export-data-to-existing-sheet
pub async fn export_to_existing_sheet(
    State(state): State<SheetAppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, SheetErrorResponse> {
    if req.spreadsheet_id.is_empty() {
        return Err(SheetError::Validation("Spreadsheet ID is required".into()).into());
    }
    if req.data.is_empty() {
        return Err(
            SheetError::Validation("Data array is required and must not be empty".into()).into(),
        );
    }

    tracing::info!(
        "exporting {} rows to existing sheet {}",
        req.data.len(),
        req.spreadsheet_id
    );

    let grid = normalize_rows(req.data, None);
    let summary = chunk_and_write(
        state.sheets.as_ref(),
        &req.spreadsheet_id,
        &grid,
        &req.sheet_name,
        &req.start_cell,
        req.clear_existing,
    )
    .await
    .map_err(|e| {
        tracing::error!("export to {} failed: {}", req.spreadsheet_id, e);
        SheetErrorResponse::from(e)
    })?;

    Ok(Json(ExportResponse {
        message: "Data exported to existing sheet successfully".into(),
        spreadsheet_url: spreadsheet_url(&req.spreadsheet_id),
        spreadsheet_id: req.spreadsheet_id,
        rows_inserted: summary.rows,
        columns_inserted: summary.columns,
        batches_processed: summary.batches,
    }))
}

/// POST /data-sheets/create-sheet-with-table
pub async fn create_table_sheet(
    State(state): State<SheetAppState>,
    Json(req): Json<CreateTableRequest>,
) -> Result<Json<CreateTableResponse>, SheetErrorResponse> {
    if req.table_data.is_empty() {
        return Err(
            SheetError::Validation("Table data is required and must not be empty".into()).into(),
        );
    }

    let folder = req.folder_id.or_else(|| state.default_folder_id.clone());
    let summary = create_sheet_with_table(
        state.sheets.as_ref(),
        state.assets.as_ref(),
        &req.title,
        &req.sheet_name,
        folder.as_deref(),
        req.table_data,
        req.headers,
    )
    .await
    .map_err(|e| {
        tracing::error!("create table sheet '{}' failed: {}", req.title, e);
        SheetErrorResponse::from(e)
    })?;

    Ok(Json(CreateTableResponse {
        message: "Table sheet created successfully".into(),
        spreadsheet_url: spreadsheet_url(&summary.spreadsheet_id),
        spreadsheet_id: summary.spreadsheet_id,
        total_rows: summary.total_rows,
        data_rows: summary.data_rows,
        sheet_dimensions: SheetDimensions {
            rows: summary.sheet_rows,
            columns: summary.sheet_columns,
        },
        batches_processed: summary.batches,
        has_headers: summary.has_headers,
    }))
}

async fn read_named_range(
    state: SheetAppState,
    spreadsheet_id: String,
    named: &'static NamedRange,
) -> Result<Json<RangeReadResponse>, SheetErrorResponse> {
    let values = state
        .sheets
        .read_range(&spreadsheet_id, named.range)
        .await
        .map_err(|e| {
            tracing::error!(
                "failed to read {} from {}: {}",
                named.range,
                spreadsheet_id,
                e
            );
            SheetErrorResponse::from(e)
        })?;

    match RangeData::from_values(values) {
        RangeData::Found(data) => Ok(Json(RangeReadResponse {
            message: format!("{} fetched successfully", named.label),
            data,
            empty: false,
        })),
        RangeData::Empty => Ok(Json(RangeReadResponse {
            message: format!("no {} found", named.label),
            data: Vec::new(),
            empty: true,
        })),
    }
}

/// Build tabular data API routes
pub fn sheet_routes(state: SheetAppState) -> Router {
    let mut router = Router::new()
        .route("/export-data-to-existing-sheet", post(export_to_existing_sheet))
        .route("/create-sheet-with-table", post(create_table_sheet));

    for named in NAMED_RANGES {
        router = router.route(
            &format!("/{}/:id", named.route),
            get(
                move |State(state): State<SheetAppState>, Path(id): Path<String>| {
                    read_named_range(state, id, named)
                },
            ),
        );
    }

    router.with_state(state)
}
