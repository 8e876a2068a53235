//! Common Test Utilities for Integration Tests
//!
//! Shared mock backends and request helpers used across integration test
//! modules. The mocks record every call so scenarios can assert exactly what
//! the pipelines did.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bytes::Bytes;
use serde_json::Value;
use sheetdeck_server::auth::{AuthAppState, CredentialService, MemoryUserStore, auth_routes};
use sheetdeck_server::deck::{AssetService, BatchOp, DeckAppState, DeckService, deck_routes};
use sheetdeck_server::error::ExternalError;
use sheetdeck_server::sheet::{Grid, SheetAppState, SheetService, sheet_routes};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

fn external(context: &'static str, message: &str) -> ExternalError {
    ExternalError::Api {
        context,
        message: message.to_string(),
    }
}

/// Recording asset backend.
#[derive(Default)]
pub struct MockAssetService {
    pub uploads: Mutex<Vec<String>>,
    pub grants: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
    pub moves: Mutex<Vec<(String, String)>>,
    /// When true every upload fails.
    pub fail_uploads: bool,
    /// When true every delete fails (cleanup must still be attempted).
    pub fail_deletes: bool,
}

impl MockAssetService {
    pub fn call_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
            + self.grants.lock().unwrap().len()
            + self.deletes.lock().unwrap().len()
            + self.moves.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetService for MockAssetService {
    async fn upload_asset(
        &self,
        _bytes: Bytes,
        name: &str,
        _folder_id: Option<&str>,
    ) -> Result<String, ExternalError> {
        if self.fail_uploads {
            return Err(external("drive.files.create", "upload rejected"));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(name.to_string());
        Ok(format!("asset-{}", uploads.len()))
    }

    async fn grant_public_read(&self, asset_id: &str) -> Result<(), ExternalError> {
        self.grants.lock().unwrap().push(asset_id.to_string());
        Ok(())
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), ExternalError> {
        self.deletes.lock().unwrap().push(asset_id.to_string());
        if self.fail_deletes {
            return Err(external("drive.files.delete", "delete rejected"));
        }
        Ok(())
    }

    async fn move_to_folder(&self, file_id: &str, folder_id: &str) -> Result<(), ExternalError> {
        self.moves
            .lock()
            .unwrap()
            .push((file_id.to_string(), folder_id.to_string()));
        Ok(())
    }
}

/// Recording presentation backend.
#[derive(Default)]
pub struct MockDeckService {
    pub created_titles: Mutex<Vec<String>>,
    pub batches: Mutex<Vec<Vec<BatchOp>>>,
    /// When true batch submissions fail after being recorded.
    pub fail_batch_edit: bool,
}

#[async_trait]
impl DeckService for MockDeckService {
    async fn create_deck(&self, title: &str) -> Result<String, ExternalError> {
        let mut titles = self.created_titles.lock().unwrap();
        titles.push(title.to_string());
        Ok(format!("deck-{}", titles.len()))
    }

    async fn batch_edit(&self, _deck_id: &str, ops: &[BatchOp]) -> Result<(), ExternalError> {
        self.batches.lock().unwrap().push(ops.to_vec());
        if self.fail_batch_edit {
            return Err(external("slides.presentations.batchUpdate", "batch rejected"));
        }
        Ok(())
    }
}

/// Recording tabular backend with a simulated grid capacity.
#[derive(Default)]
pub struct MockSheetService {
    pub writes: Mutex<Vec<(String, usize)>>,
    pub clears: Mutex<Vec<String>>,
    pub resizes: Mutex<Vec<(u32, u32)>>,
    pub created: Mutex<Vec<(String, u32, u32)>>,
    pub formatted_headers: Mutex<Vec<u32>>,
    pub read_result: Mutex<Option<Grid>>,
    /// Row capacity enforced on writes when non-zero. `create_spreadsheet`
    /// honors `capacity_override` instead of the requested size so tests can
    /// force grid-limit failures.
    pub grid_rows: AtomicU32,
    pub capacity_override: Option<u32>,
}

impl MockSheetService {
    pub fn with_read_result(grid: Option<Grid>) -> Self {
        Self {
            read_result: Mutex::new(grid),
            ..Self::default()
        }
    }

    fn row_of(range: &str) -> usize {
        let after_bang = range.split('!').nth(1).unwrap_or(range);
        after_bang
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .parse()
            .unwrap_or(1)
    }
}

#[async_trait]
impl SheetService for MockSheetService {
    async fn read_range(
        &self,
        _spreadsheet_id: &str,
        _range: &str,
    ) -> Result<Option<Grid>, ExternalError> {
        Ok(self.read_result.lock().unwrap().clone())
    }

    async fn write_range(
        &self,
        _spreadsheet_id: &str,
        range: &str,
        values: &Grid,
    ) -> Result<(), ExternalError> {
        let capacity = self.grid_rows.load(Ordering::SeqCst);
        if capacity > 0 {
            let end_row = Self::row_of(range) - 1 + values.len();
            if end_row > capacity as usize {
                return Err(ExternalError::GridTooSmall {
                    context: "sheets.values.update",
                    message: format!("range {range} exceeds grid limits"),
                });
            }
        }
        self.writes
            .lock()
            .unwrap()
            .push((range.to_string(), values.len()));
        Ok(())
    }

    async fn clear_range(&self, _spreadsheet_id: &str, range: &str) -> Result<(), ExternalError> {
        self.clears.lock().unwrap().push(range.to_string());
        Ok(())
    }

    async fn create_spreadsheet(
        &self,
        title: &str,
        _sheet_name: &str,
        rows: u32,
        cols: u32,
    ) -> Result<String, ExternalError> {
        self.created
            .lock()
            .unwrap()
            .push((title.to_string(), rows, cols));
        self.grid_rows
            .store(self.capacity_override.unwrap_or(rows), Ordering::SeqCst);
        Ok("sheet-new".to_string())
    }

    async fn resize_grid(
        &self,
        _spreadsheet_id: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), ExternalError> {
        self.resizes.lock().unwrap().push((rows, cols));
        self.grid_rows.store(rows, Ordering::SeqCst);
        Ok(())
    }

    async fn format_header_row(
        &self,
        _spreadsheet_id: &str,
        columns: u32,
    ) -> Result<(), ExternalError> {
        self.formatted_headers.lock().unwrap().push(columns);
        Ok(())
    }
}

/// All mock backends behind one handle so tests can assert on recorded calls
/// after driving the router.
pub struct TestBackends {
    pub decks: Arc<MockDeckService>,
    pub assets: Arc<MockAssetService>,
    pub sheets: Arc<MockSheetService>,
}

impl Default for TestBackends {
    fn default() -> Self {
        Self {
            decks: Arc::new(MockDeckService::default()),
            assets: Arc::new(MockAssetService::default()),
            sheets: Arc::new(MockSheetService::default()),
        }
    }
}

pub const TEST_FOLDER_ID: &str = "folder-test";

/// Build the full application router wired to the given mocks, mirroring the
/// layout in `main.rs`.
pub fn test_app(backends: &TestBackends) -> Router {
    let credentials = Arc::new(CredentialService::new(
        Arc::new(MemoryUserStore::new()),
        "test-secret",
    ));

    let auth_state = AuthAppState { credentials };
    let deck_state = DeckAppState {
        decks: backends.decks.clone(),
        assets: backends.assets.clone(),
        default_folder_id: Some(TEST_FOLDER_ID.to_string()),
    };
    let sheet_state = SheetAppState {
        sheets: backends.sheets.clone(),
        assets: backends.assets.clone(),
        default_folder_id: Some(TEST_FOLDER_ID.to_string()),
    };

    Router::new()
        .nest("/auth", auth_routes(auth_state))
        .nest(
            "/data-sheets",
            deck_routes(deck_state).merge(sheet_routes(sheet_state)),
        )
}

/// POST a JSON body and return status plus parsed JSON response.
pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// GET a path, optionally with a bearer token, and return status plus JSON.
pub async fn get_json(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
