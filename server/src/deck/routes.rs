//! HTTP route handlers for the presentation API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::batch::{append_slide, create_presentation};
use super::service::{AssetService, DeckService};
use super::types::{DeckError, SlideSpec, presentation_url};

/// Application state containing the presentation backends
#[derive(Clone)]
pub struct DeckAppState {
    pub decks: Arc<dyn DeckService>,
    pub assets: Arc<dyn AssetService>,
    /// Folder new decks and transient uploads are placed in
    pub default_folder_id: Option<String>,
}

/// Error response for the presentation API
#[derive(Debug, Serialize)]
pub struct DeckErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<DeckError> for DeckErrorResponse {
    fn from(e: DeckError) -> Self {
        let code = match &e {
            DeckError::Validation(_) => "validation",
            DeckError::Decode(_) => "decode_error",
            DeckError::Upload(_) => "upload_error",
            DeckError::External(inner) => inner.code(),
        };
        Self {
            error: e.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for DeckErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "validation" | "decode_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresentationRequest {
    #[serde(default)]
    pub image_data: String,
    #[serde(default = "default_presentation_title")]
    pub title: String,
    #[serde(default = "default_slide_title")]
    pub slide_title: String,
}

fn default_presentation_title() -> String {
    "Monthly Report".into()
}

fn default_slide_title() -> String {
    "Overall Performance".into()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresentationResponse {
    pub message: String,
    pub presentation_url: String,
    pub presentation_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSlideRequest {
    #[serde(default)]
    pub presentation_id: String,
    #[serde(default)]
    pub image_data: String,
    #[serde(default = "default_new_slide_title")]
    pub slide_title: String,
}

fn default_new_slide_title() -> String {
    "New Slide".into()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSlideResponse {
    pub message: String,
    pub presentation_url: String,
    pub slide_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMultiSlideRequest {
    #[serde(default)]
    pub slides: Vec<SlideSpec>,
    #[serde(default = "default_multi_title")]
    pub presentation_title: String,
}

fn default_multi_title() -> String {
    "Multi-Slide Report".into()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMultiSlideResponse {
    pub message: String,
    pub presentation_url: String,
    pub presentation_id: String,
    pub slides_created: usize,
}

/// POST /data-sheets/create-presentation
pub async fn create_presentation_handler(
    State(state): State<DeckAppState>,
    Json(req): Json<CreatePresentationRequest>,
) -> Result<Json<CreatePresentationResponse>, DeckErrorResponse> {
    if req.image_data.is_empty() {
        return Err(DeckError::Validation("Image data is required".into()).into());
    }

    let slide = SlideSpec {
        title: req.slide_title,
        image_data: req.image_data,
    };
    let summary = create_presentation(
        state.decks.as_ref(),
        state.assets.as_ref(),
        state.default_folder_id.as_deref(),
        &req.title,
        std::slice::from_ref(&slide),
    )
    .await
    .map_err(|e| {
        tracing::error!("failed to create presentation: {}", e);
        DeckErrorResponse::from(e)
    })?;

    Ok(Json(CreatePresentationResponse {
        message: "Presentation created successfully".into(),
        presentation_url: presentation_url(&summary.deck_id),
        presentation_id: summary.deck_id,
    }))
}

/// POST /data-sheets/add-slide
pub async fn add_slide_handler(
    State(state): State<DeckAppState>,
    Json(req): Json<AddSlideRequest>,
) -> Result<Json<AddSlideResponse>, DeckErrorResponse> {
    if req.presentation_id.is_empty() || req.image_data.is_empty() {
        return Err(
            DeckError::Validation("Presentation ID and image data are required".into()).into(),
        );
    }

    let slide = SlideSpec {
        title: req.slide_title,
        image_data: req.image_data,
    };
    let slide_id = append_slide(
        state.decks.as_ref(),
        state.assets.as_ref(),
        state.default_folder_id.as_deref(),
        &req.presentation_id,
        &slide,
    )
    .await
    .map_err(|e| {
        tracing::error!("failed to add slide to {}: {}", req.presentation_id, e);
        DeckErrorResponse::from(e)
    })?;

    Ok(Json(AddSlideResponse {
        message: "Slide added successfully".into(),
        presentation_url: presentation_url(&req.presentation_id),
        slide_id,
    }))
}

/// POST /data-sheets/create-multi-slide-presentation
pub async fn create_multi_slide_handler(
    State(state): State<DeckAppState>,
    Json(req): Json<CreateMultiSlideRequest>,
) -> Result<Json<CreateMultiSlideResponse>, DeckErrorResponse> {
    if req.slides.is_empty() {
        return Err(
            DeckError::Validation("Slides array is required and must not be empty".into()).into(),
        );
    }

    let summary = create_presentation(
        state.decks.as_ref(),
        state.assets.as_ref(),
        state.default_folder_id.as_deref(),
        &req.presentation_title,
        &req.slides,
    )
    .await
    .map_err(|e| {
        tracing::error!("failed to create multi-slide presentation: {}", e);
        DeckErrorResponse::from(e)
    })?;

    Ok(Json(CreateMultiSlideResponse {
        message: format!(
            "Presentation created successfully with {} slides",
            summary.slides_created
        ),
        presentation_url: presentation_url(&summary.deck_id),
        presentation_id: summary.deck_id,
        slides_created: summary.slides_created,
    }))
}

/// Build presentation API routes
pub fn deck_routes(state: DeckAppState) -> Router {
    Router::new()
        .route("/create-presentation", post(create_presentation_handler))
        .route("/add-slide", post(add_slide_handler))
        .route(
            "/create-multi-slide-presentation",
            post(create_multi_slide_handler),
        )
        .with_state(state)
}
