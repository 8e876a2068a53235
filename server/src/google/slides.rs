//! Google Slides REST client implementing `DeckService`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::token::TokenProvider;
use crate::deck::{BatchOp, DeckService};
use crate::error::ExternalError;

const SLIDES_BASE: &str = "https://slides.googleapis.com/v1/presentations";

pub struct GoogleSlides {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedPresentation {
    presentation_id: String,
}

impl GoogleSlides {
    pub fn new(http: reqwest::Client, tokens: Arc<TokenProvider>) -> Self {
        Self { http, tokens }
    }

    fn op_to_request(op: &BatchOp) -> serde_json::Value {
        match op {
            BatchOp::CreateSlide { object_id } => json!({
                "createSlide": {
                    "objectId": object_id,
                    "slideLayoutReference": { "predefinedLayout": "BLANK" },
                }
            }),
            BatchOp::PlaceImage {
                object_id,
                slide_object_id,
                asset_url,
                placement,
            } => json!({
                "createImage": {
                    "objectId": object_id,
                    "url": asset_url,
                    "elementProperties": {
                        "pageObjectId": slide_object_id,
                        "size": {
                            "width": { "magnitude": placement.width, "unit": "PT" },
                            "height": { "magnitude": placement.height, "unit": "PT" },
                        },
                        "transform": {
                            "scaleX": 1,
                            "scaleY": 1,
                            "translateX": placement.x,
                            "translateY": placement.y,
                            "unit": "PT",
                        },
                    },
                }
            }),
        }
    }
}

#[async_trait]
impl DeckService for GoogleSlides {
    async fn create_deck(&self, title: &str) -> Result<String, ExternalError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(SLIDES_BASE)
            .bearer_auth(token)
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(|e| ExternalError::transport("slides.presentations.create", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::classify(
                "slides.presentations.create",
                status.as_u16(),
                &body,
            ));
        }

        let created: CreatedPresentation = response
            .json()
            .await
            .map_err(|e| ExternalError::transport("slides.presentations.create", e))?;
        Ok(created.presentation_id)
    }

    async fn batch_edit(&self, deck_id: &str, ops: &[BatchOp]) -> Result<(), ExternalError> {
        let requests: Vec<_> = ops.iter().map(Self::op_to_request).collect();
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(format!("{SLIDES_BASE}/{deck_id}:batchUpdate"))
            .bearer_auth(token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| ExternalError::transport("slides.presentations.batchUpdate", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalError::classify(
                "slides.presentations.batchUpdate",
                status.as_u16(),
                &body,
            ));
        }
        Ok(())
    }
}
