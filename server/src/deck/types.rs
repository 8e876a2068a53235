//! Deck-related types and error definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ExternalError;

/// Errors that can occur while building a deck
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid image payload: {0}")]
    Decode(String),

    #[error("asset upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    External(#[from] ExternalError),
}

/// Where an image lands on a slide, in points, canvas-relative.
///
/// Produced by `slide_placement`; width/height carry the 0.75 final scale,
/// x/y keep the unscaled centering offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub width: i64,
    pub height: i64,
    pub x: i64,
    pub y: i64,
}

/// One requested slide: a title and a base64 (optionally data-URI) image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideSpec {
    #[serde(default)]
    pub title: String,
    pub image_data: String,
}

/// One atomic unit within a presentation batch edit.
///
/// Each slide contributes a `CreateSlide` followed by a `PlaceImage`
/// referencing it; the backend serializes these into its own wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    CreateSlide {
        object_id: String,
    },
    PlaceImage {
        object_id: String,
        slide_object_id: String,
        asset_url: String,
        placement: Placement,
    },
}

impl BatchOp {
    pub fn is_create_slide(&self) -> bool {
        matches!(self, Self::CreateSlide { .. })
    }
}

/// Canonical edit URL for a presentation.
pub fn presentation_url(deck_id: &str) -> String {
    format!("https://docs.google.com/presentation/d/{deck_id}/edit")
}

/// Public fetch URL for an uploaded Drive asset, embeddable by the
/// presentation service once the asset is world-readable.
pub fn asset_url(asset_id: &str) -> String {
    format!("https://drive.google.com/uc?id={asset_id}")
}
