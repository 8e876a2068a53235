//! Deck building: image placement geometry, transient asset handling, and
//! batched slide creation against the presentation backend.
//!
//! This module provides:
//! - `slide_placement` pure geometry for centered, scaled slide images
//! - the asset pipeline (decode, probe, upload, release)
//! - the slide batch builder and its submit/cleanup flow
//! - `DeckService` / `AssetService` traits abstracting the Google backends
//! - HTTP routes for presentation endpoints

mod assets;
mod batch;
mod geometry;
pub mod routes;
mod service;
mod types;

pub use assets::{decode_image_payload, prepare_placement, probe_dimensions, release_assets};
pub use batch::{
    DeckSummary, SlideBatch, append_slide, build_batch, create_presentation, submit_and_release,
};
pub use geometry::slide_placement;
pub use routes::{DeckAppState, deck_routes};
pub use service::{AssetService, DeckService};
pub use types::{BatchOp, DeckError, Placement, SlideSpec};
