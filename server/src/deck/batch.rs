//! Slide batch builder: accumulate create-slide/place-image op pairs and
//! submit them as a single batch edit, releasing transient assets afterwards.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::distr::Alphanumeric;

use super::assets::{prepare_placement, release_assets, upload_slide_image};
use super::service::{AssetService, DeckService};
use super::types::{BatchOp, DeckError, SlideSpec, asset_url};
use crate::error::advisory;

/// Ops plus the transient asset ids they reference, kept for cleanup.
#[derive(Debug, Default)]
pub struct SlideBatch {
    pub ops: Vec<BatchOp>,
    pub asset_ids: Vec<String>,
}

/// Result of a deck-creation flow.
#[derive(Debug)]
pub struct DeckSummary {
    pub deck_id: String,
    pub slides_created: usize,
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(9)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Build the op pairs for a list of slides, uploading one asset per slide.
///
/// Ids are unique within the batch: unix millis, slide index, and a random
/// suffix. Per-slide preparation is strictly sequential in input order.
pub async fn build_batch(
    assets: &dyn AssetService,
    folder_id: Option<&str>,
    slides: &[SlideSpec],
) -> Result<SlideBatch, DeckError> {
    let mut batch = SlideBatch::default();

    for (index, slide) in slides.iter().enumerate() {
        let (bytes, placement) = prepare_placement(&slide.image_data)?;

        let name = format!("{}_{}_{}.png", slide.title, unix_millis(), index);
        let asset_id = upload_slide_image(assets, bytes, &name, folder_id).await?;
        tracing::debug!("uploaded asset {} for slide {}", asset_id, index + 1);
        batch.asset_ids.push(asset_id.clone());

        let timestamp = unix_millis();
        let suffix = random_suffix();
        let slide_object_id = format!("slide_{timestamp}_{index}_{suffix}");
        let image_object_id = format!("image_{timestamp}_{index}_{suffix}");

        batch.ops.push(BatchOp::CreateSlide {
            object_id: slide_object_id.clone(),
        });
        batch.ops.push(BatchOp::PlaceImage {
            object_id: image_object_id,
            slide_object_id,
            asset_url: asset_url(&asset_id),
            placement,
        });
    }

    Ok(batch)
}

/// Submit a batch, then release every uploaded asset regardless of whether
/// the submission succeeded.
pub async fn submit_and_release(
    decks: &dyn DeckService,
    assets: &dyn AssetService,
    deck_id: &str,
    batch: SlideBatch,
) -> Result<(), DeckError> {
    let result = decks.batch_edit(deck_id, &batch.ops).await;
    release_assets(assets, &batch.asset_ids).await;
    result.map_err(DeckError::from)
}

/// Create a deck, optionally relocate it into the configured folder, and
/// populate it with the requested slides in one batch.
pub async fn create_presentation(
    decks: &dyn DeckService,
    assets: &dyn AssetService,
    folder_id: Option<&str>,
    title: &str,
    slides: &[SlideSpec],
) -> Result<DeckSummary, DeckError> {
    let deck_id = decks.create_deck(title).await?;
    tracing::info!("created presentation {}", deck_id);

    if let Some(folder) = folder_id {
        advisory(
            "move presentation to folder",
            assets.move_to_folder(&deck_id, folder),
        )
        .await;
    }

    let batch = build_batch(assets, folder_id, slides).await?;
    let slides_created = slides.len();
    submit_and_release(decks, assets, &deck_id, batch).await?;

    Ok(DeckSummary {
        deck_id,
        slides_created,
    })
}

/// Append a single slide to an existing deck. Returns the new slide's
/// object id.
pub async fn append_slide(
    decks: &dyn DeckService,
    assets: &dyn AssetService,
    folder_id: Option<&str>,
    deck_id: &str,
    slide: &SlideSpec,
) -> Result<String, DeckError> {
    let batch = build_batch(assets, folder_id, std::slice::from_ref(slide)).await?;
    let slide_object_id = match batch.ops.first() {
        Some(BatchOp::CreateSlide { object_id }) => object_id.clone(),
        _ => unreachable!("build_batch always emits CreateSlide first"),
    };
    submit_and_release(decks, assets, deck_id, batch).await?;
    Ok(slide_object_id)
}
