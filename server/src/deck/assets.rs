//! Asset pipeline: decode an inbound image payload, measure it, compute its
//! placement, and manage the transient Drive copy.

use bytes::Bytes;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use super::geometry::slide_placement;
use super::service::AssetService;
use super::types::{DeckError, Placement};
use crate::error::advisory;

/// Dimensions assumed when the probe cannot parse the payload.
const FALLBACK_DIMENSIONS: (u32, u32) = (1200, 800);

/// Strip a `data:image/<subtype>;base64,` prefix if present.
fn strip_data_uri(payload: &str) -> &str {
    if let Some(rest) = payload.strip_prefix("data:image/")
        && let Some(idx) = rest.find(";base64,")
    {
        return &rest[idx + ";base64,".len()..];
    }
    payload
}

/// Decode an inbound encoded image into raw bytes.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, DeckError> {
    let encoded = strip_data_uri(payload.trim());
    BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| DeckError::Decode(e.to_string()))
}

/// Measure pixel dimensions of an image.
///
/// Probe failures fall back to a fixed default and are logged, not surfaced:
/// a slide with a slightly wrong placement beats a failed deck.
pub fn probe_dimensions(bytes: &[u8]) -> (u32, u32) {
    match image::load_from_memory(bytes) {
        Ok(img) => (img.width(), img.height()),
        Err(e) => {
            tracing::warn!(
                "failed to probe image dimensions, using {}x{} fallback: {}",
                FALLBACK_DIMENSIONS.0,
                FALLBACK_DIMENSIONS.1,
                e
            );
            FALLBACK_DIMENSIONS
        }
    }
}

/// Decode a payload and compute where the image lands on a slide.
pub fn prepare_placement(payload: &str) -> Result<(Vec<u8>, Placement), DeckError> {
    let bytes = decode_image_payload(payload)?;
    let (width, height) = probe_dimensions(&bytes);
    let placement = slide_placement(width, height);
    Ok((bytes, placement))
}

/// Upload slide image bytes and make them embeddable. Either step failing is
/// fatal for the slide being built.
pub async fn upload_slide_image(
    assets: &dyn AssetService,
    bytes: Vec<u8>,
    name: &str,
    folder_id: Option<&str>,
) -> Result<String, DeckError> {
    let asset_id = assets
        .upload_asset(Bytes::from(bytes), name, folder_id)
        .await
        .map_err(|e| DeckError::Upload(e.to_string()))?;

    assets
        .grant_public_read(&asset_id)
        .await
        .map_err(|e| DeckError::Upload(e.to_string()))?;

    Ok(asset_id)
}

/// Best-effort deletion of the transient assets uploaded for a batch.
/// Failures are logged and swallowed; the slides already reference the
/// rendered image and nothing is rolled back.
pub async fn release_assets(assets: &dyn AssetService, asset_ids: &[String]) {
    for asset_id in asset_ids {
        advisory("delete temporary asset", assets.delete_asset(asset_id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_data_uri_prefix() {
        assert_eq!(strip_data_uri("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("data:image/jpeg;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_uri("QUJD"), "QUJD");
    }

    #[test]
    fn decodes_plain_base64() {
        assert_eq!(decode_image_payload("QUJD").unwrap(), b"ABC");
        assert_eq!(
            decode_image_payload("data:image/png;base64,QUJD").unwrap(),
            b"ABC"
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_image_payload("not base64!!!"),
            Err(DeckError::Decode(_))
        ));
    }

    #[test]
    fn probe_falls_back_on_garbage() {
        assert_eq!(probe_dimensions(b"definitely not an image"), (1200, 800));
    }

    #[test]
    fn prepare_placement_uses_fallback_dimensions_for_opaque_bytes() {
        // "ABC" decodes fine but is no image, so the 1200x800 fallback and
        // its 3:2 placement apply.
        let (bytes, placement) = prepare_placement("QUJD").unwrap();
        assert_eq!(bytes, b"ABC");
        assert_eq!(placement, slide_placement(1200, 800));
    }
}
