//! DeckService / AssetService trait definitions

use async_trait::async_trait;
use bytes::Bytes;

use super::types::BatchOp;
use crate::error::ExternalError;

/// Trait for the presentation backend (Google Slides or a test double).
#[async_trait]
pub trait DeckService: Send + Sync {
    /// Create an empty deck and return its id.
    async fn create_deck(&self, title: &str) -> Result<String, ExternalError>;

    /// Apply a batch of ops to a deck in one atomic call. Whatever atomicity
    /// the backend offers is inherited as-is; no partial-apply semantics are
    /// modeled on this side.
    async fn batch_edit(&self, deck_id: &str, ops: &[BatchOp]) -> Result<(), ExternalError>;
}

/// Trait for the transient asset backend (Google Drive or a test double).
#[async_trait]
pub trait AssetService: Send + Sync {
    /// Upload raw bytes and return the new asset id.
    async fn upload_asset(
        &self,
        bytes: Bytes,
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<String, ExternalError>;

    /// Make an asset world-readable so the presentation backend can embed it
    /// by URL.
    async fn grant_public_read(&self, asset_id: &str) -> Result<(), ExternalError>;

    /// Delete an asset.
    async fn delete_asset(&self, asset_id: &str) -> Result<(), ExternalError>;

    /// Move a file into a folder, detaching it from its previous parents.
    async fn move_to_folder(&self, file_id: &str, folder_id: &str) -> Result<(), ExternalError>;
}
