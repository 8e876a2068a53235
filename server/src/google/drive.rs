//! Google Drive REST client implementing `AssetService`.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use super::token::TokenProvider;
use crate::deck::AssetService;
use crate::error::ExternalError;

const DRIVE_FILES_BASE: &str = "https://www.googleapis.com/drive/v3/files";
const DRIVE_UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart";

const MULTIPART_BOUNDARY: &str = "sheetdeck_multipart_boundary";

pub struct GoogleDrive {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FileParents {
    #[serde(default)]
    parents: Vec<String>,
}

impl GoogleDrive {
    pub fn new(http: reqwest::Client, tokens: Arc<TokenProvider>) -> Self {
        Self { http, tokens }
    }

    /// Drive's multipart upload wants `multipart/related`: a JSON metadata
    /// part followed by the raw media part.
    fn multipart_body(metadata: &serde_json::Value, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(bytes.len() + 512);
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!("--{MULTIPART_BOUNDARY}\r\nContent-Type: image/png\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--").as_bytes());
        body
    }

    async fn check(
        context: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ExternalError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ExternalError::classify(context, status.as_u16(), &body))
    }
}

#[async_trait]
impl AssetService for GoogleDrive {
    async fn upload_asset(
        &self,
        bytes: Bytes,
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<String, ExternalError> {
        let metadata = json!({
            "name": name,
            "parents": folder_id.map(|f| vec![f]).unwrap_or_default(),
        });

        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(DRIVE_UPLOAD_URL)
            .bearer_auth(token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Self::multipart_body(&metadata, &bytes))
            .send()
            .await
            .map_err(|e| ExternalError::transport("drive.files.create", e))?;

        let created: CreatedFile = Self::check("drive.files.create", response)
            .await?
            .json()
            .await
            .map_err(|e| ExternalError::transport("drive.files.create", e))?;
        Ok(created.id)
    }

    async fn grant_public_read(&self, asset_id: &str) -> Result<(), ExternalError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(format!("{DRIVE_FILES_BASE}/{asset_id}/permissions"))
            .bearer_auth(token)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await
            .map_err(|e| ExternalError::transport("drive.permissions.create", e))?;
        Self::check("drive.permissions.create", response).await?;
        Ok(())
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), ExternalError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .delete(format!("{DRIVE_FILES_BASE}/{asset_id}"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ExternalError::transport("drive.files.delete", e))?;
        Self::check("drive.files.delete", response).await?;
        Ok(())
    }

    async fn move_to_folder(&self, file_id: &str, folder_id: &str) -> Result<(), ExternalError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(format!("{DRIVE_FILES_BASE}/{file_id}?fields=parents"))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ExternalError::transport("drive.files.get", e))?;

        let parents: FileParents = Self::check("drive.files.get", response)
            .await?
            .json()
            .await
            .map_err(|e| ExternalError::transport("drive.files.get", e))?;

        let mut url = reqwest::Url::parse(&format!("{DRIVE_FILES_BASE}/{file_id}"))
            .expect("static drive base URL is valid");
        url.query_pairs_mut()
            .append_pair("addParents", folder_id)
            .append_pair("removeParents", &parents.parents.join(","))
            .append_pair("fields", "id,parents");

        let response = self
            .http
            .patch(url)
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| ExternalError::transport("drive.files.update", e))?;
        Self::check("drive.files.update", response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_has_metadata_then_media() {
        let metadata = json!({"name": "chart.png", "parents": ["folder1"]});
        let body = GoogleDrive::multipart_body(&metadata, b"PNGDATA");
        let text = String::from_utf8_lossy(&body);

        let meta_pos = text.find("chart.png").unwrap();
        let media_pos = text.find("PNGDATA").unwrap();
        assert!(meta_pos < media_pos);
        assert!(text.ends_with(&format!("--{MULTIPART_BOUNDARY}--")));
        assert_eq!(text.matches(&format!("--{MULTIPART_BOUNDARY}")).count(), 3);
    }
}
