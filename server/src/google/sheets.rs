//! Google Sheets REST client implementing `SheetService`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::token::TokenProvider;
use crate::error::ExternalError;
use crate::sheet::{Grid, SheetService};

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct GoogleSheets {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Grid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: String,
}

impl GoogleSheets {
    pub fn new(http: reqwest::Client, tokens: Arc<TokenProvider>) -> Self {
        Self { http, tokens }
    }

    /// Percent-encode a range for use as a path segment. Ranges carry sheet
    /// names with spaces and `!` separators.
    fn values_url(spreadsheet_id: &str, range: &str, suffix: &str) -> String {
        let mut url =
            reqwest::Url::parse(&format!("{SHEETS_BASE}/{spreadsheet_id}/values/"))
                .expect("static sheets base URL is valid");
        url.path_segments_mut()
            .expect("sheets URL has a path")
            .pop_if_empty()
            .push(&format!("{range}{suffix}"));
        url.to_string()
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

    async fn batch_update(
        &self,
        context: &'static str,
        spreadsheet_id: &str,
        requests: serde_json::Value,
    ) -> Result<(), ExternalError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(format!("{SHEETS_BASE}/{spreadsheet_id}:batchUpdate"))
            .bearer_auth(token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| ExternalError::transport(context, e))?;
        Self::check(context, response).await?;
        Ok(())
    }
}

#[async_trait]
impl SheetService for GoogleSheets {
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Option<Grid>, ExternalError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(Self::values_url(spreadsheet_id, range, ""))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ExternalError::transport("sheets.values.get", e))?;

        let body: ValueRange = Self::check("sheets.values.get", response)
            .await?
            .json()
            .await
            .map_err(|e| ExternalError::transport("sheets.values.get", e))?;
        Ok(body.values)
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &Grid,
    ) -> Result<(), ExternalError> {
        let token = self.tokens.access_token().await?;
        let mut url = reqwest::Url::parse(&Self::values_url(spreadsheet_id, range, ""))
            .expect("values URL is valid");
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW");

        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(&json!({ "values": values }))
            .send()
            .await
            .map_err(|e| ExternalError::transport("sheets.values.update", e))?;
        Self::check("sheets.values.update", response).await?;
        Ok(())
    }

    async fn clear_range(&self, spreadsheet_id: &str, range: &str) -> Result<(), ExternalError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(Self::values_url(spreadsheet_id, range, ":clear"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ExternalError::transport("sheets.values.clear", e))?;
        Self::check("sheets.values.clear", response).await?;
        Ok(())
    }

    async fn create_spreadsheet(
        &self,
        title: &str,
        sheet_name: &str,
        rows: u32,
        cols: u32,
    ) -> Result<String, ExternalError> {
        let token = self.tokens.access_token().await?;
        let body = json!({
            "properties": { "title": title },
            "sheets": [{
                "properties": {
                    "title": sheet_name,
                    "gridProperties": { "rowCount": rows, "columnCount": cols },
                }
            }],
        });

        let response = self
            .http
            .post(SHEETS_BASE)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExternalError::transport("sheets.spreadsheets.create", e))?;

        let created: CreatedSpreadsheet = Self::check("sheets.spreadsheets.create", response)
            .await?
            .json()
            .await
            .map_err(|e| ExternalError::transport("sheets.spreadsheets.create", e))?;
        Ok(created.spreadsheet_id)
    }

    async fn resize_grid(
        &self,
        spreadsheet_id: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), ExternalError> {
        self.batch_update(
            "sheets.resize_grid",
            spreadsheet_id,
            json!([{
                "updateSheetProperties": {
                    "properties": {
                        "sheetId": 0,
                        "gridProperties": { "rowCount": rows, "columnCount": cols },
                    },
                    "fields": "gridProperties.rowCount,gridProperties.columnCount",
                }
            }]),
        )
        .await
    }

    async fn format_header_row(
        &self,
        spreadsheet_id: &str,
        columns: u32,
    ) -> Result<(), ExternalError> {
        self.batch_update(
            "sheets.format_header",
            spreadsheet_id,
            json!([{
                "repeatCell": {
                    "range": {
                        "sheetId": 0,
                        "startRowIndex": 0,
                        "endRowIndex": 1,
                        "startColumnIndex": 0,
                        "endColumnIndex": columns,
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "textFormat": { "bold": true },
                            "backgroundColor": { "red": 0.9, "green": 0.9, "blue": 0.9 },
                        }
                    },
                    "fields": "userEnteredFormat(textFormat,backgroundColor)",
                }
            }]),
        )
        .await
    }
}
