use reqwest::Client;

use crate::error::{BountyError, Result};

const API_ENDPOINT: &str = "https://api.airtable.com/v0";

/// Minimal create-record client for the external tracking table.
pub struct AirtableClient {
    http: Client,
    api_key: String,
    base: String,
    table: String,
}

impl AirtableClient {
    pub fn new(api_key: String, base: String, table: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base,
            table,
        }
    }

    /// Create exactly one record with the given field mapping. A
    /// non-success status is fatal for the run.
    pub async fn create_record(&self, fields: serde_json::Value) -> Result<()> {
        let url = format!("{API_ENDPOINT}/{}/{}", self.base, self.table);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "fields": fields }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BountyError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(())
    }
}
