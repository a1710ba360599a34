use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;

use crate::config::ApiConfig;

/// Ask the server to re-classify every tender with its current keywords.
///
/// Returns the response body when it is JSON, `None` otherwise.
pub async fn trigger_filter(client: &Client, api: &ApiConfig) -> Result<Option<serde_json::Value>> {
    let url = api.endpoint("/filter");
    debug!("POST {}", url);

    let response = client
        .post(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?;
    let response = super::ensure_success(response, &url)?;

    let body = response.text().await?;
    Ok(serde_json::from_str(&body).ok())
}
