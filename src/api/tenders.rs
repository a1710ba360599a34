use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::models::Tender;

/// `GET /tenders` answers either with a bare list or with `{ "tenders": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TendersResponse {
    Wrapped { tenders: Vec<Tender> },
    Bare(Vec<Tender>),
}

impl TendersResponse {
    fn into_tenders(self) -> Vec<Tender> {
        match self {
            TendersResponse::Wrapped { tenders } => tenders,
            TendersResponse::Bare(tenders) => tenders,
        }
    }
}

/// Fetch every tender notice from the API.
pub async fn fetch_tenders(client: &Client, api: &ApiConfig) -> Result<Vec<Tender>> {
    let url = api.endpoint("/tenders");
    debug!("GET {}", url);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?;
    let response = super::ensure_success(response, &url)?;

    let body = response.text().await?;
    parse_tenders(&body).with_context(|| format!("decoding tenders from {}", url))
}

fn parse_tenders(body: &str) -> Result<Vec<Tender>> {
    let parsed: TendersResponse = serde_json::from_str(body)?;
    Ok(parsed.into_tenders())
}
