//! Async HTTP client for the tender API.
//!
//! Each module wraps one resource and takes a shared [`reqwest::Client`] plus
//! the [`ApiConfig`](crate::config::ApiConfig) that locates the server:
//!
//! - [`tenders`] — `GET /tenders`
//! - [`keywords`] — `GET /keywords`, `POST /keywords`
//! - [`filter`] — `POST /filter` (server-side re-classification)
//!
//! Non-2xx responses are errors naming the endpoint and status.

pub mod filter;
pub mod keywords;
pub mod tenders;

use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::{Client, Response};

use crate::config::ApiConfig;

const USER_AGENT: &str = concat!("tender-classifier/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client with the configured timeout.
pub fn build_client(api: &ApiConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(api.timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Turn a non-success status into an error.
fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        bail!("{} returned HTTP {}", url, status);
    }
    Ok(response)
}
