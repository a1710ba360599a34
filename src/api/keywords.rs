use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::ApiConfig;
use crate::models::{KeywordSpec, Unit};
use crate::tender::keywords::split_keywords;

/// Keywords for one unit as stored server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitKeywords {
    /// Evidence for the unit; these feed the classifier.
    pub related: Vec<String>,
    /// Terms the server uses to rule the unit out. Reported, never scored.
    pub unrelated: Vec<String>,
}

/// Server keyword configuration, grouped by unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerKeywords {
    pub units: BTreeMap<Unit, UnitKeywords>,
    /// Whether the server sent `{related, unrelated}` objects rather than
    /// plain lists; updates are posted back in the same shape.
    pub split: bool,
}

impl ServerKeywords {
    pub fn related(&self, unit: Unit) -> &[String] {
        self.units
            .get(&unit)
            .map(|k| k.related.as_slice())
            .unwrap_or(&[])
    }

    /// Related keywords as classifier input, one spec per unit that has any.
    pub fn as_custom_keywords(&self) -> BTreeMap<Unit, KeywordSpec> {
        self.units
            .iter()
            .filter(|(_, k)| !k.related.is_empty())
            .map(|(unit, k)| (*unit, KeywordSpec::List(k.related.clone())))
            .collect()
    }

    /// Add a related keyword. Returns `false` when it is blank or already present.
    pub fn add(&mut self, unit: Unit, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return false;
        }
        let entry = self.units.entry(unit).or_default();
        if entry.related.iter().any(|k| k == keyword) {
            return false;
        }
        entry.related.push(keyword.to_string());
        true
    }

    /// Remove a related keyword. Returns `false` when it was not present.
    pub fn remove(&mut self, unit: Unit, keyword: &str) -> bool {
        let keyword = keyword.trim();
        match self.units.get_mut(&unit) {
            Some(entry) => {
                let before = entry.related.len();
                entry.related.retain(|k| k != keyword);
                entry.related.len() != before
            }
            None => false,
        }
    }

    /// Request body for `POST /keywords`, keyed by API unit keys.
    pub fn to_payload(&self) -> Value {
        let mut grouped = Map::new();
        for unit in Unit::SCORABLE {
            let entry = self.units.get(&unit).cloned().unwrap_or_default();
            let value = if self.split {
                json!({ "related": entry.related, "unrelated": entry.unrelated })
            } else {
                json!(entry.related)
            };
            grouped.insert(unit.api_key().to_string(), value);
        }
        json!({ "keywords": grouped })
    }
}

/// Fetch the keyword configuration from `GET /keywords`.
pub async fn fetch_keywords(client: &Client, api: &ApiConfig) -> Result<ServerKeywords> {
    let url = api.endpoint("/keywords");
    debug!("GET {}", url);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?;
    let response = super::ensure_success(response, &url)?;

    let body: Value = response.json().await?;
    parse_keywords(body).with_context(|| format!("decoding keywords from {}", url))
}

/// Persist the keyword configuration via `POST /keywords`.
pub async fn update_keywords(
    client: &Client,
    api: &ApiConfig,
    keywords: &ServerKeywords,
) -> Result<()> {
    let url = api.endpoint("/keywords");
    debug!("POST {}", url);

    let response = client
        .post(&url)
        .json(&keywords.to_payload())
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?;
    super::ensure_success(response, &url)?;
    Ok(())
}

/// Decode a keyword document, bare or wrapped in `{ "keywords": ... }`.
///
/// Each unit value may be a list, a delimited string, or an object with
/// `related` / `unrelated` members. Unknown unit keys are skipped.
fn parse_keywords(body: Value) -> Result<ServerKeywords> {
    let body = match body {
        Value::Object(mut map) if map.get("keywords").is_some_and(Value::is_object) => {
            map.remove("keywords").unwrap_or_default()
        }
        other => other,
    };

    let Value::Object(grouped) = body else {
        bail!("expected an object of keyword lists keyed by unit");
    };

    let mut keywords = ServerKeywords::default();
    for (key, value) in grouped {
        let unit = match key.parse::<Unit>() {
            Ok(unit) if unit.is_scorable() => unit,
            _ => {
                warn!("ignoring keywords for unknown unit '{}'", key);
                continue;
            }
        };

        let entry = match value {
            Value::Object(mut parts) => {
                keywords.split = true;
                UnitKeywords {
                    related: keyword_list(parts.remove("related"))?,
                    unrelated: keyword_list(parts.remove("unrelated"))?,
                }
            }
            other => UnitKeywords {
                related: keyword_list(Some(other))?,
                unrelated: Vec::new(),
            },
        };
        keywords.units.insert(unit, entry);
    }

    Ok(keywords)
}

fn keyword_list(value: Option<Value>) -> Result<Vec<String>> {
    let spec = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(v) => serde_json::from_value::<KeywordSpec>(v)?,
    };
    Ok(split_keywords(Some(&spec)))
}
