use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

use crate::models::{KeywordSpec, Unit};

/// Environment variable that overrides [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "TENDER_API_URL";

/// Root configuration structure, deserialized from `.tender-classifier/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the tender API lives.
    pub api: ApiConfig,
    /// Custom keywords per unit, prepended to the built-in lists.
    /// Keys accept display names (`Bisan_Emira`) or API keys (`bisan_emira`).
    pub keywords: BTreeMap<Unit, KeywordSpec>,
    /// Windows used by the deadline statistics.
    pub deadlines: DeadlineConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Path prefix put in front of every endpoint, e.g. `/api`.
    pub prefix: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:5680".to_string(),
            prefix: "/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// Full URL for an endpoint path such as `/tenders`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.prefix.trim_matches('/');
        let path = path.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", base, path)
        } else {
            format!("{}/{}/{}", base, prefix, path)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeadlineConfig {
    /// Deadlines at most this many days away count as urgent.
    pub urgent_days: i64,
    /// Deadlines at most this many days away count as critical.
    pub critical_days: i64,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        DeadlineConfig {
            urgent_days: 10,
            critical_days: 3,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_path>/.tender-classifier/config.toml`
/// 3. `~/.config/tender-classifier/config.toml`
/// 4. Built-in [`Config::default`]
///
/// `TENDER_API_URL` replaces the API base URL from whichever source won.
pub fn load_config(base_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    let mut config = find_config(base_path, config_override)?;
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            debug!("{} overrides api.base_url", API_URL_ENV);
            config.api.base_url = url.trim().to_string();
        }
    }
    Ok(config)
}

fn find_config(base_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = base_path.join(".tender-classifier").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("tender-classifier")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    debug!("no config file found, using built-in defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    debug!("loading config from {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&content).with_context(|| format!("parsing config {}", path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    if config.keywords.contains_key(&Unit::Other) {
        anyhow::bail!("[keywords] cannot configure the Other unit");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:5680");
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.deadlines.urgent_days, 10);
        assert_eq!(cfg.deadlines.critical_days, 3);
        assert!(cfg.keywords.is_empty());
    }

    #[test]
    fn test_keywords_both_shapes() {
        let cfg = parse_config(
            r#"
[keywords]
Marine = ["boat", "harbour"]
iot = "LoRaWAN, NB-IoT"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.keywords.get(&Unit::Marine),
            Some(&KeywordSpec::List(vec!["boat".into(), "harbour".into()]))
        );
        assert_eq!(
            cfg.keywords.get(&Unit::IoT),
            Some(&KeywordSpec::Delimited("LoRaWAN, NB-IoT".into()))
        );
    }

    #[test]
    fn test_rejects_unknown_and_other_units() {
        assert!(parse_config("[keywords]\nSales = [\"crm\"]\n").is_err());
        assert!(parse_config("[keywords]\nOther = [\"misc\"]\n").is_err());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let cfg = parse_config("[api]\nbase_url = \"https://tenders.example.com\"\n").unwrap();
        assert_eq!(cfg.api.base_url, "https://tenders.example.com");
        assert_eq!(cfg.api.prefix, "/api");
        assert_eq!(cfg.deadlines.urgent_days, 10);
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let mut api = ApiConfig {
            base_url: "http://host:5680/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.endpoint("/tenders"), "http://host:5680/api/tenders");
        api.prefix = String::new();
        assert_eq!(api.endpoint("filter"), "http://host:5680/filter");
    }

    #[test]
    fn test_override_path_wins() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "[deadlines]\nurgent_days = 14\n").unwrap();
        let dir = TempDir::new().unwrap();
        let cfg = find_config(dir.path(), Some(f.path())).unwrap();
        assert_eq!(cfg.deadlines.urgent_days, 14);
    }

    #[test]
    fn test_project_config_is_found() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".tender-classifier");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[deadlines]\ncritical_days = 5\n").unwrap();
        let cfg = find_config(dir.path(), None).unwrap();
        assert_eq!(cfg.deadlines.critical_days, 5);
    }

    #[test]
    fn test_missing_override_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(find_config(dir.path(), Some(&missing)).is_err());
    }
}
