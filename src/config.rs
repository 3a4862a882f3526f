// Runtime configuration, read from an optional TOML file.
// Every field has a default so an absent or partial file is valid.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "cluster";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,
    pub http: HttpConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub wikipedia_api: String,
    pub wikipedia_rest: String,
    pub wikidata_api: String,
    pub dbpedia_sparql: String,
    pub quote_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            wikipedia_api: "https://en.wikipedia.org/w/api.php".to_string(),
            wikipedia_rest: "https://en.wikipedia.org/api/rest_v1".to_string(),
            wikidata_api: "https://www.wikidata.org/w/api.php".to_string(),
            dbpedia_sparql: "https://dbpedia.org/sparql".to_string(),
            quote_api: "https://api.quotable.io/random".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
            user_agent: format!("cluster/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed seed for reply selection. Random when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub history_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads the per-user config file when present, defaults otherwise.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        self.storage
            .history_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("history.db")))
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.storage
            .log_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR).join("logs")))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.http.timeout_secs, 15);
        assert_eq!(config.endpoints.quote_api, "https://api.quotable.io/random");
        assert!(config.session.seed.is_none());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [session]
            seed = 42

            [endpoints]
            dbpedia_sparql = "http://localhost:8890/sparql"
            "#,
        )
        .unwrap();
        assert_eq!(config.session.seed, Some(42));
        assert_eq!(config.endpoints.dbpedia_sparql, "http://localhost:8890/sparql");
        assert_eq!(config.endpoints.wikidata_api, "https://www.wikidata.org/w/api.php");
        assert_eq!(config.http.connect_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        assert!(matches!(Config::parse("[http\ntimeout_secs = "), Err(ConfigError::Parse(_))));
    }
}
