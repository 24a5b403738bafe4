use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub timeouts: Timeouts,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_rest_base_url")]
    pub rest_base_url: String,
    /// Which helpful-counter strategy the service uses. `Atomic`
    /// issues the store's server-side increment; `ReadModifyWrite`
    /// reads then writes value+1 and accepts the lost-update race.
    #[serde(default)]
    pub counter_mode: CounterMode,
}

/// Where review and profile records live. `Memory` is per-process
/// and discarded on exit, for tests and offline experimentation;
/// `Rest` persists through the hosted review API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    #[default]
    Memory,
    Rest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterMode {
    #[default]
    Atomic,
    ReadModifyWrite,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

/// Read budgets in milliseconds. Reads that lose the race fall back
/// to a default/empty value at the caller rather than blocking.
#[derive(Debug, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_query_ms")]
    pub query_ms: u64,
    #[serde(default = "default_simple_query_ms")]
    pub simple_query_ms: u64,
    #[serde(default = "default_api_request_ms")]
    pub api_request_ms: u64,
}

impl Timeouts {
    /// Budget for filtered collection reads.
    pub fn query(&self) -> Duration {
        Duration::from_millis(self.query_ms)
    }

    /// Budget for single-record reads.
    pub fn simple_query(&self) -> Duration {
        Duration::from_millis(self.simple_query_ms)
    }

    /// Budget for catalog API requests.
    pub fn api_request(&self) -> Duration {
        Duration::from_millis(self.api_request_ms)
    }
}

fn default_rest_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_query_ms() -> u64 {
    8000
}

fn default_simple_query_ms() -> u64 {
    5000
}

fn default_api_request_ms() -> u64 {
    10000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            rest_base_url: default_rest_base_url(),
            counter_mode: CounterMode::Atomic,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            query_ms: default_query_ms(),
            simple_query_ms: default_simple_query_ms(),
            api_request_ms: default_api_request_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file yields the
    /// defaults so a fresh install works without any setup.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/reelview/config.toml")).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.counter_mode, CounterMode::Atomic);
        assert_eq!(config.timeouts.query_ms, 8000);
        assert_eq!(config.timeouts.simple_query_ms, 5000);
        assert_eq!(config.timeouts.api_request_ms, 10000);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.store.backend = StoreBackend::Rest;
        config.store.counter_mode = CounterMode::ReadModifyWrite;
        config.catalog.api_key = "abc123".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.store.backend, StoreBackend::Rest);
        assert_eq!(loaded.store.counter_mode, CounterMode::ReadModifyWrite);
        assert_eq!(loaded.catalog.api_key, "abc123");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let partial = r#"
            [catalog]
            api_key = "xyz"
        "#;
        let config: Config = toml::from_str(partial).unwrap();
        assert_eq!(config.catalog.api_key, "xyz");
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.store.rest_base_url, "http://localhost:5000");
        assert_eq!(config.timeouts.query(), Duration::from_millis(8000));
    }
}
