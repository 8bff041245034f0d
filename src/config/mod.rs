use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::{AppError, AppResult};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Total timeout for any single outbound request
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// JSON document holding the full combination table
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,
    /// Root under which composited images live, without trailing slash
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map, lost on restart
    Memory,
    /// One JSON file per key under `cache.path`
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_backend")]
    pub backend: CacheBackend,
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    #[serde(default = "default_cache_key")]
    pub key: String,
    /// Share one upstream fetch between concurrent cold-cache requests
    #[serde(default = "default_single_flight")]
    pub single_flight: bool,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

// Upstream defaults
fn default_dataset_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_connect_timeout() -> String {
    DEFAULT_CONNECT_TIMEOUT.to_string()
}

// Cache defaults
fn default_cache_backend() -> CacheBackend {
    CacheBackend::Memory
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_string()
}

fn default_single_flight() -> bool {
    DEFAULT_SINGLE_FLIGHT
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            dataset_url: default_dataset_url(),
            image_base_url: default_image_base_url(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            path: default_cache_path(),
            key: default_cache_key(),
            single_flight: default_single_flight(),
        }
    }
}

impl WebConfig {
    pub fn request_timeout(&self) -> AppResult<Duration> {
        parse_duration("web.request_timeout", &self.request_timeout)
    }
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> AppResult<Duration> {
        parse_duration("upstream.connect_timeout", &self.connect_timeout)
    }
}

fn parse_duration(field: &str, value: &str) -> AppResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| AppError::configuration(format!("{field}: invalid duration '{value}': {e}")))
}

impl Config {
    /// Load `config_file` layered over the defaults, then `EMOJI_KITCHEN_*`
    /// environment variables (`__` separates sections).
    ///
    /// A missing file is created with the default configuration.
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())
                .map_err(|e| AppError::internal(format!("Failed to render default config: {e}")))?;
            std::fs::write(config_file, contents).map_err(|e| {
                AppError::configuration(format!("Failed to write {config_file}: {e}"))
            })?;
            info!("Created default config file: {}", config_file);
        }

        let config: Config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.web.request_timeout()?;
        self.upstream.connect_timeout()?;

        if self.upstream.dataset_url.trim().is_empty() {
            return Err(AppError::configuration("upstream.dataset_url is empty"));
        }
        if self.upstream.image_base_url.trim().is_empty() {
            return Err(AppError::configuration("upstream.image_base_url is empty"));
        }
        if self.cache.key.is_empty() {
            return Err(AppError::configuration("cache.key is empty"));
        }
        if self.cache.backend == CacheBackend::File && self.cache.path.as_os_str().is_empty() {
            return Err(AppError::configuration(
                "cache.path is required for the file backend",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.key, "emoji-data");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(
            config.web.request_timeout().unwrap(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let mut config = Config::default();
        config.upstream.connect_timeout = "soon".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut config = Config::default();
        config.cache.backend = CacheBackend::File;
        config.cache.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config::load_from_file(path).unwrap();
        assert_eq!(config.web.port, DEFAULT_PORT);
        assert!(std::path::Path::new(path).exists());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[cache]\nbackend = \"file\"\npath = \"/var/cache/emoji\"\n",
        )
        .unwrap();

        let config = Config::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert_eq!(config.cache.path, PathBuf::from("/var/cache/emoji"));
        assert_eq!(config.cache.key, DEFAULT_CACHE_KEY);
        assert_eq!(config.upstream.dataset_url, DEFAULT_DATASET_URL);
    }
}
