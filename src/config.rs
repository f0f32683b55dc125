/// Application configuration
///
/// Values are resolved in three layers:
/// 1. Built-in defaults (local backend on port 8080)
/// 2. Optional TOML file in the user's config directory:
///    - Linux: ~/.config/medi-storefront/config.toml
///    - macOS: ~/Library/Application Support/medi-storefront/config.toml
///    - Windows: %APPDATA%\medi-storefront\config.toml
/// 3. Environment variables (`MEDI_STOREFRONT_API_URL`,
///    `MEDI_STOREFRONT_CONFIRM_DELAY_MS`)

use reqwest::Url;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// How long the "Product added successfully!" banner stays up before the
/// modal closes and the catalog refreshes
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_millis(1300);

const ENV_API_URL: &str = "MEDI_STOREFRONT_API_URL";
const ENV_CONFIRM_DELAY: &str = "MEDI_STOREFRONT_CONFIRM_DELAY_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL; its path always ends in `/` so endpoints can be joined
    pub api_base_url: Url,
    pub confirmation_delay: Duration,
}

/// On-disk shape of config.toml. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
    confirmation_delay_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: normalize_base_url(DEFAULT_API_BASE_URL)
                .expect("built-in backend URL is valid"),
            confirmation_delay: DEFAULT_CONFIRMATION_DELAY,
        }
    }
}

impl Config {
    /// Load configuration from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::get_config_path();
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(url) = env::var(ENV_API_URL) {
            info!("{ENV_API_URL} set, using backend {url}");
            config.api_base_url = normalize_base_url(&url)?;
        }

        if let Ok(raw) = env::var(ENV_CONFIRM_DELAY) {
            let ms = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_CONFIRM_DELAY,
                value: raw.clone(),
            })?;
            config.confirmation_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Read a config file, filling missing keys with defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        debug!("Loaded config file {}", path.display());

        let mut config = Self::default();
        if let Some(url) = file.api_base_url {
            config.api_base_url = normalize_base_url(&url)?;
        }
        if let Some(ms) = file.confirmation_delay_ms {
            config.confirmation_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Get the path where the config file is expected, if the platform has one
    fn get_config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("medi-storefront");
        path.push("config.toml");
        Some(path)
    }
}

/// Parse an http(s) base URL with a host and no query or fragment.
/// The path gets a trailing `/` so relative endpoint paths join beneath it.
fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected http:// or https://"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
