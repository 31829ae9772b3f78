// src/config.rs
//
// Runtime configuration
//
// Values come from defaults, then environment variables, then whatever
// overrides the host applies on top. Nothing here touches the network or disk.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "https://api.rawg.io/api";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 40;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_URL: &str = "GAMEHUB_API_URL";
const ENV_API_KEY: &str = "RAWG_API_KEY";
const ENV_TIMEOUT: &str = "GAMEHUB_HTTP_TIMEOUT_SECS";
const ENV_PAGE_SIZE: &str = "GAMEHUB_PAGE_SIZE";
const ENV_DATA_DIR: &str = "GAMEHUB_DATA_DIR";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: default_data_dir(),
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        config.api_key = get(ENV_API_KEY);

        if let Some(raw) = get(ENV_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT, raw))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = get(ENV_PAGE_SIZE) {
            let size: u32 = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a number, got '{}'", ENV_PAGE_SIZE, raw))
            })?;
            config.page_size = size;
        }

        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout.is_zero() {
            return Err(AppError::Config(format!(
                "{} must be at least 1 second",
                ENV_TIMEOUT
            )));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::Config(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "API base URL must be http(s), got '{}'",
                self.api_base_url
            )));
        }
        Ok(())
    }

    /// Path of the SQLite file holding persisted collections
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("gamehub.db")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("gamehub")
}
