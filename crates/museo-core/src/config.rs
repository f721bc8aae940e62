use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.harvardartmuseums.org/object";
pub const API_KEY_ENV: &str = "HAM_API_KEY";
pub const BASE_URL_ENV: &str = "HAM_BASE_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    api_key: String,
    base_url: Url,
    timeout: Duration,
    page_size: Option<u32>,
}

impl CatalogConfig {
    /// Build a configuration, rejecting a missing or blank API key and an unparsable base URL.
    pub fn new(api_key: Option<String>, base_url: Option<&str>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let raw_url = base_url.unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: raw_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw_url.to_string(),
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        Ok(Self {
            api_key,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            page_size: None,
        })
    }

    /// Read `HAM_API_KEY` and `HAM_BASE_URL` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV).ok();
        let base_url = std::env::var(BASE_URL_ENV).ok();
        Self::new(api_key, base_url.as_deref())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// The full request URL, with the API key and optional page size as query parameters.
    pub fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("apikey", &self.api_key);
            if let Some(size) = self.page_size {
                query.append_pair("size", &size.to_string());
            }
        }
        url
    }
}
