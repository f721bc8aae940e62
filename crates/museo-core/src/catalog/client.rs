use super::types::{CatalogPage, RawRecord};
use crate::config::CatalogConfig;
use crate::error::{Error, TransportError};

/// Anything able to produce one ordered batch of raw catalog records.
pub trait CatalogSource {
    fn fetch(&self) -> Result<Vec<RawRecord>, TransportError>;
}

/// Blocking HTTP client for the catalog's object endpoint.
///
/// Each `fetch` issues exactly one GET; there are no retries.
pub struct CatalogClient {
    config: CatalogConfig,
    http: reqwest::blocking::Client,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> crate::Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("museo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(TransportError::Request(e.to_string())))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

impl CatalogSource for CatalogClient {
    fn fetch(&self) -> Result<Vec<RawRecord>, TransportError> {
        // Logged without the query string so the API key stays out of logs
        tracing::debug!("Fetching catalog records from {}", self.config.base_url());

        let page: CatalogPage = self
            .http
            .get(self.config.endpoint())
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(info) = &page.info {
            tracing::debug!(
                "Catalog page {:?} of {:?} ({:?} records total)",
                info.page,
                info.pages,
                info.total_records
            );
        }

        tracing::info!("Fetched {} catalog records", page.records.len());

        Ok(page.records)
    }
}
