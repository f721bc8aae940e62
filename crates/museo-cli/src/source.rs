use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use museo_core::catalog::{CatalogClient, CatalogSource, FileCatalog};
use museo_core::config::CatalogConfig;
use std::path::PathBuf;
use std::time::Duration;

pub type BoxedSource = Box<dyn CatalogSource + Send + Sync>;

/// Where records come from: a saved response on disk, or the live catalog API
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub input: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub size: Option<u32>,
}

impl SourceOptions {
    /// Build the catalog source.
    ///
    /// `--input` wins over the network; otherwise the API key must be set.
    pub fn open(&self) -> Result<BoxedSource> {
        if let Some(path) = &self.input {
            tracing::debug!("Using saved catalog response: {}", path.display());
            return Ok(Box::new(FileCatalog::new(path)));
        }

        let mut config = CatalogConfig::new(self.api_key.clone(), self.base_url.as_deref())?;
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(size) = self.size {
            config = config.with_page_size(size);
        }

        tracing::debug!("Using catalog API at {}", config.base_url());
        Ok(Box::new(CatalogClient::new(config)?))
    }

    pub fn describe(&self) -> String {
        match &self.input {
            Some(path) => path.display().to_string(),
            None => "the catalog API".to_string(),
        }
    }
}

/// Spinner shown on stderr while a fetch is in flight; hidden when not a terminal
pub fn fetch_spinner(options: &SourceOptions) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching records from {}...", options.describe()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
