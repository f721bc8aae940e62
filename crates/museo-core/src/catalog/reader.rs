use super::client::CatalogSource;
use super::types::{CatalogPage, RawRecord};
use crate::error::TransportError;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Catalog source backed by a saved catalog response on disk.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse a catalog response from the given path
    pub fn from_file(path: &Path) -> Result<CatalogPage, TransportError> {
        tracing::debug!("Reading catalog response from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let page: CatalogPage = serde_json::from_reader(reader)
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        tracing::info!(
            "Successfully parsed catalog file with {} records",
            page.records.len()
        );

        Ok(page)
    }

    /// Parse a catalog response from a JSON string
    pub fn from_str(content: &str) -> Result<CatalogPage, TransportError> {
        tracing::debug!("Parsing catalog response from string");

        let page: CatalogPage =
            serde_json::from_str(content).map_err(|e| TransportError::Decode(e.to_string()))?;

        tracing::info!(
            "Successfully parsed catalog string with {} records",
            page.records.len()
        );

        Ok(page)
    }
}

impl CatalogSource for FileCatalog {
    fn fetch(&self) -> Result<Vec<RawRecord>, TransportError> {
        Ok(Self::from_file(&self.path)?.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_page() {
        let json = r#"{
            "info": {"totalrecords": 2, "pages": 1, "page": 1},
            "records": [{"title": "Vase"}, {"url": "https://example.org/2"}]
        }"#;

        let page = FileCatalog::from_str(json).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.info.unwrap().total_records, Some(2));
    }

    #[test]
    fn test_invalid_json_is_transport_error() {
        let result = FileCatalog::from_str("{ not json");
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_transport_error() {
        let source = FileCatalog::new("/definitely/not/here.json");
        assert!(matches!(source.fetch(), Err(TransportError::Io(_))));
    }

    #[test]
    fn test_fetch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"records": [{{"title": "Bowl"}}]}}"#).unwrap();

        let source = FileCatalog::new(file.path());
        let records = source.fetch().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Bowl"));
    }

    #[test]
    fn test_null_record_does_not_fail_page() {
        let page =
            FileCatalog::from_str(r#"{"records": [{"title": "Vase"}, null, {"title": "Bowl"}]}"#)
                .unwrap();
        assert_eq!(page.records.len(), 3);

        let batch = crate::records::normalize_batch(page.records);
        let titles: Vec<&str> = batch.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Vase", "Bowl"]);
        assert_eq!(batch.skipped(), 1);
    }

    #[test]
    fn test_null_records_is_empty_page() {
        let page = FileCatalog::from_str(r#"{"records": null}"#).unwrap();
        assert!(page.records.is_empty());
    }
}
