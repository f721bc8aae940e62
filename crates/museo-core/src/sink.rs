use crate::error::SinkError;
use crate::records::DisplayRecord;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Somewhere to drop an advisory copy of a normalized batch.
///
/// Nothing in the pipeline ever reads a snapshot back.
pub trait BatchSink {
    fn write(&self, records: &[DisplayRecord]) -> Result<(), SinkError>;
}

/// Writes the batch as pretty-printed JSON to a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<cache dir>/museo/last_batch.json`, if the platform has a cache dir
    pub fn default_location(cache_dir: Option<&Path>) -> Option<Self> {
        cache_dir.map(|dir| Self::new(dir.join("museo").join("last_batch.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BatchSink for JsonFileSink {
    fn write(&self, records: &[DisplayRecord]) -> Result<(), SinkError> {
        tracing::debug!("Writing batch snapshot to: {}", self.path.display());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, records)?;

        tracing::info!(
            "Wrote snapshot of {} records to {}",
            records.len(),
            self.path.display()
        );

        Ok(())
    }
}
