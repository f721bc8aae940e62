use crate::analysis::{AnalysisReport, analyze};
use crate::catalog::CatalogSource;
use crate::error::TransportError;
use crate::records::{NormalizedBatch, normalize_batch};
use crate::sink::BatchSink;

/// One fetch-and-normalize run against a catalog source.
pub struct Pipeline<'a> {
    source: &'a dyn CatalogSource,
    sink: Option<&'a dyn BatchSink>,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn CatalogSource) -> Self {
        Self { source, sink: None }
    }

    pub fn with_sink(mut self, sink: &'a dyn BatchSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Fetch once and normalize.
    ///
    /// A transport failure aborts the run. A sink failure is only logged.
    pub fn run(&self) -> Result<NormalizedBatch, TransportError> {
        let raw = self.source.fetch()?;
        let batch = normalize_batch(raw);

        if let Some(sink) = self.sink
            && let Err(e) = sink.write(batch.records())
        {
            tracing::warn!("Batch snapshot failed, continuing: {}", e);
        }

        Ok(batch)
    }

    /// Fetch, normalize, and aggregate into frequencies and summaries
    pub fn analyze(&self) -> Result<(NormalizedBatch, AnalysisReport), TransportError> {
        let batch = self.run()?;
        let report = analyze(batch.sourced());
        Ok((batch, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawRecord;
    use crate::error::SinkError;
    use crate::records::DisplayRecord;
    use std::cell::Cell;

    struct StaticSource(Vec<RawRecord>);

    impl CatalogSource for StaticSource {
        fn fetch(&self) -> Result<Vec<RawRecord>, TransportError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl CatalogSource for FailingSource {
        fn fetch(&self) -> Result<Vec<RawRecord>, TransportError> {
            Err(TransportError::Status { status: 503 })
        }
    }

    struct BrokenSink {
        calls: Cell<usize>,
    }

    impl BatchSink for BrokenSink {
        fn write(&self, _records: &[DisplayRecord]) -> Result<(), SinkError> {
            self.calls.set(self.calls.get() + 1);
            Err(SinkError::Io(std::io::Error::other("disk full")))
        }
    }

    fn titled(title: Option<&str>) -> RawRecord {
        RawRecord {
            title: title.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_transport_error_aborts() {
        let source = FailingSource;
        let result = Pipeline::new(&source).run();
        assert!(matches!(result, Err(TransportError::Status { status: 503 })));
    }

    #[test]
    fn test_sink_failure_does_not_fail_run() {
        let source = StaticSource(vec![titled(Some("Vase"))]);
        let sink = BrokenSink {
            calls: Cell::new(0),
        };

        let batch = Pipeline::new(&source).with_sink(&sink).run().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(sink.calls.get(), 1);
    }

    #[test]
    fn test_analyze_counts_match_batch() {
        let source = StaticSource(vec![
            titled(Some("Vase")),
            titled(None),
            titled(Some("Vase")),
        ]);

        let (batch, report) = Pipeline::new(&source).analyze().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(report.frequencies.titles.total(), 2);
        assert_eq!(report.frequencies.artists.total(), 2);
        assert_eq!(report.title_stats.count, 1);
    }
}
