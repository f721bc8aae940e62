use museo_core::analysis::summarize_counts;
use museo_core::catalog::FileCatalog;
use museo_core::pipeline::Pipeline;
use museo_core::records::{CATALOG_ORIGIN, PLACEHOLDER_IMAGE_URL, UNKNOWN_ARTIST};
use museo_core::sink::JsonFileSink;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// Three raw records, one without a title, yield two display records
#[test]
fn test_sample_batch_drops_untitled_record() {
    // Arrange
    let source = FileCatalog::new(fixture_path("catalog-sample.json"));

    // Act
    let (batch, report) = Pipeline::new(&source).analyze().unwrap();

    // Assert
    assert_eq!(batch.raw().len(), 3);
    assert_eq!(batch.len(), 2);
    assert_eq!(report.frequencies.titles.total(), 2);
    assert_eq!(report.frequencies.artists.total(), 2);

    let records = batch.records();
    assert_eq!(records[0].title, "Sunset over the Harbor");
    assert_eq!(records[0].artist_name, "Claude Monet");
    assert_eq!(records[1].title, "Study of Hands");
    assert_eq!(records[1].artist_name, UNKNOWN_ARTIST);
    assert_eq!(
        records[1].image_url,
        "https://harvardartmuseums.org/media/images/227406.jpg"
    );
    assert_eq!(records[1].persistent_link, "No link available");
}

/// Every image URL is absolute: upstream, rebased on the catalog origin, or the placeholder
#[test]
fn test_image_urls_are_absolute() {
    let source = FileCatalog::new(fixture_path("catalog-page.json"));
    let batch = Pipeline::new(&source).run().unwrap();

    assert_eq!(batch.len(), 12);
    for record in batch.records() {
        assert!(!record.title.is_empty());
        assert!(
            record.image_url.starts_with(CATALOG_ORIGIN)
                || record.image_url == PLACEHOLDER_IMAGE_URL
                || record.image_url.starts_with("https://nrs.harvard.edu"),
            "unexpected image url {}",
            record.image_url
        );
    }
}

#[test]
fn test_page_frequencies_and_summaries() {
    let source = FileCatalog::new(fixture_path("catalog-page.json"));
    let (batch, report) = Pipeline::new(&source).analyze().unwrap();

    let titles = &report.frequencies.titles;
    assert_eq!(titles.total(), batch.len());
    assert_eq!(titles.get("Vase"), Some(3));
    assert_eq!(titles.get("Untitled"), Some(2));
    assert_eq!(titles.len(), 7);

    let artists = &report.frequencies.artists;
    assert_eq!(artists.get(UNKNOWN_ARTIST), Some(4));
    assert_eq!(artists.get("[Attic Workshop]"), Some(1));
    assert_eq!(artists.total(), 12);

    assert_eq!(report.title_stats, summarize_counts(titles));
    assert_eq!(report.title_stats.count, 7);
    assert_eq!(report.title_stats.max, Some(3.0));
}

#[test]
fn test_snapshot_is_written_once() {
    let dir = TempDir::new().unwrap();
    let sink = JsonFileSink::new(dir.path().join("snapshot.json"));
    let source = FileCatalog::new(fixture_path("catalog-sample.json"));

    let batch = Pipeline::new(&source).with_sink(&sink).run().unwrap();

    let written = std::fs::read_to_string(sink.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value.as_array().unwrap().len(), batch.len());
}
