use crate::commands::csv_field;
use crate::source::fetch_spinner;
use crate::{OutputFormat, SourceOptions};
use anyhow::{Context, Result};
use museo_core::pipeline::Pipeline;
use museo_core::records::{DisplayRecord, NormalizedBatch};
use museo_core::sink::JsonFileSink;
use std::path::PathBuf;

/// Where `--snapshot` should write, if anywhere.
///
/// `--snapshot` with no path uses `<cache dir>/museo/last_batch.json`.
pub fn snapshot_sink(snapshot: Option<Option<PathBuf>>) -> Result<Option<JsonFileSink>> {
    match snapshot {
        None => Ok(None),
        Some(Some(path)) => Ok(Some(JsonFileSink::new(path))),
        Some(None) => JsonFileSink::default_location(dirs::cache_dir().as_deref())
            .map(Some)
            .context("No cache directory on this platform; pass --snapshot PATH"),
    }
}

/// Fetch and normalize one batch, writing the optional snapshot
pub fn fetch_records(options: &SourceOptions, sink: Option<&JsonFileSink>) -> Result<NormalizedBatch> {
    let source = options.open()?;

    let mut pipeline = Pipeline::new(source.as_ref());
    if let Some(sink) = sink {
        pipeline = pipeline.with_sink(sink);
    }

    let spinner = fetch_spinner(options);
    let batch = pipeline.run();
    spinner.finish_and_clear();

    Ok(batch?)
}

pub fn execute(
    options: &SourceOptions,
    snapshot: Option<Option<PathBuf>>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Fetching catalog records from {}", options.describe());

    let sink = snapshot_sink(snapshot)?;
    let batch = fetch_records(options, sink.as_ref())?;

    match format {
        OutputFormat::Json => output_json(batch.records())?,
        OutputFormat::Table => output_table(batch.records()),
        OutputFormat::Pretty => output_pretty(&batch),
    }

    Ok(())
}

fn output_json(records: &[DisplayRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{}", json);
    Ok(())
}

fn output_table(records: &[DisplayRecord]) {
    println!("Title,Artist,Image URL,Link");
    for record in records {
        println!(
            "{},{},{},{}",
            csv_field(&record.title),
            csv_field(&record.artist_name),
            csv_field(&record.image_url),
            csv_field(&record.persistent_link)
        );
    }
}

fn output_pretty(batch: &NormalizedBatch) {
    use console::style;

    println!("\n{}", style("Catalog Records").bold().cyan());
    println!("{}", style("===============").cyan());

    for (i, record) in batch.records().iter().enumerate() {
        println!("\n{}. {}", i + 1, style(&record.title).bold());

        let artist = if record.has_known_artist() {
            style(record.artist_name.as_str()).green()
        } else {
            style(record.artist_name.as_str()).dim()
        };
        println!("   Artist: {}", artist);
        println!("   Image:  {}", record.image_url);
        println!("   Link:   {}", record.persistent_link);
    }

    println!(
        "\n{} records shown, {} skipped without a title",
        style(batch.len()).yellow(),
        batch.skipped()
    );
    println!();
}
