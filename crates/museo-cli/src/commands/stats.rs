use crate::commands::csv_field;
use crate::source::fetch_spinner;
use crate::{OutputFormat, SourceOptions};
use anyhow::Result;
use museo_core::analysis::{AnalysisReport, CountMap, StatsSummary, format_metric};
use museo_core::pipeline::Pipeline;

/// Fetch one batch and aggregate it
pub fn analyze_catalog(options: &SourceOptions) -> Result<AnalysisReport> {
    let source = options.open()?;

    let spinner = fetch_spinner(options);
    let result = Pipeline::new(source.as_ref()).analyze();
    spinner.finish_and_clear();

    let (batch, report) = result?;
    tracing::debug!(
        "Analyzed {} records ({} skipped)",
        batch.len(),
        batch.skipped()
    );
    Ok(report)
}

pub fn execute(options: &SourceOptions, top: usize, format: OutputFormat) -> Result<()> {
    tracing::info!("Computing catalog statistics from {}", options.describe());

    let report = analyze_catalog(options)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report, top),
    }

    Ok(())
}

fn output_json(report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &AnalysisReport) {
    println!("Dimension,Label,Count");
    for (dimension, counts) in [
        ("title", &report.frequencies.titles),
        ("artist", &report.frequencies.artists),
    ] {
        for (label, count) in counts.display_entries() {
            println!("{},{},{}", dimension, csv_field(&label), count);
        }
    }

    println!();
    println!("Dimension,Statistic,Value");
    for (dimension, summary) in [("title", &report.title_stats), ("artist", &report.artist_stats)] {
        println!("{},Count,{}", dimension, summary.count);
        for (name, value) in summary.metrics() {
            println!("{},{},{}", dimension, name, format_metric(value));
        }
    }
}

fn output_pretty(report: &AnalysisReport, top: usize) {
    use console::style;

    println!("\n{}", style("Catalog Statistics").bold().cyan());
    println!("{}", style("==================").cyan());

    print_dimension("Titles", &report.frequencies.titles, &report.title_stats, top);
    print_dimension("Artists", &report.frequencies.artists, &report.artist_stats, top);

    println!();
}

fn print_dimension(heading: &str, counts: &CountMap, summary: &StatsSummary, top: usize) {
    use console::style;

    println!("\n{}", style(format!("{}:", heading)).bold());
    println!(
        "  Distinct:           {} ({} objects)",
        style(counts.len()).yellow(),
        counts.total()
    );

    let sorted = counts.sorted_by_count();
    for (label, count) in sorted.iter().take(top) {
        println!("  {:>4}  {}", style(count).green(), label);
    }
    if sorted.len() > top {
        println!("  ... and {} more", sorted.len() - top);
    }

    for (name, value) in summary.metrics() {
        let padded = format!("{}:", name);
        println!("  {:<20}{}", padded, format_metric(value));
    }
}
