use crate::SourceOptions;
use crate::commands::stats::analyze_catalog;
use anyhow::{Context, Result};
use museo_report::{BitmapChartRenderer, ReportMeta, build_report, render_charts};
use std::fs;
use std::path::Path;

pub fn execute(options: &SourceOptions, output: &Path, author: Option<String>) -> Result<()> {
    tracing::info!("Generating catalog report from {}", options.describe());

    let analysis = analyze_catalog(options)?;
    let charts = render_charts(&BitmapChartRenderer, &analysis.frequencies)?;

    let mut meta = ReportMeta::default();
    if let Some(author) = author {
        meta.author = author;
    }

    let cursor = build_report(
        &charts,
        &analysis.frequencies.titles,
        &analysis.frequencies.artists,
        meta,
    )?;
    let bytes = cursor.into_inner();

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, &bytes).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Report written to {} ({} bytes)",
        output.display(),
        bytes.len()
    );

    Ok(())
}
