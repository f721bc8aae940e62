use crate::chart::ChartKind;
use museo_core::analysis::{StatsSummary, format_metric};

/// Fixed explanation printed under each chart
pub fn chart_description(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Pie => {
            "This pie chart shows how object titles are distributed across the current \
             selection. Each slice stands for one title and is sized by the number of \
             objects that carry it; slices are ordered from the most to the least common \
             title, starting at twelve o'clock and running clockwise."
        }
        ChartKind::Bar => {
            "This bar chart compares how many objects are attributed to each artist, \
             ordered from the most to the least represented. Objects without a credited \
             artist are grouped under Unknown Artist, which is always listed even when \
             it is empty."
        }
        ChartKind::Line => {
            "This line chart traces how often each title occurs, with titles in \
             alphabetical order along the horizontal axis. Peaks mark titles shared by \
             several objects in the collection."
        }
    }
}

fn applicable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// "1 time", "2.5 times"
fn times(value: f64) -> String {
    if value == 1.0 {
        "1 time".to_string()
    } else {
        format!("{} times", format_metric(Some(value)))
    }
}

/// Plain-language sentences describing a summary.
///
/// A sentence is only produced for statistics that are applicable and
/// non-zero, so the text never mentions a missing value.
pub fn stats_narrative(subject: &str, summary: &StatsSummary) -> Vec<String> {
    if summary.count == 0 {
        return vec![format!(
            "No {} data was available for analysis in this selection.",
            subject
        )];
    }

    let entries = if summary.count == 1 { "entry" } else { "entries" };
    let mut sentences = vec![format!(
        "The selection contains {} distinct {} {}.",
        summary.count, subject, entries
    )];

    if let Some(mean) = applicable(summary.mean) {
        sentences.push(format!(
            "On average, each {} appears {}.",
            subject,
            times(mean)
        ));
    }
    if let Some(mode) = applicable(summary.mode) {
        sentences.push(format!(
            "The most common frequency is {}.",
            format_metric(Some(mode))
        ));
    }
    if let Some(median) = applicable(summary.median) {
        sentences.push(format!(
            "The median frequency is {}.",
            format_metric(Some(median))
        ));
    }
    if let Some(variance) = applicable(summary.variance) {
        sentences.push(format!(
            "Frequencies have a variance of {}, showing how unevenly objects are spread across {} entries.",
            format_metric(Some(variance)),
            subject
        ));
    }
    if let Some(std_dev) = applicable(summary.std_dev) {
        sentences.push(format!(
            "The standard deviation is {}.",
            format_metric(Some(std_dev))
        ));
    }
    if let Some(max) = applicable(summary.max) {
        sentences.push(format!(
            "The most frequent {} appears {}.",
            subject,
            times(max)
        ));
    }
    if let Some(min) = applicable(summary.min) {
        sentences.push(format!(
            "The least frequent {} appears {}.",
            subject,
            times(min)
        ));
    }

    sentences
}

/// Metric/value rows for the raw statistics table, `N/A` where not applicable
pub fn stats_rows(summary: &StatsSummary) -> Vec<(String, String)> {
    let mut rows = vec![("Count".to_string(), summary.count.to_string())];
    rows.extend(
        summary
            .metrics()
            .iter()
            .map(|(name, value)| (name.to_string(), format_metric(*value))),
    );
    rows
}
