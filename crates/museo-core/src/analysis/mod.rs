mod count_map;
mod frequency;
mod stats;

pub use count_map::CountMap;
pub use frequency::{ArtworkFacts, Frequencies, aggregate};
pub use stats::{StatsSummary, format_metric, summarize, summarize_counts, summarize_values};

use serde::Serialize;

/// Frequencies of a batch plus a summary of each dimension
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub frequencies: Frequencies,
    pub title_stats: StatsSummary,
    pub artist_stats: StatsSummary,
}

impl AnalysisReport {
    pub fn from_frequencies(frequencies: Frequencies) -> Self {
        let title_stats = summarize_counts(&frequencies.titles);
        let artist_stats = summarize_counts(&frequencies.artists);

        tracing::info!(
            "Analysis complete: {} titles, {} artists",
            title_stats.count,
            artist_stats.count
        );

        Self {
            frequencies,
            title_stats,
            artist_stats,
        }
    }
}

/// Aggregate a batch and summarize both dimensions
pub fn analyze<I>(records: I) -> AnalysisReport
where
    I: IntoIterator,
    I::Item: ArtworkFacts,
{
    AnalysisReport::from_frequencies(aggregate(records))
}
