use super::CountMap;
use crate::error::ConversionError;
use serde::Serialize;
use serde_json::Value;

/// Descriptive statistics over a set of counts.
///
/// `None` marks a statistic that is not applicable to the input (empty
/// input, a single value, or an undefined mode).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub mean: Option<f64>,
    pub mode: Option<f64>,
    pub median: Option<f64>,
    pub variance: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: usize,
}

impl StatsSummary {
    /// Every statistic marked not applicable
    pub fn not_applicable(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// `(name, value)` pairs in display order
    pub fn metrics(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("Mean", self.mean),
            ("Mode", self.mode),
            ("Median", self.median),
            ("Variance", self.variance),
            ("Standard Deviation", self.std_dev),
            ("Minimum", self.min),
            ("Maximum", self.max),
        ]
    }
}

/// Format a statistic for display: whole numbers without decimals,
/// anything else to two places, `N/A` when not applicable.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{:.2}", v),
    }
}

/// Summarize a sequence of numbers.
///
/// A non-finite value poisons the whole input: the result is the
/// all-not-applicable summary rather than a partial one.
pub fn summarize(values: &[f64]) -> StatsSummary {
    match try_summarize(values) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("Statistics unavailable: {}", e);
            StatsSummary::not_applicable(values.len())
        }
    }
}

/// Summarize loosely-typed values, accepting JSON numbers and numeric strings.
pub fn summarize_values(values: &[Value]) -> StatsSummary {
    match values.iter().map(to_number).collect::<Result<Vec<_>, _>>() {
        Ok(numbers) => summarize(&numbers),
        Err(e) => {
            tracing::warn!("Statistics unavailable: {}", e);
            StatsSummary::not_applicable(values.len())
        }
    }
}

/// Summarize the counts held by a [`CountMap`]
pub fn summarize_counts(counts: &CountMap) -> StatsSummary {
    summarize(&counts.values())
}

fn to_number(value: &Value) -> Result<f64, ConversionError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.ok_or_else(|| ConversionError {
        value: value.to_string(),
    })
}

fn try_summarize(values: &[f64]) -> Result<StatsSummary, ConversionError> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(ConversionError {
            value: bad.to_string(),
        });
    }

    let count = values.len();
    if count == 0 {
        return Ok(StatsSummary::not_applicable(0));
    }

    let mean = round2(values.iter().sum::<f64>() / count as f64);

    // Spread is measured around the rounded mean, as a population statistic
    let (variance, std_dev) = if count < 2 {
        (None, None)
    } else {
        let raw_variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        (Some(round2(raw_variance)), Some(round2(raw_variance.sqrt())))
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let median = if count % 2 == 0 {
        let mid = count / 2;
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[count / 2]
    };

    Ok(StatsSummary {
        mean: Some(mean),
        mode: mode(values),
        median: Some(median),
        variance,
        std_dev,
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        count,
    })
}

/// Most frequent value, ties broken by first occurrence.
///
/// Not applicable for fewer than two values, or when several distinct values
/// all occur equally often.
fn mode(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let mut tallies: Vec<(f64, usize)> = Vec::new();
    for &v in values {
        match tallies.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, n)) => *n += 1,
            None => tallies.push((v, 1)),
        }
    }

    let best = tallies.iter().map(|(_, n)| *n).max()?;
    if tallies.len() > 1 && tallies.iter().all(|(_, n)| *n == best) {
        return None;
    }

    tallies
        .iter()
        .find(|(_, n)| *n == best)
        .map(|(value, _)| *value)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
