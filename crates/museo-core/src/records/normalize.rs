use super::{
    CATALOG_ORIGIN, DisplayRecord, NO_LINK, PLACEHOLDER_IMAGE_URL, UNKNOWN_ARTIST, strip_brackets,
};
use crate::catalog::{Person, RawRecord};

/// Convert one raw record into its display form.
///
/// Returns `None` when the record has no usable title. Every other missing
/// field falls back to a fixed default, so this never fails.
pub fn normalize(raw: &RawRecord) -> Option<DisplayRecord> {
    let title = raw
        .title
        .as_deref()
        .map(strip_brackets)
        .filter(|t| !t.is_empty());

    let Some(title) = title else {
        tracing::info!("Skipping record without a usable title (link: {:?})", raw.url);
        return None;
    };

    Some(DisplayRecord {
        title: title.to_string(),
        image_url: resolve_image_url(raw.primaryimageurl.as_deref()),
        artist_name: first_artist(raw.people.as_deref())
            .unwrap_or(UNKNOWN_ARTIST)
            .to_string(),
        persistent_link: raw
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(NO_LINK)
            .to_string(),
    })
}

/// Name of the first credited person, if there is one.
pub(crate) fn first_artist(people: Option<&[Person]>) -> Option<&str> {
    people?
        .first()?
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
}

fn resolve_image_url(url: Option<&str>) -> String {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        None => PLACEHOLDER_IMAGE_URL.to_string(),
        Some(u) if u.starts_with("http") => u.to_string(),
        Some(u) if u.starts_with('/') => format!("{}{}", CATALOG_ORIGIN, u),
        Some(u) => format!("{}/{}", CATALOG_ORIGIN, u),
    }
}

/// Display records paired with the raw records they came from.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    raw: Vec<RawRecord>,
    records: Vec<DisplayRecord>,
    /// `origins[i]` is the index in `raw` that produced `records[i]`
    origins: Vec<usize>,
}

/// A display record together with its raw source.
#[derive(Debug, Clone, Copy)]
pub struct SourcedRecord<'a> {
    pub display: &'a DisplayRecord,
    pub raw: &'a RawRecord,
}

impl NormalizedBatch {
    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DisplayRecord> {
        self.records
    }

    pub fn raw(&self) -> &[RawRecord] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.raw.len() - self.records.len()
    }

    pub fn sourced(&self) -> Vec<SourcedRecord<'_>> {
        self.records
            .iter()
            .zip(&self.origins)
            .map(|(display, &idx)| SourcedRecord {
                display,
                raw: &self.raw[idx],
            })
            .collect()
    }
}

/// Normalize every record in order, dropping those without a usable title.
pub fn normalize_batch(raw: Vec<RawRecord>) -> NormalizedBatch {
    tracing::debug!("Normalizing {} raw records", raw.len());

    let mut records = Vec::with_capacity(raw.len());
    let mut origins = Vec::with_capacity(raw.len());
    for (idx, record) in raw.iter().enumerate() {
        if let Some(display) = normalize(record) {
            records.push(display);
            origins.push(idx);
        }
    }

    let batch = NormalizedBatch {
        raw,
        records,
        origins,
    };

    tracing::info!(
        "Normalized {} records ({} skipped)",
        batch.len(),
        batch.skipped()
    );

    batch
}
