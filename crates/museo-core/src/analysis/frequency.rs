use super::CountMap;
use crate::catalog::Person;
use crate::records::{DisplayRecord, SourcedRecord, UNKNOWN_ARTIST, first_artist};
use serde::Serialize;

/// What the aggregator needs to know about one artwork.
pub trait ArtworkFacts {
    fn title(&self) -> &str;

    /// The already-resolved artist name, if any
    fn artist_name(&self) -> Option<&str>;

    /// Raw credited people, when the caller still has them
    fn people(&self) -> Option<&[Person]> {
        None
    }
}

impl ArtworkFacts for DisplayRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn artist_name(&self) -> Option<&str> {
        Some(&self.artist_name)
    }
}

impl ArtworkFacts for SourcedRecord<'_> {
    fn title(&self) -> &str {
        &self.display.title
    }

    fn artist_name(&self) -> Option<&str> {
        Some(&self.display.artist_name)
    }

    fn people(&self) -> Option<&[Person]> {
        self.raw.people.as_deref()
    }
}

impl<T: ArtworkFacts + ?Sized> ArtworkFacts for &T {
    fn title(&self) -> &str {
        (**self).title()
    }

    fn artist_name(&self) -> Option<&str> {
        (**self).artist_name()
    }

    fn people(&self) -> Option<&[Person]> {
        (**self).people()
    }
}

/// Title and artist counts for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Frequencies {
    pub titles: CountMap,
    pub artists: CountMap,
}

/// Count titles and artists across a batch.
///
/// The `Unknown Artist` bucket is always present in the artist counts, even
/// when empty, so charts always show that category.
pub fn aggregate<I>(records: I) -> Frequencies
where
    I: IntoIterator,
    I::Item: ArtworkFacts,
{
    let mut titles = CountMap::new();
    let mut artists = CountMap::new();

    for record in records {
        titles.increment(record.title());
        artists.increment(resolve_artist(&record));
    }

    artists.ensure(UNKNOWN_ARTIST);

    tracing::debug!(
        "Aggregated {} distinct titles and {} artist buckets",
        titles.len(),
        artists.len()
    );

    Frequencies { titles, artists }
}

fn resolve_artist<R: ArtworkFacts>(record: &R) -> &str {
    record
        .artist_name()
        .filter(|name| !name.is_empty() && *name != UNKNOWN_ARTIST)
        .or_else(|| first_artist(record.people()))
        .unwrap_or(UNKNOWN_ARTIST)
}
