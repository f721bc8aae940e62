mod normalize;

pub use normalize::{NormalizedBatch, SourcedRecord, normalize, normalize_batch};
pub(crate) use normalize::first_artist;

use serde::{Deserialize, Serialize};

/// Origin used to make relative image paths absolute
pub const CATALOG_ORIGIN: &str = "https://harvardartmuseums.org";

/// Image shown for objects without a primary image
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

pub const NO_LINK: &str = "No link available";

/// A catalog object reshaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub title: String,
    pub image_url: String,
    pub artist_name: String,
    pub persistent_link: String,
}

impl DisplayRecord {
    pub fn has_known_artist(&self) -> bool {
        self.artist_name != UNKNOWN_ARTIST
    }
}

/// Strip leading/trailing `[` `]` characters and surrounding whitespace.
///
/// ```
/// assert_eq!(museo_core::records::strip_brackets("[Sunset]"), "Sunset");
/// ```
pub fn strip_brackets(label: &str) -> &str {
    label
        .trim()
        .trim_matches(|c: char| c == '[' || c == ']' || c.is_whitespace())
}
