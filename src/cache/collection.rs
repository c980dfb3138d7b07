//! Named partitions of the cache

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cache collection, one per kind of cached resource
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// The full league catalogue
    Leagues,
    /// Season badge URLs keyed by league id
    Badges,
    /// Filtered league lists keyed by search term and sport
    SearchResults,
}

impl Collection {
    /// Every collection, in sweep order
    pub const ALL: [Collection; 3] = [
        Collection::Leagues,
        Collection::Badges,
        Collection::SearchResults,
    ];

    /// Name used in persisted entries and as the on-disk directory name
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Leagues => "leagues",
            Collection::Badges => "badges",
            Collection::SearchResults => "searchResults",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
