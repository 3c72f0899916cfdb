//! Domain and wire types for the remote catalog.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A single catalog entry as shown in the browse/search list.
///
/// Identity is `id` alone: equality and hashing ignore every other field,
/// so two decodings of the same remote entry compare equal even when the
/// remote has tweaked its metadata in between. Favorite state is not a
/// field here; it is projected separately onto the displayed list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable remote identifier.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Short synopsis ("overview" on the wire).
    pub summary: String,
    /// Relative poster path, resolvable against the image base URL.
    pub image_ref: Option<String>,
    /// Release date as the remote formats it (YYYY-MM-DD, possibly empty).
    pub release_label: String,
    /// Average rating on the remote's 0-10 scale.
    pub rating_average: f64,
    /// Number of ratings behind the average.
    pub rating_count: u32,
    /// Remote popularity score.
    pub popularity: f64,
}

impl PartialEq for CatalogItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CatalogItem {}

impl Hash for CatalogItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One page of the remote list/search response.
///
/// Only `results` is consumed; total-count fields are deliberately ignored
/// because pagination stops on the first empty page, not on a count.
#[derive(Debug, Deserialize)]
pub(crate) struct PageResponse {
    pub results: Vec<ItemRecord>,
}

/// A single entry as the remote encodes it.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
}

impl From<ItemRecord> for CatalogItem {
    fn from(r: ItemRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            summary: r.overview,
            image_ref: r.poster_path,
            release_label: r.release_date,
            rating_average: r.vote_average,
            rating_count: r.vote_count,
            popularity: r.popularity,
        }
    }
}
