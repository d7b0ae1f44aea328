use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod movie;
pub mod preferences;
pub mod profile;

pub use movie::Movie;
pub use preferences::{Context, Preferences};
pub use profile::ProfileData;

/// Local per-movie overrides keyed by movie id (tags.json)
pub type TagsMap = HashMap<String, MovieEnrichment>;

/// Extra data a user keeps locally for a catalog movie
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieEnrichment {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub length_min: Option<u32>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of GET /discover/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDiscoverPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Raw movie as returned by TMDB discovery
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl From<TmdbMovie> for Movie {
    fn from(raw: TmdbMovie) -> Self {
        Movie {
            id: raw.id.to_string(),
            title: raw.title,
            genres: raw.genre_ids.iter().map(|g| g.to_string()).collect(),
            length_min: None,
            platform: None,
            rating: raw.vote_average.unwrap_or(0.0),
            seen: false,
            last_suggested: None,
            tags: Vec::new(),
        }
    }
}
