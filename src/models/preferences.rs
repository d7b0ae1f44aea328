use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the user asked for in this run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    /// Drop movies the profile marks as seen
    #[serde(default)]
    pub exclude_seen: bool,
    /// Genre names that disqualify a movie, compared case-insensitively
    #[serde(default)]
    pub avoid_genres: Vec<String>,
    /// Hard runtime ceiling in minutes
    #[serde(default)]
    pub max_length_min: Option<u32>,
    /// Genre name → weight
    #[serde(default)]
    pub genres: HashMap<String, f64>,
    /// Platform name → weight
    #[serde(default)]
    pub platforms_preferred: HashMap<String, f64>,
}

impl Preferences {
    pub fn genre_weight(&self, genre: &str) -> f64 {
        self.genres.get(genre).copied().unwrap_or(0.0)
    }

    pub fn platform_weight(&self, platform: &str) -> f64 {
        self.platforms_preferred.get(platform).copied().unwrap_or(0.0)
    }

    /// Runtime cap, with zero meaning "no cap"
    pub fn length_cap(&self) -> Option<u32> {
        self.max_length_min.filter(|cap| *cap > 0)
    }

    pub fn avoids_genre(&self, genre: &str) -> bool {
        let genre = genre.to_lowercase();
        self.avoid_genres
            .iter()
            .any(|avoided| avoided.to_lowercase() == genre)
    }
}

/// Situational information for a single run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Context {
    #[serde(default)]
    pub mood: Option<String>,
}

impl Context {
    pub fn with_mood(mood: impl Into<String>) -> Self {
        Self {
            mood: Some(mood.into()),
        }
    }
}
