use std::fmt::Display;

use crate::{
    models::{Context, Movie, Preferences},
    services::{genres::GenreResolver, profile_store::Profile},
};

/// Score reported for excluded movies where a plain number is needed
pub const EXCLUDED_SCORE: f64 = -999.0;

/// Bonus for a movie whose tags contain the requested mood
pub const MOOD_BONUS: f64 = 0.5;

/// Why a movie was removed from consideration
#[derive(Debug, Clone, PartialEq)]
pub enum Exclusion {
    Seen,
    AvoidedGenre(String),
    TooLong { length_min: u32, max_length_min: u32 },
}

impl Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exclusion::Seen => write!(f, "already seen"),
            Exclusion::AvoidedGenre(genre) => write!(f, "avoided genre {}", genre),
            Exclusion::TooLong {
                length_min,
                max_length_min,
            } => write!(f, "{} min exceeds {} min cap", length_min, max_length_min),
        }
    }
}

/// Desirability of one movie, or the reason it must never be picked
#[derive(Debug, Clone, PartialEq)]
pub enum Score {
    Scored(f64),
    Excluded(Exclusion),
}

impl Score {
    pub fn is_excluded(&self) -> bool {
        matches!(self, Score::Excluded(_))
    }

    /// Numeric form; excluded movies rank below anything legitimate
    pub fn value(&self) -> f64 {
        match self {
            Score::Scored(value) => *value,
            Score::Excluded(_) => EXCLUDED_SCORE,
        }
    }
}

/// Scores one movie against preferences, profile and context
///
/// Exclusions are checked first, in order: seen, avoided genre, runtime
/// cap. The first one that fires ends scoring.
pub fn score_movie(
    movie: &Movie,
    prefs: &Preferences,
    context: Option<&Context>,
    profile: Option<&Profile>,
    genres: &GenreResolver,
) -> Score {
    let mut score = movie.rating;

    if prefs.exclude_seen {
        if let Some(profile) = profile {
            if profile.has_seen(&movie.id) {
                return Score::Excluded(Exclusion::Seen);
            }
        }
    }

    let resolved = genres.resolve(&movie.genres);

    if !prefs.avoid_genres.is_empty() {
        if let Some(genre) = resolved.iter().find(|g| prefs.avoids_genre(g)) {
            return Score::Excluded(Exclusion::AvoidedGenre(genre.clone()));
        }
    }

    if let (Some(max_length_min), Some(length_min)) =
        (prefs.length_cap(), movie.length_min.filter(|l| *l > 0))
    {
        if length_min > max_length_min {
            return Score::Excluded(Exclusion::TooLong {
                length_min,
                max_length_min,
            });
        }
    }

    // Average, not sum, so many-genre movies are not favoured
    if !resolved.is_empty() {
        let total: f64 = resolved.iter().map(|g| prefs.genre_weight(g)).sum();
        score += total / resolved.len() as f64;
    }

    if let Some(platform) = &movie.platform {
        score += prefs.platform_weight(platform);
    }

    if let Some(profile) = profile {
        score += profile.personal_rating(&movie.id);
    }

    if let Some(mood) = context
        .and_then(|c| c.mood.as_deref())
        .filter(|m| !m.is_empty())
    {
        if movie.tags.iter().any(|tag| tag == mood) {
            score += MOOD_BONUS;
        }
    }

    Score::Scored(score)
}
