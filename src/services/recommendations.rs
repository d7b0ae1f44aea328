use chrono::{Local, NaiveDate};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{Context, Movie, Preferences},
    services::{
        genres::GenreResolver,
        profile_store::Profile,
        scoring::{score_movie, Score},
    },
};

pub const DEFAULT_K: usize = 5;
pub const DEFAULT_DIVERSITY: f64 = 0.3;

/// How many movies to pick and how often to swap a ranked pick for a
/// random lower-ranked one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOptions {
    pub k: usize,
    /// Probability in [0, 1]
    pub diversity: f64,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            diversity: DEFAULT_DIVERSITY,
        }
    }
}

impl SelectionOptions {
    pub fn new(k: usize, diversity: f64) -> AppResult<Self> {
        if !(0.0..=1.0).contains(&diversity) {
            return Err(AppError::InvalidInput(format!(
                "diversity must be between 0 and 1, got {}",
                diversity
            )));
        }
        Ok(Self { k, diversity })
    }
}

/// A selected movie with the score it was picked with
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredMovie {
    pub movie: Movie,
    pub score: f64,
}

/// Picks in the order they were made
///
/// Diversity substitutions mean the order is not necessarily by score.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Recommendation {
    pub picks: Vec<ScoredMovie>,
}

impl Recommendation {
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.picks.iter().map(|p| &p.movie)
    }

    /// Movie id → score the movie was selected with
    pub fn scores(&self) -> HashMap<String, f64> {
        self.picks
            .iter()
            .map(|p| (p.movie.id.clone(), p.score))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

/// Scores, filters and picks movies for one run
pub struct Recommender<'a> {
    genres: &'a GenreResolver,
    options: SelectionOptions,
    today: NaiveDate,
}

impl<'a> Recommender<'a> {
    pub fn new(genres: &'a GenreResolver, options: SelectionOptions) -> Self {
        Self {
            genres,
            options,
            today: Local::now().date_naive(),
        }
    }

    /// Date written as "last suggested" for every pick
    pub fn on_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Non-excluded movies by descending score, ties kept in input order
    pub fn rank<'m>(
        &self,
        movies: &'m [Movie],
        prefs: &Preferences,
        context: Option<&Context>,
        profile: Option<&Profile>,
    ) -> Vec<(&'m Movie, f64)> {
        let mut ranked: Vec<(&Movie, f64)> = movies
            .iter()
            .filter_map(
                |movie| match score_movie(movie, prefs, context, profile, self.genres) {
                    Score::Scored(score) => Some((movie, score)),
                    Score::Excluded(reason) => {
                        tracing::debug!(movie_id = %movie.id, reason = %reason, "Movie excluded");
                        None
                    }
                },
            )
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Picks up to `k` movies and stamps each pick in the profile
    ///
    /// Walking the ranking from the top, each slot is filled either by the
    /// ranked movie or, with probability `diversity`, by a random movie
    /// from below rank `k`. A movie is picked at most once per call.
    pub fn recommend<R: Rng>(
        &self,
        movies: &[Movie],
        prefs: &Preferences,
        context: Option<&Context>,
        mut profile: Option<&mut Profile>,
        rng: &mut R,
    ) -> AppResult<Recommendation> {
        let ranked = self.rank(movies, prefs, context, profile.as_deref());
        let chosen = self.select(&ranked, rng);

        let picks: Vec<ScoredMovie> = chosen
            .into_iter()
            .map(|index| {
                let (movie, score) = ranked[index];
                tracing::debug!(movie_id = %movie.id, rank = index, score, "Movie picked");
                ScoredMovie {
                    movie: movie.clone(),
                    score,
                }
            })
            .collect();

        if let Some(profile) = profile.as_deref_mut() {
            for pick in &picks {
                profile.update_last_suggested(&pick.movie.id, self.today)?;
            }
        }

        tracing::info!(
            candidates = movies.len(),
            excluded = movies.len() - ranked.len(),
            selected = picks.len(),
            k = self.options.k,
            diversity = self.options.diversity,
            "Recommendation completed"
        );

        Ok(Recommendation { picks })
    }

    /// Indices into `ranked`, in pick order
    fn select<R: Rng>(&self, ranked: &[(&Movie, f64)], rng: &mut R) -> Vec<usize> {
        let k = self.options.k;
        let mut consumed = vec![false; ranked.len()];
        let mut chosen = Vec::with_capacity(k.min(ranked.len()));

        for position in 0..ranked.len() {
            if chosen.len() >= k {
                break;
            }
            if consumed[position] {
                continue;
            }

            let mut pick = position;
            if ranked.len() > k && rng.gen::<f64>() < self.options.diversity {
                let tail: Vec<usize> = (k..ranked.len()).filter(|i| !consumed[*i]).collect();
                if let Some(substitute) = tail.choose(rng) {
                    pick = *substitute;
                }
            }

            consumed[pick] = true;
            chosen.push(pick);
        }

        chosen
    }
}
