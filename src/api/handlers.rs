use axum::{extract::State, http::StatusCode, Extension, Json};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Context, Movie, Preferences, ProfileData},
    services::{
        recommendations::{DEFAULT_DIVERSITY, DEFAULT_K},
        Recommendation, Recommender, SelectionOptions,
    },
};

use super::{AppState, AppStateInner};

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default)]
    pub diversity: Option<f64>,
    /// Fixes the diversity draws for reproducible results
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MarkSeenRequest {
    pub movie_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub movie_id: String,
    pub rating: f64,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get the movie catalog
pub async fn get_movies(State(state): State<AppState>) -> Json<Vec<Movie>> {
    let inner = state.inner.read().await;
    Json(inner.movies.clone())
}

/// Run one recommendation pass against the catalog and stored profile
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Recommendation>> {
    let k = request.k.unwrap_or(DEFAULT_K);
    if k == 0 {
        return Err(AppError::InvalidInput("k must be at least 1".to_string()));
    }
    let options = SelectionOptions::new(k, request.diversity.unwrap_or(DEFAULT_DIVERSITY))?;

    tracing::info!(
        request_id = %request_id,
        k = options.k,
        diversity = options.diversity,
        mood = ?request.context.as_ref().and_then(|c| c.mood.as_deref()),
        "Processing recommendation request"
    );

    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut inner = state.inner.write().await;
    let AppStateInner {
        movies,
        genres,
        profile,
    } = &mut *inner;

    let recommendation = Recommender::new(genres, options).recommend(
        movies,
        &request.preferences,
        request.context.as_ref(),
        Some(profile),
        &mut rng,
    )?;

    tracing::info!(
        request_id = %request_id,
        selected = recommendation.len(),
        "Recommendation completed"
    );

    Ok(Json(recommendation))
}

/// Get the stored profile
pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileData> {
    let inner = state.inner.read().await;
    Json(inner.profile.data().clone())
}

/// Mark a catalog movie as seen
pub async fn mark_seen(
    State(state): State<AppState>,
    Json(request): Json<MarkSeenRequest>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    if !inner.has_movie(&request.movie_id) {
        return Err(AppError::NotFound(format!("movie {}", request.movie_id)));
    }
    inner.profile.mark_seen(&request.movie_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Store a personal rating for a catalog movie
pub async fn rate_movie(
    State(state): State<AppState>,
    Json(request): Json<RateMovieRequest>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    if !inner.has_movie(&request.movie_id) {
        return Err(AppError::NotFound(format!("movie {}", request.movie_id)));
    }
    inner.profile.rate_movie(&request.movie_id, request.rating)?;
    Ok(StatusCode::NO_CONTENT)
}
