use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    models::Movie,
    services::{GenreResolver, Profile},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Catalog, genre table and the single user profile
///
/// Profile mutations take the write lock, so recommendation passes never
/// overlap.
pub struct AppStateInner {
    pub movies: Vec<Movie>,
    pub genres: GenreResolver,
    pub profile: Profile,
}

impl AppState {
    pub fn new(movies: Vec<Movie>, genres: GenreResolver, profile: Profile) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                movies,
                genres,
                profile,
            })),
        }
    }
}

impl AppStateInner {
    pub fn has_movie(&self, movie_id: &str) -> bool {
        self.movies.iter().any(|m| m.id == movie_id)
    }
}
