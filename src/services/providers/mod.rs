//! Movie catalog provider abstraction
//!
//! Providers supply raw catalog records. Normalizing them into `Movie`s is
//! left to `services::catalog` so the engine never depends on how movies
//! were fetched.

use crate::{error::AppResult, models::TmdbMovie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Discover popular movies, optionally restricted to one genre id
    ///
    /// Fetches `pages` result pages in order and concatenates them. Any
    /// failed page fails the whole call.
    async fn discover(&self, genre_id: Option<u32>, pages: u32) -> AppResult<Vec<TmdbMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
