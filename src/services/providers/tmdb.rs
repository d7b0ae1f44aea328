//! TMDB catalog provider
//!
//! Uses `/discover/movie` sorted by popularity. Results carry genre ids only;
//! runtime and platform are not part of discovery and come from local
//! enrichment instead.

use crate::{
    error::{AppError, AppResult},
    models::{TmdbDiscoverPage, TmdbMovie},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            language,
        }
    }

    /// Query parameters for one discovery page
    fn discover_params(&self, genre_id: Option<u32>, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("language", self.language.clone()),
            ("sort_by", "popularity.desc".to_string()),
            ("page", page.to_string()),
        ];
        if let Some(genre_id) = genre_id {
            params.push(("with_genres", genre_id.to_string()));
        }
        params
    }

    async fn fetch_page(&self, genre_id: Option<u32>, page: u32) -> AppResult<TmdbDiscoverPage> {
        let url = format!("{}/discover/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&self.discover_params(genre_id, page))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                page = page,
                status = %status,
                body = %body,
                "TMDB discover request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn discover(&self, genre_id: Option<u32>, pages: u32) -> AppResult<Vec<TmdbMovie>> {
        let mut results = Vec::new();

        for page in 1..=pages {
            let discovered = self.fetch_page(genre_id, page).await?;
            tracing::debug!(
                page = discovered.page,
                total_pages = discovered.total_pages,
                results = discovered.results.len(),
                "TMDB page fetched"
            );
            results.extend(discovered.results);
        }

        tracing::info!(
            genre_id = ?genre_id,
            pages = pages,
            results = results.len(),
            provider = self.name(),
            "Catalog discovery completed"
        );

        Ok(results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
