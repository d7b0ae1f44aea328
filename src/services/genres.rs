use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// TMDB movie genre ids and their English names
const TMDB_GENRES: &[(&str, &str)] = &[
    ("28", "Action"),
    ("12", "Adventure"),
    ("16", "Animation"),
    ("35", "Comedy"),
    ("80", "Crime"),
    ("99", "Documentary"),
    ("18", "Drama"),
    ("10751", "Family"),
    ("14", "Fantasy"),
    ("36", "History"),
    ("27", "Horror"),
    ("10402", "Music"),
    ("9648", "Mystery"),
    ("10749", "Romance"),
    ("878", "Science Fiction"),
    ("10770", "TV Movie"),
    ("53", "Thriller"),
    ("10752", "War"),
    ("37", "Western"),
];

/// Maps opaque genre identifiers to display names
///
/// Built once per process and shared read-only. Identifiers missing from the
/// table resolve to themselves, so already-named genres pass through.
#[derive(Debug, Clone, Default)]
pub struct GenreResolver {
    names: HashMap<String, String>,
}

impl GenreResolver {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// Built-in TMDB table
    pub fn tmdb() -> Self {
        Self::new(
            TMDB_GENRES
                .iter()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        )
    }

    /// Loads a `{ "<id>": "<name>" }` JSON table
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let names: HashMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
            AppError::InvalidInput(format!("Invalid genre map {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), genres = names.len(), "Loaded genre map");

        Ok(Self::new(names))
    }

    /// Uses the table at `path` when given, the TMDB table otherwise
    pub fn from_optional_file(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::tmdb()),
        }
    }

    pub fn resolve_one(&self, genre: &str) -> String {
        self.names
            .get(genre)
            .cloned()
            .unwrap_or_else(|| genre.to_string())
    }

    /// Same length and order as the input
    pub fn resolve(&self, genres: &[String]) -> Vec<String> {
        genres.iter().map(|g| self.resolve_one(g)).collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_known_ids() {
        let resolver = GenreResolver::tmdb();
        let resolved = resolver.resolve(&["28".to_string(), "27".to_string()]);
        assert_eq!(resolved, vec!["Action".to_string(), "Horror".to_string()]);
    }

    #[test]
    fn test_resolve_passes_unknown_through() {
        let resolver = GenreResolver::tmdb();
        let resolved = resolver.resolve(&[
            "99999".to_string(),
            "Drama".to_string(),
            "35".to_string(),
        ]);
        assert_eq!(
            resolved,
            vec!["99999".to_string(), "Drama".to_string(), "Comedy".to_string()]
        );
    }

    #[test]
    fn test_resolve_empty() {
        let resolver = GenreResolver::default();
        assert!(resolver.is_empty());
        assert!(resolver.resolve(&[]).is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"28": "Action", "27": "Horreur"}}"#).unwrap();

        let resolver = GenreResolver::from_file(file.path()).unwrap();
        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve_one("27"), "Horreur");
    }

    #[test]
    fn test_from_file_rejects_malformed_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["not", "a", "map"]"#).unwrap();

        let result = GenreResolver::from_file(file.path());
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_from_optional_file_defaults_to_tmdb() {
        let resolver = GenreResolver::from_optional_file(None).unwrap();
        assert_eq!(resolver.resolve_one("878"), "Science Fiction");
    }
}
