use std::path::Path;

use crate::{
    error::AppResult,
    models::{Movie, TagsMap, TmdbMovie},
};

/// Applies local overrides to a catalog movie
pub fn enrich_movie(mut movie: Movie, tags_map: &TagsMap) -> Movie {
    if let Some(extra) = tags_map.get(&movie.id) {
        if let Some(platform) = &extra.platform {
            movie.platform = Some(platform.clone());
        }
        if let Some(tags) = &extra.tags {
            movie.tags = tags.clone();
        }
        if let Some(length_min) = extra.length_min {
            movie.length_min = Some(length_min);
        }
    }
    movie
}

/// Normalizes raw TMDB results into movies, enriched from the tags map
pub fn convert_to_movies(raw_movies: Vec<TmdbMovie>, tags_map: &TagsMap) -> Vec<Movie> {
    raw_movies
        .into_iter()
        .map(|raw| enrich_movie(Movie::from(raw), tags_map))
        .collect()
}

/// Reads a JSON array of movie records
pub fn load_movies(path: impl AsRef<Path>) -> AppResult<Vec<Movie>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let movies = Movie::list_from_json(&raw)?;
    tracing::info!(path = %path.display(), movies = movies.len(), "Loaded movie catalog");
    Ok(movies)
}

/// Reads the tags map, empty when the file does not exist
pub fn load_tags_map(path: impl AsRef<Path>) -> AppResult<TagsMap> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(TagsMap::new());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieEnrichment;

    fn raw(id: u64, title: &str, genre_ids: Vec<u32>) -> TmdbMovie {
        TmdbMovie {
            id,
            title: title.to_string(),
            genre_ids,
            vote_average: Some(7.0),
        }
    }

    #[test]
    fn test_convert_enriches_known_ids_only() {
        let mut tags_map = TagsMap::new();
        tags_map.insert(
            "550".to_string(),
            MovieEnrichment {
                platform: Some("Netflix".to_string()),
                tags: Some(vec!["chill".to_string(), "classique".to_string()]),
                length_min: Some(139),
            },
        );

        let movies = convert_to_movies(
            vec![raw(550, "Fight Club", vec![18]), raw(603, "Matrix", vec![28, 878])],
            &tags_map,
        );

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].platform.as_deref(), Some("Netflix"));
        assert_eq!(movies[0].tags, vec!["chill".to_string(), "classique".to_string()]);
        assert_eq!(movies[0].length_min, Some(139));
        assert_eq!(movies[1].platform, None);
        assert!(movies[1].tags.is_empty());
        assert_eq!(movies[1].genres, vec!["28".to_string(), "878".to_string()]);
    }

    #[test]
    fn test_partial_enrichment_keeps_other_fields() {
        let mut tags_map = TagsMap::new();
        tags_map.insert(
            "1".to_string(),
            MovieEnrichment {
                tags: Some(vec!["action".to_string()]),
                ..Default::default()
            },
        );
        let movie = Movie {
            platform: Some("Prime Video".to_string()),
            ..Movie::new("1", "Kept")
        };

        let enriched = enrich_movie(movie, &tags_map);
        assert_eq!(enriched.platform.as_deref(), Some("Prime Video"));
        assert_eq!(enriched.tags, vec!["action".to_string()]);
    }

    #[test]
    fn test_load_movies_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "title": "One", "genres": ["Drama"]}, {"id": "2", "title": "Two"}]"#,
        )
        .unwrap();

        let movies = load_movies(&path).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, "1");
    }

    #[test]
    fn test_missing_tags_file_is_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let tags = load_tags_map(dir.path().join("tags.json")).unwrap();
        assert!(tags.is_empty());
    }
}
