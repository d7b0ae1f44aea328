use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// A candidate movie as seen by the scoring engine
///
/// `id` is the join key against profile entries. `seen` and
/// `last_suggested` mirror profile state for display only; the profile is
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// Raw genre identifiers (TMDB codes) or display names
    #[serde(default, deserialize_with = "genre_list")]
    pub genres: Vec<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub length_min: Option<u32>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seen: bool,
    #[serde(default)]
    pub last_suggested: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl Movie {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            genres: Vec::new(),
            length_min: None,
            platform: None,
            rating: 0.0,
            seen: false,
            last_suggested: None,
            tags: Vec::new(),
        }
    }

    /// Converts a plain key-value record into a movie
    ///
    /// Fails only when `id` or `title` is missing or unusable.
    pub fn from_value(value: Value) -> AppResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::InvalidInput(format!("Invalid movie record: {}", e)))
    }

    /// Plain key-value form with every field present
    pub fn to_value(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parses a JSON array of movie records
    pub fn list_from_json(json: &str) -> AppResult<Vec<Self>> {
        let raw: Vec<Value> = serde_json::from_str(json)?;
        raw.into_iter().map(Self::from_value).collect()
    }
}

fn id_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_to_string(value).ok_or_else(|| serde::de::Error::custom("id must be a string or number"))
}

fn genre_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| {
            id_to_string(v)
                .ok_or_else(|| serde::de::Error::custom("genre must be a string or number"))
        })
        .collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_applies_defaults() {
        let movie = Movie::from_value(json!({ "id": "550", "title": "Fight Club" })).unwrap();
        assert_eq!(movie.id, "550");
        assert!(movie.genres.is_empty());
        assert_eq!(movie.length_min, None);
        assert_eq!(movie.platform, None);
        assert_eq!(movie.rating, 0.0);
        assert!(!movie.seen);
        assert_eq!(movie.last_suggested, None);
        assert!(movie.tags.is_empty());
    }

    #[test]
    fn test_from_value_coerces_numeric_id_and_genres() {
        let movie = Movie::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "genres": [28, "878"],
            "rating": 8.2
        }))
        .unwrap();
        assert_eq!(movie.id, "603");
        assert_eq!(movie.genres, vec!["28".to_string(), "878".to_string()]);
        assert_eq!(movie.rating, 8.2);
    }

    #[test]
    fn test_from_value_tolerates_nulls() {
        let movie = Movie::from_value(json!({
            "id": "1",
            "title": "Nulls",
            "genres": null,
            "rating": null,
            "tags": null,
            "length_min": null
        }))
        .unwrap();
        assert!(movie.genres.is_empty());
        assert_eq!(movie.rating, 0.0);
        assert!(movie.tags.is_empty());
    }

    #[test]
    fn test_from_value_missing_title_fails() {
        let result = Movie::from_value(json!({ "id": "1" }));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_from_value_missing_id_fails() {
        let result = Movie::from_value(json!({ "title": "Nameless" }));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_to_value_round_trip() {
        let movie = Movie {
            id: "680".to_string(),
            title: "Pulp Fiction".to_string(),
            genres: vec!["80".to_string(), "Thriller".to_string()],
            length_min: Some(154),
            platform: Some("Netflix".to_string()),
            rating: 8.5,
            seen: true,
            last_suggested: Some("2024-05-01".to_string()),
            tags: vec!["classique".to_string()],
        };

        let value = movie.to_value().unwrap();
        assert_eq!(value["length_min"], 154);
        assert_eq!(Movie::from_value(value).unwrap(), movie);
    }

    #[test]
    fn test_to_value_keeps_absent_optionals_as_null() {
        let value = Movie::new("1", "Bare").to_value().unwrap();
        assert!(value["platform"].is_null());
        assert!(value["length_min"].is_null());
        assert!(value["last_suggested"].is_null());
    }

    #[test]
    fn test_list_from_json_reports_bad_record() {
        let json = r#"[{"id": 1, "title": "Ok"}, {"id": 2}]"#;
        assert!(Movie::list_from_json(json).is_err());
    }
}
