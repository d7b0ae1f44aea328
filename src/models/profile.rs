use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persisted personal history: what was seen, how it was rated, and when
/// each movie was last suggested
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileData {
    /// Movie ids, insertion ordered, no duplicates
    #[serde(default)]
    pub seen: Vec<String>,
    #[serde(default)]
    pub personal_ratings: HashMap<String, f64>,
    /// Movie id → ISO date (YYYY-MM-DD)
    #[serde(default)]
    pub last_suggested: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_serializes_three_collections() {
        let json = serde_json::to_value(ProfileData::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj["seen"].as_array().unwrap().is_empty());
        assert!(obj["personal_ratings"].as_object().unwrap().is_empty());
        assert!(obj["last_suggested"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_partial_profile_defaults_missing_parts() {
        let profile: ProfileData = serde_json::from_str(r#"{"seen": ["550"]}"#).unwrap();
        assert_eq!(profile.seen, vec!["550".to_string()]);
        assert!(profile.personal_ratings.is_empty());
        assert!(profile.last_suggested.is_empty());
    }
}
