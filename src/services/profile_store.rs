use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::ProfileData,
};

/// Storage seam for the user profile
///
/// Implementations must have written the data durably when `save` returns.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileStore: Send + Sync {
    fn load(&self) -> AppResult<ProfileData>;

    fn save(&self, data: &ProfileData) -> AppResult<()>;
}

/// Profile kept as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileStore for JsonFileStore {
    /// A missing file is initialized with an empty profile
    fn load(&self) -> AppResult<ProfileData> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "Profile not found, creating empty profile");
            let empty = ProfileData::default();
            self.save(&empty)?;
            return Ok(empty);
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let data: ProfileData = serde_json::from_str(&raw)?;

        tracing::debug!(
            path = %self.path.display(),
            seen = data.seen.len(),
            rated = data.personal_ratings.len(),
            "Profile loaded"
        );

        Ok(data)
    }

    fn save(&self, data: &ProfileData) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Replace by rename so readers never see a half-written file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(data)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Profile data bound to the store it was loaded from
///
/// Every mutator persists before returning. If the write fails the
/// in-memory data is left as it was and the error is returned.
pub struct Profile {
    data: ProfileData,
    store: Arc<dyn ProfileStore>,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile").field("data", &self.data).finish()
    }
}

impl Profile {
    pub fn new(data: ProfileData, store: Arc<dyn ProfileStore>) -> Self {
        Self { data, store }
    }

    pub fn load(store: Arc<dyn ProfileStore>) -> AppResult<Self> {
        let data = store.load()?;
        Ok(Self::new(data, store))
    }

    pub fn data(&self) -> &ProfileData {
        &self.data
    }

    pub fn has_seen(&self, movie_id: &str) -> bool {
        self.data.seen.iter().any(|id| id == movie_id)
    }

    /// Personal rating, 0.0 when the movie was never rated
    pub fn personal_rating(&self, movie_id: &str) -> f64 {
        self.data
            .personal_ratings
            .get(movie_id)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn last_suggested(&self, movie_id: &str) -> Option<&str> {
        self.data.last_suggested.get(movie_id).map(String::as_str)
    }

    pub fn mark_seen(&mut self, movie_id: &str) -> AppResult<()> {
        self.persist_with(|data| {
            if !data.seen.iter().any(|id| id == movie_id) {
                data.seen.push(movie_id.to_string());
            }
        })?;
        tracing::info!(movie_id = %movie_id, "Marked as seen");
        Ok(())
    }

    /// Rejects NaN and infinities, which JSON cannot hold
    pub fn rate_movie(&mut self, movie_id: &str, rating: f64) -> AppResult<()> {
        if !rating.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "rating for {} must be a finite number, got {}",
                movie_id, rating
            )));
        }

        self.persist_with(|data| {
            data.personal_ratings.insert(movie_id.to_string(), rating);
        })?;
        tracing::info!(movie_id = %movie_id, rating, "Personal rating saved");
        Ok(())
    }

    /// Records `date` as the last suggestion date, replacing any earlier one
    pub fn update_last_suggested(&mut self, movie_id: &str, date: NaiveDate) -> AppResult<()> {
        let iso = date.format("%Y-%m-%d").to_string();
        self.persist_with(|data| {
            data.last_suggested.insert(movie_id.to_string(), iso);
        })
    }

    fn persist_with(&mut self, mutate: impl FnOnce(&mut ProfileData)) -> AppResult<()> {
        let mut next = self.data.clone();
        mutate(&mut next);
        self.store.save(&next)?;
        self.data = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn saving_store(times: usize) -> Arc<dyn ProfileStore> {
        let mut store = MockProfileStore::new();
        store.expect_save().times(times).returning(|_| Ok(()));
        Arc::new(store)
    }

    #[test]
    fn test_queries_on_empty_profile() {
        let profile = Profile::new(ProfileData::default(), Arc::new(MockProfileStore::new()));
        assert!(!profile.has_seen("550"));
        assert_eq!(profile.personal_rating("550"), 0.0);
        assert_eq!(profile.last_suggested("550"), None);
    }

    #[test]
    fn test_mark_seen_is_idempotent_and_persists_each_call() {
        let mut profile = Profile::new(ProfileData::default(), saving_store(2));

        profile.mark_seen("550").unwrap();
        profile.mark_seen("550").unwrap();

        assert!(profile.has_seen("550"));
        assert_eq!(profile.data().seen, vec!["550".to_string()]);
    }

    #[test]
    fn test_rate_movie_overwrites() {
        let mut profile = Profile::new(ProfileData::default(), saving_store(2));

        profile.rate_movie("603", 1.5).unwrap();
        profile.rate_movie("603", -1.0).unwrap();

        assert_eq!(profile.personal_rating("603"), -1.0);
    }

    #[test]
    fn test_rate_movie_rejects_non_finite_without_saving() {
        let mut profile = Profile::new(ProfileData::default(), saving_store(0));

        for rating in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = profile.rate_movie("550", rating);
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }
        assert!(profile.data().personal_ratings.is_empty());
    }

    #[test]
    fn test_json_store_stays_loadable_after_rejected_rating() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ProfileStore> =
            Arc::new(JsonFileStore::new(dir.path().join("profile.json")));

        let mut profile = Profile::load(store.clone()).unwrap();
        profile.rate_movie("550", 1.0).unwrap();
        assert!(profile.rate_movie("550", "NaN".parse().unwrap()).is_err());

        let reloaded = Profile::load(store).unwrap();
        assert_eq!(reloaded.personal_rating("550"), 1.0);
    }

    #[test]
    fn test_update_last_suggested_writes_iso_date() {
        let mut store = MockProfileStore::new();
        store
            .expect_save()
            .withf(|data| data.last_suggested.get("680").map(String::as_str) == Some("2024-03-09"))
            .times(1)
            .returning(|_| Ok(()));
        let mut profile = Profile::new(
            ProfileData {
                last_suggested: HashMap::from([("680".to_string(), "2023-01-01".to_string())]),
                ..Default::default()
            },
            Arc::new(store),
        );

        profile.update_last_suggested("680", date(2024, 3, 9)).unwrap();

        assert_eq!(profile.last_suggested("680"), Some("2024-03-09"));
    }

    #[test]
    fn test_failed_save_is_surfaced_and_leaves_data_untouched() {
        let mut store = MockProfileStore::new();
        store
            .expect_save()
            .returning(|_| Err(AppError::Internal("disk full".to_string())));
        let mut profile = Profile::new(ProfileData::default(), Arc::new(store));

        let result = profile.mark_seen("550");

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(!profile.has_seen("550"));
    }

    #[test]
    fn test_json_store_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profile.json");
        let store = JsonFileStore::new(&path);

        let data = store.load().unwrap();

        assert_eq!(data, ProfileData::default());
        assert!(path.exists());
        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk["seen"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_mutations_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn ProfileStore> =
            Arc::new(JsonFileStore::new(dir.path().join("profile.json")));

        let mut profile = Profile::load(store.clone()).unwrap();
        profile.mark_seen("550").unwrap();
        profile.rate_movie("550", 2.0).unwrap();
        profile.update_last_suggested("603", date(2024, 1, 2)).unwrap();

        let reloaded = Profile::load(store).unwrap();
        assert!(reloaded.has_seen("550"));
        assert_eq!(reloaded.personal_rating("550"), 2.0);
        assert_eq!(reloaded.last_suggested("603"), Some("2024-01-02"));
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::new(&path).load();
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}
