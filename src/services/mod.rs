pub mod catalog;
pub mod genres;
pub mod profile_store;
pub mod providers;
pub mod recommendations;
pub mod scoring;

pub use genres::GenreResolver;
pub use profile_store::{JsonFileStore, Profile, ProfileStore};
pub use recommendations::{Recommendation, Recommender, ScoredMovie, SelectionOptions};
pub use scoring::{score_movie, Exclusion, Score};
