use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use serde::de::DeserializeOwned;

use crate::{
    api::{create_router, AppState},
    config::Config,
    error::{AppError, AppResult},
    models::{Context, Movie, Preferences, TagsMap},
    services::{
        catalog,
        providers::{CatalogProvider, TmdbProvider},
        GenreResolver, JsonFileStore, Profile, ProfileStore, Recommendation, Recommender,
        ScoredMovie, SelectionOptions,
    },
};

/// Command-line arguments for cinepick
#[derive(Parser, Debug)]
#[command(name = "cinepick")]
#[command(about = "Personal movie recommendations from a local catalog or TMDB")]
#[command(version)]
pub struct Cli {
    /// Profile file, overrides PROFILE_PATH
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Genre id → name JSON table, overrides GENRE_MAP_PATH
    #[arg(long, global = true)]
    pub genre_map: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recommend from a local movie file
    Recommend(RecommendArgs),
    /// Recommend from movies discovered on TMDB
    Tmdb(TmdbArgs),
    /// Mark a movie as seen
    Seen { movie_id: String },
    /// Store a personal rating, added to the movie's score
    Rate { movie_id: String, rating: f64 },
    /// Serve the HTTP API over a local movie file
    Serve {
        #[arg(long, default_value = "movies.json")]
        movies: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    #[arg(long, default_value = "movies.json")]
    pub movies: PathBuf,

    #[arg(long, default_value = "prefs.json")]
    pub prefs: PathBuf,

    /// Ignored when the file does not exist
    #[arg(long, default_value = "contexts.json")]
    pub context: PathBuf,

    #[arg(long, default_value_t = 5)]
    pub k: usize,

    #[arg(long, default_value_t = 0.3)]
    pub diversity: f64,

    /// Seed for reproducible diversity draws
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct TmdbArgs {
    /// TMDB genre id to discover (28 = Action)
    #[arg(long, default_value_t = 28)]
    pub genre: u32,

    #[arg(long, default_value_t = 2)]
    pub pages: u32,

    #[arg(long, default_value = "prefs.json")]
    pub prefs: PathBuf,

    /// Local platform/tags overrides keyed by movie id
    #[arg(long, default_value = "tags.json")]
    pub tags: PathBuf,

    #[arg(long, default_value_t = 3)]
    pub k: usize,

    #[arg(long, default_value_t = 0.3)]
    pub diversity: f64,

    #[arg(long)]
    pub seed: Option<u64>,
}

/// Dispatches the parsed command
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let profile_path = cli
        .profile
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.profile_path));
    let genre_map = cli
        .genre_map
        .clone()
        .or_else(|| config.genre_map_path.as_ref().map(PathBuf::from));
    let genres = GenreResolver::from_optional_file(genre_map.as_deref())
        .context("Failed to load genre map")?;
    let store: Arc<dyn ProfileStore> = Arc::new(JsonFileStore::new(&profile_path));

    match cli.command {
        Command::Recommend(args) => run_recommend(args, store, &genres),
        Command::Tmdb(args) => run_tmdb(args, &config, store, &genres).await,
        Command::Seen { movie_id } => {
            let mut profile = load_profile(store)?;
            profile.mark_seen(&movie_id)?;
            println!("✔ {} marked as seen", movie_id);
            Ok(())
        }
        Command::Rate { movie_id, rating } => {
            let mut profile = load_profile(store)?;
            profile.rate_movie(&movie_id, rating)?;
            println!("✔ {} rated {}", movie_id, rating);
            Ok(())
        }
        Command::Serve { movies } => serve(&movies, &config, store, genres).await,
    }
}

fn run_recommend(
    args: RecommendArgs,
    store: Arc<dyn ProfileStore>,
    genres: &GenreResolver,
) -> Result<()> {
    let movies = catalog::load_movies(&args.movies)
        .with_context(|| format!("Failed to load movies from {}", args.movies.display()))?;
    let prefs: Preferences = read_json(&args.prefs)?;
    let context: Option<Context> = if args.context.exists() {
        Some(read_json(&args.context)?)
    } else {
        None
    };
    let mut profile = load_profile(store)?;

    let recommendation = recommend_with(
        &movies,
        &prefs,
        context.as_ref(),
        &mut profile,
        genres,
        SelectionOptions::new(args.k, args.diversity)?,
        args.seed,
    )?;

    print_recommendation("🎬 Recommandations :", &recommendation, genres);
    Ok(())
}

async fn run_tmdb(
    args: TmdbArgs,
    config: &Config,
    store: Arc<dyn ProfileStore>,
    genres: &GenreResolver,
) -> Result<()> {
    let api_key = config
        .tmdb_api_key
        .clone()
        .ok_or_else(|| AppError::Config("TMDB_API_KEY is not set".to_string()))?;
    let provider = TmdbProvider::new(
        api_key,
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
    );

    let prefs: Preferences = read_json(&args.prefs)?;
    let tags_map = catalog::load_tags_map(&args.tags)
        .with_context(|| format!("Failed to load tags from {}", args.tags.display()))?;
    let mut profile = load_profile(store)?;

    let movies = fetch_catalog(&provider, Some(args.genre), args.pages, &tags_map).await?;

    let recommendation = recommend_with(
        &movies,
        &prefs,
        None,
        &mut profile,
        genres,
        SelectionOptions::new(args.k, args.diversity)?,
        args.seed,
    )?;

    print_recommendation("🎬 Suggestions via TMDB :", &recommendation, genres);
    Ok(())
}

async fn serve(
    movies_path: &Path,
    config: &Config,
    store: Arc<dyn ProfileStore>,
    genres: GenreResolver,
) -> Result<()> {
    let movies = catalog::load_movies(movies_path)
        .with_context(|| format!("Failed to load movies from {}", movies_path.display()))?;
    let profile = load_profile(store)?;
    let app = create_router(AppState::new(movies, genres, profile));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Fetches raw movies from a provider and normalizes them
pub async fn fetch_catalog(
    provider: &dyn CatalogProvider,
    genre_id: Option<u32>,
    pages: u32,
    tags_map: &TagsMap,
) -> AppResult<Vec<Movie>> {
    let raw = provider.discover(genre_id, pages).await?;
    tracing::debug!(provider = provider.name(), raw = raw.len(), "Normalizing catalog");
    Ok(catalog::convert_to_movies(raw, tags_map))
}

/// One recommendation pass, seeded when `seed` is given
pub fn recommend_with(
    movies: &[Movie],
    prefs: &Preferences,
    context: Option<&Context>,
    profile: &mut Profile,
    genres: &GenreResolver,
    options: SelectionOptions,
    seed: Option<u64>,
) -> AppResult<Recommendation> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Recommender::new(genres, options).recommend(movies, prefs, context, Some(profile), &mut rng)
}

/// `- <title> (<genres>) -> score <score>`
pub fn format_pick(pick: &ScoredMovie, genres: &GenreResolver) -> String {
    format!(
        "- {} ({}) -> score {:.2}",
        pick.movie.title,
        genres.resolve(&pick.movie.genres).join(", "),
        pick.score
    )
}

fn print_recommendation(header: &str, recommendation: &Recommendation, genres: &GenreResolver) {
    println!("\n{}", header);
    if recommendation.is_empty() {
        println!("(aucun film ne correspond)");
    }
    for pick in &recommendation.picks {
        println!("{}", format_pick(pick, genres));
    }
}

fn load_profile(store: Arc<dyn ProfileStore>) -> Result<Profile> {
    Profile::load(store).context("Failed to load profile")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
