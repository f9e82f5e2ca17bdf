//! cinefav - movie catalog and favorites CLI.

/// Application configuration (TOML).
mod config;
/// Catalog/favorites merging helpers.
mod favorites;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::favorites::{
    add_favorite, favorite_ids, find_movie, format_movie_row, remove_favorite,
};
use cinefav_api::tmdb::{LocalTmdbApi, Movie, TmdbClient};
use cinefav_store::{FavoritesStore, SqliteStorage};

/// Reported when `favorites add`/`remove` left the stored list untouched.
const UNREADABLE_FAVORITES: &str = "stored favorites could not be read; nothing was changed";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List popular movies.
    Popular,
    /// Search movies by title.
    Search(SearchArgs),
    /// List movie genres.
    Genres,
    /// Manage the local favorites list.
    Favorites(FavoritesCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title query (e.g. "Matrix").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List saved favorites.
    List,
    /// Add a movie to favorites.
    Add(FavoritesAddArgs),
    /// Remove a movie from favorites.
    Remove(FavoritesRemoveArgs),
}

/// Arguments for the `favorites add` subcommand.
#[derive(clap::Args)]
struct FavoritesAddArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Title query used to find the movie. Popular movies are used if omitted.
    #[arg(long)]
    query: Option<String>,
}

/// Arguments for the `favorites remove` subcommand.
#[derive(clap::Args)]
struct FavoritesRemoveArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Builds a `TmdbClient` from config and the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the config is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(dir: Option<&PathBuf>) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let mut builder = TmdbClient::builder().api_token(api_token).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(url) = config.tmdb.parsed_base_url()? {
        builder = builder.base_url(url);
    }
    if let Some(language) = config.tmdb.language {
        builder = builder.language(language);
    }

    builder.build().context("failed to build TMDB client")
}

/// Opens the favorites store in the data directory.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
fn open_favorites(dir: Option<&PathBuf>) -> Result<FavoritesStore<SqliteStorage>> {
    let storage = SqliteStorage::open(dir).context("failed to open favorites storage")?;
    Ok(FavoritesStore::new(storage))
}

/// Loads favorites for marking listings. An unavailable store counts as empty.
fn stored_favorites(dir: Option<&PathBuf>) -> Vec<Movie> {
    match open_favorites(dir) {
        Ok(store) => store.load_favorites(),
        Err(err) => {
            tracing::warn!(error = ?err, "favorites unavailable; listing without marks");
            Vec::new()
        }
    }
}

/// Logs a movie listing, marking entries that are favorites.
fn log_movies(movies: &[Movie], favorites: &[Movie]) {
    let ids = favorite_ids(favorites);
    tracing::info!("Results: {}", movies.len());
    tracing::info!("  {:>8}  ReleaseDate  Title  Vote", "ID");
    for movie in movies {
        tracing::info!("{}", format_movie_row(movie, ids.contains(&movie.id)));
    }
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_popular(dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;

    let movies = client
        .popular_movies()
        .await
        .context("TMDB movie/popular request failed")?;

    log_movies(&movies, &stored_favorites(dir));

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;

    let movies = client
        .search_movies(&args.query)
        .await
        .context("TMDB search/movie request failed")?;

    log_movies(&movies, &stored_favorites(dir));

    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(dir)?;

    let genres = client
        .genres()
        .await
        .context("TMDB genre/movie/list request failed")?;

    tracing::info!("Genres ({}):", genres.len());
    for genre in &genres {
        tracing::info!("  {:>6}  {}", genre.id, genre.name);
    }

    Ok(())
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites storage cannot be opened.
#[instrument(skip_all)]
fn run_favorites_list(dir: Option<&PathBuf>) -> Result<()> {
    let store = open_favorites(dir)?;
    let favorites: Vec<Movie> = store.load_favorites();

    if favorites.is_empty() {
        tracing::info!("No favorites saved. Run `favorites add --id <ID>` to add one.");
        return Ok(());
    }

    tracing::info!("Favorites ({}):", favorites.len());
    for movie in &favorites {
        tracing::info!("{}", format_movie_row(movie, true));
    }

    Ok(())
}

/// Runs the `favorites add` subcommand.
///
/// # Errors
///
/// Returns an error if the storage cannot be opened or read, the catalog
/// request fails, or no movie with the given ID is found.
#[instrument(skip_all)]
async fn run_favorites_add(args: &FavoritesAddArgs, dir: Option<&PathBuf>) -> Result<()> {
    let store = open_favorites(dir)?;
    let client = build_tmdb_client(dir)?;

    let movie = find_movie(&client, args.id, args.query.as_deref())
        .await?
        .with_context(|| format!("movie {} not found in catalog results", args.id))?;
    let title = movie.title.clone();

    let mut added = false;
    store
        .update(|favorites: &mut Vec<Movie>| {
            added = add_favorite(favorites, movie);
        })
        .context(UNREADABLE_FAVORITES)?;

    if added {
        tracing::info!("Added {} ({}) to favorites.", title, args.id);
    } else {
        tracing::info!("{} ({}) is already a favorite.", title, args.id);
    }

    Ok(())
}

/// Runs the `favorites remove` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites storage cannot be opened or read.
#[instrument(skip_all)]
fn run_favorites_remove(args: &FavoritesRemoveArgs, dir: Option<&PathBuf>) -> Result<()> {
    let store = open_favorites(dir)?;

    let mut removed = 0;
    store
        .update(|favorites: &mut Vec<Movie>| {
            removed = remove_favorite(favorites, args.id);
        })
        .context(UNREADABLE_FAVORITES)?;

    if removed == 0 {
        tracing::info!("Movie {} is not a favorite.", args.id);
    } else {
        tracing::info!("Removed movie {} from favorites.", args.id);
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Popular => run_popular(dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Genres => run_genres(dir).await,
        Commands::Favorites(fav) => match fav.command {
            FavoritesSubcommands::List => run_favorites_list(dir),
            FavoritesSubcommands::Add(args) => run_favorites_add(&args, dir).await,
            FavoritesSubcommands::Remove(args) => run_favorites_remove(&args, dir),
        },
    }
}
