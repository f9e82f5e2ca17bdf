//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{Genre, Movie};

/// TMDB catalog query trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches the first page of globally popular movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the service answers with a
    /// non-success status, or JSON parsing fails.
    async fn popular_movies(&self) -> Result<Vec<Movie>>;

    /// Fetches the first page of movies whose title matches `query`.
    ///
    /// Adult content is excluded. The query is sent as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the service answers with a
    /// non-success status, or JSON parsing fails.
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>>;

    /// Fetches the full list of movie genres.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the service answers with a
    /// non-success status, or JSON parsing fails.
    async fn genres(&self) -> Result<Vec<Genre>>;
}
