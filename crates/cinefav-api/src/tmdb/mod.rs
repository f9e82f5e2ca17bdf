//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints
//! and retrieves popular movies, title searches, and the genre list.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_LANGUAGE, TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{Genre, GenreListResponse, Movie, MovieListResponse, TmdbErrorResponse};
