//! Catalog query client library for cinefav.
//!
//! Provides the TMDB API client used to list popular movies,
//! search by title, and fetch the genre list.

/// TMDB API client.
pub mod tmdb;
