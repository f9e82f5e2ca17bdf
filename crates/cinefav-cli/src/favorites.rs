//! Joins catalog results with the stored favorites.

use std::collections::HashSet;

use anyhow::{Context, Result};
use cinefav_api::tmdb::{LocalTmdbApi, Movie};

/// Returns the IDs of all stored favorites.
pub fn favorite_ids(favorites: &[Movie]) -> HashSet<u64> {
    favorites.iter().map(|movie| movie.id).collect()
}

/// Appends `movie` unless a favorite with the same ID exists.
///
/// Returns `true` if the list changed.
pub fn add_favorite(favorites: &mut Vec<Movie>, movie: Movie) -> bool {
    if favorites.iter().any(|m| m.id == movie.id) {
        return false;
    }
    favorites.push(movie);
    true
}

/// Removes every favorite with the given ID. Returns how many were removed.
pub fn remove_favorite(favorites: &mut Vec<Movie>, id: u64) -> usize {
    let before = favorites.len();
    favorites.retain(|m| m.id != id);
    before.saturating_sub(favorites.len())
}

/// Looks up a movie by ID among the search results for `query`, or among
/// popular movies when no query is given.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn find_movie(
    api: &(impl LocalTmdbApi + Sync),
    id: u64,
    query: Option<&str>,
) -> Result<Option<Movie>> {
    let candidates = match query {
        Some(q) => api
            .search_movies(q)
            .await
            .context("TMDB search/movie request failed")?,
        None => api
            .popular_movies()
            .await
            .context("TMDB movie/popular request failed")?,
    };
    Ok(candidates.into_iter().find(|movie| movie.id == id))
}

/// Formats one listing row; favorites are marked with `*`.
pub fn format_movie_row(movie: &Movie, is_favorite: bool) -> String {
    let mark = if is_favorite { '*' } else { ' ' };
    format!(
        "{mark} {:>8}  {}  {}  {:.1}",
        movie.id,
        movie.release_date.as_deref().unwrap_or("-"),
        movie.title,
        movie.vote_average,
    )
}
