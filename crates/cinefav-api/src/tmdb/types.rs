//! TMDB API response envelopes and records.

use serde::{Deserialize, Serialize};

// --- Movie lists ---

/// Response envelope from `movie/popular` and `search/movie`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A movie record as returned by list endpoints.
///
/// Only `id` and `title` are required. Every other field falls back to its
/// default so partial records (and previously persisted favorites) decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Release date (YYYY-MM-DD or null).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

// --- Genres ---

/// Response envelope from `genre/movie/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreListResponse {
    /// All movie genres in the requested language.
    pub genres: Vec<Genre>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre display name.
    pub name: String,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_movie_minimal_record_uses_defaults() {
        // Arrange
        let json = r#"{"id":1,"title":"The Matrix"}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.id, 1);
        assert_eq!(movie.title, "The Matrix");
        assert!(movie.genre_ids.is_empty());
        assert!(movie.poster_path.is_none());
        assert!(!movie.adult);
    }

    #[test]
    fn test_movie_requires_id_and_title() {
        // Arrange
        let cases = [
            ("{}", "missing field `id`"),
            (r#"{"id":1}"#, "missing field `title`"),
            (r#"{"title":"The Matrix"}"#, "missing field `id`"),
        ];

        for (json, expected) in cases {
            // Act
            let err = serde_json::from_str::<Movie>(json).unwrap_err();

            // Assert
            assert!(err.to_string().contains(expected), "{json}: {err}");
        }
    }

    #[test]
    fn test_movie_list_rejects_record_without_title() {
        // Arrange
        let json = r#"{"page":1,"results":[{"id":603}],"total_pages":1,"total_results":1}"#;

        // Act
        let result = serde_json::from_str::<MovieListResponse>(json);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_movie_ignores_unknown_fields() {
        // Arrange
        let json = r#"{"id":7,"title":"X","media_type":"movie","origin_country":["US"]}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.id, 7);
    }

    #[test]
    fn test_parse_popular_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_popular.json");

        // Act
        let response: MovieListResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].id, 1_241_982);
        assert_eq!(response.results[0].title, "Vaiana 2");
        assert_eq!(response.results[0].genre_ids, vec![16, 12, 10751, 35]);
    }

    #[test]
    fn test_parse_genre_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/genre_movie_list.json");

        // Act
        let response: GenreListResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.genres.len(), 6);
        assert_eq!(
            response.genres[0],
            Genre {
                id: 28,
                name: String::from("Acción"),
            }
        );
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(!error.success);
        assert!(error.status_message.contains("Invalid API key"));
    }
}
