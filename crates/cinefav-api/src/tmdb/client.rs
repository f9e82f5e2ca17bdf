//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::types::{Genre, GenreListResponse, Movie, MovieListResponse, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "es-ES";

/// Only the first result page is ever requested.
const FIRST_PAGE: &str = "1";

/// TMDB API client.
///
/// All transport configuration (base URL, bearer credential, `accept`
/// header, language) is fixed at build time and shared by every request.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client carrying the default headers.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Value of the `language` query parameter.
    language: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "es-ES").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or is not a valid header value.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let language = self
            .language
            .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE));

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {api_token}"))
            .context("api_token contains characters not allowed in a header")?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth_value);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            language,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the configured response language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Sends a single GET request and decodes the JSON body.
    ///
    /// Non-success statuses are reported with the TMDB error message when
    /// the body carries one. No retry is attempted.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        tracing::trace!(path, body_len = body.len(), "TMDB API response received");

        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn popular_movies(&self) -> Result<Vec<Movie>> {
        let query = [
            ("language", self.language.clone()),
            ("page", String::from(FIRST_PAGE)),
        ];
        let response: MovieListResponse = self.get_json("movie/popular", &query).await?;
        Ok(response.results)
    }

    #[instrument(skip_all, fields(query = %query))]
    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        let params = [
            ("query", String::from(query)),
            ("include_adult", String::from("false")),
            ("language", self.language.clone()),
            ("page", String::from(FIRST_PAGE)),
        ];
        let response: MovieListResponse = self.get_json("search/movie", &params).await?;
        Ok(response.results)
    }

    #[instrument(skip_all)]
    async fn genres(&self) -> Result<Vec<Genre>> {
        let query = [("language", self.language.clone())];
        let response: GenreListResponse = self.get_json("genre/movie/list", &query).await?;
        Ok(response.genres)
    }
}
