use reelview_models::{MovieDetails, MoviePage, MovieSummary, MovieVideo, TrendingWindow};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

const PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/500x750/cccccc/666666?text=No+Image";

/// Poster rendered in listings and review cards.
pub const POSTER_SMALL: &str = "w185";
/// Poster rendered on detail views.
pub const POSTER_MEDIUM: &str = "w500";
/// Backdrop rendered behind detail views.
pub const BACKDROP_LARGE: &str = "w1280";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog API error: {status}")]
    Status { status: reqwest::StatusCode },
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("malformed catalog response: {0}")]
    Decode(String),
}

/// Read-only client for the movie catalog API, keyed by a provider
/// API key passed in the query string.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    image_base_url: String,
    api_key: String,
}

// Raw catalog wire shapes; trimmed to the fields the app consumes.

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: u32,
    title: String,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: u32,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    page: u32,
    results: Vec<RawMovie>,
    total_pages: u32,
    total_results: u32,
}

#[derive(Debug, Deserialize)]
struct RawTrending {
    results: Vec<RawMovie>,
}

#[derive(Debug, Deserialize)]
struct RawGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawDetails {
    id: u32,
    title: String,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    vote_count: u32,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<RawGenre>,
    tagline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    key: String,
    name: String,
    site: String,
    #[serde(rename = "type")]
    video_type: String,
}

#[derive(Debug, Deserialize)]
struct RawVideos {
    results: Vec<RawVideo>,
}

impl CatalogClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        Self::with_base_urls(api_key, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, timeout)
    }

    pub fn with_base_urls(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        image_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            warn!("catalog API key is empty; catalog requests will be rejected upstream");
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Resolve a catalog image path to a full URL, falling back to a
    /// placeholder when the catalog has no image for the entry.
    pub fn image_url(&self, path: Option<&str>, size: &str) -> String {
        match path {
            Some(p) if !p.is_empty() => format!("{}/{}{}", self.image_base_url, size, p),
            _ => PLACEHOLDER_POSTER.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, CatalogError> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}api_key={}",
            self.base_url, endpoint, separator, self.api_key
        );
        debug!(endpoint, "catalog request");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    fn summary(&self, raw: RawMovie) -> MovieSummary {
        MovieSummary {
            id: raw.id,
            title: raw.title,
            overview: raw.overview,
            poster: self.image_url(raw.poster_path.as_deref(), POSTER_MEDIUM),
            backdrop: self.image_url(raw.backdrop_path.as_deref(), BACKDROP_LARGE),
            release_date: raw.release_date,
            rating: raw.vote_average,
            vote_count: raw.vote_count,
        }
    }

    pub async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError> {
        let raw: RawPage = self
            .get_json(&format!("/movie/popular?page={}", page))
            .await?;
        Ok(MoviePage {
            movies: raw.results.into_iter().map(|m| self.summary(m)).collect(),
            current_page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
        })
    }

    pub async fn trending(&self, window: TrendingWindow) -> Result<Vec<MovieSummary>, CatalogError> {
        let raw: RawTrending = self
            .get_json(&format!("/trending/movie/{}", window.as_str()))
            .await?;
        Ok(raw.results.into_iter().map(|m| self.summary(m)).collect())
    }

    /// Search the catalog. A blank query short-circuits to an empty
    /// page without issuing a request.
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        if query.trim().is_empty() {
            return Ok(MoviePage::empty());
        }
        let raw: RawPage = self
            .get_json(&format!(
                "/search/movie?query={}&page={}",
                urlencoding::encode(query.trim()),
                page
            ))
            .await?;
        Ok(MoviePage {
            movies: raw.results.into_iter().map(|m| self.summary(m)).collect(),
            current_page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
        })
    }

    pub async fn details(&self, movie_id: u32) -> Result<MovieDetails, CatalogError> {
        let raw: RawDetails = self.get_json(&format!("/movie/{}", movie_id)).await?;
        Ok(MovieDetails {
            id: raw.id,
            title: raw.title,
            overview: raw.overview,
            poster: self.image_url(raw.poster_path.as_deref(), POSTER_MEDIUM),
            backdrop: self.image_url(raw.backdrop_path.as_deref(), BACKDROP_LARGE),
            release_date: raw.release_date,
            rating: raw.vote_average,
            vote_count: raw.vote_count,
            runtime: raw.runtime,
            genres: raw.genres.into_iter().map(|g| g.name).collect(),
            tagline: raw.tagline.filter(|t| !t.is_empty()),
        })
    }

    pub async fn videos(&self, movie_id: u32) -> Result<Vec<MovieVideo>, CatalogError> {
        let raw: RawVideos = self
            .get_json(&format!("/movie/{}/videos", movie_id))
            .await?;
        Ok(raw
            .results
            .into_iter()
            .map(|v| MovieVideo {
                key: v.key,
                name: v.name,
                site: v.site,
                video_type: v.video_type,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CatalogClient {
        CatalogClient::new("test-key", Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn image_url_resolves_path_with_size() {
        let c = client();
        assert_eq!(
            c.image_url(Some("/abc.jpg"), POSTER_MEDIUM),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn image_url_falls_back_to_placeholder() {
        let c = client();
        assert_eq!(c.image_url(None, POSTER_SMALL), PLACEHOLDER_POSTER);
        assert_eq!(c.image_url(Some(""), POSTER_SMALL), PLACEHOLDER_POSTER);
    }

    #[tokio::test]
    async fn blank_search_short_circuits() {
        let c = client();
        let page = c.search("   ", 1).await.unwrap();
        assert!(page.movies.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn raw_page_decodes_catalog_shape() {
        let body = r#"{
            "page": 1,
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "overview": "A computer hacker learns the truth.",
                "poster_path": "/matrix.jpg",
                "backdrop_path": null,
                "release_date": "1999-03-31",
                "vote_average": 8.2,
                "vote_count": 24000
            }],
            "total_pages": 10,
            "total_results": 195
        }"#;
        let raw: RawPage = serde_json::from_str(body).unwrap();
        assert_eq!(raw.results.len(), 1);
        assert_eq!(raw.results[0].id, 603);
        assert!(raw.results[0].backdrop_path.is_none());
    }
}
