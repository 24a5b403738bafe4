use serde::{Deserialize, Serialize};

/// A catalog entry as returned by the popular/trending/search listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: u32,
    pub title: String,
    pub overview: String,
    pub poster: String,
    pub backdrop: String,
    pub release_date: Option<String>,
    /// Catalog community score (0-10 scale), distinct from review stars.
    pub rating: f64,
    pub vote_count: u32,
}

/// Full catalog entry from the details endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub id: u32,
    pub title: String,
    pub overview: String,
    pub poster: String,
    pub backdrop: String,
    pub release_date: Option<String>,
    pub rating: f64,
    pub vote_count: u32,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub tagline: Option<String>,
}

/// One page of catalog results with the provider's paging counters
/// passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<MovieSummary>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

impl MoviePage {
    pub fn empty() -> Self {
        Self {
            movies: Vec::new(),
            current_page: 1,
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// A trailer/clip attached to a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieVideo {
    pub key: String,
    pub name: String,
    pub site: String,
    pub video_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingWindow {
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}
