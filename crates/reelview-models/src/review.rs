use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted review record from the `reviews` collection.
///
/// `movie_title` and `movie_poster` are denormalized snapshots of the
/// catalog entry at the time the review was written; they are not kept
/// in sync with upstream catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub movie_id: u32,
    pub movie_title: String,
    pub movie_poster: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub helpful: u32,
    // Legacy records can lack timestamps; they sort as oldest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input to review creation. The store assigns the id; the service
/// stamps `helpful`, `created_at`, and `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub movie_id: u32,
    pub movie_title: String,
    pub movie_poster: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
}

/// Partial update for an existing review. Only `rating` and `comment`
/// are mutable; identity and snapshot fields are immutable after
/// creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewPatch {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none()
    }
}

/// Equality filters for listing reviews. Absence of all fields returns
/// the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub movie_id: Option<u32>,
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

impl ReviewFilter {
    pub fn for_movie(movie_id: u32) -> Self {
        Self {
            movie_id: Some(movie_id),
            ..Self::default()
        }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }
}

/// Aggregate over the whole review collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: u32,
    /// Mean rating rounded to one decimal place, 0.0 when empty.
    pub average_rating: f64,
    /// Count of reviews per star, index 0 = one star.
    pub rating_distribution: [u32; 5],
}
