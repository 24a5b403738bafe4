use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user profile from the `users` collection, one per user.
///
/// `total_reviews` and `average_rating` are maintained by the stats
/// synchronizer as a full recompute over the user's review set; they
/// are only guaranteed current after the last synchronizer run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub average_rating: f64,
    pub join_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    /// Fresh profile written at registration, before any reviews exist.
    pub fn new(username: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            bio: String::new(),
            total_reviews: 0,
            average_rating: 0.0,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// The pair of aggregate fields the synchronizer keeps consistent with
/// the review collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_reviews: u32,
    pub average_rating: f64,
}
