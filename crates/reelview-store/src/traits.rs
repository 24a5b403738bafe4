use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelview_models::{ProfileRecord, Review, ReviewFilter, ReviewPatch, UserStats};

/// The document-store boundary: collections `reviews` and `users`,
/// CRUD by id plus equality-filtered queries.
///
/// Timestamps are populated by the service layer before records reach
/// the store; implementations persist them verbatim. Query results
/// carry no ordering guarantee at this boundary; the service applies
/// the newest-first contract.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn store_name(&self) -> &str;

    /// Whether `increment_helpful` is a true server-side atomic
    /// increment. When false, the service falls back to its
    /// read-modify-write counter path.
    fn supports_atomic_increment(&self) -> bool {
        false
    }

    /// Persist a new review. `review.id` is ignored on input; the
    /// store assigns and returns the identifier.
    async fn insert_review(&self, review: &Review) -> Result<String, StoreError>;

    async fn get_review(&self, id: &str) -> Result<Review, StoreError>;

    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError>;

    /// Merge `rating`/`comment` changes into an existing record.
    async fn update_review(
        &self,
        id: &str,
        patch: &ReviewPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Overwrite the helpful counter with an absolute value. Used by
    /// the read-modify-write counter mode; racy under concurrent
    /// callers, which is that mode's documented tradeoff.
    async fn set_helpful(&self, id: &str, helpful: u32) -> Result<(), StoreError>;

    /// Server-side atomic increment of the helpful counter. Only
    /// meaningful when `supports_atomic_increment` is true.
    async fn increment_helpful(&self, id: &str) -> Result<(), StoreError>;

    async fn delete_review(&self, id: &str) -> Result<(), StoreError>;

    async fn get_profile(&self, user_id: &str) -> Result<ProfileRecord, StoreError>;

    /// Create or replace a profile record (registration path).
    async fn put_profile(&self, user_id: &str, profile: &ProfileRecord)
        -> Result<(), StoreError>;

    /// Write the synchronizer's aggregate fields onto the profile.
    async fn update_profile_stats(
        &self,
        user_id: &str,
        stats: UserStats,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
