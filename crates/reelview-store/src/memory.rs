use crate::error::StoreError;
use crate::traits::DocumentStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelview_models::{ProfileRecord, Review, ReviewFilter, ReviewPatch, UserStats};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// In-process document store backed by maps. Used by the test suite
/// and as the offline backend when no hosted store is configured.
///
/// Ids are assigned sequentially, so sorting by id reproduces
/// insertion order.
#[derive(Default)]
pub struct MemoryStore {
    reviews: RwLock<HashMap<String, Review>>,
    profiles: RwLock<HashMap<String, ProfileRecord>>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the hosted store's network being disabled; every
    /// operation fails with `Unavailable` until re-enabled.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("network disabled".to_string()));
        }
        Ok(())
    }

    fn assign_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("rev{:06}", n)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    fn supports_atomic_increment(&self) -> bool {
        // Writes go through a single RwLock, so the increment is atomic
        // from the caller's point of view.
        true
    }

    async fn insert_review(&self, review: &Review) -> Result<String, StoreError> {
        self.check_online()?;
        let id = self.assign_id();
        let mut stored = review.clone();
        stored.id = id.clone();
        self.reviews.write().await.insert(id.clone(), stored);
        debug!(id = %id, "inserted review");
        Ok(id)
    }

    async fn get_review(&self, id: &str) -> Result<Review, StoreError> {
        self.check_online()?;
        self.reviews
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        self.check_online()?;
        let reviews = self.reviews.read().await;
        let mut matched: Vec<Review> = reviews
            .values()
            .filter(|r| filter.movie_id.map_or(true, |m| r.movie_id == m))
            .filter(|r| {
                filter
                    .user_id
                    .as_deref()
                    .map_or(true, |u| r.user_id == u)
            })
            .cloned()
            .collect();
        // Deterministic base order (insertion order via sequential ids)
        matched.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn update_review(
        &self,
        id: &str,
        patch: &ReviewPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut reviews = self.reviews.write().await;
        let review = reviews.get_mut(id).ok_or(StoreError::NotFound)?;
        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(ref comment) = patch.comment {
            review.comment = comment.clone();
        }
        review.updated_at = Some(updated_at);
        Ok(())
    }

    async fn set_helpful(&self, id: &str, helpful: u32) -> Result<(), StoreError> {
        self.check_online()?;
        let mut reviews = self.reviews.write().await;
        let review = reviews.get_mut(id).ok_or(StoreError::NotFound)?;
        review.helpful = helpful;
        Ok(())
    }

    async fn increment_helpful(&self, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        let mut reviews = self.reviews.write().await;
        let review = reviews.get_mut(id).ok_or(StoreError::NotFound)?;
        review.helpful += 1;
        Ok(())
    }

    async fn delete_review(&self, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.reviews
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn get_profile(&self, user_id: &str) -> Result<ProfileRecord, StoreError> {
        self.check_online()?;
        self.profiles
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn put_profile(
        &self,
        user_id: &str,
        profile: &ProfileRecord,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn update_profile_stats(
        &self,
        user_id: &str,
        stats: UserStats,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        let mut profiles = self.profiles.write().await;
        let profile = profiles.get_mut(user_id).ok_or(StoreError::NotFound)?;
        profile.total_reviews = stats.total_reviews;
        profile.average_rating = stats.average_rating;
        profile.updated_at = Some(updated_at);
        Ok(())
    }
}
