use crate::error::ServiceError;
use crate::stats;
use chrono::{DateTime, Utc};
use reelview_config::CounterMode;
use reelview_models::validation::{
    MAX_RATING, MAX_REVIEW_LENGTH, MIN_PASSWORD_LENGTH, MIN_RATING, MIN_REVIEW_LENGTH,
    MIN_USERNAME_LENGTH,
};
use reelview_models::{
    ProfileRecord, Review, ReviewDraft, ReviewFilter, ReviewPatch, ReviewStats, UserStats,
};
use reelview_store::{DocumentStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub counter_mode: CounterMode,
    /// Budget for filtered collection reads.
    pub query_timeout: Duration,
    /// Budget for single-record reads.
    pub simple_query_timeout: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            counter_mode: CounterMode::Atomic,
            query_timeout: Duration::from_millis(8000),
            simple_query_timeout: Duration::from_millis(5000),
        }
    }
}

/// The review pipeline over a document-store boundary: validated
/// creation, filtered listing with the newest-first contract, owner
/// checked deletion, helpful votes, and the user-stats synchronizer.
///
/// Every mutating operation that changes a user's review set awaits
/// the synchronizer before returning, so a caller that reads the
/// profile immediately afterwards observes current aggregates.
pub struct ReviewService {
    store: Arc<dyn DocumentStore>,
    options: ServiceOptions,
}

fn validate_rating(rating: u8) -> Result<(), ServiceError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ServiceError::Validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

fn validate_comment(comment: &str) -> Result<(), ServiceError> {
    let length = comment.chars().count();
    if length < MIN_REVIEW_LENGTH {
        return Err(ServiceError::Validation(format!(
            "Review must be at least {} characters",
            MIN_REVIEW_LENGTH
        )));
    }
    if length > MAX_REVIEW_LENGTH {
        return Err(ServiceError::Validation(format!(
            "Review must be no more than {} characters",
            MAX_REVIEW_LENGTH
        )));
    }
    Ok(())
}

fn created_at_key(review: &Review) -> DateTime<Utc> {
    review.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl ReviewService {
    pub fn new(store: Arc<dyn DocumentStore>, options: ServiceOptions) -> Self {
        Self { store, options }
    }

    /// Validate and persist a new review, then bring the author's
    /// profile stats up to date. Returns the store-assigned id.
    pub async fn create_review(&self, draft: ReviewDraft) -> Result<String, ServiceError> {
        validate_rating(draft.rating)?;
        validate_comment(&draft.comment)?;

        let now = Utc::now();
        let record = Review {
            id: String::new(),
            movie_id: draft.movie_id,
            movie_title: draft.movie_title,
            movie_poster: draft.movie_poster,
            user_id: draft.user_id.clone(),
            user_name: draft.user_name,
            rating: draft.rating,
            comment: draft.comment,
            helpful: 0,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let id = self
            .store
            .insert_review(&record)
            .await
            .map_err(|e| ServiceError::from_store(e, "Review"))?;

        self.sync_user_stats(&draft.user_id).await?;
        info!(id = %id, user_id = %draft.user_id, movie_id = record.movie_id, "review created");
        Ok(id)
    }

    /// List reviews matching the filter, newest first. Records without
    /// a creation timestamp sort as oldest. Callers such as the recent
    /// reviews widget depend on this ordering.
    pub async fn list_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, ServiceError> {
        let mut reviews = timeout(self.options.query_timeout, self.store.query_reviews(filter))
            .await
            .map_err(|_| ServiceError::timed_out("review listing"))?
            .map_err(|e| ServiceError::from_store(e, "Review"))?;
        reviews.sort_by(|a, b| created_at_key(b).cmp(&created_at_key(a)));
        Ok(reviews)
    }

    pub async fn get_review(&self, id: &str) -> Result<Review, ServiceError> {
        timeout(self.options.simple_query_timeout, self.store.get_review(id))
            .await
            .map_err(|_| ServiceError::timed_out("review read"))?
            .map_err(|e| ServiceError::from_store(e, "Review"))
    }

    /// Merge rating/comment changes into an existing review. Changed
    /// fields are re-validated against the same bounds as creation,
    /// and a rating change re-runs the stats synchronizer.
    pub async fn update_review(&self, id: &str, patch: &ReviewPatch) -> Result<(), ServiceError> {
        if patch.is_empty() {
            debug!(id, "empty patch; nothing to update");
            return Ok(());
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        if let Some(ref comment) = patch.comment {
            validate_comment(comment)?;
        }

        let existing = self.get_review(id).await?;
        self.store
            .update_review(id, patch, Utc::now())
            .await
            .map_err(|e| ServiceError::from_store(e, "Review"))?;

        if patch.rating.is_some_and(|r| r != existing.rating) {
            self.sync_user_stats(&existing.user_id).await?;
        }
        debug!(id, "review updated");
        Ok(())
    }

    /// Delete a review on behalf of `user_id`. Ownership is enforced
    /// here, not just at the UI layer: deleting someone else's review
    /// is a permission error and nothing is removed.
    pub async fn delete_review(&self, id: &str, user_id: &str) -> Result<(), ServiceError> {
        let review = self.get_review(id).await?;
        if review.user_id != user_id {
            warn!(id, user_id, owner = %review.user_id, "rejected foreign delete");
            return Err(ServiceError::Permission(
                "You can only delete your own reviews.".to_string(),
            ));
        }
        self.store
            .delete_review(id)
            .await
            .map_err(|e| ServiceError::from_store(e, "Review"))?;
        self.sync_user_stats(user_id).await?;
        info!(id, user_id, "review deleted");
        Ok(())
    }

    /// Increment a review's helpful counter by one.
    ///
    /// In `Atomic` mode the store performs the increment server-side.
    /// `ReadModifyWrite` reads the current value and writes value+1;
    /// two concurrent voters can lose an increment, which is the
    /// documented tradeoff for stores without an increment primitive.
    pub async fn mark_helpful(&self, id: &str) -> Result<(), ServiceError> {
        let atomic = match self.options.counter_mode {
            CounterMode::Atomic if self.store.supports_atomic_increment() => true,
            CounterMode::Atomic => {
                warn!(
                    store = self.store.store_name(),
                    "store lacks atomic increments, using read-modify-write"
                );
                false
            }
            CounterMode::ReadModifyWrite => false,
        };

        if atomic {
            self.store
                .increment_helpful(id)
                .await
                .map_err(|e| ServiceError::from_store(e, "Review"))
        } else {
            let current = self.get_review(id).await?;
            self.store
                .set_helpful(id, current.helpful + 1)
                .await
                .map_err(|e| ServiceError::from_store(e, "Review"))
        }
    }

    /// Recompute a user's aggregate stats from their full review set
    /// and persist them to the profile. Idempotent: with no
    /// intervening review changes, repeated runs write identical
    /// values. A user without a profile record gets the computed
    /// stats back but nothing is persisted.
    pub async fn sync_user_stats(&self, user_id: &str) -> Result<UserStats, ServiceError> {
        let reviews = self
            .store
            .query_reviews(&ReviewFilter::for_user(user_id))
            .await
            .map_err(|e| ServiceError::from_store(e, "Review"))?;
        let computed = stats::user_stats(&reviews);

        match self
            .store
            .update_profile_stats(user_id, computed, Utc::now())
            .await
        {
            Ok(()) => {
                debug!(
                    user_id,
                    total = computed.total_reviews,
                    average = computed.average_rating,
                    "profile stats synchronized"
                );
            }
            Err(StoreError::NotFound) => {
                warn!(user_id, "no profile record; stats not persisted");
            }
            Err(e) => return Err(ServiceError::from_store(e, "User profile")),
        }
        Ok(computed)
    }

    /// Aggregate over the entire review collection.
    pub async fn review_stats(&self) -> Result<ReviewStats, ServiceError> {
        let reviews = timeout(
            self.options.query_timeout,
            self.store.query_reviews(&ReviewFilter::default()),
        )
        .await
        .map_err(|_| ServiceError::timed_out("review stats"))?
        .map_err(|e| ServiceError::from_store(e, "Review"))?;
        Ok(stats::review_stats(&reviews))
    }

    /// Create the profile record written at registration. The password
    /// never reaches this layer; only its length is checked against
    /// the registration bound.
    pub async fn register_profile(
        &self,
        user_id: &str,
        username: &str,
        email: &str,
        password_length: usize,
    ) -> Result<ProfileRecord, ServiceError> {
        if username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Username must be at least {} characters",
                MIN_USERNAME_LENGTH
            )));
        }
        if password_length < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        let profile = ProfileRecord::new(username, email, Utc::now());
        self.store
            .put_profile(user_id, &profile)
            .await
            .map_err(|e| ServiceError::from_store(e, "User profile"))?;
        info!(user_id, username, "profile registered");
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<ProfileRecord, ServiceError> {
        timeout(
            self.options.simple_query_timeout,
            self.store.get_profile(user_id),
        )
        .await
        .map_err(|_| ServiceError::timed_out("profile read"))?
        .map_err(|e| ServiceError::from_store(e, "User profile"))
    }

    /// Merge display-field changes into the profile and refresh its
    /// `updated_at`. Aggregate fields stay under synchronizer control.
    pub async fn update_profile(
        &self,
        user_id: &str,
        username: Option<String>,
        bio: Option<String>,
    ) -> Result<ProfileRecord, ServiceError> {
        let mut profile = self.get_profile(user_id).await?;
        if let Some(username) = username {
            if username.chars().count() < MIN_USERNAME_LENGTH {
                return Err(ServiceError::Validation(format!(
                    "Username must be at least {} characters",
                    MIN_USERNAME_LENGTH
                )));
            }
            profile.username = username;
        }
        if let Some(bio) = bio {
            profile.bio = bio;
        }
        profile.updated_at = Some(Utc::now());
        self.store
            .put_profile(user_id, &profile)
            .await
            .map_err(|e| ServiceError::from_store(e, "User profile"))?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reelview_store::MemoryStore;

    fn service_with(store: Arc<MemoryStore>, counter_mode: CounterMode) -> ReviewService {
        ReviewService::new(
            store,
            ServiceOptions {
                counter_mode,
                ..ServiceOptions::default()
            },
        )
    }

    fn setup() -> (Arc<MemoryStore>, ReviewService) {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(store.clone(), CounterMode::Atomic);
        (store, service)
    }

    fn draft(user_id: &str, movie_id: u32, rating: u8) -> ReviewDraft {
        ReviewDraft {
            movie_id,
            movie_title: "The Conversation".to_string(),
            movie_poster: "https://image.example/w185/conversation.jpg".to_string(),
            user_id: user_id.to_string(),
            user_name: "harry".to_string(),
            rating,
            comment: "Best surveillance thriller ever made.".to_string(),
        }
    }

    async fn register(service: &ReviewService, user_id: &str) {
        service
            .register_profile(user_id, "harry", "harry@example.com", 8)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_accepts_ratings_on_the_bounds() {
        let (_, service) = setup();
        assert!(service.create_review(draft("u1", 1, 1)).await.is_ok());
        assert!(service.create_review(draft("u1", 2, 5)).await.is_ok());
    }

    #[tokio::test]
    async fn create_rejects_ratings_outside_the_bounds() {
        let (store, service) = setup();
        for rating in [0u8, 6] {
            let err = service.create_review(draft("u1", 1, rating)).await.unwrap_err();
            assert_eq!(
                err,
                ServiceError::Validation("Rating must be between 1 and 5".to_string())
            );
        }
        // Nothing was persisted
        let all = store.query_reviews(&ReviewFilter::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn create_enforces_comment_length_bounds() {
        let (_, service) = setup();
        for (len, ok) in [(9usize, false), (10, true), (1000, true), (1001, false)] {
            let mut d = draft("u1", 1, 4);
            d.comment = "x".repeat(len);
            let result = service.create_review(d).await;
            assert_eq!(result.is_ok(), ok, "comment length {}", len);
        }

        let mut d = draft("u1", 1, 4);
        d.comment = "too short".to_string(); // 9 chars
        let err = service.create_review(d).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation("Review must be at least 10 characters".to_string())
        );
    }

    #[tokio::test]
    async fn create_stamps_defaults() {
        let (store, service) = setup();
        let id = service.create_review(draft("u1", 7, 4)).await.unwrap();
        let review = store.get_review(&id).await.unwrap();
        assert_eq!(review.helpful, 0);
        assert!(review.created_at.is_some());
        assert_eq!(review.created_at, review.updated_at);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let (store, service) = setup();
        for secs in [1u32, 2, 3] {
            let mut record = Review {
                id: String::new(),
                movie_id: 1,
                movie_title: "M".to_string(),
                movie_poster: String::new(),
                user_id: "u1".to_string(),
                user_name: "harry".to_string(),
                rating: 4,
                comment: "a perfectly fine film".to_string(),
                helpful: 0,
                created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, secs).unwrap()),
                updated_at: None,
            };
            record.comment.push_str(&secs.to_string());
            store.insert_review(&record).await.unwrap();
        }
        let listed = service.list_reviews(&ReviewFilter::default()).await.unwrap();
        let seconds: Vec<u32> = listed
            .iter()
            .map(|r| r.created_at.unwrap().timestamp() as u32 % 60)
            .collect();
        assert_eq!(seconds, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn undated_reviews_sort_as_oldest() {
        let (store, service) = setup();
        let undated = Review {
            id: String::new(),
            movie_id: 1,
            movie_title: "Old".to_string(),
            movie_poster: String::new(),
            user_id: "u1".to_string(),
            user_name: "harry".to_string(),
            rating: 3,
            comment: "imported from the old site".to_string(),
            helpful: 0,
            created_at: None,
            updated_at: None,
        };
        store.insert_review(&undated).await.unwrap();
        service.create_review(draft("u1", 2, 4)).await.unwrap();

        let listed = service.list_reviews(&ReviewFilter::default()).await.unwrap();
        assert_eq!(listed.last().unwrap().movie_title, "Old");
    }

    #[tokio::test]
    async fn get_review_maps_not_found() {
        let (_, service) = setup();
        let err = service.get_review("rev000042").await.unwrap_err();
        assert_eq!(err, ServiceError::NotFound("Review not found".to_string()));
    }

    #[tokio::test]
    async fn sync_computes_count_and_rounded_mean() {
        let (_, service) = setup();
        register(&service, "u1").await;
        for (movie, rating) in [(1u32, 5u8), (2, 4), (3, 3)] {
            service.create_review(draft("u1", movie, rating)).await.unwrap();
        }
        let stats = service.sync_user_stats("u1").await.unwrap();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_rating, 4.0);

        let profile = service.get_profile("u1").await.unwrap();
        assert_eq!(profile.total_reviews, 3);
        assert_eq!(profile.average_rating, 4.0);
    }

    #[tokio::test]
    async fn sync_with_no_reviews_yields_zeroes() {
        let (_, service) = setup();
        register(&service, "u1").await;
        let stats = service.sync_user_stats("u1").await.unwrap();
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
    }

    #[tokio::test]
    async fn sync_is_idempotent() {
        let (_, service) = setup();
        register(&service, "u1").await;
        service.create_review(draft("u1", 1, 5)).await.unwrap();
        service.create_review(draft("u1", 2, 4)).await.unwrap();

        let first = service.sync_user_stats("u1").await.unwrap();
        let second = service.sync_user_stats("u1").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn delete_syncs_stats() {
        let (_, service) = setup();
        register(&service, "u1").await;
        let keep = service.create_review(draft("u1", 1, 5)).await.unwrap();
        let gone = service.create_review(draft("u1", 2, 3)).await.unwrap();

        service.delete_review(&gone, "u1").await.unwrap();

        let profile = service.get_profile("u1").await.unwrap();
        assert_eq!(profile.total_reviews, 1);
        assert_eq!(profile.average_rating, 5.0);

        assert!(service.get_review(&keep).await.is_ok());
        assert!(matches!(
            service.get_review(&gone).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_rejects_non_owner() {
        let (store, service) = setup();
        register(&service, "u1").await;
        let id = service.create_review(draft("u1", 1, 4)).await.unwrap();

        let err = service.delete_review(&id, "u2").await.unwrap_err();
        assert!(matches!(err, ServiceError::Permission(_)));
        // The review survives the rejected attempt
        assert!(store.get_review(&id).await.is_ok());
    }

    #[tokio::test]
    async fn update_revalidates_changed_fields() {
        let (_, service) = setup();
        let id = service.create_review(draft("u1", 1, 4)).await.unwrap();

        let err = service
            .update_review(
                &id,
                &ReviewPatch {
                    rating: Some(6),
                    comment: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = service
            .update_review(
                &id,
                &ReviewPatch {
                    rating: None,
                    comment: Some("short".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_patch_is_a_noop() {
        let (store, service) = setup();
        let id = service.create_review(draft("u1", 1, 4)).await.unwrap();
        let before = store.get_review(&id).await.unwrap();

        service.update_review(&id, &ReviewPatch::default()).await.unwrap();

        let after = store.get_review(&id).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn rating_change_reruns_the_synchronizer() {
        let (_, service) = setup();
        register(&service, "u1").await;
        let id = service.create_review(draft("u1", 1, 5)).await.unwrap();

        service
            .update_review(
                &id,
                &ReviewPatch {
                    rating: Some(3),
                    comment: None,
                },
            )
            .await
            .unwrap();

        let profile = service.get_profile("u1").await.unwrap();
        assert_eq!(profile.average_rating, 3.0);

        let review = service.get_review(&id).await.unwrap();
        assert_eq!(review.rating, 3);
        assert!(review.updated_at > review.created_at);
    }

    #[tokio::test]
    async fn mark_helpful_increments_in_both_modes() {
        for mode in [CounterMode::Atomic, CounterMode::ReadModifyWrite] {
            let store = Arc::new(MemoryStore::new());
            let service = service_with(store.clone(), mode);
            let id = service.create_review(draft("u1", 1, 4)).await.unwrap();

            service.mark_helpful(&id).await.unwrap();
            service.mark_helpful(&id).await.unwrap();

            let review = store.get_review(&id).await.unwrap();
            assert_eq!(review.helpful, 2, "mode {:?}", mode);
        }
    }

    #[tokio::test]
    async fn review_stats_aggregates_whole_collection() {
        let (_, service) = setup();
        for (user, movie, rating) in [("u1", 1u32, 5u8), ("u2", 1, 5), ("u3", 2, 2)] {
            service.create_review(draft(user, movie, rating)).await.unwrap();
        }
        let stats = service.review_stats().await.unwrap();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_rating, 4.0);
        assert_eq!(stats.rating_distribution, [0, 1, 0, 0, 2]);
    }

    #[tokio::test]
    async fn unavailable_store_surfaces_retryable_error() {
        let (store, service) = setup();
        store.set_offline(true);

        let err = service
            .list_reviews(&ReviewFilter::default())
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("try again later"));

        let err = service.create_review(draft("u1", 1, 4)).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn registration_validates_username_and_password_bounds() {
        let (_, service) = setup();
        let err = service
            .register_profile("u1", "ab", "a@example.com", 8)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation("Username must be at least 3 characters".to_string())
        );

        let err = service
            .register_profile("u1", "abe", "a@example.com", 5)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation("Password must be at least 6 characters".to_string())
        );

        let profile = service
            .register_profile("u1", "abe", "a@example.com", 6)
            .await
            .unwrap();
        assert_eq!(profile.total_reviews, 0);
        assert_eq!(profile.average_rating, 0.0);
    }

    #[tokio::test]
    async fn update_profile_merges_display_fields() {
        let (_, service) = setup();
        register(&service, "u1").await;
        let updated = service
            .update_profile("u1", None, Some("I watch everything.".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.bio, "I watch everything.");
        assert_eq!(updated.username, "harry");
    }
}
