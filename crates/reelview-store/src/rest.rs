use crate::error::StoreError;
use crate::traits::DocumentStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelview_models::{ProfileRecord, Review, ReviewFilter, ReviewPatch, UserStats};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

/// Document store backed by the hosted review API.
///
/// The API exposes the same collections as the document store
/// (`/api/reviews`, `/api/users`) and performs the helpful-counter
/// increment server-side, so this backend reports atomic increments.
pub struct RestStore {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!(%status, %body, "review API request failed");
        Err(map_status(status, &body))
    }
}

/// Map an HTTP failure status onto the store error taxonomy.
fn map_status(status: StatusCode, body: &str) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED => StoreError::Unauthenticated,
        StatusCode::FORBIDDEN => StoreError::PermissionDenied,
        StatusCode::NOT_FOUND => StoreError::NotFound,
        StatusCode::PRECONDITION_FAILED => StoreError::FailedPrecondition(body.to_string()),
        s if s.is_server_error() => {
            StoreError::Unavailable(format!("review API returned {}", s))
        }
        s => StoreError::Other(format!("review API returned {}: {}", s, body)),
    }
}

fn map_transport(e: reqwest::Error) -> StoreError {
    if e.is_timeout() || e.is_connect() {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Other(e.to_string())
    }
}

#[async_trait]
impl DocumentStore for RestStore {
    fn store_name(&self) -> &str {
        "rest"
    }

    fn supports_atomic_increment(&self) -> bool {
        true
    }

    async fn insert_review(&self, review: &Review) -> Result<String, StoreError> {
        let response = self
            .request(self.client.post(self.url("/api/reviews")))
            .json(review)
            .send()
            .await
            .map_err(map_transport)?;
        let created: CreatedResponse = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Other(format!("malformed create response: {}", e)))?;
        debug!(id = %created.id, "created review via API");
        Ok(created.id)
    }

    async fn get_review(&self, id: &str) -> Result<Review, StoreError> {
        let response = self
            .request(self.client.get(self.url(&format!("/api/reviews/{}", id))))
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Other(format!("malformed review record: {}", e)))
    }

    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(movie_id) = filter.movie_id {
            params.push(("movieId", movie_id.to_string()));
        }
        if let Some(ref user_id) = filter.user_id {
            params.push(("userId", user_id.clone()));
        }
        if let Some(limit) = filter.limit {
            params.push(("limit", limit.to_string()));
        }
        let response = self
            .request(self.client.get(self.url("/api/reviews")).query(&params))
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Other(format!("malformed review listing: {}", e)))
    }

    async fn update_review(
        &self,
        id: &str,
        patch: &ReviewPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut body = serde_json::Map::new();
        if let Some(rating) = patch.rating {
            body.insert("rating".to_string(), json!(rating));
        }
        if let Some(ref comment) = patch.comment {
            body.insert("comment".to_string(), json!(comment));
        }
        body.insert("updatedAt".to_string(), json!(updated_at));
        let response = self
            .request(self.client.put(self.url(&format!("/api/reviews/{}", id))))
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response).await.map(|_| ())
    }

    async fn set_helpful(&self, id: &str, helpful: u32) -> Result<(), StoreError> {
        let response = self
            .request(self.client.put(self.url(&format!("/api/reviews/{}", id))))
            .json(&json!({ "helpful": helpful }))
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response).await.map(|_| ())
    }

    async fn increment_helpful(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .request(
                self.client
                    .post(self.url(&format!("/api/reviews/{}/helpful", id))),
            )
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response).await.map(|_| ())
    }

    async fn delete_review(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .request(
                self.client
                    .delete(self.url(&format!("/api/reviews/{}", id))),
            )
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response).await.map(|_| ())
    }

    async fn get_profile(&self, user_id: &str) -> Result<ProfileRecord, StoreError> {
        let response = self
            .request(self.client.get(self.url(&format!("/api/users/{}", user_id))))
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Other(format!("malformed profile record: {}", e)))
    }

    async fn put_profile(
        &self,
        user_id: &str,
        profile: &ProfileRecord,
    ) -> Result<(), StoreError> {
        let response = self
            .request(self.client.put(self.url(&format!("/api/users/{}", user_id))))
            .json(profile)
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response).await.map(|_| ())
    }

    async fn update_profile_stats(
        &self,
        user_id: &str,
        stats: UserStats,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let body = json!({
            "totalReviews": stats.total_reviews,
            "averageRating": stats.average_rating,
            "updatedAt": updated_at,
        });
        let response = self
            .request(self.client.put(self.url(&format!("/api/users/{}", user_id))))
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;
        self.check(response).await.map(|_| ())
    }
}
