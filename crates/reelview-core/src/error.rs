use reelview_store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

/// Uniform error surface for every service operation. The `Display`
/// text of each variant is the user-facing message; full boundary
/// detail is logged at mapping time, never silently swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Rating or comment out of bounds; rejected before any write.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The boundary reported permission-denied or unauthenticated.
    #[error("{0}")]
    Permission(String),

    /// The boundary is unavailable or a read timed out; callers may
    /// retry or substitute fallback data where defined.
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Unknown(String),
}

impl ServiceError {
    /// Map a boundary fault onto the service taxonomy. `what` names
    /// the entity for not-found messages ("Review", "User profile").
    pub fn from_store(err: StoreError, what: &str) -> Self {
        match err {
            StoreError::PermissionDenied => ServiceError::Permission(
                "Access denied. Please check your authentication.".to_string(),
            ),
            StoreError::Unauthenticated => {
                ServiceError::Permission("Authentication required. Please log in.".to_string())
            }
            StoreError::Unavailable(detail) => {
                warn!(%detail, "store unavailable");
                ServiceError::Unavailable(
                    "Service temporarily unavailable. Please try again later.".to_string(),
                )
            }
            StoreError::FailedPrecondition(detail) if detail.contains("index") => {
                warn!(%detail, "store query needs a composite index");
                ServiceError::Unavailable(
                    "Database index required. Using fallback data instead.".to_string(),
                )
            }
            StoreError::FailedPrecondition(detail) => {
                error!(%detail, "store failed precondition");
                ServiceError::Unknown(
                    "Operation failed due to system state. Please refresh and try again."
                        .to_string(),
                )
            }
            StoreError::NotFound => ServiceError::NotFound(format!("{} not found", what)),
            StoreError::Other(detail) => {
                error!(%detail, "unclassified store failure");
                ServiceError::Unknown(
                    "An unexpected error occurred. Please try again.".to_string(),
                )
            }
        }
    }

    /// Mapping for a read that lost the race against its timeout.
    pub fn timed_out(what: &str) -> Self {
        warn!(what, "read timed out");
        ServiceError::Unavailable(
            "Service temporarily unavailable. Please try again later.".to_string(),
        )
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_codes_surface_fixed_messages() {
        let e = ServiceError::from_store(StoreError::PermissionDenied, "Review");
        assert_eq!(
            e.to_string(),
            "Access denied. Please check your authentication."
        );
        let e = ServiceError::from_store(StoreError::Unauthenticated, "Review");
        assert_eq!(e.to_string(), "Authentication required. Please log in.");
    }

    #[test]
    fn not_found_names_the_entity() {
        let e = ServiceError::from_store(StoreError::NotFound, "Review");
        assert_eq!(e, ServiceError::NotFound("Review not found".to_string()));
        let e = ServiceError::from_store(StoreError::NotFound, "User profile");
        assert_eq!(
            e,
            ServiceError::NotFound("User profile not found".to_string())
        );
    }

    #[test]
    fn missing_index_maps_to_unavailable_with_fallback_hint() {
        let e = ServiceError::from_store(
            StoreError::FailedPrecondition("query requires a composite index".to_string()),
            "Review",
        );
        assert!(e.is_unavailable());
        assert!(e.to_string().contains("fallback"));
    }

    #[test]
    fn other_failures_become_generic_unknown() {
        let e = ServiceError::from_store(StoreError::Other("wire exploded".to_string()), "Review");
        assert!(matches!(e, ServiceError::Unknown(_)));
        // Internal detail never leaks into the user-facing message
        assert!(!e.to_string().contains("wire exploded"));
    }
}
