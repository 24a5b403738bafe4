use thiserror::Error;

/// Error taxonomy surfaced by the document-store boundary.
///
/// The variants mirror the failure codes the hosted store reports;
/// anything the store does not classify arrives as `Other` and is
/// mapped to a generic user-facing message upstream.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the operation due to its own state, most
    /// commonly a missing composite index on a filtered query.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Other(String),
}
