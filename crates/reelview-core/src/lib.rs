pub mod error;
pub mod query;
pub mod sanitize;
pub mod service;
pub mod stats;

pub use error::ServiceError;
pub use query::{RatingFilter, ReviewQuery, SortOrder};
pub use sanitize::sanitize_text;
pub use service::{ReviewService, ServiceOptions};
