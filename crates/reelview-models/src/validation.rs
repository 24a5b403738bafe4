//! Static validation bounds consulted at record-creation time.
//!
//! Every rejection message in the service layer names exactly these
//! constants so the error taxonomy stays exhaustive.

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Review comment length bounds, measured in characters.
pub const MIN_REVIEW_LENGTH: usize = 10;
pub const MAX_REVIEW_LENGTH: usize = 1000;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Default number of records a review listing fetches.
pub const REVIEWS_PER_PAGE: usize = 20;
