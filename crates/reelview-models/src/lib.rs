pub mod movie;
pub mod profile;
pub mod review;
pub mod validation;

pub use movie::{MovieDetails, MoviePage, MovieSummary, MovieVideo, TrendingWindow};
pub use profile::{ProfileRecord, UserStats};
pub use review::{Review, ReviewDraft, ReviewFilter, ReviewPatch, ReviewStats};
