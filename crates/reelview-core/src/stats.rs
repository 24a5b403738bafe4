//! Aggregation over review sets: the per-user stats the synchronizer
//! writes back to profiles, and the collection-wide summary.

use reelview_models::{Review, ReviewStats, UserStats};

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Full recompute of a user's aggregate fields from their review set.
/// An empty set yields `(0, 0.0)` rather than NaN.
pub fn user_stats(reviews: &[Review]) -> UserStats {
    let total = reviews.len() as u32;
    let average = if total == 0 {
        0.0
    } else {
        let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        round1(f64::from(sum) / f64::from(total))
    };
    UserStats {
        total_reviews: total,
        average_rating: average,
    }
}

/// Collection-wide summary: count, one-decimal mean, per-star counts.
/// Ratings outside 1-5 never reach the store, so the distribution
/// covers every record.
pub fn review_stats(reviews: &[Review]) -> ReviewStats {
    let mut distribution = [0u32; 5];
    let mut sum: u64 = 0;
    for review in reviews {
        sum += u64::from(review.rating);
        if (1..=5).contains(&review.rating) {
            distribution[usize::from(review.rating) - 1] += 1;
        }
    }
    let total = reviews.len() as u32;
    let average = if total == 0 {
        0.0
    } else {
        round1(sum as f64 / f64::from(total))
    };
    ReviewStats {
        total_reviews: total,
        average_rating: average,
        rating_distribution: distribution,
    }
}
