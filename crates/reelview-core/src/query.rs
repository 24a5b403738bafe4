//! Pure search/filter/sort pipeline over an in-memory review set.
//!
//! No I/O and no hidden state: the same inputs always produce the
//! same ordered output, and the input slice is never mutated.

use chrono::{DateTime, Utc};
use reelview_models::Review;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingFilter {
    #[default]
    All,
    Exactly(u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
    Helpful,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(SortOrder::Newest),
            "oldest" => Some(SortOrder::Oldest),
            "highest" => Some(SortOrder::Highest),
            "lowest" => Some(SortOrder::Lowest),
            "helpful" => Some(SortOrder::Helpful),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Highest => "highest",
            SortOrder::Lowest => "lowest",
            SortOrder::Helpful => "helpful",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewQuery {
    /// Case-insensitive substring matched against movie title, author
    /// display name, and comment; empty retains everything.
    pub search: String,
    pub rating: RatingFilter,
    pub sort: SortOrder,
}

/// Reviews without a creation timestamp sort as oldest.
fn created_at_key(review: &Review) -> DateTime<Utc> {
    review.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl ReviewQuery {
    fn matches_search(&self, review: &Review) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        review.movie_title.to_lowercase().contains(&term)
            || review.user_name.to_lowercase().contains(&term)
            || review.comment.to_lowercase().contains(&term)
    }

    fn matches_rating(&self, review: &Review) -> bool {
        match self.rating {
            RatingFilter::All => true,
            RatingFilter::Exactly(value) => review.rating == value,
        }
    }

    /// Apply search, then rating filter, then sort. The sort is stable
    /// so ties keep their incoming relative order across repeated
    /// applications.
    pub fn apply(&self, reviews: &[Review]) -> Vec<Review> {
        let mut filtered: Vec<Review> = reviews
            .iter()
            .filter(|r| self.matches_search(r))
            .filter(|r| self.matches_rating(r))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Newest => {
                filtered.sort_by(|a, b| created_at_key(b).cmp(&created_at_key(a)));
            }
            SortOrder::Oldest => {
                filtered.sort_by(|a, b| created_at_key(a).cmp(&created_at_key(b)));
            }
            SortOrder::Highest => filtered.sort_by(|a, b| b.rating.cmp(&a.rating)),
            SortOrder::Lowest => filtered.sort_by(|a, b| a.rating.cmp(&b.rating)),
            SortOrder::Helpful => filtered.sort_by(|a, b| b.helpful.cmp(&a.helpful)),
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn review(id: &str, title: &str, user: &str, comment: &str, rating: u8) -> Review {
        Review {
            id: id.to_string(),
            movie_id: 1,
            movie_title: title.to_string(),
            movie_poster: String::new(),
            user_id: format!("uid-{}", user),
            user_name: user.to_string(),
            rating,
            comment: comment.to_string(),
            helpful: 0,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    fn at(review: Review, secs: u32) -> Review {
        Review {
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, secs).unwrap()),
            ..review
        }
    }

    #[test]
    fn empty_search_retains_everything() {
        let reviews = vec![
            review("a", "Alien", "ripley", "a classic", 5),
            review("b", "Heat", "neil", "great heist film", 4),
        ];
        let out = ReviewQuery::default().apply(&reviews);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn search_matches_any_of_the_three_fields() {
        let reviews = vec![
            review("a", "Alpha Dog", "casey", "decent drama", 3),
            review("b", "Heat", "alphaville", "great heist film", 4),
            review("c", "Ronin", "sam", "the alpha of car chases", 5),
            review("d", "Blade Runner", "deckard", "unmatched mood", 5),
        ];
        let query = ReviewQuery {
            search: "ALPHA".to_string(),
            ..ReviewQuery::default()
        };
        let out = query.apply(&reviews);
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"a") && ids.contains(&"b") && ids.contains(&"c"));
    }

    #[test]
    fn rating_filter_is_exact_equality() {
        let reviews = vec![
            review("a", "Alien", "ripley", "a classic", 5),
            review("b", "Heat", "neil", "great heist film", 4),
            review("c", "Ronin", "sam", "tight chases", 5),
        ];
        let query = ReviewQuery {
            rating: RatingFilter::Exactly(5),
            ..ReviewQuery::default()
        };
        assert_eq!(query.apply(&reviews).len(), 2);
    }

    #[test]
    fn search_and_rating_compose() {
        // 2 match the search term, 3 have rating 5, exactly 1 has both
        let reviews = vec![
            review("a", "Alpha Dog", "casey", "decent drama", 3),
            review("b", "Alpha Centauri", "lem", "stellar", 5),
            review("c", "Heat", "neil", "great heist film", 5),
            review("d", "Ronin", "sam", "tight chases", 5),
            review("e", "Blade Runner", "deckard", "unmatched mood", 4),
        ];
        let query = ReviewQuery {
            search: "alpha".to_string(),
            rating: RatingFilter::Exactly(5),
            ..ReviewQuery::default()
        };
        let out = query.apply(&reviews);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn highest_sort_is_stable_for_equal_ratings() {
        let reviews = vec![
            at(review("r3", "A", "u", "three stars here", 3), 1),
            at(review("r5a", "B", "u", "five stars first", 5), 2),
            at(review("r5b", "C", "u", "five stars second", 5), 3),
        ];
        let query = ReviewQuery {
            sort: SortOrder::Highest,
            ..ReviewQuery::default()
        };
        let out = query.apply(&reviews);
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r5a", "r5b", "r3"]);
    }

    #[test]
    fn newest_sort_treats_missing_timestamp_as_oldest() {
        let mut undated = review("undated", "A", "u", "no timestamp set", 3);
        undated.created_at = None;
        let reviews = vec![undated, at(review("dated", "B", "u", "has timestamp", 4), 5)];
        let query = ReviewQuery {
            sort: SortOrder::Newest,
            ..ReviewQuery::default()
        };
        let out = query.apply(&reviews);
        assert_eq!(out[0].id, "dated");
        assert_eq!(out[1].id, "undated");
    }

    #[test]
    fn helpful_sort_is_descending() {
        let mut a = review("a", "A", "u", "helped many people", 3);
        a.helpful = 2;
        let mut b = review("b", "B", "u", "helped even more", 3);
        b.helpful = 7;
        let query = ReviewQuery {
            sort: SortOrder::Helpful,
            ..ReviewQuery::default()
        };
        let out = query.apply(&[a, b]);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn apply_never_mutates_its_input() {
        let reviews = vec![
            at(review("a", "Alien", "ripley", "a classic", 5), 1),
            at(review("b", "Heat", "neil", "great heist film", 4), 2),
        ];
        let before = reviews.clone();
        let query = ReviewQuery {
            sort: SortOrder::Oldest,
            ..ReviewQuery::default()
        };
        let _ = query.apply(&reviews);
        let _ = query.apply(&reviews);
        assert_eq!(reviews, before);
    }
}
