use super::{build_catalog, build_service, finish_spinner, spinner};
use crate::output::Output;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use dialoguer::Confirm;
use futures::future::join_all;
use reelview_config::Config;
use reelview_core::{sanitize_text, RatingFilter, ReviewQuery, ServiceError, SortOrder};
use reelview_models::{Review, ReviewDraft, ReviewFilter};
use reelview_store::CatalogClient;
use serde_json::json;
use tracing::debug;

pub struct ListArgs {
    pub movie: Option<u32>,
    pub user: Option<String>,
    pub limit: usize,
    pub search: String,
    pub rating: Option<u8>,
    pub sort: String,
}

/// Fetch, enrich, filter, and render the review listing. An
/// unavailable store degrades to an empty listing with a retry hint
/// instead of failing the command.
pub async fn list(out: &Output, config: &Config, args: ListArgs) -> Result<()> {
    let sort = SortOrder::parse(&args.sort).ok_or_else(|| {
        eyre!(
            "invalid sort order '{}'; use newest, oldest, highest, lowest, or helpful",
            args.sort
        )
    })?;
    if let Some(r) = args.rating {
        if !(1..=5).contains(&r) {
            bail!("rating filter must be between 1 and 5");
        }
    }

    let service = build_service(config)?;
    let filter = ReviewFilter {
        movie_id: args.movie,
        user_id: args.user.clone(),
        limit: Some(args.limit),
    };

    let pb = spinner(out, "Loading reviews...");
    let fetched = match service.list_reviews(&filter).await {
        Ok(reviews) => reviews,
        Err(e) if e.is_unavailable() => {
            finish_spinner(pb);
            out.warn(format!("{} Showing an empty listing; retry shortly.", e));
            render(out, &[], 0);
            return Ok(());
        }
        Err(e) => {
            finish_spinner(pb);
            out.error(e.to_string());
            return Ok(());
        }
    };

    let enriched = match build_catalog(config)? {
        Some(catalog) => enrich(&catalog, fetched).await,
        None => fetched,
    };
    finish_spinner(pb);

    let total = enriched.len();
    let query = ReviewQuery {
        search: args.search,
        rating: args.rating.map_or(RatingFilter::All, RatingFilter::Exactly),
        sort,
    };
    let visible = query.apply(&enriched);
    render(out, &visible, total);
    Ok(())
}

/// Refresh display data from the catalog, keeping the stored snapshot
/// when the catalog lookup fails. Snapshot fields stay authoritative
/// for anything already present.
async fn enrich(catalog: &CatalogClient, reviews: Vec<Review>) -> Vec<Review> {
    let lookups = reviews.iter().map(|r| catalog.details(r.movie_id));
    let details = join_all(lookups).await;
    reviews
        .into_iter()
        .zip(details)
        .map(|(mut review, detail)| {
            match detail {
                Ok(detail) => {
                    review.movie_title = detail.title;
                    if review.movie_poster.is_empty() {
                        review.movie_poster = detail.poster;
                    }
                }
                Err(e) => {
                    debug!(movie_id = review.movie_id, error = %e, "catalog enrichment failed");
                    if review.movie_title.is_empty() {
                        review.movie_title = "Unknown Movie".to_string();
                    }
                }
            }
            review
        })
        .collect()
}

fn render(out: &Output, reviews: &[Review], total: usize) {
    if !out.is_human() {
        out.json(&json!({
            "showing": reviews.len(),
            "total": total,
            "reviews": reviews,
        }));
        return;
    }
    if reviews.is_empty() {
        if total == 0 {
            out.println("No reviews yet. Find a movie and share your thoughts.");
        } else {
            out.println("No reviews found matching your criteria. Try adjusting your filters.");
        }
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Movie", "User", "Rating", "Helpful", "Date", "Comment"]);
    for review in reviews {
        let date = review
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&review.id),
            Cell::new(sanitize_text(&review.movie_title)),
            Cell::new(sanitize_text(&review.user_name)),
            Cell::new(format!("{}/5", review.rating)),
            Cell::new(review.helpful),
            Cell::new(date),
            Cell::new(truncate(&sanitize_text(&review.comment), 60)),
        ]);
    }
    out.println(table.to_string());
    out.println(format!("Showing {} of {} reviews", reviews.len(), total));
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}

pub struct AddArgs {
    pub user: String,
    pub name: String,
    pub movie: u32,
    pub rating: u8,
    pub comment: String,
}

pub async fn add(out: &Output, config: &Config, args: AddArgs) -> Result<()> {
    let service = build_service(config)?;

    // Snapshot catalog data at review time; the snapshot stays frozen
    // even if the catalog entry changes later.
    let pb = spinner(out, "Fetching movie details...");
    let (title, poster) = match build_catalog(config)? {
        Some(catalog) => match catalog.details(args.movie).await {
            Ok(details) => (details.title, details.poster),
            Err(e) => {
                out.warn(format!("Catalog lookup failed ({}); storing placeholder", e));
                ("Unknown Movie".to_string(), String::new())
            }
        },
        None => {
            out.warn("No catalog API key configured; storing placeholder movie data");
            ("Unknown Movie".to_string(), String::new())
        }
    };
    finish_spinner(pb);

    let draft = ReviewDraft {
        movie_id: args.movie,
        movie_title: title,
        movie_poster: poster,
        user_id: args.user,
        user_name: args.name,
        rating: args.rating,
        comment: args.comment,
    };

    match service.create_review(draft).await {
        Ok(id) => {
            out.success(format!("Review submitted successfully! (id: {})", id));
            Ok(())
        }
        Err(ServiceError::Validation(msg)) => {
            out.error(msg);
            Ok(())
        }
        Err(e) => {
            out.error(e.to_string());
            Ok(())
        }
    }
}

pub async fn delete(out: &Output, config: &Config, id: &str, user: &str, yes: bool) -> Result<()> {
    if !yes {
        if !out.is_human() {
            bail!("refusing to delete without --yes in non-interactive output mode");
        }
        let confirmed = Confirm::new()
            .with_prompt("Are you sure you want to delete this review?")
            .default(false)
            .interact()?;
        if !confirmed {
            out.println("Deletion cancelled.");
            return Ok(());
        }
    }

    let service = build_service(config)?;
    match service.delete_review(id, user).await {
        Ok(()) => {
            out.success("Review deleted successfully!");
            Ok(())
        }
        Err(e) => {
            out.error(e.to_string());
            Ok(())
        }
    }
}

pub async fn helpful(out: &Output, config: &Config, id: &str) -> Result<()> {
    let service = build_service(config)?;
    match service.mark_helpful(id).await {
        Ok(()) => {
            out.success("Marked review as helpful");
            Ok(())
        }
        Err(e) => {
            out.error(e.to_string());
            Ok(())
        }
    }
}

pub async fn stats(out: &Output, config: &Config) -> Result<()> {
    let service = build_service(config)?;
    let pb = spinner(out, "Computing review stats...");
    let stats = match service.review_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            finish_spinner(pb);
            out.error(e.to_string());
            return Ok(());
        }
    };
    finish_spinner(pb);

    if !out.is_human() {
        out.json(&serde_json::to_value(&stats)?);
        return Ok(());
    }

    out.println(format!("Total reviews:  {}", stats.total_reviews));
    out.println(format!("Average rating: {:.1}/5", stats.average_rating));
    for (i, count) in stats.rating_distribution.iter().enumerate().rev() {
        out.println(format!("  {} star{} {:>5}", i + 1, if i == 0 { " " } else { "s" }, count));
    }
    Ok(())
}
