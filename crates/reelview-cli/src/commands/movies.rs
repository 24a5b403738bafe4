use super::{build_catalog, finish_spinner, spinner};
use crate::output::Output;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use reelview_config::Config;
use reelview_models::{MovieSummary, TrendingWindow};
use reelview_store::CatalogClient;
use serde_json::json;

fn catalog(config: &Config) -> Result<CatalogClient> {
    build_catalog(config)?.ok_or_else(|| {
        eyre!("no catalog API key configured; run `reelview config init` and set one")
    })
}

pub async fn popular(out: &Output, config: &Config, page: u32) -> Result<()> {
    let catalog = catalog(config)?;
    let pb = spinner(out, "Loading popular movies...");
    let result = catalog.popular(page).await;
    finish_spinner(pb);
    match result {
        Ok(movies) => {
            render_listing(out, &movies.movies);
            if out.is_human() {
                out.println(format!(
                    "Page {} of {} ({} results)",
                    movies.current_page, movies.total_pages, movies.total_results
                ));
            }
            Ok(())
        }
        Err(e) => {
            out.error(format!("Failed to fetch popular movies: {}", e));
            Ok(())
        }
    }
}

pub async fn trending(out: &Output, config: &Config, window: &str) -> Result<()> {
    let window = match window {
        "day" => TrendingWindow::Day,
        "week" => TrendingWindow::Week,
        other => bail!("invalid trending window '{}'; use day or week", other),
    };
    let catalog = catalog(config)?;
    let pb = spinner(out, "Loading trending movies...");
    let result = catalog.trending(window).await;
    finish_spinner(pb);
    match result {
        Ok(movies) => {
            render_listing(out, &movies);
            Ok(())
        }
        Err(e) => {
            out.error(format!("Failed to fetch trending movies: {}", e));
            Ok(())
        }
    }
}

pub async fn search(out: &Output, config: &Config, query: &str, page: u32) -> Result<()> {
    let catalog = catalog(config)?;
    let pb = spinner(out, "Searching the catalog...");
    let result = catalog.search(query, page).await;
    finish_spinner(pb);
    match result {
        Ok(movies) => {
            if movies.movies.is_empty() {
                out.println(format!("No movies found for '{}'", query));
                return Ok(());
            }
            render_listing(out, &movies.movies);
            if out.is_human() {
                out.println(format!(
                    "Page {} of {} ({} results)",
                    movies.current_page, movies.total_pages, movies.total_results
                ));
            }
            Ok(())
        }
        Err(e) => {
            out.error(format!("Search failed: {}", e));
            Ok(())
        }
    }
}

pub async fn details(out: &Output, config: &Config, movie_id: u32, with_videos: bool) -> Result<()> {
    let catalog = catalog(config)?;
    let pb = spinner(out, "Loading movie details...");
    let result = catalog.details(movie_id).await;
    let videos = if with_videos {
        catalog.videos(movie_id).await.ok()
    } else {
        None
    };
    finish_spinner(pb);

    let movie = match result {
        Ok(movie) => movie,
        Err(e) => {
            out.error(format!("Failed to fetch movie details: {}", e));
            return Ok(());
        }
    };

    if !out.is_human() {
        out.json(&json!({ "movie": movie, "videos": videos }));
        return Ok(());
    }

    out.println(format!("{} ({})", movie.title, movie.release_date.as_deref().unwrap_or("unknown")));
    if let Some(tagline) = &movie.tagline {
        out.println(format!("  \"{}\"", tagline));
    }
    out.println(format!("  Catalog score: {:.1}/10 ({} votes)", movie.rating, movie.vote_count));
    if let Some(runtime) = movie.runtime {
        out.println(format!("  Runtime: {} min", runtime));
    }
    if !movie.genres.is_empty() {
        out.println(format!("  Genres: {}", movie.genres.join(", ")));
    }
    out.println(String::new());
    out.println(movie.overview);

    if let Some(videos) = videos {
        if !videos.is_empty() {
            out.println(String::new());
            out.println("Videos:");
            for video in videos {
                out.println(format!("  [{}] {} ({})", video.site, video.name, video.video_type));
            }
        }
    }
    Ok(())
}

fn render_listing(out: &Output, movies: &[MovieSummary]) {
    if !out.is_human() {
        out.json(&json!({ "movies": movies }));
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Title", "Released", "Score", "Votes"]);
    for movie in movies {
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title),
            Cell::new(movie.release_date.as_deref().unwrap_or("-")),
            Cell::new(format!("{:.1}", movie.rating)),
            Cell::new(movie.vote_count),
        ]);
    }
    out.println(table.to_string());
}
