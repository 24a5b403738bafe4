use super::{build_service, finish_spinner, spinner};
use crate::output::Output;
use color_eyre::eyre::bail;
use color_eyre::Result;
use dialoguer::Password;
use reelview_config::Config;
use reelview_core::ServiceError;
use reelview_models::ProfileRecord;
use serde_json::json;

/// Show a user's profile. Stats are synchronized first so the printed
/// aggregates match the review set; a slow or unavailable store falls
/// back to the freshly computed stats instead of blocking.
pub async fn show(out: &Output, config: &Config, user: &str) -> Result<()> {
    let service = build_service(config)?;

    let pb = spinner(out, "Loading your profile...");
    let computed = match service.sync_user_stats(user).await {
        Ok(stats) => Some(stats),
        Err(e) => {
            out.warn(format!("Stats sync failed: {}", e));
            None
        }
    };

    match service.get_profile(user).await {
        Ok(profile) => {
            finish_spinner(pb);
            render(out, user, &profile);
        }
        Err(e) if e.is_unavailable() => {
            finish_spinner(pb);
            out.warn(format!("{} Showing locally computed stats.", e));
            if let Some(stats) = computed {
                out.println(format!("Total reviews:  {}", stats.total_reviews));
                out.println(format!("Average rating: {:.1}/5", stats.average_rating));
            }
        }
        Err(e) => {
            finish_spinner(pb);
            out.error(e.to_string());
        }
    }
    Ok(())
}

fn render(out: &Output, user: &str, profile: &ProfileRecord) {
    if !out.is_human() {
        out.json(&json!({ "userId": user, "profile": profile }));
        return;
    }
    out.println(format!("User:           {} ({})", profile.username, user));
    out.println(format!("Email:          {}", profile.email));
    if !profile.bio.is_empty() {
        out.println(format!("Bio:            {}", profile.bio));
    }
    out.println(format!(
        "Member since:   {}",
        profile.join_date.format("%B %e, %Y")
    ));
    out.println(format!("Total reviews:  {}", profile.total_reviews));
    out.println(format!("Average rating: {:.1}/5", profile.average_rating));
}

pub async fn register(
    out: &Output,
    config: &Config,
    user: &str,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    // Authentication lives outside this layer; only the password
    // length is validated here, and the password itself is discarded.
    let password_length = match password {
        Some(p) => p.chars().count(),
        None => Password::new()
            .with_prompt("Password")
            .interact()?
            .chars()
            .count(),
    };

    let service = build_service(config)?;
    match service
        .register_profile(user, username, email, password_length)
        .await
    {
        Ok(_) => {
            out.success("Account created successfully!");
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

pub async fn update(
    out: &Output,
    config: &Config,
    user: &str,
    username: Option<String>,
    bio: Option<String>,
) -> Result<()> {
    if username.is_none() && bio.is_none() {
        bail!("nothing to update; pass --username and/or --bio");
    }
    let service = build_service(config)?;
    match service.update_profile(user, username, bio).await {
        Ok(_) => {
            out.success("Profile updated successfully!");
            Ok(())
        }
        Err(e) => {
            out.error(e.to_string());
            Ok(())
        }
    }
}

pub async fn sync(out: &Output, config: &Config, user: &str) -> Result<()> {
    let service = build_service(config)?;
    match service.sync_user_stats(user).await {
        Ok(stats) => {
            if out.is_human() {
                out.success(format!(
                    "Synchronized: {} reviews, {:.1} average rating",
                    stats.total_reviews, stats.average_rating
                ));
            } else {
                out.json(&serde_json::to_value(stats)?);
            }
            Ok(())
        }
        Err(e) => {
            out.error(e.to_string());
            Ok(())
        }
    }
}
