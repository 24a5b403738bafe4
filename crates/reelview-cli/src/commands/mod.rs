pub mod config;
pub mod movies;
pub mod profile;
pub mod reviews;

use crate::output::Output;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reelview_config::{Config, StoreBackend};
use reelview_core::{ReviewService, ServiceOptions};
use reelview_store::{CatalogClient, DocumentStore, MemoryStore, RestStore};
use std::sync::Arc;
use std::time::Duration;

pub fn build_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.store.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Rest => {
            let store = RestStore::new(
                config.store.rest_base_url.clone(),
                config.timeouts.api_request(),
            )?;
            Ok(Arc::new(store))
        }
    }
}

pub fn build_service(config: &Config) -> Result<ReviewService> {
    let store = build_store(config)?;
    let options = ServiceOptions {
        counter_mode: config.store.counter_mode,
        query_timeout: config.timeouts.query(),
        simple_query_timeout: config.timeouts.simple_query(),
    };
    Ok(ReviewService::new(store, options))
}

/// Catalog access is optional: without an API key the commands that
/// need it fall back to snapshot data or fail with a clear message.
pub fn build_catalog(config: &Config) -> Result<Option<CatalogClient>> {
    if config.catalog.api_key.is_empty() {
        return Ok(None);
    }
    let client = CatalogClient::with_base_urls(
        config.catalog.api_key.clone(),
        config.catalog.base_url.clone(),
        config.catalog.image_base_url.clone(),
        config.timeouts.api_request(),
    )?;
    Ok(Some(client))
}

/// Busy indicator shown while a request is in flight, human mode only.
pub fn spinner(out: &Output, msg: &str) -> Option<ProgressBar> {
    if !out.is_human() || out.is_quiet() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or(ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

pub fn finish_spinner(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}
