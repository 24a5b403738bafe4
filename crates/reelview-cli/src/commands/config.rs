use crate::output::Output;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use reelview_config::{Config, PathManager, StoreBackend};
use serde_json::json;

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

pub fn show(out: &Output, config: &Config, paths: &PathManager) -> Result<()> {
    if !out.is_human() {
        out.json(&json!({
            "path": paths.config_file().display().to_string(),
            "store": {
                "backend": format!("{:?}", config.store.backend),
                "restBaseUrl": config.store.rest_base_url,
                "counterMode": format!("{:?}", config.store.counter_mode),
            },
            "catalog": {
                "apiKey": mask(&config.catalog.api_key),
                "baseUrl": config.catalog.base_url,
            },
            "timeouts": {
                "queryMs": config.timeouts.query_ms,
                "simpleQueryMs": config.timeouts.simple_query_ms,
                "apiRequestMs": config.timeouts.api_request_ms,
            },
        }));
        return Ok(());
    }

    out.println(format!("Config file:     {}", paths.config_file().display()));
    out.println(format!("Store backend:   {:?}", config.store.backend));
    if config.store.backend == StoreBackend::Memory {
        out.println("                 (per-process; records are discarded on exit. Switch to the rest backend to persist them.)");
    }
    out.println(format!("REST base URL:   {}", config.store.rest_base_url));
    out.println(format!("Counter mode:    {:?}", config.store.counter_mode));
    out.println(format!("Catalog API key: {}", mask(&config.catalog.api_key)));
    out.println(format!("Catalog URL:     {}", config.catalog.base_url));
    out.println(format!(
        "Timeouts:        query {} ms, simple {} ms, api {} ms",
        config.timeouts.query_ms, config.timeouts.simple_query_ms, config.timeouts.api_request_ms
    ));
    Ok(())
}

/// Write a default config file for the user to edit. Refuses to
/// clobber an existing file unless forced.
pub fn init(out: &Output, paths: &PathManager, force: bool) -> Result<()> {
    let path = paths.config_file();
    if path.exists() && !force {
        bail!(
            "config already exists at {}; use --force to overwrite",
            path.display()
        );
    }
    Config::default()
        .save(&path)
        .map_err(|e| eyre!("failed to write default config: {}", e))?;
    out.success(format!("Wrote default config to {}", path.display()));
    Ok(())
}
