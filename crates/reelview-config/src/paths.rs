use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        // REELVIEW_BASE_PATH overrides the platform config dir so a
        // container can mount everything under one path.
        if let Ok(base) = std::env::var("REELVIEW_BASE_PATH") {
            return Ok(Self {
                config_dir: PathBuf::from(base),
            });
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("reelview");
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
