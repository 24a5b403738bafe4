pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, CounterMode, StoreBackend, StoreConfig, Timeouts};
pub use paths::PathManager;
