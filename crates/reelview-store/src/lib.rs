pub mod catalog;
pub mod error;
pub mod memory;
pub mod rest;
pub mod traits;

pub use catalog::{CatalogClient, CatalogError};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use traits::DocumentStore;
