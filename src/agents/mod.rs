pub mod catalog_store;
pub mod update;

pub use catalog_store::CatalogStore;
pub use update::{UpdateReport, apply_release};
