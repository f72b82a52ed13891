pub mod export;
pub mod queries;
pub mod seed;
pub mod store;

pub use store::CatalogStore;
