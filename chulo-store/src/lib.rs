pub mod app_config;
pub mod catalog_repo;

pub use app_config::Config;
pub use catalog_repo::InMemoryCatalogRepo;
