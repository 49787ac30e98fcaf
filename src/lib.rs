pub mod api;
pub mod cache;
pub mod config;
pub mod distributor;
pub mod error;
pub mod images;
pub mod model;
pub mod normalization;
pub mod orchestrator;
pub mod presentation;
pub mod service;
pub mod tracing;
pub mod vendors;
pub mod web_search;

pub mod util {
    pub mod env;
}

pub use error::{CatalogError, CatalogResult};
pub use orchestrator::HybridSearch;
pub use service::CatalogService;
