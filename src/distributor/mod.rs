//! Distributor API access: token cache, HTTP client and JSON translation.

pub mod client;
pub mod token;
pub mod wire;

use indexmap::IndexMap;

use crate::error::CatalogResult;
use crate::model::{CatalogPage, PriceAvailability, ProductDetail};

pub use client::IngramClient;
pub use token::{TokenManager, TokenSource};

/// The three distributor operations the orchestrator depends on.
///
/// Implementations fail soft: transport errors and non-success statuses come
/// back as the empty value of each operation. Only token acquisition
/// (`CatalogError::Auth`) is returned as an error.
#[async_trait::async_trait]
pub trait DistributorApi: Send + Sync {
    /// One page of free-text catalog search. A blank `vendor` means no filter.
    async fn search_catalog(
        &self,
        query: &str,
        vendor: &str,
        page_number: u32,
        page_size: u32,
    ) -> CatalogResult<CatalogPage>;

    /// Batched price & availability, keyed by the part number the distributor
    /// echoed back. Part numbers the distributor dropped are simply absent.
    async fn price_and_availability(
        &self,
        part_numbers: &[String],
    ) -> CatalogResult<IndexMap<String, PriceAvailability>>;

    /// Product detail; `ProductDetail::default()` when unavailable.
    async fn get_detail(&self, part_number: &str) -> CatalogResult<ProductDetail>;
}
