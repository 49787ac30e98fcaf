//! Facade that wires the distributor client, web search, image providers and
//! caches from configuration. Both binaries and the HTTP surface go through
//! here.

use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use serde::Serialize;
use tracing::info;

use crate::cache::{ImageCache, ResultCache};
use crate::config::CatalogConfig;
use crate::distributor::{DistributorApi, IngramClient};
use crate::error::{CatalogError, CatalogResult};
use crate::images::{providers_from_keys, ImageResolver, ImageSearchProvider, ResolvedImage};
use crate::model::{PriceAvailability, ProductDetail, ProductRecord, SearchResultPage};
use crate::orchestrator::{merge_lookup, HybridSearch};
use crate::presentation::{ProductCard, ProductDetailView};
use crate::web_search::{SerpApiWebSearch, SkuWebSearch};

/// Search page with display fields resolved per item.
#[derive(Debug, Clone, Serialize)]
pub struct CardPage {
    pub items: Vec<ProductCard>,
    pub total_records: u64,
    pub is_empty_page: bool,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub start_record: u64,
    pub end_record: u64,
}

pub struct CatalogService {
    distributor: Arc<dyn DistributorApi>,
    search: HybridSearch,
    images: ImageResolver,
    price_markup: f64,
}

impl CatalogService {
    pub fn new(
        distributor: Arc<dyn DistributorApi>,
        web_search: Option<Arc<dyn SkuWebSearch>>,
        providers: Vec<Arc<dyn ImageSearchProvider>>,
        cfg: &CatalogConfig,
    ) -> Self {
        let search = HybridSearch::new(
            distributor.clone(),
            web_search,
            ResultCache::new(cfg.search.cache_ttl),
            cfg.search.clone(),
        );
        let images = ImageResolver::new(ImageCache::new(cfg.image_cache_ttl), providers);
        Self {
            distributor,
            search,
            images,
            price_markup: cfg.price_markup,
        }
    }

    /// Build the production wiring. Web search and each image provider are
    /// enabled only when their keys are configured.
    pub fn from_config(cfg: CatalogConfig) -> anyhow::Result<Self> {
        cfg.distributor
            .validate()
            .context("invalid distributor configuration")?;
        let distributor: Arc<dyn DistributorApi> = Arc::new(
            IngramClient::new(cfg.distributor.clone()).context("building distributor client")?,
        );
        let web_search: Option<Arc<dyn SkuWebSearch>> = match &cfg.providers.serpapi_key {
            Some(key) => Some(Arc::new(
                SerpApiWebSearch::new(key.clone(), cfg.image_timeout)
                    .context("building web search client")?,
            )),
            None => None,
        };
        let providers = providers_from_keys(&cfg.providers, cfg.image_timeout)
            .context("building image providers")?;
        info!(
            target = "service",
            web_search = web_search.is_some(),
            image_providers = providers.len(),
            "catalog service ready"
        );
        Ok(Self::new(distributor, web_search, providers, &cfg))
    }

    pub fn price_markup(&self) -> f64 {
        self.price_markup
    }

    pub async fn search_products(
        &self,
        query: &str,
        vendor: &str,
        page_number: u32,
        page_size: u32,
    ) -> CatalogResult<SearchResultPage> {
        self.search
            .search_products(query, vendor, page_number, page_size)
            .await
    }

    /// Search and resolve an image, availability text and display price for
    /// every item. Image resolution runs concurrently per page.
    pub async fn search_cards(
        &self,
        query: &str,
        vendor: &str,
        page_number: u32,
        page_size: u32,
    ) -> CatalogResult<CardPage> {
        let page = self
            .search_products(query, vendor, page_number, page_size)
            .await?;
        let images = join_all(page.items.iter().map(|r| self.images.resolve(r))).await;
        let items = page
            .items
            .into_iter()
            .zip(images)
            .map(|(record, image)| ProductCard::new(record, image, self.price_markup))
            .collect();
        Ok(CardPage {
            items,
            total_records: page.total_records,
            is_empty_page: page.is_empty_page,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages: page.total_pages,
            start_record: page.start_record,
            end_record: page.end_record,
        })
    }

    pub async fn resolve_image(&self, record: &ProductRecord) -> ResolvedImage {
        self.images.resolve(record).await
    }

    /// Image for a part number known only by id. The detail call supplies the
    /// fields the fallback steps need.
    pub async fn resolve_image_for(&self, part_number: &str) -> CatalogResult<ResolvedImage> {
        let (record, _, _) = self.lookup(part_number).await?;
        Ok(self.images.resolve(&record).await)
    }

    /// One detail call and one single-item price call merged into a view.
    pub async fn product_detail(&self, part_number: &str) -> CatalogResult<ProductDetailView> {
        let (record, detail, pa) = self.lookup(part_number).await?;
        let image = self.images.resolve(&record).await;
        Ok(ProductDetailView::build(
            &record,
            &detail,
            pa.as_ref(),
            image,
            self.price_markup,
        ))
    }

    async fn lookup(
        &self,
        part_number: &str,
    ) -> CatalogResult<(ProductRecord, ProductDetail, Option<PriceAvailability>)> {
        let pn = part_number.trim();
        if pn.is_empty() {
            return Err(CatalogError::NotFound(String::new()));
        }
        let pns = [pn.to_string()];
        let (detail, prices) = tokio::join!(
            self.distributor.get_detail(pn),
            self.distributor.price_and_availability(&pns)
        );
        let detail = detail?;
        let pa = prices?.shift_remove(pn).filter(PriceAvailability::is_resolved);
        if detail.is_empty() && pa.is_none() {
            return Err(CatalogError::NotFound(pn.to_string()));
        }
        let base = pa.clone().unwrap_or_else(|| PriceAvailability {
            part_number: pn.to_string(),
            ..Default::default()
        });
        let record = merge_lookup(&base, &detail);
        Ok((record, detail, pa))
    }
}
