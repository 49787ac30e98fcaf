//! Hybrid product search: direct part-number lookups merged with free-text
//! catalog search, then paginated and memoized.
//!
//! One request walks `SkuAttempt -> CatalogSearch -> Merge -> Paginate`.
//! Every distributor call fails soft except token acquisition, so the only
//! error a caller sees is `CatalogError::Auth`.

use std::sync::Arc;

use futures::future::join_all;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::cache::{result_cache_key, ResultCache};
use crate::config::{SearchConfig, MAX_PAGE_SIZE};
use crate::distributor::DistributorApi;
use crate::error::CatalogResult;
use crate::model::{
    CatalogPage, PriceAvailability, ProductDetail, ProductRecord, SearchResultPage,
    DESCRIPTION_UNAVAILABLE, VENDOR_UNAVAILABLE,
};
use crate::normalization::sku::{generate_variants, is_detailed_query, looks_like_sku};
use crate::normalization::text::{expand_synonyms, normalize_brand};
use crate::vendors::is_all_brands;
use crate::web_search::{extract_candidates_from_web_search, SkuWebSearch};

/// Page window derived from the upstream totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total_records: u64,
    pub total_pages: u32,
    pub page_number: u32,
    pub start_record: u64,
    pub end_record: u64,
}

/// Correct an unreliable upstream total and derive the display window.
///
/// An empty catalog page past page 1 means the reported total is stale; the
/// last offset known to hold data, `(page - 1) * size`, replaces it. The
/// result is clamped to `max_records`, and the displayed page is pulled back
/// to the last page when the requested one came back empty.
pub fn paginate(
    reported_total: u64,
    catalog_page_empty: bool,
    page_number: u32,
    page_size: u32,
    max_records: u64,
) -> Pagination {
    let size = u64::from(page_size.max(1));
    let mut total = reported_total;
    if catalog_page_empty && page_number > 1 {
        total = total.min(u64::from(page_number - 1) * size);
    }
    total = total.min(max_records);

    let total_pages = u32::try_from(total.div_ceil(size).max(1)).unwrap_or(u32::MAX);
    let mut page = page_number.max(1);
    if catalog_page_empty && page > total_pages {
        page = total_pages;
    }

    let page64 = u64::from(page);
    let mut start = if total > 0 { (page64 - 1) * size + 1 } else { 0 };
    let mut end = (page64 * size).min(total);
    if catalog_page_empty && page > 1 {
        end = start.saturating_sub(1);
        start = 0;
    }

    Pagination {
        total_records: total,
        total_pages,
        page_number: page,
        start_record: start,
        end_record: end,
    }
}

/// Build one record from a resolved price entry and its detail. Detail
/// fields win over price-entry fields, which win over fixed placeholders.
pub fn merge_lookup(pa: &PriceAvailability, detail: &ProductDetail) -> ProductRecord {
    let availability = if pa.availability.is_empty() {
        detail.availability.clone().unwrap_or_default()
    } else {
        pa.availability.clone()
    };
    ProductRecord {
        part_number: pa.part_number.clone(),
        vendor_part_number: detail.vendor_part_number.clone(),
        description: detail
            .description
            .clone()
            .or_else(|| pa.description.clone())
            .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string()),
        vendor_name: detail
            .vendor_name
            .clone()
            .or_else(|| pa.vendor_name.clone())
            .unwrap_or_else(|| VENDOR_UNAVAILABLE.to_string()),
        category: detail.category.clone(),
        sub_category: detail.sub_category.clone(),
        images: detail.images.clone(),
        pricing: pa.pricing.clone(),
        availability,
        status_code: pa.status_code.clone(),
        status_message: pa.status_message.clone(),
    }
}

pub struct HybridSearch {
    distributor: Arc<dyn DistributorApi>,
    web_search: Option<Arc<dyn SkuWebSearch>>,
    cache: ResultCache,
    cfg: SearchConfig,
}

impl HybridSearch {
    pub fn new(
        distributor: Arc<dyn DistributorApi>,
        web_search: Option<Arc<dyn SkuWebSearch>>,
        cache: ResultCache,
        cfg: SearchConfig,
    ) -> Self {
        Self {
            distributor,
            web_search,
            cache,
            cfg,
        }
    }

    /// Search by free text and/or vendor. Page numbers start at 1; a zero
    /// page size selects the configured default.
    pub async fn search_products(
        &self,
        query: &str,
        vendor: &str,
        page_number: u32,
        page_size: u32,
    ) -> CatalogResult<SearchResultPage> {
        let query = query.trim();
        let vendor = if is_all_brands(vendor) {
            String::new()
        } else {
            normalize_brand(vendor)
        };
        let page_number = page_number.max(1);
        let page_size = if page_size == 0 {
            self.cfg.default_page_size
        } else {
            page_size
        }
        .clamp(1, MAX_PAGE_SIZE);

        // A full unfiltered browse is never memoized.
        let cacheable = !query.is_empty() || !vendor.is_empty();
        let key = result_cache_key(query, &vendor, page_number, page_size);
        if cacheable {
            if let Some(hit) = self.cache.get(&key) {
                debug!(target = "orchestrator", query, vendor = %vendor, page_number, "result cache hit");
                return Ok(hit);
            }
        }

        let sku_hits = if page_number == 1 {
            self.sku_attempt(query).await?
        } else {
            Vec::new()
        };
        let catalog = self
            .distributor
            .search_catalog(&expand_synonyms(query), &vendor, page_number, page_size)
            .await?;

        // SKU hits the catalog page also carries are counted once.
        let sku_count = sku_hits
            .iter()
            .filter(|hit| {
                !catalog
                    .items
                    .iter()
                    .any(|item| item.part_number == hit.part_number)
            })
            .count() as u64;
        let items = self.merge(sku_hits, &catalog, &vendor).await?;
        let window = paginate(
            catalog.total_records + sku_count,
            catalog.is_empty_page,
            page_number,
            page_size,
            self.cfg.max_records,
        );

        let page = SearchResultPage {
            is_empty_page: items.is_empty(),
            items,
            total_records: window.total_records,
            page_number: window.page_number,
            page_size,
            total_pages: window.total_pages,
            start_record: window.start_record,
            end_record: window.end_record,
        };
        info!(
            target = "orchestrator",
            query, vendor = %vendor, page_number, items = page.items.len(),
            total = page.total_records, sku_hits = sku_count, "search complete"
        );

        // Empty pages are also what a soft-failed upstream call yields, so
        // they are not memoized.
        if cacheable && !page.is_empty_page {
            self.cache.put(key, page.clone());
        }
        Ok(page)
    }

    /// Base candidates: the query itself when it is short enough to be a part
    /// number, plus part numbers harvested from a web search for detailed
    /// queries.
    async fn sku_candidates(&self, query: &str) -> IndexSet<String> {
        let mut out = IndexSet::new();
        if query.is_empty() {
            return out;
        }
        if looks_like_sku(query) {
            out.insert(query.to_string());
        }
        if let Some(search) = self.web_search.as_deref() {
            if is_detailed_query(query) {
                let harvested = extract_candidates_from_web_search(search, query).await;
                out.extend(harvested.into_iter().take(self.cfg.max_web_candidates));
            }
        }
        out
    }

    /// Resolve candidates through price & availability, then fetch detail for
    /// each distinct resolved part number.
    async fn sku_attempt(&self, query: &str) -> CatalogResult<Vec<ProductRecord>> {
        let candidates = self.sku_candidates(query).await;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut resolved: IndexMap<String, PriceAvailability> = IndexMap::new();
        for base in &candidates {
            let variants: Vec<String> = generate_variants(base)
                .into_iter()
                .take(self.cfg.max_sku_variants)
                .collect();
            let entries = self.distributor.price_and_availability(&variants).await?;
            for (pn, pa) in entries {
                if pa.is_resolved() {
                    resolved.entry(pn).or_insert(pa);
                }
            }
        }

        let details = join_all(
            resolved
                .keys()
                .map(|pn| self.distributor.get_detail(pn)),
        )
        .await;

        let mut records = Vec::with_capacity(resolved.len());
        for ((_, pa), detail) in resolved.iter().zip(details) {
            records.push(merge_lookup(pa, &detail?));
        }
        debug!(target = "orchestrator", query, candidates = candidates.len(), resolved = records.len(), "sku attempt");
        Ok(records)
    }

    /// SKU hits first, then catalog hits, first occurrence of a part number
    /// wins. Vendor names are canonicalized and unpriced catalog hits get one
    /// batched price lookup.
    async fn merge(
        &self,
        sku_hits: Vec<ProductRecord>,
        catalog: &CatalogPage,
        vendor_filter: &str,
    ) -> CatalogResult<Vec<ProductRecord>> {
        let mut merged: IndexMap<String, ProductRecord> = IndexMap::new();
        let mut from_catalog: Vec<String> = Vec::new();

        for record in sku_hits {
            merged.entry(record.part_number.clone()).or_insert(record);
        }
        for record in &catalog.items {
            if merged.contains_key(&record.part_number) {
                continue;
            }
            from_catalog.push(record.part_number.clone());
            merged.insert(record.part_number.clone(), record.clone());
        }

        for record in merged.values_mut() {
            if record.description.trim().is_empty() {
                record.description = DESCRIPTION_UNAVAILABLE.to_string();
            }
            record.vendor_name = if record.vendor_name.trim().is_empty() {
                if vendor_filter.is_empty() {
                    VENDOR_UNAVAILABLE.to_string()
                } else {
                    vendor_filter.to_string()
                }
            } else if record.vendor_name == VENDOR_UNAVAILABLE {
                record.vendor_name.clone()
            } else {
                normalize_brand(&record.vendor_name)
            };
        }

        if self.cfg.enrich_pricing {
            let unpriced: Vec<String> = from_catalog
                .into_iter()
                .filter(|pn| merged.get(pn).is_some_and(|r| !r.pricing.is_priced()))
                .collect();
            if !unpriced.is_empty() {
                let prices = self.distributor.price_and_availability(&unpriced).await?;
                for (pn, pa) in prices {
                    let Some(record) = merged.get_mut(&pn) else {
                        continue;
                    };
                    if !pa.is_resolved() {
                        continue;
                    }
                    record.pricing = pa.pricing;
                    if record.availability.is_empty() {
                        record.availability = pa.availability;
                    }
                    record.status_code = pa.status_code;
                    record.status_message = pa.status_message;
                }
            }
        }

        Ok(merged.into_values().collect())
    }
}
