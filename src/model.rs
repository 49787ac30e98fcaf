//! Canonical product shapes shared by the distributor client, the
//! orchestrator and the rendering layer.
//!
//! Records are built fresh per request from one or more upstream calls and
//! are never persisted. The only in-place mutation happens during merge
//! enrichment (description/vendor fill-in and brand canonicalization).

use serde::{Deserialize, Serialize};

/// Distributor status code meaning "no such SKU".
pub const STATUS_NOT_FOUND: &str = "E";

pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available";
pub const VENDOR_UNAVAILABLE: &str = "Brand not available";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub customer_price: Option<f64>,
    pub currency_code: Option<String>,
}

impl Pricing {
    pub fn is_priced(&self) -> bool {
        self.customer_price.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseStock {
    pub location: String,
    pub quantity_available: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityInfo {
    pub total_availability: Option<i64>,
    pub available: Option<bool>,
    #[serde(default)]
    pub availability_by_warehouse: Vec<WarehouseStock>,
}

impl AvailabilityInfo {
    /// Reported total, or the sum of non-negative warehouse quantities when the
    /// upstream omitted it. `None` when neither source carries a number.
    pub fn resolved_total(&self) -> Option<i64> {
        if let Some(total) = self.total_availability {
            return Some(total);
        }
        if self.availability_by_warehouse.is_empty() {
            return None;
        }
        Some(
            self.availability_by_warehouse
                .iter()
                .map(|w| w.quantity_available.max(0))
                .sum(),
        )
    }

    pub fn in_stock(&self) -> bool {
        self.resolved_total().is_some_and(|t| t > 0) || self.available == Some(true)
    }

    /// Warehouses holding stock, in upstream order.
    pub fn stocked_warehouses(&self) -> impl Iterator<Item = &WarehouseStock> {
        self.availability_by_warehouse
            .iter()
            .filter(|w| w.quantity_available > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.total_availability.is_none()
            && self.available.is_none()
            && self.availability_by_warehouse.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub part_number: String,
    pub vendor_part_number: Option<String>,
    pub description: String,
    pub vendor_name: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub availability: AvailabilityInfo,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
}

impl ProductRecord {
    /// Key used by the image cache: vendor part number when present, else the
    /// distributor part number.
    pub fn image_cache_key(&self) -> Option<&str> {
        self.vendor_part_number
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| Some(self.part_number.as_str()).filter(|p| !p.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub name: String,
    pub value: String,
}

/// Detail endpoint payload after translation. An empty value means the
/// upstream call failed or returned nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub part_number: Option<String>,
    pub vendor_part_number: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub vendor_name: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
    pub availability: Option<AvailabilityInfo>,
}

impl ProductDetail {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One entry of a price & availability batch response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceAvailability {
    pub part_number: String,
    pub description: Option<String>,
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub availability: AvailabilityInfo,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
}

impl PriceAvailability {
    /// A lookup resolves to a product iff it carries a part number and the
    /// distributor did not flag it as not found.
    pub fn is_resolved(&self) -> bool {
        !self.part_number.trim().is_empty()
            && self.status_code.as_deref() != Some(STATUS_NOT_FOUND)
    }
}

/// Raw result of one catalog search call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<ProductRecord>,
    pub total_records: u64,
    pub is_empty_page: bool,
}

impl CatalogPage {
    /// The fail-soft value: no items, no records, empty page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_records: 0,
            is_empty_page: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultPage {
    pub items: Vec<ProductRecord>,
    pub total_records: u64,
    pub is_empty_page: bool,
    /// Requested page, clamped down to `total_pages` when the upstream page
    /// came back empty beyond the end.
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub start_record: u64,
    pub end_record: u64,
}
