//! Display helpers for the rendering layer: availability wording, marked-up
//! prices and the product detail view.

use itertools::Itertools;
use serde::Serialize;

use crate::images::ResolvedImage;
use crate::model::{
    AvailabilityInfo, PriceAvailability, Pricing, ProductAttribute, ProductDetail, ProductRecord,
    STATUS_NOT_FOUND, VENDOR_UNAVAILABLE,
};
use crate::normalization::text::normalize_brand;

pub const LONG_DESCRIPTION_FALLBACK: &str =
    "This product offers quality and performance backed by Ingram Micro.";
pub const NOT_AVAILABLE: &str = "Not available";

/// Warehouses listed as examples in the availability line.
const MAX_LISTED_WAREHOUSES: usize = 3;

/// Human-readable availability. The price entry's availability is preferred,
/// the detail's is the fallback, and the status code/message is used when
/// neither carries availability.
pub fn availability_text(pa: Option<&PriceAvailability>, detail: Option<&ProductDetail>) -> String {
    let av = pa
        .map(|p| &p.availability)
        .filter(|a| !a.is_empty())
        .or_else(|| detail.and_then(|d| d.availability.as_ref()).filter(|a| !a.is_empty()));
    describe_availability(
        av,
        pa.and_then(|p| p.status_code.as_deref()),
        pa.and_then(|p| p.status_message.as_deref()),
    )
}

/// Availability wording for an already merged record.
pub fn record_availability_text(record: &ProductRecord) -> String {
    describe_availability(
        Some(&record.availability).filter(|a| !a.is_empty()),
        record.status_code.as_deref(),
        record.status_message.as_deref(),
    )
}

fn describe_availability(
    av: Option<&AvailabilityInfo>,
    status_code: Option<&str>,
    status_message: Option<&str>,
) -> String {
    if let Some(av) = av {
        if !av.in_stock() {
            return "Out of stock".to_string();
        }
        let total = av.resolved_total();
        let listed = av
            .stocked_warehouses()
            .take(MAX_LISTED_WAREHOUSES)
            .map(|w| format!("{}: {}", w.location, w.quantity_available))
            .join(", ");
        return match (total, listed.is_empty()) {
            (Some(t), false) => format!("Available: {t} units (e.g. {listed})"),
            (Some(t), true) => format!("Available: {t} units"),
            (None, _) => "Available".to_string(),
        };
    }

    let message = status_message.map(str::trim).filter(|m| !m.is_empty());
    match status_code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) if code == STATUS_NOT_FOUND => message.unwrap_or("Not found").to_string(),
        Some(code) => message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Status: {code}")),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Customer price times `markup`, rounded to cents.
pub fn marked_up_price(pricing: &Pricing, markup: f64) -> Option<f64> {
    pricing
        .customer_price
        .filter(|p| p.is_finite())
        .map(|p| (p * markup * 100.0).round() / 100.0)
}

pub fn display_price(pricing: &Pricing, markup: f64) -> Option<String> {
    marked_up_price(pricing, markup)
        .map(|amount| format_currency(amount, pricing.currency_code.as_deref()))
}

/// `"MXN 1,234.50"`; the code prefix is dropped when absent.
pub fn format_currency(amount: f64, currency_code: Option<&str>) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(",");
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    match currency_code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => format!("{code} {sign}{grouped}.{frac_part}"),
        None => format!("{sign}{grouped}.{frac_part}"),
    }
}

/// Search hit with the display fields the rendering layer needs.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    #[serde(flatten)]
    pub record: ProductRecord,
    pub image: ResolvedImage,
    pub availability_text: String,
    pub display_price: Option<String>,
}

impl ProductCard {
    pub fn new(record: ProductRecord, image: ResolvedImage, markup: f64) -> Self {
        Self {
            availability_text: record_availability_text(&record),
            display_price: display_price(&record.pricing, markup),
            record,
            image,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailView {
    pub part_number: String,
    pub vendor_part_number: Option<String>,
    pub title: String,
    pub vendor_name: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub long_description: String,
    pub attributes: Vec<ProductAttribute>,
    pub image: ResolvedImage,
    pub price: Option<f64>,
    pub display_price: String,
    pub availability_text: String,
    pub status_code: Option<String>,
}

impl ProductDetailView {
    /// Assemble the view from one detail call and at most one price entry.
    /// `record` is the merged record the image was resolved from.
    pub fn build(
        record: &ProductRecord,
        detail: &ProductDetail,
        pa: Option<&PriceAvailability>,
        image: ResolvedImage,
        markup: f64,
    ) -> Self {
        let vendor = detail
            .vendor_name
            .as_deref()
            .map(normalize_brand)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| VENDOR_UNAVAILABLE.to_string());
        let pricing = pa.map(|p| p.pricing.clone()).unwrap_or_default();
        Self {
            part_number: record.part_number.clone(),
            vendor_part_number: record.vendor_part_number.clone(),
            title: record.description.clone(),
            vendor_name: vendor,
            category: record.category.clone(),
            sub_category: record.sub_category.clone(),
            long_description: detail
                .long_description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| LONG_DESCRIPTION_FALLBACK.to_string()),
            attributes: normalize_attributes(&detail.attributes),
            image,
            price: marked_up_price(&pricing, markup),
            display_price: display_price(&pricing, markup)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            availability_text: availability_text(pa, Some(detail)),
            status_code: pa.and_then(|p| p.status_code.clone()),
        }
    }
}

/// Trimmed attributes with a name, first occurrence of each name kept.
fn normalize_attributes(attrs: &[ProductAttribute]) -> Vec<ProductAttribute> {
    attrs
        .iter()
        .filter_map(|a| {
            let name = a.name.trim();
            (!name.is_empty()).then(|| ProductAttribute {
                name: name.to_string(),
                value: a.value.trim().to_string(),
            })
        })
        .unique_by(|a| a.name.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageSource;
    use crate::model::WarehouseStock;

    fn stock(entries: &[(&str, i64)]) -> Vec<WarehouseStock> {
        entries
            .iter()
            .map(|(loc, qty)| WarehouseStock {
                location: loc.to_string(),
                quantity_available: *qty,
            })
            .collect()
    }

    fn pa_with(av: AvailabilityInfo) -> PriceAvailability {
        PriceAvailability {
            part_number: "G59007H".into(),
            availability: av,
            status_code: Some("W".into()),
            ..Default::default()
        }
    }

    #[test]
    fn lists_up_to_three_stocked_warehouses() {
        let pa = pa_with(AvailabilityInfo {
            availability_by_warehouse: stock(&[("A", 3), ("B", 0), ("C", 5), ("D", 1), ("E", 2)]),
            ..Default::default()
        });
        assert_eq!(
            availability_text(Some(&pa), None),
            "Available: 11 units (e.g. A: 3, C: 5, D: 1)"
        );
    }

    #[test]
    fn empty_warehouses_are_skipped_in_the_listing() {
        let pa = pa_with(AvailabilityInfo {
            availability_by_warehouse: stock(&[("A", 3), ("B", 0), ("C", 5)]),
            ..Default::default()
        });
        assert_eq!(
            availability_text(Some(&pa), None),
            "Available: 8 units (e.g. A: 3, C: 5)"
        );
    }

    #[test]
    fn availability_wording_variants() {
        let total_only = pa_with(AvailabilityInfo {
            total_availability: Some(7),
            ..Default::default()
        });
        assert_eq!(availability_text(Some(&total_only), None), "Available: 7 units");

        let flag_only = pa_with(AvailabilityInfo {
            available: Some(true),
            ..Default::default()
        });
        assert_eq!(availability_text(Some(&flag_only), None), "Available");

        let empty_stock = pa_with(AvailabilityInfo {
            total_availability: Some(0),
            available: Some(false),
            ..Default::default()
        });
        assert_eq!(availability_text(Some(&empty_stock), None), "Out of stock");
    }

    #[test]
    fn detail_availability_is_the_fallback() {
        let pa = pa_with(AvailabilityInfo::default());
        let detail = ProductDetail {
            availability: Some(AvailabilityInfo {
                total_availability: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(availability_text(Some(&pa), Some(&detail)), "Available: 2 units");
    }

    #[test]
    fn status_is_used_without_availability() {
        let mut pa = PriceAvailability {
            part_number: "X".into(),
            status_code: Some("E".into()),
            ..Default::default()
        };
        assert_eq!(availability_text(Some(&pa), None), "Not found");
        pa.status_message = Some("Product not found".into());
        assert_eq!(availability_text(Some(&pa), None), "Product not found");
        pa.status_code = Some("W".into());
        pa.status_message = None;
        assert_eq!(availability_text(Some(&pa), None), "Status: W");
        assert_eq!(availability_text(None, None), NOT_AVAILABLE);
    }

    #[test]
    fn currency_is_grouped_and_prefixed() {
        assert_eq!(format_currency(1234.5, Some("MXN")), "MXN 1,234.50");
        assert_eq!(format_currency(1_234_567.891, Some("USD")), "USD 1,234,567.89");
        assert_eq!(format_currency(12.0, None), "12.00");
        assert_eq!(format_currency(999.999, Some("")), "1,000.00");
        assert_eq!(format_currency(-1500.0, Some("MXN")), "MXN -1,500.00");
    }

    #[test]
    fn markup_is_applied_and_rounded() {
        let pricing = Pricing {
            customer_price: Some(1000.0),
            currency_code: Some("MXN".into()),
        };
        assert_eq!(marked_up_price(&pricing, 1.10), Some(1100.0));
        assert_eq!(display_price(&pricing, 1.10).as_deref(), Some("MXN 1,100.00"));
        assert_eq!(display_price(&Pricing::default(), 1.10), None);
    }

    #[test]
    fn detail_view_fills_fallbacks() {
        let record = ProductRecord {
            part_number: "G59007H".into(),
            description: "Bocinas".into(),
            ..Default::default()
        };
        let detail = ProductDetail {
            vendor_name: Some("perfecto grote".into()),
            attributes: vec![
                ProductAttribute { name: " Color ".into(), value: " Negro ".into() },
                ProductAttribute { name: "".into(), value: "x".into() },
                ProductAttribute { name: "color".into(), value: "Rojo".into() },
            ],
            ..Default::default()
        };
        let image = ResolvedImage {
            url: "https://example.com/p.png".into(),
            source: ImageSource::Placeholder,
        };
        let view = ProductDetailView::build(&record, &detail, None, image, 1.10);
        assert_eq!(view.vendor_name, "Perfect Choice");
        assert_eq!(view.long_description, LONG_DESCRIPTION_FALLBACK);
        assert_eq!(view.display_price, NOT_AVAILABLE);
        assert_eq!(view.availability_text, NOT_AVAILABLE);
        assert_eq!(
            view.attributes,
            vec![ProductAttribute { name: "Color".into(), value: "Negro".into() }]
        );
    }
}
