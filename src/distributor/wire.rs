//! Translation from distributor JSON to the canonical model.
//!
//! The distributor is inconsistent about field names and about whether
//! numbers arrive as numbers or strings. All of that drift is absorbed here;
//! nothing else in the crate reads raw upstream JSON.

use serde_json::Value;

use crate::model::{
    AvailabilityInfo, CatalogPage, ImageRef, PriceAvailability, Pricing, ProductAttribute,
    ProductDetail, ProductRecord, WarehouseStock,
};

const IMAGE_LIST_KEYS: &[&str] = &["productImages", "productImageList"];
const IMAGE_URL_KEYS: &[&str] = &["url", "imageUrl", "imageURL"];
const ATTRIBUTE_LIST_KEYS: &[&str] = &["productAttributes", "attributes"];
const ATTRIBUTE_NAME_KEYS: &[&str] = &["name", "attributeName", "key"];
const ATTRIBUTE_VALUE_KEYS: &[&str] = &["value", "attributeValue", "val"];
const LONG_DESCRIPTION_KEYS: &[&str] = &[
    "extraDescription",
    "longDescription",
    "productLongDescription",
    "productLongDescr",
    "description",
];
const CURRENCY_KEYS: &[&str] = &["currencyCode", "currency"];

/// First non-blank string among `keys`. Numbers are rendered as text.
pub fn first_str(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
}

pub(crate) fn value_as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn value_as_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

fn first_array<'a>(v: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .find_map(|k| v.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub fn images(v: &Value) -> Vec<ImageRef> {
    first_array(v, IMAGE_LIST_KEYS)
        .iter()
        .filter_map(|img| first_str(img, IMAGE_URL_KEYS))
        .map(|url| ImageRef { url })
        .collect()
}

pub fn attributes(v: &Value) -> Vec<ProductAttribute> {
    first_array(v, ATTRIBUTE_LIST_KEYS)
        .iter()
        .filter_map(|a| {
            let name = first_str(a, ATTRIBUTE_NAME_KEYS)?;
            let value = first_str(a, ATTRIBUTE_VALUE_KEYS).unwrap_or_default();
            Some(ProductAttribute { name, value })
        })
        .collect()
}

pub fn pricing(v: &Value) -> Pricing {
    let Some(p) = v.get("pricing").filter(|p| p.is_object()) else {
        return Pricing::default();
    };
    Pricing {
        customer_price: p.get("customerPrice").and_then(value_as_f64),
        currency_code: first_str(p, CURRENCY_KEYS),
    }
}

fn warehouse(w: &Value) -> WarehouseStock {
    let location = first_str(w, &["location", "warehouseName"]).unwrap_or_else(|| {
        let id = first_str(w, &["warehouseId"]).unwrap_or_else(|| "?".to_string());
        format!("Warehouse {id}")
    });
    WarehouseStock {
        location,
        quantity_available: w
            .get("quantityAvailable")
            .and_then(value_as_i64)
            .unwrap_or(0),
    }
}

pub fn availability(v: &Value) -> Option<AvailabilityInfo> {
    let av = v.get("availability").filter(|a| a.is_object())?;
    Some(AvailabilityInfo {
        total_availability: av.get("totalAvailability").and_then(value_as_i64),
        available: av.get("available").and_then(value_as_bool),
        availability_by_warehouse: av
            .get("availabilityByWarehouse")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(warehouse).collect())
            .unwrap_or_default(),
    })
}

/// One catalog search hit.
pub fn product_record(v: &Value) -> ProductRecord {
    ProductRecord {
        part_number: first_str(v, &["ingramPartNumber"]).unwrap_or_default(),
        vendor_part_number: first_str(v, &["vendorPartNumber"]),
        description: first_str(v, &["description"]).unwrap_or_default(),
        vendor_name: first_str(v, &["vendorName"]).unwrap_or_default(),
        category: first_str(v, &["category"]),
        sub_category: first_str(v, &["subCategory"]),
        images: images(v),
        pricing: pricing(v),
        availability: availability(v).unwrap_or_default(),
        status_code: first_str(v, &["productStatusCode"]),
        status_message: first_str(v, &["productStatusMessage"]),
    }
}

/// Catalog search body `{catalog: [...], recordsFound}`. Anything else is
/// treated as an empty page.
pub fn catalog_page(body: &Value) -> CatalogPage {
    let items: Vec<ProductRecord> = body
        .get("catalog")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(product_record)
                .filter(|r| !r.part_number.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let total_records = body
        .get("recordsFound")
        .and_then(value_as_i64)
        .map(|n| n.max(0) as u64)
        .unwrap_or(0);
    CatalogPage {
        is_empty_page: items.is_empty(),
        items,
        total_records,
    }
}

pub fn price_availability(v: &Value) -> PriceAvailability {
    PriceAvailability {
        part_number: first_str(v, &["ingramPartNumber"]).unwrap_or_default(),
        description: first_str(v, &["description"]),
        vendor_name: first_str(v, &["vendorName"]),
        pricing: pricing(v),
        availability: availability(v).unwrap_or_default(),
        status_code: first_str(v, &["productStatusCode"]),
        status_message: first_str(v, &["productStatusMessage"]),
    }
}

/// Price & availability body: usually an array, occasionally a bare object
/// for single-item requests.
pub fn price_availability_list(body: &Value) -> Vec<PriceAvailability> {
    match body {
        Value::Array(arr) => arr.iter().map(price_availability).collect(),
        Value::Object(_) => vec![price_availability(body)],
        _ => Vec::new(),
    }
}

pub fn product_detail(v: &Value) -> ProductDetail {
    if !v.is_object() {
        return ProductDetail::default();
    }
    ProductDetail {
        part_number: first_str(v, &["ingramPartNumber"]),
        vendor_part_number: first_str(v, &["vendorPartNumber"]),
        description: first_str(v, &["description"]),
        long_description: first_str(v, LONG_DESCRIPTION_KEYS),
        vendor_name: first_str(v, &["vendorName"]),
        category: first_str(v, &["category"]),
        sub_category: first_str(v, &["subCategory"]),
        images: images(v),
        attributes: attributes(v),
        availability: availability(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_page_reads_items_and_total() {
        let body = json!({
            "recordsFound": "57",
            "catalog": [
                {"ingramPartNumber": "A1", "description": "Mouse", "vendorName": "ACTECK",
                 "productImages": [{"imageUrl": "https://cdn.example.com/a1.jpg"}]},
                {"description": "no part number"}
            ]
        });
        let page = catalog_page(&body);
        assert_eq!(page.total_records, 57);
        assert_eq!(page.items.len(), 1);
        assert!(!page.is_empty_page);
        assert_eq!(page.items[0].images[0].url, "https://cdn.example.com/a1.jpg");
    }

    #[test]
    fn unexpected_catalog_body_is_an_empty_page() {
        let page = catalog_page(&json!(["not", "an", "object"]));
        assert_eq!(page, CatalogPage::empty());
    }

    #[test]
    fn price_entries_accept_string_numbers() {
        let body = json!([{
            "ingramPartNumber": "G59007H",
            "productStatusCode": "W",
            "pricing": {"customerPrice": "1,234.50", "currency": "MXN"},
            "availability": {
                "available": "true",
                "availabilityByWarehouse": [
                    {"warehouseName": "Guadalajara", "quantityAvailable": "3"},
                    {"warehouseId": 40, "quantityAvailable": 2}
                ]
            }
        }]);
        let list = price_availability_list(&body);
        assert_eq!(list.len(), 1);
        let pa = &list[0];
        assert_eq!(pa.pricing.customer_price, Some(1234.5));
        assert_eq!(pa.pricing.currency_code.as_deref(), Some("MXN"));
        assert_eq!(pa.availability.available, Some(true));
        assert_eq!(pa.availability.resolved_total(), Some(5));
        assert_eq!(pa.availability.availability_by_warehouse[1].location, "Warehouse 40");
        assert!(pa.is_resolved());
    }

    #[test]
    fn single_object_price_body_is_accepted() {
        let list = price_availability_list(&json!({"ingramPartNumber": "X", "productStatusCode": "E"}));
        assert_eq!(list.len(), 1);
        assert!(!list[0].is_resolved());
        assert!(price_availability_list(&json!("oops")).is_empty());
    }

    #[test]
    fn detail_maps_field_variants() {
        let body = json!({
            "ingramPartNumber": "G59007H",
            "vendorPartNumber": "AX-2500",
            "description": "Bocinas",
            "productLongDescr": "Bocinas estereo 2.0",
            "productImageList": [{"imageURL": "https://cdn.example.com/g.png"}],
            "attributes": [
                {"attributeName": "Color", "attributeValue": "Negro"},
                {"key": "Potencia", "val": 10},
                {"value": "orphan"}
            ]
        });
        let d = product_detail(&body);
        assert_eq!(d.long_description.as_deref(), Some("Bocinas estereo 2.0"));
        assert_eq!(d.images.len(), 1);
        assert_eq!(
            d.attributes,
            vec![
                ProductAttribute { name: "Color".into(), value: "Negro".into() },
                ProductAttribute { name: "Potencia".into(), value: "10".into() },
            ]
        );
        assert!(d.availability.is_none());
    }

    #[test]
    fn long_description_falls_back_to_description() {
        let d = product_detail(&json!({"description": "Short", "extraDescription": "  "}));
        assert_eq!(d.long_description.as_deref(), Some("Short"));
        assert!(product_detail(&json!(null)).is_empty());
    }
}
