//! Per-product image resolution as an ordered list of strategies.
//!
//! Each step is a plain function over the record so it can be exercised on
//! its own; [`ImageResolver::resolve`] walks them in [`STRATEGY_ORDER`] and
//! stops at the first hit. The placeholder step always produces a URL.

use std::collections::HashSet;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::providers::ImageSearchProvider;
use super::tables::{brand_color, brand_logo, category_image, COLOR_ACCENT, COLOR_DARK, COLOR_NEUTRAL};
use super::validate::{is_usable_native_image, is_valid_image_url};
use crate::cache::ImageCache;
use crate::model::ProductRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Native,
    Cache,
    Category,
    ExternalSearch,
    BrandLogo,
    Placeholder,
}

pub const STRATEGY_ORDER: [ImageSource; 6] = [
    ImageSource::Native,
    ImageSource::Cache,
    ImageSource::Category,
    ImageSource::ExternalSearch,
    ImageSource::BrandLogo,
    ImageSource::Placeholder,
];

impl ImageSource {
    /// Results from these steps are written back into the image cache.
    pub fn writes_through(self) -> bool {
        !matches!(self, Self::Native | Self::Cache)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedImage {
    pub url: String,
    pub source: ImageSource,
}

const PLACEHOLDER_MAX_FIELD: usize = 20;
const PLACEHOLDER_MAX_TEXT: usize = 25;
const PLACEHOLDER_DEFAULT_TEXT: &str = "IT DATA GLOBAL";
const MIN_VPN_QUERY_LEN: usize = 3;

pub struct ImageResolver {
    cache: ImageCache,
    providers: Vec<Arc<dyn ImageSearchProvider>>,
}

impl ImageResolver {
    pub fn new(cache: ImageCache, providers: Vec<Arc<dyn ImageSearchProvider>>) -> Self {
        Self { cache, providers }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub async fn resolve(&self, record: &ProductRecord) -> ResolvedImage {
        let key = record.image_cache_key();
        for step in STRATEGY_ORDER {
            let Some(url) = self.run_step(step, record, key).await else {
                continue;
            };
            if step.writes_through() {
                if let Some(k) = key {
                    self.cache.put(k, &url);
                }
            }
            debug!(target = "images", part_number = %record.part_number, source = ?step, %url, "image resolved");
            return ResolvedImage { url, source: step };
        }
        // The placeholder step never declines.
        ResolvedImage {
            url: placeholder_url(record),
            source: ImageSource::Placeholder,
        }
    }

    async fn run_step(
        &self,
        step: ImageSource,
        record: &ProductRecord,
        key: Option<&str>,
    ) -> Option<String> {
        match step {
            ImageSource::Native => native_image(record),
            ImageSource::Cache => key.and_then(|k| self.cache.get(k)),
            ImageSource::Category => category_image_for(record).map(str::to_string),
            ImageSource::ExternalSearch => search_providers(&self.providers, record).await,
            ImageSource::BrandLogo => brand_logo(&record.vendor_name).map(str::to_string),
            ImageSource::Placeholder => Some(placeholder_url(record)),
        }
    }
}

/// First distributor image, if it is usable.
pub fn native_image(record: &ProductRecord) -> Option<String> {
    record
        .images
        .first()
        .map(|img| img.url.trim())
        .filter(|url| is_usable_native_image(url))
        .map(str::to_string)
}

pub fn category_image_for(record: &ProductRecord) -> Option<&'static str> {
    let text = format!(
        "{} {} {} {}",
        record.description,
        record.vendor_name,
        record.category.as_deref().unwrap_or_default(),
        record.sub_category.as_deref().unwrap_or_default()
    );
    category_image(&text)
}

fn first_word(text: &str) -> &str {
    text.split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| !c.is_alphanumeric())
}

fn squash(parts: &[&str]) -> Option<String> {
    let joined = parts.iter().flat_map(|p| p.split_whitespace()).join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Most specific search phrase the record supports: vendor part number with
/// brand, then SKU with brand, then category/subcategory, then brand with a
/// short description, then the bare SKU.
pub fn build_search_query(record: &ProductRecord) -> Option<String> {
    let brand = record.vendor_name.trim();
    let sku = record.part_number.trim();
    let desc = record.description.trim();
    let vpn = record.vendor_part_number.as_deref().unwrap_or_default().trim();
    let category = record.category.as_deref().unwrap_or_default().trim();
    let sub_category = record.sub_category.as_deref().unwrap_or_default().trim();

    if vpn.chars().count() > MIN_VPN_QUERY_LEN {
        return squash(&[brand, vpn, first_word(desc)]);
    }
    if !sku.is_empty() && !brand.is_empty() {
        return squash(&[brand, sku]);
    }
    if !category.is_empty() && !sub_category.is_empty() {
        return squash(&[brand, category, sub_category, first_word(desc)]);
    }
    if !brand.is_empty() && !desc.is_empty() {
        let cleaned = desc.replace(',', "").replace('-', " ");
        let short = cleaned.split_whitespace().take(3).join(" ");
        return squash(&[brand, &short]);
    }
    if !sku.is_empty() {
        return Some(sku.to_string());
    }
    squash(&[category, sub_category])
}

/// Query strings from most to least specific.
pub fn progressive_queries(base: &str) -> Vec<String> {
    vec![
        format!("{base} technology product"),
        format!("{base} tech device"),
        format!("{base} computer"),
        base.to_string(),
    ]
}

/// Try each query against each provider until a valid image turns up. A
/// provider that errors is skipped for the rest of this record.
pub async fn search_providers(
    providers: &[Arc<dyn ImageSearchProvider>],
    record: &ProductRecord,
) -> Option<String> {
    if providers.is_empty() {
        return None;
    }
    let base = build_search_query(record)?;
    let mut disabled: HashSet<&'static str> = HashSet::new();

    for query in progressive_queries(&base) {
        for provider in providers {
            if disabled.contains(provider.name()) {
                continue;
            }
            match provider.search(&query).await {
                Ok(urls) => {
                    if let Some(url) = urls.into_iter().find(|u| is_valid_image_url(u)) {
                        return Some(url);
                    }
                }
                Err(err) => {
                    debug!(target = "images", provider = provider.name(), %query, error = %err, "provider failed; skipping");
                    disabled.insert(provider.name());
                }
            }
        }
        if disabled.len() == providers.len() {
            break;
        }
    }
    None
}

/// Synthetic placeholder carrying the most identifying short text available.
pub fn placeholder_url(record: &ProductRecord) -> String {
    let (text, color) = placeholder_text(record);
    let encoded: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("https://via.placeholder.com/400x400/{color}/FFFFFF?text={encoded}&font_size=16")
}

fn fits(value: &str) -> bool {
    !value.is_empty() && value.chars().count() <= PLACEHOLDER_MAX_FIELD
}

fn placeholder_text(record: &ProductRecord) -> (String, &'static str) {
    let vpn = record.vendor_part_number.as_deref().unwrap_or_default().trim();
    let brand = record.vendor_name.trim();
    let sku = record.part_number.trim();
    let desc = record.description.trim();

    if fits(vpn) {
        return (format!("P/N: {vpn}"), COLOR_ACCENT);
    }
    if fits(brand) {
        return (brand.to_uppercase(), brand_color(brand));
    }
    if fits(sku) {
        return (format!("SKU: {sku}"), COLOR_ACCENT);
    }
    if !desc.is_empty() {
        let mut text = desc.replace(',', "").split_whitespace().take(3).join(" ").to_uppercase();
        if text.chars().count() > PLACEHOLDER_MAX_TEXT {
            text = text.chars().take(PLACEHOLDER_MAX_TEXT).collect::<String>() + "...";
        }
        return (text, COLOR_NEUTRAL);
    }
    (PLACEHOLDER_DEFAULT_TEXT.to_string(), COLOR_DARK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, CatalogResult};
    use crate::model::ImageRef;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        urls: Vec<String>,
        fail: bool,
    }

    impl CountingProvider {
        fn new(urls: &[&str], fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                urls: urls.iter().map(|s| s.to_string()).collect(),
                fail,
            })
        }
    }

    #[async_trait::async_trait]
    impl ImageSearchProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }
        async fn search(&self, _query: &str) -> CatalogResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CatalogError::provider("counting", "boom"));
            }
            Ok(self.urls.clone())
        }
    }

    fn record(pn: &str, vpn: Option<&str>, desc: &str, brand: &str) -> ProductRecord {
        ProductRecord {
            part_number: pn.to_string(),
            vendor_part_number: vpn.map(str::to_string),
            description: desc.to_string(),
            vendor_name: brand.to_string(),
            ..Default::default()
        }
    }

    fn resolver(provider: Arc<CountingProvider>) -> ImageResolver {
        let providers: Vec<Arc<dyn ImageSearchProvider>> = vec![provider];
        ImageResolver::new(ImageCache::new(None), providers)
    }

    #[tokio::test]
    async fn native_image_skips_every_provider() {
        let provider = CountingProvider::new(&["https://cdn.example.com/x.jpg"], false);
        let r = resolver(provider.clone());
        let mut rec = record("G59007H", Some("AX-2500"), "Bocinas", "Acteck");
        rec.images.push(ImageRef {
            url: "https://cdn.example.com/g59007h.png".into(),
        });
        let out = r.resolve(&rec).await;
        assert_eq!(out.source, ImageSource::Native);
        assert_eq!(out.url, "https://cdn.example.com/g59007h.png");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        // Native hits are not cached.
        assert!(r.cache().get("AX-2500").is_none());
    }

    #[tokio::test]
    async fn cache_hit_short_circuits() {
        let provider = CountingProvider::new(&[], false);
        let r = resolver(provider.clone());
        r.cache().put("AX-2500", "https://cdn.example.com/cached.jpg");
        let out = r
            .resolve(&record("G59007H", Some("AX-2500"), "Laptop", "HP"))
            .await;
        assert_eq!(out.source, ImageSource::Cache);
        assert_eq!(out.url, "https://cdn.example.com/cached.jpg");
    }

    #[tokio::test]
    async fn category_match_is_written_through() {
        let provider = CountingProvider::new(&[], false);
        let r = resolver(provider.clone());
        let rec = record("A1", None, "Teclado inalambrico", "Acteck");
        let out = r.resolve(&rec).await;
        assert_eq!(out.source, ImageSource::Category);
        assert_eq!(r.cache().get("A1").as_deref(), Some(out.url.as_str()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn external_search_returns_first_valid_url() {
        let provider = CountingProvider::new(
            &["https://example.com/products/q1", "https://cdn.example.com/hit.png"],
            false,
        );
        let r = resolver(provider.clone());
        let out = r.resolve(&record("Q1", None, "Zqx unit", "Zyxxq")).await;
        assert_eq!(out.source, ImageSource::ExternalSearch);
        assert_eq!(out.url, "https://cdn.example.com/hit.png");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_provider_falls_through_to_logo() {
        let provider = CountingProvider::new(&[], true);
        let r = resolver(provider.clone());
        let out = r.resolve(&record("Q2", None, "Zqx unit", "Kingston")).await;
        assert_eq!(out.source, ImageSource::BrandLogo);
        // Disabled after the first error.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn placeholder_is_the_last_resort() {
        let provider = CountingProvider::new(&[], false);
        let r = resolver(provider.clone());
        let out = r.resolve(&record("Q3", Some("ZQ-1"), "Zqx unit", "Zyxxq")).await;
        assert_eq!(out.source, ImageSource::Placeholder);
        assert_eq!(
            out.url,
            "https://via.placeholder.com/400x400/F15A29/FFFFFF?text=P%2FN%3A+ZQ-1&font_size=16"
        );
        // Empty result lists mean every progressive query was tried.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        assert_eq!(r.cache().get("ZQ-1").as_deref(), Some(out.url.as_str()));
    }

    #[test]
    fn query_priority() {
        let mut rec = record("G59007H", Some("AX-2500"), "Bocinas estereo", "Acteck");
        assert_eq!(build_search_query(&rec).as_deref(), Some("Acteck AX-2500 Bocinas"));

        rec.vendor_part_number = Some("AX".into());
        assert_eq!(build_search_query(&rec).as_deref(), Some("Acteck G59007H"));

        let mut rec = record("", None, "Bocinas, estereo - negras extra", "Acteck");
        rec.category = Some("Audio".into());
        rec.sub_category = Some("Speakers".into());
        assert_eq!(build_search_query(&rec).as_deref(), Some("Acteck Audio Speakers Bocinas"));

        rec.sub_category = None;
        assert_eq!(build_search_query(&rec).as_deref(), Some("Acteck Bocinas estereo negras"));

        assert_eq!(build_search_query(&record("SKU1", None, "", "")).as_deref(), Some("SKU1"));
        assert_eq!(build_search_query(&ProductRecord::default()), None);
    }

    #[test]
    fn progressive_queries_broaden() {
        assert_eq!(
            progressive_queries("HP X1"),
            vec!["HP X1 technology product", "HP X1 tech device", "HP X1 computer", "HP X1"]
        );
    }

    #[test]
    fn placeholder_text_priority() {
        let (t, c) = placeholder_text(&record("P", None, "", "Lenovo"));
        assert_eq!((t.as_str(), c), ("LENOVO", COLOR_ACCENT));

        let (t, c) = placeholder_text(&record("SKU123", None, "", ""));
        assert_eq!((t.as_str(), c), ("SKU: SKU123", COLOR_ACCENT));

        let long = "x".repeat(21);
        let (t, c) = placeholder_text(&record(&long, None, "audifonos inalambricos extraordinarios, negros", &long));
        assert_eq!(t, "AUDIFONOS INALAMBRICOS EX...");
        assert_eq!(c, COLOR_NEUTRAL);

        let (t, c) = placeholder_text(&ProductRecord::default());
        assert_eq!((t.as_str(), c), ("IT DATA GLOBAL", COLOR_DARK));
    }
}
