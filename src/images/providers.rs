//! External image search providers. Each returns candidate URLs in provider
//! ranking order; validation happens in the resolver.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::config::ProviderKeys;
use crate::error::{CatalogError, CatalogResult};

pub const UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";
pub const GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const SERPAPI_URL: &str = "https://serpapi.com/search";
pub const BING_IMAGES_URL: &str = "https://api.bing.microsoft.com/v7.0/images/search";

#[async_trait::async_trait]
pub trait ImageSearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> CatalogResult<Vec<String>>;
}

fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    Ok(Client::builder()
        .user_agent("storefront-catalog/1.0")
        .timeout(timeout)
        .build()?)
}

/// Send and decode a provider request. Rate limiting (403/429) and every
/// other non-success status surface as `ProviderUnavailable`.
async fn fetch_json(provider: &'static str, req: RequestBuilder) -> CatalogResult<Value> {
    let resp = req
        .send()
        .await
        .map_err(|e| CatalogError::provider(provider, e))?;
    let status = resp.status();
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(CatalogError::provider(provider, format!("rate limited ({status})")));
    }
    if !status.is_success() {
        return Err(CatalogError::provider(provider, format!("status {status}")));
    }
    resp.json::<Value>()
        .await
        .map_err(|e| CatalogError::provider(provider, format!("malformed body: {e}")))
}

/// Collect the first present string among `keys` from each element of
/// `body[list_key]`, where a key may address a nested object (`"urls.regular"`).
fn collect_urls(body: &Value, list_key: &str, keys: &[&str]) -> Vec<String> {
    let Some(items) = body.get(list_key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            keys.iter().find_map(|key| {
                key.split('.')
                    .try_fold(item, |v, part| v.get(part))
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .collect()
}

pub struct UnsplashProvider {
    http: Client,
    access_key: String,
    endpoint: String,
}

impl UnsplashProvider {
    pub fn new(access_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            access_key: access_key.to_string(),
            endpoint: UNSPLASH_SEARCH_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl ImageSearchProvider for UnsplashProvider {
    fn name(&self) -> &'static str {
        "unsplash"
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<String>> {
        let req = self
            .http
            .get(&self.endpoint)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query),
                ("per_page", "5"),
                ("orientation", "squarish"),
                ("content_filter", "high"),
                ("order_by", "relevant"),
            ]);
        let body = fetch_json(self.name(), req).await?;
        Ok(collect_urls(&body, "results", &["urls.regular", "urls.small", "urls.thumb"]))
    }
}

pub struct GoogleImageProvider {
    http: Client,
    api_key: String,
    cse_id: String,
    endpoint: String,
}

impl GoogleImageProvider {
    pub fn new(api_key: &str, cse_id: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key: api_key.to_string(),
            cse_id: cse_id.to_string(),
            endpoint: GOOGLE_CSE_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl ImageSearchProvider for GoogleImageProvider {
    fn name(&self) -> &'static str {
        "google_cse"
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<String>> {
        let req = self.http.get(&self.endpoint).query(&[
            ("key", self.api_key.as_str()),
            ("cx", self.cse_id.as_str()),
            ("q", query),
            ("searchType", "image"),
            ("num", "3"),
            ("imgSize", "medium"),
            ("safe", "active"),
        ]);
        let body = fetch_json(self.name(), req).await?;
        Ok(collect_urls(&body, "items", &["link"]))
    }
}

pub struct SerpApiImageProvider {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl SerpApiImageProvider {
    pub fn new(api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key: api_key.to_string(),
            endpoint: SERPAPI_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl ImageSearchProvider for SerpApiImageProvider {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<String>> {
        let req = self.http.get(&self.endpoint).query(&[
            ("engine", "google_images"),
            ("q", query),
            ("api_key", self.api_key.as_str()),
            ("num", "5"),
            ("ijn", "0"),
        ]);
        let body = fetch_json(self.name(), req).await?;
        Ok(collect_urls(&body, "images_results", &["original", "thumbnail"]))
    }
}

pub struct BingImageProvider {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl BingImageProvider {
    pub fn new(api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key: api_key.to_string(),
            endpoint: BING_IMAGES_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl ImageSearchProvider for BingImageProvider {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<String>> {
        let req = self
            .http
            .get(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("count", "5"),
                ("offset", "0"),
                ("mkt", "en-us"),
                ("imageType", "Photo"),
            ]);
        let body = fetch_json(self.name(), req).await?;
        Ok(collect_urls(&body, "value", &["contentUrl"]))
    }
}

/// Providers enabled by the configured keys, in resolution order.
pub fn providers_from_keys(
    keys: &ProviderKeys,
    timeout: Duration,
) -> anyhow::Result<Vec<Arc<dyn ImageSearchProvider>>> {
    let mut out: Vec<Arc<dyn ImageSearchProvider>> = Vec::new();
    if let Some(key) = &keys.unsplash_key {
        out.push(Arc::new(UnsplashProvider::new(key, timeout)?));
    }
    if let (Some(key), Some(cx)) = (&keys.google_api_key, &keys.google_cse_id) {
        out.push(Arc::new(GoogleImageProvider::new(key, cx, timeout)?));
    }
    if let Some(key) = &keys.serpapi_key {
        out.push(Arc::new(SerpApiImageProvider::new(key, timeout)?));
    }
    if let Some(key) = &keys.bing_key {
        out.push(Arc::new(BingImageProvider::new(key, timeout)?));
    }
    Ok(out)
}
