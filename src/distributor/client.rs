use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use indexmap::IndexMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::token::{TokenManager, TokenSource};
use super::{wire, DistributorApi};
use crate::config::DistributorConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::model::{CatalogPage, PriceAvailability, ProductDetail};

const CATALOG_PATH: &str = "/resellers/v6/catalog";
const PRICE_AVAILABILITY_PATH: &str = "/resellers/v6/catalog/priceandavailability";
const DETAIL_PATH: &str = "/resellers/v6/catalog/details";

/// reqwest-backed distributor client. Cheap to clone.
#[derive(Clone)]
pub struct IngramClient {
    cfg: DistributorConfig,
    http: Client,
    tokens: Arc<dyn TokenSource>,
}

impl IngramClient {
    pub fn new(cfg: DistributorConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent("storefront-catalog/1.0")
            .timeout(cfg.timeout)
            .build()
            .context("failed to construct distributor HTTP client")?;
        let tokens = Arc::new(TokenManager::new(
            http.clone(),
            &cfg.token_url,
            &cfg.client_id,
            &cfg.client_secret,
        ));
        Ok(Self { cfg, http, tokens })
    }

    /// Same client with an externally owned token source.
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.cfg.api_base, path)
    }

    fn with_headers(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.bearer_auth(token)
            .header("IM-CustomerNumber", &self.cfg.customer_number)
            .header("IM-SenderID", &self.cfg.sender_id)
            .header("IM-CorrelationID", correlation_id())
            .header("IM-CountryCode", &self.cfg.country_code)
            .header("Accept-Language", &self.cfg.language)
            .header("Content-Type", "application/json")
    }

    /// Send with bounded linear backoff on 429/5xx/transport errors. The
    /// token is acquired up front so an `Auth` failure aborts immediately.
    async fn execute<F>(&self, endpoint: &str, build: F) -> CatalogResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = self.tokens.token().await?;
        let mut attempt = 0u32;
        loop {
            match self.with_headers(build(), &token).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp);
                    }
                    if status == StatusCode::UNAUTHORIZED {
                        self.tokens.invalidate().await;
                        return Err(CatalogError::upstream(endpoint, "unauthorized; token dropped"));
                    }
                    let retryable =
                        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    if !retryable || attempt >= self.cfg.max_retries {
                        let text = resp.text().await.unwrap_or_default();
                        return Err(CatalogError::upstream(
                            endpoint,
                            format!("status {status}: {}", truncate(&text, 200)),
                        ));
                    }
                    debug!(target = "distributor", endpoint, %status, attempt, "retrying");
                }
                Err(err) => {
                    if attempt >= self.cfg.max_retries {
                        return Err(CatalogError::upstream(endpoint, err));
                    }
                    debug!(target = "distributor", endpoint, error = %err, attempt, "retrying after transport error");
                }
            }
            let wait = self.cfg.backoff_ms * u64::from(attempt + 1);
            tokio::time::sleep(Duration::from_millis(wait)).await;
            attempt += 1;
        }
    }

    async fn execute_json<F>(&self, endpoint: &str, build: F) -> CatalogResult<Value>
    where
        F: Fn() -> RequestBuilder,
    {
        let resp = self.execute(endpoint, build).await?;
        resp.json::<Value>()
            .await
            .map_err(|e| CatalogError::upstream(endpoint, format!("malformed body: {e}")))
    }
}

fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Keep `Auth` errors, turn everything else into `fallback` with a warning.
fn soften<T>(endpoint: &str, result: CatalogResult<T>, fallback: T) -> CatalogResult<T> {
    match result {
        Ok(v) => Ok(v),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!(target = "distributor", endpoint, error = %err, "upstream call failed soft");
            Ok(fallback)
        }
    }
}

#[async_trait::async_trait]
impl DistributorApi for IngramClient {
    async fn search_catalog(
        &self,
        query: &str,
        vendor: &str,
        page_number: u32,
        page_size: u32,
    ) -> CatalogResult<CatalogPage> {
        let url = self.url(CATALOG_PATH);
        let mut params: Vec<(&str, String)> = vec![
            ("pageSize", page_size.to_string()),
            ("pageNumber", page_number.to_string()),
            ("showGroupInfo", "false".to_string()),
        ];
        if !query.trim().is_empty() {
            params.push(("searchString", query.trim().to_string()));
            params.push(("searchInDescription", "true".to_string()));
        }
        if !vendor.trim().is_empty() {
            params.push(("vendorName", vendor.trim().to_string()));
        }

        let result = self
            .execute_json(CATALOG_PATH, || self.http.get(&url).query(&params))
            .await
            .map(|body| wire::catalog_page(&body));
        let page = soften(CATALOG_PATH, result, CatalogPage::empty())?;
        debug!(
            target = "distributor",
            query, vendor, page_number, items = page.items.len(), total = page.total_records,
            "catalog search"
        );
        Ok(page)
    }

    async fn price_and_availability(
        &self,
        part_numbers: &[String],
    ) -> CatalogResult<IndexMap<String, PriceAvailability>> {
        if part_numbers.is_empty() {
            return Ok(IndexMap::new());
        }
        let url = self.url(PRICE_AVAILABILITY_PATH);
        let body = json!({
            "products": part_numbers
                .iter()
                .map(|pn| json!({ "ingramPartNumber": pn }))
                .collect::<Vec<_>>()
        });
        let params = [
            ("includeAvailability", "true"),
            ("includePricing", "true"),
            ("includeProductAttributes", "true"),
        ];

        let result = self
            .execute_json(PRICE_AVAILABILITY_PATH, || {
                self.http.post(&url).query(&params).json(&body)
            })
            .await
            .map(|body| {
                wire::price_availability_list(&body)
                    .into_iter()
                    .filter(|pa| !pa.part_number.is_empty())
                    .map(|pa| (pa.part_number.clone(), pa))
                    .collect::<IndexMap<_, _>>()
            });
        soften(PRICE_AVAILABILITY_PATH, result, IndexMap::new())
    }

    async fn get_detail(&self, part_number: &str) -> CatalogResult<ProductDetail> {
        let pn = part_number.trim();
        if pn.is_empty() {
            return Ok(ProductDetail::default());
        }
        let url = format!(
            "{}/{}",
            self.url(DETAIL_PATH),
            urlencoding::encode(pn)
        );
        let result = self
            .execute_json(DETAIL_PATH, || self.http.get(&url))
            .await
            .map(|body| wire::product_detail(&body));
        soften(DETAIL_PATH, result, ProductDetail::default())
    }
}
