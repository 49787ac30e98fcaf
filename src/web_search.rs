//! Secondary web search used to turn a descriptive query into part numbers.
//!
//! Only the SKU candidate generator calls into this. Every failure is logged
//! and swallowed; a broken search engine must never fail a catalog request.

use std::time::Duration;

use indexmap::IndexSet;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::normalization::sku::{harvest_part_numbers, is_detailed_query};

pub const SERPAPI_SEARCH_URL: &str = "https://serpapi.com/search.json";

/// Link fragment identifying the distributor's own product pages.
pub const DISTRIBUTOR_DOMAIN: &str = "ingrammicro";

const RESULTS_PER_QUERY: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

#[async_trait::async_trait]
pub trait SkuWebSearch: Send + Sync {
    /// Organic hits for `query`, scoped to the distributor's sites.
    async fn search(&self, query: &str) -> CatalogResult<Vec<WebHit>>;
}

pub struct SerpApiWebSearch {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl SerpApiWebSearch {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent("storefront-catalog/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: SERPAPI_SEARCH_URL.to_string(),
        })
    }

    /// Point the client at another endpoint (local test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl SkuWebSearch for SerpApiWebSearch {
    async fn search(&self, query: &str) -> CatalogResult<Vec<WebHit>> {
        let scoped = format!("{query} site:ingrammicro.com OR site:ingrammicro.mx");
        let num = RESULTS_PER_QUERY.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("engine", "google"),
                ("q", scoped.as_str()),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::provider("serpapi", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::provider("serpapi", format!("status {status}")));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| CatalogError::provider("serpapi", e))?;
        Ok(parse_organic_results(&body))
    }
}

fn parse_organic_results(body: &Value) -> Vec<WebHit> {
    let field = |v: &Value, key: &str| {
        v.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    body.get("organic_results")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(|r| WebHit {
                    title: field(r, "title"),
                    snippet: field(r, "snippet"),
                    link: field(r, "link"),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Part-number candidates harvested from a web search for `query`.
///
/// Returns an empty set without searching when the query is not detailed.
pub async fn extract_candidates_from_web_search(
    search: &dyn SkuWebSearch,
    query: &str,
) -> IndexSet<String> {
    if !is_detailed_query(query) {
        return IndexSet::new();
    }
    match search.search(query).await {
        Ok(hits) => {
            let found = harvest_part_numbers(&hits, DISTRIBUTOR_DOMAIN);
            debug!(target = "web_search", query, hits = hits.len(), candidates = found.len(), "harvested part numbers");
            found
        }
        Err(err) => {
            warn!(target = "web_search", query, error = %err, "web search failed; continuing without candidates");
            IndexSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse, HttpServer};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type SeenParams = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn spawn_serpapi(status: u16, body: Value, seen: SeenParams) -> String {
        let server = HttpServer::new(move || {
            let body = body.clone();
            let seen = seen.clone();
            App::new().route(
                "/search.json",
                web::get().to(move |params: web::Query<HashMap<String, String>>| {
                    let body = body.clone();
                    let seen = seen.clone();
                    async move {
                        seen.lock().expect("lock").push(params.into_inner());
                        HttpResponse::build(
                            actix_web::http::StatusCode::from_u16(status)
                                .unwrap_or(actix_web::http::StatusCode::OK),
                        )
                        .json(body)
                    }
                }),
            )
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}/search.json")
    }

    fn serpapi(endpoint: &str) -> SerpApiWebSearch {
        SerpApiWebSearch::new("serp-key", Duration::from_secs(5))
            .expect("client")
            .with_endpoint(endpoint)
    }

    struct FakeSearch {
        hits: Vec<WebHit>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl SkuWebSearch for FakeSearch {
        async fn search(&self, _query: &str) -> CatalogResult<Vec<WebHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CatalogError::provider("fake", "timeout"));
            }
            Ok(self.hits.clone())
        }
    }

    fn fake(fail: bool) -> FakeSearch {
        FakeSearch {
            hits: vec![WebHit {
                title: "Bocinas Acteck AX2500".into(),
                snippet: "modelo ax2500 negro".into(),
                link: "https://www.ingrammicro.com/mx/p/ZZ12345678-bocinas".into(),
            }],
            fail,
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn plain_queries_skip_the_search() {
        let search = fake(false);
        let out = extract_candidates_from_web_search(&search, "G59007H").await;
        assert!(out.is_empty());
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn detailed_queries_harvest_candidates() {
        let search = fake(false);
        let out =
            extract_candidates_from_web_search(&search, "BOCINAS ACTECK AX-2500 / 3.5 mm").await;
        assert!(out.contains("AX2500"));
        assert!(out.contains("ZZ12345678"));
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_yield_nothing() {
        let search = fake(true);
        let out = extract_candidates_from_web_search(&search, "bocina bluetooth 10w").await;
        assert!(out.is_empty());
    }

    #[actix_web::test]
    async fn serpapi_scopes_query_and_reads_organic_results() {
        let seen = SeenParams::default();
        let url = spawn_serpapi(
            200,
            json!({"organic_results": [
                {"title": "Bocinas Acteck AX2500", "snippet": "modelo ax2500", "link": "https://www.ingrammicro.com/mx/p/ZZ12345678-bocinas"},
                {"title": "Otra tienda", "link": "https://example.com/p/1"}
            ]}),
            seen.clone(),
        )
        .await;
        let search = serpapi(&url);

        let hits = search.search("bocinas acteck ax-2500").await.expect("hits");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Bocinas Acteck AX2500");
        assert_eq!(hits[0].link, "https://www.ingrammicro.com/mx/p/ZZ12345678-bocinas");
        assert_eq!(hits[1].snippet, "");

        let params = seen.lock().expect("lock")[0].clone();
        assert_eq!(
            params["q"],
            "bocinas acteck ax-2500 site:ingrammicro.com OR site:ingrammicro.mx"
        );
        assert_eq!(params["engine"], "google");
        assert_eq!(params["api_key"], "serp-key");
        assert_eq!(params["num"], "10");

        let found =
            extract_candidates_from_web_search(&search, "BOCINAS ACTECK AX-2500 / 3.5 mm").await;
        assert!(found.contains("ZZ12345678"));
        assert!(found.contains("AX2500"));
    }

    #[actix_web::test]
    async fn serpapi_server_error_yields_no_candidates() {
        let seen = SeenParams::default();
        let url = spawn_serpapi(500, json!({"error": "boom"}), seen.clone()).await;
        let search = serpapi(&url);

        let err = search.search("bocina bluetooth 10w").await.expect_err("5xx");
        assert!(matches!(err, CatalogError::ProviderUnavailable { .. }));

        let found = extract_candidates_from_web_search(&search, "bocina bluetooth 10w").await;
        assert!(found.is_empty());
        assert_eq!(seen.lock().expect("lock").len(), 2);
    }

    #[test]
    fn organic_results_tolerate_missing_fields() {
        let body = json!({"organic_results": [{"title": "A"}, {"link": "https://x"}]});
        let hits = parse_organic_results(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].snippet, "");
        assert_eq!(hits[1].link, "https://x");
        assert!(parse_organic_results(&json!({})).is_empty());
    }
}
