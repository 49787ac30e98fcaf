// HTTP request handlers for the catalog API

use std::time::Instant;

use actix_web::{web, HttpResponse, Result};

use crate::api::models::*;
use crate::error::CatalogError;
use crate::service::CatalogService;
use crate::vendors::{local_vendors, ALL_BRANDS};

/// Shared application state handed to every worker.
pub struct AppState {
    pub service: CatalogService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: CatalogService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

/// Map a pipeline error to a status code and envelope.
fn error_response(err: &CatalogError) -> HttpResponse {
    let body = ApiResponse::<()>::error(err.to_string());
    match err {
        CatalogError::NotFound(_) => HttpResponse::NotFound().json(body),
        CatalogError::Auth(_)
        | CatalogError::UpstreamUnavailable { .. }
        | CatalogError::ProviderUnavailable { .. } => HttpResponse::BadGateway().json(body),
        CatalogError::Config(_) => HttpResponse::InternalServerError().json(body),
    }
}

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    });
    Ok(HttpResponse::Ok().json(response))
}

/// Hybrid product search with display fields per item.
pub async fn search_products(
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(0);
    tracing::info!(target = "api", q = %query.q, vendor = %query.vendor, page, page_size, "search requested");

    match state
        .service
        .search_cards(&query.q, &query.vendor, page, page_size)
        .await
    {
        Ok(cards) => Ok(HttpResponse::Ok().json(ApiResponse::success(cards))),
        Err(err) => {
            tracing::error!(target = "api", error = %err, "search failed");
            Ok(error_response(&err))
        }
    }
}

pub async fn product_detail(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let part_number = path.into_inner();
    match state.service.product_detail(&part_number).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        Err(err) => {
            tracing::warn!(target = "api", %part_number, error = %err, "product detail failed");
            Ok(error_response(&err))
        }
    }
}

pub async fn product_image(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let part_number = path.into_inner();
    match state.service.resolve_image_for(&part_number).await {
        Ok(image) => Ok(HttpResponse::Ok().json(ApiResponse::success(ImageResponse {
            part_number,
            url: image.url,
            source: image.source,
        }))),
        Err(err) => Ok(error_response(&err)),
    }
}

pub async fn list_vendors() -> Result<HttpResponse> {
    let response = ApiResponse::success(VendorsResponse {
        all_brands: ALL_BRANDS.to_string(),
        vendors: local_vendors().into_iter().map(str::to_string).collect(),
    });
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{auth, routes};
    use crate::config::{CatalogConfig, DistributorConfig, ProviderKeys, SearchConfig};
    use crate::distributor::DistributorApi;
    use crate::error::CatalogResult;
    use crate::model::{CatalogPage, PriceAvailability, ProductDetail, ProductRecord};
    use actix_web::{http::StatusCode, test, App};
    use indexmap::IndexMap;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    const SECRET: &str = "s3cret";

    struct Catalog {
        fail_auth: bool,
    }

    #[async_trait::async_trait]
    impl DistributorApi for Catalog {
        async fn search_catalog(
            &self,
            _query: &str,
            _vendor: &str,
            _page_number: u32,
            _page_size: u32,
        ) -> CatalogResult<CatalogPage> {
            if self.fail_auth {
                return Err(CatalogError::Auth("invalid_client".into()));
            }
            Ok(CatalogPage {
                items: vec![ProductRecord {
                    part_number: "A1".into(),
                    description: "Teclado".into(),
                    vendor_name: "Acteck".into(),
                    ..Default::default()
                }],
                total_records: 1,
                is_empty_page: false,
            })
        }

        async fn price_and_availability(
            &self,
            _part_numbers: &[String],
        ) -> CatalogResult<IndexMap<String, PriceAvailability>> {
            Ok(IndexMap::new())
        }

        async fn get_detail(&self, part_number: &str) -> CatalogResult<ProductDetail> {
            if part_number != "A1" {
                return Ok(ProductDetail::default());
            }
            Ok(ProductDetail {
                part_number: Some("A1".into()),
                description: Some("Teclado".into()),
                vendor_name: Some("Acteck".into()),
                ..Default::default()
            })
        }
    }

    fn state(fail_auth: bool) -> web::Data<AppState> {
        let cfg = CatalogConfig {
            distributor: DistributorConfig::for_base("http://127.0.0.1:1"),
            search: SearchConfig::default(),
            providers: ProviderKeys::default(),
            image_timeout: Duration::from_secs(1),
            image_cache_ttl: None,
            price_markup: 1.10,
        };
        let service = CatalogService::new(Arc::new(Catalog { fail_auth }), None, Vec::new(), &cfg);
        web::Data::new(AppState::new(service))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state)
                    .wrap(auth::Auth::new(SECRET.to_string()))
                    .configure(routes::configure_routes),
            )
            .await
        };
    }

    fn authed(uri: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", format!("Bearer {SECRET}")))
    }

    #[actix_web::test]
    async fn health_needs_no_token() {
        let app = app!(state(false));
        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn api_routes_require_the_secret() {
        let app = app!(state(false));
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/v1/vendors").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/vendors")
                .insert_header(("Authorization", "Bearer wrong"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn search_returns_cards_in_envelope() {
        let app = app!(state(false));
        let body: Value =
            test::call_and_read_body_json(&app, authed("/api/v1/search?q=teclado&page=1").to_request())
                .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_records"], 1);
        assert_eq!(body["data"]["items"][0]["part_number"], "A1");
        assert!(body["data"]["items"][0]["image"]["url"].is_string());
        assert!(body["meta"]["request_id"].is_string());
    }

    #[actix_web::test]
    async fn auth_failure_maps_to_bad_gateway() {
        let app = app!(state(true));
        let resp = test::call_service(&app, authed("/api/v1/search?q=teclado").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn unknown_product_is_404() {
        let app = app!(state(false));
        let resp = test::call_service(&app, authed("/api/v1/products/ZZZ").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn product_image_reports_its_source() {
        let app = app!(state(false));
        let body: Value =
            test::call_and_read_body_json(&app, authed("/api/v1/products/A1/image").to_request()).await;
        assert_eq!(body["data"]["part_number"], "A1");
        assert!(body["data"]["source"].is_string());
    }

    #[actix_web::test]
    async fn vendors_are_listed_with_sentinel() {
        let app = app!(state(false));
        let body: Value =
            test::call_and_read_body_json(&app, authed("/api/v1/vendors").to_request()).await;
        assert_eq!(body["data"]["all_brands"], ALL_BRANDS);
        assert!(body["data"]["vendors"].as_array().is_some_and(|v| !v.is_empty()));
    }
}
