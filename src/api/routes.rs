// API route configuration

use crate::api::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check (no auth required)
        .route("/health", web::get().to(handlers::health_check))
        .route("/", web::get().to(handlers::health_check))
        .service(
            web::scope("/api/v1")
                .route("/search", web::get().to(handlers::search_products))
                .route("/products/{part_number}", web::get().to(handlers::product_detail))
                .route(
                    "/products/{part_number}/image",
                    web::get().to(handlers::product_image),
                )
                .route("/vendors", web::get().to(handlers::list_vendors)),
        );
}
