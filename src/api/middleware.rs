// Request logging, compression and CORS

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, Logger};

pub fn setup_middleware() -> (Logger, Compress) {
    let logger = Logger::new(r#"%a "%r" %s %b %Dms"#);
    let compress = Compress::default();
    (logger, compress)
}

/// Read-only API: GET and preflight from the configured origins.
pub fn setup_cors(allowed_origins: &str) -> Cors {
    allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .fold(
            Cors::default()
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600),
            |cors, origin| cors.allowed_origin(origin),
        )
}
