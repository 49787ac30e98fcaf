// JSON HTTP surface consumed by the storefront rendering layer.
// Every /api/v1 route sits behind the bearer-secret middleware.

pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use server::ApiServer;
