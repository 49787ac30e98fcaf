// HTTP API server binary for the storefront catalog

use anyhow::{Context, Result};
use storefront_catalog::api::ApiServer;
use storefront_catalog::config::{CatalogConfig, LOGGED_ENV_KEYS, REQUIRED_ENV_KEYS};
use storefront_catalog::service::CatalogService;
use storefront_catalog::tracing::init_tracing;
use storefront_catalog::util::env as env_util;

#[actix_web::main]
async fn main() -> Result<()> {
    init_tracing("info,actix_web=info,reqwest=warn")?;

    // Load dotenv/env once (safe to call multiple times)
    env_util::init_env();
    env_util::preflight_check("api_server", REQUIRED_ENV_KEYS, LOGGED_ENV_KEYS)?;

    let server = ApiServer::from_env()?;
    let cfg = CatalogConfig::from_env().context("loading catalog configuration")?;
    let service = CatalogService::from_config(cfg)?;

    server.run(service).await?;

    Ok(())
}
