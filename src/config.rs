use std::time::Duration;

use anyhow::Result;
use url::Url;

use crate::error::{CatalogError, CatalogResult};
use crate::util::env::{env_flag, env_opt, env_parse, env_parse_opt, env_req};

pub const DEFAULT_API_BASE: &str = "https://api.ingrammicro.com";
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_RECORDS: u64 = 10_000;

/// Credentials and request headers for the distributor API.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    pub api_base: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub customer_number: String,
    pub sender_id: String,
    pub country_code: String,
    pub language: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl DistributorConfig {
    /// Config pointed at `api_base` with empty credentials; tests and tools
    /// fill in what they need.
    pub fn for_base(api_base: &str) -> Self {
        let api_base = api_base.trim_end_matches('/').to_string();
        Self {
            token_url: format!("{api_base}/oauth/oauth20/token"),
            api_base,
            client_id: String::new(),
            client_secret: String::new(),
            customer_number: String::new(),
            sender_id: String::new(),
            country_code: String::new(),
            language: "es-MX".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 0,
            backoff_ms: 0,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_base = env_opt("INGRAM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let mut cfg = Self::for_base(&api_base);
        if let Some(token_url) = env_opt("INGRAM_TOKEN_URL") {
            cfg.token_url = token_url;
        }
        cfg.client_id = env_req("INGRAM_CLIENT_ID")?;
        cfg.client_secret = env_req("INGRAM_CLIENT_SECRET")?;
        cfg.customer_number = env_opt("INGRAM_CUSTOMER_NUMBER").unwrap_or_default();
        cfg.sender_id = env_opt("INGRAM_SENDER_ID").unwrap_or_default();
        cfg.country_code = env_opt("INGRAM_COUNTRY_CODE").unwrap_or_default();
        if let Some(lang) = env_opt("INGRAM_LANGUAGE") {
            cfg.language = lang;
        }
        cfg.timeout = Duration::from_secs(env_parse("CATALOG_HTTP_TIMEOUT_SECS", 10u64).max(1));
        cfg.max_retries = env_parse("CATALOG_MAX_RETRIES", 2u32);
        cfg.backoff_ms = env_parse("CATALOG_BACKOFF_MS", 300u64);
        Ok(cfg)
    }

    /// Reject settings no request could succeed with: blank credentials or
    /// endpoints that are not absolute http(s) URLs.
    pub fn validate(&self) -> CatalogResult<()> {
        for (name, value) in [("api_base", &self.api_base), ("token_url", &self.token_url)] {
            let ok = Url::parse(value)
                .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
                .unwrap_or(false);
            if !ok {
                return Err(CatalogError::Config(format!(
                    "{name} must be an http(s) URL, got {value:?}"
                )));
            }
        }
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(CatalogError::Config(
                "client id and client secret must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tuning knobs for the hybrid search orchestrator.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_page_size: u32,
    pub max_records: u64,
    pub max_sku_variants: usize,
    pub max_web_candidates: usize,
    pub enrich_pricing: bool,
    pub cache_ttl: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_records: DEFAULT_MAX_RECORDS,
            max_sku_variants: 5,
            max_web_candidates: 8,
            enrich_pricing: true,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.default_page_size = env_parse("CATALOG_PAGE_SIZE", DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        cfg.max_records = env_parse("CATALOG_MAX_RECORDS", DEFAULT_MAX_RECORDS).max(1);
        cfg.max_sku_variants = env_parse("SKU_MAX_VARIANTS", 5usize).max(1);
        cfg.max_web_candidates = env_parse("SKU_MAX_WEB_CANDIDATES", 8usize);
        cfg.enrich_pricing = env_flag("CATALOG_ENRICH_PRICING", true);
        cfg.cache_ttl = Duration::from_secs(env_parse("SEARCH_CACHE_TTL_SECS", 86_400u64));
        cfg
    }
}

/// Keys for the optional image and web search providers. Each provider is
/// enabled only when its key (pair) is present.
#[derive(Debug, Clone, Default)]
pub struct ProviderKeys {
    pub serpapi_key: Option<String>,
    pub unsplash_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    pub bing_key: Option<String>,
}

impl ProviderKeys {
    pub fn from_env() -> Self {
        Self {
            serpapi_key: env_opt("SERPAPI_KEY"),
            unsplash_key: env_opt("UNSPLASH_ACCESS_KEY"),
            google_api_key: env_opt("GOOGLE_API_KEY"),
            google_cse_id: env_opt("GOOGLE_CSE_ID").or_else(|| env_opt("GOOGLE_SEARCH_ENGINE_ID")),
            bing_key: env_opt("BING_IMAGE_API_KEY"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub distributor: DistributorConfig,
    pub search: SearchConfig,
    pub providers: ProviderKeys,
    pub image_timeout: Duration,
    /// `None` keeps resolved images for the life of the process.
    pub image_cache_ttl: Option<Duration>,
    pub price_markup: f64,
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            distributor: DistributorConfig::from_env()?,
            search: SearchConfig::from_env(),
            providers: ProviderKeys::from_env(),
            image_timeout: Duration::from_secs(env_parse("IMAGE_HTTP_TIMEOUT_SECS", 6u64).max(1)),
            image_cache_ttl: env_parse_opt::<u64>("IMAGE_CACHE_TTL_SECS").map(Duration::from_secs),
            price_markup: env_parse("PRICE_MARKUP", 1.10f64),
        })
    }
}

/// Keys worth echoing in the startup configuration snapshot.
pub const LOGGED_ENV_KEYS: &[&str] = &[
    "INGRAM_API_BASE",
    "INGRAM_CLIENT_ID",
    "INGRAM_CLIENT_SECRET",
    "INGRAM_CUSTOMER_NUMBER",
    "INGRAM_COUNTRY_CODE",
    "INGRAM_LANGUAGE",
    "SEARCH_CACHE_TTL_SECS",
    "IMAGE_CACHE_TTL_SECS",
    "SERPAPI_KEY",
    "UNSPLASH_ACCESS_KEY",
    "GOOGLE_API_KEY",
    "BING_IMAGE_API_KEY",
];

pub const REQUIRED_ENV_KEYS: &[&str] = &["INGRAM_CLIENT_ID", "INGRAM_CLIENT_SECRET"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_base_derives_token_url() {
        let cfg = DistributorConfig::for_base("http://127.0.0.1:9000/");
        assert_eq!(cfg.api_base, "http://127.0.0.1:9000");
        assert_eq!(cfg.token_url, "http://127.0.0.1:9000/oauth/oauth20/token");
        assert_eq!(cfg.language, "es-MX");
    }

    #[test]
    fn validation_rejects_unusable_settings() {
        let mut cfg = DistributorConfig::for_base("https://api.ingrammicro.com");
        assert!(matches!(cfg.validate(), Err(CatalogError::Config(_))));

        cfg.client_id = "id".into();
        cfg.client_secret = "secret".into();
        assert!(cfg.validate().is_ok());

        cfg.token_url = "ftp://api.ingrammicro.com/token".into();
        assert!(matches!(cfg.validate(), Err(CatalogError::Config(_))));

        let mut relative = DistributorConfig::for_base("api.ingrammicro.com");
        relative.client_id = "id".into();
        relative.client_secret = "secret".into();
        let err = relative.validate().expect_err("relative base");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("api_base"));
    }

    #[test]
    fn search_defaults_match_storefront() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.default_page_size, 25);
        assert_eq!(cfg.max_records, 10_000);
        assert_eq!(cfg.max_sku_variants, 5);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(86_400));
    }
}
