use thiserror::Error;

/// Failure taxonomy for the catalog pipeline.
///
/// Only `Auth` ever reaches a caller of the orchestrator, and `Config` is
/// raised while wiring the service. The other variants are produced inside
/// components and converted to their fail-soft value before crossing a
/// component boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("token exchange failed: {0}")]
    Auth(String),

    #[error("distributor endpoint {endpoint} unavailable: {reason}")]
    UpstreamUnavailable { endpoint: String, reason: String },

    #[error("image provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("part number {0} not found")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub fn upstream(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::UpstreamUnavailable {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn provider(provider: impl Into<String>, reason: impl ToString) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error must abort the whole request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Config(_))
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
