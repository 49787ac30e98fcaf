use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber for the `api_server` and `catalog` binaries.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies, e.g.
/// `"info,actix_web=info,reqwest=warn"` for the server. Lines carry the event
/// target (`orchestrator`, `distributor.token`, ...) and source location.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))
}
