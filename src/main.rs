//! OFITEC import front-end server
//!
//! Entry point: loads configuration, sets up tracing and serves the upload page.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ofitec_web::config::AppConfig;
use ofitec_web::server::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before config so NEXT_PUBLIC_API_BASE can live there
    let _ = dotenv();

    let config = AppConfig::load()?;

    // Initialize tracing (M-LOG-STRUCTURED)
    let json = config.log.json;
    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer().with_target(true)))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    start_server(Arc::new(config)).await
}
