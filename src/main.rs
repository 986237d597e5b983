//! NRS Pay checkout proxy.
//!
//! ```text
//!   Storefront ──POST /api/nrs/*──▶ ┌──────────────────────────────────┐
//!                                   │  CORS → request id → handler     │
//!                                   │     credentials ─▶ 500           │
//!                                   │     validation  ─▶ 400           │
//!                                   │     mapping                      │
//!                                   │     one POST (Bearer) ───────────┼──▶ NRS Pay
//!   Storefront ◀──token/session/sale┤  relay status + message          │◀──
//!                                   └──────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use nrs_checkout_proxy::config::load_config;
use nrs_checkout_proxy::observability::{logging, metrics};
use nrs_checkout_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "nrs-checkout-proxy")]
#[command(about = "Checkout proxy for the NRS Pay gateway", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "CHECKOUT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_tracing(&config.observability);

    tracing::info!("nrs-checkout-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let creds = &config.gateway.credentials;
    tracing::info!(
        has_api_token = creds.has_api_token(),
        has_dba_id = creds.has_dba_id(),
        has_terminal_id = creds.has_terminal_id(),
        "Loaded NRS credentials"
    );
    if !(creds.has_api_token() && creds.has_dba_id() && creds.has_terminal_id()) {
        tracing::warn!("Gateway credentials incomplete; payment routes will return 500");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        gateway = %config.gateway.base_url,
        client_url = %config.gateway.client_url,
        origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
