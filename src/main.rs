//! Price signer service.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST /{*path}  ┌────────┐   ┌──────────────┐   ┌──────────────────┐
//!   ──────────────▶│  http  │──▶│ RelayService │──▶│ SigningPipeline  │
//!                  └────────┘   │ audit begin/ │   │ encode → key →   │
//!   {"tx":"0x…"}               │ success/fail │   │ dry-run → sign   │
//!   ◀──────────────────────────└──────┬───────┘   └────────┬─────────┘
//!                                      │                    │
//!                               ┌──────▼──────┐     ┌───────▼────────┐
//!                               │ AuditStore  │     │ SubstrateClient│──▶ node RPC
//!                               └─────────────┘     └────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use price_signer::config::load_config;
use price_signer::lifecycle::startup;
use price_signer::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "price-signer")]
#[command(about = "Signs price data relays for Substrate reference contracts", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "SIGNER_CONFIG", default_value = "config/signer.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    init_logging(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        bind_address = %config.listener.bind_address,
        "price-signer starting"
    );

    startup::run(config).await
}
