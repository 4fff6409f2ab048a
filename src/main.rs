//! Demo server: an axum app with the auth dispatcher mounted in front of it.
//!
//! ```text
//! client ─▶ request id ─▶ trace ─▶ CORS ─▶ dispatcher ─┬─▶ recipe API (/auth/...)
//!                                                      └─▶ app routes (/sessioninfo)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use supertokens::config::{load_config, ServerConfig};
use supertokens::http::HttpServer;
use supertokens::observability::{logging, metrics};
use supertokens::recipe::session::{self, SessionConfig};
use supertokens::TypeInput;

#[derive(Parser, Debug)]
#[command(name = "supertokens-demo", version, about = "Auth dispatcher demo server")]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        config = ?cli.config,
        bind_address = %config.listener.bind_address,
        "supertokens-demo v{} starting",
        env!("CARGO_PKG_VERSION")
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

    let st = supertokens::init(TypeInput {
        app_info: config.app_info.clone(),
        supertokens: config.supertokens.clone(),
        recipe_list: vec![session::init(Some(SessionConfig {
            settings: config.session.clone(),
            override_apis: None,
        }))],
        ..Default::default()
    })?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(st)?.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
