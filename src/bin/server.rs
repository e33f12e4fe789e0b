//! SwiftQueue server binary.
//!
//! Usage: `swiftqueue-server [config.properties]`. Without a file the defaults
//! apply; SWIFTQUEUE_HOST, SWIFTQUEUE_PORT and SWIFTQUEUE_LOG_DIR override
//! either.

use std::sync::Arc;
use swiftqueue::observability::observability;
use swiftqueue::{server, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("swiftqueue=info".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(path = %path, "loading configuration");
            ServerConfig::from_properties_file(&path)?
        }
        None => {
            info!("no config file provided, using default configuration");
            ServerConfig::default()
        }
    }
    .apply_env();
    config.validate()?;

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received shutdown signal"),
            Err(e) => {
                warn!("cannot listen for shutdown signal: {}", e);
                std::future::pending::<()>().await
            }
        }
    };
    server::serve_with_shutdown(Arc::new(config), listener, shutdown).await?;
    info!(
        "server shutdown complete\n{}",
        observability().render_prometheus().trim_end()
    );
    Ok(())
}
