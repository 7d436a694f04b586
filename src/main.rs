use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use queue_browser::broker::InMemoryBroker;
use queue_browser::config::Config;
use queue_browser::dashboard;
use queue_browser::fixture::Fixture;
use queue_browser::naming::InMemoryDirectory;
use queue_browser::QueueBrowserEngine;

// ========================================
// MAIN ENTRY POINT
// ========================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.server.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚀 Queue Browser v{} starting...", env!("CARGO_PKG_VERSION"));

    let broker = InMemoryBroker::new();
    let directory = InMemoryDirectory::new();
    let fixture = match &config.broker.fixture_path {
        Some(path) => {
            info!(path = %path, "loading broker fixture");
            Fixture::load(path)?
        }
        None => Fixture::minimal(&config.naming.factory_name),
    };
    fixture.install(&broker, &directory)?;

    let engine = QueueBrowserEngine::new(Arc::new(directory), config.naming.clone());
    info!(
        factory = %config.naming.factory_name,
        scan_root = %config.naming.scan_root,
        "📦 Naming directory and broker ready"
    );

    dashboard::start_dashboard_server(engine, &config.server).await?;
    Ok(())
}
