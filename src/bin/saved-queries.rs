//! Saved query HTTP server
//!
//! Usage: `saved-queries [config.yaml]`

use anyhow::Result;
use saved_queries::config::ServiceConfig;
use saved_queries::server::ServerBuilder;
use saved_queries::storage::InMemorySavedQueryStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ServiceConfig::from_yaml_file(&path)?,
        None => ServiceConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let addr = config.bind_address.clone();
    let builder = with_store(ServerBuilder::new(), &config).await?;

    tracing::info!("Starting saved query server on {}", addr);
    builder.with_config(config).serve(&addr).await
}

#[cfg(feature = "postgres")]
async fn with_store(builder: ServerBuilder, config: &ServiceConfig) -> Result<ServerBuilder> {
    use saved_queries::storage::PostgresSavedQueryStore;

    match &config.database_url {
        Some(url) => {
            let store = PostgresSavedQueryStore::connect(url, config.store_timeout()).await?;
            store.migrate().await?;
            tracing::info!("Using PostgreSQL store");
            Ok(builder.with_store(store))
        }
        None => {
            tracing::info!("Using in-memory store");
            Ok(builder.with_store(InMemorySavedQueryStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn with_store(builder: ServerBuilder, config: &ServiceConfig) -> Result<ServerBuilder> {
    if config.database_url.is_some() {
        anyhow::bail!("database_url is set but the server was built without the `postgres` feature");
    }
    tracing::info!("Using in-memory store");
    Ok(builder.with_store(InMemorySavedQueryStore::new()))
}
