use std::sync::Arc;

use hitcounter_api::{AppState, Config, Runtime, build_router};
use hitcounter_core::{DynamoStore, HitStore, MemoryStore};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    let config = Config::from_env()?;
    init_tracing(&config.runtime);

    let store = build_store(&config).await;
    let app = build_router(AppState::new(store, config.environment.is_dev()));

    match config.runtime {
        Runtime::Lambda => {
            info!("starting on the Lambda runtime");
            lambda_http::run(app).await
        }
        Runtime::Local { listen_addr } => {
            let listener = TcpListener::bind(listen_addr).await?;
            info!(%listen_addr, "listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            Ok(())
        }
    }
}

/// JSON lines on Lambda, where CloudWatch adds timestamps; plain text
/// elsewhere.
fn init_tracing(runtime: &Runtime) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match runtime {
        Runtime::Lambda => builder
            .json()
            .with_current_span(false)
            .with_ansi(false)
            .without_time()
            .init(),
        Runtime::Local { .. } => builder.init(),
    }
}

async fn build_store(config: &Config) -> Arc<dyn HitStore> {
    match &config.table_name {
        Some(table) => {
            let store = DynamoStore::new(table.clone(), config.index_name.clone()).await;
            info!(
                table = store.table_name(),
                index = ?store.index_name(),
                "using DynamoDB store"
            );
            Arc::new(store)
        }
        None => {
            warn!("HITS_TABLE_NAME not set, hits are kept in memory");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
