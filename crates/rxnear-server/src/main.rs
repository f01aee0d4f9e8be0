mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use rxnear_routing::ConfiguredRouting;
use rxnear_search::{SearchConfig, SearchService};
use rxnear_store::{InMemoryMedicineCatalog, InMemoryPharmacyStore};

use crate::api::{build_app, AppState};
use crate::middleware::RateLimitState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rxnear_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, "starting rxnear-server");

    let pharmacies = rxnear_store::load_pharmacies(&config.pharmacies_path)?;
    let medicines = rxnear_store::load_medicines(&config.medicines_path)?;
    let store = InMemoryPharmacyStore::new(pharmacies);
    let catalog = InMemoryMedicineCatalog::new(medicines);

    let routing = ConfiguredRouting::from_options(
        config.routing_base_url.as_deref(),
        config.routing_timeout_secs,
        config.routing_max_retries,
        config.routing_backoff_base_secs,
    )?;

    let service = SearchService::new(
        store,
        catalog,
        routing,
        SearchConfig::from_app_config(&config),
    );

    let rate_limit = RateLimitState::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    let app = build_app(
        AppState {
            service: Arc::new(service),
        },
        rate_limit,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
