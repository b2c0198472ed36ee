mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tripboard_tour::TourApiClient;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tripboard_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = build_client(&config)?;
    let app = build_app(AppState { client });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "tripboard-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Builds the upstream client when a service key is configured.
///
/// A missing key is fatal in production; elsewhere the server starts with
/// place lookups disabled.
fn build_client(config: &tripboard_core::AppConfig) -> anyhow::Result<Option<Arc<TourApiClient>>> {
    let Some(key) = config.tour_api_service_key.as_deref() else {
        if config.env == tripboard_core::Environment::Production {
            anyhow::bail!("TOUR_API_SERVICE_KEY is required in production");
        }
        tracing::warn!("TOUR_API_SERVICE_KEY not set; place detail endpoint disabled");
        return Ok(None);
    };

    let client = TourApiClient::with_base_url(
        key,
        &config.mobile_app,
        config.request_timeout_secs,
        &config.tour_api_base_url,
    )?
    .with_retry(config.max_retries, config.retry_backoff_base_ms);
    Ok(Some(Arc::new(client)))
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
