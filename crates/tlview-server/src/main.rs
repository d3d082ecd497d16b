mod api;
mod middleware;

use std::sync::Arc;

use tlview_history::{
    GooglePlacesClient, HistoryClient, HistorySource, HistoryStore, PlaceDetailsCache,
};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tlview_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = Arc::new(HistoryClient::from_config(&config)?);
    let source = Arc::new(HistorySource::parse(&config.history_source));
    let store = Arc::new(HistoryStore::new());

    if let Err(e) = store.reload(&client, &source).await {
        tracing::error!(
            error = %e,
            %source,
            "initial history load failed; starting with no records"
        );
    }

    let places = match config.google_maps_api_key.as_deref() {
        Some(key) => {
            let lookup = GooglePlacesClient::new(
                &config.places_base_url,
                key,
                config.request_timeout_secs,
                &config.user_agent,
            )?;
            Some(Arc::new(PlaceDetailsCache::new(Box::new(lookup))))
        }
        None => {
            tracing::info!("GOOGLE_MAPS_API_KEY not set; place lookups disabled");
            None
        }
    };

    let app = build_app(AppState {
        store,
        client,
        source,
        places,
        timezone: config.timezone,
        time_format: config.time_format,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "timeline server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
