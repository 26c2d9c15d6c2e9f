mod api;
mod middleware;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use talentgeo_geocode::{GeoCache, GeocodeClient, ZipResolver};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = talentgeo_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = talentgeo_db::PoolConfig::from_app_config(&config);
    let pool = talentgeo_db::connect_pool(&config.database_url, pool_config).await?;
    talentgeo_db::run_migrations(&pool).await?;

    let regions = talentgeo_core::load_zip_regions(&config.regions_path)?;
    let cache = GeoCache::load(config.geocode_cache_path.clone());
    let client = GeocodeClient::with_base_url(
        config.geocoder_timeout_secs,
        &config.geocoder_base_url,
    )?;
    let resolver = Arc::new(Mutex::new(ZipResolver::new(
        client,
        cache,
        regions,
        config.geocoder_batch_delay_ms,
    )));

    let app = build_app(AppState {
        pool,
        resolver: Arc::clone(&resolver),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "talentgeo server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Persist whatever the serving window geocoded.
    if let Err(e) = resolver.lock().await.flush_cache() {
        tracing::warn!(error = %e, "failed to flush geocode cache on shutdown");
    }
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
