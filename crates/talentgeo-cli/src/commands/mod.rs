pub mod cache;
pub mod resolve;
pub mod search;
pub mod seed;

use talentgeo_core::AppConfig;
use talentgeo_geocode::{GeoCache, GeocodeClient, ZipResolver};

/// Build the full resolver stack from config: durable cache, remote
/// client, and the shipped region table.
pub(crate) fn build_resolver(config: &AppConfig) -> anyhow::Result<ZipResolver> {
    let regions = talentgeo_core::load_zip_regions(&config.regions_path)?;
    let cache = GeoCache::load(config.geocode_cache_path.clone());
    let client =
        GeocodeClient::with_base_url(config.geocoder_timeout_secs, &config.geocoder_base_url)?;
    Ok(ZipResolver::new(
        client,
        cache,
        regions,
        config.geocoder_batch_delay_ms,
    ))
}

pub(crate) async fn connect_pool(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = talentgeo_db::PoolConfig::from_app_config(config);
    let pool = talentgeo_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}
