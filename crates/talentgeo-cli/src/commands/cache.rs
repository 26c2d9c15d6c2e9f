//! Durable geocode cache maintenance.

use talentgeo_core::AppConfig;
use talentgeo_geocode::GeoCache;

pub fn stats(config: &AppConfig) -> anyhow::Result<()> {
    let cache = GeoCache::load(config.geocode_cache_path.clone());
    println!("cache file: {}", cache.path().display());
    println!("entries:    {}", cache.len());
    println!("negatives:  {}", cache.negative_count());
    Ok(())
}

pub fn clear(config: &AppConfig) -> anyhow::Result<()> {
    let mut cache = GeoCache::load(config.geocode_cache_path.clone());
    let dropped = cache.len();
    cache.clear()?;
    println!("cleared {dropped} cached entries");
    Ok(())
}
