//! Radius search against the candidates store.

use talentgeo_core::AppConfig;
use talentgeo_db::SearchStrategy;

pub async fn run(
    config: &AppConfig,
    zip: &str,
    radius_miles: f64,
    strategy: Option<&str>,
) -> anyhow::Result<()> {
    let strategy = strategy
        .map(str::parse::<SearchStrategy>)
        .transpose()
        .map_err(anyhow::Error::from)?;

    let pool = super::connect_pool(config).await?;
    let mut resolver = super::build_resolver(config)?;

    let search =
        talentgeo_db::find_within_radius(&pool, &mut resolver, zip, radius_miles, strategy).await?;

    println!(
        "center {} ({:.4}, {:.4}) [{}], strategy {}, {} match(es) within {radius_miles} mi",
        search.center_zip,
        search.center.latitude,
        search.center.longitude,
        search.center_source,
        search.strategy,
        search.matches.len()
    );

    for m in &search.matches {
        println!(
            "{:>7.1} mi  {}  {}",
            m.distance_miles,
            m.full_name,
            [m.city.as_deref(), m.state.as_deref(), m.zip.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    // Center resolution may have geocoded a fresh zip; keep it.
    resolver.flush_cache()?;
    Ok(())
}
