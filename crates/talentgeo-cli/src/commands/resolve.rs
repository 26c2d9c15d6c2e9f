//! Batch zip resolution with an explicit cache flush at the end.

use talentgeo_core::AppConfig;

pub async fn run(config: &AppConfig, zips: &[String]) -> anyhow::Result<()> {
    let mut resolver = super::build_resolver(config)?;
    let outcomes = resolver.resolve_batch(zips).await;

    let mut resolved = 0usize;
    let mut invalid = 0usize;
    let mut failed = 0usize;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(Some(r)) => {
                resolved += 1;
                println!(
                    "{}  {:>9.4}, {:>9.4}  {} {}",
                    r.zip,
                    r.coordinate.latitude,
                    r.coordinate.longitude,
                    r.place.as_deref().unwrap_or("-"),
                    r.region.as_deref().unwrap_or("")
                );
            }
            Ok(None) => {
                invalid += 1;
                println!("{}  unresolvable", outcome.input);
            }
            Err(e) => {
                failed += 1;
                println!("{}  failed: {e}", outcome.input);
            }
        }
    }

    resolver.flush_cache()?;
    println!(
        "\n{resolved} resolved, {invalid} unresolvable, {failed} failed; cache now holds {} entries",
        resolver.cache().len()
    );
    Ok(())
}
