//! Load candidate fixtures from YAML into the candidates table.
//!
//! Development and test convenience only — production imports happen
//! upstream of this repository.

use std::path::Path;

use serde::Deserialize;

use talentgeo_core::{normalize_zip, AppConfig};
use talentgeo_db::NewCandidate;

#[derive(Debug, Deserialize)]
struct SeedFile {
    candidates: Vec<SeedCandidate>,
}

#[derive(Debug, Deserialize)]
struct SeedCandidate {
    full_name: String,
    title: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

pub async fn run(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;
    let candidates = to_new_candidates(seed);

    let pool = super::connect_pool(config).await?;
    talentgeo_db::run_migrations(&pool).await?;
    let inserted = talentgeo_db::insert_candidates(&pool, &candidates).await?;

    println!("inserted {inserted} candidate(s) from {}", file.display());
    Ok(())
}

/// Map fixture rows to insert records, normalizing zips to their canonical
/// 5-digit form so searches and fixtures agree on keys.
fn to_new_candidates(seed: SeedFile) -> Vec<NewCandidate> {
    seed.candidates
        .into_iter()
        .map(|c| NewCandidate {
            full_name: c.full_name,
            title: c.title,
            city: c.city,
            state: c.state,
            zip: c.zip.as_deref().and_then(normalize_zip),
            latitude: c.latitude,
            longitude: c.longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixture_yaml_and_normalizes_zips() {
        let yaml = r"
candidates:
  - full_name: Medina Candidate
    title: Staff Engineer
    city: Medina
    state: OH
    zip: '44256-1234'
    latitude: 41.1434
    longitude: -81.8632
  - full_name: Zip Only
    zip: '501'
";
        let seed: SeedFile = serde_yaml::from_str(yaml).expect("fixture parses");
        let candidates = to_new_candidates(seed);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].zip.as_deref(), Some("44256"));
        assert!(candidates[0].latitude.is_some());
        assert_eq!(candidates[1].zip.as_deref(), Some("00501"));
        assert!(candidates[1].latitude.is_none());
    }

    #[test]
    fn unresolvable_zip_becomes_none() {
        let yaml = r"
candidates:
  - full_name: Bad Zip
    zip: 'xx'
";
        let seed: SeedFile = serde_yaml::from_str(yaml).expect("fixture parses");
        let candidates = to_new_candidates(seed);
        assert!(candidates[0].zip.is_none());
    }
}
