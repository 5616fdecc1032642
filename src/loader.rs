use anyhow::{Context, Result, bail};
use log::{info, warn};
use mmsim_engine::{Assignment, DEFAULT_REGIONS, FIELD_SIZE, RatingTable, SEEDS_PER_REGION};
use ncaa_api::FieldEntry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "ELO")]
    elo: String,
    #[serde(rename = "Seed", default)]
    seed: Option<String>,
    #[serde(rename = "Region", default)]
    region: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct FieldRow {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Seed")]
    seed: String,
    #[serde(rename = "Region")]
    region: String,
}

/// A ratings file, plus the field when the file carries seeds and regions.
#[derive(Debug, Default)]
pub struct LoadedRatings {
    pub ratings: RatingTable,
    pub assignments: Vec<Assignment>,
}

pub fn load_ratings(path: &Path) -> Result<LoadedRatings> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open ratings file: {}", path.display()))?;

    let mut loaded = LoadedRatings::default();
    let mut skipped = 0usize;
    for (line, row) in reader.deserialize::<RatingRow>().enumerate() {
        let row = row.with_context(|| format!("{}: bad row {}", path.display(), line + 2))?;
        let team = row.team.trim();
        if team.is_empty() {
            skipped += 1;
            continue;
        }
        let Some(rating) = parse_rating(&row.elo) else {
            warn!("{}: could not read rating '{}' for {team}", path.display(), row.elo.trim());
            skipped += 1;
            continue;
        };
        loaded.ratings.insert(team, rating);

        let seed = row.seed.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let region = row.region.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let (Some(seed), Some(region)) = (seed, region) {
            loaded.assignments.push(Assignment::new(team, parse_seed(seed, team)?, region));
        }
    }

    info!(
        "loaded {} ratings from {} ({} rows skipped, {} seeded)",
        loaded.ratings.len(),
        path.display(),
        skipped,
        loaded.assignments.len()
    );
    Ok(loaded)
}

pub fn load_field(path: &Path) -> Result<Vec<Assignment>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open tournament file: {}", path.display()))?;

    let mut assignments = Vec::new();
    for (line, row) in reader.deserialize::<FieldRow>().enumerate() {
        let row = row.with_context(|| format!("{}: bad row {}", path.display(), line + 2))?;
        let team = row.team.trim();
        assignments.push(Assignment::new(team, parse_seed(&row.seed, team)?, row.region.trim()));
    }
    info!("loaded {} field entries from {}", assignments.len(), path.display());
    Ok(assignments)
}

/// Write a fetched field as `Team,Seed,Region`, creating the directory if needed.
pub fn write_field(path: &Path, entries: &[FieldEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create tournament file: {}", path.display()))?;
    for entry in entries {
        writer.serialize(FieldRow {
            team: entry.team.clone(),
            seed: entry.seed.to_string(),
            region: entry.region.clone(),
        })?;
    }
    writer.flush()?;
    info!("wrote {} field entries to {}", entries.len(), path.display());
    Ok(())
}

/// Problems worth flagging before the engine rejects or pads the field.
pub fn field_warnings(assignments: &[Assignment]) -> Vec<String> {
    let mut warnings = Vec::new();
    if assignments.len() < FIELD_SIZE {
        warnings.push(format!(
            "field has {} teams, expected {FIELD_SIZE}; open slots become TBD",
            assignments.len()
        ));
    }

    let mut seeds_by_region: BTreeMap<&str, BTreeSet<u8>> = BTreeMap::new();
    for a in assignments {
        seeds_by_region.entry(a.region.as_str()).or_default().insert(a.seed);
    }
    if seeds_by_region.len() != DEFAULT_REGIONS.len() {
        warnings.push(format!(
            "field has {} regions, expected {}: {}",
            seeds_by_region.len(),
            DEFAULT_REGIONS.len(),
            seeds_by_region.keys().copied().collect::<Vec<_>>().join(", ")
        ));
    }
    for (region, seeds) in &seeds_by_region {
        let missing: Vec<String> = (1..=SEEDS_PER_REGION)
            .filter(|s| !seeds.contains(s))
            .map(|s| s.to_string())
            .collect();
        if !missing.is_empty() {
            warnings.push(format!("{region} is missing seeds {}", missing.join(", ")));
        }
    }
    warnings
}

/// `"1,834.5"` → 1834.5
fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().replace(',', "").parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Accepts `"5"` and spreadsheet-style `"5.0"`.
fn parse_seed(raw: &str, team: &str) -> Result<u8> {
    let raw = raw.trim();
    let value = match raw.parse::<i64>() {
        Ok(v) => v,
        Err(_) => match raw.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 => f as i64,
            _ => bail!("invalid seed '{raw}' for {team}"),
        },
    };
    u8::try_from(value).with_context(|| format!("invalid seed {value} for {team}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn full_field() -> Vec<Assignment> {
        DEFAULT_REGIONS
            .iter()
            .flat_map(|r| (1..=SEEDS_PER_REGION).map(move |s| Assignment::new(format!("{r} {s}"), s, *r)))
            .collect()
    }

    #[test]
    fn test_ratings_strip_separators_and_ignore_extra_columns() {
        let file = csv_file("Rank,Team,Record,ELO,ELO_Delta\n1,Duke,30-3,\"2,101.5\",+4\n2,Houston,29-4,2050,-1\n");
        let loaded = load_ratings(file.path()).unwrap();
        assert_eq!(loaded.ratings.len(), 2);
        assert_eq!(loaded.ratings.get("Duke"), Some(2101.5));
        assert_eq!(loaded.ratings.get("Houston"), Some(2050.0));
        assert!(loaded.assignments.is_empty());
    }

    #[test]
    fn test_unreadable_ratings_are_skipped() {
        let file = csv_file("Team,ELO\nDuke,n/a\nAuburn,1990\n,1500\n");
        let loaded = load_ratings(file.path()).unwrap();
        assert_eq!(loaded.ratings.len(), 1);
        assert!(loaded.ratings.contains("Auburn"));
    }

    #[test]
    fn test_ratings_file_can_carry_the_field() {
        let file = csv_file("Team,ELO,Seed,Region\nDuke,2100,1.0,East\nAuburn,2080,1,South\nBoise St.,1700,,\n");
        let loaded = load_ratings(file.path()).unwrap();
        assert_eq!(loaded.ratings.len(), 3);
        assert_eq!(
            loaded.assignments,
            vec![Assignment::new("Duke", 1, "East"), Assignment::new("Auburn", 1, "South")]
        );
    }

    #[test]
    fn test_missing_ratings_file_names_the_path() {
        let err = load_ratings(Path::new("no/such/ratings.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/ratings.csv"));
    }

    #[test]
    fn test_field_round_trips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2026").join("tournament_teams.csv");
        let entries = vec![FieldEntry::new("Duke", 1, "East"), FieldEntry::new("St. John's", 2, "West")];
        write_field(&path, &entries).unwrap();

        let header = fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("Team,Seed,Region\n"));
        assert_eq!(
            load_field(&path).unwrap(),
            vec![Assignment::new("Duke", 1, "East"), Assignment::new("St. John's", 2, "West")]
        );
    }

    #[test]
    fn test_bad_seed_is_an_error() {
        let file = csv_file("Team,Seed,Region\nDuke,one,East\n");
        let err = load_field(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Duke"));
        let file = csv_file("Team,Seed,Region\nDuke,-1,East\n");
        assert!(load_field(file.path()).is_err());
    }

    #[test]
    fn test_complete_field_has_no_warnings() {
        assert!(field_warnings(&full_field()).is_empty());
    }

    #[test]
    fn test_short_field_warns_about_count_and_missing_seeds() {
        let mut field = full_field();
        field.retain(|a| !(a.region == "West" && (a.seed == 11 || a.seed == 16)));
        let warnings = field_warnings(&field);
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(warnings[0].contains("62 teams"));
        assert_eq!(warnings[1], "West is missing seeds 11, 16");
    }

    #[test]
    fn test_extra_region_is_flagged() {
        let mut field = full_field();
        field.push(Assignment::new("Stray", 1, "North"));
        let warnings = field_warnings(&field);
        assert!(warnings.iter().any(|w| w.contains("5 regions")));
        assert!(warnings.iter().any(|w| w.starts_with("North is missing seeds 2,")));
    }
}
