use crate::{Assignment, DEFAULT_REGIONS, RatingTable, SEEDS_PER_REGION};

/// A complete 64-team field where better seeds always have better ratings:
/// each region's #1 is rated 1960 and each step down costs 40 points.
pub(crate) fn full_assignments() -> (RatingTable, Vec<Assignment>) {
    let mut ratings = RatingTable::new();
    let mut rows = Vec::new();
    for region in DEFAULT_REGIONS {
        for seed in 1..=SEEDS_PER_REGION {
            let name = format!("{region} {seed}");
            ratings.insert(name.clone(), 2000.0 - f64::from(seed) * 40.0);
            rows.push(Assignment::new(name, seed, region));
        }
    }
    (ratings, rows)
}
