use crate::error::{BracketError, BracketResult};
use crate::ratings::RatingTable;
use crate::{DEFAULT_REGIONS, Entrant, FIELD_SIZE, FIRST_ROUND_PAIRINGS, SEEDS_PER_REGION, SlotRef, Team};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of a seed/region assignment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub team: String,
    pub seed: u8,
    pub region: String,
}

impl Assignment {
    pub fn new(team: impl Into<String>, seed: u8, region: impl Into<String>) -> Self {
        Self { team: team.into(), seed, region: region.into() }
    }

    /// Blank names and "TBD" mark a slot that is known to be unresolved.
    fn is_placeholder(&self) -> bool {
        let name = self.team.trim();
        name.is_empty() || name.eq_ignore_ascii_case("tbd")
    }
}

/// What to do with an assigned team that has no rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingRatingPolicy {
    /// Replace the team with a TBD placeholder.
    #[default]
    Placeholder,
    /// Keep the team and give it the median rating of the table.
    Median,
}

/// An assigned team whose rating was missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataGap {
    pub team: String,
    pub seed: u8,
    pub region: String,
    /// Rating used in its place, or `None` when the slot became TBD.
    pub substituted: Option<f64>,
}

/// How much of a field was synthesised rather than supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldReport {
    /// Slots filled with a TBD placeholder, for any reason.
    pub placeholders: Vec<SlotRef>,
    pub data_gaps: Vec<DataGap>,
    /// Seeds and regions were derived from ratings.
    pub auto_seeded: bool,
}

impl FieldReport {
    pub fn is_partial(&self) -> bool {
        !self.placeholders.is_empty() || !self.data_gaps.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub region: String,
    pub seed: u8,
    pub entrant: Entrant,
}

impl FieldSlot {
    pub fn slot_ref(&self) -> SlotRef {
        SlotRef { region: self.region.clone(), seed: self.seed }
    }
}

/// The validated Round-of-64 field: four regions, sixteen seeds each, slots
/// stored region by region in bracket order (1v16, 8v9, 5v12, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    regions: Vec<String>,
    slots: Vec<FieldSlot>,
    report: FieldReport,
}

impl Field {
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    pub fn report(&self) -> &FieldReport {
        &self.report
    }

    pub fn slot(&self, region: &str, seed: u8) -> Option<&FieldSlot> {
        self.slots.iter().find(|s| s.region == region && s.seed == seed)
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.slots.iter().filter_map(|s| s.entrant.team())
    }

    /// Replace a slot with a TBD placeholder, e.g. to model an unplayed
    /// play-in game.
    pub fn vacate(&mut self, region: &str, seed: u8) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| s.region == region && s.seed == seed) else {
            return false;
        };
        if !slot.entrant.is_tbd() {
            slot.entrant = Entrant::Tbd;
            self.report.placeholders.push(SlotRef { region: region.to_string(), seed });
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct BracketBuilder {
    policy: MissingRatingPolicy,
}

impl BracketBuilder {
    pub fn new(policy: MissingRatingPolicy) -> Self {
        Self { policy }
    }

    /// Build the field. Supplied assignments are used verbatim, with gaps
    /// filled by placeholders; without any, seeds come from the ratings.
    pub fn build(&self, ratings: &RatingTable, assignments: Option<&[Assignment]>) -> BracketResult<Field> {
        match assignments {
            Some(rows) if !rows.is_empty() => self.build_assigned(ratings, rows),
            _ => self.build_ranked(ratings),
        }
    }

    /// Top 64 by rating, dealt across the regions so every region gets one
    /// team from each tier of four: ranks 1-4 are the #1 seeds, 5-8 the #2s.
    fn build_ranked(&self, ratings: &RatingTable) -> BracketResult<Field> {
        let ranked = ratings.ranked();
        if ranked.len() < FIELD_SIZE {
            return Err(BracketError::IncompleteField { resolved: ranked.len(), required: FIELD_SIZE });
        }
        info!("no seed assignments supplied, seeding top {FIELD_SIZE} of {} rated teams", ranked.len());

        let region_count = DEFAULT_REGIONS.len();
        let mut by_slot: HashMap<(usize, u8), Team> = HashMap::with_capacity(FIELD_SIZE);
        for (rank, (name, rating)) in ranked.into_iter().take(FIELD_SIZE).enumerate() {
            let region = rank % region_count;
            let seed = (rank / region_count) as u8 + 1;
            by_slot.insert((region, seed), Team::new(name, seed, DEFAULT_REGIONS[region], rating));
        }

        let regions: Vec<String> = DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect();
        let mut slots = Vec::with_capacity(FIELD_SIZE);
        for (r, region) in regions.iter().enumerate() {
            for seed in bracket_seed_order() {
                let entrant = by_slot.remove(&(r, seed)).map(Entrant::Team).unwrap_or_default();
                slots.push(FieldSlot { region: region.clone(), seed, entrant });
            }
        }

        let report = FieldReport { auto_seeded: true, ..FieldReport::default() };
        Ok(Field { regions, slots, report })
    }

    fn build_assigned(&self, ratings: &RatingTable, rows: &[Assignment]) -> BracketResult<Field> {
        let mut labels: Vec<String> = Vec::new();
        let mut by_slot: HashMap<(String, u8), &Assignment> = HashMap::with_capacity(rows.len());
        let mut by_team: HashMap<String, SlotRef> = HashMap::with_capacity(rows.len());

        for row in rows {
            let region = row.region.trim();
            if region.is_empty() {
                return Err(BracketError::InvalidRegion { team: row.team.clone(), region: row.region.clone() });
            }
            if !(1..=SEEDS_PER_REGION).contains(&row.seed) {
                return Err(BracketError::InvalidSeed { team: row.team.clone(), seed: i64::from(row.seed) });
            }
            if !labels.iter().any(|l| l == region) {
                labels.push(region.to_string());
            }

            let key = (region.to_string(), row.seed);
            if let Some(existing) = by_slot.get(&key) {
                return Err(BracketError::DuplicateSlot {
                    region: region.to_string(),
                    seed: row.seed,
                    first: existing.team.clone(),
                    second: row.team.clone(),
                });
            }
            if !row.is_placeholder() {
                let name = row.team.trim().to_string();
                let here = SlotRef { region: region.to_string(), seed: row.seed };
                if let Some(first) = by_team.get(&name) {
                    return Err(BracketError::DuplicateTeam {
                        team: name,
                        first: first.to_string(),
                        second: here.to_string(),
                    });
                }
                by_team.insert(name, here);
            }
            by_slot.insert(key, row);
        }

        if labels.len() > DEFAULT_REGIONS.len() {
            return Err(BracketError::TooManyRegions { regions: labels });
        }
        let resolved = labels.len() * usize::from(SEEDS_PER_REGION);
        if resolved < FIELD_SIZE {
            return Err(BracketError::IncompleteField { resolved, required: FIELD_SIZE });
        }

        let regions = order_regions(labels);
        let median = match self.policy {
            MissingRatingPolicy::Median => ratings.median(),
            MissingRatingPolicy::Placeholder => None,
        };

        let mut report = FieldReport::default();
        let mut slots = Vec::with_capacity(FIELD_SIZE);
        for region in &regions {
            for seed in bracket_seed_order() {
                let slot = SlotRef { region: region.clone(), seed };
                let entrant = match by_slot.get(&(region.clone(), seed)) {
                    Some(row) if !row.is_placeholder() => {
                        self.resolve_team(row, &slot, ratings, median, &mut report)
                    }
                    Some(_) => {
                        debug!("slot {slot} marked TBD in assignments");
                        Entrant::Tbd
                    }
                    None => {
                        warn!("no team assigned to {slot}, using TBD placeholder");
                        Entrant::Tbd
                    }
                };
                if entrant.is_tbd() {
                    report.placeholders.push(slot);
                }
                slots.push(FieldSlot { region: region.clone(), seed, entrant });
            }
        }

        if report.is_partial() {
            warn!(
                "field is partly synthetic: {} placeholder(s), {} team(s) without ratings",
                report.placeholders.len(),
                report.data_gaps.len()
            );
        }
        Ok(Field { regions, slots, report })
    }

    fn resolve_team(
        &self,
        row: &Assignment,
        slot: &SlotRef,
        ratings: &RatingTable,
        median: Option<f64>,
        report: &mut FieldReport,
    ) -> Entrant {
        let name = row.team.trim();
        if let Some(rating) = ratings.get(name) {
            return Entrant::Team(Team::new(name, slot.seed, slot.region.clone(), rating));
        }

        report.data_gaps.push(DataGap {
            team: name.to_string(),
            seed: slot.seed,
            region: slot.region.clone(),
            substituted: median,
        });
        match median {
            Some(rating) => {
                warn!("{name} ({slot}) has no rating, using median {rating:.1}");
                Entrant::Team(Team::new(name, slot.seed, slot.region.clone(), rating))
            }
            None => {
                warn!("{name} ({slot}) has no rating, using TBD placeholder");
                Entrant::Tbd
            }
        }
    }
}

/// Seeds of one region in top-to-bottom bracket order.
fn bracket_seed_order() -> impl Iterator<Item = u8> {
    FIRST_ROUND_PAIRINGS.iter().flat_map(|&(a, b)| [a, b])
}

/// Canonical East/West/South/Midwest order when the labels are exactly those,
/// otherwise alphabetical.
fn order_regions(mut labels: Vec<String>) -> Vec<String> {
    let canonical: Vec<String> = DEFAULT_REGIONS
        .iter()
        .filter(|name| labels.iter().any(|l| l == *name))
        .map(|name| name.to_string())
        .collect();
    if canonical.len() == labels.len() {
        return canonical;
    }
    labels.sort();
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::full_assignments;

    #[test]
    fn test_full_assignments_are_used_verbatim() {
        let (ratings, rows) = full_assignments();
        let field = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap();
        assert_eq!(field.slots().len(), FIELD_SIZE);
        assert_eq!(field.regions(), &["East", "West", "South", "Midwest"]);
        assert!(!field.report().is_partial());
        assert!(!field.report().auto_seeded);

        let slot = field.slot("South", 12).unwrap();
        let team = slot.entrant.team().unwrap();
        assert_eq!(team.name, "South 12");
        assert_eq!(team.rating, 2000.0 - 12.0 * 40.0);
    }

    #[test]
    fn test_slots_are_in_bracket_order() {
        let (ratings, rows) = full_assignments();
        let field = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap();
        let seeds: Vec<u8> = field.slots()[..16].iter().map(|s| s.seed).collect();
        assert_eq!(seeds, vec![1, 16, 8, 9, 5, 12, 4, 13, 6, 11, 3, 14, 7, 10, 2, 15]);
        assert!(field.slots()[16..32].iter().all(|s| s.region == "West"));
    }

    #[test]
    fn test_missing_slots_become_placeholders() {
        let (ratings, mut rows) = full_assignments();
        rows.retain(|r| !(r.region == "East" && r.seed == 16) && !(r.region == "West" && r.seed == 11));
        let field = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap();
        assert!(field.slot("East", 16).unwrap().entrant.is_tbd());
        assert!(field.slot("West", 11).unwrap().entrant.is_tbd());
        assert_eq!(field.report().placeholders.len(), 2);
        assert!(field.report().data_gaps.is_empty());
    }

    #[test]
    fn test_tbd_rows_mark_placeholders_without_data_gaps() {
        let (ratings, mut rows) = full_assignments();
        rows.iter_mut().find(|r| r.region == "Midwest" && r.seed == 11).unwrap().team = "TBD".into();
        let field = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap();
        assert!(field.slot("Midwest", 11).unwrap().entrant.is_tbd());
        assert_eq!(
            field.report().placeholders,
            vec![SlotRef { region: "Midwest".into(), seed: 11 }]
        );
        assert!(field.report().data_gaps.is_empty());
    }

    #[test]
    fn test_unrated_team_is_a_data_gap() {
        let (mut ratings, rows) = full_assignments();
        ratings = ratings.iter().filter(|(n, _)| *n != "East 5").map(|(n, r)| (n.to_string(), r)).collect();
        let field = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap();
        assert!(field.slot("East", 5).unwrap().entrant.is_tbd());
        let gaps = &field.report().data_gaps;
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].team, "East 5");
        assert_eq!(gaps[0].substituted, None);
        assert!(field.report().is_partial());
    }

    #[test]
    fn test_median_policy_keeps_unrated_team() {
        let (mut ratings, rows) = full_assignments();
        ratings = ratings.iter().filter(|(n, _)| *n != "East 5").map(|(n, r)| (n.to_string(), r)).collect();
        let median = ratings.median().unwrap();
        let field = BracketBuilder::new(MissingRatingPolicy::Median)
            .build(&ratings, Some(rows.as_slice()))
            .unwrap();
        let team = field.slot("East", 5).unwrap().entrant.team().unwrap();
        assert_eq!(team.rating, median);
        assert_eq!(field.report().data_gaps[0].substituted, Some(median));
        assert!(field.report().placeholders.is_empty());
    }

    #[test]
    fn test_duplicate_slot_is_fatal() {
        let (ratings, mut rows) = full_assignments();
        rows.push(Assignment::new("Interloper", 3, "West"));
        let err = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap_err();
        assert_eq!(
            err,
            BracketError::DuplicateSlot {
                region: "West".into(),
                seed: 3,
                first: "West 3".into(),
                second: "Interloper".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_team_is_fatal() {
        let (ratings, mut rows) = full_assignments();
        rows.iter_mut().find(|r| r.region == "South" && r.seed == 2).unwrap().team = "East 1".into();
        let err = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap_err();
        assert!(matches!(err, BracketError::DuplicateTeam { ref team, .. } if team == "East 1"));
    }

    #[test]
    fn test_invalid_seed_and_region_are_fatal() {
        let (ratings, mut rows) = full_assignments();
        rows[0].seed = 17;
        assert!(matches!(
            BracketBuilder::default().build(&ratings, Some(rows.as_slice())),
            Err(BracketError::InvalidSeed { seed: 17, .. })
        ));

        let (ratings, mut rows) = full_assignments();
        rows[0].region = "  ".into();
        assert!(matches!(
            BracketBuilder::default().build(&ratings, Some(rows.as_slice())),
            Err(BracketError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn test_three_regions_is_an_incomplete_field() {
        let (ratings, mut rows) = full_assignments();
        rows.retain(|r| r.region != "Midwest");
        let err = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap_err();
        assert_eq!(err, BracketError::IncompleteField { resolved: 48, required: 64 });
    }

    #[test]
    fn test_five_regions_is_rejected() {
        let (ratings, mut rows) = full_assignments();
        rows.push(Assignment::new("Stray", 1, "Atlantis"));
        assert!(matches!(
            BracketBuilder::default().build(&ratings, Some(rows.as_slice())),
            Err(BracketError::TooManyRegions { .. })
        ));
    }

    #[test]
    fn test_custom_region_labels_sort_alphabetically() {
        let (ratings, rows) = full_assignments();
        let renamed: Vec<Assignment> = rows
            .into_iter()
            .map(|mut r| {
                r.region = format!("Region {}", 4 - DEFAULT_REGIONS.iter().position(|d| *d == r.region).unwrap());
                r
            })
            .collect();
        let field = BracketBuilder::default().build(&ratings, Some(renamed.as_slice())).unwrap();
        assert_eq!(field.regions(), &["Region 1", "Region 2", "Region 3", "Region 4"]);
    }

    #[test]
    fn test_ranked_seeding_deals_tiers_across_regions() {
        let ratings: RatingTable = (0..70).map(|i| (format!("T{i:02}"), 2500.0 - f64::from(i))).collect();
        let field = BracketBuilder::default().build(&ratings, None).unwrap();
        assert!(field.report().auto_seeded);
        assert_eq!(field.teams().count(), FIELD_SIZE);

        for (r, region) in DEFAULT_REGIONS.iter().enumerate() {
            let one = field.slot(region, 1).unwrap().entrant.team().unwrap();
            assert_eq!(one.name, format!("T{r:02}"));
            let two = field.slot(region, 2).unwrap().entrant.team().unwrap();
            assert_eq!(two.name, format!("T{:02}", 4 + r));
            let sixteen = field.slot(region, 16).unwrap().entrant.team().unwrap();
            assert_eq!(sixteen.name, format!("T{:02}", 60 + r));
        }
        assert!(field.teams().all(|t| t.name.as_str() < "T64"));
    }

    #[test]
    fn test_empty_assignment_table_falls_back_to_ranking() {
        let ratings: RatingTable = (0..64).map(|i| (format!("T{i:02}"), 1000.0 + f64::from(i))).collect();
        let field = BracketBuilder::default().build(&ratings, Some(&[][..])).unwrap();
        assert!(field.report().auto_seeded);
    }

    #[test]
    fn test_ranked_seeding_needs_64_teams() {
        let ratings: RatingTable = (0..63).map(|i| (format!("T{i}"), 1500.0)).collect();
        assert_eq!(
            BracketBuilder::default().build(&ratings, None).unwrap_err(),
            BracketError::IncompleteField { resolved: 63, required: 64 }
        );
    }

    #[test]
    fn test_vacate_turns_slot_into_placeholder() {
        let (ratings, rows) = full_assignments();
        let mut field = BracketBuilder::default().build(&ratings, Some(rows.as_slice())).unwrap();
        assert!(field.vacate("East", 11));
        assert!(field.slot("East", 11).unwrap().entrant.is_tbd());
        assert_eq!(field.report().placeholders.len(), 1);
        assert!(!field.vacate("Atlantis", 1));
    }
}
