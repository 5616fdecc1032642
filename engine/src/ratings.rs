use log::warn;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Team name to ELO rating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingTable {
    ratings: HashMap<String, f64>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a rating. Names are trimmed; non-finite ratings are
    /// dropped with a warning since they can never be compared.
    pub fn insert(&mut self, team: impl Into<String>, rating: f64) -> Option<f64> {
        let team = team.into();
        let team = team.trim();
        if !rating.is_finite() {
            warn!("ignoring non-finite rating {rating} for {team}");
            return None;
        }
        self.ratings.insert(team.to_string(), rating)
    }

    pub fn get(&self, team: &str) -> Option<f64> {
        self.ratings.get(team.trim()).copied()
    }

    pub fn contains(&self, team: &str) -> bool {
        self.ratings.contains_key(team.trim())
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ratings.iter().map(|(name, &rating)| (name.as_str(), rating))
    }

    /// All teams, best rating first. Equal ratings fall back to name order
    /// so the ranking never depends on hash order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }

    pub fn median(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let mut values: Vec<f64> = self.ratings.values().copied().collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Some((values[mid - 1] + values[mid]) / 2.0)
        } else {
            Some(values[mid])
        }
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RatingTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = RatingTable::new();
        for (team, rating) in iter {
            table.insert(team, rating);
        }
        table
    }
}
