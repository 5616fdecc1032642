use crate::error::{BracketError, BracketResult};
use crate::{FIRST_ROUND_PAIRINGS, RoundKind, SEEDS_PER_REGION};
use log::debug;
use serde::{Deserialize, Serialize};

/// Round-of-64 spread for one standard seed pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairSpread {
    pub favorite: u8,
    pub underdog: u8,
    pub spread: f64,
}

/// Later-round spreads for a bucket of seeds.
/// `spreads[0]` is the Second Round, `spreads[4]` the Championship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedCurve {
    pub first_seed: u8,
    pub last_seed: u8,
    pub spreads: [f64; 5],
}

impl SeedCurve {
    fn covers(&self, seed: u8) -> bool {
        (self.first_seed..=self.last_seed).contains(&seed)
    }
}

/// A complete calibration profile. The default is the historical table:
/// 1v16 upsets almost never happen, 8v9 is a coin flip, top seeds tighten
/// up as the tournament goes on and surviving double-digit seeds stay wild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub first_round: Vec<PairSpread>,
    /// Used for round-of-64 pairings outside the standard eight and for
    /// seeds no later-round curve covers.
    pub fallback_spread: f64,
    pub later_rounds: Vec<SeedCurve>,
    /// Extra effective rating for a #1 seed playing for the title.
    pub championship_boost: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        let pair = |favorite, underdog, spread| PairSpread { favorite, underdog, spread };
        let curve = |first_seed, last_seed, spreads| SeedCurve { first_seed, last_seed, spreads };
        Self {
            first_round: vec![
                pair(1, 16, 0.03), // ~1.3% upset rate
                pair(2, 15, 0.10), // ~7.1%
                pair(3, 14, 0.15), // ~14.7%
                pair(4, 13, 0.18), // ~20.5%
                pair(5, 12, 0.27), // ~35.3%
                pair(6, 11, 0.30), // ~39.1%
                pair(7, 10, 0.30), // ~38.7%
                pair(8, 9, 0.40),  // ~51.9% for the 9
            ],
            fallback_spread: 0.20,
            later_rounds: vec![
                curve(1, 1, [0.16, 0.12, 0.08, 0.05, 0.05]),
                curve(2, 2, [0.17, 0.14, 0.11, 0.08, 0.08]),
                curve(3, 4, [0.18, 0.16, 0.14, 0.12, 0.12]),
                curve(5, 8, [0.19, 0.18, 0.17, 0.16, 0.15]),
                curve(9, 16, [0.25, 0.30, 0.35, 0.40, 0.40]),
            ],
            championship_boost: 0.05,
        }
    }
}

impl Calibration {
    pub fn from_json(json: &str) -> BracketResult<Self> {
        let calibration: Calibration = serde_json::from_str(json)
            .map_err(|e| BracketError::InvalidCalibration(e.to_string()))?;
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn validate(&self) -> BracketResult<()> {
        let invalid = |msg: String| Err(BracketError::InvalidCalibration(msg));
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);

        if self.first_round.len() != FIRST_ROUND_PAIRINGS.len() {
            return invalid(format!(
                "expected {} first-round pairings, found {}",
                FIRST_ROUND_PAIRINGS.len(),
                self.first_round.len()
            ));
        }
        for &(favorite, underdog) in &FIRST_ROUND_PAIRINGS {
            let matches = self
                .first_round
                .iter()
                .filter(|p| p.favorite == favorite && p.underdog == underdog)
                .count();
            if matches != 1 {
                return invalid(format!("pairing {favorite}v{underdog} must appear exactly once"));
            }
        }
        if let Some(p) = self.first_round.iter().find(|p| !in_range(p.spread)) {
            return invalid(format!("{}v{} spread {} outside [0, 1]", p.favorite, p.underdog, p.spread));
        }
        if !in_range(self.fallback_spread) {
            return invalid(format!("fallback spread {} outside [0, 1]", self.fallback_spread));
        }
        for c in &self.later_rounds {
            if c.first_seed == 0 || c.first_seed > c.last_seed || c.last_seed > SEEDS_PER_REGION {
                return invalid(format!("seed bucket {}-{} is not within 1-16", c.first_seed, c.last_seed));
            }
            if let Some(v) = c.spreads.iter().find(|&&v| !in_range(v)) {
                return invalid(format!(
                    "seed bucket {}-{} spread {v} outside [0, 1]",
                    c.first_seed, c.last_seed
                ));
            }
        }
        if !self.championship_boost.is_finite() || self.championship_boost < 0.0 {
            return invalid(format!("championship boost {} must be >= 0", self.championship_boost));
        }
        Ok(())
    }

    /// Largest spread defined anywhere in the profile.
    pub fn max_spread(&self) -> f64 {
        self.first_round
            .iter()
            .map(|p| p.spread)
            .chain(self.later_rounds.iter().flat_map(|c| c.spreads))
            .fold(0.0, f64::max)
    }
}

/// Looks up the randomness spread for a matchup, scaled by a caller-chosen
/// intensity. Owns its calibration, so independent models never interact.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRandomnessModel {
    calibration: Calibration,
    scale: f64,
    fallback: f64,
}

impl Default for SeedRandomnessModel {
    fn default() -> Self {
        let calibration = Calibration::default();
        let fallback = calibration.fallback_spread.clamp(0.0, calibration.max_spread());
        Self { calibration, scale: 1.0, fallback }
    }
}

impl SeedRandomnessModel {
    pub fn new(calibration: Calibration, scale: f64) -> BracketResult<Self> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(BracketError::InvalidScale(scale));
        }
        calibration.validate()?;
        let fallback = calibration.fallback_spread.clamp(0.0, calibration.max_spread());
        debug!("randomness model: scale {scale}, fallback spread {fallback}");
        Ok(Self { calibration, scale, fallback })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Symmetric spread for a seed pairing in a round. In the Round of 64 it
    /// is the calibrated pair value; later it is the mean of both seeds'
    /// curves.
    pub fn magnitude(&self, seed_a: u8, seed_b: u8, round: RoundKind) -> f64 {
        let raw = match round {
            RoundKind::First => self.pair_spread(seed_a, seed_b),
            _ => (self.curve_spread(seed_a, round) + self.curve_spread(seed_b, round)) / 2.0,
        };
        raw * self.scale
    }

    /// Spread applied to one team facing `opponent_seed`. Round of 64 uses the
    /// shared pair value; later rounds use the team's own seed curve.
    pub fn spread(&self, seed: u8, opponent_seed: u8, round: RoundKind) -> f64 {
        match round {
            RoundKind::First => self.magnitude(seed, opponent_seed, round),
            _ => self.curve_spread(seed, round) * self.scale,
        }
    }

    /// Multiplier on a team's effective rating before perturbation.
    pub fn championship_multiplier(&self, seed: u8, round: RoundKind) -> f64 {
        if round == RoundKind::Championship && seed == 1 {
            1.0 + self.calibration.championship_boost
        } else {
            1.0
        }
    }

    fn pair_spread(&self, seed_a: u8, seed_b: u8) -> f64 {
        let (favorite, underdog) = (seed_a.min(seed_b), seed_a.max(seed_b));
        self.calibration
            .first_round
            .iter()
            .find(|p| p.favorite == favorite && p.underdog == underdog)
            .map(|p| p.spread)
            .unwrap_or(self.fallback)
    }

    fn curve_spread(&self, seed: u8, round: RoundKind) -> f64 {
        let Some(idx) = round.number().checked_sub(2) else {
            return self.fallback;
        };
        self.calibration
            .later_rounds
            .iter()
            .find(|c| c.covers(seed))
            .and_then(|c| c.spreads.get(usize::from(idx)).copied())
            .unwrap_or(self.fallback)
    }
}
