use crate::calibration::SeedRandomnessModel;
use crate::random::RandomSource;
use crate::{Entrant, RoundKind, Team};
use log::debug;
use std::cmp::Ordering;

/// Decides single games. Each team's effective rating is perturbed by an
/// independent uniform draw of up to half its spread, and the higher
/// perturbed rating wins.
#[derive(Debug, Clone, Default)]
pub struct MatchupResolver {
    model: SeedRandomnessModel,
}

impl MatchupResolver {
    pub fn new(model: SeedRandomnessModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &SeedRandomnessModel {
        &self.model
    }

    /// Winner of `team1` vs `team2`. A TBD on either side yields TBD without
    /// consuming randomness.
    pub fn resolve<R: RandomSource + ?Sized>(
        &self,
        team1: &Entrant,
        team2: &Entrant,
        round: RoundKind,
        rng: &mut R,
    ) -> Entrant {
        match (team1, team2) {
            (Entrant::Team(a), Entrant::Team(b)) => Entrant::Team(self.play(a, b, round, rng).clone()),
            _ => Entrant::Tbd,
        }
    }

    /// Play two known teams. Exact ties go to the better seed, then to `a`.
    pub fn play<'t, R: RandomSource + ?Sized>(
        &self,
        a: &'t Team,
        b: &'t Team,
        round: RoundKind,
        rng: &mut R,
    ) -> &'t Team {
        let score_a = self.perturbed_rating(a, b.seed, round, rng);
        let score_b = self.perturbed_rating(b, a.seed, round, rng);

        let a_wins = match score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => a.seed <= b.seed,
        };
        let winner = if a_wins { a } else { b };
        debug!(
            "{round}: ({}) {} {:.1}->{score_a:.1} vs ({}) {} {:.1}->{score_b:.1}, {} advances",
            a.seed, a.name, a.rating, b.seed, b.name, b.rating, winner.name
        );
        winner
    }

    fn perturbed_rating<R: RandomSource + ?Sized>(
        &self,
        team: &Team,
        opponent_seed: u8,
        round: RoundKind,
        rng: &mut R,
    ) -> f64 {
        let effective = team.rating * self.model.championship_multiplier(team.seed, round);
        let half = self.model.spread(team.seed, opponent_seed, round) / 2.0;
        effective * (1.0 + rng.uniform(-half, half))
    }
}
