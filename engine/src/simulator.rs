use crate::builder::Field;
use crate::calibration::SeedRandomnessModel;
use crate::random::RandomSource;
use crate::resolver::MatchupResolver;
use crate::template::{BracketTemplate, Feed};
use crate::{Bracket, Entrant, Game, Round, RoundKind};
use log::{debug, info};

/// Where a simulation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The next round to be played.
    Round(RoundKind),
    Complete,
}

#[derive(Debug, Clone, Default)]
pub struct TournamentSimulator {
    resolver: MatchupResolver,
}

impl TournamentSimulator {
    pub fn new(model: SeedRandomnessModel) -> Self {
        Self { resolver: MatchupResolver::new(model) }
    }

    pub fn resolver(&self) -> &MatchupResolver {
        &self.resolver
    }

    /// Play the whole bracket.
    pub fn simulate<R: RandomSource + ?Sized>(&self, field: &Field, rng: &mut R) -> Bracket {
        self.start(field, rng).run()
    }

    /// Set up a run that can be stepped one round at a time.
    pub fn start<'a, R: RandomSource + ?Sized>(&'a self, field: &'a Field, rng: &'a mut R) -> Simulation<'a, R> {
        Simulation {
            resolver: &self.resolver,
            field,
            template: BracketTemplate::new(field.regions().len()),
            rng,
            winners: Vec::new(),
            rounds: Vec::new(),
            stage: Stage::Round(RoundKind::First),
        }
    }
}

/// One in-progress tournament. Finished rounds are kept as they were played;
/// only the next round is ever written.
pub struct Simulation<'a, R: RandomSource + ?Sized> {
    resolver: &'a MatchupResolver,
    field: &'a Field,
    template: BracketTemplate,
    rng: &'a mut R,
    /// Winner of each template game, indexed like the template.
    winners: Vec<Entrant>,
    rounds: Vec<Round>,
    stage: Stage,
}

impl<'a, R: RandomSource + ?Sized> Simulation<'a, R> {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Play the next round and return the stage reached.
    pub fn step(&mut self) -> Stage {
        let Stage::Round(kind) = self.stage else {
            return Stage::Complete;
        };

        let mut games = Vec::with_capacity(kind.game_count());
        for (idx, slot) in self.template.round(kind) {
            let team1 = self.participant(slot.feeds[0]);
            let team2 = self.participant(slot.feeds[1]);
            let winner = self.resolver.resolve(&team1, &team2, kind, &mut *self.rng);

            debug_assert_eq!(idx, self.winners.len());
            self.winners.push(winner.clone());
            games.push(Game {
                game_id: slot.game_id,
                unique_game_id: slot.unique_game_id,
                round: kind,
                region: self.region_label(slot.region, kind),
                team1,
                team2,
                winner,
            });
        }

        let undecided = games.iter().filter(|g| !g.is_resolved()).count();
        if undecided > 0 {
            debug!("{kind}: {} games, {undecided} with TBD winners", games.len());
        } else {
            debug!("{kind}: {} games", games.len());
        }
        self.rounds.push(Round { kind, games });

        self.stage = match kind.next() {
            Some(next) => Stage::Round(next),
            None => Stage::Complete,
        };
        self.stage
    }

    /// Step until the championship is played.
    pub fn run(mut self) -> Bracket {
        while self.step() != Stage::Complete {}
        let bracket = Bracket { rounds: self.rounds };
        match bracket.champion() {
            Some(champion) => info!("champion: ({}) {}", champion.seed, champion.name),
            None => info!("champion undecided (TBD)"),
        }
        bracket
    }

    /// Regional games carry their region; the semifinals are labelled
    /// "Final Four" and the title game has none.
    fn region_label(&self, region: Option<usize>, kind: RoundKind) -> Option<String> {
        match (region, kind) {
            (Some(r), _) => self.field.regions().get(r).cloned(),
            (None, RoundKind::FinalFour) => Some(kind.label().to_string()),
            (None, _) => None,
        }
    }

    fn participant(&self, feed: Feed) -> Entrant {
        match feed {
            Feed::Slot(i) => self.field.slots().get(i).map(|s| s.entrant.clone()),
            Feed::Winner(i) => self.winners.get(i).cloned(),
        }
        .unwrap_or_default()
    }
}
