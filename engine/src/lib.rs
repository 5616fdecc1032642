pub mod builder;
pub mod calibration;
pub mod error;
pub mod export;
pub mod random;
pub mod ratings;
pub mod resolver;
pub mod simulator;
mod template;
#[cfg(test)]
mod test_support;

pub use builder::{Assignment, BracketBuilder, DataGap, Field, FieldReport, FieldSlot, MissingRatingPolicy};
pub use calibration::{Calibration, PairSpread, SeedCurve, SeedRandomnessModel};
pub use error::{BracketError, BracketResult};
pub use export::{ExportError, ResultExporter};
pub use random::{RandomSource, SeededSource, SequenceSource};
pub use ratings::RatingTable;
pub use resolver::MatchupResolver;
pub use simulator::{Simulation, Stage, TournamentSimulator};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seeds per region, 1 through 16.
pub const SEEDS_PER_REGION: u8 = 16;
/// Teams in a complete main-draw field.
pub const FIELD_SIZE: usize = 64;
/// Region labels used when seeding is derived from ratings alone.
pub const DEFAULT_REGIONS: [&str; 4] = ["East", "West", "South", "Midwest"];
/// Round-of-64 seed pairings in top-to-bottom bracket order.
pub const FIRST_ROUND_PAIRINGS: [(u8, u8); 8] =
    [(1, 16), (8, 9), (5, 12), (4, 13), (6, 11), (3, 14), (7, 10), (2, 15)];

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub seed: u8,
    pub region: String,
    pub rating: f64,
}

impl Team {
    pub fn new(name: impl Into<String>, seed: u8, region: impl Into<String>, rating: f64) -> Self {
        Self { name: name.into(), seed, region: region.into(), rating }
    }
}

/// A bracket slot position within a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotRef {
    pub region: String,
    pub seed: u8,
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.region, self.seed)
    }
}

/// One side of a game: a concrete team, or a placeholder for a participant
/// that is not known yet (unplayed play-in, missing data, or the winner of
/// an undecided game).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Entrant {
    Team(Team),
    #[default]
    Tbd,
}

impl Entrant {
    pub fn team(&self) -> Option<&Team> {
        match self {
            Entrant::Team(team) => Some(team),
            Entrant::Tbd => None,
        }
    }

    pub fn is_tbd(&self) -> bool {
        matches!(self, Entrant::Tbd)
    }

    pub fn seed(&self) -> Option<u8> {
        self.team().map(|t| t.seed)
    }

    /// Display label used in printed and exported brackets: `"1. Duke"` or `"TBD"`.
    pub fn label(&self) -> String {
        match self {
            Entrant::Team(team) => format!("{}. {}", team.seed, team.name),
            Entrant::Tbd => "TBD".to_string(),
        }
    }
}

impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Ordered from earliest to latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoundKind {
    #[default]
    First,        // Round of 64
    Second,       // Round of 32
    Sweet16,
    Elite8,       // Regional final
    FinalFour,    // National semifinals
    Championship,
}

impl RoundKind {
    pub const ALL: [RoundKind; 6] = [
        RoundKind::First,
        RoundKind::Second,
        RoundKind::Sweet16,
        RoundKind::Elite8,
        RoundKind::FinalFour,
        RoundKind::Championship,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RoundKind::First => "First Round",
            RoundKind::Second => "Second Round",
            RoundKind::Sweet16 => "Sweet 16",
            RoundKind::Elite8 => "Elite Eight",
            RoundKind::FinalFour => "Final Four",
            RoundKind::Championship => "Championship",
        }
    }

    /// 1-based round number (First = 1, Championship = 6).
    pub fn number(&self) -> u8 {
        match self {
            RoundKind::First => 1,
            RoundKind::Second => 2,
            RoundKind::Sweet16 => 3,
            RoundKind::Elite8 => 4,
            RoundKind::FinalFour => 5,
            RoundKind::Championship => 6,
        }
    }

    /// Games played in this round of a 64-team bracket.
    pub fn game_count(&self) -> usize {
        32 >> (self.number() - 1)
    }

    /// Cross-region rounds, where region no longer applies.
    pub fn is_final_four(&self) -> bool {
        matches!(self, RoundKind::FinalFour | RoundKind::Championship)
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            RoundKind::First => None,
            RoundKind::Second => Some(RoundKind::First),
            RoundKind::Sweet16 => Some(RoundKind::Second),
            RoundKind::Elite8 => Some(RoundKind::Sweet16),
            RoundKind::FinalFour => Some(RoundKind::Elite8),
            RoundKind::Championship => Some(RoundKind::FinalFour),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            RoundKind::First => Some(RoundKind::Second),
            RoundKind::Second => Some(RoundKind::Sweet16),
            RoundKind::Sweet16 => Some(RoundKind::Elite8),
            RoundKind::Elite8 => Some(RoundKind::FinalFour),
            RoundKind::FinalFour => Some(RoundKind::Championship),
            RoundKind::Championship => None,
        }
    }
}

impl fmt::Display for RoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    /// Position within the round, restarting at 1 every round.
    pub game_id: u32,
    /// Tournament-wide identifier, fixed by the bracket template.
    pub unique_game_id: u32,
    pub round: RoundKind,
    /// `"Final Four"` for the semifinals, `None` for the Championship.
    pub region: Option<String>,
    pub team1: Entrant,
    pub team2: Entrant,
    pub winner: Entrant,
}

impl Game {
    pub fn is_resolved(&self) -> bool {
        !self.winner.is_tbd()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Round {
    pub kind: RoundKind,
    pub games: Vec<Game>,
}

/// The simulated tournament: every round in order, every game recorded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bracket {
    pub rounds: Vec<Round>,
}

impl Bracket {
    pub fn round(&self, kind: RoundKind) -> Option<&Round> {
        self.rounds.iter().find(|r| r.kind == kind)
    }

    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.rounds.iter().flat_map(|r| r.games.iter())
    }

    pub fn game_count(&self) -> usize {
        self.rounds.iter().map(|r| r.games.len()).sum()
    }

    /// Find a game by its tournament-wide ID.
    pub fn find_game(&self, unique_game_id: u32) -> Option<&Game> {
        self.games().find(|g| g.unique_game_id == unique_game_id)
    }

    /// The championship winner, when the title game resolved to a real team.
    pub fn champion(&self) -> Option<&Team> {
        self.round(RoundKind::Championship)?
            .games
            .first()?
            .winner
            .team()
    }
}
