use thiserror::Error;

pub type BracketResult<T> = Result<T, BracketError>;

/// Configuration problems that stop a run before any game is simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketError {
    #[error("bracket needs {required} resolvable slots (teams or placeholders), found {resolved}")]
    IncompleteField { resolved: usize, required: usize },

    #[error("slot {region} #{seed} assigned twice: {first} and {second}")]
    DuplicateSlot {
        region: String,
        seed: u8,
        first: String,
        second: String,
    },

    #[error("team {team} assigned to two slots: {first} and {second}")]
    DuplicateTeam {
        team: String,
        first: String,
        second: String,
    },

    #[error("team {team} has seed {seed}, expected 1-16")]
    InvalidSeed { team: String, seed: i64 },

    #[error("team {team} has an invalid region {region:?}")]
    InvalidRegion { team: String, region: String },

    #[error("field has {} regions ({}), at most 4 are allowed", .regions.len(), .regions.join(", "))]
    TooManyRegions { regions: Vec<String> },

    #[error("randomness scale must be a finite non-negative number, got {0}")]
    InvalidScale(f64),

    #[error("invalid calibration profile: {0}")]
    InvalidCalibration(String),
}
