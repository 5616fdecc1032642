use clap::{ArgAction, Parser, ValueEnum};
use mmsim_engine::MissingRatingPolicy;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MissingRatingArg {
    /// Replace unrated teams with a TBD placeholder
    #[default]
    Placeholder,
    /// Give unrated teams the median rating of the table
    Median,
}

impl From<MissingRatingArg> for MissingRatingPolicy {
    fn from(arg: MissingRatingArg) -> Self {
        match arg {
            MissingRatingArg::Placeholder => MissingRatingPolicy::Placeholder,
            MissingRatingArg::Median => MissingRatingPolicy::Median,
        }
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mmsim", author, version)]
#[command(about = "Predicts a 64-team NCAA tournament bracket from team ratings")]
pub struct Cli {
    /// Tournament year (default: this year before June, next year after)
    #[arg(short, long, env = "MMSIM_YEAR")]
    pub year: Option<u16>,

    /// Ratings CSV with Team and ELO columns [default: {year}/elo_ratings.csv]
    #[arg(long, env = "MMSIM_ELO")]
    pub elo: Option<PathBuf>,

    /// Field CSV with Team, Seed and Region columns [default: {year}/tournament_teams.csv]
    #[arg(long, env = "MMSIM_TOURNAMENT")]
    pub tournament: Option<PathBuf>,

    /// Where to write the predicted bracket [default: {year}/predicted_bracket.json]
    #[arg(short, long, env = "MMSIM_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Multiplier applied to every calibrated upset spread
    #[arg(short, long, env = "MMSIM_RANDOMNESS", default_value_t = 1.0)]
    pub randomness: f64,

    /// Fixed random seed for a reproducible bracket
    #[arg(short, long, env = "MMSIM_SEED")]
    pub seed: Option<u64>,

    /// JSON calibration profile replacing the built-in spread tables
    #[arg(long, env = "MMSIM_CALIBRATION")]
    pub calibration: Option<PathBuf>,

    /// How to treat an assigned team that has no rating
    #[arg(long, value_enum, env = "MMSIM_MISSING_RATING", default_value_t = MissingRatingArg::Placeholder)]
    pub missing_rating: MissingRatingArg,

    /// Download the announced field and write it to the tournament CSV first
    #[arg(long, action = ArgAction::SetTrue, env = "MMSIM_FETCH_FIELD")]
    pub fetch_field: bool,

    /// Skip printing the bracket to stdout
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_print: bool,

    /// Log progress (info level)
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Log every matchup decision (debug level)
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
}
