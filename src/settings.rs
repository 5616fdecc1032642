use crate::cli::Cli;
use chrono::Datelike;
use log::LevelFilter;
use mmsim_engine::MissingRatingPolicy;
use std::path::{Path, PathBuf};

/// Resolved run configuration: CLI values with year-based defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub year: u16,
    pub elo_path: PathBuf,
    pub tournament_path: PathBuf,
    /// The tournament CSV was named explicitly, so it must exist.
    pub tournament_required: bool,
    pub output_path: PathBuf,
    pub randomness: f64,
    pub seed: Option<u64>,
    pub calibration_path: Option<PathBuf>,
    pub missing_rating: MissingRatingPolicy,
    pub fetch_field: bool,
    pub print: bool,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn resolve(cli: Cli, today: impl Datelike) -> Self {
        let year = cli.year.unwrap_or_else(|| tournament_year(today));
        let dir = PathBuf::from(year.to_string());
        Self {
            year,
            elo_path: cli.elo.unwrap_or_else(|| dir.join("elo_ratings.csv")),
            tournament_required: cli.tournament.is_some(),
            tournament_path: cli.tournament.unwrap_or_else(|| dir.join("tournament_teams.csv")),
            output_path: cli.output.unwrap_or_else(|| dir.join("predicted_bracket.json")),
            randomness: cli.randomness,
            seed: cli.seed,
            calibration_path: cli.calibration,
            missing_rating: cli.missing_rating.into(),
            fetch_field: cli.fetch_field,
            print: !cli.no_print,
            log_level: log_level(cli.verbose, cli.debug),
        }
    }

    pub fn tournament_file(&self) -> Option<&Path> {
        self.tournament_path.exists().then_some(self.tournament_path.as_path())
    }
}

/// The upcoming tournament: this year's through May, next year's after that.
pub fn tournament_year(today: impl Datelike) -> u16 {
    let year = if today.month() < 6 { today.year() } else { today.year() + 1 };
    u16::try_from(year).unwrap_or(u16::MAX)
}

fn log_level(verbose: bool, debug: bool) -> LevelFilter {
    match (verbose, debug) {
        (_, true) => LevelFilter::Debug,
        (true, false) => LevelFilter::Info,
        _ => LevelFilter::Warn,
    }
}
