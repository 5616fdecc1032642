mod cli;
mod loader;
mod report;
mod settings;

use crate::cli::Cli;
use crate::settings::Settings;
use anyhow::{Context, bail};
use clap::Parser;
use log::{info, warn};
use mmsim_engine::{
    BracketBuilder, Calibration, ResultExporter, SeedRandomnessModel, SeededSource, TournamentSimulator,
};
use ncaa_api::NcaaApi;
use std::fs;

#[tokio::main]
async fn main() {
    better_panic::install();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli, chrono::Local::now());

    env_logger::Builder::new()
        .filter_level(settings.log_level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&settings).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    info!("simulating the {} tournament", settings.year);

    if settings.fetch_field {
        let entries = NcaaApi::new()
            .fetch_field(settings.year)
            .await
            .with_context(|| format!("Failed to fetch the {} field", settings.year))?;
        loader::write_field(&settings.tournament_path, &entries)?;
    }

    let loaded = loader::load_ratings(&settings.elo_path)?;
    let assignments = match settings.tournament_file() {
        Some(path) => Some(loader::load_field(path)?),
        None if settings.tournament_required => {
            bail!("tournament file not found: {}", settings.tournament_path.display())
        }
        None if !loaded.assignments.is_empty() => {
            info!("using seeds and regions from {}", settings.elo_path.display());
            Some(loaded.assignments)
        }
        None => None,
    };
    if let Some(rows) = &assignments {
        for warning in loader::field_warnings(rows) {
            warn!("{warning}");
        }
    }

    let calibration = match &settings.calibration_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read calibration profile: {}", path.display()))?;
            Calibration::from_json(&json).with_context(|| format!("Invalid calibration profile: {}", path.display()))?
        }
        None => Calibration::default(),
    };
    let model = SeedRandomnessModel::new(calibration, settings.randomness)?;

    let field = BracketBuilder::new(settings.missing_rating).build(&loaded.ratings, assignments.as_deref())?;

    let mut rng = match settings.seed {
        Some(seed) => {
            info!("random seed {seed}");
            SeededSource::from_seed(seed)
        }
        None => SeededSource::from_entropy(),
    };
    let bracket = TournamentSimulator::new(model).simulate(&field, &mut rng);

    if settings.print {
        print!("{}", report::render(&bracket, field.report()));
    }

    ResultExporter::new()
        .write_json(&bracket, &settings.output_path)
        .context("Failed to save predicted bracket")?;
    if settings.print {
        println!("\nBracket saved to {}", settings.output_path.display());
    }
    Ok(())
}
