use crate::schools::{run_schools, SchoolsArgs};
use crate::score::{run_score, ScoreArgs};
use crate::sheet::{run_sheet, SheetArgs};
use clap::{Parser, Subcommand};
use placement::config::AppConfig;
use placement::engine::ThresholdPreset;
use placement::error::AppError;
use placement::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "placement",
    about = "Grade BECE mock results and predict senior high school placement",
    version
)]
struct Cli {
    /// Override the configured category threshold table (bece or legacy)
    #[arg(long, global = true, value_parser = crate::infra::parse_preset)]
    thresholds: Option<ThresholdPreset>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grade one set of raw scores and predict a placement
    Score(ScoreArgs),
    /// Import a CSV score sheet and print the class report and alerts
    Sheet(SheetArgs),
    /// List schools in the placement directory
    Schools(SchoolsArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(preset) = cli.thresholds {
        config.placement.thresholds = preset;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        ?config.environment,
        thresholds = config.placement.thresholds.label(),
        score_policy = config.placement.score_policy.label(),
        "placement engine configured"
    );

    match cli.command {
        Command::Score(args) => run_score(args, &config),
        Command::Sheet(args) => run_sheet(args, &config),
        Command::Schools(args) => run_schools(args, &config),
    }
}
