use clap::Args;
use placement::config::AppConfig;
use placement::engine::{
    AggregateResult, PlacementEngine, Preference, Prediction, RawScores, SchoolDirectory,
    SubjectCode,
};
use placement::error::AppError;
use serde::Serialize;
use tracing::debug;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Raw score as CODE=SCORE (e.g. ENG=65); repeat once per subject
    #[arg(
        long = "score",
        short = 's',
        required = true,
        value_parser = crate::infra::parse_score_arg
    )]
    pub(crate) scores: Vec<(SubjectCode, i32)>,
    /// Ranked school choice as "School:Program"; repeat in order of preference
    #[arg(long = "prefer", value_parser = crate::infra::parse_preference)]
    pub(crate) preferences: Vec<Preference>,
    /// Print JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    result: &'a AggregateResult,
    prediction: &'a Prediction,
}

pub(crate) fn run_score(args: ScoreArgs, config: &AppConfig) -> Result<(), AppError> {
    let ScoreArgs {
        scores,
        preferences,
        json,
    } = args;

    let engine = config.placement.engine();
    let directory = SchoolDirectory::ghana_sample();
    let scores = scores
        .into_iter()
        .collect::<RawScores>()
        .validated(config.placement.score_policy)?;
    debug!(subjects = scores.len(), "grading raw scores");

    let result = engine.compute_aggregate(&scores);
    let prediction = engine.predict(&scores, &preferences, &directory);

    if json {
        let output = ScoreOutput {
            result: &result,
            prediction: &prediction,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    render_score(&scores, &result, &prediction, &preferences, &engine);
    Ok(())
}

fn render_score(
    scores: &RawScores,
    result: &AggregateResult,
    prediction: &Prediction,
    preferences: &[Preference],
    engine: &PlacementEngine,
) {
    println!("Aggregate {} (raw total {})", result.aggregate, result.raw_total);
    println!("Category: {}", prediction.category.label());
    println!(
        "Performance: {} - {}",
        prediction.performance.label(),
        prediction.performance.headline()
    );

    println!("Subject grades:");
    for (code, grade) in &result.subject_grades {
        let raw = scores
            .get(code.as_str())
            .map(|score| score.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut notes = Vec::new();
        if engine.catalog().is_core(code.as_str()) {
            notes.push("core");
        }
        if result.defaulted_core.contains(code) {
            notes.push("not written");
        }
        if result.counted_electives.contains(code) {
            notes.push("counted");
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        println!("  - {code}: {raw} -> grade {grade}{notes}");
    }

    println!(
        "Predicted placement: {} / {}",
        prediction.school_label(),
        prediction.program_label()
    );
    match prediction.matched_preference {
        Some(rank) => println!("  Matched preference #{}", rank + 1),
        None if !preferences.is_empty() => println!(
            "  No preference is available in this category; suggesting the top-ranked school"
        ),
        None => {}
    }
    if prediction.available_schools.len() > 1 {
        println!(
            "  {} other schools serve this category",
            prediction.available_schools.len() - 1
        );
    }
    println!("Advice: {}", prediction.performance.advice());
}
