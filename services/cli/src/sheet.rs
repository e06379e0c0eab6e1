use chrono::{Local, NaiveDate};
use clap::Args;
use placement::config::AppConfig;
use placement::engine::SchoolDirectory;
use placement::error::AppError;
use placement::intake::{ScoreSheetImporter, ScoreSheetRow};
use placement::records::{
    generate_alerts, InMemoryStudentRepository, MockTest, PerformanceAlert, PlacementService,
    PlacementServiceError, StudentProfile,
};
use placement::report::{ClassReport, ReportLimits};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct SheetArgs {
    /// CSV score sheet with an Index Number column and one column per subject
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Date applied to rows without a Date column (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of top performers to list
    #[arg(long, default_value_t = ReportLimits::default().top_performers)]
    pub(crate) top: usize,
    /// Print JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
struct SheetOutput<'a> {
    recorded: usize,
    skipped: usize,
    report: &'a ClassReport,
    alerts: &'a [PerformanceAlert],
}

type Service = PlacementService<InMemoryStudentRepository>;

pub(crate) fn run_sheet(args: SheetArgs, config: &AppConfig) -> Result<(), AppError> {
    let SheetArgs {
        csv,
        today,
        top,
        json,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let engine = Arc::new(config.placement.engine());
    let rows = ScoreSheetImporter::from_path(&csv, engine.catalog(), today)?;

    let service = PlacementService::new(
        Arc::new(InMemoryStudentRepository::default()),
        engine.clone(),
        Arc::new(SchoolDirectory::ghana_sample()),
        config.placement.score_policy,
    );

    let mut recorded = 0;
    let mut skipped = 0;
    for row in rows {
        let line = row.line;
        match record_row(&service, row) {
            Ok(_) => recorded += 1,
            Err(err @ PlacementServiceError::Repository(_)) => return Err(err.into()),
            Err(err) => {
                warn!(line, error = %err, "skipping score sheet row");
                skipped += 1;
            }
        }
    }
    info!(path = %csv.display(), recorded, skipped, "imported score sheet");

    let students = service.students()?;
    let alerts = generate_alerts(&students);
    let limits = ReportLimits {
        top_performers: top,
        ..ReportLimits::default()
    };
    let report = ClassReport::build(&students, engine.catalog(), limits);

    if json {
        let output = SheetOutput {
            recorded,
            skipped,
            report: &report,
            alerts: &alerts,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    render_report(&report, &alerts, recorded, skipped);
    Ok(())
}

/// Records a row, registering the index number first when it is new.
fn record_row(service: &Service, row: ScoreSheetRow) -> Result<MockTest, PlacementServiceError> {
    let ScoreSheetRow {
        index_number,
        student_name,
        gender,
        header,
        scores,
        ..
    } = row;

    let profile = StudentProfile {
        name: student_name.unwrap_or_else(|| format!("Student {index_number}")),
        index_number,
        class_name: String::new(),
        gender: gender.unwrap_or_default(),
        date_of_birth: None,
        parent_contact: None,
    };
    service.record_test_or_register(profile, header, scores)
}

fn render_report(
    report: &ClassReport,
    alerts: &[PerformanceAlert],
    recorded: usize,
    skipped: usize,
) {
    println!("Score sheet import");
    println!("- {recorded} tests recorded, {skipped} rows skipped");
    println!(
        "- {} students ({} with tests)",
        report.total_students, report.students_with_tests
    );
    match report.average_aggregate {
        Some(average) => println!("- Average aggregate {average:.1}"),
        None => println!("- Average aggregate n/a"),
    }
    if let Some(rate) = report.improvement_rate_pct {
        println!("- {rate:.0}% of repeat takers improved since their first test");
    }

    println!("\nCategory distribution:");
    for entry in &report.category_distribution {
        println!("  - {}: {}", entry.category_label, entry.students);
    }

    println!("\nGender distribution:");
    for entry in report.gender_distribution.iter().filter(|entry| entry.students > 0) {
        println!("  - {}: {}", entry.gender_label, entry.students);
    }

    if !report.top_performers.is_empty() {
        println!("\nTop performers:");
        for (rank, entry) in report.top_performers.iter().enumerate() {
            println!(
                "  {}. {} ({}) aggregate {} | {} | {}",
                rank + 1,
                entry.name,
                entry.index_number,
                entry.aggregate,
                entry.category_label,
                entry.predicted_school
            );
        }
    }

    if !report.subject_averages.is_empty() {
        println!("\nSubject averages:");
        for entry in &report.subject_averages {
            println!("  - {} ({}): {:.1}", entry.name, entry.code, entry.average_score);
        }
    }

    if !report.predicted_schools.is_empty() {
        println!("\nPredicted schools:");
        for entry in &report.predicted_schools {
            println!("  - {}: {}", entry.school, entry.students);
        }
    }

    if !report.improvement_trend.is_empty() {
        println!("\nImprovement since first test:");
        for entry in &report.improvement_trend {
            println!(
                "  - {}: {} -> {} ({:+})",
                entry.name, entry.first_aggregate, entry.latest_aggregate, entry.improvement
            );
        }
    }

    if !alerts.is_empty() {
        println!("\nAlerts:");
        for alert in alerts {
            println!("  - [{}] {}", alert.title, alert.message);
        }
    }
}
