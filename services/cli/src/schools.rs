use clap::Args;
use placement::config::AppConfig;
use placement::engine::{Category, School, SchoolDirectory};
use placement::error::AppError;
use std::collections::HashSet;

#[derive(Args, Debug, Default)]
pub(crate) struct SchoolsArgs {
    /// Only list schools in this category (A, B, C, D or a category name)
    #[arg(long, value_parser = crate::infra::parse_category)]
    pub(crate) category: Option<Category>,
    /// Only list schools in this region
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Only list schools offering this program
    #[arg(long)]
    pub(crate) program: Option<String>,
    /// Print JSON instead of a text listing
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_schools(args: SchoolsArgs, config: &AppConfig) -> Result<(), AppError> {
    let directory = SchoolDirectory::ghana_sample();
    let schools = select(&directory, &args);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schools)?);
        return Ok(());
    }

    let thresholds = config.placement.engine().thresholds().clone();
    println!(
        "Category thresholds ({}):",
        config.placement.thresholds.label()
    );
    for band in thresholds.bands() {
        println!(
            "  - {}: aggregate {} or better",
            band.category.label(),
            band.max_aggregate
        );
    }
    println!("  - {}: anything else", thresholds.fallback().label());

    println!("\n{} schools", schools.len());
    for school in &schools {
        println!(
            "  - {} [{}] {} | {} | capacity {} | {}",
            school.name,
            school.code,
            school.category.short_label(),
            school.region,
            school.capacity,
            school.programs.join(", ")
        );
    }
    Ok(())
}

fn select<'a>(directory: &'a SchoolDirectory, args: &SchoolsArgs) -> Vec<&'a School> {
    let mut selected: Vec<&School> = match args.category {
        Some(category) => directory.in_category(category).collect(),
        None => directory.schools().iter().collect(),
    };
    if let Some(region) = args.region.as_deref() {
        keep(&mut selected, directory.in_region(region));
    }
    if let Some(program) = args.program.as_deref() {
        keep(&mut selected, directory.offering(program));
    }
    selected
}

/// Narrows `selected` to the schools `matching` yields, keeping directory order.
fn keep<'a>(selected: &mut Vec<&School>, matching: impl Iterator<Item = &'a School>) {
    let codes: HashSet<&str> = matching.map(|school| school.code.as_str()).collect();
    selected.retain(|school| codes.contains(school.code.as_str()));
}
