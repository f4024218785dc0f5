//! ScoreLens - Student Score Analytics
//!
//! A CLI tool that loads a student-records dataset snapshot and
//! generates score distributions, per-course box-plot statistics,
//! per-major averages, and hometown groupings as a report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (load, parse, or config failure)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use dataset::Dataset;
use models::{Report, ReportMetadata};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("ScoreLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Generate the report
    if let Err(e) = run_report(args) {
        error!("Report generation failed: {}", e);
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .scorelens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".scorelens.toml");

    if path.exists() {
        eprintln!("⚠️  .scorelens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .scorelens.toml")?;

    println!("✅ Created .scorelens.toml with default settings.");
    println!("   Edit it to customize the major list and output path.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow.
fn run_report(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    // Step 1: Load the dataset snapshot
    let dataset_path = args.dataset_path().to_path_buf();
    println!("📂 Loading dataset: {}", dataset_path.display());

    let dataset = Dataset::load(&dataset_path)
        .with_context(|| format!("Failed to load dataset {}", dataset_path.display()))?;
    info!(
        "Loaded {} students, {} courses, {} scores",
        dataset.students.len(),
        dataset.courses.len(),
        dataset.scores.len()
    );

    // Step 2: Run the aggregations
    println!("📊 Aggregating scores...");
    let visualization = analysis::visualization_report(&dataset, &config.report.majors);
    let overview = analysis::overview(&dataset, config.report.recent_limit);

    // Optional per-student section
    let student = match args.student {
        Some(ref id) => match analysis::student_report(&dataset, id) {
            Some(section) => Some(section),
            None => bail!("Student not found in dataset: {}", id),
        },
        None => None,
    };

    // Step 3: Build the report bundle
    let duration = start_time.elapsed().as_secs_f64();
    let metadata = ReportMetadata {
        dataset_path: dataset_path.display().to_string(),
        generated_at: Utc::now(),
        student_count: dataset.students.len(),
        course_count: dataset.courses.len(),
        score_count: dataset.scores.len(),
        duration_seconds: duration,
    };

    let bundle = Report {
        metadata,
        overview,
        visualization,
        student,
    };

    // Step 4: Render and save
    let output_path = PathBuf::from(&config.general.output);
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&bundle)?,
        OutputFormat::Markdown => report::generate_markdown_report(&bundle),
    };

    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    let dist = &bundle.visualization.distribution;
    println!("\n📈 Score Summary:");
    println!(
        "   <60: {} | 60-70: {} | 70-80: {} | 80-90: {} | 90-100: {}",
        dist.below_60, dist.from_60, dist.from_70, dist.from_80, dist.from_90
    );
    println!(
        "   Courses: {} | Majors: {} | Hometowns: {}",
        bundle.visualization.course_names.len(),
        bundle.visualization.majors.len(),
        bundle.visualization.hometown_names.len()
    );
    println!(
        "\n✅ Report saved to: {}",
        output_path.display()
    );

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .scorelens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
