//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::{Path, PathBuf};

/// ScoreLens - student score analytics and reporting
///
/// Load a student-records dataset snapshot (students, courses, scores)
/// and generate score distributions, per-course box-plot statistics,
/// per-major averages, and hometown groupings. Markdown/JSON reports.
///
/// Examples:
///   scorelens --dataset records.json
///   scorelens --dataset records.json --format json --output report.json
///   scorelens --dataset records.json --student 2301610230
///   scorelens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the dataset snapshot (JSON)
    ///
    /// The file holds `students`, `courses`, and `scores` arrays.
    /// Not required when using --init-config.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SCORELENS_DATASET",
        required_unless_present = "init_config"
    )]
    pub dataset: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the configured output path (score_report.md).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Student id to include a per-student score section for
    #[arg(short, long, value_name = "ID")]
    pub student: Option<String>,

    /// Majors to report averages over (comma-separated)
    ///
    /// Overrides the configured major list; order is preserved in the
    /// report. Example: --majors 数据科学,软件工程
    #[arg(long, value_name = "MAJORS", value_delimiter = ',')]
    pub majors: Option<Vec<String>>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .scorelens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .scorelens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the dataset path, empty if not set (should be validated first).
    pub fn dataset_path(&self) -> &Path {
        self.dataset.as_deref().unwrap_or(Path::new(""))
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate the dataset path
        match self.dataset {
            None => return Err("A dataset file is required (--dataset)".to_string()),
            Some(ref path) => {
                if !path.exists() {
                    return Err(format!("Dataset file does not exist: {}", path.display()));
                }
                if !path.is_file() {
                    return Err(format!("Dataset path is not a file: {}", path.display()));
                }
            }
        }

        // Validate the major override
        if let Some(ref majors) = self.majors {
            if majors.is_empty() || majors.iter().any(|m| m.trim().is_empty()) {
                return Err("--majors must list at least one non-blank major".to_string());
            }
        }

        // Validate the student filter
        if let Some(ref student) = self.student {
            if student.trim().is_empty() {
                return Err("--student must not be blank".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
