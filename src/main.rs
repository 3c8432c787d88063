//! bibresolve - author resolution and deduplication for bibliographic exports
//!
//! ## Usage
//!
//! ### Clean an export
//! ```bash
//! bibresolve clean --roster authors.csv --papers scopus.csv --output cleaned.csv
//! ```
//!
//! ### Check how citation names resolve
//! ```bash
//! bibresolve lookup --roster authors.csv "Jovanović A." "Smith J.M."
//! ```

use anyhow::{Context, Result};
use bibresolve::index::AuthorIndex;
use bibresolve::matcher::FormatMatcher;
use bibresolve::model::PaperKind;
use bibresolve::normalize::NameNormalizer;
use bibresolve::pipeline::{PipelineConfig, ResolutionPipeline};
use bibresolve::tabular;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Resolve citation author names against a roster and drop duplicate papers
#[derive(Parser)]
#[command(name = "bibresolve")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a paper export: filter types, drop duplicates, resolve authors
    Clean {
        /// Roster CSV (given_name, family_name, middle_name)
        #[arg(long)]
        roster: PathBuf,

        /// Paper export CSV
        #[arg(long)]
        papers: PathBuf,

        /// Cleaned output CSV
        #[arg(short, long, default_value = "cleaned.csv")]
        output: PathBuf,

        /// Publication type to keep (repeatable; default: all recognized types)
        #[arg(long = "kind")]
        kinds: Vec<PaperKind>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Resolve individual citation names and show which shape matched
    Lookup {
        /// Roster CSV (given_name, family_name, middle_name)
        #[arg(long)]
        roster: PathBuf,

        /// Citation names, e.g. "Smith J.M."
        #[arg(required = true)]
        names: Vec<String>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Clean {
            roster,
            papers,
            output,
            kinds,
            report,
        } => run_clean(&roster, &papers, &output, &kinds, report.as_deref()),
        Commands::Lookup { roster, names } => run_lookup(&roster, &names),
    }
}

fn build_index(roster: &Path) -> Result<AuthorIndex> {
    let authors = tabular::load_roster(roster)
        .with_context(|| format!("Failed to load roster {}", roster.display()))?;
    AuthorIndex::from_records(NameNormalizer::new(), authors).context("Failed to build author index")
}

// ============================================================================
// Commands
// ============================================================================

fn run_clean(
    roster: &Path,
    papers_path: &Path,
    output: &Path,
    kinds: &[PaperKind],
    report_path: Option<&Path>,
) -> Result<()> {
    info!(roster = %roster.display(), "Initializing author index");
    let index = build_index(roster)?;

    let papers = tabular::load_papers(papers_path)
        .with_context(|| format!("Failed to load papers {}", papers_path.display()))?;

    let config = PipelineConfig::default().with_kinds(kinds);
    let pipeline = ResolutionPipeline::new(index, config).context("Failed to set up pipeline")?;
    let result = pipeline.run(&papers);

    tabular::save_cleaned(output, &result.papers).context("Failed to write cleaned papers")?;

    if let Some(path) = report_path {
        tabular::save_report(path, &result.report).context("Failed to write run report")?;
    }

    println!(
        "Kept {} of {} papers ({} duplicates, {} other types). Output: {}",
        result.report.emitted,
        result.report.rows_read,
        result.report.skipped_duplicate,
        result.report.skipped_kind,
        output.display()
    );
    Ok(())
}

fn run_lookup(roster: &Path, names: &[String]) -> Result<()> {
    let index = build_index(roster)?;
    let matcher = FormatMatcher::new().context("Failed to compile name shapes")?;

    for name in names {
        match matcher.resolve(&index, name) {
            Some(resolution) => println!(
                "{} -> {} (step {}, {:?} \"{}\")",
                name,
                resolution.author.display_name(),
                resolution.step,
                resolution.template,
                resolution.query
            ),
            None => println!("{} -> no match", name),
        }
    }
    Ok(())
}
