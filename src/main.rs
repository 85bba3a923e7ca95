use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plan_consolidator::passes::{self, consolidate, overrides, reconcile};
use plan_consolidator::plan_core::ScoringMode;
use plan_consolidator::PlanConfig;

#[derive(Parser)]
#[command(name = "plancon")]
#[command(about = "Consolidate a gap register with sprint plans and keep the plan current")]
struct Cli {
    /// Config file (JSON). Defaults to the user config directory.
    #[arg(short, long, global = true, env = "PLANCON_CONFIG")]
    config: Option<PathBuf>,

    /// Directory receiving plan files and the match report
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the gap register against sprint plans and write the first plan
    Consolidate {
        #[command(flatten)]
        matching: MatchArgs,

        /// Plan file to write
        #[arg(long)]
        output: Option<PathBuf>,

        /// Match report file to write
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Recompute statuses from planned dates and fill missing comments
    Reconcile {
        /// Plan file to read (default: first plan)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Plan file to write (default: second plan)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Reference date, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Apply manual overrides and expand backlog rows
    Overrides {
        /// Plan file to read (default: second plan)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Plan file to write (default: third plan)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Override table (JSON) replacing the built-in one
        #[arg(long)]
        table: Option<PathBuf>,
    },
    /// Run all passes in order
    Run {
        #[command(flatten)]
        matching: MatchArgs,

        /// Reference date, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

/// Inputs and scoring for the matching pass, overriding the config file.
#[derive(Args, Debug)]
struct MatchArgs {
    /// Directory holding the sprint plan files
    #[arg(long)]
    sprint_dir: Option<PathBuf>,

    /// Gap register file
    #[arg(long)]
    gap_file: Option<PathBuf>,

    /// Score a match must exceed
    #[arg(long)]
    threshold: Option<f64>,

    /// Scoring mode: baseline or enhanced
    #[arg(long, value_parser = parse_scoring)]
    scoring: Option<ScoringMode>,
}

impl MatchArgs {
    fn apply(self, config: &mut PlanConfig) -> anyhow::Result<()> {
        if let Some(dir) = self.sprint_dir {
            config.sprint_dir = dir;
        }
        if let Some(file) = self.gap_file {
            config.gap_file = file;
        }
        if let Some(mode) = self.scoring {
            config.scoring = mode;
        }
        if self.threshold.is_some() {
            config.match_threshold = self.threshold;
        }
        config.validate()?;
        Ok(())
    }
}

fn parse_scoring(s: &str) -> Result<ScoringMode, String> {
    ScoringMode::from_str(s).ok_or_else(|| format!("unknown scoring mode '{}' (baseline, enhanced)", s))
}

/// Initialize tracing. Logs go to stderr; stdout carries only the summary.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "plancon=info,plan_consolidator=info,plan_core=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = PlanConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    match cli.command {
        Some(Commands::Consolidate {
            matching,
            output,
            report,
        }) => {
            matching.apply(&mut config)?;

            let output = output.unwrap_or_else(|| config.plan_path(1));
            let report = report.unwrap_or_else(|| config.match_report_path());
            let summary = consolidate::run_consolidate(&config, &output, &report)?;
            println!(
                "Consolidated {} requirements from {} sprint files: {} matched, {} backlog, {} rows -> {}",
                summary.requirements - summary.skipped_unlabeled,
                summary.sprint_files,
                summary.matched,
                summary.unmatched,
                summary.rows,
                output.display()
            );
        }
        Some(Commands::Reconcile { input, output, as_of }) => {
            if as_of.is_some() {
                config.reference_date = as_of;
            }
            let input = input.unwrap_or_else(|| config.plan_path(1));
            let output = output.unwrap_or_else(|| config.plan_path(2));
            let summary = reconcile::run_reconcile(&input, &output, config.reference_date())?;
            println!(
                "Reconciled {} rows: {} status updates, {} terminology updates, {} comments filled -> {}",
                summary.rows,
                summary.status_updates,
                summary.terminology_updates,
                summary.comment_fills,
                output.display()
            );
        }
        Some(Commands::Overrides { input, output, table }) => {
            if table.is_some() {
                config.overrides_file = table;
            }
            let table = config.override_table()?;
            let input = input.unwrap_or_else(|| config.plan_path(2));
            let output = output.unwrap_or_else(|| config.plan_path(3));
            let summary = overrides::run_overrides(&input, &output, &table)?;
            println!(
                "Applied {} overrides ({} duplicates dropped), expanded {} backlog items: {} -> {} rows -> {}",
                summary.overrides_applied,
                summary.duplicates_dropped,
                summary.backlog_expanded,
                summary.rows_in,
                summary.rows_out,
                output.display()
            );
        }
        Some(Commands::Run { matching, as_of }) => {
            matching.apply(&mut config)?;
            if as_of.is_some() {
                config.reference_date = as_of;
            }
            run_all(&config)?;
        }
        None => {
            // Default: full pipeline
            run_all(&config)?;
        }
    }

    Ok(())
}

fn run_all(config: &PlanConfig) -> anyhow::Result<()> {
    let summary = passes::run_pipeline(config)?;
    println!(
        "Pass 1: {} matched, {} backlog, {} rows -> {}",
        summary.consolidate.matched,
        summary.consolidate.unmatched,
        summary.consolidate.rows,
        config.plan_path(1).display()
    );
    println!(
        "Pass 2: {} status updates, {} comments filled -> {}",
        summary.reconcile.status_updates,
        summary.reconcile.comment_fills,
        config.plan_path(2).display()
    );
    println!(
        "Pass 3: {} overrides, {} backlog items expanded, {} rows -> {}",
        summary.overrides.overrides_applied,
        summary.overrides.backlog_expanded,
        summary.overrides.rows_out,
        config.plan_path(3).display()
    );
    Ok(())
}
