use std::env;
use std::path::PathBuf;

use aggregate::{survey, AggregateOptions, Aggregator};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use coordeval_tools::{
    ensure_working_dir, format_diagnostic_counts, format_status_json, format_status_table,
    init_logging, load_campaign, write_pretty_json, CaseFilter, REQUIRED_CWD,
};
use matrix::layout::{CONFIG_FILE, DEFAULT_RUN_ID};
use matrix::{ConfigTemplate, GenerateOptions, MatrixGenerator};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "coordeval",
    version,
    about = "Coordinator evaluation campaign tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample a test matrix and write one directory per case per coordinator.
    Generate {
        /// Directory the matrix is written into.
        output_dir: PathBuf,
        /// Number of cases to sample.
        case_count: usize,
        /// Base configuration template.
        #[arg(long, default_value = CONFIG_FILE)]
        template: PathBuf,
        /// Campaign JSON replacing the built-in drone campaign.
        #[arg(long)]
        campaign: Option<PathBuf>,
        /// Seed for reproducible sampling.
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the working directory check.
        #[arg(long)]
        any_cwd: bool,
    },
    /// Merge the results of a test matrix into one JSON file.
    Aggregate {
        /// Test matrix directory.
        test_dir: PathBuf,
        /// Output JSON file.
        outfile: PathBuf,
        /// Run directory under results/ to read.
        #[arg(long, default_value = DEFAULT_RUN_ID)]
        run_id: String,
        /// Also write every diagnostic to this JSON file.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show per-coordinator progress of a test matrix.
    Status {
        /// Test matrix directory.
        test_dir: PathBuf,
        /// Optional glob filter on case directory names.
        #[arg(long)]
        glob: Option<String>,
        /// Run directory under results/ to inspect.
        #[arg(long, default_value = DEFAULT_RUN_ID)]
        run_id: String,
        /// Print the survey as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            output_dir,
            case_count,
            template,
            campaign,
            seed,
            any_cwd,
        } => {
            if !any_cwd {
                let cwd = env::current_dir().context("read working directory")?;
                ensure_working_dir(&cwd, REQUIRED_CWD)?;
            }
            let campaign = load_campaign(campaign.as_deref())?;
            let template = ConfigTemplate::load(&template).context("load template")?;
            let options = GenerateOptions {
                seed,
                ..GenerateOptions::default()
            };
            let mut generator = MatrixGenerator::new(campaign, template, options)
                .context("prepare test matrix")?;
            info!(
                cases = case_count,
                space = generator.space().len(),
                output = %output_dir.display(),
                "generating test matrix"
            );
            let report = generator
                .generate(&output_dir, case_count)
                .with_context(|| format!("generate into {}", output_dir.display()))?;
            println!(
                "Generated {} cases for {} coordinators in {} ({})",
                report.cases.len(),
                generator.coordinators().len(),
                output_dir.display(),
                format_diagnostic_counts(&report.diagnostics)
            );
        }
        Command::Aggregate {
            test_dir,
            outfile,
            run_id,
            report: report_path,
        } => {
            let options = AggregateOptions {
                run_id,
                ..AggregateOptions::default()
            };
            let report = Aggregator::new(options)
                .aggregate(&test_dir)
                .with_context(|| format!("aggregate {}", test_dir.display()))?;
            if let Some(path) = &report_path {
                write_pretty_json(path, &report.diagnostics)?;
            }
            if report.is_broken() {
                warn!(outfile = %outfile.display(), "aggregation is broken, nothing written");
                println!(
                    "Failed to write {}. Fix the broken results directories and rerun.",
                    outfile.display()
                );
                bail!(
                    "aggregation is broken: {}",
                    format_diagnostic_counts(&report.diagnostics)
                );
            }
            report
                .write_json(&outfile)
                .with_context(|| format!("write {}", outfile.display()))?;
            match report.uniform_case_count() {
                Some(count) => println!("Collected data for {count} cases for each coordinator."),
                None => {
                    println!("Note: not all coordinators have the same number of cases.");
                    for (coordinator, count) in report.case_counts() {
                        println!("  {coordinator}: {count}");
                    }
                }
            }
        }
        Command::Status {
            test_dir,
            glob,
            run_id,
            json,
        } => {
            let filter = CaseFilter::new(glob.as_deref())?;
            let statuses = survey(&test_dir, &run_id, |case| filter.matches(case))
                .with_context(|| format!("survey {}", test_dir.display()))?;
            if json {
                println!("{}", format_status_json(&statuses)?);
            } else {
                print!("{}", format_status_table(&statuses));
            }
        }
    }
    Ok(())
}
