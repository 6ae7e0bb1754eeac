use clap::{Parser, Subcommand};
use clubplan::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clubplan")]
#[command(about = "Club launch and expansion planner. Master sheet in, execution plan out.")]
#[command(long_about = "clubplan - Club launch and expansion planner

Reads the activity master sheet of an Excel workbook and generates a
multi-sheet execution plan: club launches, club expansions, summary,
16-week execution timeline, milestones and city progress.

COMMANDS:
  generate     - Build the plan workbook from a master data workbook
  inspect      - List sheets, headers and status distribution of a workbook
  init-config  - Write the default YAML configuration

EXAMPLES:
  clubplan generate \"OND-JFM Plan.xlsx\"             # writes \"OND-JFM Plan PLAN.xlsx\"
  clubplan generate master.xlsx -o plan.xlsx -c plan.yaml
  clubplan generate master.xlsx --dry-run            # print the summary only
  clubplan inspect plan.xlsx --json
  clubplan init-config plan.yaml

LOGGING:
  Set RUST_LOG (e.g. RUST_LOG=clubplan=debug) for detailed logs on stderr.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Generate the plan workbook.

Reads the master data sheet ('Working sheet' by default) and the optional
'Events' sheet, computes launch and expansion actions, and writes the plan.

OUTPUT SHEETS (in order):
  Club_Expansion, Club_Launches, Summary, Weekly_Execution, Milestone,
  City_Progress, Working_Sheet, Events, Logic
  (+ Club_Maintenance with --maintenance)

Nothing is written if reading or planning fails.
Use --dry-run to preview the summary without writing a file.")]
    /// Generate the plan workbook from a master data workbook
    Generate {
        /// Input workbook (.xlsx) with the master data sheet
        input: PathBuf,

        /// Output workbook (default: '<input stem> PLAN.xlsx' next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML configuration file
        #[arg(short, long, env = "CLUBPLAN_CONFIG")]
        config: Option<PathBuf>,

        /// Append the Club_Maintenance sheet
        #[arg(long)]
        maintenance: bool,

        /// Print the plan summary without writing the workbook
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show verbose progress
        #[arg(short, long)]
        verbose: bool,
    },

    /// List sheets, headers and status distribution of a workbook
    Inspect {
        /// Workbook (.xlsx) to inspect
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration as YAML
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "clubplan=info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Generate { verbose: true, .. });
    init_tracing(verbose);

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            maintenance,
            dry_run,
            verbose,
        } => cli::generate(cli::GenerateOptions {
            input,
            output,
            config,
            maintenance,
            dry_run,
            verbose,
        })?,

        Commands::Inspect { file, json } => cli::inspect(file, json)?,

        Commands::InitConfig { path, force } => cli::init_config(path, force)?,
    }

    Ok(())
}
