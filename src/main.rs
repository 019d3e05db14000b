use action_versions::core::format_error_with_help;
use action_versions::core::path::CONFIG_FILE_NAME;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "action-versions")]
#[command(about = "Publish the latest release tags of tracked GitHub Actions")]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every tracked action and rewrite the published files
    Update {
        /// Print the version list without writing any file
        #[arg(long)]
        dry_run: bool,
        /// Maximum number of repositories resolved at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Exit non-zero if the published files are out of date
    Check {
        /// Maximum number of repositories resolved at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Update {
            dry_run,
            concurrency,
        } => cli::update::run(&cli.config, dry_run, concurrency).await,
        Commands::Check { concurrency } => cli::check::run(&cli.config, concurrency).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display with helpful suggestions
            eprintln!("\n{}", format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
