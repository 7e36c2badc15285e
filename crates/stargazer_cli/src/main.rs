//! Stargazer CLI - capture and enrich GitHub repository stargazers.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

use crate::commands::limits::OutputFormat;

#[derive(Parser)]
#[command(name = "stargazer")]
#[command(version)]
#[command(about = "Capture and enrich GitHub repository stargazers")]
#[command(
    long_about = "Stargazer lists the accounts that starred a GitHub repository along with \
their starring timestamps, enriches each account with its public profile, and extracts \
LinkedIn profile URLs from profile text where present. Results are written as timestamped \
JSON artifacts; long runs can be split into batches and merged back together."
)]
#[command(after_long_help = r#"EXAMPLES
    Fetch and enrich every stargazer of a repository:
        $ stargazer fetch rust-lang/rust

    Process the third batch of 100, reusing a saved star list:
        $ stargazer fetch rust-lang/rust -e stargazers_raw_20240301_090000.json -n 3

    Collect the raw star list only:
        $ stargazer fetch https://github.com/rust-lang/rust/stargazers --skip-enrichment

    Merge all enriched batch files into one dataset:
        $ stargazer merge --pattern 'stargazers_enriched_*.json'

    Show the current API rate limit:
        $ stargazer limits

CONFIGURATION
    Stargazer reads configuration from:
      1. ~/.config/stargazer/config.toml (or $XDG_CONFIG_HOME/stargazer/config.toml)
      2. ./stargazer.toml
      3. Environment variables (STARGAZER_* prefix, e.g., STARGAZER_GITHUB_TOKEN)
      4. .env file in the current directory

ENVIRONMENT VARIABLES
    STARGAZER_GITHUB_TOKEN        GitHub personal access token (raises the API quota
                                  from 60 to 5000 requests/hour)
    STARGAZER_RUN_OUTPUT          Default output prefix (default: stargazers)
"#)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a repository's stargazers and enrich them with profile data
    Fetch {
        /// Repository as owner/repo or a github.com URL
        repo: String,

        #[command(flatten)]
        opts: FetchOptions,
    },
    /// Merge enriched batch files into one deduplicated dataset
    Merge {
        /// File pattern to merge (shell-style wildcards)
        #[arg(short, long, default_value = "stargazers_enriched_*.json")]
        pattern: String,

        /// Output file prefix (default from config or "stargazers")
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show current GitHub API rate limit status
    Limits {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Options for the fetch command.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FetchOptions {
    /// GitHub personal access token (overrides config)
    #[arg(short, long)]
    token: Option<String>,

    /// Output file prefix; kind, batch, and timestamp are appended
    #[arg(short, long)]
    output: Option<String>,

    /// Maximum number of stargazers to process
    #[arg(short, long)]
    limit: Option<usize>,

    /// Number of stargazers to skip
    #[arg(long)]
    skip: Option<usize>,

    /// Stargazers per batch (default from config or 100)
    #[arg(short = 'b', long)]
    batch_size: Option<usize>,

    /// 1-based batch number to process (enables batch mode)
    #[arg(short = 'n', long)]
    batch_number: Option<usize>,

    /// Load the star list from an existing raw artifact instead of the API
    #[arg(short = 'e', long, value_name = "PATH")]
    use_existing: Option<PathBuf>,

    /// Only collect the raw star list, skip profile enrichment
    #[arg(short = 's', long)]
    skip_enrichment: bool,

    /// Disable courtesy request pacing (quota waits still apply)
    #[arg(short = 'R', long)]
    no_pacing: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Set up graceful shutdown handler (Ctrl+C)
    shutdown::setup_shutdown_handler();

    // Structured logging for non-TTY mode; progress bars own the terminal
    // otherwise.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("stargazer=info,stargazer_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config files -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { repo, opts } => {
            commands::fetch::handle_fetch(&repo, opts, &config).await?;
        }
        Commands::Merge { pattern, output } => {
            commands::merge::handle_merge(&pattern, output.as_deref(), &config)?;
        }
        Commands::Limits { output } => {
            commands::limits::handle_limits(output, &config).await?;
        }
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
    }

    Ok(())
}
