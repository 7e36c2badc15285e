//! The limits command: show current API rate limit status.

use chrono::Local;
use clap::ValueEnum;

use stargazer::github::GitHubClient;
use stargazer::github::types::RateLimitResource;

use crate::config::Config;

/// Output format for the limits command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Raw JSON as returned by the API.
    Json,
}

pub(crate) async fn handle_limits(
    format: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = GitHubClient::new(config.github_token().as_deref(), None)?;
    let limits = client.rate_limit().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&limits)?);
        }
        OutputFormat::Table => {
            println!(
                "{:<10} {:>7} {:>7} {:>10}  {}",
                "RESOURCE", "LIMIT", "USED", "REMAINING", "RESETS AT"
            );
            print_row("core", &limits.resources.core);
            if let Some(search) = &limits.resources.search {
                print_row("search", search);
            }
            if !client.is_authenticated() {
                println!();
                println!(
                    "Unauthenticated quota. Set STARGAZER_GITHUB_TOKEN to raise the \
                     core limit to 5000 requests/hour."
                );
            }
        }
    }

    Ok(())
}

fn print_row(name: &str, resource: &RateLimitResource) {
    let reset = resource.reset_at().with_timezone(&Local);
    println!(
        "{:<10} {:>7} {:>7} {:>10}  {}",
        name,
        resource.limit,
        resource.used,
        resource.remaining,
        reset.format("%Y-%m-%d %H:%M:%S")
    );
}
