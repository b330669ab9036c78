//! Stockscope CLI
//!
//! Command-line interface for the stock analysis API: submit a stock code,
//! wait for the analysis with a bounded poll, check on it by hand, or see
//! whether the API is up.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stockscope")]
#[command(about = "Stock analysis client", long_about = None)]
struct Cli {
    /// Analysis API URL
    #[arg(long, env = "STOCKSCOPE_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Log poller and client activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        api_url: cli.api_url,
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}

/// Log directives used when `RUST_LOG` is unset
///
/// Logs go to stderr next to the command output, so only warnings are shown
/// unless `--verbose` is given.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "stockscope_poller=debug,stockscope_client=debug"
    } else {
        "stockscope_poller=warn,stockscope_client=warn"
    }
}
