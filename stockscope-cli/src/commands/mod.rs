//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod analyze;
mod check;
mod status;

pub use analyze::AnalyzeArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a stock code and wait for the analysis
    Analyze(AnalyzeArgs),
    /// Check once whether an analysis has finished
    Check {
        /// Stock code, e.g. 000001
        code: String,
    },
    /// Show whether the analysis API is reachable
    Status,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Analyze(args) => analyze::handle_analyze(args, config).await,
        Commands::Check { code } => check::handle_check(&code, config).await,
        Commands::Status => status::handle_status(config).await,
    }
}

/// Trims a stock code, rejecting empty input
pub(crate) fn normalize_code(code: &str) -> Result<&str> {
    let code = code.trim();
    if code.is_empty() {
        anyhow::bail!("stock code is required");
    }
    Ok(code)
}
