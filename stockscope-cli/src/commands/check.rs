//! Check command handler
//!
//! A single, user-initiated result check. It never starts a poll and never
//! triggers a new analysis run.

use anyhow::Result;
use colored::*;
use std::sync::Arc;
use stockscope_client::AnalysisClient;
use stockscope_core::domain::check::CheckResult;
use stockscope_poller::ResultPoller;

use crate::commands::normalize_code;
use crate::config::Config;
use crate::output;

/// Handle `stockscope check <code>`
pub async fn handle_check(code: &str, config: &Config) -> Result<()> {
    let code = normalize_code(code)?;
    let poller = ResultPoller::new(Arc::new(AnalysisClient::new(&config.api_url)));

    println!("{}", format!("⏳ Checking analysis for {}...", code).dimmed());

    match poller.check_once(code).await {
        CheckResult::Ready(payload) => output::print_report_payload(&payload),
        CheckResult::NotReady => {
            println!(
                "{}",
                "Analysis is still in progress, try again later.".yellow()
            );
            Ok(())
        }
        CheckResult::Error(e) => anyhow::bail!("Check failed: {}", e),
    }
}
