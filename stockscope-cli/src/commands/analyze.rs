//! Analyze command handler
//!
//! Submits a stock code, then waits for the finished analysis with a
//! bounded poll. Ctrl-C cancels the wait.

use anyhow::Result;
use clap::Args;
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use stockscope_client::AnalysisClient;
use stockscope_core::classify;
use stockscope_core::domain::check::CheckResult;
use stockscope_core::domain::poll::{PollEvent, PollOutcome};
use stockscope_poller::{PollConfig, ResultPoller};
use tokio::sync::broadcast::error::RecvError;

use crate::commands::normalize_code;
use crate::config::Config;
use crate::output;

/// Arguments for `stockscope analyze`
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Stock code, e.g. 000001
    code: String,

    /// Seconds between result checks
    #[arg(long)]
    interval: Option<u64>,

    /// Number of "still working" answers before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Number of failed checks in a row before giving up
    #[arg(long)]
    max_failures: Option<u32>,

    /// Submit only; do not wait for the result
    #[arg(long)]
    no_wait: bool,
}

impl AnalyzeArgs {
    /// Layers the command-line flags over the environment/default config
    fn poll_config(&self, base: PollConfig) -> Result<PollConfig> {
        let mut config = base;
        if let Some(secs) = self.interval {
            config.interval = Duration::from_secs(secs);
        }
        if let Some(max_attempts) = self.max_attempts {
            config = config.with_max_attempts(max_attempts);
        }
        if let Some(max_failures) = self.max_failures {
            config = config.with_max_consecutive_failures(max_failures);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Handle `stockscope analyze`
pub async fn handle_analyze(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let code = normalize_code(&args.code)?.to_string();
    let poll_config = args.poll_config(PollConfig::from_env()?)?;
    let client = Arc::new(AnalysisClient::new(&config.api_url));

    println!("{}", format!("Analyzing stock {}...", code).bold());

    let response = client.request_analysis(&code).await.map_err(|e| {
        let message = match output::client_error_hint(&e) {
            Some(hint) => format!("Failed to submit analysis ({})", hint),
            None => "Failed to submit analysis".to_string(),
        };
        anyhow::Error::new(e).context(message)
    })?;

    if let Some(error) = response.error_message() {
        anyhow::bail!("Analysis request rejected: {}", error);
    }

    if let Some(info) = &response.stock_info {
        output::print_stock_info(info);
    }

    if let CheckResult::Ready(payload) = classify(response, &code) {
        return output::print_report_payload(&payload);
    }

    if args.no_wait {
        println!("{}", "Analysis submitted.".green());
        println!(
            "{}",
            format!("  Run `stockscope check {}` to fetch the result.", code).dimmed()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Waiting for the analysis (checking every {}s, up to {} times)...",
            poll_config.interval.as_secs(),
            poll_config.max_attempts
        )
        .dimmed()
    );

    let poller = ResultPoller::new(client);
    let mut events = poller.subscribe();
    poller.start(code.clone(), poll_config.clone())?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PollEvent::Finished(outcome)) => {
                    return report_outcome(&outcome, &poll_config);
                }
                Ok(tick) => println!("{}", output::format_tick(&tick, poll_config.max_attempts)),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => {
                poller.cancel();
            }
        }
    }
}

fn report_outcome(outcome: &PollOutcome, poll_config: &PollConfig) -> Result<()> {
    match outcome {
        PollOutcome::Succeeded { payload, .. } => output::print_report_payload(payload),
        PollOutcome::TimedOut { job_id, attempts } => {
            let waited = poll_config.interval * *attempts;
            println!(
                "{}",
                format!(
                    "⏰ The analysis is taking longer than expected (waited ~{}s).",
                    waited.as_secs()
                )
                .yellow()
            );
            println!(
                "{}",
                format!(
                    "  Stopped checking automatically. Run `stockscope check {}` later.",
                    job_id
                )
                .dimmed()
            );
            Ok(())
        }
        PollOutcome::Failed { job_id, reason } => {
            println!(
                "{}",
                "  Stopped retrying to avoid wasting calls to the backend.".dimmed()
            );
            anyhow::bail!("Result check for {} failed: {}", job_id, reason)
        }
        PollOutcome::Cancelled { job_id } => {
            println!("{}", format!("Stopped waiting for {}.", job_id).yellow());
            Ok(())
        }
    }
}
