//! Terminal output
//!
//! Printing helpers shared by the analyze and check commands.

use anyhow::{Context, Result};
use colored::*;
use stockscope_client::ClientError;
use stockscope_core::domain::poll::{PollEvent, TickResult};
use stockscope_core::domain::report::AnalysisReport;

/// Print the basic quote returned with a freshly submitted analysis
pub fn print_stock_info(info: &serde_json::Value) {
    let name = info.get("name").and_then(|v| v.as_str()).unwrap_or("?");
    println!("  {} {}", "▸".cyan(), name.bold());

    for (label, key) in [
        ("Price", "price"),
        ("Change", "change"),
        ("Change %", "change_percent"),
        ("Market cap", "market_cap"),
        ("Industry", "industry"),
    ] {
        if let Some(value) = info.get(key) {
            println!("    {:<11} {}", format!("{}:", label), display_value(value));
        }
    }
    println!();
}

/// Print a finished report carried as a poll payload
pub fn print_report_payload(payload: &serde_json::Value) -> Result<()> {
    let report: AnalysisReport =
        serde_json::from_value(payload.clone()).context("Result payload is not a report")?;
    print_report(&report);
    Ok(())
}

/// Print a finished analysis report
pub fn print_report(report: &AnalysisReport) {
    println!("{}", "✓ Analysis complete".green().bold());
    println!("  Stock:   {}", report.stock_code.cyan());
    println!("  Source:  {}", report.data_source.dimmed());
    println!("  Time:    {}", report.timestamp.dimmed());

    let sections = report.sections();
    if sections.is_empty() {
        if let Some(analysis) = &report.analysis {
            println!("\n{}", "Analysis:".bold());
            match serde_json::to_string_pretty(analysis) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{:?}", analysis),
            }
        }
        return;
    }

    for (title, text) in sections {
        println!("\n{}", format!("{}:", title).bold());
        println!("{}", "─".repeat(80).dimmed());
        for paragraph in paragraphs(text) {
            println!("{}\n", paragraph);
        }
    }
}

/// One progress line for a poll tick
pub fn format_tick(event: &PollEvent, max_attempts: u32) -> String {
    match event {
        PollEvent::Tick {
            attempt,
            consecutive_failures,
            result: TickResult::NotReady,
            ..
        } => format!(
            "  … still working (check {}/{}, failures {})",
            attempt, max_attempts, consecutive_failures
        ),
        PollEvent::Tick {
            consecutive_failures,
            result: TickResult::Error { reason },
            ..
        } => format!(
            "  ✗ check failed ({} in a row): {}",
            consecutive_failures, reason
        ),
        PollEvent::Finished(outcome) => format!("  finished: {}", outcome.status()),
    }
}

/// Split analysis text into paragraphs on blank lines
pub fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.lines().map(str::trim_end).collect::<Vec<_>>().join("\n"))
        .collect()
}

/// Short advice for a failed API call, keyed on the HTTP status class
pub fn client_error_hint(err: &ClientError) -> Option<&'static str> {
    if err.is_client_error() {
        Some("the API rejected the request; check the stock code")
    } else if err.is_server_error() {
        Some("the API is having trouble; try again later")
    } else {
        None
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
