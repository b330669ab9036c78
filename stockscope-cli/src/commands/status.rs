//! Status command handler

use anyhow::Result;
use colored::*;
use stockscope_client::AnalysisClient;

use crate::config::Config;

/// Handle `stockscope status`
pub async fn handle_status(config: &Config) -> Result<()> {
    let client = AnalysisClient::new(&config.api_url);
    let statuses = client.api_status().await;

    println!("{}", "API status:".bold());
    for endpoint in statuses {
        let marker = if endpoint.online {
            "● online ".green()
        } else {
            "● offline".red()
        };
        println!("  {} {}", marker, endpoint.name);
        println!("    {}", endpoint.url.dimmed());
    }

    Ok(())
}
