//! API status endpoints

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::AnalysisClient;
use crate::analysis::ANALYSIS_PATH;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Reachability of one API endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub name: String,
    pub url: String,
    pub online: bool,
}

impl AnalysisClient {
    /// Ping a path on the API
    ///
    /// Returns `true` on any 2xx response within five seconds, `false` on
    /// everything else (timeouts, connection errors, error statuses).
    pub async fn ping(&self, path: &str) -> bool {
        let url = format!("{}{}", self.base_url, path);

        match self.client.get(&url).timeout(PING_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Ping {} failed: {}", url, e);
                false
            }
        }
    }

    /// Check every known endpoint
    pub async fn api_status(&self) -> Vec<EndpointStatus> {
        let endpoints = [(
            "Stock analysis API",
            format!("{}?code=000001", ANALYSIS_PATH),
        )];

        let mut statuses = Vec::with_capacity(endpoints.len());
        for (name, path) in endpoints {
            let online = self.ping(&path).await;
            statuses.push(EndpointStatus {
                name: name.to_string(),
                url: format!("{}{}", self.base_url, path),
                online,
            });
        }

        statuses
    }
}
