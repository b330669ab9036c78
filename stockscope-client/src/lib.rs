//! Stockscope HTTP Client
//!
//! A small, type-safe HTTP client for the stock analysis API.
//!
//! The same client serves three purposes: submitting an analysis, checking
//! whether a submitted analysis has finished, and pinging the API for the
//! status panel. It also implements [`StatusCheck`] so the poller can drive it
//! directly.
//!
//! # Example
//!
//! ```no_run
//! use stockscope_client::AnalysisClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AnalysisClient::new("http://localhost:3000");
//!
//!     let response = client.request_analysis("000001").await?;
//!     println!("Submitted analysis for {:?}", response.stock_code);
//!     Ok(())
//! }
//! ```
//!
//! [`StatusCheck`]: stockscope_core::StatusCheck

mod analysis;
pub mod error;
mod status;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use status::EndpointStatus;
pub use stockscope_core::dto::analysis::AnalysisResponse;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the stock analysis API
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    /// Base URL of the API (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl AnalysisClient {
    /// Create a new analysis client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the analysis API (e.g., "http://localhost:3000")
    ///
    /// # Example
    /// ```
    /// use stockscope_client::AnalysisClient;
    ///
    /// let client = AnalysisClient::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new analysis client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use stockscope_client::AnalysisClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = AnalysisClient::with_client("http://localhost:3000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the request
    /// failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
