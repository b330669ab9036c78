//! Check result domain types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a single status check against the analysis API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CheckResult {
    /// The backend finished; carries the report payload
    Ready(serde_json::Value),
    /// Well-formed response, no result yet
    NotReady,
    /// Transport, HTTP or upstream failure
    Error(CheckError),
}

impl CheckResult {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Why a status check failed
///
/// The poller treats every variant the same way (one step toward the
/// consecutive-failure limit); the variant only matters for display.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum CheckError {
    /// Network failure or non-success HTTP status
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload missing expected fields or not valid JSON
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Payload carries an explicit error from the backend
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl CheckError {
    /// The bare reason string, without the category prefix
    pub fn reason(&self) -> &str {
        match self {
            Self::Transport(r) | Self::MalformedResponse(r) | Self::Upstream(r) => r,
        }
    }
}
