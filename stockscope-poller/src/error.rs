//! Poller errors

use thiserror::Error;

/// Errors returned when a poll cannot be started
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("job id cannot be empty")]
    EmptyJobId,

    #[error("invalid poll configuration: {0}")]
    InvalidConfig(String),
}
