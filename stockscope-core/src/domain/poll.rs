//! Poll lifecycle domain types

use serde::{Deserialize, Serialize};

use crate::domain::check::CheckError;

/// Status of the poller for its current job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    Idle,
    Polling,
    Succeeded,
    TimedOut,
    Failed,
    Cancelled,
}

impl PollStatus {
    /// Terminal statuses never issue further checks
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::TimedOut | Self::Failed | Self::Cancelled
        )
    }
}

impl std::fmt::Display for PollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::Succeeded => "succeeded",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Mutable state owned by the poller for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollState {
    pub job_id: Option<String>,
    pub attempt_count: u32,
    pub consecutive_failure_count: u32,
    pub status: PollStatus,
}

impl PollState {
    /// Fresh state for a newly started job
    pub fn polling(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            attempt_count: 0,
            consecutive_failure_count: 0,
            status: PollStatus::Polling,
        }
    }

    /// Cleared state carrying only a final status
    pub fn cleared(status: PollStatus) -> Self {
        Self {
            job_id: None,
            attempt_count: 0,
            consecutive_failure_count: 0,
            status,
        }
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self::cleared(PollStatus::Idle)
    }
}

/// Terminal outcome of a poll, reported exactly once per job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    Succeeded {
        job_id: String,
        payload: serde_json::Value,
    },
    TimedOut {
        job_id: String,
        attempts: u32,
    },
    Failed {
        job_id: String,
        reason: CheckError,
    },
    Cancelled {
        job_id: String,
    },
}

impl PollOutcome {
    pub fn job_id(&self) -> &str {
        match self {
            Self::Succeeded { job_id, .. }
            | Self::TimedOut { job_id, .. }
            | Self::Failed { job_id, .. }
            | Self::Cancelled { job_id } => job_id,
        }
    }

    /// The status the poller holds after reporting this outcome
    pub fn status(&self) -> PollStatus {
        match self {
            Self::Succeeded { .. } => PollStatus::Succeeded,
            Self::TimedOut { .. } => PollStatus::TimedOut,
            Self::Failed { .. } => PollStatus::Failed,
            Self::Cancelled { .. } => PollStatus::Cancelled,
        }
    }
}

/// Non-terminal check result carried by a progress tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickResult {
    NotReady,
    Error { reason: CheckError },
}

/// Event published by the poller to its subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PollEvent {
    /// A check came back `not_ready` or `error`
    Tick {
        job_id: String,
        attempt: u32,
        consecutive_failures: u32,
        result: TickResult,
    },
    /// The job reached a terminal state
    Finished(PollOutcome),
}
