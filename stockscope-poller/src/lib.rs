//! Stockscope Poller
//!
//! Drives periodic result checks for one outstanding analysis job at a time.
//!
//! Architecture:
//! - Configuration: interval and retry limits, from defaults or environment
//! - Scheduler: the timer-driven poll state machine
//!
//! The poller waits one interval, asks its [`StatusCheck`] collaborator whether
//! the job is done, and repeats until the job succeeds, runs out of attempts,
//! hits the consecutive-failure limit, or is cancelled. Progress and the
//! terminal outcome are published as [`PollEvent`]s.
//!
//! [`StatusCheck`]: stockscope_core::StatusCheck
//! [`PollEvent`]: stockscope_core::domain::poll::PollEvent

pub mod config;
pub mod error;
pub mod scheduler;

pub use config::PollConfig;
pub use error::PollError;
pub use scheduler::ResultPoller;
