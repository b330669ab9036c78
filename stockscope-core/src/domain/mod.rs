//! Core domain types
//!
//! These types are shared between the HTTP client (which produces check
//! results), the poller (which owns poll state) and the CLI (which displays
//! events and reports).

pub mod check;
pub mod poll;
pub mod report;
