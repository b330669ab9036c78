//! Stockscope Core
//!
//! Core types and abstractions for the Stockscope analysis client.
//!
//! This crate contains:
//! - Domain types: poll state, check results, analysis reports
//! - DTOs: wire shapes returned by the analysis API
//! - The `StatusCheck` contract the poller drives, and response classification

pub mod check;
pub mod domain;
pub mod dto;

pub use check::{StatusCheck, classify};
