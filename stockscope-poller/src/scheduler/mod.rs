//! Scheduler layer for the poller
//!
//! Owns the timer loop that checks an analysis job for completion and the
//! state that bounds how many checks are issued.

pub mod poller;

pub use poller::ResultPoller;
