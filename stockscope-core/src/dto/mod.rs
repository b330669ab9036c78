//! Data Transfer Objects
//!
//! Wire representations of what the analysis API returns. DTOs are kept
//! separate from domain types so that a change in the API's JSON shape stays
//! contained here.

pub mod analysis;
