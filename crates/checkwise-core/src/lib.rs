//! checkwise-core
//!
//! Pure domain types for CBC parameter intake and the wire shapes of the
//! prediction service. No I/O; this is the shared vocabulary of the
//! CheckWise system.

pub mod api;
pub mod error;
pub mod models;
