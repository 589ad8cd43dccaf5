//! checkwise-cli library root.
//!
//! Config handling, record files and terminal rendering live here so the
//! integration tests can exercise them without spawning the binary.

pub mod config;
pub mod record_file;
pub mod render;
