//! Connectivity check for PostgreSQL databases.

pub mod check;
pub mod cli;
pub mod config;
pub mod fmt;
pub mod logging;
pub mod report;
pub mod utils;
