//! Command-line front end for the trinity replicator dynamics simulator
//!
//! Runs the κ/π baseline comparison and the sensitivity sweep from
//! `trinity_core`, writing CSV/JSON results and a Markdown report.

pub mod commands;
pub mod logging;
pub mod output;
pub mod report;

pub use logging::init_logging;
