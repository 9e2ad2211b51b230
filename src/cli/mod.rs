//! CLI module
//!
//! Command-line interface for the daily extraction job.
//!
//! # Commands
//!
//! - `extract` - Extract one day of records to JSONL files
//! - `streams` - List built-in streams
//! - `validate` - Check configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, StreamSelection};
pub use runner::{RunStatus, Runner, StreamReport};
