//! Output module
//!
//! Hands extracted records off as JSON Lines files.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Resolving the output file for a stream and date
//! - Writing records one JSON document per line
//!
//! Files are written beside their destination and renamed into place on
//! close, so a reader never sees a half-written file and a rerun replaces the
//! previous output for the same day.

mod path;
mod writer;

pub use path::{output_path, render_file_name};
pub use writer::{remove_output, write_jsonl, JsonlWriter};
