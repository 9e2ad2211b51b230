//! CLI commands and argument parsing

use crate::streams::Stream;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nhanh.vn POS extraction CLI
#[derive(Parser, Debug)]
#[command(name = "nhanh-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for status messages
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract one day of records and write them as JSONL
    Extract {
        /// Stream to extract
        #[arg(long, default_value = "all")]
        stream: StreamSelection,

        /// Day to extract (YYYY-MM-DD), defaults to yesterday
        #[arg(long)]
        date: Option<String>,

        /// Output directory, overrides `output.path`
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write records even when a stream stopped on error
        #[arg(long)]
        allow_partial: bool,
    },

    /// List built-in streams
    Streams,

    /// Load and validate configuration
    Validate,
}

/// Which streams to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StreamSelection {
    /// Sales bills
    Bills,
    /// Inventory movements
    Imexs,
    /// Every built-in stream
    All,
}

impl StreamSelection {
    /// Streams selected
    pub fn streams(self) -> Vec<Stream> {
        match self {
            Self::Bills => vec![Stream::Bills],
            Self::Imexs => vec![Stream::Imexs],
            Self::All => Stream::ALL.to_vec(),
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract_defaults() {
        let cli = Cli::parse_from(["nhanh-extract", "extract"]);
        match cli.command {
            Commands::Extract {
                stream,
                date,
                output,
                allow_partial,
            } => {
                assert_eq!(stream, StreamSelection::All);
                assert!(date.is_none());
                assert!(output.is_none());
                assert!(!allow_partial);
            }
            other => panic!("Expected extract, got {other:?}"),
        }
        assert!(!cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_extract_with_flags() {
        let cli = Cli::parse_from([
            "nhanh-extract",
            "-C",
            "nhanh.yaml",
            "extract",
            "--stream",
            "imexs",
            "--date",
            "2024-01-15",
            "--output",
            "/tmp/out",
            "--allow-partial",
            "-v",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("nhanh.yaml")));
        assert!(cli.verbose);
        match cli.command {
            Commands::Extract {
                stream,
                date,
                output,
                allow_partial,
            } => {
                assert_eq!(stream.streams(), vec![Stream::Imexs]);
                assert_eq!(date.as_deref(), Some("2024-01-15"));
                assert_eq!(output, Some(PathBuf::from("/tmp/out")));
                assert!(allow_partial);
            }
            other => panic!("Expected extract, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_stream_rejected() {
        assert!(Cli::try_parse_from(["nhanh-extract", "extract", "--stream", "orders"]).is_err());
    }

    #[test]
    fn test_selection_all_covers_every_stream() {
        assert_eq!(StreamSelection::All.streams(), Stream::ALL.to_vec());
    }
}
