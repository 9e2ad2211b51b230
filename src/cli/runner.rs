//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, StreamSelection};
use crate::config::AppConfig;
use crate::error::Result;
use crate::extractor::{ExtractionStatus, PaginatedExtractor};
use crate::output::{output_path, remove_output, write_jsonl};
use crate::streams::{format_date, validate_date, yesterday, Stream};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};

/// Overall result of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No stream hit a transport or decode failure
    Succeeded,
    /// At least one stream stopped on a transport or decode failure
    StreamsFailed,
}

impl RunStatus {
    /// Check for success
    pub fn is_success(self) -> bool {
        self == Self::Succeeded
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Succeeded => ExitCode::SUCCESS,
            RunStatus::StreamsFailed => ExitCode::FAILURE,
        }
    }
}

/// What happened to one stream
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    /// Stream extracted
    pub stream: Stream,
    /// Terminal status of the extraction
    pub status: ExtractionStatus,
    /// Records extracted
    pub records: usize,
    /// Page requests issued
    pub pages_fetched: u32,
    /// File written, if any
    pub output_file: Option<PathBuf>,
    /// Extraction and write time
    pub duration_ms: u64,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<RunStatus> {
        match &self.cli.command {
            Commands::Extract {
                stream,
                date,
                output,
                allow_partial,
            } => {
                self.extract(*stream, date.as_deref(), output.as_deref(), *allow_partial)
                    .await
            }
            Commands::Streams => self.streams(),
            Commands::Validate => self.validate(),
        }
    }

    /// Load configuration (file, then environment)
    fn load_config(&self) -> Result<AppConfig> {
        AppConfig::load(self.cli.config.as_deref())
    }

    /// Extract one day for the selected streams
    async fn extract(
        &self,
        selection: StreamSelection,
        date: Option<&str>,
        output: Option<&Path>,
        allow_partial: bool,
    ) -> Result<RunStatus> {
        let run_start = Instant::now();

        let mut config = self.load_config()?;
        if let Some(dir) = output {
            config.output.path = dir.to_path_buf();
        }
        let date = date.map(validate_date).transpose()?.unwrap_or_else(yesterday);

        let extractor = PaginatedExtractor::new(config.api.clone())?;
        let job = StreamJob {
            extractor: &extractor,
            config: &config,
            date,
            allow_partial,
        };

        info!(date = %format_date(date), streams = ?selection, "Starting extraction");

        let results = match selection {
            StreamSelection::All => {
                let (bills, imexs) = tokio::join!(job.run(Stream::Bills), job.run(Stream::Imexs));
                vec![(Stream::Bills, bills), (Stream::Imexs, imexs)]
            }
            single => {
                let mut results = Vec::new();
                for stream in single.streams() {
                    results.push((stream, job.run(stream).await));
                }
                results
            }
        };

        // Report every stream that finished before surfacing an error
        let mut reports = Vec::new();
        let mut errors = Vec::new();
        for (stream, result) in results {
            match result {
                Ok(report) => {
                    self.output_message(&json!({
                        "type": "STREAM_RESULT",
                        "result": report
                    }));
                    reports.push(report);
                }
                Err(e) => {
                    error!(stream = %stream, error = %e, "Stream failed");
                    self.output_message(&json!({
                        "type": "STREAM_RESULT",
                        "result": {"stream": stream, "error": e.to_string()}
                    }));
                    errors.push(e);
                }
            }
        }

        let summary = extract_summary(
            date,
            &reports,
            errors.len(),
            &config.output.path,
            run_start.elapsed().as_millis() as u64,
        );
        self.output_message(&json!({
            "type": "EXTRACT_SUMMARY",
            "summary": summary
        }));

        if let Some(e) = errors.into_iter().next() {
            return Err(e);
        }

        Ok(if reports.iter().any(|r| r.status.is_failure()) {
            RunStatus::StreamsFailed
        } else {
            RunStatus::Succeeded
        })
    }

    /// List built-in streams
    fn streams(&self) -> Result<RunStatus> {
        let streams: Vec<Value> = Stream::ALL
            .iter()
            .map(|stream| {
                json!({
                    "name": stream.name(),
                    "endpoint": stream.endpoint(),
                    "data_key": stream.data_key(),
                    "description": stream.description()
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "STREAMS",
            "streams": streams
        }));

        Ok(RunStatus::Succeeded)
    }

    /// Validate configuration
    fn validate(&self) -> Result<RunStatus> {
        let config = self.load_config()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Configuration is valid: {} (business {}), max {} pages, output to {}",
                    config.api.base_url,
                    config.api.business_id,
                    config.extract.max_pages,
                    config.output.path.display()
                )
            }
        }));

        Ok(RunStatus::Succeeded)
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Shared inputs for the streams of one run
struct StreamJob<'a> {
    extractor: &'a PaginatedExtractor,
    config: &'a AppConfig,
    date: NaiveDate,
    allow_partial: bool,
}

impl StreamJob<'_> {
    /// Extract one stream and hand its records off
    async fn run(&self, stream: Stream) -> Result<StreamReport> {
        let start = Instant::now();
        let spec = stream.request(self.date, &self.config.extract);
        let outcome = self.extractor.extract(&spec).await?;

        let path = output_path(&self.config.output, stream, self.date);
        let output_file = if outcome.status().is_failure() && !self.allow_partial {
            warn!(
                stream = %stream,
                status = %outcome.status(),
                records = outcome.len(),
                "Stream stopped on error, not writing output"
            );
            if remove_output(&path)? {
                warn!(stream = %stream, path = %path.display(), "Removed output from a previous run");
            }
            None
        } else {
            if outcome.status().is_empty_with_code() {
                warn!(
                    stream = %stream,
                    status = %outcome.status(),
                    records = outcome.len(),
                    "Treating non-success code with empty data as end of data; \
                     an expired or revoked token looks the same"
                );
            }
            let rows = write_jsonl(&path, outcome.records())?;
            info!(stream = %stream, rows, path = %path.display(), "Wrote output");
            Some(path)
        };

        Ok(StreamReport {
            stream,
            status: outcome.status().clone(),
            records: outcome.len(),
            pages_fetched: outcome.pages_fetched(),
            output_file,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Build the run summary message
fn extract_summary(
    date: NaiveDate,
    reports: &[StreamReport],
    errored: usize,
    output_dir: &Path,
    duration_ms: u64,
) -> Value {
    let total = reports.len() + errored;
    let failed = reports.iter().filter(|r| r.status.is_failure()).count() + errored;
    let ended_on_empty_code: Vec<Stream> = reports
        .iter()
        .filter(|r| r.status.is_empty_with_code())
        .map(|r| r.stream)
        .collect();

    json!({
        "status": if failed == 0 { "SUCCEEDED" } else if failed == total { "FAILED" } else { "PARTIAL" },
        "date": format_date(date),
        "total_records": reports.iter().map(|r| r.records).sum::<usize>(),
        "total_streams": total,
        "failed_streams": failed,
        "ended_on_empty_code": ended_on_empty_code,
        "output_directory": output_dir,
        "duration_ms": duration_ms
    })
}
