//! Output file naming

use crate::config::OutputConfig;
use crate::streams::Stream;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Render the file name template for a stream and date
///
/// `{stream}` becomes the stream name and `{date}` the date without dashes.
pub fn render_file_name(template: &str, stream: Stream, date: NaiveDate) -> String {
    template
        .replace("{stream}", stream.name())
        .replace("{date}", &date.format("%Y%m%d").to_string())
}

/// Full path of the output file for a stream and date
pub fn output_path(config: &OutputConfig, stream: Stream, date: NaiveDate) -> PathBuf {
    config
        .path
        .join(render_file_name(&config.name_template, stream, date))
}
