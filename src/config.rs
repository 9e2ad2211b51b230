//! Application configuration
//!
//! Configuration is read from a YAML file and then overridden from the
//! environment, so credentials never need to be written to disk.
//!
//! ```yaml
//! api:
//!   base_url: https://pos.open.nhanh.vn/api
//!   version: "2.0"
//!   app_id: "74951"
//!   business_id: "8901"
//!   access_token: "..."
//!   timeout_secs: 30
//! extract:
//!   max_pages: 100
//!   bills: { depot_id: 155286, mode: 6 }
//!   imexs: { icpp: 20, mode: 2 }
//! output:
//!   path: data
//!   name_template: "nhanh_{stream}_{date}.jsonl"
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.app_id`
pub const ENV_APP_ID: &str = "NHANH_APP_ID";
/// Environment variable overriding `api.business_id`
pub const ENV_BUSINESS_ID: &str = "NHANH_BUSINESS_ID";
/// Environment variable overriding `api.access_token`
pub const ENV_ACCESS_TOKEN: &str = "NHANH_ACCESS_TOKEN";
/// Environment variable overriding `api.base_url`
pub const ENV_BASE_URL: &str = "NHANH_BASE_URL";
/// Environment variable overriding `output.path`
pub const ENV_OUTPUT_PATH: &str = "NHANH_OUTPUT_PATH";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Upstream API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Per-stream extraction parameters
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Hand-off output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration: optional file, then process environment, then validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_APP_ID) {
            self.api.app_id = v;
        }
        if let Some(v) = non_empty(ENV_BUSINESS_ID) {
            self.api.business_id = v;
        }
        if let Some(v) = non_empty(ENV_ACCESS_TOKEN) {
            self.api.access_token = v;
        }
        if let Some(v) = non_empty(ENV_BASE_URL) {
            self.api.base_url = v;
        }
        if let Some(v) = non_empty(ENV_OUTPUT_PATH) {
            self.output.path = PathBuf::from(v);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.extract.validate()?;
        self.output.validate()
    }
}

// ============================================================================
// API Config
// ============================================================================

/// Connection settings and credentials for the upstream API
///
/// Immutable once loaded; shared read-only by every extraction.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL, endpoints are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Protocol version sent in every envelope
    #[serde(default = "default_api_version")]
    pub version: String,

    /// Application id
    #[serde(default)]
    pub app_id: String,

    /// Business (tenant) id
    #[serde(default)]
    pub business_id: String,

    /// Access token
    #[serde(default)]
    pub access_token: String,

    /// Per-request timeout, whole seconds in YAML (`timeout_secs`)
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "deserialize_secs"
    )]
    timeout: Duration,

    /// Optional page request throttle
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

fn default_base_url() -> String {
    "https://pos.open.nhanh.vn/api".to_string()
}

fn default_api_version() -> String {
    "2.0".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn deserialize_secs<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_api_version(),
            app_id: String::new(),
            business_id: String::new(),
            access_token: String::new(),
            timeout: default_timeout(),
            requests_per_second: None,
        }
    }
}

impl ApiConfig {
    /// Create an API config with credentials and default settings
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        business_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            app_id: app_id.into(),
            business_id: business_id.into(),
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout, kept at full precision
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the request throttle
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.requests_per_second = Some(requests_per_second);
        self
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validate the API settings
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;

        for (field, value) in [
            ("api.version", &self.version),
            ("api.app_id", &self.app_id),
            ("api.business_id", &self.business_id),
            ("api.access_token", &self.access_token),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        if self.timeout.is_zero() {
            return Err(Error::invalid_value(
                "api.timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "api.requests_per_second",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("app_id", &self.app_id)
            .field("business_id", &self.business_id)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}

// ============================================================================
// Extract Config
// ============================================================================

/// Parameters for the built-in extraction streams
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Page ceiling for every stream
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Sales bills parameters
    #[serde(default)]
    pub bills: BillsConfig,

    /// Inventory movement parameters
    #[serde(default)]
    pub imexs: ImexsConfig,
}

fn default_max_pages() -> u32 {
    100
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            bills: BillsConfig::default(),
            imexs: ImexsConfig::default(),
        }
    }
}

impl ExtractConfig {
    fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(Error::invalid_value(
                "extract.max_pages",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Parameters for `bill/search`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BillsConfig {
    /// Depot (warehouse) id
    #[serde(default = "default_depot_id")]
    pub depot_id: i64,
    /// Bill mode
    #[serde(default = "default_bills_mode")]
    pub mode: i64,
}

fn default_depot_id() -> i64 {
    155_286
}

fn default_bills_mode() -> i64 {
    6
}

impl Default for BillsConfig {
    fn default() -> Self {
        Self {
            depot_id: default_depot_id(),
            mode: default_bills_mode(),
        }
    }
}

/// Parameters for `bill/imexs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImexsConfig {
    /// Items per page requested from the API
    #[serde(default = "default_icpp")]
    pub icpp: i64,
    /// Import/export mode
    #[serde(default = "default_imexs_mode")]
    pub mode: i64,
}

fn default_icpp() -> i64 {
    20
}

fn default_imexs_mode() -> i64 {
    2
}

impl Default for ImexsConfig {
    fn default() -> Self {
        Self {
            icpp: default_icpp(),
            mode: default_imexs_mode(),
        }
    }
}

// ============================================================================
// Output Config
// ============================================================================

/// Where extracted records are handed off
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// File name template, supports `{stream}` and `{date}`
    #[serde(default = "default_name_template")]
    pub name_template: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_name_template() -> String {
    "nhanh_{stream}_{date}.jsonl".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            name_template: default_name_template(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        let template = &self.name_template;
        if template.trim().is_empty() {
            return Err(Error::missing_field("output.name_template"));
        }
        if template.contains('/') || template.contains('\\') {
            return Err(Error::invalid_value(
                "output.name_template",
                "must be a file name, not a path",
            ));
        }
        // Without both placeholders two runs would overwrite each other
        if !template.contains("{stream}") || !template.contains("{date}") {
            return Err(Error::invalid_value(
                "output.name_template",
                "must contain both {stream} and {date}",
            ));
        }
        Ok(())
    }
}
