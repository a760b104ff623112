/// Shared data types for the exporter: observations, parameter metadata,
/// and the error types that cross module boundaries.

use thiserror::Error;

// ---------------------------------------------------------------------------
// USGS constants
// ---------------------------------------------------------------------------

/// Discharge (streamflow), cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";
/// Gage height (stage), feet.
pub const PARAM_STAGE: &str = "00065";
/// Water temperature, degrees Celsius.
pub const PARAM_WATER_TEMP: &str = "00010";
/// Turbidity, NTU.
pub const PARAM_TURBIDITY: &str = "00076";

/// USGS marks missing measurements with this value, even when a
/// timestamp is present.
pub const NO_DATA_SENTINEL: &str = "-999999";

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// Most recent valid sample for one parameter, as extracted from a single
/// IV response. Site identity travels separately (see `IvSnapshot`).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub parameter_code: String,
    pub value: f64,
    /// Raw upstream timestamp (ISO 8601 with offset), if reported.
    pub datetime: Option<String>,
}

impl Observation {
    /// Unix seconds of the sample time, when the timestamp is RFC 3339.
    pub fn timestamp_secs(&self) -> Option<f64> {
        let raw = self.datetime.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.timestamp_millis() as f64 / 1000.0)
    }
}

/// Metric identity for a USGS parameter code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub code: String,
    pub metric_name: String,
    pub help: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures talking to, or making sense of, the NWIS IV service.
#[derive(Debug, Error)]
pub enum NwisError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("response parse error: {0}")]
    ParseError(String),
}

/// Invalid or unreadable exporter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Startup failures. Nothing in the steady-state scrape path returns this.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("metric registration failed: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
}
