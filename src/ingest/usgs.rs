/// USGS NWIS Instantaneous Values (IV) API client.
///
/// Handles URL construction, the blocking HTTP call, and JSON response
/// parsing for the USGS Water Services IV endpoint:
///   https://waterservices.usgs.gov/nwis/iv/
///
/// The IV service returns WaterML rendered as JSON. See `fixtures.rs` for
/// annotated examples of the response structure.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{NO_DATA_SENTINEL, NwisError, Observation};

// ---------------------------------------------------------------------------
// Serde structures for WaterML JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IvResponse {
    value: ValueWrapper,
}

/// Series stay untyped here so one malformed entry cannot fail the whole
/// response.
#[derive(Deserialize)]
struct ValueWrapper {
    #[serde(rename = "timeSeries")]
    time_series: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct TimeSeries {
    variable: Variable,
    values: Vec<Values>,
}

#[derive(Deserialize)]
struct Variable {
    #[serde(rename = "variableCode")]
    variable_code: Vec<VariableCode>,
    #[serde(rename = "noDataValue")]
    no_data_value: Option<f64>,
}

#[derive(Deserialize)]
struct VariableCode {
    value: String,
}

#[derive(Deserialize)]
struct Values {
    #[serde(default)]
    value: Vec<ValueEntry>,
}

#[derive(Deserialize)]
struct ValueEntry {
    value: Option<String>, // USGS returns as string!
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsed output
// ---------------------------------------------------------------------------

/// Why a series produced no observation.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The series entry did not have the expected WaterML shape.
    Malformed(String),
    /// The series had no value entries in the requested window.
    NoValues,
    /// The latest entry had no value string.
    MissingValue,
    /// The latest entry was the no-data sentinel.
    Sentinel,
    /// The latest value string was not a number.
    BadValue(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSeries {
    /// `None` when the series was too malformed to name its parameter.
    pub parameter_code: Option<String>,
    pub reason: SkipReason,
}

/// Everything one IV response tells the exporter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IvSnapshot {
    /// First `sourceInfo.siteName` in response order.
    pub site_name: Option<String>,
    /// Latest valid sample per series, in response order.
    pub observations: Vec<Observation>,
    pub skipped: Vec<SkippedSeries>,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Trailing request window `[now - lookback, now]`, clamped to the
/// earliest representable time instead of overflowing.
pub fn request_window(now: DateTime<Utc>, lookback: Duration) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.checked_sub_signed(lookback).unwrap_or(DateTime::<Utc>::MIN_UTC);
    (start, now)
}

/// Builds an IV API URL for one site, its parameter codes, and an explicit
/// UTC time window. Always requests JSON.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use usgs_exporter::ingest::usgs::build_iv_url;
///
/// let end = Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap();
/// let url = build_iv_url(
///     "https://waterservices.usgs.gov/nwis/iv/",
///     "04199500",
///     &["00060", "00065"],
///     end - Duration::hours(1),
///     end,
/// );
/// assert!(url.contains("parameterCd=00060,00065"));
/// ```
pub fn build_iv_url(
    base_url: &str,
    site: &str,
    param_codes: &[&str],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> String {
    let params_param = param_codes
        .iter()
        .map(|code| urlencoding::encode(code).into_owned())
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}?sites={}&parameterCd={}&startDT={}&endDT={}&format=json",
        base_url,
        urlencoding::encode(site),
        params_param,
        start.format(TIMESTAMP_FORMAT),
        end.format(TIMESTAMP_FORMAT),
    )
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Builds the blocking client used for every scrape. The timeout bounds
/// the whole request, including reading the body.
pub fn build_client(timeout: std::time::Duration) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("usgs_exporter/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Performs the IV request and returns the response body.
///
/// # Errors
/// - `NwisError::Http` — connection failure, timeout, or body read failure.
/// - `NwisError::Status` — any non-2xx response.
pub fn fetch_iv(client: &reqwest::blocking::Client, url: &str) -> Result<String, NwisError> {
    let response = client.get(url).send().map_err(|e| NwisError::Http {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(NwisError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|e| NwisError::Http {
        url: url.to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an IV response body into the latest valid sample per series.
///
/// Multiple `values[]` blocks in a series are concatenated in order and the
/// last entry wins. Series that are malformed, empty, carry the sentinel, or
/// hold a non-numeric value are logged and reported in `skipped`; they never
/// affect the other series.
///
/// # Errors
/// - `NwisError::ParseError` — body is not JSON or lacks `value.timeSeries`.
pub fn parse_latest(json: &str) -> Result<IvSnapshot, NwisError> {
    let response: IvResponse = serde_json::from_str(json)
        .map_err(|e| NwisError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let mut snapshot = IvSnapshot::default();

    for raw in response.value.time_series {
        if snapshot.site_name.is_none() {
            snapshot.site_name = raw
                .pointer("/sourceInfo/siteName")
                .and_then(|v| v.as_str())
                .map(str::to_string);
        }

        match latest_in_series(raw) {
            Ok(observation) => {
                debug!(
                    parameter = %observation.parameter_code,
                    value = observation.value,
                    "parsed latest sample"
                );
                snapshot.observations.push(observation);
            }
            Err(skipped) => {
                match &skipped.reason {
                    SkipReason::Malformed(e) => warn!(error = %e, "skipping malformed timeSeries entry"),
                    SkipReason::NoValues => warn!(
                        parameter = ?skipped.parameter_code,
                        "no values reported in window"
                    ),
                    SkipReason::MissingValue => warn!(
                        parameter = ?skipped.parameter_code,
                        "latest entry has no value"
                    ),
                    SkipReason::Sentinel => warn!(
                        parameter = ?skipped.parameter_code,
                        "latest value is the no-data sentinel"
                    ),
                    SkipReason::BadValue(v) => warn!(
                        parameter = ?skipped.parameter_code,
                        value = %v,
                        "latest value is not a number"
                    ),
                }
                snapshot.skipped.push(skipped);
            }
        }
    }

    Ok(snapshot)
}

fn latest_in_series(raw: serde_json::Value) -> Result<Observation, SkippedSeries> {
    let series: TimeSeries = serde_json::from_value(raw).map_err(|e| SkippedSeries {
        parameter_code: None,
        reason: SkipReason::Malformed(e.to_string()),
    })?;

    let parameter_code = series
        .variable
        .variable_code
        .into_iter()
        .next()
        .ok_or_else(|| SkippedSeries {
            parameter_code: None,
            reason: SkipReason::Malformed("missing variableCode".to_string()),
        })?
        .value;

    let skip = |reason| SkippedSeries {
        parameter_code: Some(parameter_code.clone()),
        reason,
    };

    let latest = series
        .values
        .into_iter()
        .flat_map(|block| block.value)
        .last()
        .ok_or_else(|| skip(SkipReason::NoValues))?;

    let raw_value = latest
        .value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| skip(SkipReason::MissingValue))?;

    if raw_value == NO_DATA_SENTINEL {
        return Err(skip(SkipReason::Sentinel));
    }

    let value: f64 = raw_value
        .parse()
        .map_err(|_| skip(SkipReason::BadValue(raw_value.to_string())))?;

    if let Some(no_data) = series.variable.no_data_value {
        if (value - no_data).abs() < 0.1 {
            return Err(skip(SkipReason::Sentinel));
        }
    }

    Ok(Observation {
        parameter_code,
        value,
        datetime: latest.date_time,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
