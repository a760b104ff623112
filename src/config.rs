/// Exporter configuration loader.
///
/// Settings are layered: built-in defaults, then an optional
/// `usgs_exporter.toml`, then environment variables (a `.env` file in the
/// working directory is loaded first). Later layers win.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::model::{ConfigError, PARAM_DISCHARGE};

/// Vermilion River at Vermilion, OH.
pub const DEFAULT_SITE_ID: &str = "04199500";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5050";
pub const DEFAULT_BASE_URL: &str = "https://waterservices.usgs.gov/nwis/iv/";
pub const DEFAULT_CONFIG_PATH: &str = "usgs_exporter.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "USGS_EXPORTER_CONFIG";

/// One year. Keeps `now - lookback` well inside chrono's range.
pub const MAX_LOOKBACK_MINUTES: u64 = 525_600;
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

/// Resolved settings for one exporter process.
#[derive(Debug, Clone, PartialEq)]
pub struct ExporterConfig {
    /// USGS site code to monitor.
    pub site_id: String,
    /// Parameter codes to request, in configured order, without duplicates.
    pub params: Vec<String>,
    pub listen_addr: String,
    /// IV service endpoint; overridable so tests can point at a local server.
    pub base_url: String,
    pub http_timeout_secs: u64,
    /// Width of the trailing request window ending at "now".
    pub lookback_minutes: u64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            site_id: DEFAULT_SITE_ID.to_string(),
            params: vec![PARAM_DISCHARGE.to_string()],
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: 10,
            lookback_minutes: 60,
        }
    }
}

/// On-disk form: every key optional, unknown keys rejected so typos surface
/// at startup.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    site_id: Option<String>,
    params: Option<Vec<String>>,
    listen_addr: Option<String>,
    base_url: Option<String>,
    http_timeout_secs: Option<u64>,
    lookback_minutes: Option<u64>,
}

impl ExporterConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.lookback_minutes as i64)
    }

    /// Overlays settings from TOML text. `origin` is only used in errors.
    pub fn merge_toml(mut self, contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            source: e,
        })?;

        if let Some(site_id) = file.site_id {
            self.site_id = site_id;
        }
        if let Some(params) = file.params {
            self.params = normalize_params(params.iter().map(String::as_str));
        }
        if let Some(addr) = file.listen_addr {
            self.listen_addr = addr;
        }
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(secs) = file.http_timeout_secs {
            self.http_timeout_secs = secs;
        }
        if let Some(minutes) = file.lookback_minutes {
            self.lookback_minutes = minutes;
        }
        Ok(self)
    }

    /// Overlays settings from environment-style key lookups.
    ///
    /// `PORT` only applies when `LISTEN_ADDR` is absent and binds all
    /// interfaces.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(site_id) = lookup("SITE_ID") {
            self.site_id = site_id.trim().to_string();
        }
        if let Some(params) = lookup("PARAMS") {
            self.params = normalize_params(params.split(','));
        }
        match (lookup("LISTEN_ADDR"), lookup("PORT")) {
            (Some(addr), _) => self.listen_addr = addr.trim().to_string(),
            (None, Some(port)) => {
                let port: u16 = parse_number("PORT", &port)?;
                self.listen_addr = format!("0.0.0.0:{}", port);
            }
            (None, None) => {}
        }
        if let Some(url) = lookup("USGS_BASE_URL") {
            self.base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_number("HTTP_TIMEOUT_SECS", &secs)?;
        }
        if let Some(minutes) = lookup("LOOKBACK_MINUTES") {
            self.lookback_minutes = parse_number("LOOKBACK_MINUTES", &minutes)?;
        }
        Ok(self)
    }

    /// Rejects settings the exporter cannot run with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.site_id.is_empty() {
            return Err(ConfigError::Invalid {
                key: "site_id",
                reason: "must not be empty".to_string(),
            });
        }
        if self.params.is_empty() {
            return Err(ConfigError::Invalid {
                key: "params",
                reason: "at least one parameter code is required".to_string(),
            });
        }
        if let Some(bad) = self
            .params
            .iter()
            .find(|p| !p.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(ConfigError::Invalid {
                key: "params",
                reason: format!("'{}' is not a valid parameter code", bad),
            });
        }
        if !(1..=MAX_HTTP_TIMEOUT_SECS).contains(&self.http_timeout_secs) {
            return Err(ConfigError::Invalid {
                key: "http_timeout_secs",
                reason: format!("must be between 1 and {}", MAX_HTTP_TIMEOUT_SECS),
            });
        }
        if !(1..=MAX_LOOKBACK_MINUTES).contains(&self.lookback_minutes) {
            return Err(ConfigError::Invalid {
                key: "lookback_minutes",
                reason: format!("must be between 1 and {}", MAX_LOOKBACK_MINUTES),
            });
        }
        Ok(self)
    }
}

/// Loads the process configuration from `.env`, the optional config file
/// and the environment.
///
/// An explicit `USGS_EXPORTER_CONFIG` path must exist; the default
/// `usgs_exporter.toml` is used only when present.
pub fn load_config() -> Result<ExporterConfig, ConfigError> {
    dotenv::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

/// `load_config` without touching `.env`; all keys, including
/// `USGS_EXPORTER_CONFIG`, come from `lookup`.
pub fn load_from<F>(lookup: F) -> Result<ExporterConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ExporterConfig::default();

    let explicit = lookup(CONFIG_PATH_ENV);
    let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    if explicit.is_some() || Path::new(path).exists() {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            source: e,
        })?;
        config = config.merge_toml(&contents, path)?;
    }

    config.merge_env(lookup)?.validate()
}

/// Trims, drops blanks, and removes repeats while keeping first-seen order.
fn normalize_params<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut params: Vec<String> = Vec::new();
    for code in raw.map(str::trim).filter(|c| !c.is_empty()) {
        if !params.iter().any(|p| p == code) {
            params.push(code.to_string());
        }
    }
    params
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: format!("'{}': {}", raw, e),
    })
}
